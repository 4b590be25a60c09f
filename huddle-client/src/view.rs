// SPDX-License-Identifier: MIT OR Apache-2.0

//! View models for rendering groups and chats.
//!
//! Views are plain values built from typed documents and the viewing user. They carry
//! everything a frontend needs to render and hold no references to the store.
use chrono::{DateTime, Utc};
use huddle_core::{ChatMessage, Group, GroupId, Timestamp, UserId};

const UNTITLED_GROUP: &str = "Untitled Group";
const NO_DESCRIPTION: &str = "No group description yet.";
const DEFAULT_PRIVACY: &str = "private";
const UNKNOWN_OWNER: &str = "unknown";
const UNNAMED_MEMBER: &str = "Member";
const UNKNOWN_AUTHOR: &str = "Unknown";

pub const NO_MEMBERS: &str = "No members to show.";
pub const NO_GROUPS: &str = "You haven't joined any groups yet.";

fn datetime(timestamp: Timestamp) -> Option<DateTime<Utc>> {
    i64::try_from(timestamp.as_millis())
        .ok()
        .and_then(DateTime::from_timestamp_millis)
}

/// Date and time of day, in UTC.
pub fn format_date_time(timestamp: Timestamp) -> Option<String> {
    datetime(timestamp).map(|datetime| datetime.format("%Y-%m-%d %H:%M").to_string())
}

/// Hours and minutes, in UTC.
pub fn format_time(timestamp: Timestamp) -> Option<String> {
    datetime(timestamp).map(|datetime| datetime.format("%H:%M").to_string())
}

/// Group page: header, admin panel and member list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupView {
    pub id: GroupId,
    pub name: String,
    pub description: String,
    /// `Privacy: … • Owner: … • Created: …`
    pub meta: String,
    /// Whether the viewer owns the group and sees the admin panel.
    pub is_admin: bool,
    /// Ordered by join time.
    pub members: Vec<MemberView>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberView {
    pub uid: UserId,
    pub name: String,
    pub photo_url: Option<String>,
    pub is_owner: bool,
    /// Whether the viewer may remove this member.
    pub removable: bool,
}

impl GroupView {
    pub fn new(group: &Group, viewer: Option<&UserId>) -> Self {
        let is_admin = viewer.is_some_and(|uid| group.is_owner(uid));

        let name = non_empty(&group.name).unwrap_or(UNTITLED_GROUP).to_owned();
        let description = group
            .description
            .as_deref()
            .and_then(non_empty)
            .unwrap_or(NO_DESCRIPTION)
            .to_owned();

        let owner = group
            .owner_member()
            .and_then(|member| non_empty(&member.display_name))
            .or(group.owner.as_ref().map(UserId::as_str))
            .unwrap_or(UNKNOWN_OWNER);
        let privacy = group
            .privacy
            .as_deref()
            .and_then(non_empty)
            .unwrap_or(DEFAULT_PRIVACY);

        let mut meta = vec![format!("Privacy: {privacy}"), format!("Owner: {owner}")];
        if let Some(created) = group.created_at.and_then(format_date_time) {
            meta.push(format!("Created: {created}"));
        }

        let mut members: Vec<_> = group.members.iter().collect();
        members.sort_by_key(|member| member.joined_at);
        let members = members
            .into_iter()
            .map(|member| {
                let is_owner = group.is_owner(&member.uid);
                MemberView {
                    uid: member.uid.clone(),
                    name: non_empty(&member.display_name)
                        .unwrap_or(UNNAMED_MEMBER)
                        .to_owned(),
                    photo_url: member.photo_url.clone(),
                    is_owner,
                    removable: is_admin && !is_owner,
                }
            })
            .collect();

        Self {
            id: group.id.clone(),
            name,
            description,
            meta: meta.join(" • "),
            is_admin,
            members,
        }
    }

    /// Text to show instead of an empty member list.
    pub fn members_placeholder(&self) -> Option<&'static str> {
        self.members.is_empty().then_some(NO_MEMBERS)
    }
}

/// One rendered chat message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranscriptLine {
    /// `None` for the viewer's own messages.
    pub author: Option<String>,
    pub text: String,
    pub time: Option<String>,
    pub is_own: bool,
}

impl TranscriptLine {
    pub fn from_messages<'a>(
        messages: impl IntoIterator<Item = &'a ChatMessage>,
        viewer: Option<&UserId>,
    ) -> Vec<Self> {
        messages
            .into_iter()
            .map(|message| {
                let is_own = viewer.is_some_and(|uid| message.is_from(uid));
                let author = (!is_own).then(|| {
                    message
                        .user
                        .as_deref()
                        .and_then(non_empty)
                        .unwrap_or(UNKNOWN_AUTHOR)
                        .to_owned()
                });
                Self {
                    author,
                    text: message.text.clone(),
                    time: message.timestamp.and_then(format_time),
                    is_own,
                }
            })
            .collect()
    }
}

/// "My groups" list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MyGroupsView {
    pub items: Vec<MyGroupsItem>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MyGroupsItem {
    pub id: GroupId,
    pub name: String,
}

impl MyGroupsView {
    pub fn new(groups: &[Group]) -> Self {
        let items = groups
            .iter()
            .map(|group| MyGroupsItem {
                id: group.id.clone(),
                name: non_empty(&group.name).unwrap_or(UNTITLED_GROUP).to_owned(),
            })
            .collect();
        Self { items }
    }

    pub fn placeholder(&self) -> Option<&'static str> {
        self.items.is_empty().then_some(NO_GROUPS)
    }
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

#[cfg(test)]
mod tests {
    use huddle_core::{ChatMessage, Group, GroupId, Member, Timestamp, UserId};

    use super::{GroupView, MyGroupsView, NO_GROUPS, NO_MEMBERS, TranscriptLine, format_time};

    // 2024-03-01 09:05:00 UTC
    const MORNING: u64 = 1_709_283_900_000;

    fn member(uid: &str, display_name: &str, joined_at: u64) -> Member {
        Member {
            uid: UserId::from(uid),
            username: uid.to_owned(),
            display_name: display_name.to_owned(),
            photo_url: None,
            email: None,
            joined_at: Timestamp::new(joined_at),
        }
    }

    fn group(members: Vec<Member>) -> Group {
        Group {
            id: GroupId::from_stored("book-club"),
            name: "Book Club".into(),
            join_key: None,
            password: "secret".into(),
            owner: Some(UserId::from("owner")),
            members,
            created_at: Some(Timestamp::new(MORNING)),
            updated_at: None,
            description: None,
            privacy: None,
            deleted: false,
        }
    }

    #[test]
    fn group_view_for_owner() {
        let group = group(vec![
            member("second", "Bob", 20),
            member("owner", "Alice", 10),
            member("third", "", 30),
        ]);
        let view = GroupView::new(&group, Some(&UserId::from("owner")));

        assert_eq!(view.name, "Book Club");
        assert_eq!(view.description, "No group description yet.");
        assert_eq!(
            view.meta,
            "Privacy: private • Owner: Alice • Created: 2024-03-01 09:05"
        );
        assert!(view.is_admin);

        let names: Vec<&str> = view
            .members
            .iter()
            .map(|member| member.name.as_str())
            .collect();
        assert_eq!(names, vec!["Alice", "Bob", "Member"]);
        assert!(view.members[0].is_owner);
        assert!(!view.members[0].removable);
        assert!(view.members[1].removable);
        assert!(view.members[2].removable);
        assert_eq!(view.members_placeholder(), None);
    }

    #[test]
    fn group_view_for_member() {
        let mut group = group(vec![member("owner", "Alice", 10), member("second", "Bob", 20)]);
        group.privacy = Some("public".into());
        group.description = Some("We read.".into());

        let view = GroupView::new(&group, Some(&UserId::from("second")));
        assert!(!view.is_admin);
        assert!(view.members.iter().all(|member| !member.removable));
        assert_eq!(view.description, "We read.");
        assert!(view.meta.starts_with("Privacy: public • Owner: Alice"));

        let view = GroupView::new(&group, None);
        assert!(!view.is_admin);
    }

    #[test]
    fn group_view_fallbacks() {
        let mut group = group(Vec::new());
        group.name = String::new();
        group.created_at = None;

        let view = GroupView::new(&group, None);
        assert_eq!(view.name, "Untitled Group");
        // Owner is not in the member list, fall back to the uid.
        assert_eq!(view.meta, "Privacy: private • Owner: owner");
        assert_eq!(view.members_placeholder(), Some(NO_MEMBERS));

        group.owner = None;
        let view = GroupView::new(&group, None);
        assert_eq!(view.meta, "Privacy: private • Owner: unknown");
    }

    #[test]
    fn transcript_lines() {
        let messages = vec![
            ChatMessage {
                id: None,
                user: Some("Alice".into()),
                uid: Some(UserId::from("alice")),
                text: "Hi!".into(),
                timestamp: Some(Timestamp::new(MORNING)),
            },
            ChatMessage {
                id: None,
                user: Some("Bob".into()),
                uid: Some(UserId::from("bob")),
                text: "Hello".into(),
                timestamp: None,
            },
            ChatMessage {
                id: None,
                user: None,
                uid: None,
                text: "Who am I?".into(),
                timestamp: None,
            },
        ];

        let lines = TranscriptLine::from_messages(&messages, Some(&UserId::from("bob")));
        assert_eq!(lines[0].author.as_deref(), Some("Alice"));
        assert_eq!(lines[0].time.as_deref(), Some("09:05"));
        assert!(!lines[0].is_own);

        assert_eq!(lines[1].author, None);
        assert!(lines[1].is_own);
        assert_eq!(lines[1].time, None);

        assert_eq!(lines[2].author.as_deref(), Some("Unknown"));
        assert_eq!(lines[2].text, "Who am I?");
    }

    #[test]
    fn my_groups() {
        let view = MyGroupsView::new(&[]);
        assert_eq!(view.placeholder(), Some(NO_GROUPS));

        let view = MyGroupsView::new(&[group(Vec::new())]);
        assert_eq!(view.placeholder(), None);
        assert_eq!(view.items[0].id, "book-club");
        assert_eq!(view.items[0].name, "Book Club");
    }

    #[test]
    fn time_format() {
        assert_eq!(format_time(Timestamp::new(0)).as_deref(), Some("00:00"));
        assert_eq!(format_time(Timestamp::new(u64::MAX)), None);
    }
}
