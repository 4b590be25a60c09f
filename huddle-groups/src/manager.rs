// SPDX-License-Identifier: MIT OR Apache-2.0

use huddle_core::{
    GROUP_SCHEMA_VERSION, GROUPS_COLLECTION, Group, GroupId, JoinKey, Member, Profile, Timestamp,
    USERS_COLLECTION, UserId,
};
use huddle_store::{DocumentStore, Identity, Patch, Query, User};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::GroupError;

/// Create, join and administrate groups.
///
/// Every operation acts on behalf of whoever is signed in at the identity service at the moment
/// of the call. Only the owner, the user who created a group, may rename it, change its join key
/// or remove members.
///
/// Nothing is retried and no writes are bound together in transactions:
///
/// - Joining appends to the member list with an additive merge on the store side, concurrent
///   joins do not overwrite each other.
/// - Removing a member writes the whole filtered member list back, a concurrent join or removal
///   can get lost.
/// - Join key uniqueness is checked with a query before the write, two owners picking the same
///   key at the same time can both succeed.
#[derive(Clone, Debug)]
pub struct GroupManager<S, I> {
    store: S,
    identity: I,
    config: Config,
}

impl<S, I> GroupManager<S, I>
where
    S: DocumentStore,
    I: Identity,
{
    pub fn new(store: S, identity: I) -> Self {
        Self::with_config(store, identity, Config::default())
    }

    pub fn with_config(store: S, identity: I, config: Config) -> Self {
        Self {
            store,
            identity,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn identity(&self) -> &I {
        &self.identity
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Creates a new group owned by the signed-in user and returns its id.
    ///
    /// The id is derived from the name and can't change afterwards. Without a session the group
    /// is created without owner and members.
    pub async fn create_group(
        &self,
        name: &str,
        password: &str,
    ) -> Result<GroupId, GroupError<S>> {
        let name = name.trim();
        if name.is_empty() || password.is_empty() {
            return Err(GroupError::validation("group name and password are required"));
        }

        let id = GroupId::from_name(name, self.config.max_key_len);
        if id.is_empty() {
            return Err(GroupError::validation(
                "group name needs at least one letter or digit",
            ));
        }

        if self.load(id.as_str()).await?.is_some() {
            return Err(GroupError::Conflict(format!(
                "a group named '{name}' already exists"
            )));
        }

        let join_key = JoinKey::from(&id);
        if self.join_key_holder(&join_key, None).await?.is_some() {
            return Err(GroupError::Conflict(format!(
                "join key '{join_key}' is already used by another group"
            )));
        }

        let caller = self.identity.current_user();
        let (members, member_ids) = match &caller {
            Some(user) => {
                let member = self.member_record(user).await?;
                (
                    vec![member.to_value()?],
                    vec![Value::from(user.uid.as_str())],
                )
            }
            None => (Vec::new(), Vec::new()),
        };

        let patch = Patch::new()
            .set("schemaVersion", GROUP_SCHEMA_VERSION)
            .set("name", name)
            .set("joinKey", join_key.as_str())
            .set("password", password)
            .set("ownerUid", caller.as_ref().map(|user| user.uid.as_str()))
            .set("members", members)
            .set("memberIds", member_ids)
            .server_timestamp("createdAt");

        let created = self
            .store
            .create(GROUPS_COLLECTION, id.as_str(), patch)
            .await
            .map_err(GroupError::Store)?;
        if !created {
            return Err(GroupError::Conflict(format!(
                "a group named '{name}' already exists"
            )));
        }

        debug!(group_id = %id, owner = ?caller.map(|user| user.uid), "created group");
        Ok(id)
    }

    /// Adds the signed-in user to the group with the given join key and returns the group id.
    ///
    /// The input is canonicalized the same way group names are. Joining a group twice is a no-op.
    pub async fn join_group(
        &self,
        join_key: &str,
        password: &str,
    ) -> Result<GroupId, GroupError<S>> {
        if join_key.trim().is_empty() || password.is_empty() {
            return Err(GroupError::validation("group name and password are required"));
        }

        let Some(user) = self.identity.current_user() else {
            return Err(GroupError::AuthRequired);
        };

        let Some(group) = self.resolve(join_key).await? else {
            return Err(GroupError::NotFound(join_key.trim().to_owned()));
        };

        if group.deleted {
            return Err(GroupError::Gone(group.id));
        }

        if group.password != password {
            return Err(GroupError::Auth);
        }

        if group.is_member(&user.uid) {
            debug!(group_id = %group.id, uid = %user.uid, "already a member");
            return Ok(group.id);
        }

        let member = self.member_record(&user).await?;
        let patch = Patch::new()
            .array_union("members", vec![member.to_value()?])
            .array_union("memberIds", vec![Value::from(user.uid.as_str())])
            .server_timestamp("updatedAt");

        let updated = self
            .store
            .update(GROUPS_COLLECTION, group.id.as_str(), patch)
            .await
            .map_err(GroupError::Store)?;
        if !updated {
            return Err(GroupError::NotFound(group.id.to_string()));
        }

        debug!(group_id = %group.id, uid = %user.uid, "joined group");
        Ok(group.id)
    }

    /// Returns `true` if the signed-in user is a member of the group with this join key.
    ///
    /// Missing sessions, unknown groups and deleted groups all report `false`.
    pub async fn is_member_of_group(&self, join_key: &str) -> Result<bool, GroupError<S>> {
        let Some(user) = self.identity.current_user() else {
            return Ok(false);
        };

        match self.resolve(join_key).await? {
            Some(group) if !group.deleted => Ok(group.is_member(&user.uid)),
            _ => Ok(false),
        }
    }

    /// Reads a group by its id.
    pub async fn group(&self, group_id: &GroupId) -> Result<Group, GroupError<S>> {
        self.load(group_id.as_str())
            .await?
            .ok_or_else(|| GroupError::NotFound(group_id.to_string()))
    }

    /// Returns all groups the signed-in user is a member of, ordered by id.
    pub async fn my_groups(&self) -> Result<Vec<Group>, GroupError<S>> {
        let Some(user) = self.identity.current_user() else {
            return Ok(Vec::new());
        };

        let query =
            Query::new(GROUPS_COLLECTION).where_array_contains("memberIds", user.uid.as_str());
        let documents = self.store.query(&query).await.map_err(GroupError::Store)?;

        let mut groups = Vec::with_capacity(documents.len());
        for document in documents {
            let group = Group::from_document(&document.id, document.fields)?;
            if !group.deleted && group.is_member(&user.uid) {
                groups.push(group);
            }
        }
        Ok(groups)
    }

    /// Changes the display name of a group. Owner only.
    pub async fn rename_group(&self, group_id: &GroupId, name: &str) -> Result<(), GroupError<S>> {
        let group = self.owned_group(group_id).await?;

        let name = name.trim();
        if name.is_empty() {
            return Err(GroupError::validation("please enter a group name"));
        }

        self.write(&group.id, Patch::new().set("name", name)).await?;

        debug!(group_id = %group.id, name, "renamed group");
        Ok(())
    }

    /// Replaces the join key of a group and returns the canonicalized key. Owner only.
    ///
    /// Setting the key the group already has is a no-op.
    pub async fn rotate_join_key(
        &self,
        group_id: &GroupId,
        join_key: &str,
    ) -> Result<JoinKey, GroupError<S>> {
        let group = self.owned_group(group_id).await?;

        let join_key = JoinKey::from_input(join_key, self.config.max_key_len);
        if join_key.is_empty() {
            return Err(GroupError::validation(
                "join key needs at least one letter or digit",
            ));
        }

        if join_key == group.effective_join_key() {
            return Ok(join_key);
        }

        // Check and write are not atomic, see type-level docs.
        if self
            .join_key_holder(&join_key, Some(&group.id))
            .await?
            .is_some()
        {
            return Err(GroupError::Conflict(format!(
                "join key '{join_key}' is already used by another group"
            )));
        }

        self.write(&group.id, Patch::new().set("joinKey", join_key.as_str()))
            .await?;

        debug!(group_id = %group.id, %join_key, "rotated join key");
        Ok(join_key)
    }

    /// Removes a member from the group. Owner only.
    ///
    /// Removing someone who is not a member is a no-op. The owner can't be removed.
    pub async fn remove_member(
        &self,
        group_id: &GroupId,
        uid: &UserId,
    ) -> Result<(), GroupError<S>> {
        let group = self.owned_group(group_id).await?;

        if !group.is_member(uid) {
            return Ok(());
        }

        if group.is_owner(uid) {
            return Err(GroupError::validation(
                "the owner can't be removed from their own group",
            ));
        }

        let mut members = Vec::with_capacity(group.members.len());
        let mut member_ids = Vec::with_capacity(group.members.len());
        for member in group.members.iter().filter(|member| &member.uid != uid) {
            members.push(member.to_value()?);
            member_ids.push(Value::from(member.uid.as_str()));
        }

        // Whole-array overwrite, last writer wins.
        let patch = Patch::new()
            .set("members", members)
            .set("memberIds", member_ids);
        self.write(&group.id, patch).await?;

        debug!(group_id = %group.id, %uid, "removed member");
        Ok(())
    }

    async fn load(&self, id: &str) -> Result<Option<Group>, GroupError<S>> {
        let document = self
            .store
            .get(GROUPS_COLLECTION, id)
            .await
            .map_err(GroupError::Store)?;

        match document {
            Some(document) => Ok(Some(Group::from_document(&document.id, document.fields)?)),
            None => Ok(None),
        }
    }

    async fn write(&self, group_id: &GroupId, patch: Patch) -> Result<(), GroupError<S>> {
        let updated = self
            .store
            .update(GROUPS_COLLECTION, group_id.as_str(), patch)
            .await
            .map_err(GroupError::Store)?;
        if !updated {
            return Err(GroupError::NotFound(group_id.to_string()));
        }
        Ok(())
    }

    /// Loads a group and makes sure the signed-in user owns it.
    async fn owned_group(&self, group_id: &GroupId) -> Result<Group, GroupError<S>> {
        let group = self.group(group_id).await?;

        if group.deleted {
            return Err(GroupError::Gone(group.id));
        }

        let Some(user) = self.identity.current_user() else {
            return Err(GroupError::AuthRequired);
        };

        if !group.is_owner(&user.uid) {
            return Err(GroupError::Authorization(group.id));
        }

        Ok(group)
    }

    /// Finds the group which can currently be joined with this input.
    ///
    /// Groups are matched by their join key. Groups which never got an explicit key are matched
    /// by their id instead.
    async fn resolve(&self, input: &str) -> Result<Option<Group>, GroupError<S>> {
        let join_key = JoinKey::from_input(input, self.config.max_key_len);
        if join_key.is_empty() {
            return Ok(None);
        }

        let query = Query::new(GROUPS_COLLECTION)
            .where_eq("joinKey", join_key.as_str())
            .limit(1);
        let documents = self.store.query(&query).await.map_err(GroupError::Store)?;
        if let Some(document) = documents.into_iter().next() {
            return Ok(Some(Group::from_document(&document.id, document.fields)?));
        }

        match self.load(join_key.as_str()).await? {
            Some(group) if group.join_key.is_none() => Ok(Some(group)),
            _ => Ok(None),
        }
    }

    /// Returns the id of a group other than `except` which can be joined with this key.
    async fn join_key_holder(
        &self,
        join_key: &JoinKey,
        except: Option<&GroupId>,
    ) -> Result<Option<GroupId>, GroupError<S>> {
        let query = Query::new(GROUPS_COLLECTION).where_eq("joinKey", join_key.as_str());
        let documents = self.store.query(&query).await.map_err(GroupError::Store)?;
        if let Some(document) = documents
            .into_iter()
            .find(|document| except.is_none_or(|except| except.as_str() != document.id))
        {
            return Ok(Some(GroupId::from_stored(document.id)));
        }

        match self.load(join_key.as_str()).await? {
            Some(group) if group.join_key.is_none() && Some(&group.id) != except => {
                Ok(Some(group.id))
            }
            _ => Ok(None),
        }
    }

    /// Builds the member record for a user from their stored profile and identity attributes.
    async fn member_record(&self, user: &User) -> Result<Member, GroupError<S>> {
        let document = self
            .store
            .get(USERS_COLLECTION, user.uid.as_str())
            .await
            .map_err(GroupError::Store)?;

        let profile = match document {
            Some(document) => Profile::from_document(&document.id, document.fields)
                .unwrap_or_else(|err| {
                    warn!(uid = %user.uid, "ignoring malformed profile: {err}");
                    Profile::default()
                }),
            None => Profile::default(),
        };

        let username = profile.username_or(user.display_name.as_deref(), user.email.as_deref());
        let display_name = profile
            .display_name
            .clone()
            .filter(|name| !name.is_empty())
            .or_else(|| user.display_name.clone().filter(|name| !name.is_empty()))
            .unwrap_or_else(|| username.clone());

        Ok(Member {
            uid: user.uid.clone(),
            username,
            display_name,
            photo_url: profile.photo_url.or_else(|| user.photo_url.clone()),
            email: user.email.clone().or(profile.email),
            joined_at: Timestamp::now(),
        })
    }
}
