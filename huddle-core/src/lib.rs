// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core data types shared by all huddle crates.
//!
//! Groups, their members, user profiles and chat messages live as loosely-typed documents in a
//! hosted document database. This crate defines the typed schema for these documents and
//! validates them at the point where they are read, so the rest of the stack never has to deal
//! with missing or malformed fields.
//!
//! It also contains the slug function which maps human-chosen group names and join keys to their
//! canonical identifiers:
//!
//! ```
//! use huddle_core::slug;
//!
//! assert_eq!(slug("Team Alpha"), "team-alpha");
//! assert_eq!(slug(&slug("  Team -- Alpha!  ")), "team-alpha");
//! ```
mod chat;
mod document;
mod group;
mod identifiers;
mod profile;
mod slug;
mod timestamp;

pub use chat::ChatMessage;
pub use document::{Fields, SchemaError};
pub use group::{GROUP_SCHEMA_VERSION, Group, Member};
pub use identifiers::{GroupId, JoinKey, MessageId, UserId};
pub use profile::{Profile, email_local_part};
pub use slug::{slug, slug_with_limit};
pub use timestamp::Timestamp;

/// Collection holding all group documents.
pub const GROUPS_COLLECTION: &str = "groups";

/// Collection holding one profile document per user, keyed by user id.
pub const USERS_COLLECTION: &str = "users";

/// Returns the path of the chat collection nested under a group document.
pub fn chat_collection(group_id: &GroupId) -> String {
    format!("{GROUPS_COLLECTION}/{group_id}/chat")
}
