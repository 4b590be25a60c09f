// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::{Fields, SchemaError, decode, encode};
use crate::identifiers::{GroupId, JoinKey, UserId};
use crate::timestamp::Timestamp;

/// Newest group document layout this crate understands.
pub const GROUP_SCHEMA_VERSION: u32 = 1;

const KIND: &str = "group";

/// Snapshot of a user's profile taken at the moment they joined a group.
///
/// Member records are denormalized copies and are not updated when the profile changes later.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub uid: UserId,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub joined_at: Timestamp,
}

impl Member {
    pub fn to_value(&self) -> Result<Value, SchemaError> {
        encode("member", self)
    }
}

/// A named, password-gated collection of members with exactly one owning identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    /// Explicitly chosen join key, `None` if the owner never set one.
    pub join_key: Option<JoinKey>,
    /// Shared secret, stored and compared as plain text.
    pub password: String,
    /// `None` for groups created without an active session.
    pub owner: Option<UserId>,
    /// Unique by uid, in stored order.
    pub members: Vec<Member>,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
    pub description: Option<String>,
    pub privacy: Option<String>,
    pub deleted: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroupDocument {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    join_key: Option<JoinKey>,
    #[serde(default)]
    password: Option<String>,
    #[serde(default)]
    owner_uid: Option<UserId>,
    #[serde(default)]
    members: Option<Vec<Member>>,
    #[serde(default)]
    created_at: Option<Timestamp>,
    #[serde(default)]
    updated_at: Option<Timestamp>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    privacy: Option<String>,
    #[serde(default)]
    deleted_at: Option<Value>,
}

impl Group {
    /// Validates the raw fields of a group document and turns them into a typed group.
    ///
    /// Missing optional fields fall back to their defaults. Documents written by a newer schema
    /// version are rejected. Duplicate member records for the same uid are collapsed into the
    /// first one.
    pub fn from_document(id: &str, fields: Fields) -> Result<Self, SchemaError> {
        let version = match fields.get("schemaVersion") {
            None | Some(Value::Null) => GROUP_SCHEMA_VERSION,
            Some(value) => u32::deserialize(value).map_err(|source| SchemaError::Invalid {
                kind: KIND,
                id: id.to_owned(),
                source,
            })?,
        };

        if version > GROUP_SCHEMA_VERSION {
            return Err(SchemaError::UnsupportedVersion {
                kind: KIND,
                id: id.to_owned(),
                found: version,
                supported: GROUP_SCHEMA_VERSION,
            });
        }

        let document: GroupDocument = decode(KIND, id, fields)?;

        let mut seen = HashSet::new();
        let members = document
            .members
            .unwrap_or_default()
            .into_iter()
            .filter(|member| seen.insert(member.uid.clone()))
            .collect();

        Ok(Self {
            id: GroupId::from_stored(id),
            name: document.name.unwrap_or_default(),
            join_key: document.join_key.filter(|key| !key.is_empty()),
            password: document.password.unwrap_or_default(),
            owner: document.owner_uid,
            members,
            created_at: document.created_at,
            updated_at: document.updated_at,
            description: document.description,
            privacy: document.privacy,
            deleted: document.deleted_at.is_some(),
        })
    }

    /// The key this group can currently be joined with.
    pub fn effective_join_key(&self) -> JoinKey {
        self.join_key
            .clone()
            .unwrap_or_else(|| JoinKey::from(&self.id))
    }

    pub fn is_owner(&self, uid: &UserId) -> bool {
        self.owner.as_ref() == Some(uid)
    }

    pub fn is_member(&self, uid: &UserId) -> bool {
        self.member(uid).is_some()
    }

    pub fn member(&self, uid: &UserId) -> Option<&Member> {
        self.members.iter().find(|member| &member.uid == uid)
    }

    pub fn owner_member(&self) -> Option<&Member> {
        self.owner.as_ref().and_then(|owner| self.member(owner))
    }

    pub fn member_ids(&self) -> Vec<UserId> {
        self.members
            .iter()
            .map(|member| member.uid.clone())
            .collect()
    }
}
