// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};

use crate::document::{Fields, SchemaError, decode};
use crate::identifiers::{MessageId, UserId};
use crate::timestamp::Timestamp;

/// A single message posted into a group's chat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(skip)]
    pub id: Option<MessageId>,
    /// Display name of the sender at the time of sending.
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub uid: Option<UserId>,
    #[serde(default)]
    pub text: String,
    /// Set by the store, `None` until the server assigned it.
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
}

impl ChatMessage {
    pub fn from_document(id: &str, fields: Fields) -> Result<Self, SchemaError> {
        let mut message: Self = decode("chat message", id, fields)?;
        message.id = Some(MessageId::new(id));
        Ok(message)
    }

    pub fn is_from(&self, uid: &UserId) -> bool {
        self.uid.as_ref() == Some(uid)
    }
}
