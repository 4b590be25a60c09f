// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::slug::slug_with_limit;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

string_id!(
    /// Identity id handed out by the authentication service.
    UserId
);

string_id!(
    /// Immutable storage identifier of a group, derived once from its creation name.
    GroupId
);

string_id!(
    /// Human-friendly alias used to find a group when joining it.
    JoinKey
);

string_id!(
    /// Identifier of a chat message document.
    MessageId
);

impl UserId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl GroupId {
    /// Derives the group id from a group name, optionally capped in length.
    pub fn from_name(name: &str, max_len: Option<usize>) -> Self {
        Self(slug_with_limit(name, max_len))
    }

    /// Wraps an id which was read back from the store.
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns `true` if the name this id was derived from contained no usable characters.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl JoinKey {
    /// Canonicalizes user input into a join key, optionally capped in length.
    pub fn from_input(input: &str, max_len: Option<usize>) -> Self {
        Self(slug_with_limit(input, max_len))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&GroupId> for JoinKey {
    fn from(group_id: &GroupId) -> Self {
        Self(group_id.0.clone())
    }
}

impl MessageId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}
