// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};

use crate::document::{Fields, SchemaError, decode};
use crate::timestamp::Timestamp;

/// Profile document stored for every user who signed up.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

impl Profile {
    pub fn from_document(id: &str, fields: Fields) -> Result<Self, SchemaError> {
        decode("profile", id, fields)
    }

    /// Username to show for this profile, falling back to the identity's own attributes.
    ///
    /// Order: stored username, identity display name, local part of the email, `"user"`.
    pub fn username_or(&self, display_name: Option<&str>, email: Option<&str>) -> String {
        non_empty(self.username.as_deref())
            .or(non_empty(display_name))
            .or(non_empty(email.map(email_local_part)))
            .unwrap_or("user")
            .to_owned()
    }
}

/// Returns the part of an email address before the `@`.
pub fn email_local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::Profile;

    #[test]
    fn username_fallbacks() {
        let stored = Profile {
            username: Some("ally".into()),
            ..Profile::default()
        };
        assert_eq!(stored.username_or(Some("Alice"), Some("a@x.org")), "ally");

        let empty = Profile::default();
        assert_eq!(empty.username_or(Some("Alice"), Some("a@x.org")), "Alice");
        assert_eq!(empty.username_or(None, Some("alice@x.org")), "alice");
        assert_eq!(empty.username_or(Some(""), None), "user");
    }
}
