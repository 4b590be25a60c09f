// SPDX-License-Identifier: MIT OR Apache-2.0

//! Password-gated groups with a single owner.
//!
//! A group is created under a name. The name is turned into a URL-safe slug which becomes the
//! immutable id of the group and its first join key. Other users join by entering the join key
//! together with the group password. The user who created a group owns it and is the only one
//! who may rename it, replace its join key or remove members.
//!
//! All state lives in a [`DocumentStore`](huddle_store::DocumentStore) and every operation acts
//! on behalf of whoever is signed in at the [`Identity`](huddle_store::Identity) service.
//!
//! ```
//! # use huddle_groups::GroupManager;
//! # use huddle_store::{Identity, MemoryIdentity, MemoryStore};
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let identity = MemoryIdentity::new();
//! let groups = GroupManager::new(MemoryStore::new(), identity.clone());
//!
//! identity.sign_up("alice@example.org", "hunter22").await?;
//! let group_id = groups.create_group("Book Club", "s3cret").await?;
//! assert_eq!(group_id, "book-club");
//! assert!(groups.is_member_of_group("Book Club").await?);
//! # Ok(())
//! # }
//! ```
mod config;
mod error;
mod manager;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use config::{Config, DEFAULT_MAX_KEY_LEN};
pub use error::GroupError;
pub use manager::GroupManager;
