// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client for huddle, a small group chat application.
//!
//! Users sign up with an email address, create password-protected groups or join existing ones
//! with the group's join key and password, and chat with the other members in real time.
//!
//! A [`Client`] is assembled from a [`DocumentStore`](huddle_store::DocumentStore) and an
//! [`Identity`](huddle_store::Identity) service and hands out the three parts of the
//! application:
//!
//! - [`Accounts`]: sign up, sign in and sign out.
//! - [`GroupManager`](huddle_groups::GroupManager): create, join and administrate groups.
//! - [`Chat`]: post messages and follow a group's transcript as a stream of snapshots.
//!
//! The [`view`] module turns groups and chat messages into plain view models for rendering.
//!
//! ```
//! # use futures_util::StreamExt;
//! # use huddle_client::Client;
//! # use huddle_store::{MemoryIdentity, MemoryStore};
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::builder()
//!     .max_message_len(280)
//!     .build(MemoryStore::new(), MemoryIdentity::new());
//!
//! client
//!     .accounts()
//!     .signup("Alice", "alice@example.org", "hunter22")
//!     .await?;
//! let group_id = client.groups().create_group("Book Club", "s3cret").await?;
//!
//! let mut transcript = client.chat().subscribe(&group_id).await?;
//! client.chat().send(&group_id, "Hello!").await?;
//!
//! # let _ = transcript.next().await;
//! # let transcript = transcript.next().await.unwrap()?;
//! # assert_eq!(transcript.len(), 1);
//! # Ok(())
//! # }
//! ```
mod accounts;
mod builder;
mod chat;
mod client;
mod config;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
pub mod view;

pub use accounts::{AccountError, Accounts, auth_error_message, greeting_name};
pub use chat::{Chat, ChatError, ChatSubscription, Transcript};
pub use client::{Client, ClientBuilder};
pub use config::{Config, DEFAULT_MAX_MESSAGE_LEN};
pub use huddle_groups::{GroupError, GroupManager};
