// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory implementations of the document store and the authentication service.
mod identity;
mod store;

pub use identity::MemoryIdentity;
pub use store::{MemoryStore, MemoryStoreError, MemorySubscription};
