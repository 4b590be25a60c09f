// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interfaces to the hosted services huddle runs against.
//!
//! huddle does not implement its own backend. Groups, profiles and chat messages are documents
//! in a hosted database, users sign in with a hosted authentication service. This crate
//! describes the minimum capabilities required from both services as the [`DocumentStore`] and
//! [`Identity`] traits.
//!
//! Writes are described by [`Patch`]es. Next to plain field overwrites they can carry operations
//! which the store executes atomically on its side: appending to an array without duplicating
//! entries ([`FieldOp::ArrayUnion`]) and stamping the store's own time
//! ([`FieldOp::ServerTimestamp`]).
//!
//! Reads are either one-shot ([`DocumentStore::get`], [`DocumentStore::query`]) or live: a
//! [`DocumentStore::subscribe`] call returns a stream which yields the complete result set of
//! the query right away and again after every change. Dropping or unsubscribing the handle ends
//! the stream.
//!
//! ## Store implementations
//!
//! In-memory implementations of both traits, `MemoryStore` and `MemoryIdentity`, are gated by
//! the `memory` feature flag which is enabled by default. They are meant for tests and local
//! development and keep everything in memory.
mod identity;
#[cfg(feature = "memory")]
pub mod memory;
mod patch;
mod query;
mod traits;

pub use identity::{Identity, IdentityError, User};
#[cfg(feature = "memory")]
pub use memory::{MemoryIdentity, MemoryStore, MemoryStoreError, MemorySubscription};
pub use patch::{FieldOp, Patch, PatchError};
pub use query::{Direction, DocumentSnapshot, Filter, Query, QuerySnapshot};
pub use traits::{DocumentStore, Subscription, SubscriptionId};
