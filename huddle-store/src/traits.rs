// SPDX-License-Identifier: MIT OR Apache-2.0

use std::error::Error;
use std::future::Future;

use futures_core::Stream;

use crate::patch::Patch;
use crate::query::{DocumentSnapshot, Query, QuerySnapshot};

pub type SubscriptionId = u64;

/// Interface of the hosted document database.
///
/// Documents are addressed by a collection path and an id and consist of untyped top-level
/// fields. Writes are expressed as [`Patch`]es so stores can apply server-side operations like
/// array unions or timestamps atomically.
pub trait DocumentStore {
    type Error: Error;

    /// Live query handle, yields the full result set once right away and again after every change
    /// affecting the queried collection.
    type Subscription: Subscription + Stream<Item = Result<QuerySnapshot, Self::Error>> + Unpin;

    /// Returns the document or `None` if it does not exist.
    fn get(
        &self,
        collection: &str,
        id: &str,
    ) -> impl Future<Output = Result<Option<DocumentSnapshot>, Self::Error>>;

    /// Creates a document under the given id.
    ///
    /// Returns `true` when the document got created or `false` when a document with that id
    /// already existed, in which case nothing was written.
    fn create(
        &self,
        collection: &str,
        id: &str,
        patch: Patch,
    ) -> impl Future<Output = Result<bool, Self::Error>>;

    /// Creates a document under a new, store-generated id and returns it.
    fn add(
        &self,
        collection: &str,
        patch: Patch,
    ) -> impl Future<Output = Result<String, Self::Error>>;

    /// Applies the patch to an existing document.
    ///
    /// Returns `true` when the document got updated or `false` when it does not exist.
    fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Patch,
    ) -> impl Future<Output = Result<bool, Self::Error>>;

    /// Returns all documents matching the query.
    fn query(
        &self,
        query: &Query,
    ) -> impl Future<Output = Result<Vec<DocumentSnapshot>, Self::Error>>;

    /// Subscribes to the results of a query.
    fn subscribe(
        &self,
        query: Query,
    ) -> impl Future<Output = Result<Self::Subscription, Self::Error>>;
}

/// Handle of an active live query.
pub trait Subscription {
    fn id(&self) -> SubscriptionId;

    /// Stops delivery of further snapshots.
    ///
    /// Dropping the handle has the same effect.
    fn unsubscribe(self);
}
