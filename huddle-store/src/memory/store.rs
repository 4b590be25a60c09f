// SPDX-License-Identifier: MIT OR Apache-2.0

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use futures_core::Stream;
use huddle_core::{Fields, Timestamp};
use rand::Rng;
use rand::distr::Alphanumeric;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{debug, trace};

use crate::patch::{Patch, PatchError};
use crate::query::{DocumentSnapshot, Query, QuerySnapshot};
use crate::traits::{DocumentStore, Subscription, SubscriptionId};

const AUTO_ID_LEN: usize = 20;

#[derive(Clone, Debug)]
struct StoredDocument {
    /// Insertion counter, breaks ties between documents with equal sort values.
    seq: u64,
    fields: Fields,
}

#[derive(Debug)]
struct Listener {
    query: Query,
    tx: mpsc::UnboundedSender<QuerySnapshot>,
}

#[derive(Debug, Default)]
struct Inner {
    collections: HashMap<String, BTreeMap<String, StoredDocument>>,
    next_seq: u64,
    next_subscription_id: SubscriptionId,
    listeners: HashMap<SubscriptionId, Listener>,
}

impl Inner {
    fn next_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Sends a fresh snapshot to every listener of the collection and forgets listeners which
    /// went away.
    fn notify(&mut self, collection: &str) {
        let collections = &self.collections;
        self.listeners.retain(|id, listener| {
            if listener.query.collection != collection {
                return true;
            }
            let snapshot = run_query(collections, &listener.query);
            let delivered = listener.tx.send(snapshot).is_ok();
            if !delivered {
                trace!(subscription_id = id, "drop closed listener");
            }
            delivered
        });
    }
}

/// Runs the query against the stored documents.
///
/// Without a sort field documents are returned in id order, with one they are ordered by its
/// value and then by insertion order.
fn run_query(
    collections: &HashMap<String, BTreeMap<String, StoredDocument>>,
    query: &Query,
) -> QuerySnapshot {
    let Some(documents) = collections.get(&query.collection) else {
        return QuerySnapshot::default();
    };

    let mut matches: Vec<(&String, &StoredDocument)> = documents
        .iter()
        .filter(|(_, document)| query.matches(&document.fields))
        .collect();

    if query.order_by.is_some() {
        matches.sort_by(|(_, a), (_, b)| {
            query
                .compare(&a.fields, &b.fields)
                .then_with(|| a.seq.cmp(&b.seq))
        });
    }

    let limit = query.limit.unwrap_or(usize::MAX);
    QuerySnapshot {
        documents: matches
            .into_iter()
            .take(limit)
            .map(|(id, document)| DocumentSnapshot {
                id: id.clone(),
                fields: document.fields.clone(),
            })
            .collect(),
    }
}

/// In-memory document store.
///
/// This does not persist data permanently, all changes are lost when the process ends. Use this
/// only in development or test contexts. Clones share the same state.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of live queries which are still subscribed.
    pub fn subscriptions_len(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

impl DocumentStore for MemoryStore {
    type Error = MemoryStoreError;

    type Subscription = MemorySubscription;

    async fn get(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<DocumentSnapshot>, Self::Error> {
        let inner = self.inner.borrow();
        let document = inner
            .collections
            .get(collection)
            .and_then(|documents| documents.get(id))
            .map(|document| DocumentSnapshot {
                id: id.to_owned(),
                fields: document.fields.clone(),
            });
        Ok(document)
    }

    async fn create(&self, collection: &str, id: &str, patch: Patch) -> Result<bool, Self::Error> {
        let mut inner = self.inner.borrow_mut();

        let exists = inner
            .collections
            .get(collection)
            .is_some_and(|documents| documents.contains_key(id));
        if exists {
            return Ok(false);
        }

        let mut fields = Fields::new();
        patch.apply(&mut fields, Timestamp::now())?;

        let seq = inner.next_seq();
        inner
            .collections
            .entry(collection.to_owned())
            .or_default()
            .insert(id.to_owned(), StoredDocument { seq, fields });
        inner.notify(collection);

        debug!(collection, id, "created document");
        Ok(true)
    }

    async fn add(&self, collection: &str, patch: Patch) -> Result<String, Self::Error> {
        let mut inner = self.inner.borrow_mut();

        let mut fields = Fields::new();
        patch.apply(&mut fields, Timestamp::now())?;

        let documents = inner.collections.entry(collection.to_owned()).or_default();
        let id = loop {
            let candidate: String = rand::rng()
                .sample_iter(&Alphanumeric)
                .take(AUTO_ID_LEN)
                .map(char::from)
                .collect();
            if !documents.contains_key(&candidate) {
                break candidate;
            }
        };

        let seq = inner.next_seq();
        inner
            .collections
            .entry(collection.to_owned())
            .or_default()
            .insert(id.clone(), StoredDocument { seq, fields });
        inner.notify(collection);

        debug!(collection, %id, "added document");
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, patch: Patch) -> Result<bool, Self::Error> {
        let mut inner = self.inner.borrow_mut();

        let Some(document) = inner
            .collections
            .get_mut(collection)
            .and_then(|documents| documents.get_mut(id))
        else {
            return Ok(false);
        };

        patch.apply(&mut document.fields, Timestamp::now())?;
        inner.notify(collection);

        debug!(collection, id, "updated document");
        Ok(true)
    }

    async fn query(&self, query: &Query) -> Result<Vec<DocumentSnapshot>, Self::Error> {
        let inner = self.inner.borrow();
        Ok(run_query(&inner.collections, query).documents)
    }

    async fn subscribe(&self, query: Query) -> Result<Self::Subscription, Self::Error> {
        let mut inner = self.inner.borrow_mut();

        let (tx, rx) = mpsc::unbounded_channel();

        // Deliver the current result set first. The receiver is still alive here.
        let _ = tx.send(run_query(&inner.collections, &query));

        let id = inner.next_subscription_id;
        inner.next_subscription_id += 1;

        debug!(subscription_id = id, collection = %query.collection, "subscribe");
        inner.listeners.insert(id, Listener { query, tx });

        Ok(MemorySubscription {
            id,
            stream: UnboundedReceiverStream::new(rx),
            store: self.inner.clone(),
        })
    }
}

/// Live query on a [`MemoryStore`].
#[derive(Debug)]
pub struct MemorySubscription {
    id: SubscriptionId,
    stream: UnboundedReceiverStream<QuerySnapshot>,
    store: Rc<RefCell<Inner>>,
}

impl Subscription for MemorySubscription {
    fn id(&self) -> SubscriptionId {
        self.id
    }

    fn unsubscribe(self) {
        drop(self);
    }
}

impl Stream for MemorySubscription {
    type Item = Result<QuerySnapshot, MemoryStoreError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.stream)
            .poll_next(cx)
            .map(|snapshot| snapshot.map(Ok))
    }
}

impl Drop for MemorySubscription {
    fn drop(&mut self) {
        // Closed listeners are also cleaned up on the next write if the store is busy right now.
        if let Ok(mut inner) = self.store.try_borrow_mut() {
            if inner.listeners.remove(&self.id).is_some() {
                debug!(subscription_id = self.id, "unsubscribe");
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum MemoryStoreError {
    #[error(transparent)]
    Patch(#[from] PatchError),
}
