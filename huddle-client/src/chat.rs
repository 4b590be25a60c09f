// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use huddle_core::{ChatMessage, GroupId, MessageId, chat_collection};
use huddle_store::{Direction, DocumentStore, Identity, Patch, Query, QuerySnapshot, Subscription};
use thiserror::Error;
use tracing::{debug, warn};

/// Sender name used when the identity service has no display name for the user.
const FALLBACK_SENDER: &str = "User";

/// Sending and following the chat of a group.
#[derive(Clone, Debug)]
pub struct Chat<S, I> {
    store: S,
    identity: I,
    max_message_len: usize,
}

impl<S, I> Chat<S, I>
where
    S: DocumentStore,
    I: Identity,
{
    pub fn new(store: S, identity: I, max_message_len: usize) -> Self {
        Self {
            store,
            identity,
            max_message_len,
        }
    }

    /// Posts a message as the signed-in user.
    pub async fn send(&self, group_id: &GroupId, text: &str) -> Result<MessageId, ChatError<S>> {
        let Some(user) = self.identity.current_user() else {
            return Err(ChatError::AuthRequired);
        };

        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::Validation("message is empty".into()));
        }
        if text.chars().count() > self.max_message_len {
            return Err(ChatError::Validation(format!(
                "message is longer than {} characters",
                self.max_message_len
            )));
        }

        let sender = user
            .display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(FALLBACK_SENDER);

        let patch = Patch::new()
            .set("user", sender)
            .set("uid", user.uid.as_str())
            .set("text", text)
            .server_timestamp("timestamp");

        let id = self
            .store
            .add(&chat_collection(group_id), patch)
            .await
            .map_err(ChatError::Store)?;

        debug!(%group_id, message_id = %id, "sent chat message");
        Ok(MessageId::new(id))
    }

    /// Follows the chat of a group.
    ///
    /// The returned stream yields the whole transcript right away and again after every new
    /// message, oldest message first.
    pub async fn subscribe(
        &self,
        group_id: &GroupId,
    ) -> Result<ChatSubscription<S>, ChatError<S>> {
        if self.identity.current_user().is_none() {
            return Err(ChatError::AuthRequired);
        }

        let query =
            Query::new(&chat_collection(group_id)).order_by("timestamp", Direction::Ascending);
        let subscription = self.store.subscribe(query).await.map_err(ChatError::Store)?;

        debug!(%group_id, subscription_id = subscription.id(), "subscribed to chat");
        Ok(ChatSubscription {
            group_id: group_id.clone(),
            subscription,
        })
    }
}

/// Messages of a chat at one point in time, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    fn from_snapshot(group_id: &GroupId, snapshot: QuerySnapshot) -> Self {
        let messages = snapshot
            .into_iter()
            .filter_map(|document| {
                ChatMessage::from_document(&document.id, document.fields)
                    .inspect_err(|err| warn!(%group_id, "skipping malformed chat message: {err}"))
                    .ok()
            })
            .collect();
        Self { messages }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }
}

/// Live transcript of a group chat.
///
/// Dropping the subscription ends it as well.
pub struct ChatSubscription<S>
where
    S: DocumentStore,
{
    group_id: GroupId,
    subscription: S::Subscription,
}

impl<S> ChatSubscription<S>
where
    S: DocumentStore,
{
    pub fn group_id(&self) -> &GroupId {
        &self.group_id
    }

    pub fn unsubscribe(self) {
        debug!(group_id = %self.group_id, "unsubscribed from chat");
        self.subscription.unsubscribe();
    }
}

impl<S> fmt::Debug for ChatSubscription<S>
where
    S: DocumentStore,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatSubscription")
            .field("group_id", &self.group_id)
            .field("subscription_id", &self.subscription.id())
            .finish()
    }
}

impl<S> Stream for ChatSubscription<S>
where
    S: DocumentStore,
{
    type Item = Result<Transcript, ChatError<S>>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        Pin::new(&mut this.subscription).poll_next(cx).map(|item| {
            item.map(|result| {
                result
                    .map(|snapshot| Transcript::from_snapshot(&this.group_id, snapshot))
                    .map_err(ChatError::Store)
            })
        })
    }
}

#[derive(Debug, Error)]
pub enum ChatError<S>
where
    S: DocumentStore,
{
    #[error("must be signed in to chat")]
    AuthRequired,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Store(S::Error),
}
