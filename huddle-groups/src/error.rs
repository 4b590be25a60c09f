// SPDX-License-Identifier: MIT OR Apache-2.0

use huddle_core::{GroupId, SchemaError};
use huddle_store::DocumentStore;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GroupError<S>
where
    S: DocumentStore,
{
    /// A required field was missing or empty.
    #[error("{0}")]
    Validation(String),

    /// The operation needs a signed-in user.
    #[error("must be signed in to do this")]
    AuthRequired,

    /// The given group password did not match.
    #[error("incorrect group password")]
    Auth,

    /// The signed-in user is not the owner of the group.
    #[error("only the owner of group '{0}' can do this")]
    Authorization(GroupId),

    #[error("group '{0}' not found")]
    NotFound(String),

    /// A group id or join key is already taken.
    #[error("{0}")]
    Conflict(String),

    #[error("group '{0}' has been deleted")]
    Gone(GroupId),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("{0}")]
    Store(S::Error),
}

impl<S> GroupError<S>
where
    S: DocumentStore,
{
    pub(crate) fn validation(message: &str) -> Self {
        Self::Validation(message.to_owned())
    }
}
