// SPDX-License-Identifier: MIT OR Apache-2.0

use std::future::Future;

use futures_core::Stream;
use huddle_core::UserId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Signed-in user as reported by the authentication service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub uid: UserId,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
}

/// Interface of the hosted authentication service.
///
/// At most one user is signed in at a time, this is the "session". Changes of the session are
/// observable through [`Identity::sessions`].
pub trait Identity {
    /// Yields the current session right away and then again on every login or logout.
    type Sessions: Stream<Item = Option<User>> + Unpin;

    /// Returns the signed-in user or `None` if there is no active session.
    fn current_user(&self) -> Option<User>;

    fn sessions(&self) -> Self::Sessions;

    fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<User, IdentityError>>;

    /// Creates a new account and signs it in.
    fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<User, IdentityError>>;

    /// Sets the display name of the signed-in user.
    fn update_display_name(
        &self,
        display_name: &str,
    ) -> impl Future<Output = Result<User, IdentityError>>;

    fn sign_out(&self) -> impl Future<Output = Result<(), IdentityError>>;
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("invalid credential")]
    InvalidCredential,

    #[error("invalid email address")]
    InvalidEmail,

    #[error("no account exists for this email address")]
    UserNotFound,

    #[error("wrong password")]
    WrongPassword,

    #[error("too many attempts")]
    TooManyRequests,

    #[error("email address is already in use")]
    EmailAlreadyInUse,

    #[error("password is too weak")]
    WeakPassword,

    #[error("password is missing")]
    MissingPassword,

    #[error("network request failed")]
    Network,

    #[error("no user is signed in")]
    NoSession,

    #[error("{0}")]
    Other(String),
}
