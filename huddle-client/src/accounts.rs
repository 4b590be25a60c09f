// SPDX-License-Identifier: MIT OR Apache-2.0

use huddle_core::{USERS_COLLECTION, email_local_part};
use huddle_store::{DocumentStore, Identity, IdentityError, Patch, User};
use thiserror::Error;
use tracing::{debug, warn};

/// Sign up, sign in and sign out at the identity service.
#[derive(Clone, Debug)]
pub struct Accounts<S, I> {
    store: S,
    identity: I,
}

impl<S, I> Accounts<S, I>
where
    S: DocumentStore,
    I: Identity,
{
    pub fn new(store: S, identity: I) -> Self {
        Self { store, identity }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User, AccountError> {
        Ok(self.identity.sign_in(email, password).await?)
    }

    /// Creates an account, signs it in and stores its profile.
    ///
    /// The name becomes the display name at the identity service and the username in the
    /// profile. Failing to write the profile is logged and does not fail the signup.
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AccountError> {
        let mut user = self.identity.sign_up(email, password).await?;

        let name = name.trim();
        if !name.is_empty() {
            user = self.identity.update_display_name(name).await?;
        }

        let username = match name {
            "" => user
                .email
                .as_deref()
                .map(email_local_part)
                .filter(|local| !local.is_empty())
                .unwrap_or("user"),
            name => name,
        };

        let profile = Patch::new()
            .set("username", username)
            .set("displayName", name)
            .set("photoUrl", user.photo_url.as_deref())
            .set("name", name)
            .set("email", user.email.as_deref())
            .server_timestamp("createdAt")
            .server_timestamp("updatedAt");

        match self
            .store
            .create(USERS_COLLECTION, user.uid.as_str(), profile)
            .await
        {
            Ok(true) => debug!(uid = %user.uid, "stored profile"),
            Ok(false) => warn!(uid = %user.uid, "profile already exists, keeping it"),
            Err(err) => warn!(uid = %user.uid, "failed storing profile: {err}"),
        }

        Ok(user)
    }

    pub async fn logout(&self) -> Result<(), AccountError> {
        Ok(self.identity.sign_out().await?)
    }
}

/// Name to greet a signed-in user with.
pub fn greeting_name(user: &User) -> String {
    user.display_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .or(user.email.as_deref().map(email_local_part))
        .filter(|name| !name.is_empty())
        .unwrap_or("user")
        .to_owned()
}

/// Message to show to a user when signing in or up failed.
pub fn auth_error_message(err: &IdentityError) -> &'static str {
    match err {
        IdentityError::InvalidCredential => "Wrong email or password.",
        IdentityError::InvalidEmail => "Please enter a valid email address.",
        IdentityError::UserNotFound => "No account found with that email.",
        IdentityError::WrongPassword => "Incorrect password.",
        IdentityError::TooManyRequests => "Too many attempts. Try again later.",
        IdentityError::EmailAlreadyInUse => "Email is already in use.",
        IdentityError::WeakPassword => "Password too weak (min 6 characters).",
        IdentityError::MissingPassword => "Password cannot be empty.",
        IdentityError::Network => "Network error. Try again.",
        IdentityError::NoSession | IdentityError::Other(_) => {
            "Something went wrong. Please try again."
        }
    }
}

#[derive(Debug, Error)]
pub enum AccountError {
    #[error(transparent)]
    Identity(#[from] IdentityError),
}

impl AccountError {
    /// User-facing description of this error.
    pub fn message(&self) -> &'static str {
        match self {
            AccountError::Identity(err) => auth_error_message(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use huddle_core::{Profile, USERS_COLLECTION, UserId};
    use huddle_store::{DocumentStore, Identity, IdentityError, MemoryIdentity, MemoryStore, User};

    use super::{AccountError, Accounts, auth_error_message, greeting_name};

    fn user(display_name: Option<&str>, email: Option<&str>) -> User {
        User {
            uid: UserId::from("uid"),
            display_name: display_name.map(str::to_owned),
            email: email.map(str::to_owned),
            photo_url: None,
        }
    }

    #[tokio::test]
    async fn signup_stores_profile() {
        let store = MemoryStore::new();
        let identity = MemoryIdentity::new();
        let accounts = Accounts::new(store.clone(), identity.clone());

        let user = accounts
            .signup("  Alice  ", "alice@example.org", "hunter22")
            .await
            .unwrap();
        assert_eq!(user.display_name.as_deref(), Some("Alice"));
        assert_eq!(identity.current_user(), Some(user.clone()));

        let document = store
            .get(USERS_COLLECTION, user.uid.as_str())
            .await
            .unwrap()
            .unwrap();
        let profile = Profile::from_document(&document.id, document.fields).unwrap();
        assert_eq!(profile.username.as_deref(), Some("Alice"));
        assert_eq!(profile.display_name.as_deref(), Some("Alice"));
        assert_eq!(profile.email.as_deref(), Some("alice@example.org"));
        assert!(profile.created_at.is_some());

        accounts.logout().await.unwrap();
        assert!(identity.current_user().is_none());

        let again = accounts
            .login("alice@example.org", "hunter22")
            .await
            .unwrap();
        assert_eq!(again.uid, user.uid);
    }

    #[tokio::test]
    async fn signup_without_name() {
        let store = MemoryStore::new();
        let accounts = Accounts::new(store.clone(), MemoryIdentity::new());

        let user = accounts
            .signup("", "bob@example.org", "hunter22")
            .await
            .unwrap();
        assert_eq!(user.display_name, None);

        let document = store
            .get(USERS_COLLECTION, user.uid.as_str())
            .await
            .unwrap()
            .unwrap();
        let profile = Profile::from_document(&document.id, document.fields).unwrap();
        assert_eq!(profile.username.as_deref(), Some("bob"));
    }

    #[tokio::test]
    async fn login_errors_are_mapped() {
        let accounts = Accounts::new(MemoryStore::new(), MemoryIdentity::new());

        let err = accounts
            .login("carol@example.org", "hunter22")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AccountError::Identity(IdentityError::InvalidCredential)
        ));
        assert_eq!(err.message(), "Wrong email or password.");

        let err = accounts
            .signup("Carol", "carol", "hunter22")
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Please enter a valid email address.");
    }

    #[test]
    fn greeting() {
        assert_eq!(greeting_name(&user(Some("Alice"), Some("a@x.org"))), "Alice");
        assert_eq!(greeting_name(&user(Some(""), Some("alice@x.org"))), "alice");
        assert_eq!(greeting_name(&user(None, None)), "user");
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            auth_error_message(&IdentityError::WeakPassword),
            "Password too weak (min 6 characters)."
        );
        assert_eq!(
            auth_error_message(&IdentityError::Other("quota exceeded".into())),
            "Something went wrong. Please try again."
        );
    }
}
