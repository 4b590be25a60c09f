// SPDX-License-Identifier: MIT OR Apache-2.0

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use huddle_core::UserId;
use rand::Rng;
use rand::distr::Alphanumeric;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::debug;

use crate::identity::{Identity, IdentityError, User};

const UID_LEN: usize = 28;
const MIN_PASSWORD_LEN: usize = 6;

#[derive(Clone, Debug)]
struct Account {
    password: String,
    user: User,
}

/// In-memory authentication service.
///
/// Accounts are kept in memory only. Clones share the same accounts and session.
#[derive(Clone, Debug)]
pub struct MemoryIdentity {
    accounts: Rc<RefCell<HashMap<String, Account>>>,
    session: Rc<watch::Sender<Option<User>>>,
}

impl MemoryIdentity {
    pub fn new() -> Self {
        let (session, _) = watch::channel(None);
        Self {
            accounts: Rc::new(RefCell::new(HashMap::new())),
            session: Rc::new(session),
        }
    }

    fn set_session(&self, user: Option<User>) {
        self.session.send_replace(user);
    }

    /// Writes changes of the signed-in user back into its account.
    fn update_account(&self, user: &User) {
        let mut accounts = self.accounts.borrow_mut();
        if let Some(account) = accounts
            .values_mut()
            .find(|account| account.user.uid == user.uid)
        {
            account.user = user.clone();
        }
    }
}

impl Default for MemoryIdentity {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_email(email: &str) -> Result<String, IdentityError> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(IdentityError::InvalidEmail),
    }
}

fn random_uid() -> UserId {
    let uid: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(UID_LEN)
        .map(char::from)
        .collect();
    UserId::new(uid)
}

impl Identity for MemoryIdentity {
    type Sessions = WatchStream<Option<User>>;

    fn current_user(&self) -> Option<User> {
        self.session.borrow().clone()
    }

    fn sessions(&self) -> Self::Sessions {
        WatchStream::new(self.session.subscribe())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<User, IdentityError> {
        if password.is_empty() {
            return Err(IdentityError::MissingPassword);
        }
        let email = validate_email(email)?;

        // Unknown accounts and wrong passwords are indistinguishable for the caller.
        let user = {
            let accounts = self.accounts.borrow();
            match accounts.get(&email) {
                Some(account) if account.password == password => account.user.clone(),
                _ => return Err(IdentityError::InvalidCredential),
            }
        };

        debug!(uid = %user.uid, "signed in");
        self.set_session(Some(user.clone()));
        Ok(user)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<User, IdentityError> {
        let email = validate_email(email)?;
        if password.is_empty() {
            return Err(IdentityError::MissingPassword);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(IdentityError::WeakPassword);
        }

        let user = {
            let mut accounts = self.accounts.borrow_mut();
            if accounts.contains_key(&email) {
                return Err(IdentityError::EmailAlreadyInUse);
            }

            let user = User {
                uid: random_uid(),
                display_name: None,
                email: Some(email.clone()),
                photo_url: None,
            };
            accounts.insert(
                email,
                Account {
                    password: password.to_owned(),
                    user: user.clone(),
                },
            );
            user
        };

        debug!(uid = %user.uid, "signed up");
        self.set_session(Some(user.clone()));
        Ok(user)
    }

    async fn update_display_name(&self, display_name: &str) -> Result<User, IdentityError> {
        let Some(mut user) = self.current_user() else {
            return Err(IdentityError::NoSession);
        };

        user.display_name = Some(display_name.to_owned());
        self.update_account(&user);
        self.set_session(Some(user.clone()));
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        if let Some(user) = self.current_user() {
            debug!(uid = %user.uid, "signed out");
        }
        self.set_session(None);
        Ok(())
    }
}
