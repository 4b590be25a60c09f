// SPDX-License-Identifier: MIT OR Apache-2.0

use huddle_store::{Identity, MemoryIdentity, MemoryStore, User};

use crate::GroupManager;

pub type TestGroupManager = GroupManager<MemoryStore, MemoryIdentity>;

pub fn setup_logging() {
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }
}

/// Group manager on top of a fresh in-memory store and identity service.
pub fn test_manager() -> TestGroupManager {
    GroupManager::new(MemoryStore::new(), MemoryIdentity::new())
}

/// Creates an account with a default password and returns the signed-in user.
pub async fn sign_up(identity: &MemoryIdentity, email: &str) -> User {
    identity
        .sign_up(email, "password")
        .await
        .expect("sign up test account")
}

/// Switches the session to an account created with [`sign_up`].
pub async fn sign_in(identity: &MemoryIdentity, email: &str) -> User {
    identity
        .sign_in(email, "password")
        .await
        .expect("sign in test account")
}
