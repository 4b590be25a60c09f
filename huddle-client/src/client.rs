// SPDX-License-Identifier: MIT OR Apache-2.0

use huddle_groups::GroupManager;
use huddle_store::{DocumentStore, Identity, User};

use crate::accounts::Accounts;
pub use crate::builder::ClientBuilder;
use crate::chat::Chat;
use crate::config::Config;

/// Entry point bundling accounts, groups and chat on top of one store and identity service.
#[derive(Clone, Debug)]
pub struct Client<S, I> {
    config: Config,
    identity: I,
    accounts: Accounts<S, I>,
    groups: GroupManager<S, I>,
    chat: Chat<S, I>,
}

impl Client<(), ()> {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }
}

impl<S, I> Client<S, I>
where
    S: DocumentStore + Clone,
    I: Identity + Clone,
{
    /// Client with default configuration.
    pub fn new(store: S, identity: I) -> Self {
        Self::new_inner(Config::default(), store, identity)
    }

    pub(crate) fn new_inner(config: Config, store: S, identity: I) -> Self {
        let accounts = Accounts::new(store.clone(), identity.clone());
        let groups =
            GroupManager::with_config(store.clone(), identity.clone(), config.groups.clone());
        let chat = Chat::new(store, identity.clone(), config.max_message_len);

        Self {
            config,
            identity,
            accounts,
            groups,
            chat,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn accounts(&self) -> &Accounts<S, I> {
        &self.accounts
    }

    pub fn groups(&self) -> &GroupManager<S, I> {
        &self.groups
    }

    pub fn chat(&self) -> &Chat<S, I> {
        &self.chat
    }

    pub fn current_user(&self) -> Option<User> {
        self.identity.current_user()
    }

    /// Stream of session changes, starting with the current session.
    pub fn sessions(&self) -> I::Sessions {
        self.identity.sessions()
    }
}
