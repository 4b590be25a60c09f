// SPDX-License-Identifier: MIT OR Apache-2.0

use huddle_store::{DocumentStore, Identity};

use crate::client::Client;
use crate::config::Config;

#[derive(Clone, Debug, Default)]
pub struct ClientBuilder {
    config: Config,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn max_message_len(mut self, len: usize) -> Self {
        self.config.max_message_len = len;
        self
    }

    /// Caps the length of derived group ids and join keys, `None` removes the cap.
    pub fn max_key_len(mut self, len: Option<usize>) -> Self {
        self.config.groups.max_key_len = len;
        self
    }

    pub fn build<S, I>(self, store: S, identity: I) -> Client<S, I>
    where
        S: DocumentStore + Clone,
        I: Identity + Clone,
    {
        Client::new_inner(self.config, store, identity)
    }
}

#[cfg(test)]
mod tests {
    use huddle_store::{MemoryIdentity, MemoryStore};

    use crate::{Client, Config, DEFAULT_MAX_MESSAGE_LEN};

    #[test]
    fn builder_without_type_annotations() {
        let client = Client::builder()
            .max_message_len(140)
            .max_key_len(Some(16))
            .build(MemoryStore::new(), MemoryIdentity::new());
        assert_eq!(client.config().max_message_len, 140);
        assert_eq!(client.config().groups.max_key_len, Some(16));
        assert_eq!(client.groups().config().max_key_len, Some(16));

        let client = Client::builder()
            .max_key_len(None)
            .build(MemoryStore::new(), MemoryIdentity::new());
        assert_eq!(client.config().max_message_len, DEFAULT_MAX_MESSAGE_LEN);
        assert_eq!(client.config().groups.max_key_len, None);

        let client = Client::new(MemoryStore::new(), MemoryIdentity::new());
        assert_eq!(client.config(), &Config::default());
    }
}
