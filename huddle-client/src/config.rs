// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};

/// Default maximum length of a chat message in characters.
pub const DEFAULT_MAX_MESSAGE_LEN: usize = 500;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Longest chat message accepted by [`Chat::send`](crate::Chat::send), in characters.
    pub max_message_len: usize,
    pub groups: huddle_groups::Config,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_message_len: DEFAULT_MAX_MESSAGE_LEN,
            groups: huddle_groups::Config::default(),
        }
    }
}
