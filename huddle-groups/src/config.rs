// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};

/// Default cap for group ids and join keys.
pub const DEFAULT_MAX_KEY_LEN: usize = 64;

/// Configuration for a group manager.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Maximum length of derived group ids and join keys, `None` for no limit.
    pub max_key_len: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_key_len: Some(DEFAULT_MAX_KEY_LEN),
        }
    }
}
