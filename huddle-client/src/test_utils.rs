// SPDX-License-Identifier: MIT OR Apache-2.0

use huddle_store::{MemoryIdentity, MemoryStore};

use crate::Client;

pub use huddle_groups::test_utils::setup_logging;

pub type TestClient = Client<MemoryStore, MemoryIdentity>;

/// Client with default configuration on top of a fresh in-memory store and identity service.
pub fn test_client() -> TestClient {
    Client::new(MemoryStore::new(), MemoryIdentity::new())
}
