// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

/// Untyped top-level fields of a stored document.
pub type Fields = Map<String, Value>;

pub(crate) fn decode<T>(kind: &'static str, id: &str, fields: Fields) -> Result<T, SchemaError>
where
    T: DeserializeOwned,
{
    serde_json::from_value(Value::Object(fields)).map_err(|source| SchemaError::Invalid {
        kind,
        id: id.to_owned(),
        source,
    })
}

pub(crate) fn encode<T>(kind: &'static str, value: &T) -> Result<Value, SchemaError>
where
    T: Serialize,
{
    serde_json::to_value(value).map_err(|source| SchemaError::Encode { kind, source })
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("invalid {kind} document '{id}': {source}")]
    Invalid {
        kind: &'static str,
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{kind} document '{id}' uses schema version {found}, newest supported is {supported}")]
    UnsupportedVersion {
        kind: &'static str,
        id: String,
        found: u32,
        supported: u32,
    },

    #[error("could not encode {kind}: {source}")]
    Encode {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
