// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeMap;

use huddle_core::{Fields, Timestamp};
use serde_json::Value;
use thiserror::Error;

/// Write operation for a single top-level field of a document.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldOp {
    /// Overwrite the field with this value.
    Set(Value),

    /// Append every value which is not already contained in the array field. A missing field
    /// becomes a new array.
    ///
    /// Stores apply the merge atomically per write, concurrent unions from different writers do
    /// not overwrite each other.
    ArrayUnion(Vec<Value>),

    /// Let the store set the field to its own current time.
    ServerTimestamp,

    /// Remove the field from the document.
    Delete,
}

/// Set of field operations sent to the store in one write.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Patch(BTreeMap<String, FieldOp>);

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.insert(field.to_owned(), FieldOp::Set(value.into()));
        self
    }

    pub fn array_union(mut self, field: &str, values: Vec<Value>) -> Self {
        self.0.insert(field.to_owned(), FieldOp::ArrayUnion(values));
        self
    }

    pub fn server_timestamp(mut self, field: &str) -> Self {
        self.0.insert(field.to_owned(), FieldOp::ServerTimestamp);
        self
    }

    pub fn delete(mut self, field: &str) -> Self {
        self.0.insert(field.to_owned(), FieldOp::Delete);
        self
    }

    pub fn get(&self, field: &str) -> Option<&FieldOp> {
        self.0.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldOp)> {
        self.0.iter()
    }

    /// Applies all operations onto the given fields.
    ///
    /// Nothing is changed when any of the operations can't be applied.
    pub fn apply(&self, fields: &mut Fields, now: Timestamp) -> Result<(), PatchError> {
        for (field, op) in &self.0 {
            if let FieldOp::ArrayUnion(_) = op {
                match fields.get(field) {
                    None | Some(Value::Null) | Some(Value::Array(_)) => (),
                    Some(_) => return Err(PatchError::NotAnArray(field.clone())),
                }
            }
        }

        for (field, op) in &self.0 {
            match op {
                FieldOp::Set(value) => {
                    fields.insert(field.clone(), value.clone());
                }
                FieldOp::ArrayUnion(values) => {
                    let entry = fields
                        .entry(field.clone())
                        .or_insert_with(|| Value::Array(Vec::new()));
                    if entry.is_null() {
                        *entry = Value::Array(Vec::new());
                    }
                    if let Value::Array(items) = entry {
                        for value in values {
                            if !items.contains(value) {
                                items.push(value.clone());
                            }
                        }
                    }
                }
                FieldOp::ServerTimestamp => {
                    fields.insert(field.clone(), Value::from(now.as_millis()));
                }
                FieldOp::Delete => {
                    fields.remove(field);
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum PatchError {
    #[error("field '{0}' is not an array, can't merge values into it")]
    NotAnArray(String),
}

#[cfg(test)]
mod tests {
    use huddle_core::{Fields, Timestamp};
    use serde_json::{Value, json};

    use super::{Patch, PatchError};

    #[test]
    fn set_delete_and_timestamp() {
        let mut fields = Fields::new();
        fields.insert("old".into(), json!(true));

        Patch::new()
            .set("name", "Book Club")
            .server_timestamp("updatedAt")
            .delete("old")
            .apply(&mut fields, Timestamp::new(42))
            .unwrap();

        assert_eq!(fields.get("name"), Some(&json!("Book Club")));
        assert_eq!(fields.get("updatedAt"), Some(&json!(42)));
        assert!(!fields.contains_key("old"));
    }

    #[test]
    fn array_union_skips_existing_values() {
        let mut fields = Fields::new();
        let patch = Patch::new().array_union("ids", vec![json!("a"), json!("b")]);
        patch.apply(&mut fields, Timestamp::default()).unwrap();

        Patch::new()
            .array_union("ids", vec![json!("b"), json!("c")])
            .apply(&mut fields, Timestamp::default())
            .unwrap();

        assert_eq!(fields.get("ids"), Some(&json!(["a", "b", "c"])));

        fields.insert("nothing".into(), Value::Null);
        Patch::new()
            .array_union("nothing", vec![json!(1)])
            .apply(&mut fields, Timestamp::default())
            .unwrap();
        assert_eq!(fields.get("nothing"), Some(&json!([1])));
    }

    #[test]
    fn array_union_on_scalar_fails_without_changes() {
        let mut fields = Fields::new();
        fields.insert("name".into(), json!("not a list"));

        let result = Patch::new()
            .set("other", 1)
            .array_union("name", vec![json!("x")])
            .apply(&mut fields, Timestamp::default());

        assert!(matches!(result, Err(PatchError::NotAnArray(field)) if field == "name"));
        assert!(!fields.contains_key("other"));
    }
}
