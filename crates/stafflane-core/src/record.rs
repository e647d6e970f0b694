use crate::entity::EntityKind;
use crate::time::{Timestamp, now_utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMeta {
    #[serde(rename = "createdAt")]
    pub created_at: Timestamp,
    #[serde(rename = "updatedAt")]
    pub updated_at: Timestamp,
}

impl RecordMeta {
    pub fn new() -> Self {
        let now = now_utc();
        Self {
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = now_utc();
    }
}

impl Default for RecordMeta {
    fn default() -> Self {
        Self::new()
    }
}

/// A persisted row of any entity kind.
///
/// Scalar columns and relations both live in `data`: a relation is a JSON
/// array of objects under its relation name (e.g. `"tags": [{"id": ...,
/// "name": ...}]`). Stores filter, sort, and project over this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: String,
    pub kind: EntityKind,
    pub meta: RecordMeta,
    #[serde(flatten)]
    pub data: HashMap<String, Value>,
}

impl EntityRecord {
    pub fn new(id: String, kind: EntityKind) -> Self {
        Self {
            id,
            kind,
            meta: RecordMeta::new(),
            data: HashMap::new(),
        }
    }

    /// Create a record with a generated UUID id.
    pub fn generate(kind: EntityKind) -> Self {
        Self::new(uuid::Uuid::new_v4().to_string(), kind)
    }

    pub fn with_data(mut self, data: HashMap<String, Value>) -> Self {
        self.data = data;
        self
    }

    pub fn set_field(&mut self, key: impl Into<String>, value: Value) {
        self.data.insert(key.into(), value);
    }

    pub fn get_field(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn remove_field(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    /// Related rows stored under `relation`, if the field holds an array.
    pub fn related(&self, relation: &str) -> Option<&Vec<Value>> {
        match self.data.get(relation) {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        }
    }

    pub fn touch(&mut self) {
        self.meta.touch();
    }
}
