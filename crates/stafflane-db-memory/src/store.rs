use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use papaya::HashMap as PapayaHashMap;
use serde_json::Value;

use stafflane_core::{CoreError, EntityKind, EntityRecord, Result};
use stafflane_storage::{FetchOptions, ListStore, Predicate, SortDirection};

pub type StorageKey = String; // Format: "EntityKind/id"

pub(crate) fn make_storage_key(kind: &EntityKind, id: &str) -> StorageKey {
    format!("{kind}/{id}")
}

/// In-memory store backend using papaya lock-free HashMap.
///
/// Used as the default backend for local development and as the store
/// under test. Predicate evaluation, sorting, pagination, and projection
/// all run against the record map directly.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    data: Arc<PapayaHashMap<StorageKey, EntityRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            data: Arc::new(PapayaHashMap::new()),
        }
    }

    pub async fn get(&self, kind: &EntityKind, id: &str) -> Option<EntityRecord> {
        let key = make_storage_key(kind, id);
        let guard = self.data.pin();
        guard.get(&key).cloned()
    }

    pub async fn insert(&self, record: EntityRecord) -> Result<()> {
        let key = make_storage_key(&record.kind, &record.id);
        let guard = self.data.pin();
        if guard.get(&key).is_some() {
            return Err(CoreError::record_conflict(record.kind.to_string(), record.id));
        }
        guard.insert(key, record);
        Ok(())
    }

    pub async fn update(&self, mut record: EntityRecord) -> Result<EntityRecord> {
        let key = make_storage_key(&record.kind, &record.id);
        let guard = self.data.pin();
        if guard.get(&key).is_none() {
            return Err(CoreError::record_not_found(
                record.kind.to_string(),
                record.id,
            ));
        }
        record.touch();
        guard.insert(key, record.clone());
        Ok(record)
    }

    pub async fn remove(&self, kind: &EntityKind, id: &str) -> Result<EntityRecord> {
        let key = make_storage_key(kind, id);
        let guard = self.data.pin();
        match guard.remove(&key) {
            Some(record) => Ok(record.clone()),
            None => Err(CoreError::record_not_found(kind.to_string(), id)),
        }
    }

    pub async fn clear(&self) {
        let guard = self.data.pin();
        guard.clear();
    }

    pub async fn len(&self) -> usize {
        self.data.pin().len()
    }

    pub async fn is_empty(&self) -> bool {
        self.data.pin().is_empty()
    }

    fn matching(&self, kind: &EntityKind, predicate: &Predicate) -> Vec<EntityRecord> {
        let guard = self.data.pin();
        guard
            .iter()
            .filter(|(_, r)| &r.kind == kind && predicate.matches(r))
            .map(|(_, r)| r.clone())
            .collect()
    }
}

/// Value used when ordering records by a field.
fn sort_value(record: &EntityRecord, field: &str) -> Option<Value> {
    match field {
        "id" => Some(Value::String(record.id.clone())),
        "createdAt" => Some(Value::String(record.meta.created_at.to_string())),
        "updatedAt" => Some(Value::String(record.meta.updated_at.to_string())),
        _ => record.get_field(field).cloned(),
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl ListStore for InMemoryStore {
    async fn count(&self, kind: &EntityKind, predicate: &Predicate) -> Result<usize> {
        Ok(self.matching(kind, predicate).len())
    }

    async fn fetch(&self, kind: &EntityKind, options: &FetchOptions) -> Result<Vec<EntityRecord>> {
        let mut records = self.matching(kind, &options.predicate);

        let field = options.order_by.field.as_str();
        records.sort_by(|a, b| {
            // Records missing the sort field go last regardless of direction
            let ordering = match (sort_value(a, field), sort_value(b, field)) {
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
                (Some(av), Some(bv)) => {
                    let cmp = compare_values(&av, &bv);
                    match options.order_by.direction {
                        SortDirection::Asc => cmp,
                        SortDirection::Desc => cmp.reverse(),
                    }
                }
            };
            ordering.then_with(|| a.id.cmp(&b.id))
        });

        Ok(records
            .into_iter()
            .skip(options.skip)
            .take(options.take)
            .map(|r| options.projection.apply(&r))
            .collect())
    }
}
