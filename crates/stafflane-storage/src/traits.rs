//! The store contract the query engine depends on.

use std::sync::Arc;

use async_trait::async_trait;

use crate::predicate::Predicate;
use crate::types::FetchOptions;
use stafflane_core::{EntityKind, EntityRecord, Result};

/// A store that can count and fetch records of one entity kind.
///
/// This is the only collaborator the list-query engine talks to. Backends
/// translate the predicate tree and fetch options into whatever their
/// persistence technology speaks; nothing beyond these two operations is
/// assumed.
#[async_trait]
pub trait ListStore: Send + Sync {
    /// Number of records matching the predicate.
    async fn count(&self, kind: &EntityKind, predicate: &Predicate) -> Result<usize>;

    /// One page of matching records, ordered, skipped, limited, projected.
    async fn fetch(&self, kind: &EntityKind, options: &FetchOptions) -> Result<Vec<EntityRecord>>;
}

/// Type alias for a shareable store instance
pub type DynListStore = Arc<dyn ListStore>;
