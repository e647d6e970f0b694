//! Per-endpoint configuration for the list-query engine.
//!
//! A [`ListConfig`] is built once at startup for each list endpoint and
//! shared immutably across requests. Everything request-dependent lives in
//! [`crate::params::ListParams`].

use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use thiserror::Error;

use crate::params::ListParams;
use stafflane_core::EntityKind;
use stafflane_storage::{Predicate, SortDirection};

/// Query parameters with these exact names carry boolean filter values and
/// must be `"true"` or `"false"` on the wire.
pub const RESERVED_BOOLEAN_PARAMS: [&str; 3] = ["published", "active", "archived"];

/// A `(relation, field)` pair searched inside a one-to-many relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationSearchField {
    pub relation: String,
    pub field: String,
}

impl RelationSearchField {
    pub fn new(relation: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            relation: relation.into(),
            field: field.into(),
        }
    }
}

/// An unconditionally eager-loaded relation, optionally with a custom shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationInclude {
    pub relation: String,
    /// `None` falls back to the planner's default shape for this relation
    pub shape: Option<Vec<String>>,
}

impl RelationInclude {
    pub fn new(relation: impl Into<String>) -> Self {
        Self {
            relation: relation.into(),
            shape: None,
        }
    }

    pub fn shaped(relation: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            relation: relation.into(),
            shape: Some(fields),
        }
    }
}

/// A relation attached only when its gating query parameter matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalInclude {
    pub param: String,
    /// Expected parameter value; `None` means any truthy value gates it in
    pub expected: Option<String>,
    pub relation: String,
    pub shape: Option<Vec<String>>,
}

/// Scalar fields appended to the base projection when the gating query
/// parameter matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalFields {
    pub param: String,
    pub expected: Option<String>,
    pub fields: Vec<String>,
}

/// Result-cache policy for one endpoint configuration.
///
/// The cache is shared process-wide and is not keyed by caller identity;
/// never enable it for endpoints whose results vary per caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachePolicy {
    pub enabled: bool,
    pub ttl: Duration,
    pub max_entries: usize,
    pub key_prefix: String,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            enabled: false,
            ttl: Duration::from_secs(60),
            max_entries: 100,
            key_prefix: String::new(),
        }
    }
}

/// Error raised by a [`PredicateAugmenter`].
#[derive(Debug, Error)]
#[error("{0}")]
pub struct AugmenterError(pub String);

impl AugmenterError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Endpoint-supplied strategy that may rewrite the predicate tree after
/// the standard filters are applied and before search is attached.
pub trait PredicateAugmenter: Send + Sync {
    fn augment(
        &self,
        tree: Option<Predicate>,
        params: &ListParams,
    ) -> Result<Option<Predicate>, AugmenterError>;
}

/// Immutable configuration of one list endpoint.
#[derive(Clone)]
pub struct ListConfig {
    pub entity: EntityKind,
    /// Scalar fields eligible for full-text search, in match order
    pub searchable_fields: Vec<String>,
    /// Logical group name -> relation fields searched for the same term
    pub relation_search: IndexMap<String, Vec<RelationSearchField>>,
    pub sortable_fields: Vec<String>,
    pub default_sort: (String, SortDirection),
    pub max_page_size: usize,
    pub default_page_size: usize,
    /// Accepted filter query parameter -> underlying record field.
    /// Parameters named as in [`RESERVED_BOOLEAN_PARAMS`] are coerced to
    /// boolean (implicit convention kept from the original platform).
    pub filter_fields: IndexMap<String, String>,
    pub predicate_augmenter: Option<Arc<dyn PredicateAugmenter>>,
    pub count_relations: Vec<String>,
    pub include_relations: Vec<RelationInclude>,
    pub conditional_includes: Vec<ConditionalInclude>,
    pub base_projection: Option<Vec<String>>,
    pub conditional_fields: Vec<ConditionalFields>,
    pub cache: CachePolicy,
    pub archived_field: Option<String>,
    pub default_archived: bool,
    pub active_field: Option<String>,
    pub default_active: bool,
    /// Opt-in relation loaded only when `history=true` is requested
    pub history_relation: Option<String>,
}

impl std::fmt::Debug for ListConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListConfig")
            .field("entity", &self.entity)
            .field("searchable_fields", &self.searchable_fields)
            .field("sortable_fields", &self.sortable_fields)
            .field("filter_fields", &self.filter_fields)
            .field("has_augmenter", &self.predicate_augmenter.is_some())
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl ListConfig {
    pub fn new(entity: EntityKind) -> Self {
        Self {
            entity,
            searchable_fields: Vec::new(),
            relation_search: IndexMap::new(),
            sortable_fields: vec!["createdAt".to_string()],
            default_sort: ("createdAt".to_string(), SortDirection::Desc),
            max_page_size: 100,
            default_page_size: 10,
            filter_fields: IndexMap::new(),
            predicate_augmenter: None,
            count_relations: Vec::new(),
            include_relations: Vec::new(),
            conditional_includes: Vec::new(),
            base_projection: None,
            conditional_fields: Vec::new(),
            cache: CachePolicy::default(),
            archived_field: None,
            default_archived: false,
            active_field: None,
            default_active: true,
            history_relation: None,
        }
    }

    pub fn with_searchable_fields(mut self, fields: Vec<&str>) -> Self {
        self.searchable_fields = fields.into_iter().map(String::from).collect();
        self
    }

    pub fn with_relation_search(
        mut self,
        group: impl Into<String>,
        fields: Vec<RelationSearchField>,
    ) -> Self {
        self.relation_search.insert(group.into(), fields);
        self
    }

    pub fn with_sortable_fields(mut self, fields: Vec<&str>) -> Self {
        self.sortable_fields = fields.into_iter().map(String::from).collect();
        self
    }

    pub fn with_default_sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.default_sort = (field.into(), direction);
        self
    }

    pub fn with_max_page_size(mut self, max: usize) -> Self {
        self.max_page_size = max;
        self
    }

    pub fn with_default_page_size(mut self, size: usize) -> Self {
        self.default_page_size = size;
        self
    }

    pub fn with_filter_field(mut self, param: impl Into<String>, field: impl Into<String>) -> Self {
        self.filter_fields.insert(param.into(), field.into());
        self
    }

    pub fn with_predicate_augmenter(mut self, augmenter: Arc<dyn PredicateAugmenter>) -> Self {
        self.predicate_augmenter = Some(augmenter);
        self
    }

    pub fn with_count_relations(mut self, relations: Vec<&str>) -> Self {
        self.count_relations = relations.into_iter().map(String::from).collect();
        self
    }

    pub fn with_include(mut self, include: RelationInclude) -> Self {
        self.include_relations.push(include);
        self
    }

    pub fn with_conditional_include(mut self, include: ConditionalInclude) -> Self {
        self.conditional_includes.push(include);
        self
    }

    pub fn with_base_projection(mut self, fields: Vec<&str>) -> Self {
        self.base_projection = Some(fields.into_iter().map(String::from).collect());
        self
    }

    pub fn with_conditional_fields(mut self, fields: ConditionalFields) -> Self {
        self.conditional_fields.push(fields);
        self
    }

    pub fn with_cache(mut self, cache: CachePolicy) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_archived_field(mut self, field: impl Into<String>, default: bool) -> Self {
        self.archived_field = Some(field.into());
        self.default_archived = default;
        self
    }

    pub fn with_active_field(mut self, field: impl Into<String>, default: bool) -> Self {
        self.active_field = Some(field.into());
        self.default_active = default;
        self
    }

    pub fn with_history_relation(mut self, relation: impl Into<String>) -> Self {
        self.history_relation = Some(relation.into());
        self
    }

    /// Whether a filter parameter name carries a boolean value.
    pub fn is_boolean_filter(param: &str) -> bool {
        RESERVED_BOOLEAN_PARAMS.contains(&param)
    }
}
