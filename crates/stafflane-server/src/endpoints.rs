//! Per-endpoint list configurations, assembled once at startup.
//!
//! Public-page endpoints (articles, sectors, notices, team members) opt
//! into the shared result cache; back-office endpoints (applications,
//! contacts) stay uncached because admins expect to see writes instantly.

use std::sync::Arc;
use std::time::Duration;

use crate::config::CacheSettings;
use stafflane_core::EntityKind;
use stafflane_query::{
    AugmenterError, CachePolicy, ConditionalFields, ConditionalInclude, ListConfig,
    ListParams, PredicateAugmenter, RelationInclude, RelationSearchField,
};
use stafflane_storage::{Predicate, SortDirection};

fn policy(cache: &CacheSettings, prefix: &str) -> CachePolicy {
    CachePolicy {
        enabled: cache.enabled,
        ttl: Duration::from_secs(cache.ttl_secs),
        max_entries: cache.max_entries,
        key_prefix: prefix.to_string(),
    }
}

/// Narrows articles to a tag when `?tag=...` is present. Tag membership
/// lives inside the relation, which plain filter fields cannot express.
struct TagFilter;

impl PredicateAugmenter for TagFilter {
    fn augment(
        &self,
        tree: Option<Predicate>,
        params: &ListParams,
    ) -> Result<Option<Predicate>, AugmenterError> {
        let Some(tag) = params.raw_param("tag") else {
            return Ok(tree);
        };
        if tag.is_empty() {
            return Err(AugmenterError::new("tag must not be empty"));
        }
        let by_tag = Predicate::AnyRelated {
            relation: "tags".to_string(),
            field: "name".to_string(),
            value: tag.to_string(),
        };
        Ok(Some(match tree {
            Some(existing) => Predicate::And(vec![existing, by_tag]),
            None => by_tag,
        }))
    }
}

pub fn applications() -> ListConfig {
    ListConfig::new(EntityKind::Application)
        .with_searchable_fields(vec!["candidateName", "email", "position"])
        .with_relation_search(
            "interviews",
            vec![RelationSearchField::new("interviews", "notes")],
        )
        .with_relation_search(
            "documents",
            vec![RelationSearchField::new("documents", "fileName")],
        )
        .with_sortable_fields(vec!["createdAt", "candidateName", "status"])
        .with_default_sort("createdAt", SortDirection::Desc)
        .with_filter_field("status", "status")
        .with_filter_field("sector", "sectorId")
        .with_archived_field("archived", false)
        .with_count_relations(vec!["interviews", "documents"])
        .with_conditional_include(ConditionalInclude {
            param: "withDocuments".to_string(),
            expected: None,
            relation: "documents".to_string(),
            shape: None,
        })
        .with_history_relation("statusHistory")
}

pub fn contacts() -> ListConfig {
    ListConfig::new(EntityKind::Contact)
        .with_searchable_fields(vec!["fullName", "email", "message"])
        .with_sortable_fields(vec!["createdAt", "fullName"])
        .with_default_sort("createdAt", SortDirection::Desc)
        .with_filter_field("topic", "topic")
        .with_archived_field("archived", false)
}

pub fn articles(cache: &CacheSettings) -> ListConfig {
    ListConfig::new(EntityKind::Article)
        .with_searchable_fields(vec!["title", "excerpt", "body"])
        .with_relation_search(
            "comments",
            vec![RelationSearchField::new("comments", "text")],
        )
        .with_sortable_fields(vec!["createdAt", "publishedAt", "title"])
        .with_default_sort("publishedAt", SortDirection::Desc)
        .with_filter_field("published", "published")
        .with_predicate_augmenter(Arc::new(TagFilter))
        .with_include(RelationInclude::new("tags"))
        .with_include(RelationInclude::new("author"))
        .with_count_relations(vec!["comments"])
        .with_base_projection(vec!["title", "slug", "excerpt", "publishedAt", "published"])
        .with_conditional_fields(ConditionalFields {
            param: "withBody".to_string(),
            expected: None,
            fields: vec!["body".to_string()],
        })
        .with_cache(policy(cache, "articles"))
}

pub fn sectors(cache: &CacheSettings) -> ListConfig {
    ListConfig::new(EntityKind::Sector)
        .with_searchable_fields(vec!["name", "description"])
        .with_sortable_fields(vec!["createdAt", "name"])
        .with_default_sort("name", SortDirection::Asc)
        .with_active_field("active", true)
        .with_count_relations(vec!["positions"])
        .with_cache(policy(cache, "sectors"))
}

pub fn notices(cache: &CacheSettings) -> ListConfig {
    ListConfig::new(EntityKind::Notice)
        .with_searchable_fields(vec!["title", "body"])
        .with_sortable_fields(vec!["createdAt", "title"])
        .with_default_sort("createdAt", SortDirection::Desc)
        .with_archived_field("archived", false)
        .with_cache(policy(cache, "notices"))
}

pub fn team_members(cache: &CacheSettings) -> ListConfig {
    ListConfig::new(EntityKind::TeamMember)
        .with_searchable_fields(vec!["fullName", "role"])
        .with_sortable_fields(vec!["createdAt", "fullName"])
        .with_default_sort("fullName", SortDirection::Asc)
        .with_active_field("active", true)
        .with_include(RelationInclude::shaped(
            "sectors",
            vec!["id".to_string(), "name".to_string()],
        ))
        .with_base_projection(vec!["fullName", "role", "photoUrl"])
        .with_conditional_fields(ConditionalFields {
            param: "withBio".to_string(),
            expected: None,
            fields: vec!["bio".to_string()],
        })
        .with_cache(policy(cache, "team-members"))
}
