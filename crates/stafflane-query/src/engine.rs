//! The query executor: validates, builds, runs, assembles, caches.

use crate::cache::{CacheStatsSnapshot, ResultCache};
use crate::config::ListConfig;
use crate::error::QueryError;
use crate::filters::build_where;
use crate::page::Page;
use crate::params::ListParams;
use crate::projection::plan_projection;
use stafflane_core::{CoreError, EntityRecord};
use stafflane_storage::{DynListStore, FetchOptions, OrderBy};

/// Executes list queries for one endpoint configuration.
///
/// Per request: `Received -> Validated -> (cache hit -> respond) |
/// (predicate + projection built -> executed -> cached -> respond)`.
/// Count and fetch run concurrently; either failure surfaces immediately
/// with no retries and no partial result.
pub struct ListEngine {
    config: ListConfig,
    cache: ResultCache,
}

impl ListEngine {
    pub fn new(config: ListConfig) -> Self {
        let cache = ResultCache::new(config.cache.clone());
        Self { config, cache }
    }

    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    pub fn cache_stats(&self) -> CacheStatsSnapshot {
        self.cache.stats()
    }

    pub async fn execute(
        &self,
        store: &DynListStore,
        raw_query: &str,
    ) -> Result<Page<EntityRecord>, QueryError> {
        let params = ListParams::from_query(raw_query, &self.config)?;

        let cache_key = self.cache.key(params.cache_key_parts());
        if self.cache.is_enabled()
            && let Some(page) = self.cache.get(&cache_key)
        {
            tracing::debug!(entity = %self.config.entity, "list served from cache");
            return Ok(page);
        }

        let predicate = build_where(&params, &self.config)?;
        let projection = plan_projection(&self.config, &params)?;
        let options = FetchOptions {
            predicate: predicate.clone(),
            order_by: OrderBy::new(params.sort_field.clone(), params.sort_direction),
            skip: params.skip(),
            take: params.limit,
            projection,
        };

        let count_op = async {
            store
                .count(&self.config.entity, &predicate)
                .await
                .map_err(|e| self.store_error("count", e, &params))
        };
        let fetch_op = async {
            store
                .fetch(&self.config.entity, &options)
                .await
                .map_err(|e| self.store_error("fetch", e, &params))
        };
        let (total, records) = tokio::try_join!(count_op, fetch_op)?;

        let page = Page::new(records, total, params.page, params.limit);
        if self.cache.is_enabled() {
            self.cache.insert(cache_key, page.clone());
            tracing::debug!(
                entity = %self.config.entity,
                stats = ?self.cache.stats(),
                "list result cached"
            );
        }
        Ok(page)
    }

    fn store_error(
        &self,
        operation: &'static str,
        source: CoreError,
        params: &ListParams,
    ) -> QueryError {
        tracing::error!(
            entity = %self.config.entity,
            operation,
            params = %params.shape(),
            error = %source,
            "store operation failed"
        );
        QueryError::Store { operation, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CachePolicy, ConditionalInclude};
    use async_trait::async_trait;
    use serde_json::json;
    use stafflane_core::{EntityKind, Result as CoreResult};
    use stafflane_db_memory::InMemoryStore;
    use stafflane_storage::{ListStore, Predicate, SortDirection};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio_test::block_on;

    fn application(id: &str, name: &str, status: &str) -> EntityRecord {
        let mut r = EntityRecord::new(id.to_string(), EntityKind::Application);
        r.set_field("candidateName", json!(name));
        r.set_field("status", json!(status));
        r
    }

    fn config() -> ListConfig {
        ListConfig::new(EntityKind::Application)
            .with_searchable_fields(vec!["candidateName"])
            .with_sortable_fields(vec!["createdAt", "candidateName"])
            .with_default_sort("createdAt", SortDirection::Desc)
            .with_filter_field("status", "status")
    }

    async fn seeded_store() -> DynListStore {
        let store = InMemoryStore::new();
        // 12 pending applications matching "dev"
        for i in 0..12 {
            store
                .insert(application(
                    &format!("a{i:02}"),
                    &format!("Developer {i:02}"),
                    "pending",
                ))
                .await
                .unwrap();
        }
        // Decoys: wrong status, and no search match
        store
            .insert(application("b01", "Developer 99", "accepted"))
            .await
            .unwrap();
        store
            .insert(application("b02", "Accountant", "pending"))
            .await
            .unwrap();
        Arc::new(store)
    }

    #[test]
    fn end_to_end_page_two_of_twelve() {
        block_on(async {
            let store = seeded_store().await;
            let engine = ListEngine::new(config());
            let page = engine
                .execute(
                    &store,
                    "page=2&limit=5&sortBy=createdAt&sortOrder=desc&search=dev&status=pending",
                )
                .await
                .unwrap();

            assert_eq!(page.meta.total, 12);
            assert_eq!(page.meta.page, 2);
            assert_eq!(page.meta.limit, 5);
            assert_eq!(page.meta.total_pages, 3);
            assert!(page.meta.has_next_page);
            assert!(page.meta.has_prev_page);
            assert_eq!(page.data.len(), 5);
        });
    }

    #[test]
    fn search_narrows_status_filter() {
        block_on(async {
            let store = seeded_store().await;
            let engine = ListEngine::new(config());
            // "Developer 99" matches the search but not status=pending
            let page = engine
                .execute(&store, "search=Developer+99&status=pending")
                .await
                .unwrap();
            assert_eq!(page.meta.total, 0);
        });
    }

    #[test]
    fn disallowed_sort_field_falls_back_without_error() {
        block_on(async {
            let store = seeded_store().await;
            let engine = ListEngine::new(config());
            let page = engine.execute(&store, "sortBy=salary&limit=3").await.unwrap();
            assert_eq!(page.data.len(), 3);
        });
    }

    #[test]
    fn validation_short_circuits_before_store_access() {
        struct PanicStore;

        #[async_trait]
        impl ListStore for PanicStore {
            async fn count(&self, _: &EntityKind, _: &Predicate) -> CoreResult<usize> {
                panic!("store must not be reached");
            }
            async fn fetch(
                &self,
                _: &EntityKind,
                _: &FetchOptions,
            ) -> CoreResult<Vec<EntityRecord>> {
                panic!("store must not be reached");
            }
        }

        block_on(async {
            let store: DynListStore = Arc::new(PanicStore);
            let engine = ListEngine::new(config());
            let err = engine.execute(&store, "page=abc").await.unwrap_err();
            assert!(matches!(err, QueryError::InvalidPagination { .. }));
            let err = engine.execute(&store, "archived=yes").await.unwrap_err();
            assert!(matches!(err, QueryError::InvalidBoolean { .. }));
        });
    }

    #[test]
    fn store_failure_maps_to_database_error() {
        struct BrokenStore;

        #[async_trait]
        impl ListStore for BrokenStore {
            async fn count(&self, _: &EntityKind, _: &Predicate) -> CoreResult<usize> {
                Err(CoreError::store("connection reset"))
            }
            async fn fetch(
                &self,
                _: &EntityKind,
                _: &FetchOptions,
            ) -> CoreResult<Vec<EntityRecord>> {
                Ok(Vec::new())
            }
        }

        block_on(async {
            let store: DynListStore = Arc::new(BrokenStore);
            let engine = ListEngine::new(config());
            let err = engine.execute(&store, "").await.unwrap_err();
            match err {
                QueryError::Store { operation, .. } => assert_eq!(operation, "count"),
                other => panic!("expected Store error, got {other:?}"),
            }
        });
    }

    /// Store wrapper counting how often each operation runs.
    struct CountingStore {
        inner: InMemoryStore,
        counts: AtomicUsize,
        fetches: AtomicUsize,
    }

    #[async_trait]
    impl ListStore for CountingStore {
        async fn count(&self, kind: &EntityKind, predicate: &Predicate) -> CoreResult<usize> {
            self.counts.fetch_add(1, Ordering::SeqCst);
            self.inner.count(kind, predicate).await
        }
        async fn fetch(
            &self,
            kind: &EntityKind,
            options: &FetchOptions,
        ) -> CoreResult<Vec<EntityRecord>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch(kind, options).await
        }
    }

    #[test]
    fn second_identical_request_is_served_from_cache() {
        block_on(async {
            let inner = InMemoryStore::new();
            inner
                .insert(application("a1", "Developer", "pending"))
                .await
                .unwrap();
            let counting = Arc::new(CountingStore {
                inner,
                counts: AtomicUsize::new(0),
                fetches: AtomicUsize::new(0),
            });
            let store: DynListStore = counting.clone();

            let cached_config = config().with_cache(CachePolicy {
                enabled: true,
                ttl: Duration::from_secs(60),
                max_entries: 10,
                key_prefix: "applications".to_string(),
            });
            let engine = ListEngine::new(cached_config);

            let first = engine.execute(&store, "status=pending").await.unwrap();
            let second = engine.execute(&store, "status=pending").await.unwrap();
            assert_eq!(first, second);
            // Exactly one execution across both calls
            assert_eq!(counting.counts.load(Ordering::SeqCst), 1);
            assert_eq!(counting.fetches.load(Ordering::SeqCst), 1);
            assert_eq!(engine.cache_stats().hits, 1);

            // A different parameter set misses
            engine.execute(&store, "status=accepted").await.unwrap();
            assert_eq!(counting.counts.load(Ordering::SeqCst), 2);
        });
    }

    #[test]
    fn ungated_conditional_include_never_attaches_relation() {
        block_on(async {
            let store = InMemoryStore::new();
            let mut record = application("a1", "Developer", "pending");
            record.set_field("documents", json!([{ "id": "d1", "fileName": "cv.pdf" }]));
            store.insert(record).await.unwrap();
            let store: DynListStore = Arc::new(store);

            let gated_config = config().with_conditional_include(ConditionalInclude {
                param: "withDocuments".to_string(),
                expected: None,
                relation: "documents".to_string(),
                shape: None,
            });
            let engine = ListEngine::new(gated_config);

            let without = engine.execute(&store, "").await.unwrap();
            assert!(without.data[0].get_field("documents").is_none());

            let with = engine.execute(&store, "withDocuments=true").await.unwrap();
            assert_eq!(
                with.data[0].get_field("documents"),
                Some(&json!([{ "id": "d1", "fileName": "cv.pdf" }]))
            );
        });
    }

    #[test]
    fn skip_and_take_reach_the_store() {
        block_on(async {
            let store = seeded_store().await;
            let engine = ListEngine::new(config());
            // Sorted ascending by candidateName: Developer 00..11
            let page = engine
                .execute(&store, "page=3&limit=4&sortBy=candidateName&status=pending")
                .await
                .unwrap();
            assert_eq!(page.data.len(), 4);
            // Default direction is desc; page 3 of 12 descending = 03..00
            assert_eq!(
                page.data[0].get_field("candidateName"),
                Some(&json!("Developer 03"))
            );
            assert_eq!(page.meta.total_pages, 3);
            assert!(!page.meta.has_next_page);
        });
    }
}
