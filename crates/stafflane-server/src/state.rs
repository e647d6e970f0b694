use std::sync::Arc;

use crate::config::AppConfig;
use crate::endpoints;
use stafflane_query::ListEngine;
use stafflane_storage::DynListStore;

/// Engines are built once per endpoint; each owns its configuration and
/// its share of the process-wide result cache.
#[derive(Clone)]
pub struct ListEngines {
    pub applications: Arc<ListEngine>,
    pub contacts: Arc<ListEngine>,
    pub articles: Arc<ListEngine>,
    pub sectors: Arc<ListEngine>,
    pub notices: Arc<ListEngine>,
    pub team_members: Arc<ListEngine>,
}

#[derive(Clone)]
pub struct AppState {
    pub store: DynListStore,
    pub engines: ListEngines,
}

impl AppState {
    pub fn new(store: DynListStore, config: &AppConfig) -> Self {
        let cache = &config.cache;
        Self {
            store,
            engines: ListEngines {
                applications: Arc::new(ListEngine::new(endpoints::applications())),
                contacts: Arc::new(ListEngine::new(endpoints::contacts())),
                articles: Arc::new(ListEngine::new(endpoints::articles(cache))),
                sectors: Arc::new(ListEngine::new(endpoints::sectors(cache))),
                notices: Arc::new(ListEngine::new(endpoints::notices(cache))),
                team_members: Arc::new(ListEngine::new(endpoints::team_members(cache))),
            },
        }
    }
}
