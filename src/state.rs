use std::sync::Arc;

use crate::{
    db::{Cache, InMemoryStore, PgDirectory},
    services::{
        directory::{PlaceDirectory, PostDirectory, RecommendationStore, UserDirectory},
        place_map::PlaceMapSettings,
    },
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub places: Arc<dyn PlaceDirectory>,
    pub users: Arc<dyn UserDirectory>,
    pub posts: Arc<dyn PostDirectory>,
    pub recommendations: Arc<dyn RecommendationStore>,
    /// `None` disables star rating caching
    pub cache: Option<Cache>,
    pub place_map: PlaceMapSettings,
}

impl AppState {
    /// State backed by Postgres
    pub fn postgres(
        directory: PgDirectory,
        cache: Option<Cache>,
        place_map: PlaceMapSettings,
    ) -> Self {
        let directory = Arc::new(directory);
        Self {
            places: directory.clone(),
            users: directory.clone(),
            posts: directory.clone(),
            recommendations: directory,
            cache,
            place_map,
        }
    }

    /// State backed by a process-local store, without a cache
    pub fn in_memory(store: InMemoryStore, place_map: PlaceMapSettings) -> Self {
        let store = Arc::new(store);
        Self {
            places: store.clone(),
            users: store.clone(),
            posts: store.clone(),
            recommendations: store,
            cache: None,
            place_map,
        }
    }
}
