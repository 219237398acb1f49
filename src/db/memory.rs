use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    error::AppResult,
    models::{Place, PlaceId, Post, Recommendation, UserId, UserRecord},
    services::directory::{PlaceDirectory, PostDirectory, RecommendationStore, UserDirectory},
};

/// Process-local store implementing every collaborator trait.
///
/// Cloning shares the underlying data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<InMemoryStoreInner>>,
}

#[derive(Default)]
struct InMemoryStoreInner {
    places: HashMap<PlaceId, Place>,
    users: HashMap<UserId, UserRecord>,
    posts: Vec<Post>,
    recommendations: HashMap<String, Recommendation>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a place
    pub async fn add_place(&self, place: Place) {
        let mut inner = self.inner.write().await;
        inner.places.insert(place.id.clone(), place);
    }

    /// Inserts or replaces a user
    pub async fn add_user(&self, user: UserRecord) {
        let mut inner = self.inner.write().await;
        inner.users.insert(user.id.clone(), user);
    }

    pub async fn add_post(&self, post: Post) {
        let mut inner = self.inner.write().await;
        inner.posts.push(post);
    }

    pub async fn recommendation_count(&self) -> usize {
        self.inner.read().await.recommendations.len()
    }
}

#[async_trait::async_trait]
impl PlaceDirectory for InMemoryStore {
    async fn places_in_longitude_band(
        &self,
        min_longitude: f64,
        max_longitude: f64,
    ) -> AppResult<Vec<Place>> {
        let inner = self.inner.read().await;
        let mut band: Vec<Place> = inner
            .places
            .values()
            .filter(|p| min_longitude < p.longitude && p.longitude < max_longitude)
            .cloned()
            .collect();

        // Same order as the Postgres range scan
        band.sort_by(|a, b| {
            a.longitude
                .total_cmp(&b.longitude)
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(band)
    }
}

#[async_trait::async_trait]
impl UserDirectory for InMemoryStore {
    async fn get_user(&self, user_id: &str) -> AppResult<Option<UserRecord>> {
        Ok(self.inner.read().await.users.get(user_id).cloned())
    }
}

#[async_trait::async_trait]
impl PostDirectory for InMemoryStore {
    async fn star_ratings_for_place(
        &self,
        place_id: &str,
        user_ids: &[UserId],
    ) -> AppResult<Vec<f64>> {
        let inner = self.inner.read().await;
        Ok(inner
            .posts
            .iter()
            .filter(|post| post.place_id == place_id && user_ids.contains(&post.user_id))
            .map(|post| post.star_rating)
            .collect())
    }
}

#[async_trait::async_trait]
impl RecommendationStore for InMemoryStore {
    async fn insert(&self, recommendation: &Recommendation) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner
            .recommendations
            .insert(recommendation.id.clone(), recommendation.clone());
        Ok(())
    }

    async fn get(&self, recommendation_id: &str) -> AppResult<Option<Recommendation>> {
        Ok(self
            .inner
            .read()
            .await
            .recommendations
            .get(recommendation_id)
            .cloned())
    }
}
