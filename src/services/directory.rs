//! Collaborator abstractions
//!
//! The engine never talks to a database directly. Places, users, posts and
//! persisted recommendations each sit behind a trait so the same pipeline
//! runs over Postgres in production and over the in-memory store in tests.
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::instrument;

use crate::{
    error::{AppError, AppResult},
    models::{Place, Recommendation, UserId, UserRecord},
};

/// Read access to geocoded places
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PlaceDirectory: Send + Sync {
    /// Places whose longitude lies strictly between the two bounds.
    ///
    /// Longitude is the only indexed dimension, so latitude filtering is left
    /// to the caller.
    async fn places_in_longitude_band(
        &self,
        min_longitude: f64,
        max_longitude: f64,
    ) -> AppResult<Vec<Place>>;
}

/// Read access to user snapshots
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait UserDirectory: Send + Sync {
    /// Returns `None` when no user has this id
    async fn get_user(&self, user_id: &str) -> AppResult<Option<UserRecord>>;
}

/// Read access to tastes
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PostDirectory: Send + Sync {
    /// Star ratings of every post about `place_id` written by one of `user_ids`
    async fn star_ratings_for_place(
        &self,
        place_id: &str,
        user_ids: &[UserId],
    ) -> AppResult<Vec<f64>>;
}

/// Persistence sink for recommendation records
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationStore: Send + Sync {
    async fn insert(&self, recommendation: &Recommendation) -> AppResult<()>;

    async fn get(&self, recommendation_id: &str) -> AppResult<Option<Recommendation>>;
}

/// Fetches every listed user in parallel.
///
/// Results come back in the order of `user_ids`. A missing user is a
/// `NotFound`; any failure aborts the whole gather, including the fetches
/// still in flight.
#[instrument(skip(users), fields(members = user_ids.len()))]
pub async fn fetch_users(
    users: Arc<dyn UserDirectory>,
    user_ids: &[UserId],
) -> AppResult<Vec<UserRecord>> {
    let mut tasks = JoinSet::new();

    for (index, user_id) in user_ids.iter().enumerate() {
        let users = users.clone();
        let user_id = user_id.clone();
        tasks.spawn(async move {
            let record = users
                .get_user(&user_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;
            Ok::<_, AppError>((index, record))
        });
    }

    let mut slots: Vec<Option<UserRecord>> = vec![None; user_ids.len()];
    // Returning early drops the set, which aborts the remaining fetches
    while let Some(joined) = tasks.join_next().await {
        let (index, record) = joined
            .map_err(|e| AppError::Internal(format!("User fetch task failed: {}", e)))??;
        slots[index] = Some(record);
    }

    let records: Vec<UserRecord> = slots.into_iter().flatten().collect();
    tracing::debug!(fetched = records.len(), "Group members fetched");

    Ok(records)
}
