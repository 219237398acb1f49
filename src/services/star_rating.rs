use std::sync::Arc;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{group_members, StarRatingRequest, StarRatingResponse, UserId},
    services::directory::{PostDirectory, UserDirectory},
};

/// Mean of the ratings, `None` when there are none
pub fn average_rating(ratings: &[f64]) -> Option<f64> {
    if ratings.is_empty() {
        None
    } else {
        Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
    }
}

/// Average rating of `place_id` across the posts written by `group`.
///
/// `user_id` identifies whose circle `group` is and keys the cache entry.
pub async fn group_star_rating(
    posts: &dyn PostDirectory,
    cache: Option<&Cache>,
    cache_ttl: u64,
    user_id: &str,
    group: &[UserId],
    place_id: &str,
) -> AppResult<Option<f64>> {
    let compute = async {
        let ratings = posts.star_ratings_for_place(place_id, group).await?;
        tracing::debug!(
            place_id = %place_id,
            ratings = ratings.len(),
            "Fetched group star ratings"
        );
        Ok::<_, AppError>(average_rating(&ratings))
    };

    match cache {
        Some(cache) => cached!(
            cache,
            CacheKey::StarRating {
                place_id: place_id.to_string(),
                user_id: user_id.to_string(),
            },
            cache_ttl,
            compute
        ),
        None => compute.await,
    }
}

/// Star rating of a place among the user's friends and the user
pub async fn get_star_rating_for_place(
    users: Arc<dyn UserDirectory>,
    posts: Arc<dyn PostDirectory>,
    cache: Option<&Cache>,
    cache_ttl: u64,
    request: StarRatingRequest,
) -> AppResult<StarRatingResponse> {
    let user = users
        .get_user(&request.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", request.user_id)))?;

    let group = group_members(&user.id, &user.friends);
    let star_rating = group_star_rating(
        posts.as_ref(),
        cache,
        cache_ttl,
        &user.id,
        &group,
        &request.place_id,
    )
    .await?;

    tracing::info!(
        place_id = %request.place_id,
        user_id = %request.user_id,
        group_size = group.len(),
        star_rating = ?star_rating,
        "Computed star rating for place"
    );

    Ok(StarRatingResponse { star_rating })
}
