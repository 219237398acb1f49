use axum::{extract::State, Extension, Json};

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{PlaceMapRequest, PlaceMapResponse, StarRatingRequest, StarRatingResponse},
    services::{place_map, star_rating},
    state::AppState,
};

/// Handler for the place map
pub async fn fetch_places(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<PlaceMapRequest>,
) -> AppResult<Json<PlaceMapResponse>> {
    tracing::info!(
        request_id = %request_id,
        user_id = %request.user_id,
        "Processing place map request"
    );

    let response = place_map::fetch_places(
        state.places.clone(),
        state.users.clone(),
        state.posts.clone(),
        state.cache.as_ref(),
        state.place_map,
        request,
    )
    .await?;

    Ok(Json(response))
}

/// Handler for a place's star rating among the user's circle
pub async fn star_rating(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<StarRatingRequest>,
) -> AppResult<Json<StarRatingResponse>> {
    tracing::info!(
        request_id = %request_id,
        place_id = %request.place_id,
        user_id = %request.user_id,
        "Processing star rating request"
    );

    let response = star_rating::get_star_rating_for_place(
        state.users.clone(),
        state.posts.clone(),
        state.cache.as_ref(),
        state.place_map.star_rating_cache_ttl,
        request,
    )
    .await?;

    Ok(Json(response))
}
