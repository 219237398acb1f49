use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{Recommendation, RecommendationRequest, RecommendationResponse},
    services::recommendations,
    state::AppState,
};

/// Handler for creating a group recommendation
pub async fn create(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<(StatusCode, Json<RecommendationResponse>)> {
    tracing::info!(
        request_id = %request_id,
        user_id = %request.user_id,
        friend_count = request.friend_ids.len(),
        cuisine_count = request.cuisines.len(),
        "Processing recommendation request"
    );

    let response = recommendations::create_recommendation(
        state.places.clone(),
        state.users.clone(),
        state.recommendations.clone(),
        request,
    )
    .await?;

    tracing::info!(
        request_id = %request_id,
        recommendation_id = %response.recommendation_id,
        "Recommendation created"
    );

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for reading back a stored recommendation
pub async fn get(
    State(state): State<AppState>,
    Path(recommendation_id): Path<String>,
) -> AppResult<Json<Recommendation>> {
    let recommendation =
        recommendations::get_recommendation(state.recommendations.clone(), &recommendation_id)
            .await?;
    Ok(Json(recommendation))
}
