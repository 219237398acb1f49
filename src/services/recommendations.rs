use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        group_members, BoundingBox, Place, Recommendation, RecommendationRequest,
        RecommendationResponse, RecommendedPlace,
    },
    services::{
        directory::{fetch_users, PlaceDirectory, RecommendationStore, UserDirectory},
        ranking::{annotate, select_places, MAX_RECOMMENDED_PLACES},
    },
};

/// Builds and persists a place recommendation for a user and a set of friends.
///
/// Candidates are the places inside the requested bounding box. They are
/// ranked for the group and narrowed through three tiers (requested cuisine
/// and untasted, untasted, anything) until three places are found. The
/// outcome is stored as a new recommendation record even when no place
/// qualifies; repeating a request creates another record.
pub async fn create_recommendation(
    places: Arc<dyn PlaceDirectory>,
    users: Arc<dyn UserDirectory>,
    store: Arc<dyn RecommendationStore>,
    request: RecommendationRequest,
) -> AppResult<RecommendationResponse> {
    let start = Instant::now();

    request.location.validate()?;
    let bbox = request.location.bounding_box();

    tracing::info!(
        user_id = %request.user_id,
        friend_count = request.friend_ids.len(),
        cuisines = ?request.cuisines,
        min_latitude = bbox.min_latitude,
        max_latitude = bbox.max_latitude,
        min_longitude = bbox.min_longitude,
        max_longitude = bbox.max_longitude,
        "Starting recommendation"
    );

    let group = group_members(&request.user_id, &request.friend_ids);

    // Candidate places and member snapshots are independent reads
    let (candidates, members) = tokio::try_join!(
        places_in_box(places.as_ref(), &bbox),
        fetch_users(users, &group),
    )?;

    tracing::info!(
        candidates = candidates.len(),
        members = members.len(),
        "Candidates and group fetched"
    );

    let annotated = annotate(candidates, &members);
    let selected = select_places(annotated, &request.cuisines, MAX_RECOMMENDED_PLACES);

    let recommendation = Recommendation {
        id: Uuid::new_v4().to_string(),
        user: request.user_id,
        friends: request.friend_ids,
        cuisines: request.cuisines,
        location: request.location,
        recommended_places: selected.into_iter().map(RecommendedPlace::from).collect(),
        timestamp: Utc::now(),
    };

    store.insert(&recommendation).await?;

    let place_ids: Vec<&str> = recommendation
        .recommended_places
        .iter()
        .map(|p| p.place.as_str())
        .collect();
    tracing::info!(
        recommendation_id = %recommendation.id,
        places = ?place_ids,
        processing_time_ms = start.elapsed().as_millis(),
        "Recommendation stored"
    );

    Ok(RecommendationResponse {
        recommendation_id: recommendation.id,
    })
}

/// Looks up a previously stored recommendation
pub async fn get_recommendation(
    store: Arc<dyn RecommendationStore>,
    recommendation_id: &str,
) -> AppResult<Recommendation> {
    store.get(recommendation_id).await?.ok_or_else(|| {
        AppError::NotFound(format!("Recommendation {} not found", recommendation_id))
    })
}

/// Places strictly inside the bounding box.
///
/// The directory can only range-scan longitude, so latitude is filtered here.
pub async fn places_in_box(
    places: &dyn PlaceDirectory,
    bbox: &BoundingBox,
) -> AppResult<Vec<Place>> {
    let band = places
        .places_in_longitude_band(bbox.min_longitude, bbox.max_longitude)
        .await?;
    let band_size = band.len();

    let inside: Vec<Place> = band
        .into_iter()
        .filter(|place| bbox.contains(place))
        .collect();

    tracing::debug!(
        longitude_band = band_size,
        inside = inside.len(),
        "Filtered places to bounding box"
    );

    Ok(inside)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::memory::InMemoryStore,
        models::{LocationParams, UserRecord},
        services::directory::{MockPlaceDirectory, MockRecommendationStore, MockUserDirectory},
    };

    fn location() -> LocationParams {
        LocationParams {
            center_latitude: 40.0,
            center_longitude: -74.0,
            latitude_range: 1.0,
            longitude_range: 1.0,
        }
    }

    fn request(user_id: &str, friend_ids: &[&str], cuisines: &[&str]) -> RecommendationRequest {
        RecommendationRequest {
            user_id: user_id.to_string(),
            friend_ids: friend_ids.iter().map(|f| f.to_string()).collect(),
            location: location(),
            cuisines: cuisines.iter().map(|c| c.to_string()).collect(),
        }
    }

    async fn pizza_and_sushi_store() -> InMemoryStore {
        let store = InMemoryStore::new();
        store
            .add_place(Place::new("a", "Joe's Pizza", 40.1, -74.1).with_cuisines(&["Pizza"]))
            .await;
        store
            .add_place(Place::new("b", "Sushi Nakazawa", 39.9, -73.9).with_cuisines(&["Sushi"]))
            .await;
        store
            .add_place(Place::new("outside", "Far Pizza", 45.0, -74.0).with_cuisines(&["Pizza"]))
            .await;
        store
            .add_user(
                UserRecord::new("u1")
                    .with_want_to_taste(&["a"])
                    .with_friends(&["u2"]),
            )
            .await;
        store
            .add_user(
                UserRecord::new("u2")
                    .with_tasted(&["b"])
                    .with_friends(&["u1"]),
            )
            .await;
        store
    }

    async fn run(
        store: &InMemoryStore,
        request: RecommendationRequest,
    ) -> AppResult<RecommendationResponse> {
        create_recommendation(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            request,
        )
        .await
    }

    #[tokio::test]
    async fn test_pizza_scenario_falls_through_to_tier_c() {
        let store = pizza_and_sushi_store().await;

        let response = run(&store, request("u1", &["u2"], &["Pizza"])).await.unwrap();
        let stored = store.get(&response.recommendation_id).await.unwrap().unwrap();

        let place_ids: Vec<&str> = stored
            .recommended_places
            .iter()
            .map(|p| p.place.as_str())
            .collect();
        assert_eq!(place_ids, vec!["a", "b"]);
        assert_eq!(stored.recommended_places[0].want_to_taste_users, vec!["u1"]);
        assert_eq!(stored.recommended_places[1].tasted_users, vec!["u2"]);
        assert_eq!(stored.user, "u1");
        assert_eq!(stored.friends, vec!["u2"]);
        assert_eq!(stored.cuisines, vec!["Pizza"]);
        assert_eq!(stored.location, location());
    }

    #[tokio::test]
    async fn test_identical_requests_create_distinct_records() {
        let store = pizza_and_sushi_store().await;

        let first = run(&store, request("u1", &["u2"], &["Pizza"])).await.unwrap();
        let second = run(&store, request("u1", &["u2"], &["Pizza"])).await.unwrap();
        assert_ne!(first.recommendation_id, second.recommendation_id);

        let first = store.get(&first.recommendation_id).await.unwrap().unwrap();
        let second = store.get(&second.recommendation_id).await.unwrap().unwrap();
        assert_eq!(first.recommended_places, second.recommended_places);
        assert_eq!(first.cuisines, second.cuisines);
        assert_eq!(store.recommendation_count().await, 2);
    }

    #[tokio::test]
    async fn test_no_candidates_still_persists_empty_recommendation() {
        let store = InMemoryStore::new();
        store.add_user(UserRecord::new("u1")).await;

        let response = run(&store, request("u1", &[], &[])).await.unwrap();
        let stored = store.get(&response.recommendation_id).await.unwrap().unwrap();
        assert!(stored.recommended_places.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_friend_is_not_found() {
        let store = pizza_and_sushi_store().await;

        let result = run(&store, request("u1", &["nobody"], &["Pizza"])).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(store.recommendation_count().await, 0);
    }

    #[tokio::test]
    async fn test_zero_range_fails_before_any_fetch() {
        let mut places = MockPlaceDirectory::new();
        places.expect_places_in_longitude_band().times(0);
        let mut users = MockUserDirectory::new();
        users.expect_get_user().times(0);
        let mut store = MockRecommendationStore::new();
        store.expect_insert().times(0);

        let mut bad = request("u1", &[], &[]);
        bad.location.latitude_range = 0.0;

        let result =
            create_recommendation(Arc::new(places), Arc::new(users), Arc::new(store), bad).await;
        assert!(matches!(result, Err(AppError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_candidate_fetch_failure_aborts() {
        let mut places = MockPlaceDirectory::new();
        places
            .expect_places_in_longitude_band()
            .returning(|_, _| Err(AppError::UpstreamUnavailable("places offline".to_string())));
        let mut users = MockUserDirectory::new();
        users
            .expect_get_user()
            .returning(|id| Ok(Some(UserRecord::new(id))));
        let mut store = MockRecommendationStore::new();
        store.expect_insert().times(0);

        let result = create_recommendation(
            Arc::new(places),
            Arc::new(users),
            Arc::new(store),
            request("u1", &["u2"], &[]),
        )
        .await;
        assert!(matches!(result, Err(AppError::UpstreamUnavailable(_))));
    }

    #[tokio::test]
    async fn test_places_in_box_filters_latitude() {
        let mut places = MockPlaceDirectory::new();
        places
            .expect_places_in_longitude_band()
            .withf(|min, max| *min == -74.5 && *max == -73.5)
            .returning(|_, _| {
                Ok(vec![
                    Place::new("in", "In", 40.2, -74.0),
                    Place::new("edge", "Edge", 40.5, -74.0),
                    Place::new("north", "North", 41.0, -74.0),
                ])
            });

        let inside = places_in_box(&places, &location().bounding_box())
            .await
            .unwrap();
        let ids: Vec<&str> = inside.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["in"]);
    }

    #[tokio::test]
    async fn test_get_recommendation_unknown_id() {
        let store = InMemoryStore::new();
        let result = get_recommendation(Arc::new(store), "missing").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
