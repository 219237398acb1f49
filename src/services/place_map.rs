use std::collections::HashSet;
use std::sync::Arc;

use tokio::task::JoinSet;

use crate::{
    db::Cache,
    error::{AppError, AppResult},
    models::{
        group_members, IconStyle, Place, PlaceId, PlaceMapEntry, PlaceMapRequest,
        PlaceMapResponse, PlaceState, UserId, UserRecord,
    },
    services::{
        directory::{fetch_users, PlaceDirectory, PostDirectory, UserDirectory},
        recommendations::places_in_box,
        star_rating::group_star_rating,
    },
};

/// Limits of the place map query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceMapSettings {
    pub max_social_places: usize,
    pub pin_place_count: usize,
    pub star_rating_cache_ttl: u64,
}

impl Default for PlaceMapSettings {
    fn default() -> Self {
        Self {
            max_social_places: 40,
            pin_place_count: 20,
            star_rating_cache_ttl: 3600,
        }
    }
}

/// Place ids the user or their friends have tasted or want to taste
struct SocialContext {
    user_tasted: HashSet<PlaceId>,
    user_want_to_taste: HashSet<PlaceId>,
    friends_tasted: HashSet<PlaceId>,
    friends_want_to_taste: HashSet<PlaceId>,
}

impl SocialContext {
    fn new(user: &UserRecord, friends: &[UserRecord]) -> Self {
        Self {
            user_tasted: user.tasted.clone(),
            user_want_to_taste: user.want_to_taste.clone(),
            friends_tasted: friends
                .iter()
                .flat_map(|f| f.tasted.iter().cloned())
                .collect(),
            friends_want_to_taste: friends
                .iter()
                .flat_map(|f| f.want_to_taste.iter().cloned())
                .collect(),
        }
    }

    fn contains(&self, place_id: &str) -> bool {
        self.user_tasted.contains(place_id)
            || self.user_want_to_taste.contains(place_id)
            || self.friends_tasted.contains(place_id)
            || self.friends_want_to_taste.contains(place_id)
    }

    fn state_of(&self, place_id: &str) -> PlaceState {
        if self.user_tasted.contains(place_id) {
            PlaceState::Tasted
        } else if self.user_want_to_taste.contains(place_id) {
            PlaceState::WantToTaste
        } else if self.friends_tasted.contains(place_id) {
            PlaceState::FriendsTasted
        } else if self.friends_want_to_taste.contains(place_id) {
            PlaceState::FriendsWantToTaste
        } else {
            PlaceState::Unknown
        }
    }
}

/// Places in the viewport that the user or their friends have a relation to.
///
/// The most-posted places become pins carrying the circle's average star
/// rating; the rest are dots. Too many places with social context yields an
/// empty list and an explanatory `error` instead of a failure.
pub async fn fetch_places(
    places: Arc<dyn PlaceDirectory>,
    users: Arc<dyn UserDirectory>,
    posts: Arc<dyn PostDirectory>,
    cache: Option<&Cache>,
    settings: PlaceMapSettings,
    request: PlaceMapRequest,
) -> AppResult<PlaceMapResponse> {
    request.location.validate()?;
    let bbox = request.location.bounding_box();

    let user = users
        .get_user(&request.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", request.user_id)))?;

    tracing::info!(
        user_id = %user.id,
        friend_count = user.friends.len(),
        "Fetching place map"
    );

    let (friends, in_box) = tokio::try_join!(
        fetch_users(users, &user.friends),
        places_in_box(places.as_ref(), &bbox),
    )?;

    let social = SocialContext::new(&user, &friends);
    let mut social_places: Vec<Place> = in_box
        .into_iter()
        .filter(|place| social.contains(&place.id))
        .collect();

    if social_places.len() > settings.max_social_places {
        tracing::warn!(
            count = social_places.len(),
            limit = settings.max_social_places,
            "Too many places with social context"
        );
        return Ok(PlaceMapResponse {
            places: vec![],
            error: Some(format!(
                "Too many places ({}) with social context",
                social_places.len()
            )),
        });
    }

    // Stable, so equally busy places keep the directory's order
    social_places.sort_by(|a, b| b.posts_count.cmp(&a.posts_count));

    let group: Arc<[UserId]> = group_members(&user.id, &user.friends).into();
    let pin_ratings = pin_star_ratings(
        posts,
        cache,
        settings,
        &user.id,
        group,
        &social_places[..social_places.len().min(settings.pin_place_count)],
    )
    .await?;

    let mut entries = Vec::with_capacity(social_places.len());
    for (rank, place) in social_places.into_iter().enumerate() {
        let (icon_style, star_rating) = match pin_ratings.get(rank).copied().flatten() {
            Some(rating) => (IconStyle::Pin, rating),
            None => (IconStyle::Dot, 0.0),
        };

        entries.push(PlaceMapEntry {
            id: place.id.clone(),
            state: social.state_of(&place.id),
            icon_style,
            star_rating,
            data: place,
        });
    }

    tracing::info!(
        user_id = %user.id,
        places = entries.len(),
        pins = entries
            .iter()
            .filter(|e| e.icon_style == IconStyle::Pin)
            .count(),
        "Place map built"
    );

    Ok(PlaceMapResponse {
        places: entries,
        error: None,
    })
}

/// Group star ratings of the pin candidates, fetched concurrently and
/// returned in the order of `candidates`
async fn pin_star_ratings(
    posts: Arc<dyn PostDirectory>,
    cache: Option<&Cache>,
    settings: PlaceMapSettings,
    user_id: &str,
    group: Arc<[UserId]>,
    candidates: &[Place],
) -> AppResult<Vec<Option<f64>>> {
    let mut tasks = JoinSet::new();

    for (rank, place) in candidates.iter().enumerate() {
        let posts = posts.clone();
        let cache = cache.cloned();
        let user_id = user_id.to_string();
        let group = group.clone();
        let place_id = place.id.clone();
        tasks.spawn(async move {
            let rating = group_star_rating(
                posts.as_ref(),
                cache.as_ref(),
                settings.star_rating_cache_ttl,
                &user_id,
                &group,
                &place_id,
            )
            .await?;
            Ok::<_, AppError>((rank, rating))
        });
    }

    let mut ratings = vec![None; candidates.len()];
    while let Some(joined) = tasks.join_next().await {
        let (rank, rating) = joined
            .map_err(|e| AppError::Internal(format!("Star rating task failed: {}", e)))??;
        ratings[rank] = rating;
    }

    Ok(ratings)
}
