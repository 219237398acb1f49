use serde::{Deserialize, Serialize};

use super::{LocationParams, Place, PlaceId, UserId};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceMapRequest {
    pub user_id: UserId,
    #[serde(flatten)]
    pub location: LocationParams,
}

/// How a place relates to the requesting user, strongest relation first
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlaceState {
    Tasted,
    WantToTaste,
    FriendsTasted,
    FriendsWantToTaste,
    Unknown,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum IconStyle {
    Pin,
    Dot,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlaceMapEntry {
    pub id: PlaceId,
    pub data: Place,
    pub state: PlaceState,
    pub icon_style: IconStyle,
    pub star_rating: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaceMapResponse {
    pub places: Vec<PlaceMapEntry>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StarRatingRequest {
    pub place_id: PlaceId,
    pub user_id: UserId,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StarRatingResponse {
    pub star_rating: Option<f64>,
}
