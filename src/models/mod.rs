pub mod place;
pub mod place_map;
pub mod recommendation;
pub mod user;

pub use place::{BoundingBox, LocationParams, Place};
pub use place_map::{
    IconStyle, PlaceMapEntry, PlaceMapRequest, PlaceMapResponse, PlaceState, StarRatingRequest,
    StarRatingResponse,
};
pub use recommendation::{
    AnnotatedPlace, Recommendation, RecommendationRequest, RecommendationResponse,
    RecommendedPlace,
};
pub use user::{group_members, Post, UserRecord};

/// Document id of a user in the user directory
pub type UserId = String;

/// Document id of a place in the place directory
pub type PlaceId = String;
