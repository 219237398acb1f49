use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{LocationParams, Place, PlaceId, UserId};

/// Request to build a recommendation for a user and some of their friends
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    pub user_id: UserId,
    #[serde(default)]
    pub friend_ids: Vec<UserId>,
    #[serde(flatten)]
    pub location: LocationParams,
    #[serde(default)]
    pub cuisines: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    pub recommendation_id: String,
}

/// A candidate place together with what the group has done with it
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedPlace {
    pub place: Place,
    pub want_to_taste_users: Vec<UserId>,
    pub tasted_users: Vec<UserId>,
}

impl AnnotatedPlace {
    pub fn is_untasted(&self) -> bool {
        self.tasted_users.is_empty()
    }

    pub fn matches_any_cuisine(&self, cuisines: &[String]) -> bool {
        self.place.cuisines.iter().any(|c| cuisines.contains(c))
    }
}

/// One entry of a persisted recommendation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedPlace {
    pub place: PlaceId,
    pub want_to_taste_users: Vec<UserId>,
    pub tasted_users: Vec<UserId>,
}

impl From<AnnotatedPlace> for RecommendedPlace {
    fn from(annotated: AnnotatedPlace) -> Self {
        Self {
            place: annotated.place.id,
            want_to_taste_users: annotated.want_to_taste_users,
            tasted_users: annotated.tasted_users,
        }
    }
}

/// Persisted outcome of one recommendation request. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: String,
    pub user: UserId,
    pub friends: Vec<UserId>,
    pub cuisines: Vec<String>,
    pub location: LocationParams,
    pub recommended_places: Vec<RecommendedPlace>,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_deserializes_flat_location() {
        let json = r#"{
            "userId": "ZL9uRDZXog21sG87hWMw",
            "friendIds": ["mvWOoxW4dOltwNjpkUvS"],
            "centerLatitude": 40.7357375,
            "centerLongitude": -73.997685,
            "latitudeRange": 0.074443,
            "longitudeRange": 0.012352,
            "cuisines": ["Pizza"]
        }"#;

        let request: RecommendationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.user_id, "ZL9uRDZXog21sG87hWMw");
        assert_eq!(request.friend_ids, vec!["mvWOoxW4dOltwNjpkUvS"]);
        assert_eq!(request.location.latitude_range, 0.074443);
        assert_eq!(request.cuisines, vec!["Pizza"]);
    }

    #[test]
    fn test_response_uses_camel_case() {
        let response = RecommendationResponse {
            recommendation_id: "abc".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&response).unwrap(),
            r#"{"recommendationId":"abc"}"#
        );
    }

    #[test]
    fn test_matches_any_cuisine() {
        let annotated = AnnotatedPlace {
            place: Place::new("a", "A", 0.0, 0.0).with_cuisines(&["Pizza", "Italian"]),
            want_to_taste_users: vec![],
            tasted_users: vec![],
        };
        assert!(annotated.matches_any_cuisine(&["Italian".to_string()]));
        assert!(!annotated.matches_any_cuisine(&["pizza".to_string()]));
        assert!(!annotated.matches_any_cuisine(&[]));
    }
}
