use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

use super::PlaceId;

/// A geocoded place from the place directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: PlaceId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub cuisines: Vec<String>,
    #[serde(default)]
    pub posts_count: u64,
}

impl Place {
    /// Creates a place with no cuisine tags and no posts
    pub fn new(
        id: impl Into<PlaceId>,
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            latitude,
            longitude,
            cuisines: Vec::new(),
            posts_count: 0,
        }
    }

    pub fn with_cuisines(mut self, cuisines: &[&str]) -> Self {
        self.cuisines = cuisines.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_posts_count(mut self, posts_count: u64) -> Self {
        self.posts_count = posts_count;
        self
    }
}

/// Map viewport as sent by the client: a center point and the full extent
/// of each axis
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocationParams {
    pub center_latitude: f64,
    pub center_longitude: f64,
    pub latitude_range: f64,
    pub longitude_range: f64,
}

impl LocationParams {
    /// Rejects non-positive (and NaN) ranges
    pub fn validate(&self) -> AppResult<()> {
        if !(self.latitude_range > 0.0) {
            return Err(AppError::InvalidArgument(format!(
                "latitudeRange must be positive, got {}",
                self.latitude_range
            )));
        }
        if !(self.longitude_range > 0.0) {
            return Err(AppError::InvalidArgument(format!(
                "longitudeRange must be positive, got {}",
                self.longitude_range
            )));
        }
        Ok(())
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox {
            min_latitude: self.center_latitude - self.latitude_range / 2.0,
            max_latitude: self.center_latitude + self.latitude_range / 2.0,
            min_longitude: self.center_longitude - self.longitude_range / 2.0,
            max_longitude: self.center_longitude + self.longitude_range / 2.0,
        }
    }
}

/// Open rectangle in latitude/longitude space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl BoundingBox {
    pub fn contains_latitude(&self, latitude: f64) -> bool {
        self.min_latitude < latitude && latitude < self.max_latitude
    }

    pub fn contains_longitude(&self, longitude: f64) -> bool {
        self.min_longitude < longitude && longitude < self.max_longitude
    }

    /// Edges are excluded on both axes
    pub fn contains(&self, place: &Place) -> bool {
        self.contains_latitude(place.latitude) && self.contains_longitude(place.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(latitude_range: f64, longitude_range: f64) -> LocationParams {
        LocationParams {
            center_latitude: 40.0,
            center_longitude: -74.0,
            latitude_range,
            longitude_range,
        }
    }

    #[test]
    fn test_bounding_box_halves_ranges() {
        let bbox = location(2.0, 1.0).bounding_box();
        assert_eq!(bbox.min_latitude, 39.0);
        assert_eq!(bbox.max_latitude, 41.0);
        assert_eq!(bbox.min_longitude, -74.5);
        assert_eq!(bbox.max_longitude, -73.5);
    }

    #[test]
    fn test_bounding_box_excludes_edges() {
        let bbox = location(2.0, 1.0).bounding_box();

        assert!(bbox.contains(&Place::new("inside", "Inside", 40.0, -74.0)));
        assert!(!bbox.contains(&Place::new("south", "South edge", 39.0, -74.0)));
        assert!(!bbox.contains(&Place::new("north", "North edge", 41.0, -74.0)));
        assert!(!bbox.contains(&Place::new("west", "West edge", 40.0, -74.5)));
        assert!(!bbox.contains(&Place::new("east", "East edge", 40.0, -73.5)));
        assert!(!bbox.contains(&Place::new("far", "Far away", 10.0, 10.0)));
    }

    #[test]
    fn test_validate_rejects_non_positive_ranges() {
        assert!(location(1.0, 1.0).validate().is_ok());
        assert!(matches!(
            location(0.0, 1.0).validate(),
            Err(AppError::InvalidArgument(_))
        ));
        assert!(matches!(
            location(1.0, -0.5).validate(),
            Err(AppError::InvalidArgument(_))
        ));
        assert!(matches!(
            location(f64::NAN, 1.0).validate(),
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_place_defaults_when_fields_absent() {
        let json = r#"{
            "id": "p1",
            "name": "Joe's Pizza",
            "latitude": 40.73,
            "longitude": -73.99
        }"#;

        let place: Place = serde_json::from_str(json).unwrap();
        assert!(place.cuisines.is_empty());
        assert_eq!(place.posts_count, 0);
    }
}
