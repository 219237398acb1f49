use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{PlaceId, UserId};

/// Snapshot of a user from the user directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: UserId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub tasted: HashSet<PlaceId>,
    #[serde(default)]
    pub want_to_taste: HashSet<PlaceId>,
    #[serde(default)]
    pub friends: Vec<UserId>,
}

impl UserRecord {
    pub fn new(id: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_first_name(mut self, first_name: &str) -> Self {
        self.first_name = first_name.to_string();
        self
    }

    pub fn with_tasted(mut self, place_ids: &[&str]) -> Self {
        self.tasted.extend(place_ids.iter().map(|id| id.to_string()));
        self
    }

    pub fn with_want_to_taste(mut self, place_ids: &[&str]) -> Self {
        self.want_to_taste
            .extend(place_ids.iter().map(|id| id.to_string()));
        self
    }

    pub fn with_friends(mut self, friend_ids: &[&str]) -> Self {
        self.friends = friend_ids.iter().map(|id| id.to_string()).collect();
        self
    }

    pub fn has_tasted(&self, place_id: &str) -> bool {
        self.tasted.contains(place_id)
    }

    pub fn wants_to_taste(&self, place_id: &str) -> bool {
        self.want_to_taste.contains(place_id)
    }
}

/// A taste: one user's review of one place
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub user_id: UserId,
    pub place_id: PlaceId,
    pub star_rating: f64,
}

/// Friends in the order given followed by the requesting user, without duplicates
pub fn group_members(user_id: &str, friend_ids: &[UserId]) -> Vec<UserId> {
    let mut seen = HashSet::new();
    friend_ids
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(user_id))
        .filter(|id| seen.insert(*id))
        .map(str::to_string)
        .collect()
}
