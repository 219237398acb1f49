use std::cmp::Ordering;
use std::collections::HashSet;

use crate::models::{AnnotatedPlace, Place, UserRecord};

/// Upper bound on the number of places in one recommendation
pub const MAX_RECOMMENDED_PLACES: usize = 3;

/// One relaxation level of the recommendation filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Matches a requested cuisine and nobody in the group tasted it
    CuisineUntasted,
    /// Nobody in the group tasted it
    Untasted,
    /// Anything in the bounding box
    All,
}

impl Tier {
    /// Strictest first
    pub const ORDER: [Tier; 3] = [Tier::CuisineUntasted, Tier::Untasted, Tier::All];

    pub fn admits(&self, place: &AnnotatedPlace, cuisines: &[String]) -> bool {
        match self {
            Tier::CuisineUntasted => place.is_untasted() && place.matches_any_cuisine(cuisines),
            Tier::Untasted => place.is_untasted(),
            Tier::All => true,
        }
    }
}

/// Tags each place with the group members who want to taste it and who tasted it.
///
/// Member lists follow the order of `members`.
pub fn annotate(places: Vec<Place>, members: &[UserRecord]) -> Vec<AnnotatedPlace> {
    places
        .into_iter()
        .map(|place| {
            let want_to_taste_users = members
                .iter()
                .filter(|m| m.wants_to_taste(&place.id))
                .map(|m| m.id.clone())
                .collect();
            let tasted_users = members
                .iter()
                .filter(|m| m.has_tasted(&place.id))
                .map(|m| m.id.clone())
                .collect();
            AnnotatedPlace {
                place,
                want_to_taste_users,
                tasted_users,
            }
        })
        .collect()
}

/// Most desirable first: more members wanting it, then more posts, then fewer
/// members having tasted it. Place id settles whatever is left.
pub fn rank_order(a: &AnnotatedPlace, b: &AnnotatedPlace) -> Ordering {
    b.want_to_taste_users
        .len()
        .cmp(&a.want_to_taste_users.len())
        .then_with(|| b.place.posts_count.cmp(&a.place.posts_count))
        .then_with(|| a.tasted_users.len().cmp(&b.tasted_users.len()))
        .then_with(|| a.place.id.cmp(&b.place.id))
}

/// Picks up to `limit` places, relaxing the filter one tier at a time.
///
/// Places picked by a stricter tier stay ahead of the ones a later tier adds.
/// Within a tier, places come out in `rank_order`.
pub fn select_places(
    mut candidates: Vec<AnnotatedPlace>,
    cuisines: &[String],
    limit: usize,
) -> Vec<AnnotatedPlace> {
    candidates.sort_by(rank_order);

    let mut included: HashSet<usize> = HashSet::new();
    let mut picked: Vec<usize> = Vec::with_capacity(limit);

    for tier in Tier::ORDER {
        if picked.len() >= limit {
            break;
        }

        let before = picked.len();
        for (index, candidate) in candidates.iter().enumerate() {
            if picked.len() >= limit {
                break;
            }
            if tier.admits(candidate, cuisines) && included.insert(index) {
                picked.push(index);
            }
        }

        tracing::debug!(
            tier = ?tier,
            added = picked.len() - before,
            total = picked.len(),
            "Tier applied"
        );
    }

    let mut slots: Vec<Option<AnnotatedPlace>> = candidates.into_iter().map(Some).collect();
    picked
        .into_iter()
        .filter_map(|index| slots[index].take())
        .collect()
}
