//! Deduplication and distance ranking of filtered search results.

use std::collections::HashMap;

use storefind_core::{haversine_km, Coordinate};
use storefind_places::RawPlace;

use crate::filter::PlacePredicate;

/// Generic tags the API attaches to nearly everything; dropped from display.
const GENERIC_TAGS: &[&str] = &["point_of_interest", "establishment"];

/// A search result that survived filtering, with its computed
/// distance-from-user attached. Never persisted; rebuilt on every search.
#[derive(Debug, Clone)]
pub struct RankedPlace {
    pub place_id: String,
    pub name: String,
    pub address: Option<String>,
    pub coordinate: Coordinate,
    pub tags: Vec<String>,
    pub rating: Option<f64>,
    pub rating_count: Option<u32>,
    pub open_now: Option<bool>,
    /// Great-circle distance from the searching user, in kilometers.
    pub distance_km: f64,
}

impl RankedPlace {
    /// Category tags suitable for presentation, with the generic
    /// `point_of_interest`/`establishment` noise removed.
    #[must_use]
    pub fn display_tags(&self) -> Vec<&str> {
        self.tags
            .iter()
            .map(String::as_str)
            .filter(|t| !GENERIC_TAGS.contains(t))
            .collect()
    }
}

/// Filters, deduplicates, and ranks raw results against a user coordinate.
///
/// Results failing the predicate are dropped. Survivors are deduplicated by
/// `place_id` with last-seen-wins (later pages override earlier ones), get
/// their distance from `user` computed, and come back sorted ascending by
/// distance.
#[must_use]
pub fn rank_places<P: PlacePredicate>(
    user: Coordinate,
    raw: Vec<RawPlace>,
    filter: &P,
) -> Vec<RankedPlace> {
    let mut by_id: HashMap<String, RankedPlace> = HashMap::new();
    for place in raw {
        if !filter.accept(&place) {
            continue;
        }
        // The predicate guarantees both fields are present; skip otherwise
        // so a permissive custom predicate cannot panic the ranking.
        let (Some(id), Some(coordinate)) = (place.place_id.clone(), place.coordinate()) else {
            continue;
        };
        let ranked = RankedPlace {
            place_id: id.clone(),
            name: place.name.clone(),
            address: place.address().map(str::to_owned),
            coordinate,
            tags: place.types.clone(),
            rating: place.rating,
            rating_count: place.user_ratings_total,
            open_now: place.opening_hours.as_ref().and_then(|h| h.open_now),
            distance_km: haversine_km(user, coordinate),
        };
        by_id.insert(id, ranked);
    }

    let mut ranked: Vec<RankedPlace> = by_id.into_values().collect();
    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked
}
