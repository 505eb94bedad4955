//! Wire types for the places nearby-search API.
//!
//! Every response carries a `status` string alongside the payload:
//! `"OK"` and `"ZERO_RESULTS"` are success statuses, anything else is an
//! error code (`INVALID_REQUEST`, `OVER_QUERY_LIMIT`, ...). A populated
//! `next_page_token` means more pages exist; the token must not be used
//! until a short server-side warm-up delay has passed.

use serde::Deserialize;
use storefind_core::Coordinate;

/// Top-level envelope of a nearby-search response.
#[derive(Debug, Deserialize)]
pub struct NearbySearchResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<RawPlace>,
    #[serde(default)]
    pub next_page_token: Option<String>,
    /// Human-readable detail accompanying error statuses.
    #[serde(default)]
    pub error_message: Option<String>,
}

impl NearbySearchResponse {
    /// `OK` or `ZERO_RESULTS`; everything else is an API-level error.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == "OK" || self.status == "ZERO_RESULTS"
    }
}

/// A single place record as returned by the API.
///
/// Most fields are optional on the wire; records missing an ID or a
/// geometry are dropped downstream by the place filter.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPlace {
    #[serde(default)]
    pub place_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub formatted_address: Option<String>,
    /// Abbreviated address used by nearby-search responses in place of
    /// `formatted_address`.
    #[serde(default)]
    pub vicinity: Option<String>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<u32>,
    #[serde(default)]
    pub opening_hours: Option<OpeningHours>,
}

impl RawPlace {
    /// The place's coordinate, if the record carries a geometry.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        self.geometry
            .as_ref()
            .map(|g| Coordinate::new(g.location.lat, g.location.lng))
    }

    /// Best available display address: `formatted_address` first, then
    /// `vicinity`.
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.formatted_address
            .as_deref()
            .or(self.vicinity.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpeningHours {
    #[serde(default)]
    pub open_now: Option<bool>,
}
