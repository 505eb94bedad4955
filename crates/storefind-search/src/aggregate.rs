//! Search aggregation: bounded radius-retry over the paginated client.
//!
//! One invocation runs up to `max_attempts` full paginated searches. Each
//! attempt's raw pages are filtered, deduplicated, and ranked; the first
//! attempt yielding survivors wins. Between empty attempts the radius is
//! escalated by `radius_multiplier`; a multiplier of 1.0 re-queries the
//! same radius on every attempt. Exhausting all attempts is the benign
//! no-results outcome, distinct from any error.

use storefind_core::Coordinate;
use storefind_places::PlacesClient;

use crate::error::SearchError;
use crate::filter::PlacePredicate;
use crate::rank::{rank_places, RankedPlace};

/// The API rejects radii above 50 km; escalation stops there.
const MAX_RADIUS_M: f64 = 50_000.0;

/// Attempt and escalation policy for one search invocation.
#[derive(Debug, Clone)]
pub struct SearchPolicy {
    /// Total paginated searches before giving up, including the first.
    pub max_attempts: u32,
    /// Radius factor applied between empty attempts.
    pub radius_multiplier: f64,
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            radius_multiplier: 2.0,
        }
    }
}

/// The terminal result of a completed search invocation.
#[derive(Debug)]
pub enum SearchOutcome {
    /// At least one place survived filtering; sorted ascending by distance.
    Found(Vec<RankedPlace>),
    /// Every attempt came back empty. Not an error; the caller should
    /// suggest a wider radius or a different keyword.
    NoResults { attempts: u32 },
    /// A newer search superseded this one; its outcome was discarded.
    Superseded,
}

/// Runs the full search flow: paginate, filter, deduplicate, rank, and
/// retry with radius escalation while the result set stays empty.
///
/// # Errors
///
/// Returns [`SearchError::Places`] if any page request fails (network
/// failure or a non-OK/ZERO_RESULTS API status). An empty final result is
/// NOT an error; it is [`SearchOutcome::NoResults`].
pub async fn run_search<P: PlacePredicate>(
    client: &PlacesClient,
    filter: &P,
    user: Coordinate,
    keyword: &str,
    radius_m: u32,
    policy: &SearchPolicy,
) -> Result<SearchOutcome, SearchError> {
    let mut radius = f64::from(radius_m);

    for attempt in 1..=policy.max_attempts {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let radius_now = radius.min(MAX_RADIUS_M).round() as u32;
        tracing::debug!(attempt, radius_m = radius_now, keyword, "running search attempt");

        let raw = client.nearby_all(user, radius_now, keyword).await?;
        let ranked = rank_places(user, raw, filter);
        if !ranked.is_empty() {
            tracing::debug!(attempt, results = ranked.len(), "search attempt succeeded");
            return Ok(SearchOutcome::Found(ranked));
        }

        radius *= policy.radius_multiplier;
    }

    tracing::debug!(
        attempts = policy.max_attempts,
        keyword,
        "search exhausted all attempts with no results"
    );
    Ok(SearchOutcome::NoResults {
        attempts: policy.max_attempts,
    })
}
