use thiserror::Error;

/// Errors raised while running a store search.
///
/// A search that completes but matches nothing is NOT an error; it is the
/// benign [`crate::SearchOutcome::NoResults`] outcome. Errors here mean the
/// search itself could not be carried out.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The places API call failed (network, HTTP status, API status, or
    /// deserialization).
    #[error(transparent)]
    Places(#[from] storefind_places::PlacesError),

    /// A search was requested before a location was acquired.
    #[error("no current location; acquire a position before searching")]
    NoLocation,

    /// The keyword was empty after trimming.
    #[error("empty search keyword")]
    EmptyKeyword,
}
