pub mod aggregate;
pub mod error;
pub mod filter;
pub mod rank;
pub mod session;

pub use aggregate::{run_search, SearchOutcome, SearchPolicy};
pub use error::SearchError;
pub use filter::{GroceryFilter, PlacePredicate};
pub use rank::{rank_places, RankedPlace};
pub use session::{
    fit_region, focus_region, LocationError, LocationProvider, MapRegion, NoProfileSink,
    ProfileSink, ProfileWriteError, SearchRadius, SessionController, SessionPhase,
    SessionSnapshot, StatusMessage,
};
