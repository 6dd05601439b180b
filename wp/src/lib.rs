//! Wayplan - trip-timeline synthesis engine
//!
//! Wayplan turns a set of geographic stops into a day itinerary. The
//! stop ordering and dwell estimates come from an external suggestion
//! service, travel-leg times from an external routing engine, and meal
//! durations from static policy; the core's job is merging those three
//! partially-unreliable streams into one coherent, time-labeled schedule.
//!
//! # Core Concepts
//!
//! - **Repair, don't reject**: a malformed suggestion is normalized
//!   against the live stop set into an always-usable plan
//! - **Unknown is not zero**: unresolved travel data stays `None`;
//!   aggregate totals and the start recommendation report pending
//!   instead of guessing
//! - **Last requested wins**: generation counters drop results from
//!   superseded requests, so out-of-order completions cannot corrupt
//!   state
//! - **Conservative invalidation**: a stop-set change discards the
//!   accepted plan entirely rather than patching it
//!
//! # Modules
//!
//! - [`plan`] - suggested/accepted plan types, normalization, suggestion client
//! - [`timeline`] - timed steps, totals, start recommendation
//! - [`travel`] - buffered travel legs and the leg resolver
//! - [`clients`] - routing, geocoding, and nearby-discovery collaborators
//! - [`config`] - configuration types and loading

pub mod clients;
pub mod config;
pub mod error;
pub mod geo;
pub mod nearby;
pub mod orchestrator;
pub mod plan;
pub mod search;
pub mod timeline;
pub mod travel;

// Re-export commonly used types
pub use clients::{
    Category, GeocodeClient, Language, NearbyClient, NearbyPlace, NominatimClient, OsrmClient, OverpassClient,
    PlaceMatch, RouteLegs, RoutingClient,
};
pub use config::{Config, DurationPolicy, MealDurations, NearbyConfig, RoutingConfig, SearchConfig, SuggestConfig};
pub use error::PlanError;
pub use nearby::{NearbyFinder, NearbyGroup};
pub use orchestrator::{Orchestrator, PlanPhase};
pub use plan::{
    AcceptedPlan, HttpPlanSuggester, MealSuggestions, PlanSuggester, SuggestedPlan, TimeEstimate, extract_json,
    normalize,
};
pub use search::PlaceSearcher;
pub use timeline::{Meal, StartRecommendation, Timeline, TimelineStep, Totals};
pub use travel::{TravelLegResolver, TravelLegs};
