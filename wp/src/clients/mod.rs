//! External collaborator clients
//!
//! Each collaborator sits behind an async trait so the core can be tested
//! with scripted stubs. The HTTP implementations are thin: build the
//! request, map the payload, and let the caller own staleness and
//! degradation policy.

mod nominatim;
mod osrm;
mod overpass;

pub use nominatim::{GeocodeClient, NominatimClient, PlaceMatch};
pub use osrm::{OsrmClient, RouteLegs, RoutingClient};
pub use overpass::{Category, NearbyClient, NearbyPlace, OverpassClient};

/// Language tag for collaborator requests and name selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    En,
    Si,
    Ta,
}

impl Language {
    /// BCP 47 tag used on the wire
    pub fn as_tag(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Si => "si",
            Language::Ta => "ta",
        }
    }
}
