//! TripStore - versioned live stop set for trip planning
//!
//! Holds the ordered set of stops the user is planning around. Every
//! mutation bumps a monotonically increasing version number so in-flight
//! asynchronous work (plan generation, travel-leg resolution) can detect
//! that its inputs went stale by comparing a captured version against the
//! current one.

mod stop;
mod store;

pub use stop::Stop;
pub use store::StopStore;
