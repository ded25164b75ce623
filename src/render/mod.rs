//! Frame rendering state.
//!
//! [`GlobeEngine`] ties the projection, the static scene and the animated
//! route layer together behind a dirty-flag driven tick.

mod engine;
mod routes;
mod scene;
mod transition;

pub use engine::{GlobeEngine, TickOutcome};
pub use routes::LatencyBucket;
