//! Public types for the Wayfinder API.

mod gateway;
mod resource;

pub use gateway::{GatewayCacheEntry, GatewayCandidate, GatewayProbeResult};
pub use resource::ResourceAvailabilityEntry;
