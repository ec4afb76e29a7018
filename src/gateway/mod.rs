//! Gateway selection: ranking, resolution and URL routing

mod builder;
pub mod ranking;
mod resolver;
pub mod routing;

pub use builder::{Wayfinder, WayfinderBuilder};
pub use ranking::Ranker;
pub use resolver::{
    DEFAULT_DIRECTORY_TIMEOUT, DEFAULT_FALLBACK_HOST, DEFAULT_GATEWAY_TTL, DEFAULT_RESOURCE_TTL,
    GatewayResolver,
    ResolverConfig,
};
