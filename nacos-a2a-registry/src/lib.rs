//! # nacos-a2a-registry
//!
//! Turns an A2A agent card into the set of transport endpoints a Nacos
//! registry should know about, and registers them.
//!
//! The pipeline is synchronous and side-effect free up to the final call:
//!
//! 1. [`resolve_endpoint`] parses each `(transport, url)` the card declares.
//! 2. [`EnvironmentOverlayParser`] reads per-transport overrides from
//!    `NACOS_A2A_AGENT_<TRANSPORT>_<ATTRIBUTE>` variables.
//! 3. [`merge`] lays the overrides over the resolved endpoints.
//! 4. [`plan`] decides what to register.
//!
//! [`NacosA2aRegistry`] executes a plan against any [`nacos_a2a_core::A2aService`];
//! [`NacosAgentCardProducer`] caches cards of peer agents for discovery.

pub mod a2a;
pub mod config;
pub mod discovery;
pub mod endpoint;
pub mod memory;
pub mod merge;
pub mod overlay;
pub mod planner;
pub mod registry;
pub mod settings;

pub use config::NacosA2aConfig;
pub use discovery::{
    AgentCardResolver, FixedAgentCardResolver, NacosAgentCardProducer, WellKnownAgentCardResolver,
};
pub use endpoint::{
    TransportEndpoint, TransportEndpointBuilder, TransportEndpointSet, resolve_endpoint,
};
pub use memory::InMemoryA2aService;
pub use merge::{Merge, TransportProperties, merge, merge_endpoint};
pub use overlay::{DEFAULT_ENV_PREFIX, EnvironmentOverlayParser, TransportAttribute, parse_overlay};
pub use planner::{
    EndpointAction, PreferredTransportOverwrite, RegistrationPlan, RegistryOptions, plan,
};
pub use registry::{
    AgentRegistry, NacosA2aRegistry, NacosA2aRegistryProperties, collect_transports,
    register_with_all,
};
pub use settings::{NacosAuth, NacosClientConfig, RegistrySettings};
