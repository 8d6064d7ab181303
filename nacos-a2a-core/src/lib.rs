//! # nacos-a2a-core
//!
//! Shared types for registering A2A agents in, and discovering them through,
//! a Nacos registry.
//!
//! - [`NacosError`] / [`Result`] - unified error handling
//! - [`A2aService`] - the registry client seam consumed by registration and discovery
//! - [`AgentCard`], [`AgentEndpoint`], ... - the registry's agent-card schema

pub mod error;
pub mod model;
pub mod service;

pub use error::{NacosError, Result};
pub use model::{
    AgentCapabilities, AgentCard, AgentCardDetailInfo, AgentCardEvent, AgentEndpoint,
    AgentInterface, AgentProvider, AgentSkill,
};
pub use service::{A2aService, AgentCardListener};

/// Endpoint type for agents registered as service instances.
pub const ENDPOINT_TYPE_SERVICE: &str = "SERVICE";

/// Endpoint type for agents published only by URL.
pub const ENDPOINT_TYPE_URL: &str = "URL";

/// Transport assumed when a card does not name one.
pub const DEFAULT_TRANSPORT: &str = "JSONRPC";
