//! Decides what to send to the registry for an agent's transports.

use crate::endpoint::{TransportEndpoint, TransportEndpointSet};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Per-registration options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryOptions {
    /// Mark the released card version as the latest one.
    pub set_as_latest: bool,
    /// Register transport endpoints in addition to the card.
    pub enable_endpoint_registration: bool,
    /// Rewrite the card's `preferredTransport` and `url` to this transport, if present.
    pub overwrite_preferred_transport: Option<String>,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            set_as_latest: true,
            enable_endpoint_registration: true,
            overwrite_preferred_transport: None,
        }
    }
}

impl RegistryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_set_as_latest(mut self, set_as_latest: bool) -> Self {
        self.set_as_latest = set_as_latest;
        self
    }

    pub fn with_endpoint_registration(mut self, enabled: bool) -> Self {
        self.enable_endpoint_registration = enabled;
        self
    }

    pub fn with_overwrite_preferred_transport(mut self, transport: impl Into<String>) -> Self {
        self.overwrite_preferred_transport = Some(transport.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "endpoints")]
pub enum EndpointAction {
    NoEndpointRegistration,
    SingleEndpoint(TransportEndpoint),
    MultiEndpoint(TransportEndpointSet),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferredTransportOverwrite {
    pub transport: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationPlan {
    pub endpoint_action: EndpointAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_transport_overwrite: Option<PreferredTransportOverwrite>,
}

/// Plan a registration. Never fails; an unknown preferred transport is logged and ignored.
pub fn plan(transports: &TransportEndpointSet, options: &RegistryOptions) -> RegistrationPlan {
    let endpoint_action = if !options.enable_endpoint_registration || transports.is_empty() {
        EndpointAction::NoEndpointRegistration
    } else if transports.len() == 1 {
        match transports.values().next() {
            Some(endpoint) => EndpointAction::SingleEndpoint(endpoint.clone()),
            None => EndpointAction::NoEndpointRegistration,
        }
    } else {
        EndpointAction::MultiEndpoint(transports.clone())
    };

    let preferred_transport_overwrite =
        options.overwrite_preferred_transport.as_deref().and_then(|name| {
            match transports.get(name) {
                Some(endpoint) => Some(PreferredTransportOverwrite {
                    transport: endpoint.transport().to_string(),
                    url: endpoint.url(),
                }),
                None => {
                    warn!(
                        transport = name,
                        "preferred transport to overwrite is not exposed by the agent, ignoring"
                    );
                    None
                }
            }
        });

    RegistrationPlan { endpoint_action, preferred_transport_overwrite }
}
