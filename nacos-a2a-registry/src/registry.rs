//! Publishing an A2A agent card and its endpoints to Nacos.

use crate::a2a::{self, to_nacos_agent_card};
use crate::endpoint::{TransportEndpoint, TransportEndpointSet};
use crate::merge::{TransportProperties, merge_endpoint};
use crate::planner::{self, EndpointAction, RegistrationPlan, RegistryOptions};
use async_trait::async_trait;
use nacos_a2a_core::{A2aService, DEFAULT_TRANSPORT, ENDPOINT_TYPE_SERVICE, Result};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{error, info, warn};

/// What to register besides the card itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NacosA2aRegistryProperties {
    pub options: RegistryOptions,
    pub transports: TransportEndpointSet,
}

impl NacosA2aRegistryProperties {
    pub fn new(options: RegistryOptions) -> Self {
        Self { options, transports: TransportEndpointSet::new() }
    }

    /// A single `JSONRPC` transport at `address:port{path}`, the shape older
    /// deployments configured before multiple transports were supported.
    pub fn with_default_transport(
        set_as_latest: bool,
        address: impl Into<String>,
        port: i32,
        path: impl Into<String>,
    ) -> Result<Self> {
        let endpoint = TransportEndpoint::builder()
            .transport(DEFAULT_TRANSPORT)
            .host(address)
            .port(port)
            .path(path)
            .build()?;
        let mut properties =
            Self::new(RegistryOptions::default().with_set_as_latest(set_as_latest));
        properties.add_transport(endpoint);
        Ok(properties)
    }

    pub fn with_transports(mut self, transports: TransportEndpointSet) -> Self {
        self.transports = transports;
        self
    }

    pub fn add_transport(&mut self, endpoint: TransportEndpoint) {
        self.transports.insert(endpoint);
    }
}

/// Resolve every transport a card advertises and lay `overlay` over them.
///
/// Overlay entries for transports the card does not declare are added when
/// they carry enough to build an endpoint. Anything that fails to resolve is
/// logged and left out, so a partial result is still registrable.
pub fn collect_transports(
    card: &a2a::AgentCard,
    overlay: &HashMap<String, TransportProperties>,
) -> TransportEndpointSet {
    let overlay: HashMap<String, &TransportProperties> =
        overlay.iter().map(|(name, props)| (name.to_uppercase(), props)).collect();
    let mut transports = TransportEndpointSet::new();

    for interface in card.interfaces() {
        let resolved = TransportEndpoint::from_interface(&interface).and_then(|endpoint| {
            merge_endpoint(&endpoint, overlay.get(&interface.transport.to_uppercase()).copied())
        });
        match resolved {
            Ok(endpoint) => {
                transports.insert(endpoint);
            }
            Err(e) => warn!(
                agent = %card.name,
                transport = %interface.transport,
                url = %interface.url,
                error = %e,
                "skipping transport that could not be resolved"
            ),
        }
    }

    for (name, properties) in overlay {
        if transports.contains(&name) {
            continue;
        }
        match properties.to_endpoint(&name) {
            Ok(endpoint) => {
                transports.insert(endpoint);
            }
            Err(e) => warn!(
                agent = %card.name,
                transport = %name,
                error = %e,
                "skipping overlay transport that could not be built"
            ),
        }
    }

    transports
}

/// A registry an agent can be announced to.
#[async_trait]
pub trait AgentRegistry: Send + Sync {
    /// Short identifier, e.g. `"nacos"`.
    fn registry_name(&self) -> &str;

    async fn register(
        &self,
        card: &a2a::AgentCard,
        properties: &NacosA2aRegistryProperties,
    ) -> Result<()>;
}

pub struct NacosA2aRegistry {
    service: Arc<dyn A2aService>,
}

impl NacosA2aRegistry {
    pub const NAME: &'static str = "nacos";

    pub fn new(service: Arc<dyn A2aService>) -> Self {
        Self { service }
    }

    /// Release the card and register its endpoints.
    ///
    /// Any registry failure is logged and returned as
    /// [`nacos_a2a_core::NacosError::Registration`] for `card.name`.
    pub async fn register_agent(
        &self,
        card: &a2a::AgentCard,
        properties: &NacosA2aRegistryProperties,
    ) -> Result<RegistrationPlan> {
        let plan = planner::plan(&properties.transports, &properties.options);
        let mut nacos_card = to_nacos_agent_card(card);
        if let Some(overwrite) = &plan.preferred_transport_overwrite {
            info!(
                agent = %card.name,
                transport = %overwrite.transport,
                url = %overwrite.url,
                "overwriting preferred transport of agent card"
            );
            nacos_card.preferred_transport = Some(overwrite.transport.clone());
            nacos_card.url = overwrite.url.clone();
        }

        let result = async {
            info!(agent = %card.name, "Register agent card to Nacos.");
            self.service
                .release_agent_card(
                    nacos_card,
                    ENDPOINT_TYPE_SERVICE,
                    properties.options.set_as_latest,
                )
                .await?;
            info!(agent = %card.name, "Register agent card to Nacos successfully.");
            self.register_endpoints(&card.name, &card.version, &plan.endpoint_action).await
        }
        .await;

        match result {
            Ok(()) => Ok(plan),
            Err(e) => {
                error!(agent = %card.name, error = %e, "Register agent card to Nacos failed");
                Err(e.into_registration(&card.name))
            }
        }
    }

    async fn register_endpoints(
        &self,
        agent_name: &str,
        version: &str,
        action: &EndpointAction,
    ) -> Result<()> {
        match action {
            EndpointAction::NoEndpointRegistration => Ok(()),
            EndpointAction::SingleEndpoint(endpoint) => {
                let endpoint = endpoint.to_agent_endpoint(version);
                self.service.register_agent_endpoint(agent_name, endpoint).await
            }
            EndpointAction::MultiEndpoint(endpoints) => {
                let endpoints: HashSet<_> = endpoints
                    .values()
                    .map(|endpoint| endpoint.to_agent_endpoint(version))
                    .collect();
                self.service.register_agent_endpoints(agent_name, endpoints).await
            }
        }
    }
}

#[async_trait]
impl AgentRegistry for NacosA2aRegistry {
    fn registry_name(&self) -> &str {
        Self::NAME
    }

    async fn register(
        &self,
        card: &a2a::AgentCard,
        properties: &NacosA2aRegistryProperties,
    ) -> Result<()> {
        self.register_agent(card, properties).await.map(|_| ())
    }
}

/// Register with every registry. Failures are logged and never stop the others.
///
/// Returns the names of the registries that accepted the agent.
pub async fn register_with_all(
    registries: &[Arc<dyn AgentRegistry>],
    card: &a2a::AgentCard,
    properties: &NacosA2aRegistryProperties,
) -> Vec<String> {
    let mut registered = Vec::with_capacity(registries.len());
    for registry in registries {
        let name = registry.registry_name();
        info!(registry = name, agent = %card.name, "Registering with registry");
        match registry.register(card, properties).await {
            Ok(()) => {
                info!(registry = name, agent = %card.name, "Successfully registered with registry");
                registered.push(name.to_string());
            }
            Err(e) => warn!(
                registry = name,
                agent = %card.name,
                error = %e,
                "Failed to register with registry, startup continues"
            ),
        }
    }
    registered
}
