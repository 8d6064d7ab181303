use crate::{AgentCard, AgentCardDetailInfo, AgentCardEvent, AgentEndpoint, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;

/// Receives agent-card change notifications for a subscribed agent.
///
/// Called from the registry client's notification context; implementations
/// should hand the event off rather than block.
pub trait AgentCardListener: Send + Sync {
    fn on_event(&self, event: AgentCardEvent);
}

/// Client-side view of the Nacos AI service used for A2A registration and discovery.
#[async_trait]
pub trait A2aService: Send + Sync {
    /// Publish an agent card. `endpoint_type` is usually [`crate::ENDPOINT_TYPE_SERVICE`].
    async fn release_agent_card(
        &self,
        card: AgentCard,
        endpoint_type: &str,
        set_as_latest: bool,
    ) -> Result<()>;

    /// Register one endpoint for an agent.
    async fn register_agent_endpoint(&self, agent_name: &str, endpoint: AgentEndpoint)
    -> Result<()>;

    /// Register several endpoints for an agent in one call.
    async fn register_agent_endpoints(
        &self,
        agent_name: &str,
        endpoints: HashSet<AgentEndpoint>,
    ) -> Result<()>;

    /// Fetch the current card of an agent.
    async fn get_agent_card(&self, agent_name: &str) -> Result<AgentCardDetailInfo>;

    /// Subscribe to changes of an agent card.
    async fn subscribe_agent_card(
        &self,
        agent_name: &str,
        listener: Arc<dyn AgentCardListener>,
    ) -> Result<()>;
}
