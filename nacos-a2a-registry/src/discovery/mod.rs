//! Finding the card of a peer agent.

pub mod producer;
pub mod well_known;

pub use producer::NacosAgentCardProducer;
pub use well_known::{DEFAULT_AGENT_CARD_PATH, WellKnownAgentCardResolver};

use crate::a2a::AgentCard;
use async_trait::async_trait;
use nacos_a2a_core::Result;

/// Source of agent cards by agent name.
#[async_trait]
pub trait AgentCardResolver: Send + Sync {
    async fn agent_card(&self, agent_name: &str) -> Result<AgentCard>;
}

/// Returns the same card whatever name is asked for.
pub struct FixedAgentCardResolver {
    card: AgentCard,
}

impl FixedAgentCardResolver {
    pub fn new(card: AgentCard) -> Self {
        Self { card }
    }
}

#[async_trait]
impl AgentCardResolver for FixedAgentCardResolver {
    async fn agent_card(&self, _agent_name: &str) -> Result<AgentCard> {
        Ok(self.card.clone())
    }
}
