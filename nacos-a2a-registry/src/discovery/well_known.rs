use crate::a2a::AgentCard;
use crate::discovery::AgentCardResolver;
use async_trait::async_trait;
use nacos_a2a_core::{NacosError, Result};
use std::collections::HashMap;

pub const DEFAULT_AGENT_CARD_PATH: &str = "/.well-known/agent-card.json";

/// Fetches a card from the agent's well-known HTTP location.
pub struct WellKnownAgentCardResolver {
    http_client: reqwest::Client,
    base_url: String,
    card_path: String,
    headers: HashMap<String, String>,
}

impl WellKnownAgentCardResolver {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
            card_path: DEFAULT_AGENT_CARD_PATH.to_string(),
            headers: HashMap::new(),
        }
    }

    pub fn with_card_path(mut self, card_path: impl Into<String>) -> Self {
        self.card_path = card_path.into();
        self
    }

    /// Extra request header, e.g. for authentication.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn card_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.card_path.trim_start_matches('/')
        )
    }

    pub async fn fetch(&self) -> Result<AgentCard> {
        let url = self.card_url();
        let mut request = self.http_client.get(&url);
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| NacosError::Http(format!("Failed to fetch agent card from {url}: {e}")))?;

        if !response.status().is_success() {
            return Err(NacosError::Http(format!(
                "Failed to fetch agent card from {url}: HTTP {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| NacosError::Http(format!("Failed to parse agent card from {url}: {e}")))
    }
}

#[async_trait]
impl AgentCardResolver for WellKnownAgentCardResolver {
    async fn agent_card(&self, _agent_name: &str) -> Result<AgentCard> {
        self.fetch().await
    }
}
