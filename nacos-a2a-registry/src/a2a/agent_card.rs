use crate::a2a::{AgentCapabilities, AgentCard, AgentInterface, AgentProvider, AgentSkill};
use nacos_a2a_core::DEFAULT_TRANSPORT;

/// Path the JSON-RPC transport is mounted on when no card URL is given.
pub const DEFAULT_JSON_RPC_PATH: &str = "/a2a";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_INPUT_OUTPUT_MODES: &[&str] = &["text"];

/// Options for publishing an agent's card; unset fields fall back to defaults.
#[derive(Debug, Clone, Default)]
pub struct AgentCardConfig {
    pub name: String,
    pub description: String,
    pub base_url: Option<String>,
    pub json_rpc_path: Option<String>,
    pub card_url: Option<String>,
    pub version: Option<String>,
    pub preferred_transport: Option<String>,
    pub additional_interfaces: Vec<AgentInterface>,
    pub skills: Vec<AgentSkill>,
    pub default_input_modes: Vec<String>,
    pub default_output_modes: Vec<String>,
    pub provider: Option<AgentProvider>,
    pub documentation_url: Option<String>,
    pub icon_url: Option<String>,
}

impl AgentCardConfig {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self { name: name.into(), description: description.into(), ..Default::default() }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_card_url(mut self, card_url: impl Into<String>) -> Self {
        self.card_url = Some(card_url.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_preferred_transport(mut self, transport: impl Into<String>) -> Self {
        self.preferred_transport = Some(transport.into());
        self
    }

    pub fn with_interface(mut self, interface: AgentInterface) -> Self {
        self.additional_interfaces.push(interface);
        self
    }

    pub fn with_skill(mut self, skill: AgentSkill) -> Self {
        self.skills.push(skill);
        self
    }

    /// Full JSON-RPC URL: `{base_url}/{json_rpc_path}`.
    pub fn json_rpc_url(&self) -> String {
        let base = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let path = self.json_rpc_path.as_deref().unwrap_or(DEFAULT_JSON_RPC_PATH);
        format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}

fn default_modes(modes: &[String]) -> Vec<String> {
    if modes.is_empty() {
        DEFAULT_INPUT_OUTPUT_MODES.iter().map(|m| m.to_string()).collect()
    } else {
        modes.to_vec()
    }
}

pub fn build_agent_card(config: &AgentCardConfig) -> AgentCard {
    let mut builder = AgentCard::builder()
        .name(config.name.clone())
        .description(config.description.clone())
        .url(config.card_url.clone().unwrap_or_else(|| config.json_rpc_url()))
        .preferred_transport(
            config.preferred_transport.clone().unwrap_or_else(|| DEFAULT_TRANSPORT.to_string()),
        )
        .additional_interfaces(config.additional_interfaces.clone())
        .capabilities(AgentCapabilities {
            streaming: false,
            push_notifications: false,
            state_transition_history: false,
        })
        .skills(config.skills.clone())
        .default_input_modes(default_modes(&config.default_input_modes))
        .default_output_modes(default_modes(&config.default_output_modes));

    if let Some(version) = &config.version {
        builder = builder.version(version.clone());
    }
    if let Some(provider) = &config.provider {
        builder = builder.provider(provider.clone());
    }
    if let Some(url) = &config.documentation_url {
        builder = builder.documentation_url(url.clone());
    }
    if let Some(url) = &config.icon_url {
        builder = builder.icon_url(url.clone());
    }
    builder.build()
}
