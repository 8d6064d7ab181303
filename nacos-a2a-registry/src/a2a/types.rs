use serde::{Deserialize, Serialize};

pub const PROTOCOL_VERSION: &str = "0.3.0";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentInterface {
    pub transport: String,
    pub url: String,
}

impl AgentInterface {
    pub fn new(transport: impl Into<String>, url: impl Into<String>) -> Self {
        Self { transport: transport.into(), url: url.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentSkill {
    pub id: String,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<String>>,
}

impl AgentSkill {
    pub fn new(id: String, name: String, description: String, tags: Vec<String>) -> Self {
        Self { id, name, description, tags, examples: None }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentCapabilities {
    pub streaming: bool,
    #[serde(rename = "pushNotifications")]
    pub push_notifications: bool,
    #[serde(rename = "stateTransitionHistory", default)]
    pub state_transition_history: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentProvider {
    pub organization: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentCard {
    pub name: String,
    pub description: String,
    pub url: String,
    pub version: String,
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    #[serde(skip_serializing_if = "Option::is_none", rename = "preferredTransport")]
    pub preferred_transport: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", rename = "additionalInterfaces")]
    pub additional_interfaces: Vec<AgentInterface>,
    pub capabilities: AgentCapabilities,
    pub skills: Vec<AgentSkill>,
    #[serde(default, rename = "defaultInputModes")]
    pub default_input_modes: Vec<String>,
    #[serde(default, rename = "defaultOutputModes")]
    pub default_output_modes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<AgentProvider>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "documentationUrl")]
    pub documentation_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "iconUrl")]
    pub icon_url: Option<String>,
}

impl AgentCard {
    pub fn builder() -> AgentCardBuilder {
        AgentCardBuilder::default()
    }

    /// Every `(transport, url)` the card advertises: the main `url` under the
    /// preferred transport first, then the additional interfaces.
    pub fn interfaces(&self) -> Vec<AgentInterface> {
        let mut interfaces = Vec::with_capacity(1 + self.additional_interfaces.len());
        if !self.url.is_empty() {
            let transport = self
                .preferred_transport
                .clone()
                .unwrap_or_else(|| nacos_a2a_core::DEFAULT_TRANSPORT.to_string());
            interfaces.push(AgentInterface::new(transport, self.url.clone()));
        }
        interfaces.extend(self.additional_interfaces.iter().cloned());
        interfaces
    }
}

#[derive(Default)]
pub struct AgentCardBuilder {
    name: Option<String>,
    description: Option<String>,
    url: Option<String>,
    version: Option<String>,
    preferred_transport: Option<String>,
    additional_interfaces: Vec<AgentInterface>,
    capabilities: Option<AgentCapabilities>,
    skills: Vec<AgentSkill>,
    default_input_modes: Vec<String>,
    default_output_modes: Vec<String>,
    provider: Option<AgentProvider>,
    documentation_url: Option<String>,
    icon_url: Option<String>,
}

impl AgentCardBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn preferred_transport(mut self, transport: impl Into<String>) -> Self {
        self.preferred_transport = Some(transport.into());
        self
    }

    pub fn additional_interfaces(mut self, interfaces: Vec<AgentInterface>) -> Self {
        self.additional_interfaces = interfaces;
        self
    }

    pub fn additional_interface(mut self, interface: AgentInterface) -> Self {
        self.additional_interfaces.push(interface);
        self
    }

    pub fn capabilities(mut self, capabilities: AgentCapabilities) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    pub fn skills(mut self, skills: Vec<AgentSkill>) -> Self {
        self.skills = skills;
        self
    }

    pub fn default_input_modes(mut self, modes: Vec<String>) -> Self {
        self.default_input_modes = modes;
        self
    }

    pub fn default_output_modes(mut self, modes: Vec<String>) -> Self {
        self.default_output_modes = modes;
        self
    }

    pub fn provider(mut self, provider: AgentProvider) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn documentation_url(mut self, url: impl Into<String>) -> Self {
        self.documentation_url = Some(url.into());
        self
    }

    pub fn icon_url(mut self, url: impl Into<String>) -> Self {
        self.icon_url = Some(url.into());
        self
    }

    pub fn build(self) -> AgentCard {
        AgentCard {
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            url: self.url.unwrap_or_default(),
            version: self.version.unwrap_or_else(|| "1.0.0".to_string()),
            protocol_version: PROTOCOL_VERSION.to_string(),
            preferred_transport: self.preferred_transport,
            additional_interfaces: self.additional_interfaces,
            capabilities: self.capabilities.unwrap_or_default(),
            skills: self.skills,
            default_input_modes: self.default_input_modes,
            default_output_modes: self.default_output_modes,
            provider: self.provider,
            documentation_url: self.documentation_url,
            icon_url: self.icon_url,
        }
    }
}
