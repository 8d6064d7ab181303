//! Conversions between the A2A protocol card and the registry's card schema.

use crate::a2a::{AgentCapabilities, AgentCard, AgentInterface, AgentProvider, AgentSkill};
use nacos_a2a_core as nacos;

pub fn to_nacos_agent_card(card: &AgentCard) -> nacos::AgentCard {
    nacos::AgentCard {
        name: card.name.clone(),
        description: card.description.clone(),
        version: card.version.clone(),
        protocol_version: card.protocol_version.clone(),
        url: card.url.clone(),
        preferred_transport: card.preferred_transport.clone(),
        additional_interfaces: card
            .additional_interfaces
            .iter()
            .map(|i| nacos::AgentInterface::new(i.transport.clone(), i.url.clone()))
            .collect(),
        capabilities: nacos::AgentCapabilities {
            streaming: card.capabilities.streaming,
            push_notifications: card.capabilities.push_notifications,
            state_transition_history: card.capabilities.state_transition_history,
        },
        skills: card
            .skills
            .iter()
            .map(|s| nacos::AgentSkill {
                id: s.id.clone(),
                name: s.name.clone(),
                description: s.description.clone(),
                tags: s.tags.clone(),
                examples: s.examples.clone().unwrap_or_default(),
            })
            .collect(),
        default_input_modes: card.default_input_modes.clone(),
        default_output_modes: card.default_output_modes.clone(),
        provider: card.provider.as_ref().map(|p| nacos::AgentProvider {
            organization: p.organization.clone(),
            url: p.url.clone(),
        }),
        documentation_url: card.documentation_url.clone(),
        icon_url: card.icon_url.clone(),
    }
}

pub fn to_a2a_agent_card(card: &nacos::AgentCard) -> AgentCard {
    AgentCard {
        name: card.name.clone(),
        description: card.description.clone(),
        url: card.url.clone(),
        version: card.version.clone(),
        protocol_version: if card.protocol_version.is_empty() {
            crate::a2a::PROTOCOL_VERSION.to_string()
        } else {
            card.protocol_version.clone()
        },
        preferred_transport: card.preferred_transport.clone(),
        additional_interfaces: card
            .additional_interfaces
            .iter()
            .map(|i| AgentInterface::new(i.transport.clone(), i.url.clone()))
            .collect(),
        capabilities: AgentCapabilities {
            streaming: card.capabilities.streaming,
            push_notifications: card.capabilities.push_notifications,
            state_transition_history: card.capabilities.state_transition_history,
        },
        skills: card
            .skills
            .iter()
            .map(|s| AgentSkill {
                id: s.id.clone(),
                name: s.name.clone(),
                description: s.description.clone(),
                tags: s.tags.clone(),
                examples: (!s.examples.is_empty()).then(|| s.examples.clone()),
            })
            .collect(),
        default_input_modes: card.default_input_modes.clone(),
        default_output_modes: card.default_output_modes.clone(),
        provider: card
            .provider
            .as_ref()
            .map(|p| AgentProvider { organization: p.organization.clone(), url: p.url.clone() }),
        documentation_url: card.documentation_url.clone(),
        icon_url: card.icon_url.clone(),
    }
}

/// Convert a registry lookup result; the registration metadata is dropped.
pub fn detail_to_a2a_agent_card(detail: &nacos::AgentCardDetailInfo) -> AgentCard {
    to_a2a_agent_card(&detail.card)
}
