pub mod agent_card;
pub mod convert;
pub mod types;

pub use agent_card::{AgentCardConfig, build_agent_card};
pub use convert::{detail_to_a2a_agent_card, to_a2a_agent_card, to_nacos_agent_card};
pub use types::*;
