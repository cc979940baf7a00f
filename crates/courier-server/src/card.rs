//! Agent card for this node, served at `/.well-known/agent.json`

use courier_a2a::AgentCard;
use courier_core::NodeConfig;

/// Build this node's capability card from its configuration.
pub fn build_agent_card(config: &NodeConfig) -> AgentCard {
    AgentCard {
        name: config.agent_name.clone(),
        description: config.agent_description.clone(),
        url: config.public_url(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        capabilities: vec!["chat".to_string(), "relay".to_string()],
    }
}
