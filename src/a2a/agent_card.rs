//! Agent Card generation for `/a2a/agent/{agentId}/.well-known/agent.json`.
//!
//! Builds an `AgentCard` for one registered agent, exposing its skills and
//! the JSON-RPC endpoint other A2A agents should call.

use crate::a2a::types::*;
use crate::brain::agent::Agent;

/// Build the Agent Card for the agent registered under `agent_id`.
pub fn build_agent_card(agent_id: &str, agent: &dyn Agent, host: &str, port: u16) -> AgentCard {
    let base_url = format!("http://{}:{}", host, port);
    let modes = vec!["text/plain".to_string(), "application/json".to_string()];

    AgentCard {
        name: agent.name().to_string(),
        description: Some(agent.description().to_string()),
        version: Some(crate::VERSION.to_string()),
        supported_interfaces: vec![SupportedInterface {
            url: format!("{}/a2a/agent/{}", base_url, agent_id),
            protocol_binding: "JSONRPC".to_string(),
            protocol_version: Some(JSONRPC_VERSION.to_string()),
        }],
        provider: Some(AgentProvider {
            organization: "Exhibit".to_string(),
            url: None,
        }),
        capabilities: Some(AgentCapabilities {
            streaming: false,
            push_notifications: false,
            state_transition_history: true,
        }),
        skills: agent.skills(),
        default_input_modes: modes.clone(),
        default_output_modes: modes,
    }
}
