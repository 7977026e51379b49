//! Agent abstraction and the registry the gateway resolves agents from.

use crate::a2a::types::AgentSkill;
use crate::brain::provider::ProviderError;
use crate::brain::tools::ToolError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Errors raised while an agent executes.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("{0}")]
    Execution(String),
}

/// The result of one agent invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentResponse {
    pub text: String,
    /// Raw tool outputs in call order. Empty when no tool ran.
    pub tool_results: Vec<serde_json::Value>,
}

impl AgentResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tool_results: Vec::new(),
        }
    }
}

/// An agent that turns a conversation into a reply.
#[async_trait]
pub trait Agent: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn skills(&self) -> Vec<AgentSkill> {
        Vec::new()
    }

    /// Run the agent over flattened `"<role>: <content>"` lines.
    async fn generate(&self, messages: &[String]) -> Result<AgentResponse, AgentError>;
}

/// Late-bound lookup of agents by identifier.
pub trait AgentResolver: Send + Sync {
    fn resolve(&self, agent_id: &str) -> Option<Arc<dyn Agent>>;
}

/// Agents registered at startup, keyed by route identifier.
#[derive(Clone, Default)]
pub struct AgentRegistry {
    agents: HashMap<String, Arc<dyn Agent>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent, replacing any previous one with the same id.
    pub fn register(&mut self, agent_id: impl Into<String>, agent: Arc<dyn Agent>) -> &mut Self {
        let agent_id = agent_id.into();
        if self.agents.insert(agent_id.clone(), agent).is_some() {
            tracing::warn!("Agent '{}' registered twice, keeping the latest", agent_id);
        }
        self
    }

    /// Registered ids in sorted order.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.agents.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

impl AgentResolver for AgentRegistry {
    fn resolve(&self, agent_id: &str) -> Option<Arc<dyn Agent>> {
        self.agents.get(agent_id).cloned()
    }
}
