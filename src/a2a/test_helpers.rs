//! Deterministic collaborators for gateway tests.

use crate::a2a::handler::Gateway;
use crate::a2a::ids::IdGenerator;
use crate::brain::agent::{Agent, AgentError, AgentRegistry, AgentResponse};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Yields `id-1`, `id-2`, ...
#[derive(Debug, Default)]
pub struct SequentialIds {
    counter: AtomicU64,
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        format!("id-{}", n)
    }
}

/// Replies with a fixed response and records the lines it received.
pub struct ScriptedAgent {
    response: Result<AgentResponse, String>,
    pub received: Mutex<Vec<Vec<String>>>,
}

impl ScriptedAgent {
    pub fn replying(text: &str) -> Self {
        Self::with_response(AgentResponse::text(text))
    }

    pub fn with_response(response: AgentResponse) -> Self {
        Self {
            response: Ok(response),
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.received.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Agent for ScriptedAgent {
    fn name(&self) -> &str {
        "Scripted Agent"
    }

    fn description(&self) -> &str {
        "Returns a canned reply"
    }

    async fn generate(&self, messages: &[String]) -> Result<AgentResponse, AgentError> {
        if let Ok(mut received) = self.received.lock() {
            received.push(messages.to_vec());
        }
        self.response.clone().map_err(AgentError::Execution)
    }
}

/// A gateway with deterministic ids serving a single agent under `agent_id`.
pub fn gateway_with(agent_id: &str, agent: Arc<ScriptedAgent>) -> Gateway {
    let mut registry = AgentRegistry::new();
    registry.register(agent_id, agent);
    Gateway::new(Arc::new(registry)).with_id_generator(Arc::new(SequentialIds::default()))
}
