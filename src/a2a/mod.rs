//! A2A (Agent-to-Agent) gateway for Exhibit.
//!
//! Accepts JSON-RPC 2.0 task requests on `/a2a/agent/{agentId}`, runs the
//! addressed agent, and answers with an A2A task (status, artifacts,
//! history) or a JSON-RPC error.

pub mod agent_card;
pub mod handler;
pub mod ids;
pub mod server;
pub mod types;

#[cfg(test)]
pub mod test_helpers;

pub use handler::Gateway;
pub use server::start_server;
