//! Brain Module
//!
//! The agents behind the gateway: the agent abstraction and registry, the
//! Exhibit portfolio agent, its language-model providers and its tools.

pub mod agent;
pub mod exhibit;
pub mod provider;
pub mod tools;

// Re-exports
pub use agent::{Agent, AgentError, AgentRegistry, AgentResolver, AgentResponse};
pub use exhibit::ExhibitAgent;
