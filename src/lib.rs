//! Exhibit: an A2A gateway in front of an AI agent that turns a GitHub
//! profile and a tech stack into a developer portfolio.

pub mod a2a;
pub mod brain;
pub mod config;
pub mod logging;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use crate::a2a::Gateway;
use crate::brain::provider::{GeminiProvider, PlaceholderProvider, Provider};
use crate::brain::tools::GithubRepoTool;
use crate::brain::{AgentRegistry, ExhibitAgent, exhibit};
use crate::config::AppConfig;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Pick the language-model provider for `config`.
pub fn build_provider(config: &AppConfig) -> Arc<dyn Provider> {
    match config.provider.resolved_api_key() {
        Some(api_key) => Arc::new(
            GeminiProvider::new(api_key)
                .with_base_url(&config.provider.base_url)
                .with_model(&config.provider.model),
        ),
        None => {
            tracing::warn!("No Gemini API key configured, agent calls will fail");
            Arc::new(PlaceholderProvider)
        }
    }
}

/// Register every agent this service exposes.
pub fn build_registry(config: &AppConfig) -> AgentRegistry {
    let repo_tool = GithubRepoTool::new(&config.github.api_base, &config.github.user_agent);
    let agent = ExhibitAgent::new(build_provider(config), Arc::new(repo_tool))
        .with_model(&config.provider.model);

    let mut registry = AgentRegistry::new();
    registry.register(exhibit::AGENT_ID, Arc::new(agent));
    registry
}

/// Build the gateway over `registry` with the configured error policy.
pub fn build_gateway(config: &AppConfig, registry: AgentRegistry) -> Gateway {
    Gateway::new(Arc::new(registry))
        .with_echo_id_on_internal_error(config.gateway.echo_id_on_internal_error)
}
