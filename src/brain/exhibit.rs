//! Exhibit Agent
//!
//! Builds a markdown developer portfolio from a GitHub profile and a stated
//! tech stack. The agent looks for a GitHub handle in the conversation,
//! fetches the user's public repositories through the GitHub tool, and asks
//! the language model to write the portfolio around them.

use crate::a2a::types::AgentSkill;
use crate::brain::agent::{Agent, AgentError, AgentResponse};
use crate::brain::provider::{LLMRequest, Provider};
use crate::brain::tools::Tool;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

/// Route identifier the agent is registered under.
pub const AGENT_ID: &str = "exhibitAgent";

pub const INSTRUCTIONS: &str = "\
You are Exhibit, an AI that generates a clean, professional portfolio
based on the user's GitHub profile and tech stack.

Your objective:
1. Use the repositories provided to you (fetched from GitHub).
2. Select repos relevant to the user's stated tech stack.
3. Generate a portfolio output that contains these sections:
  - Short introduction
  - Tech stack section
  - Projects section (for each repository: name, description, what was done, link)
  - Contact / GitHub link

Rules:
- If no GitHub username is provided, ask the user for it.
- If the GitHub profile has many projects, select the most relevant and recent.
- Format your response professionally, using markdown.
- Do NOT dump raw JSON to the user. Convert the response into portfolio content.";

static GITHUB_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"github\.com/([A-Za-z0-9][A-Za-z0-9-]{0,38})").expect("valid GitHub URL regex")
});

static AT_HANDLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[\s(])@([A-Za-z0-9][A-Za-z0-9-]{0,38})\b").expect("valid handle regex")
});

/// Find the most recently mentioned GitHub handle in the user's turns.
pub fn find_github_handle(messages: &[String]) -> Option<String> {
    messages.iter().rev().find_map(|line| {
        let line = line.strip_prefix("user: ")?;
        GITHUB_URL
            .captures(line)
            .or_else(|| AT_HANDLE.captures(line))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    })
}

pub struct ExhibitAgent {
    provider: Arc<dyn Provider>,
    repo_tool: Arc<dyn Tool>,
    model: String,
}

impl ExhibitAgent {
    pub fn new(provider: Arc<dyn Provider>, repo_tool: Arc<dyn Tool>) -> Self {
        let model = provider.default_model().to_string();
        Self {
            provider,
            repo_tool,
            model,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn build_prompt(messages: &[String], repos: Option<(&str, &serde_json::Value)>) -> String {
        let mut prompt = String::from("## Conversation\n\n");
        prompt.push_str(&messages.join("\n"));
        prompt.push_str("\n\n");

        match repos {
            Some((username, repos)) => {
                prompt.push_str(&format!(
                    "## Repositories for GitHub user '{}'\n\n{}\n",
                    username,
                    serde_json::to_string_pretty(repos).unwrap_or_default()
                ));
            }
            None => prompt.push_str("## Repositories\n\nNo GitHub username was found.\n"),
        }

        prompt
    }
}

#[async_trait]
impl Agent for ExhibitAgent {
    fn name(&self) -> &str {
        "Exhibit Agent"
    }

    fn description(&self) -> &str {
        "Generates a professional markdown portfolio from a GitHub profile and tech stack."
    }

    fn skills(&self) -> Vec<AgentSkill> {
        vec![AgentSkill {
            id: "portfolio-generation".to_string(),
            name: "Portfolio Generation".to_string(),
            description: Some(
                "Fetch a user's public GitHub repositories and write a portfolio \
                 focused on their tech stack."
                    .to_string(),
            ),
            tags: vec![
                "portfolio".to_string(),
                "github".to_string(),
                "career".to_string(),
            ],
            examples: vec![
                "Build my portfolio: github.com/octocat, stack Rust and TypeScript.".to_string(),
            ],
            input_modes: vec!["text/plain".to_string(), "application/json".to_string()],
            output_modes: vec!["text/markdown".to_string()],
        }]
    }

    async fn generate(&self, messages: &[String]) -> Result<AgentResponse, AgentError> {
        let mut tool_results = Vec::new();

        let repos = match find_github_handle(messages) {
            Some(username) => {
                let args = serde_json::json!({ "githubInput": username });
                let result = self.repo_tool.execute(args.clone()).await?;
                tracing::info!(
                    "Exhibit fetched repositories for '{}' via {}",
                    username,
                    self.repo_tool.name()
                );
                tool_results.push(serde_json::json!({
                    "toolName": self.repo_tool.name(),
                    "args": args,
                    "result": result,
                }));
                Some((username, result))
            }
            None => {
                tracing::debug!("No GitHub handle in conversation, asking the model directly");
                None
            }
        };

        let prompt = Self::build_prompt(
            messages,
            repos
                .as_ref()
                .map(|(username, result)| (username.as_str(), &result["repos"])),
        );

        let response = self
            .provider
            .complete(LLMRequest {
                model: self.model.clone(),
                system: Some(INSTRUCTIONS.to_string()),
                prompt,
            })
            .await?;

        Ok(AgentResponse {
            text: response.text,
            tool_results,
        })
    }
}
