//! GitHub Repository Tool
//!
//! Lists a user's public repositories, trimmed to the fields a portfolio
//! needs: name, description, language, link, stars and forks.

use super::{Result, Tool, ToolError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Repository fields exposed to the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoSummary {
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub url: String,
    pub stars: u64,
    pub forks: u64,
}

/// The subset of the GitHub API repository object we read.
#[derive(Debug, Deserialize)]
struct GithubRepo {
    name: String,
    description: Option<String>,
    language: Option<String>,
    html_url: String,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
}

impl From<GithubRepo> for RepoSummary {
    fn from(repo: GithubRepo) -> Self {
        Self {
            name: repo.name,
            description: repo.description,
            language: repo.language,
            url: repo.html_url,
            stars: repo.stargazers_count,
            forks: repo.forks_count,
        }
    }
}

/// Extract a username from `octocat` or `https://github.com/octocat`.
pub fn extract_username(input: &str) -> Option<String> {
    let input = input.trim();
    let username = if input.starts_with("http") {
        let rest = input.split_once("://").map_or(input, |(_, rest)| rest);
        rest.split('/').nth(1).unwrap_or_default()
    } else {
        input.trim_start_matches('@')
    };

    let username = username.trim();
    (!username.is_empty()).then(|| username.to_string())
}

pub struct GithubRepoTool {
    api_base: String,
    user_agent: String,
    client: reqwest::Client,
}

impl GithubRepoTool {
    pub fn new(api_base: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            user_agent: user_agent.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Fetch the public repositories of `username`.
    pub async fn fetch_repos(&self, username: &str) -> Result<Vec<RepoSummary>> {
        let url = format!("{}/users/{}/repos", self.api_base, username);
        tracing::debug!("Fetching GitHub repos from {}", url);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::warn!(
                "GitHub repo listing for '{}' failed with {}",
                username,
                response.status()
            );
            return Err(ToolError::Execution(format!(
                "GitHub user '{}' not found",
                username
            )));
        }

        let repos: Vec<GithubRepo> = response.json().await?;
        Ok(repos.into_iter().map(RepoSummary::from).collect())
    }
}

impl Default for GithubRepoTool {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE, format!("exhibit/{}", crate::VERSION))
    }
}

#[async_trait]
impl Tool for GithubRepoTool {
    fn name(&self) -> &str {
        "fetch-github-repos"
    }

    fn description(&self) -> &str {
        "Fetch public GitHub repositories of a user"
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "githubInput": {
                    "type": "string",
                    "description": "GitHub profile URL or username (e.g., 'octocat' or 'https://github.com/octocat')"
                }
            },
            "required": ["githubInput"]
        })
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let raw = input
            .get("githubInput")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::InvalidInput("'githubInput' is required".to_string()))?;

        let username = extract_username(raw)
            .ok_or_else(|| ToolError::InvalidInput("Invalid GitHub username or URL".to_string()))?;

        let repos = self.fetch_repos(&username).await?;
        Ok(serde_json::json!({ "repos": repos }))
    }
}
