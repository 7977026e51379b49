//! Agent Tools
//!
//! Tools are named, schema-described capabilities an agent can call with a
//! JSON input and that return a JSON output.

pub mod github;

pub use github::{GithubRepoTool, RepoSummary, extract_username};

use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Execution(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ToolError>;

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn input_schema(&self) -> Value;

    async fn execute(&self, input: Value) -> Result<Value>;
}
