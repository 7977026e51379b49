//! A2A protocol wire types.
//!
//! JSON-RPC 2.0 envelope, response and error objects, plus the A2A task
//! structure (`Task`, `TaskStatus`, `Message`, `Part`, `Artifact`) and the
//! Agent Card served for discovery. Field names follow the camelCase JSON
//! convention of the A2A protocol.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The only JSON-RPC version this gateway speaks.
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC 2.0 error codes used by the gateway.
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    /// Reused for "agent not found", matching the A2A route convention.
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

// ─── JSON-RPC ────────────────────────────────────────────────

/// A JSON-RPC 2.0 request as received on the wire.
///
/// Every field is kept loosely typed so that envelope validation can report
/// `Invalid Request` (and echo the `id`) instead of failing deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub jsonrpc: Value,
    #[serde(default)]
    pub method: Value,
    #[serde(default)]
    pub params: Value,
    #[serde(default)]
    pub id: Value,
}

impl JsonRpcRequest {
    /// `jsonrpc` is the literal string `"2.0"`.
    pub fn has_valid_version(&self) -> bool {
        self.jsonrpc.as_str() == Some(JSONRPC_VERSION)
    }

    /// `id` is present and not null.
    pub fn has_id(&self) -> bool {
        !self.id.is_null()
    }
}

/// The `params` object of an A2A task request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageParams {
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub messages: Option<Vec<Message>>,
    #[serde(default)]
    pub context_id: Option<String>,
    #[serde(default)]
    pub task_id: Option<String>,
}

impl SendMessageParams {
    /// The ordered inbound messages: a single `message` wins over `messages`.
    pub fn into_messages(self) -> Vec<Message> {
        match self.message {
            Some(message) => vec![message],
            None => self.messages.unwrap_or_default(),
        }
    }
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Exactly one of `result` or `error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonRpcPayload {
    Result(Box<Task>),
    Error(JsonRpcError),
}

/// A JSON-RPC 2.0 response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(flatten)]
    pub payload: JsonRpcPayload,
}

impl JsonRpcResponse {
    pub fn success(id: Value, task: Task) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            payload: JsonRpcPayload::Result(Box::new(task)),
        }
    }

    pub fn error(id: Value, code: i32, message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            payload: JsonRpcPayload::Error(JsonRpcError {
                code,
                message: message.into(),
                data,
            }),
        }
    }

    pub fn result(&self) -> Option<&Task> {
        match &self.payload {
            JsonRpcPayload::Result(task) => Some(task.as_ref()),
            JsonRpcPayload::Error(_) => None,
        }
    }

    pub fn error_object(&self) -> Option<&JsonRpcError> {
        match &self.payload {
            JsonRpcPayload::Error(err) => Some(err),
            JsonRpcPayload::Result(_) => None,
        }
    }
}

// ─── Messages ────────────────────────────────────────────────

/// A typed content fragment of a message or artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Part {
    Text { text: String },
    Data {
        /// `None` only when the key is absent; an explicit `null` is kept.
        #[serde(
            default,
            deserialize_with = "present_value",
            skip_serializing_if = "Option::is_none"
        )]
        data: Option<Value>,
    },
}

fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    /// The part as agent input: text verbatim, data as indented JSON, a data
    /// part without a payload as nothing.
    pub fn flatten(&self) -> serde_json::Result<String> {
        match self {
            Part::Text { text } => Ok(text.clone()),
            Part::Data { data: Some(data) } => serde_json::to_string_pretty(data),
            Part::Data { data: None } => Ok(String::new()),
        }
    }
}

/// One conversational turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parts: Option<Vec<Part>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default = "default_message_kind")]
    pub kind: String,
}

fn default_message_kind() -> String {
    "message".to_string()
}

impl Message {
    /// Build an agent reply carrying a single text part.
    pub fn agent_text(text: impl Into<String>, message_id: String, task_id: String) -> Self {
        Self {
            role: "agent".to_string(),
            parts: Some(vec![Part::text(text)]),
            message_id: Some(message_id),
            task_id: Some(task_id),
            kind: default_message_kind(),
        }
    }

    /// Flatten into the `"<role>: <content>"` line the agent consumes.
    ///
    /// Parts are joined with `\n`; a message without parts has empty content.
    pub fn flatten(&self) -> serde_json::Result<String> {
        let content = match &self.parts {
            Some(parts) => parts
                .iter()
                .map(Part::flatten)
                .collect::<serde_json::Result<Vec<_>>>()?
                .join("\n"),
            None => String::new(),
        };
        Ok(format!("{}: {}", self.role, content))
    }
}

// ─── Tasks ───────────────────────────────────────────────────

/// Task lifecycle state. The gateway executes synchronously, so every task it
/// returns is already complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatus {
    pub state: TaskState,
    pub timestamp: String,
    pub message: Message,
}

/// A named bundle of output parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub artifact_id: String,
    pub name: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub context_id: String,
    pub status: TaskStatus,
    pub artifacts: Vec<Artifact>,
    pub history: Vec<Message>,
    pub kind: String,
}

// ─── Agent Card ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCard {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub supported_interfaces: Vec<SupportedInterface>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<AgentProvider>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<AgentCapabilities>,
    pub skills: Vec<AgentSkill>,
    pub default_input_modes: Vec<String>,
    pub default_output_modes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedInterface {
    pub url: String,
    pub protocol_binding: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol_version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentProvider {
    pub organization: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCapabilities {
    pub streaming: bool,
    pub push_notifications: bool,
    pub state_transition_history: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSkill {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input_modes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output_modes: Vec<String>,
}
