//! JSON-RPC 2.0 gateway for A2A task requests.
//!
//! One call runs strictly in order:
//! 1. envelope validation (`jsonrpc == "2.0"`, non-null `id`)
//! 2. agent resolution by route id
//! 3. message normalization into `"<role>: <content>"` lines
//! 4. agent execution
//! 5. task assembly (artifacts, history, status)
//!
//! Every outcome is a single JSON-RPC response paired with its HTTP status.

use crate::a2a::ids::{IdGenerator, UuidGenerator};
use crate::a2a::types::*;
use crate::brain::agent::{AgentError, AgentResolver, AgentResponse};
use axum::http::StatusCode;
use chrono::{SecondsFormat, Utc};
use serde_json::{Value, json};
use std::sync::Arc;

/// Name of the artifact carrying tool outputs.
pub const TOOL_RESULTS_ARTIFACT: &str = "ToolResults";

/// Failures of a single gateway call.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Invalid Request: use JSON-RPC \"2.0\" and include an \"id\"")]
    InvalidRequest { id: Value },

    #[error("Agent '{agent_id}' does not exist")]
    AgentNotFound { agent_id: String, id: Value },

    #[error("Invalid params: {0}")]
    InvalidParams(#[source] serde_json::Error),

    #[error("Failed to serialize content: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error(transparent)]
    Agent(#[from] AgentError),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Parse(_) | Self::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            Self::AgentNotFound { .. } => StatusCode::NOT_FOUND,
            Self::InvalidParams(_) | Self::Serialize(_) | Self::Agent(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::Parse(_) => error_codes::PARSE_ERROR,
            Self::InvalidRequest { .. } => error_codes::INVALID_REQUEST,
            Self::AgentNotFound { .. } => error_codes::INVALID_PARAMS,
            Self::InvalidParams(_) | Self::Serialize(_) | Self::Agent(_) => {
                error_codes::INTERNAL_ERROR
            }
        }
    }

    /// Build the JSON-RPC error response.
    ///
    /// `request_id` is echoed on the internal-error branch only when
    /// `echo_id_on_internal_error` is set; otherwise that branch answers with
    /// `id: null`.
    pub fn into_response(
        self,
        request_id: &Value,
        echo_id_on_internal_error: bool,
    ) -> (StatusCode, JsonRpcResponse) {
        let status = self.status();
        let code = self.code();
        let message = self.to_string();
        let response = match self {
            Self::Parse(_) => JsonRpcResponse::error(
                Value::Null,
                code,
                "Parse error",
                Some(json!({ "details": message })),
            ),
            Self::InvalidRequest { id } => JsonRpcResponse::error(id, code, message, None),
            Self::AgentNotFound { agent_id, id } => {
                JsonRpcResponse::error(id, code, message, Some(json!({ "agentId": agent_id })))
            }
            Self::InvalidParams(_) | Self::Serialize(_) | Self::Agent(_) => {
                let id = if echo_id_on_internal_error {
                    request_id.clone()
                } else {
                    Value::Null
                };
                JsonRpcResponse::error(
                    id,
                    code,
                    "Internal error",
                    Some(json!({ "details": message })),
                )
            }
        };
        (status, response)
    }
}

/// Flatten inbound messages into the line format agents consume.
pub fn normalize_messages(messages: &[Message]) -> Result<Vec<String>, GatewayError> {
    messages
        .iter()
        .map(|m| m.flatten().map_err(GatewayError::Serialize))
        .collect()
}

/// Parse and validate a raw JSON-RPC body.
pub fn parse_envelope(body: &[u8]) -> Result<JsonRpcRequest, GatewayError> {
    let value: Value = serde_json::from_slice(body).map_err(GatewayError::Parse)?;
    if !value.is_object() {
        return Err(GatewayError::InvalidRequest { id: Value::Null });
    }

    let request: JsonRpcRequest = serde_json::from_value(value)
        .map_err(|_| GatewayError::InvalidRequest { id: Value::Null })?;

    if !request.has_valid_version() || !request.has_id() {
        return Err(GatewayError::InvalidRequest {
            id: request.id.clone(),
        });
    }

    Ok(request)
}

/// The A2A gateway: resolves agents, runs them, and shapes the reply.
#[derive(Clone)]
pub struct Gateway {
    agents: Arc<dyn AgentResolver>,
    ids: Arc<dyn IdGenerator>,
    echo_id_on_internal_error: bool,
}

impl Gateway {
    pub fn new(agents: Arc<dyn AgentResolver>) -> Self {
        Self {
            agents,
            ids: Arc::new(UuidGenerator),
            echo_id_on_internal_error: false,
        }
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_echo_id_on_internal_error(mut self, echo: bool) -> Self {
        self.echo_id_on_internal_error = echo;
        self
    }

    pub fn agents(&self) -> &Arc<dyn AgentResolver> {
        &self.agents
    }

    /// Handle one JSON-RPC call addressed to `agent_id`.
    pub async fn handle(&self, agent_id: &str, body: &[u8]) -> (StatusCode, JsonRpcResponse) {
        let request = match parse_envelope(body) {
            Ok(request) => request,
            Err(err) => {
                tracing::warn!("A2A: Rejected request for agent {}: {}", agent_id, err);
                return err.into_response(&Value::Null, self.echo_id_on_internal_error);
            }
        };

        let request_id = request.id.clone();
        tracing::debug!(
            "A2A: Request {} for agent {} (method {})",
            request_id,
            agent_id,
            request.method
        );

        match self.run(agent_id, request).await {
            Ok(task) => {
                tracing::info!(
                    "A2A: Completed task {} for agent {} ({} history entries)",
                    task.id,
                    agent_id,
                    task.history.len()
                );
                (StatusCode::OK, JsonRpcResponse::success(request_id, task))
            }
            Err(err @ GatewayError::AgentNotFound { .. }) => {
                tracing::warn!("A2A: {}", err);
                err.into_response(&request_id, self.echo_id_on_internal_error)
            }
            Err(err) => {
                tracing::error!("A2A: Request {} for agent {} failed: {}", request_id, agent_id, err);
                err.into_response(&request_id, self.echo_id_on_internal_error)
            }
        }
    }

    async fn run(&self, agent_id: &str, request: JsonRpcRequest) -> Result<Task, GatewayError> {
        let agent = self
            .agents
            .resolve(agent_id)
            .ok_or_else(|| GatewayError::AgentNotFound {
                agent_id: agent_id.to_string(),
                id: request.id.clone(),
            })?;

        let params: SendMessageParams = if request.params.is_null() {
            SendMessageParams::default()
        } else {
            serde_json::from_value(request.params).map_err(GatewayError::InvalidParams)?
        };

        let task_id = params.task_id.clone().unwrap_or_else(|| self.ids.next_id());
        let context_id = params
            .context_id
            .clone()
            .unwrap_or_else(|| self.ids.next_id());
        let inbound = params.into_messages();

        let lines = normalize_messages(&inbound)?;
        let response = agent.generate(&lines).await?;

        self.assemble(agent_id, inbound, task_id, context_id, response)
    }

    fn assemble(
        &self,
        agent_id: &str,
        inbound: Vec<Message>,
        task_id: String,
        context_id: String,
        response: AgentResponse,
    ) -> Result<Task, GatewayError> {
        let mut artifacts = vec![Artifact {
            artifact_id: self.ids.next_id(),
            name: format!("{}Response", agent_id),
            parts: vec![Part::text(response.text.clone())],
        }];

        if !response.tool_results.is_empty() {
            let parts = response
                .tool_results
                .iter()
                .map(|result| serde_json::to_string_pretty(result).map(Part::text))
                .collect::<serde_json::Result<Vec<_>>>()
                .map_err(GatewayError::Serialize)?;
            artifacts.push(Artifact {
                artifact_id: self.ids.next_id(),
                name: TOOL_RESULTS_ARTIFACT.to_string(),
                parts,
            });
        }

        let mut history: Vec<Message> = inbound
            .into_iter()
            .map(|mut message| {
                if message.message_id.is_none() {
                    message.message_id = Some(self.ids.next_id());
                }
                if message.task_id.is_none() {
                    message.task_id = Some(task_id.clone());
                }
                message
            })
            .collect();

        let reply = Message::agent_text(response.text, self.ids.next_id(), task_id.clone());
        history.push(reply.clone());

        Ok(Task {
            id: task_id,
            context_id,
            status: TaskStatus {
                state: TaskState::Completed,
                timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                message: reply,
            },
            artifacts,
            history,
            kind: "task".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::a2a::test_helpers::{ScriptedAgent, gateway_with};

    fn body(value: Value) -> Vec<u8> {
        serde_json::to_vec(&value).expect("json")
    }

    fn send_request(params: Value) -> Vec<u8> {
        body(json!({
            "jsonrpc": "2.0",
            "id": "req-1",
            "method": "message/send",
            "params": params
        }))
    }

    #[tokio::test]
    async fn test_single_message_round_trip() {
        let agent = Arc::new(ScriptedAgent::replying("Here is your portfolio"));
        let gateway = gateway_with("exhibitAgent", agent.clone());

        let (status, resp) = gateway
            .handle(
                "exhibitAgent",
                &send_request(json!({
                    "message": {"role": "user", "parts": [{"kind": "text", "text": "hi"}]}
                })),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(resp.jsonrpc, "2.0");
        assert_eq!(resp.id, json!("req-1"));
        assert!(resp.error_object().is_none());
        assert_eq!(agent.calls(), vec![vec!["user: hi".to_string()]]);

        let task = resp.result().expect("task");
        assert_eq!(task.kind, "task");
        assert_eq!(task.status.state, TaskState::Completed);
        assert_eq!(task.artifacts.len(), 1);
        assert_eq!(task.artifacts[0].name, "exhibitAgentResponse");
        assert_eq!(
            task.artifacts[0].parts,
            vec![Part::text("Here is your portfolio")]
        );
        assert_eq!(task.history.len(), 2);
        assert_eq!(task.history[1].role, "agent");
        assert_eq!(task.status.message, task.history[1]);
    }

    #[tokio::test]
    async fn test_generated_ids_fill_missing_identity() {
        let agent = Arc::new(ScriptedAgent::replying("ok"));
        let gateway = gateway_with("a", agent);

        let (_, resp) = gateway
            .handle(
                "a",
                &send_request(json!({
                    "message": {"role": "user", "parts": [{"kind": "text", "text": "hi"}]}
                })),
            )
            .await;

        let task = resp.result().expect("task");
        assert_eq!(task.id, "id-1");
        assert_eq!(task.context_id, "id-2");
        assert_eq!(task.artifacts[0].artifact_id, "id-3");
        assert_eq!(task.history[0].message_id.as_deref(), Some("id-4"));
        assert_eq!(task.history[0].task_id.as_deref(), Some("id-1"));
        assert_eq!(task.history[1].message_id.as_deref(), Some("id-5"));
        assert_eq!(task.history[1].task_id.as_deref(), Some("id-1"));
    }

    #[tokio::test]
    async fn test_caller_identity_is_preserved() {
        let agent = Arc::new(ScriptedAgent::replying("ok"));
        let gateway = gateway_with("a", agent);

        let (_, resp) = gateway
            .handle(
                "a",
                &send_request(json!({
                    "taskId": "task-9",
                    "contextId": "ctx-9",
                    "message": {
                        "role": "user",
                        "messageId": "m-1",
                        "taskId": "other-task",
                        "parts": [{"kind": "text", "text": "hi"}]
                    }
                })),
            )
            .await;

        let task = resp.result().expect("task");
        assert_eq!(task.id, "task-9");
        assert_eq!(task.context_id, "ctx-9");
        assert_eq!(task.history[0].message_id.as_deref(), Some("m-1"));
        assert_eq!(task.history[0].task_id.as_deref(), Some("other-task"));
        assert_eq!(task.history[1].task_id.as_deref(), Some("task-9"));
    }

    #[tokio::test]
    async fn test_messages_array_normalized_in_order() {
        let agent = Arc::new(ScriptedAgent::replying("ok"));
        let gateway = gateway_with("a", agent.clone());

        let (status, resp) = gateway
            .handle(
                "a",
                &send_request(json!({
                    "messages": [
                        {"role": "user", "parts": [
                            {"kind": "text", "text": "a"},
                            {"kind": "data", "data": {"x": 1}}
                        ]},
                        {"role": "agent", "parts": [{"kind": "text", "text": "b"}]},
                        {"role": "user"}
                    ]
                })),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            agent.calls()[0],
            vec![
                "user: a\n{\n  \"x\": 1\n}".to_string(),
                "agent: b".to_string(),
                "user: ".to_string(),
            ]
        );

        let task = resp.result().expect("task");
        assert_eq!(task.history.len(), 4);
        assert_eq!(task.history[0].parts.as_ref().map(Vec::len), Some(2));
        assert!(task.history[2].parts.is_none());
        assert_eq!(task.history[3].role, "agent");
    }

    #[tokio::test]
    async fn test_data_part_without_payload_adds_nothing() {
        let agent = Arc::new(ScriptedAgent::replying("ok"));
        let gateway = gateway_with("a", agent.clone());

        let (status, resp) = gateway
            .handle(
                "a",
                &send_request(json!({
                    "message": {"role": "user", "parts": [
                        {"kind": "text", "text": "a"},
                        {"kind": "data"}
                    ]}
                })),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(agent.calls()[0], vec!["user: a\n".to_string()]);

        let history = serde_json::to_value(&resp.result().expect("task").history).expect("json");
        assert_eq!(history[0]["parts"][1], json!({"kind": "data"}));
    }

    #[tokio::test]
    async fn test_status_timestamp_is_utc_millis() {
        let agent = Arc::new(ScriptedAgent::replying("ok"));
        let gateway = gateway_with("a", agent);

        let (_, resp) = gateway.handle("a", &send_request(json!({}))).await;
        let timestamp = &resp.result().expect("task").status.timestamp;

        chrono::DateTime::parse_from_rfc3339(timestamp).expect("rfc3339");
        assert!(timestamp.ends_with('Z'));
        let fraction = timestamp
            .rsplit_once('.')
            .map(|(_, f)| f.trim_end_matches('Z'))
            .expect("fractional seconds");
        assert_eq!(fraction.len(), 3);
        assert!(fraction.chars().all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn test_missing_params_runs_with_no_messages() {
        let agent = Arc::new(ScriptedAgent::replying("Which GitHub user?"));
        let gateway = gateway_with("a", agent.clone());

        let (status, resp) = gateway
            .handle("a", &body(json!({"jsonrpc": "2.0", "id": 7})))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(resp.id, json!(7));
        assert_eq!(agent.calls(), vec![Vec::<String>::new()]);
        assert_eq!(resp.result().expect("task").history.len(), 1);
    }

    #[tokio::test]
    async fn test_tool_results_become_second_artifact() {
        let agent = Arc::new(ScriptedAgent::with_response(AgentResponse {
            text: "done".to_string(),
            tool_results: vec![json!({"repos": []}), json!("second")],
        }));
        let gateway = gateway_with("a", agent);

        let (_, resp) = gateway.handle("a", &send_request(json!({}))).await;

        let task = resp.result().expect("task");
        assert_eq!(task.artifacts.len(), 2);
        assert_eq!(task.artifacts[1].name, TOOL_RESULTS_ARTIFACT);
        assert_eq!(
            task.artifacts[1].parts,
            vec![
                Part::text("{\n  \"repos\": []\n}"),
                Part::text("\"second\""),
            ]
        );
        assert_ne!(task.artifacts[0].artifact_id, task.artifacts[1].artifact_id);
    }

    #[tokio::test]
    async fn test_wrong_version_is_invalid_request() {
        let agent = Arc::new(ScriptedAgent::replying("ok"));
        let gateway = gateway_with("a", agent.clone());

        let (status, resp) = gateway
            .handle("a", &body(json!({"jsonrpc": "1.0", "id": "x"})))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(resp.id, json!("x"));
        assert_eq!(resp.error_object().expect("error").code, -32600);
        assert!(resp.result().is_none());
        assert!(agent.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_or_null_id_is_invalid_request() {
        let gateway = gateway_with("a", Arc::new(ScriptedAgent::replying("ok")));

        for request in [json!({"jsonrpc": "2.0"}), json!({"jsonrpc": "2.0", "id": null})] {
            let (status, resp) = gateway.handle("a", &body(request)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(resp.id.is_null());
            assert_eq!(resp.error_object().expect("error").code, -32600);
        }
    }

    #[tokio::test]
    async fn test_envelope_checked_before_agent_lookup() {
        let gateway = gateway_with("a", Arc::new(ScriptedAgent::replying("ok")));
        let (status, resp) = gateway
            .handle("missing", &body(json!({"jsonrpc": "1.0", "id": 1})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(resp.error_object().expect("error").code, -32600);
    }

    #[tokio::test]
    async fn test_non_json_body_is_parse_error() {
        let gateway = gateway_with("a", Arc::new(ScriptedAgent::replying("ok")));
        let (status, resp) = gateway.handle("a", b"{not json").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(resp.id.is_null());
        assert_eq!(resp.error_object().expect("error").code, -32700);
    }

    #[tokio::test]
    async fn test_batch_body_is_invalid_request() {
        let gateway = gateway_with("a", Arc::new(ScriptedAgent::replying("ok")));
        let (status, resp) = gateway
            .handle("a", &body(json!([{"jsonrpc": "2.0", "id": 1}])))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(resp.error_object().expect("error").code, -32600);
    }

    #[tokio::test]
    async fn test_unknown_agent_is_not_found() {
        let gateway = gateway_with("a", Arc::new(ScriptedAgent::replying("ok")));
        let (status, resp) = gateway
            .handle("unknown-agent", &send_request(json!({})))
            .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(resp.id, json!("req-1"));
        let err = resp.error_object().expect("error");
        assert_eq!(err.code, -32602);
        assert!(err.message.contains("unknown-agent"));
    }

    #[tokio::test]
    async fn test_agent_failure_is_internal_error_with_null_id() {
        let agent = Arc::new(ScriptedAgent::failing("GitHub user 'ghost' not found"));
        let gateway = gateway_with("a", agent);

        let (status, resp) = gateway.handle("a", &send_request(json!({}))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(resp.id.is_null());
        assert!(resp.result().is_none());
        let err = resp.error_object().expect("error");
        assert_eq!(err.code, -32603);
        assert_eq!(
            err.data.as_ref().and_then(|d| d.get("details")),
            Some(&json!("GitHub user 'ghost' not found"))
        );
    }

    #[tokio::test]
    async fn test_internal_error_can_echo_id() {
        let agent = Arc::new(ScriptedAgent::failing("boom"));
        let gateway = gateway_with("a", agent).with_echo_id_on_internal_error(true);

        let (status, resp) = gateway.handle("a", &send_request(json!({}))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(resp.id, json!("req-1"));
    }

    #[tokio::test]
    async fn test_malformed_params_is_internal_error() {
        let agent = Arc::new(ScriptedAgent::replying("ok"));
        let gateway = gateway_with("a", agent.clone());

        let (status, resp) = gateway
            .handle(
                "a",
                &send_request(json!({"message": {"role": "user", "parts": [{"kind": "video"}]}})),
            )
            .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(resp.error_object().expect("error").code, -32603);
        assert!(agent.calls().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_requests_get_fresh_ids() {
        let gateway = gateway_with("a", Arc::new(ScriptedAgent::replying("ok")));
        let request = send_request(json!({"taskId": "t", "contextId": "c"}));

        let (_, first) = gateway.handle("a", &request).await;
        let (_, second) = gateway.handle("a", &request).await;
        let first = first.result().expect("task");
        let second = second.result().expect("task");

        assert_ne!(first.artifacts[0].artifact_id, second.artifacts[0].artifact_id);
        assert_ne!(
            first.status.message.message_id,
            second.status.message.message_id
        );
        assert_eq!(first.history[0].parts, second.history[0].parts);
    }
}
