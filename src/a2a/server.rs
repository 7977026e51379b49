//! A2A Gateway HTTP server powered by axum.
//!
//! Serves:
//! - `POST /a2a/agent/{agentId}`                         — JSON-RPC 2.0 task endpoint
//! - `GET  /a2a/agent/{agentId}/.well-known/agent.json`  — Agent Card discovery
//! - `GET  /a2a/health`                                  — Health check

use crate::a2a::{agent_card, handler::Gateway, types::*};
use axum::{
    Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared state for the A2A gateway.
#[derive(Clone)]
pub struct A2aState {
    pub gateway: Gateway,
    pub agent_ids: Arc<[String]>,
    pub host: String,
    pub port: u16,
}

/// Build the axum router for the A2A gateway.
pub fn build_router(state: A2aState) -> Router {
    Router::new()
        .route("/a2a/agent/{agent_id}", post(handle_task))
        .route(
            "/a2a/agent/{agent_id}/.well-known/agent.json",
            get(get_agent_card),
        )
        .route("/a2a/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// A2A Gateway server configuration.
pub struct GatewayParams {
    pub bind: String,
    pub port: u16,
    pub enabled: bool,
}

/// Start the A2A gateway server and serve until the listener fails.
pub async fn start_server(
    params: &GatewayParams,
    gateway: Gateway,
    agent_ids: Vec<String>,
) -> anyhow::Result<()> {
    if !params.enabled {
        tracing::info!("A2A gateway disabled in config");
        return Ok(());
    }

    let addr: SocketAddr = format!("{}:{}", params.bind, params.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid gateway address: {}", e))?;

    tracing::info!("A2A Gateway starting on http://{}", addr);
    for agent_id in &agent_ids {
        tracing::info!("   Agent:      http://{}/a2a/agent/{}", addr, agent_id);
    }

    let state = A2aState {
        gateway,
        agent_ids: agent_ids.into(),
        host: params.bind.clone(),
        port: params.port,
    };

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// POST /a2a/agent/{agentId} — JSON-RPC 2.0 task endpoint.
async fn handle_task(
    State(state): State<A2aState>,
    Path(agent_id): Path<String>,
    body: Bytes,
) -> (StatusCode, Json<JsonRpcResponse>) {
    let (status, response) = state.gateway.handle(&agent_id, &body).await;
    (status, Json(response))
}

/// GET /a2a/agent/{agentId}/.well-known/agent.json — Agent Card discovery.
async fn get_agent_card(
    State(state): State<A2aState>,
    Path(agent_id): Path<String>,
) -> Response {
    match state.gateway.agents().resolve(&agent_id) {
        Some(agent) => {
            Json(agent_card::build_agent_card(&agent_id, agent.as_ref(), &state.host, state.port))
                .into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "error": format!("Agent '{}' does not exist", agent_id)
            })),
        )
            .into_response(),
    }
}

/// GET /a2a/health — Health check.
async fn health_check(State(state): State<A2aState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "protocol": "A2A",
        "protocol_version": JSONRPC_VERSION,
        "agents": state.agent_ids.as_ref(),
    }))
}
