//! Axum HTTP handlers for the web server
//!
//! `/mcp/v1` decodes the body and hands it to the dispatcher; the remaining
//! routes are read-only views over the registry and process uptime.

use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::tool::ToolDefinition;
use crate::errors::AppError;
use crate::mcp::rpc::{decode_message, JsonRpcResponse};
use crate::AppState;

pub const MCP_ENDPOINT: &str = "/mcp/v1";
pub const TOOLS_ENDPOINT: &str = "/mcp/tools";
pub const HEALTH_ENDPOINT: &str = "/health";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub server: String,
    pub version: String,
    pub timestamp: String,
    pub uptime: u64,
}

#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    pub main: &'static str,
    pub tools: &'static str,
    pub health: &'static str,
}

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub protocol: &'static str,
    pub endpoints: EndpointInfo,
}

#[derive(Debug, Serialize)]
pub struct ToolsResponse {
    pub tools: Vec<ToolDefinition>,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let info = state.handler.server_info();
    Json(HealthResponse {
        status: "ok",
        server: info.name,
        version: info.version,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        uptime: u64::try_from(state.started_at.elapsed().as_millis()).unwrap_or(u64::MAX),
    })
}

pub async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    let info = state.handler.server_info();
    Json(RootResponse {
        name: info.name,
        version: info.version,
        protocol: "MCP HTTP",
        endpoints: EndpointInfo {
            main: MCP_ENDPOINT,
            tools: TOOLS_ENDPOINT,
            health: HEALTH_ENDPOINT,
        },
    })
}

pub async fn list_tools(State(state): State<AppState>) -> Json<ToolsResponse> {
    Json(ToolsResponse {
        tools: state.handler.registry().definitions(),
    })
}

pub async fn not_found(method: Method, uri: Uri) -> AppError {
    AppError::not_found(method.as_str(), uri.path())
}

pub async fn mcp_endpoint(State(state): State<AppState>, body: Bytes) -> Response {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(err) => {
            warn!(error = %err, "rejected unparseable mcp body");
            return Json(JsonRpcResponse::parse_error(None, err.to_string())).into_response();
        }
    };

    debug!(body = %payload, "mcp message received");

    let message = match decode_message(payload) {
        Ok(message) => message,
        Err(envelope) => {
            warn!(id = %envelope.id, "rejected malformed mcp message");
            return Json(envelope).into_response();
        }
    };

    match state.handler.handle(message).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::OK.into_response(),
    }
}
