//! The central Model Context Protocol dispatcher
//!
//! Classifies each inbound message as request or notification, routes requests
//! through a fixed method table, and wraps every outcome in a JSON-RPC envelope.

use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::domain::{registry::ToolRegistry, tool::ToolArguments};
use crate::errors::McpError;
use crate::mcp::rpc::{JsonRpcMessage, JsonRpcResponse};

pub const SUPPORTED_PROTOCOL_VERSION: &str = "2024-11-05";

pub const SUPPORTED_METHODS: [&str; 4] = ["initialize", "tools/list", "tools/call", "ping"];

pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<Value, McpError>> + Send + 'a>>;

pub type MethodHandler = for<'a> fn(&'a McpHandler, Option<Value>) -> HandlerFuture<'a>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerStatus {
    pub name: String,
    pub version: String,
    pub initialized: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandlerStats {
    pub tool_count: usize,
    pub initialized: bool,
}

#[derive(Debug, Default, Deserialize)]
struct ToolCallParams {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    arguments: Option<ToolArguments>,
}

pub struct McpHandler {
    server_info: ServerInfo,
    registry: Arc<ToolRegistry>,
    methods: HashMap<&'static str, MethodHandler>,
    initialized: AtomicBool,
}

fn dispatch_initialize(handler: &McpHandler, params: Option<Value>) -> HandlerFuture<'_> {
    Box::pin(handler.initialize(params))
}

fn dispatch_list_tools(handler: &McpHandler, params: Option<Value>) -> HandlerFuture<'_> {
    Box::pin(handler.list_tools(params))
}

fn dispatch_call_tool(handler: &McpHandler, params: Option<Value>) -> HandlerFuture<'_> {
    Box::pin(handler.call_tool(params))
}

fn dispatch_ping(handler: &McpHandler, params: Option<Value>) -> HandlerFuture<'_> {
    Box::pin(handler.ping(params))
}

fn method_table() -> [(&'static str, MethodHandler); 4] {
    [
        ("initialize", dispatch_initialize as MethodHandler),
        ("tools/list", dispatch_list_tools as MethodHandler),
        ("tools/call", dispatch_call_tool as MethodHandler),
        ("ping", dispatch_ping as MethodHandler),
    ]
}

impl McpHandler {
    pub fn new(server_info: ServerInfo, registry: Arc<ToolRegistry>) -> Self {
        let methods = method_table().into_iter().collect::<HashMap<_, _>>();
        debug_assert!(SUPPORTED_METHODS
            .iter()
            .all(|method| methods.contains_key(method)));

        Self {
            server_info,
            registry,
            methods,
            initialized: AtomicBool::new(false),
        }
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Handles one message. Requests always yield an envelope; notifications never do.
    pub async fn handle(&self, message: JsonRpcMessage) -> Option<JsonRpcResponse> {
        let JsonRpcMessage {
            id, method, params, ..
        } = message;

        let Some(id) = id else {
            self.handle_notification(&method, params.as_ref());
            return None;
        };

        info!(method = %method, id = %id, "processing request");

        let outcome = match self.methods.get(method.as_str()) {
            Some(handler) => handler(self, params).await,
            None => Err(McpError::MethodNotFound(method.clone())),
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(err) => {
                warn!(method = %method, code = err.code(), error = %err, "request failed");
                JsonRpcResponse::failure(id, &err)
            }
        })
    }

    pub fn handle_notification(&self, method: &str, _params: Option<&Value>) {
        match method {
            "notifications/initialized" => info!("client initialized"),
            "notifications/progress" => info!("progress notification received"),
            "notifications/cancelled" => info!("operation cancelled by client"),
            _ => debug!(method = %method, "unhandled notification"),
        }
    }

    pub async fn initialize(&self, _params: Option<Value>) -> Result<Value, McpError> {
        self.initialized.store(true, Ordering::SeqCst);

        Ok(json!({
            "protocolVersion": SUPPORTED_PROTOCOL_VERSION,
            "capabilities": {
                "tools": {
                    "listChanged": true
                },
                "resources": {},
                "prompts": {},
                "logging": {}
            },
            "serverInfo": self.server_info,
        }))
    }

    pub async fn list_tools(&self, _params: Option<Value>) -> Result<Value, McpError> {
        let tools = self
            .registry
            .definitions()
            .into_iter()
            .map(|mut definition| {
                definition.input_schema.additional_properties = Some(false);
                definition
            })
            .collect::<Vec<_>>();

        Ok(json!({ "tools": tools }))
    }

    pub async fn call_tool(&self, params: Option<Value>) -> Result<Value, McpError> {
        let call = match params {
            Some(Value::Null) | None => ToolCallParams::default(),
            Some(value) => serde_json::from_value::<ToolCallParams>(value)
                .map_err(|err| McpError::internal(format!("invalid tools/call params: {err}")))?,
        };

        let Some(name) = call.name.filter(|name| !name.is_empty()) else {
            return Err(McpError::internal("tool name not provided"));
        };

        let result = self
            .registry
            .execute(&name, call.arguments.unwrap_or_default())
            .await;

        if result.is_error {
            let message = result
                .first_text()
                .unwrap_or("unknown tool execution error")
                .to_string();
            return Err(McpError::internal_with_data(
                message,
                json!({ "content": result.content }),
            ));
        }

        serde_json::to_value(result)
            .map_err(|err| McpError::internal(format!("tool result serialization failed: {err}")))
    }

    pub async fn ping(&self, _params: Option<Value>) -> Result<Value, McpError> {
        Ok(json!({}))
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    pub fn server_info(&self) -> ServerStatus {
        ServerStatus {
            name: self.server_info.name.clone(),
            version: self.server_info.version.clone(),
            initialized: self.is_initialized(),
        }
    }

    pub fn stats(&self) -> HandlerStats {
        HandlerStats {
            tool_count: self.registry.len(),
            initialized: self.is_initialized(),
        }
    }
}
