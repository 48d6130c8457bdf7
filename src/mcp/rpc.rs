//! JSON-RPC message and envelope representations
//!
//! Inbound messages are classified by the presence of `id`; outbound envelopes
//! carry exactly one of `result` or `error`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::errors::McpError;

pub const JSONRPC_VERSION: &str = "2.0";

fn default_jsonrpc_version() -> String {
    JSONRPC_VERSION.to_string()
}

// Plain `Option<Value>` collapses an explicit `null` into `None`; a present
// `null` id still makes the message a request.
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcMessage {
    #[serde(default = "default_jsonrpc_version")]
    pub jsonrpc: String,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Value>,
    #[serde(default)]
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcMessage {
    pub fn request(id: impl Into<Value>, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: default_jsonrpc_version(),
            id: Some(id.into()),
            method: method.into(),
            params,
        }
    }

    pub fn notification(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: default_jsonrpc_version(),
            id: None,
            method: method.into(),
            params,
        }
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

fn is_scalar_id(id: &Value) -> bool {
    match id {
        Value::Null | Value::String(_) => true,
        Value::Number(number) => number.is_i64() || number.is_u64(),
        _ => false,
    }
}

/// Decodes a raw JSON payload into a message, or the error envelope to send back.
///
/// Only objects are messages; the derive alone would also accept positional arrays.
pub fn decode_message(payload: Value) -> Result<JsonRpcMessage, JsonRpcResponse> {
    let Some(object) = payload.as_object() else {
        return Err(JsonRpcResponse::parse_error(
            None,
            "message must be a JSON object",
        ));
    };

    let request_id = object.get("id").cloned();
    if request_id.as_ref().is_some_and(|id| !is_scalar_id(id)) {
        return Err(JsonRpcResponse::parse_error(
            None,
            "id must be a string, an integer, or null",
        ));
    }

    serde_json::from_value(payload)
        .map_err(|err| JsonRpcResponse::parse_error(request_id, err.to_string()))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl From<&McpError> for JsonRpcError {
    fn from(err: &McpError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
            data: err.data().cloned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponsePayload {
    Result(Value),
    Error(JsonRpcError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(flatten)]
    pub payload: ResponsePayload,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: default_jsonrpc_version(),
            id,
            payload: ResponsePayload::Result(result),
        }
    }

    pub fn failure(id: Value, err: &McpError) -> Self {
        Self {
            jsonrpc: default_jsonrpc_version(),
            id,
            payload: ResponsePayload::Error(err.into()),
        }
    }

    /// Envelope for bodies that never reached the dispatcher.
    pub fn parse_error(id: Option<Value>, detail: impl Into<String>) -> Self {
        let err = McpError::internal_with_data("Parse error", Value::String(detail.into()));
        Self::failure(id.unwrap_or(Value::Null), &err)
    }

    pub fn is_error(&self) -> bool {
        matches!(self.payload, ResponsePayload::Error(_))
    }

    pub fn result(&self) -> Option<&Value> {
        match &self.payload {
            ResponsePayload::Result(result) => Some(result),
            ResponsePayload::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&JsonRpcError> {
        match &self.payload {
            ResponsePayload::Result(_) => None,
            ResponsePayload::Error(error) => Some(error),
        }
    }
}
