use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Failures raised while a tool validates or runs its arguments.
///
/// These never leave `Tool::execute`; they are folded into an error-flagged
/// `ToolResult` by the shared execution guard.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ToolError {
    #[error("required field '{field}' not provided")]
    Validation { field: String },
    #[error("{0}")]
    Execution(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("tool '{0}' is already registered")]
    DuplicateTool(String),
}

/// Handler-level failures surfaced through a JSON-RPC error envelope.
#[derive(Debug, Error)]
pub enum McpError {
    #[error("method '{0}' not supported")]
    MethodNotFound(String),
    #[error("{message}")]
    Internal {
        message: String,
        data: Option<Value>,
    },
}

impl McpError {
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INTERNAL_ERROR: i32 = -32603;

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            data: None,
        }
    }

    pub fn internal_with_data(message: impl Into<String>, data: Value) -> Self {
        Self::Internal {
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::MethodNotFound(_) => Self::METHOD_NOT_FOUND,
            Self::Internal { .. } => Self::INTERNAL_ERROR,
        }
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::MethodNotFound(_) => None,
            Self::Internal { data, .. } => data.as_ref(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("endpoint not found: {method} {path}")]
    NotFound { method: String, path: String },
}

#[derive(Debug, Serialize)]
pub struct NotFoundResponse {
    pub error: &'static str,
    pub path: String,
    pub method: String,
}

impl AppError {
    pub fn not_found(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self::NotFound {
            method: method.into(),
            path: path.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound { method, path } => (
                StatusCode::NOT_FOUND,
                Json(NotFoundResponse {
                    error: "endpoint not found",
                    path,
                    method,
                }),
            )
                .into_response(),
        }
    }
}
