use std::{fmt, str::FromStr, time::Instant};

use axum::{extract::Request, http::StatusCode, middleware::Next, response::Response};
use tracing::{error, info, info_span, warn, Instrument};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "debug" | "trace" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(()),
        }
    }
}

/// Installs the process-wide subscriber. `RUST_LOG` wins over `level` when set.
pub fn init_logging(level: LogLevel) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// How a finished request is reported, keyed off its response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Completed,
    Rejected,
    Failed,
}

impl RequestOutcome {
    pub fn from_status(status: StatusCode) -> Self {
        if status.is_server_error() {
            Self::Failed
        } else if status.is_client_error() {
            Self::Rejected
        } else {
            Self::Completed
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Rejected => "rejected",
            Self::Failed => "failed",
        }
    }
}

/// Runs each request inside an `http_request` span and reports its outcome.
///
/// Client errors log at warn and server errors at error, so a quiet log level
/// still surfaces rejected MCP traffic.
pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let span = info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
    );
    let started_at = Instant::now();

    let response = next.run(request).instrument(span.clone()).await;
    let status = response.status().as_u16();
    let duration_ms = u64::try_from(started_at.elapsed().as_millis()).unwrap_or(u64::MAX);
    let outcome = RequestOutcome::from_status(response.status());

    let label = outcome.as_str();

    span.in_scope(|| match outcome {
        RequestOutcome::Completed => info!(status, duration_ms, outcome = label, "request finished"),
        RequestOutcome::Rejected => warn!(status, duration_ms, outcome = label, "request finished"),
        RequestOutcome::Failed => error!(status, duration_ms, outcome = label, "request finished"),
    });

    response
}
