use std::{sync::Arc, time::Instant};

use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

pub mod config;
pub mod domain;
pub mod errors;
pub mod http;
pub mod logging;
pub mod mcp;

use config::CorsOrigins;
use mcp::server::McpHandler;

#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<McpHandler>,
    pub cors_origins: CorsOrigins,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(handler: Arc<McpHandler>, cors_origins: CorsOrigins) -> Self {
        Self {
            handler,
            cors_origins,
            started_at: Instant::now(),
        }
    }
}

pub fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    match origins {
        CorsOrigins::Any => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsOrigins::List(origins) => CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins.iter().cloned()))
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(true),
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route(http::handlers::MCP_ENDPOINT, post(http::handlers::mcp_endpoint))
        .route(http::handlers::TOOLS_ENDPOINT, get(http::handlers::list_tools))
        .route(http::handlers::HEALTH_ENDPOINT, get(http::handlers::health))
        .route("/", get(http::handlers::root))
        .method_not_allowed_fallback(http::handlers::not_found)
        .fallback(http::handlers::not_found)
        .layer(cors_layer(&state.cors_origins))
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}
