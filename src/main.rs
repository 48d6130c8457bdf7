use std::sync::Arc;

use mcp_http_server::{
    build_app,
    config::Config,
    domain::{random_number::RandomNumberTool, registry::ToolRegistry},
    http::handlers::{HEALTH_ENDPOINT, MCP_ENDPOINT, TOOLS_ENDPOINT},
    logging,
    mcp::server::{McpHandler, ServerInfo},
    AppState,
};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    logging::init_logging(config.log_level);

    let registry = Arc::new(ToolRegistry::new());
    registry.register(Arc::new(RandomNumberTool::new()))?;
    let stats = registry.stats();
    info!(
        total_tools = stats.total_tools,
        tools = %stats.tool_names.join(", "),
        "tools registered"
    );

    let handler = Arc::new(McpHandler::new(
        ServerInfo {
            name: config.server_name.clone(),
            version: config.server_version.clone(),
        },
        Arc::clone(&registry),
    ));
    let bind_socket = config.bind_socket()?;
    let state = AppState::new(handler, config.cors_origins.clone());
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(bind_socket).await?;

    info!(
        server = %config.server_name,
        version = %config.server_version,
        bind_addr = %config.bind_addr,
        bind_port = config.bind_port,
        "server starting"
    );
    info!(
        mcp = %format!("http://{bind_socket}{MCP_ENDPOINT}"),
        tools = %format!("http://{bind_socket}{TOOLS_ENDPOINT}"),
        health = %format!("http://{bind_socket}{HEALTH_ENDPOINT}"),
        "endpoints available"
    );

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    registry.clear();
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!(signal = "SIGINT", "shutdown requested"),
        _ = terminate => info!(signal = "SIGTERM", "shutdown requested"),
    }
}
