//! SQLite MCP Server - Main entry point.
//!
//! This server provides MCP (Model Context Protocol) tools for AI assistants
//! to run queries and CRUD operations against a single SQLite database file.

use sqlite_mcp_server::config::{Config, TransportMode};
use sqlite_mcp_server::db::{DatabaseTarget, QueryExecutor};
use sqlite_mcp_server::transport::{HttpTransport, StdioTransport, Transport};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr; stdout carries the stdio protocol stream.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse configuration from command line and environment
    let config = Config::parse_args();

    // Initialize logging
    init_tracing(&config);

    info!(
        transport = %config.transport,
        "Starting SQLite MCP Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let db_path = match config.resolved_db_path() {
        Ok(path) => path,
        Err(e) => {
            error!(error = %e, "Failed to resolve database path");
            std::process::exit(1);
        }
    };
    info!(path = %db_path.display(), "Using database");

    // Make sure the file exists before any tool call runs against it
    let target = DatabaseTarget::new(db_path);
    if let Err(e) = target.provision().await {
        error!(error = %e, suggestion = ?e.suggestion(), "Failed to initialize database");
        std::process::exit(1);
    }
    info!("Database initialized");

    let executor = Arc::new(QueryExecutor::new(target));

    // Run the appropriate transport
    let result = match config.transport {
        TransportMode::Stdio => {
            info!("Using stdio transport");
            let transport = StdioTransport::new(executor);
            transport.run().await
        }
        TransportMode::Http => {
            info!(
                host = %config.http_host,
                port = config.http_port,
                endpoint = %config.mcp_endpoint,
                "Using HTTP transport"
            );
            let transport = HttpTransport::new(
                executor,
                &config.http_host,
                config.http_port,
                &config.mcp_endpoint,
            );
            transport.run().await
        }
    };

    if let Err(e) = result {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}
