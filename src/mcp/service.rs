//! MCP service implementation using rmcp.
//!
//! This module defines the DbService struct that exposes the registered
//! database tools over the MCP protocol. Every tool answers with the shared
//! `ToolResponse` shape as structured content; database errors and malformed
//! arguments are part of that shape, never protocol errors.

use crate::db::QueryExecutor;
use crate::mcp::router::build_tool_router;
use crate::tools::ToolRegistry;
use rmcp::{
    ServerHandler,
    handler::server::tool::ToolRouter,
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool_handler,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct DbService {
    /// Tool router for MCP tool dispatch, built from the registrations
    tool_router: ToolRouter<Self>,
}

impl DbService {
    /// Create a new DbService instance.
    ///
    /// # Arguments
    ///
    /// * `executor` - Shared query executor bound to the configured database file
    pub fn new(executor: Arc<QueryExecutor>) -> Self {
        Self {
            tool_router: build_tool_router(ToolRegistry::new(executor)),
        }
    }
}

#[tool_handler]
impl ServerHandler for DbService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "sqlite-mcp".to_owned(),
                title: Some("SQLite MCP Server".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "CRUD tools for a single SQLite database file.\n\
                \n\
                ## Workflow\n\
                1. Call `get_all_tables` to discover table names\n\
                2. Read rows with `get_all_items` or `get_item`\n\
                3. Write rows with `create_item`, `update_item`, `delete_item`\n\
                4. Use `sqlite_query` for anything else, with `?` placeholders and `parameters`\n\
                \n\
                ## Responses\n\
                Every tool returns `{success, results?, message?, id?, error?}`.\n\
                Check `success` before reading `results`."
                    .to_string(),
            ),
        }
    }
}
