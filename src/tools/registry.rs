//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - The registration list of (name, description, handler) triples
//! - Name-based dispatch with per-tool argument validation
//!
//! Dispatch never fails: unknown names and malformed arguments come back in
//! the same `{success: false, error}` shape as database errors.

use crate::db::QueryExecutor;
use crate::error::DbError;
use crate::models::{ToolInvocation, ToolResponse};
use crate::tools::query::{QueryInput, QueryToolHandler};
use crate::tools::read::{GetAllItemsInput, GetItemInput, ReadToolHandler};
use crate::tools::schema::SchemaToolHandler;
use crate::tools::write::{CreateItemInput, DeleteItemInput, UpdateItemInput, WriteToolHandler};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::{info, warn};

/// Handler a registered tool name is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Query,
    GetItem,
    GetAllItems,
    GetAllTables,
    CreateItem,
    UpdateItem,
    DeleteItem,
    DbVersion,
}

/// One registered tool.
#[derive(Debug, Clone, Copy)]
pub struct ToolRegistration {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: ToolKind,
}

pub const TOOLS: &[ToolRegistration] = &[
    ToolRegistration {
        name: "sqlite_query",
        description: "Execute a SQL query on the SQLite database",
        kind: ToolKind::Query,
    },
    ToolRegistration {
        name: "get_item",
        description: "Retrieve the rows of a table whose column matches a value",
        kind: ToolKind::GetItem,
    },
    ToolRegistration {
        name: "get_all_items",
        description: "Retrieve all rows from a specified table in the SQLite database",
        kind: ToolKind::GetAllItems,
    },
    ToolRegistration {
        name: "get_all_tables",
        description: "Returns a list of all table names in the SQLite database",
        kind: ToolKind::GetAllTables,
    },
    ToolRegistration {
        name: "create_item",
        description: "Create a new row in a specified table",
        kind: ToolKind::CreateItem,
    },
    ToolRegistration {
        name: "update_item",
        description: "Update existing rows in a specified table",
        kind: ToolKind::UpdateItem,
    },
    ToolRegistration {
        name: "delete_item",
        description: "Delete rows from a specified table",
        kind: ToolKind::DeleteItem,
    },
    ToolRegistration {
        name: "get_db_version",
        description: "Returns the version of the SQLite database",
        kind: ToolKind::DbVersion,
    },
];

/// Find a registration by tool name.
pub fn lookup(name: &str) -> Option<&'static ToolRegistration> {
    TOOLS.iter().find(|t| t.name == name)
}

/// Tool registry - routes invocations to handlers sharing one executor.
#[derive(Clone)]
pub struct ToolRegistry {
    executor: Arc<QueryExecutor>,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new(executor: Arc<QueryExecutor>) -> Self {
        Self { executor }
    }

    pub fn query_handler(&self) -> QueryToolHandler {
        QueryToolHandler::new(self.executor.clone())
    }

    pub fn read_handler(&self) -> ReadToolHandler {
        ReadToolHandler::new(self.executor.clone())
    }

    pub fn write_handler(&self) -> WriteToolHandler {
        WriteToolHandler::new(self.executor.clone())
    }

    pub fn schema_handler(&self) -> SchemaToolHandler {
        SchemaToolHandler::new(self.executor.clone())
    }

    /// Dispatch a tool call by name.
    pub async fn dispatch(&self, invocation: ToolInvocation) -> ToolResponse {
        let Some(registration) = lookup(&invocation.name) else {
            warn!(tool = %invocation.name, "Unknown tool requested");
            return ToolResponse::failure(DbError::invalid_input(format!(
                "Unknown tool: {}",
                invocation.name
            )));
        };

        info!(tool = registration.name, "Dispatching tool call");
        let args = JsonValue::Object(invocation.arguments);

        match registration.kind {
            ToolKind::Query => match parse_args::<QueryInput>(registration.name, args) {
                Ok(input) => self.query_handler().query(input).await,
                Err(response) => response,
            },
            ToolKind::GetItem => match parse_args::<GetItemInput>(registration.name, args) {
                Ok(input) => self.read_handler().get_item(input).await,
                Err(response) => response,
            },
            ToolKind::GetAllItems => match parse_args::<GetAllItemsInput>(registration.name, args)
            {
                Ok(input) => self.read_handler().get_all_items(input).await,
                Err(response) => response,
            },
            ToolKind::GetAllTables => self.schema_handler().get_all_tables().await,
            ToolKind::CreateItem => match parse_args::<CreateItemInput>(registration.name, args) {
                Ok(input) => self.write_handler().create_item(input).await,
                Err(response) => response,
            },
            ToolKind::UpdateItem => match parse_args::<UpdateItemInput>(registration.name, args) {
                Ok(input) => self.write_handler().update_item(input).await,
                Err(response) => response,
            },
            ToolKind::DeleteItem => match parse_args::<DeleteItemInput>(registration.name, args) {
                Ok(input) => self.write_handler().delete_item(input).await,
                Err(response) => response,
            },
            ToolKind::DbVersion => self.schema_handler().get_db_version().await,
        }
    }
}

/// Validate loosely typed arguments against a tool's input type.
fn parse_args<T: DeserializeOwned>(tool: &str, args: JsonValue) -> Result<T, ToolResponse> {
    serde_json::from_value(args).map_err(|e| {
        warn!(tool, error = %e, "Invalid tool arguments");
        ToolResponse::failure(DbError::invalid_input(format!(
            "Invalid arguments for {}: {}",
            tool, e
        )))
    })
}
