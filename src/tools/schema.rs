//! Database introspection tools.
//!
//! This module implements the `get_all_tables` and `get_db_version` tools.
//! Both run a fixed read-only statement and take no arguments.

use crate::db::QueryExecutor;
use crate::models::{QueryRequest, ToolResponse};
use crate::tools::statement;
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

/// Input for tools that take no arguments.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct NoArguments {}

pub struct SchemaToolHandler {
    executor: Arc<QueryExecutor>,
}

impl SchemaToolHandler {
    pub fn new(executor: Arc<QueryExecutor>) -> Self {
        Self { executor }
    }

    /// List every table, ordered by name. Each row has a single `name` column.
    pub async fn get_all_tables(&self) -> ToolResponse {
        let request = QueryRequest::new(statement::LIST_TABLES);
        let response = ToolResponse::from(self.executor.execute_request(&request).await);

        info!(count = response.result_rows().len(), "Listed tables");
        response
    }

    /// Report the SQLite library version as a single `sqlite_version()` row.
    pub async fn get_db_version(&self) -> ToolResponse {
        let request = QueryRequest::new(statement::DB_VERSION);
        ToolResponse::from(self.executor.execute_request(&request).await)
    }
}
