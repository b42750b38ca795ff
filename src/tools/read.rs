//! Row lookup tools.
//!
//! This module implements `get_item` (rows matching one column value) and
//! `get_all_items` (every row of a table).

use crate::db::QueryExecutor;
use crate::models::{QueryParam, ToolResponse};
use crate::tools::statement;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::info;

/// Input for the get_item tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetItemInput {
    /// Table to read from
    pub table_name: String,
    /// Value to match (bound as a parameter)
    pub value: JsonValue,
    /// Column compared against `value`
    pub column: String,
}

/// Input for the get_all_items tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetAllItemsInput {
    /// Table to read from
    pub table_name: String,
}

pub struct ReadToolHandler {
    executor: Arc<QueryExecutor>,
}

impl ReadToolHandler {
    pub fn new(executor: Arc<QueryExecutor>) -> Self {
        Self { executor }
    }

    pub async fn get_item(&self, input: GetItemInput) -> ToolResponse {
        let value = match QueryParam::from_json(input.value, "value") {
            Ok(value) => value,
            Err(e) => return ToolResponse::failure(e),
        };

        let request = statement::select_by(&input.table_name, &input.column, value);
        let response = ToolResponse::from(self.executor.execute_request(&request).await);

        info!(
            table = %input.table_name,
            column = %input.column,
            rows = response.result_rows().len(),
            "Item lookup"
        );

        response
    }

    pub async fn get_all_items(&self, input: GetAllItemsInput) -> ToolResponse {
        let request = statement::select_all(&input.table_name);
        let response = ToolResponse::from(self.executor.execute_request(&request).await);

        info!(
            table = %input.table_name,
            rows = response.result_rows().len(),
            "Table scan"
        );

        response
    }
}
