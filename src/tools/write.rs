//! Write operation tools.
//!
//! This module implements the `create_item`, `update_item` and `delete_item`
//! tools. Each builds one statement, runs it through the executor and reports
//! a fixed success message.

use crate::db::QueryExecutor;
use crate::models::{QueryParam, QueryResult, ToolResponse};
use crate::tools::statement::{self, DataMap};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::info;

/// Input for the create_item tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateItemInput {
    /// Table to insert into
    pub table_name: String,
    /// Column names and their values; columns are inserted in the given order
    pub data: DataMap,
}

/// Input for the update_item tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateItemInput {
    /// Table to update
    pub table_name: String,
    /// Value identifying the rows to update
    pub value: JsonValue,
    /// Column names and their new values
    pub data: DataMap,
    /// Column compared against `value`
    pub column: String,
}

/// Input for the delete_item tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteItemInput {
    /// Table to delete from
    pub table_name: String,
    /// Value identifying the rows to delete
    pub value: JsonValue,
    /// Column compared against `value`
    pub column: String,
}

pub struct WriteToolHandler {
    executor: Arc<QueryExecutor>,
}

impl WriteToolHandler {
    pub fn new(executor: Arc<QueryExecutor>) -> Self {
        Self { executor }
    }

    pub async fn create_item(&self, input: CreateItemInput) -> ToolResponse {
        let request = match statement::insert(&input.table_name, input.data) {
            Ok(request) => request,
            Err(e) => return ToolResponse::failure(e),
        };

        match self.executor.execute_request(&request).await {
            QueryResult::Ack { last_insert_id, .. } => {
                info!(table = %input.table_name, id = last_insert_id, "Item created");
                ToolResponse::created("Item created successfully", last_insert_id)
            }
            other => ToolResponse::from(other),
        }
    }

    pub async fn update_item(&self, input: UpdateItemInput) -> ToolResponse {
        let value = match QueryParam::from_json(input.value, "value") {
            Ok(value) => value,
            Err(e) => return ToolResponse::failure(e),
        };
        let request = match statement::update(&input.table_name, &input.column, value, input.data)
        {
            Ok(request) => request,
            Err(e) => return ToolResponse::failure(e),
        };

        match self.executor.execute_request(&request).await {
            QueryResult::Ack { rows_affected, .. } => {
                info!(table = %input.table_name, rows_affected, "Item updated");
                ToolResponse::message("Item updated successfully")
            }
            other => ToolResponse::from(other),
        }
    }

    pub async fn delete_item(&self, input: DeleteItemInput) -> ToolResponse {
        let value = match QueryParam::from_json(input.value, "value") {
            Ok(value) => value,
            Err(e) => return ToolResponse::failure(e),
        };
        let request = statement::delete(&input.table_name, &input.column, value);

        match self.executor.execute_request(&request).await {
            QueryResult::Ack { rows_affected, .. } => {
                info!(table = %input.table_name, rows_affected, "Item deleted");
                ToolResponse::message("Item deleted successfully")
            }
            other => ToolResponse::from(other),
        }
    }
}
