//! Raw query tool.
//!
//! This module implements the `sqlite_query` tool: the statement is passed to
//! the executor as given, with optional parameters bound positionally.

use crate::db::QueryExecutor;
use crate::error::DbResult;
use crate::models::{QueryParam, ToolResponse};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::info;

/// Input for the sqlite_query tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct QueryInput {
    /// SQL statement to execute. SELECT statements return rows; anything else is executed and committed.
    pub query: String,
    /// Optional parameters for `?` placeholders: an array, or an object whose values are bound in key order
    #[serde(default)]
    pub parameters: Option<QueryParameters>,
}

/// Parameters supplied to a raw query.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum QueryParameters {
    /// Values bound in array order
    Positional(Vec<JsonValue>),
    /// Values bound in the order the keys were given
    Named(serde_json::Map<String, JsonValue>),
}

impl QueryParameters {
    /// Flatten into positional bind values.
    pub fn into_params(self) -> DbResult<Vec<QueryParam>> {
        match self {
            Self::Positional(values) => values
                .into_iter()
                .enumerate()
                .map(|(i, v)| QueryParam::from_json(v, &format!("parameters[{}]", i)))
                .collect(),
            Self::Named(map) => map
                .into_iter()
                .map(|(k, v)| QueryParam::from_json(v, &format!("parameters.{}", k)))
                .collect(),
        }
    }
}

pub struct QueryToolHandler {
    executor: Arc<QueryExecutor>,
}

impl QueryToolHandler {
    pub fn new(executor: Arc<QueryExecutor>) -> Self {
        Self { executor }
    }

    pub async fn query(&self, input: QueryInput) -> ToolResponse {
        let params = match input.parameters.map(QueryParameters::into_params) {
            Some(Ok(params)) => params,
            Some(Err(e)) => return ToolResponse::failure(e),
            None => Vec::new(),
        };

        let response = ToolResponse::from(self.executor.execute(&input.query, &params).await);

        info!(
            params = params.len(),
            success = response.success,
            rows = response.results.as_ref().map(Vec::len),
            "Raw query executed"
        );

        response
    }
}
