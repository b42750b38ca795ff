//! Tool invocation and response models.
//!
//! The response field names (`success`, `results`, `message`, `id`, `error`)
//! are part of the wire contract and must not be renamed.

use crate::models::query::{QueryResult, Row};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A named tool call with loosely typed arguments.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolInvocation {
    pub name: String,
    #[serde(default)]
    pub arguments: serde_json::Map<String, JsonValue>,
}

impl ToolInvocation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: serde_json::Map::new(),
        }
    }

    /// Add an argument.
    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }
}

/// Uniform response shape shared by every tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ToolResponse {
    /// Whether the operation succeeded
    pub success: bool,
    /// Rows returned by a read operation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<Row>>,
    /// Human-readable outcome of a write operation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Row id assigned to a newly created row
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<JsonValue>,
    /// Error message when `success` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResponse {
    /// Successful read.
    pub fn rows(rows: Vec<Row>) -> Self {
        Self {
            success: true,
            results: Some(rows),
            ..Self::default()
        }
    }

    /// Successful write with a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Successful insert carrying the new row id.
    pub fn created(message: impl Into<String>, id: impl Into<JsonValue>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Failed call.
    pub fn failure(error: impl std::fmt::Display) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            ..Self::default()
        }
    }

    /// Rows of a successful read, or an empty slice.
    pub fn result_rows(&self) -> &[Row] {
        self.results.as_deref().unwrap_or_default()
    }
}

/// Generic mapping used by passthrough tools: rows stay rows, writes get the
/// standard acknowledgement message.
impl From<QueryResult> for ToolResponse {
    fn from(result: QueryResult) -> Self {
        match result {
            QueryResult::Rows(rows) => Self::rows(rows),
            QueryResult::Ack { .. } => Self::message("Query executed successfully"),
            QueryResult::Failure { message } => Self::failure(message),
        }
    }
}
