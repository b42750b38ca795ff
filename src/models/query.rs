//! Query-related data models.
//!
//! This module defines types for SQL query requests and results.

use crate::error::{DbError, DbResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A result row: column name to value, in the column order reported by SQLite.
pub type Row = serde_json::Map<String, JsonValue>;

/// A scalar value bound to a positional placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum QueryParam {
    /// NULL value
    Null,
    /// Boolean value (SQLite stores it as 0/1)
    Bool(bool),
    /// Integer value (stored as i64 for maximum range)
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value
    String(String),
}

impl QueryParam {
    /// Get the type name of this parameter for debugging.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
        }
    }

    /// Convert a loosely typed JSON value into a bind parameter.
    ///
    /// `context` names the argument in the error message (e.g. `data.age`).
    /// Arrays and objects are not scalars and are rejected.
    pub fn from_json(value: JsonValue, context: &str) -> DbResult<Self> {
        match value {
            JsonValue::Null => Ok(Self::Null),
            JsonValue::Bool(v) => Ok(Self::Bool(v)),
            JsonValue::Number(n) => {
                if let Some(v) = n.as_i64() {
                    Ok(Self::Int(v))
                } else if let Some(v) = n.as_f64() {
                    Ok(Self::Float(v))
                } else {
                    Err(DbError::invalid_input(format!(
                        "'{}' is out of range for an SQLite integer: {}",
                        context, n
                    )))
                }
            }
            JsonValue::String(v) => Ok(Self::String(v)),
            JsonValue::Array(_) => Err(DbError::invalid_input(format!(
                "'{}' must be a scalar (string, number, bool or null), got an array",
                context
            ))),
            JsonValue::Object(_) => Err(DbError::invalid_input(format!(
                "'{}' must be a scalar (string, number, bool or null), got an object",
                context
            ))),
        }
    }
}

impl From<&str> for QueryParam {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for QueryParam {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<i64> for QueryParam {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for QueryParam {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for QueryParam {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

/// A single statement plus its positional parameters. Built fresh per call.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub sql: String,
    pub params: Vec<QueryParam>,
}

impl QueryRequest {
    /// Create a new request without parameters.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Add a parameter to this query.
    pub fn with_param(mut self, param: impl Into<QueryParam>) -> Self {
        self.params.push(param.into());
        self
    }

    /// Replace the parameter list.
    pub fn with_params(mut self, params: Vec<QueryParam>) -> Self {
        self.params = params;
        self
    }
}

/// Outcome of one executor call. Exactly one variant is ever produced.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    /// Rows fetched by a read statement.
    Rows(Vec<Row>),
    /// A write statement completed and was committed.
    Ack {
        rows_affected: u64,
        /// `last_insert_rowid()` on the connection that ran the statement
        last_insert_id: i64,
    },
    /// Anything that went wrong, stringified.
    Failure { message: String },
}

impl QueryResult {
    /// Build a failure result from an error.
    pub fn failure(err: impl std::fmt::Display) -> Self {
        Self::Failure {
            message: err.to_string(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    /// Rows of a read result, if this is one.
    pub fn rows(&self) -> Option<&[Row]> {
        match self {
            Self::Rows(rows) => Some(rows),
            _ => None,
        }
    }

    /// Rows affected by a write result, if this is one.
    pub fn rows_affected(&self) -> Option<u64> {
        match self {
            Self::Ack { rows_affected, .. } => Some(*rows_affected),
            _ => None,
        }
    }
}
