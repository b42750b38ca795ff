//! Data models for the SQLite MCP Server.
//!
//! This module re-exports all model types used throughout the application.

pub mod query;
pub mod tool;

// Re-export commonly used types
pub use query::{QueryParam, QueryRequest, QueryResult, Row};
pub use tool::{ToolInvocation, ToolResponse};
