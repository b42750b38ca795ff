//! MCP tool implementations.
//!
//! This module contains all database tool handlers:
//! - `sqlite_query`: Execute a raw statement
//! - `get_item` / `get_all_items`: Read rows
//! - `create_item` / `update_item` / `delete_item`: Write rows
//! - `get_all_tables` / `get_db_version`: Introspection
//! - `statement`: Statement builders shared by the item tools
//! - `registry`: Registration list and name-based dispatch

pub mod query;
pub mod read;
pub mod registry;
pub mod schema;
pub mod statement;
pub mod write;

pub use query::{QueryInput, QueryParameters, QueryToolHandler};
pub use read::{GetAllItemsInput, GetItemInput, ReadToolHandler};
pub use registry::{TOOLS, ToolKind, ToolRegistration, ToolRegistry};
pub use schema::{NoArguments, SchemaToolHandler};
pub use write::{CreateItemInput, DeleteItemInput, UpdateItemInput, WriteToolHandler};
