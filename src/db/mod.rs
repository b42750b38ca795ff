//! Database access layer.
//!
//! This module provides database access functionality:
//! - Per-call connections and startup provisioning
//! - Query execution
//! - Parameter binding and placeholder counting
//! - SQLite value to JSON mappings

pub mod connection;
pub mod executor;
pub mod params;
pub mod types;

pub use connection::DatabaseTarget;
pub use executor::{QueryExecutor, is_read_statement};
pub use params::placeholder_count;
