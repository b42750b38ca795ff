//! Statement builders for the item tools.
//!
//! Values are always bound as positional parameters. Table and column names
//! are interpolated verbatim: SQL cannot bind identifiers, and no escaping or
//! allow-listing is applied, so callers able to pick identifiers can inject
//! SQL through them. Deployments facing untrusted callers must restrict
//! identifiers before they reach these builders.

use crate::error::{DbError, DbResult};
use crate::models::{QueryParam, QueryRequest};
use serde_json::Value as JsonValue;

/// Column/value pairs from a `data` argument, in the caller's order.
pub type DataMap = serde_json::Map<String, JsonValue>;

/// Lists every table in the database, ordered by name.
pub const LIST_TABLES: &str = "SELECT name FROM sqlite_master WHERE type='table' ORDER BY name;";

/// Reports the SQLite library version.
pub const DB_VERSION: &str = "SELECT sqlite_version();";

/// `SELECT * FROM <table>;`
pub fn select_all(table: &str) -> QueryRequest {
    QueryRequest::new(format!("SELECT * FROM {};", table))
}

/// `SELECT * FROM <table> WHERE <column> = ?;`
pub fn select_by(table: &str, column: &str, value: QueryParam) -> QueryRequest {
    QueryRequest::new(format!("SELECT * FROM {} WHERE {} = ?;", table, column)).with_param(value)
}

/// `INSERT INTO <table> (<cols>) VALUES (?, ...);` with values in `data` order.
pub fn insert(table: &str, data: DataMap) -> DbResult<QueryRequest> {
    let (columns, params) = split_data(data)?;
    let placeholders = vec!["?"; columns.len()].join(", ");
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({});",
        table,
        columns.join(", "),
        placeholders
    );
    Ok(QueryRequest::new(sql).with_params(params))
}

/// `UPDATE <table> SET c1 = ?, ... WHERE <column> = ?;`
///
/// The data values are bound first and the match value last, following the
/// clause order.
pub fn update(
    table: &str,
    column: &str,
    value: QueryParam,
    data: DataMap,
) -> DbResult<QueryRequest> {
    let (columns, mut params) = split_data(data)?;
    let set_clause = columns
        .iter()
        .map(|c| format!("{} = ?", c))
        .collect::<Vec<_>>()
        .join(", ");
    params.push(value);
    let sql = format!("UPDATE {} SET {} WHERE {} = ?;", table, set_clause, column);
    Ok(QueryRequest::new(sql).with_params(params))
}

/// `DELETE FROM <table> WHERE <column> = ?;`
pub fn delete(table: &str, column: &str, value: QueryParam) -> QueryRequest {
    QueryRequest::new(format!("DELETE FROM {} WHERE {} = ?;", table, column)).with_param(value)
}

/// Split a data mapping into column names and bind values.
///
/// An empty mapping is rejected here rather than producing `VALUES ()` or an
/// empty `SET` clause for the engine to choke on.
fn split_data(data: DataMap) -> DbResult<(Vec<String>, Vec<QueryParam>)> {
    if data.is_empty() {
        return Err(DbError::invalid_input(
            "'data' must contain at least one column",
        ));
    }

    let mut columns = Vec::with_capacity(data.len());
    let mut params = Vec::with_capacity(data.len());
    for (column, value) in data {
        let param = QueryParam::from_json(value, &format!("data.{}", column))?;
        columns.push(column);
        params.push(param);
    }
    Ok((columns, params))
}
