//! SQLite value to JSON mappings.
//!
//! SQLite is dynamically typed: a column's declared type is only an affinity,
//! and any cell may hold any storage class. Values are therefore decoded by
//! the storage class of the cell itself rather than the declared column type.

use serde_json::Value as JsonValue;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};

use crate::models::Row as JsonRow;

// =============================================================================
// Storage Classes
// =============================================================================

/// SQLite storage class of a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageClass {
    Null,
    Integer,
    Real,
    Text,
    Blob,
}

impl StorageClass {
    /// Classify a runtime type name reported by the driver.
    ///
    /// The driver reports NULL, INTEGER, REAL, TEXT or BLOB for cell values;
    /// declared-type names (BOOLEAN, NUMERIC, DATETIME...) are folded into the
    /// storage class SQLite would use for them.
    pub fn from_type_name(type_name: &str) -> Self {
        let upper = type_name.to_ascii_uppercase();
        match upper.as_str() {
            "NULL" => Self::Null,
            "REAL" | "FLOAT" | "DOUBLE" => Self::Real,
            "BLOB" => Self::Blob,
            "TEXT" | "DATE" | "TIME" | "DATETIME" => Self::Text,
            _ if upper.contains("INT") || upper == "BOOLEAN" || upper == "NUMERIC" => {
                Self::Integer
            }
            _ => Self::Text,
        }
    }
}

// =============================================================================
// Binary Encoding
// =============================================================================

/// Decode binary data to JSON value.
///
/// Valid UTF-8 is returned as text; anything else is base64 encoded.
pub fn decode_binary_value(bytes: &[u8]) -> JsonValue {
    use base64::{Engine as _, engine::general_purpose::STANDARD};

    match std::str::from_utf8(bytes) {
        Ok(s) => JsonValue::String(s.to_string()),
        Err(_) => JsonValue::String(STANDARD.encode(bytes)),
    }
}

// =============================================================================
// Row to JSON
// =============================================================================

/// Trait for converting database rows to JSON maps.
pub trait RowToJson {
    fn to_json_map(&self) -> JsonRow;
}

impl RowToJson for SqliteRow {
    fn to_json_map(&self) -> JsonRow {
        self.columns()
            .iter()
            .enumerate()
            .map(|(idx, col)| (col.name().to_string(), decode_column(self, idx)))
            .collect()
    }
}

/// Decode one cell according to its runtime storage class.
fn decode_column(row: &SqliteRow, idx: usize) -> JsonValue {
    let class = match row.try_get_raw(idx) {
        Ok(value) if value.is_null() => StorageClass::Null,
        Ok(value) => StorageClass::from_type_name(value.type_info().name()),
        Err(_) => return JsonValue::Null,
    };

    match class {
        StorageClass::Null => JsonValue::Null,
        StorageClass::Integer => decode_integer(row, idx),
        StorageClass::Real => decode_real(row, idx),
        StorageClass::Blob => decode_blob(row, idx),
        StorageClass::Text => decode_text(row, idx),
    }
}

fn decode_integer(row: &SqliteRow, idx: usize) -> JsonValue {
    row.try_get::<Option<i64>, _>(idx)
        .ok()
        .flatten()
        .map(|v| JsonValue::Number(v.into()))
        .unwrap_or(JsonValue::Null)
}

fn decode_real(row: &SqliteRow, idx: usize) -> JsonValue {
    if let Ok(Some(v)) = row.try_get::<Option<f64>, _>(idx) {
        return serde_json::Number::from_f64(v)
            .map(JsonValue::Number)
            .unwrap_or_else(|| JsonValue::String(v.to_string()));
    }
    JsonValue::Null
}

fn decode_blob(row: &SqliteRow, idx: usize) -> JsonValue {
    row.try_get::<Option<Vec<u8>>, _>(idx)
        .ok()
        .flatten()
        .map(|v| decode_binary_value(&v))
        .unwrap_or(JsonValue::Null)
}

fn decode_text(row: &SqliteRow, idx: usize) -> JsonValue {
    row.try_get::<Option<String>, _>(idx)
        .ok()
        .flatten()
        .map(JsonValue::String)
        .unwrap_or(JsonValue::Null)
}
