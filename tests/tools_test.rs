//! Integration tests for the CRUD tools and name-based dispatch.
//!
//! Tests verify that:
//! - Each tool builds and runs the right statement against a real database
//! - Responses keep the `success`/`results`/`message`/`id`/`error` shape
//! - Argument problems and engine errors never escape as faults

use serde_json::{Value as JsonValue, json};
use sqlite_mcp_server::db::{DatabaseTarget, QueryExecutor};
use sqlite_mcp_server::models::{ToolInvocation, ToolResponse};
use sqlite_mcp_server::tools::{
    CreateItemInput, DeleteItemInput, GetAllItemsInput, GetItemInput, QueryInput,
    QueryParameters, ToolRegistry, UpdateItemInput,
};
use std::sync::Arc;
use tempfile::TempDir;

/// Temporary database seeded with a `users` and a `products` table.
async fn setup_registry() -> (ToolRegistry, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let target = DatabaseTarget::new(dir.path().join("db").join("test.db"));
    target.provision().await.unwrap();

    let registry = ToolRegistry::new(Arc::new(QueryExecutor::new(target)));
    let query = registry.query_handler();
    for sql in [
        "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL, email TEXT UNIQUE, age INTEGER)",
        "CREATE TABLE products (id INTEGER PRIMARY KEY, name TEXT NOT NULL, price REAL)",
        "INSERT INTO users (name, email, age) VALUES ('Alice', 'alice@example.com', 30)",
        "INSERT INTO users (name, email, age) VALUES ('Bob', 'bob@example.com', 25)",
        "INSERT INTO products (name, price) VALUES ('Laptop', 999.99)",
    ] {
        let response = query.query(raw_query(sql)).await;
        assert!(response.success, "seed failed: {:?}", response.error);
    }

    (registry, dir)
}

fn raw_query(sql: &str) -> QueryInput {
    QueryInput {
        query: sql.to_string(),
        parameters: None,
    }
}

fn data(value: JsonValue) -> serde_json::Map<String, JsonValue> {
    match value {
        JsonValue::Object(map) => map,
        other => panic!("expected object, got {}", other),
    }
}

async fn user_by_id(registry: &ToolRegistry, id: i64) -> Vec<serde_json::Map<String, JsonValue>> {
    let response = registry
        .read_handler()
        .get_item(GetItemInput {
            table_name: "users".to_string(),
            value: json!(id),
            column: "id".to_string(),
        })
        .await;
    assert!(response.success);
    response.result_rows().to_vec()
}

// ==================== sqlite_query ====================

#[tokio::test]
async fn test_query_select_returns_results() {
    let (registry, _dir) = setup_registry().await;
    let response = registry
        .query_handler()
        .query(raw_query("SELECT name FROM users ORDER BY name"))
        .await;

    assert!(response.success);
    assert_eq!(
        json!(response.result_rows()),
        json!([{"name": "Alice"}, {"name": "Bob"}])
    );
    assert!(response.message.is_none());
}

#[tokio::test]
async fn test_query_positional_parameters() {
    let (registry, _dir) = setup_registry().await;
    let response = registry
        .query_handler()
        .query(QueryInput {
            query: "SELECT email FROM users WHERE name = ? AND age = ?".to_string(),
            parameters: Some(QueryParameters::Positional(vec![json!("Bob"), json!(25)])),
        })
        .await;

    assert_eq!(response.result_rows().len(), 1);
    assert_eq!(response.result_rows()[0]["email"], json!("bob@example.com"));
}

#[tokio::test]
async fn test_query_named_parameters_bind_in_key_order() {
    let (registry, _dir) = setup_registry().await;
    let input: QueryInput = serde_json::from_value(json!({
        "query": "SELECT name FROM users WHERE age >= :min AND age <= :max",
        "parameters": {"min": 26, "max": 40}
    }))
    .unwrap();

    let response = registry.query_handler().query(input).await;
    assert_eq!(json!(response.result_rows()), json!([{"name": "Alice"}]));
}

#[tokio::test]
async fn test_query_write_acknowledged() {
    let (registry, _dir) = setup_registry().await;
    let response = registry
        .query_handler()
        .query(QueryInput {
            query: "UPDATE users SET age = age + 1".to_string(),
            parameters: Some(QueryParameters::Positional(vec![])),
        })
        .await;

    assert_eq!(response, ToolResponse::message("Query executed successfully"));
    assert_eq!(user_by_id(&registry, 2).await[0]["age"], json!(26));
}

#[tokio::test]
async fn test_query_arity_mismatch_fails() {
    let (registry, _dir) = setup_registry().await;
    let response = registry
        .query_handler()
        .query(raw_query("SELECT * FROM users WHERE id = ?"))
        .await;

    assert!(!response.success);
    assert!(response.error.unwrap().contains("arity"));
    assert!(response.results.is_none());
}

#[tokio::test]
async fn test_query_oversized_parameter_index_fails() {
    let (registry, _dir) = setup_registry().await;
    let response = registry
        .query_handler()
        .query(QueryInput {
            query: "SELECT ?99999999999999999999999, ?".to_string(),
            parameters: Some(QueryParameters::Positional(vec![json!(1)])),
        })
        .await;

    assert!(!response.success);
    assert!(response.error.unwrap().contains("out of range"));
}

#[tokio::test]
async fn test_dispatch_malformed_data_is_structured_failure() {
    let (registry, _dir) = setup_registry().await;
    let response = registry
        .dispatch(
            ToolInvocation::new("create_item")
                .with_arg("table_name", "users")
                .with_arg("data", "not a mapping"),
        )
        .await;

    assert_eq!(
        serde_json::to_value(&response).unwrap()["success"],
        json!(false)
    );
    assert!(response.error.unwrap().contains("Invalid arguments for create_item"));
}

#[tokio::test]
async fn test_query_rejects_nested_parameter() {
    let (registry, _dir) = setup_registry().await;
    let response = registry
        .query_handler()
        .query(QueryInput {
            query: "SELECT * FROM users WHERE id = ?".to_string(),
            parameters: Some(QueryParameters::Positional(vec![json!([1, 2])])),
        })
        .await;

    assert!(!response.success);
    assert!(response.error.unwrap().starts_with("Invalid input"));
}

// ==================== get_item / get_all_items ====================

#[tokio::test]
async fn test_get_item_by_text_column() {
    let (registry, _dir) = setup_registry().await;
    let response = registry
        .read_handler()
        .get_item(GetItemInput {
            table_name: "users".to_string(),
            value: json!("bob@example.com"),
            column: "email".to_string(),
        })
        .await;

    assert!(response.success);
    assert_eq!(
        json!(response.result_rows()),
        json!([{"id": 2, "name": "Bob", "email": "bob@example.com", "age": 25}])
    );
}

#[tokio::test]
async fn test_get_item_no_match_is_empty_success() {
    let (registry, _dir) = setup_registry().await;
    assert!(user_by_id(&registry, 42).await.is_empty());
}

#[tokio::test]
async fn test_get_item_unknown_column_fails() {
    let (registry, _dir) = setup_registry().await;
    let response = registry
        .read_handler()
        .get_item(GetItemInput {
            table_name: "users".to_string(),
            value: json!(1),
            column: "nickname".to_string(),
        })
        .await;

    assert!(!response.success);
    assert!(response.error.unwrap().contains("no such column"));
}

#[tokio::test]
async fn test_get_all_items() {
    let (registry, _dir) = setup_registry().await;
    let response = registry
        .read_handler()
        .get_all_items(GetAllItemsInput {
            table_name: "products".to_string(),
        })
        .await;

    assert_eq!(
        json!(response.result_rows()),
        json!([{"id": 1, "name": "Laptop", "price": 999.99}])
    );
}

#[tokio::test]
async fn test_get_all_items_unknown_table_fails() {
    let (registry, _dir) = setup_registry().await;
    let response = registry
        .read_handler()
        .get_all_items(GetAllItemsInput {
            table_name: "orders".to_string(),
        })
        .await;

    assert!(!response.success);
    assert!(response.error.unwrap().contains("no such table"));
}

// ==================== get_all_tables / get_db_version ====================

#[tokio::test]
async fn test_get_all_tables_sorted() {
    let (registry, _dir) = setup_registry().await;
    registry
        .query_handler()
        .query(raw_query("CREATE TABLE accounts (id INTEGER PRIMARY KEY)"))
        .await;

    let response = registry.schema_handler().get_all_tables().await;
    assert_eq!(
        json!(response.result_rows()),
        json!([{"name": "accounts"}, {"name": "products"}, {"name": "users"}])
    );
}

#[tokio::test]
async fn test_get_db_version() {
    let (registry, _dir) = setup_registry().await;
    let response = registry.schema_handler().get_db_version().await;

    assert!(response.success);
    let rows = response.result_rows();
    assert_eq!(rows.len(), 1);
    let version = rows[0]["sqlite_version()"].as_str().unwrap();
    assert!(version.starts_with('3'), "unexpected version {}", version);
}

// ==================== create_item / update_item / delete_item ====================

#[tokio::test]
async fn test_create_item_then_get() {
    let (registry, _dir) = setup_registry().await;
    let response = registry
        .write_handler()
        .create_item(CreateItemInput {
            table_name: "users".to_string(),
            data: data(json!({"name": "Carol", "email": "carol@example.com", "age": 41})),
        })
        .await;

    assert!(response.success);
    assert_eq!(response.message.as_deref(), Some("Item created successfully"));
    assert_eq!(response.id, Some(json!(3)));

    let rows = user_by_id(&registry, 3).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], json!("Carol"));
    assert_eq!(rows[0]["age"], json!(41));
}

#[tokio::test]
async fn test_create_item_ids_increase() {
    let (registry, _dir) = setup_registry().await;
    let handler = registry.write_handler();

    let first = handler
        .create_item(CreateItemInput {
            table_name: "products".to_string(),
            data: data(json!({"name": "Tablet", "price": 299.99})),
        })
        .await;
    let second = handler
        .create_item(CreateItemInput {
            table_name: "products".to_string(),
            data: data(json!({"name": "Mouse", "price": null})),
        })
        .await;

    assert_eq!(first.id, Some(json!(2)));
    assert_eq!(second.id, Some(json!(3)));
}

#[tokio::test]
async fn test_create_item_empty_data_rejected() {
    let (registry, _dir) = setup_registry().await;
    let response = registry
        .write_handler()
        .create_item(CreateItemInput {
            table_name: "users".to_string(),
            data: serde_json::Map::new(),
        })
        .await;

    assert!(!response.success);
    assert!(response.error.unwrap().contains("'data' must contain at least one column"));
    assert!(response.id.is_none());
}

#[tokio::test]
async fn test_create_item_constraint_violation() {
    let (registry, _dir) = setup_registry().await;
    let response = registry
        .write_handler()
        .create_item(CreateItemInput {
            table_name: "users".to_string(),
            data: data(json!({"name": "Imposter", "email": "alice@example.com"})),
        })
        .await;

    assert!(!response.success);
    assert!(response.error.unwrap().contains("UNIQUE"));
}

#[tokio::test]
async fn test_update_item_changes_only_given_columns() {
    let (registry, _dir) = setup_registry().await;
    let response = registry
        .write_handler()
        .update_item(UpdateItemInput {
            table_name: "users".to_string(),
            value: json!(1),
            data: data(json!({"age": 31})),
            column: "id".to_string(),
        })
        .await;

    assert_eq!(response, ToolResponse::message("Item updated successfully"));

    let rows = user_by_id(&registry, 1).await;
    assert_eq!(rows[0]["age"], json!(31));
    assert_eq!(rows[0]["name"], json!("Alice"));
    assert_eq!(rows[0]["email"], json!("alice@example.com"));

    // The other row is untouched
    assert_eq!(user_by_id(&registry, 2).await[0]["age"], json!(25));
}

#[tokio::test]
async fn test_update_item_no_match_still_succeeds() {
    let (registry, _dir) = setup_registry().await;
    let response = registry
        .write_handler()
        .update_item(UpdateItemInput {
            table_name: "users".to_string(),
            value: json!(999),
            data: data(json!({"age": 50})),
            column: "id".to_string(),
        })
        .await;

    assert!(response.success);
    assert_eq!(response.message.as_deref(), Some("Item updated successfully"));
}

#[tokio::test]
async fn test_delete_item() {
    let (registry, _dir) = setup_registry().await;
    let response = registry
        .write_handler()
        .delete_item(DeleteItemInput {
            table_name: "users".to_string(),
            value: json!("Bob"),
            column: "name".to_string(),
        })
        .await;

    assert_eq!(response, ToolResponse::message("Item deleted successfully"));
    assert!(user_by_id(&registry, 2).await.is_empty());
    assert_eq!(user_by_id(&registry, 1).await.len(), 1);
}

#[tokio::test]
async fn test_identifiers_are_not_escaped() {
    let (registry, _dir) = setup_registry().await;

    // Column names are spliced into the statement verbatim, so a crafted name
    // can widen the WHERE clause. Values stay bound.
    let response = registry
        .write_handler()
        .delete_item(DeleteItemInput {
            table_name: "users".to_string(),
            value: json!(0),
            column: "id = id OR id".to_string(),
        })
        .await;
    assert!(response.success);

    let remaining = registry
        .read_handler()
        .get_all_items(GetAllItemsInput {
            table_name: "users".to_string(),
        })
        .await;
    assert!(remaining.result_rows().is_empty());
}

// ==================== dispatch ====================

#[tokio::test]
async fn test_dispatch_end_to_end() {
    let (registry, _dir) = setup_registry().await;

    let created = registry
        .dispatch(
            ToolInvocation::new("create_item")
                .with_arg("table_name", "products")
                .with_arg("data", json!({"name": "Tablet", "price": 299.99})),
        )
        .await;
    assert_eq!(created.id, Some(json!(2)));

    let fetched = registry
        .dispatch(
            ToolInvocation::new("get_item")
                .with_arg("table_name", "products")
                .with_arg("value", "Tablet")
                .with_arg("column", "name"),
        )
        .await;
    assert_eq!(
        json!(fetched.result_rows()),
        json!([{"id": 2, "name": "Tablet", "price": 299.99}])
    );

    let tables = registry.dispatch(ToolInvocation::new("get_all_tables")).await;
    assert_eq!(tables.result_rows().len(), 2);
}

#[tokio::test]
async fn test_dispatch_wire_shape() {
    let (registry, _dir) = setup_registry().await;

    let deleted = registry
        .dispatch(
            ToolInvocation::new("delete_item")
                .with_arg("table_name", "products")
                .with_arg("value", 1)
                .with_arg("column", "id"),
        )
        .await;
    assert_eq!(
        serde_json::to_value(&deleted).unwrap(),
        json!({"success": true, "message": "Item deleted successfully"})
    );

    let failed = registry
        .dispatch(ToolInvocation::new("sqlite_query").with_arg("query", "SELECT * FROM nope"))
        .await;
    let wire = serde_json::to_value(&failed).unwrap();
    assert_eq!(wire["success"], json!(false));
    assert!(wire["error"].as_str().unwrap().contains("no such table"));
    assert!(wire.get("results").is_none());
}
