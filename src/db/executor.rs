//! Query execution engine.
//!
//! Every tool funnels through [`QueryExecutor::execute`]. One call means:
//! open a connection, run one statement, shape the outcome, close the
//! connection. Nothing survives the call.
//!
//! Statements are classified as reads or writes by a textual heuristic: a
//! statement whose first keyword (after leading whitespace) is `SELECT`,
//! case-insensitively, is a read. This is not a parse; `WITH ... SELECT`,
//! `PRAGMA` and `EXPLAIN` run as writes and return an acknowledgement.

use crate::db::connection::DatabaseTarget;
use crate::db::params::{build_query, placeholder_count};
use crate::db::types::RowToJson;
use crate::error::{DbError, DbResult};
use crate::models::{QueryParam, QueryRequest, QueryResult};
use sqlx::sqlite::{SqliteConnection, SqliteQueryResult, SqliteRow};
use sqlx::{Connection, Executor};
use std::time::Instant;
use tracing::{debug, error, warn};

/// Whether `sql` is treated as a read statement.
pub fn is_read_statement(sql: &str) -> bool {
    sql.trim_start()
        .get(..6)
        .is_some_and(|head| head.eq_ignore_ascii_case("select"))
}

/// Query executor bound to one database file.
#[derive(Debug, Clone)]
pub struct QueryExecutor {
    target: DatabaseTarget,
}

impl QueryExecutor {
    /// Create a new query executor for the given database.
    pub fn new(target: DatabaseTarget) -> Self {
        Self { target }
    }

    /// Execute one statement with positional parameters.
    ///
    /// Never fails: every error is returned as [`QueryResult::Failure`].
    pub async fn execute(&self, sql: &str, params: &[QueryParam]) -> QueryResult {
        let start = Instant::now();

        debug!(
            sql = %sql,
            params = ?params.iter().map(QueryParam::type_name).collect::<Vec<_>>(),
            "Executing statement"
        );

        match self.try_execute(sql, params).await {
            Ok(result) => {
                debug!(
                    execution_time_ms = start.elapsed().as_millis() as u64,
                    "Statement completed"
                );
                result
            }
            Err(e) => {
                error!(error = %e, "Error executing query");
                QueryResult::failure(e)
            }
        }
    }

    /// Execute a prepared [`QueryRequest`].
    pub async fn execute_request(&self, request: &QueryRequest) -> QueryResult {
        self.execute(&request.sql, &request.params).await
    }

    async fn try_execute(&self, sql: &str, params: &[QueryParam]) -> DbResult<QueryResult> {
        let expected = placeholder_count(sql)?;
        if expected != params.len() {
            return Err(DbError::binding_arity(expected, params.len()));
        }

        let mut conn = self.target.connect().await?;

        let outcome = if is_read_statement(sql) {
            fetch_rows(&mut conn, sql, params)
                .await
                .map(|rows| QueryResult::Rows(rows.iter().map(RowToJson::to_json_map).collect()))
        } else {
            execute_write(&mut conn, sql, params)
                .await
                .map(|done| QueryResult::Ack {
                    rows_affected: done.rows_affected(),
                    last_insert_id: done.last_insert_rowid(),
                })
        };

        // Close on both paths; a failed close does not change the outcome.
        if let Err(e) = conn.close().await {
            warn!(error = %e, "Failed to close database connection");
        }

        outcome
    }
}

async fn fetch_rows(
    conn: &mut SqliteConnection,
    sql: &str,
    params: &[QueryParam],
) -> DbResult<Vec<SqliteRow>> {
    // Without params, run the raw SQL so multi-statement text behaves like the CLI
    let rows = if params.is_empty() {
        (&mut *conn).fetch_all(sql).await?
    } else {
        build_query(sql, params).fetch_all(&mut *conn).await?
    };
    Ok(rows)
}

/// Run a write statement in autocommit mode: SQLite commits it as soon as it
/// completes, so the change is durable once this returns.
async fn execute_write(
    conn: &mut SqliteConnection,
    sql: &str,
    params: &[QueryParam],
) -> DbResult<SqliteQueryResult> {
    let done = if params.is_empty() {
        (&mut *conn).execute(sql).await?
    } else {
        build_query(sql, params).execute(&mut *conn).await?
    };
    Ok(done)
}
