//! Parameter binding utilities for SQLite statements.
//!
//! Binds `QueryParam` values to sqlx queries and counts the parameter slots a
//! statement declares, so arity mismatches are reported instead of silently
//! binding NULL to the missing slots.

use crate::error::{DbError, DbResult};
use crate::models::QueryParam;
use sqlx::Sqlite;
use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;
use std::collections::HashSet;

/// Largest parameter index SQLite accepts (`SQLITE_MAX_VARIABLE_NUMBER`).
pub const MAX_PARAMETER_INDEX: usize = 32766;

/// Prepare `sql` with every parameter bound in order.
pub(crate) fn build_query<'q>(
    sql: &'q str,
    params: &'q [QueryParam],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    params
        .iter()
        .fold(sqlx::query(sql), |query, param| bind_sqlite_param(query, param))
}

/// Bind a parameter to a SQLite query.
fn bind_sqlite_param<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    param: &'q QueryParam,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match param {
        QueryParam::Null => query.bind(None::<String>),
        QueryParam::Bool(v) => query.bind(*v),
        QueryParam::Int(v) => query.bind(*v),
        QueryParam::Float(v) => query.bind(*v),
        QueryParam::String(v) => query.bind(v.as_str()),
    }
}

/// Count the parameter slots in `sql` the way SQLite numbers them.
///
/// `?` takes the next index, `?NNN` sets the index explicitly, and each
/// distinct `:name`, `@name` or `$name` takes one index on first use. The
/// result is the largest index used, matching `sqlite3_bind_parameter_count`.
/// String literals, quoted identifiers and comments are skipped.
///
/// `?0` and any index above [`MAX_PARAMETER_INDEX`] are rejected, as SQLite
/// itself would refuse to prepare the statement.
pub fn placeholder_count(sql: &str) -> DbResult<usize> {
    let chars: Vec<char> = sql.chars().collect();
    let mut max_index = 0usize;
    let mut named: HashSet<String> = HashSet::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            quote @ ('\'' | '"' | '`') => {
                i = skip_quoted(&chars, i + 1, quote);
            }
            '[' => {
                i = skip_until(&chars, i + 1, ']');
            }
            '-' if chars.get(i + 1) == Some(&'-') => {
                i = skip_until(&chars, i + 2, '\n');
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                i = skip_block_comment(&chars, i + 2);
            }
            '?' => {
                let start = i + 1;
                let mut end = start;
                while end < chars.len() && chars[end].is_ascii_digit() {
                    end += 1;
                }
                if end > start {
                    let digits: String = chars[start..end].iter().collect();
                    let index = digits
                        .parse::<usize>()
                        .ok()
                        .filter(|n| (1..=MAX_PARAMETER_INDEX).contains(n))
                        .ok_or_else(|| index_out_of_range(&digits))?;
                    max_index = max_index.max(index);
                } else {
                    max_index = next_index(max_index)?;
                }
                i = end;
            }
            prefix @ (':' | '@' | '$') => {
                let start = i + 1;
                let mut end = start;
                while end < chars.len() && (chars[end].is_alphanumeric() || chars[end] == '_') {
                    end += 1;
                }
                if end > start {
                    let name: String = std::iter::once(prefix)
                        .chain(chars[start..end].iter().copied())
                        .collect();
                    if named.insert(name) {
                        max_index = next_index(max_index)?;
                    }
                }
                i = end.max(i + 1);
            }
            _ => i += 1,
        }
    }

    Ok(max_index)
}

fn next_index(current: usize) -> DbResult<usize> {
    current
        .checked_add(1)
        .filter(|n| *n <= MAX_PARAMETER_INDEX)
        .ok_or_else(|| {
            DbError::invalid_input(format!(
                "Too many SQL parameters: at most {} are allowed",
                MAX_PARAMETER_INDEX
            ))
        })
}

fn index_out_of_range(digits: &str) -> DbError {
    DbError::invalid_input(format!(
        "Parameter index ?{} is out of range: expected 1 to {}",
        digits, MAX_PARAMETER_INDEX
    ))
}

/// Skip a quoted run; a doubled quote is an escaped quote.
fn skip_quoted(chars: &[char], mut i: usize, quote: char) -> usize {
    while i < chars.len() {
        if chars[i] == quote {
            if chars.get(i + 1) == Some(&quote) {
                i += 2;
                continue;
            }
            return i + 1;
        }
        i += 1;
    }
    i
}

fn skip_until(chars: &[char], mut i: usize, end: char) -> usize {
    while i < chars.len() && chars[i] != end {
        i += 1;
    }
    i + 1
}

fn skip_block_comment(chars: &[char], mut i: usize) -> usize {
    while i + 1 < chars.len() {
        if chars[i] == '*' && chars[i + 1] == '/' {
            return i + 2;
        }
        i += 1;
    }
    chars.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_placeholders() {
        assert_eq!(placeholder_count("SELECT * FROM users").unwrap(), 0);
        assert_eq!(placeholder_count("").unwrap(), 0);
    }

    #[test]
    fn test_anonymous_placeholders() {
        assert_eq!(
            placeholder_count("INSERT INTO users (name, email, age) VALUES (?, ?, ?)").unwrap(),
            3
        );
        assert_eq!(
            placeholder_count("UPDATE users SET age = ? WHERE id = ?;").unwrap(),
            2
        );
    }

    #[test]
    fn test_numbered_placeholders() {
        assert_eq!(placeholder_count("SELECT ?2, ?1").unwrap(), 2);
        assert_eq!(placeholder_count("SELECT ?1, ?1").unwrap(), 1);
        // `?` after `?5` continues from the largest index
        assert_eq!(placeholder_count("SELECT ?5, ?").unwrap(), 6);
    }

    #[test]
    fn test_named_placeholders() {
        assert_eq!(placeholder_count("SELECT * FROM t WHERE a = :a AND b = :a").unwrap(), 1);
        assert_eq!(placeholder_count("SELECT :a, @b, $c").unwrap(), 3);
    }

    #[test]
    fn test_ignores_literals_and_comments() {
        assert_eq!(placeholder_count("SELECT '?' , \"?\", `?`, [?] FROM t").unwrap(), 0);
        assert_eq!(placeholder_count("SELECT 'it''s ?' WHERE a = ?").unwrap(), 1);
        assert_eq!(placeholder_count("SELECT 1 -- what?\nWHERE a = ?").unwrap(), 1);
        assert_eq!(placeholder_count("SELECT /* ? ? */ ?").unwrap(), 1);
        assert_eq!(placeholder_count("SELECT '12:30'").unwrap(), 0);
    }

    #[test]
    fn test_unterminated_literal_does_not_panic() {
        assert_eq!(placeholder_count("SELECT 'abc ?").unwrap(), 0);
        assert_eq!(placeholder_count("SELECT /* ?").unwrap(), 0);
        assert_eq!(placeholder_count("SELECT ? -- tail").unwrap(), 1);
    }

    #[test]
    fn test_out_of_range_index_rejected() {
        let err = placeholder_count("SELECT ?99999999999999999999999, ?").unwrap_err();
        assert!(matches!(err, DbError::InvalidInput { .. }));
        assert!(err.to_string().contains("out of range"));

        assert!(placeholder_count("SELECT ?0").is_err());
        assert!(placeholder_count("SELECT ?32767").is_err());
        assert_eq!(placeholder_count("SELECT ?32766").unwrap(), 32766);
    }

    #[test]
    fn test_anonymous_after_largest_index_rejected() {
        // `?` after `?32766` would need index 32767
        assert!(placeholder_count("SELECT ?32766, ?").is_err());
    }
}
