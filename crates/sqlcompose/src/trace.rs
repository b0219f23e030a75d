//! Debug events for compiled statements.
//!
//! Enable via the crate feature: `sqlcompose = { features = ["tracing"] }`.
//! Without it every function here compiles to nothing.

use crate::error::SqlError;

/// Longest SQL text (in bytes) put on an event before it is cut.
#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
pub(crate) const MAX_SQL_LENGTH: usize = 200;

/// Event target shared by every event of this crate.
#[cfg(feature = "tracing")]
const TARGET: &str = "sqlcompose.sql";

#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

#[cfg(feature = "tracing")]
fn display_sql(sql: &str) -> String {
    if sql.len() > MAX_SQL_LENGTH {
        format!("{}...", truncate_sql_bytes(sql, MAX_SQL_LENGTH))
    } else {
        sql.to_string()
    }
}

/// A statement compiled successfully.
#[cfg(feature = "tracing")]
pub(crate) fn statement_built(statement: &'static str, sql: &str, arg_count: usize) {
    tracing::debug!(
        target: TARGET,
        statement,
        arg_count,
        sql = %display_sql(sql),
        "statement built"
    );
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn statement_built(_statement: &'static str, _sql: &str, _arg_count: usize) {}

/// A statement failed to compile.
#[cfg(feature = "tracing")]
pub(crate) fn statement_failed(statement: &'static str, err: &SqlError) {
    tracing::debug!(
        target: TARGET,
        statement,
        error = %err,
        "statement failed to build"
    );
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn statement_failed(_statement: &'static str, _err: &SqlError) {}
