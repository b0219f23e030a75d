//! Trait definitions for statement builders.

use crate::error::SqlResult;
use crate::expr::{SqlBuf, SqlWriter};
use crate::placeholder::PlaceholderFormat;
use crate::trace;
use crate::value::Value;
use tokio_postgres::types::ToSql;

/// Base trait for all statement builders.
///
/// A builder writes itself with `?` markers through [`SqlWriter`], which is
/// what lets a SELECT nest inside another statement. [`build`](Self::build)
/// is the top-level entry point: it compiles, then restyles the markers once
/// for the whole statement.
pub trait SqlQb: SqlWriter {
    /// Statement keyword, used in trace events.
    const STATEMENT: &'static str;

    /// Placeholder style applied by [`build`](Self::build).
    fn format(&self) -> PlaceholderFormat;

    /// Compile the statement.
    fn build(&self) -> SqlResult<BuiltQuery> {
        let mut buf = SqlBuf::with_capacity(200);
        if let Err(err) = self.write_sql(&mut buf) {
            trace::statement_failed(Self::STATEMENT, &err);
            return Err(err);
        }

        let (sql, args) = buf.into_parts();
        let sql = self.format().replace_placeholders(&sql);
        trace::statement_built(Self::STATEMENT, &sql, args.len());
        Ok(BuiltQuery::new(sql, args))
    }

    /// Compile into `(sql, args)`.
    fn to_sql(&self) -> SqlResult<(String, Vec<Value>)> {
        self.build().map(BuiltQuery::into_parts)
    }
}

/// The result of building a statement.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub args: Vec<Value>,
}

impl BuiltQuery {
    /// Create a new built query.
    pub fn new(sql: String, args: Vec<Value>) -> Self {
        Self { sql, args }
    }

    /// Get parameters as references for tokio-postgres.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.args.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.args)
    }
}
