//! Statement builders.
//!
//! Each builder accumulates clauses through consuming `self -> Self` calls and
//! compiles through the expression layer. Compiling borrows the builder, so
//! the same builder can be compiled any number of times.
//!
//! # Usage
//!
//! ```ignore
//! use sqlcompose::prelude::*;
//!
//! // SELECT
//! let (sql, args) = qb::select(&["id", "name"])
//!     .from("users")
//!     .and_where(cols! { "status" => "active", "deleted_at" => None::<i64> }, args![])
//!     .order_by(&["created_at DESC"])
//!     .limit(20)
//!     .to_sql()?;
//!
//! // INSERT
//! let built = qb::insert("users")
//!     .columns(&["username", "email"])
//!     .values(args!["alice", "alice@example.com"])
//!     .suffix("RETURNING id", args![])
//!     .build()?;
//! client.query(&built.sql, &built.params_ref()).await?;
//!
//! // UPDATE
//! StatementBuilder::dollar()
//!     .update("users")
//!     .set("status", "inactive")
//!     .eq("id", user_id)
//!     .to_sql()?;
//!
//! // DELETE
//! qb::delete("users").eq("id", user_id).to_sql()?;
//! ```

mod delete;
mod insert;
mod select;
mod traits;
mod update;

pub use delete::DeleteQb;
pub use insert::InsertQb;
pub use select::SelectQb;
pub use traits::{BuiltQuery, SqlQb};
pub use update::UpdateQb;

use crate::error::SqlResult;
use crate::expr::{Expr, SqlBuf, SqlWriter};
use crate::placeholder::PlaceholderFormat;
use serde::Deserialize;

/// Shared configuration for the builders it creates.
///
/// Deserializable, so it can live in an application config file:
///
/// ```toml
/// placeholder_format = "dollar"
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StatementBuilder {
    /// Placeholder style of the compiled SQL.
    pub placeholder_format: PlaceholderFormat,
}

impl StatementBuilder {
    /// `?` placeholders.
    pub fn new() -> Self {
        Self::default()
    }

    /// `$1, $2, ...` placeholders, for Postgres.
    pub fn dollar() -> Self {
        Self::new().with_placeholder_format(PlaceholderFormat::Dollar)
    }

    /// Set the placeholder style.
    pub fn with_placeholder_format(mut self, format: PlaceholderFormat) -> Self {
        self.placeholder_format = format;
        self
    }

    pub fn select(&self, columns: &[&str]) -> SelectQb {
        SelectQb::new(columns).placeholder_format(self.placeholder_format)
    }

    pub fn insert(&self, into: &str) -> InsertQb {
        InsertQb::new(into).placeholder_format(self.placeholder_format)
    }

    pub fn update(&self, table: &str) -> UpdateQb {
        UpdateQb::new(table).placeholder_format(self.placeholder_format)
    }

    pub fn delete(&self, from: &str) -> DeleteQb {
        DeleteQb::new(from).placeholder_format(self.placeholder_format)
    }
}

/// Create a SELECT builder with the given result columns.
///
/// # Example
/// ```ignore
/// let qb = sqlcompose::qb::select(&["id", "name"]).from("users");
/// ```
pub fn select(columns: &[&str]) -> SelectQb {
    SelectQb::new(columns)
}

/// Create an INSERT builder for the given table.
pub fn insert(into: &str) -> InsertQb {
    InsertQb::new(into)
}

/// Create an UPDATE builder for the given table.
pub fn update(table: &str) -> UpdateQb {
    UpdateQb::new(table)
}

/// Create a DELETE builder for the given table.
pub fn delete(from: &str) -> DeleteQb {
    DeleteQb::new(from)
}

/// Prefix expressions joined by spaces, then a space before the statement.
pub(crate) fn write_prefixes(prefixes: &[Expr], buf: &mut SqlBuf) -> SqlResult<()> {
    if buf.write_joined(prefixes, " ")? {
        buf.push(' ');
    }
    Ok(())
}

/// A space, then suffix expressions joined by spaces.
pub(crate) fn write_suffixes(suffixes: &[Expr], buf: &mut SqlBuf) -> SqlResult<()> {
    let mark = buf.mark();
    buf.push(' ');
    if !buf.write_joined(suffixes, " ")? {
        buf.rewind(mark);
    }
    Ok(())
}

/// `keyword` followed by `parts` joined with `sep`; nothing at all when no
/// part writes.
pub(crate) fn write_clause<W: SqlWriter>(
    keyword: &str,
    parts: &[W],
    sep: &str,
    buf: &mut SqlBuf,
) -> SqlResult<()> {
    let mark = buf.mark();
    buf.push_str(keyword);
    if !buf.write_joined(parts, sep)? {
        buf.rewind(mark);
    }
    Ok(())
}

pub(crate) fn write_list(keyword: &str, items: &[String], buf: &mut SqlBuf) {
    if !items.is_empty() {
        buf.push_str(keyword);
        buf.push_str(&items.join(", "));
    }
}

pub(crate) fn write_limit_offset(limit: Option<u64>, offset: Option<u64>, buf: &mut SqlBuf) {
    if let Some(limit) = limit {
        buf.push_str(" LIMIT ");
        buf.push_str(&limit.to_string());
    }
    if let Some(offset) = offset {
        buf.push_str(" OFFSET ");
        buf.push_str(&offset.to_string());
    }
}

/// Column shorthands for the WHERE list of a builder with a `where_parts`
/// field.
macro_rules! impl_where_shorthands {
    ($qb:ty) => {
        impl $qb {
            /// Add WHERE: column = value (`IN` for lists, `IS NULL` for null)
            pub fn eq(self, column: &str, value: impl Into<$crate::Value>) -> Self {
                self.and_where($crate::Expr::eq($crate::cols! { column => value }), Vec::new())
            }

            /// Add WHERE: column <> value (`NOT IN` for lists, `IS NOT NULL` for null)
            pub fn not_eq(self, column: &str, value: impl Into<$crate::Value>) -> Self {
                self.and_where($crate::Expr::not_eq($crate::cols! { column => value }), Vec::new())
            }

            /// Add WHERE: column < value
            pub fn lt(self, column: &str, value: impl Into<$crate::Value>) -> Self {
                self.and_where($crate::Expr::lt($crate::cols! { column => value }), Vec::new())
            }

            /// Add WHERE: column <= value
            pub fn lt_or_eq(self, column: &str, value: impl Into<$crate::Value>) -> Self {
                self.and_where($crate::Expr::lt_or_eq($crate::cols! { column => value }), Vec::new())
            }

            /// Add WHERE: column > value
            pub fn gt(self, column: &str, value: impl Into<$crate::Value>) -> Self {
                self.and_where($crate::Expr::gt($crate::cols! { column => value }), Vec::new())
            }

            /// Add WHERE: column >= value
            pub fn gt_or_eq(self, column: &str, value: impl Into<$crate::Value>) -> Self {
                self.and_where($crate::Expr::gt_or_eq($crate::cols! { column => value }), Vec::new())
            }
        }
    };
}

pub(crate) use impl_where_shorthands;
