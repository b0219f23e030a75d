//! Convenient imports for typical `sqlcompose` usage.
//!
//! ```ignore
//! use sqlcompose::prelude::*;
//! ```

pub use crate::{
    Arg, Case, ColumnMap, Expr, PlaceholderFormat, SqlError, SqlQb, SqlResult, SqlWriter,
    StatementBuilder, Value, Valuer, alias, args, cols, expr, placeholders, qb,
};
