//! # sqlcompose
//!
//! Composable SQL statements for Rust.
//!
//! ## Features
//!
//! - **Nodes all the way down**: predicates, `CASE`, aliases and whole
//!   statements share one [`SqlWriter`] protocol and nest freely
//! - **Args follow markers**: the argument list always matches the `?`
//!   markers of the final text, left to right, at any depth
//! - **Typed values**: `NULL` becomes `IS NULL`, lists become `IN (...)`, and
//!   [`Valuer`] types are unwrapped first
//! - **Placeholder styles**: `?` or Postgres `$n`, applied once per statement
//! - **Driver hand-off**: [`Value`] implements `tokio_postgres::types::ToSql`
//!
//! ## Expressions
//!
//! ```ignore
//! use sqlcompose::prelude::*;
//!
//! let pred = Expr::and(vec![
//!     Expr::eq(cols! { "status" => "active", "team_id" => vec![1, 2, 3] }),
//!     Expr::gt(cols! { "age" => 18 }),
//!     expr("EXISTS(?)", args![qb::select(&["1"]).from("bans").and_where("bans.user_id = users.id", args![])]),
//! ]);
//! let (sql, args) = pred.to_sql()?;
//! // (status = ? AND team_id IN (?,?,?) AND age > ? AND EXISTS(SELECT 1 FROM bans WHERE bans.user_id = users.id))
//! ```
//!
//! ## Statements (qb)
//!
//! ```ignore
//! use sqlcompose::prelude::*;
//!
//! let built = StatementBuilder::dollar()
//!     .select(&["id", "name"])
//!     .from("users")
//!     .and_where(pred, args![])
//!     .order_by(&["created_at DESC"])
//!     .limit(10)
//!     .build()?;
//!
//! let rows = client.query(&built.sql, &built.params_ref()).await?;
//! ```

mod macros;

pub mod case;
pub mod error;
pub mod expr;
pub mod part;
pub mod placeholder;
pub mod prelude;
pub mod qb;
pub mod value;

mod trace;

pub use case::Case;
pub use error::{BoxError, SqlError, SqlResult};
pub use expr::predicate::{CmpOp, ColumnMap};
pub use expr::{Arg, Expr, Node, SqlBuf, SqlWriter, alias, expr, to_sql};
pub use part::{Part, Pred, WherePart};
pub use placeholder::{PlaceholderFormat, count_placeholders, placeholders};
pub use qb::{BuiltQuery, DeleteQb, InsertQb, SelectQb, SqlQb, StatementBuilder, UpdateQb};
pub use value::{Valuer, Value};
