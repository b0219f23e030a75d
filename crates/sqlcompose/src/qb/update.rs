//! UPDATE statement builder.

use crate::error::{SqlError, SqlResult};
use crate::expr::predicate::ColumnMap;
use crate::expr::{Arg, Expr, SqlBuf, SqlWriter};
use crate::part::{Pred, WherePart};
use crate::placeholder::PlaceholderFormat;
use crate::qb::traits::SqlQb;
use crate::qb::{
    impl_where_shorthands, write_clause, write_limit_offset, write_list, write_prefixes,
    write_suffixes,
};

/// UPDATE statement builder.
#[derive(Clone, Debug, Default)]
pub struct UpdateQb {
    format: PlaceholderFormat,
    prefixes: Vec<Expr>,
    table: String,
    /// SET clauses, in the order columns were first set
    set_clauses: Vec<(String, Arg)>,
    where_parts: Vec<WherePart>,
    order_bys: Vec<String>,
    limit: Option<u64>,
    offset: Option<u64>,
    suffixes: Vec<Expr>,
}

impl UpdateQb {
    /// Create an UPDATE builder for a table.
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            ..Self::default()
        }
    }

    pub fn placeholder_format(mut self, format: PlaceholderFormat) -> Self {
        self.format = format;
        self
    }

    pub fn prefix(mut self, sql: &str, args: Vec<Arg>) -> Self {
        self.prefixes.push(Expr::new(sql, args));
        self
    }

    pub fn table(mut self, table: &str) -> Self {
        self.table = table.to_string();
        self
    }

    // ==================== SET ====================

    /// Add `column = value`. Setting a column again replaces its value.
    ///
    /// An expression is written in place of the value:
    /// `.set("hits", expr("hits + ?", args![1]))`.
    pub fn set(mut self, column: &str, value: impl Into<Arg>) -> Self {
        let value = value.into();
        match self.set_clauses.iter_mut().find(|(c, _)| c == column) {
            Some(clause) => clause.1 = value,
            None => self.set_clauses.push((column.to_string(), value)),
        }
        self
    }

    /// [`set`](Self::set) every pair of `map`, in order.
    pub fn set_map(self, map: impl Into<ColumnMap>) -> Self {
        map.into()
            .into_iter()
            .fold(self, |qb, (column, value)| qb.set(&column, value))
    }

    // ==================== WHERE ====================

    /// Add a WHERE part. Parts are ANDed together.
    pub fn and_where(mut self, pred: impl Into<Pred>, args: Vec<Arg>) -> Self {
        self.where_parts.push(WherePart::new(pred, args));
        self
    }

    // ==================== ORDER BY / LIMIT ====================

    pub fn order_by(mut self, order_bys: &[&str]) -> Self {
        self.order_bys.extend(order_bys.iter().map(|s| s.to_string()));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Add an expression after the statement, e.g. `RETURNING *`.
    pub fn suffix(mut self, sql: &str, args: Vec<Arg>) -> Self {
        self.suffixes.push(Expr::new(sql, args));
        self
    }
}

impl_where_shorthands!(UpdateQb);

impl SqlWriter for UpdateQb {
    fn write_sql(&self, buf: &mut SqlBuf) -> SqlResult<bool> {
        if self.table.is_empty() {
            return Err(SqlError::structural("update statements must specify a table"));
        }
        if self.set_clauses.is_empty() {
            return Err(SqlError::structural(
                "update statements must have at least one Set clause",
            ));
        }

        write_prefixes(&self.prefixes, buf)?;

        buf.push_str("UPDATE ");
        buf.push_str(&self.table);

        buf.push_str(" SET ");
        for (i, (column, value)) in self.set_clauses.iter().enumerate() {
            if i > 0 {
                buf.push_str(", ");
            }
            buf.push_str(column);
            buf.push_str(" = ");
            if !value.write_value(buf)? {
                return Err(SqlError::structural(format!(
                    "update value for column {column} must not be empty"
                )));
            }
        }

        write_clause(" WHERE ", &self.where_parts, " AND ", buf)?;
        write_list(" ORDER BY ", &self.order_bys, buf);
        write_limit_offset(self.limit, self.offset, buf);
        write_suffixes(&self.suffixes, buf)?;
        Ok(true)
    }
}

impl SqlQb for UpdateQb {
    const STATEMENT: &'static str = "UPDATE";

    fn format(&self) -> PlaceholderFormat {
        self.format
    }
}
