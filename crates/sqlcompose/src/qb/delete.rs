//! DELETE statement builder.

use crate::error::{SqlError, SqlResult};
use crate::expr::{Arg, Expr, SqlBuf, SqlWriter};
use crate::part::{Pred, WherePart};
use crate::placeholder::PlaceholderFormat;
use crate::qb::traits::SqlQb;
use crate::qb::{
    impl_where_shorthands, write_clause, write_limit_offset, write_list, write_prefixes,
    write_suffixes,
};

/// DELETE statement builder.
#[derive(Clone, Debug, Default)]
pub struct DeleteQb {
    format: PlaceholderFormat,
    prefixes: Vec<Expr>,
    from: String,
    where_parts: Vec<WherePart>,
    order_bys: Vec<String>,
    limit: Option<u64>,
    offset: Option<u64>,
    suffixes: Vec<Expr>,
}

impl DeleteQb {
    /// Create a DELETE builder for a table.
    pub fn new(from: &str) -> Self {
        Self {
            from: from.to_string(),
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

    pub fn from(mut self, from: &str) -> Self {
        self.from = from.to_string();
        self
    }

    /// Add a WHERE part. Parts are ANDed together.
    pub fn and_where(mut self, pred: impl Into<Pred>, args: Vec<Arg>) -> Self {
        self.where_parts.push(WherePart::new(pred, args));
        self
    }

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

    pub fn suffix(mut self, sql: &str, args: Vec<Arg>) -> Self {
        self.suffixes.push(Expr::new(sql, args));
        self
    }
}

impl_where_shorthands!(DeleteQb);

impl SqlWriter for DeleteQb {
    fn write_sql(&self, buf: &mut SqlBuf) -> SqlResult<bool> {
        if self.from.is_empty() {
            return Err(SqlError::structural("delete statements must specify a table"));
        }

        write_prefixes(&self.prefixes, buf)?;

        buf.push_str("DELETE FROM ");
        buf.push_str(&self.from);

        write_clause(" WHERE ", &self.where_parts, " AND ", buf)?;
        write_list(" ORDER BY ", &self.order_bys, buf);
        write_limit_offset(self.limit, self.offset, buf);
        write_suffixes(&self.suffixes, buf)?;
        Ok(true)
    }
}

impl SqlQb for DeleteQb {
    const STATEMENT: &'static str = "DELETE";

    fn format(&self) -> PlaceholderFormat {
        self.format
    }
}
