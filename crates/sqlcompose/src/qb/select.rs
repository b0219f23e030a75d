//! SELECT statement builder.

use crate::error::{SqlError, SqlResult};
use crate::expr::{Arg, Expr, SqlBuf, SqlWriter};
use crate::part::{Part, Pred, WherePart};
use crate::placeholder::PlaceholderFormat;
use crate::qb::traits::SqlQb;
use crate::qb::{
    impl_where_shorthands, write_clause, write_limit_offset, write_list, write_prefixes,
    write_suffixes,
};

/// SELECT statement builder.
///
/// Also a node: pass it to [`Expr::alias`], a literal's arguments or a
/// `WHERE` part to use it as a sub-query.
#[derive(Clone, Debug, Default)]
pub struct SelectQb {
    format: PlaceholderFormat,
    prefixes: Vec<Expr>,
    distinct: bool,
    /// Result columns
    columns: Vec<Part>,
    from: Option<String>,
    joins: Vec<String>,
    where_parts: Vec<WherePart>,
    group_bys: Vec<String>,
    having_parts: Vec<WherePart>,
    order_bys: Vec<String>,
    limit: Option<u64>,
    offset: Option<u64>,
    suffixes: Vec<Expr>,
}

impl SelectQb {
    /// Create a SELECT builder with the given result columns.
    pub fn new(columns: &[&str]) -> Self {
        Self::default().columns(columns)
    }

    pub fn placeholder_format(mut self, format: PlaceholderFormat) -> Self {
        self.format = format;
        self
    }

    /// Add an expression before `SELECT`, e.g. a `WITH` clause.
    pub fn prefix(mut self, sql: &str, args: Vec<Arg>) -> Self {
        self.prefixes.push(Expr::new(sql, args));
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    // ==================== Result columns ====================

    /// Append result columns. Empty names are skipped.
    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.columns.extend(
            columns
                .iter()
                .filter(|c| !c.is_empty())
                .map(|c| Part::new(*c, Vec::new())),
        );
        self
    }

    /// Append one result column: SQL with `args` for its markers, or any
    /// expression.
    ///
    /// ```ignore
    /// .column(format!("IF(col IN ({}), 1, 0) AS col", placeholders(3)), args![1, 2, 3])
    /// .column(Expr::alias(sub_query, "sub"), args![])
    /// ```
    pub fn column(mut self, column: impl Into<Pred>, args: Vec<Arg>) -> Self {
        let part = Part::new(column, args);
        if !part.is_empty() {
            self.columns.push(part);
        }
        self
    }

    // ==================== FROM / JOIN ====================

    pub fn from(mut self, from: &str) -> Self {
        self.from = Some(from.to_string());
        self
    }

    /// Add a full join clause, e.g. `CROSS JOIN t`.
    pub fn join_clause(mut self, join: &str) -> Self {
        self.joins.push(join.to_string());
        self
    }

    pub fn join(self, join: &str) -> Self {
        self.join_clause(&format!("JOIN {join}"))
    }

    pub fn left_join(self, join: &str) -> Self {
        self.join_clause(&format!("LEFT JOIN {join}"))
    }

    pub fn right_join(self, join: &str) -> Self {
        self.join_clause(&format!("RIGHT JOIN {join}"))
    }

    // ==================== WHERE / GROUP BY / HAVING ====================

    /// Add a WHERE part. Parts are ANDed together.
    ///
    /// `pred` is SQL text (with `args` bound to its markers), an expression,
    /// or a [`ColumnMap`](crate::ColumnMap) compiled as equalities. Empty
    /// text adds nothing.
    pub fn and_where(mut self, pred: impl Into<Pred>, args: Vec<Arg>) -> Self {
        self.where_parts.push(WherePart::new(pred, args));
        self
    }

    pub fn group_by(mut self, group_bys: &[&str]) -> Self {
        self.group_bys.extend(group_bys.iter().map(|s| s.to_string()));
        self
    }

    /// Add a HAVING part. See [`and_where`](Self::and_where).
    pub fn having(mut self, pred: impl Into<Pred>, args: Vec<Arg>) -> Self {
        self.having_parts.push(WherePart::new(pred, args));
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

    /// Add an expression after the statement, e.g. `FOR UPDATE`.
    pub fn suffix(mut self, sql: &str, args: Vec<Arg>) -> Self {
        self.suffixes.push(Expr::new(sql, args));
        self
    }
}

impl_where_shorthands!(SelectQb);

impl SqlWriter for SelectQb {
    fn write_sql(&self, buf: &mut SqlBuf) -> SqlResult<bool> {
        if self.columns.is_empty() {
            return Err(SqlError::structural(
                "select statements must have at least one result column",
            ));
        }

        write_prefixes(&self.prefixes, buf)?;

        buf.push_str("SELECT ");
        if self.distinct {
            buf.push_str("DISTINCT ");
        }
        if !buf.write_joined(&self.columns, ", ")? {
            return Err(SqlError::structural(
                "select statements must have at least one result column",
            ));
        }

        if let Some(from) = &self.from {
            buf.push_str(" FROM ");
            buf.push_str(from);
        }

        if !self.joins.is_empty() {
            buf.push(' ');
            buf.push_str(&self.joins.join(" "));
        }

        write_clause(" WHERE ", &self.where_parts, " AND ", buf)?;
        write_list(" GROUP BY ", &self.group_bys, buf);
        write_clause(" HAVING ", &self.having_parts, " AND ", buf)?;
        write_list(" ORDER BY ", &self.order_bys, buf);
        write_limit_offset(self.limit, self.offset, buf);
        write_suffixes(&self.suffixes, buf)?;

        Ok(true)
    }
}

impl SqlQb for SelectQb {
    const STATEMENT: &'static str = "SELECT";

    fn format(&self) -> PlaceholderFormat {
        self.format
    }
}

impl From<SelectQb> for Expr {
    fn from(qb: SelectQb) -> Self {
        Expr::custom(qb)
    }
}

impl From<SelectQb> for Arg {
    fn from(qb: SelectQb) -> Self {
        Arg::Expr(qb.into())
    }
}

impl From<SelectQb> for Pred {
    fn from(qb: SelectQb) -> Self {
        Pred::Expr(qb.into())
    }
}
