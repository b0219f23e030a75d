//! INSERT statement builder.

use crate::error::{SqlError, SqlResult};
use crate::expr::predicate::ColumnMap;
use crate::expr::{Arg, Expr, SqlBuf, SqlWriter};
use crate::placeholder::PlaceholderFormat;
use crate::qb::traits::SqlQb;
use crate::qb::{write_prefixes, write_suffixes};

/// INSERT statement builder.
#[derive(Clone, Debug, Default)]
pub struct InsertQb {
    format: PlaceholderFormat,
    prefixes: Vec<Expr>,
    /// Words between `INSERT` and `INTO`, e.g. `IGNORE`
    options: Vec<String>,
    into: String,
    columns: Vec<String>,
    /// One entry per VALUES row
    rows: Vec<Vec<Arg>>,
    suffixes: Vec<Expr>,
}

impl InsertQb {
    /// Create an INSERT builder for a table.
    pub fn new(into: &str) -> Self {
        Self {
            into: into.to_string(),
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

    pub fn options(mut self, options: &[&str]) -> Self {
        self.options.extend(options.iter().map(|s| s.to_string()));
        self
    }

    pub fn into(mut self, into: &str) -> Self {
        self.into = into.to_string();
        self
    }

    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.columns.extend(columns.iter().map(|s| s.to_string()));
        self
    }

    /// Add a row of values. An expression is written in place of its value,
    /// e.g. `args![3, expr("? + 1", args![4])]`.
    pub fn values(mut self, row: Vec<Arg>) -> Self {
        self.rows.push(row);
        self
    }

    /// Replace columns and rows with the pairs of `map`, as a single row.
    pub fn set_map(mut self, map: impl Into<ColumnMap>) -> Self {
        let (columns, row): (Vec<String>, Vec<Arg>) = map
            .into()
            .into_iter()
            .map(|(column, value)| (column, Arg::Value(value)))
            .unzip();
        self.columns = columns;
        self.rows = vec![row];
        self
    }

    /// Add an expression after the statement, e.g. `RETURNING id`.
    pub fn suffix(mut self, sql: &str, args: Vec<Arg>) -> Self {
        self.suffixes.push(Expr::new(sql, args));
        self
    }
}

impl SqlWriter for InsertQb {
    fn write_sql(&self, buf: &mut SqlBuf) -> SqlResult<bool> {
        if self.into.is_empty() {
            return Err(SqlError::structural("insert statements must specify a table"));
        }
        if self.rows.is_empty() {
            return Err(SqlError::structural(
                "insert statements must have at least one set of values",
            ));
        }

        write_prefixes(&self.prefixes, buf)?;

        buf.push_str("INSERT ");
        if !self.options.is_empty() {
            buf.push_str(&self.options.join(" "));
            buf.push(' ');
        }

        buf.push_str("INTO ");
        buf.push_str(&self.into);
        buf.push(' ');

        if !self.columns.is_empty() {
            buf.push('(');
            buf.push_str(&self.columns.join(","));
            buf.push_str(") ");
        }

        buf.push_str("VALUES ");
        for (r, row) in self.rows.iter().enumerate() {
            if r > 0 {
                buf.push(',');
            }
            buf.push('(');
            for (i, value) in row.iter().enumerate() {
                if i > 0 {
                    buf.push(',');
                }
                if !value.write_value(buf)? {
                    return Err(SqlError::structural(
                        "insert values must not be empty expressions",
                    ));
                }
            }
            buf.push(')');
        }

        write_suffixes(&self.suffixes, buf)?;
        Ok(true)
    }
}

impl SqlQb for InsertQb {
    const STATEMENT: &'static str = "INSERT";

    fn format(&self) -> PlaceholderFormat {
        self.format
    }
}
