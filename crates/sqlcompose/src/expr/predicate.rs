//! Column map predicates: equality, `IN` lists, `IS NULL` and ordering.

use crate::error::{SqlError, SqlResult};
use crate::expr::SqlBuf;
use crate::placeholder::placeholders;
use crate::value::Value;

/// Ordered `column -> value` pairs.
///
/// Pairs compile in insertion order. Inserting a column that is already
/// present replaces its value and keeps its position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColumnMap {
    entries: Vec<(String, Value)>,
}

impl ColumnMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(c, _)| *c == column) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column, value)),
        }
    }

    /// Chaining form of [`insert`](Self::insert).
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(c, v)| (c.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ColumnMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ColumnMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for ColumnMap {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl IntoIterator for ColumnMap {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Ordering operator of a comparison map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Lt,
    LtOrEq,
    Gt,
    GtOrEq,
}

impl CmpOp {
    /// Pick the operator from its two flags: `opposite` flips `<` to `>`,
    /// `or_eq` adds the `=`.
    pub fn new(opposite: bool, or_eq: bool) -> Self {
        match (opposite, or_eq) {
            (false, false) => CmpOp::Lt,
            (false, true) => CmpOp::LtOrEq,
            (true, false) => CmpOp::Gt,
            (true, true) => CmpOp::GtOrEq,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CmpOp::Lt => "<",
            CmpOp::LtOrEq => "<=",
            CmpOp::Gt => ">",
            CmpOp::GtOrEq => ">=",
        }
    }
}

pub(crate) fn write_equality(map: &ColumnMap, negated: bool, buf: &mut SqlBuf) -> SqlResult<bool> {
    let (eq_op, in_op, null_op) = if negated {
        ("<>", "NOT IN", "IS NOT")
    } else {
        ("=", "IN", "IS")
    };

    for (i, (column, value)) in map.iter().enumerate() {
        if i > 0 {
            buf.push_str(" AND ");
        }
        buf.push_str(column);
        buf.push(' ');

        let value = value.resolve()?;
        match &*value {
            Value::Null => {
                buf.push_str(null_op);
                buf.push_str(" NULL");
            }
            Value::Array(items) => {
                if items.is_empty() {
                    return Err(SqlError::structural(
                        "equality condition must contain at least one parameter",
                    ));
                }
                buf.push_str(in_op);
                buf.push_str(" (");
                buf.push_str(&placeholders(items.len()));
                buf.push(')');
                buf.extend_args(items.iter().cloned());
            }
            scalar => {
                buf.push_str(eq_op);
                buf.push(' ');
                buf.push_arg(scalar.clone());
            }
        }
    }

    Ok(!map.is_empty())
}

pub(crate) fn write_comparison(map: &ColumnMap, op: CmpOp, buf: &mut SqlBuf) -> SqlResult<bool> {
    for (i, (column, value)) in map.iter().enumerate() {
        let value = value.resolve()?;
        match &*value {
            Value::Null => {
                return Err(SqlError::semantic(
                    "cannot use null with less than or greater than operators",
                ));
            }
            Value::Array(_) => {
                return Err(SqlError::semantic(
                    "cannot use array or slice with less than or greater than operators",
                ));
            }
            scalar => {
                if i > 0 {
                    buf.push_str(" AND ");
                }
                buf.push_str(column);
                buf.push(' ');
                buf.push_str(op.as_str());
                buf.push(' ');
                buf.push_arg(scalar.clone());
            }
        }
    }

    Ok(!map.is_empty())
}
