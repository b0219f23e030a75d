//! Expression nodes and the shared compile sink.
//!
//! Every clause, predicate and sub-expression implements [`SqlWriter`]: it
//! appends its SQL text to a [`SqlBuf`] and pushes one argument per `?`
//! marker it emits, in the same left-to-right order. A whole statement is
//! compiled by one recursive walk over a single sink, so argument positions
//! always line up with the markers, however deep the nesting goes.
//!
//! # Example
//! ```ignore
//! use sqlcompose::{args, cols, expr, Expr};
//!
//! let pred = Expr::or(vec![
//!     expr("j = ?", args![10]),
//!     Expr::and(vec![Expr::eq(cols! { "k" => 11 }), Expr::raw("true")]),
//! ]);
//! let (sql, args) = pred.to_sql()?;
//! assert_eq!(sql, "(j = ? OR (k = ? AND true))");
//! ```

pub mod predicate;

use crate::case::Case;
use crate::error::SqlResult;
use crate::part::{Part, Pred, WherePart};
use crate::placeholder::rewrite_placeholders;
use crate::value::Value;
use predicate::{CmpOp, ColumnMap};
use std::fmt;
use std::sync::Arc;

/// A node that can write itself into a [`SqlBuf`].
///
/// Returns `Ok(true)` when SQL text was appended and `Ok(false)` when the node
/// contributed nothing (in which case it must not have pushed arguments
/// either). An error aborts the whole compile; whatever is in the buffer at
/// that point is meaningless.
pub trait SqlWriter: Send + Sync {
    fn write_sql(&self, buf: &mut SqlBuf) -> SqlResult<bool>;
}

/// Compile a node into a fresh buffer.
pub fn to_sql<W: SqlWriter + ?Sized>(node: &W) -> SqlResult<(String, Vec<Value>)> {
    let mut buf = SqlBuf::new();
    node.write_sql(&mut buf)?;
    Ok(buf.into_parts())
}

/// Position in a [`SqlBuf`] that can be rolled back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    sql: usize,
    args: usize,
}

/// SQL text plus the argument list collected while writing it.
#[derive(Debug, Clone, Default)]
pub struct SqlBuf {
    sql: String,
    args: Vec<Value>,
}

impl SqlBuf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sql: String::with_capacity(capacity),
            args: Vec::new(),
        }
    }

    pub fn push_str(&mut self, s: &str) {
        self.sql.push_str(s);
    }

    pub fn push(&mut self, c: char) {
        self.sql.push(c);
    }

    /// Write a `?` marker bound to `value`.
    pub fn push_arg(&mut self, value: Value) {
        self.sql.push('?');
        self.args.push(value);
    }

    /// Append arguments whose markers are already part of the text.
    pub fn extend_args(&mut self, args: impl IntoIterator<Item = Value>) {
        self.args.extend(args);
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    pub fn mark(&self) -> Mark {
        Mark {
            sql: self.sql.len(),
            args: self.args.len(),
        }
    }

    /// Drop everything written after `mark`.
    pub fn rewind(&mut self, mark: Mark) {
        self.sql.truncate(mark.sql);
        self.args.truncate(mark.args);
    }

    /// Write `items` separated by `sep`.
    ///
    /// The separator only goes in front of an item that actually writes, so
    /// empty items leave no trace. Returns whether anything was written.
    pub fn write_joined<'a, W, I>(&mut self, items: I, sep: &str) -> SqlResult<bool>
    where
        W: SqlWriter + ?Sized + 'a,
        I: IntoIterator<Item = &'a W>,
    {
        let mut written = false;
        for item in items {
            let mark = self.mark();
            if written {
                self.push_str(sep);
            }
            if item.write_sql(self)? {
                written = true;
            } else {
                self.rewind(mark);
            }
        }
        Ok(written)
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.args)
    }
}

/// A shared handle to a user-defined node.
#[derive(Clone)]
pub struct Node(pub(crate) Arc<dyn SqlWriter>);

impl Node {
    pub fn new<W: SqlWriter + 'static>(writer: W) -> Self {
        Node(Arc::new(writer))
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Node").field(&"<dyn SqlWriter>").finish()
    }
}

impl SqlWriter for Node {
    fn write_sql(&self, buf: &mut SqlBuf) -> SqlResult<bool> {
        self.0.write_sql(buf)
    }
}

/// An argument of a literal expression: a bound value, or a node spliced in
/// place of its marker.
#[derive(Clone, Debug)]
pub enum Arg {
    Value(Value),
    Expr(Expr),
}

impl Arg {
    pub fn is_expr(&self) -> bool {
        matches!(self, Arg::Expr(_))
    }

    /// Returns whether anything was written; a bound value always is.
    pub(crate) fn write_value(&self, buf: &mut SqlBuf) -> SqlResult<bool> {
        match self {
            Arg::Value(v) => {
                buf.push_arg(v.clone());
                Ok(true)
            }
            Arg::Expr(e) => e.write_sql(buf),
        }
    }
}

impl<T: Into<Value>> From<T> for Arg {
    fn from(v: T) -> Self {
        Arg::Value(v.into())
    }
}

impl From<Expr> for Arg {
    fn from(e: Expr) -> Self {
        Arg::Expr(e)
    }
}

impl From<Case> for Arg {
    fn from(c: Case) -> Self {
        Arg::Expr(c.into())
    }
}

/// Expression node.
#[derive(Clone, Debug)]
pub enum Expr {
    /// SQL template with `?` markers and their arguments.
    Literal { sql: String, args: Vec<Arg> },

    /// `col = ?` / `col <> ?` for every pair, with `IN` lists and `IS NULL`.
    Eq { map: ColumnMap, negated: bool },

    /// `col < ?` and friends for every pair.
    Compare { map: ColumnMap, op: CmpOp },

    /// Children joined by ` AND `, parenthesized.
    And(Vec<Expr>),

    /// Children joined by ` OR `, parenthesized.
    Or(Vec<Expr>),

    Part(Box<Part>),

    Where(Box<WherePart>),

    Case(Box<Case>),

    /// `(<expr>) AS <alias>`
    Alias { expr: Box<Expr>, alias: String },

    /// Any other [`SqlWriter`], sub-query builders included.
    Custom(Node),
}

impl Expr {
    /// Literal SQL with arguments bound to its `?` markers.
    ///
    /// An argument that is itself an expression is compiled in place of its
    /// marker. Markers past the end of `args` are left as literal `?`.
    pub fn new(sql: impl Into<String>, args: Vec<Arg>) -> Self {
        Expr::Literal {
            sql: sql.into(),
            args,
        }
    }

    /// Literal SQL without arguments.
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::new(sql, Vec::new())
    }

    pub fn eq(map: impl Into<ColumnMap>) -> Self {
        Expr::Eq {
            map: map.into(),
            negated: false,
        }
    }

    pub fn not_eq(map: impl Into<ColumnMap>) -> Self {
        Expr::Eq {
            map: map.into(),
            negated: true,
        }
    }

    pub fn lt(map: impl Into<ColumnMap>) -> Self {
        Self::compare(map, CmpOp::Lt)
    }

    pub fn lt_or_eq(map: impl Into<ColumnMap>) -> Self {
        Self::compare(map, CmpOp::LtOrEq)
    }

    pub fn gt(map: impl Into<ColumnMap>) -> Self {
        Self::compare(map, CmpOp::Gt)
    }

    pub fn gt_or_eq(map: impl Into<ColumnMap>) -> Self {
        Self::compare(map, CmpOp::GtOrEq)
    }

    pub fn compare(map: impl Into<ColumnMap>, op: CmpOp) -> Self {
        Expr::Compare {
            map: map.into(),
            op,
        }
    }

    pub fn and(exprs: Vec<Expr>) -> Self {
        Expr::And(exprs)
    }

    pub fn or(exprs: Vec<Expr>) -> Self {
        Expr::Or(exprs)
    }

    /// Wrap `expr` as `(<expr>) AS <alias>`, typically for a result column.
    pub fn alias(expr: impl Into<Expr>, alias: impl Into<String>) -> Self {
        Expr::Alias {
            expr: Box::new(expr.into()),
            alias: alias.into(),
        }
    }

    /// A generic part: plain SQL or a nested expression.
    pub fn part(pred: impl Into<Pred>, args: Vec<Arg>) -> Self {
        Expr::Part(Box::new(Part::new(pred, args)))
    }

    /// A where/having part: like [`Expr::part`], and a column map compiles
    /// as an equality map.
    pub fn where_part(pred: impl Into<Pred>, args: Vec<Arg>) -> Self {
        Expr::Where(Box::new(WherePart::new(pred, args)))
    }

    pub fn custom<W: SqlWriter + 'static>(writer: W) -> Self {
        Expr::Custom(Node::new(writer))
    }

    /// Compile into `(sql, args)` with `?` markers.
    pub fn to_sql(&self) -> SqlResult<(String, Vec<Value>)> {
        to_sql(self)
    }
}

/// Shorthand for [`Expr::new`].
pub fn expr(sql: impl Into<String>, args: Vec<Arg>) -> Expr {
    Expr::new(sql, args)
}

/// Shorthand for [`Expr::alias`].
pub fn alias(expr: impl Into<Expr>, alias: impl Into<String>) -> Expr {
    Expr::alias(expr, alias)
}

impl From<Case> for Expr {
    fn from(c: Case) -> Self {
        Expr::Case(Box::new(c))
    }
}

impl From<Part> for Expr {
    fn from(p: Part) -> Self {
        Expr::Part(Box::new(p))
    }
}

impl From<WherePart> for Expr {
    fn from(p: WherePart) -> Self {
        Expr::Where(Box::new(p))
    }
}

impl From<Node> for Expr {
    fn from(n: Node) -> Self {
        Expr::Custom(n)
    }
}

impl SqlWriter for Expr {
    fn write_sql(&self, buf: &mut SqlBuf) -> SqlResult<bool> {
        match self {
            Expr::Literal { sql, args } => write_literal(sql, args, buf),
            Expr::Eq { map, negated } => predicate::write_equality(map, *negated, buf),
            Expr::Compare { map, op } => predicate::write_comparison(map, *op, buf),
            Expr::And(exprs) => write_conjunction(exprs, " AND ", buf),
            Expr::Or(exprs) => write_conjunction(exprs, " OR ", buf),
            Expr::Part(part) => part.write_sql(buf),
            Expr::Where(part) => part.write_sql(buf),
            Expr::Case(case) => case.write_sql(buf),
            Expr::Alias { expr, alias } => {
                buf.push('(');
                expr.write_sql(buf)?;
                buf.push_str(") AS ");
                buf.push_str(alias);
                Ok(true)
            }
            Expr::Custom(node) => node.write_sql(buf),
        }
    }
}

pub(crate) fn write_literal(sql: &str, args: &[Arg], buf: &mut SqlBuf) -> SqlResult<bool> {
    if sql.is_empty() {
        return Ok(false);
    }

    // Fast path: nothing to splice, text and values go through untouched.
    if !args.iter().any(Arg::is_expr) {
        buf.push_str(sql);
        buf.extend_args(args.iter().filter_map(|arg| match arg {
            Arg::Value(v) => Some(v.clone()),
            Arg::Expr(_) => None,
        }));
        return Ok(true);
    }

    rewrite_placeholders(sql, buf, |buf, i| match args.get(i - 1) {
        Some(arg) => arg.write_value(buf).map(|_| ()),
        None => {
            buf.push('?');
            Ok(())
        }
    })?;
    Ok(true)
}

fn write_conjunction(exprs: &[Expr], sep: &str, buf: &mut SqlBuf) -> SqlResult<bool> {
    let mark = buf.mark();
    buf.push('(');
    if buf.write_joined(exprs, sep)? {
        buf.push(')');
        Ok(true)
    } else {
        buf.rewind(mark);
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{args, cols};

    #[derive(Debug)]
    struct Dummy;

    impl SqlWriter for Dummy {
        fn write_sql(&self, buf: &mut SqlBuf) -> SqlResult<bool> {
            buf.push_str("DUMMY(?, ?)");
            buf.extend_args([Value::from(42), Value::from(42)]);
            Ok(true)
        }
    }

    #[derive(Debug)]
    struct Silent;

    impl SqlWriter for Silent {
        fn write_sql(&self, _buf: &mut SqlBuf) -> SqlResult<bool> {
            Ok(false)
        }
    }

    #[test]
    fn literal_without_nodes_is_verbatim() {
        let (sql, args) = expr("a = ? AND b = ?", args![1, "x"]).to_sql().unwrap();
        assert_eq!(sql, "a = ? AND b = ?");
        assert_eq!(args, vec![Value::from(1), Value::from("x")]);
    }

    #[test]
    fn literal_fast_path_keeps_unreferenced_args() {
        let (sql, args) = expr("now()", args![1]).to_sql().unwrap();
        assert_eq!(sql, "now()");
        assert_eq!(args, vec![Value::from(1)]);
    }

    #[test]
    fn literal_splices_nested_node() {
        let e = expr("EXISTS(?)", args![Expr::custom(Dummy)]);
        let (sql, args) = e.to_sql().unwrap();
        assert_eq!(sql, "EXISTS(DUMMY(?, ?))");
        assert_eq!(args, vec![Value::from(42), Value::from(42)]);
    }

    #[test]
    fn literal_interleaves_values_and_nodes() {
        let e = expr(
            "a = ? AND b IN (?) AND c = ?",
            args![1, expr("SELECT id FROM t WHERE x = ?", args![2]), 3],
        );
        let (sql, args) = e.to_sql().unwrap();
        assert_eq!(
            sql,
            "a = ? AND b IN (SELECT id FROM t WHERE x = ?) AND c = ?"
        );
        assert_eq!(args, vec![Value::from(1), Value::from(2), Value::from(3)]);
    }

    #[test]
    fn literal_leaves_extra_markers_alone() {
        let e = expr("? + ? + ?", args![Expr::raw("1")]);
        let (sql, args) = e.to_sql().unwrap();
        assert_eq!(sql, "1 + ? + ?");
        assert!(args.is_empty());
    }

    #[test]
    fn literal_slow_path_copies_escapes() {
        let e = expr("data ?? 'k' AND x = ?", args![Expr::raw("y")]);
        assert_eq!(e.to_sql().unwrap().0, "data ?? 'k' AND x = y");
    }

    #[test]
    fn empty_literal_writes_nothing() {
        let mut buf = SqlBuf::new();
        assert!(!Expr::raw("").write_sql(&mut buf).unwrap());
        assert!(buf.is_empty());
    }

    #[test]
    fn and_wraps_children() {
        let e = Expr::and(vec![expr("a=?", args![1]), expr("b=?", args![2])]);
        let (sql, args) = e.to_sql().unwrap();
        assert_eq!(sql, "(a=? AND b=?)");
        assert_eq!(args, vec![Value::from(1), Value::from(2)]);
    }

    #[test]
    fn nested_conjunctions() {
        let e = Expr::or(vec![
            expr("j = ?", args![10]),
            Expr::and(vec![Expr::eq(cols! { "k" => 11 }), Expr::raw("true")]),
        ]);
        let (sql, args) = e.to_sql().unwrap();
        assert_eq!(sql, "(j = ? OR (k = ? AND true))");
        assert_eq!(args, vec![Value::from(10), Value::from(11)]);
    }

    #[test]
    fn conjunction_skips_silent_children() {
        let e = Expr::and(vec![
            Expr::custom(Silent),
            expr("a = ?", args![1]),
            Expr::eq(ColumnMap::new()),
            Expr::raw("b"),
        ]);
        assert_eq!(e.to_sql().unwrap().0, "(a = ? AND b)");
    }

    #[test]
    fn empty_conjunction_writes_nothing() {
        let mut buf = SqlBuf::new();
        let e = Expr::or(vec![Expr::custom(Silent), Expr::raw("")]);
        assert!(!e.write_sql(&mut buf).unwrap());
        assert_eq!(buf.sql(), "");
        assert!(!Expr::and(vec![]).write_sql(&mut buf).unwrap());
    }

    #[test]
    fn conjunction_stops_on_first_error() {
        let e = Expr::and(vec![
            expr("a = ?", args![1]),
            Expr::lt(cols! { "b" => None::<i32> }),
            Expr::raw("c"),
        ]);
        let err = e.to_sql().unwrap_err();
        assert!(err.is_semantic());
    }

    #[test]
    fn alias_wraps_child() {
        let e = alias(Expr::eq(cols! { "b" => vec![101, 102, 103] }), "b_alias");
        let (sql, args) = e.to_sql().unwrap();
        assert_eq!(sql, "(b IN (?,?,?)) AS b_alias");
        assert_eq!(
            args,
            vec![Value::from(101), Value::from(102), Value::from(103)]
        );
    }

    #[test]
    fn alias_forwards_errors() {
        let e = alias(Expr::eq(cols! { "b" => Vec::<i32>::new() }), "b_alias");
        assert!(e.to_sql().unwrap_err().is_structural());
    }

    #[test]
    fn compiling_twice_is_stable() {
        let e = Expr::and(vec![
            Expr::eq(cols! { "a" => 1, "b" => None::<i32> }),
            expr("EXISTS(?)", args![Expr::custom(Dummy)]),
        ]);
        assert_eq!(e.to_sql().unwrap(), e.to_sql().unwrap());
    }

    #[test]
    fn write_joined_rewinds_separator() {
        let mut buf = SqlBuf::new();
        let items = [Expr::raw("a"), Expr::raw(""), Expr::raw("b")];
        assert!(buf.write_joined(&items, ", ").unwrap());
        assert_eq!(buf.sql(), "a, b");
    }
}
