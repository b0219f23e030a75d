//! `CASE` expressions.

use crate::error::{SqlError, SqlResult};
use crate::expr::{Arg, SqlBuf, SqlWriter, to_sql};
use crate::part::{Part, Pred};
use crate::value::Value;

/// Builder for `CASE [subject] WHEN .. THEN .. [ELSE ..] END`.
///
/// # Example
/// ```ignore
/// let case = Case::with_value("number")
///     .when("1", "one")
///     .when("2", "two")
///     .otherwise(expr("?", args!["big number"]));
/// // CASE number WHEN 1 THEN one WHEN 2 THEN two ELSE ? END
/// ```
#[derive(Clone, Debug, Default)]
pub struct Case {
    subject: Option<Part>,
    whens: Vec<(Part, Part)>,
    otherwise: Option<Part>,
}

impl Case {
    /// A searched `CASE` with no subject.
    pub fn new() -> Self {
        Self::default()
    }

    /// A simple `CASE` comparing `subject` against each `WHEN`.
    pub fn with_value(subject: impl Into<Pred>) -> Self {
        Self::with_value_args(subject, Vec::new())
    }

    /// Like [`with_value`](Self::with_value), with arguments for the
    /// subject's markers.
    pub fn with_value_args(subject: impl Into<Pred>, args: Vec<Arg>) -> Self {
        Self {
            subject: Some(Part::new(subject, args)),
            ..Self::default()
        }
    }

    pub fn when(mut self, when: impl Into<Pred>, then: impl Into<Pred>) -> Self {
        self.whens
            .push((Part::new(when, Vec::new()), Part::new(then, Vec::new())));
        self
    }

    /// The `ELSE` branch.
    pub fn otherwise(mut self, pred: impl Into<Pred>) -> Self {
        self.otherwise = Some(Part::new(pred, Vec::new()));
        self
    }

    pub fn to_sql(&self) -> SqlResult<(String, Vec<Value>)> {
        to_sql(self)
    }
}

impl SqlWriter for Case {
    fn write_sql(&self, buf: &mut SqlBuf) -> SqlResult<bool> {
        if self.whens.is_empty() {
            return Err(SqlError::structural(
                "case expression must contain at least one WHEN clause",
            ));
        }

        buf.push_str("CASE ");
        if let Some(subject) = &self.subject {
            if subject.write_sql(buf)? {
                buf.push(' ');
            }
        }

        for (when, then) in &self.whens {
            buf.push_str("WHEN ");
            if !when.write_sql(buf)? {
                return Err(SqlError::structural("case WHEN clause must not be empty"));
            }
            buf.push_str(" THEN ");
            if !then.write_sql(buf)? {
                return Err(SqlError::structural("case THEN clause must not be empty"));
            }
            buf.push(' ');
        }

        if let Some(otherwise) = &self.otherwise {
            buf.push_str("ELSE ");
            if !otherwise.write_sql(buf)? {
                return Err(SqlError::structural("case ELSE clause must not be empty"));
            }
            buf.push(' ');
        }

        buf.push_str("END");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Expr;
    use crate::{args, cols, expr};

    #[test]
    fn simple_case_with_else() {
        let case = Case::with_value("number")
            .when("1", "one")
            .when("2", "two")
            .otherwise(expr("?", args!["big number"]));
        let (sql, args) = case.to_sql().unwrap();
        assert_eq!(
            sql,
            "CASE number WHEN 1 THEN one WHEN 2 THEN two ELSE ? END"
        );
        assert_eq!(args, vec![Value::from("big number")]);
    }

    #[test]
    fn subject_with_args() {
        let case = Case::with_value_args("? > ?", args![10, 5]).when("true", "'T'");
        let (sql, args) = case.to_sql().unwrap();
        assert_eq!(sql, "CASE ? > ? WHEN true THEN 'T' END");
        assert_eq!(args, vec![Value::from(10), Value::from(5)]);
    }

    #[test]
    fn searched_case() {
        let case = Case::new()
            .when(Expr::eq(cols! { "x" => 0 }), "x is zero")
            .when(
                Expr::gt(cols! { "x" => 1 }),
                expr("CONCAT('x is greater than ', ?)", args![2]),
            );
        let (sql, args) = case.to_sql().unwrap();
        assert_eq!(
            sql,
            "CASE WHEN x = ? THEN x is zero WHEN x > ? THEN CONCAT('x is greater than ', ?) END"
        );
        assert_eq!(args, vec![Value::from(0), Value::from(1), Value::from(2)]);
    }

    #[test]
    fn expression_subject() {
        let case = Case::with_value(Expr::eq(cols! { "x" => true }))
            .when("true", expr("?", args!["it's true!"]))
            .otherwise("42");
        let (sql, args) = case.to_sql().unwrap();
        assert_eq!(sql, "CASE x = ? WHEN true THEN ? ELSE 42 END");
        assert_eq!(args, vec![Value::from(true), Value::from("it's true!")]);
    }

    #[test]
    fn no_when_is_an_error() {
        let cases = [
            Case::new(),
            Case::with_value("x"),
            Case::with_value("x").otherwise("42"),
        ];
        for case in cases {
            let err = case.to_sql().unwrap_err();
            assert!(err.is_structural());
            assert_eq!(
                err.to_string(),
                "case expression must contain at least one WHEN clause"
            );
        }
    }

    #[test]
    fn empty_branches_are_errors() {
        let err = Case::new().when(Expr::and(vec![]), "1").to_sql().unwrap_err();
        assert!(err.is_structural());
        assert_eq!(err.to_string(), "case WHEN clause must not be empty");

        let err = Case::new().when("a", "").to_sql().unwrap_err();
        assert_eq!(err.to_string(), "case THEN clause must not be empty");

        let err = Case::new()
            .when("a", "1")
            .otherwise(Expr::or(vec![]))
            .to_sql()
            .unwrap_err();
        assert_eq!(err.to_string(), "case ELSE clause must not be empty");

        // An empty subject is optional and simply left out.
        let (sql, _) = Case::with_value("").when("a", "1").to_sql().unwrap();
        assert_eq!(sql, "CASE WHEN a THEN 1 END");
    }

    #[test]
    fn map_branch_is_rejected() {
        let err = Case::new()
            .when(cols! { "x" => 1 }, "one")
            .to_sql()
            .unwrap_err();
        assert!(err.is_type_error());
    }

    #[test]
    fn nests_inside_expressions() {
        let case = Case::new().when("a", "1").otherwise("0");
        let (sql, _) = Expr::alias(case, "flag").to_sql().unwrap();
        assert_eq!(sql, "(CASE WHEN a THEN 1 ELSE 0 END) AS flag");
    }
}
