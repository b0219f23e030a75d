//! Clause parts: a predicate plus the arguments bound to its markers.
//!
//! Builders store result columns, `WHEN`/`THEN` branches and the like as a
//! [`Part`], and `WHERE`/`HAVING` conditions as a [`WherePart`]. Both accept
//! anything convertible into a [`Pred`]; the only difference is that a
//! where-part also knows how to compile a bare [`ColumnMap`].

use crate::case::Case;
use crate::error::{SqlError, SqlResult};
use crate::expr::predicate::{self, ColumnMap};
use crate::expr::{Arg, Expr, SqlBuf, SqlWriter, write_literal};

/// The predicate of a part.
#[derive(Clone, Debug, Default)]
pub enum Pred {
    /// Writes nothing. Empty strings convert to this.
    #[default]
    Empty,
    /// SQL text; `?` markers bind to the part's arguments.
    Sql(String),
    Expr(Expr),
    /// Equality map: `col = ?` pairs joined by `AND`.
    Map(ColumnMap),
}

impl Pred {
    pub fn is_empty(&self) -> bool {
        matches!(self, Pred::Empty)
    }
}

impl From<String> for Pred {
    fn from(s: String) -> Self {
        if s.is_empty() {
            Pred::Empty
        } else {
            Pred::Sql(s)
        }
    }
}

impl From<&str> for Pred {
    fn from(s: &str) -> Self {
        s.to_string().into()
    }
}

impl From<&String> for Pred {
    fn from(s: &String) -> Self {
        s.as_str().into()
    }
}

impl From<Expr> for Pred {
    fn from(e: Expr) -> Self {
        Pred::Expr(e)
    }
}

impl From<Case> for Pred {
    fn from(c: Case) -> Self {
        Pred::Expr(c.into())
    }
}

impl From<ColumnMap> for Pred {
    fn from(m: ColumnMap) -> Self {
        Pred::Map(m)
    }
}

impl<T: Into<Pred>> From<Option<T>> for Pred {
    fn from(p: Option<T>) -> Self {
        p.map_or(Pred::Empty, Into::into)
    }
}

/// A generic part. A column map is rejected here.
#[derive(Clone, Debug, Default)]
pub struct Part {
    pred: Pred,
    args: Vec<Arg>,
}

impl Part {
    /// `args` only apply to a [`Pred::Sql`] predicate.
    pub fn new(pred: impl Into<Pred>, args: Vec<Arg>) -> Self {
        Self {
            pred: pred.into(),
            args,
        }
    }

    pub fn pred(&self) -> &Pred {
        &self.pred
    }

    pub fn is_empty(&self) -> bool {
        self.pred.is_empty()
    }
}

impl SqlWriter for Part {
    fn write_sql(&self, buf: &mut SqlBuf) -> SqlResult<bool> {
        match &self.pred {
            Pred::Empty => Ok(false),
            Pred::Sql(sql) => write_literal(sql, &self.args, buf),
            Pred::Expr(e) => e.write_sql(buf),
            Pred::Map(_) => Err(SqlError::type_error(
                "expected string or expression, not column map",
            )),
        }
    }
}

/// A `WHERE` / `HAVING` part. A column map compiles as an equality map.
#[derive(Clone, Debug, Default)]
pub struct WherePart {
    pred: Pred,
    args: Vec<Arg>,
}

impl WherePart {
    pub fn new(pred: impl Into<Pred>, args: Vec<Arg>) -> Self {
        Self {
            pred: pred.into(),
            args,
        }
    }

    pub fn pred(&self) -> &Pred {
        &self.pred
    }

    pub fn is_empty(&self) -> bool {
        self.pred.is_empty()
    }
}

impl SqlWriter for WherePart {
    fn write_sql(&self, buf: &mut SqlBuf) -> SqlResult<bool> {
        match &self.pred {
            Pred::Empty => Ok(false),
            Pred::Sql(sql) => write_literal(sql, &self.args, buf),
            Pred::Expr(e) => e.write_sql(buf),
            Pred::Map(map) => predicate::write_equality(map, false, buf),
        }
    }
}
