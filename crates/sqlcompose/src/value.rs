//! Argument values bound to `?` placeholders.
//!
//! [`Value`] is what ends up in the argument list of a compiled statement. It
//! keeps enough shape for the predicate compilers to tell `NULL`, arrays and
//! scalars apart, and implements [`ToSql`] so the list can be handed straight
//! to `tokio-postgres`.

use crate::error::{BoxError, SqlError, SqlResult};
use bytes::BytesMut;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};

/// A value that produces its underlying storable form on demand.
///
/// Equality and comparison predicates call [`Valuer::value`] before deciding
/// whether a value is `NULL`, a list or a scalar. Errors are propagated
/// verbatim as [`SqlError::Valuer`].
///
/// # Example
/// ```ignore
/// #[derive(Debug)]
/// struct Cents(Option<i64>);
///
/// impl Valuer for Cents {
///     fn value(&self) -> Result<Value, BoxError> {
///         Ok(self.0.into())
///     }
/// }
/// ```
pub trait Valuer: fmt::Debug + Send + Sync {
    /// Produce the storable value.
    fn value(&self) -> Result<Value, BoxError>;
}

/// An argument value.
#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Bool(bool),
    SmallInt(i16),
    Int(i32),
    BigInt(i64),
    Real(f32),
    Double(f64),
    Text(String),
    /// Raw bytes. Always a scalar, never expanded into an `IN` list.
    Bytes(Vec<u8>),
    Uuid(uuid::Uuid),
    Timestamp(chrono::DateTime<chrono::Utc>),
    Date(chrono::NaiveDate),
    Json(serde_json::Value),
    /// A list of values; expands to `IN (?, ?, ...)` in equality predicates.
    Array(Vec<Value>),
    /// A value that must be unwrapped before use.
    Valuer(Arc<dyn Valuer>),
}

impl Value {
    /// Wrap a [`Valuer`].
    pub fn valuer<V: Valuer + 'static>(v: V) -> Self {
        Value::Valuer(Arc::new(v))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Unwrap a [`Value::Valuer`] once; any other value is returned borrowed.
    pub fn resolve(&self) -> SqlResult<Cow<'_, Value>> {
        match self {
            Value::Valuer(v) => v.value().map(Cow::Owned).map_err(SqlError::Valuer),
            other => Ok(Cow::Borrowed(other)),
        }
    }

    /// Short name of the variant, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::SmallInt(_) => "smallint",
            Value::Int(_) => "int",
            Value::BigInt(_) => "bigint",
            Value::Real(_) => "real",
            Value::Double(_) => "double",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Uuid(_) => "uuid",
            Value::Timestamp(_) => "timestamp",
            Value::Date(_) => "date",
            Value::Json(_) => "json",
            Value::Array(_) => "array",
            Value::Valuer(_) => "valuer",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match (self, other) {
            (Null, Null) => true,
            (Bool(a), Bool(b)) => a == b,
            (SmallInt(a), SmallInt(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (BigInt(a), BigInt(b)) => a == b,
            (Real(a), Real(b)) => a == b,
            (Double(a), Double(b)) => a == b,
            (Text(a), Text(b)) => a == b,
            (Bytes(a), Bytes(b)) => a == b,
            (Uuid(a), Uuid(b)) => a == b,
            (Timestamp(a), Timestamp(b)) => a == b,
            (Date(a), Date(b)) => a == b,
            (Json(a), Json(b)) => a == b,
            (Array(a), Array(b)) => a == b,
            // Valuers have no structural identity.
            (Valuer(a), Valuer(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

macro_rules! impl_from {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::$variant(v.into())
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i8 => SmallInt,
    i16 => SmallInt,
    i32 => Int,
    u16 => Int,
    i64 => BigInt,
    u32 => BigInt,
    f32 => Real,
    f64 => Double,
    String => Text,
    &str => Text,
    &String => Text,
    &[u8] => Bytes,
    uuid::Uuid => Uuid,
    chrono::DateTime<chrono::Utc> => Timestamp,
    chrono::NaiveDate => Date,
    serde_json::Value => Json,
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(v: [T; N]) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(v) => v.to_sql_checked(ty, out),
            Value::SmallInt(v) => v.to_sql_checked(ty, out),
            Value::Int(v) => v.to_sql_checked(ty, out),
            Value::BigInt(v) => v.to_sql_checked(ty, out),
            Value::Real(v) => v.to_sql_checked(ty, out),
            Value::Double(v) => v.to_sql_checked(ty, out),
            Value::Text(v) => v.to_sql_checked(ty, out),
            Value::Bytes(v) => v.to_sql_checked(ty, out),
            Value::Uuid(v) => v.to_sql_checked(ty, out),
            Value::Timestamp(v) => v.to_sql_checked(ty, out),
            Value::Date(v) => v.to_sql_checked(ty, out),
            Value::Json(v) => v.to_sql_checked(ty, out),
            Value::Array(items) => items.to_sql_checked(ty, out),
            Value::Valuer(v) => v.value()?.to_sql(ty, out),
        }
    }

    // The concrete check happens per variant in `to_sql`.
    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}
