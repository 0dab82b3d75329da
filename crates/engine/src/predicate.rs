//! Predicate builder
//!
//! A [`Predicate`] is a boolean filter expression plus the values bound to
//! its positional `?` placeholders. Every constructor emits exactly one
//! placeholder per value operand, and composition concatenates operand
//! parameters left to right, so `placeholder_count() == params().len()`
//! holds for any predicate however deeply it is nested.
//!
//! Field names are emitted as quoted identifiers. Values are always bound,
//! never spliced into the text.
//!
//! "No filter" is `Option<Predicate>::None` at every consuming site; it
//! renders as no `WHERE` clause and binds nothing.
//!
//! # Example
//!
//! ```
//! use docstore_engine::Predicate;
//!
//! let p = Predicate::equal("si0", "h").and(!Predicate::between("ni0", 1, 5));
//! assert_eq!(p.clause(), r#"("si0" = ?) AND (NOT ("ni0" BETWEEN ? AND ?))"#);
//! assert_eq!(p.params().len(), 3);
//! ```

use crate::schema::quote_ident;
use docstore_core::{codec, Value};
use rusqlite::types::{ToSql, ToSqlOutput, Value as SqlValue};
use std::ops::Not;

/// Composable parameterized filter
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    clause: String,
    params: Vec<Value>,
}

impl Predicate {
    fn compare(field: &str, op: &str, value: Value) -> Self {
        Self {
            clause: format!("{} {op} ?", quote_ident(field)),
            params: vec![value],
        }
    }

    fn list(field: &str, op: &str, values: Vec<Value>) -> Self {
        let placeholders = vec!["?"; values.len()].join(", ");
        Self {
            clause: format!("{} {op} ({placeholders})", quote_ident(field)),
            params: values,
        }
    }

    fn range(field: &str, op: &str, low: Value, high: Value) -> Self {
        Self {
            clause: format!("{} {op} ? AND ?", quote_ident(field)),
            params: vec![low, high],
        }
    }

    fn null_check(field: &str, op: &str) -> Self {
        Self {
            clause: format!("{} {op}", quote_ident(field)),
            params: Vec::new(),
        }
    }

    /// `field = value`
    pub fn equal(field: &str, value: impl Into<Value>) -> Self {
        Self::compare(field, "=", value.into())
    }

    /// `field != value`
    pub fn not_equal(field: &str, value: impl Into<Value>) -> Self {
        Self::compare(field, "!=", value.into())
    }

    /// `field < value`
    pub fn less(field: &str, value: impl Into<Value>) -> Self {
        Self::compare(field, "<", value.into())
    }

    /// `field <= value`
    pub fn less_equal(field: &str, value: impl Into<Value>) -> Self {
        Self::compare(field, "<=", value.into())
    }

    /// `field > value`
    pub fn greater(field: &str, value: impl Into<Value>) -> Self {
        Self::compare(field, ">", value.into())
    }

    /// `field >= value`
    pub fn greater_equal(field: &str, value: impl Into<Value>) -> Self {
        Self::compare(field, ">=", value.into())
    }

    /// `field ISNULL`
    pub fn is_null(field: &str) -> Self {
        Self::null_check(field, "ISNULL")
    }

    /// `field NOTNULL`
    pub fn is_not_null(field: &str) -> Self {
        Self::null_check(field, "NOTNULL")
    }

    /// `field IN (values...)`
    ///
    /// An empty list is accepted and matches nothing.
    pub fn in_list<I, V>(field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::list(field, "IN", values.into_iter().map(Into::into).collect())
    }

    /// `field NOT IN (values...)`
    ///
    /// An empty list is accepted and matches every row.
    pub fn not_in_list<I, V>(field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::list(field, "NOT IN", values.into_iter().map(Into::into).collect())
    }

    /// `field BETWEEN low AND high`
    pub fn between(field: &str, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        Self::range(field, "BETWEEN", low.into(), high.into())
    }

    /// `field NOT BETWEEN low AND high`
    pub fn not_between(field: &str, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        Self::range(field, "NOT BETWEEN", low.into(), high.into())
    }

    /// `field LIKE pattern`
    pub fn like(field: &str, pattern: impl Into<String>) -> Self {
        Self::compare(field, "LIKE", Value::String(pattern.into()))
    }

    /// `field NOT LIKE pattern`
    pub fn not_like(field: &str, pattern: impl Into<String>) -> Self {
        Self::compare(field, "NOT LIKE", Value::String(pattern.into()))
    }

    /// `field GLOB pattern`
    pub fn glob(field: &str, pattern: impl Into<String>) -> Self {
        Self::compare(field, "GLOB", Value::String(pattern.into()))
    }

    /// `field NOT GLOB pattern`
    pub fn not_glob(field: &str, pattern: impl Into<String>) -> Self {
        Self::compare(field, "NOT GLOB", Value::String(pattern.into()))
    }

    /// `(self) AND (other)`
    pub fn and(self, other: Predicate) -> Self {
        self.join("AND", other)
    }

    /// `(self) OR (other)`
    pub fn or(self, other: Predicate) -> Self {
        self.join("OR", other)
    }

    fn join(mut self, op: &str, other: Predicate) -> Self {
        self.clause = format!("({}) {op} ({})", self.clause, other.clause);
        self.params.extend(other.params);
        self
    }

    /// Expression text, without the `WHERE` keyword
    pub fn clause(&self) -> &str {
        &self.clause
    }

    /// Bound values, in placeholder order
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Number of `?` placeholders in the clause, ignoring quoted identifiers
    pub fn placeholder_count(&self) -> usize {
        let mut quoted = false;
        let mut count = 0;
        for c in self.clause.chars() {
            match c {
                '"' => quoted = !quoted,
                '?' if !quoted => count += 1,
                _ => {}
            }
        }
        count
    }
}

impl Not for Predicate {
    type Output = Predicate;

    /// `NOT (self)`
    fn not(mut self) -> Predicate {
        self.clause = format!("NOT ({})", self.clause);
        self
    }
}

/// ` WHERE <clause>` for a filter, or nothing
pub(crate) fn where_sql(filter: Option<&Predicate>) -> String {
    match filter {
        Some(p) => format!(" WHERE {}", p.clause),
        None => String::new(),
    }
}

/// Values to bind for a filter
pub(crate) fn bind_params(filter: Option<&Predicate>) -> impl Iterator<Item = SqlParam<'_>> {
    filter
        .map(|p| p.params.as_slice())
        .unwrap_or_default()
        .iter()
        .map(SqlParam)
}

/// Binds a [`Value`] as a SQL parameter.
///
/// Arrays and objects are bound as their JSON text. NaN and infinities are
/// rejected.
pub(crate) struct SqlParam<'a>(&'a Value);

impl ToSql for SqlParam<'_> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self.0 {
            Value::Null => ToSqlOutput::Owned(SqlValue::Null),
            Value::Bool(b) => ToSqlOutput::Owned(SqlValue::Integer(i64::from(*b))),
            Value::Int(i) => ToSqlOutput::Owned(SqlValue::Integer(*i)),
            Value::Float(f) if !f.is_finite() => {
                return Err(rusqlite::Error::ToSqlConversionFailure(
                    format!("cannot bind non-finite float {f}").into(),
                ));
            }
            Value::Float(f) => ToSqlOutput::Owned(SqlValue::Real(*f)),
            Value::String(s) => ToSqlOutput::from(s.as_str()),
            nested @ (Value::Array(_) | Value::Object(_)) => {
                let text = codec::encode(nested)
                    .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
                ToSqlOutput::Owned(SqlValue::Text(text))
            }
        })
    }
}
