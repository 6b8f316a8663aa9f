//! Row values, positional or keyed by column.

use std::collections::HashMap as StdHashMap;

use hashbrown::HashMap;
use mssql_types::SqlValue;
use serde_json::Value;

use crate::error::{BulkError, Result};

/// Values for one row.
///
/// Positional rows map onto columns in registration order; named rows map
/// by each column's row key. Values a row does not supply are sent as
/// NULL.
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Values in column order.
    Positional(Vec<SqlValue>),
    /// Values keyed by column row key.
    Named(HashMap<String, SqlValue>),
}

impl RowValues {
    /// Value for the column at `index` with row key `obj_name`.
    #[must_use]
    pub fn get(&self, index: usize, obj_name: &str) -> Option<&SqlValue> {
        match self {
            Self::Positional(values) => values.get(index),
            Self::Named(values) => values.get(obj_name),
        }
    }

    /// Number of supplied values.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Positional(values) => values.len(),
            Self::Named(values) => values.len(),
        }
    }

    /// Whether the row supplies no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build a row from JSON.
    ///
    /// An array is positional, an object is named and any other value is a
    /// single positional value. Nested arrays and objects are rejected.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Array(items) => items
                .iter()
                .map(json_scalar)
                .collect::<Result<Vec<_>>>()
                .map(Self::Positional),
            Value::Object(object) => object
                .iter()
                .map(|(key, value)| -> Result<(String, SqlValue)> {
                    Ok((key.clone(), json_scalar(value)?))
                })
                .collect::<Result<HashMap<_, _>>>()
                .map(Self::Named),
            scalar => Ok(Self::Positional(vec![json_scalar(scalar)?])),
        }
    }
}

fn json_scalar(value: &Value) -> Result<SqlValue> {
    match value {
        Value::Null => Ok(SqlValue::Null),
        Value::Bool(b) => Ok(SqlValue::Bool(*b)),
        Value::Number(n) => n
            .as_i64()
            .map(SqlValue::BigInt)
            .or_else(|| n.as_f64().map(SqlValue::Double))
            .ok_or_else(|| BulkError::TypeConstraint(format!("unsupported number {n}"))),
        Value::String(s) => Ok(SqlValue::String(s.clone())),
        Value::Array(_) | Value::Object(_) => Err(BulkError::TypeConstraint(
            "row values must be scalars".into(),
        )),
    }
}

impl From<SqlValue> for RowValues {
    fn from(value: SqlValue) -> Self {
        Self::Positional(vec![value])
    }
}

impl<T: Into<SqlValue>> From<Vec<T>> for RowValues {
    fn from(values: Vec<T>) -> Self {
        Self::Positional(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<SqlValue>, const N: usize> From<[T; N]> for RowValues {
    fn from(values: [T; N]) -> Self {
        Self::Positional(values.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<String>, V: Into<SqlValue>> From<HashMap<K, V>> for RowValues {
    fn from(values: HashMap<K, V>) -> Self {
        Self::Named(values.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<SqlValue>> From<StdHashMap<K, V>> for RowValues {
    fn from(values: StdHashMap<K, V>) -> Self {
        Self::Named(values.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<SqlValue>> FromIterator<(K, V)> for RowValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::Named(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
