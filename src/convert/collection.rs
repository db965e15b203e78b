//! Conversion rules for the array, row and result-set target kinds.

use crate::error::{Error, Result};
use crate::types::value::{RowSet, Value};

/// Any non-array value wraps as a one-element array.
pub(crate) fn to_array(v: &Value) -> Result<Value> {
    Ok(match v {
        Value::Array(items) => Value::Array(items.clone()),
        other => Value::Array(vec![other.clone()]),
    })
}

/// Any non-row value wraps as a one-field row. A result set collapses to
/// its single row; zero rows read as NULL and more than one row is a
/// cardinality violation.
pub(crate) fn to_row(v: &Value) -> Result<Value> {
    Ok(match v {
        Value::Row(fields) => Value::Row(fields.clone()),
        Value::ResultSet(rs) => match rs.rows.len() {
            0 => Value::Null,
            1 => Value::Row(rs.rows[0].clone()),
            _ => return Err(Error::ScalarSubqueryCardinality),
        },
        other => Value::Row(vec![other.clone()]),
    })
}

/// Wrap a value as a materialized result set with generated column names.
pub(crate) fn to_result_set(v: &Value) -> Value {
    match v {
        Value::ResultSet(rs) => Value::ResultSet(rs.clone()),
        Value::Row(fields) => Value::ResultSet(RowSet {
            columns: (1..=fields.len()).map(|i| format!("C{i}")).collect(),
            rows: vec![fields.clone()],
        }),
        other => Value::ResultSet(RowSet {
            columns: vec!["C1".to_string()],
            rows: vec![vec![other.clone()]],
        }),
    }
}
