//! Error types for the value engine

use crate::types::interval::IntervalQualifier;
use crate::types::kind::ValueKind;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// No conversion rule connects the two kinds.
    #[error("Data conversion error converting {from} to {to}")]
    DataConversion { from: ValueKind, to: ValueKind },

    /// A numeric value lies outside the target kind's representable range.
    /// `column` names the column being assigned, if known; empty otherwise.
    #[error("Numeric value out of range: {value}{}", fmt_column(.column))]
    NumericOverflow { value: String, column: String },

    /// A textual numeral or boolean word failed to parse.
    #[error("Malformed literal: {0:?}")]
    MalformedLiteral(String),

    /// A textual interval did not match its qualifier's grammar.
    #[error("Invalid INTERVAL {qualifier} literal: {text:?}")]
    InvalidIntervalLiteral {
        qualifier: IntervalQualifier,
        text: String,
    },

    /// A result set with more than one row was collapsed to a scalar row.
    #[error("Scalar subquery contains more than one row")]
    ScalarSubqueryCardinality,

    /// Type promotion was requested with untyped placeholder operands.
    #[error("Unknown data type: {0}")]
    UnknownType(String),

    /// Contract misuse or a malformed payload that no kind pair describes.
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

fn fmt_column(column: &str) -> String {
    if column.is_empty() {
        String::new()
    } else {
        format!(" in column {column}")
    }
}
