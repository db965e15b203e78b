//! Conversion rules for the boolean and numeric target kinds, and the range
//! guards shared by everything that narrows a number.

use crate::convert::round_half_up;
use crate::error::{Error, Result};
use crate::types::kind::ValueKind;
use crate::types::value::Value;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::str::FromStr;

fn overflow(value: impl ToString, column: &str) -> Error {
    Error::NumericOverflow {
        value: value.to_string(),
        column: column.to_string(),
    }
}

fn rejected(from: &Value, to: ValueKind) -> Error {
    Error::DataConversion {
        from: from.kind(),
        to,
    }
}

/// Parse a trimmed textual integer. Non-numeric text is a malformed
/// literal, not a conversion error.
pub(crate) fn parse_i64(text: &str) -> Result<i64> {
    i64::from_str(text.trim()).map_err(|_| Error::MalformedLiteral(text.to_string()))
}

pub(crate) fn parse_decimal(text: &str) -> Result<Decimal> {
    let trimmed = text.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| Error::MalformedLiteral(text.to_string()))
}

/// Round a finite double to the nearest integer, ties away from zero, with
/// an explicit range check against i64.
pub(crate) fn i64_from_f64(v: f64, column: &str) -> Result<i64> {
    const BOUND: f64 = 9_223_372_036_854_775_808.0; // 2^63
    if !v.is_finite() {
        return Err(overflow(v, column));
    }
    let rounded = v.round();
    if rounded >= BOUND || rounded < -BOUND {
        return Err(overflow(v, column));
    }
    Ok(rounded as i64)
}

/// Round a decimal to the nearest integer, ties away from zero, with an
/// explicit range check against i64.
pub(crate) fn i64_from_decimal(d: Decimal, column: &str) -> Result<i64> {
    i64::try_from(round_half_up(d)).map_err(|_| overflow(d, column))
}

/// Numeric truthiness is "signum is not zero". Temporal, binary,
/// Java-object, UUID and enum sources are rejected outright; text accepts
/// the boolean words and otherwise falls back to a numeric parse.
pub(crate) fn to_boolean(v: &Value) -> Result<Value> {
    let b = match v {
        Value::TinyInt(i) => *i != 0,
        Value::SmallInt(i) => *i != 0,
        Value::Integer(i) => *i != 0,
        Value::BigInt(i) => *i != 0,
        Value::Numeric(d) => !d.is_zero(),
        Value::Double(f) => *f != 0.0,
        Value::Real(f) => *f != 0.0,
        Value::Varchar(s) | Value::VarcharIgnoreCase(s) | Value::Char(s) | Value::Clob(s) => {
            parse_boolean_text(s)?
        }
        other => return Err(rejected(other, ValueKind::Boolean)),
    };
    Ok(Value::Boolean(b))
}

fn parse_boolean_text(text: &str) -> Result<bool> {
    let word = text.trim();
    if ["true", "t", "yes", "y"]
        .iter()
        .any(|w| word.eq_ignore_ascii_case(w))
    {
        return Ok(true);
    }
    if ["false", "f", "no", "n"]
        .iter()
        .any(|w| word.eq_ignore_ascii_case(w))
    {
        return Ok(false);
    }
    Ok(!parse_decimal(text)?.is_zero())
}

/// Conversion to one of the four integer kinds. Widening is lossless;
/// narrowing and all numeric sources go through the range guards. Binary
/// sources are accepted only at the target's natural width, in big-endian
/// byte order; any other width is re-read through the textual form.
pub(crate) fn to_integer(v: &Value, target: ValueKind, column: &str) -> Result<Value> {
    let n: i64 = match v {
        Value::Boolean(b) => *b as i64,
        Value::TinyInt(i) => *i as i64,
        Value::SmallInt(i) => *i as i64,
        Value::Integer(i) => *i as i64,
        Value::BigInt(i) => *i,
        Value::Numeric(d) => i64_from_decimal(*d, column)?,
        Value::Double(f) => i64_from_f64(*f, column)?,
        Value::Real(f) => i64_from_f64(*f as f64, column)?,
        Value::Enum { ordinal, .. } => *ordinal as i64,
        Value::Interval(i) => i.leading_signed()?,
        Value::Varbinary(b) | Value::Blob(b) => int_from_bytes(b, target)?,
        Value::Varchar(s) | Value::VarcharIgnoreCase(s) | Value::Char(s) | Value::Clob(s) => {
            parse_i64(s)?
        }
        other => return Err(rejected(other, target)),
    };
    match target {
        ValueKind::TinyInt => i8::try_from(n)
            .map(Value::TinyInt)
            .map_err(|_| overflow(n, column)),
        ValueKind::SmallInt => i16::try_from(n)
            .map(Value::SmallInt)
            .map_err(|_| overflow(n, column)),
        ValueKind::Integer => i32::try_from(n)
            .map(Value::Integer)
            .map_err(|_| overflow(n, column)),
        _ => Ok(Value::BigInt(n)),
    }
}

fn int_from_bytes(bytes: &[u8], target: ValueKind) -> Result<i64> {
    match (target, bytes) {
        (ValueKind::TinyInt, &[b0]) => Ok(i8::from_be_bytes([b0]) as i64),
        (ValueKind::SmallInt, &[b0, b1]) => Ok(i16::from_be_bytes([b0, b1]) as i64),
        (ValueKind::Integer, &[b0, b1, b2, b3]) => {
            Ok(i32::from_be_bytes([b0, b1, b2, b3]) as i64)
        }
        (ValueKind::BigInt, &[b0, b1, b2, b3, b4, b5, b6, b7]) => {
            Ok(i64::from_be_bytes([b0, b1, b2, b3, b4, b5, b6, b7]))
        }
        _ => parse_i64(&hex::encode(bytes)),
    }
}

pub(crate) fn to_numeric(v: &Value, column: &str) -> Result<Value> {
    let d = match v {
        Value::Boolean(b) => Decimal::from(*b as i8),
        Value::TinyInt(i) => Decimal::from(*i),
        Value::SmallInt(i) => Decimal::from(*i),
        Value::Integer(i) => Decimal::from(*i),
        Value::BigInt(i) => Decimal::from(*i),
        Value::Double(f) => Decimal::from_f64(*f).ok_or_else(|| overflow(*f, column))?,
        Value::Real(f) => Decimal::from_f32(*f).ok_or_else(|| overflow(*f, column))?,
        Value::Enum { ordinal, .. } => Decimal::from(*ordinal),
        Value::Interval(i) => i.to_decimal(),
        Value::Varchar(s) | Value::VarcharIgnoreCase(s) | Value::Char(s) | Value::Clob(s) => {
            parse_decimal(s)?
        }
        other => return Err(rejected(other, ValueKind::Numeric)),
    };
    Ok(Value::Numeric(d))
}

pub(crate) fn to_double(v: &Value) -> Result<Value> {
    let f = match v {
        Value::Boolean(b) => *b as i8 as f64,
        Value::TinyInt(i) => *i as f64,
        Value::SmallInt(i) => *i as f64,
        Value::Integer(i) => *i as f64,
        Value::BigInt(i) => *i as f64,
        Value::Numeric(d) => d.to_f64().unwrap_or(f64::NAN),
        Value::Real(f) => *f as f64,
        Value::Interval(i) => i.to_decimal().to_f64().unwrap_or(f64::NAN),
        Value::Varchar(s) | Value::VarcharIgnoreCase(s) | Value::Char(s) | Value::Clob(s) => {
            parse_f64(s)?
        }
        other => return Err(rejected(other, ValueKind::Double)),
    };
    Ok(Value::Double(f))
}

pub(crate) fn to_real(v: &Value) -> Result<Value> {
    match to_double(v) {
        Ok(Value::Double(f)) => Ok(Value::Real(f as f32)),
        Ok(other) => Err(rejected(&other, ValueKind::Real)),
        Err(Error::DataConversion { from, .. }) => Err(Error::DataConversion {
            from,
            to: ValueKind::Real,
        }),
        Err(e) => Err(e),
    }
}

fn parse_f64(text: &str) -> Result<f64> {
    f64::from_str(text.trim()).map_err(|_| Error::MalformedLiteral(text.to_string()))
}
