//! Conversion rules for the thirteen interval target kinds.

use crate::convert::{numeric, round_half_up};
use crate::error::{Error, Result};
use crate::types::interval::{Interval, IntervalQualifier};
use crate::types::value::Value;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

fn overflow(value: impl ToString, column: &str) -> Error {
    Error::NumericOverflow {
        value: value.to_string(),
        column: column.to_string(),
    }
}

/// Convert to an interval of the given qualifier.
///
/// Integral sources fill the leading field with the extracted sign.
/// Fractional sources targeting SECOND or a compound qualifier scale by the
/// qualifier's leading unit, round half away from zero and re-expand
/// through the absolute form, so NUMERIC 1.5 becomes INTERVAL '1-6' YEAR TO
/// MONTH. Interval sources re-expand within the same family; crossing the
/// year-month/day-time divide is undefined.
pub(crate) fn to_interval(
    v: &Value,
    qualifier: IntervalQualifier,
    column: &str,
) -> Result<Value> {
    let interval = match v {
        Value::TinyInt(i) => from_leading(qualifier, *i as i64)?,
        Value::SmallInt(i) => from_leading(qualifier, *i as i64)?,
        Value::Integer(i) => from_leading(qualifier, *i as i64)?,
        Value::BigInt(i) => from_leading(qualifier, *i)?,
        Value::Numeric(d) => from_decimal(qualifier, *d, column)?,
        Value::Double(f) => {
            let d = Decimal::from_f64(*f).ok_or_else(|| overflow(*f, column))?;
            from_decimal(qualifier, d, column)?
        }
        Value::Real(f) => {
            let d = Decimal::from_f32(*f).ok_or_else(|| overflow(*f, column))?;
            from_decimal(qualifier, d, column)?
        }
        Value::Interval(src) => {
            if src.qualifier.is_year_month() != qualifier.is_year_month() {
                return Err(Error::DataConversion {
                    from: v.kind(),
                    to: qualifier.value_kind(),
                });
            }
            Interval::from_absolute(qualifier, src.to_absolute())?
        }
        Value::Varchar(s) | Value::VarcharIgnoreCase(s) | Value::Char(s) | Value::Clob(s) => {
            Interval::parse(qualifier, s)?
        }
        other => {
            return Err(Error::DataConversion {
                from: other.kind(),
                to: qualifier.value_kind(),
            })
        }
    };
    Ok(Value::Interval(interval))
}

fn from_leading(qualifier: IntervalQualifier, leading: i64) -> Result<Interval> {
    Interval::new(qualifier, leading < 0, leading.unsigned_abs(), 0)
}

fn from_decimal(qualifier: IntervalQualifier, d: Decimal, column: &str) -> Result<Interval> {
    if qualifier.accepts_fractional() {
        let unit = Decimal::from_i128_with_scale(qualifier.leading_unit(), 0);
        let absolute = d
            .checked_mul(unit)
            .map(round_half_up)
            .ok_or_else(|| overflow(d, column))?;
        Interval::from_absolute(qualifier, absolute)
    } else {
        from_leading(qualifier, numeric::i64_from_decimal(d, column)?)
    }
}
