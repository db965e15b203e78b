//! The value comparison protocol.
//!
//! Three entry points with distinct NULL contracts: `compare_type_safe`
//! orders two values that already share a kind; `compare_to` is the total
//! sort order where NULL is less than everything and equal to itself;
//! `compare_with_null` is the predicate order, yielding `None` whenever the
//! outcome depends on a NULL.

use crate::convert::CastContext;
use crate::error::{Error, Result};
use crate::types::ext::{EnumDomain, ExtTypeInfo};
use crate::types::kind::ValueKind;
use crate::types::type_info::TypeInfo;
use crate::types::value::Value;
use std::cmp::Ordering;

/// Order two values of the same kind. No coercion happens here; callers
/// promote first. Mismatched kinds are a contract violation.
pub fn compare_type_safe(a: &Value, b: &Value) -> Result<Ordering> {
    match (a, b) {
        (Value::Null, Value::Null) => Ok(Ordering::Equal),
        (Value::Boolean(x), Value::Boolean(y)) => Ok(x.cmp(y)),
        (Value::TinyInt(x), Value::TinyInt(y)) => Ok(x.cmp(y)),
        (Value::SmallInt(x), Value::SmallInt(y)) => Ok(x.cmp(y)),
        (Value::Integer(x), Value::Integer(y)) => Ok(x.cmp(y)),
        (Value::BigInt(x), Value::BigInt(y)) => Ok(x.cmp(y)),
        // Value order, not representation order: 0.0 and 0.00 tie here
        // even though they are not `equal`.
        (Value::Numeric(x), Value::Numeric(y)) => Ok(x.cmp(y)),
        (Value::Double(x), Value::Double(y)) => Ok(x.total_cmp(y)),
        (Value::Real(x), Value::Real(y)) => Ok(x.total_cmp(y)),
        (Value::Date(x), Value::Date(y)) => Ok(x.cmp(y)),
        (Value::Time(x), Value::Time(y)) => Ok(x.cmp(y)),
        (
            Value::TimeTz { time: xt, offset_seconds: xo },
            Value::TimeTz { time: yt, offset_seconds: yo },
        ) => Ok(utc_time_nanos(xt, *xo).cmp(&utc_time_nanos(yt, *yo))),
        (Value::Timestamp(x), Value::Timestamp(y)) => Ok(x.cmp(y)),
        // chrono orders zoned timestamps by instant.
        (Value::TimestampTz(x), Value::TimestampTz(y)) => Ok(x.cmp(y)),
        (Value::Varbinary(x), Value::Varbinary(y)) => Ok(x.cmp(y)),
        (Value::Blob(x), Value::Blob(y)) => Ok(x.cmp(y)),
        (Value::JavaObject(x), Value::JavaObject(y)) => Ok(x.cmp(y)),
        (Value::Varchar(x), Value::Varchar(y)) => Ok(x.cmp(y)),
        (Value::Char(x), Value::Char(y)) => Ok(x.cmp(y)),
        (Value::Clob(x), Value::Clob(y)) => Ok(x.cmp(y)),
        (Value::VarcharIgnoreCase(x), Value::VarcharIgnoreCase(y)) => {
            Ok(compare_ignore_case(x, y))
        }
        (Value::Uuid(x), Value::Uuid(y)) => Ok(x.cmp(y)),
        (
            Value::Geometry { ewkb: xb, srid: xs },
            Value::Geometry { ewkb: yb, srid: ys },
        ) => Ok(xb.cmp(yb).then(xs.cmp(ys))),
        (
            Value::Enum { ordinal: x, .. },
            Value::Enum { ordinal: y, .. },
        ) => Ok(x.cmp(y)),
        (Value::Interval(x), Value::Interval(y)) if x.qualifier.is_year_month() == y.qualifier.is_year_month() => {
            Ok(x.compare(y))
        }
        (Value::Json(x), Value::Json(y)) => Ok(x.to_string().cmp(&y.to_string())),
        (Value::Array(x), Value::Array(y)) => compare_arrays(x, y),
        (Value::Row(x), Value::Row(y)) => compare_rows(x, y),
        _ => Err(Error::InvalidValue(format!(
            "values of kinds {} and {} are not directly comparable",
            a.kind(),
            b.kind()
        ))),
    }
}

fn utc_time_nanos(time: &chrono::NaiveTime, offset_seconds: i32) -> i64 {
    use chrono::Timelike;
    time.num_seconds_from_midnight() as i64 * 1_000_000_000 + time.nanosecond() as i64
        - offset_seconds as i64 * 1_000_000_000
}

fn compare_ignore_case(x: &str, y: &str) -> Ordering {
    x.chars()
        .flat_map(char::to_lowercase)
        .cmp(y.chars().flat_map(char::to_lowercase))
}

/// Element-wise, shorter array first on a common prefix.
fn compare_arrays(x: &[Value], y: &[Value]) -> Result<Ordering> {
    let ctx = CastContext::default();
    for (xe, ye) in x.iter().zip(y) {
        let ord = compare_to(xe, ye, &ctx)?;
        if ord != Ordering::Equal {
            return Ok(ord);
        }
    }
    Ok(x.len().cmp(&y.len()))
}

/// Field-wise; rows of different degree are not comparable.
fn compare_rows(x: &[Value], y: &[Value]) -> Result<Ordering> {
    if x.len() != y.len() {
        return Err(Error::InvalidValue(format!(
            "rows of degree {} and {} are not comparable",
            x.len(),
            y.len()
        )));
    }
    let ctx = CastContext::default();
    for (xe, ye) in x.iter().zip(y) {
        let ord = compare_to(xe, ye, &ctx)?;
        if ord != Ordering::Equal {
            return Ok(ord);
        }
    }
    Ok(Ordering::Equal)
}

/// Total sort order. NULL sorts below every non-NULL value and equal to
/// itself; differing kinds promote to the higher-ranked kind and the lower
/// side is converted before comparing.
pub fn compare_to(a: &Value, b: &Value, ctx: &CastContext<'_>) -> Result<Ordering> {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ok(Ordering::Equal),
        (true, false) => Ok(Ordering::Less),
        (false, true) => Ok(Ordering::Greater),
        (false, false) => compare_non_null(a, b, ctx),
    }
}

fn compare_non_null(a: &Value, b: &Value, ctx: &CastContext<'_>) -> Result<Ordering> {
    let a_kind = a.kind();
    let b_kind = b.kind();
    if a_kind == b_kind && a_kind != ValueKind::Enum {
        return compare_type_safe(a, b);
    }
    let kind = ValueKind::higher_order(a_kind, b_kind)?;
    if kind == ValueKind::Enum {
        // Both operands resolve against one shared label domain, so ordinal
        // order is meaningful across them.
        let domain = EnumDomain::for_binary_operation(a, b)?;
        let mut target = TypeInfo::new(ValueKind::Enum);
        target.ext = Some(ExtTypeInfo::Enum(domain));
        return compare_type_safe(&a.convert_to(&target, ctx)?, &b.convert_to(&target, ctx)?);
    }
    compare_type_safe(
        &a.convert_to_kind(kind, ctx)?,
        &b.convert_to_kind(kind, ctx)?,
    )
}

/// Predicate order under three-valued logic: `None` when either operand is
/// NULL. For row and array operands compared for equality, a definite
/// inequality in any element pair decides the outcome even when other
/// elements are NULL.
pub fn compare_with_null(
    a: &Value,
    b: &Value,
    for_equality: bool,
    ctx: &CastContext<'_>,
) -> Result<Option<Ordering>> {
    if for_equality {
        match (a, b) {
            (Value::Row(x), Value::Row(y)) => {
                if x.len() != y.len() {
                    return Err(Error::InvalidValue(format!(
                        "rows of degree {} and {} are not comparable",
                        x.len(),
                        y.len()
                    )));
                }
                return compare_elements_with_null(x, y, Ordering::Equal, ctx);
            }
            (Value::Array(x), Value::Array(y)) => {
                return compare_elements_with_null(x, y, x.len().cmp(&y.len()), ctx);
            }
            _ => {}
        }
    }
    if a.is_null() || b.is_null() {
        return Ok(None);
    }
    compare_non_null(a, b, ctx).map(Some)
}

fn compare_elements_with_null(
    x: &[Value],
    y: &[Value],
    tail: Ordering,
    ctx: &CastContext<'_>,
) -> Result<Option<Ordering>> {
    let mut unknown = false;
    for (xe, ye) in x.iter().zip(y) {
        match compare_with_null(xe, ye, true, ctx)? {
            None => unknown = true,
            Some(Ordering::Equal) => {}
            Some(ord) => return Ok(Some(ord)),
        }
    }
    if unknown {
        Ok(None)
    } else {
        Ok(Some(tail))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_null_sorts_first_but_compares_unknown() {
        let ctx = CastContext::default();
        assert_eq!(
            compare_to(&Value::Null, &Value::Integer(i32::MIN), &ctx).unwrap(),
            Ordering::Less
        );
        assert_eq!(compare_to(&Value::Null, &Value::Null, &ctx).unwrap(), Ordering::Equal);
        assert_eq!(
            compare_with_null(&Value::Null, &Value::Null, true, &ctx).unwrap(),
            None
        );
        assert_eq!(
            compare_with_null(&Value::Null, &Value::Integer(1), false, &ctx).unwrap(),
            None
        );
    }

    #[test]
    fn test_numeric_order_ignores_scale() {
        let a = Value::Numeric(Decimal::new(0, 1)); // 0.0
        let b = Value::Numeric(Decimal::new(0, 2)); // 0.00
        assert_eq!(compare_type_safe(&a, &b).unwrap(), Ordering::Equal);
        assert_ne!(a, b);
    }

    #[test]
    fn test_mixed_kinds_promote() {
        let ctx = CastContext::default();
        // INTEGER against DOUBLE compares as DOUBLE.
        assert_eq!(
            compare_to(&Value::Integer(2), &Value::Double(2.5), &ctx).unwrap(),
            Ordering::Less
        );
        // Text against a number compares numerically.
        assert_eq!(
            compare_to(&Value::Varchar("10".into()), &Value::Integer(9), &ctx).unwrap(),
            Ordering::Greater
        );
    }

    #[test]
    fn test_ignore_case_order() {
        let a = Value::VarcharIgnoreCase("Apple".into());
        let b = Value::VarcharIgnoreCase("aPPLE".into());
        assert_eq!(compare_type_safe(&a, &b).unwrap(), Ordering::Equal);
    }

    #[test]
    fn test_time_tz_orders_by_instant() {
        use chrono::NaiveTime;
        let x = Value::TimeTz {
            time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            offset_seconds: 3600,
        };
        let y = Value::TimeTz {
            time: NaiveTime::from_hms_opt(11, 30, 0).unwrap(),
            offset_seconds: 0,
        };
        // 12:00+01:00 is 11:00 UTC, before 11:30 UTC.
        assert_eq!(compare_type_safe(&x, &y).unwrap(), Ordering::Less);
    }

    #[test]
    fn test_row_equality_with_nulls() {
        let ctx = CastContext::default();
        let x = Value::Row(vec![Value::Integer(1), Value::Null]);
        let y = Value::Row(vec![Value::Integer(2), Value::Null]);
        // First fields differ, so the NULLs never matter.
        assert_eq!(
            compare_with_null(&x, &y, true, &ctx).unwrap(),
            Some(Ordering::Less)
        );
        let z = Value::Row(vec![Value::Integer(1), Value::Null]);
        assert_eq!(compare_with_null(&x, &z, true, &ctx).unwrap(), None);
    }

    #[test]
    fn test_mismatched_row_degree_rejected() {
        let x = Value::Row(vec![Value::Integer(1)]);
        let y = Value::Row(vec![Value::Integer(1), Value::Integer(2)]);
        assert!(compare_type_safe(&x, &y).is_err());
    }
}
