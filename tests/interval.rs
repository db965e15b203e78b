//! Interval literal and conversion integration tests.

use rust_decimal::Decimal;
use sqlval::{
    compare_to, CastContext, Error, Interval, IntervalQualifier, Value, ValueKind,
};
use std::cmp::Ordering;
use std::str::FromStr;

fn convert(v: Value, kind: ValueKind) -> sqlval::Result<Value> {
    v.convert_to_kind(kind, &CastContext::default())
}

#[test]
fn test_integer_to_interval_extracts_sign() {
    let v = convert(Value::Integer(25), ValueKind::IntervalMonth).unwrap();
    match &v {
        Value::Interval(i) => {
            assert!(!i.negative);
            assert_eq!((i.leading, i.remaining), (25, 0));
        }
        other => panic!("unexpected value {other:?}"),
    }
    let v = convert(Value::Integer(-25), ValueKind::IntervalMonth).unwrap();
    match &v {
        Value::Interval(i) => {
            assert!(i.negative);
            assert_eq!(i.leading, 25);
        }
        other => panic!("unexpected value {other:?}"),
    }
}

#[test]
fn test_fractional_sources_scale_by_unit() {
    // 1.5 days is 1 day 12 hours.
    let v = convert(
        Value::Numeric(Decimal::from_str("1.5").unwrap()),
        ValueKind::IntervalDayToHour,
    )
    .unwrap();
    assert_eq!(v.to_text(), "INTERVAL '1 12' DAY TO HOUR");
    // 90.75 seconds keeps its fraction as nanoseconds.
    let v = convert(
        Value::Numeric(Decimal::from_str("90.75").unwrap()),
        ValueKind::IntervalSecond,
    )
    .unwrap();
    assert_eq!(v.to_text(), "INTERVAL '90.75' SECOND");
    // DOUBLE sources take the same path.
    let v = convert(Value::Double(1.5), ValueKind::IntervalYearToMonth).unwrap();
    assert_eq!(v.to_text(), "INTERVAL '1-6' YEAR TO MONTH");
}

#[test]
fn test_interval_to_numeric_is_exact() {
    let i = Interval::parse(IntervalQualifier::DayToHour, "1 12").unwrap();
    assert_eq!(
        Value::Interval(i).as_decimal().unwrap(),
        Decimal::from_str("1.5").unwrap()
    );
    let i = Interval::parse(IntervalQualifier::Month, "-25").unwrap();
    assert_eq!(Value::Interval(i).as_i64().unwrap(), -25);
}

#[test]
fn test_requalification_within_family() {
    let src = convert(
        Value::Varchar("36".into()),
        ValueKind::IntervalMonth,
    )
    .unwrap();
    let years = convert(src.clone(), ValueKind::IntervalYear).unwrap();
    assert_eq!(years.to_text(), "INTERVAL '3' YEAR");
    let ym = convert(src.clone(), ValueKind::IntervalYearToMonth).unwrap();
    assert_eq!(ym.to_text(), "INTERVAL '3-0' YEAR TO MONTH");
    // Year-month and day-time families never mix.
    assert!(matches!(
        convert(src, ValueKind::IntervalHour),
        Err(Error::DataConversion { .. })
    ));
}

#[test]
fn test_literal_display_parse_round_trip() {
    let literals = [
        (IntervalQualifier::Year, "7"),
        (IntervalQualifier::YearToMonth, "-2-11"),
        (IntervalQualifier::DayToSecond, "3 04:05:06.25"),
        (IntervalQualifier::HourToSecond, "100:59:59.999999999"),
        (IntervalQualifier::MinuteToSecond, "-5:30.5"),
        (IntervalQualifier::Second, "0.000000001"),
    ];
    for (qualifier, body) in literals {
        let parsed = Interval::parse(qualifier, body).unwrap();
        let displayed = parsed.to_string();
        assert_eq!(Interval::parse(qualifier, &displayed).unwrap(), parsed, "{displayed}");
    }
}

#[test]
fn test_oversized_day_count_is_an_error_not_a_panic() {
    // A leading field beyond 18 digits is rejected at the literal, so the
    // value can never reach the decimal conversion in the first place.
    let err = convert(
        Value::Varchar("18446744073709551615".into()),
        ValueKind::IntervalDay,
    )
    .unwrap_err();
    assert!(matches!(err, Error::InvalidIntervalLiteral { .. }));
    // At the bound itself both the literal and the NUMERIC conversion work.
    let v = convert(
        Value::Varchar("999999999999999999".into()),
        ValueKind::IntervalDay,
    )
    .unwrap();
    assert_eq!(
        v.as_decimal().unwrap(),
        Decimal::from_str("999999999999999999").unwrap()
    );
}

#[test]
fn test_malformed_literals() {
    for (qualifier, body) in [
        (IntervalQualifier::YearToMonth, "1:2"),
        (IntervalQualifier::YearToMonth, "1-12"),
        (IntervalQualifier::DayToHour, "1 24"),
        (IntervalQualifier::DayToMinute, "0 1:99"),
        (IntervalQualifier::DayToSecond, "0 00:00:75"),
        (IntervalQualifier::HourToSecond, "1:75:00"),
        (IntervalQualifier::Second, "1.1234567890"),
        (IntervalQualifier::Day, ""),
        (IntervalQualifier::Day, "--1"),
    ] {
        assert!(
            matches!(
                Interval::parse(qualifier, body),
                Err(Error::InvalidIntervalLiteral { .. })
            ),
            "{body:?} should not parse as INTERVAL {qualifier}"
        );
    }
}

#[test]
fn test_interval_ordering_is_signed() {
    let ctx = CastContext::default();
    let neg = Value::Interval(Interval::parse(IntervalQualifier::Hour, "-2").unwrap());
    let pos = Value::Interval(Interval::parse(IntervalQualifier::Minute, "30").unwrap());
    // -2 hours < 30 minutes after promotion to the higher interval kind.
    assert_eq!(compare_to(&neg, &pos, &ctx).unwrap(), Ordering::Less);
}

#[test]
fn test_interval_text_round_trip_through_varchar() {
    let ctx = CastContext::default();
    let v = convert(
        Value::Varchar("-3 04:05:06".into()),
        ValueKind::IntervalDayToSecond,
    )
    .unwrap();
    let text = v.convert_to_kind(ValueKind::Varchar, &ctx).unwrap();
    assert_eq!(
        text,
        Value::Varchar("INTERVAL '-3 04:05:06' DAY TO SECOND".into())
    );
    assert_eq!(
        text.convert_to_kind(ValueKind::IntervalDayToSecond, &ctx).unwrap(),
        v
    );
}
