//! Comparison and promotion integration tests.

use rust_decimal::Decimal;
use sqlval::{
    compare_to, compare_type_safe, compare_with_null, CastContext, EnumDomain, Error, TypeInfo,
    Value, ValueCache, ValueKind,
};
use std::cmp::Ordering;
use std::str::FromStr;

#[test]
fn test_promotion_bands() {
    use ValueKind::*;
    // Within a binary operation the higher-ranked kind wins.
    assert_eq!(ValueKind::higher_order(Varchar, Integer).unwrap(), Integer);
    assert_eq!(ValueKind::higher_order(Integer, Double).unwrap(), Double);
    assert_eq!(ValueKind::higher_order(Double, IntervalYear).unwrap(), IntervalYear);
    assert_eq!(ValueKind::higher_order(IntervalYear, Time).unwrap(), Time);
    assert_eq!(ValueKind::higher_order(Time, Date).unwrap(), Date);
    assert_eq!(ValueKind::higher_order(Timestamp, TimestampTz).unwrap(), TimestampTz);
    assert_eq!(ValueKind::higher_order(Uuid, Geometry).unwrap(), Geometry);
    assert_eq!(ValueKind::higher_order(Json, Array).unwrap(), Array);
}

#[test]
fn test_unknown_promotion_failures() {
    use ValueKind::*;
    assert!(matches!(
        ValueKind::higher_order(Unknown, Unknown),
        Err(Error::UnknownType(_))
    ));
    assert!(ValueKind::higher_order(Unknown, Null).is_err());
    assert!(ValueKind::higher_order(Null, Unknown).is_err());
    // UNKNOWN against a concrete kind resolves to the concrete kind.
    assert_eq!(ValueKind::higher_order(Unknown, Varchar).unwrap(), Varchar);
}

#[test]
fn test_sort_order_with_nulls_first() {
    let ctx = CastContext::default();
    let mut values = vec![
        Value::Integer(3),
        Value::Null,
        Value::Integer(-7),
        Value::Null,
        Value::Integer(0),
    ];
    values.sort_by(|a, b| compare_to(a, b, &ctx).unwrap_or(Ordering::Equal));
    assert_eq!(
        values,
        vec![
            Value::Null,
            Value::Null,
            Value::Integer(-7),
            Value::Integer(0),
            Value::Integer(3),
        ]
    );
}

#[test]
fn test_mixed_kind_comparison_promotes() {
    let ctx = CastContext::default();
    // SMALLINT vs NUMERIC compares as NUMERIC.
    assert_eq!(
        compare_to(
            &Value::SmallInt(2),
            &Value::Numeric(Decimal::from_str("2.0").unwrap()),
            &ctx
        )
        .unwrap(),
        Ordering::Equal
    );
    // VARCHAR '10' vs INTEGER 9 compares numerically, not lexically.
    assert_eq!(
        compare_to(&Value::Varchar("10".into()), &Value::Integer(9), &ctx).unwrap(),
        Ordering::Greater
    );
    // An unparsable string surfaces the conversion failure.
    assert!(compare_to(&Value::Varchar("ten".into()), &Value::Integer(9), &ctx).is_err());
}

#[test]
fn test_enum_comparison_unifies_domains() {
    let ctx = CastContext::default();
    let domain = EnumDomain::new(["LOW", "MID", "HIGH"]).unwrap();
    let low = Value::Enum {
        domain: domain.clone(),
        ordinal: 0,
    };
    let high = Value::Enum {
        domain: domain.clone(),
        ordinal: 2,
    };
    assert_eq!(compare_to(&low, &high, &ctx).unwrap(), Ordering::Less);
    // Text resolves through the enum operand's domain.
    assert_eq!(
        compare_to(&Value::Varchar("MID".into()), &high, &ctx).unwrap(),
        Ordering::Less
    );
    assert_eq!(
        compare_to(&Value::Varchar("HIGH".into()), &high, &ctx).unwrap(),
        Ordering::Equal
    );
    // A label outside the domain is not comparable.
    assert!(compare_to(&Value::Varchar("EXTREME".into()), &high, &ctx).is_err());
}

#[test]
fn test_enum_domain_merge_keeps_left_order() {
    let a = EnumDomain::new(["A", "B"]).unwrap();
    let b = EnumDomain::new(["B", "C"]).unwrap();
    let left = Value::Enum {
        domain: a,
        ordinal: 0,
    };
    let right = Value::Enum {
        domain: b,
        ordinal: 1,
    };
    let merged = EnumDomain::for_binary_operation(&left, &right).unwrap();
    assert_eq!(merged.labels(), ["A", "B", "C"]);
}

#[test]
fn test_three_valued_comparison() {
    let ctx = CastContext::default();
    assert_eq!(
        compare_with_null(&Value::Null, &Value::Null, true, &ctx).unwrap(),
        None
    );
    assert_eq!(
        compare_with_null(&Value::Integer(1), &Value::Null, false, &ctx).unwrap(),
        None
    );
    assert_eq!(
        compare_with_null(&Value::Integer(1), &Value::Integer(2), false, &ctx).unwrap(),
        Some(Ordering::Less)
    );
}

#[test]
fn test_numeric_scale_comparability_vs_equality() {
    // 0.0 and 0.00 compare equal yet are distinct values; both facts must
    // hold at once.
    let a = Value::Numeric(Decimal::from_str("0.0").unwrap());
    let b = Value::Numeric(Decimal::from_str("0.00").unwrap());
    assert_eq!(compare_type_safe(&a, &b).unwrap(), Ordering::Equal);
    assert_ne!(a, b);
}

#[test]
fn test_higher_type_merges_metadata() {
    let lhs = TypeInfo::with_precision(ValueKind::Numeric, 8, 3);
    let rhs = TypeInfo::with_precision(ValueKind::Integer, 10, 0);
    let merged = TypeInfo::higher(&lhs, &rhs).unwrap();
    assert_eq!(merged.kind, ValueKind::Numeric);
    assert_eq!((merged.precision, merged.scale), (10, 3));
}

#[test]
fn test_cache_is_semantically_transparent() {
    let ctx = CastContext::default();
    let cache = ValueCache::with_capacity(64);
    let direct = Value::Varchar("42".into());
    let interned = cache.intern(Value::Varchar("42".into()));
    assert_eq!(
        direct.convert_to_kind(ValueKind::Integer, &ctx).unwrap(),
        interned.convert_to_kind(ValueKind::Integer, &ctx).unwrap()
    );
    assert_eq!(
        compare_to(&direct, &interned, &ctx).unwrap(),
        Ordering::Equal
    );
    cache.clear();
    assert_eq!(
        compare_to(&direct, &cache.intern(Value::Varchar("42".into())), &ctx).unwrap(),
        Ordering::Equal
    );
}
