//! Any-to-any value conversion.
//!
//! `Value::convert_to` dispatches on the target kind to one per-target rule
//! per family. Each rule enumerates the source kinds it accepts; every pair
//! not listed fails with [`Error::DataConversion`]. Session-dependent
//! conversions (local time zone, current timestamp) and external codecs
//! (geometry) come in through [`CastContext`], never from ambient state.

pub mod collection;
pub mod interval;
pub mod numeric;
pub mod special;
pub mod string;
pub mod temporal;

use crate::error::{Error, Result};
use crate::types::interval::IntervalQualifier;
use crate::types::kind::ValueKind;
use crate::types::type_info::TypeInfo;
use crate::types::value::Value;
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use rust_decimal::{Decimal, RoundingStrategy};

/// Session facts needed by temporal conversions: the current timestamp and
/// the local UTC offset. Offset computation tables live outside this crate;
/// implementations typically wrap the session's time zone.
pub trait CastProvider {
    /// The session's current timestamp, carrying its zone offset.
    fn current_timestamp(&self) -> DateTime<FixedOffset>;

    /// UTC offset in seconds in effect at the given date-time, expressed
    /// in UTC.
    fn offset_seconds_at(&self, at: NaiveDateTime) -> i32;
}

/// A provider pinned to one instant and one fixed offset. Sessions snapshot
/// their clock into one of these per statement; tests construct them
/// directly for determinism.
#[derive(Debug, Clone, Copy)]
pub struct FixedCastProvider {
    now: DateTime<FixedOffset>,
}

impl FixedCastProvider {
    pub fn new(now: DateTime<FixedOffset>) -> FixedCastProvider {
        FixedCastProvider { now }
    }
}

impl CastProvider for FixedCastProvider {
    fn current_timestamp(&self) -> DateTime<FixedOffset> {
        self.now
    }

    fn offset_seconds_at(&self, _at: NaiveDateTime) -> i32 {
        self.now.offset().local_minus_utc()
    }
}

/// External geometry codec. The value engine treats geometry payloads as
/// opaque EWKB bytes; parsing and rendering are delegated here.
pub trait GeometryCodec {
    /// Parse a well-known-text literal into EWKB bytes and an SRID.
    fn parse_text(&self, wkt: &str) -> Result<(Vec<u8>, i32)>;

    /// Validate well-known-binary input, returning EWKB bytes and the SRID.
    fn parse_binary(&self, wkb: &[u8]) -> Result<(Vec<u8>, i32)>;

    /// Render EWKB to well-known text.
    fn to_text(&self, ewkb: &[u8], srid: i32) -> Result<String>;

    /// Render EWKB to a GeoJSON document.
    fn to_json(&self, ewkb: &[u8], srid: i32) -> Result<serde_json::Value>;
}

/// Everything a conversion may need beyond the value itself. All fields are
/// optional; a conversion that needs an absent collaborator fails instead of
/// guessing.
#[derive(Default, Clone, Copy)]
pub struct CastContext<'a> {
    pub provider: Option<&'a dyn CastProvider>,
    pub geometry: Option<&'a dyn GeometryCodec>,
    /// Column name for overflow diagnostics, when assigning to a column.
    pub column: Option<&'a str>,
}

impl<'a> CastContext<'a> {
    pub fn with_provider(provider: &'a dyn CastProvider) -> CastContext<'a> {
        CastContext {
            provider: Some(provider),
            geometry: None,
            column: None,
        }
    }

    pub(crate) fn column(&self) -> &str {
        self.column.unwrap_or("")
    }

    pub(crate) fn provider(&self) -> Result<&'a dyn CastProvider> {
        self.provider.ok_or_else(|| {
            Error::InvalidValue("conversion requires a session time provider".into())
        })
    }

    pub(crate) fn geometry(&self) -> Result<&'a dyn GeometryCodec> {
        self.geometry
            .ok_or_else(|| Error::InvalidValue("conversion requires a geometry codec".into()))
    }
}

impl Value {
    /// Convert this value to the target type, returning a new value. NULL
    /// converts to anything as NULL; a same-kind conversion is the identity
    /// unless the target carries extended metadata to re-validate against.
    pub fn convert_to(&self, target: &TypeInfo, ctx: &CastContext<'_>) -> Result<Value> {
        if target.kind == ValueKind::Unknown {
            return Err(Error::UnknownType("cannot convert to UNKNOWN".into()));
        }
        if self.is_null() {
            return Ok(Value::Null);
        }
        if self.kind() == target.kind {
            return match &target.ext {
                Some(ext) => ext.cast(self),
                None => Ok(self.clone()),
            };
        }
        match target.kind {
            ValueKind::Null => Ok(Value::Null),
            ValueKind::Boolean => numeric::to_boolean(self),
            ValueKind::TinyInt | ValueKind::SmallInt | ValueKind::Integer | ValueKind::BigInt => {
                numeric::to_integer(self, target.kind, ctx.column())
            }
            ValueKind::Numeric => numeric::to_numeric(self, ctx.column()),
            ValueKind::Double => numeric::to_double(self),
            ValueKind::Real => numeric::to_real(self),
            ValueKind::Date => temporal::to_date(self, ctx),
            ValueKind::Time => temporal::to_time(self, ctx),
            ValueKind::TimeTz => temporal::to_time_tz(self, ctx),
            ValueKind::Timestamp => temporal::to_timestamp(self, ctx),
            ValueKind::TimestampTz => temporal::to_timestamp_tz(self, ctx),
            ValueKind::Varchar
            | ValueKind::VarcharIgnoreCase
            | ValueKind::Char
            | ValueKind::Clob => string::to_character(self, target.kind, ctx),
            ValueKind::Varbinary | ValueKind::Blob => special::to_binary(self, target.kind),
            ValueKind::JavaObject => special::to_java_object(self),
            ValueKind::Uuid => special::to_uuid(self),
            ValueKind::Geometry => special::to_geometry(self, target, ctx),
            ValueKind::Enum => special::to_enum(self, target),
            ValueKind::Json => special::to_json(self, ctx),
            ValueKind::Array => collection::to_array(self),
            ValueKind::Row => collection::to_row(self),
            ValueKind::ResultSet => Ok(collection::to_result_set(self)),
            kind => match IntervalQualifier::from_value_kind(kind) {
                Some(qualifier) => interval::to_interval(self, qualifier, ctx.column()),
                None => Err(Error::DataConversion {
                    from: self.kind(),
                    to: kind,
                }),
            },
        }
    }

    /// `convert_to` with a bare target kind.
    pub fn convert_to_kind(&self, kind: ValueKind, ctx: &CastContext<'_>) -> Result<Value> {
        self.convert_to(&TypeInfo::new(kind), ctx)
    }

    /// Adjust the scale of a NUMERIC value, rounding half away from zero
    /// when digits are dropped. With `only_to_smaller` the scale is never
    /// increased. Identity for every other kind.
    pub fn convert_scale(&self, only_to_smaller: bool, scale: u32) -> Value {
        match self {
            Value::Numeric(d) => {
                if scale < d.scale() {
                    Value::Numeric(
                        d.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero),
                    )
                } else if scale > d.scale() && !only_to_smaller {
                    let mut widened = *d;
                    widened.rescale(scale);
                    Value::Numeric(widened)
                } else {
                    self.clone()
                }
            }
            other => other.clone(),
        }
    }

    /// Truncate character values to `precision` characters and binary values
    /// to `precision` bytes. Identity for every other kind.
    pub fn convert_precision(&self, precision: u32) -> Value {
        let precision = precision as usize;
        match self {
            Value::Varchar(s) => Value::Varchar(truncate_chars(s, precision)),
            Value::VarcharIgnoreCase(s) => Value::VarcharIgnoreCase(truncate_chars(s, precision)),
            Value::Char(s) => Value::Char(truncate_chars(s, precision)),
            Value::Clob(s) => Value::Clob(truncate_chars(s, precision)),
            Value::Varbinary(b) if b.len() > precision => {
                Value::Varbinary(b[..precision].to_vec())
            }
            Value::Blob(b) if b.len() > precision => Value::Blob(b[..precision].to_vec()),
            other => other.clone(),
        }
    }

    pub fn as_boolean(&self) -> Result<bool> {
        match self.convert_to_kind(ValueKind::Boolean, &CastContext::default())? {
            Value::Boolean(b) => Ok(b),
            other => Err(not_extractable(&other, ValueKind::Boolean)),
        }
    }

    pub fn as_i8(&self) -> Result<i8> {
        match self.convert_to_kind(ValueKind::TinyInt, &CastContext::default())? {
            Value::TinyInt(i) => Ok(i),
            other => Err(not_extractable(&other, ValueKind::TinyInt)),
        }
    }

    pub fn as_i16(&self) -> Result<i16> {
        match self.convert_to_kind(ValueKind::SmallInt, &CastContext::default())? {
            Value::SmallInt(i) => Ok(i),
            other => Err(not_extractable(&other, ValueKind::SmallInt)),
        }
    }

    pub fn as_i32(&self) -> Result<i32> {
        match self.convert_to_kind(ValueKind::Integer, &CastContext::default())? {
            Value::Integer(i) => Ok(i),
            other => Err(not_extractable(&other, ValueKind::Integer)),
        }
    }

    pub fn as_i64(&self) -> Result<i64> {
        match self.convert_to_kind(ValueKind::BigInt, &CastContext::default())? {
            Value::BigInt(i) => Ok(i),
            other => Err(not_extractable(&other, ValueKind::BigInt)),
        }
    }

    pub fn as_decimal(&self) -> Result<Decimal> {
        match self.convert_to_kind(ValueKind::Numeric, &CastContext::default())? {
            Value::Numeric(d) => Ok(d),
            other => Err(not_extractable(&other, ValueKind::Numeric)),
        }
    }

    pub fn as_f64(&self) -> Result<f64> {
        match self.convert_to_kind(ValueKind::Double, &CastContext::default())? {
            Value::Double(v) => Ok(v),
            other => Err(not_extractable(&other, ValueKind::Double)),
        }
    }

    pub fn as_f32(&self) -> Result<f32> {
        match self.convert_to_kind(ValueKind::Real, &CastContext::default())? {
            Value::Real(v) => Ok(v),
            other => Err(not_extractable(&other, ValueKind::Real)),
        }
    }

    pub fn as_bytes(&self) -> Result<Vec<u8>> {
        match self.convert_to_kind(ValueKind::Varbinary, &CastContext::default())? {
            Value::Varbinary(b) => Ok(b),
            other => Err(not_extractable(&other, ValueKind::Varbinary)),
        }
    }

    pub fn as_str(&self) -> Result<String> {
        match self.convert_to_kind(ValueKind::Varchar, &CastContext::default())? {
            Value::Varchar(s) => Ok(s),
            other => Err(not_extractable(&other, ValueKind::Varchar)),
        }
    }
}

fn not_extractable(value: &Value, kind: ValueKind) -> Error {
    Error::DataConversion {
        from: value.kind(),
        to: kind,
    }
}

fn truncate_chars(s: &str, precision: usize) -> String {
    s.chars().take(precision).collect()
}

// Shared by the numeric and interval rules: a decimal rounded half away
// from zero to an integer, as a signed 128-bit magnitude.
pub(crate) fn round_half_up(d: Decimal) -> i128 {
    d.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .mantissa()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_converts_to_anything() {
        let ctx = CastContext::default();
        for kind in crate::types::kind::CONCRETE_KINDS {
            if kind == ValueKind::Null {
                continue;
            }
            assert_eq!(Value::Null.convert_to_kind(kind, &ctx).unwrap(), Value::Null);
        }
    }

    #[test]
    fn test_same_kind_is_identity() {
        let ctx = CastContext::default();
        let v = Value::Varchar("abc".into());
        assert_eq!(v.convert_to_kind(ValueKind::Varchar, &ctx).unwrap(), v);
    }

    #[test]
    fn test_convert_scale_half_up() {
        let v = Value::Numeric(Decimal::new(125, 2)); // 1.25
        assert_eq!(
            v.convert_scale(true, 1),
            Value::Numeric(Decimal::new(13, 1))
        );
        // only_to_smaller keeps the scale as-is.
        assert_eq!(v.convert_scale(true, 4), v);
        assert_eq!(
            v.convert_scale(false, 4),
            Value::Numeric(Decimal::new(12500, 4))
        );
    }

    #[test]
    fn test_convert_precision_truncates() {
        let v = Value::Varchar("hello".into());
        assert_eq!(v.convert_precision(3), Value::Varchar("hel".into()));
        let b = Value::Varbinary(vec![1, 2, 3]);
        assert_eq!(b.convert_precision(2), Value::Varbinary(vec![1, 2]));
        assert_eq!(Value::Integer(5).convert_precision(1), Value::Integer(5));
    }
}
