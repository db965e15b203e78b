//! The runtime SQL value: a tagged union over the closed kind set

use crate::types::ext::{EnumDomain, ExtTypeInfo};
use crate::types::interval::Interval;
use crate::types::kind::ValueKind;
use crate::types::type_info::TypeInfo;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// A materialized result set: named columns and their rows. The row
/// iteration machinery proper lives outside this crate; conversions only
/// need the materialized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// A runtime SQL value. Every variant carries exactly the payload its kind
/// needs; values are immutable once constructed, and conversions always
/// produce new values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    Null,
    Boolean(bool),
    TinyInt(i8),
    SmallInt(i16),
    Integer(i32),
    BigInt(i64),
    Numeric(Decimal),
    Double(f64),
    Real(f32),
    Date(NaiveDate),
    Time(NaiveTime),
    TimeTz { time: NaiveTime, offset_seconds: i32 },
    Timestamp(NaiveDateTime),
    TimestampTz(DateTime<FixedOffset>),
    Varbinary(Vec<u8>),
    Varchar(String),
    VarcharIgnoreCase(String),
    Char(String),
    /// Small LOBs are carried inline; streaming backing stores are the
    /// responsibility of an external large-object store.
    Blob(Vec<u8>),
    Clob(String),
    /// Opaque serialized object bytes.
    JavaObject(Vec<u8>),
    Uuid(Uuid),
    /// Geometry payload in EWKB form; codecs are external collaborators.
    Geometry { ewkb: Vec<u8>, srid: i32 },
    Enum { domain: EnumDomain, ordinal: i32 },
    Interval(Interval),
    Json(serde_json::Value),
    Array(Vec<Value>),
    Row(Vec<Value>),
    ResultSet(RowSet),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::TinyInt(_) => ValueKind::TinyInt,
            Value::SmallInt(_) => ValueKind::SmallInt,
            Value::Integer(_) => ValueKind::Integer,
            Value::BigInt(_) => ValueKind::BigInt,
            Value::Numeric(_) => ValueKind::Numeric,
            Value::Double(_) => ValueKind::Double,
            Value::Real(_) => ValueKind::Real,
            Value::Date(_) => ValueKind::Date,
            Value::Time(_) => ValueKind::Time,
            Value::TimeTz { .. } => ValueKind::TimeTz,
            Value::Timestamp(_) => ValueKind::Timestamp,
            Value::TimestampTz(_) => ValueKind::TimestampTz,
            Value::Varbinary(_) => ValueKind::Varbinary,
            Value::Varchar(_) => ValueKind::Varchar,
            Value::VarcharIgnoreCase(_) => ValueKind::VarcharIgnoreCase,
            Value::Char(_) => ValueKind::Char,
            Value::Blob(_) => ValueKind::Blob,
            Value::Clob(_) => ValueKind::Clob,
            Value::JavaObject(_) => ValueKind::JavaObject,
            Value::Uuid(_) => ValueKind::Uuid,
            Value::Geometry { .. } => ValueKind::Geometry,
            Value::Enum { .. } => ValueKind::Enum,
            Value::Interval(interval) => interval.qualifier.value_kind(),
            Value::Json(_) => ValueKind::Json,
            Value::Array(_) => ValueKind::Array,
            Value::Row(_) => ValueKind::Row,
            Value::ResultSet(_) => ValueKind::ResultSet,
        }
    }

    /// The data type descriptor of this value, with natural precision and
    /// scale and the extended metadata shared with the value.
    pub fn type_info(&self) -> TypeInfo {
        let mut info = TypeInfo::new(self.kind());
        match self {
            Value::Numeric(d) => {
                info.precision = digits_of(d);
                info.scale = d.scale();
            }
            Value::Varchar(s) | Value::VarcharIgnoreCase(s) | Value::Char(s)
            | Value::Clob(s) => {
                info.precision = s.chars().count() as u32;
            }
            Value::Varbinary(b) | Value::Blob(b) | Value::JavaObject(b) => {
                info.precision = b.len() as u32;
            }
            Value::Geometry { ewkb, srid } => {
                info.precision = ewkb.len() as u32;
                info.ext = Some(ExtTypeInfo::Geometry { srid: Some(*srid) });
            }
            Value::Enum { domain, .. } => {
                info.ext = Some(ExtTypeInfo::Enum(domain.clone()));
            }
            _ => {}
        }
        info
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// True if this value is NULL or any of its elements is.
    pub fn contains_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Array(items) | Value::Row(items) => items.iter().any(Value::contains_null),
            Value::ResultSet(rs) => rs.rows.iter().flatten().any(Value::contains_null),
            _ => false,
        }
    }

    /// Approximate in-memory footprint in bytes, for resource accounting.
    pub fn memory(&self) -> usize {
        let base = std::mem::size_of::<Value>();
        base + match self {
            Value::Varbinary(b) | Value::Blob(b) | Value::JavaObject(b) => b.len(),
            Value::Geometry { ewkb, .. } => ewkb.len(),
            Value::Varchar(s) | Value::VarcharIgnoreCase(s) | Value::Char(s)
            | Value::Clob(s) => s.len(),
            Value::Json(j) => j.to_string().len(),
            Value::Array(items) | Value::Row(items) => {
                items.iter().map(Value::memory).sum()
            }
            Value::ResultSet(rs) => rs.rows.iter().flatten().map(Value::memory).sum(),
            Value::Enum { domain, .. } => {
                domain.labels().iter().map(String::len).sum()
            }
            _ => 0,
        }
    }
}

fn digits_of(d: &Decimal) -> u32 {
    let mantissa = d.mantissa().unsigned_abs();
    if mantissa == 0 {
        1
    } else {
        mantissa.ilog10() + 1
    }
}

/// Equality is kind-exact and structural: no coercion is performed, so
/// values of different kinds are never equal even when they would compare
/// equal after promotion. NUMERIC equality is scale-sensitive (0.0 and 0.00
/// differ) while NUMERIC ordering is not; float equality is bit-based, so
/// NaN equals NaN and -0.0 differs from 0.0, consistent with `total_cmp`.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::TinyInt(a), Value::TinyInt(b)) => a == b,
            (Value::SmallInt(a), Value::SmallInt(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::Numeric(a), Value::Numeric(b)) => {
                a.mantissa() == b.mantissa() && a.scale() == b.scale()
            }
            (Value::Double(a), Value::Double(b)) => a.to_bits() == b.to_bits(),
            (Value::Real(a), Value::Real(b)) => a.to_bits() == b.to_bits(),
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            (
                Value::TimeTz { time: a, offset_seconds: ao },
                Value::TimeTz { time: b, offset_seconds: bo },
            ) => a == b && ao == bo,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::TimestampTz(a), Value::TimestampTz(b)) => {
                a.naive_local() == b.naive_local() && a.offset() == b.offset()
            }
            (Value::Varbinary(a), Value::Varbinary(b)) => a == b,
            (Value::Varchar(a), Value::Varchar(b)) => a == b,
            (Value::VarcharIgnoreCase(a), Value::VarcharIgnoreCase(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Blob(a), Value::Blob(b)) => a == b,
            (Value::Clob(a), Value::Clob(b)) => a == b,
            (Value::JavaObject(a), Value::JavaObject(b)) => a == b,
            (Value::Uuid(a), Value::Uuid(b)) => a == b,
            (
                Value::Geometry { ewkb: a, srid: asrid },
                Value::Geometry { ewkb: b, srid: bsrid },
            ) => a == b && asrid == bsrid,
            (
                Value::Enum { domain: a, ordinal: ao },
                Value::Enum { domain: b, ordinal: bo },
            ) => ao == bo && a == b,
            (Value::Interval(a), Value::Interval(b)) => a == b,
            (Value::Json(a), Value::Json(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Row(a), Value::Row(b)) => a == b,
            (Value::ResultSet(a), Value::ResultSet(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        match self {
            Value::Null => {}
            Value::Boolean(b) => b.hash(state),
            Value::TinyInt(i) => i.hash(state),
            Value::SmallInt(i) => i.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::BigInt(i) => i.hash(state),
            Value::Numeric(d) => {
                d.mantissa().hash(state);
                d.scale().hash(state);
            }
            Value::Double(f) => f.to_bits().hash(state),
            Value::Real(f) => f.to_bits().hash(state),
            Value::Date(d) => d.hash(state),
            Value::Time(t) => t.hash(state),
            Value::TimeTz { time, offset_seconds } => {
                time.hash(state);
                offset_seconds.hash(state);
            }
            Value::Timestamp(ts) => ts.hash(state),
            Value::TimestampTz(ts) => {
                ts.naive_local().hash(state);
                ts.offset().local_minus_utc().hash(state);
            }
            Value::Varbinary(b) | Value::Blob(b) | Value::JavaObject(b) => b.hash(state),
            Value::Varchar(s) | Value::VarcharIgnoreCase(s) | Value::Char(s)
            | Value::Clob(s) => s.hash(state),
            Value::Uuid(u) => u.hash(state),
            Value::Geometry { ewkb, srid } => {
                ewkb.hash(state);
                srid.hash(state);
            }
            Value::Enum { domain, ordinal } => {
                domain.hash(state);
                ordinal.hash(state);
            }
            Value::Interval(i) => i.hash(state),
            Value::Json(j) => j.to_string().hash(state),
            Value::Array(items) | Value::Row(items) => items.hash(state),
            Value::ResultSet(rs) => {
                rs.columns.hash(state);
                rs.rows.hash(state);
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Varchar(s) | Value::VarcharIgnoreCase(s) | Value::Char(s)
            | Value::Clob(s) => write!(f, "'{s}'"),
            Value::Varbinary(b) | Value::Blob(b) | Value::JavaObject(b) => {
                write!(f, "x'{}'", hex::encode(b))
            }
            other => f.write_str(&other.to_text()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i8> for Value {
    fn from(i: i8) -> Self {
        Value::TinyInt(i)
    }
}

impl From<i16> for Value {
    fn from(i: i16) -> Self {
        Value::SmallInt(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::BigInt(i)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Real(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Numeric(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Varchar(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Varchar(s)
    }
}

impl From<Uuid> for Value {
    fn from(u: Uuid) -> Self {
        Value::Uuid(u)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveTime> for Value {
    fn from(t: NaiveTime) -> Self {
        // NaiveTime leap-second nanos beyond the day are not representable
        // in a SQL TIME; keep the in-range part.
        Value::Time(t.with_nanosecond(t.nanosecond() % 1_000_000_000).unwrap_or(t))
    }
}

impl From<NaiveDateTime> for Value {
    fn from(ts: NaiveDateTime) -> Self {
        Value::Timestamp(ts)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(ts: DateTime<FixedOffset>) -> Self {
        Value::TimestampTz(ts)
    }
}
