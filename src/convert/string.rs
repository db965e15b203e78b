//! The canonical textual form of every kind, and the character target
//! kinds, which accept any source through it.

use crate::convert::CastContext;
use crate::error::Result;
use crate::types::kind::ValueKind;
use crate::types::value::Value;
use chrono::{DateTime, FixedOffset, NaiveTime, Timelike};
use std::fmt::Write;

impl Value {
    /// Canonical text form: the body a cast to a character kind produces.
    /// Character payloads come back verbatim, binary payloads as lowercase
    /// hex, temporal and interval kinds in their SQL literal layout.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Boolean(true) => "TRUE".to_string(),
            Value::Boolean(false) => "FALSE".to_string(),
            Value::TinyInt(i) => i.to_string(),
            Value::SmallInt(i) => i.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::BigInt(i) => i.to_string(),
            Value::Numeric(d) => d.to_string(),
            Value::Double(f) => fmt_float(*f),
            Value::Real(f) => fmt_float(*f as f64),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
            Value::Time(t) => fmt_time(t),
            Value::TimeTz {
                time,
                offset_seconds,
            } => {
                let mut s = fmt_time(time);
                push_offset(&mut s, *offset_seconds);
                s
            }
            Value::Timestamp(ts) => {
                format!("{} {}", ts.format("%Y-%m-%d"), fmt_time(&ts.time()))
            }
            Value::TimestampTz(ts) => fmt_timestamp_tz(ts),
            Value::Varbinary(b) | Value::Blob(b) | Value::JavaObject(b) => hex::encode(b),
            Value::Varchar(s) | Value::VarcharIgnoreCase(s) | Value::Char(s)
            | Value::Clob(s) => s.clone(),
            Value::Uuid(u) => u.to_string(),
            // Without a codec the EWKB payload renders as hex; casts with a
            // codec in scope produce well-known text instead.
            Value::Geometry { ewkb, .. } => hex::encode(ewkb),
            Value::Enum { domain, ordinal } => domain
                .label(*ordinal)
                .map(str::to_string)
                .unwrap_or_else(|| ordinal.to_string()),
            Value::Interval(i) => i.to_string(),
            Value::Json(j) => j.to_string(),
            Value::Array(items) => {
                let mut s = String::from("[");
                join_display(&mut s, items);
                s.push(']');
                s
            }
            Value::Row(items) => {
                let mut s = String::from("ROW (");
                join_display(&mut s, items);
                s.push(')');
                s
            }
            Value::ResultSet(rs) => {
                let mut s = String::from("(");
                for (i, row) in rs.rows.iter().enumerate() {
                    if i > 0 {
                        s.push_str(", ");
                    }
                    s.push('(');
                    join_display(&mut s, row);
                    s.push(')');
                }
                s.push(')');
                s
            }
        }
    }
}

fn join_display(out: &mut String, items: &[Value]) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{item}");
    }
}

fn fmt_float(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        if f > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        f.to_string()
    }
}

fn fmt_time(t: &NaiveTime) -> String {
    let mut s = t.format("%H:%M:%S").to_string();
    let nanos = t.nanosecond();
    if nanos != 0 {
        let digits = format!("{nanos:09}");
        s.push('.');
        s.push_str(digits.trim_end_matches('0'));
    }
    s
}

fn push_offset(out: &mut String, offset_seconds: i32) {
    let sign = if offset_seconds < 0 { '-' } else { '+' };
    let magnitude = offset_seconds.unsigned_abs();
    let _ = write!(out, "{sign}{:02}:{:02}", magnitude / 3600, magnitude % 3600 / 60);
}

fn fmt_timestamp_tz(ts: &DateTime<FixedOffset>) -> String {
    let local = ts.naive_local();
    let mut s = format!("{} {}", local.format("%Y-%m-%d"), fmt_time(&local.time()));
    push_offset(&mut s, ts.offset().local_minus_utc());
    s
}

/// Any kind converts to the character kinds through its canonical text;
/// geometry goes through the codec when one is in scope.
pub(crate) fn to_character(
    v: &Value,
    target: ValueKind,
    ctx: &CastContext<'_>,
) -> Result<Value> {
    let text = match v {
        Value::Geometry { ewkb, srid } if ctx.geometry.is_some() => {
            ctx.geometry()?.to_text(ewkb, *srid)?
        }
        other => other.to_text(),
    };
    Ok(match target {
        ValueKind::VarcharIgnoreCase => Value::VarcharIgnoreCase(text),
        ValueKind::Char => Value::Char(text),
        ValueKind::Clob => Value::Clob(text),
        _ => Value::Varchar(text),
    })
}
