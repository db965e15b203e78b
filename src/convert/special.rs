//! Conversion rules for the binary, UUID, Java-object, geometry, enum and
//! JSON target kinds.

use crate::convert::{numeric, CastContext};
use crate::error::{Error, Result};
use crate::types::ext::ExtTypeInfo;
use crate::types::kind::ValueKind;
use crate::types::type_info::TypeInfo;
use crate::types::value::Value;
use rust_decimal::prelude::ToPrimitive;

fn rejected(from: &Value, to: ValueKind) -> Error {
    Error::DataConversion {
        from: from.kind(),
        to,
    }
}

fn decode_hex(text: &str) -> Result<Vec<u8>> {
    hex::decode(text.trim()).map_err(|_| Error::MalformedLiteral(text.to_string()))
}

/// VARBINARY and BLOB targets. Byte-carrying kinds hand over their payload;
/// character sources are read as hex digits.
pub(crate) fn to_binary(v: &Value, target: ValueKind) -> Result<Value> {
    let bytes = match v {
        Value::Varbinary(b) | Value::Blob(b) | Value::JavaObject(b) => b.clone(),
        Value::Geometry { ewkb, .. } => ewkb.clone(),
        Value::Uuid(u) => u.as_bytes().to_vec(),
        Value::Json(j) => j.to_string().into_bytes(),
        Value::Varchar(s) | Value::VarcharIgnoreCase(s) | Value::Char(s) | Value::Clob(s) => {
            decode_hex(s)?
        }
        other => return Err(rejected(other, target)),
    };
    Ok(if target == ValueKind::Blob {
        Value::Blob(bytes)
    } else {
        Value::Varbinary(bytes)
    })
}

pub(crate) fn to_java_object(v: &Value) -> Result<Value> {
    let bytes = match v {
        Value::Varbinary(b) | Value::Blob(b) => b.clone(),
        Value::Varchar(s) | Value::VarcharIgnoreCase(s) | Value::Char(s) | Value::Clob(s) => {
            decode_hex(s)?
        }
        other => return Err(rejected(other, ValueKind::JavaObject)),
    };
    Ok(Value::JavaObject(bytes))
}

pub(crate) fn to_uuid(v: &Value) -> Result<Value> {
    let uuid = match v {
        Value::Varbinary(b) | Value::JavaObject(b) => uuid::Uuid::from_slice(b)
            .map_err(|_| rejected(v, ValueKind::Uuid))?,
        Value::Varchar(s) | Value::VarcharIgnoreCase(s) | Value::Char(s) | Value::Clob(s) => {
            uuid::Uuid::parse_str(s.trim()).map_err(|_| Error::MalformedLiteral(s.clone()))?
        }
        other => return Err(rejected(other, ValueKind::Uuid)),
    };
    Ok(Value::Uuid(uuid))
}

/// Geometry parsing is delegated to the codec; the target's SRID
/// constraint, if any, is applied to the result.
pub(crate) fn to_geometry(v: &Value, target: &TypeInfo, ctx: &CastContext<'_>) -> Result<Value> {
    let (ewkb, srid) = match v {
        Value::Varbinary(b) | Value::Blob(b) => ctx.geometry()?.parse_binary(b)?,
        Value::Varchar(s) | Value::VarcharIgnoreCase(s) | Value::Char(s) | Value::Clob(s) => {
            ctx.geometry()?.parse_text(s)?
        }
        other => return Err(rejected(other, ValueKind::Geometry)),
    };
    let value = Value::Geometry { ewkb, srid };
    match &target.ext {
        Some(ext) => ext.cast(&value),
        None => Ok(value),
    }
}

/// ENUM targets need a label domain on the target type. Text resolves by
/// label first, then as an ordinal numeral; integer sources resolve by
/// ordinal. An ordinal without a label in the domain is not convertible.
pub(crate) fn to_enum(v: &Value, target: &TypeInfo) -> Result<Value> {
    let Some(ExtTypeInfo::Enum(domain)) = &target.ext else {
        return Err(rejected(v, ValueKind::Enum));
    };
    let ordinal = match v {
        Value::TinyInt(i) => *i as i32,
        Value::SmallInt(i) => *i as i32,
        Value::Integer(i) => *i,
        Value::BigInt(i) => i32::try_from(*i).map_err(|_| rejected(v, ValueKind::Enum))?,
        Value::Numeric(d) if d.fract().is_zero() => {
            d.to_i32().ok_or_else(|| rejected(v, ValueKind::Enum))?
        }
        Value::Varchar(s) | Value::VarcharIgnoreCase(s) | Value::Char(s) | Value::Clob(s) => {
            match domain.ordinal(s) {
                Some(ordinal) => ordinal,
                None => numeric::parse_i64(s)
                    .ok()
                    .and_then(|n| i32::try_from(n).ok())
                    .ok_or_else(|| rejected(v, ValueKind::Enum))?,
            }
        }
        other => return Err(rejected(other, ValueKind::Enum)),
    };
    if domain.label(ordinal).is_none() {
        return Err(rejected(v, ValueKind::Enum));
    }
    Ok(Value::Enum {
        domain: domain.clone(),
        ordinal,
    })
}

/// JSON accepts boolean, numeric, character, binary, LOB and geometry
/// sources. Character sources must themselves be valid JSON documents.
pub(crate) fn to_json(v: &Value, ctx: &CastContext<'_>) -> Result<Value> {
    let json = match v {
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::TinyInt(i) => serde_json::Value::from(*i),
        Value::SmallInt(i) => serde_json::Value::from(*i),
        Value::Integer(i) => serde_json::Value::from(*i),
        Value::BigInt(i) => serde_json::Value::from(*i),
        Value::Numeric(d) => serde_json::from_str(&d.to_string())
            .map_err(|_| rejected(v, ValueKind::Json))?,
        Value::Double(f) => {
            serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .ok_or_else(|| rejected(v, ValueKind::Json))?
        }
        Value::Real(f) => {
            serde_json::Number::from_f64(*f as f64)
                .map(serde_json::Value::Number)
                .ok_or_else(|| rejected(v, ValueKind::Json))?
        }
        Value::Varchar(s) | Value::VarcharIgnoreCase(s) | Value::Char(s) | Value::Clob(s) => {
            serde_json::from_str(s).map_err(|_| Error::MalformedLiteral(s.clone()))?
        }
        Value::Varbinary(b) | Value::Blob(b) => {
            let text = std::str::from_utf8(b).map_err(|_| rejected(v, ValueKind::Json))?;
            serde_json::from_str(text)
                .map_err(|_| Error::MalformedLiteral(text.to_string()))?
        }
        Value::Geometry { ewkb, srid } => ctx.geometry()?.to_json(ewkb, *srid)?,
        other => return Err(rejected(other, ValueKind::Json)),
    };
    Ok(Value::Json(json))
}
