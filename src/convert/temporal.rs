//! Conversion rules for the date, time and timestamp target kinds.
//!
//! Every rule that crosses a time-zone boundary or needs "today" goes
//! through the [`CastProvider`], never an ambient clock. A missing provider
//! is an error, not an implicit now.

use crate::convert::{CastContext, CastProvider};
use crate::error::{Error, Result};
use crate::types::kind::ValueKind;
use crate::types::value::Value;
use chrono::{
    DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike,
};

const NANOS_PER_DAY: i64 = 86_400 * 1_000_000_000;

fn rejected(from: &Value, to: ValueKind) -> Error {
    Error::DataConversion {
        from: from.kind(),
        to,
    }
}

fn malformed(text: &str) -> Error {
    Error::MalformedLiteral(text.to_string())
}

/// Local wall-clock date-time of a zoned timestamp, in the session's zone.
fn local_from_zoned(ts: &DateTime<FixedOffset>, provider: &dyn CastProvider) -> NaiveDateTime {
    let utc = ts.naive_utc();
    utc + Duration::seconds(provider.offset_seconds_at(utc) as i64)
}

/// Session's local offset right now, in seconds.
fn local_offset_now(provider: &dyn CastProvider) -> i32 {
    let now = provider.current_timestamp();
    provider.offset_seconds_at(now.naive_utc())
}

/// Move a wall-clock time by a signed number of seconds, wrapping within
/// the day.
fn shift_time(time: NaiveTime, shift_seconds: i64) -> Result<NaiveTime> {
    let nanos = time.num_seconds_from_midnight() as i64 * 1_000_000_000
        + time.nanosecond() as i64
        + shift_seconds * 1_000_000_000;
    let wrapped = nanos.rem_euclid(NANOS_PER_DAY);
    NaiveTime::from_num_seconds_from_midnight_opt(
        (wrapped / 1_000_000_000) as u32,
        (wrapped % 1_000_000_000) as u32,
    )
    .ok_or_else(|| Error::InvalidValue(format!("time of day out of range: {wrapped}ns")))
}

fn zoned(naive: NaiveDateTime, offset_seconds: i32) -> Result<DateTime<FixedOffset>> {
    let offset = FixedOffset::east_opt(offset_seconds)
        .ok_or_else(|| Error::InvalidValue(format!("UTC offset out of range: {offset_seconds}")))?;
    naive
        .and_local_timezone(offset)
        .single()
        .ok_or_else(|| Error::InvalidValue(format!("ambiguous local date-time: {naive}")))
}

pub(crate) fn to_date(v: &Value, ctx: &CastContext<'_>) -> Result<Value> {
    let date = match v {
        Value::Timestamp(ts) => ts.date(),
        Value::TimestampTz(ts) => local_from_zoned(ts, ctx.provider()?).date(),
        Value::Varchar(s) | Value::VarcharIgnoreCase(s) | Value::Char(s) | Value::Clob(s) => {
            parse_date(s)?
        }
        other => return Err(rejected(other, ValueKind::Date)),
    };
    Ok(Value::Date(date))
}

pub(crate) fn to_time(v: &Value, ctx: &CastContext<'_>) -> Result<Value> {
    let time = match v {
        Value::TimeTz {
            time,
            offset_seconds,
        } => {
            let provider = ctx.provider()?;
            let shift = local_offset_now(provider) - offset_seconds;
            shift_time(*time, shift as i64)?
        }
        Value::Timestamp(ts) => ts.time(),
        Value::TimestampTz(ts) => local_from_zoned(ts, ctx.provider()?).time(),
        Value::Varchar(s) | Value::VarcharIgnoreCase(s) | Value::Char(s) | Value::Clob(s) => {
            parse_time(s)?
        }
        other => return Err(rejected(other, ValueKind::Time)),
    };
    Ok(Value::Time(time))
}

pub(crate) fn to_time_tz(v: &Value, ctx: &CastContext<'_>) -> Result<Value> {
    let (time, offset_seconds) = match v {
        Value::Time(t) => (*t, local_offset_now(ctx.provider()?)),
        Value::Timestamp(ts) => {
            let provider = ctx.provider()?;
            (ts.time(), provider.offset_seconds_at(*ts))
        }
        Value::TimestampTz(ts) => (ts.time(), ts.offset().local_minus_utc()),
        Value::Varchar(s) | Value::VarcharIgnoreCase(s) | Value::Char(s) | Value::Clob(s) => {
            parse_time_tz(s)?
        }
        other => return Err(rejected(other, ValueKind::TimeTz)),
    };
    Ok(Value::TimeTz {
        time,
        offset_seconds,
    })
}

pub(crate) fn to_timestamp(v: &Value, ctx: &CastContext<'_>) -> Result<Value> {
    let ts = match v {
        Value::Date(d) => d.and_time(NaiveTime::MIN),
        Value::Time(t) => {
            let provider = ctx.provider()?;
            current_local_date(provider).and_time(*t)
        }
        Value::TimeTz {
            time,
            offset_seconds,
        } => {
            let provider = ctx.provider()?;
            let shift = local_offset_now(provider) - offset_seconds;
            current_local_date(provider).and_time(shift_time(*time, shift as i64)?)
        }
        Value::TimestampTz(ts) => local_from_zoned(ts, ctx.provider()?),
        Value::Varchar(s) | Value::VarcharIgnoreCase(s) | Value::Char(s) | Value::Clob(s) => {
            parse_timestamp(s)?
        }
        other => return Err(rejected(other, ValueKind::Timestamp)),
    };
    Ok(Value::Timestamp(ts))
}

pub(crate) fn to_timestamp_tz(v: &Value, ctx: &CastContext<'_>) -> Result<Value> {
    let ts = match v {
        Value::Date(d) => {
            let provider = ctx.provider()?;
            let naive = d.and_time(NaiveTime::MIN);
            zoned(naive, provider.offset_seconds_at(naive))?
        }
        Value::Time(t) => {
            let provider = ctx.provider()?;
            let naive = current_local_date(provider).and_time(*t);
            zoned(naive, local_offset_now(provider))?
        }
        Value::TimeTz {
            time,
            offset_seconds,
        } => {
            let provider = ctx.provider()?;
            zoned(current_local_date(provider).and_time(*time), *offset_seconds)?
        }
        Value::Timestamp(naive) => {
            let provider = ctx.provider()?;
            zoned(*naive, provider.offset_seconds_at(*naive))?
        }
        Value::Varchar(s) | Value::VarcharIgnoreCase(s) | Value::Char(s) | Value::Clob(s) => {
            match parse_timestamp_tz(s)? {
                ZonedOrLocal::Zoned(ts) => ts,
                ZonedOrLocal::Local(naive) => {
                    let provider = ctx.provider()?;
                    zoned(naive, provider.offset_seconds_at(naive))?
                }
            }
        }
        other => return Err(rejected(other, ValueKind::TimestampTz)),
    };
    Ok(Value::TimestampTz(ts))
}

fn current_local_date(provider: &dyn CastProvider) -> NaiveDate {
    let now = provider.current_timestamp();
    let utc = now.naive_utc();
    (utc + Duration::seconds(provider.offset_seconds_at(utc) as i64)).date()
}

fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").map_err(|_| malformed(text))
}

fn parse_time(text: &str) -> Result<NaiveTime> {
    let t = text.trim();
    NaiveTime::parse_from_str(t, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M"))
        .map_err(|_| malformed(text))
}

fn parse_timestamp(text: &str) -> Result<NaiveDateTime> {
    let t = text.trim();
    for format in [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(t, format) {
            return Ok(ts);
        }
    }
    // A bare date reads as its midnight.
    parse_date(t).map(|d| d.and_time(NaiveTime::MIN)).map_err(|_| malformed(text))
}

enum ZonedOrLocal {
    Zoned(DateTime<FixedOffset>),
    Local(NaiveDateTime),
}

fn parse_timestamp_tz(text: &str) -> Result<ZonedOrLocal> {
    let t = text.trim();
    match split_offset(t) {
        Some((datetime, offset_seconds)) => {
            let naive = parse_timestamp(datetime)?;
            Ok(ZonedOrLocal::Zoned(zoned(naive, offset_seconds)?))
        }
        None => Ok(ZonedOrLocal::Local(parse_timestamp(t)?)),
    }
}

fn parse_time_tz(text: &str) -> Result<(NaiveTime, i32)> {
    let t = text.trim();
    let (time_part, offset_seconds) = split_offset(t).ok_or_else(|| malformed(text))?;
    Ok((parse_time(time_part)?, offset_seconds))
}

/// Split a trailing UTC offset (`Z`, `+HH`, `+HH:MM`, `+HHMM`) off a
/// temporal literal. Returns the remainder and the offset in seconds, or
/// `None` when no offset suffix is present.
fn split_offset(text: &str) -> Option<(&str, i32)> {
    if let Some(rest) = text.strip_suffix(['Z', 'z']) {
        return Some((rest.trim_end(), 0));
    }
    // The sign must follow a time component, not open the literal or a year.
    let idx = text.rfind(['+', '-']).filter(|&i| {
        i > 0 && text[..i].contains(':')
    })?;
    let (rest, suffix) = text.split_at(idx);
    let negative = suffix.starts_with('-');
    let digits = suffix[1..].trim();
    let (hours, minutes) = match digits.split_once(':') {
        Some((h, m)) => (h, m),
        None if digits.len() == 4 => digits.split_at(2),
        None => (digits, "0"),
    };
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 18 || minutes > 59 {
        return None;
    }
    let seconds = hours * 3600 + minutes * 60;
    Some((rest.trim_end(), if negative { -seconds } else { seconds }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::FixedCastProvider;

    fn ctx_at(offset_hours: i32) -> FixedCastProvider {
        let offset = FixedOffset::east_opt(offset_hours * 3600).unwrap();
        let now = NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            .and_local_timezone(offset)
            .unwrap();
        FixedCastProvider::new(now)
    }

    #[test]
    fn test_timestamp_to_date_and_time() {
        let ctx = CastContext::default();
        let ts = Value::Timestamp(
            NaiveDate::from_ymd_opt(2020, 1, 2)
                .unwrap()
                .and_hms_opt(3, 4, 5)
                .unwrap(),
        );
        assert_eq!(
            to_date(&ts, &ctx).unwrap(),
            Value::Date(NaiveDate::from_ymd_opt(2020, 1, 2).unwrap())
        );
        assert_eq!(
            to_time(&ts, &ctx).unwrap(),
            Value::Time(NaiveTime::from_hms_opt(3, 4, 5).unwrap())
        );
    }

    #[test]
    fn test_date_to_time_is_undefined() {
        let d = Value::Date(NaiveDate::from_ymd_opt(2020, 1, 2).unwrap());
        assert!(matches!(
            to_time(&d, &CastContext::default()),
            Err(Error::DataConversion { .. })
        ));
    }

    #[test]
    fn test_zoned_to_local_uses_provider() {
        let provider = ctx_at(2);
        let ctx = CastContext::with_provider(&provider);
        // 10:00 UTC seen from +02:00 is 12:00 local.
        let ts = Value::TimestampTz(
            NaiveDate::from_ymd_opt(2024, 6, 15)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap()
                .and_local_timezone(FixedOffset::east_opt(0).unwrap())
                .unwrap(),
        );
        assert_eq!(
            to_timestamp(&ts, &ctx).unwrap(),
            Value::Timestamp(
                NaiveDate::from_ymd_opt(2024, 6, 15)
                    .unwrap()
                    .and_hms_opt(12, 0, 0)
                    .unwrap()
            )
        );
        // Without a provider the conversion fails rather than guessing.
        assert!(to_timestamp(&ts, &CastContext::default()).is_err());
    }

    #[test]
    fn test_time_tz_shift_wraps_midnight() {
        let provider = ctx_at(-3);
        let ctx = CastContext::with_provider(&provider);
        let v = Value::TimeTz {
            time: NaiveTime::from_hms_opt(1, 30, 0).unwrap(),
            offset_seconds: 0,
        };
        // 01:30+00 at a -03:00 session is 22:30 the previous day.
        assert_eq!(
            to_time(&v, &ctx).unwrap(),
            Value::Time(NaiveTime::from_hms_opt(22, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_timestamp_forms() {
        let expected = NaiveDate::from_ymd_opt(2021, 3, 4)
            .unwrap()
            .and_hms_milli_opt(5, 6, 7, 800)
            .unwrap();
        assert_eq!(parse_timestamp("2021-03-04 05:06:07.8").unwrap(), expected);
        assert_eq!(parse_timestamp("2021-03-04T05:06:07.8").unwrap(), expected);
        assert_eq!(
            parse_timestamp("2021-03-04").unwrap(),
            NaiveDate::from_ymd_opt(2021, 3, 4).unwrap().and_time(NaiveTime::MIN)
        );
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_parse_offsets() {
        assert_eq!(split_offset("10:00:00Z"), Some(("10:00:00", 0)));
        assert_eq!(split_offset("10:00:00+05:30"), Some(("10:00:00", 19800)));
        assert_eq!(split_offset("10:00:00-08"), Some(("10:00:00", -28800)));
        assert_eq!(split_offset("10:00:00"), None);
    }

    #[test]
    fn test_text_to_timestamp_tz() {
        let provider = ctx_at(2);
        let ctx = CastContext::with_provider(&provider);
        let v = Value::Varchar("2024-06-15 08:00:00+01".into());
        match to_timestamp_tz(&v, &ctx).unwrap() {
            Value::TimestampTz(ts) => {
                assert_eq!(ts.offset().local_minus_utc(), 3600);
                assert_eq!(ts.naive_local().to_string(), "2024-06-15 08:00:00");
            }
            other => panic!("unexpected value {other:?}"),
        }
        // Without an offset suffix the session offset applies.
        let v = Value::Varchar("2024-06-15 08:00:00".into());
        match to_timestamp_tz(&v, &ctx).unwrap() {
            Value::TimestampTz(ts) => assert_eq!(ts.offset().local_minus_utc(), 7200),
            other => panic!("unexpected value {other:?}"),
        }
    }
}
