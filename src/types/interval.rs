//! SQL INTERVAL values: qualifiers, field layout and literal grammar

use crate::error::{Error, Result};
use crate::types::kind::ValueKind;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Largest admissible leading field: 18 decimal digits.
pub const MAX_LEADING: u64 = 999_999_999_999_999_999;

pub const NANOS_PER_SECOND: i64 = 1_000_000_000;
pub const NANOS_PER_MINUTE: i64 = 60 * NANOS_PER_SECOND;
pub const NANOS_PER_HOUR: i64 = 60 * NANOS_PER_MINUTE;
pub const NANOS_PER_DAY: i64 = 24 * NANOS_PER_HOUR;

/// The specific interval sub-kind, determining which fields an interval
/// carries and how its literal body is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntervalQualifier {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    YearToMonth,
    DayToHour,
    DayToMinute,
    DayToSecond,
    HourToMinute,
    HourToSecond,
    MinuteToSecond,
}

impl IntervalQualifier {
    pub fn value_kind(self) -> ValueKind {
        use IntervalQualifier::*;
        match self {
            Year => ValueKind::IntervalYear,
            Month => ValueKind::IntervalMonth,
            Day => ValueKind::IntervalDay,
            Hour => ValueKind::IntervalHour,
            Minute => ValueKind::IntervalMinute,
            Second => ValueKind::IntervalSecond,
            YearToMonth => ValueKind::IntervalYearToMonth,
            DayToHour => ValueKind::IntervalDayToHour,
            DayToMinute => ValueKind::IntervalDayToMinute,
            DayToSecond => ValueKind::IntervalDayToSecond,
            HourToMinute => ValueKind::IntervalHourToMinute,
            HourToSecond => ValueKind::IntervalHourToSecond,
            MinuteToSecond => ValueKind::IntervalMinuteToSecond,
        }
    }

    pub fn from_value_kind(kind: ValueKind) -> Option<IntervalQualifier> {
        use IntervalQualifier::*;
        Some(match kind {
            ValueKind::IntervalYear => Year,
            ValueKind::IntervalMonth => Month,
            ValueKind::IntervalDay => Day,
            ValueKind::IntervalHour => Hour,
            ValueKind::IntervalMinute => Minute,
            ValueKind::IntervalSecond => Second,
            ValueKind::IntervalYearToMonth => YearToMonth,
            ValueKind::IntervalDayToHour => DayToHour,
            ValueKind::IntervalDayToMinute => DayToMinute,
            ValueKind::IntervalDayToSecond => DayToSecond,
            ValueKind::IntervalHourToMinute => HourToMinute,
            ValueKind::IntervalHourToSecond => HourToSecond,
            ValueKind::IntervalMinuteToSecond => MinuteToSecond,
            _ => return None,
        })
    }

    pub fn is_year_month(self) -> bool {
        use IntervalQualifier::*;
        matches!(self, Year | Month | YearToMonth)
    }

    /// True for the kinds whose fractional-source conversion rule scales a
    /// decimal by the leading unit instead of rounding to an integer leading
    /// field: SECOND and every compound qualifier.
    pub fn accepts_fractional(self) -> bool {
        use IntervalQualifier::*;
        !matches!(self, Year | Month | Day | Hour | Minute)
    }

    /// Size of the leading field's unit in the absolute representation:
    /// months for year-month qualifiers, nanoseconds otherwise.
    pub fn leading_unit(self) -> i128 {
        use IntervalQualifier::*;
        match self {
            Year | YearToMonth => 12,
            Month => 1,
            Day | DayToHour | DayToMinute | DayToSecond => NANOS_PER_DAY as i128,
            Hour | HourToMinute | HourToSecond => NANOS_PER_HOUR as i128,
            Minute | MinuteToSecond => NANOS_PER_MINUTE as i128,
            Second => NANOS_PER_SECOND as i128,
        }
    }

    /// Upper bound (exclusive) for the remaining field, in its canonical
    /// encoding; zero for single-field qualifiers.
    fn remaining_bound(self) -> u64 {
        use IntervalQualifier::*;
        match self {
            Year | Month | Day | Hour | Minute => 0,
            Second => NANOS_PER_SECOND as u64,
            YearToMonth => 12,
            DayToHour => 24,
            DayToMinute => 24 * 60,
            DayToSecond => NANOS_PER_DAY as u64,
            HourToMinute => 60,
            HourToSecond => NANOS_PER_HOUR as u64,
            MinuteToSecond => NANOS_PER_MINUTE as u64,
        }
    }

    /// Unit of the remaining field within the absolute representation.
    fn remaining_unit(self) -> i128 {
        use IntervalQualifier::*;
        match self {
            YearToMonth => 1,
            DayToHour => NANOS_PER_HOUR as i128,
            DayToMinute | HourToMinute => NANOS_PER_MINUTE as i128,
            // SECOND and the *_TO_SECOND qualifiers keep raw nanoseconds.
            _ => 1,
        }
    }
}

impl fmt::Display for IntervalQualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use IntervalQualifier::*;
        f.write_str(match self {
            Year => "YEAR",
            Month => "MONTH",
            Day => "DAY",
            Hour => "HOUR",
            Minute => "MINUTE",
            Second => "SECOND",
            YearToMonth => "YEAR TO MONTH",
            DayToHour => "DAY TO HOUR",
            DayToMinute => "DAY TO MINUTE",
            DayToSecond => "DAY TO SECOND",
            HourToMinute => "HOUR TO MINUTE",
            HourToSecond => "HOUR TO SECOND",
            MinuteToSecond => "MINUTE TO SECOND",
        })
    }
}

/// An interval value: qualifier, sign and two unsigned field magnitudes.
///
/// `leading` holds the qualifier's leading field. `remaining` holds the rest
/// in a canonical per-qualifier encoding: months for YEAR TO MONTH, hours for
/// DAY TO HOUR, minutes for DAY TO MINUTE and HOUR TO MINUTE, nanoseconds for
/// SECOND and the *_TO_SECOND qualifiers, zero for single-field qualifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub qualifier: IntervalQualifier,
    pub negative: bool,
    pub leading: u64,
    pub remaining: u64,
}

impl Interval {
    /// Construct an interval, validating the leading field against its
    /// 18-digit bound and the remaining field against the qualifier's
    /// layout. A zero interval is normalized to non-negative.
    pub fn new(
        qualifier: IntervalQualifier,
        negative: bool,
        leading: u64,
        remaining: u64,
    ) -> Result<Interval> {
        if leading > MAX_LEADING {
            return Err(Error::NumericOverflow {
                value: leading.to_string(),
                column: String::new(),
            });
        }
        let bound = qualifier.remaining_bound();
        if bound == 0 {
            if remaining != 0 {
                return Err(Error::InvalidValue(format!(
                    "INTERVAL {qualifier} carries no remaining field, got {remaining}"
                )));
            }
        } else if remaining >= bound {
            return Err(Error::InvalidValue(format!(
                "INTERVAL {qualifier} remaining field {remaining} out of range"
            )));
        }
        Ok(Interval {
            qualifier,
            negative: negative && (leading != 0 || remaining != 0),
            leading,
            remaining,
        })
    }

    /// Signed absolute form: total months for year-month qualifiers, total
    /// nanoseconds for day-time qualifiers.
    pub fn to_absolute(&self) -> i128 {
        let magnitude = self.leading as i128 * self.qualifier.leading_unit()
            + self.remaining as i128 * self.qualifier.remaining_unit();
        if self.negative { -magnitude } else { magnitude }
    }

    /// Re-expand an absolute months/nanoseconds count into the requested
    /// qualifier's field layout, truncating fields below its granularity.
    pub fn from_absolute(qualifier: IntervalQualifier, absolute: i128) -> Result<Interval> {
        let negative = absolute < 0;
        let magnitude = absolute.unsigned_abs();
        let unit = qualifier.leading_unit() as u128;
        let leading = magnitude / unit;
        let rest = magnitude % unit;
        let remaining = match qualifier.remaining_bound() {
            0 => 0,
            _ => (rest / qualifier.remaining_unit() as u128) as u64,
        };
        let leading = u64::try_from(leading).map_err(|_| Error::NumericOverflow {
            value: absolute.to_string(),
            column: String::new(),
        })?;
        Interval::new(qualifier, negative, leading, remaining)
    }

    /// Signed leading field, for conversion to integer kinds.
    pub fn leading_signed(&self) -> Result<i64> {
        let leading = i64::try_from(self.leading).map_err(|_| Error::NumericOverflow {
            value: self.leading.to_string(),
            column: String::new(),
        })?;
        Ok(if self.negative { -leading } else { leading })
    }

    /// Value in the qualifier's leading unit, fraction included (INTERVAL
    /// '1 12' DAY TO HOUR is 1.5). Computed as whole part plus sub-unit
    /// fraction: both stay far below the decimal mantissa range even at the
    /// 18-digit leading bound, where the raw nanosecond total would not.
    pub fn to_decimal(&self) -> Decimal {
        let unit = self.qualifier.leading_unit();
        let absolute = self.to_absolute();
        let whole = Decimal::from_i128_with_scale(absolute / unit, 0);
        let fraction = Decimal::from_i128_with_scale(absolute % unit, 0)
            / Decimal::from_i128_with_scale(unit, 0);
        whole + fraction
    }

    pub fn compare(&self, other: &Interval) -> Ordering {
        self.to_absolute().cmp(&other.to_absolute())
    }

    /// Parse an interval literal for the given qualifier. Accepts the full
    /// form `INTERVAL '1-2' YEAR TO MONTH` as well as the bare body `1-2`,
    /// with the sign before or inside the quotes.
    pub fn parse(qualifier: IntervalQualifier, text: &str) -> Result<Interval> {
        parse_interval(qualifier, text).ok_or_else(|| Error::InvalidIntervalLiteral {
            qualifier,
            text: text.to_string(),
        })
    }
}

fn parse_interval(qualifier: IntervalQualifier, text: &str) -> Option<Interval> {
    let mut body = text.trim();
    let mut negative = false;
    if let Some(rest) = strip_keyword(body, "INTERVAL") {
        let mut rest = rest.trim_start();
        if let Some(r) = rest.strip_prefix('-') {
            negative = true;
            rest = r.trim_start();
        } else if let Some(r) = rest.strip_prefix('+') {
            rest = r.trim_start();
        }
        let rest = rest.strip_prefix('\'')?;
        let (quoted, suffix) = rest.split_once('\'')?;
        // The trailing qualifier words must match the requested qualifier.
        if !suffix.trim().eq_ignore_ascii_case(&qualifier.to_string()) {
            return None;
        }
        body = quoted.trim();
    }
    if let Some(rest) = body.strip_prefix('-') {
        if negative {
            return None;
        }
        negative = true;
        body = rest.trim_start();
    } else if let Some(rest) = body.strip_prefix('+') {
        body = rest.trim_start();
    }
    if body.is_empty() {
        return None;
    }

    use IntervalQualifier::*;
    let (leading, remaining) = match qualifier {
        Year | Month | Day | Hour | Minute => (parse_field(body)?, 0),
        Second => {
            let (seconds, nanos) = parse_seconds(body)?;
            (seconds, nanos)
        }
        YearToMonth => {
            let (years, months) = body.split_once('-')?;
            (parse_field(years)?, parse_field(months)?)
        }
        DayToHour => {
            let (days, hours) = body.split_once(char::is_whitespace)?;
            (parse_field(days)?, parse_field(hours.trim_start())?)
        }
        DayToMinute => {
            let (days, time) = body.split_once(char::is_whitespace)?;
            let (hours, minutes) = time.trim_start().split_once(':')?;
            (
                parse_field(days)?,
                parse_bounded(hours, 24)?
                    .checked_mul(60)?
                    .checked_add(parse_bounded(minutes, 60)?)?,
            )
        }
        DayToSecond => {
            let (days, time) = body.split_once(char::is_whitespace)?;
            (parse_field(days)?, parse_time_of_day(time.trim_start())?)
        }
        HourToMinute => {
            let (hours, minutes) = body.split_once(':')?;
            (parse_field(hours)?, parse_field(minutes)?)
        }
        HourToSecond => {
            let (hours, rest) = body.split_once(':')?;
            let (minutes, seconds) = rest.split_once(':')?;
            let (secs, nanos) = parse_seconds(seconds)?;
            if secs >= 60 {
                return None;
            }
            (
                parse_field(hours)?,
                nanos_of(0, parse_bounded(minutes, 60)?, secs)?.checked_add(nanos)?,
            )
        }
        MinuteToSecond => {
            let (minutes, seconds) = body.split_once(':')?;
            let (secs, nanos) = parse_seconds(seconds)?;
            if secs >= 60 {
                return None;
            }
            (
                parse_field(minutes)?,
                secs.checked_mul(NANOS_PER_SECOND as u64)?.checked_add(nanos)?,
            )
        }
    };
    Interval::new(qualifier, negative, leading, remaining).ok()
}

fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    if text.len() >= keyword.len() && text[..keyword.len()].eq_ignore_ascii_case(keyword) {
        Some(&text[keyword.len()..])
    } else {
        None
    }
}

fn parse_field(text: &str) -> Option<u64> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// A sub-field with an exclusive upper bound; each field of a compound body
/// must respect its own range, never borrow from the next unit up.
fn parse_bounded(text: &str, bound: u64) -> Option<u64> {
    parse_field(text).filter(|&v| v < bound)
}

/// `HH:MM:SS[.fff]` to nanoseconds, each field within its bound.
fn parse_time_of_day(text: &str) -> Option<u64> {
    let (hours, rest) = text.split_once(':')?;
    let (minutes, seconds) = rest.split_once(':')?;
    let (secs, nanos) = parse_seconds(seconds)?;
    if secs >= 60 {
        return None;
    }
    nanos_of(parse_bounded(hours, 24)?, parse_bounded(minutes, 60)?, secs)?.checked_add(nanos)
}

fn nanos_of(hours: u64, minutes: u64, seconds: u64) -> Option<u64> {
    hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)?
        .checked_mul(NANOS_PER_SECOND as u64)
}

/// `SS[.fff]` to whole seconds plus fractional nanoseconds.
fn parse_seconds(text: &str) -> Option<(u64, u64)> {
    let text = text.trim();
    match text.split_once('.') {
        None => Some((parse_field(text)?, 0)),
        Some((secs, frac)) => {
            if frac.is_empty() || frac.len() > 9 || !frac.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let nanos: u64 = frac.parse().ok()?;
            Some((parse_field(secs)?, nanos * 10u64.pow(9 - frac.len() as u32)))
        }
    }
}

fn fmt_fraction(f: &mut fmt::Formatter<'_>, nanos: u64) -> fmt::Result {
    if nanos != 0 {
        let digits = format!("{nanos:09}");
        write!(f, ".{}", digits.trim_end_matches('0'))
    } else {
        Ok(())
    }
}

impl fmt::Display for Interval {
    /// SQL literal form, e.g. `INTERVAL '-1 02:30:00' DAY TO SECOND`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "INTERVAL '")?;
        if self.negative {
            write!(f, "-")?;
        }
        use IntervalQualifier::*;
        match self.qualifier {
            Year | Month | Day | Hour | Minute => write!(f, "{}", self.leading)?,
            Second => {
                write!(f, "{}", self.leading)?;
                fmt_fraction(f, self.remaining)?;
            }
            YearToMonth => write!(f, "{}-{}", self.leading, self.remaining)?,
            DayToHour => write!(f, "{} {:02}", self.leading, self.remaining)?,
            DayToMinute => write!(
                f,
                "{} {:02}:{:02}",
                self.leading,
                self.remaining / 60,
                self.remaining % 60
            )?,
            DayToSecond => {
                let nanos = self.remaining;
                let seconds = nanos / NANOS_PER_SECOND as u64;
                write!(
                    f,
                    "{} {:02}:{:02}:{:02}",
                    self.leading,
                    seconds / 3600,
                    seconds % 3600 / 60,
                    seconds % 60
                )?;
                fmt_fraction(f, nanos % NANOS_PER_SECOND as u64)?;
            }
            HourToMinute => write!(f, "{}:{:02}", self.leading, self.remaining)?,
            HourToSecond => {
                let nanos = self.remaining;
                let seconds = nanos / NANOS_PER_SECOND as u64;
                write!(
                    f,
                    "{}:{:02}:{:02}",
                    self.leading,
                    seconds / 60,
                    seconds % 60
                )?;
                fmt_fraction(f, nanos % NANOS_PER_SECOND as u64)?;
            }
            MinuteToSecond => {
                let nanos = self.remaining;
                write!(
                    f,
                    "{}:{:02}",
                    self.leading,
                    nanos / NANOS_PER_SECOND as u64
                )?;
                fmt_fraction(f, nanos % NANOS_PER_SECOND as u64)?;
            }
        }
        write!(f, "' {}", self.qualifier)
    }
}
