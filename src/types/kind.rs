//! The closed set of SQL value kinds and their promotion order

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminant tag identifying which SQL type a value holds.
///
/// The set is closed on purpose: every conversion and comparison rule in this
/// crate enumerates kinds explicitly, so adding one forces every dispatch
/// table to be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// Placeholder for operands whose type is not yet resolved (parameters).
    /// Never carried by a constructed value.
    Unknown,
    Null,
    Boolean,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Numeric,
    Double,
    Real,
    Time,
    TimeTz,
    Date,
    Timestamp,
    TimestampTz,
    Varbinary,
    Varchar,
    VarcharIgnoreCase,
    Char,
    Blob,
    Clob,
    JavaObject,
    Uuid,
    Geometry,
    Enum,
    IntervalYear,
    IntervalMonth,
    IntervalYearToMonth,
    IntervalDay,
    IntervalHour,
    IntervalMinute,
    IntervalSecond,
    IntervalDayToHour,
    IntervalDayToMinute,
    IntervalDayToSecond,
    IntervalHourToMinute,
    IntervalHourToSecond,
    IntervalMinuteToSecond,
    Json,
    Array,
    Row,
    ResultSet,
}

impl ValueKind {
    /// Promotion rank of this kind. Ranks are banded by type family with gaps
    /// left for future kinds; when two operands differ, the lower-ranked side
    /// is converted to the higher-ranked kind.
    pub fn order(self) -> u32 {
        use ValueKind::*;
        match self {
            Unknown => 1_000,
            Null => 2_000,
            Varchar => 10_000,
            Clob => 11_000,
            Char => 12_000,
            VarcharIgnoreCase => 13_000,
            Boolean => 20_000,
            TinyInt => 21_000,
            SmallInt => 22_000,
            Integer => 23_000,
            BigInt => 24_000,
            Numeric => 25_000,
            Real => 26_000,
            Double => 27_000,
            IntervalYear => 28_000,
            IntervalMonth => 28_100,
            IntervalYearToMonth => 28_200,
            IntervalDay => 29_000,
            IntervalHour => 29_100,
            IntervalDayToHour => 29_200,
            IntervalMinute => 29_300,
            IntervalHourToMinute => 29_400,
            IntervalDayToMinute => 29_500,
            IntervalSecond => 29_600,
            IntervalMinuteToSecond => 29_700,
            IntervalHourToSecond => 29_800,
            IntervalDayToSecond => 29_900,
            Time => 30_000,
            TimeTz => 30_500,
            Date => 31_000,
            Timestamp => 32_000,
            TimestampTz => 34_000,
            Varbinary => 40_000,
            Blob => 41_000,
            JavaObject => 42_000,
            Uuid => 43_000,
            Geometry => 44_000,
            Enum => 45_000,
            Json => 46_000,
            Array => 50_000,
            Row => 51_000,
            ResultSet => 52_000,
        }
    }

    /// Pick the promotion target for a pair of operand kinds.
    ///
    /// `Unknown` paired with a concrete kind resolves to the concrete kind;
    /// two `Unknown` operands, or `Unknown` paired with `Null`, leave no
    /// defined promotion target and fail with [`Error::UnknownType`].
    pub fn higher_order(k1: ValueKind, k2: ValueKind) -> Result<ValueKind> {
        if k1 == ValueKind::Unknown || k2 == ValueKind::Unknown {
            if k1 == k2 {
                return Err(Error::UnknownType("?, ?".into()));
            } else if k1 == ValueKind::Null {
                return Err(Error::UnknownType("NULL, ?".into()));
            } else if k2 == ValueKind::Null {
                return Err(Error::UnknownType("?, NULL".into()));
            }
        }
        if k1 == k2 {
            return Ok(k1);
        }
        Ok(if k1.order() > k2.order() { k1 } else { k2 })
    }

    pub fn is_numeric(self) -> bool {
        use ValueKind::*;
        matches!(
            self,
            TinyInt | SmallInt | Integer | BigInt | Numeric | Double | Real
        )
    }

    pub fn is_character(self) -> bool {
        use ValueKind::*;
        matches!(self, Varchar | VarcharIgnoreCase | Char | Clob)
    }

    pub fn is_binary(self) -> bool {
        matches!(self, ValueKind::Varbinary | ValueKind::Blob)
    }

    pub fn is_interval(self) -> bool {
        self.is_year_month_interval() || self.is_day_time_interval()
    }

    pub fn is_year_month_interval(self) -> bool {
        use ValueKind::*;
        matches!(self, IntervalYear | IntervalMonth | IntervalYearToMonth)
    }

    pub fn is_day_time_interval(self) -> bool {
        use ValueKind::*;
        matches!(
            self,
            IntervalDay
                | IntervalHour
                | IntervalMinute
                | IntervalSecond
                | IntervalDayToHour
                | IntervalDayToMinute
                | IntervalDayToSecond
                | IntervalHourToMinute
                | IntervalHourToSecond
                | IntervalMinuteToSecond
        )
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ValueKind::*;
        let name = match self {
            Unknown => "?",
            Null => "NULL",
            Boolean => "BOOLEAN",
            TinyInt => "TINYINT",
            SmallInt => "SMALLINT",
            Integer => "INTEGER",
            BigInt => "BIGINT",
            Numeric => "NUMERIC",
            Double => "DOUBLE PRECISION",
            Real => "REAL",
            Time => "TIME",
            TimeTz => "TIME WITH TIME ZONE",
            Date => "DATE",
            Timestamp => "TIMESTAMP",
            TimestampTz => "TIMESTAMP WITH TIME ZONE",
            Varbinary => "BINARY VARYING",
            Varchar => "CHARACTER VARYING",
            VarcharIgnoreCase => "VARCHAR_IGNORECASE",
            Char => "CHARACTER",
            Blob => "BLOB",
            Clob => "CLOB",
            JavaObject => "JAVA_OBJECT",
            Uuid => "UUID",
            Geometry => "GEOMETRY",
            Enum => "ENUM",
            IntervalYear => "INTERVAL YEAR",
            IntervalMonth => "INTERVAL MONTH",
            IntervalYearToMonth => "INTERVAL YEAR TO MONTH",
            IntervalDay => "INTERVAL DAY",
            IntervalHour => "INTERVAL HOUR",
            IntervalMinute => "INTERVAL MINUTE",
            IntervalSecond => "INTERVAL SECOND",
            IntervalDayToHour => "INTERVAL DAY TO HOUR",
            IntervalDayToMinute => "INTERVAL DAY TO MINUTE",
            IntervalDayToSecond => "INTERVAL DAY TO SECOND",
            IntervalHourToMinute => "INTERVAL HOUR TO MINUTE",
            IntervalHourToSecond => "INTERVAL HOUR TO SECOND",
            IntervalMinuteToSecond => "INTERVAL MINUTE TO SECOND",
            Json => "JSON",
            Array => "ARRAY",
            Row => "ROW",
            ResultSet => "RESULT_SET",
        };
        f.write_str(name)
    }
}

/// All kinds that can tag a constructed value, in declaration order.
/// `Unknown` is excluded: it is a placeholder, not a value tag.
pub const CONCRETE_KINDS: [ValueKind; 41] = {
    use ValueKind::*;
    [
        Null,
        Boolean,
        TinyInt,
        SmallInt,
        Integer,
        BigInt,
        Numeric,
        Double,
        Real,
        Time,
        TimeTz,
        Date,
        Timestamp,
        TimestampTz,
        Varbinary,
        Varchar,
        VarcharIgnoreCase,
        Char,
        Blob,
        Clob,
        JavaObject,
        Uuid,
        Geometry,
        Enum,
        IntervalYear,
        IntervalMonth,
        IntervalYearToMonth,
        IntervalDay,
        IntervalHour,
        IntervalMinute,
        IntervalSecond,
        IntervalDayToHour,
        IntervalDayToMinute,
        IntervalDayToSecond,
        IntervalHourToMinute,
        IntervalHourToSecond,
        IntervalMinuteToSecond,
        Json,
        Array,
        Row,
        ResultSet,
    ]
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orders_are_distinct() {
        for (i, a) in CONCRETE_KINDS.iter().enumerate() {
            for b in &CONCRETE_KINDS[i + 1..] {
                assert_ne!(a.order(), b.order(), "{a} vs {b}");
            }
        }
    }

    #[test]
    fn test_higher_order_commutes() {
        for a in CONCRETE_KINDS {
            for b in CONCRETE_KINDS {
                assert_eq!(
                    ValueKind::higher_order(a, b).unwrap(),
                    ValueKind::higher_order(b, a).unwrap()
                );
            }
            assert_eq!(ValueKind::higher_order(a, a).unwrap(), a);
        }
    }

    #[test]
    fn test_unknown_promotion() {
        assert_eq!(
            ValueKind::higher_order(ValueKind::Unknown, ValueKind::Integer).unwrap(),
            ValueKind::Integer
        );
        assert!(matches!(
            ValueKind::higher_order(ValueKind::Unknown, ValueKind::Unknown),
            Err(Error::UnknownType(_))
        ));
        assert!(matches!(
            ValueKind::higher_order(ValueKind::Null, ValueKind::Unknown),
            Err(Error::UnknownType(_))
        ));
    }

    #[test]
    fn test_family_banding() {
        // Every interval kind sits between the approximate numerics and the
        // time-like kinds, year/month family below day/time family.
        for k in CONCRETE_KINDS.iter().filter(|k| k.is_interval()) {
            assert!(k.order() > ValueKind::Double.order());
            assert!(k.order() < ValueKind::Time.order());
        }
        assert!(
            ValueKind::IntervalYearToMonth.order() < ValueKind::IntervalDay.order()
        );
    }
}
