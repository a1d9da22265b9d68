//! Unit vocabularies and their textual aliases.
//!
//! Two enums cover the two ways callers name a unit:
//!
//! - [`Grain`] is a span of time: what durations are measured in and what
//!   `add`/`subtract`/`diff`/`start_of` operate on.
//! - [`Unit`] is a calendar field: what [`Chronos::get`](crate::Chronos::get)
//!   reads and [`Chronos::with_unit`](crate::Chronos::with_unit) writes.
//!
//! Both parse from the short and long aliases used in format strings and
//! duration objects (`"y"`, `"years"`, `"M"`, `"ms"`, `"isoWeek"`, ...). Lookup
//! is case-sensitive first, then retried lowercased, so `"M"` is a month while
//! `"m"` is a minute.

use crate::error::ChronosError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Grain {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl Grain {
    /// All grains, largest first. This is the order in which duration input
    /// is validated for fractional values.
    pub const DESCENDING: [Grain; 9] = [
        Grain::Year,
        Grain::Quarter,
        Grain::Month,
        Grain::Week,
        Grain::Day,
        Grain::Hour,
        Grain::Minute,
        Grain::Second,
        Grain::Millisecond,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Grain::Millisecond => "millisecond",
            Grain::Second => "second",
            Grain::Minute => "minute",
            Grain::Hour => "hour",
            Grain::Day => "day",
            Grain::Week => "week",
            Grain::Month => "month",
            Grain::Quarter => "quarter",
            Grain::Year => "year",
        }
    }
}

impl fmt::Display for Grain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Year,
    Quarter,
    Month,
    Week,
    IsoWeek,
    /// Day of month.
    Date,
    /// Day of week, Sunday = 0.
    Day,
    /// Locale-relative day of week, first day of the locale's week = 0.
    Weekday,
    /// ISO day of week, Monday = 1 .. Sunday = 7.
    IsoWeekday,
    DayOfYear,
    WeekYear,
    IsoWeekYear,
    Hour,
    Minute,
    Second,
    Millisecond,
}

fn lookup_unit(s: &str) -> Option<Unit> {
    let unit = match s {
        "y" | "year" | "years" => Unit::Year,
        "Q" | "quarter" | "quarters" => Unit::Quarter,
        "M" | "month" | "months" => Unit::Month,
        "w" | "week" | "weeks" => Unit::Week,
        "W" | "isoWeek" | "isoWeeks" | "isoweek" | "isoweeks" => Unit::IsoWeek,
        "D" | "date" | "dates" => Unit::Date,
        "d" | "day" | "days" => Unit::Day,
        "e" | "weekday" | "weekdays" => Unit::Weekday,
        "E" | "isoWeekday" | "isoWeekdays" | "isoweekday" | "isoweekdays" => Unit::IsoWeekday,
        "DDD" | "dayOfYear" | "dayOfYears" | "dayofyear" | "dayofyears" => Unit::DayOfYear,
        "gg" | "weekYear" | "weekYears" | "weekyear" | "weekyears" => Unit::WeekYear,
        "GG" | "isoWeekYear" | "isoWeekYears" | "isoweekyear" | "isoweekyears" => Unit::IsoWeekYear,
        "h" | "hour" | "hours" => Unit::Hour,
        "m" | "minute" | "minutes" => Unit::Minute,
        "s" | "second" | "seconds" => Unit::Second,
        "ms" | "millisecond" | "milliseconds" => Unit::Millisecond,
        _ => return None,
    };
    Some(unit)
}

impl FromStr for Unit {
    type Err = ChronosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        lookup_unit(trimmed)
            .or_else(|| lookup_unit(&trimmed.to_lowercase()))
            .ok_or_else(|| ChronosError::UnknownUnit(s.to_string()))
    }
}

impl TryFrom<Unit> for Grain {
    type Error = ChronosError;

    /// Calendar fields that also name a span. `Day` and `Date` both mean
    /// "days" once they are used as an amount.
    fn try_from(unit: Unit) -> Result<Self, Self::Error> {
        match unit {
            Unit::Year => Ok(Grain::Year),
            Unit::Quarter => Ok(Grain::Quarter),
            Unit::Month => Ok(Grain::Month),
            Unit::Week | Unit::IsoWeek => Ok(Grain::Week),
            Unit::Date | Unit::Day => Ok(Grain::Day),
            Unit::Hour => Ok(Grain::Hour),
            Unit::Minute => Ok(Grain::Minute),
            Unit::Second => Ok(Grain::Second),
            Unit::Millisecond => Ok(Grain::Millisecond),
            other => Err(ChronosError::NotADurationUnit(other)),
        }
    }
}

impl FromStr for Grain {
    type Err = ChronosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Grain::try_from(s.parse::<Unit>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_aliases_are_case_sensitive_first() {
        let cases: Vec<(&str, Unit)> = vec![
            ("M", Unit::Month),
            ("m", Unit::Minute),
            ("D", Unit::Date),
            ("d", Unit::Day),
            ("Days", Unit::Day),
            ("YEARS", Unit::Year),
            ("isoWeek", Unit::IsoWeek),
            ("ms", Unit::Millisecond),
            ("DDD", Unit::DayOfYear),
            ("GG", Unit::IsoWeekYear),
        ];
        for (input, expected) in cases {
            assert_eq!(input.parse::<Unit>(), Ok(expected), "alias {input:?}");
        }
    }

    #[test]
    fn unknown_units_are_errors() {
        assert_eq!("fortnight".parse::<Unit>(), Err(ChronosError::UnknownUnit("fortnight".to_string())));
    }

    #[test]
    fn grain_rejects_calendar_only_fields() {
        assert_eq!("date".parse::<Grain>(), Ok(Grain::Day));
        assert_eq!("W".parse::<Grain>(), Ok(Grain::Week));
        assert_eq!(Grain::try_from(Unit::DayOfYear), Err(ChronosError::NotADurationUnit(Unit::DayOfYear)));
    }
}
