use super::config::{DATE, HOUR, MILLISECOND, MINUTE, MONTH, ParseConfig, SECOND, YEAR};
use crate::flags::ParseFlag;
use crate::predicates::days_in_month;
use crate::units::Unit;
use chrono::{Datelike, NaiveDate};

/// Record the first out-of-range component, checked from year down to
/// millisecond. Missing components are never out of range. Runs once per
/// config; paths that decided validity some other way skip it.
pub(crate) fn check_overflow(config: &mut ParseConfig) {
    if config.overflow_checked {
        return;
    }
    config.overflow_checked = true;

    let a = &config.parts;
    let out = |index: usize, range: std::ops::RangeInclusive<i64>| a[index].is_some_and(|v| !range.contains(&v));
    let min_year = i64::from(NaiveDate::MIN.year());
    let max_year = i64::from(NaiveDate::MAX.year());

    let mut overflow = if out(YEAR, min_year..=max_year) {
        Some(Unit::Year)
    } else if out(MONTH, 0..=11) {
        Some(Unit::Month)
    } else if a[DATE].is_some_and(|d| d < 1 || d > days_in_month(a[YEAR].unwrap_or(0), a[MONTH].unwrap_or(0))) {
        Some(Unit::Date)
    } else if hour_overflows(a) {
        Some(Unit::Hour)
    } else if out(MINUTE, 0..=59) {
        Some(Unit::Minute)
    } else if out(SECOND, 0..=59) {
        Some(Unit::Second)
    } else if out(MILLISECOND, 0..=999) {
        Some(Unit::Millisecond)
    } else {
        None
    };

    let flags = &config.flags;
    let below_date = matches!(overflow, None | Some(Unit::Hour | Unit::Minute | Unit::Second | Unit::Millisecond));
    if flags.contains(ParseFlag::OVERFLOW_DAY_OF_YEAR) && below_date {
        overflow = Some(Unit::Date);
    }
    if overflow.is_none() && flags.contains(ParseFlag::OVERFLOW_WEEKS) {
        overflow = Some(Unit::Week);
    }
    if overflow.is_none() && flags.contains(ParseFlag::OVERFLOW_WEEKDAY) {
        overflow = Some(Unit::Weekday);
    }
    if let Some(unit) = overflow {
        tracing::trace!(input = %config.input, ?unit, "component overflow");
    }
    config.flags.overflow = overflow;
}

/// Hours run 0..=24, and 24 only as `24:00:00.000`.
fn hour_overflows(a: &[Option<i64>; 7]) -> bool {
    match a[HOUR] {
        Some(h) if !(0..=24).contains(&h) => true,
        Some(24) => [MINUTE, SECOND, MILLISECOND].iter().any(|&i| a[i].is_some_and(|v| v != 0)),
        _ => false,
    }
}
