//! Component array → instant.
//!
//! ```text
//! week fields ──▶ day of year ──▶ month/day
//!                                    │
//! missing leading fields ◀── reference date
//!                                    │
//! [y, M, D, h, m, s, ms] ──▶ civil time (fields roll over) ──▶ zone ──▶ offset
//! ```

use super::config::{DATE, HOUR, MILLISECOND, MINUTE, MONTH, ParseConfig, Resolution, SECOND, WeekFields, YEAR};
use crate::flags::ParseFlag;
use crate::predicates::days_in_year;
use crate::value::date_from_ordinal;
use crate::week::{day_of_year_from_weeks, week_of_year, weeks_in_year};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

/// Fill in defaults and build the instant. Does nothing when a token
/// (`X`, `x`) already fixed the instant.
pub(crate) fn resolve(config: &mut ParseConfig) {
    if config.resolution != Resolution::Pending {
        return;
    }
    let reference = config.reference_civil().date();
    let current = [i64::from(reference.year()), i64::from(reference.month0()), i64::from(reference.day())];

    // A year no date can carry leaves the fields as parsed; check_overflow
    // flags it.
    let representable = i64::from(NaiveDate::MIN.year())..=i64::from(NaiveDate::MAX.year());
    let week_years = config.week.as_ref().map_or([None, None], |w| [w.week_year, w.iso_week_year]);
    let years = [config.parts[YEAR], week_years[0], week_years[1]];
    if let Some(year) = years.into_iter().flatten().find(|year| !representable.contains(year)) {
        tracing::trace!(input = %config.input, year, "year out of range");
        config.parts[YEAR].get_or_insert(year);
        config.resolution = Resolution::Unrepresentable;
        return;
    }

    if let Some(week) = config.week.clone() {
        if config.parts[DATE].is_none() && config.parts[MONTH].is_none() {
            day_of_year_from_week_info(config, &week);
        }
    }

    if let Some(day_of_year) = config.day_of_year {
        let year = config.parts[YEAR].unwrap_or(current[0]);
        if day_of_year > days_in_year(year) || day_of_year == 0 {
            config.flags.insert(ParseFlag::OVERFLOW_DAY_OF_YEAR);
        }
        if let Some(date) = date_from_ordinal(year, day_of_year) {
            config.parts[MONTH] = Some(i64::from(date.month0()));
            config.parts[DATE] = Some(i64::from(date.day()));
        }
    }

    // Leading missing fields come from today; the rest are zero (day 1).
    let mut i = 0;
    while i < 3 && config.parts[i].is_none() {
        config.parts[i] = Some(current[i]);
        i += 1;
    }
    for (index, part) in config.parts.iter_mut().enumerate().skip(i) {
        part.get_or_insert(if index == DATE { 1 } else { 0 });
    }

    let mut a = config.parts.map(|p| p.unwrap_or(0));
    if a[HOUR] == 24 && a[MINUTE] == 0 && a[SECOND] == 0 && a[MILLISECOND] == 0 {
        config.next_day = true;
        a[HOUR] = 0;
    }

    let civil = civil_from_parts(&a);
    let instant = civil.and_then(|c| config.civil_zone().from_civil(c)).and_then(|instant| match config.tzm {
        Some(tzm) => instant.checked_sub_signed(Duration::minutes(i64::from(tzm))),
        None => Some(instant),
    });
    config.resolution = match instant {
        Some(instant) => Resolution::At(instant),
        None => Resolution::Unrepresentable,
    };

    if let (Some(expected), Some(parsed)) = (civil, config.week.as_ref().and_then(|w| w.day)) {
        if i64::from(expected.weekday().num_days_from_sunday()) != parsed {
            config.flags.insert(ParseFlag::WEEKDAY_MISMATCH);
        }
    }
}

/// Wall-clock time from components where any field may run past its range
/// and carries into the next (month 12 is January of the next year, hour 25
/// is 1am the next day).
pub(crate) fn civil_from_parts(a: &[i64; 7]) -> Option<NaiveDateTime> {
    let months = a[YEAR].checked_mul(12)?.checked_add(a[MONTH])?;
    let year = i32::try_from(months.div_euclid(12)).ok()?;
    let first = NaiveDate::from_ymd_opt(year, months.rem_euclid(12) as u32 + 1, 1)?;
    let midnight = first.and_hms_opt(0, 0, 0)?;
    let offset = Duration::try_days(a[DATE].checked_sub(1)?)?
        .checked_add(&Duration::try_hours(a[HOUR])?)?
        .checked_add(&Duration::try_minutes(a[MINUTE])?)?
        .checked_add(&Duration::try_seconds(a[SECOND])?)?
        .checked_add(&Duration::try_milliseconds(a[MILLISECOND])?)?;
    midnight.checked_add_signed(offset)
}

/// Turn week-based fields into a year and day of year. ISO fields (`G`, `W`,
/// `E`) use Monday weeks with January 4th in week 1; the others use the
/// locale's rule. Missing fields default to the reference date's week.
fn day_of_year_from_week_info(config: &mut ParseConfig, w: &WeekFields) {
    let reference = config.reference_civil().date();
    let ref_year = i64::from(reference.year());
    let ref_ordinal = i64::from(reference.ordinal());
    let mut weekday_overflow = false;

    let (week_year, week, weekday, dow, doy) =
        if w.iso_week_year.is_some() || w.iso_week.is_some() || w.iso_weekday.is_some() {
            let current = week_of_year(ref_year, ref_ordinal, 1, 4);
            let week_year = w.iso_week_year.or(config.parts[YEAR]).unwrap_or(current.year);
            let weekday = w.iso_weekday.unwrap_or(1);
            weekday_overflow = !(1..=7).contains(&weekday);
            (week_year, w.iso_week.unwrap_or(1), weekday, 1, 4)
        } else {
            let rule = config.locale.week;
            let (dow, doy) = (i64::from(rule.dow), i64::from(rule.doy));
            let current = week_of_year(ref_year, ref_ordinal, dow, doy);
            let week_year = w.week_year.or(config.parts[YEAR]).unwrap_or(current.year);
            let weekday = if let Some(day) = w.day {
                weekday_overflow = !(0..=6).contains(&day);
                day
            } else if let Some(local) = w.weekday {
                weekday_overflow = !(0..=6).contains(&local);
                if weekday_overflow { dow } else { local + dow }
            } else {
                dow
            };
            (week_year, w.week.unwrap_or(current.week), weekday, dow, doy)
        };

    if week < 1 || week > weeks_in_year(week_year, dow, doy) {
        config.flags.insert(ParseFlag::OVERFLOW_WEEKS);
    } else if weekday_overflow {
        config.flags.insert(ParseFlag::OVERFLOW_WEEKDAY);
    } else {
        let day = day_of_year_from_weeks(week_year, week, weekday, dow, doy);
        config.parts[YEAR] = Some(day.year);
        config.day_of_year = Some(day.day_of_year);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::get_locale;
    use chrono::{TimeZone, Utc};

    fn config() -> ParseConfig {
        let reference = Utc.with_ymd_and_hms(2013, 2, 12, 0, 0, 0).unwrap();
        ParseConfig::new(String::new(), get_locale("en").unwrap(), false, true, reference)
    }

    fn resolved(parts: [Option<i64>; 7]) -> ParseConfig {
        let mut config = config();
        config.parts = parts;
        resolve(&mut config);
        config
    }

    #[test]
    fn leading_fields_default_to_reference_date() {
        let config = resolved([None, None, None, Some(9), None, None, None]);
        assert_eq!(config.parts, [Some(2013), Some(1), Some(12), Some(9), Some(0), Some(0), Some(0)]);

        let config = resolved([Some(2010), None, None, None, None, None, None]);
        assert_eq!(config.parts, [Some(2010), Some(0), Some(1), Some(0), Some(0), Some(0), Some(0)]);
    }

    #[test]
    fn midnight_24_moves_to_next_day() {
        let config = resolved([Some(2024), Some(0), Some(31), Some(24), Some(0), Some(0), Some(0)]);
        assert!(config.next_day);
        let instant = config.instant().unwrap();
        assert_eq!(instant, Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap());
    }

    #[test]
    fn civil_parts_roll_over() {
        let civil = civil_from_parts(&[2023, 12, 1, 25, 0, 0, 0]).unwrap();
        assert_eq!(civil, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(1, 0, 0).unwrap());
        assert!(civil_from_parts(&[i64::MAX, 0, 1, 0, 0, 0, 0]).is_none());
    }

    #[test]
    fn iso_week_fields_resolve_to_a_date() {
        let mut config = config();
        let week =
            WeekFields { iso_week_year: Some(2009), iso_week: Some(53), iso_weekday: Some(7), ..Default::default() };
        config.week = Some(week);
        resolve(&mut config);
        assert_eq!(config.parts[..3], [Some(2010), Some(0), Some(3)]);
    }

    #[test]
    fn week_overflow_is_deferred() {
        let mut config = config();
        config.week = Some(WeekFields { iso_week_year: Some(2016), iso_week: Some(53), ..Default::default() });
        resolve(&mut config);
        assert!(config.flags.contains(ParseFlag::OVERFLOW_WEEKS));
    }

    #[test]
    fn offset_shifts_the_instant() {
        let mut config = config();
        config.parts = [Some(2024), Some(0), Some(15), Some(10), Some(0), Some(0), Some(0)];
        config.tzm = Some(120);
        resolve(&mut config);
        assert_eq!(config.instant(), Some(Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap()));
    }
}
