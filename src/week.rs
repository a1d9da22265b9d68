//! Week numbering for any first-day-of-week / first-week rule.
//!
//! A rule is the pair `(dow, doy)` from [`WeekRule`](crate::locale::WeekRule):
//! `dow` is the first day of the week (Sunday = 0) and `doy` encodes which
//! January day must fall in week 1 as `7 + dow - janX`. ISO 8601 is
//! `(1, 4)`: weeks start on Monday and week 1 contains January 4th.
//!
//! ```text
//!        Dec 29  Dec 30  Dec 31 | Jan 1  Jan 2  Jan 3  Jan 4
//! ISO:   ────────── week 1 of the new year ───────────────▶
//!        first_week_offset(year) = -3   (Dec 29 is day -2)
//! ```
//!
//! Everything here works on `(year, day_of_year)` pairs so it is usable from
//! the parser before a date exists.

use crate::predicates::days_in_year;

/// Day of week (Sunday = 0) of January 1st of `year`.
fn jan1_weekday(year: i64) -> i64 {
    // The Gregorian calendar repeats every 400 years.
    let y = year.rem_euclid(400) - 1;
    (1 + 5 * y.rem_euclid(4) + 4 * y.rem_euclid(100) + 6 * y.rem_euclid(400)).rem_euclid(7)
}

/// Day of week (Sunday = 0) of day-of-year `day` (1-based, may be outside
/// the year) of `year`.
pub fn weekday_of(year: i64, day: i64) -> i64 {
    (jan1_weekday(year) + day - 1).rem_euclid(7)
}

/// Offset, in days from January 1st, of the first day of week 1. Zero or
/// negative: `-3` means week 1 starts on December 29th of the previous year.
pub fn first_week_offset(year: i64, dow: i64, doy: i64) -> i64 {
    // first-week day: the January day that is always in week 1
    let fwd = 7 + dow - doy;
    // how far that day sits into its week
    let fwdlw = (7 + weekday_of(year, fwd) - dow).rem_euclid(7);
    -fwdlw + fwd - 1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekOfYear {
    pub week: i64,
    pub year: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayOfYear {
    pub year: i64,
    pub day_of_year: i64,
}

pub fn weeks_in_year(year: i64, dow: i64, doy: i64) -> i64 {
    let year = year.rem_euclid(400);
    let offset = first_week_offset(year, dow, doy);
    let next_offset = first_week_offset(year + 1, dow, doy);
    (days_in_year(year) - offset + next_offset) / 7
}

/// Week number of `day_of_year` in `year`. Days before week 1 belong to the
/// last week of the previous year and days after the last week to week 1 of
/// the next, so the returned year can differ from `year`.
pub fn week_of_year(year: i64, day_of_year: i64, dow: i64, doy: i64) -> WeekOfYear {
    let offset = first_week_offset(year, dow, doy);
    let week = (day_of_year - offset - 1).div_euclid(7) + 1;

    if week < 1 {
        let prev = year.saturating_sub(1);
        WeekOfYear { week: week + weeks_in_year(prev, dow, doy), year: prev }
    } else if week > weeks_in_year(year, dow, doy) {
        WeekOfYear { week: week - weeks_in_year(year, dow, doy), year: year.saturating_add(1) }
    } else {
        WeekOfYear { week, year }
    }
}

/// Inverse of [`week_of_year`]: the calendar day holding `weekday`
/// (Sunday = 0; ISO callers may pass 7 for Sunday) of `week` in week-year
/// `year`.
pub fn day_of_year_from_weeks(year: i64, week: i64, weekday: i64, dow: i64, doy: i64) -> DayOfYear {
    let local_weekday = (7 + weekday - dow).rem_euclid(7);
    let offset = first_week_offset(year, dow, doy);
    let day_of_year = 1 + 7 * (week - 1) + local_weekday + offset;

    if day_of_year <= 0 {
        let prev = year.saturating_sub(1);
        DayOfYear { year: prev, day_of_year: days_in_year(prev) + day_of_year }
    } else if day_of_year > days_in_year(year) {
        DayOfYear { year: year.saturating_add(1), day_of_year: day_of_year - days_in_year(year) }
    } else {
        DayOfYear { year, day_of_year }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate, Weekday};
    use proptest::prelude::*;

    #[test]
    fn jan1_weekday_matches_chrono() {
        for year in [1600, 1899, 1900, 1970, 2000, 2016, 2023, 2024, 2100] {
            let date = NaiveDate::from_ymd_opt(year as i32, 1, 1).unwrap();
            assert_eq!(jan1_weekday(year), i64::from(date.weekday().num_days_from_sunday()), "year {year}");
        }
    }

    #[test]
    fn iso_week_at_year_boundaries() {
        // 2016-01-01 is a Friday in ISO week 53 of 2015.
        assert_eq!(week_of_year(2016, 1, 1, 4), WeekOfYear { week: 53, year: 2015 });
        // 2024-12-30 is a Monday in ISO week 1 of 2025.
        assert_eq!(week_of_year(2024, 365, 1, 4), WeekOfYear { week: 1, year: 2025 });
        assert_eq!(weeks_in_year(2015, 1, 4), 53);
        assert_eq!(weeks_in_year(2016, 1, 4), 52);
        assert_eq!(weeks_in_year(2020, 1, 4), 53);
    }

    #[test]
    fn iso_week_agrees_with_chrono() {
        let mut date = NaiveDate::from_ymd_opt(2010, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2031, 1, 1).unwrap();
        while date < end {
            let iso = date.iso_week();
            let got = week_of_year(i64::from(date.year()), i64::from(date.ordinal()), 1, 4);
            assert_eq!(got, WeekOfYear { week: i64::from(iso.week()), year: i64::from(iso.year()) }, "{date}");
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn week_math_repeats_every_400_years() {
        assert_eq!(weeks_in_year(2015 + 400 * 1_000_000, 1, 4), 53);
        assert_eq!(weeks_in_year(2016 - 400 * 1_000_000, 1, 4), 52);
        assert_eq!(jan1_weekday(2024 + 400 * 7), jan1_weekday(2024));
        for year in [i64::MIN, i64::MIN + 1, i64::MAX - 1, i64::MAX] {
            assert!((52..=53).contains(&weeks_in_year(year, 1, 4)), "year {year}");
            assert!((0..7).contains(&jan1_weekday(year)), "year {year}");
        }
        assert_eq!(week_of_year(i64::MIN, 1, 1, 4).year, i64::MIN);
    }

    #[test]
    fn us_weeks_start_on_sunday() {
        // en: dow 0, doy 6 -> week 1 contains January 1st.
        assert_eq!(week_of_year(2017, 1, 0, 6), WeekOfYear { week: 1, year: 2017 });
        // 2016-12-31 is a Saturday in the week of Jan 1 2017.
        assert_eq!(week_of_year(2016, 366, 0, 6), WeekOfYear { week: 1, year: 2017 });
    }

    #[test]
    fn day_of_year_from_iso_week_date() {
        // 2009-W01-1 is 2008-12-29.
        assert_eq!(day_of_year_from_weeks(2009, 1, 1, 1, 4), DayOfYear { year: 2008, day_of_year: 364 });
        // 2009-W53-7 is 2010-01-03.
        assert_eq!(day_of_year_from_weeks(2009, 53, 7, 1, 4), DayOfYear { year: 2010, day_of_year: 3 });
        let date = NaiveDate::from_isoywd_opt(2020, 10, Weekday::Wed).unwrap();
        assert_eq!(
            day_of_year_from_weeks(2020, 10, 3, 1, 4),
            DayOfYear { year: 2020, day_of_year: i64::from(date.ordinal()) }
        );
    }

    proptest! {
        #[test]
        fn week_round_trip(
            year in 1600i64..2600,
            dow in 0i64..7,
            janx in 1i64..8,
            week_seed in 0i64..60,
            weekday in 0i64..7,
        ) {
            let doy = 7 + dow - janx;
            let weeks = weeks_in_year(year, dow, doy);
            let week = week_seed % weeks + 1;
            let day = day_of_year_from_weeks(year, week, weekday, dow, doy);
            let back = week_of_year(day.year, day.day_of_year, dow, doy);
            prop_assert_eq!(back, WeekOfYear { week, year });
            prop_assert!(back.week >= 1 && back.week <= weeks_in_year(back.year, dow, doy));
        }
    }
}
