//! [`Chronos`]: an instant seen through a zone and a locale.
//!
//! A `Chronos` is immutable. Getters read calendar fields from the civil
//! (wall-clock) time in the value's [`Zone`]; setters return a new value.
//! An invalid `Chronos` has no instant: every getter returns `None`, every
//! setter returns another invalid value, and formatting prints the locale's
//! invalid-date phrase.

use crate::flags::{ParseFlag, ParsingFlags};
use crate::locale::{Locale, get_locale, global_locale};
use crate::predicates::{days_in_month, is_leap_year};
use crate::units::{Grain, Unit};
use crate::week::{day_of_year_from_weeks, week_of_year, weeks_in_year};
use crate::zone::Zone;
use chrono::{DateTime, Datelike, Duration as ChronoDuration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Chronos {
    instant: Option<DateTime<Utc>>,
    zone: Zone,
    locale: Arc<Locale>,
    strict: bool,
    flags: ParsingFlags,
}

/// Which ends of a range [`Chronos::is_between`] includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Inclusivity {
    /// `()`
    #[default]
    Exclusive,
    /// `[]`
    Inclusive,
    /// `[)`
    IncludeStart,
    /// `(]`
    IncludeEnd,
}

impl Chronos {
    /// A valid value at `instant`, in the global locale.
    pub fn from_instant(instant: DateTime<Utc>, zone: Zone) -> Self {
        Chronos { instant: Some(instant), zone, locale: global_locale(), strict: false, flags: ParsingFlags::default() }
    }

    /// A valid value at the given wall-clock time in `zone`; invalid if that
    /// time cannot be represented.
    pub fn from_civil(civil: NaiveDateTime, zone: Zone) -> Self {
        match zone.from_civil(civil) {
            Some(instant) => Chronos::from_instant(instant, zone),
            None => Chronos::invalid(ParsingFlags::default(), global_locale()),
        }
    }

    pub fn from_millis(millis: i64, zone: Zone) -> Self {
        match DateTime::<Utc>::from_timestamp_millis(millis) {
            Some(instant) => Chronos::from_instant(instant, zone),
            None => Chronos::invalid(ParsingFlags::default(), global_locale()),
        }
    }

    /// An invalid value carrying the diagnostics that explain it.
    pub fn invalid(flags: ParsingFlags, locale: Arc<Locale>) -> Self {
        Chronos { instant: None, zone: Zone::default(), locale, strict: false, flags }
    }

    /// An invalid value marked as invalidated by the caller.
    pub fn invalidated() -> Self {
        Chronos::invalid(ParsingFlags::with(ParseFlag::USER_INVALIDATED), global_locale())
    }

    pub(crate) fn from_parts(
        instant: Option<DateTime<Utc>>,
        zone: Zone,
        locale: Arc<Locale>,
        strict: bool,
        flags: ParsingFlags,
    ) -> Self {
        Chronos { instant, zone, locale, strict, flags }
    }

    pub fn is_valid(&self) -> bool {
        self.instant.is_some()
    }

    pub fn parsing_flags(&self) -> &ParsingFlags {
        &self.flags
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn instant(&self) -> Option<DateTime<Utc>> {
        self.instant
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    pub fn locale(&self) -> &Arc<Locale> {
        &self.locale
    }

    /// Wall-clock time in the value's zone.
    pub fn civil(&self) -> Option<NaiveDateTime> {
        self.instant.map(|i| self.zone.to_civil(&i))
    }

    /// Milliseconds since the Unix epoch.
    pub fn value_of(&self) -> Option<i64> {
        self.instant.map(|i| i.timestamp_millis())
    }

    pub fn unix(&self) -> Option<i64> {
        self.instant.map(|i| i.timestamp())
    }

    /// Offset from UTC in minutes at this instant.
    pub fn utc_offset(&self) -> Option<i32> {
        self.instant.map(|i| self.zone.offset_minutes(&i))
    }

    // --- Zone and locale ----------------------------------------------------

    /// The same instant viewed in another zone.
    pub fn with_zone(&self, zone: Zone) -> Self {
        Chronos { zone, ..self.clone() }
    }

    pub fn utc(&self) -> Self {
        self.with_zone(Zone::Utc)
    }

    pub fn local(&self) -> Self {
        self.with_zone(Zone::Local)
    }

    pub fn is_utc(&self) -> bool {
        self.zone.is_utc()
    }

    /// The same value rendered with another registered locale. Unknown ids
    /// leave the locale unchanged.
    pub fn with_locale(&self, id: &str) -> Self {
        match get_locale(id) {
            Some(locale) => self.with_locale_data(locale),
            None => self.clone(),
        }
    }

    pub(crate) fn with_locale_data(&self, locale: Arc<Locale>) -> Self {
        Chronos { locale, ..self.clone() }
    }

    /// A copy built from wall-clock time in the same zone and locale.
    pub(crate) fn with_civil(&self, civil: NaiveDateTime) -> Self {
        if !self.is_valid() {
            return self.clone();
        }
        Chronos { instant: self.zone.from_civil(civil), ..self.clone() }
    }

    pub(crate) fn with_instant(&self, instant: Option<DateTime<Utc>>) -> Self {
        if !self.is_valid() {
            return self.clone();
        }
        Chronos { instant, ..self.clone() }
    }

    // --- Getters ------------------------------------------------------------

    /// Read one calendar field. Months are zero-based, days of week count
    /// from Sunday = 0 (`Weekday` from the locale's first day, `IsoWeekday`
    /// from Monday = 1).
    pub fn get(&self, unit: Unit) -> Option<i64> {
        let civil = self.civil()?;
        let date = civil.date();
        let year = i64::from(date.year());
        let day = i64::from(date.weekday().num_days_from_sunday());
        let rule = self.locale.week;
        let (dow, doy) = (i64::from(rule.dow), i64::from(rule.doy));
        let value = match unit {
            Unit::Year => year,
            Unit::Quarter => i64::from(date.month0() / 3) + 1,
            Unit::Month => i64::from(date.month0()),
            Unit::Date => i64::from(date.day()),
            Unit::Day => day,
            Unit::Weekday => (day + 7 - dow) % 7,
            Unit::IsoWeekday => {
                if day == 0 {
                    7
                } else {
                    day
                }
            }
            Unit::DayOfYear => i64::from(date.ordinal()),
            Unit::Week => week_of_year(year, i64::from(date.ordinal()), dow, doy).week,
            Unit::IsoWeek => week_of_year(year, i64::from(date.ordinal()), 1, 4).week,
            Unit::WeekYear => week_of_year(year, i64::from(date.ordinal()), dow, doy).year,
            Unit::IsoWeekYear => week_of_year(year, i64::from(date.ordinal()), 1, 4).year,
            Unit::Hour => i64::from(civil.hour()),
            Unit::Minute => i64::from(civil.minute()),
            Unit::Second => i64::from(civil.second()),
            Unit::Millisecond => i64::from(civil.nanosecond() / 1_000_000),
        };
        Some(value)
    }

    pub fn year(&self) -> Option<i64> {
        self.get(Unit::Year)
    }

    pub fn month(&self) -> Option<i64> {
        self.get(Unit::Month)
    }

    pub fn date(&self) -> Option<i64> {
        self.get(Unit::Date)
    }

    pub fn day(&self) -> Option<i64> {
        self.get(Unit::Day)
    }

    pub fn hour(&self) -> Option<i64> {
        self.get(Unit::Hour)
    }

    pub fn minute(&self) -> Option<i64> {
        self.get(Unit::Minute)
    }

    pub fn second(&self) -> Option<i64> {
        self.get(Unit::Second)
    }

    pub fn millisecond(&self) -> Option<i64> {
        self.get(Unit::Millisecond)
    }

    pub fn is_leap_year(&self) -> Option<bool> {
        self.year().map(is_leap_year)
    }

    pub fn days_in_month(&self) -> Option<i64> {
        Some(days_in_month(self.year()?, self.month()?))
    }

    pub fn weeks_in_year(&self) -> Option<i64> {
        let rule = self.locale.week;
        Some(weeks_in_year(self.get(Unit::WeekYear)?, i64::from(rule.dow), i64::from(rule.doy)))
    }

    pub fn iso_weeks_in_year(&self) -> Option<i64> {
        Some(weeks_in_year(self.get(Unit::IsoWeekYear)?, 1, 4))
    }

    // --- Setters ------------------------------------------------------------

    /// A copy with one calendar field replaced. Out-of-range values roll
    /// over into the neighbouring field (`Date` 32 of January is February
    /// 1st), except that setting `Year`, `Quarter` or `Month` clamps the day
    /// of month to the target month's length.
    pub fn with_unit(&self, unit: Unit, value: i64) -> Chronos {
        let Some(civil) = self.civil() else {
            return self.clone();
        };
        let Some(current) = self.get(unit) else {
            return self.clone();
        };
        // Targets too far away to reach leave the value invalid.
        let delta = value.checked_sub(current);
        let shifted = match unit {
            Unit::Year => set_year_month(civil, value, i64::from(civil.month0())),
            Unit::Month => set_year_month(civil, i64::from(civil.year()), value),
            Unit::Quarter => value
                .checked_sub(1)
                .and_then(|q| q.checked_mul(3))
                .and_then(|month| month.checked_add(i64::from(civil.month0()) % 3))
                .and_then(|month| set_year_month(civil, i64::from(civil.year()), month)),
            Unit::Date | Unit::Day | Unit::Weekday | Unit::DayOfYear => delta.and_then(|days| shift_days(civil, days)),
            Unit::IsoWeekday => {
                let day = self.get(Unit::Day).unwrap_or(0);
                let target = if day % 7 != 0 { Some(value) } else { value.checked_sub(7) };
                target.and_then(|t| t.checked_sub(day)).and_then(|days| shift_days(civil, days))
            }
            Unit::Week | Unit::IsoWeek => {
                delta.and_then(|weeks| weeks.checked_mul(7)).and_then(|days| shift_days(civil, days))
            }
            Unit::WeekYear => {
                let rule = self.locale.week;
                self.set_week_year(civil, value, Unit::Week, i64::from(rule.dow), i64::from(rule.doy))
            }
            Unit::IsoWeekYear => self.set_week_year(civil, value, Unit::IsoWeek, 1, 4),
            Unit::Hour => shift_civil(civil, delta.and_then(ChronoDuration::try_hours)),
            Unit::Minute => shift_civil(civil, delta.and_then(ChronoDuration::try_minutes)),
            Unit::Second => shift_civil(civil, delta.and_then(ChronoDuration::try_seconds)),
            Unit::Millisecond => shift_civil(civil, delta.and_then(ChronoDuration::try_milliseconds)),
        };
        match shifted {
            Some(civil) => self.with_civil(civil),
            None => self.with_instant(None),
        }
    }

    /// Same locale week and weekday in week-year `year`.
    pub fn with_week_year(&self, year: i64) -> Chronos {
        self.with_unit(Unit::WeekYear, year)
    }

    /// Same ISO week and weekday in ISO week-year `year`.
    pub fn with_iso_week_year(&self, year: i64) -> Chronos {
        self.with_unit(Unit::IsoWeekYear, year)
    }

    /// Move to the same week and weekday of another week-year. A week past
    /// the target year's last week is clamped to that last week.
    fn set_week_year(
        &self,
        civil: NaiveDateTime,
        target: i64,
        week_unit: Unit,
        dow: i64,
        doy: i64,
    ) -> Option<NaiveDateTime> {
        i32::try_from(target).ok()?;
        let max_week = weeks_in_year(target, dow, doy);
        let mut week = self.get(week_unit)?;
        if week > max_week {
            tracing::debug!(week, max_week, year = target, "clamping week to the last week of the year");
            week = max_week;
        }
        let weekday = self.get(Unit::Day)?;
        let day = day_of_year_from_weeks(target, week, weekday, dow, doy);
        let date = date_from_ordinal(day.year, day.day_of_year)?;
        Some(NaiveDateTime::new(date, civil.time()))
    }

    // --- Start / end of unit -----------------------------------------------

    /// The first instant of the `grain` containing this value. Weeks start on
    /// the locale's first day of week.
    pub fn start_of(&self, grain: Grain) -> Chronos {
        let Some(civil) = self.civil() else {
            return self.clone();
        };
        match start_of_civil(civil, grain, self.locale.week.dow) {
            Some(start) => self.with_civil(start),
            None => self.clone(),
        }
    }

    /// The last millisecond of the `grain` containing this value.
    pub fn end_of(&self, grain: Grain) -> Chronos {
        if grain == Grain::Millisecond || !self.is_valid() {
            return self.clone();
        }
        self.start_of(grain).add(1.0, grain).add(-1.0, Grain::Millisecond)
    }

    // --- Comparison ---------------------------------------------------------

    /// `self` is earlier than `other`, comparing at `grain`: the whole
    /// `grain` containing `self` must end before `other`.
    pub fn is_before(&self, other: &Chronos, grain: Grain) -> bool {
        match (self.value_of(), other.value_of()) {
            (Some(a), Some(b)) if grain == Grain::Millisecond => a < b,
            (Some(_), Some(b)) => self.end_of(grain).value_of().is_some_and(|end| end < b),
            _ => false,
        }
    }

    pub fn is_after(&self, other: &Chronos, grain: Grain) -> bool {
        match (self.value_of(), other.value_of()) {
            (Some(a), Some(b)) if grain == Grain::Millisecond => a > b,
            (Some(_), Some(b)) => self.start_of(grain).value_of().is_some_and(|start| b < start),
            _ => false,
        }
    }

    /// `other` lies within the `grain` containing `self`.
    pub fn is_same(&self, other: &Chronos, grain: Grain) -> bool {
        let Some(b) = other.value_of() else {
            return false;
        };
        match (self.start_of(grain).value_of(), self.end_of(grain).value_of()) {
            (Some(start), Some(end)) => start <= b && b <= end,
            _ => false,
        }
    }

    pub fn is_same_or_before(&self, other: &Chronos, grain: Grain) -> bool {
        self.is_same(other, grain) || self.is_before(other, grain)
    }

    pub fn is_same_or_after(&self, other: &Chronos, grain: Grain) -> bool {
        self.is_same(other, grain) || self.is_after(other, grain)
    }

    pub fn is_between(&self, from: &Chronos, to: &Chronos, grain: Grain, inclusivity: Inclusivity) -> bool {
        if !(self.is_valid() && from.is_valid() && to.is_valid()) {
            return false;
        }
        let (start_inclusive, end_inclusive) = match inclusivity {
            Inclusivity::Exclusive => (false, false),
            Inclusivity::Inclusive => (true, true),
            Inclusivity::IncludeStart => (true, false),
            Inclusivity::IncludeEnd => (false, true),
        };
        let after_start = if start_inclusive { !self.is_before(from, grain) } else { self.is_after(from, grain) };
        let before_end = if end_inclusive { !self.is_after(to, grain) } else { self.is_before(to, grain) };
        after_start && before_end
    }

    pub fn min<'a>(&'a self, other: &'a Chronos) -> &'a Chronos {
        if other.is_before(self, Grain::Millisecond) { other } else { self }
    }

    pub fn max<'a>(&'a self, other: &'a Chronos) -> &'a Chronos {
        if other.is_after(self, Grain::Millisecond) { other } else { self }
    }
}

impl PartialEq for Chronos {
    /// Equal instants; two invalid values are never equal.
    fn eq(&self, other: &Self) -> bool {
        matches!((self.instant, other.instant), (Some(a), Some(b)) if a == b)
    }
}

impl PartialOrd for Chronos {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.instant?.cmp(&other.instant?))
    }
}

impl fmt::Display for Chronos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(None))
    }
}

// --- Civil-time helpers shared with arithmetic --------------------------------

pub(crate) fn date_from_ordinal(year: i64, ordinal: i64) -> Option<NaiveDate> {
    let jan1 = NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, 1, 1)?;
    jan1.checked_add_signed(ChronoDuration::try_days(ordinal.checked_sub(1)?)?)
}

pub(crate) fn shift_days(civil: NaiveDateTime, days: i64) -> Option<NaiveDateTime> {
    civil.checked_add_signed(ChronoDuration::try_days(days)?)
}

fn shift_civil(civil: NaiveDateTime, delta: Option<ChronoDuration>) -> Option<NaiveDateTime> {
    civil.checked_add_signed(delta?)
}

/// Move to `month` (zero-based, rolling into neighbouring years) of `year`,
/// keeping the time of day and clamping the day to the month's length.
pub(crate) fn set_year_month(civil: NaiveDateTime, year: i64, month: i64) -> Option<NaiveDateTime> {
    let total = year.checked_mul(12)?.checked_add(month)?;
    let year = total.div_euclid(12);
    let month0 = total.rem_euclid(12);
    let day = i64::from(civil.day()).min(days_in_month(year, month0));
    let date = NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month0 as u32 + 1, day as u32)?;
    Some(NaiveDateTime::new(date, civil.time()))
}

pub(crate) fn start_of_civil(civil: NaiveDateTime, grain: Grain, first_day_of_week: u32) -> Option<NaiveDateTime> {
    let date = civil.date();
    let midnight = NaiveTime::MIN;
    let start = match grain {
        Grain::Millisecond => civil.with_nanosecond(civil.nanosecond() / 1_000_000 * 1_000_000)?,
        Grain::Second => civil.with_nanosecond(0)?,
        Grain::Minute => civil.with_nanosecond(0)?.with_second(0)?,
        Grain::Hour => civil.with_nanosecond(0)?.with_second(0)?.with_minute(0)?,
        Grain::Day => NaiveDateTime::new(date, midnight),
        Grain::Week => {
            let back = (date.weekday().num_days_from_sunday() + 7 - first_day_of_week) % 7;
            NaiveDateTime::new(date.checked_sub_signed(ChronoDuration::try_days(i64::from(back))?)?, midnight)
        }
        Grain::Month => NaiveDateTime::new(date.with_day(1)?, midnight),
        Grain::Quarter => {
            let first_month = (date.month0() / 3) * 3 + 1;
            NaiveDateTime::new(NaiveDate::from_ymd_opt(date.year(), first_month, 1)?, midnight)
        }
        Grain::Year => NaiveDateTime::new(NaiveDate::from_ymd_opt(date.year(), 1, 1)?, midnight),
    };
    Some(start)
}
