//! Calendar arithmetic on [`Chronos`] values.
//!
//! Adding a [`Duration`] applies its three buckets in a fixed order:
//!
//! 1. months, on the wall-clock date, clamping the day to the target month
//!    (`Jan 31 + 1 month = Feb 29/28`);
//! 2. days, on the wall-clock date, keeping the time of day across DST;
//! 3. milliseconds, on the instant.
//!
//! Months and days are rounded half away from zero first, so `add(1.5,
//! Day)` moves two days while `add(1.5, Hour)` moves ninety minutes.

use crate::duration::{Duration, DurationInput};
use crate::predicates::{abs_floor, abs_round};
use crate::units::Grain;
use crate::value::{Chronos, set_year_month, shift_days};
use chrono::{Datelike, Duration as ChronoDuration};

const MS_PER_DAY: f64 = 864e5;

impl Chronos {
    /// A copy moved forward by `amount` of `grain` (backward when negative).
    pub fn add(&self, amount: f64, grain: Grain) -> Chronos {
        self.add_duration(&Duration::new(DurationInput::Amount(amount, grain)))
    }

    pub fn subtract(&self, amount: f64, grain: Grain) -> Chronos {
        self.subtract_duration(&Duration::new(DurationInput::Amount(amount, grain)))
    }

    pub fn add_duration(&self, duration: &Duration) -> Chronos {
        self.shift(duration, 1.0)
    }

    pub fn subtract_duration(&self, duration: &Duration) -> Chronos {
        self.shift(duration, -1.0)
    }

    fn shift(&self, duration: &Duration, direction: f64) -> Chronos {
        if !self.is_valid() || !duration.is_valid() {
            return self.clone();
        }
        let (milliseconds, days, months) = duration.buckets();
        let months = abs_round(months) * direction;
        let days = abs_round(days) * direction;
        let milliseconds = (milliseconds * direction).trunc();
        if ![months, days, milliseconds].iter().all(|v| v.is_finite() && v.abs() < 9.0e15) {
            return self.with_instant(None);
        }

        let mut value = self.clone();
        if months != 0.0 {
            value = match value.civil() {
                Some(civil) => {
                    let target = i64::from(civil.month0()) + months as i64;
                    match set_year_month(civil, i64::from(civil.year()), target) {
                        Some(shifted) => value.with_civil(shifted),
                        None => value.with_instant(None),
                    }
                }
                None => value,
            };
        }
        if days != 0.0 {
            value = match value.civil().and_then(|civil| shift_days(civil, days as i64)) {
                Some(shifted) => value.with_civil(shifted),
                None => value.with_instant(None),
            };
        }
        if milliseconds != 0.0 {
            let moved = value
                .instant()
                .and_then(|instant| instant.checked_add_signed(ChronoDuration::try_milliseconds(milliseconds as i64)?));
            value = value.with_instant(moved);
        }
        value
    }

    /// `self - other` measured in `grain`. Months, quarters and years count
    /// calendar months with a fractional part for the partial month; the
    /// other grains divide the elapsed time, with days and weeks corrected
    /// for an offset change between the two values. The result is truncated
    /// toward zero unless `exact`. `None` when either value is invalid.
    pub fn diff(&self, other: &Chronos, grain: Grain, exact: bool) -> Option<f64> {
        let a = self.value_of()? as f64;
        let that = other.with_zone(self.zone());
        let b = that.value_of()? as f64;
        let zone_delta = f64::from(that.utc_offset()? - self.utc_offset()?) * 6e4;
        let output = match grain {
            Grain::Year => month_diff(self, &that)? / 12.0,
            Grain::Quarter => month_diff(self, &that)? / 3.0,
            Grain::Month => month_diff(self, &that)?,
            Grain::Week => (a - b - zone_delta) / (7.0 * MS_PER_DAY),
            Grain::Day => (a - b - zone_delta) / MS_PER_DAY,
            Grain::Hour => (a - b) / 36e5,
            Grain::Minute => (a - b) / 6e4,
            Grain::Second => (a - b) / 1e3,
            Grain::Millisecond => a - b,
        };
        Some(if exact { output } else { abs_floor(output) })
    }
}

/// Whole months from `b` to `a`, plus the fraction of the month around `b`
/// that the remainder covers.
fn month_diff(a: &Chronos, b: &Chronos) -> Option<f64> {
    if a.date()? < b.date()? {
        return month_diff(b, a).map(|d| -d);
    }
    let whole = (b.year()? - a.year()?) * 12 + (b.month()? - a.month()?);
    let millis = |months: i64| a.add(months as f64, Grain::Month).value_of().map(|v| v as f64);
    let anchor = millis(whole)?;
    let target = b.value_of()? as f64;
    let adjust = if target - anchor < 0.0 {
        (target - anchor) / (anchor - millis(whole - 1)?)
    } else {
        (target - anchor) / (millis(whole + 1)? - anchor)
    };
    let result = -(whole as f64 + adjust);
    Some(if result == 0.0 { 0.0 } else { result })
}

/// Signed `(months, milliseconds)` from `from` to `to`: step whole calendar
/// months first, then the remaining milliseconds. Both are zero when either
/// value is invalid.
pub(crate) fn month_ms_difference(from: &Chronos, to: &Chronos) -> (f64, f64) {
    if !(from.is_valid() && to.is_valid()) {
        return (0.0, 0.0);
    }
    let to = to.with_zone(from.zone());
    if from.is_before(&to, Grain::Millisecond) {
        positive_difference(from, &to)
    } else {
        let (months, milliseconds) = positive_difference(&to, from);
        (-months, -milliseconds)
    }
}

fn positive_difference(base: &Chronos, other: &Chronos) -> (f64, f64) {
    let (Some(by), Some(bm), Some(oy), Some(om)) = (base.year(), base.month(), other.year(), other.month()) else {
        return (0.0, 0.0);
    };
    let mut months = om - bm + (oy - by) * 12;
    if base.add(months as f64, Grain::Month).is_after(other, Grain::Millisecond) {
        months -= 1;
    }
    let stepped = base.add(months as f64, Grain::Month).value_of().unwrap_or_default();
    let milliseconds = other.value_of().unwrap_or_default() - stepped;
    (months as f64, milliseconds as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zone::Zone;
    use chrono::{TimeZone, Utc};

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> Chronos {
        Chronos::from_instant(Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap(), Zone::Utc)
    }

    #[test]
    fn month_diff_between_month_starts() {
        assert_eq!(at(2024, 3, 1, 0, 0).diff(&at(2024, 1, 1, 0, 0), Grain::Month, false), Some(2.0));
        assert_eq!(at(2024, 1, 1, 0, 0).diff(&at(2024, 3, 1, 0, 0), Grain::Month, false), Some(-2.0));
    }

    #[test]
    fn fractional_month_diff() {
        let diff = at(2024, 2, 15, 0, 0).diff(&at(2024, 1, 1, 0, 0), Grain::Month, true).unwrap();
        assert!((diff - (1.0 + 14.0 / 31.0)).abs() < 1e-9, "{diff}");
        let years = at(2025, 7, 1, 0, 0).diff(&at(2024, 1, 1, 0, 0), Grain::Year, true).unwrap();
        assert!((years - 1.5).abs() < 1e-9);
        assert_eq!(at(2025, 7, 1, 0, 0).diff(&at(2024, 1, 1, 0, 0), Grain::Year, false), Some(1.0));
    }

    #[test]
    fn elapsed_time_diffs_truncate_toward_zero() {
        let a = at(2024, 1, 2, 12, 0);
        let b = at(2024, 1, 1, 0, 0);
        assert_eq!(a.diff(&b, Grain::Day, false), Some(1.0));
        assert_eq!(b.diff(&a, Grain::Day, false), Some(-1.0));
        assert_eq!(a.diff(&b, Grain::Day, true), Some(1.5));
        assert_eq!(a.diff(&b, Grain::Hour, false), Some(36.0));
        assert_eq!(a.diff(&b, Grain::Millisecond, false), Some(129_600_000.0));
        assert_eq!(a.diff(&Chronos::invalidated(), Grain::Day, false), None);
    }

    #[test]
    fn adding_months_clamps_the_day() {
        let jan31 = at(2024, 1, 31, 10, 30);
        assert_eq!(jan31.add(1.0, Grain::Month), at(2024, 2, 29, 10, 30));
        assert_eq!(jan31.add(1.0, Grain::Year).add(1.0, Grain::Month), at(2025, 2, 28, 10, 30));
        assert_eq!(jan31.subtract(2.0, Grain::Month), at(2023, 11, 30, 10, 30));
        assert_eq!(jan31.add(1.0, Grain::Quarter), at(2024, 4, 30, 10, 30));
    }

    #[test]
    fn days_round_and_milliseconds_shift_the_instant() {
        let start = at(2024, 1, 1, 0, 0);
        assert_eq!(start.add(1.5, Grain::Day), at(2024, 1, 3, 0, 0));
        assert_eq!(start.add(1.5, Grain::Hour), at(2024, 1, 1, 1, 30));
        assert_eq!(start.add(2.0, Grain::Week), at(2024, 1, 15, 0, 0));
        assert_eq!(start.subtract(1.0, Grain::Minute), at(2023, 12, 31, 23, 59));
    }

    #[test]
    fn months_apply_before_days() {
        let duration = Duration::new(DurationInput::Bag(vec![("months".into(), 1.0), ("days".into(), 1.0)]));
        assert_eq!(at(2024, 1, 31, 0, 0).add_duration(&duration), at(2024, 3, 1, 0, 0));
    }

    #[test]
    fn invalid_values_stay_invalid() {
        assert!(!Chronos::invalidated().add(1.0, Grain::Day).is_valid());
        assert!(!at(2024, 1, 1, 0, 0).add(1e300, Grain::Year).is_valid());
    }

    #[test]
    fn month_stepping_difference() {
        assert_eq!(month_ms_difference(&at(2024, 1, 31, 0, 0), &at(2024, 3, 1, 0, 0)), (1.0, 86_400_000.0 * 1.0));
        assert_eq!(month_ms_difference(&at(2024, 3, 1, 0, 0), &at(2024, 1, 1, 0, 0)), (-2.0, 0.0));
    }
}
