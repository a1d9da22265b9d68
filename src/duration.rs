//! Spans of time.
//!
//! A [`Duration`] keeps three signed buckets that do not convert into each
//! other exactly:
//!
//! - `milliseconds` (everything from milliseconds up to hours),
//! - `days` (days and weeks; a day is not always 24h of wall clock),
//! - `months` (months, quarters and years; months vary in length).
//!
//! The per-unit bag read by [`Duration::days`], [`Duration::hours`], ... is
//! derived by *bubbling*: overflow cascades from milliseconds up to years,
//! and days are traded for months at the average Gregorian rate of
//! `146097 / 4800` days per month. If the buckets disagree in sign they are
//! first collapsed into milliseconds, so the bag never mixes signs.

#[path = "duration/humanize.rs"]
mod humanize;

pub use humanize::Thresholds;

use crate::arith::month_ms_difference;
use crate::locale::{Locale, get_locale, global_locale};
use crate::predicates::{abs_ceil, abs_floor, abs_round};
use crate::units::Grain;
use crate::value::Chronos;
use std::sync::Arc;

const MS_PER_DAY: f64 = 864e5;

/// The ways a duration can be described.
#[derive(Debug, Clone)]
pub enum DurationInput {
    Millis(f64),
    Amount(f64, Grain),
    /// ISO 8601 (`P1Y2M3DT4H5M6.5S`), .NET-style (`-1.02:03:04.5`) or a
    /// plain number of milliseconds.
    Text(String),
    /// Unit names (any alias [`Grain`] parses) with amounts.
    Bag(Vec<(String, f64)>),
    /// The span from the first value to the second, stepping calendar
    /// months first.
    Between(Chronos, Chronos),
    Duration(Duration),
}

impl From<f64> for DurationInput {
    fn from(millis: f64) -> Self {
        DurationInput::Millis(millis)
    }
}

impl From<i64> for DurationInput {
    fn from(millis: i64) -> Self {
        DurationInput::Millis(millis as f64)
    }
}

impl From<&str> for DurationInput {
    fn from(text: &str) -> Self {
        DurationInput::Text(text.to_string())
    }
}

impl From<String> for DurationInput {
    fn from(text: String) -> Self {
        DurationInput::Text(text)
    }
}

impl From<Duration> for DurationInput {
    fn from(duration: Duration) -> Self {
        DurationInput::Duration(duration)
    }
}

/// Amounts per input unit, before they are folded into buckets.
#[derive(Debug, Clone, Copy, Default)]
struct Amounts {
    years: f64,
    quarters: f64,
    months: f64,
    weeks: f64,
    days: f64,
    hours: f64,
    minutes: f64,
    seconds: f64,
    milliseconds: f64,
}

impl Amounts {
    fn slot(&mut self, grain: Grain) -> &mut f64 {
        match grain {
            Grain::Year => &mut self.years,
            Grain::Quarter => &mut self.quarters,
            Grain::Month => &mut self.months,
            Grain::Week => &mut self.weeks,
            Grain::Day => &mut self.days,
            Grain::Hour => &mut self.hours,
            Grain::Minute => &mut self.minutes,
            Grain::Second => &mut self.seconds,
            Grain::Millisecond => &mut self.milliseconds,
        }
    }

    fn get(mut self, grain: Grain) -> f64 {
        *self.slot(grain)
    }

    /// Only the smallest non-zero unit may carry a fraction.
    fn fractions_ok(self) -> bool {
        let mut seen_fraction = false;
        for grain in Grain::DESCENDING {
            let value = self.get(grain);
            if value == 0.0 {
                continue;
            }
            if seen_fraction {
                return false;
            }
            if value.trunc() != value {
                seen_fraction = true;
            }
        }
        true
    }
}

/// The bubbled per-unit bag.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DurationParts {
    pub years: f64,
    pub months: f64,
    pub days: f64,
    pub hours: f64,
    pub minutes: f64,
    pub seconds: f64,
    pub milliseconds: f64,
}

#[derive(Debug, Clone)]
pub struct Duration {
    milliseconds: f64,
    days: f64,
    months: f64,
    data: DurationParts,
    valid: bool,
    locale: Arc<Locale>,
}

impl Duration {
    pub fn new(input: impl Into<DurationInput>) -> Duration {
        match input.into() {
            DurationInput::Duration(duration) => duration,
            DurationInput::Millis(millis) => {
                Duration::from_amounts(Amounts { milliseconds: millis, ..Amounts::default() }, true)
            }
            DurationInput::Amount(amount, grain) => {
                let mut amounts = Amounts::default();
                *amounts.slot(grain) = amount;
                Duration::from_amounts(amounts, amount.is_finite())
            }
            DurationInput::Text(text) => parse_text(&text),
            DurationInput::Bag(entries) => {
                let mut amounts = Amounts::default();
                let mut known = true;
                for (name, amount) in &entries {
                    match name.parse::<Grain>() {
                        Ok(grain) => *amounts.slot(grain) = *amount,
                        Err(_) => known = false,
                    }
                }
                Duration::from_amounts(amounts, known)
            }
            DurationInput::Between(from, to) => {
                let (months, milliseconds) = month_ms_difference(&from, &to);
                let duration = Duration::from_amounts(Amounts { months, milliseconds, ..Amounts::default() }, true);
                duration.with_locale_data(Arc::clone(from.locale()))
            }
        }
    }

    /// A duration that is not valid: its measures are NaN and it humanizes
    /// to the locale's invalid-date phrase.
    pub fn invalid() -> Duration {
        Duration::from_amounts(Amounts::default(), false)
    }

    fn from_amounts(amounts: Amounts, known_units: bool) -> Duration {
        let valid = known_units && amounts.fractions_ok();
        let milliseconds =
            amounts.milliseconds + amounts.seconds * 1e3 + amounts.minutes * 6e4 + amounts.hours * 36e5;
        let days = amounts.days + amounts.weeks * 7.0;
        let months = amounts.months + amounts.quarters * 3.0 + amounts.years * 12.0;
        Duration::from_buckets(milliseconds, days, months, valid, global_locale())
    }

    fn from_buckets(milliseconds: f64, days: f64, months: f64, valid: bool, locale: Arc<Locale>) -> Duration {
        let data = bubble_buckets(milliseconds, days, months);
        Duration { milliseconds, days, months, data, valid, locale }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn locale(&self) -> &Arc<Locale> {
        &self.locale
    }

    /// The same duration, humanized with another registered locale. Unknown
    /// ids leave the locale unchanged.
    pub fn with_locale(&self, id: &str) -> Duration {
        match get_locale(id) {
            Some(locale) => self.with_locale_data(locale),
            None => self.clone(),
        }
    }

    pub(crate) fn with_locale_data(&self, locale: Arc<Locale>) -> Duration {
        Duration { locale, ..self.clone() }
    }

    /// Raw `(milliseconds, days, months)` buckets.
    pub fn buckets(&self) -> (f64, f64, f64) {
        (self.milliseconds, self.days, self.months)
    }

    pub fn parts(&self) -> DurationParts {
        self.data
    }

    /// A duration whose buckets are rebuilt from the bubbled bag, so they
    /// agree in sign and carry no overflow. Bubbling twice changes nothing.
    pub fn bubble(&self) -> Duration {
        let d = self.data;
        let milliseconds = d.milliseconds + d.seconds * 1e3 + d.minutes * 6e4 + d.hours * 36e5;
        let months = d.months + d.years * 12.0;
        Duration::from_buckets(milliseconds, d.days, months, self.valid, Arc::clone(&self.locale))
    }

    // --- Bag getters ------------------------------------------------------

    pub fn milliseconds(&self) -> f64 {
        self.measure(self.data.milliseconds)
    }

    pub fn seconds(&self) -> f64 {
        self.measure(self.data.seconds)
    }

    pub fn minutes(&self) -> f64 {
        self.measure(self.data.minutes)
    }

    pub fn hours(&self) -> f64 {
        self.measure(self.data.hours)
    }

    pub fn days(&self) -> f64 {
        self.measure(self.data.days)
    }

    pub fn weeks(&self) -> f64 {
        self.measure(abs_floor(self.data.days / 7.0))
    }

    pub fn months(&self) -> f64 {
        self.measure(self.data.months)
    }

    pub fn years(&self) -> f64 {
        self.measure(self.data.years)
    }

    fn measure(&self, value: f64) -> f64 {
        if self.valid { value } else { f64::NAN }
    }

    /// The whole duration expressed in `grain`. Month-based grains convert
    /// days to months at the average rate; the others convert months to
    /// (rounded) days.
    pub fn as_unit(&self, grain: Grain) -> f64 {
        if !self.valid {
            return f64::NAN;
        }
        let ms = self.milliseconds;
        match grain {
            Grain::Month | Grain::Quarter | Grain::Year => {
                let months = self.months + days_to_months(self.days + ms / MS_PER_DAY);
                match grain {
                    Grain::Quarter => months / 3.0,
                    Grain::Year => months / 12.0,
                    _ => months,
                }
            }
            _ => {
                let days = self.days + months_to_days(self.months).round();
                match grain {
                    Grain::Week => days / 7.0 + ms / 6048e5,
                    Grain::Day => days + ms / MS_PER_DAY,
                    Grain::Hour => days * 24.0 + ms / 36e5,
                    Grain::Minute => days * 1440.0 + ms / 6e4,
                    Grain::Second => days * 86400.0 + ms / 1e3,
                    _ => (days * MS_PER_DAY).floor() + ms,
                }
            }
        }
    }

    /// Approximate length in milliseconds, counting a month as 30 days and
    /// a year as 365. NaN when invalid.
    pub fn value_of(&self) -> f64 {
        if !self.valid {
            return f64::NAN;
        }
        self.milliseconds
            + self.days * MS_PER_DAY
            + (self.months % 12.0) * 2592e6
            + (self.months / 12.0).trunc() * 31536e6
    }

    pub fn abs(&self) -> Duration {
        let d = self.data;
        Duration {
            milliseconds: self.milliseconds.abs(),
            days: self.days.abs(),
            months: self.months.abs(),
            data: DurationParts {
                years: d.years.abs(),
                months: d.months.abs(),
                days: d.days.abs(),
                hours: d.hours.abs(),
                minutes: d.minutes.abs(),
                seconds: d.seconds.abs(),
                milliseconds: d.milliseconds.abs(),
            },
            ..self.clone()
        }
    }

    pub fn add(&self, other: impl Into<DurationInput>) -> Duration {
        self.combine(&Duration::new(other), 1.0)
    }

    pub fn subtract(&self, other: impl Into<DurationInput>) -> Duration {
        self.combine(&Duration::new(other), -1.0)
    }

    fn combine(&self, other: &Duration, direction: f64) -> Duration {
        Duration::from_buckets(
            self.milliseconds + direction * other.milliseconds,
            self.days + direction * other.days,
            self.months + direction * other.months,
            self.valid && other.valid,
            Arc::clone(&self.locale),
        )
    }

    /// ISO 8601 duration text. Each part carries a `-` when its bucket's sign
    /// differs from the total's; a zero duration is `P0D`. `None` when
    /// invalid.
    pub fn to_iso_string(&self) -> Option<String> {
        if !self.valid {
            return None;
        }
        let total = self.as_unit(Grain::Second);
        if total == 0.0 {
            return Some("P0D".to_string());
        }
        let mut seconds = self.milliseconds.abs() / 1000.0;
        let days = self.days.abs();
        let mut months = self.months.abs();
        let mut minutes = abs_floor(seconds / 60.0);
        let hours = abs_floor(minutes / 60.0);
        seconds %= 60.0;
        minutes %= 60.0;
        let years = abs_floor(months / 12.0);
        months %= 12.0;

        let sign_of = |v: f64| (v > 0.0) as i8 - (v < 0.0) as i8;
        let differs = |bucket: f64| if sign_of(bucket) != sign_of(total) { "-" } else { "" };
        let (ym, d, hms) = (differs(self.months), differs(self.days), differs(self.milliseconds));

        let mut out = String::new();
        if total < 0.0 {
            out.push('-');
        }
        out.push('P');
        if years != 0.0 {
            out.push_str(&format!("{ym}{}Y", number(years)));
        }
        if months != 0.0 {
            out.push_str(&format!("{ym}{}M", number(months)));
        }
        if days != 0.0 {
            out.push_str(&format!("{d}{}D", number(days)));
        }
        if hours != 0.0 || minutes != 0.0 || seconds != 0.0 {
            out.push('T');
        }
        if hours != 0.0 {
            out.push_str(&format!("{hms}{}H", number(hours)));
        }
        if minutes != 0.0 {
            out.push_str(&format!("{hms}{}M", number(minutes)));
        }
        if seconds != 0.0 {
            let fixed = format!("{seconds:.3}");
            let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
            out.push_str(&format!("{hms}{trimmed}S"));
        }
        Some(out)
    }
}

/// Whole numbers print without a fraction.
fn number(value: f64) -> String {
    if value.fract() == 0.0 { format!("{}", value as i64) } else { value.to_string() }
}

fn days_to_months(days: f64) -> f64 {
    days * 4800.0 / 146097.0
}

fn months_to_days(months: f64) -> f64 {
    months * 146097.0 / 4800.0
}

fn bubble_buckets(mut milliseconds: f64, mut days: f64, mut months: f64) -> DurationParts {
    let non_negative = milliseconds >= 0.0 && days >= 0.0 && months >= 0.0;
    let non_positive = milliseconds <= 0.0 && days <= 0.0 && months <= 0.0;
    if !(non_negative || non_positive) {
        milliseconds += abs_ceil(months_to_days(months) + days) * MS_PER_DAY;
        days = 0.0;
        months = 0.0;
    }

    let mut data = DurationParts { milliseconds: milliseconds % 1000.0, ..DurationParts::default() };
    let seconds = abs_floor(milliseconds / 1000.0);
    data.seconds = seconds % 60.0;
    let minutes = abs_floor(seconds / 60.0);
    data.minutes = minutes % 60.0;
    let hours = abs_floor(minutes / 60.0);
    data.hours = hours % 24.0;

    days += abs_floor(hours / 24.0);
    let months_from_days = abs_floor(days_to_months(days));
    months += months_from_days;
    days -= abs_ceil(months_to_days(months_from_days));

    data.years = abs_floor(months / 12.0);
    data.months = months % 12.0;
    data.days = days;
    data
}

fn parse_text(text: &str) -> Duration {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Duration::from_amounts(Amounts::default(), true);
    }
    if let Some(millis) = trimmed.parse::<f64>().ok().filter(|v| v.is_finite()) {
        return Duration::from_amounts(Amounts { milliseconds: millis, ..Amounts::default() }, true);
    }

    let aspnet = crate::regex!(r"^(-|\+)?(?:(\d*)[. ])?(\d+):(\d+)(?::(\d+)(\.\d*)?)?$");
    if let Some(caps) = aspnet.captures(text) {
        let sign = if caps.get(1).is_some_and(|m| m.as_str() == "-") { -1.0 } else { 1.0 };
        let int = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<f64>().ok()).unwrap_or(0.0);
        let fraction = caps.get(6).and_then(|m| format!("0{}", m.as_str()).parse::<f64>().ok()).unwrap_or(0.0);
        let amounts = Amounts {
            days: int(2) * sign,
            hours: int(3) * sign,
            minutes: int(4) * sign,
            seconds: int(5) * sign,
            milliseconds: abs_round(fraction * 1000.0) * sign,
            ..Amounts::default()
        };
        tracing::trace!(input = text, "duration matched .NET form");
        return Duration::from_amounts(amounts, true);
    }

    let iso = crate::regex!(
        r"^(-|\+)?P(?:([-+]?[0-9,.]*)Y)?(?:([-+]?[0-9,.]*)M)?(?:([-+]?[0-9,.]*)W)?(?:([-+]?[0-9,.]*)D)?(?:T(?:([-+]?[0-9,.]*)H)?(?:([-+]?[0-9,.]*)M)?(?:([-+]?[0-9,.]*)S)?)?$"
    );
    if let Some(caps) = iso.captures(text) {
        let sign = if caps.get(1).is_some_and(|m| m.as_str() == "-") { -1.0 } else { 1.0 };
        let part = |i: usize| caps.get(i).map(|m| leading_float(&m.as_str().replace(',', "."))).unwrap_or(0.0) * sign;
        let amounts = Amounts {
            years: part(2),
            months: part(3),
            weeks: part(4),
            days: part(5),
            hours: part(6),
            minutes: part(7),
            seconds: part(8),
            ..Amounts::default()
        };
        tracing::trace!(input = text, "duration matched ISO 8601 form");
        return Duration::from_amounts(amounts, true);
    }

    tracing::debug!(input = text, "unrecognized duration text");
    Duration::invalid()
}

/// The longest numeric prefix of `text` (`"1.5.2"` reads as 1.5); zero when
/// there is none.
fn leading_float(text: &str) -> f64 {
    let prefix = crate::regex!(r"^[-+]?(?:\d+\.?\d*|\.\d+)");
    prefix.find(text).and_then(|m| m.as_str().parse::<f64>().ok()).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bag(entries: &[(&str, f64)]) -> Duration {
        Duration::new(DurationInput::Bag(entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()))
    }

    #[test]
    fn hours_overflow_into_days() {
        let d = bag(&[("days", 1.0), ("hours", 25.0)]).bubble();
        assert_eq!((d.days(), d.hours()), (2.0, 1.0));
        assert_eq!(d.buckets(), (3_600_000.0, 2.0, 0.0));
    }

    #[test]
    fn days_overflow_into_months_and_years() {
        let d = Duration::new(DurationInput::Amount(400.0, Grain::Day));
        assert_eq!((d.years(), d.months(), d.days()), (1.0, 1.0, 4.0));
        assert_eq!(d.weeks(), 0.0);
        assert_eq!(Duration::new(DurationInput::Amount(20.0, Grain::Day)).weeks(), 2.0);
    }

    #[test]
    fn mixed_signs_collapse_to_milliseconds() {
        let d = bag(&[("months", 1.0), ("days", -1.0)]);
        let p = d.parts();
        assert!(p.days >= 0.0 && p.hours >= 0.0 && p.months >= 0.0, "{p:?}");
        assert_eq!(p.days, 30.0);
    }

    #[test]
    fn fractional_values_only_on_the_smallest_unit() {
        assert!(bag(&[("days", 1.0), ("hours", 1.5)]).is_valid());
        assert!(!bag(&[("days", 1.5), ("hours", 1.0)]).is_valid());
        assert!(!bag(&[("fortnights", 1.0)]).is_valid());
        assert!(bag(&[("d", 2.0), ("ms", 3.0)]).is_valid());
    }

    #[test]
    fn text_forms() {
        let iso = Duration::new("P1Y2M3DT4H5M6.5S");
        let p = iso.parts();
        let bag = (p.years, p.months, p.days, p.hours, p.minutes, p.seconds, p.milliseconds);
        assert_eq!(bag, (1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 500.0));
        assert_eq!(Duration::new("-P1D").as_unit(Grain::Hour), -24.0);
        assert_eq!(Duration::new("P1,5W").as_unit(Grain::Day), 10.5);

        let dotnet = Duration::new("-1.02:03:04.5");
        assert_eq!(dotnet.value_of(), -(MS_PER_DAY + 2.0 * 36e5 + 3.0 * 6e4 + 4500.0));
        assert_eq!(Duration::new("02:30").as_unit(Grain::Minute), 150.0);

        assert_eq!(Duration::new("1500").seconds(), 1.0);
        assert!(!Duration::new("three weeks").is_valid());
        assert!(Duration::new("three weeks").as_unit(Grain::Day).is_nan());
    }

    #[test]
    fn conversions() {
        let month = Duration::new(DurationInput::Amount(1.0, Grain::Month));
        assert_eq!(month.as_unit(Grain::Day), 30.0);
        assert_eq!(month.value_of(), 2592e6);
        let year = Duration::new(DurationInput::Amount(1.0, Grain::Year));
        assert_eq!(year.as_unit(Grain::Day), 365.0);
        assert_eq!(year.value_of(), 31536e6);
        let hours = Duration::new(DurationInput::Amount(36.0, Grain::Hour));
        assert_eq!(hours.as_unit(Grain::Day), 1.5);
        assert!((Duration::new(DurationInput::Amount(365.0, Grain::Day)).as_unit(Grain::Year) - 0.9993).abs() < 1e-3);
    }

    #[test]
    fn iso_strings() {
        assert_eq!(Duration::new(0i64).to_iso_string().as_deref(), Some("P0D"));
        let full = bag(&[("y", 1.0), ("M", 2.0), ("d", 3.0), ("h", 4.0), ("m", 5.0), ("s", 6.5)]);
        assert_eq!(full.to_iso_string().as_deref(), Some("P1Y2M3DT4H5M6.5S"));
        assert_eq!(Duration::new("-P1D").to_iso_string().as_deref(), Some("-P1D"));
        assert_eq!(bag(&[("months", 1.0), ("hours", -1.0)]).to_iso_string().as_deref(), Some("P1MT-1H"));
        assert_eq!(Duration::invalid().to_iso_string(), None);
    }

    #[test]
    fn add_subtract_and_abs() {
        let d = Duration::new(DurationInput::Amount(1.0, Grain::Day)).add(DurationInput::Amount(12.0, Grain::Hour));
        assert_eq!(d.as_unit(Grain::Hour), 36.0);
        let back = d.subtract(DurationInput::Amount(2.0, Grain::Day));
        assert_eq!(back.as_unit(Grain::Hour), -12.0);
        let negative = Duration::new(DurationInput::Amount(-12.0, Grain::Hour));
        assert_eq!(negative.abs().as_unit(Grain::Hour), 12.0);
        assert!(!d.add("nonsense").is_valid());
    }

    #[test]
    fn between_steps_months_first() {
        use crate::zone::Zone;
        use chrono::{TimeZone, Utc};
        let from = Chronos::from_instant(Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap(), Zone::Utc);
        let to = Chronos::from_instant(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(), Zone::Utc);
        let d = Duration::new(DurationInput::Between(from, to));
        assert_eq!(d.buckets(), (1.5 * MS_PER_DAY, 0.0, 1.0));
    }

    proptest! {
        #[test]
        fn bubbling_is_idempotent(ms in -1e12f64..1e12, days in -5000i32..5000, months in -600i32..600) {
            let d = Duration::from_buckets(ms.trunc(), f64::from(days), f64::from(months), true, global_locale());
            let once = d.bubble();
            let twice = once.bubble();
            prop_assert_eq!(once.parts(), twice.parts());
            prop_assert_eq!(once.buckets(), twice.buckets());
        }

        #[test]
        fn bubbled_parts_share_one_sign(ms in -1e12f64..1e12, days in -5000i32..5000, months in -600i32..600) {
            let d = Duration::from_buckets(ms.trunc(), f64::from(days), f64::from(months), true, global_locale());
            let p = d.parts();
            let values = [p.years, p.months, p.days, p.hours, p.minutes, p.seconds, p.milliseconds];
            prop_assert!(values.iter().all(|v| *v >= 0.0) || values.iter().all(|v| *v <= 0.0), "{:?}", p);
        }
    }
}
