//! Relative-time phrases for durations ("a few seconds", "in 3 days").

use super::Duration;
use crate::locale::RelativeKey;
use crate::units::Grain;

/// Cut-offs at which [`Duration::humanize`] moves to the next coarser unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Up to this many seconds reads as "a few seconds".
    pub ss: f64,
    /// Below this many seconds, "N seconds".
    pub s: f64,
    pub m: f64,
    pub h: f64,
    pub d: f64,
    /// Weeks are skipped unless set.
    pub w: Option<f64>,
    /// Below this many months, "N months"; above, years.
    pub months: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds { ss: 44.0, s: 45.0, m: 45.0, h: 22.0, d: 26.0, w: None, months: 11.0 }
    }
}

impl Duration {
    /// `"a few seconds"`, `"2 hours"`, ... or with `with_suffix`, `"in 2
    /// hours"` / `"2 hours ago"`.
    pub fn humanize(&self, with_suffix: bool) -> String {
        self.humanize_with(with_suffix, &Thresholds::default())
    }

    pub fn humanize_with(&self, with_suffix: bool, thresholds: &Thresholds) -> String {
        let locale = self.locale();
        if !self.is_valid() {
            return locale.invalid_date.clone();
        }
        let (key, number) = relative_key(self, thresholds);
        let is_future = self.value_of() > 0.0;
        let mut output = locale.relative_time(number.max(1), !with_suffix, key, is_future);
        if with_suffix {
            output = locale.past_future(is_future, &output);
        }
        tracing::trace!(?key, number, "humanized duration");
        locale.postformat(&output)
    }
}

/// The coarsest phrase whose threshold the rounded magnitude falls under.
fn relative_key(duration: &Duration, t: &Thresholds) -> (RelativeKey, i64) {
    let abs = duration.abs();
    let round = |grain: Grain| abs.as_unit(grain).round();
    let seconds = round(Grain::Second);
    let minutes = round(Grain::Minute);
    let hours = round(Grain::Hour);
    let days = round(Grain::Day);
    let weeks = round(Grain::Week);
    let months = round(Grain::Month);
    let years = round(Grain::Year);

    let pick = |key: RelativeKey, n: f64| (key, n as i64);
    if seconds <= t.ss {
        return pick(RelativeKey::FewSeconds, seconds);
    }
    if seconds < t.s {
        return pick(RelativeKey::Seconds, seconds);
    }
    if minutes <= 1.0 {
        return pick(RelativeKey::Minute, 1.0);
    }
    if minutes < t.m {
        return pick(RelativeKey::Minutes, minutes);
    }
    if hours <= 1.0 {
        return pick(RelativeKey::Hour, 1.0);
    }
    if hours < t.h {
        return pick(RelativeKey::Hours, hours);
    }
    if days <= 1.0 {
        return pick(RelativeKey::Day, 1.0);
    }
    if days < t.d {
        return pick(RelativeKey::Days, days);
    }
    if let Some(w) = t.w {
        if weeks <= 1.0 {
            return pick(RelativeKey::Week, 1.0);
        }
        if weeks < w {
            return pick(RelativeKey::Weeks, weeks);
        }
    }
    if months <= 1.0 {
        return pick(RelativeKey::Month, 1.0);
    }
    if months < t.months {
        return pick(RelativeKey::Months, months);
    }
    if years <= 1.0 {
        return pick(RelativeKey::Year, 1.0);
    }
    pick(RelativeKey::Years, years)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::DurationInput;
    use crate::locale::get_locale;

    fn en(amount: f64, grain: Grain) -> Duration {
        Duration::new(DurationInput::Amount(amount, grain)).with_locale_data(get_locale("en").unwrap())
    }

    #[test]
    fn phrase_table() {
        let cases = [
            (44.0, Grain::Second, "a few seconds"),
            (45.0, Grain::Second, "a minute"),
            (89.0, Grain::Second, "a minute"),
            (44.0, Grain::Minute, "44 minutes"),
            (45.0, Grain::Minute, "an hour"),
            (21.0, Grain::Hour, "21 hours"),
            (22.0, Grain::Hour, "a day"),
            (25.0, Grain::Day, "25 days"),
            (26.0, Grain::Day, "a month"),
            (10.0, Grain::Month, "10 months"),
            (11.0, Grain::Month, "a year"),
            (5.0, Grain::Year, "5 years"),
        ];
        for (amount, grain, expected) in cases {
            assert_eq!(en(amount, grain).humanize(false), expected, "{amount} {grain}");
        }
    }

    #[test]
    fn suffix_follows_sign() {
        assert_eq!(en(3.0, Grain::Day).humanize(true), "in 3 days");
        assert_eq!(en(-3.0, Grain::Day).humanize(true), "3 days ago");
        assert_eq!(en(-3.0, Grain::Day).humanize(false), "3 days");
    }

    #[test]
    fn weeks_only_with_a_threshold() {
        let thresholds = Thresholds { w: Some(5.0), ..Thresholds::default() };
        assert_eq!(en(28.0, Grain::Day).humanize_with(false, &thresholds), "4 weeks");
        assert_eq!(en(28.0, Grain::Day).humanize(false), "a month");
    }

    #[test]
    fn localized_and_invalid() {
        let ru = en(5.0, Grain::Minute).with_locale("ru");
        assert_eq!(ru.humanize(true), "через 5 минут");
        let invalid = Duration::new("not a duration").with_locale_data(get_locale("en").unwrap());
        assert_eq!(invalid.humanize(false), "Invalid date");
    }
}
