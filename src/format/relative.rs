//! Phrases relative to another value: `"in 3 days"`, `"Yesterday at 2:30 PM"`.

use crate::duration::{Duration, DurationInput};
use crate::locale::{CalendarPhrase, CalendarPhrases};
use crate::units::Grain;
use crate::value::Chronos;

/// Which calendar phrase applies to a value `days` (fractional) away from
/// the start of the reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarKey {
    SameDay,
    NextDay,
    NextWeek,
    LastDay,
    LastWeek,
    SameElse,
}

impl CalendarKey {
    pub fn from_day_diff(days: f64) -> CalendarKey {
        if days < -6.0 {
            CalendarKey::SameElse
        } else if days < -1.0 {
            CalendarKey::LastWeek
        } else if days < 0.0 {
            CalendarKey::LastDay
        } else if days < 1.0 {
            CalendarKey::SameDay
        } else if days < 2.0 {
            CalendarKey::NextDay
        } else if days < 7.0 {
            CalendarKey::NextWeek
        } else {
            CalendarKey::SameElse
        }
    }

    fn phrase(self, phrases: &CalendarPhrases) -> &CalendarPhrase {
        match self {
            CalendarKey::SameDay => &phrases.same_day,
            CalendarKey::NextDay => &phrases.next_day,
            CalendarKey::NextWeek => &phrases.next_week,
            CalendarKey::LastDay => &phrases.last_day,
            CalendarKey::LastWeek => &phrases.last_week,
            CalendarKey::SameElse => &phrases.same_else,
        }
    }
}

impl Chronos {
    /// The locale's calendar phrase for this value seen from `reference`:
    /// "Today at 9:00 AM", "Last Monday at ...", or the plain date further
    /// out.
    pub fn calendar(&self, reference: &Chronos) -> String {
        self.calendar_with(reference, None)
    }

    /// As [`Chronos::calendar`], with `overrides` replacing the locale's
    /// phrase table.
    pub fn calendar_with(&self, reference: &Chronos, overrides: Option<&CalendarPhrases>) -> String {
        let start_of_day = reference.with_zone(self.zone()).start_of(Grain::Day);
        let Some(days) = self.diff(&start_of_day, Grain::Day, true) else {
            return self.locale().invalid_date.clone();
        };
        let key = CalendarKey::from_day_diff(days);
        let phrases = overrides.unwrap_or(&self.locale().calendar);
        let pattern = match key.phrase(phrases) {
            CalendarPhrase::Literal(pattern) => pattern.clone(),
            CalendarPhrase::Computed(pick) => pick(self, reference),
        };
        tracing::trace!(?key, days, "calendar phrase");
        self.format(Some(&pattern))
    }

    /// How long ago (or until) this value was, seen from `other`:
    /// `"3 days ago"`, `"in an hour"`. `without_suffix` drops the ago/in.
    pub fn from(&self, other: &Chronos, without_suffix: bool) -> String {
        if !(self.is_valid() && other.is_valid()) {
            return self.locale().invalid_date.clone();
        }
        Duration::new(DurationInput::Between(other.clone(), self.clone()))
            .with_locale_data(self.locale().clone())
            .humanize(!without_suffix)
    }

    /// The reverse of [`Chronos::from`]: how far `other` is from this value.
    pub fn to(&self, other: &Chronos, without_suffix: bool) -> String {
        if !(self.is_valid() && other.is_valid()) {
            return self.locale().invalid_date.clone();
        }
        Duration::new(DurationInput::Between(self.clone(), other.clone()))
            .with_locale_data(self.locale().clone())
            .humanize(!without_suffix)
    }
}
