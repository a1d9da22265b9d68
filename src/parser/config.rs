use crate::flags::{ParseFlag, ParsingFlags};
use crate::locale::Locale;
use crate::value::Chronos;
use crate::zone::Zone;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::sync::Arc;

pub(crate) const YEAR: usize = 0;
pub(crate) const MONTH: usize = 1;
pub(crate) const DATE: usize = 2;
pub(crate) const HOUR: usize = 3;
pub(crate) const MINUTE: usize = 4;
pub(crate) const SECOND: usize = 5;
pub(crate) const MILLISECOND: usize = 6;

/// Week-based fields collected from `g`/`G`/`w`/`W`/`d`/`e`/`E` tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct WeekFields {
    /// `gg`/`gggg`: locale week-year.
    pub week_year: Option<i64>,
    /// `w`: locale week.
    pub week: Option<i64>,
    /// `d`/`dd`/`ddd`/`dddd`: day of week, Sunday = 0.
    pub day: Option<i64>,
    /// `e`: locale day of week.
    pub weekday: Option<i64>,
    /// `GG`/`GGGG`: ISO week-year.
    pub iso_week_year: Option<i64>,
    /// `W`: ISO week.
    pub iso_week: Option<i64>,
    /// `E`: ISO day of week, Monday = 1.
    pub iso_weekday: Option<i64>,
}

/// Where the instant of a config stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resolution {
    /// Still to be built from the component array.
    Pending,
    At(DateTime<Utc>),
    /// The components do not name a representable instant.
    Unrepresentable,
}

/// Scratch state for one parse attempt. Each candidate pattern gets its own
/// copy; the winner becomes the resulting [`Chronos`].
#[derive(Debug, Clone)]
pub(crate) struct ParseConfig {
    pub input: String,
    pub locale: Arc<Locale>,
    pub strict: bool,
    /// Zone of the resulting value.
    pub zone: Zone,
    /// Components are read as UTC wall-clock time (set by `utc` or an
    /// offset token).
    pub use_utc: bool,
    pub reference: DateTime<Utc>,
    /// `[year, month (0-based), day, hour, minute, second, ms]`.
    pub parts: [Option<i64>; 7],
    pub week: Option<WeekFields>,
    pub day_of_year: Option<i64>,
    /// Offset in minutes parsed from the input.
    pub tzm: Option<i32>,
    pub meridiem: Option<String>,
    /// `24:00:00.000` was parsed; the result moves to the next midnight.
    pub next_day: bool,
    pub resolution: Resolution,
    pub flags: ParsingFlags,
    pub overflow_checked: bool,
    frozen: bool,
    valid: Option<bool>,
}

impl ParseConfig {
    pub fn new(input: String, locale: Arc<Locale>, strict: bool, utc: bool, reference: DateTime<Utc>) -> Self {
        ParseConfig {
            input,
            locale,
            strict,
            zone: Zone::from_utc_flag(utc),
            use_utc: utc,
            reference,
            parts: [None; 7],
            week: None,
            day_of_year: None,
            tzm: None,
            meridiem: None,
            next_day: false,
            resolution: Resolution::Pending,
            flags: ParsingFlags::default(),
            overflow_checked: false,
            frozen: false,
            valid: None,
        }
    }

    /// Zone in which the component array is read.
    pub fn civil_zone(&self) -> Zone {
        if self.use_utc { Zone::Utc } else { self.zone }
    }

    /// "Now" as wall-clock time in [`Self::civil_zone`].
    pub fn reference_civil(&self) -> NaiveDateTime {
        self.civil_zone().to_civil(&self.reference)
    }

    pub fn week_mut(&mut self) -> &mut WeekFields {
        self.week.get_or_insert_with(WeekFields::default)
    }

    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self.resolution {
            Resolution::At(instant) => Some(instant),
            Resolution::Pending | Resolution::Unrepresentable => None,
        }
    }

    /// Stop caching validity: later stages may still change the flags.
    pub fn freeze(&mut self) {
        self.frozen = true;
        self.valid = None;
    }

    pub fn thaw(&mut self) {
        self.frozen = false;
    }

    /// Validity of the config as it stands. The answer is cached unless the
    /// config is frozen.
    pub fn is_valid(&mut self) -> bool {
        if let Some(valid) = self.valid {
            return valid;
        }
        let valid = self.flags.is_valid(self.instant().is_some(), self.strict);
        if !self.frozen {
            self.valid = Some(valid);
        }
        valid
    }

    pub fn invalidate(&mut self, flag: ParseFlag) {
        self.flags.insert(flag);
        self.valid = Some(false);
    }

    /// Score used to rank candidate patterns; lower is better.
    pub fn score(&self) -> usize {
        self.flags.chars_left_over + self.flags.unused_tokens.len() * 10
    }

    pub fn into_chronos(mut self) -> Chronos {
        let valid = self.is_valid();
        let instant = if valid { self.instant() } else { None };
        let next_day = self.next_day;
        let value = Chronos::from_parts(instant, self.zone, self.locale, self.strict, self.flags);
        if next_day { value.add(1.0, crate::units::Grain::Day) } else { value }
    }
}
