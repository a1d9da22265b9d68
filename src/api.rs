use crate::duration::{Duration, DurationInput};
use crate::parser;
use crate::units::Grain;
use crate::value::Chronos;
use crate::zone::Zone;
use chrono::{DateTime, TimeZone, Utc};

/// Parsing context.
///
/// This holds the environment needed to fill in what the input leaves out
/// (a bare time of day takes today's date).
#[derive(Debug, Clone)]
pub struct Context {
    /// "Now" for defaults and relative phrases.
    pub reference_time: DateTime<Utc>,
}

impl Default for Context {
    fn default() -> Self {
        if cfg!(test) {
            Self { reference_time: Utc.with_ymd_and_hms(2013, 2, 12, 0, 0, 0).single().unwrap_or_default() }
        } else {
            Self { reference_time: Utc::now() }
        }
    }
}

/// Options that affect how input is read.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Patterns to try. `None` recognizes ISO 8601, RFC 2822 and the
    /// locale's own formats; an empty list makes every parse invalid.
    pub formats: Option<Vec<String>>,
    /// Registered locale id; the global locale when unset.
    pub locale: Option<String>,
    /// Require the whole input to match the pattern.
    pub strict: bool,
    /// Read and keep the result in UTC instead of the host's zone.
    pub utc: bool,
}

impl ParseOptions {
    /// Options that parse with a single pattern.
    pub fn with_format(pattern: impl Into<String>) -> Self {
        ParseOptions { formats: Some(vec![pattern.into()]), ..ParseOptions::default() }
    }
}

/// Options that affect how a value is rendered.
#[derive(Debug, Clone, Default)]
pub struct FormatOptions {
    pub locale: Option<String>,
    pub utc: bool,
    /// Render at this fixed offset (minutes east of UTC). Wins over `utc`.
    pub offset: Option<i32>,
}

/// Everything [`parse_date`] accepts.
#[derive(Debug, Clone)]
pub enum DateInput {
    Text(String),
    /// `[year, month (0-based), day, hour, minute, second, ms]`, any prefix.
    Array(Vec<i64>),
    /// Unit-keyed fields such as `("year", 2024)`, `("M", 1)`, `("d", 29)`.
    Object(Vec<(String, i64)>),
    /// Milliseconds since the Unix epoch.
    Millis(i64),
    Instant(DateTime<Utc>),
    Chronos(Chronos),
    Null,
}

impl From<&str> for DateInput {
    fn from(text: &str) -> Self {
        DateInput::Text(text.to_string())
    }
}

impl From<String> for DateInput {
    fn from(text: String) -> Self {
        DateInput::Text(text)
    }
}

impl From<Vec<i64>> for DateInput {
    fn from(parts: Vec<i64>) -> Self {
        DateInput::Array(parts)
    }
}

impl From<i64> for DateInput {
    fn from(millis: i64) -> Self {
        DateInput::Millis(millis)
    }
}

impl From<DateTime<Utc>> for DateInput {
    fn from(instant: DateTime<Utc>) -> Self {
        DateInput::Instant(instant)
    }
}

impl From<Chronos> for DateInput {
    fn from(value: Chronos) -> Self {
        DateInput::Chronos(value)
    }
}

impl<T: Into<DateInput>> From<Option<T>> for DateInput {
    fn from(input: Option<T>) -> Self {
        input.map_or(DateInput::Null, Into::into)
    }
}

/// Parse `input` with a default [`Context`] and default options.
///
/// # Example
/// ```
/// use chronos::parse_date;
///
/// let value = parse_date("2024-02-29");
/// assert!(value.is_valid());
/// assert!(!parse_date("2023-02-29").is_valid());
/// ```
pub fn parse_date(input: impl Into<DateInput>) -> Chronos {
    parse_date_with(input, &Context::default(), &ParseOptions::default())
}

/// Parse `input` with the provided `context`/`options`.
///
/// Use this when you want deterministic defaults by supplying a reference
/// time. Never fails: check [`Chronos::is_valid`] on the result.
pub fn parse_date_with(input: impl Into<DateInput>, context: &Context, options: &ParseOptions) -> Chronos {
    parser::parse(input.into(), context, options)
}

/// Render `value` with `pattern` (or the default pattern).
pub fn format_date(value: &Chronos, pattern: Option<&str>, options: &FormatOptions) -> String {
    let mut value = match options.locale.as_deref() {
        Some(id) => value.with_locale(id),
        None => value.clone(),
    };
    if options.utc {
        value = value.utc();
    }
    if let Some(offset) = options.offset {
        value = value.with_zone(Zone::Fixed(offset));
    }
    value.format(pattern)
}

/// `value` moved forward by `amount` `grain`s. With `utc`, calendar units
/// follow the UTC calendar rather than the value's own zone.
pub fn add(value: &Chronos, amount: f64, grain: Grain, utc: bool) -> Chronos {
    if utc { value.utc().add(amount, grain).with_zone(value.zone()) } else { value.add(amount, grain) }
}

pub fn subtract(value: &Chronos, amount: f64, grain: Grain, utc: bool) -> Chronos {
    add(value, -amount, grain, utc)
}

/// `a - b` in `grain`s; truncated toward zero unless `exact`.
pub fn diff(a: &Chronos, b: &Chronos, grain: Grain, exact: bool) -> Option<f64> {
    a.diff(b, grain, exact)
}

pub fn create_duration(input: impl Into<DurationInput>) -> Duration {
    Duration::new(input)
}

impl Chronos {
    /// The context's reference time in the host's zone.
    pub fn now(context: &Context) -> Chronos {
        Chronos::from_instant(context.reference_time, Zone::Local)
    }

    /// `"3 days ago"`, `"in an hour"`, relative to the context's now.
    pub fn from_now(&self, context: &Context, without_suffix: bool) -> String {
        self.from(&Chronos::now(context), without_suffix)
    }

    pub fn to_now(&self, context: &Context, without_suffix: bool) -> String {
        self.to(&Chronos::now(context), without_suffix)
    }
}
