//! Table-driven locale data and the process-wide locale registry.
//!
//! A [`Locale`] is plain data plus a handful of `fn` pointers for the parts
//! that cannot be expressed as a table (ordinals, plural-aware relative-time
//! phrases, digit transliteration). Locales are built once and shared behind
//! `Arc`; the regexes used to *parse* names are compiled lazily on first use
//! and then cached on the locale itself.
//!
//! ```text
//! builtins (en, en-gb, de, ru, ar) ──┐
//!                                     ├─▶ registry (RwLock<HashMap<id, Arc<Locale>>>)
//! define_locale(id, LocaleDef) ───────┘        │
//!        └─ merged onto its parent (default "en")
//!                                              ▼
//!                            get_locale / resolve_locale / list_locales
//! ```
//!
//! Locale ids are case-insensitive and `_` is treated as `-`. Lookups fall
//! back from `xx-yy` to `xx`.

#[path = "locale/ar.rs"]
mod ar;
#[path = "locale/de.rs"]
mod de;
#[path = "locale/en.rs"]
mod en;
#[path = "locale/registry.rs"]
mod registry;
#[path = "locale/ru.rs"]
mod ru;

pub use registry::{define_locale, get_locale, global_locale, list_locales, set_global_locale};
pub(crate) use registry::resolve_locale;

use crate::Chronos;
use crate::error::ChronosError;
use once_cell::sync::OnceCell;
use regex::Regex;

/// Renders an ordinal for a number; the second argument is the format token
/// family asking (`"M"`, `"D"`, `"DDD"`, `"d"`, `"w"`, `"W"`, `"Q"`).
pub type OrdinalFn = fn(i64, &str) -> String;
/// Meridiem text for `(hour, minute, lowercase)`.
pub type MeridiemFn = fn(u32, u32, bool) -> String;
pub type IsPmFn = fn(&str) -> bool;
/// Relative-time phrase for `(number, without_suffix, key, is_future)`.
pub type RelativeFn = fn(i64, bool, RelativeKey, bool) -> String;
pub type WrapFn = fn(&str) -> String;
pub type TransformFn = fn(&str) -> String;
/// Picks a calendar format for `(value, reference)`.
pub type CalendarFn = fn(&Chronos, &Chronos) -> String;

/// Keys of the relative-time phrase table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelativeKey {
    FewSeconds,
    Seconds,
    Minute,
    Minutes,
    Hour,
    Hours,
    Day,
    Days,
    Week,
    Weeks,
    Month,
    Months,
    Year,
    Years,
}

/// A relative-time phrase: either a template with `%d` for the number, or a
/// function for languages where the wording depends on the number.
#[derive(Debug, Clone)]
pub enum Phrase {
    Literal(String),
    Computed(RelativeFn),
}

impl Phrase {
    pub fn render(&self, number: i64, without_suffix: bool, key: RelativeKey, is_future: bool) -> String {
        match self {
            Phrase::Literal(template) => template.replacen("%d", &number.to_string(), 1),
            Phrase::Computed(f) => f(number, without_suffix, key, is_future),
        }
    }
}

/// The past/future wrapper around a relative phrase; templates use `%s`.
#[derive(Debug, Clone)]
pub enum WrapPhrase {
    Literal(String),
    Computed(WrapFn),
}

impl WrapPhrase {
    pub fn wrap(&self, inner: &str) -> String {
        match self {
            WrapPhrase::Literal(template) => template.replacen("%s", inner, 1),
            WrapPhrase::Computed(f) => f(inner),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RelativeTime {
    pub future: WrapPhrase,
    pub past: WrapPhrase,
    pub few_seconds: Phrase,
    pub seconds: Phrase,
    pub minute: Phrase,
    pub minutes: Phrase,
    pub hour: Phrase,
    pub hours: Phrase,
    pub day: Phrase,
    pub days: Phrase,
    pub week: Phrase,
    pub weeks: Phrase,
    pub month: Phrase,
    pub months: Phrase,
    pub year: Phrase,
    pub years: Phrase,
}

impl RelativeTime {
    pub fn phrase(&self, key: RelativeKey) -> &Phrase {
        match key {
            RelativeKey::FewSeconds => &self.few_seconds,
            RelativeKey::Seconds => &self.seconds,
            RelativeKey::Minute => &self.minute,
            RelativeKey::Minutes => &self.minutes,
            RelativeKey::Hour => &self.hour,
            RelativeKey::Hours => &self.hours,
            RelativeKey::Day => &self.day,
            RelativeKey::Days => &self.days,
            RelativeKey::Week => &self.week,
            RelativeKey::Weeks => &self.weeks,
            RelativeKey::Month => &self.month,
            RelativeKey::Months => &self.months,
            RelativeKey::Year => &self.year,
            RelativeKey::Years => &self.years,
        }
    }
}

#[derive(Debug, Clone)]
pub enum CalendarPhrase {
    Literal(String),
    Computed(CalendarFn),
}

#[derive(Debug, Clone)]
pub struct CalendarPhrases {
    pub same_day: CalendarPhrase,
    pub next_day: CalendarPhrase,
    pub next_week: CalendarPhrase,
    pub last_day: CalendarPhrase,
    pub last_week: CalendarPhrase,
    pub same_else: CalendarPhrase,
}

/// Composite format tokens (`LT`, `LTS`, `L`, `LL`, `LLL`, `LLLL`).
#[derive(Debug, Clone)]
pub struct LongDateFormat {
    pub lt: String,
    pub lts: String,
    pub l: String,
    pub ll: String,
    pub lll: String,
    pub llll: String,
}

impl LongDateFormat {
    /// Expansion for a composite token. The lowercase forms `l`..`llll` are
    /// the uppercase ones with `MMMM`, `MM`, `DD` and `dddd` shortened by one
    /// letter.
    pub fn get(&self, key: &str) -> Option<String> {
        let upper = match key {
            "LT" => return Some(self.lt.clone()),
            "LTS" => return Some(self.lts.clone()),
            "L" => return Some(self.l.clone()),
            "LL" => return Some(self.ll.clone()),
            "LLL" => return Some(self.lll.clone()),
            "LLLL" => return Some(self.llll.clone()),
            "l" => &self.l,
            "ll" => &self.ll,
            "lll" => &self.lll,
            "llll" => &self.llll,
            _ => return None,
        };
        let tokenizer = crate::format::formatting_tokens();
        let shortened = tokenizer
            .find_iter(upper)
            .map(|m| match m.as_str() {
                tok @ ("MMMM" | "MM" | "DD" | "dddd") => &tok[1..],
                tok => tok,
            })
            .collect::<String>();
        Some(shortened)
    }
}

/// A name table that is either a single list, or distinct lists for names
/// used inside a date ("format", e.g. Russian genitive month names) and on
/// their own ("standalone").
#[derive(Debug, Clone)]
pub enum NameTable {
    Plain(Vec<String>),
    Variants { format: Vec<String>, standalone: Vec<String>, is_format: Option<Regex> },
}

impl NameTable {
    pub fn plain(names: &str) -> Self {
        NameTable::Plain(split_names(names))
    }

    pub fn variants(format: &str, standalone: &str, is_format: Option<&'static Regex>) -> Self {
        NameTable::Variants {
            format: split_names(format),
            standalone: split_names(standalone),
            is_format: is_format.cloned(),
        }
    }

    /// The name at `index`, choosing the format or standalone list by
    /// testing the full `pattern` being rendered against the table's
    /// detector (or `default_is_format` when the table has none).
    pub fn get(&self, index: usize, pattern: &str, default_is_format: Option<&Regex>) -> &str {
        let list = match self {
            NameTable::Plain(names) => names,
            NameTable::Variants { format, standalone, is_format } => {
                let detector = is_format.as_ref().or(default_is_format);
                if detector.is_some_and(|re| re.is_match(pattern)) { format } else { standalone }
            }
        };
        list.get(index).map(String::as_str).unwrap_or("")
    }

    /// Every spelling of the name at `index`.
    pub fn forms(&self, index: usize) -> Vec<&str> {
        match self {
            NameTable::Plain(names) => names.get(index).map(String::as_str).into_iter().collect(),
            NameTable::Variants { format, standalone, .. } => {
                format.get(index).into_iter().chain(standalone.get(index)).map(String::as_str).collect()
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            NameTable::Plain(names) => names.len(),
            NameTable::Variants { format, standalone, .. } => format.len().min(standalone.len()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn split_names(names: &str) -> Vec<String> {
    names.split('_').map(str::to_string).collect()
}

/// First day of the week (`dow`, Sunday = 0) and the day of January that
/// anchors week 1 (`doy`, expressed as `7 + dow - janX`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekRule {
    pub dow: u32,
    pub doy: u32,
}

impl WeekRule {
    pub const ISO: WeekRule = WeekRule { dow: 1, doy: 4 };
}

#[derive(Debug, Default, Clone)]
struct ParseRegexes {
    months: OnceCell<Regex>,
    months_strict: OnceCell<Regex>,
    months_short_strict: OnceCell<Regex>,
    weekdays: OnceCell<Regex>,
    weekdays_strict: OnceCell<Regex>,
    weekdays_short_strict: OnceCell<Regex>,
    weekdays_min_strict: OnceCell<Regex>,
    meridiem: OnceCell<Regex>,
    ordinal_strict: OnceCell<Regex>,
    ordinal_lenient: OnceCell<Regex>,
}

#[derive(Debug, Clone)]
pub struct Locale {
    pub abbr: String,
    pub parent: Option<String>,
    pub months: NameTable,
    pub months_short: NameTable,
    pub weekdays: NameTable,
    pub weekdays_short: NameTable,
    pub weekdays_min: NameTable,
    pub long_date_format: LongDateFormat,
    pub calendar: CalendarPhrases,
    pub relative_time: RelativeTime,
    pub ordinal: OrdinalFn,
    /// Regex source matching an ordinal day of month, e.g. `\d{1,2}(th|st|nd|rd)`.
    pub day_of_month_ordinal_parse: String,
    pub meridiem: MeridiemFn,
    /// Regex source matching meridiem text.
    pub meridiem_parse: String,
    pub is_pm: IsPmFn,
    pub week: WeekRule,
    pub invalid_date: String,
    pub preparse: TransformFn,
    pub postformat: TransformFn,
    regexes: ParseRegexes,
}

/// Overrides applied on top of a parent locale by [`define_locale`].
#[derive(Debug, Clone, Default)]
pub struct LocaleDef {
    pub parent: Option<String>,
    pub months: Option<NameTable>,
    pub months_short: Option<NameTable>,
    pub weekdays: Option<NameTable>,
    pub weekdays_short: Option<NameTable>,
    pub weekdays_min: Option<NameTable>,
    pub long_date_format: Option<LongDateFormat>,
    pub calendar: Option<CalendarPhrases>,
    pub relative_time: Option<RelativeTime>,
    pub ordinal: Option<OrdinalFn>,
    pub day_of_month_ordinal_parse: Option<String>,
    pub meridiem: Option<MeridiemFn>,
    pub meridiem_parse: Option<String>,
    pub is_pm: Option<IsPmFn>,
    pub week: Option<WeekRule>,
    pub invalid_date: Option<String>,
    pub preparse: Option<TransformFn>,
    pub postformat: Option<TransformFn>,
}

pub(crate) fn identity(text: &str) -> String {
    text.to_string()
}

impl Locale {
    /// Build a locale by layering `def` over `parent`.
    pub(crate) fn derive(abbr: &str, parent: &Locale, def: LocaleDef) -> Result<Locale, ChronosError> {
        let invalid = |reason: String| ChronosError::InvalidLocale { id: abbr.to_string(), reason };

        let locale = Locale {
            abbr: abbr.to_string(),
            parent: Some(parent.abbr.clone()),
            months: def.months.unwrap_or_else(|| parent.months.clone()),
            months_short: def.months_short.unwrap_or_else(|| parent.months_short.clone()),
            weekdays: def.weekdays.unwrap_or_else(|| parent.weekdays.clone()),
            weekdays_short: def.weekdays_short.unwrap_or_else(|| parent.weekdays_short.clone()),
            weekdays_min: def.weekdays_min.unwrap_or_else(|| parent.weekdays_min.clone()),
            long_date_format: def.long_date_format.unwrap_or_else(|| parent.long_date_format.clone()),
            calendar: def.calendar.unwrap_or_else(|| parent.calendar.clone()),
            relative_time: def.relative_time.unwrap_or_else(|| parent.relative_time.clone()),
            ordinal: def.ordinal.unwrap_or(parent.ordinal),
            day_of_month_ordinal_parse: def
                .day_of_month_ordinal_parse
                .unwrap_or_else(|| parent.day_of_month_ordinal_parse.clone()),
            meridiem: def.meridiem.unwrap_or(parent.meridiem),
            meridiem_parse: def.meridiem_parse.unwrap_or_else(|| parent.meridiem_parse.clone()),
            is_pm: def.is_pm.unwrap_or(parent.is_pm),
            week: def.week.unwrap_or(parent.week),
            invalid_date: def.invalid_date.unwrap_or_else(|| parent.invalid_date.clone()),
            preparse: def.preparse.unwrap_or(parent.preparse),
            postformat: def.postformat.unwrap_or(parent.postformat),
            regexes: ParseRegexes::default(),
        };

        if locale.months.len() != 12 || locale.months_short.len() != 12 {
            return Err(invalid("month tables need 12 names".to_string()));
        }
        if locale.weekdays.len() != 7 || locale.weekdays_short.len() != 7 || locale.weekdays_min.len() != 7 {
            return Err(invalid("weekday tables need 7 names".to_string()));
        }
        if locale.week.dow > 6 {
            return Err(invalid(format!("first day of week {} is not in 0..=6", locale.week.dow)));
        }
        for source in [&locale.day_of_month_ordinal_parse, &locale.meridiem_parse] {
            Regex::new(source).map_err(|err| invalid(format!("bad parse pattern {source:?}: {err}")))?;
        }
        Ok(locale)
    }

    pub fn first_day_of_week(&self) -> u32 {
        self.week.dow
    }

    pub fn month_name(&self, month: usize, pattern: &str) -> &str {
        self.months.get(month, pattern, Some(crate::regex!(r"D[oD]?(\[[^\[\]]*\]|\s)+MMMM?")))
    }

    pub fn month_short_name(&self, month: usize, pattern: &str) -> &str {
        self.months_short.get(month, pattern, Some(crate::regex!(r"D[oD]?(\[[^\[\]]*\]|\s)+MMMM?")))
    }

    pub fn weekday_name(&self, day: usize, pattern: &str) -> &str {
        self.weekdays.get(day, pattern, None)
    }

    pub fn weekday_short_name(&self, day: usize) -> &str {
        self.weekdays_short.get(day, "", None)
    }

    pub fn weekday_min_name(&self, day: usize) -> &str {
        self.weekdays_min.get(day, "", None)
    }

    /// Short weekday names rotated so the locale's first day of week leads.
    pub fn shifted_weekdays_short(&self) -> Vec<String> {
        let dow = self.week.dow as usize;
        (0..7).map(|i| self.weekday_short_name((i + dow) % 7).to_string()).collect()
    }

    pub fn ordinal(&self, number: i64, token: &str) -> String {
        (self.ordinal)(number, token)
    }

    pub fn meridiem(&self, hour: u32, minute: u32, lower: bool) -> String {
        (self.meridiem)(hour, minute, lower)
    }

    pub fn is_pm(&self, text: &str) -> bool {
        (self.is_pm)(text)
    }

    pub fn preparse(&self, text: &str) -> String {
        (self.preparse)(text)
    }

    pub fn postformat(&self, text: &str) -> String {
        (self.postformat)(text)
    }

    /// Relative phrase for `number` of `key`, e.g. `"5 minutes"`.
    pub fn relative_time(&self, number: i64, without_suffix: bool, key: RelativeKey, is_future: bool) -> String {
        self.relative_time.phrase(key).render(number, without_suffix, key, is_future)
    }

    /// Wrap a relative phrase as past or future: `"in %s"` / `"%s ago"`.
    pub fn past_future(&self, future: bool, output: &str) -> String {
        if future { self.relative_time.future.wrap(output) } else { self.relative_time.past.wrap(output) }
    }

    // --- Parsing ------------------------------------------------------------

    pub(crate) fn months_parse_regex(&self, token: &str, strict: bool) -> &Regex {
        match (strict, token) {
            (true, "MMMM") => self.regexes.months_strict.get_or_init(|| {
                alternation_regex((0..12).flat_map(|i| self.months.forms(i)).collect(), true)
            }),
            (true, _) => self.regexes.months_short_strict.get_or_init(|| {
                alternation_regex((0..12).flat_map(|i| self.months_short.forms(i)).collect(), true)
            }),
            (false, _) => self.regexes.months.get_or_init(|| {
                alternation_regex(
                    (0..12).flat_map(|i| self.months.forms(i).into_iter().chain(self.months_short.forms(i))).collect(),
                    true,
                )
            }),
        }
    }

    pub(crate) fn weekdays_parse_regex(&self, token: &str, strict: bool) -> &Regex {
        match (strict, token) {
            (true, "dddd") => self.regexes.weekdays_strict.get_or_init(|| {
                alternation_regex((0..7).flat_map(|i| self.weekdays.forms(i)).collect(), true)
            }),
            (true, "ddd") => self.regexes.weekdays_short_strict.get_or_init(|| {
                alternation_regex((0..7).flat_map(|i| self.weekdays_short.forms(i)).collect(), true)
            }),
            (true, _) => self.regexes.weekdays_min_strict.get_or_init(|| {
                alternation_regex((0..7).flat_map(|i| self.weekdays_min.forms(i)).collect(), true)
            }),
            (false, _) => self.regexes.weekdays.get_or_init(|| {
                alternation_regex(
                    (0..7)
                        .flat_map(|i| {
                            let mut forms = self.weekdays.forms(i);
                            forms.extend(self.weekdays_short.forms(i));
                            forms.extend(self.weekdays_min.forms(i));
                            forms
                        })
                        .collect(),
                    true,
                )
            }),
        }
    }

    pub(crate) fn meridiem_parse_regex(&self) -> &Regex {
        self.regexes.meridiem.get_or_init(|| case_insensitive(&self.meridiem_parse))
    }

    pub(crate) fn ordinal_parse_regex(&self, strict: bool) -> &Regex {
        if strict {
            self.regexes.ordinal_strict.get_or_init(|| case_insensitive(&self.day_of_month_ordinal_parse))
        } else {
            self.regexes
                .ordinal_lenient
                .get_or_init(|| case_insensitive(&format!(r"{}|\d{{1,2}}", self.day_of_month_ordinal_parse)))
        }
    }

    /// Month index for parsed month-name text. Strict `MMMM`/`MMM` only
    /// accept long/short names respectively.
    pub(crate) fn month_index(&self, text: &str, token: &str, strict: bool) -> Option<usize> {
        let needle = text.to_lowercase();
        let hit = |forms: Vec<&str>| forms.iter().any(|f| f.to_lowercase() == needle);
        (0..12).find(|&i| match (strict, token) {
            (true, "MMMM") => hit(self.months.forms(i)),
            (true, _) => hit(self.months_short.forms(i)),
            (false, _) => hit(self.months.forms(i)) || hit(self.months_short.forms(i)),
        })
    }

    pub(crate) fn weekday_index(&self, text: &str, token: &str, strict: bool) -> Option<usize> {
        let needle = text.to_lowercase();
        let hit = |forms: Vec<&str>| forms.iter().any(|f| f.to_lowercase() == needle);
        (0..7).find(|&i| match (strict, token) {
            (true, "dddd") => hit(self.weekdays.forms(i)),
            (true, "ddd") => hit(self.weekdays_short.forms(i)),
            (true, _) => hit(self.weekdays_min.forms(i)),
            (false, _) => {
                hit(self.weekdays.forms(i)) || hit(self.weekdays_short.forms(i)) || hit(self.weekdays_min.forms(i))
            }
        })
    }
}

/// `^(?:a|b|c)` over `names`, longest first so that "May" never shadows
/// "Mayo", case-insensitive.
fn alternation_regex(mut names: Vec<&str>, anchored: bool) -> Regex {
    names.retain(|n| !n.is_empty());
    names.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
    names.dedup();
    let body = names.iter().map(|n| regex::escape(n)).collect::<Vec<_>>().join("|");
    let source = if anchored { format!("(?i)^(?:{body})") } else { format!("(?i)(?:{body})") };
    Regex::new(&source).unwrap_or_else(|_| never_matches())
}

fn case_insensitive(source: &str) -> Regex {
    Regex::new(&format!("(?i){source}")).unwrap_or_else(|_| never_matches())
}

fn never_matches() -> Regex {
    crate::regex!(r"\b\B").clone()
}
