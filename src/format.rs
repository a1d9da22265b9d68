//! Pattern-based formatting.
//!
//! A pattern such as `"dddd, MMMM Do YYYY [at] LT"` goes through two steps:
//!
//! ```text
//! pattern ── expand_format (LT, LTS, L..LLLL, l..llll → locale patterns)
//!            │
//!            ▼
//!          compile (cache.rs): split into literal text and token renderers
//!            │
//!            ▼
//!          render against a RenderContext ── locale.postformat ──▶ String
//! ```
//!
//! `[...]` in a pattern is literal text; `\x` escapes a single character.
//! Unknown characters pass through unchanged.

#[path = "format/cache.rs"]
mod cache;
#[path = "format/relative.rs"]
mod relative;
#[path = "format/tokens.rs"]
mod tokens;

pub use relative::CalendarKey;
pub(crate) use tokens::is_format_token;

use crate::locale::Locale;
use crate::value::Chronos;
use crate::zone::Zone;
use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;

/// Pattern used when none is given.
pub const DEFAULT_FORMAT: &str = "YYYY-MM-DDTHH:mm:ssZ";
/// Pattern used when none is given and the value is in UTC.
pub const DEFAULT_FORMAT_UTC: &str = "YYYY-MM-DDTHH:mm:ss[Z]";

/// Splits a pattern into bracketed literals, escaped characters, tokens
/// and single characters.
pub(crate) fn formatting_tokens() -> &'static Regex {
    crate::regex!(
        r"(?s)(\[[^\[]*\])|(\\)?([Hh]mm(ss)?|Mo|MM?M?M?|Do|DDDo|DD?D?D?|ddd?d?|do?|w[o|w]?|W[o|W]?|Qo?|YYYYYY|YYYYY|YYYY|YY|gg(ggg?)?|GG(GGG?)?|e|E|a|A|hh?|HH?|kk?|mm?|ss?|S{1,9}|x|X|zz?|ZZ?|.)"
    )
}

/// Replace the locale's composite tokens with the patterns they stand for.
/// Composite patterns may themselves contain composites (`LLL` in terms of
/// `LT`), so expansion repeats a few times until nothing changes.
pub fn expand_format(pattern: &str, locale: &Locale) -> String {
    let composite = crate::regex!(r"(\[[^\[]*\])|(\\)?(LTS|LT|LL?L?L?|l{1,4})");
    let mut expanded = pattern.to_string();
    for _ in 0..6 {
        let next = composite
            .replace_all(&expanded, |caps: &regex::Captures| {
                let whole = &caps[0];
                locale.long_date_format.get(whole).unwrap_or_else(|| whole.to_string())
            })
            .into_owned();
        if next == expanded {
            break;
        }
        expanded = next;
    }
    expanded
}

/// Text of a pattern piece that is not a token: brackets are stripped from
/// `[...]`, backslashes from anything else.
pub(crate) fn literal_text(piece: &str) -> String {
    if piece.starts_with('[') && piece.chars().count() > 1 {
        let inner = piece.strip_prefix('[').unwrap_or(piece);
        inner.strip_suffix(']').unwrap_or(inner).to_string()
    } else {
        piece.replace('\\', "")
    }
}

/// Everything a token renderer may look at.
pub(crate) struct RenderContext<'a> {
    pub instant: DateTime<Utc>,
    pub civil: NaiveDateTime,
    /// Offset from UTC in minutes.
    pub offset: i32,
    pub zone: Zone,
    pub locale: &'a Locale,
    /// The expanded pattern; some locales pick name forms by context.
    pub pattern: &'a str,
}

impl Chronos {
    /// Render with `pattern`, or with [`DEFAULT_FORMAT`] /
    /// [`DEFAULT_FORMAT_UTC`] when `None`. Invalid values render as the
    /// locale's invalid-date phrase.
    pub fn format(&self, pattern: Option<&str>) -> String {
        let locale = self.locale();
        let pattern = pattern.unwrap_or(if self.is_utc() { DEFAULT_FORMAT_UTC } else { DEFAULT_FORMAT });
        let output = match format_value(self, pattern) {
            Some(text) => text,
            None => return locale.invalid_date.clone(),
        };
        locale.postformat(&output)
    }

    /// ISO 8601 in UTC with milliseconds, e.g. `2024-01-15T00:00:00.000Z`.
    /// `None` for invalid values or years outside 0..=9999 written with
    /// a six-digit signed year.
    pub fn to_iso_string(&self) -> Option<String> {
        let utc = self.utc();
        let year = utc.year()?;
        let pattern = if (0..=9999).contains(&year) {
            "YYYY-MM-DD[T]HH:mm:ss.SSS[Z]"
        } else {
            "YYYYYY-MM-DD[T]HH:mm:ss.SSS[Z]"
        };
        format_value(&utc, pattern)
    }
}

/// Render `value` with `pattern`, without postformatting. `None` when the
/// value is invalid.
pub(crate) fn format_value(value: &Chronos, pattern: &str) -> Option<String> {
    let instant = value.instant()?;
    let zone = value.zone();
    let locale = value.locale();
    let expanded = expand_format(pattern, locale);
    let compiled = cache::compiled(&expanded);
    let ctx = RenderContext {
        instant,
        civil: zone.to_civil(&instant),
        offset: zone.offset_minutes(&instant),
        zone,
        locale,
        pattern: &expanded,
    };
    Some(compiled.render(&ctx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::get_locale;
    use chrono::{TimeZone, Utc};

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> Chronos {
        Chronos::from_instant(Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap(), Zone::Utc)
            .with_locale_data(get_locale("en").unwrap())
    }

    #[test]
    fn formats_a_plain_date() {
        assert_eq!(utc(2024, 1, 15, 0, 0, 0).format(Some("YYYY-MM-DD")), "2024-01-15");
    }

    #[test]
    fn default_pattern_depends_on_zone() {
        let value = utc(2024, 1, 15, 10, 30, 0);
        assert_eq!(value.format(None), "2024-01-15T10:30:00Z");
        assert_eq!(value.with_zone(Zone::Fixed(150)).format(None), "2024-01-15T13:00:00+02:30");
    }

    #[test]
    fn literals_and_escapes() {
        let value = utc(2024, 3, 5, 14, 7, 9);
        assert_eq!(value.format(Some("[Today is] dddd")), "Today is Tuesday");
        assert_eq!(value.format(Some(r"\Y YYYY")), "Y 2024");
        assert_eq!(value.format(Some("h:mm:ss a")), "2:07:09 pm");
        assert_eq!(value.format(Some("[[x]] Do")), "[x] 5th");
    }

    #[test]
    fn composite_tokens_expand_through_the_locale() {
        let value = utc(2024, 9, 4, 20, 5, 0);
        assert_eq!(value.format(Some("LLLL")), "Wednesday, September 4, 2024 8:05 PM");
        assert_eq!(value.format(Some("llll")), "Wed, Sep 4, 2024 8:05 PM");
        assert_eq!(value.format(Some("L")), "09/04/2024");
        let de = value.with_locale("de");
        assert_eq!(de.format(Some("LL")), "4. September 2024");
    }

    #[test]
    fn expansion_leaves_brackets_alone() {
        let en = get_locale("en").unwrap();
        assert_eq!(expand_format("[LT] LT", &en), "[LT] h:mm A");
        assert_eq!(expand_format(r"\LT", &en), r"\LT");
    }

    #[test]
    fn invalid_values_print_the_locale_phrase() {
        let invalid = Chronos::invalidated();
        assert_eq!(invalid.format(Some("YYYY")), "Invalid date");
        let de = invalid.with_locale("de");
        assert_eq!(de.format(None), "Ungültiges Datum");
    }

    #[test]
    fn iso_string_uses_utc() {
        let value = utc(2024, 1, 15, 10, 0, 0).with_zone(Zone::Fixed(-300));
        assert_eq!(value.to_iso_string().as_deref(), Some("2024-01-15T10:00:00.000Z"));
        assert_eq!(Chronos::invalidated().to_iso_string(), None);
    }
}
