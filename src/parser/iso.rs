//! Recognizers for the two textual standards tried before any pattern:
//! ISO 8601 and RFC 2822.
//!
//! ISO input is matched against a ranked table of date forms and time
//! forms. The first matching entries are joined into an ordinary pattern
//! (`"YYYY-MM-DD" + "T" + "HH:mm:ss" + "Z"`) and parsed like any other, so
//! ISO values go through the same overflow and validity rules.
//!
//! RFC 2822 input is normalized (comments and folding whitespace removed),
//! matched as a whole and built directly.

use super::config::{ParseConfig, Resolution};
use super::from_array::civil_from_parts;
use super::tokens::parse_with_pattern;
use super::validate;
use crate::flags::ParseFlag;
use chrono::{Datelike, Duration, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// A recognizable form and the pattern that parses it.
struct IsoForm {
    pattern: &'static str,
    regex: Regex,
    /// Forms that do not name a day (`2024-05`, `2024-W05`) cannot carry a
    /// time.
    allows_time: bool,
}

fn forms(table: &[(&'static str, &str, bool)]) -> Vec<IsoForm> {
    table
        .iter()
        .filter_map(|&(pattern, source, allows_time)| {
            let regex = Regex::new(&format!("^(?:{source})$")).ok()?;
            Some(IsoForm { pattern, regex, allows_time })
        })
        .collect()
}

static ISO_DATES: Lazy<Vec<IsoForm>> = Lazy::new(|| {
    forms(&[
        ("YYYYYY-MM-DD", r"[+-]\d{6}-\d\d-\d\d", true),
        ("YYYY-MM-DD", r"\d{4}-\d\d-\d\d", true),
        ("GGGG-[W]WW-E", r"\d{4}-W\d\d-\d", true),
        ("GGGG-[W]WW", r"\d{4}-W\d\d", false),
        ("YYYY-DDD", r"\d{4}-\d{3}", true),
        ("YYYY-MM", r"\d{4}-\d\d", false),
        ("YYYYYYMMDD", r"[+-]\d{10}", true),
        ("YYYYMMDD", r"\d{8}", true),
        ("GGGG[W]WWE", r"\d{4}W\d{3}", true),
        ("GGGG[W]WW", r"\d{4}W\d{2}", false),
        ("YYYYDDD", r"\d{7}", true),
        ("YYYYMM", r"\d{6}", false),
        ("YYYY", r"\d{4}", false),
    ])
});

static ISO_TIMES: Lazy<Vec<IsoForm>> = Lazy::new(|| {
    forms(&[
        ("HH:mm:ss.SSSS", r"\d\d:\d\d:\d\d\.\d+", true),
        ("HH:mm:ss,SSSS", r"\d\d:\d\d:\d\d,\d+", true),
        ("HH:mm:ss", r"\d\d:\d\d:\d\d", true),
        ("HH:mm", r"\d\d:\d\d", true),
        ("HHmmss.SSSS", r"\d\d\d\d\d\d\.\d+", true),
        ("HHmmss,SSSS", r"\d\d\d\d\d\d,\d+", true),
        ("HHmmss", r"\d\d\d\d\d\d", true),
        ("HHmm", r"\d\d\d\d", true),
        ("HH", r"\d\d", true),
    ])
});

/// Try `config.input` as ISO 8601. Returns `false` when the text is not in
/// an ISO form, leaving `config` untouched.
pub(crate) fn parse_iso(config: &mut ParseConfig) -> bool {
    let extended = crate::regex!(
        r"^\s*((?:[+-]\d{6}|\d{4})-(?:\d\d-\d\d|W\d\d-\d|W\d\d|\d\d\d|\d\d))(?:(T| )(\d\d(?::\d\d(?::\d\d(?:[.,]\d+)?)?)?)([+-]\d\d(?::?\d\d)?|\s*Z)?)?$"
    );
    let basic = crate::regex!(
        r"^\s*((?:[+-]\d{6}|\d{4})(?:\d\d\d\d|W\d\d\d|W\d\d|\d\d\d|\d\d|))(?:(T| )(\d\d(?:\d\d(?:\d\d(?:[.,]\d+)?)?)?)([+-]\d\d(?::?\d\d)?|\s*Z)?)?$"
    );
    let input = config.input.clone();
    let Some(caps) = extended.captures(&input).or_else(|| basic.captures(&input)) else {
        return false;
    };

    let date_text = caps.get(1).map_or("", |m| m.as_str());
    let Some(date) = ISO_DATES.iter().find(|form| form.regex.is_match(date_text)) else {
        return false;
    };

    let mut pattern = date.pattern.to_string();
    if let Some(time_text) = caps.get(3) {
        let Some(time) = ISO_TIMES.iter().find(|form| form.regex.is_match(time_text.as_str())) else {
            return false;
        };
        if !date.allows_time {
            return false;
        }
        let separator = caps.get(2).map_or(" ", |m| m.as_str());
        pattern.push_str(separator);
        pattern.push_str(time.pattern);
    }
    if let Some(zone) = caps.get(4) {
        if !crate::regex!(r"^(?:Z|[+-]\d\d(?::?\d\d)?)$").is_match(zone.as_str().trim()) {
            return false;
        }
        pattern.push('Z');
    }

    tracing::debug!(input = %input, pattern = %pattern, "recognized ISO 8601");
    parse_with_pattern(config, &pattern);
    config.flags.insert(ParseFlag::ISO);
    true
}

/// Try `config.input` as an RFC 2822 date. Returns `false` when it does not
/// have that shape; a shape match with a wrong weekday is handled (and
/// invalid).
pub(crate) fn parse_rfc_2822(config: &mut ParseConfig) -> bool {
    let cleaned = crate::regex!(r"\([^)]*\)|[\n\t]").replace_all(&config.input, " ");
    let cleaned = crate::regex!(r"(\s\s+)").replace_all(&cleaned, " ");
    let cleaned = cleaned.trim().to_string();
    let rfc = crate::regex!(
        r"^(?:(Mon|Tue|Wed|Thu|Fri|Sat|Sun),?\s)?(\d{1,2})\s(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s(\d{2,4})\s(\d\d):(\d\d)(?::(\d\d))?\s(?:(UT|GMT|[ECMP][SD]T)|([Zz])|([+-]\d{4}))$"
    );
    let Some(caps) = rfc.captures(&cleaned) else {
        return false;
    };
    let text = |i: usize| caps.get(i).map_or("", |m| m.as_str());
    let number = |i: usize| text(i).parse::<i64>().ok();

    let Some(month) = MONTHS.iter().position(|m| *m == text(3)) else {
        return false;
    };
    let (Some(raw_year), Some(day), Some(hour), Some(minute)) = (number(4), number(2), number(5), number(6)) else {
        return false;
    };
    let year = untruncate_year(raw_year, text(4).len());
    let second = number(7).unwrap_or(0);
    let parts = [year, month as i64, day, hour, minute, second, 0];

    if let Some(weekday) = caps.get(1) {
        let stated = WEEKDAYS.iter().position(|d| *d == weekday.as_str());
        let actual = civil_from_parts(&parts).map(|c| c.weekday().num_days_from_sunday() as usize);
        if stated != actual {
            tracing::debug!(input = %config.input, "RFC 2822 weekday does not match the date");
            config.invalidate(ParseFlag::WEEKDAY_MISMATCH);
            return true;
        }
    }

    let offset = zone_offset(text(8), text(9), text(10));
    for (slot, value) in config.parts.iter_mut().zip(parts) {
        *slot = Some(value);
    }
    config.flags.parsed_date_parts = [true, true, true, true, true, caps.get(7).is_some(), false];
    let instant = civil_from_parts(&parts)
        .map(|civil| Utc.from_utc_datetime(&civil))
        .and_then(|instant| instant.checked_sub_signed(Duration::minutes(i64::from(offset))));
    config.use_utc = true;
    config.tzm = Some(offset);
    config.resolution = match instant {
        Some(instant) => Resolution::At(instant),
        None => Resolution::Unrepresentable,
    };
    config.flags.insert(ParseFlag::RFC_2822);
    tracing::debug!(input = %config.input, offset, "recognized RFC 2822");
    validate::check_overflow(config);
    true
}

const MONTHS: [&str; 12] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];
const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Two-digit years up to 49 are the 2000s; other years below 1000 count
/// from 1900.
fn untruncate_year(year: i64, digits: usize) -> i64 {
    if digits <= 2 && year <= 49 {
        2000 + year
    } else if year <= 999 {
        1900 + year
    } else {
        year
    }
}

/// Minutes east of UTC for an obsolete zone name, a military `Z`, or a
/// `+hhmm` offset.
fn zone_offset(obsolete: &str, military: &str, numeric: &str) -> i32 {
    match obsolete {
        "UT" | "GMT" => return 0,
        "EDT" => return -4 * 60,
        "EST" | "CDT" => return -5 * 60,
        "CST" | "MDT" => return -6 * 60,
        "MST" | "PDT" => return -7 * 60,
        "PST" => return -8 * 60,
        _ => {}
    }
    if !military.is_empty() {
        return 0;
    }
    let value: i32 = numeric.parse().unwrap_or(0);
    let (hours, minutes) = (value / 100, value % 100);
    hours * 60 + minutes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::get_locale;
    use crate::units::Unit;

    fn config(input: &str) -> ParseConfig {
        let reference = Utc.with_ymd_and_hms(2013, 2, 12, 0, 0, 0).unwrap();
        ParseConfig::new(input.to_string(), get_locale("en").unwrap(), false, true, reference)
    }

    fn iso(input: &str) -> Option<ParseConfig> {
        let mut config = config(input);
        parse_iso(&mut config).then_some(config)
    }

    #[test]
    fn leap_day_is_valid() {
        let mut config = iso("2024-02-29").unwrap();
        assert!(config.is_valid());
        assert!(config.flags.contains(ParseFlag::ISO));
        assert_eq!(config.parts[..3], [Some(2024), Some(1), Some(29)]);
    }

    #[test]
    fn non_leap_day_overflows() {
        let mut config = iso("2023-02-29").unwrap();
        assert!(!config.is_valid());
        assert_eq!(config.flags.overflow, Some(Unit::Date));
    }

    #[test]
    fn iso_forms() {
        let ms = Duration::milliseconds;
        let cases = [
            ("2024-01-15T10:20:30.123Z", Utc.with_ymd_and_hms(2024, 1, 15, 10, 20, 30).unwrap() + ms(123)),
            ("2024-01-15 10:20", Utc.with_ymd_and_hms(2024, 1, 15, 10, 20, 0).unwrap()),
            ("2024-01-15T10:20:30+02:00", Utc.with_ymd_and_hms(2024, 1, 15, 8, 20, 30).unwrap()),
            ("20240115T102030-0130", Utc.with_ymd_and_hms(2024, 1, 15, 11, 50, 30).unwrap()),
            ("2024-W03-1", Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()),
            ("2024-015", Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()),
            ("2024-05", Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()),
            ("+002024-01-15", Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()),
            ("2024-01-15T24:00", Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()),
        ];
        for (input, expected) in cases {
            let config = iso(input).unwrap_or_else(|| panic!("{input} not recognized"));
            assert_eq!(config.instant(), Some(expected), "{input}");
        }
    }

    #[test]
    fn shapes_that_are_not_iso() {
        for input in ["2024-05T10:00", "15/01/2024", "2024-1-5", "2024-01-15T10:00+5"] {
            assert!(iso(input).is_none(), "{input}");
        }
    }

    #[test]
    fn rfc_2822_with_zone_names() {
        let mut c = config("Tue, 01 Nov 2016 01:23:45 UT");
        assert!(parse_rfc_2822(&mut c));
        assert_eq!(c.instant(), Some(Utc.with_ymd_and_hms(2016, 11, 1, 1, 23, 45).unwrap()));
        assert!(c.flags.contains(ParseFlag::RFC_2822));

        let mut c = config("Sun, 12 Apr 2015 05:06:07 -0500");
        assert!(parse_rfc_2822(&mut c));
        assert_eq!(c.instant(), Some(Utc.with_ymd_and_hms(2015, 4, 12, 10, 6, 7).unwrap()));

        let mut c = config("12 Apr 15 05:06 PST (comment)");
        assert!(parse_rfc_2822(&mut c));
        assert_eq!(c.instant(), Some(Utc.with_ymd_and_hms(2015, 4, 12, 13, 6, 0).unwrap()));
    }

    #[test]
    fn rfc_2822_weekday_mismatch_is_invalid() {
        let mut c = config("Mon, 01 Nov 2016 01:23:45 GMT");
        assert!(parse_rfc_2822(&mut c));
        assert!(c.flags.contains(ParseFlag::WEEKDAY_MISMATCH));
        assert!(!c.is_valid());
    }

    #[test]
    fn year_untruncation() {
        assert_eq!(untruncate_year(15, 2), 2015);
        assert_eq!(untruncate_year(75, 2), 1975);
        assert_eq!(untruncate_year(115, 3), 2015);
        assert_eq!(untruncate_year(2015, 4), 2015);
    }
}
