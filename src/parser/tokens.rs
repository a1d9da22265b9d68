//! Parsing against an explicit pattern such as `"DD.MM.YYYY HH:mm"`.
//!
//! The pattern is expanded and split with the same tokenizer the formatter
//! uses. Each piece is then looked for in what is left of the input:
//!
//! - a token with a parse regex matches the first place that regex matches
//!   (digits, locale names, offsets, ...);
//! - anything else must appear literally.
//!
//! Text skipped to reach a match, and text left at the end, is recorded as
//! unused input; tokens that found nothing are recorded as unused tokens.
//! Both count against the candidate's score and fail strict parsing.

use super::config::{DATE, HOUR, MILLISECOND, MINUTE, MONTH, ParseConfig, Resolution, SECOND, YEAR};
use super::{from_array, validate};
use crate::flags::ParseFlag;
use crate::format::{expand_format, formatting_tokens, is_format_token, literal_text};
use crate::locale::Locale;
use crate::predicates::to_int;
use chrono::{DateTime, Utc};
use regex::Regex;

enum Matcher<'a> {
    Regex(&'a Regex),
    Literal(String),
}

/// Parse `config.input` with `pattern`, resolve the components and check
/// them for overflow.
pub(crate) fn parse_with_pattern(config: &mut ParseConfig, pattern: &str) {
    let locale = config.locale.clone();
    let expanded = expand_format(pattern, &locale);
    let input = config.input.clone();
    let mut rest: &str = &input;
    let mut parsed_chars = 0usize;
    config.flags.insert(ParseFlag::EMPTY);

    for piece in formatting_tokens().find_iter(&expanded) {
        let token = piece.as_str();
        let found = match matcher(token, config.strict, &locale) {
            Matcher::Regex(re) => re.find(rest).map(|m| (m.start(), m.end())),
            Matcher::Literal(text) if text.is_empty() => None,
            Matcher::Literal(text) => rest.find(&text).map(|start| (start, start + text.len())),
        };
        let parsed = match found {
            Some((start, end)) if end > start => {
                let skipped = &rest[..start];
                if !skipped.is_empty() {
                    config.flags.unused_input.push(skipped.to_string());
                }
                let text = &rest[start..end];
                parsed_chars += text.chars().count();
                rest = &rest[end..];
                Some(text)
            }
            _ => None,
        };

        if is_format_token(token) {
            match parsed {
                Some(text) => {
                    config.flags.remove(ParseFlag::EMPTY);
                    apply_token(config, token, text);
                }
                None => config.flags.unused_tokens.push(token.to_string()),
            }
        } else if config.strict && parsed.is_none() {
            config.flags.unused_tokens.push(token.to_string());
        }
    }

    config.flags.chars_left_over = input.chars().count().saturating_sub(parsed_chars);
    if !rest.is_empty() {
        config.flags.unused_input.push(rest.to_string());
    }

    if config.parts[HOUR].is_some_and(|h| h > 0 && h <= 12) {
        config.flags.remove(ParseFlag::BIG_HOUR);
    }
    for (flag, part) in config.flags.parsed_date_parts.iter_mut().zip(config.parts.iter()) {
        *flag = part.is_some();
    }
    config.flags.meridiem = config.meridiem.clone();
    if let (Some(meridiem), Some(hour)) = (config.meridiem.as_deref(), config.parts[HOUR]) {
        let is_pm = locale.is_pm(meridiem);
        if is_pm && hour < 12 {
            config.parts[HOUR] = Some(hour + 12);
        } else if !is_pm && hour == 12 {
            config.parts[HOUR] = Some(0);
        }
    }
    tracing::trace!(
        input = %config.input,
        pattern = %expanded,
        left_over = config.flags.chars_left_over,
        unused_tokens = config.flags.unused_tokens.len(),
        "applied pattern"
    );

    from_array::resolve(config);
    validate::check_overflow(config);
}

/// How a pattern piece is found in the input.
fn matcher<'a>(token: &str, strict: bool, locale: &'a Locale) -> Matcher<'a> {
    let re: &'a Regex = match (token, strict) {
        ("MM" | "DD" | "ww" | "WW" | "HH" | "hh" | "kk" | "mm" | "ss" | "YY" | "gg" | "GG", true) => {
            crate::regex!(r"\d\d")
        }
        ("M" | "D" | "d" | "e" | "E" | "w" | "W" | "H" | "h" | "k" | "m" | "s", _)
        | ("MM" | "DD" | "ww" | "WW" | "HH" | "hh" | "kk" | "mm" | "ss" | "YY" | "gg" | "GG", false) => {
            crate::regex!(r"\d\d?")
        }
        ("DDD", _) => crate::regex!(r"\d{1,3}"),
        ("DDDD", _) => crate::regex!(r"\d{3}"),
        ("YYYY" | "gggg" | "GGGG", true) => crate::regex!(r"\d{4}"),
        ("YYYY" | "gggg" | "GGGG", false) => crate::regex!(r"\d{1,4}"),
        ("YYYYY" | "YYYYYY" | "ggggg" | "GGGGG", true) => crate::regex!(r"[+-]?\d{6}"),
        ("YYYYY" | "YYYYYY" | "ggggg" | "GGGGG", false) => crate::regex!(r"[+-]?\d{1,6}"),
        ("Y" | "x", _) => crate::regex!(r"[+-]?\d+"),
        ("Q", _) => crate::regex!(r"\d"),
        ("hmm" | "Hmm", _) => crate::regex!(r"\d\d\d\d?"),
        ("hmmss" | "Hmmss", _) => crate::regex!(r"\d\d\d\d\d\d?"),
        ("S", true) => crate::regex!(r"\d"),
        ("SS", true) => crate::regex!(r"\d\d"),
        ("SSS", true) => crate::regex!(r"\d{3}"),
        ("S" | "SS" | "SSS", false) => crate::regex!(r"\d{1,3}"),
        (t, _) if t.len() > 3 && t.bytes().all(|b| b == b'S') => crate::regex!(r"\d+"),
        ("Z" | "ZZ", _) => short_offset(),
        ("X", _) => crate::regex!(r"[+-]?\d+(\.\d{1,3})?"),
        ("MMM" | "MMMM", _) => locale.months_parse_regex(token, strict),
        ("dd" | "ddd" | "dddd", _) => locale.weekdays_parse_regex(token, strict),
        ("a" | "A", _) => locale.meridiem_parse_regex(),
        ("Do", _) => locale.ordinal_parse_regex(strict),
        _ => return Matcher::Literal(literal_text(token)),
    };
    Matcher::Regex(re)
}

fn short_offset() -> &'static Regex {
    crate::regex!(r"(?i)Z|[+-]\d\d(?::?\d\d)?")
}

/// Minutes east of UTC for the last offset in `text` (`+05:30`, `-0800`,
/// `Z`).
pub(crate) fn offset_from_string(text: &str) -> Option<i32> {
    let last = short_offset().find_iter(text).last()?.as_str();
    let pieces: Vec<&str> = crate::regex!(r"[-+]|\d\d").find_iter(last).map(|m| m.as_str()).collect();
    let Some((&sign, numbers)) = pieces.split_first() else {
        return Some(0);
    };
    let hours: i32 = numbers.first().and_then(|h| h.parse().ok()).unwrap_or(0);
    let minutes: i32 = numbers.get(1).and_then(|m| m.parse().ok()).unwrap_or(0);
    let total = hours * 60 + minutes;
    Some(if sign == "+" { total } else { -total })
}

/// Two-digit years: 69..=99 are the 1900s, 00..=68 the 2000s.
pub(crate) fn two_digit_year(text: &str) -> Option<i64> {
    let year = to_int(text)?;
    Some(year + if year > 68 { 1900 } else { 2000 })
}

/// Record what a matched token means.
fn apply_token(config: &mut ParseConfig, token: &str, text: &str) {
    let int = || to_int(text);
    match token {
        "M" | "MM" => config.parts[MONTH] = int().map(|m| m - 1),
        "MMM" | "MMMM" => match config.locale.month_index(text, token, config.strict) {
            Some(month) => config.parts[MONTH] = Some(month as i64),
            None => config.flags.insert(ParseFlag::INVALID_MONTH),
        },
        "Q" => config.parts[MONTH] = int().map(|q| (q - 1) * 3),
        "D" | "DD" => config.parts[DATE] = int(),
        "Do" => config.parts[DATE] = crate::regex!(r"\d\d?").find(text).and_then(|m| to_int(m.as_str())),
        "DDD" | "DDDD" => config.day_of_year = int(),
        "YYYY" => {
            config.parts[YEAR] = if text.chars().count() == 2 { two_digit_year(text) } else { int() };
        }
        "YY" => config.parts[YEAR] = two_digit_year(text),
        "Y" | "YYYYY" | "YYYYYY" => config.parts[YEAR] = int(),
        "d" => config.week_mut().day = int(),
        "e" => config.week_mut().weekday = int(),
        "E" => config.week_mut().iso_weekday = int(),
        "dd" | "ddd" | "dddd" => match config.locale.weekday_index(text, token, config.strict) {
            Some(day) => config.week_mut().day = Some(day as i64),
            None => config.flags.insert(ParseFlag::INVALID_WEEKDAY),
        },
        "w" | "ww" => config.week_mut().week = int(),
        "W" | "WW" => config.week_mut().iso_week = int(),
        "gggg" | "ggggg" => config.week_mut().week_year = int(),
        "GGGG" | "GGGGG" => config.week_mut().iso_week_year = int(),
        "gg" => config.week_mut().week_year = two_digit_year(text),
        "GG" => config.week_mut().iso_week_year = two_digit_year(text),
        "H" | "HH" => config.parts[HOUR] = int(),
        "k" | "kk" => config.parts[HOUR] = int().map(|h| if h == 24 { 0 } else { h }),
        "h" | "hh" => {
            config.parts[HOUR] = int();
            config.flags.insert(ParseFlag::BIG_HOUR);
        }
        "hmm" | "hmmss" | "Hmm" | "Hmmss" => {
            let split = |from: usize, to: usize| text.get(from..to).and_then(to_int);
            let len = text.len();
            if token.ends_with("ss") {
                config.parts[HOUR] = split(0, len - 4);
                config.parts[MINUTE] = split(len - 4, len - 2);
                config.parts[SECOND] = split(len - 2, len);
            } else {
                config.parts[HOUR] = split(0, len - 2);
                config.parts[MINUTE] = split(len - 2, len);
            }
            if token.starts_with('h') {
                config.flags.insert(ParseFlag::BIG_HOUR);
            }
        }
        "a" | "A" => config.meridiem = Some(text.to_string()),
        "m" | "mm" => config.parts[MINUTE] = int(),
        "s" | "ss" => config.parts[SECOND] = int(),
        t if t.starts_with('S') => {
            let digits: String = text.chars().chain(std::iter::repeat('0')).take(3).collect();
            config.parts[MILLISECOND] = digits.parse().ok();
        }
        "Z" | "ZZ" => {
            config.use_utc = true;
            config.tzm = offset_from_string(text);
        }
        "X" => {
            let instant = unix_seconds_to_millis(text).and_then(DateTime::<Utc>::from_timestamp_millis);
            config.resolution = resolution(instant);
        }
        "x" => {
            let instant = text.parse::<i64>().ok().and_then(DateTime::<Utc>::from_timestamp_millis);
            config.resolution = resolution(instant);
        }
        _ => {}
    }
}

/// `"1318781876.721"` → `1318781876721`, reading at most three fraction
/// digits without going through floating point.
fn unix_seconds_to_millis(text: &str) -> Option<i64> {
    let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
    let seconds: i64 = whole.parse().ok()?;
    let digits: String = fraction.chars().chain(std::iter::repeat('0')).take(3).collect();
    let fraction: i64 = digits.parse().ok()?;
    let millis = seconds.checked_mul(1000)?;
    if whole.starts_with('-') { millis.checked_sub(fraction) } else { millis.checked_add(fraction) }
}

fn resolution(instant: Option<DateTime<Utc>>) -> Resolution {
    match instant {
        Some(instant) => Resolution::At(instant),
        None => Resolution::Unrepresentable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::get_locale;
    use crate::units::Unit;
    use chrono::TimeZone;

    fn parse(input: &str, pattern: &str, strict: bool) -> ParseConfig {
        parse_in(input, pattern, strict, "en")
    }

    fn parse_in(input: &str, pattern: &str, strict: bool, locale: &str) -> ParseConfig {
        let reference = Utc.with_ymd_and_hms(2013, 2, 12, 0, 0, 0).unwrap();
        let mut config = ParseConfig::new(input.to_string(), get_locale(locale).unwrap(), strict, true, reference);
        parse_with_pattern(&mut config, pattern);
        config
    }

    #[test]
    fn numeric_patterns() {
        let mut config = parse("15.01.2024 13:45", "DD.MM.YYYY HH:mm", false);
        assert!(config.is_valid());
        assert_eq!(config.parts, [Some(2024), Some(0), Some(15), Some(13), Some(45), Some(0), Some(0)]);
        assert_eq!(config.instant(), Some(Utc.with_ymd_and_hms(2024, 1, 15, 13, 45, 0).unwrap()));
    }

    #[test]
    fn names_ordinals_and_meridiem() {
        let config = parse("Tuesday, March 5th 2024, 3:07 pm", "dddd, MMMM Do YYYY, h:mm a", true);
        assert_eq!(config.parts[..5], [Some(2024), Some(2), Some(5), Some(15), Some(7)]);
        assert!(!config.flags.contains(ParseFlag::BIG_HOUR));
        assert!(!config.flags.contains(ParseFlag::WEEKDAY_MISMATCH));
        assert_eq!(config.flags.meridiem.as_deref(), Some("pm"));

        let twelve = parse("12:30 am", "h:mm a", false);
        assert_eq!(twelve.parts[HOUR], Some(0));
    }

    #[test]
    fn wrong_weekday_is_a_mismatch() {
        let mut config = parse("Monday 2024-03-05", "dddd YYYY-MM-DD", false);
        assert!(config.flags.contains(ParseFlag::WEEKDAY_MISMATCH));
        assert!(!config.is_valid());
    }

    #[test]
    fn unknown_month_name_is_an_unused_token() {
        let mut lenient = parse("5 Smarch 2024", "D MMMM YYYY", false);
        assert_eq!(lenient.flags.unused_tokens, vec!["MMMM".to_string()]);
        assert_eq!(lenient.flags.unused_input, vec!["Smarch".to_string()]);
        assert!(lenient.is_valid());
        let mut strict = parse("5 Smarch 2024", "D MMMM YYYY", true);
        assert!(!strict.is_valid());
    }

    #[test]
    fn leftovers_and_unused_tokens() {
        let mut lenient = parse("2024-01-15 trailing", "YYYY-MM-DD", false);
        assert!(lenient.is_valid());
        assert_eq!(lenient.flags.chars_left_over, 9);
        assert_eq!(lenient.flags.unused_input, vec![" trailing".to_string()]);

        let mut strict = parse("2024-01-15 trailing", "YYYY-MM-DD", true);
        assert!(!strict.is_valid());

        let missing = parse("2024", "YYYY-MM", false);
        assert_eq!(missing.flags.unused_tokens, vec!["MM".to_string()]);
        assert_eq!(missing.score(), 10);
    }

    #[test]
    fn nothing_matched_is_empty() {
        let mut config = parse("hello", "YYYY", false);
        assert!(config.flags.contains(ParseFlag::EMPTY));
        assert!(!config.is_valid());
    }

    #[test]
    fn two_digit_year_pivot() {
        assert_eq!(parse("68", "YY", false).parts[YEAR], Some(2068));
        assert_eq!(parse("69", "YY", false).parts[YEAR], Some(1969));
        assert_eq!(parse("12", "YYYY", false).parts[YEAR], Some(2012));
    }

    #[test]
    fn big_hour_needs_meridiem_in_strict_mode() {
        let mut strict = parse("13:00", "hh:mm", true);
        assert!(strict.flags.contains(ParseFlag::BIG_HOUR));
        assert!(!strict.is_valid());
        let mut ok = parse("11:00", "hh:mm", true);
        assert!(ok.is_valid());
    }

    #[test]
    fn compact_times_and_fractions() {
        let config = parse("0930", "Hmm", false);
        assert_eq!((config.parts[HOUR], config.parts[MINUTE]), (Some(9), Some(30)));
        let config = parse("123456", "Hmmss", false);
        assert_eq!(config.parts[3..6], [Some(12), Some(34), Some(56)]);
        let config = parse("10:00:00.0456", "HH:mm:ss.SSSS", false);
        assert_eq!(config.parts[MILLISECOND], Some(45));
    }

    #[test]
    fn offsets_and_timestamps() {
        let config = parse("2024-01-15 10:00 +05:30", "YYYY-MM-DD HH:mm Z", false);
        assert_eq!(config.tzm, Some(330));
        assert_eq!(config.instant(), Some(Utc.with_ymd_and_hms(2024, 1, 15, 4, 30, 0).unwrap()));
        assert_eq!(offset_from_string("-0800"), Some(-480));
        assert_eq!(offset_from_string("Z"), Some(0));

        let config = parse("1318781876.721", "X", false);
        assert_eq!(config.instant().map(|i| i.timestamp_millis()), Some(1_318_781_876_721));
        assert_eq!(unix_seconds_to_millis("-1.5"), Some(-1500));
        let config = parse("1318781876721", "x", false);
        assert_eq!(config.instant().map(|i| i.timestamp_millis()), Some(1_318_781_876_721));
    }

    #[test]
    fn week_tokens() {
        let config = parse("2009-W53-7", "GGGG-[W]WW-E", false);
        assert_eq!(config.parts[..3], [Some(2010), Some(0), Some(3)]);
        let mut overflow = parse("2016-W53", "GGGG-[W]WW", false);
        assert!(!overflow.is_valid());
        assert_eq!(overflow.flags.overflow, Some(Unit::Week));
    }

    #[test]
    fn locale_names() {
        let config = parse_in("5 März 2024", "D MMMM YYYY", true, "de");
        assert_eq!(config.parts[MONTH], Some(2));
        let config = parse_in("5 марта 2024", "D MMMM YYYY", true, "ru");
        assert_eq!(config.parts[MONTH], Some(2));
    }
}
