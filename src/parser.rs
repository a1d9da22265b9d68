//! Turning caller input into a [`Chronos`].
//!
//! ```text
//! DateInput ──┬─ Chronos / instant / millis ─────────────────────────────┐
//!             ├─ array / object ─────────── from_array ─┐                │
//!             └─ text ── preparse ─┬─ one pattern ──────┤                │
//!                                  ├─ pattern list ── best candidate     │
//!                                  └─ no pattern:                        │
//!                                     /Date(ms)/ → ISO 8601 → RFC 2822   │
//!                                     → locale composites (strict)       │
//!                                                       │                │
//!                                       validate ◀──────┘                │
//!                                          │                             ▼
//!                                          └──────────────────────▶  Chronos
//! ```
//!
//! Nothing here returns an error. Input that cannot be read yields an
//! invalid `Chronos` whose [`ParsingFlags`](crate::ParsingFlags) say why.

#[path = "parser/config.rs"]
mod config;
#[path = "parser/from_array.rs"]
mod from_array;
#[path = "parser/iso.rs"]
mod iso;
#[path = "parser/tokens.rs"]
mod tokens;
#[path = "parser/validate.rs"]
mod validate;

use crate::api::{Context, DateInput, ParseOptions};
use crate::flags::{ParseFlag, ParsingFlags};
use crate::locale::resolve_locale;
use crate::units::Unit;
use crate::value::Chronos;
use crate::zone::Zone;
use chrono::DateTime;
use config::{DATE, HOUR, MILLISECOND, MINUTE, MONTH, ParseConfig, Resolution, SECOND, YEAR};

/// Locale patterns tried, strictly, for text in no standard form.
const COMPOSITE_FORMATS: [&str; 6] = ["L LTS", "L LT", "L", "LL", "LLL", "LLLL"];

pub(crate) fn parse(input: DateInput, context: &Context, options: &ParseOptions) -> Chronos {
    let locale = resolve_locale(options.locale.as_deref());
    let zone = Zone::from_utc_flag(options.utc);
    let new_config = |text: String| {
        ParseConfig::new(text, locale.clone(), options.strict, options.utc, context.reference_time)
    };

    let config = match input {
        DateInput::Chronos(value) => {
            let value = if options.utc { value.utc() } else { value };
            return match &options.locale {
                Some(_) => value.with_locale_data(locale),
                None => value,
            };
        }
        DateInput::Instant(instant) => return Chronos::from_instant(instant, zone).with_locale_data(locale),
        DateInput::Millis(millis) => return Chronos::from_millis(millis, zone).with_locale_data(locale),
        DateInput::Null => return Chronos::invalid(ParsingFlags::with(ParseFlag::NULL_INPUT), locale),
        DateInput::Text(text) if text.is_empty() && options.formats.is_none() => {
            return Chronos::invalid(ParsingFlags::with(ParseFlag::NULL_INPUT), locale);
        }
        DateInput::Array(parts) => {
            let mut config = new_config(String::new());
            for (slot, value) in config.parts.iter_mut().zip(parts) {
                *slot = Some(value);
            }
            from_components(config)
        }
        DateInput::Object(fields) => {
            let mut config = new_config(String::new());
            apply_object(&mut config, &fields);
            from_components(config)
        }
        DateInput::Text(text) => {
            let config = new_config(locale.preparse(&text));
            match options.formats.as_deref() {
                Some([pattern]) => {
                    let mut config = config;
                    tokens::parse_with_pattern(&mut config, pattern);
                    config
                }
                Some(patterns) => best_candidate(config, patterns),
                None => from_text(config),
            }
        }
    };
    config.into_chronos()
}

fn from_components(mut config: ParseConfig) -> ParseConfig {
    config.flags.parsed_date_parts = config.parts.map(|p| p.is_some());
    from_array::resolve(&mut config);
    validate::check_overflow(&mut config);
    config
}

/// Read a unit-keyed object into components. Unknown keys are ignored; when
/// both `day` and `date` are present, `day` wins.
fn apply_object(config: &mut ParseConfig, fields: &[(String, i64)]) {
    let mut day = None;
    for (key, value) in fields {
        let Ok(unit) = key.parse::<Unit>() else {
            tracing::trace!(key = %key, "ignoring unknown object key");
            continue;
        };
        let index = match unit {
            Unit::Year => YEAR,
            Unit::Month => MONTH,
            Unit::Date => DATE,
            Unit::Day => {
                day = Some(*value);
                continue;
            }
            Unit::Hour => HOUR,
            Unit::Minute => MINUTE,
            Unit::Second => SECOND,
            Unit::Millisecond => MILLISECOND,
            _ => continue,
        };
        config.parts[index] = Some(*value);
    }
    if day.is_some() {
        config.parts[DATE] = day;
    }
}

/// Text with no pattern: try the standard forms, then the locale's own.
fn from_text(mut config: ParseConfig) -> ParseConfig {
    let aspnet = crate::regex!(r"(?i)^/?Date\((-?\d+)");
    if let Some(caps) = aspnet.captures(&config.input) {
        let instant = caps
            .get(1)
            .and_then(|m| m.as_str().parse::<i64>().ok())
            .and_then(DateTime::from_timestamp_millis);
        tracing::debug!(input = %config.input, "recognized /Date(ms)/");
        config.resolution = match instant {
            Some(instant) => Resolution::At(instant),
            None => Resolution::Unrepresentable,
        };
        return config;
    }
    if iso::parse_iso(&mut config) || iso::parse_rfc_2822(&mut config) {
        return config;
    }

    tracing::debug!(input = %config.input, "no standard form; trying locale formats");
    let strict = config.strict;
    config.strict = true;
    let patterns: Vec<String> = COMPOSITE_FORMATS.iter().map(|p| p.to_string()).collect();
    let mut best = best_candidate(config, &patterns);
    // Validity is settled under strict rules before the caller's flag returns.
    best.is_valid();
    best.strict = strict;
    best
}

/// Parse with every pattern and keep the best result. Lower scores win and
/// ties keep the earlier pattern; once a valid candidate is found only a
/// valid, lower-scoring one replaces it.
fn best_candidate(base: ParseConfig, patterns: &[String]) -> ParseConfig {
    if patterns.is_empty() {
        let mut config = base;
        config.invalidate(ParseFlag::INVALID_FORMAT);
        return config;
    }

    let mut best: Option<(ParseConfig, usize, bool)> = None;
    for pattern in patterns {
        let mut candidate = base.clone();
        candidate.freeze();
        tokens::parse_with_pattern(&mut candidate, pattern);
        let valid = candidate.is_valid();
        let score = candidate.score();
        candidate.flags.score = Some(score);
        tracing::trace!(pattern = %pattern, score, valid, "scored candidate");

        let replace = match &best {
            None => true,
            Some((_, best_score, true)) => valid && score < *best_score,
            Some((_, best_score, false)) => valid || score < *best_score,
        };
        if replace {
            best = Some((candidate, score, valid));
        }
    }

    match best {
        Some((mut winner, score, valid)) => {
            tracing::debug!(input = %winner.input, score, valid, "picked candidate");
            winner.thaw();
            winner
        }
        None => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn utc_options() -> ParseOptions {
        ParseOptions { utc: true, ..ParseOptions::default() }
    }

    fn parse_utc(input: impl Into<DateInput>) -> Chronos {
        parse(input.into(), &Context::default(), &utc_options())
    }

    fn parse_formats(input: &str, formats: &[&str], strict: bool) -> Chronos {
        let options = ParseOptions {
            formats: Some(formats.iter().map(|f| f.to_string()).collect()),
            strict,
            ..utc_options()
        };
        parse(input.into(), &Context::default(), &options)
    }

    fn millis(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> Option<i64> {
        Some(Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap().timestamp_millis())
    }

    #[test]
    fn leap_day_in_a_leap_year_is_valid() {
        let value = parse_utc("2024-02-29");
        assert!(value.is_valid());
        assert_eq!((value.year(), value.month(), value.date()), (Some(2024), Some(1), Some(29)));
    }

    #[test]
    fn leap_day_in_a_common_year_overflows() {
        let value = parse_utc("2023-02-29");
        assert!(!value.is_valid());
        assert_eq!(value.parsing_flags().overflow, Some(Unit::Date));
        assert_eq!(value.format(None), "Invalid date");
    }

    #[test]
    fn null_and_empty_input() {
        let value = parse_utc(DateInput::Null);
        assert!(value.parsing_flags().contains(ParseFlag::NULL_INPUT));
        let value = parse_utc("");
        assert!(!value.is_valid());
        assert!(value.parsing_flags().contains(ParseFlag::NULL_INPUT));
    }

    #[test]
    fn aspnet_json_dates() {
        assert_eq!(parse_utc("/Date(1198908717056-0700)/").value_of(), Some(1_198_908_717_056));
        assert_eq!(parse_utc("Date(-1000)").value_of(), Some(-1000));
    }

    #[test]
    fn rfc_2822_text() {
        let value = parse_utc("Sat, 14 Feb 2009 10:20:30 +0100");
        assert!(value.parsing_flags().contains(ParseFlag::RFC_2822));
        assert_eq!(value.value_of(), millis(2009, 2, 14, 9, 20, 30));
    }

    #[test]
    fn locale_formats_are_the_fallback() {
        let value = parse_utc("02/14/2010");
        assert_eq!(value.value_of(), millis(2010, 2, 14, 0, 0, 0));
        assert!(!value.is_strict());

        let value = parse_utc("February 14, 2010 3:25 PM");
        assert_eq!(value.value_of(), millis(2010, 2, 14, 15, 25, 0));

        let value = parse_utc("not a date");
        assert!(!value.is_valid());
    }

    #[test]
    fn single_pattern() {
        let value = parse_formats("14.02.2010 15:25", &["DD.MM.YYYY HH:mm"], false);
        assert_eq!(value.value_of(), millis(2010, 2, 14, 15, 25, 0));
        assert!(!parse_formats("14.02.2010 15:25 extra", &["DD.MM.YYYY HH:mm"], true).is_valid());
    }

    #[test]
    fn best_pattern_wins() {
        let value = parse_formats("2010-02-14", &["DD-MM-YYYY", "YYYY-MM-DD"], false);
        assert_eq!(value.value_of(), millis(2010, 2, 14, 0, 0, 0));
        assert_eq!(value.parsing_flags().score, Some(0));

        // Both patterns read the whole input; the first one wins the tie.
        let value = parse_formats("01/02/2010", &["MM/DD/YYYY", "DD/MM/YYYY"], false);
        assert_eq!(value.month(), Some(0));
    }

    #[test]
    fn a_valid_candidate_is_kept_over_a_lower_scoring_invalid_one() {
        // The second pattern reads everything but hour 25 overflows.
        let value = parse_formats("2010-02-14 25", &["YYYY-MM-DD", "YYYY-MM-DD HH"], false);
        assert!(value.is_valid());
        assert_eq!(value.hour(), Some(0));
        assert_eq!(value.parsing_flags().score, Some(3));

        // With no valid candidate the lowest score stands.
        let value = parse_formats("2010-02-30 10", &["YYYY-MM-DD HH", "YYYY-DD-MM"], false);
        assert!(!value.is_valid());
        assert_eq!(value.parsing_flags().overflow, Some(Unit::Date));
    }

    #[test]
    fn empty_pattern_list_is_an_invalid_format() {
        let value = parse_formats("2010-02-14", &[], false);
        assert!(value.parsing_flags().contains(ParseFlag::INVALID_FORMAT));
        assert!(!value.is_valid());
    }

    #[test]
    fn arrays_and_objects() {
        let value = parse_utc(vec![2010, 1, 14, 15, 25, 50, 125]);
        assert_eq!(value.value_of(), millis(2010, 2, 14, 15, 25, 50).map(|ms| ms + 125));
        assert!(!parse_utc(vec![2010, 13, 1]).is_valid());

        let value = parse_utc(DateInput::Object(vec![
            ("years".into(), 2010),
            ("M".into(), 1),
            ("date".into(), 3),
            ("day".into(), 14),
            ("h".into(), 15),
            ("unknown".into(), 99),
        ]));
        assert_eq!(value.value_of(), millis(2010, 2, 14, 15, 0, 0));
    }

    #[test]
    fn extreme_years_and_days_are_invalid_not_fatal() {
        for (input, pattern) in [
            ("9223372036854775807 5", "Y w"),
            ("-9223372036854775808 5", "Y W"),
            ("300000 5", "GGGGG W"),
            ("99999999999999999999 12", "Y DDD"),
        ] {
            let value = parse_formats(input, &[pattern], false);
            assert!(!value.is_valid(), "{input} with {pattern}");
            assert_eq!(value.parsing_flags().overflow, Some(Unit::Year), "{input} with {pattern}");
        }

        let value = parse_utc(vec![2024, 0, i64::MIN]);
        assert!(!value.is_valid());
        assert_eq!(value.parsing_flags().overflow, Some(Unit::Date));
        assert!(!parse_utc(vec![2024, 0, 1, i64::MAX]).is_valid());
    }

    #[test]
    fn missing_leading_fields_come_from_the_reference() {
        let value = parse_utc(DateInput::Object(vec![("hour".into(), 5)]));
        assert_eq!(value.value_of(), millis(2013, 2, 12, 5, 0, 0));
    }

    #[test]
    fn existing_values_and_instants() {
        let instant = Utc.with_ymd_and_hms(2010, 2, 14, 0, 0, 0).unwrap();
        let value = parse_utc(instant);
        assert!(value.is_utc());
        assert_eq!(value.instant(), Some(instant));

        let options = ParseOptions { locale: Some("de".into()), ..utc_options() };
        let german = parse(DateInput::Chronos(value), &Context::default(), &options);
        assert_eq!(german.locale().abbr, "de");
        assert_eq!(parse_utc(0i64).value_of(), Some(0));
    }
}
