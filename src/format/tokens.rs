//! Renderers for individual format tokens.

use super::RenderContext;
use crate::predicates::zero_fill;
use crate::week::week_of_year;
use chrono::{Datelike, Timelike};
use once_cell::sync::Lazy;
use std::collections::HashMap;

pub(crate) type TokenFn = fn(&RenderContext) -> String;

static TOKENS: Lazy<HashMap<&'static str, TokenFn>> = Lazy::new(|| {
    let table: &[(&'static str, TokenFn)] = &[
        // Month
        ("M", |c| month(c).to_string()),
        ("Mo", |c| c.locale.ordinal(month(c), "M")),
        ("MM", |c| zero_fill(month(c), 2, false)),
        ("MMM", |c| c.locale.month_short_name(c.civil.month0() as usize, c.pattern).to_string()),
        ("MMMM", |c| c.locale.month_name(c.civil.month0() as usize, c.pattern).to_string()),
        // Quarter
        ("Q", |c| quarter(c).to_string()),
        ("Qo", |c| c.locale.ordinal(quarter(c), "Q")),
        // Day of month / year
        ("D", |c| c.civil.day().to_string()),
        ("Do", |c| c.locale.ordinal(i64::from(c.civil.day()), "D")),
        ("DD", |c| zero_fill(i64::from(c.civil.day()), 2, false)),
        ("DDD", |c| c.civil.ordinal().to_string()),
        ("DDDo", |c| c.locale.ordinal(i64::from(c.civil.ordinal()), "DDD")),
        ("DDDD", |c| zero_fill(i64::from(c.civil.ordinal()), 3, false)),
        // Day of week
        ("d", |c| day(c).to_string()),
        ("do", |c| c.locale.ordinal(day(c), "d")),
        ("dd", |c| c.locale.weekday_min_name(day(c) as usize).to_string()),
        ("ddd", |c| c.locale.weekday_short_name(day(c) as usize).to_string()),
        ("dddd", |c| c.locale.weekday_name(day(c) as usize, c.pattern).to_string()),
        ("e", |c| ((day(c) + 7 - i64::from(c.locale.week.dow)) % 7).to_string()),
        ("E", |c| c.civil.weekday().number_from_monday().to_string()),
        // Weeks
        ("w", |c| locale_week(c).0.to_string()),
        ("wo", |c| c.locale.ordinal(locale_week(c).0, "w")),
        ("ww", |c| zero_fill(locale_week(c).0, 2, false)),
        ("W", |c| iso_week(c).0.to_string()),
        ("Wo", |c| c.locale.ordinal(iso_week(c).0, "W")),
        ("WW", |c| zero_fill(iso_week(c).0, 2, false)),
        // Years
        ("Y", |c| {
            let y = year(c);
            if y <= 9999 { zero_fill(y, 4, false) } else { format!("+{y}") }
        }),
        ("YY", |c| zero_fill(year(c) % 100, 2, false)),
        ("YYYY", |c| zero_fill(year(c), 4, false)),
        ("YYYYY", |c| zero_fill(year(c), 5, false)),
        ("YYYYYY", |c| zero_fill(year(c), 6, true)),
        ("gg", |c| zero_fill(locale_week(c).1 % 100, 2, false)),
        ("gggg", |c| zero_fill(locale_week(c).1, 4, false)),
        ("ggggg", |c| zero_fill(locale_week(c).1, 5, false)),
        ("GG", |c| zero_fill(iso_week(c).1 % 100, 2, false)),
        ("GGGG", |c| zero_fill(iso_week(c).1, 4, false)),
        ("GGGGG", |c| zero_fill(iso_week(c).1, 5, false)),
        // Time of day
        ("a", |c| c.locale.meridiem(c.civil.hour(), c.civil.minute(), true)),
        ("A", |c| c.locale.meridiem(c.civil.hour(), c.civil.minute(), false)),
        ("H", |c| c.civil.hour().to_string()),
        ("HH", |c| zero_fill(i64::from(c.civil.hour()), 2, false)),
        ("h", |c| hour12(c).to_string()),
        ("hh", |c| zero_fill(hour12(c), 2, false)),
        ("k", |c| hour24(c).to_string()),
        ("kk", |c| zero_fill(hour24(c), 2, false)),
        ("hmm", |c| format!("{}{}", hour12(c), zero_fill(i64::from(c.civil.minute()), 2, false))),
        ("hmmss", |c| format!("{}{}", hour12(c), minutes_seconds(c))),
        ("Hmm", |c| format!("{}{}", c.civil.hour(), zero_fill(i64::from(c.civil.minute()), 2, false))),
        ("Hmmss", |c| format!("{}{}", c.civil.hour(), minutes_seconds(c))),
        ("m", |c| c.civil.minute().to_string()),
        ("mm", |c| zero_fill(i64::from(c.civil.minute()), 2, false)),
        ("s", |c| c.civil.second().to_string()),
        ("ss", |c| zero_fill(i64::from(c.civil.second()), 2, false)),
        ("S", |c| fraction(c, 1)),
        ("SS", |c| fraction(c, 2)),
        ("SSS", |c| fraction(c, 3)),
        ("SSSS", |c| fraction(c, 4)),
        ("SSSSS", |c| fraction(c, 5)),
        ("SSSSSS", |c| fraction(c, 6)),
        ("SSSSSSS", |c| fraction(c, 7)),
        ("SSSSSSSS", |c| fraction(c, 8)),
        ("SSSSSSSSS", |c| fraction(c, 9)),
        // Offsets and timestamps
        ("Z", |c| offset(c.offset, ":")),
        ("ZZ", |c| offset(c.offset, "")),
        ("z", |c| zone_abbr(c)),
        ("zz", |c| zone_abbr(c)),
        ("X", |c| c.instant.timestamp().to_string()),
        ("x", |c| c.instant.timestamp_millis().to_string()),
    ];
    table.iter().copied().collect()
});

pub(crate) fn token(name: &str) -> Option<TokenFn> {
    TOKENS.get(name).copied()
}

pub(crate) fn is_format_token(name: &str) -> bool {
    TOKENS.contains_key(name)
}

fn year(c: &RenderContext) -> i64 {
    i64::from(c.civil.year())
}

fn month(c: &RenderContext) -> i64 {
    i64::from(c.civil.month())
}

fn quarter(c: &RenderContext) -> i64 {
    i64::from(c.civil.month0() / 3) + 1
}

fn day(c: &RenderContext) -> i64 {
    i64::from(c.civil.weekday().num_days_from_sunday())
}

/// `(week, week-year)` under the locale's week rule.
fn locale_week(c: &RenderContext) -> (i64, i64) {
    let rule = c.locale.week;
    let w = week_of_year(year(c), i64::from(c.civil.ordinal()), i64::from(rule.dow), i64::from(rule.doy));
    (w.week, w.year)
}

fn iso_week(c: &RenderContext) -> (i64, i64) {
    let w = week_of_year(year(c), i64::from(c.civil.ordinal()), 1, 4);
    (w.week, w.year)
}

fn hour12(c: &RenderContext) -> i64 {
    match c.civil.hour() % 12 {
        0 => 12,
        h => i64::from(h),
    }
}

fn hour24(c: &RenderContext) -> i64 {
    match c.civil.hour() {
        0 => 24,
        h => i64::from(h),
    }
}

fn minutes_seconds(c: &RenderContext) -> String {
    format!("{}{}", zero_fill(i64::from(c.civil.minute()), 2, false), zero_fill(i64::from(c.civil.second()), 2, false))
}

/// The first `digits` digits of the second's fraction. Precision stops at
/// milliseconds; longer tokens pad with zeros.
fn fraction(c: &RenderContext, digits: u32) -> String {
    let millis = i64::from(c.civil.nanosecond() / 1_000_000);
    let value = if digits <= 3 { millis / 10_i64.pow(3 - digits) } else { millis * 10_i64.pow(digits - 3) };
    zero_fill(value, digits as usize, false)
}

/// `+HH:MM` / `-HHMM` for an offset in minutes.
fn offset(minutes: i32, separator: &str) -> String {
    let sign = if minutes < 0 { '-' } else { '+' };
    let minutes = i64::from(minutes.unsigned_abs());
    format!("{sign}{}{separator}{}", zero_fill(minutes / 60, 2, false), zero_fill(minutes % 60, 2, false))
}

fn zone_abbr(c: &RenderContext) -> String {
    if c.zone.is_utc() { "UTC".to_string() } else { String::new() }
}

#[cfg(test)]
mod tests {
    use crate::locale::get_locale;
    use crate::value::Chronos;
    use crate::zone::Zone;
    use chrono::{TimeZone, Utc};

    fn value(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, ms: i64) -> Chronos {
        let instant = Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap() + chrono::Duration::milliseconds(ms);
        Chronos::from_instant(instant, Zone::Utc).with_locale_data(get_locale("en").unwrap())
    }

    #[test]
    fn calendar_tokens() {
        let v = value(2010, 2, 14, 15, 25, 50, 125);
        let cases = [
            ("M Mo MM MMM MMMM", "2 2nd 02 Feb February"),
            ("D Do DD DDD DDDo DDDD", "14 14th 14 45 45th 045"),
            ("d do dd ddd dddd e E", "0 0th Su Sun Sunday 0 7"),
            ("w wo ww W Wo WW", "8 8th 08 6 6th 06"),
            ("Y YY YYYY YYYYY YYYYYY", "2010 10 2010 02010 +002010"),
            ("gg gggg GG GGGG", "10 2010 10 2010"),
            ("Q Qo", "1 1st"),
        ];
        for (pattern, expected) in cases {
            assert_eq!(v.format(Some(pattern)), expected, "{pattern}");
        }
    }

    #[test]
    fn time_tokens() {
        let v = value(2010, 2, 14, 15, 25, 50, 125);
        let cases = [
            ("a A h hh H HH k kk", "pm PM 3 03 15 15 15 15"),
            ("hmm hmmss Hmm Hmmss", "325 32550 1525 152550"),
            ("m mm s ss", "25 25 50 50"),
            ("S SS SSS SSSS SSSSSS", "1 12 125 1250 125000"),
            ("Z ZZ z", "+00:00 +0000 UTC"),
            ("X x", "1266161150 1266161150125"),
        ];
        for (pattern, expected) in cases {
            assert_eq!(v.format(Some(pattern)), expected, "{pattern}");
        }
        let midnight = value(2010, 2, 14, 0, 5, 0, 0);
        assert_eq!(midnight.format(Some("h k")), "12 24");
    }

    #[test]
    fn negative_offsets_and_years() {
        let v = value(2010, 2, 14, 15, 0, 0, 0).with_zone(Zone::Fixed(-90));
        assert_eq!(v.format(Some("Z ZZ z")), "-01:30 -0130 ");
        let far = value(-43, 3, 15, 0, 0, 0, 0);
        assert_eq!(far.format(Some("YYYY YYYYYY")), "-0043 -000043");
    }
}
