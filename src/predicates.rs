//! Small calendar predicates and numeric helpers shared by every module.

/// Gregorian leap-year rule.
pub fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_in_year(year: i64) -> i64 {
    if is_leap_year(year) { 366 } else { 365 }
}

/// Days in a zero-based `month` of `year`. Months outside `0..12` roll into
/// the neighbouring years, so `days_in_month(2023, 13)` is February 2024.
pub fn days_in_month(year: i64, month: i64) -> i64 {
    let mod_month = month.rem_euclid(12);
    let year = year + (month - mod_month) / 12;
    if mod_month == 1 {
        if is_leap_year(year) { 29 } else { 28 }
    } else {
        31 - (mod_month % 7) % 2
    }
}

/// Truncate toward zero.
pub fn abs_floor(n: f64) -> f64 {
    let v = n.trunc();
    if v == 0.0 { 0.0 } else { v }
}

/// Round away from zero to the next whole number.
pub fn abs_ceil(n: f64) -> f64 {
    if n < 0.0 { n.floor() } else { n.ceil() }
}

/// Round half away from zero.
pub fn abs_round(n: f64) -> f64 {
    if n < 0.0 { -((-n).round()) } else { n.round() }
}

/// Left-pad `number` with zeros to `width` digits. The sign is placed
/// before the padding; `force_sign` prints `+` for non-negative numbers.
pub fn zero_fill(number: i64, width: usize, force_sign: bool) -> String {
    let digits = number.unsigned_abs().to_string();
    let sign = if number >= 0 {
        if force_sign { "+" } else { "" }
    } else {
        "-"
    };
    let zeros = width.saturating_sub(digits.len());
    format!("{sign}{}{digits}", "0".repeat(zeros))
}

/// Parse a run of digits with an optional sign, the way format tokens read
/// their captured text. Returns `None` for empty or non-numeric input.
pub fn to_int(text: &str) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<i64>().ok().or_else(|| text.parse::<f64>().ok().filter(|v| v.is_finite()).map(|v| v.trunc() as i64))
}
