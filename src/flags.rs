//! Parsing diagnostics carried by every [`Chronos`](crate::Chronos).
//!
//! Parsing never fails; instead it records *why* a value came out invalid (or
//! how a valid one was recognized) here. [`ParsingFlags::is_valid`] is the
//! single place that turns these diagnostics into a yes/no answer.

use crate::units::Unit;

bitflags::bitflags! {
    /// Boolean parse outcomes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ParseFlag: u32 {
        /// A pattern was applied but no token consumed any input.
        const EMPTY             = 1 << 0;
        const INVALID_MONTH     = 1 << 1;
        const INVALID_WEEKDAY   = 1 << 2;
        /// A parsed weekday disagrees with the date it was parsed with.
        const WEEKDAY_MISMATCH  = 1 << 3;
        const NULL_INPUT        = 1 << 4;
        /// An empty list of candidate patterns was given.
        const INVALID_FORMAT    = 1 << 5;
        const USER_INVALIDATED  = 1 << 6;
        const ISO               = 1 << 7;
        const RFC_2822          = 1 << 8;
        /// A 12-hour token (`h`, `hh`) matched without a meridiem to resolve it.
        const BIG_HOUR          = 1 << 9;
        const OVERFLOW_DAY_OF_YEAR = 1 << 10;
        const OVERFLOW_WEEKS    = 1 << 11;
        const OVERFLOW_WEEKDAY  = 1 << 12;
    }
}

/// Flags that make a value invalid on their own.
const INVALIDATING: ParseFlag = ParseFlag::EMPTY
    .union(ParseFlag::INVALID_MONTH)
    .union(ParseFlag::INVALID_WEEKDAY)
    .union(ParseFlag::WEEKDAY_MISMATCH)
    .union(ParseFlag::NULL_INPUT)
    .union(ParseFlag::INVALID_FORMAT)
    .union(ParseFlag::USER_INVALIDATED);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsingFlags {
    pub flags: ParseFlag,
    /// The first calendar field found out of range, if any.
    pub overflow: Option<Unit>,
    /// Pattern tokens that matched nothing.
    pub unused_tokens: Vec<String>,
    /// Input text skipped over or left after the last token.
    pub unused_input: Vec<String>,
    pub chars_left_over: usize,
    /// Meridiem text as it appeared in the input.
    pub meridiem: Option<String>,
    /// Which of `[year, month, day, hour, minute, second, ms]` came from the
    /// input rather than from defaults.
    pub parsed_date_parts: [bool; 7],
    /// Score of the winning candidate when several patterns were tried.
    pub score: Option<usize>,
}

impl ParsingFlags {
    pub fn with(flag: ParseFlag) -> Self {
        ParsingFlags { flags: flag, ..ParsingFlags::default() }
    }

    pub fn contains(&self, flag: ParseFlag) -> bool {
        self.flags.contains(flag)
    }

    pub fn insert(&mut self, flag: ParseFlag) {
        self.flags.insert(flag);
    }

    pub fn remove(&mut self, flag: ParseFlag) {
        self.flags.remove(flag);
    }

    /// Validity of a value with these diagnostics; `has_instant` is whether
    /// an instant could be built at all.
    pub fn is_valid(&self, has_instant: bool, strict: bool) -> bool {
        let parsed_any = self.parsed_date_parts.iter().any(|&p| p);
        let mut valid = has_instant
            && self.overflow.is_none()
            && !self.flags.intersects(INVALIDATING)
            && (self.meridiem.is_none() || parsed_any);
        if strict {
            valid = valid
                && self.chars_left_over == 0
                && self.unused_tokens.is_empty()
                && !self.flags.contains(ParseFlag::BIG_HOUR);
        }
        valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalidating_flags() {
        assert!(ParsingFlags::default().is_valid(true, false));
        assert!(!ParsingFlags::default().is_valid(false, false));
        let invalidating =
            [ParseFlag::EMPTY, ParseFlag::NULL_INPUT, ParseFlag::WEEKDAY_MISMATCH, ParseFlag::USER_INVALIDATED];
        for flag in invalidating {
            assert!(!ParsingFlags::with(flag).is_valid(true, false), "{flag:?}");
        }
        assert!(ParsingFlags::with(ParseFlag::ISO | ParseFlag::BIG_HOUR).is_valid(true, false));
    }

    #[test]
    fn strict_mode_rejects_leftovers_and_big_hour() {
        let leftover = ParsingFlags { chars_left_over: 2, ..ParsingFlags::default() };
        assert!(leftover.is_valid(true, false));
        assert!(!leftover.is_valid(true, true));
        assert!(!ParsingFlags::with(ParseFlag::BIG_HOUR).is_valid(true, true));
    }

    #[test]
    fn meridiem_needs_a_parsed_part() {
        let mut flags = ParsingFlags { meridiem: Some("pm".to_string()), ..ParsingFlags::default() };
        assert!(!flags.is_valid(true, false));
        flags.parsed_date_parts[3] = true;
        assert!(flags.is_valid(true, false));
    }
}
