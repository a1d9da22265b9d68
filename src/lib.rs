//! A table-driven calendar and duration engine.
//!
//! ```text
//!            ┌──────────── locale registry ────────────┐
//!            ▼                                          ▼
//! input ── parser ── validate ──▶ Chronos ── format ──▶ text
//!                                   │  ▲
//!                    arith / week ──┘  └── calendar grids
//!                                   │
//!                                Duration ── humanize ──▶ "in 3 days"
//! ```
//!
//! Parsing never fails: malformed input yields an invalid [`Chronos`] that
//! formats as the locale's invalid-date phrase and explains itself through
//! [`Chronos::parsing_flags`].

#[macro_use]
mod macros;
mod api;
mod arith;
mod calendar;
mod duration;
mod error;
mod flags;
mod format;
pub mod locale;
mod parser;
mod predicates;
mod units;
mod value;
mod week;
mod zone;

pub use api::{
    Context, DateInput, FormatOptions, ParseOptions, add, create_duration, diff, format_date, parse_date,
    parse_date_with, subtract,
};
pub use calendar::{
    ArrowState, CalendarCell, CalendarFormatOptions, CalendarView, CellFlags, DaysCalendarOptions, DaysMatrix,
    FlagOptions, calc_days_calendar, flag_days_calendar, flag_months_calendar, flag_years_calendar,
    format_days_calendar, format_months_calendar, format_years_calendar, is_month_disabled, is_year_disabled,
};
pub use duration::{Duration, DurationInput, DurationParts, Thresholds};
pub use error::ChronosError;
pub use flags::{ParseFlag, ParsingFlags};
pub use format::{CalendarKey, DEFAULT_FORMAT, DEFAULT_FORMAT_UTC, expand_format};
pub use locale::{Locale, LocaleDef, define_locale, get_locale, list_locales, set_global_locale};
pub use predicates::{days_in_month, days_in_year, is_leap_year};
pub use units::{Grain, Unit};
pub use value::{Chronos, Inclusivity};
pub use week::{DayOfYear, WeekOfYear, day_of_year_from_weeks, first_week_offset, week_of_year, weeks_in_year};
pub use zone::Zone;
