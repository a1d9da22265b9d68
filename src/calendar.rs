//! Day, month and year grids for a date picker page.
//!
//! Building a page is two pure steps:
//!
//! ```text
//! anchor ── calc_days_calendar ──▶ DaysMatrix ── format_days_calendar ──▶ CalendarView
//! anchor ── format_months_calendar / format_years_calendar ─────────────▶ CalendarView
//!
//! CalendarView + FlagOptions ── flag_*_calendar ──▶ CalendarView (cells re-flagged)
//! ```
//!
//! Flagging is recomputed wholesale on every interaction, but a cell whose
//! flags did not change is carried over as the same `Arc`, so callers can
//! skip re-rendering it with a pointer comparison.

#[path = "calendar/days.rs"]
mod days;
#[path = "calendar/periods.rs"]
mod periods;

pub use days::{DaysCalendarOptions, DaysMatrix, calc_days_calendar, flag_days_calendar, format_days_calendar};
pub use periods::{flag_months_calendar, flag_years_calendar, format_months_calendar, format_years_calendar};

use crate::units::Grain;
use crate::value::Chronos;
use std::sync::Arc;

/// Patterns used for titles and labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarFormatOptions {
    pub month_title: String,
    pub year_title: String,
    pub day_label: String,
    pub month_label: String,
    pub year_label: String,
    pub week_numbers: String,
    /// Locale for labels; the anchor's locale when unset.
    pub locale: Option<String>,
}

impl Default for CalendarFormatOptions {
    fn default() -> Self {
        CalendarFormatOptions {
            month_title: "MMMM".into(),
            year_title: "YYYY".into(),
            day_label: "D".into(),
            month_label: "MMMM".into(),
            year_label: "YYYY".into(),
            week_numbers: "w".into(),
            locale: None,
        }
    }
}

/// Per-cell state derived by the flagging pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellFlags {
    pub is_other_month: bool,
    pub is_disabled: bool,
    pub is_hovered: bool,
    pub is_selected: bool,
    pub is_selection_start: bool,
    pub is_selection_end: bool,
    pub is_in_range: bool,
}

#[derive(Debug, Clone)]
pub struct CalendarCell {
    pub date: Chronos,
    pub label: String,
    pub flags: CellFlags,
}

/// Navigation arrow state of a page. `hide_*` applies to multi-page
/// displays, where only the outer pages show arrows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArrowState {
    pub hide_left: bool,
    pub hide_right: bool,
    pub disable_left: bool,
    pub disable_right: bool,
}

/// One formatted page. Day pages fill `week_numbers` and `weekdays`; month
/// and year pages leave them empty.
#[derive(Debug, Clone)]
pub struct CalendarView {
    /// The month (or year) the page shows.
    pub month: Chronos,
    pub month_title: String,
    pub year_title: String,
    pub week_numbers: Vec<String>,
    pub weekdays: Vec<String>,
    pub rows: Vec<Vec<Arc<CalendarCell>>>,
    pub arrows: ArrowState,
}

impl CalendarView {
    pub fn cells(&self) -> impl Iterator<Item = &Arc<CalendarCell>> {
        self.rows.iter().flatten()
    }
}

/// Selection and bounds a page is flagged against.
#[derive(Debug, Clone, Default)]
pub struct FlagOptions {
    pub is_disabled: bool,
    pub min_date: Option<Chronos>,
    pub max_date: Option<Chronos>,
    /// Days of week (Sunday = 0) that cannot be picked.
    pub days_disabled: Vec<i64>,
    pub dates_disabled: Vec<Chronos>,
    pub hovered_date: Option<Chronos>,
    pub selected_date: Option<Chronos>,
    /// Start and, once picked, end of a range selection.
    pub selected_range: Option<(Chronos, Option<Chronos>)>,
    pub display_months: usize,
    pub month_index: usize,
}

/// Whether the whole month of `date` lies outside `[min, max]`.
pub fn is_month_disabled(date: &Chronos, min: Option<&Chronos>, max: Option<&Chronos>) -> bool {
    is_period_disabled(date, Grain::Month, min, max)
}

/// Whether the whole year of `date` lies outside `[min, max]`.
pub fn is_year_disabled(date: &Chronos, min: Option<&Chronos>, max: Option<&Chronos>) -> bool {
    is_period_disabled(date, Grain::Year, min, max)
}

fn is_period_disabled(date: &Chronos, grain: Grain, min: Option<&Chronos>, max: Option<&Chronos>) -> bool {
    let before_min = min.is_some_and(|min| date.end_of(grain).is_before(min, Grain::Day));
    let after_max = max.is_some_and(|max| date.start_of(grain).is_after(max, Grain::Day));
    before_min || after_max
}

/// Whether `date` falls outside `[min, max]` by whole days.
fn is_outside_bounds(date: &Chronos, min: Option<&Chronos>, max: Option<&Chronos>) -> bool {
    min.is_some_and(|min| date.is_before(min, Grain::Day)) || max.is_some_and(|max| date.is_after(max, Grain::Day))
}

fn same(a: &Chronos, b: Option<&Chronos>, grain: Grain) -> bool {
    b.is_some_and(|b| a.is_same(b, grain))
}

/// Arrow visibility for page `month_index` of `display_months` pages.
fn arrow_visibility(options: &FlagOptions) -> (bool, bool) {
    let (index, count) = (options.month_index, options.display_months);
    let hide_left = index > 0 && index != count;
    let hide_right = index < count && index + 1 != count;
    (hide_left, hide_right)
}

/// Rebuild `rows` with new flags, keeping the `Arc` of every cell whose
/// flags are unchanged.
fn reflag(
    rows: &[Vec<Arc<CalendarCell>>],
    mut flag: impl FnMut(&CalendarCell) -> CellFlags,
) -> Vec<Vec<Arc<CalendarCell>>> {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|cell| {
                    let flags = flag(cell);
                    if flags == cell.flags {
                        Arc::clone(cell)
                    } else {
                        Arc::new(CalendarCell { flags, ..CalendarCell::clone(cell) })
                    }
                })
                .collect()
        })
        .collect()
}

/// Lay `cells` out in rows of `width`.
fn into_rows(cells: Vec<CalendarCell>, width: usize) -> Vec<Vec<Arc<CalendarCell>>> {
    let width = width.max(1);
    let mut rows = Vec::with_capacity(cells.len().div_ceil(width));
    let mut row = Vec::with_capacity(width);
    for cell in cells {
        row.push(Arc::new(cell));
        if row.len() == width {
            rows.push(std::mem::replace(&mut row, Vec::with_capacity(width)));
        }
    }
    if !row.is_empty() {
        rows.push(row);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zone::Zone;
    use chrono::{TimeZone, Utc};

    fn at(y: i32, m: u32, d: u32) -> Chronos {
        Chronos::from_instant(Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap(), Zone::Utc)
    }

    #[test]
    fn month_and_year_bounds() {
        let min = at(2024, 3, 15);
        let max = at(2024, 9, 10);
        assert!(is_month_disabled(&at(2024, 2, 20), Some(&min), Some(&max)));
        assert!(!is_month_disabled(&at(2024, 3, 1), Some(&min), Some(&max)));
        assert!(!is_month_disabled(&at(2024, 9, 30), Some(&min), Some(&max)));
        assert!(is_month_disabled(&at(2024, 10, 1), Some(&min), Some(&max)));
        assert!(!is_month_disabled(&at(1900, 1, 1), None, None));

        assert!(is_year_disabled(&at(2023, 6, 1), Some(&min), None));
        assert!(!is_year_disabled(&at(2024, 12, 31), Some(&min), Some(&max)));
        assert!(is_year_disabled(&at(2025, 1, 1), None, Some(&max)));
    }

    #[test]
    fn arrows_for_multi_month_displays() {
        let page = |month_index, display_months| {
            arrow_visibility(&FlagOptions { month_index, display_months, ..FlagOptions::default() })
        };
        assert_eq!(page(0, 1), (false, false));
        assert_eq!(page(0, 3), (false, true));
        assert_eq!(page(1, 3), (true, true));
        assert_eq!(page(2, 3), (true, false));
    }

    #[test]
    fn rows_are_width_wide() {
        let cells: Vec<CalendarCell> = (0..7)
            .map(|i| CalendarCell { date: at(2024, 1, 1 + i), label: i.to_string(), flags: CellFlags::default() })
            .collect();
        let rows = into_rows(cells, 3);
        assert_eq!(rows.iter().map(Vec::len).collect::<Vec<_>>(), [3, 3, 1]);
    }
}
