//! Month pages (the twelve months of a year) and year pages (sixteen years
//! around the viewed one).

use super::{
    ArrowState, CalendarCell, CalendarFormatOptions, CalendarView, CellFlags, FlagOptions, arrow_visibility, into_rows,
    is_month_disabled, is_year_disabled, reflag, same,
};
use crate::units::Grain;
use crate::value::Chronos;
use std::sync::Arc;

const MONTHS_WIDTH: usize = 3;
const MONTHS_HEIGHT: usize = 4;
const YEARS_WIDTH: usize = 4;
const YEARS_HEIGHT: usize = 4;

/// Cells of `count` consecutive `grain`s from `start`, labelled with
/// `pattern`.
fn cells(start: &Chronos, count: usize, grain: Grain, pattern: &str) -> Vec<CalendarCell> {
    (0..count)
        .map(|i| {
            let date = start.add(i as f64, grain);
            let label = date.format(Some(pattern));
            CalendarCell { date, label, flags: CellFlags::default() }
        })
        .collect()
}

fn localized(value: &Chronos, options: &CalendarFormatOptions) -> Chronos {
    match options.locale.as_deref() {
        Some(id) => value.with_locale(id),
        None => value.clone(),
    }
}

/// The twelve months of the viewed year, three per row.
pub fn format_months_calendar(view_date: &Chronos, options: &CalendarFormatOptions) -> CalendarView {
    let year = localized(view_date, options).start_of(Grain::Year);
    let cells = cells(&year, MONTHS_WIDTH * MONTHS_HEIGHT, Grain::Month, &options.month_label);
    CalendarView {
        month_title: String::new(),
        year_title: year.format(Some(&options.year_title)),
        month: year,
        week_numbers: Vec::new(),
        weekdays: Vec::new(),
        rows: into_rows(cells, MONTHS_WIDTH),
        arrows: ArrowState::default(),
    }
}

/// Sixteen years, four per row, starting seven years before the viewed one.
/// The title spans the first and last year shown.
pub fn format_years_calendar(view_date: &Chronos, options: &CalendarFormatOptions) -> CalendarView {
    let count = YEARS_WIDTH * YEARS_HEIGHT;
    let year = localized(view_date, options).start_of(Grain::Year);
    let first = year.subtract((count / 2 - 1) as f64, Grain::Year);
    let cells = cells(&first, count, Grain::Year, &options.year_label);
    let title = |cell: Option<&CalendarCell>| {
        cell.map(|c| c.date.format(Some(&options.year_title))).unwrap_or_default()
    };
    let year_title = format!("{} - {}", title(cells.first()), title(cells.last()));
    CalendarView {
        month_title: String::new(),
        year_title,
        month: year,
        week_numbers: Vec::new(),
        weekdays: Vec::new(),
        rows: into_rows(cells, YEARS_WIDTH),
        arrows: ArrowState::default(),
    }
}

/// Flags for a page whose cells each cover one `grain`.
fn flag_period(view: &CalendarView, options: &FlagOptions, grain: Grain) -> Vec<Vec<Arc<CalendarCell>>> {
    let min = options.min_date.as_ref();
    let max = options.max_date.as_ref();
    let range_start = options.selected_range.as_ref().map(|(start, _)| start);
    let range_end = options.selected_range.as_ref().and_then(|(_, end)| end.as_ref());
    let range_limit = range_end.or(options.hovered_date.as_ref());

    reflag(&view.rows, |cell| {
        let date = &cell.date;
        let is_selection_start = same(date, range_start, grain);
        let is_selection_end = same(date, range_end, grain);
        let is_in_range = match (range_start, range_limit) {
            (Some(start), Some(limit)) => date.is_after(start, grain) && date.is_before(limit, grain),
            _ => false,
        };
        let out_of_bounds = match grain {
            Grain::Year => is_year_disabled(date, min, max),
            _ => is_month_disabled(date, min, max),
        };
        CellFlags {
            is_other_month: false,
            is_disabled: options.is_disabled || out_of_bounds,
            is_hovered: same(date, options.hovered_date.as_ref(), grain),
            is_selected: same(date, options.selected_date.as_ref(), grain) || is_selection_start || is_selection_end,
            is_selection_start,
            is_selection_end,
            is_in_range,
        }
    })
}

fn flagged(view: &CalendarView, rows: Vec<Vec<Arc<CalendarCell>>>, arrows: ArrowState) -> CalendarView {
    CalendarView {
        month: view.month.clone(),
        month_title: view.month_title.clone(),
        year_title: view.year_title.clone(),
        week_numbers: Vec::new(),
        weekdays: Vec::new(),
        rows,
        arrows,
    }
}

pub fn flag_months_calendar(view: &CalendarView, options: &FlagOptions) -> CalendarView {
    let rows = flag_period(view, options, Grain::Month);
    let (min, max) = (options.min_date.as_ref(), options.max_date.as_ref());
    let (hide_left, hide_right) = arrow_visibility(options);
    let arrows = ArrowState {
        hide_left,
        hide_right,
        disable_left: is_year_disabled(&view.month.subtract(1.0, Grain::Year), min, max),
        disable_right: is_year_disabled(&view.month.add(1.0, Grain::Year), min, max),
    };
    flagged(view, rows, arrows)
}

pub fn flag_years_calendar(view: &CalendarView, options: &FlagOptions) -> CalendarView {
    let rows = flag_period(view, options, Grain::Year);
    let (min, max) = (options.min_date.as_ref(), options.max_date.as_ref());
    let (hide_left, hide_right) = arrow_visibility(options);
    let edge = |cell: Option<&Arc<CalendarCell>>, step: f64| {
        cell.is_some_and(|c| is_year_disabled(&c.date.add(step, Grain::Year), min, max))
    };
    let arrows = ArrowState {
        hide_left,
        hide_right,
        disable_left: edge(view.cells().next(), -1.0),
        disable_right: edge(view.cells().last(), 1.0),
    };
    flagged(view, rows, arrows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::get_locale;
    use crate::zone::Zone;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn at(y: i32, m: u32, d: u32) -> Chronos {
        Chronos::from_instant(Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap(), Zone::Utc)
            .with_locale_data(get_locale("en").unwrap())
    }

    proptest! {
        #[test]
        fn months_page_covers_the_viewed_year(year in 1900i32..2100, month in 1u32..=12, day in 1u32..=28) {
            let view = format_months_calendar(&at(year, month, day), &CalendarFormatOptions::default());
            prop_assert_eq!(view.rows.len(), 4);
            prop_assert!(view.rows.iter().all(|row| row.len() == 3));
            for (i, cell) in view.cells().enumerate() {
                prop_assert_eq!(cell.date.year(), Some(i64::from(year)));
                prop_assert_eq!(cell.date.month(), Some(i as i64));
                prop_assert_eq!(cell.date.date(), Some(1));
            }
        }

        #[test]
        fn years_page_is_sixteen_consecutive_years(year in 1900i32..2100, month in 1u32..=12) {
            let view = format_years_calendar(&at(year, month, 10), &CalendarFormatOptions::default());
            prop_assert_eq!(view.rows.len(), 4);
            prop_assert!(view.rows.iter().all(|row| row.len() == 4));
            let first = i64::from(year) - 7;
            for (i, cell) in view.cells().enumerate() {
                prop_assert_eq!(cell.date.year(), Some(first + i as i64));
                prop_assert_eq!((cell.date.month(), cell.date.date()), (Some(0), Some(1)));
                prop_assert_eq!(&cell.label, &(first + i as i64).to_string());
            }
            prop_assert_eq!(view.year_title, format!("{} - {}", first, first + 15));
        }
    }

    #[test]
    fn months_page() {
        let view = format_months_calendar(&at(2024, 5, 17), &CalendarFormatOptions::default());
        assert_eq!(view.year_title, "2024");
        assert_eq!(view.rows.len(), 4);
        assert!(view.rows.iter().all(|row| row.len() == 3));
        assert_eq!(view.rows[0][0].label, "January");
        assert_eq!(view.rows[3][2].label, "December");

        let options = FlagOptions {
            min_date: Some(at(2024, 3, 10)),
            max_date: Some(at(2024, 10, 1)),
            selected_date: Some(at(2024, 5, 17)),
            ..FlagOptions::default()
        };
        let flagged = flag_months_calendar(&view, &options);
        let flags: Vec<CellFlags> = flagged.cells().map(|c| c.flags).collect();
        assert!(flags[1].is_disabled);
        assert!(!flags[2].is_disabled);
        assert!(!flags[9].is_disabled);
        assert!(flags[10].is_disabled);
        assert!(flags[4].is_selected);
        assert!(flagged.arrows.disable_left);
        assert!(flagged.arrows.disable_right);
    }

    #[test]
    fn years_page() {
        let view = format_years_calendar(&at(2024, 5, 17), &CalendarFormatOptions::default());
        assert_eq!(view.year_title, "2017 - 2032");
        assert_eq!(view.rows.len(), 4);
        assert_eq!(view.rows[1][3].label, "2024");

        let options = FlagOptions {
            min_date: Some(at(2020, 6, 1)),
            selected_range: Some((at(2021, 1, 1), Some(at(2024, 1, 1)))),
            ..FlagOptions::default()
        };
        let flagged = flag_years_calendar(&view, &options);
        let flags: Vec<CellFlags> = flagged.cells().map(|c| c.flags).collect();
        assert!(flags[2].is_disabled);
        assert!(!flags[3].is_disabled);
        assert!(flags[4].is_selection_start);
        assert!(flags[5].is_in_range && flags[6].is_in_range);
        assert!(flags[7].is_selection_end && !flags[7].is_in_range);
        assert!(flagged.arrows.disable_left);
        assert!(!flagged.arrows.disable_right);
    }
}
