//! Day pages: a month laid out in weeks, padded with the neighbouring
//! months' days to fill the grid.

use super::{
    ArrowState, CalendarCell, CalendarFormatOptions, CalendarView, CellFlags, FlagOptions, arrow_visibility, into_rows,
    is_month_disabled, is_outside_bounds, reflag, same,
};
use crate::units::Grain;
use crate::value::Chronos;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaysCalendarOptions {
    pub width: usize,
    pub height: usize,
    /// Sunday = 0. The anchor's locale decides when unset.
    pub first_day_of_week: Option<u32>,
}

impl Default for DaysCalendarOptions {
    fn default() -> Self {
        DaysCalendarOptions { width: 7, height: 6, first_day_of_week: None }
    }
}

/// The days of one month page, row by row.
#[derive(Debug, Clone)]
pub struct DaysMatrix {
    /// First instant of the month shown.
    pub month: Chronos,
    pub days: Vec<Vec<Chronos>>,
}

/// Grid of `width × height` consecutive days whose first cell is the first
/// day of the week containing the 1st of the anchor's month.
pub fn calc_days_calendar(anchor: &Chronos, options: &DaysCalendarOptions) -> DaysMatrix {
    let month = anchor.start_of(Grain::Month);
    let first_day = i64::from(options.first_day_of_week.unwrap_or_else(|| anchor.locale().first_day_of_week()));
    let back = (month.day().unwrap_or(0) - first_day).rem_euclid(7);
    let start = month.subtract(back as f64, Grain::Day);
    let width = options.width.max(1);

    let days = (0..options.height)
        .map(|row| (0..width).map(|col| start.add((row * width + col) as f64, Grain::Day)).collect())
        .collect();
    DaysMatrix { month, days }
}

/// Titles, week numbers, weekday headers and labels for a day page.
pub fn format_days_calendar(matrix: &DaysMatrix, options: &CalendarFormatOptions) -> CalendarView {
    let localize = |value: &Chronos| match options.locale.as_deref() {
        Some(id) => value.with_locale(id),
        None => value.clone(),
    };
    let month = localize(&matrix.month);

    let week_numbers = matrix
        .days
        .iter()
        .map(|week| week.first().map(|day| localize(day).format(Some(&options.week_numbers))).unwrap_or_default())
        .collect();
    let first_weekday = matrix.days.first().and_then(|week| week.first()).and_then(Chronos::day).unwrap_or(0);
    let weekdays = (0..7)
        .map(|i| month.locale().weekday_short_name(((first_weekday + i) % 7) as usize).to_string())
        .collect();

    let width = matrix.days.first().map_or(7, Vec::len);
    let cells = matrix
        .days
        .iter()
        .flatten()
        .map(|day| {
            let date = localize(day);
            let label = date.format(Some(&options.day_label));
            CalendarCell { date, label, flags: CellFlags::default() }
        })
        .collect();

    CalendarView {
        month_title: month.format(Some(&options.month_title)),
        year_title: month.format(Some(&options.year_title)),
        month,
        week_numbers,
        weekdays,
        rows: into_rows(cells, width),
        arrows: ArrowState::default(),
    }
}

/// Selection, hover, range and disabled state of every day on the page.
pub fn flag_days_calendar(view: &CalendarView, options: &FlagOptions) -> CalendarView {
    let month = &view.month;
    let min = options.min_date.as_ref();
    let max = options.max_date.as_ref();
    let range_start = options.selected_range.as_ref().map(|(start, _)| start);
    let range_end = options.selected_range.as_ref().and_then(|(_, end)| end.as_ref());
    // An open range reaches to the hovered day.
    let range_limit = range_end.or(options.hovered_date.as_ref());

    let rows = reflag(&view.rows, |cell| {
        let date = &cell.date;
        let is_other_month = !date.is_same(month, Grain::Month);
        let in_month = |other: Option<&Chronos>| !is_other_month && same(date, other, Grain::Day);
        let is_selection_start = in_month(range_start);
        let is_selection_end = in_month(range_end);
        let is_in_range = !is_other_month
            && match (range_start, range_limit) {
                (Some(start), Some(limit)) => date.is_after(start, Grain::Day) && date.is_before(limit, Grain::Day),
                _ => false,
            };
        let weekday_disabled = date.day().is_some_and(|day| options.days_disabled.contains(&day));
        let date_disabled = options.dates_disabled.iter().any(|disabled| date.is_same(disabled, Grain::Day));

        CellFlags {
            is_other_month,
            is_disabled: options.is_disabled || is_outside_bounds(date, min, max) || weekday_disabled || date_disabled,
            is_hovered: in_month(options.hovered_date.as_ref()),
            is_selected: in_month(options.selected_date.as_ref()) || is_selection_start || is_selection_end,
            is_selection_start,
            is_selection_end,
            is_in_range,
        }
    });

    let (hide_left, hide_right) = arrow_visibility(options);
    let arrows = ArrowState {
        hide_left,
        hide_right,
        disable_left: is_month_disabled(&month.subtract(1.0, Grain::Month), min, max),
        disable_right: is_month_disabled(&month.add(1.0, Grain::Month), min, max),
    };
    tracing::trace!(month = %view.month_title, ?arrows, "flagged day page");

    CalendarView {
        month: view.month.clone(),
        month_title: view.month_title.clone(),
        year_title: view.year_title.clone(),
        week_numbers: view.week_numbers.clone(),
        weekdays: view.weekdays.clone(),
        rows,
        arrows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::get_locale;
    use crate::zone::Zone;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;
    use std::sync::Arc;

    fn at(y: i32, m: u32, d: u32) -> Chronos {
        Chronos::from_instant(Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap(), Zone::Utc)
            .with_locale_data(get_locale("en").unwrap())
    }

    fn february_2024() -> CalendarView {
        let matrix = calc_days_calendar(&at(2024, 2, 14), &DaysCalendarOptions::default());
        format_days_calendar(&matrix, &CalendarFormatOptions::default())
    }

    fn label_flags(view: &CalendarView, label: &str) -> CellFlags {
        view.cells().skip_while(|c| c.label != "1").find(|c| c.label == label).map(|c| c.flags).unwrap()
    }

    proptest! {
        #[test]
        fn matrix_is_full_and_increasing(year in 1900i32..2100, month in 1u32..=12, first_day in 0u32..7) {
            let options = DaysCalendarOptions { first_day_of_week: Some(first_day), ..DaysCalendarOptions::default() };
            let matrix = calc_days_calendar(&at(year, month, 10), &options);
            prop_assert_eq!(matrix.days.len(), 6);
            prop_assert!(matrix.days.iter().all(|week| week.len() == 7));

            let cells: Vec<i64> = matrix.days.iter().flatten().filter_map(Chronos::value_of).collect();
            prop_assert_eq!(cells.len(), 42);
            prop_assert!(cells.windows(2).all(|pair| pair[0] < pair[1]));
            prop_assert_eq!(matrix.days[0][0].day(), Some(i64::from(first_day)));
            prop_assert!(matrix.days[0].iter().any(|day| day.date() == Some(1)));
        }
    }

    #[test]
    fn february_page() {
        let view = february_2024();
        assert_eq!(view.month_title, "February");
        assert_eq!(view.year_title, "2024");
        assert_eq!(view.weekdays, ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]);
        assert_eq!(view.week_numbers[0], "5");
        let labels: Vec<&str> = view.rows[0].iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["28", "29", "30", "31", "1", "2", "3"]);
    }

    #[test]
    fn locale_decides_the_first_day() {
        let options = CalendarFormatOptions { locale: Some("de".into()), ..CalendarFormatOptions::default() };
        let anchor = at(2024, 2, 14).with_locale("de");
        let view = format_days_calendar(&calc_days_calendar(&anchor, &DaysCalendarOptions::default()), &options);
        assert_eq!(view.month_title, "Februar");
        assert_eq!(view.weekdays[0], "Mo.");
        assert_eq!(view.rows[0][0].label, "29");
    }

    #[test]
    fn selection_and_range_flags() {
        let view = february_2024();
        let options = FlagOptions {
            selected_range: Some((at(2024, 2, 5), Some(at(2024, 2, 8)))),
            hovered_date: Some(at(2024, 2, 20)),
            ..FlagOptions::default()
        };
        let flagged = flag_days_calendar(&view, &options);
        assert!(label_flags(&flagged, "5").is_selection_start);
        assert!(label_flags(&flagged, "5").is_selected);
        assert!(!label_flags(&flagged, "5").is_in_range);
        assert!(label_flags(&flagged, "6").is_in_range);
        assert!(label_flags(&flagged, "7").is_in_range);
        assert!(label_flags(&flagged, "8").is_selection_end);
        assert!(!label_flags(&flagged, "8").is_in_range);
        assert!(label_flags(&flagged, "20").is_hovered);
        assert!(flagged.rows[0][0].flags.is_other_month);

        let open = FlagOptions { selected_range: Some((at(2024, 2, 5), None)), ..options };
        let flagged = flag_days_calendar(&view, &open);
        assert!(label_flags(&flagged, "19").is_in_range);
        assert!(!label_flags(&flagged, "20").is_in_range);
    }

    #[test]
    fn disabled_days_and_arrows() {
        let view = february_2024();
        let options = FlagOptions {
            min_date: Some(at(2024, 2, 3)),
            max_date: Some(at(2024, 3, 10)),
            days_disabled: vec![0],
            dates_disabled: vec![at(2024, 2, 14)],
            ..FlagOptions::default()
        };
        let flagged = flag_days_calendar(&view, &options);
        assert!(label_flags(&flagged, "2").is_disabled);
        assert!(!label_flags(&flagged, "3").is_disabled);
        assert!(label_flags(&flagged, "4").is_disabled);
        assert!(label_flags(&flagged, "14").is_disabled);
        assert!(!label_flags(&flagged, "15").is_disabled);
        assert!(flagged.arrows.disable_left);
        assert!(!flagged.arrows.disable_right);
    }

    #[test]
    fn unchanged_cells_keep_their_allocation() {
        let view = february_2024();
        let selecting = |date| FlagOptions { selected_date: Some(date), ..FlagOptions::default() };
        let first = flag_days_calendar(&view, &selecting(at(2024, 2, 10)));
        let second = flag_days_calendar(&first, &selecting(at(2024, 2, 12)));
        let replaced = first.cells().zip(second.cells()).filter(|(a, b)| !Arc::ptr_eq(a, b)).count();
        assert_eq!(replaced, 2);
    }
}
