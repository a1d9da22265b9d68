use chronos::{
    CalendarFormatOptions, CalendarView, Chronos, Context, DaysCalendarOptions, FlagOptions, Unit, calc_days_calendar,
    flag_days_calendar, format_days_calendar,
};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub struct ReportOptions {
    /// Extra pattern to render the value with.
    pub output: Option<String>,
    pub calendar: bool,
    pub color: bool,
}

pub fn print_report(input: &str, value: &Chronos, context: &Context, options: &ReportOptions) {
    let palette = ansi::Palette::new(options.color);
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Parsing: \"{}\"", input.trim()), ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Result ━━━", ansi::GRAY));
    print_result(value, options, &palette);

    println!("\n{}", palette.paint("━━━ Parsing Flags ━━━", ansi::GRAY));
    print_flags(value, &palette);

    if !value.is_valid() {
        println!();
        return;
    }

    println!("\n{}", palette.paint("━━━ Components ━━━", ansi::GRAY));
    print_components(value, &palette);

    println!("\n{}", palette.paint("━━━ Relative ━━━", ansi::GRAY));
    let now = Chronos::now(context).with_zone(value.zone());
    println!("  {} {}", palette.dim("from now:"), palette.paint(value.from_now(context, false), ansi::GREEN));
    println!("  {} {}", palette.dim("calendar:"), palette.paint(value.calendar(&now), ansi::GREEN));

    if options.calendar {
        println!("\n{}", palette.paint("━━━ Calendar ━━━", ansi::GRAY));
        print_calendar(value, &palette);
    }
    println!();
}

fn print_result(value: &Chronos, options: &ReportOptions, palette: &ansi::Palette) {
    let verdict =
        if value.is_valid() { palette.paint("✓ valid", ansi::GREEN) } else { palette.paint("✗ invalid", ansi::RED) };
    println!("  {}  {}", verdict, palette.bold(value.format(None)));
    if let Some(pattern) = &options.output {
        println!("  {} {}", palette.paint(pattern, ansi::BLUE), palette.bold(value.format(Some(pattern))));
    }
    if let Some(iso) = value.to_iso_string() {
        println!("  {} {}", palette.dim("iso:"), iso);
    }
    if let Some(millis) = value.value_of() {
        let zone = format!("{:?}", value.zone());
        println!("  {} {}  {} {}", palette.dim("ms:"), millis, palette.dim("zone:"), palette.dim(zone));
    }
}

fn print_flags(value: &Chronos, palette: &ansi::Palette) {
    let flags = value.parsing_flags();
    let set: Vec<&str> = flags.flags.iter_names().map(|(name, _)| name).collect();
    println!(
        "  {} {}",
        palette.dim("set:"),
        if set.is_empty() { palette.dim("none") } else { palette.paint(set.join(" | "), ansi::YELLOW) }
    );
    if let Some(unit) = flags.overflow {
        println!("  {} {}", palette.dim("overflow:"), palette.paint(format!("{unit:?}"), ansi::RED));
    }
    if !flags.unused_tokens.is_empty() {
        println!("  {} {}", palette.dim("unused tokens:"), palette.paint(flags.unused_tokens.join(" "), ansi::YELLOW));
    }
    if !flags.unused_input.is_empty() {
        let quoted: Vec<String> = flags.unused_input.iter().map(|piece| format!("{piece:?}")).collect();
        println!("  {} {}", palette.dim("unused input:"), palette.paint(quoted.join(" "), ansi::YELLOW));
    }
    if flags.chars_left_over > 0 {
        println!("  {} {}", palette.dim("chars left over:"), flags.chars_left_over);
    }
    if let Some(meridiem) = &flags.meridiem {
        println!("  {} {}", palette.dim("meridiem:"), meridiem);
    }
    if let Some(score) = flags.score {
        println!("  {} {}", palette.dim("candidate score:"), score);
    }
}

fn print_components(value: &Chronos, palette: &ansi::Palette) {
    let show = |unit: Unit| value.get(unit).map_or_else(|| "-".to_string(), |n| n.to_string());
    let row = |pairs: &[(&str, Unit)]| {
        pairs
            .iter()
            .map(|(label, unit)| {
                format!("{} {}", palette.dim(format!("{label}:")), palette.paint(show(*unit), ansi::BLUE))
            })
            .collect::<Vec<_>>()
            .join("  ")
    };

    println!("  {}", row(&[("year", Unit::Year), ("month", Unit::Month), ("date", Unit::Date), ("day", Unit::Day)]));
    println!(
        "  {}",
        row(&[("hour", Unit::Hour), ("minute", Unit::Minute), ("second", Unit::Second), ("ms", Unit::Millisecond)])
    );
    println!("  {}", row(&[("week", Unit::Week), ("week year", Unit::WeekYear), ("day of year", Unit::DayOfYear)]));
    println!("  {}", row(&[("iso week", Unit::IsoWeek), ("iso week year", Unit::IsoWeekYear)]));

    let opt = |n: Option<i64>| n.map_or_else(|| "-".to_string(), |n| n.to_string());
    println!(
        "  {} {}  {} {}  {} {}",
        palette.dim("weeks in year:"),
        opt(value.weeks_in_year()),
        palette.dim("days in month:"),
        opt(value.days_in_month()),
        palette.dim("utc offset:"),
        opt(value.utc_offset().map(i64::from)),
    );
}

fn print_calendar(value: &Chronos, palette: &ansi::Palette) {
    let matrix = calc_days_calendar(value, &DaysCalendarOptions::default());
    let view = format_days_calendar(&matrix, &CalendarFormatOptions::default());
    let flags = FlagOptions { selected_date: Some(value.clone()), ..FlagOptions::default() };
    let view = flag_days_calendar(&view, &flags);
    print_grid(&view, palette);
}

fn print_grid(view: &CalendarView, palette: &ansi::Palette) {
    println!("  {}", palette.bold(format!("{} {}", view.month_title, view.year_title)));
    let header: Vec<String> = view.weekdays.iter().map(|name| format!("{name:>4}")).collect();
    println!("  {} {}", palette.dim("   "), palette.dim(header.concat()));

    for (row, week) in view.rows.iter().zip(&view.week_numbers) {
        let cells: String = row
            .iter()
            .map(|cell| {
                let label = format!("{:>4}", cell.label);
                if cell.flags.is_selected {
                    palette.bold(palette.paint(label, ansi::GREEN))
                } else if cell.flags.is_other_month {
                    palette.dim(label)
                } else {
                    label
                }
            })
            .collect();
        println!("  {} {}", palette.paint(format!("{week:>3}"), ansi::GRAY), cells);
    }
}
