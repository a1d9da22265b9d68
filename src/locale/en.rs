//! English: the base locale every other locale is layered over.

use super::{
    CalendarPhrase, CalendarPhrases, Locale, LocaleDef, LongDateFormat, NameTable, ParseRegexes, Phrase,
    RelativeTime, WeekRule, WrapPhrase, identity,
};

fn lit(s: &str) -> Phrase {
    Phrase::Literal(s.to_string())
}

fn cal(s: &str) -> CalendarPhrase {
    CalendarPhrase::Literal(s.to_string())
}

fn ordinal(number: i64, _token: &str) -> String {
    let b = number % 10;
    let suffix = if (number % 100) / 10 == 1 {
        "th"
    } else {
        match b {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        }
    };
    format!("{number}{suffix}")
}

fn meridiem(hour: u32, _minute: u32, lower: bool) -> String {
    let text = if hour > 11 { "PM" } else { "AM" };
    if lower { text.to_lowercase() } else { text.to_string() }
}

fn is_pm(text: &str) -> bool {
    text.to_lowercase().starts_with('p')
}

pub(super) fn locale() -> Locale {
    Locale {
        abbr: "en".to_string(),
        parent: None,
        months: NameTable::plain(
            "January_February_March_April_May_June_July_August_September_October_November_December",
        ),
        months_short: NameTable::plain("Jan_Feb_Mar_Apr_May_Jun_Jul_Aug_Sep_Oct_Nov_Dec"),
        weekdays: NameTable::plain("Sunday_Monday_Tuesday_Wednesday_Thursday_Friday_Saturday"),
        weekdays_short: NameTable::plain("Sun_Mon_Tue_Wed_Thu_Fri_Sat"),
        weekdays_min: NameTable::plain("Su_Mo_Tu_We_Th_Fr_Sa"),
        long_date_format: LongDateFormat {
            lt: "h:mm A".to_string(),
            lts: "h:mm:ss A".to_string(),
            l: "MM/DD/YYYY".to_string(),
            ll: "MMMM D, YYYY".to_string(),
            lll: "MMMM D, YYYY h:mm A".to_string(),
            llll: "dddd, MMMM D, YYYY h:mm A".to_string(),
        },
        calendar: CalendarPhrases {
            same_day: cal("[Today at] LT"),
            next_day: cal("[Tomorrow at] LT"),
            next_week: cal("dddd [at] LT"),
            last_day: cal("[Yesterday at] LT"),
            last_week: cal("[Last] dddd [at] LT"),
            same_else: cal("L"),
        },
        relative_time: RelativeTime {
            future: WrapPhrase::Literal("in %s".to_string()),
            past: WrapPhrase::Literal("%s ago".to_string()),
            few_seconds: lit("a few seconds"),
            seconds: lit("%d seconds"),
            minute: lit("a minute"),
            minutes: lit("%d minutes"),
            hour: lit("an hour"),
            hours: lit("%d hours"),
            day: lit("a day"),
            days: lit("%d days"),
            week: lit("a week"),
            weeks: lit("%d weeks"),
            month: lit("a month"),
            months: lit("%d months"),
            year: lit("a year"),
            years: lit("%d years"),
        },
        ordinal,
        day_of_month_ordinal_parse: r"\d{1,2}(th|st|nd|rd)".to_string(),
        meridiem,
        meridiem_parse: r"[ap]\.?m?\.?".to_string(),
        is_pm,
        week: WeekRule { dow: 0, doy: 6 },
        invalid_date: "Invalid date".to_string(),
        preparse: identity,
        postformat: identity,
        regexes: ParseRegexes::default(),
    }
}

pub(super) fn en_gb() -> LocaleDef {
    LocaleDef {
        long_date_format: Some(LongDateFormat {
            lt: "HH:mm".to_string(),
            lts: "HH:mm:ss".to_string(),
            l: "DD/MM/YYYY".to_string(),
            ll: "D MMMM YYYY".to_string(),
            lll: "D MMMM YYYY HH:mm".to_string(),
            llll: "dddd, D MMMM YYYY HH:mm".to_string(),
        }),
        week: Some(WeekRule::ISO),
        ..LocaleDef::default()
    }
}
