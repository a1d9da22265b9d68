use super::{
    CalendarPhrase, CalendarPhrases, LocaleDef, LongDateFormat, NameTable, Phrase, RelativeKey, RelativeTime,
    WeekRule, WrapPhrase,
};

/// Phrases whose article changes between "in ..." (dative) and the bare form.
fn process_relative_time(number: i64, without_suffix: bool, key: RelativeKey, _is_future: bool) -> String {
    let (bare, dative) = match key {
        RelativeKey::Minute => ("eine Minute".to_string(), "einer Minute".to_string()),
        RelativeKey::Hour => ("eine Stunde".to_string(), "einer Stunde".to_string()),
        RelativeKey::Day => ("ein Tag".to_string(), "einem Tag".to_string()),
        RelativeKey::Days => (format!("{number} Tage"), format!("{number} Tagen")),
        RelativeKey::Week => ("eine Woche".to_string(), "einer Woche".to_string()),
        RelativeKey::Month => ("ein Monat".to_string(), "einem Monat".to_string()),
        RelativeKey::Months => (format!("{number} Monate"), format!("{number} Monaten")),
        RelativeKey::Year => ("ein Jahr".to_string(), "einem Jahr".to_string()),
        RelativeKey::Years => (format!("{number} Jahre"), format!("{number} Jahren")),
        _ => return number.to_string(),
    };
    if without_suffix { bare } else { dative }
}

fn ordinal(number: i64, _token: &str) -> String {
    format!("{number}.")
}

fn cal(s: &str) -> CalendarPhrase {
    CalendarPhrase::Literal(s.to_string())
}

pub(super) fn definition() -> LocaleDef {
    let computed = Phrase::Computed(process_relative_time);
    LocaleDef {
        months: Some(NameTable::plain(
            "Januar_Februar_März_April_Mai_Juni_Juli_August_September_Oktober_November_Dezember",
        )),
        months_short: Some(NameTable::plain("Jan._Feb._März_Apr._Mai_Juni_Juli_Aug._Sep._Okt._Nov._Dez.")),
        weekdays: Some(NameTable::plain("Sonntag_Montag_Dienstag_Mittwoch_Donnerstag_Freitag_Samstag")),
        weekdays_short: Some(NameTable::plain("So._Mo._Di._Mi._Do._Fr._Sa.")),
        weekdays_min: Some(NameTable::plain("So_Mo_Di_Mi_Do_Fr_Sa")),
        long_date_format: Some(LongDateFormat {
            lt: "HH:mm".to_string(),
            lts: "HH:mm:ss".to_string(),
            l: "DD.MM.YYYY".to_string(),
            ll: "D. MMMM YYYY".to_string(),
            lll: "D. MMMM YYYY HH:mm".to_string(),
            llll: "dddd, D. MMMM YYYY HH:mm".to_string(),
        }),
        calendar: Some(CalendarPhrases {
            same_day: cal("[heute um] LT [Uhr]"),
            next_day: cal("[morgen um] LT [Uhr]"),
            next_week: cal("dddd [um] LT [Uhr]"),
            last_day: cal("[gestern um] LT [Uhr]"),
            last_week: cal("[letzten] dddd [um] LT [Uhr]"),
            same_else: cal("L"),
        }),
        relative_time: Some(RelativeTime {
            future: WrapPhrase::Literal("in %s".to_string()),
            past: WrapPhrase::Literal("vor %s".to_string()),
            few_seconds: Phrase::Literal("ein paar Sekunden".to_string()),
            seconds: Phrase::Literal("%d Sekunden".to_string()),
            minute: computed.clone(),
            minutes: Phrase::Literal("%d Minuten".to_string()),
            hour: computed.clone(),
            hours: Phrase::Literal("%d Stunden".to_string()),
            day: computed.clone(),
            days: computed.clone(),
            week: computed.clone(),
            weeks: Phrase::Literal("%d Wochen".to_string()),
            month: computed.clone(),
            months: computed.clone(),
            year: computed.clone(),
            years: computed,
        }),
        ordinal: Some(ordinal),
        day_of_month_ordinal_parse: Some(r"\d{1,2}\.".to_string()),
        week: Some(WeekRule::ISO),
        invalid_date: Some("Ungültiges Datum".to_string()),
        ..LocaleDef::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn german_relative_phrases_switch_case() {
        assert_eq!(process_relative_time(1, true, RelativeKey::Day, false), "ein Tag");
        assert_eq!(process_relative_time(1, false, RelativeKey::Day, false), "einem Tag");
        assert_eq!(process_relative_time(3, false, RelativeKey::Years, true), "3 Jahren");
    }
}
