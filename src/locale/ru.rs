use super::{
    CalendarPhrase, CalendarPhrases, LocaleDef, LongDateFormat, NameTable, Phrase, RelativeKey, RelativeTime,
    WeekRule, WrapPhrase,
};
use crate::{Chronos, Unit};

/// Pick one of three forms `"one_few_many"` for `n`.
fn plural(forms: &str, n: i64) -> String {
    let forms: Vec<&str> = forms.split('_').collect();
    let idx = if n % 10 == 1 && n % 100 != 11 {
        0
    } else if (2..=4).contains(&(n % 10)) && (n % 100 < 10 || n % 100 >= 20) {
        1
    } else {
        2
    };
    forms.get(idx).copied().unwrap_or_default().to_string()
}

fn relative_time_with_plural(number: i64, without_suffix: bool, key: RelativeKey, _is_future: bool) -> String {
    let forms = match key {
        RelativeKey::Minute => return if without_suffix { "минута" } else { "минуту" }.to_string(),
        RelativeKey::Seconds if without_suffix => "секунда_секунды_секунд",
        RelativeKey::Seconds => "секунду_секунды_секунд",
        RelativeKey::Minutes if without_suffix => "минута_минуты_минут",
        RelativeKey::Minutes => "минуту_минуты_минут",
        RelativeKey::Hours => "час_часа_часов",
        RelativeKey::Days => "день_дня_дней",
        RelativeKey::Weeks => "неделя_недели_недель",
        RelativeKey::Months => "месяц_месяца_месяцев",
        RelativeKey::Years => "год_года_лет",
        _ => return number.to_string(),
    };
    format!("{number} {}", plural(forms, number))
}

fn ordinal(number: i64, token: &str) -> String {
    match token {
        "M" | "d" | "DDD" => format!("{number}-й"),
        "D" => format!("{number}-го"),
        "w" | "W" => format!("{number}-я"),
        _ => number.to_string(),
    }
}

fn meridiem(hour: u32, _minute: u32, _lower: bool) -> String {
    match hour {
        0..=3 => "ночи",
        4..=11 => "утра",
        12..=16 => "дня",
        _ => "вечера",
    }
    .to_string()
}

fn is_pm(text: &str) -> bool {
    matches!(text.to_lowercase().as_str(), "дня" | "вечера")
}

/// Gendered "next <weekday>" wording; same-week days drop the adjective.
fn next_week(value: &Chronos, now: &Chronos) -> String {
    if value.get(Unit::Week) != now.get(Unit::Week) {
        match value.get(Unit::Day) {
            Some(0) => "[В следующее] dddd, [в] LT",
            Some(1 | 2 | 4) => "[В следующий] dddd, [в] LT",
            _ => "[В следующую] dddd, [в] LT",
        }
        .to_string()
    } else if value.get(Unit::Day) == Some(2) {
        "[Во] dddd, [в] LT".to_string()
    } else {
        "[В] dddd, [в] LT".to_string()
    }
}

fn last_week(value: &Chronos, now: &Chronos) -> String {
    if value.get(Unit::Week) != now.get(Unit::Week) {
        match value.get(Unit::Day) {
            Some(0) => "[В прошлое] dddd, [в] LT",
            Some(1 | 2 | 4) => "[В прошлый] dddd, [в] LT",
            _ => "[В прошлую] dddd, [в] LT",
        }
        .to_string()
    } else if value.get(Unit::Day) == Some(2) {
        "[Во] dddd, [в] LT".to_string()
    } else {
        "[В] dddd, [в] LT".to_string()
    }
}

fn cal(s: &str) -> CalendarPhrase {
    CalendarPhrase::Literal(s.to_string())
}

pub(super) fn definition() -> LocaleDef {
    let computed = Phrase::Computed(relative_time_with_plural);
    LocaleDef {
        months: Some(NameTable::variants(
            "января_февраля_марта_апреля_мая_июня_июля_августа_сентября_октября_ноября_декабря",
            "январь_февраль_март_апрель_май_июнь_июль_август_сентябрь_октябрь_ноябрь_декабрь",
            None,
        )),
        months_short: Some(NameTable::variants(
            "янв._февр._мар._апр._мая_июня_июля_авг._сент._окт._нояб._дек.",
            "янв._февр._март_апр._май_июнь_июль_авг._сент._окт._нояб._дек.",
            None,
        )),
        weekdays: Some(NameTable::variants(
            "воскресенье_понедельник_вторник_среду_четверг_пятницу_субботу",
            "воскресенье_понедельник_вторник_среда_четверг_пятница_суббота",
            Some(crate::regex!(r"\[ ?[Вв] ?(?:прошлую|следующую|эту)? ?\] ?dddd")),
        )),
        weekdays_short: Some(NameTable::plain("вс_пн_вт_ср_чт_пт_сб")),
        weekdays_min: Some(NameTable::plain("вс_пн_вт_ср_чт_пт_сб")),
        long_date_format: Some(LongDateFormat {
            lt: "H:mm".to_string(),
            lts: "H:mm:ss".to_string(),
            l: "DD.MM.YYYY".to_string(),
            ll: "D MMMM YYYY г.".to_string(),
            lll: "D MMMM YYYY г., H:mm".to_string(),
            llll: "dddd, D MMMM YYYY г., H:mm".to_string(),
        }),
        calendar: Some(CalendarPhrases {
            same_day: cal("[Сегодня, в] LT"),
            next_day: cal("[Завтра, в] LT"),
            next_week: CalendarPhrase::Computed(next_week),
            last_day: cal("[Вчера, в] LT"),
            last_week: CalendarPhrase::Computed(last_week),
            same_else: cal("L"),
        }),
        relative_time: Some(RelativeTime {
            future: WrapPhrase::Literal("через %s".to_string()),
            past: WrapPhrase::Literal("%s назад".to_string()),
            few_seconds: Phrase::Literal("несколько секунд".to_string()),
            seconds: computed.clone(),
            minute: computed.clone(),
            minutes: computed.clone(),
            hour: Phrase::Literal("час".to_string()),
            hours: computed.clone(),
            day: Phrase::Literal("день".to_string()),
            days: computed.clone(),
            week: Phrase::Literal("неделя".to_string()),
            weeks: computed.clone(),
            month: Phrase::Literal("месяц".to_string()),
            months: computed.clone(),
            year: Phrase::Literal("год".to_string()),
            years: computed,
        }),
        ordinal: Some(ordinal),
        day_of_month_ordinal_parse: Some(r"\d{1,2}-(й|го|я)".to_string()),
        meridiem: Some(meridiem),
        meridiem_parse: Some("ночи|утра|дня|вечера".to_string()),
        is_pm: Some(is_pm),
        week: Some(WeekRule::ISO),
        invalid_date: Some("Неверная дата".to_string()),
        ..LocaleDef::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn russian_plurals() {
        let cases = [
            (1, "1 день"),
            (2, "2 дня"),
            (5, "5 дней"),
            (11, "11 дней"),
            (21, "21 день"),
            (22, "22 дня"),
            (112, "112 дней"),
        ];
        for (n, expected) in cases {
            assert_eq!(relative_time_with_plural(n, true, RelativeKey::Days, false), expected);
        }
        assert_eq!(relative_time_with_plural(1, false, RelativeKey::Minute, true), "минуту");
    }

    #[test]
    fn russian_meridiem_buckets() {
        assert_eq!(meridiem(2, 0, false), "ночи");
        assert_eq!(meridiem(9, 0, false), "утра");
        assert_eq!(meridiem(13, 0, false), "дня");
        assert_eq!(meridiem(20, 0, false), "вечера");
        assert!(is_pm("Вечера"));
    }
}
