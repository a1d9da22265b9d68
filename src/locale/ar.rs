use super::{
    CalendarPhrase, CalendarPhrases, LocaleDef, LongDateFormat, NameTable, Phrase, RelativeTime, WeekRule,
    WrapPhrase,
};

const ARABIC_DIGITS: [char; 10] = ['٠', '١', '٢', '٣', '٤', '٥', '٦', '٧', '٨', '٩'];

/// Arabic-Indic digits to ASCII and the Arabic comma to `,`.
fn preparse(text: &str) -> String {
    text.chars()
        .map(|c| match ARABIC_DIGITS.iter().position(|&d| d == c) {
            Some(i) => char::from(b'0' + i as u8),
            None if c == '،' => ',',
            None => c,
        })
        .collect()
}

fn postformat(text: &str) -> String {
    text.chars()
        .map(|c| match c.to_digit(10) {
            Some(d) if c.is_ascii_digit() => ARABIC_DIGITS[d as usize],
            _ if c == ',' => '،',
            _ => c,
        })
        .collect()
}

fn ordinal(number: i64, _token: &str) -> String {
    number.to_string()
}

fn meridiem(hour: u32, _minute: u32, _lower: bool) -> String {
    if hour < 12 { "ص" } else { "م" }.to_string()
}

fn is_pm(text: &str) -> bool {
    text == "م"
}

fn lit(s: &str) -> Phrase {
    Phrase::Literal(s.to_string())
}

fn cal(s: &str) -> CalendarPhrase {
    CalendarPhrase::Literal(s.to_string())
}

pub(super) fn definition() -> LocaleDef {
    LocaleDef {
        months: Some(NameTable::plain(
            "يناير_فبراير_مارس_أبريل_مايو_يونيو_يوليو_أغسطس_سبتمبر_أكتوبر_نوفمبر_ديسمبر",
        )),
        months_short: Some(NameTable::plain(
            "يناير_فبراير_مارس_أبريل_مايو_يونيو_يوليو_أغسطس_سبتمبر_أكتوبر_نوفمبر_ديسمبر",
        )),
        weekdays: Some(NameTable::plain("الأحد_الإثنين_الثلاثاء_الأربعاء_الخميس_الجمعة_السبت")),
        weekdays_short: Some(NameTable::plain("أحد_إثنين_ثلاثاء_أربعاء_خميس_جمعة_سبت")),
        weekdays_min: Some(NameTable::plain("ح_ن_ث_ر_خ_ج_س")),
        long_date_format: Some(LongDateFormat {
            lt: "HH:mm".to_string(),
            lts: "HH:mm:ss".to_string(),
            l: "DD/MM/YYYY".to_string(),
            ll: "D MMMM YYYY".to_string(),
            lll: "D MMMM YYYY HH:mm".to_string(),
            llll: "dddd D MMMM YYYY HH:mm".to_string(),
        }),
        calendar: Some(CalendarPhrases {
            same_day: cal("[اليوم عند الساعة] LT"),
            next_day: cal("[غدًا عند الساعة] LT"),
            next_week: cal("dddd [عند الساعة] LT"),
            last_day: cal("[أمس عند الساعة] LT"),
            last_week: cal("dddd [عند الساعة] LT"),
            same_else: cal("L"),
        }),
        relative_time: Some(RelativeTime {
            future: WrapPhrase::Literal("بعد %s".to_string()),
            past: WrapPhrase::Literal("منذ %s".to_string()),
            few_seconds: lit("ثوان"),
            seconds: lit("%d ثانية"),
            minute: lit("دقيقة"),
            minutes: lit("%d دقائق"),
            hour: lit("ساعة"),
            hours: lit("%d ساعات"),
            day: lit("يوم"),
            days: lit("%d أيام"),
            week: lit("أسبوع"),
            weeks: lit("%d أسابيع"),
            month: lit("شهر"),
            months: lit("%d أشهر"),
            year: lit("سنة"),
            years: lit("%d سنوات"),
        }),
        day_of_month_ordinal_parse: Some(r"\d{1,2}".to_string()),
        ordinal: Some(ordinal),
        meridiem: Some(meridiem),
        meridiem_parse: Some("ص|م".to_string()),
        is_pm: Some(is_pm),
        week: Some(WeekRule { dow: 0, doy: 6 }),
        preparse: Some(preparse),
        postformat: Some(postformat),
        ..LocaleDef::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_are_transliterated_both_ways() {
        assert_eq!(postformat("2017, 10:05"), "٢٠١٧، ١٠:٠٥");
        assert_eq!(preparse("٢٠١٧، ١٠:٠٥"), "2017, 10:05");
    }

    #[test]
    fn arabic_meridiem() {
        assert_eq!(meridiem(9, 0, false), "ص");
        assert!(is_pm("م"));
        assert!(!is_pm("ص"));
    }
}
