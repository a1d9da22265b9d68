use chrono::{DateTime, Duration, Local, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};

/// How an instant is viewed as civil (wall-clock) time.
///
/// There is no timezone database here: `Local` asks the host clock for its
/// offset at the instant in question, `Fixed` carries a constant offset in
/// minutes east of UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Zone {
    #[default]
    Local,
    Utc,
    Fixed(i32),
}

impl Zone {
    pub fn from_utc_flag(utc: bool) -> Self {
        if utc { Zone::Utc } else { Zone::Local }
    }

    pub fn is_utc(self) -> bool {
        matches!(self, Zone::Utc)
    }

    /// Offset in minutes east of UTC at `instant`.
    pub fn offset_minutes(self, instant: &DateTime<Utc>) -> i32 {
        match self {
            Zone::Utc => 0,
            Zone::Fixed(minutes) => minutes,
            Zone::Local => Local.offset_from_utc_datetime(&instant.naive_utc()).fix().local_minus_utc() / 60,
        }
    }

    pub fn to_civil(self, instant: &DateTime<Utc>) -> NaiveDateTime {
        let offset = Duration::minutes(i64::from(self.offset_minutes(instant)));
        let naive = instant.naive_utc();
        naive.checked_add_signed(offset).unwrap_or(naive)
    }

    /// Map wall-clock time back to an instant. A local time that falls in a
    /// daylight-saving gap is moved forward by an hour; an ambiguous one picks
    /// the earlier instant.
    pub fn from_civil(self, civil: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            Zone::Utc => Some(Utc.from_utc_datetime(&civil)),
            Zone::Fixed(minutes) => {
                let naive = civil.checked_sub_signed(Duration::minutes(i64::from(minutes)))?;
                Some(Utc.from_utc_datetime(&naive))
            }
            Zone::Local => match Local.from_local_datetime(&civil) {
                LocalResult::Single(t) | LocalResult::Ambiguous(t, _) => Some(t.with_timezone(&Utc)),
                LocalResult::None => {
                    let shifted = civil.checked_add_signed(Duration::hours(1))?;
                    Local.from_local_datetime(&shifted).earliest().map(|t| t.with_timezone(&Utc))
                }
            },
        }
    }
}
