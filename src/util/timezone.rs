use chrono::{DateTime, Datelike, TimeZone, Utc};
use chrono_tz::Tz;
use time::{Date, Month, OffsetDateTime, UtcOffset};

use crate::domain::posts::{HUMAN_DATE_FORMAT, ISO_DATE_FORMAT};

pub fn localized_datetime(time: OffsetDateTime, tz: Tz) -> DateTime<Tz> {
    let utc = time.to_offset(UtcOffset::UTC);
    let seconds = utc.unix_timestamp();
    let nanos: u32 = utc.nanosecond();
    let datetime_utc = DateTime::<Utc>::from_timestamp(seconds, nanos)
        .or_else(|| DateTime::<Utc>::from_timestamp(seconds, 0))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
    tz.from_utc_datetime(&datetime_utc.naive_utc())
}

/// Calendar date of `time` as seen in `tz`; falls back to the UTC date.
pub fn localized_date(time: OffsetDateTime, tz: Tz) -> Date {
    let localized = localized_datetime(time, tz);
    Month::try_from(localized.month() as u8)
        .ok()
        .zip(u8::try_from(localized.day()).ok())
        .and_then(|(month, day)| Date::from_calendar_date(localized.year(), month, day).ok())
        .unwrap_or_else(|| time.to_offset(UtcOffset::UTC).date())
}

pub fn today(tz: Tz) -> Date {
    localized_date(OffsetDateTime::now_utc(), tz)
}

/// `March 5, 2025` in the display timezone.
pub fn human_date(time: OffsetDateTime, tz: Tz) -> String {
    localized_date(time, tz)
        .format(HUMAN_DATE_FORMAT)
        .unwrap_or_default()
}

/// `2025-03-05` in the display timezone.
pub fn iso_date(time: OffsetDateTime, tz: Tz) -> String {
    localized_date(time, tz)
        .format(ISO_DATE_FORMAT)
        .unwrap_or_default()
}

pub fn format_day(day: Date) -> String {
    day.format(ISO_DATE_FORMAT).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn late_utc_evening_is_next_day_in_seoul() {
        let instant = datetime!(2025-03-04 20:30 UTC);
        assert_eq!(
            localized_date(instant, chrono_tz::Asia::Seoul),
            date!(2025 - 03 - 05)
        );
        assert_eq!(localized_date(instant, chrono_tz::UTC), date!(2025 - 03 - 04));
    }

    #[test]
    fn formats_human_and_iso_dates() {
        let instant = datetime!(2025-03-05 01:00 UTC);
        assert_eq!(human_date(instant, chrono_tz::UTC), "March 5, 2025");
        assert_eq!(iso_date(instant, chrono_tz::UTC), "2025-03-05");
        assert_eq!(format_day(date!(2025 - 12 - 31)), "2025-12-31");
    }
}
