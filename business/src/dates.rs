//! Calendar helpers for the users statistics.
//!
//! All calendar arithmetic happens in UTC.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, SecondsFormat, Utc};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// English name of the month `date` falls in.
pub fn month_name(date: &impl Datelike) -> &'static str {
    MONTH_NAMES[date.month0() as usize]
}

/// The calendar month containing `now`, bounded on the right by `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    /// Midnight of the first day.
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub first_day: NaiveDate,
    /// True last calendar day of the month, not `end`'s date.
    pub last_day: NaiveDate,
}

impl MonthWindow {
    /// `"October 1 - October 31"`
    pub fn label(&self) -> String {
        format!(
            "{} {} - {} {}",
            month_name(&self.first_day),
            self.first_day.day(),
            month_name(&self.last_day),
            self.last_day.day()
        )
    }
}

pub fn current_month_window(now: DateTime<Utc>) -> MonthWindow {
    let today = now.date_naive();
    let first_day = today - Days::new(u64::from(today.day0()));
    let last_day = first_day + Months::new(1) - Days::new(1);

    MonthWindow {
        start: first_day.and_time(NaiveTime::MIN).and_utc(),
        end: now,
        first_day,
        last_day,
    }
}

/// Same instant one calendar month earlier, clamped to the end of shorter
/// months (March 31 becomes February 28 or 29).
pub fn one_month_before(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Months::new(1)
}

/// Timestamp form used in API query strings.
pub fn to_query_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Formats an RFC 3339 timestamp as `"Jan 1, 2024"`.
///
/// Text that does not parse is returned unchanged so a bad row still shows
/// something readable.
pub fn format_date(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(at) => at.with_timezone(&Utc).format("%b %-d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn window_spans_whole_leap_february() {
        let window = current_month_window(utc(2024, 2, 10, 15));

        assert_eq!(window.first_day, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(window.last_day, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(window.start, utc(2024, 2, 1, 0));
        assert_eq!(window.end, utc(2024, 2, 10, 15));
        assert_eq!(window.label(), "February 1 - February 29");
    }

    #[test]
    fn window_for_common_february_and_december() {
        assert_eq!(
            current_month_window(utc(2023, 2, 28, 1)).label(),
            "February 1 - February 28"
        );
        assert_eq!(
            current_month_window(utc(2023, 12, 31, 23)).label(),
            "December 1 - December 31"
        );
        assert_eq!(
            current_month_window(utc(2026, 4, 1, 0)).label(),
            "April 1 - April 30"
        );
    }

    #[test]
    fn one_month_before_clamps_to_month_end() {
        assert_eq!(one_month_before(utc(2024, 3, 31, 8)), utc(2024, 2, 29, 8));
        assert_eq!(one_month_before(utc(2024, 1, 15, 8)), utc(2023, 12, 15, 8));
    }

    #[test]
    fn query_timestamp_is_iso_utc() {
        assert_eq!(
            to_query_timestamp(utc(2024, 1, 1, 0)),
            "2024-01-01T00:00:00.000Z"
        );
    }

    #[test]
    fn format_date_renders_short_month() {
        assert_eq!(format_date("2024-01-01T00:00:00Z"), "Jan 1, 2024");
        assert_eq!(format_date("2023-11-20T22:30:00.123Z"), "Nov 20, 2023");
    }

    #[test]
    fn format_date_keeps_unparseable_text() {
        assert_eq!(format_date("yesterday"), "yesterday");
    }
}
