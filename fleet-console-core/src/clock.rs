use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime};

use crate::error::ConsoleError;

const ISO_DATE: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Source of "today" for default report periods and export file names.
pub trait Clock: Send + Sync {
    fn today(&self) -> Date;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> Date {
        OffsetDateTime::now_utc().date()
    }
}

/// Clock pinned to a single day, for tests and reproducible exports.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Date);

impl Clock for FixedClock {
    fn today(&self) -> Date {
        self.0
    }
}

/// `yyyy-MM-dd`, the form the API takes and returns.
pub fn format_iso_date(date: Date) -> String {
    date.format(ISO_DATE).unwrap_or_else(|_| date.to_string())
}

pub fn parse_iso_date(value: &str) -> Result<Date, ConsoleError> {
    Date::parse(value.trim(), ISO_DATE)
        .map_err(|e| {
            ConsoleError::InvalidInput(format!("'{}' is not a yyyy-MM-dd date: {}", value, e))
        })
}

pub fn days_before(date: Date, days: i64) -> Date {
    date.checked_sub(Duration::days(days)).unwrap_or(Date::MIN)
}

pub fn first_of_month(date: Date) -> Date {
    date.replace_day(1).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    fn date(y: i32, m: Month, d: u8) -> Date {
        Date::from_calendar_date(y, m, d).unwrap()
    }

    #[test]
    fn test_iso_round_trip() {
        let d = date(2025, Month::January, 7);
        assert_eq!(format_iso_date(d), "2025-01-07");
        assert_eq!(parse_iso_date("2025-01-07").unwrap(), d);
    }

    #[test]
    fn test_format_pads_small_years_and_months() {
        assert_eq!(format_iso_date(date(987, Month::March, 4)), "0987-03-04");
        let d = date(2024, Month::December, 31);
        assert_eq!(parse_iso_date(&format_iso_date(d)).unwrap(), d);
    }

    #[test]
    fn test_parse_rejects_other_formats() {
        assert!(parse_iso_date("07/01/2025").is_err());
        assert!(parse_iso_date("").is_err());
    }

    #[test]
    fn test_days_before_crosses_month() {
        assert_eq!(
            days_before(date(2025, Month::March, 10), 30),
            date(2025, Month::February, 8)
        );
    }

    #[test]
    fn test_first_of_month() {
        assert_eq!(
            first_of_month(date(2024, Month::February, 29)),
            date(2024, Month::February, 1)
        );
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock(date(2024, Month::May, 1));
        assert_eq!(clock.today(), date(2024, Month::May, 1));
    }
}
