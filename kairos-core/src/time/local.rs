//! Europe/Athens local time
//!
//! EET (UTC+2) in winter, EEST (UTC+3) from the last Sunday of March to the
//! last Sunday of October. The switch is decided on the UTC calendar date
//! alone; the 01:00 UTC transition hour is not modelled, so the offset flips
//! at UTC midnight of the transition Sunday.

use core::fmt::Write;

use heapless::String;

use super::calendar::{civil_from_days, days_from_civil, days_in_month, Weekday, SECS_PER_DAY};

/// Winter offset from UTC in hours
pub const STANDARD_OFFSET_HOURS: u8 = 2;

/// Summer offset from UTC in hours
pub const SUMMER_OFFSET_HOURS: u8 = 3;

/// Broken-down local wall-clock time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LocalTime {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub weekday: Weekday,
}

impl LocalTime {
    /// Split seconds since the epoch into calendar fields, no offset applied
    pub fn from_epoch_secs(secs: u64) -> Self {
        let days = (secs / SECS_PER_DAY) as i64;
        let rem = secs % SECS_PER_DAY;
        let (year, month, day) = civil_from_days(days);
        Self {
            year,
            month,
            day,
            hour: (rem / 3_600) as u8,
            minute: (rem / 60 % 60) as u8,
            second: (rem % 60) as u8,
            weekday: Weekday::from_days(days),
        }
    }

    /// Four digits `HHMM` for the clock face
    pub fn hhmm(&self) -> String<4> {
        let mut out = String::new();
        let _ = write!(out, "{:02}{:02}", self.hour, self.minute);
        out
    }

    /// `HH:MM`
    pub fn clock_label(&self) -> String<5> {
        let mut out = String::new();
        let _ = write!(out, "{:02}:{:02}", self.hour, self.minute);
        out
    }

    /// `DD/MM/YYYY`
    pub fn date_label(&self) -> String<10> {
        let mut out = String::new();
        let _ = write!(out, "{:02}/{:02}/{:04}", self.day, self.month, self.year);
        out
    }
}

/// Day of the month of the last Sunday in `month`, within the 25th..=31st
///
/// Scans from the 31st down to the 25th, skipping days the month does not
/// have. The scan covers the whole final week only for 31-day months; for
/// shorter months whose last Sunday falls before the 25th the result is
/// the month length instead.
pub fn last_sunday(year: i32, month: u8) -> u8 {
    let len = days_in_month(year, month);
    (25..=31u8)
        .rev()
        .filter(|&day| day <= len)
        .find(|&day| Weekday::from_days(days_from_civil(year, month, day)) == Weekday::Sunday)
        .unwrap_or(len.min(31))
}

/// Whether summer time applies on the given UTC calendar date
pub fn is_summer_time(year: i32, month: u8, day: u8) -> bool {
    (3 < month && month < 10)
        || (month == 3 && day >= last_sunday(year, 3))
        || (month == 10 && day < last_sunday(year, 10))
}

/// Offset from UTC in hours for the given UTC calendar date
pub fn utc_offset_hours(year: i32, month: u8, day: u8) -> u8 {
    if is_summer_time(year, month, day) {
        SUMMER_OFFSET_HOURS
    } else {
        STANDARD_OFFSET_HOURS
    }
}

/// Local time for a UTC instant in Unix seconds
pub fn local_time(utc: u64) -> LocalTime {
    let (year, month, day) = civil_from_days((utc / SECS_PER_DAY) as i64);
    let offset = u64::from(utc_offset_hours(year, month, day)) * 3_600;
    LocalTime::from_epoch_secs(utc + offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn utc(year: i32, month: u8, day: u8, hour: u8, minute: u8) -> u64 {
        days_from_civil(year, month, day) as u64 * SECS_PER_DAY
            + u64::from(hour) * 3_600
            + u64::from(minute) * 60
    }

    #[test]
    fn test_last_sunday_known_years() {
        assert_eq!(last_sunday(2024, 3), 31);
        assert_eq!(last_sunday(2024, 10), 27);
        assert_eq!(last_sunday(2025, 3), 30);
        assert_eq!(last_sunday(2025, 10), 26);
        assert_eq!(last_sunday(2026, 3), 29);
        assert_eq!(last_sunday(2026, 10), 25);
        // 30-day month and a leap February
        assert_eq!(last_sunday(2024, 6), 30);
        assert_eq!(last_sunday(2024, 2), 25);
    }

    #[test]
    fn test_winter_and_summer_offsets() {
        let winter = local_time(utc(2024, 1, 5, 10, 0));
        assert_eq!((winter.hour, winter.minute), (12, 0));

        let summer = local_time(utc(2024, 7, 1, 10, 30));
        assert_eq!((summer.hour, summer.minute), (13, 30));
    }

    #[test]
    fn test_last_sunday_short_month_falls_back_to_month_end() {
        // September 2051 ends on a Saturday and its last Sunday is the 24th
        assert_eq!(last_sunday(2051, 9), 30);
        assert_eq!(Weekday::from_days(days_from_civil(2051, 9, 30)), Weekday::Saturday);
        // 31-day months always land on a Sunday
        assert_eq!(last_sunday(2024, 3), 31);
        assert_eq!(last_sunday(2024, 10), 27);
    }

    #[test]
    fn test_transition_uses_utc_date() {
        // 2024-03-31 is the last Sunday of March
        assert_eq!(local_time(utc(2024, 3, 30, 23, 0)).hour, 1);
        assert_eq!(local_time(utc(2024, 3, 31, 0, 0)).hour, 3);
        // 2024-10-27 is the last Sunday of October
        assert_eq!(local_time(utc(2024, 10, 26, 12, 0)).hour, 15);
        assert_eq!(local_time(utc(2024, 10, 27, 0, 30)).hour, 2);
    }

    #[test]
    fn test_offset_rolls_the_date() {
        let t = local_time(utc(2023, 12, 31, 23, 15));
        assert_eq!((t.year, t.month, t.day), (2024, 1, 1));
        assert_eq!((t.hour, t.minute), (1, 15));
        assert_eq!(t.weekday, Weekday::Monday);
    }

    #[test]
    fn test_labels() {
        let t = local_time(utc(2024, 1, 5, 7, 4));
        assert_eq!(t.hhmm().as_str(), "0904");
        assert_eq!(t.clock_label().as_str(), "09:04");
        assert_eq!(t.date_label().as_str(), "05/01/2024");
    }

    proptest! {
        #[test]
        fn prop_last_sunday_stays_in_scan_window(year in 1970i32..2200, month in 1u8..=12) {
            let day = last_sunday(year, month);
            let len = days_in_month(year, month);
            prop_assert!((25..=len).contains(&day));

            let is_sunday = |d: u8| Weekday::from_days(days_from_civil(year, month, d)) == Weekday::Sunday;
            if len == 31 {
                prop_assert!(is_sunday(day));
                prop_assert!(day + 7 > len);
            } else if is_sunday(day) {
                prop_assert!(((day + 1)..=len).all(|d| !is_sunday(d)));
            } else {
                prop_assert_eq!(day, len);
                prop_assert!((25..=len).all(|d| !is_sunday(d)));
            }
        }

        #[test]
        fn prop_offset_matches_window(year in 1970i32..2200, month in 1u8..=12, day in 1u8..=31) {
            prop_assume!(day <= days_in_month(year, month));
            let march = last_sunday(year, 3);
            let october = last_sunday(year, 10);
            let summer = match month {
                4..=9 => true,
                3 => day >= march,
                10 => day < october,
                _ => false,
            };
            let expected = if summer { 3 } else { 2 };
            prop_assert_eq!(utc_offset_hours(year, month, day), expected);

            let instant = utc(year, month, day, 12, 0);
            prop_assert_eq!(local_time(instant).hour, 12 + expected);
        }
    }
}
