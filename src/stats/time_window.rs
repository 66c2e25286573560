use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::model::time_record::AllowedTimeConfig;

pub const MINUTES_PER_DAY: u16 = 24 * 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WindowError {
    #[error("expected `H:MM AM|PM`, got {0:?}")]
    Malformed(String),
    #[error("expected `HH:MM`, got {0:?}")]
    Malformed24(String),
    #[error("hour {0} is out of range")]
    HourOutOfRange(u16),
    #[error("minute {0} is out of range")]
    MinuteOutOfRange(u16),
}

/// Converts `"H:MM AM|PM"` to `"HH:MM"`.
///
/// 12 PM stays 12, 12 AM becomes 0, other PM hours gain 12.
pub fn parse_twelve_hour(input: &str) -> Result<String, WindowError> {
    let malformed = || WindowError::Malformed(input.to_string());

    let mut parts = input.split_whitespace();
    let (time, meridiem) = match (parts.next(), parts.next(), parts.next()) {
        (Some(time), Some(meridiem), None) => (time, meridiem),
        _ => return Err(malformed()),
    };

    let (hour, minute) = split_clock(time).ok_or_else(malformed)?;
    if hour > 12 {
        return Err(WindowError::HourOutOfRange(hour));
    }
    if minute > 59 {
        return Err(WindowError::MinuteOutOfRange(minute));
    }

    let hour = if meridiem.eq_ignore_ascii_case("PM") {
        if hour < 12 { hour + 12 } else { hour }
    } else if meridiem.eq_ignore_ascii_case("AM") {
        if hour == 12 { 0 } else { hour }
    } else {
        return Err(malformed());
    };

    Ok(format!("{:02}:{:02}", hour, minute))
}

/// Minute of day for a 24-hour `"HH:MM"` string.
pub fn to_minutes(input: &str) -> Result<u16, WindowError> {
    let (hour, minute) =
        split_clock(input.trim()).ok_or_else(|| WindowError::Malformed24(input.to_string()))?;
    if hour > 23 {
        return Err(WindowError::HourOutOfRange(hour));
    }
    if minute > 59 {
        return Err(WindowError::MinuteOutOfRange(minute));
    }
    Ok(hour * 60 + minute)
}

fn split_clock(input: &str) -> Option<(u16, u16)> {
    let (h, m) = input.split_once(':')?;
    if h.is_empty() || m.len() != 2 {
        return None;
    }
    Some((h.parse().ok()?, m.parse().ok()?))
}

/// Minute-of-day bounds a time-in must fall between to count as present.
///
/// Both ends are inclusive. A window whose start is after its end wraps past
/// midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct AllowedTimeWindow {
    pub start_minute: u16,
    pub end_minute: u16,
}

impl AllowedTimeWindow {
    pub fn new(start_minute: u16, end_minute: u16) -> Self {
        Self {
            start_minute,
            end_minute,
        }
    }

    pub fn from_twelve_hour(start: &str, end: &str) -> Result<Self, WindowError> {
        Ok(Self::new(
            to_minutes(&parse_twelve_hour(start)?)?,
            to_minutes(&parse_twelve_hour(end)?)?,
        ))
    }

    pub fn from_config(cfg: &AllowedTimeConfig) -> Result<Self, WindowError> {
        Self::from_twelve_hour(&cfg.start_time, &cfg.end_time)
    }

    pub fn wraps_midnight(&self) -> bool {
        self.start_minute > self.end_minute
    }

    pub fn contains(&self, minute_of_day: u16) -> bool {
        if self.wraps_midnight() {
            minute_of_day >= self.start_minute || minute_of_day <= self.end_minute
        } else {
            (self.start_minute..=self.end_minute).contains(&minute_of_day)
        }
    }
}

impl Default for AllowedTimeWindow {
    /// The whole day.
    fn default() -> Self {
        Self::new(0, MINUTES_PER_DAY - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_twelve_hour_strings() {
        assert_eq!(parse_twelve_hour("12:00 AM").unwrap(), "00:00");
        assert_eq!(parse_twelve_hour("12:30 PM").unwrap(), "12:30");
        assert_eq!(parse_twelve_hour("08:15 AM").unwrap(), "08:15");
        assert_eq!(parse_twelve_hour("05:45 PM").unwrap(), "17:45");
        assert_eq!(parse_twelve_hour("9:05 pm").unwrap(), "21:05");
    }

    #[test]
    fn rejects_malformed_twelve_hour_strings() {
        assert!(matches!(
            parse_twelve_hour("08:15"),
            Err(WindowError::Malformed(_))
        ));
        assert!(matches!(
            parse_twelve_hour("8 AM"),
            Err(WindowError::Malformed(_))
        ));
        assert!(matches!(
            parse_twelve_hour("08:15 XM"),
            Err(WindowError::Malformed(_))
        ));
        assert_eq!(
            parse_twelve_hour("13:00 PM"),
            Err(WindowError::HourOutOfRange(13))
        );
        assert_eq!(
            parse_twelve_hour("10:75 AM"),
            Err(WindowError::MinuteOutOfRange(75))
        );
    }

    #[test]
    fn counts_minutes_of_day() {
        assert_eq!(to_minutes("00:00").unwrap(), 0);
        assert_eq!(to_minutes("08:00").unwrap(), 480);
        assert_eq!(to_minutes("17:00").unwrap(), 1020);
        assert_eq!(to_minutes("23:59").unwrap(), 1439);
        assert!(to_minutes("24:00").is_err());
        assert!(to_minutes("noon").is_err());
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let window = AllowedTimeWindow::from_twelve_hour("08:00 AM", "05:00 PM").unwrap();
        assert_eq!(window, AllowedTimeWindow::new(480, 1020));

        assert!(window.contains(480));
        assert!(!window.contains(479));
        assert!(window.contains(1020));
        assert!(!window.contains(1021));
    }

    #[test]
    fn inverted_window_wraps_past_midnight() {
        let night = AllowedTimeWindow::from_twelve_hour("10:00 PM", "06:00 AM").unwrap();
        assert!(night.wraps_midnight());
        assert!(night.contains(23 * 60));
        assert!(night.contains(0));
        assert!(night.contains(360));
        assert!(!night.contains(361));
        assert!(!night.contains(12 * 60));
    }

    #[test]
    fn default_window_covers_the_whole_day() {
        let window = AllowedTimeWindow::default();
        assert!(window.contains(0));
        assert!(window.contains(MINUTES_PER_DAY - 1));
    }
}
