//! Resolving "today" for a timezone setting.
//!
//! Every core operation takes the current instant explicitly; this module
//! turns that instant into the calendar day the streak logic works with.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Day strings are always `YYYY-MM-DD`.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Which timezone decides where one day ends and the next begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TimeZoneSetting {
    /// The machine's local timezone
    #[default]
    Local,
    /// An explicit IANA zone such as `Asia/Shanghai`
    Named(Tz),
}

impl TimeZoneSetting {
    /// Calendar day of `now` in this timezone.
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        match self {
            TimeZoneSetting::Local => now.with_timezone(&Local).date_naive(),
            TimeZoneSetting::Named(tz) => now.with_timezone(tz).date_naive(),
        }
    }
}

impl fmt::Display for TimeZoneSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeZoneSetting::Local => f.write_str("local"),
            TimeZoneSetting::Named(tz) => f.write_str(tz.name()),
        }
    }
}

impl FromStr for TimeZoneSetting {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("local") {
            return Ok(TimeZoneSetting::Local);
        }
        trimmed
            .parse::<Tz>()
            .map(TimeZoneSetting::Named)
            .map_err(|_| ValidationError::invalid("timezone", format!("unknown IANA zone '{trimmed}'")))
    }
}

impl TryFrom<String> for TimeZoneSetting {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeZoneSetting> for String {
    fn from(value: TimeZoneSetting) -> Self {
        value.to_string()
    }
}

/// Whole calendar days from `from` to `to`. Negative when `to` is earlier.
pub fn day_gap(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Parse a `YYYY-MM-DD` day string.
pub fn parse_day(s: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(s.trim(), DAY_FORMAT)
        .map_err(|e| ValidationError::invalid("date", format!("'{s}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn named_zone_moves_the_day_boundary() {
        // 2024-01-01 20:00 UTC is already Jan 2 in Shanghai (UTC+8)
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 20, 0, 0).unwrap();
        let shanghai: TimeZoneSetting = "Asia/Shanghai".parse().unwrap();
        let new_york: TimeZoneSetting = "America/New_York".parse().unwrap();

        assert_eq!(shanghai.today(now), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(new_york.today(now), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn parses_local_and_rejects_unknown() {
        assert_eq!("local".parse::<TimeZoneSetting>().unwrap(), TimeZoneSetting::Local);
        assert_eq!("".parse::<TimeZoneSetting>().unwrap(), TimeZoneSetting::Local);
        assert!("Mars/Olympus_Mons".parse::<TimeZoneSetting>().is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let tz: TimeZoneSetting = "Europe/Berlin".parse().unwrap();
        assert_eq!(serde_json::to_string(&tz).unwrap(), "\"Europe/Berlin\"");
        let back: TimeZoneSetting = serde_json::from_str("\"local\"").unwrap();
        assert_eq!(back, TimeZoneSetting::Local);
    }

    #[test]
    fn day_gap_is_midnight_to_midnight() {
        let a = parse_day("2024-01-31").unwrap();
        let b = parse_day("2024-03-01").unwrap();
        assert_eq!(day_gap(a, b), 30);
        assert_eq!(day_gap(b, a), -30);
    }
}
