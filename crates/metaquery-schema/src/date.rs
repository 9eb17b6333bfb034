//! Date values as UTC epoch milliseconds
//!
//! Filters carry dates as text in one of a small set of fixed formats:
//!
//! ```text
//! 2003
//! 2003-04
//! 2003-04-17
//! 2003-04-17T10:15
//! 2003-04-17T10:15:30
//! 2003-04-17T10:15:30.250Z
//! ```
//!
//! A partial date denotes its first instant, so `2003` is `2003-01-01T00:00:00Z`.

use std::fmt;
use std::str::FromStr;

use crate::SchemaError;

const MILLIS_PER_SECOND: i64 = 1_000;
const MILLIS_PER_DAY: i64 = 86_400_000;

/// A point in time, stored as milliseconds since the Unix epoch (UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    pub fn millis(self) -> i64 {
        self.0
    }

    /// Midnight of the given calendar day, or `None` if the day does not exist
    pub fn from_ymd(year: i64, month: u32, day: u32) -> Option<Self> {
        Self::from_ymd_hms(year, month, day, 0, 0, 0)
    }

    pub fn from_ymd_hms(
        year: i64,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Option<Self> {
        if !(1..=12).contains(&month) || day == 0 || day > days_in_month(year, month) {
            return None;
        }
        if hour > 23 || minute > 59 || second > 59 {
            return None;
        }
        let days = days_from_civil(year, month, day);
        let seconds = i64::from(hour) * 3_600 + i64::from(minute) * 60 + i64::from(second);
        Some(Timestamp(days * MILLIS_PER_DAY + seconds * MILLIS_PER_SECOND))
    }

    /// Parse one of the fixed filter formats
    pub fn parse(text: &str) -> Result<Self, SchemaError> {
        parse_timestamp(text.trim()).ok_or_else(|| SchemaError::InvalidTimestamp(text.to_string()))
    }
}

impl FromStr for Timestamp {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timestamp::parse(s)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let days = self.0.div_euclid(MILLIS_PER_DAY);
        let rem = self.0.rem_euclid(MILLIS_PER_DAY);
        let (year, month, day) = civil_from_days(days);
        let hour = rem / 3_600_000;
        let minute = (rem / 60_000) % 60;
        let second = (rem / 1_000) % 60;
        let millis = rem % 1_000;
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
            year, month, day, hour, minute, second, millis
        )
    }
}

fn parse_timestamp(text: &str) -> Option<Timestamp> {
    let (date, time) = match text.find(['T', ' ']) {
        Some(idx) => (&text[..idx], Some(&text[idx + 1..])),
        None => (text, None),
    };

    let mut parts = date.split('-');
    let year: i64 = parse_digits(parts.next()?, 4)?;
    let month: u32 = match parts.next() {
        Some(m) => parse_digits(m, 2)?,
        None => 1,
    };
    let day: u32 = match parts.next() {
        Some(d) => parse_digits(d, 2)?,
        None => 1,
    };
    if parts.next().is_some() {
        return None;
    }

    let midnight = Timestamp::from_ymd(year, month, day)?;
    let Some(time) = time else {
        return Some(midnight);
    };

    let time = time.strip_suffix('Z').unwrap_or(time);
    let (clock, fraction) = match time.split_once('.') {
        Some((clock, fraction)) => (clock, Some(fraction)),
        None => (time, None),
    };

    let mut fields = clock.split(':');
    let hour: u32 = parse_digits(fields.next()?, 2)?;
    let minute: u32 = parse_digits(fields.next()?, 2)?;
    let second: u32 = match fields.next() {
        Some(s) => parse_digits(s, 2)?,
        None => 0,
    };
    if fields.next().is_some() {
        return None;
    }

    let millis = match fraction {
        Some(f) if !f.is_empty() && f.len() <= 3 && f.bytes().all(|b| b.is_ascii_digit()) => {
            // "5" is 500ms, "25" is 250ms
            let padded = format!("{:0<3}", f);
            padded.parse::<i64>().ok()?
        }
        Some(_) => return None,
        None => 0,
    };

    let base = Timestamp::from_ymd_hms(year, month, day, hour, minute, second)?;
    Some(Timestamp(base.0 + millis))
}

fn parse_digits<T: FromStr>(text: &str, width: usize) -> Option<T> {
    if text.len() != width || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i64, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

// Days since 1970-01-01 for a proleptic Gregorian date.
fn days_from_civil(year: i64, month: u32, day: u32) -> i64 {
    let year = if month <= 2 { year - 1 } else { year };
    let era = (if year >= 0 { year } else { year - 399 }) / 400;
    let yoe = year - era * 400;
    let month = i64::from(month);
    let shifted = if month > 2 { month - 3 } else { month + 9 };
    let doy = (153 * shifted + 2) / 5 + i64::from(day) - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = (if z >= 0 { z } else { z - 146_096 }) / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}
