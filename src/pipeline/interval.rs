use std::{fmt, str::FromStr};

use chrono::TimeDelta;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static INTERVAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:(\d+)\s*)?([A-Za-z]+)\s*$").expect("interval pattern is valid")
});

const MILLIS_PER_SECOND: i64 = 1_000;
const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

/// A windowing interval for `reduce -every`.
///
/// Month and year components are calendar-relative (their length depends on
/// where the window starts); everything else is a fixed span of milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub months: u32,
    pub millis: i64,
}

impl Interval {
    pub fn days(days: i64) -> Self {
        Self { months: 0, millis: days * MILLIS_PER_DAY }
    }

    pub fn months(months: u32) -> Self {
        Self { months, millis: 0 }
    }

    /// True when any part of the interval varies with the calendar.
    pub fn is_calendar(&self) -> bool {
        self.months != 0
    }

    /// Fixed span of the interval, `None` for calendar-relative intervals.
    pub fn as_time_delta(&self) -> Option<TimeDelta> {
        if self.is_calendar() {
            return None;
        }
        Some(TimeDelta::milliseconds(self.millis))
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.months, self.millis) {
            (0, ms) => write!(f, "{}ms", ms),
            (m, 0) => write!(f, "{}M", m),
            (m, ms) => write!(f, "{}M+{}ms", m, ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntervalError {
    Malformed(String),
    UnknownUnit(String),
}

impl fmt::Display for IntervalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntervalError::Malformed(text) => write!(f, "IntervalError: malformed interval '{}'", text),
            IntervalError::UnknownUnit(unit) => write!(f, "IntervalError: unknown unit '{}'", unit),
        }
    }
}

impl std::error::Error for IntervalError {}

impl FromStr for Interval {
    type Err = IntervalError;

    /// Accepts `"<count> <unit>"` or a bare unit (`"week"`, `"7 days"`, `"1 month"`).
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let caps = INTERVAL_RE
            .captures(text)
            .ok_or_else(|| IntervalError::Malformed(text.to_string()))?;

        let count: i64 = match caps.get(1) {
            Some(m) => m.as_str().parse().map_err(|_| IntervalError::Malformed(text.to_string()))?,
            None => 1,
        };
        let unit = &caps[2];

        let per_unit = match unit {
            "ms" | "millisecond" | "milliseconds" => 1,
            "s" | "sec" | "second" | "seconds" => MILLIS_PER_SECOND,
            "m" | "min" | "minute" | "minutes" => MILLIS_PER_MINUTE,
            "h" | "hour" | "hours" => MILLIS_PER_HOUR,
            "d" | "day" | "days" => MILLIS_PER_DAY,
            "w" | "week" | "weeks" => 7 * MILLIS_PER_DAY,
            "M" | "month" | "months" => {
                let months = u32::try_from(count).map_err(|_| IntervalError::Malformed(text.to_string()))?;
                return Ok(Interval::months(months));
            }
            "y" | "year" | "years" => {
                let months = count
                    .checked_mul(12)
                    .and_then(|m| u32::try_from(m).ok())
                    .ok_or_else(|| IntervalError::Malformed(text.to_string()))?;
                return Ok(Interval::months(months));
            }
            other => return Err(IntervalError::UnknownUnit(other.to_string())),
        };

        count
            .checked_mul(per_unit)
            .map(|millis| Interval { months: 0, millis })
            .ok_or_else(|| IntervalError::Malformed(text.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fixed_units() {
        assert_eq!("7 days".parse::<Interval>().unwrap(), Interval::days(7));
        assert_eq!("week".parse::<Interval>().unwrap(), Interval::days(7));
        assert_eq!("90s".parse::<Interval>().unwrap().millis, 90_000);
        assert_eq!("2 hours".parse::<Interval>().unwrap().as_time_delta(), Some(TimeDelta::hours(2)));
    }

    #[test]
    fn months_and_years_are_calendar() {
        let month: Interval = "1 month".parse().unwrap();
        assert!(month.is_calendar());
        assert_eq!(month.as_time_delta(), None);

        let year: Interval = "2 years".parse().unwrap();
        assert_eq!(year.months, 24);
        assert!(!Interval::days(31).is_calendar());
    }

    #[test]
    fn m_is_minutes_and_capital_m_is_months() {
        assert!(!"5m".parse::<Interval>().unwrap().is_calendar());
        assert!("5M".parse::<Interval>().unwrap().is_calendar());
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!("".parse::<Interval>(), Err(IntervalError::Malformed(_))));
        assert!(matches!("3 fortnights".parse::<Interval>(), Err(IntervalError::UnknownUnit(u)) if u == "fortnights"));
        assert!(matches!("-1 day".parse::<Interval>(), Err(IntervalError::Malformed(_))));
    }
}
