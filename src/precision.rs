use crate::error;

use chrono::Datelike;
use chrono::Timelike;

/// Calendar granularity used to truncate timestamps and to step between buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Precision {
    Year,
    Month,
    Day,
    Hour,
}

impl Precision {
    /// Resolves a command-line precision flag.
    ///
    /// # Arguments
    /// * `flag` - One of `Y`, `M`, `D`, `h`.
    ///
    /// # Returns
    /// * `error::Result<Precision>` - The unit, or a configuration error for anything else.
    ///   Unknown flags are never mapped to a default unit.
    pub fn from_flag(flag: &str) -> error::Result<Self> {
        match flag {
            "Y" => Ok(Precision::Year),
            "M" => Ok(Precision::Month),
            "D" => Ok(Precision::Day),
            "h" => Ok(Precision::Hour),
            other => Err(error::ClimatologyError::config(format!(
                "Invalid precision '{}': expected one of Y, M, D, h",
                other
            ))),
        }
    }

    /// Label format for bucket left edges. Presentation only.
    pub fn display_format(&self) -> &'static str {
        match self {
            Precision::Year => "%Y",
            Precision::Month => "%Y-%m",
            Precision::Day => "%Y-%m-%d",
            Precision::Hour => "%Y-%m-%d hour:%H",
        }
    }

    /// Truncates a timestamp to the start of the unit that contains it.
    pub fn truncate(&self, ts: chrono::NaiveDateTime) -> chrono::NaiveDateTime {
        let date = ts.date();
        match self {
            Precision::Year => (date - chrono::Days::new(date.ordinal0() as u64))
                .and_time(chrono::NaiveTime::MIN),
            Precision::Month => (date - chrono::Days::new(date.day0() as u64))
                .and_time(chrono::NaiveTime::MIN),
            Precision::Day => date.and_time(chrono::NaiveTime::MIN),
            Precision::Hour => {
                date.and_time(chrono::NaiveTime::MIN) + chrono::TimeDelta::hours(ts.hour() as i64)
            }
        }
    }

    /// Advances a timestamp by exactly one calendar unit.
    ///
    /// Months and years step on the calendar, not by a fixed number of seconds,
    /// so leap days and month lengths never shift a boundary.
    ///
    /// # Returns
    /// * `None` if the result is outside chrono's representable range.
    pub fn advance(&self, ts: chrono::NaiveDateTime) -> Option<chrono::NaiveDateTime> {
        match self {
            Precision::Year => ts.checked_add_months(chrono::Months::new(12)),
            Precision::Month => ts.checked_add_months(chrono::Months::new(1)),
            Precision::Day => ts.checked_add_days(chrono::Days::new(1)),
            Precision::Hour => ts.checked_add_signed(chrono::TimeDelta::hours(1)),
        }
    }

    /// Whole units from `start` to `ts`. Both must already be truncated to this unit.
    pub fn units_between(&self, start: chrono::NaiveDateTime, ts: chrono::NaiveDateTime) -> i64 {
        match self {
            Precision::Year => (ts.year() - start.year()) as i64,
            Precision::Month => {
                (ts.year() - start.year()) as i64 * 12 + ts.month() as i64 - start.month() as i64
            }
            Precision::Day => (ts.date() - start.date()).num_days(),
            Precision::Hour => (ts - start).num_hours(),
        }
    }
}

impl std::fmt::Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Precision::Year => "year",
            Precision::Month => "month",
            Precision::Day => "day",
            Precision::Hour => "hour",
        };
        f.write_str(name)
    }
}
