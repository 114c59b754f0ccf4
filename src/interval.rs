use crate::error;
use crate::precision;
use crate::sample;

/// Inclusive `[start, end]` range of bucket left edges, both truncated to a precision unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: chrono::NaiveDateTime,
    pub end: chrono::NaiveDateTime,
}

impl Interval {
    /// Builds an interval from arbitrary bounds, truncating both to `precision`.
    ///
    /// # Errors
    /// * Configuration error if the truncated start lies after the truncated end.
    pub fn new(
        start: chrono::NaiveDateTime,
        end: chrono::NaiveDateTime,
        precision: precision::Precision,
    ) -> error::Result<Self> {
        let start = precision.truncate(start);
        let end = precision.truncate(end);
        if start > end {
            return Err(error::ClimatologyError::config(format!(
                "Interval start {} is after interval end {}",
                start, end
            )));
        }
        Ok(Interval { start, end })
    }

    /// Parses `"<start>:<end>"`.
    ///
    /// Each bound names a whole calendar period (`2019`, `2019-09`, `2019-09-02` or
    /// `2019-09-02T03`). The start bound opens at the beginning of its period and the
    /// end bound closes at the last instant of its period, so `2019-09-02:2019-09-04`
    /// includes all of the 4th. Both are then truncated to `precision`.
    ///
    /// # Arguments
    /// * `spec` - Interval string from the command line.
    /// * `precision` - Bucket precision.
    ///
    /// # Returns
    /// * `error::Result<Interval>` - Parsed interval or a configuration error.
    pub fn parse(spec: &str, precision: precision::Precision) -> error::Result<Self> {
        let mut parts = spec.split(':');
        let (start_raw, end_raw) = match (parts.next(), parts.next(), parts.next()) {
            (Some(start), Some(end), None) => (start, end),
            _ => {
                return Err(error::ClimatologyError::config(format!(
                    "Invalid interval '{}': expected <start>:<end>",
                    spec
                )));
            }
        };

        let (start_period, _) = parse_bound(start_raw)?;
        let (end_period, end_resolution) = parse_bound(end_raw)?;
        let end_last = end_resolution
            .advance(end_period)
            .map(|next| next - chrono::TimeDelta::nanoseconds(1))
            .ok_or_else(|| {
                error::ClimatologyError::config(format!("Interval end '{}' is out of range", end_raw))
            })?;

        Interval::new(start_period, end_last, precision)
    }

    /// Interval spanning the first and last sample, used when no interval is given.
    ///
    /// # Errors
    /// * Load error if there are no samples to span.
    pub fn from_samples(
        samples: &[sample::Sample],
        precision: precision::Precision,
    ) -> error::Result<Self> {
        let first = samples.iter().map(|s| s.timestamp).min();
        let last = samples.iter().map(|s| s.timestamp).max();
        match (first, last) {
            (Some(first), Some(last)) => Interval::new(first, last, precision),
            _ => Err(error::ClimatologyError::load(
                "Input contains no samples; cannot derive an interval",
            )),
        }
    }

    /// Number of buckets covering this interval: whole units from start to end, plus one.
    pub fn bucket_count(&self, precision: precision::Precision) -> usize {
        precision.units_between(self.start, self.end) as usize + 1
    }
}

/// Parses one interval bound into the start of the period it names and that period's unit.
fn parse_bound(raw: &str) -> error::Result<(chrono::NaiveDateTime, precision::Precision)> {
    let raw = raw.trim();
    let invalid = || {
        error::ClimatologyError::config(format!(
            "Invalid interval bound '{}': expected YYYY, YYYY-MM, YYYY-MM-DD or YYYY-MM-DDTHH",
            raw
        ))
    };

    if let Some((date, hour)) = raw.split_once(['T', ' ']) {
        let date = chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| invalid())?;
        let hour: u32 = hour.parse().map_err(|_| invalid())?;
        let ts = date.and_hms_opt(hour, 0, 0).ok_or_else(invalid)?;
        return Ok((ts, precision::Precision::Hour));
    }

    let (date, resolution) = match raw.matches('-').count() {
        0 => {
            let year: i32 = raw.parse().map_err(|_| invalid())?;
            let date = chrono::NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(invalid)?;
            (date, precision::Precision::Year)
        }
        1 => {
            let date = chrono::NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d")
                .map_err(|_| invalid())?;
            (date, precision::Precision::Month)
        }
        2 => {
            let date = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid())?;
            (date, precision::Precision::Day)
        }
        _ => return Err(invalid()),
    };

    Ok((date.and_time(chrono::NaiveTime::MIN), resolution))
}
