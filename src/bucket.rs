use crate::error;
use crate::interval;
use crate::precision;

/// One half-open calendar span `[left, right)` at a fixed precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    pub ordinal: usize,
    pub left: chrono::NaiveDateTime,
    pub right: chrono::NaiveDateTime,
}

/// Computes the contiguous bucket sequence covering `interval`.
///
/// Left edges run from `interval.start` to `interval.end` inclusive, stepping one
/// calendar unit at a time; each right edge is the next left edge. The result length
/// is always `interval.bucket_count(precision)`, whatever the sample density.
///
/// # Arguments
/// * `interval` - Truncated, validated interval.
/// * `precision` - Step unit.
///
/// # Returns
/// * `error::Result<Vec<Bucket>>` - Ordered buckets, or a configuration error if the
///   interval is inverted or not truncated to `precision`.
pub fn bucketize(
    interval: &interval::Interval,
    precision: precision::Precision,
) -> error::Result<Vec<Bucket>> {
    if interval.start > interval.end {
        return Err(error::ClimatologyError::config(format!(
            "Interval start {} is after interval end {}",
            interval.start, interval.end
        )));
    }
    if precision.truncate(interval.start) != interval.start
        || precision.truncate(interval.end) != interval.end
    {
        return Err(error::ClimatologyError::config(format!(
            "Interval {}..{} is not aligned to {} precision",
            interval.start, interval.end, precision
        )));
    }

    let total = interval.bucket_count(precision);
    let mut buckets = Vec::with_capacity(total);
    let mut left = interval.start;

    for ordinal in 0..total {
        let right = precision.advance(left).ok_or_else(|| {
            error::ClimatologyError::config(format!(
                "Bucket after {} is outside the representable date range",
                left
            ))
        })?;
        buckets.push(Bucket { ordinal, left, right });
        left = right;
    }

    Ok(buckets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::precision::Precision;

    fn dt(s: &str) -> chrono::NaiveDateTime {
        chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn interval(start: &str, end: &str, precision: Precision) -> interval::Interval {
        interval::Interval::new(dt(start), dt(end), precision).unwrap()
    }

    #[test]
    fn count_matches_whole_units_plus_one() {
        let cases = [
            (Precision::Hour, "2019-09-02 00:00:00", "2019-09-03 05:00:00", 30),
            (Precision::Day, "2019-09-02 00:00:00", "2019-11-06 00:00:00", 66),
            (Precision::Month, "2019-09-01 00:00:00", "2020-02-01 00:00:00", 6),
            (Precision::Year, "2015-01-01 00:00:00", "2019-01-01 00:00:00", 5),
        ];
        for (precision, start, end, expected) in cases {
            let buckets = bucketize(&interval(start, end, precision), precision).unwrap();
            assert_eq!(buckets.len(), expected, "{precision}");
        }
    }

    #[test]
    fn single_unit_interval_has_one_bucket() {
        let buckets =
            bucketize(&interval("2019-09-02 00:00:00", "2019-09-02 00:00:00", Precision::Day), Precision::Day)
                .unwrap();
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].left, dt("2019-09-02 00:00:00"));
        assert_eq!(buckets[0].right, dt("2019-09-03 00:00:00"));
    }

    #[test]
    fn buckets_are_contiguous_and_ordered() {
        let buckets = bucketize(
            &interval("2019-11-01 00:00:00", "2020-03-01 00:00:00", Precision::Month),
            Precision::Month,
        )
        .unwrap();
        for (i, pair) in buckets.windows(2).enumerate() {
            assert_eq!(pair[0].right, pair[1].left);
            assert!(pair[0].left < pair[1].left);
            assert_eq!(pair[0].ordinal, i);
        }
        assert_eq!(buckets.last().unwrap().right, dt("2020-04-01 00:00:00"));
    }

    #[test]
    fn day_steps_cross_leap_day() {
        let buckets = bucketize(
            &interval("2020-02-28 00:00:00", "2020-03-01 00:00:00", Precision::Day),
            Precision::Day,
        )
        .unwrap();
        let lefts: Vec<_> = buckets.iter().map(|b| b.left).collect();
        assert_eq!(
            lefts,
            vec![dt("2020-02-28 00:00:00"), dt("2020-02-29 00:00:00"), dt("2020-03-01 00:00:00")]
        );
    }

    #[test]
    fn inverted_interval_is_a_configuration_error() {
        let inverted = interval::Interval {
            start: dt("2019-09-04 00:00:00"),
            end: dt("2019-09-02 00:00:00"),
        };
        let err = bucketize(&inverted, Precision::Day).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn unaligned_interval_is_a_configuration_error() {
        let unaligned = interval::Interval {
            start: dt("2019-09-02 05:00:00"),
            end: dt("2019-09-04 00:00:00"),
        };
        let err = bucketize(&unaligned, Precision::Day).unwrap_err();
        assert!(err.is_configuration());
    }
}
