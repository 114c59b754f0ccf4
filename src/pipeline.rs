use crate::bucket;
use crate::error;
use crate::index;
use crate::interval;
use crate::precision;
use crate::progress;
use crate::resample;
use crate::sample;
use crate::table;

/// Result of one aggregation run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub interval: interval::Interval,
    pub table: table::ColumnTable,
    /// Samples dropped because their truncated timestamp fell outside the interval.
    pub samples_outside: usize,
}

/// Runs bucketize → partition → aggregate → build over an already merged sample stream.
///
/// # Arguments
/// * `samples` - Merged, time-ordered samples.
/// * `interval` - Requested interval; `None` spans the first to the last sample.
/// * `precision` - Bucket unit.
/// * `reporter` - Progress observer.
///
/// # Returns
/// * `error::Result<RunOutput>` - The bucket table, or a configuration/load error raised
///   before any bucket was computed.
pub fn run(
    samples: &[sample::Sample],
    interval: Option<interval::Interval>,
    precision: precision::Precision,
    reporter: &mut dyn progress::ProgressReporter,
) -> error::Result<RunOutput> {
    let interval = match interval {
        Some(interval) => interval,
        None => interval::Interval::from_samples(samples, precision)?,
    };

    let buckets = bucket::bucketize(&interval, precision)?;
    log::info!(
        "Aggregating {} samples into {} {} buckets ({} .. {})",
        samples.len(),
        buckets.len(),
        precision,
        interval.start,
        interval.end
    );

    let index = index::partition(samples, &buckets, precision);
    let records = resample::aggregate(&buckets, &index, precision, reporter);

    Ok(RunOutput {
        interval,
        table: table::build(&records, precision),
        samples_outside: index.outside(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::precision::Precision;

    fn dt(s: &str) -> chrono::NaiveDateTime {
        chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn september_samples() -> Vec<sample::Sample> {
        vec![
            sample::Sample::new(dt("2019-09-02 01:00:00"), 10.0),
            sample::Sample::new(dt("2019-09-02 09:00:00"), 12.0),
            sample::Sample::new(dt("2019-09-02 17:00:00"), 14.0),
            sample::Sample::new(dt("2019-09-04 03:00:00"), 20.0),
        ]
    }

    #[test]
    fn three_day_interval_with_a_gap() {
        let samples = september_samples();
        let interval = interval::Interval::parse("2019-09-02:2019-09-04", Precision::Day).unwrap();
        let out = run(&samples, Some(interval), Precision::Day, &mut progress::SilentReporter).unwrap();
        let t = &out.table;

        assert_eq!(t.len(), 3);
        assert_eq!(
            t.time_left,
            vec![dt("2019-09-02 00:00:00"), dt("2019-09-03 00:00:00"), dt("2019-09-04 00:00:00")]
        );
        assert_eq!(
            t.time_right,
            vec![dt("2019-09-03 00:00:00"), dt("2019-09-04 00:00:00"), dt("2019-09-05 00:00:00")]
        );
        assert_eq!((t.average[0], t.minimum[0], t.maximum[0]), (12.0, 10.0, 14.0));
        assert!(t.average[1].is_nan() && t.minimum[1].is_nan() && t.maximum[1].is_nan());
        assert_eq!((t.average[2], t.minimum[2], t.maximum[2]), (20.0, 20.0, 20.0));
        assert_eq!(out.samples_outside, 0);
    }

    #[test]
    fn missing_interval_spans_the_data() {
        let samples = september_samples();
        let out = run(&samples, None, Precision::Day, &mut progress::SilentReporter).unwrap();
        assert_eq!(out.interval.start, dt("2019-09-02 00:00:00"));
        assert_eq!(out.interval.end, dt("2019-09-04 00:00:00"));
        assert_eq!(out.table.len(), 3);
    }

    #[test]
    fn record_count_is_invariant_under_sparsity() {
        let interval = interval::Interval::parse("2019-09-01:2019-09-30", Precision::Day).unwrap();
        let dense: Vec<sample::Sample> = (1..=30)
            .map(|d| {
                let ts = chrono::NaiveDate::from_ymd_opt(2019, 9, d).unwrap().and_hms_opt(12, 0, 0).unwrap();
                sample::Sample::new(ts, d as f64)
            })
            .collect();
        let sparse: Vec<sample::Sample> = dense.iter().copied().step_by(7).collect();

        for samples in [&dense[..], &sparse[..], &[][..]] {
            let out = run(samples, Some(interval), Precision::Day, &mut progress::SilentReporter).unwrap();
            assert_eq!(out.table.len(), 30);
            for w in out.table.time_left.windows(2).zip(out.table.time_right.iter()) {
                assert_eq!(*w.1, w.0[1]);
            }
        }
    }

    #[test]
    fn non_empty_rows_are_ordered() {
        let samples: Vec<sample::Sample> = (0..200)
            .map(|i| {
                let ts = dt("2019-09-02 00:00:00") + chrono::TimeDelta::minutes(37 * i);
                sample::Sample::new(ts, ((i * 7919) % 113) as f64 / 3.0 - 10.0)
            })
            .collect();
        let out = run(&samples, None, Precision::Hour, &mut progress::SilentReporter).unwrap();
        for row in out.table.rows().filter(|r| !r.is_empty()) {
            assert!(row.minimum <= row.average && row.average <= row.maximum);
        }
        assert_eq!(out.table.samples_used(), 200);
    }

    #[test]
    fn repeated_runs_are_bit_identical() {
        let mut samples = september_samples();
        samples.push(sample::Sample::new(dt("2019-09-03 12:00:00"), f64::NAN));
        let a = run(&samples, None, Precision::Day, &mut progress::SilentReporter).unwrap();
        let b = run(&samples, None, Precision::Day, &mut progress::SilentReporter).unwrap();
        assert!(a.table.bit_eq(&b.table));
    }

    #[test]
    fn reporter_does_not_change_output() {
        let samples = september_samples();
        let silent = run(&samples, None, Precision::Hour, &mut progress::SilentReporter).unwrap();
        let mut recorder = progress::RecordingReporter::default();
        let observed = run(&samples, None, Precision::Hour, &mut recorder).unwrap();
        assert!(silent.table.bit_eq(&observed.table));
        assert_eq!(recorder.ticks.len(), observed.table.len());
    }

    #[test]
    fn all_nan_bucket_is_reported_empty() {
        let samples = vec![
            sample::Sample::new(dt("2019-09-02 01:00:00"), 1.0),
            sample::Sample::new(dt("2019-09-03 01:00:00"), f64::NAN),
            sample::Sample::new(dt("2019-09-04 01:00:00"), 3.0),
        ];
        let out = run(&samples, None, Precision::Day, &mut progress::SilentReporter).unwrap();
        assert_eq!(out.table.count, vec![1, 0, 1]);
        assert_eq!(out.table.excluded, vec![0, 1, 0]);
        assert_eq!(out.table.empty_buckets(), 1);
    }

    #[test]
    fn samples_outside_interval_are_counted() {
        let samples = september_samples();
        let interval = interval::Interval::parse("2019-09-02:2019-09-02", Precision::Day).unwrap();
        let out = run(&samples, Some(interval), Precision::Day, &mut progress::SilentReporter).unwrap();
        assert_eq!(out.table.len(), 1);
        assert_eq!(out.samples_outside, 1);
    }

    #[test]
    fn mid_period_start_bound_covers_the_whole_period() {
        let samples = vec![
            sample::Sample::new(dt("2019-02-10 00:00:00"), 4.0),
            sample::Sample::new(dt("2019-10-10 00:00:00"), 8.0),
            sample::Sample::new(dt("2020-03-01 00:00:00"), 99.0),
        ];
        let interval = interval::Interval::parse("2019-09-02:2019-12", Precision::Year).unwrap();
        let out = run(&samples, Some(interval), Precision::Year, &mut progress::SilentReporter).unwrap();
        assert_eq!(out.table.len(), 1);
        assert_eq!(out.table.time_left[0], dt("2019-01-01 00:00:00"));
        assert_eq!(out.table.count, vec![2]);
        assert_eq!(out.table.average[0], 6.0);
        assert_eq!(out.samples_outside, 1);
    }

    #[test]
    fn inverted_interval_fails_before_any_bucket() {
        let inverted = interval::Interval {
            start: dt("2019-09-04 00:00:00"),
            end: dt("2019-09-02 00:00:00"),
        };
        let mut recorder = progress::RecordingReporter::default();
        let err = run(&september_samples(), Some(inverted), Precision::Day, &mut recorder).unwrap_err();
        assert!(err.is_configuration());
        assert!(recorder.ticks.is_empty());
    }

    #[test]
    fn no_samples_and_no_interval_is_a_load_error() {
        let err = run(&[], None, Precision::Day, &mut progress::SilentReporter).unwrap_err();
        assert!(matches!(err, error::ClimatologyError::Load { .. }));
    }
}
