use crate::bucket;
use crate::index;
use crate::precision;
use crate::progress;

/// Reduced statistics for one bucket, or an explicit marker that it holds no valid samples.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Summary {
    Empty,
    Stats {
        average: f64,
        minimum: f64,
        maximum: f64,
        count: usize,
    },
}

impl Summary {
    pub fn is_empty(&self) -> bool {
        matches!(self, Summary::Empty)
    }
}

/// Represents a single bucket after reduction.
///
/// There is exactly one record per bucket, in bucket order:
/// - `bucket`: Ordinal and `[left, right)` edges.
/// - `summary`: Mean/min/max of the valid samples, or `Summary::Empty`.
/// - `excluded`: Non-finite samples that were assigned here and left out of the reduction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketRecord {
    pub bucket: bucket::Bucket,
    pub summary: Summary,
    pub excluded: usize,
}

/// Reduces one bucket's values to mean, minimum and maximum.
///
/// Non-finite values (NaN, ±inf) are excluded and counted. If nothing valid remains the
/// bucket is `Summary::Empty`, exactly as if no sample had been assigned. The mean is
/// updated incrementally, so it stays finite for any finite input, and is clamped into
/// `[minimum, maximum]` to absorb rounding.
///
/// # Arguments
/// * `values` - Values assigned to one bucket.
///
/// # Returns
/// * `(Summary, usize)` - The reduction and the number of excluded values.
pub fn reduce(values: &[f64]) -> (Summary, usize) {
    let mut count = 0usize;
    let mut mean = 0.0f64;
    let mut minimum = f64::INFINITY;
    let mut maximum = f64::NEG_INFINITY;

    for &value in values {
        if !value.is_finite() {
            continue;
        }
        count += 1;
        // Both terms are scaled by 1/n before subtracting so opposite extremes cannot overflow.
        let n = count as f64;
        mean += value / n - mean / n;
        minimum = minimum.min(value);
        maximum = maximum.max(value);
    }

    let excluded = values.len() - count;
    if count == 0 {
        return (Summary::Empty, excluded);
    }

    let average = mean.clamp(minimum, maximum);
    (
        Summary::Stats {
            average,
            minimum,
            maximum,
            count,
        },
        excluded,
    )
}

/// Reduces every bucket in order, reporting progress once per bucket.
///
/// Empty buckets still produce a record, so record `i` always belongs to bucket `i`
/// regardless of where data is missing. The reporter only observes; it has no influence
/// on the records returned.
///
/// # Arguments
/// * `buckets` - Ordered bucket sequence.
/// * `index` - Partitioned sample values, one slot per bucket.
/// * `precision` - Used for progress labels only.
/// * `reporter` - Progress sink.
///
/// # Returns
/// * `Vec<BucketRecord>` - Same length and order as `buckets`.
pub fn aggregate(
    buckets: &[bucket::Bucket],
    index: &index::BucketIndex,
    precision: precision::Precision,
    reporter: &mut dyn progress::ProgressReporter,
) -> Vec<BucketRecord> {
    let total = buckets.len();
    let final_label = buckets
        .last()
        .map(|b| b.left.format(precision.display_format()).to_string())
        .unwrap_or_default();

    let mut records = Vec::with_capacity(total);
    for b in buckets {
        let label = b.left.format(precision.display_format()).to_string();
        reporter.report(&progress::ProgressTick {
            label: &label,
            final_label: &final_label,
            ordinal: b.ordinal + 1,
            total,
        });

        let (summary, excluded) = reduce(index.slot(b.ordinal));
        if excluded > 0 {
            log::warn!("Excluded {} non-finite samples from bucket {}", excluded, label);
        }
        records.push(BucketRecord {
            bucket: *b,
            summary,
            excluded,
        });
    }
    reporter.finish();

    records
}
