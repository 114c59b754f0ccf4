use crate::bucket;
use crate::precision;
use crate::sample;

/// Sample values grouped by bucket ordinal.
///
/// Built in one pass over the buckets (slot allocation) and one pass over the samples
/// (assignment), so the reduction never has to search the sample set per bucket.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BucketIndex {
    slots: Vec<Vec<f64>>,
    outside: usize,
}

impl BucketIndex {
    /// Values assigned to the bucket at `ordinal`, in stream order.
    pub fn slot(&self, ordinal: usize) -> &[f64] {
        self.slots.get(ordinal).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Samples whose truncated timestamp fell outside the bucket range.
    pub fn outside(&self) -> usize {
        self.outside
    }

    pub fn assigned(&self) -> usize {
        self.slots.iter().map(Vec::len).sum()
    }
}

/// Assigns every sample to the bucket whose `[left, right)` span holds its truncated timestamp.
///
/// The bucket ordinal is computed directly from the calendar distance between the first
/// bucket and the truncated timestamp, so the input does not need to be sorted. Samples
/// before the first or after the last bucket are counted in `outside()` and dropped.
///
/// # Arguments
/// * `samples` - Merged sample stream.
/// * `buckets` - Output of `bucket::bucketize` for the same `precision`.
/// * `precision` - Truncation unit.
///
/// # Returns
/// * `BucketIndex` - One slot per bucket, possibly empty.
pub fn partition(
    samples: &[sample::Sample],
    buckets: &[bucket::Bucket],
    precision: precision::Precision,
) -> BucketIndex {
    let mut slots = vec![Vec::new(); buckets.len()];
    let mut outside = 0usize;

    let Some(first) = buckets.first() else {
        return BucketIndex {
            slots,
            outside: samples.len(),
        };
    };

    for s in samples {
        let truncated = precision.truncate(s.timestamp);
        let ordinal = precision.units_between(first.left, truncated);
        if ordinal < 0 || ordinal as usize >= slots.len() {
            outside += 1;
            continue;
        }
        let ordinal = ordinal as usize;
        debug_assert_eq!(buckets[ordinal].left, truncated);
        slots[ordinal].push(s.value);
    }

    let index = BucketIndex { slots, outside };
    log::debug!(
        "Partitioned {} samples into {} buckets ({} assigned, {} outside interval)",
        samples.len(),
        index.len(),
        index.assigned(),
        index.outside()
    );
    index
}
