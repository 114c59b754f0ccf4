/// A single timestamped reading. Read-only once loaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub timestamp: chrono::NaiveDateTime,
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp: chrono::NaiveDateTime, value: f64) -> Self {
        Sample { timestamp, value }
    }
}

/// Merges per-source sample sets into one time-ordered, deduplicated stream.
///
/// Sources are concatenated in the order given and stably sorted by timestamp, so
/// when two sources report the same instant the reading from the earlier source wins.
///
/// # Arguments
/// * `sources` - One sample vector per input, in input order.
///
/// # Returns
/// * `Vec<Sample>` - Strictly increasing by timestamp.
pub fn merge_sources(sources: Vec<Vec<Sample>>) -> Vec<Sample> {
    let total = sources.iter().map(Vec::len).sum();
    let mut merged = Vec::with_capacity(total);
    for source in sources {
        merged.extend(source);
    }
    merged.sort_by_key(|s| s.timestamp);
    merged.dedup_by_key(|s| s.timestamp);
    merged
}
