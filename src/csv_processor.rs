use crate::config;
use crate::error;
use crate::sample;

use rayon::prelude::*;

/// Timestamp layouts accepted in the time column, tried after RFC 3339.
const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses a sample timestamp.
///
/// Accepts RFC 3339 (offsets are normalised to UTC), naive ISO-8601 date-times with a `T`
/// or space separator and optional fractional seconds, or a bare `YYYY-MM-DD` date.
pub fn parse_timestamp(raw: &str) -> Option<chrono::NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for format in NAIVE_TIMESTAMP_FORMATS {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(chrono::NaiveTime::MIN))
}

/// Parses a measurement. An empty field is read as `NaN` so the aggregator excludes it.
fn parse_value(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(f64::NAN);
    }
    raw.parse::<f64>().ok()
}

/// Reads samples from CSV data with a header row.
///
/// # Arguments
/// * `reader` - CSV source.
/// * `source` - Name used in error messages.
/// * `columns` - Header names of the time and value columns.
///
/// # Returns
/// * `error::Result<Vec<sample::Sample>>` - Samples in file order.
///
/// # Errors
/// * Load error if a column is missing, a row is malformed, or a timestamp or value
///   cannot be parsed.
pub fn read_samples<R: std::io::Read>(
    reader: R,
    source: &str,
    columns: &config::ColumnNames,
) -> error::Result<Vec<sample::Sample>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| error::ClimatologyError::load(format!("{}: {}", source, e)))?
        .clone();
    let column_position = |name: &str| {
        headers.iter().position(|h| h == name).ok_or_else(|| {
            error::ClimatologyError::load(format!("{}: column '{}' not found", source, name))
        })
    };
    let time_idx = column_position(&columns.time)?;
    let value_idx = column_position(&columns.value)?;

    let mut samples = Vec::new();
    for result in reader.records() {
        let record =
            result.map_err(|e| error::ClimatologyError::load(format!("{}: {}", source, e)))?;
        let line = record.position().map_or(0, |p| p.line());

        let raw_time = record.get(time_idx).unwrap_or_default();
        let timestamp = parse_timestamp(raw_time).ok_or_else(|| {
            error::ClimatologyError::load(format!(
                "{} line {}: invalid timestamp '{}'",
                source, line, raw_time
            ))
        })?;

        let raw_value = record.get(value_idx).unwrap_or_default();
        let value = parse_value(raw_value).ok_or_else(|| {
            error::ClimatologyError::load(format!(
                "{} line {}: invalid value '{}'",
                source, line, raw_value
            ))
        })?;

        samples.push(sample::Sample::new(timestamp, value));
    }

    Ok(samples)
}

/// Memory-maps one CSV file and reads its samples.
pub fn load_file<P: AsRef<std::path::Path>>(
    path: P,
    columns: &config::ColumnNames,
) -> error::Result<Vec<sample::Sample>> {
    let path = path.as_ref();
    let source = path.display().to_string();
    let io_error = |e: std::io::Error| error::ClimatologyError::load(format!("{}: {}", source, e));

    let file = std::fs::File::open(path).map_err(io_error)?;
    if file.metadata().map_err(io_error)?.len() == 0 {
        return Err(error::ClimatologyError::load(format!("{}: file is empty", source)));
    }
    let mmap = unsafe { memmap2::Mmap::map(&file).map_err(io_error)? };

    let samples = read_samples(&mmap[..], &source, columns)?;
    log::debug!("Loaded {} samples from {}", samples.len(), source);
    Ok(samples)
}

/// Loads every input file in parallel and merges them into one time-ordered stream.
///
/// One rayon task per file; runs on the current pool, so callers can bound it with
/// `ThreadPool::install`.
///
/// # Arguments
/// * `paths` - Input files in load order. Earlier files win on duplicate timestamps.
/// * `columns` - Header names of the time and value columns.
///
/// # Returns
/// * `error::Result<Vec<sample::Sample>>` - Merged, deduplicated samples.
pub fn load_sources(
    paths: &[std::path::PathBuf],
    columns: &config::ColumnNames,
) -> error::Result<Vec<sample::Sample>> {
    let sources = paths
        .par_iter()
        .map(|path| load_file(path, columns))
        .collect::<error::Result<Vec<_>>>()?;

    let read: usize = sources.iter().map(Vec::len).sum();
    let merged = sample::merge_sources(sources);
    if merged.len() < read {
        log::info!("Dropped {} duplicate timestamps while merging", read - merged.len());
    }
    Ok(merged)
}
