use crate::table;

/// Configures a custom Rayon thread pool with specified size.
///
/// Used to bound the parallel file loading when `--threads` is given, separately from
/// the global Rayon pool.
///
/// # Arguments
/// * `num_threads` - Desired number of threads for the pool.
///
/// # Returns
/// * `Result<ThreadPool>` - Created thread pool or an error if creation fails.
pub fn configure_thread_pool(num_threads: usize) -> anyhow::Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build thread pool: {}", e))
}

/// Initialises `env_logger`. `RUST_LOG` wins; otherwise `warn`, or `debug` with `--verbose`.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .try_init();
}

/// Formats a bucket edge as `YYYY-MM-DD HH:MM:SS`.
pub fn format_timestamp(ts: chrono::NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Formats a table value; empty buckets print as `-`.
fn format_value(value: f64) -> String {
    if value.is_nan() {
        "-".to_string()
    } else {
        format!("{:.4}", value)
    }
}

/// Prints the first `count` rows of a bucket table.
///
/// # Example Output
/// ```text
///  - 2019-09-02: avg: 12.0000, min: 10.0000, max: 14.0000, n: 3
///  - 2019-09-03: empty
/// ```
pub fn print_rows(table: &table::ColumnTable, count: usize) {
    for (i, row) in table.rows().take(count).enumerate() {
        let label = table.label(i).unwrap_or_else(|| format_timestamp(row.time_left));
        if row.is_empty() {
            println!(" - {}: empty", label);
        } else {
            println!(
                " - {}: avg: {}, min: {}, max: {}, n: {}",
                label,
                format_value(row.average),
                format_value(row.minimum),
                format_value(row.maximum),
                row.count,
            );
        }
    }
}
