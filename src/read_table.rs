use crate::table;
use crate::utils;

/// Loads a `.bin` table snapshot.
///
/// Uses mmap for zero-copy reading before `bincode` deserialization.
///
/// # Arguments
/// * `path` - Snapshot written by `render::write_snapshot`.
///
/// # Returns
/// * `anyhow::Result<table::ColumnTable>`
pub fn read_snapshot<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<table::ColumnTable> {
    use anyhow::Context;

    let file = std::fs::File::open(path.as_ref())
        .with_context(|| format!("Failed to open snapshot {}", path.as_ref().display()))?;
    let mmap = unsafe { memmap2::Mmap::map(&file)? };
    let table: table::ColumnTable = bincode::deserialize(&mmap)
        .map_err(|e| anyhow::anyhow!("Failed to decode snapshot {}: {}", path.as_ref().display(), e))?;

    let columns = [
        table.time_right.len(),
        table.average.len(),
        table.minimum.len(),
        table.maximum.len(),
        table.count.len(),
        table.excluded.len(),
    ];
    if columns.iter().any(|&len| len != table.time_left.len()) {
        anyhow::bail!("Snapshot {} has columns of unequal length", path.as_ref().display());
    }

    anyhow::Ok(table)
}

/// Reads a snapshot back and prints its first `count` rows.
pub fn check_snapshot<P: AsRef<std::path::Path>>(path: P, count: usize) -> anyhow::Result<()> {
    let start = std::time::Instant::now();
    let table = read_snapshot(&path)?;
    println!(
        "📄 Read first {} bucket(s) from {} ({} total)",
        count.min(table.len()),
        path.as_ref().display(),
        table.len()
    );
    utils::print_rows(&table, count);
    println!(
        "✅ Reading snapshot completed in {:?} seconds",
        start.elapsed().as_secs_f64()
    );
    anyhow::Ok(())
}
