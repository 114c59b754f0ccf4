use crate::config;
use crate::pipeline;
use crate::table;
use crate::utils;

/// One CSV output row: edges, display label, and the band values.
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    time_left: String,
    time_right: String,
    label: String,
    average: f64,
    minimum: f64,
    maximum: f64,
    count: usize,
    excluded: usize,
}

/// Writes the bucket table to the chosen output target.
pub fn write_table(table: &table::ColumnTable, target: &config::OutputTarget) -> anyhow::Result<()> {
    match target {
        config::OutputTarget::Csv(path) => write_csv(table, path),
        config::OutputTarget::Snapshot(path) => write_snapshot(table, path),
    }
}

/// Writes the table as chart-ready CSV. Empty buckets keep their row with `NaN` values.
pub fn write_csv<P: AsRef<std::path::Path>>(table: &table::ColumnTable, path: P) -> anyhow::Result<()> {
    use anyhow::Context;

    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    for (i, row) in table.rows().enumerate() {
        writer.serialize(CsvRow {
            time_left: utils::format_timestamp(row.time_left),
            time_right: utils::format_timestamp(row.time_right),
            label: table.label(i).unwrap_or_default(),
            average: row.average,
            minimum: row.minimum,
            maximum: row.maximum,
            count: row.count,
            excluded: row.excluded,
        })?;
    }
    writer.flush()?;

    log::info!("Wrote {} rows to {}", table.len(), path.display());
    anyhow::Ok(())
}

/// Serializes the table with `bincode` so it can be reloaded without re-aggregating.
pub fn write_snapshot<P: AsRef<std::path::Path>>(table: &table::ColumnTable, path: P) -> anyhow::Result<()> {
    let data = bincode::serialize(table)?;
    std::fs::write(path.as_ref(), data)?;
    log::info!("Wrote snapshot of {} buckets to {}", table.len(), path.as_ref().display());
    anyhow::Ok(())
}

/// Prints the run summary followed by the first rows of the table.
pub fn print_summary(output: &pipeline::RunOutput, preview_rows: usize) {
    let table = &output.table;
    println!(
        "📊 {} {} bucket(s) from {} to {}",
        table.len(),
        table.precision,
        utils::format_timestamp(output.interval.start),
        utils::format_timestamp(output.interval.end),
    );
    println!(
        "   empty: {}, samples used: {}, excluded (non-finite): {}, outside interval: {}",
        table.empty_buckets(),
        table.samples_used(),
        table.samples_excluded(),
        output.samples_outside,
    );
    println!("📄 First {} bucket(s)", preview_rows.min(table.len()));
    utils::print_rows(table, preview_rows);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval;
    use crate::precision::Precision;
    use crate::progress;
    use crate::sample;

    fn table() -> table::ColumnTable {
        let dt = |s: &str| chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
        let samples = vec![
            sample::Sample::new(dt("2019-09-02 01:00:00"), 10.0),
            sample::Sample::new(dt("2019-09-02 02:00:00"), 14.0),
            sample::Sample::new(dt("2019-09-04 02:00:00"), 20.0),
        ];
        let interval = interval::Interval::parse("2019-09-02:2019-09-04", Precision::Day).unwrap();
        pipeline::run(&samples, Some(interval), Precision::Day, &mut progress::SilentReporter)
            .unwrap()
            .table
    }

    #[test]
    fn csv_output_keeps_empty_rows() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("table.csv");
        write_csv(&table(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "time_left,time_right,label,average,minimum,maximum,count,excluded"
        );
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[1],
            "2019-09-02 00:00:00,2019-09-03 00:00:00,2019-09-02,12.0,10.0,14.0,2,0"
        );
        assert_eq!(
            lines[2],
            "2019-09-03 00:00:00,2019-09-04 00:00:00,2019-09-03,NaN,NaN,NaN,0,0"
        );
    }

    #[test]
    fn write_table_dispatches_on_target() {
        let dir = tempfile::TempDir::new().unwrap();
        let bin = dir.path().join("table.bin");
        write_table(&table(), &config::OutputTarget::Snapshot(bin.clone())).unwrap();
        assert!(std::fs::metadata(&bin).unwrap().len() > 0);
    }
}
