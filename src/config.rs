use crate::cli;
use crate::error;
use crate::interval;
use crate::precision;

/// Names of the CSV columns holding the timestamp and the measurement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnNames {
    pub time: String,
    pub value: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        ColumnNames {
            time: "time".to_string(),
            value: "seawater_temperature".to_string(),
        }
    }
}

/// Where the finished bucket table is written, chosen by file extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Csv(std::path::PathBuf),
    Snapshot(std::path::PathBuf),
}

impl OutputTarget {
    pub fn from_path(path: &std::path::Path) -> error::Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("csv") => Ok(OutputTarget::Csv(path.to_path_buf())),
            Some("bin") => Ok(OutputTarget::Snapshot(path.to_path_buf())),
            _ => Err(error::ClimatologyError::config(format!(
                "Unsupported output file {}: expected a .csv or .bin extension",
                path.display()
            ))),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        match self {
            OutputTarget::Csv(path) | OutputTarget::Snapshot(path) => path,
        }
    }
}

/// Validated run configuration.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub files: Vec<std::path::PathBuf>,
    pub precision: precision::Precision,
    pub interval: Option<interval::Interval>,
    pub columns: ColumnNames,
    pub output: Option<OutputTarget>,
    pub check: bool,
    pub threads: Option<usize>,
    pub show_progress: bool,
}

impl RunConfig {
    /// Resolves raw arguments into a configuration the pipeline can run with.
    ///
    /// # Errors
    /// * Configuration error for an empty file list, a malformed or inverted interval,
    ///   an unsupported output extension, or `--check` without a `.bin` output.
    pub fn from_args(args: &cli::Args) -> error::Result<Self> {
        if args.files.is_empty() {
            return Err(error::ClimatologyError::config(
                "A filename or directory path must be specified",
            ));
        }

        let interval = args
            .interval
            .as_deref()
            .map(|spec| interval::Interval::parse(spec, args.precision))
            .transpose()?;

        let output = args
            .output
            .as_deref()
            .map(OutputTarget::from_path)
            .transpose()?;

        if args.check && !matches!(output, Some(OutputTarget::Snapshot(_))) {
            return Err(error::ClimatologyError::config(
                "--check reads back a .bin snapshot; use --output <file>.bin",
            ));
        }

        Ok(RunConfig {
            files: args.files.clone(),
            precision: args.precision,
            interval,
            columns: ColumnNames {
                time: args.time_column.clone(),
                value: args.value_column.clone(),
            },
            output,
            check: args.check,
            threads: args.threads.map(effective_threads),
            show_progress: !args.quiet,
        })
    }
}

/// Caps a requested thread count at the number of available CPUs.
pub fn effective_threads(requested: usize) -> usize {
    let max_threads = num_cpus::get();
    if requested > max_threads {
        log::warn!("Limiting thread count to {} (max available)", max_threads);
        max_threads
    } else {
        requested
    }
}
