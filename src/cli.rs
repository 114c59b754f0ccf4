use crate::precision;

/// Structure representing command-line arguments.
#[derive(Debug, Clone)]
pub struct Args {
    pub files: Vec<std::path::PathBuf>,
    pub precision: precision::Precision,
    pub interval: Option<String>,
    pub output: Option<std::path::PathBuf>,
    pub check: bool,
    pub threads: Option<usize>,
    pub time_column: String,
    pub value_column: String,
    pub quiet: bool,
    pub verbose: bool,
}

/// Builds the `clap` command.
///
/// A missing `--file`, `--help`, or an unknown precision makes `clap` print usage and
/// exit before anything is loaded.
pub fn command() -> clap::Command {
    clap::Command::new("seawater_climatology")
        .version("0.1.0")
        .about("Aggregate seawater temperature samples into hourly, daily, monthly or yearly buckets")
        .arg(
            clap::Arg::new("file")
                .short('f')
                .long("file")
                .help("CSV file, directory or glob pattern of CSV/TXT sample files (repeatable)")
                .required(true)
                .num_args(1)
                .action(clap::ArgAction::Append),
        )
        .arg(
            clap::Arg::new("precision")
                .short('p')
                .long("precision")
                .help("Bucket precision: Y (year), M (month), D (day), h (hour)")
                .num_args(1)
                .default_value("D")
                .value_parser(clap::builder::ValueParser::new(parse_precision)),
        )
        .arg(
            clap::Arg::new("interval")
                .short('i')
                .long("interval")
                .help("<start_date>:<end_date>, e.g. 2019-09-02:2019-09-30 (default: entire range)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("output")
                .short('o')
                .long("output")
                .help("Write the bucket table to a .csv file or a .bin snapshot")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("check")
                .short('c')
                .long("check")
                .help("After writing, read the .bin snapshot back and print the first 5 rows")
                .action(clap::ArgAction::SetTrue)
                .requires("output"),
        )
        .arg(
            clap::Arg::new("threads")
                .short('t')
                .long("threads")
                .help("Number of threads used to load input files (default: all available)")
                .num_args(1)
                .value_parser(clap::builder::ValueParser::new(parse_usize_positive)),
        )
        .arg(
            clap::Arg::new("time-column")
                .long("time-column")
                .help("Name of the timestamp column")
                .num_args(1)
                .default_value("time"),
        )
        .arg(
            clap::Arg::new("value-column")
                .long("value-column")
                .help("Name of the measurement column")
                .num_args(1)
                .default_value("seawater_temperature"),
        )
        .arg(
            clap::Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Do not draw the progress bar")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug logging")
                .action(clap::ArgAction::SetTrue),
        )
}

impl Args {
    /// Parses the process arguments, exiting with usage on error.
    pub fn parse() -> Self {
        Args::from_matches(&command().get_matches())
    }

    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = command().try_get_matches_from(itr)?;
        Ok(Args::from_matches(&matches))
    }

    fn from_matches(matches: &clap::ArgMatches) -> Self {
        Args {
            files: matches
                .get_many::<String>("file")
                .map(|values| values.map(std::path::PathBuf::from).collect())
                .unwrap_or_default(),
            precision: matches
                .get_one::<precision::Precision>("precision")
                .copied()
                .unwrap_or(precision::Precision::Day),
            interval: matches.get_one::<String>("interval").cloned(),
            output: matches.get_one::<String>("output").map(std::path::PathBuf::from),
            check: matches.get_flag("check"),
            threads: matches.get_one::<usize>("threads").cloned(),
            time_column: matches
                .get_one::<String>("time-column")
                .cloned()
                .unwrap_or_else(|| "time".to_string()),
            value_column: matches
                .get_one::<String>("value-column")
                .cloned()
                .unwrap_or_else(|| "seawater_temperature".to_string()),
            quiet: matches.get_flag("quiet"),
            verbose: matches.get_flag("verbose"),
        }
    }
}

/// Prints usage to stdout. Used after a configuration error found past argument parsing.
pub fn print_usage() {
    let _ = command().print_help();
    println!();
}

fn parse_precision(s: &str) -> Result<precision::Precision, String> {
    precision::Precision::from_flag(s).map_err(|e| e.to_string())
}

/// Validates that the number of threads is a positive integer.
fn parse_usize_positive(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("Must be a positive integer".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(format!("Not a valid number: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_day_precision() {
        let args = Args::try_parse_from(["climatology", "-f", "data.csv"]).unwrap();
        assert_eq!(args.precision, precision::Precision::Day);
        assert_eq!(args.files, vec![std::path::PathBuf::from("data.csv")]);
        assert_eq!(args.interval, None);
        assert_eq!(args.time_column, "time");
        assert_eq!(args.value_column, "seawater_temperature");
        assert!(!args.check);
    }

    #[test]
    fn long_flags_and_repeated_files() {
        let args = Args::try_parse_from([
            "climatology",
            "--file",
            "a.csv",
            "--file",
            "dir",
            "--precision",
            "h",
            "--interval",
            "2019-09-02:2019-09-04",
            "--output",
            "out.bin",
            "--check",
            "--threads",
            "2",
        ])
        .unwrap();
        assert_eq!(args.files.len(), 2);
        assert_eq!(args.precision, precision::Precision::Hour);
        assert_eq!(args.interval.as_deref(), Some("2019-09-02:2019-09-04"));
        assert!(args.check);
        assert_eq!(args.threads, Some(2));
    }

    #[test]
    fn missing_file_is_rejected() {
        let err = Args::try_parse_from(["climatology", "-p", "M"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn invalid_precision_is_rejected() {
        let err = Args::try_parse_from(["climatology", "-f", "a.csv", "-p", "W"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn help_short_circuits() {
        let err = Args::try_parse_from(["climatology", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn check_requires_output() {
        let err = Args::try_parse_from(["climatology", "-f", "a.csv", "-c"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn zero_threads_is_rejected() {
        let err = Args::try_parse_from(["climatology", "-f", "a.csv", "-t", "0"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
