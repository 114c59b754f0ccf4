mod bucket;
mod cli;
mod config;
mod csv_processor;
mod error;
mod file_processing;
mod index;
mod interval;
mod pipeline;
mod precision;
mod progress;
mod read_table;
mod render;
mod resample;
mod sample;
mod table;
mod utils;

/// Number of bucket rows printed after aggregation and after `--check`.
const PREVIEW_ROWS: usize = 5;

/// Main entry point of the application.
///
/// This function orchestrates the entire workflow:
/// 1. Parses command-line arguments and validates the configuration.
/// 2. Collects input files and loads/merges their samples.
/// 3. Buckets, partitions and reduces the samples over the interval.
/// 4. Prints a summary and optionally writes the bucket table.
/// 5. Optionally reads the written snapshot back and prints the first rows.
///
/// # Returns
///
/// * `anyhow::Result<()>` - Success or an error if any step fails.
fn main() -> anyhow::Result<()> {
    let total_start = std::time::Instant::now();
    let args = cli::Args::parse();
    utils::init_logging(args.verbose);

    let config = config::RunConfig::from_args(&args).unwrap_or_else(|e| exit_with_usage(e));
    println!("Start aggregation...");

    let files = file_processing::collect_input_files(&config.files)
        .unwrap_or_else(|e| exit_on_core_error(e));
    if let Some(target) = &config.output {
        file_processing::ensure_parent_dir_exist(target.path())?;
    }

    let threads = config.threads.unwrap_or_else(rayon::current_num_threads);
    println!("🚀 Loading {} file(s) using {} thread(s)", files.len(), threads);

    let load_start = std::time::Instant::now();
    let loaded = if let Some(n) = config.threads {
        let local_pool = utils::configure_thread_pool(n)?;
        local_pool.install(|| csv_processor::load_sources(&files, &config.columns))
    } else {
        csv_processor::load_sources(&files, &config.columns)
    };
    let samples = loaded.unwrap_or_else(|e| exit_on_core_error(e));
    println!(
        "📥 Loaded {} samples in {:?} seconds",
        samples.len(),
        load_start.elapsed().as_secs_f64()
    );

    let mut reporter: Box<dyn progress::ProgressReporter> = if config.show_progress {
        Box::new(progress::BarReporter::new())
    } else {
        Box::new(progress::SilentReporter)
    };
    let output = pipeline::run(&samples, config.interval, config.precision, reporter.as_mut())
        .unwrap_or_else(|e| exit_on_core_error(e));

    render::print_summary(&output, PREVIEW_ROWS);

    if let Some(target) = &config.output {
        render::write_table(&output.table, target)?;
        println!("💾 Bucket table written to {}", target.path().display());
    }

    println!(
        "✅ Aggregation completed in {:?} seconds",
        total_start.elapsed().as_secs_f64()
    );

    if config.check {
        if let Some(target) = &config.output {
            println!("Start reading...");
            read_table::check_snapshot(target.path(), PREVIEW_ROWS)?;
        }
    }

    Ok(())
}

/// Reports a configuration error with usage guidance and exits before the pipeline runs.
fn exit_with_usage(err: error::ClimatologyError) -> ! {
    eprintln!("❌ {}", err);
    cli::print_usage();
    std::process::exit(2);
}

/// Configuration errors get usage; load errors just the message. Both exit non-zero.
fn exit_on_core_error(err: error::ClimatologyError) -> ! {
    if err.is_configuration() {
        exit_with_usage(err);
    }
    eprintln!("❌ {}", err);
    std::process::exit(1);
}
