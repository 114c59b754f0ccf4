use crate::error;

const INPUT_EXTENSIONS: [&str; 2] = ["csv", "txt"];
const PATTERN_CHARS: [char; 3] = ['*', '?', '['];

/// Expands `-f` arguments into the list of sample files to load.
///
/// Files are taken as given. A directory contributes every `.csv`/`.txt` file directly
/// inside it, sorted by name; other entries are skipped with a warning. A path that is
/// neither and contains `*`, `?` or `[` is expanded as a glob pattern, with the matches
/// sorted and filtered the same way as a directory listing.
///
/// # Arguments
/// * `paths` - Paths from the command line, in order.
///
/// # Returns
/// * `error::Result<Vec<PathBuf>>` - Input files in load order.
///
/// # Errors
/// * Load error if a path does not exist or a directory cannot be read.
/// * Configuration error if a pattern is invalid or matches no input file, or if no
///   input file remains.
pub fn collect_input_files(
    paths: &[std::path::PathBuf],
) -> error::Result<Vec<std::path::PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            let mut entries = std::fs::read_dir(path)
                .map_err(|e| {
                    error::ClimatologyError::load(format!(
                        "Failed to read directory {}: {}",
                        path.display(),
                        e
                    ))
                })?
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|p| p.is_file())
                .collect::<Vec<_>>();
            entries.sort();
            push_inputs(&mut files, entries);
        } else if is_pattern(path) {
            let before = files.len();
            push_inputs(&mut files, expand_pattern(path)?);
            if files.len() == before {
                return Err(error::ClimatologyError::config(format!(
                    "Pattern '{}' matched no CSV/TXT files",
                    path.display()
                )));
            }
        } else {
            return Err(error::ClimatologyError::load(format!(
                "Input path does not exist: {}",
                path.display()
            )));
        }
    }

    if files.is_empty() {
        return Err(error::ClimatologyError::config(
            "No CSV/TXT input files found in the given paths",
        ));
    }

    log::debug!("Collected {} input file(s)", files.len());
    Ok(files)
}

fn push_inputs(files: &mut Vec<std::path::PathBuf>, candidates: Vec<std::path::PathBuf>) {
    for candidate in candidates {
        if has_input_extension(&candidate) {
            files.push(candidate);
        } else {
            log::warn!("Skipping file with unknown format: {}", candidate.display());
        }
    }
}

fn is_pattern(path: &std::path::Path) -> bool {
    path.to_string_lossy().contains(PATTERN_CHARS)
}

/// Sorted regular files matching a glob pattern.
fn expand_pattern(path: &std::path::Path) -> error::Result<Vec<std::path::PathBuf>> {
    let pattern = path.to_string_lossy();
    let paths = glob::glob(&pattern).map_err(|e| {
        error::ClimatologyError::config(format!("Invalid file pattern '{}': {}", pattern, e))
    })?;

    let mut matches = paths
        .filter_map(|entry| match entry {
            Ok(p) => Some(p),
            Err(e) => {
                log::warn!("Skipping unreadable match: {}", e);
                None
            }
        })
        .filter(|p| p.is_file())
        .collect::<Vec<_>>();
    matches.sort();
    log::debug!("Pattern '{}' matched {} file(s)", pattern, matches.len());
    Ok(matches)
}

fn has_input_extension(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| {
            INPUT_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Creates the parent directory of an output file if it is missing.
pub fn ensure_parent_dir_exist<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
            log::debug!("Created output directory {}", parent.display());
        }
    }
    anyhow::Ok(())
}
