//! Input resolution: files, directories and glob patterns

use crate::error::CliError;
use anyhow::{Context, Result};
use glob::{glob, Pattern};
use std::path::{Path, PathBuf};

/// Files selected by the command-line inputs
#[derive(Debug, Default)]
pub struct ResolvedInputs {
    pub files: Vec<PathBuf>,
    /// At least one input named a directory
    pub had_directory: bool,
}

/// Resolve inputs to a sorted, de-duplicated list of files
///
/// Existing files are taken as given. Directories are scanned for files
/// whose extension is in `extensions` (recursively with `recursive`).
/// Anything else is treated as a glob pattern.
pub fn resolve_inputs(
    inputs: &[String],
    recursive: bool,
    extensions: &[String],
) -> Result<ResolvedInputs> {
    let mut resolved = ResolvedInputs::default();

    for input in inputs {
        let path = Path::new(input);
        if path.is_file() {
            resolved.files.push(path.to_path_buf());
        } else if path.is_dir() {
            resolved.had_directory = true;
            let found = scan_directory(path, recursive, extensions)?;
            log::debug!("{}: {} matching file(s)", path.display(), found.len());
            resolved.files.extend(found);
        } else {
            let found = resolve_pattern(input)?;
            if found.is_empty() {
                return Err(CliError::FileNotFound(input.clone()).into());
            }
            resolved.files.extend(found);
        }
    }

    if resolved.files.is_empty() {
        anyhow::bail!("No files found matching the provided inputs");
    }

    resolved.files.sort();
    resolved.files.dedup();

    Ok(resolved)
}

fn resolve_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let paths = glob(pattern)
        .map_err(|e| CliError::InvalidPattern(format!("{pattern}: {e}")))?;

    let mut files = Vec::new();
    for path_result in paths {
        let path = path_result.with_context(|| format!("Error resolving pattern: {pattern}"))?;
        if path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

fn scan_directory(dir: &Path, recursive: bool, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let base = Pattern::escape(&dir.to_string_lossy());
    let pattern = if recursive {
        format!("{base}/**/*")
    } else {
        format!("{base}/*")
    };

    Ok(resolve_pattern(&pattern)?
        .into_iter()
        .filter(|path| has_extension(path, extensions))
        .collect())
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(ext))
}
