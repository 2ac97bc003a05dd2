//! Batch conversion
//!
//! This module provides functions for converting whole directory trees,
//! including file discovery and parallel processing on a caller-owned pool.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::ThreadPool;
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::converter::{ConvertPhase, ConvertProgress, convert_file, extension_of};
use crate::error::{Error, Result};

/// Extensions picked up by [`find_convertible_files`]
const CONVERTIBLE_EXTENSIONS: [&str; 2] = ["msbt", "json"];

/// Options for batch conversion
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Worker thread count, `None` lets rayon decide
    pub threads: Option<usize>,
    /// Replace destination files that already exist
    pub overwrite: bool,
}

impl BatchOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    #[must_use]
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Build the worker pool these options describe
    ///
    /// # Errors
    /// Returns [`Error::WorkerPool`] if rayon cannot start the pool.
    pub fn build_pool(&self) -> Result<ThreadPool> {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(threads) = self.threads {
            builder = builder.num_threads(threads);
        }
        builder
            .build()
            .map_err(|e| Error::WorkerPool(e.to_string()))
    }
}

/// Result of a batch conversion
#[derive(Debug, Clone, Default)]
pub struct BatchConvertResult {
    /// Number of successful conversions
    pub success_count: usize,
    /// Number of failed conversions
    pub fail_count: usize,
    /// Number of files left alone because the destination existed
    pub skipped_count: usize,
    /// Messages for each file processed
    pub results: Vec<String>,
}

/// Find all .msbt and .json files in a directory recursively
///
/// # Returns
/// A sorted list of paths found in the directory tree.
pub fn find_convertible_files<P: AsRef<Path>>(dir: P) -> Vec<PathBuf> {
    let mut files: Vec<_> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| {
            e.path().is_file()
                && CONVERTIBLE_EXTENSIONS.contains(&extension_of(e.path()).as_str())
        })
        .map(|e| e.path().to_path_buf())
        .collect();

    files.sort();
    files
}

/// Extension a file converts to, if it is convertible
fn target_extension(path: &Path) -> Option<&'static str> {
    match extension_of(path).as_str() {
        "msbt" => Some("json"),
        "json" => Some("msbt"),
        _ => None,
    }
}

/// Destination of `source` under `dest_base`, mirroring its place below `source_base`
///
/// # Returns
/// `None` if `source` is not a convertible file.
pub fn output_path_for(source: &Path, source_base: &Path, dest_base: &Path) -> Option<PathBuf> {
    let extension = target_extension(source)?;
    let relative = source.strip_prefix(source_base).unwrap_or(source);
    let relative = match relative.file_name() {
        Some(_) => relative,
        None => Path::new(source.file_name()?),
    };
    Some(dest_base.join(relative).with_extension(extension))
}

/// Batch convert files in parallel
///
/// Each file is converted to the opposite format and written under
/// `dest_base`, preserving its path relative to `source_base`. A failing
/// file is reported in the result and does not stop the others.
///
/// # Arguments
/// * `pool` - Worker pool to run conversions on
/// * `files` - Files to convert
/// * `source_base` - Base directory of the source (for calculating relative paths)
/// * `dest_base` - Destination directory
/// * `options` - Batch options; only `overwrite` is consulted here
/// * `progress` - Callback for progress updates
pub fn batch_convert<F>(
    pool: &ThreadPool,
    files: &[PathBuf],
    source_base: &Path,
    dest_base: &Path,
    options: &BatchOptions,
    progress: F,
) -> BatchConvertResult
where
    F: Fn(&ConvertProgress) + Send + Sync,
{
    let success_counter = AtomicUsize::new(0);
    let fail_counter = AtomicUsize::new(0);
    let skip_counter = AtomicUsize::new(0);
    let processed = AtomicUsize::new(0);
    let total = files.len();

    let results: Vec<String> = pool.install(|| {
        files
            .par_iter()
            .map(|source| {
                let relative_path = source.strip_prefix(source_base).unwrap_or(source.as_path());
                let display_path = relative_path.to_string_lossy();

                let current = processed.fetch_add(1, Ordering::SeqCst) + 1;
                progress(&ConvertProgress::with_file(
                    ConvertPhase::Converting,
                    current,
                    total,
                    display_path.to_string(),
                ));

                let Some(dest) = output_path_for(source, source_base, dest_base) else {
                    fail_counter.fetch_add(1, Ordering::SeqCst);
                    return format!("Failed {display_path}: not a convertible file");
                };

                if dest.exists() && !options.overwrite {
                    skip_counter.fetch_add(1, Ordering::SeqCst);
                    return format!("Skipped {display_path}: {} exists", dest.display());
                }

                if let Some(parent) = dest.parent() {
                    if let Err(e) = std::fs::create_dir_all(parent) {
                        fail_counter.fetch_add(1, Ordering::SeqCst);
                        tracing::warn!("Failed to create folder for {}: {}", display_path, e);
                        return format!("Failed to create folder for {display_path}: {e}");
                    }
                }

                match convert_file(source.as_path(), dest.as_path()) {
                    Ok(()) => {
                        success_counter.fetch_add(1, Ordering::SeqCst);
                        format!("Converted: {display_path}")
                    }
                    Err(e) => {
                        fail_counter.fetch_add(1, Ordering::SeqCst);
                        tracing::warn!("Failed to convert {}: {}", display_path, e);
                        format!("Failed {display_path}: {e}")
                    }
                }
            })
            .collect()
    });

    BatchConvertResult {
        success_count: success_counter.load(Ordering::SeqCst),
        fail_count: fail_counter.load(Ordering::SeqCst),
        skipped_count: skip_counter.load(Ordering::SeqCst),
        results,
    }
}

/// What [`plan_conversion`] decided to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionPlan {
    /// Convert one file
    File { source: PathBuf, dest: PathBuf },
    /// Convert every file found below `source` into `dest`
    Directory {
        source: PathBuf,
        dest: PathBuf,
        files: Vec<PathBuf>,
    },
}

/// Decide between single-file and directory conversion
///
/// A directory source needs a destination that is not an existing file, and
/// a file source needs a destination that is not an existing directory.
///
/// # Errors
/// Returns [`Error::InvalidPath`] if `source` does not exist or the
/// destination has the wrong kind.
pub fn plan_conversion(source: &Path, dest: &Path) -> Result<ConversionPlan> {
    if source.is_dir() {
        if dest.is_file() {
            return Err(Error::InvalidPath(dest.to_path_buf()));
        }
        Ok(ConversionPlan::Directory {
            source: source.to_path_buf(),
            dest: dest.to_path_buf(),
            files: find_convertible_files(source),
        })
    } else if source.is_file() {
        if dest.is_dir() {
            return Err(Error::InvalidPath(dest.to_path_buf()));
        }
        Ok(ConversionPlan::File {
            source: source.to_path_buf(),
            dest: dest.to_path_buf(),
        })
    } else {
        Err(Error::InvalidPath(source.to_path_buf()))
    }
}
