//! CLI interface for format conversion
use std::path::Path;
use std::time::Instant;

use crate::batch::{BatchOptions, ConversionPlan, batch_convert, plan_conversion};
use crate::cli::progress::{TRUCK, phase_emoji, print_done, print_step, simple_bar};
use crate::converter::{ConvertPhase, ConvertProgress, convert_file_with_progress};

pub fn execute(
    source: &Path,
    destination: &Path,
    threads: Option<usize>,
    overwrite: bool,
    quiet: bool,
) -> anyhow::Result<()> {
    let started = Instant::now();

    match plan_conversion(source, destination)? {
        ConversionPlan::File { source, dest } => {
            convert_file_with_progress(&source, &dest, &|progress: &ConvertProgress| {
                if quiet || progress.phase == ConvertPhase::Complete {
                    return;
                }
                let msg = progress
                    .current_file
                    .as_deref()
                    .unwrap_or(progress.phase.as_str());
                print_step(progress.current, progress.total, phase_emoji(progress.phase), msg);
            })?;
        }
        ConversionPlan::Directory {
            source,
            dest,
            files,
        } => {
            if files.is_empty() {
                println!("No .msbt or .json files found in: {}", source.display());
                return Ok(());
            }
            convert_directory(&source, &dest, &files, threads, overwrite, quiet)?;
        }
    }

    if !quiet {
        print_done(started.elapsed());
    }
    Ok(())
}

fn convert_directory(
    source: &Path,
    dest: &Path,
    files: &[std::path::PathBuf],
    threads: Option<usize>,
    overwrite: bool,
    quiet: bool,
) -> anyhow::Result<()> {
    let mut options = BatchOptions::new().overwrite(overwrite);
    options.threads = threads;
    let pool = options.build_pool()?;

    if !quiet {
        println!("{}Found {} files to convert", TRUCK, files.len());
    }

    let pb = simple_bar(files.len() as u64, "Converting");
    if quiet {
        pb.set_draw_target(indicatif::ProgressDrawTarget::hidden());
    }

    let result = batch_convert(&pool, files, source, dest, &options, |progress| {
        pb.set_position(progress.current as u64);
        if let Some(ref name) = progress.current_file {
            pb.set_message(name.clone());
        }
    });

    pb.finish_and_clear();

    if !quiet {
        println!();
        println!("Conversion complete:");
        println!("  Success: {}", result.success_count);
        println!("  Skipped: {}", result.skipped_count);
        println!("  Failed: {}", result.fail_count);
    }

    if result.fail_count > 0 {
        println!();
        println!("Failures:");
        for msg in result.results.iter().filter(|m| m.starts_with("Failed")) {
            println!("  {msg}");
        }
        anyhow::bail!("{} of {} files failed to convert", result.fail_count, files.len());
    }

    Ok(())
}
