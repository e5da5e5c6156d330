//! Parallel batch conversion
//!
//! Jobs share no state; each one reads, converts and writes its own file.
//! A failing job is recorded in the report and never stops the others.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::BatchConfig;
use crate::convert::{convert_glb, default_output_path, ConvertOptions, ConvertSummary};
use crate::stl::StlEncoding;

/// One file to convert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub input: PathBuf,
    pub output: PathBuf,
    pub options: ConvertOptions,
}

/// Outcome of a batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    pub converted: Vec<ConvertSummary>,
    pub failed: Vec<(PathBuf, anyhow::Error)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.converted.len() + self.failed.len()
    }
}

/// Find every `.glb` under `dir`
///
/// Outputs go to `out_dir` (same relative layout) or next to each input.
pub fn collect_directory_jobs(
    dir: &Path,
    out_dir: Option<&Path>,
    options: &ConvertOptions,
) -> Result<Vec<Job>> {
    let mut jobs = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", dir.display()))?;
        if !entry.file_type().is_file() || !is_glb(entry.path()) {
            continue;
        }

        let input = entry.path().to_path_buf();
        let output = match out_dir {
            Some(out_dir) => {
                let relative = input.strip_prefix(dir).unwrap_or(&input);
                default_output_path(&out_dir.join(relative))
            }
            None => default_output_path(&input),
        };
        jobs.push(Job {
            input,
            output,
            options: options.clone(),
        });
    }
    check_unique_outputs(&jobs)?;
    Ok(jobs)
}

/// Jobs listed in a config file, with paths relative to `base_dir`
pub fn collect_config_jobs(config: &BatchConfig, base_dir: &Path) -> Result<Vec<Job>> {
    let defaults = config.convert_options();
    let jobs: Vec<Job> = config
        .jobs
        .iter()
        .map(|entry| {
            let (input, output) = entry.paths(base_dir);
            let mut options = defaults.clone();
            if let Some(ascii) = entry.ascii {
                options.stl.encoding = if ascii {
                    StlEncoding::Ascii
                } else {
                    StlEncoding::Binary
                };
            }
            Job {
                input,
                output,
                options,
            }
        })
        .collect();
    check_unique_outputs(&jobs)?;
    Ok(jobs)
}

/// Fail if two jobs would write the same output file
///
/// Jobs run concurrently, so a shared output would be written twice with
/// one result lost.
pub fn check_unique_outputs(jobs: &[Job]) -> Result<()> {
    let mut seen: HashMap<&Path, &Path> = HashMap::with_capacity(jobs.len());
    for job in jobs {
        if let Some(previous) = seen.insert(&job.output, &job.input) {
            anyhow::bail!(
                "{} and {} would both be written to {}",
                previous.display(),
                job.input.display(),
                job.output.display()
            );
        }
    }
    Ok(())
}

/// Convert all jobs in parallel
pub fn run_batch(jobs: &[Job]) -> BatchReport {
    use rayon::prelude::*;

    let results: Vec<(PathBuf, Result<ConvertSummary>)> = jobs
        .par_iter()
        .map(|job| {
            let result = convert_glb(&job.input, &job.output, &job.options);
            if let Err(e) = &result {
                tracing::warn!("{}: {:#}", job.input.display(), e);
            }
            (job.input.clone(), result)
        })
        .collect();

    let mut report = BatchReport::default();
    for (input, result) in results {
        match result {
            Ok(summary) => report.converted.push(summary),
            Err(e) => report.failed.push((input, e)),
        }
    }
    report
}

fn is_glb(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("glb"))
        .unwrap_or(false)
}
