//! Per-file transform pipeline and batch driver.
//!
//! Each input goes through the same fixed sequence:
//!
//! ```text
//! decode → scale (unless 100%) → drop alpha/palette (JPEG output only)
//!        → resolve encode params → resolve output path → write (unless dry run)
//! ```
//!
//! Files are independent. A file that fails to decode or encode is reported
//! and the batch moves on; the [`BatchReport`] keeps every outcome in input
//! order along with the counts the exit status is derived from.
//!
//! ## Parallel Processing
//!
//! With `jobs > 1` files are processed on the global [rayon](https://docs.rs/rayon)
//! pool. Outcomes are still collected in input order.

use crate::encoding::{resolve_encode_params, resolve_format};
use crate::imaging::{
    BackendError, ColorMode, EncodeParams, ImageBackend, OutputFormat, RustBackend, needs_resize,
    scaled_dimensions,
};
use crate::naming::resolve_output_path;
use crate::options::ResolvedOptions;
use crate::output;
use log::{debug, error, info};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("{}: {source}", path.display())]
    Decode { path: PathBuf, source: BackendError },
    #[error("{}: {source}", path.display())]
    Encode { path: PathBuf, source: BackendError },
    #[error("cannot create output directory {}: {source}", path.display())]
    OutputDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Where and how one image is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPlan {
    pub output_path: PathBuf,
    pub encode_params: EncodeParams,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Written,
    /// Everything resolved, write suppressed.
    DryRun,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedFile {
    pub plan: OutputPlan,
    pub status: FileStatus,
}

#[derive(Debug)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub result: Result<ProcessedFile, ProcessError>,
}

/// Outcome of a whole batch, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    fn count_status(&self, status: FileStatus) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(&o.result, Ok(f) if f.status == status))
            .count()
    }

    pub fn written(&self) -> usize {
        self.count_status(FileStatus::Written)
    }

    pub fn dry_run(&self) -> usize {
        self.count_status(FileStatus::DryRun)
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }
}

/// Run one input through the pipeline.
pub fn process_file<B: ImageBackend>(
    backend: &B,
    input: &Path,
    options: &ResolvedOptions,
) -> Result<ProcessedFile, ProcessError> {
    let decoded = backend
        .decode(input)
        .map_err(|source| ProcessError::Decode {
            path: input.to_path_buf(),
            source,
        })?;
    let info = decoded.info;
    let mut pixels = decoded.pixels;

    if needs_resize(options.scale_percent)
        && let Some(percent) = options.scale_percent
    {
        let target = scaled_dimensions(info.dimensions, percent);
        pixels = backend.resize(&pixels, target.width, target.height);
    }

    let format = resolve_format(&info, options);
    if format == OutputFormat::Jpeg && info.color_mode.needs_rgb_for_jpeg() {
        pixels = backend.convert(&pixels, ColorMode::Rgb);
    }

    let plan = OutputPlan {
        output_path: resolve_output_path(input, format, options),
        encode_params: resolve_encode_params(&info, options),
    };

    if options.verbose {
        info!("{}", output::format_plan_line(input, &plan.output_path));
    }
    debug!(
        "{}: {}",
        input.display(),
        output::format_encode_params(&plan.encode_params)
    );

    if options.dry_run {
        return Ok(ProcessedFile {
            plan,
            status: FileStatus::DryRun,
        });
    }

    backend
        .encode(&pixels, &plan.output_path, &plan.encode_params)
        .map_err(|source| ProcessError::Encode {
            path: plan.output_path.clone(),
            source,
        })?;

    Ok(ProcessedFile {
        plan,
        status: FileStatus::Written,
    })
}

/// Process a batch with the production backend.
pub fn process_batch(inputs: &[PathBuf], options: &ResolvedOptions) -> BatchReport {
    let backend = RustBackend::new();
    process_batch_with_backend(&backend, inputs, options)
}

/// Process a batch using a specific backend (allows testing with mock).
pub fn process_batch_with_backend<B: ImageBackend>(
    backend: &B,
    inputs: &[PathBuf],
    options: &ResolvedOptions,
) -> BatchReport {
    if let Some(dir) = &options.output_directory
        && !options.dry_run
        && let Err(e) = std::fs::create_dir_all(dir)
    {
        error!("cannot create output directory {}: {e}", dir.display());
        return failed_batch(inputs, dir, &e);
    }

    let run = |input: &PathBuf| {
        let result = process_file(backend, input, options);
        if let Err(e) = &result {
            error!("{e}");
        }
        FileOutcome {
            input: input.clone(),
            result,
        }
    };

    let outcomes: Vec<FileOutcome> = if options.jobs > 1 {
        inputs.par_iter().map(run).collect()
    } else {
        inputs.iter().map(run).collect()
    };

    BatchReport { outcomes }
}

/// Every file fails with the same directory error. `io::Error` is not Clone,
/// so each outcome gets its own copy.
fn failed_batch(inputs: &[PathBuf], dir: &Path, e: &std::io::Error) -> BatchReport {
    let outcomes = inputs
        .iter()
        .map(|input| FileOutcome {
            input: input.clone(),
            result: Err(ProcessError::OutputDirectory {
                path: dir.to_path_buf(),
                source: std::io::Error::new(e.kind(), e.to_string()),
            }),
        })
        .collect();
    BatchReport { outcomes }
}
