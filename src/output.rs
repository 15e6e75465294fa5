//! Log line formatting.
//!
//! All functions here are pure: they build strings and leave emitting them to
//! the caller, which goes through the `log` facade. That keeps the exact text
//! unit-testable.
//!
//! # Output Format
//!
//! ## Verbose (`-v`)
//!
//! ```text
//! photos/a.png -> web/sm_a.jpg
//! photos/b.png -> web/sm_b.jpg
//! 2 written
//! ```
//!
//! ## Debug (`--debug`)
//!
//! ```text
//! Options
//!     scale: 50%
//!     format: jpeg
//!     ...
//! photos/a.png: format=JPEG quality=80 compression=6 subsampling=4:2:0 icc=3144 bytes
//! ```
//!
//! ICC profiles are shown by size only; the bytes themselves are noise.

use crate::imaging::EncodeParams;
use crate::options::ResolvedOptions;
use crate::process::BatchReport;
use std::path::Path;

fn indent(line: impl std::fmt::Display) -> String {
    format!("    {line}")
}

/// `input -> output`, the per-file verbose line.
pub fn format_plan_line(input: &Path, output: &Path) -> String {
    format!("{} -> {}", input.display(), output.display())
}

/// One-line dump of the encoder settings for a file.
pub fn format_encode_params(params: &EncodeParams) -> String {
    let subsampling = params
        .subsampling
        .map(|s| s.to_string())
        .unwrap_or_else(|| "default".to_string());
    let icc = match &params.icc_profile {
        Some(profile) => format!("{} bytes", profile.len()),
        None => "none".to_string(),
    };
    format!(
        "format={} quality={} compression={} subsampling={} icc={}",
        params.format, params.quality, params.compression_level, subsampling, icc
    )
}

/// Resolved options, one per line under an `Options` header.
pub fn format_options(options: &ResolvedOptions) -> Vec<String> {
    let scale = match options.scale_percent {
        Some(p) => format!("{p}%"),
        None => "none".to_string(),
    };
    let format = match options.target_format {
        Some(f) => f.to_string(),
        None => "preserve".to_string(),
    };
    let directory = match &options.output_directory {
        Some(dir) => dir.display().to_string(),
        None => "(input's directory)".to_string(),
    };

    vec![
        "Options".to_string(),
        indent(format_args!("scale: {scale}")),
        indent(format_args!("format: {format}")),
        indent(format_args!("directory: {directory}")),
        indent(format_args!("prefix: {:?}", options.prefix)),
        indent(format_args!("suffix: {:?}", options.suffix)),
        indent(format_args!("quality: {}", options.quality)),
        indent(format_args!("compression: {}", options.compression_level)),
        indent(format_args!("subsampling: {}", options.subsampling)),
        indent(format_args!("exclude icc: {}", options.exclude_icc)),
        indent(format_args!("dry run: {}", options.dry_run)),
        indent(format_args!("jobs: {}", options.jobs)),
    ]
}

/// Final tally, e.g. `3 written, 1 failed`.
pub fn format_summary(report: &BatchReport) -> String {
    if report.outcomes.is_empty() {
        return "No input files".to_string();
    }
    let mut parts = Vec::new();
    if report.written() > 0 {
        parts.push(format!("{} written", report.written()));
    }
    if report.dry_run() > 0 {
        parts.push(format!("{} resolved (dry run)", report.dry_run()));
    }
    if report.failed() > 0 {
        parts.push(format!("{} failed", report.failed()));
    }
    parts.join(", ")
}
