//! Resolved option set shared by every stage.
//!
//! Values arrive from two places: the command line ([`OptionOverrides`], where
//! `None` means "not given") and the optional config file
//! ([`FileConfig`](crate::config::FileConfig), with stock values for missing
//! keys). [`ResolvedOptions::resolve`] layers the first over the second,
//! range-checks the result, and produces the immutable snapshot the resolvers
//! and pipeline take by reference.
//!
//! ## Ranges
//!
//! | Option | Range | Default |
//! |---|---|---|
//! | `scale` | 1.. (percent) | 100 |
//! | `quality` | 0–95 | 75 |
//! | `compression` | 0–9 | 6 |
//! | `subsampling` | `0`, `1`, `2`, `keep`, `auto` | `keep` |
//! | `jobs` | 1.. | 1 |

use crate::config::{ConfigError, FileConfig};
use crate::imaging::{OutputFormat, Subsampling};
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub const MAX_QUALITY: u32 = 95;
pub const MAX_COMPRESSION: u32 = 9;

#[derive(Error, Debug)]
pub enum OptionError {
    #[error("scale must be a positive percentage, got {0}")]
    Scale(u32),
    #[error("quality must be 0-95, got {0}")]
    Quality(u32),
    #[error("compression must be 0-9, got {0}")]
    Compression(u32),
    #[error("jobs must be at least 1")]
    Jobs,
    #[error("unknown format '{0}' (expected jpeg or png)")]
    Format(String),
    #[error("unknown subsampling '{0}' (expected 0, 1, 2, keep or auto)")]
    Subsampling(String),
    #[error("invalid glob pattern '{pattern}': {source}")]
    Glob {
        pattern: String,
        source: glob::PatternError,
    },
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

// =============================================================================
// Target format
// =============================================================================

/// Output format requested with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum TargetFormat {
    Jpeg,
    Png,
}

impl TargetFormat {
    pub fn to_output(self) -> OutputFormat {
        match self {
            Self::Jpeg => OutputFormat::Jpeg,
            Self::Png => OutputFormat::Png,
        }
    }
}

impl FromStr for TargetFormat {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            _ => Err(OptionError::Format(s.to_string())),
        }
    }
}

impl TryFrom<String> for TargetFormat {
    type Error = OptionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jpeg => write!(f, "jpeg"),
            Self::Png => write!(f, "png"),
        }
    }
}

// =============================================================================
// Subsampling mode
// =============================================================================

/// How to choose JPEG chroma subsampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "SubsamplingToken")]
pub enum SubsamplingMode {
    /// Reuse the source JPEG's scheme; acts as `Auto` for other sources.
    #[default]
    Keep,
    /// Let the encoder pick.
    Auto,
    Explicit(Subsampling),
}

impl FromStr for SubsamplingMode {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "keep" => Ok(Self::Keep),
            "auto" => Ok(Self::Auto),
            other => other
                .parse::<u8>()
                .ok()
                .and_then(Subsampling::from_index)
                .map(Self::Explicit)
                .ok_or_else(|| OptionError::Subsampling(s.to_string())),
        }
    }
}

impl fmt::Display for SubsamplingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keep => write!(f, "keep"),
            Self::Auto => write!(f, "auto"),
            Self::Explicit(s) => write!(f, "{}", s.index()),
        }
    }
}

/// Config files may write `subsampling = 2` or `subsampling = "keep"`.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum SubsamplingToken {
    Index(u8),
    Name(String),
}

impl TryFrom<SubsamplingToken> for SubsamplingMode {
    type Error = OptionError;

    fn try_from(token: SubsamplingToken) -> Result<Self, Self::Error> {
        match token {
            SubsamplingToken::Index(i) => i.to_string().parse(),
            SubsamplingToken::Name(name) => name.parse(),
        }
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// Values given on the command line. `None` / `false` defer to the config file.
#[derive(Debug, Clone, Default)]
pub struct OptionOverrides {
    pub scale: Option<u32>,
    pub format: Option<TargetFormat>,
    pub directory: Option<PathBuf>,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    pub quality: Option<u32>,
    pub compression: Option<u32>,
    pub subsampling: Option<SubsamplingMode>,
    pub jobs: Option<usize>,
    pub exclude_icc: bool,
    pub dry_run: bool,
    pub verbose: bool,
    pub debug: bool,
}

/// Immutable option snapshot consumed by the resolvers and the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOptions {
    /// Percentage to scale by. `Some(100)` is accepted but leaves pixels as-is.
    pub scale_percent: Option<u32>,
    pub target_format: Option<TargetFormat>,
    pub output_directory: Option<PathBuf>,
    pub prefix: String,
    pub suffix: String,
    pub quality: u8,
    pub compression_level: u8,
    pub subsampling: SubsamplingMode,
    pub exclude_icc: bool,
    pub dry_run: bool,
    pub verbose: bool,
    pub debug: bool,
    pub jobs: usize,
}

impl Default for ResolvedOptions {
    fn default() -> Self {
        Self {
            scale_percent: Some(100),
            target_format: None,
            output_directory: None,
            prefix: String::new(),
            suffix: String::new(),
            quality: 75,
            compression_level: 6,
            subsampling: SubsamplingMode::Keep,
            exclude_icc: false,
            dry_run: false,
            verbose: false,
            debug: false,
            jobs: 1,
        }
    }
}

impl ResolvedOptions {
    /// Layer command-line values over config-file values and range-check.
    pub fn resolve(cli: OptionOverrides, file: FileConfig) -> Result<Self, OptionError> {
        let scale = cli.scale.unwrap_or(file.scale);
        if scale == 0 {
            return Err(OptionError::Scale(scale));
        }
        let quality = cli.quality.unwrap_or(file.quality);
        if quality > MAX_QUALITY {
            return Err(OptionError::Quality(quality));
        }
        let compression = cli.compression.unwrap_or(file.compression);
        if compression > MAX_COMPRESSION {
            return Err(OptionError::Compression(compression));
        }
        let jobs = cli.jobs.unwrap_or(file.jobs);
        if jobs == 0 {
            return Err(OptionError::Jobs);
        }

        Ok(Self {
            scale_percent: Some(scale),
            target_format: cli.format.or(file.format),
            output_directory: cli.directory.or(file.directory),
            prefix: cli.prefix.unwrap_or(file.prefix),
            suffix: cli.suffix.unwrap_or(file.suffix),
            // Both range-checked above
            quality: quality as u8,
            compression_level: compression as u8,
            subsampling: cli.subsampling.unwrap_or(file.subsampling),
            exclude_icc: cli.exclude_icc || file.exclude_icc,
            dry_run: cli.dry_run,
            verbose: cli.verbose,
            debug: cli.debug,
            jobs,
        })
    }
}
