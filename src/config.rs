//! Config file support.
//!
//! A TOML file passed with `--config` supplies defaults for the encoding
//! options, so a recurring job ("web exports": JPEG, quality 82, into `web/`)
//! doesn't need the same flags every time. Command-line flags always win over
//! the file; the file wins over stock defaults.
//!
//! ## Config File Format
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! scale = 100            # Percent; 100 leaves dimensions unchanged
//! # format = "jpeg"      # "jpeg" or "png"; omit to keep each input's format
//! # directory = "out"    # Omit to write next to the input
//! prefix = ""
//! suffix = ""
//! quality = 75           # JPEG quality, 0 (worst) to 95 (best)
//! compression = 6        # PNG compression, 0 (none) to 9 (best)
//! subsampling = "keep"   # 0 (4:4:4), 1 (4:2:2), 2 (4:2:0), "keep" or "auto"
//! exclude_icc = false
//! jobs = 1               # Parallel workers, capped at the CPU core count
//! ```
//!
//! Config files are sparse: set only the values you want. Unknown keys
//! are rejected to catch typos early. Range checks happen when the values are
//! combined with the command line, in
//! [`ResolvedOptions::resolve`](crate::options::ResolvedOptions::resolve).

use crate::options::{SubsamplingMode, TargetFormat};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Option defaults loaded from a config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub scale: u32,
    pub format: Option<TargetFormat>,
    pub directory: Option<PathBuf>,
    pub prefix: String,
    pub suffix: String,
    pub quality: u32,
    pub compression: u32,
    pub subsampling: SubsamplingMode,
    pub exclude_icc: bool,
    pub jobs: usize,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            scale: 100,
            format: None,
            directory: None,
            prefix: String::new(),
            suffix: String::new(),
            quality: 75,
            compression: 6,
            subsampling: SubsamplingMode::Keep,
            exclude_icc: false,
            jobs: 1,
        }
    }
}

/// Resolve the effective worker count.
///
/// `--jobs` can lower the worker count below the core count, never raise it.
pub fn effective_threads(jobs: usize) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    jobs.clamp(1, cores)
}

/// Load the config file if one was given, else the stock defaults.
///
/// Keys missing from the file keep their stock values.
pub fn load_config(path: Option<&Path>) -> Result<FileConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(FileConfig::default());
    };
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::Subsampling;
    use tempfile::TempDir;

    fn write_config(tmp: &TempDir, content: &str) -> PathBuf {
        let path = tmp.path().join("resize.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn no_file_gives_stock_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn empty_file_gives_stock_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(&tmp, "");
        assert_eq!(load_config(Some(&path)).unwrap(), FileConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(
            &tmp,
            r#"
format = "jpeg"
quality = 82
directory = "web"
"#,
        );
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.format, Some(TargetFormat::Jpeg));
        assert_eq!(config.quality, 82);
        assert_eq!(config.directory, Some(PathBuf::from("web")));
        // Unspecified values stay at stock defaults
        assert_eq!(config.compression, 6);
        assert_eq!(config.subsampling, SubsamplingMode::Keep);
    }

    #[test]
    fn subsampling_accepts_integer_or_name() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(&tmp, "subsampling = 1\n");
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(
            config.subsampling,
            SubsamplingMode::Explicit(Subsampling::Yuv422)
        );

        let path = write_config(&tmp, "subsampling = \"auto\"\n");
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.subsampling, SubsamplingMode::Auto);
    }

    #[test]
    fn bad_subsampling_token_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(&tmp, "subsampling = \"often\"\n");
        assert!(matches!(
            load_config(Some(&path)),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(&tmp, "qualty = 80\n");
        assert!(matches!(
            load_config(Some(&path)),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(&tmp, "this is not valid toml [[[");
        assert!(matches!(
            load_config(Some(&path)),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = load_config(Some(Path::new("/nonexistent/resize.toml")));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn effective_threads_never_zero_or_above_cores() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(0), 1);
        assert_eq!(effective_threads(1), 1);
        assert_eq!(effective_threads(usize::MAX), cores);
    }
}
