//! Input enumeration.
//!
//! The command line takes either one glob pattern or a list of files:
//!
//! ```text
//! image-resize 'photos/**/*.png'        # pattern, expanded here
//! image-resize a.jpg b.jpg c.png        # explicit files, used as given
//! ```
//!
//! A single positional argument containing `*`, `?` or `[` is treated as a
//! pattern; anything else is a file list. Quoting the pattern keeps the shell
//! from expanding it first, which also works, just as a file list.
//!
//! Pattern matches come in filesystem enumeration order (`glob` sorts each
//! directory level) and directories are skipped. Nothing is deduplicated: a
//! file listed twice is processed twice.

use crate::options::OptionError;
use log::warn;
use std::path::PathBuf;

const GLOB_METACHARACTERS: &[char] = &['*', '?', '['];

/// Positional arguments split into the two input forms.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InputSpec {
    pub glob: Option<String>,
    pub files: Vec<PathBuf>,
}

pub fn is_glob_pattern(arg: &str) -> bool {
    arg.contains(GLOB_METACHARACTERS)
}

/// Decide whether the positionals are one pattern or a list of files.
pub fn classify_positionals(args: Vec<PathBuf>) -> InputSpec {
    if let [only] = args.as_slice()
        && let Some(arg) = only.to_str()
        && is_glob_pattern(arg)
    {
        return InputSpec {
            glob: Some(arg.to_string()),
            files: Vec::new(),
        };
    }
    InputSpec {
        glob: None,
        files: args,
    }
}

/// Expand the pattern (if any) and append the explicit files.
///
/// A pattern with no matches is not an error; an unparsable one is.
pub fn enumerate_inputs(
    glob: Option<&str>,
    files: &[PathBuf],
) -> Result<Vec<PathBuf>, OptionError> {
    let mut inputs = Vec::new();

    if let Some(pattern) = glob {
        let paths = glob::glob(pattern).map_err(|source| OptionError::Glob {
            pattern: pattern.to_string(),
            source,
        })?;
        for entry in paths {
            match entry {
                Ok(path) if path.is_dir() => {}
                Ok(path) => inputs.push(path),
                Err(e) => warn!(
                    "Skipping unreadable path {}: {}",
                    e.path().display(),
                    e.error()
                ),
            }
        }
    }

    inputs.extend(files.iter().cloned());
    Ok(inputs)
}
