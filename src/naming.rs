//! Output path derivation.
//!
//! Every output file name is built from the input name by the same rule:
//!
//! ```text
//! <directory or input's parent>/<prefix><input stem><suffix><extension>
//! ```
//!
//! The extension follows the resolved format, not the input:
//! - JPEG → `.jpg` (so `photo.jpeg` becomes `photo.jpg`)
//! - PNG → `.png`
//! - anything else keeps the input's extension
//!
//! With no directory, prefix or suffix, and no extension change, the output
//! path *is* the input path and the file is rewritten in place.

use crate::imaging::OutputFormat;
use crate::options::ResolvedOptions;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Derive where the encoded version of `input` is written.
///
/// Pure: does not touch the filesystem. A bare file name with no output
/// directory yields a bare (relative) output name.
pub fn resolve_output_path(
    input: &Path,
    format: OutputFormat,
    options: &ResolvedOptions,
) -> PathBuf {
    let base = match &options.output_directory {
        Some(dir) => dir.as_path(),
        None => input.parent().unwrap_or(Path::new("")),
    };

    let mut name = OsString::from(&options.prefix);
    name.push(input.file_stem().unwrap_or_default());
    name.push(&options.suffix);
    match format.forced_extension() {
        Some(ext) => name.push(ext),
        None => {
            if let Some(ext) = input.extension() {
                name.push(".");
                name.push(ext);
            }
        }
    }

    base.join(name)
}
