//! Encoder parameter resolution.
//!
//! Turns the user's options plus what was learned at decode time into the
//! [`EncodeParams`] for one file. Pure functions, no I/O.
//!
//! ## Subsampling policy
//!
//! | Mode | Source is JPEG | Result |
//! |---|---|---|
//! | `auto` | any | encoder default |
//! | `keep` | yes | the source's own scheme, if it is a standard one |
//! | `keep` | no | encoder default |
//! | `0`/`1`/`2` | any | that scheme |
//!
//! Whatever the policy yields is dropped unless the output is JPEG.

use crate::imaging::{EncodeParams, ImageInfo, OutputFormat, SourceFormat, Subsampling};
use crate::options::{ResolvedOptions, SubsamplingMode};

/// The requested format, or the image's own when none was requested.
pub fn resolve_format(info: &ImageInfo, options: &ResolvedOptions) -> OutputFormat {
    match options.target_format {
        Some(target) => target.to_output(),
        None => info.format.as_output(),
    }
}

/// Apply the subsampling policy to a source. `None` leaves the choice to
/// the encoder.
pub fn resolve_subsampling(mode: SubsamplingMode, source: &SourceFormat) -> Option<Subsampling> {
    match (mode, source) {
        (SubsamplingMode::Auto, _) => None,
        (SubsamplingMode::Keep, SourceFormat::Jpeg { subsampling }) => *subsampling,
        (SubsamplingMode::Keep, _) => None,
        (SubsamplingMode::Explicit(s), _) => Some(s),
    }
}

/// Build the full parameter set for encoding one image.
pub fn resolve_encode_params(info: &ImageInfo, options: &ResolvedOptions) -> EncodeParams {
    let format = resolve_format(info, options);
    let subsampling = match format {
        OutputFormat::Jpeg => resolve_subsampling(options.subsampling, &info.format),
        _ => None,
    };
    let icc_profile = if options.exclude_icc {
        None
    } else {
        info.icc_profile.clone()
    };

    EncodeParams {
        format,
        quality: options.quality,
        compression_level: options.compression_level,
        subsampling,
        icc_profile,
    }
}
