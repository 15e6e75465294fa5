//! Parameter types for the encode step.
//!
//! These structs describe *what* to write, not *how*. They are the interface
//! between the resolvers in [`encoding`](crate::encoding) (which decide the
//! parameters) and the [`backend`](super::backend) (which does the pixel work),
//! so a mock backend can stand in for tests without changing resolution logic.
//!
//! ## Types
//!
//! - [`Subsampling`]: JPEG chroma subsampling scheme (4:4:4, 4:2:2, 4:2:0).
//! - [`OutputFormat`]: format the encoder writes: JPEG, PNG or a passthrough format.
//! - [`EncodeParams`]: everything for one encode: format, quality,
//!   PNG compression level, optional subsampling, optional ICC profile.

use std::fmt;

/// JPEG chroma subsampling scheme.
///
/// The numeric index (0, 1, 2) is the value accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subsampling {
    /// 4:4:4, full chroma resolution.
    Yuv444,
    /// 4:2:2, chroma halved horizontally.
    Yuv422,
    /// 4:2:0, chroma halved in both directions.
    Yuv420,
}

impl Subsampling {
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Yuv444),
            1 => Some(Self::Yuv422),
            2 => Some(Self::Yuv420),
            _ => None,
        }
    }

    pub fn index(self) -> u8 {
        match self {
            Self::Yuv444 => 0,
            Self::Yuv422 => 1,
            Self::Yuv420 => 2,
        }
    }
}

impl fmt::Display for Subsampling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ratio = match self {
            Self::Yuv444 => "4:4:4",
            Self::Yuv422 => "4:2:2",
            Self::Yuv420 => "4:2:0",
        };
        write!(f, "{ratio}")
    }
}

/// Format the encoder writes.
///
/// JPEG and PNG are the formats the tool knows how to tune. Anything else is
/// re-encoded in the format it was decoded from, with default settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    Other(image::ImageFormat),
}

impl OutputFormat {
    /// File extension forced by this format, including the dot.
    ///
    /// `None` means the input's own extension is kept.
    pub fn forced_extension(self) -> Option<&'static str> {
        match self {
            Self::Jpeg => Some(".jpg"),
            Self::Png => Some(".png"),
            Self::Other(_) => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jpeg => write!(f, "JPEG"),
            Self::Png => write!(f, "PNG"),
            Self::Other(format) => write!(f, "{format:?}"),
        }
    }
}

/// Everything the encoder needs besides the pixels and the output path.
///
/// `quality` only affects JPEG and `compression_level` only affects PNG; both
/// are always present and the encoder ignores the one that does not apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeParams {
    pub format: OutputFormat,
    /// JPEG quality, 0 (worst) to 95 (best).
    pub quality: u8,
    /// PNG deflate level, 0 (none) to 9 (best).
    pub compression_level: u8,
    /// Only ever set when `format` is [`OutputFormat::Jpeg`].
    pub subsampling: Option<Subsampling>,
    pub icc_profile: Option<Vec<u8>>,
}
