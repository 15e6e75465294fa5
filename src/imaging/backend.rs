//! Image codec backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the four primitives the pipeline needs:
//! decode, resize, convert, and encode. Everything else (which size, which
//! format, which encoder settings) is decided outside the backend.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate plus `jpeg-encoder` for JPEG output.

use super::params::{EncodeParams, OutputFormat, Subsampling};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Pixel layout of a decoded image, as far as encoding decisions care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Rgb,
    Rgba,
    /// Indexed color (PNG color type 3).
    Palette,
    Luma,
    LumaAlpha,
    Other,
}

impl ColorMode {
    /// JPEG cannot carry alpha or a palette.
    pub fn needs_rgb_for_jpeg(self) -> bool {
        matches!(self, Self::Rgba | Self::Palette)
    }
}

/// Container format an image was decoded from.
///
/// The original chroma subsampling is only meaningful for JPEG sources, so it
/// lives inside the `Jpeg` variant. `None` there means the component layout
/// is not one of the three standard schemes (grayscale, 4:1:1, CMYK, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Jpeg { subsampling: Option<Subsampling> },
    Png,
    Other(image::ImageFormat),
}

impl SourceFormat {
    /// The format this image would be written in if no override is given.
    pub fn as_output(&self) -> OutputFormat {
        match self {
            Self::Jpeg { .. } => OutputFormat::Jpeg,
            Self::Png => OutputFormat::Png,
            Self::Other(format) => OutputFormat::Other(*format),
        }
    }
}

impl From<image::ImageFormat> for SourceFormat {
    /// Maps a guessed format. JPEG sources get no subsampling here; the
    /// backend fills it in from the file's frame header.
    fn from(format: image::ImageFormat) -> Self {
        match format {
            image::ImageFormat::Jpeg => Self::Jpeg { subsampling: None },
            image::ImageFormat::Png => Self::Png,
            other => Self::Other(other),
        }
    }
}

/// Properties of a decoded image consumed by the resolvers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub dimensions: Dimensions,
    pub format: SourceFormat,
    pub color_mode: ColorMode,
    pub icc_profile: Option<Vec<u8>>,
}

/// A decoded image: backend-specific pixels plus the properties the pipeline
/// reads. Dropping it releases the pixel memory.
#[derive(Debug)]
pub struct DecodedImage<P> {
    pub pixels: P,
    pub info: ImageInfo,
}

/// Trait for image codec backends.
///
/// `Sync` so one backend can be shared across rayon workers.
pub trait ImageBackend: Sync {
    /// Backend-owned pixel storage.
    type Pixels;

    /// Read and decode an image, including its format, color mode, ICC
    /// profile and (for JPEG) original subsampling.
    fn decode(&self, path: &Path) -> Result<DecodedImage<Self::Pixels>, BackendError>;

    /// Resample to exactly `width` x `height`.
    fn resize(&self, pixels: &Self::Pixels, width: u32, height: u32) -> Self::Pixels;

    /// Convert to the given color mode. Modes the backend cannot produce
    /// (`Palette`, `Other`) leave the pixels unchanged.
    fn convert(&self, pixels: &Self::Pixels, mode: ColorMode) -> Self::Pixels;

    /// Encode and write to `path`.
    fn encode(
        &self,
        pixels: &Self::Pixels,
        path: &Path,
        params: &EncodeParams,
    ) -> Result<(), BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Stand-in pixels: only the shape is tracked.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MockPixels {
        pub width: u32,
        pub height: u32,
        pub mode: ColorMode,
    }

    /// Mock backend that records operations without touching pixels or disk.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    #[derive(Default)]
    pub struct MockBackend {
        pub images: Mutex<HashMap<String, ImageInfo>>,
        pub failing_outputs: Mutex<Vec<String>>,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Decode(String),
        Resize {
            width: u32,
            height: u32,
        },
        Convert(ColorMode),
        Encode {
            output: String,
            width: u32,
            height: u32,
            mode: ColorMode,
            params: EncodeParams,
        },
    }

    /// Info for a plain RGB image of the given format.
    pub fn info(width: u32, height: u32, format: SourceFormat) -> ImageInfo {
        ImageInfo {
            dimensions: Dimensions { width, height },
            format,
            color_mode: ColorMode::Rgb,
            icc_profile: None,
        }
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        /// Register a decodable image. Paths not registered fail to decode.
        pub fn with_image(self, path: &str, info: ImageInfo) -> Self {
            self.images.lock().unwrap().insert(path.to_string(), info);
            self
        }

        /// Make encoding to `output` fail.
        pub fn failing_encode(self, output: &str) -> Self {
            self.failing_outputs.lock().unwrap().push(output.to_string());
            self
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        pub fn encodes(&self) -> Vec<RecordedOp> {
            self.get_operations()
                .into_iter()
                .filter(|op| matches!(op, RecordedOp::Encode { .. }))
                .collect()
        }
    }

    impl ImageBackend for MockBackend {
        type Pixels = MockPixels;

        fn decode(&self, path: &Path) -> Result<DecodedImage<MockPixels>, BackendError> {
            let key = path.to_string_lossy().to_string();
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Decode(key.clone()));

            let info = self
                .images
                .lock()
                .unwrap()
                .get(&key)
                .cloned()
                .ok_or_else(|| BackendError::Decode(format!("not an image: {key}")))?;
            Ok(DecodedImage {
                pixels: MockPixels {
                    width: info.dimensions.width,
                    height: info.dimensions.height,
                    mode: info.color_mode,
                },
                info,
            })
        }

        fn resize(&self, pixels: &MockPixels, width: u32, height: u32) -> MockPixels {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Resize { width, height });
            MockPixels {
                width,
                height,
                ..*pixels
            }
        }

        fn convert(&self, pixels: &MockPixels, mode: ColorMode) -> MockPixels {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Convert(mode));
            MockPixels { mode, ..*pixels }
        }

        fn encode(
            &self,
            pixels: &MockPixels,
            path: &Path,
            params: &EncodeParams,
        ) -> Result<(), BackendError> {
            let output = path.to_string_lossy().to_string();
            self.operations.lock().unwrap().push(RecordedOp::Encode {
                output: output.clone(),
                width: pixels.width,
                height: pixels.height,
                mode: pixels.mode,
                params: params.clone(),
            });
            if self.failing_outputs.lock().unwrap().contains(&output) {
                return Err(BackendError::Encode(format!("cannot write {output}")));
            }
            Ok(())
        }
    }

    #[test]
    fn mock_decodes_registered_image() {
        let backend =
            MockBackend::new().with_image("/in/a.png", info(800, 600, SourceFormat::Png));

        let decoded = backend.decode(Path::new("/in/a.png")).unwrap();
        assert_eq!(decoded.info.dimensions.width, 800);
        assert_eq!(decoded.pixels.height, 600);

        let ops = backend.get_operations();
        assert!(matches!(&ops[0], RecordedOp::Decode(p) if p == "/in/a.png"));
    }

    #[test]
    fn mock_rejects_unknown_path() {
        let backend = MockBackend::new();
        let result = backend.decode(Path::new("/in/missing.jpg"));
        assert!(matches!(result, Err(BackendError::Decode(_))));
    }

    #[test]
    fn mock_records_resize_and_convert() {
        let backend = MockBackend::new();
        let pixels = MockPixels {
            width: 10,
            height: 10,
            mode: ColorMode::Rgba,
        };

        let resized = backend.resize(&pixels, 5, 4);
        let converted = backend.convert(&resized, ColorMode::Rgb);
        assert_eq!(converted.width, 5);
        assert_eq!(converted.mode, ColorMode::Rgb);

        assert_eq!(
            backend.get_operations(),
            vec![
                RecordedOp::Resize {
                    width: 5,
                    height: 4
                },
                RecordedOp::Convert(ColorMode::Rgb),
            ]
        );
    }

    #[test]
    fn source_format_maps_to_output_format() {
        assert_eq!(
            SourceFormat::Jpeg { subsampling: None }.as_output(),
            OutputFormat::Jpeg
        );
        assert_eq!(SourceFormat::Png.as_output(), OutputFormat::Png);
        assert_eq!(
            SourceFormat::from(image::ImageFormat::Gif).as_output(),
            OutputFormat::Other(image::ImageFormat::Gif)
        );
    }

    #[test]
    fn only_alpha_and_palette_need_rgb_for_jpeg() {
        assert!(ColorMode::Rgba.needs_rgb_for_jpeg());
        assert!(ColorMode::Palette.needs_rgb_for_jpeg());
        assert!(!ColorMode::Rgb.needs_rgb_for_jpeg());
        assert!(!ColorMode::Luma.needs_rgb_for_jpeg());
    }
}
