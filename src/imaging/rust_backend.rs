//! Pure Rust codec backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP, GIF, BMP) | `image::ImageReader` with content-sniffed format |
//! | ICC profile | `image::ImageDecoder::icc_profile` |
//! | JPEG subsampling, PNG palette | [`headers`](super::headers) on the raw bytes |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Encode → JPEG | `jpeg-encoder` (sampling factor + ICC support) |
//! | Encode → PNG | `image::codecs::png::PngEncoder` (deflate level + ICC) |
//! | Encode → other | `DynamicImage::write_to` |
//!
//! Encoders write into memory first. The bytes then go to a temporary file
//! next to the target, which is renamed over it, so a failed encode never
//! leaves the target truncated. This matters when the output path is the
//! input itself.

use super::backend::{
    BackendError, ColorMode, DecodedImage, Dimensions, ImageBackend, ImageInfo, SourceFormat,
};
use super::headers::{is_indexed_png, read_jpeg_subsampling};
use super::params::{EncodeParams, OutputFormat, Subsampling};
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use image::{ColorType, DynamicImage, ImageDecoder, ImageEncoder, ImageReader};
use std::borrow::Cow;
use std::io::{Cursor, Write};
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn color_mode_of(img: &DynamicImage) -> ColorMode {
    match img.color() {
        ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => ColorMode::Rgb,
        ColorType::Rgba8 | ColorType::Rgba16 | ColorType::Rgba32F => ColorMode::Rgba,
        ColorType::L8 | ColorType::L16 => ColorMode::Luma,
        ColorType::La8 | ColorType::La16 => ColorMode::LumaAlpha,
        _ => ColorMode::Other,
    }
}

/// Read and decode an image, collecting everything the resolvers need.
fn load_image(path: &Path) -> Result<DecodedImage<DynamicImage>, BackendError> {
    let bytes = std::fs::read(path)?;
    let decode_err = |e: image::ImageError| {
        BackendError::Decode(format!("Failed to decode {}: {}", path.display(), e))
    };

    let reader = ImageReader::new(Cursor::new(bytes.as_slice()))
        .with_guessed_format()
        .map_err(BackendError::Io)?;
    let Some(guessed) = reader.format() else {
        return Err(BackendError::Decode(format!(
            "Unrecognized image format: {}",
            path.display()
        )));
    };

    let mut decoder = reader.into_decoder().map_err(decode_err)?;
    let icc_profile = decoder.icc_profile().map_err(decode_err)?;
    let pixels = DynamicImage::from_decoder(decoder).map_err(decode_err)?;

    let format = match SourceFormat::from(guessed) {
        SourceFormat::Jpeg { .. } => SourceFormat::Jpeg {
            subsampling: read_jpeg_subsampling(&bytes),
        },
        other => other,
    };
    let color_mode = if format == SourceFormat::Png && is_indexed_png(&bytes) {
        ColorMode::Palette
    } else {
        color_mode_of(&pixels)
    };

    Ok(DecodedImage {
        info: ImageInfo {
            dimensions: Dimensions {
                width: pixels.width(),
                height: pixels.height(),
            },
            format,
            color_mode,
            icc_profile,
        },
        pixels,
    })
}

/// Replace `path` with `bytes` via a temporary file in the same directory.
fn write_output(path: &Path, bytes: &[u8]) -> Result<(), BackendError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // Same mode `File::create` would use, before umask
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    let mut tmp = builder.tempfile_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(path).map_err(|e| BackendError::Io(e.error))?;
    Ok(())
}

fn sampling_factor(subsampling: Subsampling) -> jpeg_encoder::SamplingFactor {
    match subsampling {
        Subsampling::Yuv444 => jpeg_encoder::SamplingFactor::R_4_4_4,
        Subsampling::Yuv422 => jpeg_encoder::SamplingFactor::R_4_2_2,
        Subsampling::Yuv420 => jpeg_encoder::SamplingFactor::R_4_2_0,
    }
}

/// Encode as baseline JPEG. Grayscale stays single-channel; everything else
/// is flattened to 8-bit RGB.
fn encode_jpeg(img: &DynamicImage, params: &EncodeParams) -> Result<Vec<u8>, BackendError> {
    let too_large = |_| {
        BackendError::Encode(format!(
            "{}x{} exceeds the JPEG size limit of 65535 pixels per edge",
            img.width(),
            img.height()
        ))
    };
    let width = u16::try_from(img.width()).map_err(too_large)?;
    let height = u16::try_from(img.height()).map_err(too_large)?;

    let (data, color_type) = match img {
        DynamicImage::ImageLuma8(gray) => {
            (Cow::Borrowed(gray.as_raw()), jpeg_encoder::ColorType::Luma)
        }
        DynamicImage::ImageRgb8(rgb) => {
            (Cow::Borrowed(rgb.as_raw()), jpeg_encoder::ColorType::Rgb)
        }
        other => (
            Cow::Owned(other.to_rgb8().into_raw()),
            jpeg_encoder::ColorType::Rgb,
        ),
    };

    let mut buf = Vec::new();
    let mut encoder = jpeg_encoder::Encoder::new(&mut buf, params.quality.max(1));
    if let Some(subsampling) = params.subsampling {
        encoder.set_sampling_factor(sampling_factor(subsampling));
    }
    if let Some(icc) = &params.icc_profile {
        encoder
            .add_icc_profile(icc)
            .map_err(|e| BackendError::Encode(format!("JPEG ICC profile rejected: {}", e)))?;
    }
    encoder
        .encode(&data, width, height, color_type)
        .map_err(|e| BackendError::Encode(format!("JPEG encode failed: {}", e)))?;
    Ok(buf)
}

fn png_compression(level: u8) -> CompressionType {
    match level {
        0 => CompressionType::Uncompressed,
        n => CompressionType::Level(n.min(9)),
    }
}

/// Encode as PNG at the requested deflate level, embedding the ICC profile.
fn encode_png(img: &DynamicImage, params: &EncodeParams) -> Result<Vec<u8>, BackendError> {
    // PNG has no float sample formats
    let img = match img.color() {
        ColorType::Rgb32F => Cow::Owned(DynamicImage::ImageRgb16(img.to_rgb16())),
        ColorType::Rgba32F => Cow::Owned(DynamicImage::ImageRgba16(img.to_rgba16())),
        _ => Cow::Borrowed(img),
    };

    let mut buf = Vec::new();
    let mut encoder = PngEncoder::new_with_quality(
        &mut buf,
        png_compression(params.compression_level),
        PngFilter::Adaptive,
    );
    if let Some(icc) = &params.icc_profile {
        encoder
            .set_icc_profile(icc.clone())
            .map_err(|e| BackendError::Encode(format!("PNG ICC profile rejected: {}", e)))?;
    }
    encoder
        .write_image(img.as_bytes(), img.width(), img.height(), img.color().into())
        .map_err(|e| BackendError::Encode(format!("PNG encode failed: {}", e)))?;
    Ok(buf)
}

/// Re-encode in a format the tool does not tune, with the codec's defaults.
fn encode_passthrough(
    img: &DynamicImage,
    format: image::ImageFormat,
    params: &EncodeParams,
) -> Result<Vec<u8>, BackendError> {
    if params.icc_profile.is_some() {
        log::debug!("ICC profile not embedded: unsupported for {:?} output", format);
    }
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format)
        .map_err(|e| BackendError::Encode(format!("{:?} encode failed: {}", format, e)))?;
    Ok(buf.into_inner())
}

impl ImageBackend for RustBackend {
    type Pixels = DynamicImage;

    fn decode(&self, path: &Path) -> Result<DecodedImage<DynamicImage>, BackendError> {
        load_image(path)
    }

    fn resize(&self, pixels: &DynamicImage, width: u32, height: u32) -> DynamicImage {
        pixels.resize_exact(width, height, FilterType::Lanczos3)
    }

    fn convert(&self, pixels: &DynamicImage, mode: ColorMode) -> DynamicImage {
        match mode {
            ColorMode::Rgb => DynamicImage::ImageRgb8(pixels.to_rgb8()),
            ColorMode::Rgba => DynamicImage::ImageRgba8(pixels.to_rgba8()),
            ColorMode::Luma => DynamicImage::ImageLuma8(pixels.to_luma8()),
            ColorMode::LumaAlpha => DynamicImage::ImageLumaA8(pixels.to_luma_alpha8()),
            ColorMode::Palette | ColorMode::Other => pixels.clone(),
        }
    }

    fn encode(
        &self,
        pixels: &DynamicImage,
        path: &Path,
        params: &EncodeParams,
    ) -> Result<(), BackendError> {
        let bytes = match params.format {
            OutputFormat::Jpeg => encode_jpeg(pixels, params)?,
            OutputFormat::Png => encode_png(pixels, params)?,
            OutputFormat::Other(format) => encode_passthrough(pixels, format, params)?,
        };
        write_output(path, &bytes)
    }
}
