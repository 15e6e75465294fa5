//! Image codec layer.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (format sniffed from content) |
//! | **Subsampling query** | JPEG frame header reader in `headers` |
//! | **Resize** | Lanczos3 via `image` |
//! | **Encode** | `jpeg-encoder` for JPEG, `image` PNG encoder, `image` for the rest |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Typed encoder settings
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Headers**: Byte-level readers for what the decoders don't expose

pub mod backend;
mod calculations;
mod headers;
mod params;
pub mod rust_backend;

pub use backend::{
    BackendError, ColorMode, DecodedImage, Dimensions, ImageBackend, ImageInfo, SourceFormat,
};
pub use calculations::{needs_resize, scaled_dimensions};
pub use headers::read_jpeg_subsampling;
pub use params::{EncodeParams, OutputFormat, Subsampling};
pub use rust_backend::RustBackend;
