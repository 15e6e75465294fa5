//! # image-resize
//!
//! Batch image rescaling and re-encoding. Give it a glob or a list of files;
//! each image is optionally scaled by a percentage, re-encoded as JPEG or PNG
//! (or its own format) with the requested quality, compression, chroma
//! subsampling and ICC handling, and written to a path derived from the input.
//!
//! # Architecture
//!
//! ```text
//! CLI flags ─┐
//!            ├─→ ResolvedOptions ─→ enumerate inputs ─→ per file:
//! config ────┘                                           decode
//!                                                        scale
//!                                                        fix color mode
//!                                                        resolve params + path
//!                                                        encode
//! ```
//!
//! The decisions (what size, what format, which encoder settings, where to
//! write) are pure functions over [`options::ResolvedOptions`] and the decoded
//! image's properties. The pixel work sits behind [`imaging::ImageBackend`], so
//! the pipeline is tested with a recording mock and no real images.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`options`] | `ResolvedOptions`, its value types, range checks |
//! | [`config`] | Optional TOML file of option defaults |
//! | [`scan`] | Glob / file list → ordered input paths |
//! | [`naming`] | Output path derivation (directory, prefix, suffix, extension) |
//! | [`encoding`] | Encoder parameter resolution (format, subsampling, ICC) |
//! | [`process`] | Per-file pipeline and batch driver |
//! | [`imaging`] | Backend trait, `image` + `jpeg-encoder` implementation, header readers |
//! | [`output`] | Log line formatting |
//!
//! # Design Decisions
//!
//! ## Typed Encoder Parameters
//!
//! Encoder settings travel as one [`imaging::EncodeParams`] struct rather than
//! a bag of optional keywords. The subsampling field can only be set when the
//! output is JPEG, and the backend picks the codec by matching on the format.
//!
//! ## JPEG Output Through `jpeg-encoder`
//!
//! The `image` crate's JPEG encoder always writes 4:2:0 and cannot be told
//! otherwise. `jpeg-encoder` exposes sampling factors and ICC embedding, so it
//! handles JPEG output; `image` handles everything else.
//!
//! ## Scale 100 Is a No-op
//!
//! A scale of 100% skips the resample step entirely. The image is still
//! re-encoded, so format, quality and ICC changes apply as usual.

pub mod config;
pub mod encoding;
pub mod imaging;
pub mod naming;
pub mod options;
pub mod output;
pub mod process;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
