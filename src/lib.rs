//! # zenanymap
//!
//! Portable anymap (PBM/PGM/PPM) codec for plain and raw encodings, with
//! synthetic test-pattern generation.
//!
//! ## Supported Formats
//!
//! - **P1 / P4** (PBM): bi-level, plain text or packed bits
//! - **P2 / P5** (PGM): 8-bit grayscale, max value 1..=255
//! - **P3 / P6** (PPM): 8-bit RGB, max value 1..=255
//!
//! Decoding accepts files from any conforming writer: `#` comments and
//! arbitrary whitespace between header tokens, and unseparated P1 digits.
//!
//! ## Non-Goals
//!
//! - 16-bit samples (max value above 255)
//! - PAM, PFM and other image formats
//! - Color-space conversion beyond single-channel extraction
//!
//! ## Usage
//!
//! ```no_run
//! use zenanymap::{Channel, DecodeRequest, EncodeRequest, Unstoppable, pattern};
//!
//! let img = pattern::color_pattern(12, 8, &Unstoppable)?;
//! let bytes = EncodeRequest::binary().encode(&img, Unstoppable)?;
//!
//! let decoded = DecodeRequest::new(&bytes).decode(Unstoppable)?;
//! assert_eq!(decoded.image.as_color(), Some(&img));
//!
//! let red = zenanymap::extract_channel(&img, Channel::Red);
//! EncodeRequest::text().write_file(&red, "RED_pattern.pgm", Unstoppable)?;
//! # Ok::<(), zenanymap::AnymapError>(())
//! ```

#![forbid(unsafe_code)]

mod decode;
mod encode;
mod error;
mod extract;
mod generate;
mod image;
mod info;
mod limits;
pub mod pattern;
mod pixel;
pub mod pnm;

use std::path::Path;

// Re-exports
pub use decode::{DecodeOutput, DecodeRequest};
pub use encode::EncodeRequest;
pub use enough::{Stop, Unstoppable};
pub use error::AnymapError;
pub use extract::{extract_channel, extract_channel_into};
pub use generate::{GenerateJob, GenerateReport, channel_output_path};
pub use image::{AnyImage, BitImage, ColorImage, GrayImage};
pub use info::ImageInfo;
pub use limits::Limits;
pub use pixel::{BLACK, Channel, Encoding, WHITE};
pub use pnm::{PnmFormat, PnmHeader, PnmImage};
pub use rgb::RGB8;

/// Decode any PNM variant from memory.
pub fn decode(data: &[u8], stop: impl Stop) -> Result<DecodeOutput, AnymapError> {
    DecodeRequest::new(data).decode(stop)
}

/// Read and decode a PNM file.
pub fn read_file(path: impl AsRef<Path>, stop: impl Stop) -> Result<DecodeOutput, AnymapError> {
    decode::read_file(path.as_ref(), None, &stop)
}

/// Read and decode a PNM file, rejecting headers that exceed `limits`.
pub fn read_file_with_limits(
    path: impl AsRef<Path>,
    limits: &Limits,
    stop: impl Stop,
) -> Result<DecodeOutput, AnymapError> {
    decode::read_file(path.as_ref(), Some(limits), &stop)
}

/// Encode an image to an in-memory PNM file.
pub fn encode<I: PnmImage>(
    image: &I,
    encoding: Encoding,
    stop: impl Stop,
) -> Result<Vec<u8>, AnymapError> {
    EncodeRequest::new(encoding).encode(image, stop)
}

/// Encode an image and write it to `path`.
pub fn write_file<I: PnmImage>(
    image: &I,
    path: impl AsRef<Path>,
    encoding: Encoding,
    stop: impl Stop,
) -> Result<(), AnymapError> {
    EncodeRequest::new(encoding).write_file(image, path, stop)
}
