//! Project one component of a color image into a graymap.

use crate::error::AnymapError;
use crate::image::{ColorImage, GrayImage};
use crate::pixel::Channel;

/// Extract `channel` into a new graymap with the same width, height and max value.
pub fn extract_channel(src: &ColorImage, channel: Channel) -> GrayImage {
    let samples = src.pixels().iter().map(|&px| channel.of(px)).collect();
    GrayImage::from_parts(src.width(), src.height(), src.max_value(), samples)
}

/// Extract `channel` into a pre-allocated graymap.
///
/// `dst` must match `src` in width, height and max value; otherwise
/// [`AnymapError::DimensionMismatch`] is returned and `dst` is untouched.
pub fn extract_channel_into(
    src: &ColorImage,
    channel: Channel,
    dst: &mut GrayImage,
) -> Result<(), AnymapError> {
    let want = (src.width(), src.height(), src.max_value());
    let have = (dst.width(), dst.height(), dst.max_value());
    if want != have {
        return Err(AnymapError::DimensionMismatch {
            expected: format!("{}x{} max {}", want.0, want.1, want.2),
            actual: format!("{}x{} max {}", have.0, have.1, have.2),
        });
    }
    for (out, &px) in dst.samples_mut().iter_mut().zip(src.pixels()) {
        *out = channel.of(px);
    }
    Ok(())
}
