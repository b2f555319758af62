//! Deterministic test patterns for the three image depths.
//!
//! All arithmetic is integer with truncating division. Dimensions must pass
//! [`validate_dimensions`] so that the halves, thirds and quarters used below
//! divide evenly.

use enough::Stop;
use rgb::RGB8;

use crate::error::AnymapError;
use crate::image::{BitImage, ColorImage, GrayImage};
use crate::pixel::{BLACK, WHITE};
use crate::pnm::PnmFormat;

/// Check the size constraints of the generated patterns.
///
/// Height must be a positive multiple of 4. Width must be a positive
/// multiple of 4 for bitmaps and graymaps, and of 6 for pixmaps.
pub fn validate_dimensions(format: PnmFormat, width: u32, height: u32) -> Result<(), AnymapError> {
    if height < 4 || height % 4 != 0 {
        return Err(AnymapError::InvalidDimension(format!(
            "height must be divisible by 4 and >= 4 (given: {height})"
        )));
    }
    let step = match format {
        PnmFormat::Pbm | PnmFormat::Pgm => 4,
        PnmFormat::Ppm => 6,
    };
    if width < step || width % step != 0 {
        return Err(AnymapError::InvalidDimension(format!(
            "width for {} must be divisible by {step} and >= {step} (given: {width})",
            format.extension().to_ascii_uppercase()
        )));
    }
    Ok(())
}

/// Centered rectangle of half the image size, as inclusive bounds.
#[derive(Clone, Copy, Debug)]
struct CenterRect {
    top: i64,
    bottom: i64,
    left: i64,
    right: i64,
    width: i64,
    height: i64,
}

impl CenterRect {
    fn of(width: u32, height: u32) -> Self {
        let (w, h) = (i64::from(width), i64::from(height));
        let rw = w / 2;
        let rh = h / 2;
        let left = (w - rw) / 2;
        let top = (h - rh) / 2;
        Self {
            top,
            bottom: top + rh - 1,
            left,
            right: left + rw - 1,
            width: rw,
            height: rh,
        }
    }
}

/// Black field, white centered rectangle, two black corner-to-corner diagonals.
pub fn bit_pattern(width: u32, height: u32, stop: &dyn Stop) -> Result<BitImage, AnymapError> {
    validate_dimensions(PnmFormat::Pbm, width, height)?;
    let mut img = BitImage::new(width, height)?;
    img.fill(BLACK);

    let rect = CenterRect::of(width, height);
    for row in rect.top..=rect.bottom {
        for col in rect.left..=rect.right {
            img.set(row as u32, col as u32, WHITE);
        }
    }

    stop.check()?;

    let (w, h) = (i64::from(width), i64::from(height));
    for row in 0..h {
        let offset = row * w / h;
        for col in [offset, w - 1 - offset] {
            if (0..w).contains(&col) {
                img.set(row as u32, col as u32, BLACK);
            }
        }
    }
    Ok(img)
}

/// Centered rectangle split into four triangles by its diagonals, each a
/// 255-to-0 gradient from the rectangle edge to its center. Outside is 0.
pub fn gray_pattern(width: u32, height: u32, stop: &dyn Stop) -> Result<GrayImage, AnymapError> {
    validate_dimensions(PnmFormat::Pgm, width, height)?;
    let mut img = GrayImage::new(width, height, 255)?;
    let rect = CenterRect::of(width, height);
    let center_row = i64::from(height) / 2;
    let center_col = i64::from(width) / 2;

    for row in rect.top..=rect.bottom {
        if row % 16 == 0 {
            stop.check()?;
        }
        for col in rect.left..=rect.right {
            let dr = row - center_row;
            let dc = col - center_col;
            let down = dc * rect.height / rect.width;
            let up = -dc * rect.height / rect.width;

            let value = if dr <= down && dr <= up {
                255 - (row - rect.top) * 255 / (center_row - rect.top)
            } else if dr >= down && dr >= up {
                (row - center_row) * 255 / (rect.bottom - center_row)
            } else if dc < 0 {
                255 - (col - rect.left) * 255 / (center_col - rect.left)
            } else {
                (col - center_col) * 255 / (rect.right - center_col)
            };
            img.set(row as u32, col as u32, value.clamp(0, 255) as u8);
        }
    }
    Ok(img)
}

/// `pos * 255 / span`, truncating, computed in 64 bits.
fn ramp(pos: u32, span: u32) -> u8 {
    (u64::from(pos) * 255 / u64::from(span)) as u8
}

/// Top half: red→white, white→green, blue→white bands. Bottom half:
/// black→white, white→black bands. Every gradient runs top to bottom.
pub fn color_pattern(width: u32, height: u32, stop: &dyn Stop) -> Result<ColorImage, AnymapError> {
    validate_dimensions(PnmFormat::Ppm, width, height)?;
    let mut img = ColorImage::new(width, height, 255)?;
    let half = height / 2;
    let third = width / 3;
    let lower_band = width / 2;

    for row in 0..height {
        if row % 16 == 0 {
            stop.check()?;
        }
        for col in 0..width {
            let px = if row < half {
                let p = ramp(row, half);
                if col < third {
                    RGB8::new(255, p, p)
                } else if col < 2 * third {
                    RGB8::new(255 - p, 255, 255 - p)
                } else {
                    RGB8::new(p, p, 255)
                }
            } else {
                let p = ramp(row - half, height - half);
                if col < lower_band {
                    RGB8::new(p, p, p)
                } else {
                    RGB8::new(255 - p, 255 - p, 255 - p)
                }
            };
            img.set(row, col, px);
        }
    }
    Ok(img)
}
