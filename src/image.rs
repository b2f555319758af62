//! Owned, dense sample grids for the three PNM depths.
//!
//! Every buffer is row-major with row 0 at the top, allocated once with its
//! final dimensions and never resized. Samples start at zero.

use rgb::RGB8;

use crate::error::AnymapError;
use crate::pixel::BLACK;
use crate::pnm::PnmFormat;

/// Validate dimensions and return the number of samples they describe.
pub(crate) fn sample_count(width: u32, height: u32) -> Result<usize, AnymapError> {
    if width == 0 || height == 0 {
        return Err(AnymapError::InvalidDimension(format!(
            "width and height must be positive (given {width}x{height})"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .ok_or(AnymapError::DimensionsTooLarge { width, height })
}

fn check_max_value(max_value: u32) -> Result<u8, AnymapError> {
    match u8::try_from(max_value) {
        Ok(m) if m >= 1 => Ok(m),
        _ => Err(AnymapError::InvalidDimension(format!(
            "max value must be in 1..=255 (given {max_value})"
        ))),
    }
}

fn check_len(expected: usize, actual: usize) -> Result<(), AnymapError> {
    if expected != actual {
        return Err(AnymapError::DimensionMismatch {
            expected: format!("{expected} samples"),
            actual: format!("{actual} samples"),
        });
    }
    Ok(())
}

/// Bi-level image: each sample is [`WHITE`](crate::WHITE) (0) or [`BLACK`] (1).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitImage {
    width: u32,
    height: u32,
    samples: Vec<u8>,
}

impl BitImage {
    /// Allocate an all-white bitmap.
    pub fn new(width: u32, height: u32) -> Result<Self, AnymapError> {
        let n = sample_count(width, height)?;
        Ok(Self {
            width,
            height,
            samples: vec![0; n],
        })
    }

    /// Build a bitmap from row-major samples, each 0 or 1.
    pub fn from_samples(width: u32, height: u32, samples: Vec<u8>) -> Result<Self, AnymapError> {
        check_len(sample_count(width, height)?, samples.len())?;
        if let Some(&value) = samples.iter().find(|&&s| s > BLACK) {
            return Err(AnymapError::SampleOutOfRange {
                value: u32::from(value),
                max_value: u32::from(BLACK),
            });
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, row: u32, col: u32) -> u8 {
        self.samples[index(self.width, self.height, row, col)]
    }

    /// Set one sample.
    ///
    /// # Panics
    ///
    /// If `row`/`col` is out of bounds or `value` is neither 0 nor 1.
    pub fn set(&mut self, row: u32, col: u32, value: u8) {
        assert!(value <= BLACK, "bit sample must be 0 or 1, got {value}");
        let i = index(self.width, self.height, row, col);
        self.samples[i] = value;
    }

    /// Set every sample to `value` (0 or 1).
    pub fn fill(&mut self, value: u8) {
        assert!(value <= BLACK, "bit sample must be 0 or 1, got {value}");
        self.samples.fill(value);
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.samples.chunks_exact(self.width as usize)
    }
}

/// Grayscale image with samples in `0..=max_value`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayImage {
    width: u32,
    height: u32,
    max_value: u8,
    samples: Vec<u8>,
}

impl GrayImage {
    /// Allocate a graymap filled with 0. `max_value` must be in `1..=255`.
    pub fn new(width: u32, height: u32, max_value: u32) -> Result<Self, AnymapError> {
        let n = sample_count(width, height)?;
        let max_value = check_max_value(max_value)?;
        Ok(Self {
            width,
            height,
            max_value,
            samples: vec![0; n],
        })
    }

    /// Build a graymap from row-major samples.
    pub fn from_samples(
        width: u32,
        height: u32,
        max_value: u32,
        samples: Vec<u8>,
    ) -> Result<Self, AnymapError> {
        let n = sample_count(width, height)?;
        let max = check_max_value(max_value)?;
        check_len(n, samples.len())?;
        if let Some(&value) = samples.iter().find(|&&s| s > max) {
            return Err(AnymapError::SampleOutOfRange {
                value: u32::from(value),
                max_value,
            });
        }
        Ok(Self {
            width,
            height,
            max_value: max,
            samples,
        })
    }

    /// Fields already known to satisfy the invariants of another buffer.
    pub(crate) fn from_parts(width: u32, height: u32, max_value: u8, samples: Vec<u8>) -> Self {
        debug_assert_eq!(samples.len(), width as usize * height as usize);
        Self {
            width,
            height,
            max_value,
            samples,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn max_value(&self) -> u8 {
        self.max_value
    }

    pub fn get(&self, row: u32, col: u32) -> u8 {
        self.samples[index(self.width, self.height, row, col)]
    }

    /// Set one sample.
    ///
    /// # Panics
    ///
    /// If `row`/`col` is out of bounds or `value` exceeds the max value.
    pub fn set(&mut self, row: u32, col: u32, value: u8) {
        assert!(
            value <= self.max_value,
            "sample {value} exceeds max value {}",
            self.max_value
        );
        let i = index(self.width, self.height, row, col);
        self.samples[i] = value;
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    pub(crate) fn samples_mut(&mut self) -> &mut [u8] {
        &mut self.samples
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.samples.chunks_exact(self.width as usize)
    }

    /// Borrow the samples as an [`imgref::ImgRef`].
    #[cfg(feature = "imgref")]
    pub fn as_imgref(&self) -> imgref::ImgRef<'_, u8> {
        imgref::ImgRef::new(&self.samples, self.width as usize, self.height as usize)
    }
}

/// RGB image with every component in `0..=max_value`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorImage {
    width: u32,
    height: u32,
    max_value: u8,
    pixels: Vec<RGB8>,
}

impl ColorImage {
    /// Allocate a pixmap filled with black. `max_value` must be in `1..=255`.
    pub fn new(width: u32, height: u32, max_value: u32) -> Result<Self, AnymapError> {
        let n = sample_count(width, height)?;
        let max_value = check_max_value(max_value)?;
        Ok(Self {
            width,
            height,
            max_value,
            pixels: vec![RGB8::new(0, 0, 0); n],
        })
    }

    /// Build a pixmap from row-major pixels.
    pub fn from_pixels(
        width: u32,
        height: u32,
        max_value: u32,
        pixels: Vec<RGB8>,
    ) -> Result<Self, AnymapError> {
        let n = sample_count(width, height)?;
        let max = check_max_value(max_value)?;
        check_len(n, pixels.len())?;
        let over = pixels
            .iter()
            .flat_map(|px| [px.r, px.g, px.b])
            .find(|&c| c > max);
        if let Some(value) = over {
            return Err(AnymapError::SampleOutOfRange {
                value: u32::from(value),
                max_value,
            });
        }
        Ok(Self {
            width,
            height,
            max_value: max,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn max_value(&self) -> u8 {
        self.max_value
    }

    pub fn get(&self, row: u32, col: u32) -> RGB8 {
        self.pixels[index(self.width, self.height, row, col)]
    }

    /// Set one pixel.
    ///
    /// # Panics
    ///
    /// If `row`/`col` is out of bounds or any component exceeds the max value.
    pub fn set(&mut self, row: u32, col: u32, px: RGB8) {
        let max = self.max_value;
        assert!(
            px.r <= max && px.g <= max && px.b <= max,
            "pixel {px:?} exceeds max value {max}"
        );
        let i = index(self.width, self.height, row, col);
        self.pixels[i] = px;
    }

    pub fn pixels(&self) -> &[RGB8] {
        &self.pixels
    }

    pub fn rows(&self) -> impl Iterator<Item = &[RGB8]> {
        self.pixels.chunks_exact(self.width as usize)
    }

    /// Borrow the pixels as an [`imgref::ImgRef`].
    #[cfg(feature = "imgref")]
    pub fn as_imgref(&self) -> imgref::ImgRef<'_, RGB8> {
        imgref::ImgRef::new(&self.pixels, self.width as usize, self.height as usize)
    }
}

#[inline]
fn index(width: u32, height: u32, row: u32, col: u32) -> usize {
    assert!(
        row < height && col < width,
        "({row}, {col}) out of bounds for {width}x{height}"
    );
    row as usize * width as usize + col as usize
}

/// An image of any of the three depths, as produced by format-sniffing decode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnyImage {
    Bit(BitImage),
    Gray(GrayImage),
    Color(ColorImage),
}

impl AnyImage {
    pub fn format(&self) -> PnmFormat {
        match self {
            AnyImage::Bit(_) => PnmFormat::Pbm,
            AnyImage::Gray(_) => PnmFormat::Pgm,
            AnyImage::Color(_) => PnmFormat::Ppm,
        }
    }

    pub fn width(&self) -> u32 {
        match self {
            AnyImage::Bit(img) => img.width(),
            AnyImage::Gray(img) => img.width(),
            AnyImage::Color(img) => img.width(),
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            AnyImage::Bit(img) => img.height(),
            AnyImage::Gray(img) => img.height(),
            AnyImage::Color(img) => img.height(),
        }
    }

    pub fn as_bit(&self) -> Option<&BitImage> {
        match self {
            AnyImage::Bit(img) => Some(img),
            _ => None,
        }
    }

    pub fn as_gray(&self) -> Option<&GrayImage> {
        match self {
            AnyImage::Gray(img) => Some(img),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<&ColorImage> {
        match self {
            AnyImage::Color(img) => Some(img),
            _ => None,
        }
    }
}

impl From<BitImage> for AnyImage {
    fn from(img: BitImage) -> Self {
        AnyImage::Bit(img)
    }
}

impl From<GrayImage> for AnyImage {
    fn from(img: GrayImage) -> Self {
        AnyImage::Gray(img)
    }
}

impl From<ColorImage> for AnyImage {
    fn from(img: ColorImage) -> Self {
        AnyImage::Color(img)
    }
}
