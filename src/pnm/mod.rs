//! PNM family: P1/P4 (PBM), P2/P5 (PGM), P3/P6 (PPM).
//!
//! Header grammar is shared by all six variants: a two-byte magic, then
//! whitespace-separated decimal width, height and (except PBM) max value,
//! with `#` comments allowed between tokens. One whitespace byte ends the
//! header. The per-format sample layout lives behind [`PnmImage`].

mod decode;
mod encode;

use enough::Stop;

use crate::error::AnymapError;
use crate::image::{AnyImage, BitImage, ColorImage, GrayImage};
use crate::limits::Limits;
use crate::pixel::Encoding;

/// Which PNM sub-format an image belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PnmFormat {
    /// P1 / P4: bi-level bitmap.
    Pbm,
    /// P2 / P5: graymap.
    Pgm,
    /// P3 / P6: RGB pixmap.
    Ppm,
}

impl PnmFormat {
    /// Two-byte signature for this format in the given encoding.
    pub fn magic(self, encoding: Encoding) -> &'static [u8; 2] {
        match (self, encoding) {
            (PnmFormat::Pbm, Encoding::Text) => b"P1",
            (PnmFormat::Pgm, Encoding::Text) => b"P2",
            (PnmFormat::Ppm, Encoding::Text) => b"P3",
            (PnmFormat::Pbm, Encoding::Binary) => b"P4",
            (PnmFormat::Pgm, Encoding::Binary) => b"P5",
            (PnmFormat::Ppm, Encoding::Binary) => b"P6",
        }
    }

    pub fn from_magic(magic: &[u8]) -> Option<(PnmFormat, Encoding)> {
        match magic {
            b"P1" => Some((PnmFormat::Pbm, Encoding::Text)),
            b"P2" => Some((PnmFormat::Pgm, Encoding::Text)),
            b"P3" => Some((PnmFormat::Ppm, Encoding::Text)),
            b"P4" => Some((PnmFormat::Pbm, Encoding::Binary)),
            b"P5" => Some((PnmFormat::Pgm, Encoding::Binary)),
            b"P6" => Some((PnmFormat::Ppm, Encoding::Binary)),
            _ => None,
        }
    }

    /// Conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            PnmFormat::Pbm => "pbm",
            PnmFormat::Pgm => "pgm",
            PnmFormat::Ppm => "ppm",
        }
    }

    /// Whether the header carries a max-value token.
    pub fn has_max_value(self) -> bool {
        !matches!(self, PnmFormat::Pbm)
    }

    /// Samples per pixel.
    pub fn channels(self) -> usize {
        match self {
            PnmFormat::Pbm | PnmFormat::Pgm => 1,
            PnmFormat::Ppm => 3,
        }
    }
}

/// Parsed PNM header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PnmHeader {
    pub format: PnmFormat,
    pub encoding: Encoding,
    pub width: u32,
    pub height: u32,
    /// Always 1 for PBM.
    pub max_value: u32,
    /// Offset of the first sample byte in the input.
    pub data_offset: usize,
}

impl PnmHeader {
    /// Parse the header at the start of `data`.
    pub fn parse(data: &[u8]) -> Result<Self, AnymapError> {
        decode::parse_header(data)
    }

    /// Append the serialized header to `out`.
    pub fn write(&self, out: &mut Vec<u8>) {
        encode::write_header(self, out);
    }
}

/// Per-format serialization of an in-memory image.
///
/// Header handling is shared; each implementation supplies the sample
/// reader and writer for its format.
pub trait PnmImage: Sized {
    const FORMAT: PnmFormat;

    fn image_width(&self) -> u32;
    fn image_height(&self) -> u32;
    fn image_max_value(&self) -> u32;

    /// Read a header, rejecting any format other than [`Self::FORMAT`].
    fn read_header(data: &[u8]) -> Result<PnmHeader, AnymapError> {
        let header = PnmHeader::parse(data)?;
        if header.format != Self::FORMAT {
            return Err(AnymapError::FormatMismatch {
                expected: Self::FORMAT,
                actual: header.format,
            });
        }
        Ok(header)
    }

    /// Decode exactly `width * height` pixels from `body` (the bytes after the header).
    fn read_samples(header: &PnmHeader, body: &[u8], stop: &dyn Stop)
    -> Result<Self, AnymapError>;

    fn header(&self, encoding: Encoding) -> PnmHeader {
        PnmHeader {
            format: Self::FORMAT,
            encoding,
            width: self.image_width(),
            height: self.image_height(),
            max_value: self.image_max_value(),
            data_offset: 0,
        }
    }

    fn write_header(&self, encoding: Encoding, out: &mut Vec<u8>) {
        self.header(encoding).write(out);
    }

    fn write_samples(
        &self,
        encoding: Encoding,
        out: &mut Vec<u8>,
        stop: &dyn Stop,
    ) -> Result<(), AnymapError>;

    fn into_any(self) -> AnyImage;
}

impl PnmImage for BitImage {
    const FORMAT: PnmFormat = PnmFormat::Pbm;

    fn image_width(&self) -> u32 {
        self.width()
    }

    fn image_height(&self) -> u32 {
        self.height()
    }

    fn image_max_value(&self) -> u32 {
        1
    }

    fn read_samples(
        header: &PnmHeader,
        body: &[u8],
        stop: &dyn Stop,
    ) -> Result<Self, AnymapError> {
        let samples = match header.encoding {
            Encoding::Text => decode::read_bits_text(header, body, stop)?,
            Encoding::Binary => decode::read_bits_packed(header, body, stop)?,
        };
        BitImage::from_samples(header.width, header.height, samples)
    }

    fn write_samples(
        &self,
        encoding: Encoding,
        out: &mut Vec<u8>,
        stop: &dyn Stop,
    ) -> Result<(), AnymapError> {
        match encoding {
            Encoding::Text => encode::write_bits_text(self, out, stop),
            Encoding::Binary => encode::write_bits_packed(self, out, stop),
        }
    }

    fn into_any(self) -> AnyImage {
        AnyImage::Bit(self)
    }
}

impl PnmImage for GrayImage {
    const FORMAT: PnmFormat = PnmFormat::Pgm;

    fn image_width(&self) -> u32 {
        self.width()
    }

    fn image_height(&self) -> u32 {
        self.height()
    }

    fn image_max_value(&self) -> u32 {
        u32::from(self.max_value())
    }

    fn read_samples(
        header: &PnmHeader,
        body: &[u8],
        stop: &dyn Stop,
    ) -> Result<Self, AnymapError> {
        let samples = decode::read_bytes(header, body, stop)?;
        GrayImage::from_samples(header.width, header.height, header.max_value, samples)
    }

    fn write_samples(
        &self,
        encoding: Encoding,
        out: &mut Vec<u8>,
        stop: &dyn Stop,
    ) -> Result<(), AnymapError> {
        let w = self.width() as usize;
        encode::write_bytes(self.samples(), w, encoding, out, stop)
    }

    fn into_any(self) -> AnyImage {
        AnyImage::Gray(self)
    }
}

impl PnmImage for ColorImage {
    const FORMAT: PnmFormat = PnmFormat::Ppm;

    fn image_width(&self) -> u32 {
        self.width()
    }

    fn image_height(&self) -> u32 {
        self.height()
    }

    fn image_max_value(&self) -> u32 {
        u32::from(self.max_value())
    }

    fn read_samples(
        header: &PnmHeader,
        body: &[u8],
        stop: &dyn Stop,
    ) -> Result<Self, AnymapError> {
        let components = decode::read_bytes(header, body, stop)?;
        let pixels = components
            .chunks_exact(3)
            .map(|c| rgb::RGB8::new(c[0], c[1], c[2]))
            .collect();
        ColorImage::from_pixels(header.width, header.height, header.max_value, pixels)
    }

    fn write_samples(
        &self,
        encoding: Encoding,
        out: &mut Vec<u8>,
        stop: &dyn Stop,
    ) -> Result<(), AnymapError> {
        let components: Vec<u8> = self
            .pixels()
            .iter()
            .flat_map(|px| [px.r, px.g, px.b])
            .collect();
        let row_len = self.width() as usize * 3;
        encode::write_bytes(&components, row_len, encoding, out, stop)
    }

    fn into_any(self) -> AnyImage {
        AnyImage::Color(self)
    }
}

/// Decode any PNM variant, dispatching on the magic bytes.
pub(crate) fn decode(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<(AnyImage, Encoding), AnymapError> {
    let header = PnmHeader::parse(data)?;
    let encoding = header.encoding;
    let image = match header.format {
        PnmFormat::Pbm => decode_typed::<BitImage>(data, header, limits, stop)?.into_any(),
        PnmFormat::Pgm => decode_typed::<GrayImage>(data, header, limits, stop)?.into_any(),
        PnmFormat::Ppm => decode_typed::<ColorImage>(data, header, limits, stop)?.into_any(),
    };
    Ok((image, encoding))
}

/// Decode a header already known to belong to `I`.
pub(crate) fn decode_typed<I: PnmImage>(
    data: &[u8],
    header: PnmHeader,
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<I, AnymapError> {
    if let Some(limits) = limits {
        limits.check_header(&header)?;
    }

    stop.check()?;

    let body = data
        .get(header.data_offset..)
        .ok_or(AnymapError::TruncatedData)?;
    I::read_samples(&header, body, stop)
}

/// Encode an image into a complete PNM file.
pub(crate) fn encode<I: PnmImage>(
    image: &I,
    encoding: Encoding,
    stop: &dyn Stop,
) -> Result<Vec<u8>, AnymapError> {
    stop.check()?;
    let mut out = Vec::new();
    image.write_header(encoding, &mut out);
    image.write_samples(encoding, &mut out, stop)?;
    Ok(out)
}
