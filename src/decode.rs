use std::path::Path;

use enough::Stop;

use crate::error::AnymapError;
use crate::image::AnyImage;
use crate::limits::Limits;
use crate::pixel::Encoding;
use crate::pnm::{self, PnmImage};

/// Decoded image together with the encoding it was stored in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeOutput {
    pub image: AnyImage,
    pub encoding: Encoding,
}

/// Builder for decoding PNM data held in memory.
#[derive(Clone, Debug)]
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    limits: Option<&'a Limits>,
}

impl<'a> DecodeRequest<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, limits: None }
    }

    /// Reject images whose header exceeds `limits` before allocating samples.
    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Decode any of P1..P6, dispatching on the magic bytes.
    pub fn decode(self, stop: impl Stop) -> Result<DecodeOutput, AnymapError> {
        let (image, encoding) = pnm::decode(self.data, self.limits, &stop)?;
        log::debug!(
            "decoded {:?} {}x{} ({encoding:?})",
            image.format(),
            image.width(),
            image.height()
        );
        Ok(DecodeOutput { image, encoding })
    }

    /// Decode into a specific image type.
    ///
    /// Fails with [`AnymapError::FormatMismatch`] if the data holds another format.
    pub fn decode_as<I: PnmImage>(self, stop: impl Stop) -> Result<I, AnymapError> {
        let header = I::read_header(self.data)?;
        pnm::decode_typed(self.data, header, self.limits, &stop)
    }
}

/// Read and decode a PNM file.
pub(crate) fn read_file(
    path: &Path,
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<DecodeOutput, AnymapError> {
    let data = std::fs::read(path)?;
    let (image, encoding) = pnm::decode(&data, limits, stop)?;
    log::debug!("read {} ({:?}, {encoding:?})", path.display(), image.format());
    Ok(DecodeOutput { image, encoding })
}
