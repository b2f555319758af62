use crate::error::AnymapError;
use crate::pixel::Encoding;
use crate::pnm::{PnmFormat, PnmHeader};

/// Image metadata read from the header alone.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub format: PnmFormat,
    pub encoding: Encoding,
    /// 1 for PBM.
    pub max_value: u32,
}

impl ImageInfo {
    /// Probe a PNM header without decoding samples.
    pub fn from_bytes(data: &[u8]) -> Result<Self, AnymapError> {
        let header = PnmHeader::parse(data)?;
        Ok(Self {
            width: header.width,
            height: header.height,
            format: header.format,
            encoding: header.encoding,
            max_value: header.max_value,
        })
    }
}
