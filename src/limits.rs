use crate::error::AnymapError;
use crate::pnm::PnmHeader;

/// Size caps applied to a parsed header before any sample buffer exists.
///
/// All fields default to `None` (no limit).
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum size of the decoded buffer, in unpacked samples: one byte per
    /// pixel for PBM and PGM (P4 bits are expanded), three for PPM.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// Reject a header whose declared image would exceed any cap.
    pub(crate) fn check_header(&self, header: &PnmHeader) -> Result<(), AnymapError> {
        let width = u64::from(header.width);
        let height = u64::from(header.height);
        let pixels = width.saturating_mul(height);
        let samples = pixels.saturating_mul(header.format.channels() as u64);

        within("width", width, self.max_width)?;
        within("height", height, self.max_height)?;
        within("pixel count", pixels, self.max_pixels)?;
        within("decoded size in bytes", samples, self.max_memory_bytes)
    }
}

fn within(what: &str, value: u64, limit: Option<u64>) -> Result<(), AnymapError> {
    match limit {
        Some(max) if value > max => Err(AnymapError::LimitExceeded(format!(
            "{what} {value} exceeds limit {max}"
        ))),
        _ => Ok(()),
    }
}
