use std::fs::File;
use std::io::Write;
use std::path::Path;

use enough::Stop;

use crate::error::AnymapError;
use crate::pixel::Encoding;
use crate::pnm::{self, PnmImage};

/// Builder for encoding an image as PNM.
#[derive(Clone, Copy, Debug)]
pub struct EncodeRequest {
    encoding: Encoding,
}

impl EncodeRequest {
    pub fn new(encoding: Encoding) -> Self {
        Self { encoding }
    }

    /// Plain format: P1, P2 or P3.
    pub fn text() -> Self {
        Self::new(Encoding::Text)
    }

    /// Raw format: P4, P5 or P6.
    pub fn binary() -> Self {
        Self::new(Encoding::Binary)
    }

    /// Encode to an in-memory PNM file.
    pub fn encode<I: PnmImage>(&self, image: &I, stop: impl Stop) -> Result<Vec<u8>, AnymapError> {
        self.encode_dyn(image, &stop)
    }

    /// Encode and write to `path`.
    ///
    /// The image is fully encoded before the file is created. If the file
    /// cannot be opened nothing on disk changes; if writing to it fails the
    /// partial file is removed.
    pub fn write_file<I: PnmImage>(
        &self,
        image: &I,
        path: impl AsRef<Path>,
        stop: impl Stop,
    ) -> Result<(), AnymapError> {
        write_encoded(self, image, path.as_ref(), &stop)
    }

    fn encode_dyn<I: PnmImage>(&self, image: &I, stop: &dyn Stop) -> Result<Vec<u8>, AnymapError> {
        let bytes = pnm::encode(image, self.encoding, stop)?;
        log::debug!(
            "encoded {:?} {}x{} as {}: {} bytes",
            I::FORMAT,
            image.image_width(),
            image.image_height(),
            String::from_utf8_lossy(I::FORMAT.magic(self.encoding)),
            bytes.len()
        );
        Ok(bytes)
    }
}

pub(crate) fn write_encoded<I: PnmImage>(
    request: &EncodeRequest,
    image: &I,
    path: &Path,
    stop: &dyn Stop,
) -> Result<(), AnymapError> {
    let bytes = request.encode_dyn(image, stop)?;
    // A file that could not be opened was never touched and stays as it is.
    let mut file = File::create(path)?;
    let written = file.write_all(&bytes).and_then(|()| file.sync_all());
    if let Err(e) = written {
        log::debug!("write to {} failed: {e}", path.display());
        drop(file);
        let _ = std::fs::remove_file(path);
        return Err(e.into());
    }
    log::debug!("wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}
