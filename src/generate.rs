//! Generate a test-pattern image and write it, plus per-channel graymaps for pixmaps.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use enough::Stop;

use crate::encode::{EncodeRequest, write_encoded};
use crate::error::AnymapError;
use crate::extract::extract_channel;
use crate::pattern;
use crate::pixel::{Channel, Encoding};
use crate::pnm::PnmFormat;

/// One pattern-generation request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerateJob {
    pub format: PnmFormat,
    pub width: u32,
    pub height: u32,
    pub output: PathBuf,
    pub encoding: Encoding,
}

/// Outcome of [`GenerateJob::run`]. Each file is written independently.
#[derive(Debug)]
pub struct GenerateReport {
    pub image: PathBuf,
    /// Why the main image could not be written, if it wasn't.
    pub image_error: Option<AnymapError>,
    /// Channel exports written, in red, green, blue order.
    pub channels: Vec<(Channel, PathBuf)>,
    /// Channel exports that failed.
    pub failed: Vec<(Channel, AnymapError)>,
}

impl GenerateReport {
    /// Whether every file was written.
    pub fn is_complete(&self) -> bool {
        self.image_error.is_none() && self.failed.is_empty()
    }
}

impl GenerateJob {
    /// Check the pattern size constraints without touching any buffer.
    pub fn validate(&self) -> Result<(), AnymapError> {
        pattern::validate_dimensions(self.format, self.width, self.height)
    }

    /// Generate and write the image.
    ///
    /// For pixmaps, also writes `RED_`, `GREEN_` and `BLUE_` graymaps next to
    /// the output. Write failures land in the report and do not stop the
    /// remaining files. Invalid dimensions and cancellation are returned as
    /// errors.
    pub fn run(&self, stop: impl Stop) -> Result<GenerateReport, AnymapError> {
        self.validate()?;
        let request = EncodeRequest::new(self.encoding);
        let mut report = GenerateReport {
            image: self.output.clone(),
            image_error: None,
            channels: Vec::new(),
            failed: Vec::new(),
        };

        match self.format {
            PnmFormat::Pbm => {
                let img = pattern::bit_pattern(self.width, self.height, &stop)?;
                let saved = write_encoded(&request, &img, &self.output, &stop);
                report.image_error = unless_cancelled(saved)?;
            }
            PnmFormat::Pgm => {
                let img = pattern::gray_pattern(self.width, self.height, &stop)?;
                let saved = write_encoded(&request, &img, &self.output, &stop);
                report.image_error = unless_cancelled(saved)?;
            }
            PnmFormat::Ppm => {
                let img = pattern::color_pattern(self.width, self.height, &stop)?;
                let saved = write_encoded(&request, &img, &self.output, &stop);
                report.image_error = unless_cancelled(saved)?;

                for channel in Channel::ALL {
                    let exported = channel_output_path(&self.output, channel).and_then(|path| {
                        let gray = extract_channel(&img, channel);
                        write_encoded(&request, &gray, &path, &stop)?;
                        Ok(path)
                    });
                    match exported {
                        Ok(path) => report.channels.push((channel, path)),
                        Err(e @ AnymapError::Cancelled(_)) => return Err(e),
                        Err(e) => {
                            log::warn!("{} channel export failed: {e}", channel.name());
                            report.failed.push((channel, e));
                        }
                    }
                }
            }
        }
        if let Some(e) = &report.image_error {
            log::warn!("writing {} failed: {e}", self.output.display());
        }
        Ok(report)
    }
}

/// Split a write result into cancellation (propagated) and any other failure (kept).
fn unless_cancelled(result: Result<(), AnymapError>) -> Result<Option<AnymapError>, AnymapError> {
    match result {
        Ok(()) => Ok(None),
        Err(e @ AnymapError::Cancelled(_)) => Err(e),
        Err(e) => Ok(Some(e)),
    }
}

/// Path of a channel export: the file name gains a `RED_`/`GREEN_`/`BLUE_`
/// prefix and a trailing `.ppm` becomes `.pgm`. The directory is kept.
pub fn channel_output_path(base: &Path, channel: Channel) -> Result<PathBuf, AnymapError> {
    let name = base
        .file_name()
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AnymapError::InvalidOutputPath(base.to_path_buf()))?;

    let mut file_name = OsString::from(channel.name());
    file_name.push("_");
    file_name.push(name);

    let mut path = base.with_file_name(file_name);
    let ppm = PnmFormat::Ppm.extension();
    if path.extension().is_some_and(|ext| ext == ppm) {
        path.set_extension(PnmFormat::Pgm.extension());
    }
    Ok(path)
}
