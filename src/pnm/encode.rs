//! PNM encoder: header, plain token streams, packed bits and raw bytes.

use enough::Stop;

use super::PnmHeader;
use crate::error::AnymapError;
use crate::image::BitImage;
use crate::pixel::Encoding;

/// Plain-format lines are wrapped to stay within this many characters.
const MAX_LINE: usize = 70;

pub(crate) fn write_header(header: &PnmHeader, out: &mut Vec<u8>) {
    out.extend_from_slice(header.format.magic(header.encoding));
    let dims = if header.format.has_max_value() {
        format!("\n{} {}\n{}\n", header.width, header.height, header.max_value)
    } else {
        format!("\n{} {}\n", header.width, header.height)
    };
    out.extend_from_slice(dims.as_bytes());
}

/// Space-separated token writer that wraps long lines and ends each image row with a newline.
struct PlainWriter<'a> {
    out: &'a mut Vec<u8>,
    line_len: usize,
}

impl<'a> PlainWriter<'a> {
    fn new(out: &'a mut Vec<u8>) -> Self {
        Self { out, line_len: 0 }
    }

    fn token(&mut self, tok: &[u8]) {
        if self.line_len > 0 {
            if self.line_len + 1 + tok.len() > MAX_LINE {
                self.out.push(b'\n');
                self.line_len = 0;
            } else {
                self.out.push(b' ');
                self.line_len += 1;
            }
        }
        self.out.extend_from_slice(tok);
        self.line_len += tok.len();
    }

    fn decimal(&mut self, value: u8) {
        let mut buf = [0u8; 3];
        let mut start = buf.len();
        let mut v = value;
        loop {
            start -= 1;
            buf[start] = b'0' + v % 10;
            v /= 10;
            if v == 0 {
                break;
            }
        }
        self.token(&buf[start..]);
    }

    fn end_row(&mut self) {
        if self.line_len > 0 {
            self.out.push(b'\n');
            self.line_len = 0;
        }
    }
}

/// P1 samples. In-memory 1 (black) is written as `1`; no polarity inversion.
pub(crate) fn write_bits_text(
    image: &BitImage,
    out: &mut Vec<u8>,
    stop: &dyn Stop,
) -> Result<(), AnymapError> {
    let mut writer = PlainWriter::new(out);
    for (row_idx, row) in image.rows().enumerate() {
        if row_idx % 16 == 0 {
            stop.check()?;
        }
        for &bit in row {
            writer.token(if bit == 0 { b"0" } else { b"1" });
        }
        writer.end_row();
    }
    Ok(())
}

/// P4 samples: `ceil(width / 8)` bytes per row, MSB is the leftmost pixel,
/// unused low bits of the last byte are zero.
pub(crate) fn write_bits_packed(
    image: &BitImage,
    out: &mut Vec<u8>,
    stop: &dyn Stop,
) -> Result<(), AnymapError> {
    let row_bytes = (image.width() as usize).div_ceil(8);
    out.reserve(row_bytes * image.height() as usize);
    for (row_idx, row) in image.rows().enumerate() {
        if row_idx % 16 == 0 {
            stop.check()?;
        }
        for group in row.chunks(8) {
            let byte = group
                .iter()
                .enumerate()
                .fold(0u8, |acc, (i, &bit)| acc | ((bit & 1) << (7 - i)));
            out.push(byte);
        }
    }
    Ok(())
}

/// P2/P3 or P5/P6 samples from a flat row-major component slice.
pub(crate) fn write_bytes(
    components: &[u8],
    row_len: usize,
    encoding: Encoding,
    out: &mut Vec<u8>,
    stop: &dyn Stop,
) -> Result<(), AnymapError> {
    match encoding {
        Encoding::Binary => {
            out.reserve(components.len());
            for (row_idx, row) in components.chunks_exact(row_len).enumerate() {
                if row_idx % 16 == 0 {
                    stop.check()?;
                }
                out.extend_from_slice(row);
            }
        }
        Encoding::Text => {
            let mut writer = PlainWriter::new(out);
            for (row_idx, row) in components.chunks_exact(row_len).enumerate() {
                if row_idx % 16 == 0 {
                    stop.check()?;
                }
                for &c in row {
                    writer.decimal(c);
                }
                writer.end_row();
            }
        }
    }
    Ok(())
}
