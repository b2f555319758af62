//! PNM header tokenizer and sample readers.

use enough::Stop;

use super::{PnmFormat, PnmHeader};
use crate::error::AnymapError;
use crate::pixel::Encoding;

/// PNM whitespace: space, TAB, LF, VT, FF, CR.
#[inline]
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

/// Byte cursor over header or plain-format sample text.
struct Tokens<'a> {
    data: &'a [u8],
    pos: usize,
}

enum Token {
    Number(u32),
    End,
    Invalid(String),
}

impl<'a> Tokens<'a> {
    fn new(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    fn skip_space_and_comments(&mut self) {
        while let Some(b) = self.peek() {
            if b == b'#' {
                while let Some(c) = self.peek() {
                    self.pos += 1;
                    if c == b'\n' || c == b'\r' {
                        break;
                    }
                }
            } else if is_space(b) {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    /// Next decimal token, delimited by whitespace, a comment or end of input.
    fn number(&mut self) -> Token {
        self.skip_space_and_comments();
        let start = self.pos;
        let mut value: u32 = 0;
        while let Some(b) = self.peek().filter(u8::is_ascii_digit) {
            value = match value
                .checked_mul(10)
                .and_then(|v| v.checked_add(u32::from(b - b'0')))
            {
                Some(v) => v,
                None => return Token::Invalid(self.lossy_token(start)),
            };
            self.pos += 1;
        }
        match self.peek() {
            _ if self.pos == start && self.peek().is_none() => Token::End,
            None => Token::Number(value),
            Some(b) if self.pos > start && (is_space(b) || b == b'#') => Token::Number(value),
            Some(_) => Token::Invalid(self.lossy_token(start)),
        }
    }

    fn lossy_token(&self, start: usize) -> String {
        let end = self.data[start..]
            .iter()
            .position(|&b| is_space(b) || b == b'#')
            .map_or(self.data.len(), |n| start + n);
        String::from_utf8_lossy(&self.data[start..end]).into_owned()
    }

    fn header_number(&mut self, what: &str) -> Result<u32, AnymapError> {
        match self.number() {
            Token::Number(v) => Ok(v),
            Token::End => Err(AnymapError::MalformedHeader(format!("missing {what}"))),
            Token::Invalid(tok) => Err(AnymapError::MalformedHeader(format!(
                "invalid {what} token {tok:?}"
            ))),
        }
    }

    fn sample_number(&mut self) -> Result<u32, AnymapError> {
        match self.number() {
            Token::Number(v) => Ok(v),
            Token::End => Err(AnymapError::TruncatedData),
            Token::Invalid(tok) => Err(AnymapError::MalformedHeader(format!(
                "invalid sample token {tok:?}"
            ))),
        }
    }
}

/// Parse a PNM header, returning its fields and the offset of the sample data.
pub(crate) fn parse_header(data: &[u8]) -> Result<PnmHeader, AnymapError> {
    let (format, encoding) = data
        .get(..2)
        .and_then(PnmFormat::from_magic)
        .ok_or(AnymapError::BadMagic)?;

    let mut tokens = Tokens::new(data, 2);
    if let Some(b) = tokens.peek() {
        if !is_space(b) && b != b'#' {
            return Err(AnymapError::BadMagic);
        }
    }

    let width = tokens.header_number("width")?;
    let height = tokens.header_number("height")?;
    let max_value = if format.has_max_value() {
        let max = tokens.header_number("max value")?;
        if max == 0 {
            return Err(AnymapError::MalformedHeader("max value is zero".into()));
        }
        if max > 255 {
            return Err(AnymapError::UnsupportedMaxValue(max));
        }
        max
    } else {
        1
    };

    // A single whitespace byte separates the header from the samples.
    match tokens.peek() {
        None => {}
        Some(b) if is_space(b) => tokens.pos += 1,
        Some(b'#') if encoding == Encoding::Text => {}
        Some(b) => {
            return Err(AnymapError::MalformedHeader(format!(
                "unexpected byte 0x{b:02x} after header"
            )));
        }
    }

    log::trace!(
        "pnm header: {format:?} {encoding:?} {width}x{height} max={max_value} offset={}",
        tokens.pos
    );

    Ok(PnmHeader {
        format,
        encoding,
        width,
        height,
        max_value,
        data_offset: tokens.pos,
    })
}

/// Declared sample count, or `TruncatedData` if `available` bytes cannot hold
/// that many samples. Every sample takes at least one byte in P1/P2/P3/P5/P6.
fn expected_samples(header: &PnmHeader, available: usize) -> Result<usize, AnymapError> {
    let n = (header.width as usize)
        .saturating_mul(header.height as usize)
        .saturating_mul(header.format.channels());
    if n > available {
        return Err(AnymapError::TruncatedData);
    }
    Ok(n)
}

/// P1: one `0`/`1` character per sample; separators are optional.
pub(crate) fn read_bits_text(
    header: &PnmHeader,
    body: &[u8],
    stop: &dyn Stop,
) -> Result<Vec<u8>, AnymapError> {
    let n = expected_samples(header, body.len())?;
    let w = header.width as usize;
    let mut tokens = Tokens::new(body, 0);
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        if i % w.saturating_mul(16).max(1) == 0 {
            stop.check()?;
        }
        tokens.skip_space_and_comments();
        let bit = match tokens.peek() {
            Some(b'0') => 0,
            Some(b'1') => 1,
            None => return Err(AnymapError::TruncatedData),
            Some(b) => {
                return Err(AnymapError::MalformedHeader(format!(
                    "invalid bit sample 0x{b:02x}"
                )));
            }
        };
        tokens.pos += 1;
        out.push(bit);
    }
    Ok(out)
}

/// P4: rows of `ceil(width / 8)` bytes, most significant bit first.
pub(crate) fn read_bits_packed(
    header: &PnmHeader,
    body: &[u8],
    stop: &dyn Stop,
) -> Result<Vec<u8>, AnymapError> {
    let w = header.width as usize;
    let h = header.height as usize;
    let row_bytes = w.div_ceil(8);
    let packed = body
        .get(..row_bytes.saturating_mul(h))
        .ok_or(AnymapError::TruncatedData)?;

    let mut out = Vec::with_capacity(w * h);
    for (row_idx, row) in packed.chunks_exact(row_bytes.max(1)).enumerate() {
        if row_idx % 16 == 0 {
            stop.check()?;
        }
        out.extend((0..w).map(|x| (row[x / 8] >> (7 - x % 8)) & 1));
    }
    Ok(out)
}

/// P2/P3/P5/P6: `width * height * channels` samples, each at most the max value.
pub(crate) fn read_bytes(
    header: &PnmHeader,
    body: &[u8],
    stop: &dyn Stop,
) -> Result<Vec<u8>, AnymapError> {
    let n = expected_samples(header, body.len())?;
    let row_len = (header.width as usize)
        .saturating_mul(header.format.channels())
        .max(1);
    let max = header.max_value;

    let out_of_range = |value: u32| {
        AnymapError::MalformedHeader(format!("sample {value} exceeds max value {max}"))
    };

    match header.encoding {
        Encoding::Binary => {
            let raw = &body[..n];
            for (row_idx, row) in raw.chunks_exact(row_len).enumerate() {
                if row_idx % 16 == 0 {
                    stop.check()?;
                }
                if let Some(&b) = row.iter().find(|&&b| u32::from(b) > max) {
                    return Err(out_of_range(u32::from(b)));
                }
            }
            Ok(raw.to_vec())
        }
        Encoding::Text => {
            let mut tokens = Tokens::new(body, 0);
            let mut out = Vec::with_capacity(n);
            for i in 0..n {
                if i % row_len.saturating_mul(16) == 0 {
                    stop.check()?;
                }
                let value = tokens.sample_number()?;
                if value > max {
                    return Err(out_of_range(value));
                }
                // max <= 255 was enforced by the header parser.
                out.push(value as u8);
            }
            Ok(out)
        }
    }
}
