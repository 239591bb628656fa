//! Compact binary encoding of a single frame
//!
//! Layout (all multi-byte values big-endian):
//!
//! | Offset | Size        | Field                      |
//! |--------|-------------|----------------------------|
//! | 0      | 1           | width - 1                  |
//! | 1      | 1           | height - 1                 |
//! | 2      | 16 * 4      | palette, `0xRRGGBBAA` each |
//! | 66     | w * h       | one cell index per byte    |
//!
//! Storing the dimensions minus one allows frames up to 256x256.

use crate::color::Color;
use crate::frame::Frame;
use crate::grid::{Grid, MAX_CELL};
use crate::palette::{Palette, PALETTE_SIZE};
use byteorder::{BigEndian, ReadBytesExt};
use std::io::{self, Read, Write};
use thiserror::Error;

/// Width + height + palette.
pub const HEADER_SIZE: usize = 2 + PALETTE_SIZE * 4;
/// Largest width or height the header can express.
pub const MAX_BINARY_SIDE: usize = 256;
/// Upper bound on the bytes of one binary frame.
pub const MAX_ENCODED_BINARY_FRAME_SIZE: usize = HEADER_SIZE + MAX_BINARY_SIDE * MAX_BINARY_SIDE;

/// Error decoding a binary frame.
#[derive(Debug, Error)]
pub enum BinaryError {
    /// Source ended inside the fixed header
    #[error("read header: expected {} bytes, found {found}", HEADER_SIZE)]
    ShortHeader { found: usize },
    /// Source ended inside the cell data
    #[error("read grid: expected {expected} bytes, found {found}")]
    ShortGrid { expected: usize, found: usize },
    /// A cell byte is not a palette index
    #[error("cell {index} has value {value}, expected 0..=15")]
    InvalidCell { index: usize, value: u8 },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Read up to `len` bytes, returning fewer only if the source ends.
fn read_up_to<R: Read>(source: &mut R, len: usize) -> io::Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(len);
    source.by_ref().take(len as u64).read_to_end(&mut buf)?;
    Ok(buf)
}

/// Decode one binary frame from `source`.
///
/// Reads exactly the header plus `width * height` bytes; anything after
/// that is left unread.
pub fn read_frame<R: Read>(mut source: R) -> Result<Frame, BinaryError> {
    let header = read_up_to(&mut source, HEADER_SIZE)?;
    if header.len() < HEADER_SIZE {
        return Err(BinaryError::ShortHeader { found: header.len() });
    }

    let width = usize::from(header[0]) + 1;
    let height = usize::from(header[1]) + 1;
    let mut words = &header[2..];
    let mut palette = Palette::default();
    for i in 0..PALETTE_SIZE as u8 {
        palette[i] = Color(words.read_u32::<BigEndian>()?);
    }

    let expected = width * height;
    let cells = read_up_to(&mut source, expected)?;
    if cells.len() < expected {
        return Err(BinaryError::ShortGrid { expected, found: cells.len() });
    }
    if let Some((index, &value)) = cells.iter().enumerate().find(|(_, c)| **c > MAX_CELL) {
        return Err(BinaryError::InvalidCell { index, value });
    }

    tracing::debug!(width, height, "decoded binary frame");
    Ok(Frame::from_parts(palette, Grid::from_decoded(width, height, cells)))
}

/// Encode `frame` in the binary layout.
pub fn write_frame<W: Write>(frame: &Frame, mut writer: W) -> io::Result<()> {
    writer.write_all(&to_bytes(frame))
}

/// Encode `frame` into a new byte vector.
pub fn to_bytes(frame: &Frame) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_SIZE + frame.width() * frame.height());
    // Every Frame is at most 256x256, so the offsets fit in a byte
    out.push((frame.width() - 1) as u8);
    out.push((frame.height() - 1) as u8);
    for color in frame.palette().iter() {
        out.extend_from_slice(&color.0.to_be_bytes());
    }
    out.extend_from_slice(frame.grid().cells());
    out
}
