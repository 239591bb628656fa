//! Static Lopix images: dimensions, palette and grid
//!
//! A frame is built either by parsing the text format or from literal
//! rows in code:
//!
//! ```
//! use lopix::color::hex_color;
//! use lopix::frame::Frame;
//! use lopix::palette::Palette;
//!
//! let palette = Palette::from_slice(&[
//!     hex_color("#d6d6d6").unwrap(),
//!     hex_color("#ff4000").unwrap(),
//! ])
//! .unwrap();
//! let frame = Frame::from_rows(3, 2, palette, &["010", "101"]).unwrap();
//!
//! let text = frame.to_text();
//! assert_eq!(text.parse::<Frame>().unwrap(), frame);
//! ```

use crate::grid::{decode_row, Grid, GridError};
use crate::palette::Palette;
use crate::parser::{ParseError, Parser, MAX_HEIGHT, MAX_WIDTH};
use image::RgbaImage;
use std::io::{self, Read, Write};
use std::str::FromStr;
use thiserror::Error;

/// Error building a frame in code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// Width or height outside 1..=99
    #[error("dimensions {width}x{height} are out of range 1..=99")]
    InvalidDimensions { width: usize, height: usize },
    /// Number of rows differs from the declared height
    #[error("expected {expected} rows, found {found}")]
    RowCount { expected: usize, found: usize },
    /// A literal row failed to decode
    #[error("row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: GridError,
    },
}

pub(crate) fn check_dimensions(width: usize, height: usize) -> Result<(), FrameError> {
    if width < 1 || width > MAX_WIDTH || height < 1 || height > MAX_HEIGHT {
        return Err(FrameError::InvalidDimensions { width, height });
    }
    Ok(())
}

/// One indexed-color image.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Frame {
    palette: Palette,
    grid: Grid,
}

impl Frame {
    /// Pair a palette with a grid.
    ///
    /// The grid must be between 1x1 and 99x99.
    pub fn new(palette: Palette, grid: Grid) -> Result<Self, FrameError> {
        check_dimensions(grid.width(), grid.height())?;
        Ok(Frame { palette, grid })
    }

    /// Binary frames may reach 256x256, beyond the text limits.
    pub(crate) fn from_parts(palette: Palette, grid: Grid) -> Self {
        Frame { palette, grid }
    }

    /// Build a frame from literal hex rows such as `"0120"`.
    ///
    /// Every row must hold exactly `width` hex digits and there must be
    /// exactly `height` rows.
    pub fn from_rows<S: AsRef<str>>(
        width: usize,
        height: usize,
        palette: Palette,
        rows: &[S],
    ) -> Result<Self, FrameError> {
        check_dimensions(width, height)?;
        if rows.len() != height {
            return Err(FrameError::RowCount { expected: height, found: rows.len() });
        }

        let mut cells = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            let decoded =
                decode_row(row.as_ref(), width).map_err(|source| FrameError::Row { row: y, source })?;
            cells.extend(decoded);
        }
        Ok(Frame { palette, grid: Grid::from_decoded(width, height, cells) })
    }

    /// Decode a text frame from `source`.
    ///
    /// Reads at most [`MAX_ENCODED_FRAME_SIZE`](crate::parser::MAX_ENCODED_FRAME_SIZE)
    /// bytes. Any failure aborts the whole decode.
    pub fn parse<R: Read>(source: R) -> Result<Self, ParseError> {
        let mut parser = Parser::for_frame(source);
        let (width, height) = parser.parse_dimensions()?;
        let palette = parser.parse_palette()?;
        let grid = parser.parse_grid(width, height)?;

        tracing::debug!(width, height, bytes = parser.bytes_read(), "decoded text frame");
        Ok(Frame { palette, grid })
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Encode as text: dimensions, 16 palette lines, a blank line, then
    /// `height` rows of lowercase hex digits.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(
            8 + 16 * 10 + 1 + self.height() * (self.width() + 1),
        );
        write_header(&mut out, self.width(), self.height(), &self.palette);
        self.grid.write_text(&mut out);
        out
    }

    /// Write the text encoding to `writer`.
    pub fn write_text<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(self.to_text().as_bytes())
    }

    /// Render to an RGBA buffer, one pixel per cell.
    pub fn to_image(&self) -> RgbaImage {
        render_grid(&self.grid, &self.palette)
    }
}

impl FromStr for Frame {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Frame::parse(s.as_bytes())
    }
}

/// Dimensions line, palette block and its terminating blank line.
pub(crate) fn write_header(out: &mut String, width: usize, height: usize, palette: &Palette) {
    out.push_str(&format!("{}x{}\n", width, height));
    for color in palette.iter() {
        out.push_str(&color.to_string());
        out.push('\n');
    }
    out.push('\n');
}

pub(crate) fn render_grid(grid: &Grid, palette: &Palette) -> RgbaImage {
    let table = palette.to_rgba_table();
    let width = grid.width();
    let cells = grid.cells();
    RgbaImage::from_fn(width as u32, grid.height() as u32, |x, y| {
        table[usize::from(cells[y as usize * width + x as usize])]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::parser::ParseErrorKind;
    use image::Rgba;

    fn two_color_palette() -> Palette {
        Palette::from_slice(&[Color(0xff0000ff), Color(0x00ff00ff)]).unwrap()
    }

    #[test]
    fn test_parse_concrete_frame() {
        let frame: Frame = "2x2\n#ff0000ff\n#00ff00ff\n\n01\n10\n".parse().unwrap();
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.palette()[0], Color(0xff0000ff));
        assert_eq!(frame.palette()[1], Color(0x00ff00ff));
        assert_eq!(frame.palette()[2], Color::TRANSPARENT);
        assert_eq!(frame.grid().cells(), &[0, 1, 1, 0]);
    }

    #[test]
    fn test_serialize_format() {
        let frame = Frame::from_rows(2, 1, two_color_palette(), &["01"]).unwrap();
        let text = frame.to_text();
        let lines: Vec<&str> = text.split('\n').collect();
        assert_eq!(lines[0], "2x1");
        assert_eq!(lines[1], "#ff0000ff");
        assert_eq!(lines[2], "#00ff00ff");
        assert_eq!(lines[3], "#00000000");
        assert_eq!(lines[16], "#00000000");
        assert_eq!(lines[17], "");
        assert_eq!(lines[18], "01");
        assert!(text.ends_with("01\n"));
    }

    #[test]
    fn test_round_trip() {
        let palette = Palette::from_slice(&[
            Color(0xd6d6d6ff),
            Color(0xff4000ff),
            Color(0x24242480),
        ])
        .unwrap();
        let frame = Frame::from_rows(
            4,
            3,
            palette,
            &["0000", "0120", "Fa9b"],
        )
        .unwrap();
        let decoded = Frame::parse(frame.to_text().as_bytes()).unwrap();
        assert_eq!(decoded, frame);
        assert_eq!(decoded.grid().row(2), Some(&[15u8, 10, 9, 11][..]));
    }

    #[test]
    fn test_round_trip_extremes() {
        let row: String = "f".repeat(99);
        let rows = vec![row; 99];
        let palette = Palette::new([Color(0x12345678); 16]);
        let frame = Frame::from_rows(99, 99, palette, &rows).unwrap();
        assert_eq!(Frame::parse(frame.to_text().as_bytes()).unwrap(), frame);

        let tiny = Frame::from_rows(1, 1, Palette::default(), &["0"]).unwrap();
        assert_eq!(Frame::parse(tiny.to_text().as_bytes()).unwrap(), tiny);
    }

    #[test]
    fn test_from_rows_errors() {
        let p = two_color_palette();
        assert_eq!(
            Frame::from_rows(0, 1, p, &[""]),
            Err(FrameError::InvalidDimensions { width: 0, height: 1 })
        );
        assert_eq!(
            Frame::from_rows(100, 1, p, &["0"]),
            Err(FrameError::InvalidDimensions { width: 100, height: 1 })
        );
        assert_eq!(
            Frame::from_rows(2, 2, p, &["01"]),
            Err(FrameError::RowCount { expected: 2, found: 1 })
        );
        assert_eq!(
            Frame::from_rows(2, 2, p, &["01", "012"]),
            Err(FrameError::Row {
                row: 1,
                source: GridError::SizeMismatch { expected: 2, found: 3 }
            })
        );
        assert_eq!(
            Frame::from_rows(2, 1, p, &["0x"]),
            Err(FrameError::Row {
                row: 0,
                source: GridError::InvalidCharacter { ch: 'x', column: 2 }
            })
        );
    }

    #[test]
    fn test_new_checks_dimensions() {
        assert!(Frame::new(Palette::default(), Grid::new(3, 3)).is_ok());
        assert!(Frame::new(Palette::default(), Grid::new(0, 3)).is_err());
        assert!(Frame::new(Palette::default(), Grid::new(100, 3)).is_err());
    }

    #[test]
    fn test_parse_errors_carry_line_numbers() {
        let err = Frame::parse("2x2\n#ff0000\n\n01\n1g\n".as_bytes()).unwrap_err();
        assert_eq!(err.line, 5);
        assert!(matches!(err.kind, ParseErrorKind::InvalidCharacter { ch: 'g', .. }));
        assert_eq!(err.frame, None);

        let err = Frame::parse("2x2\n\n01\n100\n".as_bytes()).unwrap_err();
        assert_eq!(err.line, 4);
        assert!(matches!(err.kind, ParseErrorKind::SizeMismatch { expected: 2, found: 3 }));

        let err = Frame::parse("2x2\n\n01\n".as_bytes()).unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::UnexpectedEndOfInput));
    }

    #[test]
    fn test_parse_ignores_trailing_content() {
        let frame = Frame::parse("1x1\n\n0\ntrailing garbage".as_bytes()).unwrap();
        assert_eq!(frame.grid().cells(), &[0]);
    }

    #[test]
    fn test_parse_tolerates_crlf_and_padding() {
        let frame = Frame::parse("  2x1 \r\n#ff0000\r\n\r\n 01 \r\n".as_bytes()).unwrap();
        assert_eq!(frame.grid().cells(), &[0, 1]);
    }

    #[test]
    fn test_write_text() {
        let frame = Frame::from_rows(1, 1, Palette::default(), &["0"]).unwrap();
        let mut buf = Vec::new();
        frame.write_text(&mut buf).unwrap();
        assert_eq!(buf, frame.to_text().into_bytes());
    }

    #[test]
    fn test_to_image() {
        let frame = Frame::from_rows(3, 2, two_color_palette(), &["010", "112"]).unwrap();
        let img = frame.to_image();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(*img.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(*img.get_pixel(1, 0), Rgba([0, 255, 0, 255]));
        assert_eq!(*img.get_pixel(0, 1), Rgba([0, 255, 0, 255]));
        assert_eq!(*img.get_pixel(2, 1), Rgba([0, 0, 0, 0]));
    }
}
