//! Line-oriented parsing of the Lopix text grammar
//!
//! A [`Parser`] is a cursor over a byte source. It reads one logical line
//! at a time, trims surrounding whitespace, and keeps a 1-based line
//! counter so every failure can be reported as `line N: ...`.
//!
//! ```text
//! Frame         := Dimensions Palette Grid
//! Animation     := AnimationInfo Dimensions Palette Grid (BlankLine Grid)*
//! AnimationInfo := INT "*" INT          ; frame count, delay (1..=99)
//! Dimensions    := INT "x" INT          ; width, height (1..=99)
//! Palette       := (HexColor "\n"){0,16} BlankLine
//! Grid          := (HexRow "\n"){height}
//! ```
//!
//! The total number of bytes a parser will consume is capped up front
//! (see [`MAX_ENCODED_FRAME_SIZE`] and [`MAX_ENCODED_ANIMATION_SIZE`]).

use crate::color::{hex_color, ColorError};
use crate::grid::{decode_row, Grid, GridError};
use crate::palette::{Palette, PALETTE_SIZE};
use std::io::{self, BufRead, BufReader, Read, Take};
use thiserror::Error;

/// Maximum frame width in the text format.
pub const MAX_WIDTH: usize = 99;
/// Maximum frame height in the text format.
pub const MAX_HEIGHT: usize = 99;
/// Maximum number of frames in an animation.
pub const MAX_ANIMATION_FRAMES: usize = 99;
/// Maximum per-frame delay, in hundredths of a second.
pub const MAX_FRAME_DELAY: u8 = 99;

// Sizes below allow "\r\n" terminators on every line.
const MAX_DIMENSIONS_LINE: usize = "99x99\r\n".len();
const MAX_ANIMATION_INFO_LINE: usize = "99*99\r\n".len();
const MAX_PALETTE_BLOCK: usize = PALETTE_SIZE * "#aabbccff\r\n".len() + "\r\n".len();

/// Largest encoded grid block (99 rows of 99 digits).
pub const MAX_ENCODED_GRID_SIZE: usize = MAX_HEIGHT * (MAX_WIDTH + 2);
/// Upper bound on the bytes read for one text frame.
pub const MAX_ENCODED_FRAME_SIZE: usize =
    MAX_DIMENSIONS_LINE + MAX_PALETTE_BLOCK + MAX_ENCODED_GRID_SIZE;
/// Upper bound on the bytes read for one text animation.
pub const MAX_ENCODED_ANIMATION_SIZE: usize = MAX_ANIMATION_INFO_LINE
    + MAX_DIMENSIONS_LINE
    + MAX_PALETTE_BLOCK
    + MAX_ANIMATION_FRAMES * (MAX_ENCODED_GRID_SIZE + 2);

/// What went wrong on a line.
#[derive(Debug, Error)]
pub enum ParseErrorKind {
    /// Line does not have the expected shape
    #[error("expected {expected}, found {found:?}")]
    MalformedLine { expected: &'static str, found: String },
    /// Numeric field outside its bounds
    #[error("{field} {value} is out of range {min}..={max}")]
    OutOfRange { field: &'static str, value: i64, min: i64, max: i64 },
    /// Non-hex digit in a color or grid cell
    #[error("invalid character '{ch}' at column {column}")]
    InvalidCharacter { ch: char, column: usize },
    /// Grid row length differs from the declared width
    #[error("row length {found} does not match width {expected}")]
    SizeMismatch { expected: usize, found: usize },
    /// More than 16 colors before the palette terminator
    #[error("too many colors in palette (maximum 16)")]
    TooManyColors,
    /// Source ended before a line terminator
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    /// Separator or terminator line was not blank
    #[error("expected blank line, found {found:?}")]
    ExpectedBlankLine { found: String },
    /// Read limit reached before the grammar completed
    #[error("input exceeds maximum encoded size of {limit} bytes")]
    InputTooLarge { limit: usize },
    /// Underlying read failed
    #[error("read failed: {0}")]
    Io(#[source] io::Error),
}

/// A parse failure tagged with the 1-based line where it was detected.
#[derive(Debug, Error)]
#[error("line {line}{}: {kind}", frame_label(.frame))]
pub struct ParseError {
    pub line: usize,
    /// Zero-based animation frame being decoded, if any
    pub frame: Option<usize>,
    pub kind: ParseErrorKind,
}

fn frame_label(frame: &Option<usize>) -> String {
    match frame {
        Some(index) => format!(" (frame {})", index + 1),
        None => String::new(),
    }
}

/// Cursor over a byte source, one instance per decode.
pub struct Parser<R> {
    reader: BufReader<Take<R>>,
    line: usize,
    consumed: usize,
    limit: usize,
    frame: Option<usize>,
}

impl<R: Read> Parser<R> {
    /// Wrap `source`, refusing to read more than `limit` bytes from it.
    pub fn new(source: R, limit: usize) -> Self {
        Parser {
            reader: BufReader::new(source.take(limit as u64)),
            line: 0,
            consumed: 0,
            limit,
            frame: None,
        }
    }

    /// Parser bounded for a single text frame.
    pub fn for_frame(source: R) -> Self {
        Self::new(source, MAX_ENCODED_FRAME_SIZE)
    }

    /// Parser bounded for a text animation.
    pub fn for_animation(source: R) -> Self {
        Self::new(source, MAX_ENCODED_ANIMATION_SIZE)
    }

    /// Number of the last line read (0 before the first read).
    pub fn line(&self) -> usize {
        self.line
    }

    /// Total bytes consumed from the source so far.
    pub fn bytes_read(&self) -> usize {
        self.consumed
    }

    /// Tag subsequent errors with an animation frame index.
    pub fn set_frame(&mut self, frame: Option<usize>) {
        self.frame = frame;
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError { line: self.line, frame: self.frame, kind }
    }

    /// Read the next line up to and including `\n`, returning it trimmed.
    pub fn read_line(&mut self) -> Result<String, ParseError> {
        let mut buf = Vec::new();
        self.line += 1;
        let n = self
            .reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| self.error(ParseErrorKind::Io(e)))?;
        self.consumed += n;

        if buf.last() != Some(&b'\n') {
            if self.consumed >= self.limit {
                return Err(self.error(ParseErrorKind::InputTooLarge { limit: self.limit }));
            }
            return Err(self.error(ParseErrorKind::UnexpectedEndOfInput));
        }

        match String::from_utf8(buf) {
            Ok(text) => Ok(text.trim().to_string()),
            Err(e) => Err(self.error(ParseErrorKind::MalformedLine {
                expected: "UTF-8 text",
                found: String::from_utf8_lossy(e.as_bytes()).trim().to_string(),
            })),
        }
    }

    /// Read `<frameCount>*<delay>`.
    pub fn parse_animation_info(&mut self) -> Result<(usize, u8), ParseError> {
        let line = self.read_line()?;
        let (count, delay) = self.split_pair(&line, '*', "animation info `<frames>*<delay>`")?;
        let count = self.parse_bounded(count, "frame count", MAX_ANIMATION_FRAMES as i64)?;
        let delay = self.parse_bounded(delay, "frame delay", i64::from(MAX_FRAME_DELAY))?;
        Ok((count as usize, delay as u8))
    }

    /// Read `<width>x<height>`.
    pub fn parse_dimensions(&mut self) -> Result<(usize, usize), ParseError> {
        let line = self.read_line()?;
        let (w, h) = self.split_pair(&line, 'x', "dimensions `<width>x<height>`")?;
        let w = self.parse_bounded(w, "width", MAX_WIDTH as i64)?;
        let h = self.parse_bounded(h, "height", MAX_HEIGHT as i64)?;
        Ok((w as usize, h as usize))
    }

    /// Read up to 16 colors followed by a blank line.
    ///
    /// Unlisted entries stay transparent black.
    pub fn parse_palette(&mut self) -> Result<Palette, ParseError> {
        let mut palette = Palette::default();
        let mut count: u8 = 0;
        loop {
            let line = self.read_line()?;
            if line.is_empty() {
                return Ok(palette);
            }
            if usize::from(count) == PALETTE_SIZE {
                return Err(self.error(ParseErrorKind::TooManyColors));
            }
            palette[count] = hex_color(&line).map_err(|e| self.color_error(&line, e))?;
            count += 1;
        }
    }

    /// Read exactly `height` rows of `width` hex digits.
    pub fn parse_grid(&mut self, width: usize, height: usize) -> Result<Grid, ParseError> {
        let mut cells = Vec::with_capacity(width * height);
        for _ in 0..height {
            let line = self.read_line()?;
            let row = decode_row(&line, width).map_err(|e| self.grid_error(&line, e))?;
            cells.extend(row);
        }
        Ok(Grid::from_decoded(width, height, cells))
    }

    /// Consume one line, failing unless it is blank.
    pub fn read_blank_line(&mut self) -> Result<(), ParseError> {
        let line = self.read_line()?;
        if !line.is_empty() {
            return Err(self.error(ParseErrorKind::ExpectedBlankLine { found: line }));
        }
        Ok(())
    }

    fn split_pair<'a>(
        &self,
        line: &'a str,
        sep: char,
        expected: &'static str,
    ) -> Result<(&'a str, &'a str), ParseError> {
        let mut parts = line.split(sep);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(a), Some(b), None) => Ok((a, b)),
            _ => Err(self.error(ParseErrorKind::MalformedLine { expected, found: line.to_string() })),
        }
    }

    fn parse_bounded(&self, text: &str, field: &'static str, max: i64) -> Result<i64, ParseError> {
        let value: i64 = text.parse().map_err(|_| {
            self.error(ParseErrorKind::MalformedLine { expected: field, found: text.to_string() })
        })?;
        if value < 1 || value > max {
            return Err(self.error(ParseErrorKind::OutOfRange { field, value, min: 1, max }));
        }
        Ok(value)
    }

    fn color_error(&self, line: &str, err: ColorError) -> ParseError {
        match err {
            ColorError::InvalidHex(ch) => {
                let column = line.chars().position(|c| c == ch).map_or(0, |i| i + 1);
                self.error(ParseErrorKind::InvalidCharacter { ch, column })
            }
            ColorError::InvalidLength(_) => self.error(ParseErrorKind::MalformedLine {
                expected: "hex color `#rrggbb` or `#rrggbbaa`",
                found: line.to_string(),
            }),
        }
    }

    fn grid_error(&self, line: &str, err: GridError) -> ParseError {
        let kind = match err {
            GridError::Blank => {
                ParseErrorKind::MalformedLine { expected: "grid row", found: line.to_string() }
            }
            GridError::SizeMismatch { expected, found } => {
                ParseErrorKind::SizeMismatch { expected, found }
            }
            GridError::InvalidCharacter { ch, column } => {
                ParseErrorKind::InvalidCharacter { ch, column }
            }
        };
        self.error(kind)
    }
}
