//! Lopix animations: frames sharing one palette and one size
//!
//! Text layout:
//!
//! ```text
//! 2*25          <- frame count * delay (hundredths of a second)
//! 2x2           <- width x height
//! #ff0000       <- up to 16 palette colors
//!               <- blank line ends the palette
//! 01            <- frame 1
//! 10
//!               <- blank line between frames
//! 10            <- frame 2
//! 01
//! ```

use crate::frame::{check_dimensions, render_grid, write_header, Frame, FrameError};
use crate::grid::{decode_row, Grid, GridError};
use crate::palette::Palette;
use crate::parser::{ParseError, Parser, MAX_ANIMATION_FRAMES, MAX_FRAME_DELAY};
use image::RgbaImage;
use std::io::{self, Read, Write};
use std::str::FromStr;
use thiserror::Error;

/// Error building an animation in code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnimationError {
    #[error(transparent)]
    Frame(#[from] FrameError),
    /// Zero frames, or more than 99
    #[error("frame count {0} is out of range 1..=99")]
    FrameCount(usize),
    /// Delay list and frame list differ in length
    #[error("{delays} delays given for {frames} frames")]
    DelayCount { frames: usize, delays: usize },
    /// Delay outside 1..=99 hundredths
    #[error("frame {index}: delay {delay} is out of range 1..=99")]
    InvalidDelay { index: usize, delay: u8 },
    /// A grid does not match the animation's size
    #[error("frame {index}: grid is {width}x{height}, expected {expected_width}x{expected_height}")]
    GridSize {
        index: usize,
        width: usize,
        height: usize,
        expected_width: usize,
        expected_height: usize,
    },
    /// A literal row failed to decode
    #[error("frame {index}, row {row}: {source}")]
    Row {
        index: usize,
        row: usize,
        #[source]
        source: GridError,
    },
}

/// An ordered sequence of grids with per-frame delays.
///
/// Every frame uses the animation's single palette and size.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Animation {
    width: usize,
    height: usize,
    palette: Palette,
    delays: Vec<u8>,
    frames: Vec<Grid>,
}

impl Animation {
    /// Build an animation with one delay per frame.
    pub fn from_frames(
        width: usize,
        height: usize,
        palette: Palette,
        delays: Vec<u8>,
        frames: Vec<Grid>,
    ) -> Result<Self, AnimationError> {
        check_dimensions(width, height)?;
        if frames.is_empty() || frames.len() > MAX_ANIMATION_FRAMES {
            return Err(AnimationError::FrameCount(frames.len()));
        }
        if delays.len() != frames.len() {
            return Err(AnimationError::DelayCount { frames: frames.len(), delays: delays.len() });
        }
        if let Some((index, &delay)) =
            delays.iter().enumerate().find(|(_, d)| **d < 1 || **d > MAX_FRAME_DELAY)
        {
            return Err(AnimationError::InvalidDelay { index, delay });
        }
        if let Some((index, grid)) = frames
            .iter()
            .enumerate()
            .find(|(_, g)| g.width() != width || g.height() != height)
        {
            return Err(AnimationError::GridSize {
                index,
                width: grid.width(),
                height: grid.height(),
                expected_width: width,
                expected_height: height,
            });
        }
        Ok(Animation { width, height, palette, delays, frames })
    }

    /// Build an animation where every frame shows for `delay` hundredths.
    pub fn with_uniform_delay(
        width: usize,
        height: usize,
        palette: Palette,
        delay: u8,
        frames: Vec<Grid>,
    ) -> Result<Self, AnimationError> {
        let delays = vec![delay; frames.len()];
        Self::from_frames(width, height, palette, delays, frames)
    }

    /// Build from literal hex rows, one slice of rows per frame.
    pub fn from_rows(
        width: usize,
        height: usize,
        palette: Palette,
        delay: u8,
        frames: &[&[&str]],
    ) -> Result<Self, AnimationError> {
        check_dimensions(width, height)?;
        let mut grids = Vec::with_capacity(frames.len());
        for (index, rows) in frames.iter().enumerate() {
            if rows.len() != height {
                return Err(FrameError::RowCount { expected: height, found: rows.len() }.into());
            }
            let mut cells = Vec::with_capacity(width * height);
            for (row, text) in rows.iter().enumerate() {
                let decoded = decode_row(text, width)
                    .map_err(|source| AnimationError::Row { index, row, source })?;
                cells.extend(decoded);
            }
            grids.push(Grid::from_decoded(width, height, cells));
        }
        Self::with_uniform_delay(width, height, palette, delay, grids)
    }

    /// Decode a text animation from `source`.
    ///
    /// Reads at most
    /// [`MAX_ENCODED_ANIMATION_SIZE`](crate::parser::MAX_ENCODED_ANIMATION_SIZE)
    /// bytes. Errors inside a grid carry the frame index as well as the line.
    pub fn parse<R: Read>(source: R) -> Result<Self, ParseError> {
        let mut parser = Parser::for_animation(source);
        let (count, delay) = parser.parse_animation_info()?;
        let (width, height) = parser.parse_dimensions()?;
        let palette = parser.parse_palette()?;

        let mut frames = Vec::with_capacity(count);
        for index in 0..count {
            parser.set_frame(Some(index));
            frames.push(parser.parse_grid(width, height)?);
            if index + 1 < count {
                parser.read_blank_line()?;
            }
        }

        tracing::debug!(
            width,
            height,
            frames = count,
            delay,
            bytes = parser.bytes_read(),
            "decoded text animation"
        );
        Ok(Animation { width, height, palette, delays: vec![delay; count], frames })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Per-frame delays in hundredths of a second.
    pub fn delays(&self) -> &[u8] {
        &self.delays
    }

    pub fn frames(&self) -> &[Grid] {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Frame `index` as a standalone [`Frame`].
    pub fn frame(&self, index: usize) -> Option<Frame> {
        let grid = self.frames.get(index)?.clone();
        Some(Frame::from_parts(self.palette, grid))
    }

    /// Whether every frame has the same delay.
    pub fn has_uniform_delay(&self) -> bool {
        self.delays.windows(2).all(|w| w[0] == w[1])
    }

    /// Delay written to the text header.
    ///
    /// The text format stores a single delay, so mixed delays collapse to
    /// the most common one, ties going to the earliest frame.
    pub fn canonical_delay(&self) -> u8 {
        let mut counts = [0usize; MAX_FRAME_DELAY as usize + 1];
        for &d in &self.delays {
            counts[usize::from(d)] += 1;
        }
        let mut best = self.delays[0];
        for &d in &self.delays {
            if counts[usize::from(d)] > counts[usize::from(best)] {
                best = d;
            }
        }
        best
    }

    /// Encode as text: the `count*delay` line, dimensions, palette block,
    /// then each grid with a blank line between frames.
    pub fn to_text(&self) -> String {
        let delay = self.canonical_delay();
        if !self.has_uniform_delay() {
            tracing::warn!(delay, "mixed frame delays collapsed to a single delay");
        }

        let mut out = format!("{}*{}\n", self.frames.len(), delay);
        write_header(&mut out, self.width, self.height, &self.palette);
        for (i, grid) in self.frames.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            grid.write_text(&mut out);
        }
        out
    }

    /// Write the text encoding to `writer`.
    pub fn write_text<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(self.to_text().as_bytes())
    }

    /// Render every frame to an RGBA buffer, one pixel per cell.
    pub fn to_images(&self) -> Vec<RgbaImage> {
        self.frames.iter().map(|grid| render_grid(grid, &self.palette)).collect()
    }
}

impl FromStr for Animation {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Animation::parse(s.as_bytes())
    }
}
