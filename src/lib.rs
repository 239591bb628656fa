//! Lopix - Compact encodings for 16-color pixel art
//!
//! This library provides functionality to:
//! - Parse and serialize the line-oriented text format for frames and animations
//! - Decode and encode the fixed-layout binary frame format
//! - Render frames to PNG and animations to GIF

pub mod animation;
pub mod binary;
pub mod cli;
pub mod color;
pub mod config;
pub mod frame;
pub mod gif;
pub mod grid;
pub mod logging;
pub mod output;
pub mod palette;
pub mod parser;

pub use animation::{Animation, AnimationError};
pub use binary::BinaryError;
pub use color::{hex_color, Color, ColorError};
pub use frame::{Frame, FrameError};
pub use grid::{Grid, GridError};
pub use palette::Palette;
pub use parser::{ParseError, ParseErrorKind};
