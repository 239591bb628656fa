//! Color parsing utilities for Lopix palette entries
//!
//! A Lopix color is a packed 32-bit RGBA value with red in the most
//! significant byte. Colors are written as hex strings:
//! - `#RRGGBB` - 6-digit hex, alpha defaults to 255 (opaque)
//! - `#RRGGBBAA` - 8-digit hex, explicit alpha channel
//!
//! The leading `#` is optional when parsing.

use image::Rgba;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for color parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Invalid length (must be 6 or 8 hex chars after the optional #)
    #[error("invalid color length {0}, expected 6 or 8")]
    InvalidLength(usize),
    /// Contains non-hex characters
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
}

/// A packed RGBA color (`0xRRGGBBAA`).
///
/// The default value is fully transparent black, which is what unused
/// palette slots hold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    pub const TRANSPARENT: Color = Color(0);

    /// Build a color from its four channels.
    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color(u32::from_be_bytes([r, g, b, a]))
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn blue(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn alpha(self) -> u8 {
        self.0 as u8
    }

    /// Convert to an `image` pixel.
    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba(self.0.to_be_bytes())
    }
}

impl From<u32> for Color {
    fn from(value: u32) -> Self {
        Color(value)
    }
}

impl From<Color> for u32 {
    fn from(color: Color) -> Self {
        color.0
    }
}

/// Formats as `#rrggbbaa`, always including the alpha channel.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08x}", self.0)
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex_color(s)
    }
}

/// Parse a hexadecimal RGB(A) color such as `#aabbcc` or `aabbccdd`.
///
/// # Examples
///
/// ```
/// use lopix::color::{hex_color, Color};
///
/// assert_eq!(hex_color("#aabbcc").unwrap(), Color(0xaabbccff));
/// assert_eq!(hex_color("#aabbccdd").unwrap(), Color(0xaabbccdd));
/// assert!(hex_color("zz").is_err());
/// ```
///
/// # Errors
///
/// Returns `ColorError` if the length is not 6 or 8 digits, or if any
/// digit is not hexadecimal.
pub fn hex_color(s: &str) -> Result<Color, ColorError> {
    let hex = s.strip_prefix('#').unwrap_or(s);

    // Validate characters before length so "zz" reports the bad digit
    if let Some(c) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidHex(c));
    }

    let digits = hex.as_bytes();
    match digits.len() {
        6 => {
            let r = parse_hex_pair(&digits[0..2]);
            let g = parse_hex_pair(&digits[2..4]);
            let b = parse_hex_pair(&digits[4..6]);
            Ok(Color::from_rgba(r, g, b, 0xff))
        }
        8 => {
            let r = parse_hex_pair(&digits[0..2]);
            let g = parse_hex_pair(&digits[2..4]);
            let b = parse_hex_pair(&digits[4..6]);
            let a = parse_hex_pair(&digits[6..8]);
            Ok(Color::from_rgba(r, g, b, a))
        }
        len => Err(ColorError::InvalidLength(len)),
    }
}

/// Decode a single hex digit (0-9, a-f, A-F) to its value (0-15).
pub fn hex_digit_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Encode a value 0-15 as a lowercase hex digit.
pub fn hex_digit_char(value: u8) -> char {
    char::from_digit(u32::from(value & 0x0f), 16).unwrap_or('0')
}

/// Two already-validated hex digits to u8 (0-255)
fn parse_hex_pair(pair: &[u8]) -> u8 {
    let high = hex_digit_value(pair[0]).unwrap_or(0);
    let low = hex_digit_value(pair[1]).unwrap_or(0);
    high << 4 | low
}
