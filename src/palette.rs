//! Fixed 16-entry color palette addressed by 4-bit cell indices

use crate::color::Color;
use image::Rgba;
use std::ops::{Index, IndexMut};

/// Number of entries in every palette.
pub const PALETTE_SIZE: usize = 16;

/// An ordered set of exactly 16 colors.
///
/// Entries that were never supplied keep the zero value (fully
/// transparent black). Duplicate colors are allowed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Palette([Color; PALETTE_SIZE]);

impl Palette {
    pub const fn new(colors: [Color; PALETTE_SIZE]) -> Self {
        Palette(colors)
    }

    /// Build a palette from up to 16 leading colors.
    ///
    /// Returns `None` if more than 16 colors are given.
    pub fn from_slice(colors: &[Color]) -> Option<Self> {
        if colors.len() > PALETTE_SIZE {
            return None;
        }
        let mut palette = Palette::default();
        palette.0[..colors.len()].copy_from_slice(colors);
        Some(palette)
    }

    pub fn colors(&self) -> &[Color; PALETTE_SIZE] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Color> {
        self.0.iter()
    }

    /// Lookup table of `image` pixels, one per palette index.
    pub fn to_rgba_table(&self) -> [Rgba<u8>; PALETTE_SIZE] {
        self.0.map(Color::to_rgba)
    }
}

impl Index<u8> for Palette {
    type Output = Color;

    /// Panics if `index >= 16`; grids never hold such values.
    fn index(&self, index: u8) -> &Color {
        &self.0[usize::from(index)]
    }
}

impl IndexMut<u8> for Palette {
    fn index_mut(&mut self, index: u8) -> &mut Color {
        &mut self.0[usize::from(index)]
    }
}

impl From<[Color; PALETTE_SIZE]> for Palette {
    fn from(colors: [Color; PALETTE_SIZE]) -> Self {
        Palette(colors)
    }
}
