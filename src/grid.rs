//! Row-major grids of 4-bit palette indices

use crate::color::hex_digit_char;
use thiserror::Error;

/// Largest value a cell may hold.
pub const MAX_CELL: u8 = 0x0f;

/// Error decoding a single grid row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Row is empty where `width` cells were expected
    #[error("blank line inside grid")]
    Blank,
    /// Row length differs from the declared width
    #[error("row has {found} cells but width is {expected}")]
    SizeMismatch { expected: usize, found: usize },
    /// Row contains something other than a hex digit
    #[error("invalid cell character '{ch}' at column {column}")]
    InvalidCharacter { ch: char, column: usize },
}

/// Decode one text row into cell values.
///
/// The row must be exactly `width` hex digits (`0-9`, `a-f`, `A-F`).
pub fn decode_row(row: &str, width: usize) -> Result<Vec<u8>, GridError> {
    if row.is_empty() {
        return Err(GridError::Blank);
    }
    let found = row.chars().count();
    if found != width {
        return Err(GridError::SizeMismatch { expected: width, found });
    }
    row.chars()
        .enumerate()
        .map(|(x, ch)| match ch.to_digit(16) {
            Some(value) => Ok(value as u8),
            None => Err(GridError::InvalidCharacter { ch, column: x + 1 }),
        })
        .collect()
}

/// A `width * height` grid of palette indices.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl Grid {
    /// Grid of the given size with every cell set to index 0.
    pub fn new(width: usize, height: usize) -> Self {
        Grid { width, height, cells: vec![0; width * height] }
    }

    /// Wrap existing cells.
    ///
    /// Returns `None` if `cells.len() != width * height` or a cell is
    /// above 15.
    pub fn from_cells(width: usize, height: usize, cells: Vec<u8>) -> Option<Self> {
        if cells.len() != width * height || cells.iter().any(|&c| c > MAX_CELL) {
            return None;
        }
        Some(Grid { width, height, cells })
    }

    /// Cells already checked by [`decode_row`] or the binary reader.
    pub(crate) fn from_decoded(width: usize, height: usize, cells: Vec<u8>) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        debug_assert!(cells.iter().all(|&c| c <= MAX_CELL));
        Grid { width, height, cells }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.cells[y * self.width + x])
    }

    /// Row `y` as a slice of `width` cells, or `None` past the last row.
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        self.cells.get(y * self.width..(y + 1) * self.width)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        // chunks() panics on zero, and a zero-width grid has no rows anyway
        self.cells.chunks(self.width.max(1)).take(self.height)
    }

    /// Append rows as lowercase hex digits, one line each.
    pub(crate) fn write_text(&self, out: &mut String) {
        for row in self.rows() {
            out.extend(row.iter().map(|&c| hex_digit_char(c)));
            out.push('\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_row() {
        assert_eq!(decode_row("01aF", 4).unwrap(), vec![0, 1, 10, 15]);
    }

    #[test]
    fn test_decode_row_wrong_length() {
        assert_eq!(decode_row("012", 2), Err(GridError::SizeMismatch { expected: 2, found: 3 }));
        assert_eq!(decode_row("0", 2), Err(GridError::SizeMismatch { expected: 2, found: 1 }));
    }

    #[test]
    fn test_decode_row_invalid_char() {
        assert_eq!(decode_row("0g", 2), Err(GridError::InvalidCharacter { ch: 'g', column: 2 }));
    }

    #[test]
    fn test_decode_row_blank() {
        assert_eq!(decode_row("", 3), Err(GridError::Blank));
    }

    #[test]
    fn test_decode_row_non_ascii_char() {
        assert_eq!(decode_row("é0", 2), Err(GridError::InvalidCharacter { ch: 'é', column: 1 }));
    }

    #[test]
    fn test_from_cells_validates() {
        assert!(Grid::from_cells(2, 2, vec![0, 1, 2, 3]).is_some());
        assert!(Grid::from_cells(2, 2, vec![0, 1, 2]).is_none());
        assert!(Grid::from_cells(2, 1, vec![0, 16]).is_none());
    }

    #[test]
    fn test_row_major_layout() {
        let grid = Grid::from_cells(3, 2, vec![0, 1, 2, 3, 4, 5]).unwrap();
        assert_eq!(grid.row(1), Some(&[3u8, 4, 5][..]));
        assert_eq!(grid.row(2), None);
        assert_eq!(grid.get(2, 0), Some(2));
        assert_eq!(grid.get(0, 1), Some(3));
        assert_eq!(grid.get(3, 0), None);
        assert_eq!(grid.rows().count(), 2);
    }

    #[test]
    fn test_write_text() {
        let grid = Grid::from_cells(2, 2, vec![0, 15, 10, 1]).unwrap();
        let mut out = String::new();
        grid.write_text(&mut out);
        assert_eq!(out, "0f\na1\n");
    }
}
