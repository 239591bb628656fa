//! PNG output and nearest-neighbor upscaling

use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{ColorType, ImageEncoder, RgbaImage};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Error writing a raster output
#[derive(Debug, Error)]
pub enum OutputError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Create `path` for writing, creating parent directories if needed.
pub fn create_output_file(path: &Path) -> Result<BufWriter<File>, OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(BufWriter::new(File::create(path)?))
}

/// Encode an RGBA image as PNG into `writer`.
pub fn write_png<W: Write>(writer: W, image: &RgbaImage) -> Result<(), OutputError> {
    let encoder = PngEncoder::new(writer);
    encoder.write_image(image.as_raw(), image.width(), image.height(), ColorType::Rgba8)?;
    Ok(())
}

/// Scale image by integer factor using nearest-neighbor interpolation.
///
/// This preserves crisp pixel edges for pixel art. A factor of 0 or 1
/// returns the image unchanged.
pub fn scale_image(image: RgbaImage, factor: u32) -> RgbaImage {
    if factor <= 1 {
        return image;
    }
    let (w, h) = image.dimensions();
    image::imageops::resize(&image, w * factor, h * factor, FilterType::Nearest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::frame::Frame;
    use crate::palette::Palette;

    const SKY: Color = Color(0x5fcde4ff);
    const HULL: Color = Color(0x8f563bff);
    const GLASS: Color = Color(0xcbdbfc80);

    /// 3x2 ship: sky background, hull, half-transparent window, one unset index.
    fn ship() -> Frame {
        let palette = Palette::from_slice(&[SKY, HULL, GLASS]).unwrap();
        Frame::from_rows(3, 2, palette, &["121", "1f1"]).unwrap()
    }

    #[test]
    fn test_write_png_preserves_palette_colors() {
        let image = ship().to_image();
        let mut buf = Vec::new();
        write_png(&mut buf, &image).unwrap();
        assert_eq!(&buf[..8], b"\x89PNG\r\n\x1a\n");

        let loaded = image::load_from_memory(&buf).unwrap().to_rgba8();
        assert_eq!(loaded, image);
        assert_eq!(*loaded.get_pixel(1, 0), GLASS.to_rgba());
        assert_eq!(*loaded.get_pixel(1, 1), Color::TRANSPARENT.to_rgba());
    }

    #[test]
    fn test_write_png_reports_writer_failure() {
        struct Closed;
        impl Write for Closed {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }
        assert!(write_png(Closed, &ship().to_image()).is_err());
    }

    #[test]
    fn test_create_output_file_makes_missing_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sprites/ships/ship.png");

        let mut file = create_output_file(&path).unwrap();
        write_png(&mut file, &ship().to_image()).unwrap();
        file.flush().unwrap();
        assert_eq!(image::open(&path).unwrap().to_rgba8(), ship().to_image());
    }

    #[test]
    fn test_scale_image_identity_factors() {
        for factor in [0, 1] {
            assert_eq!(scale_image(ship().to_image(), factor), ship().to_image());
        }
    }

    #[test]
    fn test_scale_image_expands_cells_to_blocks() {
        let frame = ship();
        let scaled = scale_image(frame.to_image(), 4);
        assert_eq!(scaled.dimensions(), (12, 8));

        for (x, y, pixel) in scaled.enumerate_pixels() {
            let cell = frame.grid().get(x as usize / 4, y as usize / 4).unwrap();
            assert_eq!(*pixel, frame.palette()[cell].to_rgba(), "pixel ({x}, {y})");
        }
    }
}
