//! GIF animation rendering

use crate::output::OutputError;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};
use std::io::Write;

/// Encode a sequence of frames as an animated GIF.
///
/// # Arguments
///
/// * `writer` - Destination for the encoded bytes
/// * `frames` - The image frames to include in the animation
/// * `delays` - Display time per frame, in hundredths of a second
/// * `repeat` - Whether the animation should loop infinitely
///
/// Frames without a matching delay entry reuse the last one.
pub fn write_gif<W: Write>(
    writer: W,
    frames: &[RgbaImage],
    delays: &[u8],
    repeat: bool,
) -> Result<(), OutputError> {
    if frames.is_empty() {
        return Ok(());
    }

    let mut encoder = GifEncoder::new(writer);
    encoder.set_repeat(if repeat { Repeat::Infinite } else { Repeat::Finite(0) })?;

    let mut delay_cs = delays.first().copied().unwrap_or(1);
    for (i, rgba_image) in frames.iter().enumerate() {
        if let Some(&d) = delays.get(i) {
            delay_cs = d;
        }
        // GIF stores centiseconds; image::Delay is expressed in milliseconds
        let delay = Delay::from_numer_denom_ms(u32::from(delay_cs.max(1)) * 10, 1);
        encoder.encode_frame(Frame::from_parts(rgba_image.clone(), 0, 0, delay))?;
    }

    Ok(())
}
