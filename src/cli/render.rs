//! Render command implementations (png, gif)

use std::path::Path;
use std::process::ExitCode;

use crate::config::LopixConfig;
use crate::gif::write_gif;
use crate::output::{scale_image, write_png};

use super::{load_animation, load_frame, write_output};

/// Execute the png command
pub fn run_png(input: &Path, output: &Path, binary: bool, config: &LopixConfig) -> ExitCode {
    let frame = match load_frame(input, binary) {
        Ok(frame) => frame,
        Err(code) => return code,
    };

    let scale = config.defaults.scale;
    let image = scale_image(frame.to_image(), scale);
    tracing::debug!(width = image.width(), height = image.height(), scale, "rendered frame");

    write_output(output, |w| write_png(w, &image))
}

/// Execute the gif command
pub fn run_gif(input: &Path, output: &Path, config: &LopixConfig) -> ExitCode {
    let animation = match load_animation(input) {
        Ok(animation) => animation,
        Err(code) => return code,
    };

    let scale = config.defaults.scale;
    let frames: Vec<_> =
        animation.to_images().into_iter().map(|image| scale_image(image, scale)).collect();
    tracing::debug!(
        frames = frames.len(),
        scale,
        repeat = config.gif.repeat,
        "rendered animation"
    );

    write_output(output, |w| write_gif(w, &frames, animation.delays(), config.gif.repeat))
}
