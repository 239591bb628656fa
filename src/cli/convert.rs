//! Conversion command implementations (fmt, pack, unpack)

use std::io::Read;
use std::path::Path;
use std::process::ExitCode;

use crate::animation::Animation;
use crate::binary;
use crate::frame::Frame;
use crate::parser::{MAX_ENCODED_ANIMATION_SIZE, MAX_ENCODED_FRAME_SIZE, MAX_HEIGHT, MAX_WIDTH};

use super::{load_frame, open_input_or_exit, write_output, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the fmt command
pub fn run_fmt(input: &Path, output: &Path, animation: bool, check: bool) -> ExitCode {
    let source = match open_input_or_exit(input) {
        Ok(source) => source,
        Err(code) => return code,
    };

    // One byte past the cap so the parser still reports oversized input
    let limit = if animation { MAX_ENCODED_ANIMATION_SIZE } else { MAX_ENCODED_FRAME_SIZE };
    let mut original = Vec::new();
    if let Err(e) = source.take(limit as u64 + 1).read_to_end(&mut original) {
        eprintln!("Error: Cannot read '{}': {}", input.display(), e);
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let canonical = if animation {
        Animation::parse(original.as_slice()).map(|a| a.to_text())
    } else {
        Frame::parse(original.as_slice()).map(|f| f.to_text())
    };
    let canonical = match canonical {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error: {}: {}", input.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if check {
        return if canonical.as_bytes() == original.as_slice() {
            ExitCode::from(EXIT_SUCCESS)
        } else {
            eprintln!("{}: not in canonical form", input.display());
            ExitCode::from(EXIT_ERROR)
        };
    }

    write_output(output, |w| Ok(w.write_all(canonical.as_bytes())?))
}

/// Execute the pack command
pub fn run_pack(input: &Path, output: &Path) -> ExitCode {
    let frame = match load_frame(input, false) {
        Ok(frame) => frame,
        Err(code) => return code,
    };
    write_output(output, |w| Ok(binary::write_frame(&frame, w)?))
}

/// Execute the unpack command
pub fn run_unpack(input: &Path, output: &Path) -> ExitCode {
    let frame = match load_frame(input, true) {
        Ok(frame) => frame,
        Err(code) => return code,
    };
    if frame.width() > MAX_WIDTH || frame.height() > MAX_HEIGHT {
        tracing::warn!(
            width = frame.width(),
            height = frame.height(),
            "frame exceeds the text size limit; the output will not parse back"
        );
    }
    write_output(output, |w| Ok(frame.write_text(w)?))
}
