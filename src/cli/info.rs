//! Info command implementation

use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

use crate::animation::Animation;
use crate::frame::Frame;
use crate::grid::Grid;
use crate::palette::{Palette, PALETTE_SIZE};

use super::{load_animation, load_frame, EXIT_ERROR, EXIT_SUCCESS};

/// How to decode the input of `lopix info`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Frame,
    Animation,
    Binary,
}

/// Summary printed by `lopix info`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoReport {
    pub format: InputKind,
    pub width: usize,
    pub height: usize,
    pub frames: usize,
    /// Per-frame delays in hundredths of a second (animations only)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub delays: Vec<u8>,
    pub palette: Vec<String>,
    /// Palette indices referenced by at least one cell
    pub colors_used: Vec<u8>,
}

impl InfoReport {
    fn new(format: InputKind, palette: &Palette, grids: &[&Grid], delays: Vec<u8>) -> Self {
        let mut used = [false; PALETTE_SIZE];
        for grid in grids {
            for &cell in grid.cells() {
                used[usize::from(cell)] = true;
            }
        }
        let (width, height) = grids.first().map(|g| (g.width(), g.height())).unwrap_or((0, 0));

        InfoReport {
            format,
            width,
            height,
            frames: grids.len(),
            delays,
            palette: palette.iter().map(|c| c.to_string()).collect(),
            colors_used: (0..PALETTE_SIZE as u8).filter(|&i| used[usize::from(i)]).collect(),
        }
    }

    pub fn from_frame(frame: &Frame, format: InputKind) -> Self {
        Self::new(format, frame.palette(), &[frame.grid()], Vec::new())
    }

    pub fn from_animation(animation: &Animation) -> Self {
        let grids: Vec<&Grid> = animation.frames().iter().collect();
        Self::new(InputKind::Animation, animation.palette(), &grids, animation.delays().to_vec())
    }

    fn print_text(&self) {
        println!("Size:    {}x{}", self.width, self.height);
        if self.format == InputKind::Animation {
            println!("Frames:  {}", self.frames);
            let delays: Vec<String> = self.delays.iter().map(|d| d.to_string()).collect();
            println!("Delays:  {}", delays.join(" "));
        }
        println!("Colors:  {} of {} used", self.colors_used.len(), PALETTE_SIZE);
        for (i, color) in self.palette.iter().enumerate() {
            let marker = if self.colors_used.contains(&(i as u8)) { "*" } else { " " };
            println!("  {:x} {} {}", i, color, marker);
        }
    }
}

/// Execute the info command
pub fn run_info(input: &Path, kind: InputKind, json: bool) -> ExitCode {
    let loaded = match kind {
        InputKind::Animation => load_animation(input).map(|a| InfoReport::from_animation(&a)),
        InputKind::Frame => load_frame(input, false).map(|f| InfoReport::from_frame(&f, kind)),
        InputKind::Binary => load_frame(input, true).map(|f| InfoReport::from_frame(&f, kind)),
    };
    let report = match loaded {
        Ok(report) => report,
        Err(code) => return code,
    };

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: Failed to serialize report: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        report.print_text();
    }
    ExitCode::from(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn test_frame_report() {
        let palette = Palette::from_slice(&[Color(0xff0000ff), Color(0x00ff00ff)]).unwrap();
        let frame = Frame::from_rows(3, 2, palette, &["010", "00f"]).unwrap();
        let report = InfoReport::from_frame(&frame, InputKind::Frame);
        assert_eq!((report.width, report.height, report.frames), (3, 2, 1));
        assert_eq!(report.colors_used, vec![0, 1, 15]);
        assert_eq!(report.palette.len(), 16);
        assert_eq!(report.palette[0], "#ff0000ff");
        assert!(report.delays.is_empty());
    }

    #[test]
    fn test_animation_report_json() {
        let animation = Animation::from_rows(
            2,
            1,
            Palette::default(),
            7,
            &[&["01"], &["23"]],
        )
        .unwrap();
        let report = InfoReport::from_animation(&animation);
        assert_eq!(report.frames, 2);
        assert_eq!(report.delays, vec![7, 7]);
        assert_eq!(report.colors_used, vec![0, 1, 2, 3]);

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["format"], "animation");
        assert_eq!(value["delays"], serde_json::json!([7, 7]));
        assert_eq!(value["width"], 2);
    }

    #[test]
    fn test_frame_report_json_omits_delays() {
        let frame = Frame::from_rows(1, 1, Palette::default(), &["0"]).unwrap();
        let value = serde_json::to_value(InfoReport::from_frame(&frame, InputKind::Binary)).unwrap();
        assert_eq!(value["format"], "binary");
        assert!(value.get("delays").is_none());
    }
}
