//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod convert;
mod info;
mod render;

use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::animation::Animation;
use crate::binary;
use crate::config::{
    discovery_start, find_config_from, load_config, merge_cli_overrides, CliOverrides,
    LopixConfig, MAX_SCALE,
};
use crate::frame::Frame;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::{create_output_file, OutputError};

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Lopix - Convert 16-color pixel art between text, binary, PNG and GIF
#[derive(Parser)]
#[command(name = "lopix")]
#[command(about = "Lopix - Convert 16-color pixel art between text, binary, PNG and GIF")]
#[command(version)]
pub struct Cli {
    /// Diagnostic log format
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub log_format: LogFormat,

    /// Diagnostic log level (default: from lopix.toml, else warn)
    #[arg(long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Ignore any lopix.toml
    #[arg(long, global = true)]
    pub no_config: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a frame to PNG
    Png {
        /// Input frame, or - for stdin
        input: PathBuf,

        /// Output PNG, or - for stdout
        output: PathBuf,

        /// Scale output by integer factor (1-256)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_SCALE as i64))]
        scale: Option<u32>,

        /// Read the input as a binary frame
        #[arg(long)]
        binary: bool,
    },

    /// Render an animation to GIF
    Gif {
        /// Input animation, or - for stdin
        input: PathBuf,

        /// Output GIF, or - for stdout
        output: PathBuf,

        /// Scale output by integer factor (1-256)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_SCALE as i64))]
        scale: Option<u32>,

        /// Play once instead of looping forever
        #[arg(long)]
        no_loop: bool,
    },

    /// Rewrite a text file in canonical form
    Fmt {
        /// Input file, or - for stdin
        input: PathBuf,

        /// Treat the input as an animation
        #[arg(long)]
        animation: bool,

        /// Check whether the input is already canonical (exit 1 if not)
        #[arg(long)]
        check: bool,

        /// Output file, or - for stdout
        #[arg(short, long, default_value = "-")]
        output: PathBuf,
    },

    /// Convert a text frame to the binary encoding
    Pack {
        /// Input text frame, or - for stdin
        input: PathBuf,

        /// Output binary frame, or - for stdout
        output: PathBuf,
    },

    /// Convert a binary frame to the text encoding
    Unpack {
        /// Input binary frame, or - for stdin
        input: PathBuf,

        /// Output text frame, or - for stdout
        output: PathBuf,
    },

    /// Describe a frame or animation
    Info {
        /// Input file, or - for stdin
        input: PathBuf,

        /// Treat the input as an animation
        #[arg(long, conflicts_with = "binary")]
        animation: bool,

        /// Treat the input as a binary frame
        #[arg(long)]
        binary: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    fn input(&self) -> &Path {
        match self {
            Commands::Png { input, .. }
            | Commands::Gif { input, .. }
            | Commands::Fmt { input, .. }
            | Commands::Pack { input, .. }
            | Commands::Unpack { input, .. }
            | Commands::Info { input, .. } => input,
        }
    }

    fn overrides(&self) -> CliOverrides {
        match self {
            Commands::Png { scale, .. } => CliOverrides { scale: *scale, ..Default::default() },
            Commands::Gif { scale, no_loop, .. } => CliOverrides {
                scale: *scale,
                repeat: no_loop.then_some(false),
                ..Default::default()
            },
            _ => CliOverrides::default(),
        }
    }
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let loaded = if cli.no_config {
        Ok(LopixConfig::default())
    } else {
        let path = find_config_from(discovery_start(cli.command.input()));
        load_config(path.as_deref())
    };

    let mut overrides = cli.command.overrides();
    overrides.log_level = cli.log_level;

    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            init_logging(cli.log_format, cli.log_level.unwrap_or_default());
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };
    merge_cli_overrides(&mut config, &overrides);
    init_logging(cli.log_format, config.logging.level);

    match cli.command {
        Commands::Png { input, output, binary, .. } => {
            render::run_png(&input, &output, binary, &config)
        }
        Commands::Gif { input, output, .. } => render::run_gif(&input, &output, &config),
        Commands::Fmt { input, animation, check, output } => {
            convert::run_fmt(&input, &output, animation, check)
        }
        Commands::Pack { input, output } => convert::run_pack(&input, &output),
        Commands::Unpack { input, output } => convert::run_unpack(&input, &output),
        Commands::Info { input, animation, binary, json } => {
            let kind = if animation {
                info::InputKind::Animation
            } else if binary {
                info::InputKind::Binary
            } else {
                info::InputKind::Frame
            };
            info::run_info(&input, kind, json)
        }
    }
}

fn is_std_stream(path: &Path) -> bool {
    path == Path::new("-")
}

/// Open an input path, with `-` meaning stdin.
pub(crate) fn open_input(path: &Path) -> io::Result<Box<dyn Read>> {
    if is_std_stream(path) {
        Ok(Box::new(io::stdin().lock()))
    } else {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }
}

/// Create an output path, with `-` meaning stdout.
pub(crate) fn create_output(path: &Path) -> Result<Box<dyn Write>, OutputError> {
    if is_std_stream(path) {
        Ok(Box::new(BufWriter::new(io::stdout().lock())))
    } else {
        Ok(Box::new(create_output_file(path)?))
    }
}

/// Open `path` or report it and return the invalid-input exit code.
pub(crate) fn open_input_or_exit(path: &Path) -> Result<Box<dyn Read>, ExitCode> {
    open_input(path).map_err(|e| {
        eprintln!("Error: Cannot read '{}': {}", path.display(), e);
        ExitCode::from(EXIT_INVALID_ARGS)
    })
}

/// Decode a text or binary frame from `path`.
pub(crate) fn load_frame(path: &Path, binary: bool) -> Result<Frame, ExitCode> {
    let source = open_input_or_exit(path)?;
    let decoded = if binary {
        binary::read_frame(source).map_err(|e| e.to_string())
    } else {
        Frame::parse(source).map_err(|e| e.to_string())
    };
    decoded.map_err(|e| {
        eprintln!("Error: {}: {}", path.display(), e);
        ExitCode::from(EXIT_ERROR)
    })
}

/// Decode a text animation from `path`.
pub(crate) fn load_animation(path: &Path) -> Result<Animation, ExitCode> {
    let source = open_input_or_exit(path)?;
    Animation::parse(source).map_err(|e| {
        eprintln!("Error: {}: {}", path.display(), e);
        ExitCode::from(EXIT_ERROR)
    })
}

/// Write a finished output via `emit`, reporting failures.
pub(crate) fn write_output<F>(path: &Path, emit: F) -> ExitCode
where
    F: FnOnce(&mut dyn Write) -> Result<(), OutputError>,
{
    let result = create_output(path).and_then(|mut writer| {
        emit(&mut *writer)?;
        writer.flush()?;
        Ok(())
    });
    match result {
        Ok(()) => {
            tracing::info!(output = %path.display(), "wrote output");
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: Failed to write '{}': {}", path.display(), e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_png_with_scale() {
        let cli = Cli::try_parse_from(["lopix", "png", "a.lopix", "a.png", "--scale", "4"]).unwrap();
        match cli.command {
            Commands::Png { scale, binary, .. } => {
                assert_eq!(scale, Some(4));
                assert!(!binary);
            }
            _ => panic!("expected png"),
        }
    }

    #[test]
    fn test_scale_out_of_range_rejected() {
        assert!(Cli::try_parse_from(["lopix", "png", "a", "b", "--scale", "0"]).is_err());
        assert!(Cli::try_parse_from(["lopix", "gif", "a", "b", "--scale", "257"]).is_err());
        assert!(Cli::try_parse_from(["lopix", "gif", "a", "b", "--scale", "256"]).is_ok());
    }

    #[test]
    fn test_info_flags_conflict() {
        assert!(Cli::try_parse_from(["lopix", "info", "a", "--animation", "--binary"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "lopix", "fmt", "a", "--log-format", "json", "--log-level", "debug", "--no-config",
        ])
        .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(cli.log_level, Some(LogLevel::Debug));
        assert!(cli.no_config);
    }

    #[test]
    fn test_overrides_from_gif() {
        let cli = Cli::try_parse_from(["lopix", "gif", "a", "b", "--no-loop"]).unwrap();
        let overrides = cli.command.overrides();
        assert_eq!(overrides.repeat, Some(false));
        assert_eq!(overrides.scale, None);

        let cli = Cli::try_parse_from(["lopix", "gif", "a", "b"]).unwrap();
        assert_eq!(cli.command.overrides().repeat, None);
    }

    #[test]
    fn test_fmt_output_defaults_to_stdout() {
        let cli = Cli::try_parse_from(["lopix", "fmt", "a"]).unwrap();
        match cli.command {
            Commands::Fmt { output, .. } => assert!(is_std_stream(&output)),
            _ => panic!("expected fmt"),
        }
    }
}
