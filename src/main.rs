//! Lopix - Command-line tool for converting 16-color pixel art

use std::process::ExitCode;

use lopix::cli;

fn main() -> ExitCode {
    cli::run()
}
