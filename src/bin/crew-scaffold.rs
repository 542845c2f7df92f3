//! crew-scaffold command-line binary.
//!
//! # Environment Variables
//!
//! - `CREW_SCAFFOLD_CATALOG`: Path to a replacement tool catalog YAML
//! - `RUST_LOG`: Log filter (default: "warn", or "debug" with `-v`)

use std::process::ExitCode;

use clap::Parser;
use crew_scaffold::cli::{run, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let stdout = std::io::stdout();
    match run(cli, &mut stdout.lock()) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            log::error!("{:#}", err);
            eprintln!("error: {:#}", err);
            ExitCode::from(2)
        }
    }
}
