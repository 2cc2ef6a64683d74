// this_file: crates/glyphsdf-cli/src/main.rs

//! glyphsdf CLI: distance fields for glyphs and icons from the command line

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match cli.command {
        Commands::Font(args) => commands::render::run_font(&args),
        Commands::Svg(args) => commands::render::run_svg(&args),
        Commands::Batch(args) => commands::batch::run(&args),
        Commands::Info(args) => commands::info::run(&args),
    }
}

/// Initialize logging based on verbosity flag
fn init_logger(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}
