//! kegdex CLI Binary
//!
//! Command-line interface for indexing and managing a keg corpus.

use clap::Parser;
use kegdex::config::ConfigLoader;
use kegdex::logging::init_logging;
use kegdex::tooling::cli::{Cli, CliContext};
use std::process;

fn main() {
    let cli = Cli::parse();

    let config = match ConfigLoader::load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = init_logging(Some(&cli.logging_config(&config.logging))) {
        eprintln!("Error initializing logging: {}", e);
        process::exit(1);
    }

    let context = match CliContext::from_config(cli.corpus.clone(), config) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error opening corpus: {}", e);
            process::exit(1);
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
