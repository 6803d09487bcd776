//! Slipway CLI - build and package OpenImageIO from a typed option set

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("slipway=debug")
    } else {
        EnvFilter::new("slipway=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    let color = !cli.no_color;

    match cli.command {
        Commands::Resolve(args) => commands::resolve::execute(args, color),
        Commands::Components(args) => commands::components::execute(args, color),
        Commands::Build(args) => commands::build::execute(args, color),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
