//! `slipway build` command

use std::path::PathBuf;

use anyhow::{bail, Result};

use slipway::build::{run, PipelineOptions};
use slipway::recipe::resolve;
use slipway::util::diagnostic;

use crate::cli::BuildArgs;
use crate::commands::load_config;

pub fn execute(args: BuildArgs, color: bool) -> Result<()> {
    let config = load_config(&args.config)?;

    // Surface validation failures before any fetch or build work
    if let Err(e) = resolve(&config) {
        diagnostic::emit(&e.to_diagnostic(), color);
        bail!("configuration is invalid");
    }

    let cache_dir = match args.cache_dir {
        Some(dir) => dir,
        None => default_cache_dir(),
    };

    let opts = PipelineOptions {
        work_dir: args.work_dir,
        cache_dir,
        patches_dir: args.patches_dir,
        release: args.release,
        jobs: args.jobs,
    };

    let outcome = run(&config, &opts)?;

    eprintln!(
        "    Finished OpenImageIO {} -> {}",
        outcome.manifest.version,
        outcome.install_dir.display()
    );

    Ok(())
}

fn default_cache_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "slipway")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".slipway-cache"))
}
