//! Command implementations.

pub mod build;
pub mod completions;
pub mod components;
pub mod resolve;

use anyhow::{bail, Context, Result};

use slipway::core::options::BuildConfig;
use slipway::core::version::PackageVersion;
use slipway::recipe::deps::{find_option, OPTIONAL_DEPS};
use slipway::recipe::RecipeData;

use crate::cli::ConfigArgs;

/// Build the configuration from the config file and CLI overrides.
///
/// Without a config file the newest packageable version is used; CLI
/// `--version`, `--enable` and `--disable` always win.
pub fn load_config(args: &ConfigArgs) -> Result<BuildConfig> {
    let version_override = args
        .version
        .as_deref()
        .map(|v| v.parse::<PackageVersion>())
        .transpose()
        .map_err(|e| anyhow::anyhow!("invalid --version: {}", e))?;

    let mut config = if args.config.exists() {
        BuildConfig::load(&args.config, version_override)?
    } else {
        let version = match version_override {
            Some(v) => v,
            None => RecipeData::load()?
                .latest()
                .context("no config file and no --version given")?,
        };
        BuildConfig::new(version)
    };

    for option in &args.enable {
        set_toggle(&mut config, option, true)?;
    }
    for option in &args.disable {
        set_toggle(&mut config, option, false)?;
    }

    Ok(config)
}

fn set_toggle(config: &mut BuildConfig, option: &str, value: bool) -> Result<()> {
    match find_option(option) {
        Some(dep) => {
            dep.set_enabled(&mut config.options, value);
            Ok(())
        }
        None => {
            let known: Vec<&str> = OPTIONAL_DEPS.iter().map(|d| d.option).collect();
            bail!(
                "unknown option `{}` (known options: {})",
                option,
                known.join(", ")
            )
        }
    }
}
