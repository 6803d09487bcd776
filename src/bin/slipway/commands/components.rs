//! `slipway components` command

use anyhow::{bail, Context, Result};

use slipway::recipe::resolve;
use slipway::util::diagnostic;

use crate::cli::ComponentsArgs;
use crate::commands::load_config;

pub fn execute(args: ComponentsArgs, color: bool) -> Result<()> {
    let config = load_config(&args.config)?;

    let manifest = match resolve(&config) {
        Ok(manifest) => manifest,
        Err(e) => {
            diagnostic::emit(&e.to_diagnostic(), color);
            bail!("configuration is invalid");
        }
    };

    if args.json {
        let json = serde_json::to_string_pretty(&manifest.components)
            .context("failed to serialize component graph")?;
        println!("{}", json);
        return Ok(());
    }

    for component in &manifest.components.components {
        println!("{}", component.cmake_target);
        println!("  libs: {}", component.libs.join(", "));

        println!("  requires:");
        for entry in &component.requires {
            println!("    {}", entry);
        }

        if !component.system_libs.is_empty() {
            println!("  system libs: {}", component.system_libs.join(", "));
        }
        if !component.defines.is_empty() {
            println!("  defines: {}", component.defines.join(", "));
        }
        println!();
    }

    Ok(())
}
