//! `slipway resolve` command

use anyhow::{bail, Context, Result};

use slipway::recipe::resolve;
use slipway::recipe::toolchain::FindDirective;
use slipway::util::diagnostic;

use crate::cli::ResolveArgs;
use crate::commands::load_config;

pub fn execute(args: ResolveArgs, color: bool) -> Result<()> {
    let config = load_config(&args.config)?;

    let manifest = match resolve(&config) {
        Ok(manifest) => manifest,
        Err(e) => {
            diagnostic::emit(&e.to_diagnostic(), color);
            bail!("configuration is invalid");
        }
    };

    if args.json {
        let json = serde_json::to_string_pretty(&manifest)
            .context("failed to serialize manifest")?;
        println!("{}", json);
        return Ok(());
    }

    println!("OpenImageIO {}", manifest.version);
    println!();
    println!("requirements:");
    for req in &manifest.requirements {
        if req.transitive_headers {
            println!("  {}  (transitive headers)", req);
        } else {
            println!("  {}", req);
        }
    }

    println!();
    println!("find-package directives:");
    for (package, directive) in &manifest.toolchain.find_package {
        let verb = match directive {
            FindDirective::Require => "require",
            FindDirective::Disable => "disable",
        };
        println!("  {} {}", verb, package);
    }

    println!();
    println!("components:");
    for component in &manifest.components.components {
        println!(
            "  {}  ({} requirements)",
            component.cmake_target,
            component.requires.len()
        );
    }

    Ok(())
}
