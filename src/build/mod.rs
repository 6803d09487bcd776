//! The build pipeline: fetch, patch, configure, build, install, package.
//!
//! Each step is a coarse-grained, complete-or-fail operation. A failure
//! anywhere marks the whole configuration as failed; nothing here
//! retries or falls back to a different configuration.

pub mod cmake;
pub mod fetch;
pub mod package;
pub mod patch;

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::core::options::BuildConfig;
use crate::recipe::data::RecipeData;
use crate::recipe::resolve::{resolve, ResolvedManifest};
use crate::util::fs::remove_dir_all_if_exists;

/// Options for a full pipeline run.
pub struct PipelineOptions {
    /// Working directory holding `src/`, `build/` and `install/`.
    pub work_dir: PathBuf,

    /// Download cache directory.
    pub cache_dir: PathBuf,

    /// Directory holding patch files declared in `recipe.toml`.
    pub patches_dir: PathBuf,

    /// Build in release mode.
    pub release: bool,

    /// Parallel build jobs; `None` lets CMake decide.
    pub jobs: Option<usize>,
}

/// Result of a completed pipeline run.
pub struct PipelineOutcome {
    /// The manifest the build was driven by.
    pub manifest: ResolvedManifest,

    /// Final install tree.
    pub install_dir: PathBuf,
}

/// Run the full pipeline for one configuration.
///
/// Validation happens first; an invalid configuration fails before any
/// network or build work starts.
pub fn run(config: &BuildConfig, opts: &PipelineOptions) -> Result<PipelineOutcome> {
    let manifest = resolve(config)?;
    tracing::info!(
        "resolved {} requirements for OpenImageIO {}",
        manifest.requirements.len(),
        manifest.version
    );

    let data = RecipeData::load()?;
    let entry = data.source(&config.version)?;

    let source_dir = opts.work_dir.join("src");
    let build_dir = opts.work_dir.join("build");
    let install_dir = opts.work_dir.join("install");

    // Start from a clean source tree so stale patches never stack
    remove_dir_all_if_exists(&source_dir)?;
    fetch::fetch_source(entry, &opts.cache_dir, &source_dir)
        .with_context(|| format!("failed to fetch sources for {}", config.version))?;

    patch::apply_patches(data.patches(&config.version), &opts.patches_dir, &source_dir)?;

    let builder = cmake::CMakeBuilder::new(
        &manifest.toolchain,
        source_dir.clone(),
        build_dir,
        install_dir.clone(),
    )?
    .release(opts.release);

    builder.configure()?;
    builder.build(opts.jobs)?;
    builder.install()?;

    package::package(&source_dir, &install_dir, config.settings.os)?;

    Ok(PipelineOutcome {
        manifest,
        install_dir,
    })
}
