//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Slipway - a recipe-driven builder and packager for OpenImageIO
#[derive(Parser)]
#[command(name = "slipway")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the dependency manifest for a configuration
    Resolve(ResolveArgs),

    /// Show the exported component graph
    Components(ComponentsArgs),

    /// Fetch, build, install and package the library
    Build(BuildArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Configuration selection shared by all commands.
#[derive(Args)]
pub struct ConfigArgs {
    /// Path to the configuration file
    #[arg(long, default_value = "slipway.toml")]
    pub config: PathBuf,

    /// Package version (overrides the config file)
    #[arg(long)]
    pub version: Option<String>,

    /// Enable an optional dependency toggle (repeatable)
    #[arg(long, value_name = "OPTION")]
    pub enable: Vec<String>,

    /// Disable an optional dependency toggle (repeatable)
    #[arg(long, value_name = "OPTION")]
    pub disable: Vec<String>,
}

#[derive(Args)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Emit the manifest as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ComponentsArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Emit the component graph as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Build in release mode
    #[arg(short, long)]
    pub release: bool,

    /// Number of parallel jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Working directory for sources, build tree and install tree
    #[arg(long, default_value = "slipway-build")]
    pub work_dir: PathBuf,

    /// Download cache directory (defaults to the user cache)
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Directory holding patch files
    #[arg(long, default_value = "patches")]
    pub patches_dir: PathBuf,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
