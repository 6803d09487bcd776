//! Embedded per-version recipe data.
//!
//! `recipe.toml` at the repository root maps each packageable version to
//! its source archive (URL + sha256) and an optional patch list. The
//! resolver never reads this; only the fetch/patch collaborators do.

use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::core::version::PackageVersion;

const RECIPE_DATA: &str = include_str!("../../recipe.toml");

/// Source archive for one version.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceEntry {
    /// Tarball URL.
    pub url: String,

    /// Expected sha256 of the tarball, lowercase hex.
    pub sha256: String,
}

/// One patch applied before configure.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatchEntry {
    /// Path relative to the `patches/` directory.
    pub file: String,

    #[serde(default)]
    pub description: Option<String>,
}

/// The full recipe data table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecipeData {
    sources: BTreeMap<String, SourceEntry>,

    #[serde(default)]
    patches: BTreeMap<String, Vec<PatchEntry>>,
}

impl RecipeData {
    /// Parse the embedded recipe data.
    pub fn load() -> Result<Self> {
        Self::parse(RECIPE_DATA).context("embedded recipe.toml is malformed")
    }

    fn parse(text: &str) -> Result<Self> {
        let data: RecipeData = toml::from_str(text)?;
        for (version, entry) in &data.sources {
            let digest = &entry.sha256;
            if digest.len() != 64 || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
                bail!("source {} has a malformed sha256 digest: `{}`", version, digest);
            }
        }
        Ok(data)
    }

    /// All packageable versions, ascending.
    pub fn versions(&self) -> Result<Vec<PackageVersion>> {
        let mut versions = Vec::with_capacity(self.sources.len());
        for key in self.sources.keys() {
            let version = key
                .parse()
                .with_context(|| format!("invalid version key `{}` in recipe.toml", key))?;
            versions.push(version);
        }
        versions.sort();
        Ok(versions)
    }

    /// The newest packageable version.
    pub fn latest(&self) -> Result<PackageVersion> {
        self.versions()?
            .into_iter()
            .next_back()
            .context("recipe.toml declares no sources")
    }

    /// Source archive for a version.
    pub fn source(&self, version: &PackageVersion) -> Result<&SourceEntry> {
        let key = version.to_string();
        self.sources.get(&key).with_context(|| {
            let known: Vec<&str> = self.sources.keys().map(String::as_str).collect();
            format!(
                "no source for version {} (known versions: {})",
                key,
                known.join(", ")
            )
        })
    }

    /// Patches for a version, possibly empty.
    pub fn patches(&self, version: &PackageVersion) -> &[PatchEntry] {
        self.patches
            .get(&version.to_string())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
