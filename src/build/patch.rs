//! Patch application.
//!
//! Patches declared in `recipe.toml` are applied to the extracted source
//! tree before configure, in declaration order. Application goes through
//! `git apply` when available and falls back to `patch -p1`.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::recipe::data::PatchEntry;
use crate::util::process::{find_executable, ProcessBuilder};

/// Apply all patches to a source tree.
pub fn apply_patches(patches: &[PatchEntry], patches_dir: &Path, source_dir: &Path) -> Result<()> {
    for patch in patches {
        let path = patches_dir.join(&patch.file);
        let data = fs::read(&path)
            .with_context(|| format!("failed to read patch: {}", path.display()))?;

        match &patch.description {
            Some(description) => tracing::info!("applying {}: {}", patch.file, description),
            None => tracing::info!("applying {}", patch.file),
        }

        apply_one(&data, source_dir)
            .with_context(|| format!("failed to apply patch: {}", patch.file))?;
    }
    Ok(())
}

fn apply_one(data: &[u8], source_dir: &Path) -> Result<()> {
    if find_executable("git").is_some() {
        ProcessBuilder::new("git")
            .args(["apply", "-p1", "--whitespace=nowarn"])
            .cwd(source_dir)
            .stdin(data)
            .exec_and_check()?;
        return Ok(());
    }

    if find_executable("patch").is_some() {
        ProcessBuilder::new("patch")
            .args(["-p1", "--silent"])
            .cwd(source_dir)
            .stdin(data)
            .exec_and_check()?;
        return Ok(());
    }

    bail!("neither `git` nor `patch` found; cannot apply patches");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_no_patches_is_a_noop() {
        let tmp = TempDir::new().unwrap();
        apply_patches(&[], tmp.path(), tmp.path()).unwrap();
    }

    #[test]
    fn test_missing_patch_file_reported() {
        let tmp = TempDir::new().unwrap();
        let patches = [PatchEntry {
            file: "0001-missing.patch".to_string(),
            description: None,
        }];

        let err = apply_patches(&patches, tmp.path(), tmp.path()).unwrap_err();
        assert!(err.to_string().contains("failed to read patch"));
    }
}
