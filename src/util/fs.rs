//! Filesystem utilities.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::glob;

/// Remove a directory and all its contents, if it exists.
pub fn remove_dir_all_if_exists(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)
            .with_context(|| format!("failed to remove directory: {}", path.display()))?;
    }
    Ok(())
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("failed to read file: {}", path.display()))
}

/// Find files matching glob patterns relative to a base directory.
pub fn glob_files(base: &Path, patterns: &[&str]) -> Result<Vec<PathBuf>> {
    let mut results = Vec::new();

    for pattern in patterns {
        let full_pattern = base.join(pattern);
        let pattern_str = full_pattern.to_string_lossy();

        for entry in
            glob(&pattern_str).with_context(|| format!("invalid glob pattern: {}", pattern))?
        {
            match entry {
                Ok(path) => {
                    if path.is_file() {
                        results.push(path);
                    }
                }
                Err(e) => {
                    tracing::warn!("glob error: {}", e);
                }
            }
        }
    }

    results.sort();
    results.dedup();
    Ok(results)
}

/// Delete every file matching the patterns under a base directory.
pub fn remove_files_matching(base: &Path, patterns: &[&str]) -> Result<()> {
    for path in glob_files(base, patterns)? {
        fs::remove_file(&path)
            .with_context(|| format!("failed to remove file: {}", path.display()))?;
        tracing::debug!("removed {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_and_remove_dir() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("a/b/c");

        ensure_dir(&dir).unwrap();
        assert!(dir.is_dir());

        remove_dir_all_if_exists(&tmp.path().join("a")).unwrap();
        assert!(!dir.exists());

        // Removing a missing directory is a no-op
        remove_dir_all_if_exists(&tmp.path().join("a")).unwrap();
    }

    #[test]
    fn test_glob_files() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("LICENSE.md"), "x").unwrap();
        fs::write(tmp.path().join("LICENSE-THIRD-PARTY.md"), "x").unwrap();
        fs::write(tmp.path().join("README.md"), "x").unwrap();

        let found = glob_files(tmp.path(), &["LICENSE*.md"]).unwrap();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_remove_files_matching() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("msvcp140.dll"), "x").unwrap();
        fs::write(tmp.path().join("app.exe"), "x").unwrap();

        remove_files_matching(tmp.path(), &["msvcp*.dll"]).unwrap();
        assert!(!tmp.path().join("msvcp140.dll").exists());
        assert!(tmp.path().join("app.exe").exists());
    }
}
