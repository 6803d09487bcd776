//! Post-install packaging.
//!
//! Purely mechanical cleanup of the install tree: license collection,
//! removal of metadata directories the consumer-facing component graph
//! replaces, and removal of MSVC runtime redistributables that the
//! upstream install step copies next to the tools on Windows.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::core::options::TargetOs;
use crate::util::fs::{ensure_dir, glob_files, remove_dir_all_if_exists, remove_files_matching};

/// Clean up an installed tree and collect license files.
pub fn package(source_dir: &Path, install_dir: &Path, os: TargetOs) -> Result<()> {
    let licenses_dir = install_dir.join("licenses");
    ensure_dir(&licenses_dir)?;
    for license in glob_files(source_dir, &["LICENSE*.md"])? {
        let name = license
            .file_name()
            .context("license path has no file name")?;
        fs::copy(&license, licenses_dir.join(name))
            .with_context(|| format!("failed to copy {}", license.display()))?;
    }

    remove_dir_all_if_exists(&install_dir.join("share"))?;

    if os == TargetOs::Windows {
        remove_files_matching(
            &install_dir.join("bin"),
            &["concrt*.dll", "msvcp*.dll", "vcruntime*.dll"],
        )?;
    }

    remove_dir_all_if_exists(&install_dir.join("lib").join("pkgconfig"))?;
    remove_dir_all_if_exists(&install_dir.join("lib").join("cmake"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fake_install_tree(root: &Path) {
        for dir in ["bin", "lib/pkgconfig", "lib/cmake/OpenImageIO", "share/doc", "include"] {
            fs::create_dir_all(root.join(dir)).unwrap();
        }
        fs::write(root.join("bin/oiiotool.exe"), "x").unwrap();
        fs::write(root.join("bin/vcruntime140.dll"), "x").unwrap();
        fs::write(root.join("bin/msvcp140.dll"), "x").unwrap();
        fs::write(root.join("lib/pkgconfig/OpenImageIO.pc"), "x").unwrap();
    }

    #[test]
    fn test_package_cleans_metadata_and_collects_licenses() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("src");
        let install = tmp.path().join("install");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("LICENSE.md"), "Apache-2.0").unwrap();
        fake_install_tree(&install);

        package(&source, &install, TargetOs::Linux).unwrap();

        assert!(install.join("licenses/LICENSE.md").is_file());
        assert!(!install.join("share").exists());
        assert!(!install.join("lib/pkgconfig").exists());
        assert!(!install.join("lib/cmake").exists());
        // Non-Windows target keeps the DLLs alone
        assert!(install.join("bin/vcruntime140.dll").exists());
    }

    #[test]
    fn test_windows_runtime_dlls_removed() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("src");
        let install = tmp.path().join("install");
        fs::create_dir_all(&source).unwrap();
        fake_install_tree(&install);

        package(&source, &install, TargetOs::Windows).unwrap();

        assert!(!install.join("bin/vcruntime140.dll").exists());
        assert!(!install.join("bin/msvcp140.dll").exists());
        assert!(install.join("bin/oiiotool.exe").exists());
    }
}
