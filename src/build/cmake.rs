//! CMake driver for the upstream build.
//!
//! Consumes the resolver's toolchain configuration and runs the
//! configure/build/install steps. Any step failing aborts the whole
//! configuration; there is no partial-completion recovery.

use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::recipe::toolchain::ToolchainConfig;
use crate::util::fs::ensure_dir;
use crate::util::process::{find_cmake, ProcessBuilder};

/// CMake build driver.
pub struct CMakeBuilder<'a> {
    toolchain: &'a ToolchainConfig,
    cmake: PathBuf,
    source_dir: PathBuf,
    build_dir: PathBuf,
    install_dir: PathBuf,
    release: bool,
}

impl<'a> CMakeBuilder<'a> {
    /// Create a new CMake driver.
    pub fn new(
        toolchain: &'a ToolchainConfig,
        source_dir: PathBuf,
        build_dir: PathBuf,
        install_dir: PathBuf,
    ) -> Result<Self> {
        let Some(cmake) = find_cmake() else {
            bail!(
                "CMake not found\n\
                 \n\
                 CMake is required to build the upstream library.\n\
                 Install CMake and ensure it's in your PATH."
            );
        };

        Ok(CMakeBuilder {
            toolchain,
            cmake,
            source_dir,
            build_dir,
            install_dir,
            release: true,
        })
    }

    /// Select debug or release configuration.
    pub fn release(mut self, release: bool) -> Self {
        self.release = release;
        self
    }

    fn build_type(&self) -> &'static str {
        if self.release {
            "Release"
        } else {
            "Debug"
        }
    }

    /// Arguments for the configure step.
    fn configure_args(&self) -> Vec<String> {
        let mut args = vec![
            "-S".to_string(),
            self.source_dir.display().to_string(),
            "-B".to_string(),
            self.build_dir.display().to_string(),
            format!("-DCMAKE_BUILD_TYPE={}", self.build_type()),
            format!("-DCMAKE_INSTALL_PREFIX={}", self.install_dir.display()),
        ];
        args.extend(self.toolchain.cmake_args());
        args
    }

    /// Run CMake configuration.
    pub fn configure(&self) -> Result<()> {
        tracing::info!("configuring in {}", self.build_dir.display());
        ensure_dir(&self.build_dir)?;

        let output = ProcessBuilder::new(&self.cmake)
            .args(self.configure_args())
            .exec()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("CMake configuration failed:\n{}", stderr);
        }
        Ok(())
    }

    /// Run the build step.
    pub fn build(&self, jobs: Option<usize>) -> Result<()> {
        tracing::info!("building in {}", self.build_dir.display());

        let mut cmd = ProcessBuilder::new(&self.cmake)
            .arg("--build")
            .arg(&self.build_dir)
            .arg("--config")
            .arg(self.build_type());

        cmd = match jobs {
            Some(jobs) => cmd.arg("--parallel").arg(jobs.to_string()),
            None => cmd.arg("--parallel"),
        };

        let output = cmd.exec()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("build failed:\n{}", stderr);
        }
        Ok(())
    }

    /// Run the install step.
    pub fn install(&self) -> Result<()> {
        tracing::info!("installing to {}", self.install_dir.display());
        ensure_dir(&self.install_dir)?;

        let output = ProcessBuilder::new(&self.cmake)
            .arg("--install")
            .arg(&self.build_dir)
            .arg("--config")
            .arg(self.build_type())
            .exec()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("install failed:\n{}", stderr);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::BuildConfig;
    use crate::recipe::toolchain::toolchain_config;

    #[test]
    fn test_configure_args_include_toolchain() {
        let Some(cmake) = find_cmake() else {
            // No cmake on this machine; the arg construction is still
            // covered wherever cmake exists.
            return;
        };

        let config = BuildConfig::new("2.5.10.1".parse().unwrap());
        let tc = toolchain_config(&config);
        let builder = CMakeBuilder {
            toolchain: &tc,
            cmake,
            source_dir: PathBuf::from("/tmp/src"),
            build_dir: PathBuf::from("/tmp/build"),
            install_dir: PathBuf::from("/tmp/install"),
            release: true,
        };

        let args = builder.configure_args();
        assert!(args.contains(&"-DCMAKE_BUILD_TYPE=Release".to_string()));
        assert!(args.contains(&"-DCMAKE_INSTALL_PREFIX=/tmp/install".to_string()));
        assert!(args.contains(&"-DEMBEDPLUGINS=ON".to_string()));
        assert!(args.contains(&"-DCMAKE_DISABLE_FIND_PACKAGE_libjpeg-turbo=ON".to_string()));
    }
}
