//! Build configuration: options, settings, and peer options.
//!
//! The option set is a statically-typed struct rather than a name/value
//! map: every toggle is a boolean field and the jpeg backend choice is a
//! closed enum, so an unknown option or an out-of-range enum value cannot
//! exist past deserialization. The whole configuration is fixed before
//! resolution starts and never mutated afterwards.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::version::PackageVersion;

/// Which jpeg implementation backs the JPEG plugin.
///
/// Exactly one of the two is always selected; there is no "neither".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JpegBackend {
    #[default]
    Libjpeg,
    LibjpegTurbo,
}

impl JpegBackend {
    /// The package this backend pulls in.
    pub fn package(self) -> &'static str {
        match self {
            JpegBackend::Libjpeg => "libjpeg",
            JpegBackend::LibjpegTurbo => "libjpeg-turbo",
        }
    }
}

impl fmt::Display for JpegBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.package())
    }
}

impl FromStr for JpegBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "libjpeg" => Ok(JpegBackend::Libjpeg),
            "libjpeg-turbo" => Ok(JpegBackend::LibjpegTurbo),
            other => Err(format!(
                "unknown jpeg backend `{}` (expected `libjpeg` or `libjpeg-turbo`)",
                other
            )),
        }
    }
}

/// Target operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetOs {
    Linux,
    FreeBsd,
    Macos,
    Windows,
}

impl TargetOs {
    /// Detect the host operating system.
    pub fn host() -> Self {
        if cfg!(target_os = "windows") {
            TargetOs::Windows
        } else if cfg!(target_os = "macos") {
            TargetOs::Macos
        } else if cfg!(target_os = "freebsd") {
            TargetOs::FreeBsd
        } else {
            TargetOs::Linux
        }
    }

    /// Whether the exported components link `dl`/`m`/`pthread` here.
    pub fn links_posix_system_libs(self) -> bool {
        matches!(self, TargetOs::Linux | TargetOs::FreeBsd)
    }
}

impl fmt::Display for TargetOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetOs::Linux => "linux",
            TargetOs::FreeBsd => "freebsd",
            TargetOs::Macos => "macos",
            TargetOs::Windows => "windows",
        };
        f.write_str(name)
    }
}

impl FromStr for TargetOs {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linux" => Ok(TargetOs::Linux),
            "freebsd" => Ok(TargetOs::FreeBsd),
            "macos" => Ok(TargetOs::Macos),
            "windows" => Ok(TargetOs::Windows),
            other => Err(format!("unknown target os `{}`", other)),
        }
    }
}

/// Compiler family for the target toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompilerFamily {
    Gcc,
    Clang,
    AppleClang,
    Msvc,
}

impl CompilerFamily {
    /// Detect a reasonable default for the host.
    pub fn host_default() -> Self {
        if cfg!(target_os = "windows") {
            CompilerFamily::Msvc
        } else if cfg!(target_os = "macos") {
            CompilerFamily::AppleClang
        } else {
            CompilerFamily::Gcc
        }
    }
}

impl FromStr for CompilerFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gcc" => Ok(CompilerFamily::Gcc),
            "clang" => Ok(CompilerFamily::Clang),
            "apple-clang" => Ok(CompilerFamily::AppleClang),
            "msvc" => Ok(CompilerFamily::Msvc),
            other => Err(format!("unknown compiler family `{}`", other)),
        }
    }
}

/// The recipe's option set.
///
/// Defaults mirror the upstream recipe: heavyweight dependencies
/// (opencv, tbb, dicom) and license-restricted ones (libraw) are off,
/// everything else is on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// Build a shared library instead of a static one.
    pub shared: bool,

    /// Build position-independent code.
    pub fpic: bool,

    /// Which jpeg implementation to use.
    pub with_libjpeg: JpegBackend,

    pub with_libpng: bool,
    pub with_freetype: bool,
    pub with_hdf5: bool,
    pub with_opencolorio: bool,
    pub with_opencv: bool,
    pub with_tbb: bool,
    pub with_dicom: bool,
    pub with_ffmpeg: bool,
    pub with_giflib: bool,
    pub with_libheif: bool,
    pub with_raw: bool,
    pub with_openjpeg: bool,
    pub with_openvdb: bool,
    pub with_ptex: bool,
    pub with_libwebp: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            shared: false,
            fpic: true,
            with_libjpeg: JpegBackend::Libjpeg,
            with_libpng: true,
            with_freetype: true,
            with_hdf5: true,
            with_opencolorio: true,
            with_opencv: false,
            with_tbb: false,
            // Heavy dependency, disabled by default
            with_dicom: false,
            with_ffmpeg: true,
            with_giflib: true,
            with_libheif: true,
            // libraw is CDDL-1.0 / LGPL-2.1, disabled by default
            with_raw: false,
            with_openjpeg: true,
            with_openvdb: true,
            with_ptex: true,
            with_libwebp: true,
        }
    }
}

/// Target settings that are not recipe options but still shape resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildSettings {
    /// Target operating system.
    pub os: TargetOs,

    /// Compiler family.
    pub compiler: CompilerFamily,

    /// Whether MSVC links the runtime statically (/MT).
    pub msvc_static_runtime: bool,

    /// C++ language standard level.
    pub cppstd: u32,
}

impl Default for BuildSettings {
    fn default() -> Self {
        BuildSettings {
            os: TargetOs::host(),
            compiler: CompilerFamily::host_default(),
            msvc_static_runtime: false,
            cppstd: 17,
        }
    }
}

/// Options of peer dependencies that validation consults.
///
/// `None` means the peer did not declare the option; validation then
/// falls back to the peer's documented default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PeerOptions {
    /// Whether libraw was built in its thread-safe variant.
    pub libraw_thread_safe: Option<bool>,

    /// Whether opencv embeds its own ffmpeg support.
    pub opencv_with_ffmpeg: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    version: Option<PackageVersion>,
    options: Options,
    settings: BuildSettings,
    peers: PeerOptions,
}

impl Default for ConfigFile {
    fn default() -> Self {
        ConfigFile {
            version: None,
            options: Options::default(),
            settings: BuildSettings::default(),
            peers: PeerOptions::default(),
        }
    }
}

/// Complete, immutable input to a resolution pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildConfig {
    /// Package version being built.
    pub version: PackageVersion,

    /// Recipe options.
    pub options: Options,

    /// Target settings.
    pub settings: BuildSettings,

    /// Peer dependency options.
    pub peers: PeerOptions,
}

impl BuildConfig {
    /// Default configuration for a given package version.
    pub fn new(version: PackageVersion) -> Self {
        BuildConfig {
            version,
            options: Options::default(),
            settings: BuildSettings::default(),
            peers: PeerOptions::default(),
        }
    }

    /// Load a configuration from a `slipway.toml` file.
    ///
    /// `version_override` (the CLI `--version` flag) wins over the
    /// `version` key in the file.
    pub fn load(path: &Path, version_override: Option<PackageVersion>) -> Result<Self> {
        let text = crate::util::fs::read_to_string(path)?;
        let file: ConfigFile = toml::from_str(&text)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;

        let version = version_override
            .or(file.version)
            .context("no package version: set `version` in slipway.toml or pass --version")?;

        Ok(BuildConfig {
            version,
            options: file.options,
            settings: file.settings,
            peers: file.peers,
        })
    }
}
