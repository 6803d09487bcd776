//! The dependency tables.
//!
//! Mandatory requirements are a fixed baseline (with the fmt version
//! gated on the package version). Optional dependencies live in one
//! static table that carries everything the resolver needs per entry:
//! which option toggles it, the package pin, the CMake package name,
//! how its discovery directive is handled, and which component exposes
//! it. Adding an optional dependency is a single-table edit.

use semver::VersionReq;

use crate::core::options::{JpegBackend, Options};
use crate::core::requirement::{Requirement, VersionSpec};
use crate::core::version::PackageVersion;

/// How the build system discovers an optional dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discovery {
    /// Emit a `CMAKE_REQUIRE_FIND_PACKAGE_*` directive when enabled.
    NeedsDirective,

    /// Already required by an enabled transitive of the mandatory set; a
    /// redundant require directive would make CMake resolve the package
    /// twice. Only the disable directive is emitted when off.
    CoveredTransitively,
}

/// Which exported component re-exposes the dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Util,
    Main,
}

/// Version constraint as stored in the static tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepVersion {
    Pin(&'static str),
    Range(&'static str),
}

impl DepVersion {
    fn to_spec(self) -> VersionSpec {
        match self {
            DepVersion::Pin(v) => VersionSpec::pin(v),
            DepVersion::Range(r) => VersionSpec::Range(
                r.parse::<VersionReq>()
                    .expect("version range in the dependency table is valid semver"),
            ),
        }
    }
}

/// One optional dependency, toggled by a boolean option.
pub struct OptionalDep {
    /// Option name as it appears in `slipway.toml`.
    pub option: &'static str,

    /// Package identifier.
    pub package: &'static str,

    /// Version constraint.
    pub version: DepVersion,

    /// CMake package name used in find-package directives.
    pub cmake_name: &'static str,

    /// Discovery directive handling.
    pub discovery: Discovery,

    /// Component that re-exposes the requirement.
    pub slot: Slot,

    enabled: fn(&Options) -> bool,
    set: fn(&mut Options, bool),
}

impl OptionalDep {
    /// Whether this dependency is enabled in the given option set.
    pub fn is_enabled(&self, options: &Options) -> bool {
        (self.enabled)(options)
    }

    /// Flip the toggle controlling this dependency.
    pub fn set_enabled(&self, options: &mut Options, value: bool) {
        (self.set)(options, value)
    }

    /// The requirement this dependency contributes when enabled.
    pub fn requirement(&self) -> Requirement {
        Requirement {
            name: self.package.to_string(),
            version: self.version.to_spec(),
            transitive_headers: false,
        }
    }

    /// The `pkg::target` entry added to a component's requirement list.
    pub fn requires_entry(&self) -> String {
        format!("{}::{}", self.package, self.package)
    }
}

macro_rules! optional_dep {
    ($option:ident, $package:literal, $version:expr, $cmake:literal, $discovery:expr, $slot:expr) => {
        OptionalDep {
            option: stringify!($option),
            package: $package,
            version: $version,
            cmake_name: $cmake,
            discovery: $discovery,
            slot: $slot,
            enabled: |o| o.$option,
            set: |o, v| o.$option = v,
        }
    };
}

use DepVersion::{Pin, Range};
use Discovery::{CoveredTransitively, NeedsDirective};

/// All optional dependencies, in manifest order.
pub const OPTIONAL_DEPS: &[OptionalDep] = &[
    optional_dep!(with_libpng, "libpng", Range(">=1.6, <2"), "PNG", NeedsDirective, Slot::Main),
    optional_dep!(with_freetype, "freetype", Pin("2.13.2"), "Freetype", NeedsDirective, Slot::Main),
    optional_dep!(with_hdf5, "hdf5", Pin("1.14.3"), "HDF5", NeedsDirective, Slot::Main),
    optional_dep!(with_opencolorio, "opencolorio", Pin("2.3.1"), "OpenColorIO", NeedsDirective, Slot::Main),
    optional_dep!(with_opencv, "opencv", Pin("4.8.1"), "OpenCV", NeedsDirective, Slot::Main),
    optional_dep!(with_tbb, "onetbb", Pin("2021.10.0"), "TBB", NeedsDirective, Slot::Util),
    optional_dep!(with_dicom, "dcmtk", Pin("3.6.7"), "DCMTK", NeedsDirective, Slot::Main),
    optional_dep!(with_ffmpeg, "ffmpeg", Pin("6.1"), "FFmpeg", CoveredTransitively, Slot::Main),
    optional_dep!(with_giflib, "giflib", Pin("5.2.1"), "GIF", NeedsDirective, Slot::Main),
    optional_dep!(with_libheif, "libheif", Pin("1.16.2"), "Libheif", NeedsDirective, Slot::Main),
    optional_dep!(with_raw, "libraw", Pin("0.21.3"), "LibRaw", NeedsDirective, Slot::Main),
    optional_dep!(with_openjpeg, "openjpeg", Pin("2.5.2"), "OpenJPEG", CoveredTransitively, Slot::Main),
    optional_dep!(with_openvdb, "openvdb", Pin("11.0.0"), "OpenVDB", NeedsDirective, Slot::Main),
    optional_dep!(with_ptex, "ptex", Pin("2.4.2"), "Ptex", NeedsDirective, Slot::Main),
    optional_dep!(with_libwebp, "libwebp", Pin("1.3.2"), "WebP", CoveredTransitively, Slot::Main),
];

/// Look up an optional dependency by its option name.
pub fn find_option(name: &str) -> Option<&'static OptionalDep> {
    OPTIONAL_DEPS.iter().find(|d| d.option == name)
}

/// Package version at which the fmt requirement moves to the newer pin.
pub const FMT_GATE: PackageVersion = PackageVersion::new(2, 4, 17, 0);

/// The always-required baseline, in manifest order. The jpeg backend
/// slot sits between openexr and pugixml, as upstream declares it.
pub fn base_requirements(version: &PackageVersion, backend: JpegBackend) -> Vec<Requirement> {
    let fmt_version = if *version >= FMT_GATE { "10.2.1" } else { "9.1.0" };

    vec![
        Requirement::ranged(
            "zlib",
            ">=1.2.11, <2"
                .parse()
                .expect("zlib version range is valid semver"),
        ),
        Requirement::pinned("boost", "1.84.0"),
        Requirement::pinned("libtiff", "4.6.0"),
        Requirement::pinned("imath", "3.1.9").transitive_headers(),
        Requirement::pinned("openexr", "3.2.3"),
        jpeg_requirement(backend),
        Requirement::pinned("pugixml", "1.14"),
        Requirement::pinned("libsquish", "1.15"),
        Requirement::pinned("tsl-robin-map", "1.2.1"),
        Requirement::pinned("fmt", fmt_version).transitive_headers(),
    ]
}

/// The requirement contributed by the selected jpeg backend.
pub fn jpeg_requirement(backend: JpegBackend) -> Requirement {
    match backend {
        JpegBackend::Libjpeg => Requirement::pinned("libjpeg", "9e"),
        JpegBackend::LibjpegTurbo => Requirement::pinned("libjpeg-turbo", "3.0.2"),
    }
}
