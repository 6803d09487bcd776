//! Option-to-dependency resolution.
//!
//! A single deterministic pass: validate the configuration, then derive
//! the requirement list, the toolchain configuration, and the component
//! graph. No I/O, no backtracking, no state carried between runs; the
//! same configuration always yields a structurally identical manifest.

use serde::Serialize;

use crate::core::component::{Component, ComponentGraph, MAIN, UTIL};
use crate::core::options::BuildConfig;
use crate::core::requirement::Requirement;
use crate::core::version::PackageVersion;
use crate::recipe::deps::{base_requirements, Slot, OPTIONAL_DEPS};
use crate::recipe::errors::ValidationError;
use crate::recipe::toolchain::{toolchain_config, ToolchainConfig};
use crate::recipe::validate::validate;

/// A fully resolved build manifest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedManifest {
    /// Package version the manifest was resolved for.
    pub version: PackageVersion,

    /// External requirements, mandatory first, then enabled optionals
    /// in table order.
    pub requirements: Vec<Requirement>,

    /// CMake toolchain configuration.
    pub toolchain: ToolchainConfig,

    /// Exported component graph.
    pub components: ComponentGraph,
}

impl ResolvedManifest {
    /// Look up a requirement by package name.
    pub fn requirement(&self, name: &str) -> Option<&Requirement> {
        self.requirements.iter().find(|r| r.name == name)
    }
}

/// Resolve a configuration into a manifest, or fail validation.
pub fn resolve(config: &BuildConfig) -> Result<ResolvedManifest, ValidationError> {
    validate(config)?;

    let mut requirements = base_requirements(&config.version, config.options.with_libjpeg);
    for dep in OPTIONAL_DEPS {
        if dep.is_enabled(&config.options) {
            requirements.push(dep.requirement());
        }
    }

    // A package appearing twice would mean the tables overlap; that is a
    // table bug, not a runtime condition.
    debug_assert!(
        {
            let mut names: Vec<&str> = requirements.iter().map(|r| r.name.as_str()).collect();
            names.sort_unstable();
            names.windows(2).all(|w| w[0] != w[1])
        },
        "duplicate package in resolved requirements"
    );

    Ok(ResolvedManifest {
        version: config.version,
        requirements,
        toolchain: toolchain_config(config),
        components: component_graph(config),
    })
}

/// Assemble the exported component graph for a configuration.
fn component_graph(config: &BuildConfig) -> ComponentGraph {
    let options = &config.options;
    let posix_libs = config.settings.os.links_posix_system_libs();

    let mut util = Component::new(UTIL, "OpenImageIO::OpenImageIO_Util").lib("OpenImageIO_Util");
    util.require_all([
        "boost::filesystem",
        "boost::thread",
        "boost::system",
        "boost::regex",
        "imath::imath",
        "openexr::openexr",
    ]);
    if posix_libs {
        util.system_libs
            .extend(["dl", "m", "pthread"].map(String::from));
    }

    let mut main = Component::new(MAIN, "OpenImageIO::OpenImageIO").lib("OpenImageIO");
    main.require(UTIL);
    main.require_all([
        "zlib::zlib",
        "boost::thread",
        "boost::system",
        "boost::container",
        "boost::regex",
        "libtiff::libtiff",
        "pugixml::pugixml",
        "tsl-robin-map::tsl-robin-map",
        "libsquish::libsquish",
        "fmt::fmt",
        "imath::imath",
        "openexr::openexr",
    ]);

    let jpeg = options.with_libjpeg.package();
    main.require(format!("{}::{}", jpeg, jpeg));

    for dep in OPTIONAL_DEPS {
        if !dep.is_enabled(options) {
            continue;
        }
        match dep.slot {
            Slot::Util => util.require(dep.requires_entry()),
            Slot::Main => main.require(dep.requires_entry()),
        }
    }

    if posix_libs {
        main.system_libs
            .extend(["dl", "m", "pthread"].map(String::from));
    }

    // Consumers of the static library need the export macro neutralized
    if !options.shared {
        main.defines.push("OIIO_STATIC_DEFINE".to_string());
    }

    ComponentGraph {
        cmake_file_name: "OpenImageIO".to_string(),
        pkg_config_name: "OpenImageIO".to_string(),
        components: vec![util, main],
    }
}
