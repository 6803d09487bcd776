//! CMake toolchain configuration.
//!
//! The resolver's view of the build system: plain variables, cache
//! variables, find-package directives, and per-dependency name-mapping
//! properties. Everything here is derived from the option set; nothing
//! touches the filesystem.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::core::options::{BuildConfig, JpegBackend};
use crate::recipe::deps::{Discovery, OPTIONAL_DEPS};

/// A CMake variable value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum VarValue {
    Bool(bool),
    Str(String),
}

impl From<bool> for VarValue {
    fn from(v: bool) -> Self {
        VarValue::Bool(v)
    }
}

impl From<&str> for VarValue {
    fn from(v: &str) -> Self {
        VarValue::Str(v.to_string())
    }
}

impl fmt::Display for VarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarValue::Bool(true) => f.write_str("ON"),
            VarValue::Bool(false) => f.write_str("OFF"),
            VarValue::Str(s) => f.write_str(s),
        }
    }
}

/// A find-package directive for one CMake package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FindDirective {
    /// Discovery must succeed (`CMAKE_REQUIRE_FIND_PACKAGE_*`).
    Require,

    /// Discovery is suppressed (`CMAKE_DISABLE_FIND_PACKAGE_*`).
    Disable,
}

/// Name-mapping overrides for one dependency's generated package files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepProperty {
    /// Package the overrides apply to.
    pub package: &'static str,

    /// Alternate find-module file name (`ffmpeg` -> `FFmpeg`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmake_file_name: Option<&'static str>,

    /// Alternate imported target name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmake_target_name: Option<&'static str>,

    /// Extra aliases for the imported target.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cmake_target_aliases: Vec<&'static str>,

    /// Extra variable-name prefixes the package files also populate.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub additional_variable_prefixes: Vec<&'static str>,
}

impl DepProperty {
    fn new(package: &'static str) -> Self {
        DepProperty {
            package,
            cmake_file_name: None,
            cmake_target_name: None,
            cmake_target_aliases: Vec::new(),
            additional_variable_prefixes: Vec::new(),
        }
    }

    fn file_name(mut self, name: &'static str) -> Self {
        self.cmake_file_name = Some(name);
        self
    }

    fn target_name(mut self, name: &'static str) -> Self {
        self.cmake_target_name = Some(name);
        self
    }

    fn target_alias(mut self, alias: &'static str) -> Self {
        self.cmake_target_aliases.push(alias);
        self
    }

    fn variable_prefix(mut self, prefix: &'static str) -> Self {
        self.additional_variable_prefixes.push(prefix);
        self
    }
}

/// Complete toolchain configuration handed to the CMake driver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ToolchainConfig {
    /// Plain variables.
    pub variables: BTreeMap<String, VarValue>,

    /// Cache variables.
    pub cache_variables: BTreeMap<String, VarValue>,

    /// Find-package directives keyed by CMake package name.
    pub find_package: BTreeMap<String, FindDirective>,

    /// Per-dependency name-mapping properties.
    pub dep_properties: Vec<DepProperty>,
}

impl ToolchainConfig {
    fn set(&mut self, name: &str, value: impl Into<VarValue>) {
        self.variables.insert(name.to_string(), value.into());
    }

    fn set_cache(&mut self, name: &str, value: impl Into<VarValue>) {
        self.cache_variables.insert(name.to_string(), value.into());
    }

    fn require(&mut self, package: &str) {
        self.find_package
            .insert(package.to_string(), FindDirective::Require);
    }

    fn disable(&mut self, package: &str) {
        self.find_package
            .insert(package.to_string(), FindDirective::Disable);
    }

    /// The directive recorded for a CMake package, if any.
    pub fn directive(&self, package: &str) -> Option<FindDirective> {
        self.find_package.get(package).copied()
    }

    /// Render as `-D` command-line arguments, deterministically ordered.
    pub fn cmake_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        for (name, value) in &self.variables {
            args.push(format!("-D{}={}", name, value));
        }
        for (name, value) in &self.cache_variables {
            args.push(format!("-D{}={}", name, value));
        }
        for (package, directive) in &self.find_package {
            let arg = match directive {
                FindDirective::Require => {
                    format!("-DCMAKE_REQUIRE_FIND_PACKAGE_{}=ON", package)
                }
                FindDirective::Disable => {
                    format!("-DCMAKE_DISABLE_FIND_PACKAGE_{}=ON", package)
                }
            };
            args.push(arg);
        }

        args
    }
}

/// Derive the toolchain configuration from a build configuration.
pub fn toolchain_config(config: &BuildConfig) -> ToolchainConfig {
    let mut tc = ToolchainConfig::default();

    // Needed for 2.3.x.x+ versions
    tc.set("CMAKE_DEBUG_POSTFIX", "");
    tc.set("OIIO_BUILD_TOOLS", true);
    tc.set("OIIO_BUILD_TESTS", false);
    tc.set("BUILD_DOCS", false);
    tc.set("INSTALL_DOCS", false);
    tc.set("INSTALL_FONTS", false);
    tc.set("INSTALL_CMAKE_HELPER", false);
    tc.set("EMBEDPLUGINS", true);
    tc.set("USE_PYTHON", false);
    tc.set("USE_EXTERNAL_PUGIXML", true);
    tc.set("BUILD_MISSING_FMT", false);
    tc.set("BUILD_TESTING", false);
    tc.set("USE_R3DSDK", false);
    tc.set("USE_NUKE", false);
    tc.set("USE_OPENGL", false);
    tc.set("USE_QT", false);
    tc.set("INTERNALIZE_FMT", false);
    tc.set("BUILD_SHARED_LIBS", config.options.shared);
    tc.set("CMAKE_POSITION_INDEPENDENT_CODE", config.options.fpic);

    tc.set_cache("ROBINMAP_FOUND", true);
    tc.set_cache("LIBRAW_FOUND", config.options.with_raw);

    // fmt is mandatory but the upstream build would vendor its own copy
    // if discovery were allowed to fail silently.
    tc.require("fmt");

    for dep in OPTIONAL_DEPS {
        if dep.is_enabled(&config.options) {
            // Transitively covered packages are already discovered through
            // a sibling; a second require directive would double-resolve.
            if dep.discovery == Discovery::NeedsDirective {
                tc.require(dep.cmake_name);
            }
        } else {
            tc.disable(dep.cmake_name);
        }
    }

    match config.options.with_libjpeg {
        JpegBackend::Libjpeg => tc.disable("libjpeg-turbo"),
        JpegBackend::LibjpegTurbo => tc.require("libjpeg-turbo"),
    }

    tc.dep_properties = dep_properties(config.options.with_libjpeg);

    tc
}

/// The fixed name-mapping property list.
fn dep_properties(backend: JpegBackend) -> Vec<DepProperty> {
    let mut props = vec![
        DepProperty::new("ffmpeg")
            .file_name("FFmpeg")
            .variable_prefix("FFMPEG"),
        DepProperty::new("libheif")
            .file_name("Libheif")
            .variable_prefix("LIBHEIF"),
        DepProperty::new("libraw")
            .file_name("LibRaw")
            .variable_prefix("LibRaw_r"),
        // Global target so the consumer sees one DCMTK
        DepProperty::new("dcmtk").target_name("DCMTK::DCMTK"),
        DepProperty::new("ptex").file_name("Ptex"),
        DepProperty::new("tsl-robin-map")
            .file_name("Robinmap")
            .variable_prefix("ROBINMAP"),
        DepProperty::new("fmt")
            .target_name("fmt::fmt-header-only")
            .variable_prefix("FMT"),
        DepProperty::new("openvdb").variable_prefix("OPENVDB"),
    ];

    if backend == JpegBackend::LibjpegTurbo {
        props.push(DepProperty::new("libjpeg-turbo").target_alias("JPEG::JPEG"));
    }

    props
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::BuildConfig;
    use crate::recipe::deps::find_option;

    fn config() -> BuildConfig {
        BuildConfig::new("2.5.10.1".parse().unwrap())
    }

    #[test]
    fn test_enabled_dep_gets_require_directive() {
        let tc = toolchain_config(&config());
        // libpng is on by default and needs its own directive
        assert_eq!(tc.directive("PNG"), Some(FindDirective::Require));
    }

    #[test]
    fn test_disabled_dep_gets_disable_directive() {
        let tc = toolchain_config(&config());
        // opencv is off by default
        assert_eq!(tc.directive("OpenCV"), Some(FindDirective::Disable));
        assert_eq!(tc.directive("LibRaw"), Some(FindDirective::Disable));
    }

    #[test]
    fn test_transitively_covered_deps_skip_require() {
        // ffmpeg, openjpeg and libwebp are enabled by default but
        // discovered through siblings: no require directive.
        let tc = toolchain_config(&config());
        assert_eq!(tc.directive("FFmpeg"), None);
        assert_eq!(tc.directive("OpenJPEG"), None);
        assert_eq!(tc.directive("WebP"), None);

        // Disabled they still get the disable directive
        let mut cfg = config();
        for option in ["with_ffmpeg", "with_openjpeg", "with_libwebp"] {
            find_option(option)
                .unwrap()
                .set_enabled(&mut cfg.options, false);
        }
        let tc = toolchain_config(&cfg);
        assert_eq!(tc.directive("FFmpeg"), Some(FindDirective::Disable));
        assert_eq!(tc.directive("OpenJPEG"), Some(FindDirective::Disable));
        assert_eq!(tc.directive("WebP"), Some(FindDirective::Disable));
    }

    #[test]
    fn test_jpeg_backend_directive_pair() {
        let tc = toolchain_config(&config());
        assert_eq!(tc.directive("libjpeg-turbo"), Some(FindDirective::Disable));

        let mut cfg = config();
        cfg.options.with_libjpeg = JpegBackend::LibjpegTurbo;
        let tc = toolchain_config(&cfg);
        assert_eq!(tc.directive("libjpeg-turbo"), Some(FindDirective::Require));
        // The alias only appears when turbo is selected
        assert!(tc
            .dep_properties
            .iter()
            .any(|p| p.package == "libjpeg-turbo"
                && p.cmake_target_aliases.contains(&"JPEG::JPEG")));
    }

    #[test]
    fn test_libraw_found_mirrors_option() {
        let tc = toolchain_config(&config());
        assert_eq!(
            tc.cache_variables.get("LIBRAW_FOUND"),
            Some(&VarValue::Bool(false))
        );

        let mut cfg = config();
        cfg.options.with_raw = true;
        cfg.peers.libraw_thread_safe = Some(true);
        let tc = toolchain_config(&cfg);
        assert_eq!(
            tc.cache_variables.get("LIBRAW_FOUND"),
            Some(&VarValue::Bool(true))
        );
    }

    #[test]
    fn test_cmake_args_rendering() {
        let tc = toolchain_config(&config());
        let args = tc.cmake_args();

        assert!(args.contains(&"-DOIIO_BUILD_TOOLS=ON".to_string()));
        assert!(args.contains(&"-DBUILD_DOCS=OFF".to_string()));
        assert!(args.contains(&"-DCMAKE_DEBUG_POSTFIX=".to_string()));
        assert!(args.contains(&"-DCMAKE_REQUIRE_FIND_PACKAGE_fmt=ON".to_string()));
        assert!(args.contains(&"-DCMAKE_DISABLE_FIND_PACKAGE_OpenCV=ON".to_string()));
    }
}
