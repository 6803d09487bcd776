//! Exported component graph.
//!
//! The package installs two libraries and exports them as separate
//! components: the utility library (platform/string/thread helpers) and
//! the main library, which layers the image I/O machinery on top of it.
//! The main component depends on the utility component, never the other
//! way around, so the graph is a two-node DAG.
//!
//! A `requires` entry is either another component of this package (by
//! component key) or an external package in `pkg::target` form
//! (`zlib::zlib`, `boost::thread`).

use serde::Serialize;

/// Component key of the utility library.
pub const UTIL: &str = "openimageio_util";

/// Component key of the main library.
pub const MAIN: &str = "openimageio_main";

/// An exported, named unit of built artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Component {
    /// Component key, unique within the graph.
    pub key: String,

    /// CMake target exposed to consumers.
    pub cmake_target: String,

    /// Libraries this component owns.
    pub libs: Vec<String>,

    /// Components and external packages this component re-exposes.
    pub requires: Vec<String>,

    /// Platform system libraries.
    pub system_libs: Vec<String>,

    /// Compile definitions attached for consumers.
    pub defines: Vec<String>,
}

impl Component {
    /// Create an empty component.
    pub fn new(key: impl Into<String>, cmake_target: impl Into<String>) -> Self {
        Component {
            key: key.into(),
            cmake_target: cmake_target.into(),
            libs: Vec::new(),
            requires: Vec::new(),
            system_libs: Vec::new(),
            defines: Vec::new(),
        }
    }

    /// Add an owned library.
    pub fn lib(mut self, name: impl Into<String>) -> Self {
        self.libs.push(name.into());
        self
    }

    /// Add a requirement. Adding the same entry twice is a no-op, so the
    /// requirement list stays duplicate-free by construction.
    pub fn require(&mut self, entry: impl Into<String>) {
        let entry = entry.into();
        if !self.requires.contains(&entry) {
            self.requires.push(entry);
        }
    }

    /// Add several requirements.
    pub fn require_all<I, S>(&mut self, entries: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for entry in entries {
            self.require(entry);
        }
    }

    /// Whether this component requires the given entry.
    pub fn requires_entry(&self, entry: &str) -> bool {
        self.requires.iter().any(|r| r == entry)
    }
}

/// The full set of exported components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentGraph {
    /// CMake file name consumers use in `find_package`.
    pub cmake_file_name: String,

    /// pkg-config name.
    pub pkg_config_name: String,

    /// Components in export order.
    pub components: Vec<Component>,
}

impl ComponentGraph {
    /// Look up a component by key.
    pub fn component(&self, key: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.key == key)
    }

    /// Check the DAG shape: every intra-package requirement must point at
    /// a component declared *earlier* in the export order. With the
    /// utility component first this rules out cycles and any utility
    /// dependency on the main component.
    pub fn is_acyclic(&self) -> bool {
        for (idx, component) in self.components.iter().enumerate() {
            for req in &component.requires {
                // External requirements carry a `::` separator
                if req.contains("::") {
                    continue;
                }
                let points_earlier = self.components[..idx].iter().any(|c| c.key == *req);
                if !points_earlier {
                    return false;
                }
            }
        }
        true
    }
}
