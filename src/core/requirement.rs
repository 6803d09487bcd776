//! External dependency requirements.
//!
//! A `Requirement` is one entry in the resolved manifest: a package
//! identifier, a version constraint, and capability flags. Constraints
//! that are semver-shaped use `semver::VersionReq`; exact upstream pins
//! that are not (`libjpeg/9e`) are carried verbatim.

use std::fmt;

use semver::VersionReq;
use serde::{Serialize, Serializer};

/// Version constraint for a requirement.
#[derive(Debug, Clone, PartialEq)]
pub enum VersionSpec {
    /// Exact upstream pin, kept verbatim (`1.84.0`, `9e`).
    Pin(String),

    /// Semver range (`>=1.2.11, <2`).
    Range(VersionReq),
}

impl VersionSpec {
    /// Exact pin.
    pub fn pin(version: impl Into<String>) -> Self {
        VersionSpec::Pin(version.into())
    }

    /// Whether a concrete version satisfies this constraint.
    ///
    /// Pins compare textually; ranges go through semver matching.
    pub fn matches(&self, version: &str) -> bool {
        match self {
            VersionSpec::Pin(pin) => pin == version,
            VersionSpec::Range(req) => version
                .parse::<semver::Version>()
                .map(|v| req.matches(&v))
                .unwrap_or(false),
        }
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSpec::Pin(v) => write!(f, "{}", v),
            VersionSpec::Range(req) => write!(f, "{}", req),
        }
    }
}

impl Serialize for VersionSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A declared need for an external package.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Requirement {
    /// Package identifier.
    pub name: String,

    /// Version constraint.
    pub version: VersionSpec,

    /// Whether the package's headers are visible to transitive consumers.
    pub transitive_headers: bool,
}

impl Requirement {
    /// Create a requirement with an exact version pin.
    pub fn pinned(name: impl Into<String>, version: impl Into<String>) -> Self {
        Requirement {
            name: name.into(),
            version: VersionSpec::pin(version),
            transitive_headers: false,
        }
    }

    /// Create a requirement with a semver range.
    pub fn ranged(name: impl Into<String>, req: VersionReq) -> Self {
        Requirement {
            name: name.into(),
            version: VersionSpec::Range(req),
            transitive_headers: false,
        }
    }

    /// Mark the headers as transitively visible.
    pub fn transitive_headers(mut self) -> Self {
        self.transitive_headers = true;
        self
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}
