//! Four-component package versions.
//!
//! OpenImageIO releases use up to four numeric components (`2.5.10.1`),
//! which semver cannot represent. `PackageVersion` parses one to four
//! dot-separated components and compares them padded with zeros, so
//! `2.4` and `2.4.0.0` are equal. Dependency *constraints* still use
//! `semver::VersionReq` where the upstream constraint is semver-shaped.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error parsing a package version string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VersionParseError {
    #[error("empty version string")]
    Empty,

    #[error("version `{0}` has more than four components")]
    TooManyComponents(String),

    #[error("invalid version component `{component}` in `{version}`")]
    InvalidComponent { version: String, component: String },
}

/// A package version with one to four numeric components.
#[derive(Debug, Clone, Copy)]
pub struct PackageVersion {
    parts: [u32; 4],
    /// Number of components the original string carried, kept for display.
    ncomp: u8,
}

impl PackageVersion {
    /// Create a four-component version.
    pub const fn new(major: u32, minor: u32, patch: u32, tweak: u32) -> Self {
        PackageVersion {
            parts: [major, minor, patch, tweak],
            ncomp: 4,
        }
    }

    /// The components, zero-padded to four.
    pub fn parts(&self) -> [u32; 4] {
        self.parts
    }
}

impl FromStr for PackageVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(VersionParseError::Empty);
        }

        let components: Vec<&str> = s.split('.').collect();
        if components.len() > 4 {
            return Err(VersionParseError::TooManyComponents(s.to_string()));
        }

        let mut parts = [0u32; 4];
        for (i, component) in components.iter().enumerate() {
            parts[i] = component
                .parse()
                .map_err(|_| VersionParseError::InvalidComponent {
                    version: s.to_string(),
                    component: component.to_string(),
                })?;
        }

        Ok(PackageVersion {
            parts,
            ncomp: components.len() as u8,
        })
    }
}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = &self.parts[..self.ncomp as usize];
        let text: Vec<String> = shown.iter().map(|p| p.to_string()).collect();
        write!(f, "{}", text.join("."))
    }
}

impl PartialEq for PackageVersion {
    fn eq(&self, other: &Self) -> bool {
        self.parts == other.parts
    }
}

impl Eq for PackageVersion {}

impl PartialOrd for PackageVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PackageVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.parts.cmp(&other.parts)
    }
}

impl Serialize for PackageVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PackageVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
