//! Core data structures for Slipway.
//!
//! This module contains the foundational types the recipe operates on:
//! - The typed build configuration (options, settings, peer options)
//! - Four-component package versions
//! - Dependency requirements
//! - The exported component graph

pub mod component;
pub mod options;
pub mod requirement;
pub mod version;

pub use component::{Component, ComponentGraph};
pub use options::{BuildConfig, BuildSettings, JpegBackend, Options, PeerOptions};
pub use requirement::{Requirement, VersionSpec};
pub use version::PackageVersion;
