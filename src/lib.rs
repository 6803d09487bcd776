//! Slipway - a recipe-driven builder and packager for the OpenImageIO
//! native library.
//!
//! The core of this crate is the option-to-dependency resolver: a pure
//! function from a typed build configuration to a dependency manifest,
//! a CMake toolchain configuration, and an exported component graph.
//! Around it sit the packaging collaborators that fetch, patch, build,
//! install, and clean up the upstream sources.

pub mod build;
pub mod core;
pub mod recipe;
pub mod util;

pub use core::{
    component::{Component, ComponentGraph},
    options::{BuildConfig, BuildSettings, JpegBackend, Options, PeerOptions},
    requirement::Requirement,
    version::PackageVersion,
};

pub use recipe::{resolve, RecipeData, ResolvedManifest, ValidationError};
