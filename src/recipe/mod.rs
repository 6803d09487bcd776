//! The recipe: dependency tables, validation, toolchain derivation,
//! and the resolver tying them together.

pub mod data;
pub mod deps;
pub mod errors;
pub mod resolve;
pub mod toolchain;
pub mod validate;

pub use data::RecipeData;
pub use errors::ValidationError;
pub use resolve::{resolve, ResolvedManifest};
pub use toolchain::ToolchainConfig;
