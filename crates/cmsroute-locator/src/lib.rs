//! cmsroute model locator
//!
//! This crate decides which concrete model implementation a site uses:
//! - `ModelRegistry`: startup-time registration table of implementations
//! - `ModelManifest`: the same table declared in configuration
//! - `AliasTable`: process-wide version-agnostic alias bindings
//! - `ModelLocator`: the resolution order itself

pub mod alias;
pub mod locator;
pub mod manifest;
pub mod registry;

pub use alias::{AliasKey, AliasTable};
pub use locator::ModelLocator;
pub use manifest::{ModelManifest, ModelSet, PluginModels};
pub use registry::{
    DEFAULT_CONNECTION, EntityClass, Implementation, ModelRegistry, ModelScope, TableClass,
};
