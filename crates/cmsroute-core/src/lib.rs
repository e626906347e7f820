//! cmsroute core types and traits
//!
//! This crate provides the building blocks shared by every cmsroute crate:
//! - Site identity and per-site configuration
//! - Model keys, kinds and resolution results
//! - Configuration store and connection pool abstractions
//! - Error types
//! - Name inflection used to derive entity names from table names

pub mod config_store;
pub mod connection;
pub mod error;
pub mod inflector;
pub mod model;
pub mod site_config;

pub use config_store::{ConfigStore, MemoryConfigStore};
pub use connection::{
    Connection, ConnectionHandle, ConnectionManager, ConnectionPool, DatasourceConfig,
};
pub use error::{
    ConfigError, ConnectionError, Error, InitializationError, ResolutionError, Result,
};
pub use model::{ModelKey, ModelKind, ModelOrigin, Namespace, ResolvedModel, SchemaVersion};
pub use site_config::{SiteConfig, SiteSymbol};
