//! File-based configuration store for cmsroute
//!
//! This crate implements the `ConfigStore` trait on top of a YAML or TOML
//! file. The site list, default site, datasources and model manifest all
//! live in that one document.
//!
//! # Example
//! ```no_run
//! # use cmsroute_config_file::FileConfigStore;
//! # use cmsroute_core::ConfigStore;
//! # async fn example() -> cmsroute_core::Result<()> {
//! let store = FileConfigStore::new("~/.cmsroute/config.yaml").await?;
//! let sites = store.read("WordpressConnector.siteList").await?;
//! # Ok(())
//! # }
//! ```

mod file_store;

pub use file_store::FileConfigStore;
