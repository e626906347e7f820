//! Configuration source abstraction
//!
//! The `ConfigStore` trait is the process-wide key-value configuration the
//! site registry reads `{plugin}.defaultSite` and `{plugin}.siteList` from.
//! Keys are dotted paths into a JSON document.
//!
//! Implementations:
//! - `MemoryConfigStore`: in-process document (embedding, tests)
//! - `FileConfigStore` (`cmsroute-config-file`): YAML or TOML file on disk

use async_trait::async_trait;
use serde_json::Value;
use std::sync::RwLock;
use tracing::debug;

use crate::{Result, error::ConfigError};

/// Configuration store trait
///
/// # Example
/// ```no_run
/// # use cmsroute_core::config_store::{ConfigStore, MemoryConfigStore};
/// # async fn example() -> cmsroute_core::Result<()> {
/// let store = MemoryConfigStore::new(serde_json::json!({
///     "WordpressConnector": { "defaultSite": "MAIN" }
/// }));
/// let default = store.read("WordpressConnector.defaultSite").await?;
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Get the whole configuration document
    async fn get_config(&self) -> Result<Value>;

    /// Validate a configuration document before it is stored
    async fn validate_config(&self, config: &Value) -> Result<()> {
        validate_document(config)
    }

    /// Read one value by dotted key (`WordpressConnector.siteList`)
    ///
    /// Returns `None` when any segment of the path is missing.
    async fn read(&self, key: &str) -> Result<Option<Value>> {
        let config = self.get_config().await?;
        Ok(lookup(&config, key).cloned())
    }
}

/// Follow a dotted key through nested objects
pub fn lookup<'a>(config: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.')
        .filter(|segment| !segment.is_empty())
        .try_fold(config, |value, segment| value.as_object()?.get(segment))
}

/// Structural checks shared by every store
///
/// The document must be an object. Any top-level section carrying a
/// `siteList` must map symbols to objects whose known fields are strings,
/// and its `defaultSite` (if any) must be a string.
pub fn validate_document(config: &Value) -> Result<()> {
    let Some(sections) = config.as_object() else {
        return Err(source_error("Configuration must be an object"));
    };

    for (section_name, section) in sections {
        let Some(section) = section.as_object() else {
            continue;
        };

        if let Some(default_site) = section.get("defaultSite")
            && !default_site.is_string()
            && !default_site.is_null()
        {
            return Err(source_error(format!(
                "'{}.defaultSite' must be a string",
                section_name
            )));
        }

        let Some(site_list) = section.get("siteList") else {
            continue;
        };
        let Some(sites) = site_list.as_object() else {
            return Err(source_error(format!(
                "'{}.siteList' must be a mapping of site symbols",
                section_name
            )));
        };

        for (symbol, site) in sites {
            let Some(fields) = site.as_object() else {
                return Err(source_error(format!(
                    "'{}.siteList.{}' must be a mapping",
                    section_name, symbol
                )));
            };
            for field in ["datasource", "tablePrefix", "type", "localPath"] {
                if let Some(value) = fields.get(field)
                    && !value.is_string()
                    && !value.is_null()
                {
                    return Err(source_error(format!(
                        "'{}.siteList.{}.{}' must be a string",
                        section_name, symbol, field
                    )));
                }
            }
        }
    }

    debug!("Config validation passed");
    Ok(())
}

fn source_error(reason: impl Into<String>) -> crate::Error {
    ConfigError::Source(reason.into()).into()
}

/// In-memory configuration store
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    config: RwLock<Value>,
}

impl MemoryConfigStore {
    pub fn new(config: Value) -> Self {
        Self {
            config: RwLock::new(config),
        }
    }

    /// Write one value by dotted key, creating intermediate objects
    pub fn write(&self, key: &str, value: Value) {
        let mut config = self
            .config
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut current = &mut *config;
        for segment in key.split('.').filter(|segment| !segment.is_empty()) {
            if !current.is_object() {
                *current = Value::Object(Default::default());
            }
            let Value::Object(map) = current else {
                unreachable!("replaced with an object above");
            };
            current = map.entry(segment.to_string()).or_insert(Value::Null);
        }
        *current = value;
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn get_config(&self) -> Result<Value> {
        Ok(self
            .config
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone())
    }
}
