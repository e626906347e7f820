//! Connection pool abstraction
//!
//! Tables never open connections themselves; they ask a [`ConnectionPool`]
//! for the handle registered under a datasource name.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use crate::Result;
use crate::error::ConnectionError;

/// Datasource settings, one entry of the `datasources` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasourceConfig {
    /// Connection URL, e.g. `mysql://user@host/wordpress`
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
}

impl DatasourceConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            driver: None,
        }
    }

    /// Driver name, taken from the URL scheme when not set explicitly
    pub fn driver(&self) -> &str {
        self.driver
            .as_deref()
            .or_else(|| self.url.split_once("://").map(|(scheme, _)| scheme))
            .unwrap_or("unknown")
    }
}

/// A registered connection
#[derive(Debug, PartialEq, Eq)]
pub struct Connection {
    name: String,
    config: DatasourceConfig,
}

impl Connection {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &DatasourceConfig {
        &self.config
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.config.driver())
    }
}

pub type ConnectionHandle = Arc<Connection>;

/// Source of connection handles
pub trait ConnectionPool: Send + Sync {
    /// Get the connection registered under `datasource`
    ///
    /// # Errors
    /// - `ConnectionError::MissingDatasource` if nothing is registered under that name
    fn get_connection(&self, datasource: &str) -> Result<ConnectionHandle>;
}

/// In-process connection registry
#[derive(Debug, Default)]
pub struct ConnectionManager {
    connections: RwLock<BTreeMap<String, ConnectionHandle>>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a manager from a `datasources` mapping (name → settings)
    pub fn from_config(datasources: &serde_json::Value) -> Result<Self> {
        let configs: BTreeMap<String, DatasourceConfig> =
            serde_json::from_value(datasources.clone())?;

        let manager = Self::new();
        for (name, config) in configs {
            manager.register(name, config)?;
        }
        Ok(manager)
    }

    /// Register (or replace) a datasource
    pub fn register(&self, name: impl Into<String>, config: DatasourceConfig) -> Result<()> {
        let name = name.into();
        if name.trim().is_empty() || config.url.trim().is_empty() {
            return Err(ConnectionError::InvalidDatasource {
                reason: "name and url must not be empty".to_string(),
                name,
            }
            .into());
        }

        let connection = Arc::new(Connection {
            name: name.clone(),
            config,
        });
        self.connections
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(name, connection);
        Ok(())
    }

    /// Registered datasource names, sorted
    pub fn names(&self) -> Vec<String> {
        self.connections
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .keys()
            .cloned()
            .collect()
    }
}

impl ConnectionPool for ConnectionManager {
    fn get_connection(&self, datasource: &str) -> Result<ConnectionHandle> {
        let connections = self
            .connections
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        connections.get(datasource).cloned().ok_or_else(|| {
            ConnectionError::MissingDatasource {
                name: datasource.to_string(),
                available: connections.keys().cloned().collect(),
            }
            .into()
        })
    }
}
