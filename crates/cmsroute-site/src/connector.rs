//! A CMS connector plugin: the shared collaborators its sites are opened with

use cmsroute_core::{ConfigStore, ConnectionManager, ConnectionPool, Result, config_store::lookup};
use cmsroute_locator::{AliasTable, ModelLocator, ModelManifest, ModelRegistry};
use std::sync::Arc;
use tracing::info;

use crate::site::Site;
use crate::sites::SiteRegistry;
use crate::table_locator::TableLocator;

/// Configuration section holding the model manifest
pub const MODELS_SECTION: &str = "models";

/// Configuration section holding datasources
pub const DATASOURCES_SECTION: &str = "datasources";

pub struct Connector {
    plugin: String,
    path: String,
    sites: SiteRegistry,
    models: ModelLocator,
    tables: Arc<TableLocator>,
}

impl Connector {
    pub fn new(
        plugin: impl Into<String>,
        store: Arc<dyn ConfigStore>,
        registry: Arc<ModelRegistry>,
        connections: Arc<dyn ConnectionPool>,
    ) -> Self {
        let plugin = plugin.into();
        Self {
            path: format!("plugins/{}/", plugin),
            sites: SiteRegistry::new(plugin.clone(), store),
            models: ModelLocator::new(plugin.clone(), registry.clone()),
            tables: Arc::new(TableLocator::new(registry, connections)),
            plugin,
        }
    }

    /// Build a connector whose models and datasources come from the store
    ///
    /// Reads the `models` manifest and the `datasources` section; both are
    /// optional.
    pub async fn from_store(plugin: impl Into<String>, store: Arc<dyn ConfigStore>) -> Result<Self> {
        let config = store.get_config().await?;

        let manifest = match lookup(&config, MODELS_SECTION) {
            Some(models) => ModelManifest::from_value(models)?,
            None => ModelManifest::default(),
        };
        let connections = match lookup(&config, DATASOURCES_SECTION) {
            Some(datasources) => ConnectionManager::from_config(datasources)?,
            None => ConnectionManager::new(),
        };

        let connector = Self::new(
            plugin,
            store,
            Arc::new(manifest.to_registry()),
            Arc::new(connections),
        );
        info!(
            plugin = %connector.plugin,
            models = manifest.len(),
            "Loaded connector from configuration"
        );
        Ok(connector)
    }

    /// Use a private alias table instead of the process-wide one
    pub fn with_alias_table(mut self, aliases: Arc<AliasTable>) -> Self {
        self.models = self.models.with_alias_table(aliases);
        self
    }

    /// Plugin directory reported in resolution errors
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn plugin(&self) -> &str {
        &self.plugin
    }

    pub fn sites(&self) -> &SiteRegistry {
        &self.sites
    }

    pub fn models(&self) -> &ModelLocator {
        &self.models
    }

    pub fn tables(&self) -> &Arc<TableLocator> {
        &self.tables
    }

    /// Open the site `symbol`, or the default site
    pub async fn site(&self, symbol: Option<&str>) -> Result<Arc<Site>> {
        let config = self.sites.resolve_site(symbol).await?;
        Ok(Site::open(
            config,
            self.path.clone(),
            self.models.clone(),
            self.tables.clone(),
        ))
    }
}

impl std::fmt::Debug for Connector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connector")
            .field("plugin", &self.plugin)
            .field("path", &self.path)
            .field("tables", &self.tables)
            .finish_non_exhaustive()
    }
}
