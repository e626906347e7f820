//! One CMS site of a (possibly multisite) deployment
//!
//! A `Site` hands out table handles bound to its own table prefix and
//! connection, and prepares every table of its plugin as it is built.

use cmsroute_core::inflector::{classify, plugin_split};
use cmsroute_core::{
    InitializationError, ModelKind, ModelOrigin, ResolutionError, ResolvedModel, Result,
    SiteConfig, SiteSymbol,
};
use cmsroute_locator::{EntityClass, ModelLocator};
use std::sync::{Arc, OnceLock, Weak};
use tracing::{debug, info, trace};

use crate::table::Table;
use crate::table_locator::{ListenerId, ModelListener, TableLocator, TableRequest};

pub struct Site {
    plugin: String,
    /// Plugin directory, used in error messages
    path: String,
    config: Arc<SiteConfig>,
    models: ModelLocator,
    tables: Arc<TableLocator>,
    /// Set once the site is registered with `tables`
    listener_id: OnceLock<ListenerId>,
}

impl Site {
    /// Create a site and register it for model-initialization events
    pub fn open(
        config: SiteConfig,
        path: impl Into<String>,
        models: ModelLocator,
        tables: Arc<TableLocator>,
    ) -> Arc<Self> {
        let site = Arc::new(Site {
            plugin: models.plugin().to_string(),
            path: path.into(),
            config: Arc::new(config),
            models,
            tables,
            listener_id: OnceLock::new(),
        });

        // Registered only once the Arc exists, so the listener always upgrades
        let listener: Weak<dyn ModelListener> = Arc::downgrade(&site) as Weak<dyn ModelListener>;
        let listener_id = site.tables.on_model_bound(listener);
        let _ = site.listener_id.set(listener_id);

        info!(
            plugin = %site.plugin,
            site = %site.symbol(),
            schema = %site.config.schema_version(),
            "Opened site"
        );
        site
    }

    pub fn plugin(&self) -> &str {
        &self.plugin
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn symbol(&self) -> &SiteSymbol {
        self.config.symbol()
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Resolve a model name with this site's schema version and local path
    pub fn locate_model(&self, name: &str, kind: ModelKind) -> ResolvedModel {
        self.models.locate(
            name,
            kind,
            self.config.schema_version(),
            self.config.local_path(),
        )
    }

    /// Get the table `name` (`Posts`, `Comments`, ...) bound to this site
    ///
    /// # Errors
    /// - `InitializationError::NoDatasource` if this site has no datasource
    /// - `ResolutionError::GenericFallbackOnly` if no concrete table class exists
    pub fn table(&self, name: &str) -> Result<Table> {
        let resolved = self.locate_model(name, ModelKind::Table);
        let candidates = match (resolved.origin, resolved.target) {
            (_, Some(target)) => vec![target],
            (ModelOrigin::GenericFallback, None) => self.models.fallback_candidates(
                name,
                ModelKind::Table,
                self.config.schema_version(),
            ),
            _ => Vec::new(),
        };

        let mut request = TableRequest::new(format!("{}.{}", self.plugin, name))
            .with_candidates(candidates)
            .requested_by(self.symbol().clone());
        if self.config.has_datasource() {
            request = request.with_connection(self.config.datasource());
        }

        let table = self.tables.get(request)?;
        if table.is_generic() {
            return Err(ResolutionError::GenericFallbackOnly {
                table: name.to_string(),
                class: table.class_name(),
                search_path: format!("{}src/Model/Table", self.path),
            }
            .into());
        }
        Ok(table)
    }

    /// Entity class for a resolved entity name, if one is registered
    fn entity_class(&self, name: &str, resolved: &ResolvedModel) -> Option<(String, Arc<EntityClass>)> {
        let registry = self.models.registry();
        match (&resolved.origin, &resolved.target) {
            (_, Some(target)) => registry
                .entity(target)
                .map(|class| (resolved.location.clone(), class)),
            (ModelOrigin::GenericFallback, None) => {
                let key = self.models.find_registered(
                    name,
                    ModelKind::Entity,
                    self.config.schema_version(),
                )?;
                registry.entity(&key).map(|class| (key.to_string(), class))
            }
            _ => None,
        }
    }
}

impl ModelListener for Site {
    fn on_model_initialize(&self, table: &mut Table) -> Result<()> {
        let (plugin, alias) = plugin_split(table.registry_alias());
        if plugin != Some(self.plugin.as_str()) {
            return Ok(());
        }
        if let Some(owner) = table.requested_by()
            && owner != self.symbol()
        {
            trace!(site = %self.symbol(), owner = %owner, alias, "Table requested by another site");
            return Ok(());
        }

        if !self.config.has_datasource() {
            return Err(InitializationError::NoDatasource {
                plugin: self.plugin.clone(),
                symbol: self.symbol().to_string(),
            }
            .into());
        }

        // The alias may come from an association; the base table is the real name
        let entity_name = classify(table.base_table());
        let resolved = self.locate_model(&entity_name, ModelKind::Entity);
        match self.entity_class(&entity_name, &resolved) {
            Some((location, class)) => {
                debug!(table = alias, entity = %location, "Using entity class");
                table.set_entity_class(location, class);
            }
            None => {
                debug!(table = alias, entity = %entity_name, "No entity class, keeping default");
            }
        }

        table.bind_site(self.config.clone());
        Ok(())
    }
}

impl Drop for Site {
    fn drop(&mut self) {
        if let Some(id) = self.listener_id.get() {
            self.tables.remove_listener(*id);
        }
    }
}

impl std::fmt::Debug for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Site")
            .field("plugin", &self.plugin)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
