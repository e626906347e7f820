//! Table handles connected to a site
//!
//! Table classes refer to prefixless table names (`posts`). Multisite
//! databases prefix them per site (`wp_3_posts`) and keep each site on its
//! own connection. Once a site is bound, the handle derives both its
//! effective name and its connection from that site's configuration.

use cmsroute_core::inflector::plugin_split;
use cmsroute_core::{ConnectionHandle, ConnectionPool, ModelKey, Result, SiteConfig, SiteSymbol};
use cmsroute_locator::{EntityClass, TableClass};
use std::fmt;
use std::sync::Arc;

/// Class name reported for tables built without a concrete class
pub const GENERIC_TABLE_CLASS: &str = "Table";

/// Class name reported for tables using the default entity
pub const GENERIC_ENTITY_CLASS: &str = "Entity";

/// Entity implementation a table hydrates rows into
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EntityBinding {
    /// Generic entity
    #[default]
    Default,
    /// Concrete entity class found by the model locator
    Class {
        location: String,
        class: Arc<EntityClass>,
    },
}

impl EntityBinding {
    pub fn name(&self) -> &str {
        match self {
            EntityBinding::Default => GENERIC_ENTITY_CLASS,
            EntityBinding::Class { class, .. } => &class.name,
        }
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            EntityBinding::Default => None,
            EntityBinding::Class { location, .. } => Some(location),
        }
    }
}

/// A table handle
pub struct Table {
    /// `Plugin.Alias` identifier the handle was requested under
    registry_alias: String,
    /// Registration key of the concrete class; `None` for a generic table
    class_key: Option<ModelKey>,
    class: Option<Arc<TableClass>>,
    base_table: String,
    default_connection: String,
    /// Site that requested this handle, if any
    requested_by: Option<SiteSymbol>,
    entity: EntityBinding,
    connected_site: Option<Arc<SiteConfig>>,
    connections: Arc<dyn ConnectionPool>,
}

impl Table {
    /// Handle backed by a concrete table class
    pub fn from_class(
        registry_alias: impl Into<String>,
        key: ModelKey,
        class: Arc<TableClass>,
        connections: Arc<dyn ConnectionPool>,
    ) -> Self {
        Self {
            registry_alias: registry_alias.into(),
            base_table: class.base_table(),
            default_connection: class.default_connection().to_string(),
            class_key: Some(key),
            class: Some(class),
            requested_by: None,
            entity: EntityBinding::Default,
            connected_site: None,
            connections,
        }
    }

    /// Handle with no concrete class; the table name is inferred from the alias
    pub fn generic(
        registry_alias: impl Into<String>,
        base_table: impl Into<String>,
        connections: Arc<dyn ConnectionPool>,
    ) -> Self {
        Self {
            registry_alias: registry_alias.into(),
            class_key: None,
            class: None,
            base_table: base_table.into(),
            default_connection: cmsroute_locator::DEFAULT_CONNECTION.to_string(),
            requested_by: None,
            entity: EntityBinding::Default,
            connected_site: None,
            connections,
        }
    }

    pub(crate) fn set_default_connection(&mut self, connection: impl Into<String>) {
        self.default_connection = connection.into();
    }

    pub(crate) fn set_requested_by(&mut self, symbol: Option<SiteSymbol>) {
        self.requested_by = symbol;
    }

    pub fn registry_alias(&self) -> &str {
        &self.registry_alias
    }

    /// Plugin part of the registry alias
    pub fn plugin(&self) -> Option<&str> {
        plugin_split(&self.registry_alias).0
    }

    /// Local part of the registry alias (`Posts`)
    pub fn alias(&self) -> &str {
        plugin_split(&self.registry_alias).1
    }

    /// Database table name without any site prefix
    pub fn base_table(&self) -> &str {
        &self.base_table
    }

    pub fn is_generic(&self) -> bool {
        self.class.is_none()
    }

    pub fn class(&self) -> Option<&Arc<TableClass>> {
        self.class.as_ref()
    }

    /// Name of the implementing class, e.g. `WordpressConnector.Model.Table.v6.PostsTable`
    pub fn class_name(&self) -> String {
        self.class_key
            .as_ref()
            .map_or_else(|| GENERIC_TABLE_CLASS.to_string(), ToString::to_string)
    }

    pub fn default_connection(&self) -> &str {
        &self.default_connection
    }

    pub fn requested_by(&self) -> Option<&SiteSymbol> {
        self.requested_by.as_ref()
    }

    pub fn entity_class(&self) -> &EntityBinding {
        &self.entity
    }

    pub fn set_entity_class(&mut self, location: impl Into<String>, class: Arc<EntityClass>) {
        self.entity = EntityBinding::Class {
            location: location.into(),
            class,
        };
    }

    /// Site this table is connected to
    pub fn connected_site(&self) -> Option<&SiteConfig> {
        self.connected_site.as_deref()
    }

    /// Connect the table to a site; a later call replaces the earlier site
    pub fn bind_site(&mut self, site: Arc<SiteConfig>) {
        self.connected_site = Some(site);
    }

    /// Table name with the connected site's prefix prepended
    pub fn effective_name(&self) -> String {
        match &self.connected_site {
            Some(site) => format!("{}{}", site.table_prefix(), self.base_table),
            None => self.base_table.clone(),
        }
    }

    /// Connection of the connected site, or the table's default connection
    ///
    /// # Errors
    /// - `ConnectionError::MissingDatasource` if the pool doesn't know the datasource
    pub fn effective_connection(&self) -> Result<ConnectionHandle> {
        match &self.connected_site {
            Some(site) => self.connections.get_connection(site.datasource()),
            None => self.connections.get_connection(&self.default_connection),
        }
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("registry_alias", &self.registry_alias)
            .field("class", &self.class_name())
            .field("base_table", &self.base_table)
            .field("default_connection", &self.default_connection)
            .field("requested_by", &self.requested_by)
            .field("entity", &self.entity.name())
            .field(
                "connected_site",
                &self.connected_site.as_ref().map(|site| site.symbol()),
            )
            .finish_non_exhaustive()
    }
}
