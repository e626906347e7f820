//! Registration table of concrete model implementations
//!
//! Every table and entity implementation is registered at startup under a
//! [`ModelKey`]. The locator answers "does this class exist" with a map
//! lookup instead of probing for classes at runtime.

use cmsroute_core::inflector::underscore;
use cmsroute_core::{ModelKey, ModelKind, Namespace, SchemaVersion};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Connection used by tables that don't name one
pub const DEFAULT_CONNECTION: &str = "default";

/// A concrete table implementation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableClass {
    /// Logical model name without suffix (`Posts`)
    pub name: String,

    /// Prefixless database table; derived from the name when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,

    /// Connection used when no site is bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<String>,
}

impl TableClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: None,
            connection: None,
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn with_connection(mut self, connection: impl Into<String>) -> Self {
        self.connection = Some(connection.into());
        self
    }

    /// Prefixless table name (`Posts` → `posts` unless set explicitly)
    pub fn base_table(&self) -> String {
        self.table
            .clone()
            .unwrap_or_else(|| underscore(&self.name))
    }

    pub fn default_connection(&self) -> &str {
        self.connection.as_deref().unwrap_or(DEFAULT_CONNECTION)
    }
}

/// A concrete entity implementation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityClass {
    /// Singular entity name (`Post`)
    pub name: String,

    /// Fields left out when the entity is serialized
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hidden: Vec<String>,
}

impl EntityClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hidden: Vec::new(),
        }
    }

    pub fn with_hidden(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.hidden = fields.into_iter().map(Into::into).collect();
        self
    }
}

/// A registered implementation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Implementation {
    Table(Arc<TableClass>),
    Entity(Arc<EntityClass>),
}

impl Implementation {
    pub fn kind(&self) -> ModelKind {
        match self {
            Implementation::Table(_) => ModelKind::Table,
            Implementation::Entity(_) => ModelKind::Entity,
        }
    }
}

/// Namespace plus optional schema version that implementations are registered under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelScope {
    pub namespace: Namespace,
    pub version: Option<SchemaVersion>,
}

impl ModelScope {
    /// App root namespace (generic fallback lookups)
    pub fn app_root() -> Self {
        Self {
            namespace: Namespace::app_root(),
            version: None,
        }
    }

    /// App sub-location holding overrides (`Cms/Wordpress`)
    pub fn app(path: &str) -> Self {
        Self {
            namespace: Namespace::app(path),
            version: None,
        }
    }

    /// Plugin implementation shared by all schema versions
    pub fn plugin(plugin: &str) -> Self {
        Self {
            namespace: Namespace::plugin(plugin),
            version: None,
        }
    }

    /// Plugin implementation for one schema version
    pub fn versioned(plugin: &str, version: impl Into<SchemaVersion>) -> Self {
        Self {
            namespace: Namespace::plugin(plugin),
            version: Some(version.into()),
        }
    }

    /// Key of model `name` of `kind` in this scope
    pub fn key(&self, kind: ModelKind, name: &str) -> ModelKey {
        ModelKey {
            namespace: self.namespace.clone(),
            kind,
            version: self.version.clone(),
            name: kind.lookup_name(name),
        }
    }
}

/// Table of every known model implementation
///
/// Built once at startup and then shared read-only.
#[derive(Debug, Default, Clone)]
pub struct ModelRegistry {
    entries: HashMap<ModelKey, Implementation>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table class; a previous registration under the same key is replaced
    pub fn register_table(&mut self, scope: &ModelScope, class: TableClass) -> &mut Self {
        let key = scope.key(ModelKind::Table, &class.name);
        self.insert(key, Implementation::Table(Arc::new(class)));
        self
    }

    /// Register an entity class; a previous registration under the same key is replaced
    pub fn register_entity(&mut self, scope: &ModelScope, class: EntityClass) -> &mut Self {
        let key = scope.key(ModelKind::Entity, &class.name);
        self.insert(key, Implementation::Entity(Arc::new(class)));
        self
    }

    fn insert(&mut self, key: ModelKey, implementation: Implementation) {
        if self.entries.insert(key.clone(), implementation).is_some() {
            warn!(key = %key, "Model implementation registered twice, keeping the last one");
        }
    }

    pub fn contains(&self, key: &ModelKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &ModelKey) -> Option<&Implementation> {
        self.entries.get(key)
    }

    pub fn table(&self, key: &ModelKey) -> Option<Arc<TableClass>> {
        match self.entries.get(key)? {
            Implementation::Table(class) => Some(class.clone()),
            Implementation::Entity(_) => None,
        }
    }

    pub fn entity(&self, key: &ModelKey) -> Option<Arc<EntityClass>> {
        match self.entries.get(key)? {
            Implementation::Entity(class) => Some(class.clone()),
            Implementation::Table(_) => None,
        }
    }

    /// All registered keys, sorted
    pub fn keys(&self) -> Vec<&ModelKey> {
        let mut keys: Vec<_> = self.entries.keys().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for ModelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for key in self.keys() {
            writeln!(f, "{}", key)?;
        }
        Ok(())
    }
}
