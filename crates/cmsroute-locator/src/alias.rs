//! Version-agnostic aliases for plugin models
//!
//! Callers refer to `WordpressConnector.Model.Table.PostsTable` without
//! knowing whether the site runs schema `v5` or `v6`. The first successful
//! resolution for a (model, schema version) pair binds the alias to the
//! versioned implementation; the binding lives for the rest of the process.
//!
//! Uses DashMap so concurrent first resolutions of the same pair converge
//! on a single binding.

use cmsroute_core::{ModelKey, ModelKind, SchemaVersion};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use once_cell::sync::Lazy;
use std::fmt;
use std::sync::Arc;
use tracing::info;

static GLOBAL_ALIASES: Lazy<Arc<AliasTable>> = Lazy::new(|| Arc::new(AliasTable::new()));

/// Key of one alias binding
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AliasKey {
    pub plugin: String,
    pub kind: ModelKind,
    /// Lookup name, including the kind suffix
    pub name: String,
    pub version: SchemaVersion,
}

impl AliasKey {
    pub fn new(plugin: &str, kind: ModelKind, model: &str, version: &SchemaVersion) -> Self {
        Self {
            plugin: plugin.to_string(),
            kind,
            name: kind.lookup_name(model),
            version: version.clone(),
        }
    }

    /// The version-agnostic name callers use: `{plugin}.Model.{kind}.{name}`
    pub fn alias_name(&self) -> String {
        format!("{}.Model.{}.{}", self.plugin, self.kind, self.name)
    }
}

impl fmt::Display for AliasKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.alias_name(), self.version)
    }
}

/// Alias → versioned implementation bindings
#[derive(Debug, Default)]
pub struct AliasTable {
    bindings: DashMap<AliasKey, ModelKey>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide table
    pub fn global() -> Arc<AliasTable> {
        GLOBAL_ALIASES.clone()
    }

    /// Bind `alias` to `target` unless it is already bound
    ///
    /// Returns the binding in effect afterwards. A second bind of the same
    /// alias is a no-op that returns the first target.
    pub fn bind(&self, alias: AliasKey, target: ModelKey) -> ModelKey {
        match self.bindings.entry(alias) {
            Entry::Occupied(existing) => existing.get().clone(),
            Entry::Vacant(slot) => {
                info!(alias = %slot.key(), target = %target, "Bound model alias");
                slot.insert(target).value().clone()
            }
        }
    }

    pub fn resolve(&self, alias: &AliasKey) -> Option<ModelKey> {
        self.bindings.get(alias).map(|binding| binding.value().clone())
    }

    pub fn is_bound(&self, alias: &AliasKey) -> bool {
        self.bindings.contains_key(alias)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
