//! Model class resolution
//!
//! Resolves a logical model name (`Posts`, `Post`) to the implementation a
//! site should use. Lookup order, first match wins:
//! 1. App-level override under the site's local path
//! 2. Bind the version-agnostic alias to the site's schema version
//! 3. Plugin implementation through the alias
//! 4. Bare name in the app root namespace
//!
//! Without a local path the bare name is returned right away and existence
//! is checked later, when the table or entity is actually built.

use cmsroute_core::{ModelKey, ModelKind, ModelOrigin, ResolvedModel, SchemaVersion};
use std::sync::Arc;
use tracing::debug;

use crate::alias::{AliasKey, AliasTable};
use crate::registry::ModelRegistry;

/// Resolves model names for one plugin
#[derive(Debug, Clone)]
pub struct ModelLocator {
    plugin: String,
    registry: Arc<ModelRegistry>,
    aliases: Arc<AliasTable>,
}

impl ModelLocator {
    /// Create a locator backed by the process-wide alias table
    pub fn new(plugin: impl Into<String>, registry: Arc<ModelRegistry>) -> Self {
        Self {
            plugin: plugin.into(),
            registry,
            aliases: AliasTable::global(),
        }
    }

    /// Use a private alias table instead of the process-wide one
    pub fn with_alias_table(mut self, aliases: Arc<AliasTable>) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn plugin(&self) -> &str {
        &self.plugin
    }

    pub fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }

    pub fn aliases(&self) -> &Arc<AliasTable> {
        &self.aliases
    }

    /// Resolve `name` of `kind` for a site running `version`
    ///
    /// `local_path` is the site's app-level override location; `None` or a
    /// blank path short-circuits to the bare name.
    pub fn locate(
        &self,
        name: &str,
        kind: ModelKind,
        version: &SchemaVersion,
        local_path: Option<&str>,
    ) -> ResolvedModel {
        let Some(local_path) = local_path
            .map(|path| path.trim_matches('/'))
            .filter(|path| !path.trim().is_empty())
        else {
            debug!(model = name, %kind, "No local path configured, using bare model name");
            return ResolvedModel::new(name, ModelOrigin::GenericFallback, None);
        };

        // 1. Override in the host application
        let override_key = ModelKey::app_override(local_path, kind, name);
        if self.registry.contains(&override_key) {
            debug!(model = name, %kind, location = %override_key, "Resolved app override");
            return ResolvedModel::new(
                override_key.to_string(),
                ModelOrigin::AppOverride,
                Some(override_key),
            );
        }

        // 2. Link the version-agnostic alias to the real versioned class
        let alias = AliasKey::new(&self.plugin, kind, name, version);
        let alias_name = alias.alias_name();
        if !version.is_empty() && !self.aliases.is_bound(&alias) {
            let versioned = ModelKey::versioned(&self.plugin, kind, version, name);
            if self.registry.contains(&versioned) {
                self.aliases.bind(alias.clone(), versioned);
            }
        }

        // 3. Plugin class, through the alias or shared by all versions
        let bound = self.aliases.resolve(&alias).or_else(|| {
            let unversioned = ModelKey::plugin(&self.plugin, kind, name);
            self.registry.contains(&unversioned).then_some(unversioned)
        });
        if let Some(target) = bound {
            debug!(model = name, %kind, alias = %alias_name, target = %target, "Resolved plugin model");
            return ResolvedModel::new(alias_name, ModelOrigin::PluginVersioned, Some(target));
        }

        // 4. Anything the app root namespace knows by this name
        let generic = ModelKey::app(kind, name);
        if self.registry.contains(&generic) {
            debug!(model = name, %kind, "Resolved generic model by bare name");
            return ResolvedModel::new(name, ModelOrigin::GenericFallback, Some(generic));
        }

        debug!(model = name, %kind, "Model class not found");
        ResolvedModel::not_found()
    }

    /// Where a bare name is searched once the class is actually needed
    ///
    /// The site's versioned plugin location first, then the plugin's shared
    /// location, then the app root namespace.
    pub fn fallback_candidates(
        &self,
        name: &str,
        kind: ModelKind,
        version: &SchemaVersion,
    ) -> Vec<ModelKey> {
        let mut candidates = Vec::with_capacity(3);
        if !version.is_empty() {
            candidates.push(ModelKey::versioned(&self.plugin, kind, version, name));
        }
        candidates.push(ModelKey::plugin(&self.plugin, kind, name));
        candidates.push(ModelKey::app(kind, name));
        candidates
    }

    /// First fallback candidate that is registered
    pub fn find_registered(
        &self,
        name: &str,
        kind: ModelKind,
        version: &SchemaVersion,
    ) -> Option<ModelKey> {
        self.fallback_candidates(name, kind, version)
            .into_iter()
            .find(|key| self.registry.contains(key))
    }
}
