//! Model manifest: the registration table expressed as configuration
//!
//! ```yaml
//! models:
//!   app:
//!     "":                     # app root namespace
//!       tables: [{ name: Options }]
//!     Cms/Wordpress:          # override location
//!       entities: [{ name: Post }]
//!   plugins:
//!     WordpressConnector:
//!       common:
//!         tables: [{ name: Users }]
//!       versions:
//!         v6:
//!           tables: [{ name: Posts }, { name: TermTaxonomy, table: term_taxonomy }]
//!           entities: [{ name: Post }]
//! ```

use cmsroute_core::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::registry::{EntityClass, ModelRegistry, ModelScope, TableClass};

/// Tables and entities registered in one scope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSet {
    #[serde(default)]
    pub tables: Vec<TableClass>,

    #[serde(default)]
    pub entities: Vec<EntityClass>,
}

impl ModelSet {
    fn register(&self, registry: &mut ModelRegistry, scope: &ModelScope) {
        for table in &self.tables {
            registry.register_table(scope, table.clone());
        }
        for entity in &self.entities {
            registry.register_entity(scope, entity.clone());
        }
    }

    fn len(&self) -> usize {
        self.tables.len() + self.entities.len()
    }
}

/// Implementations shipped by one plugin
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginModels {
    /// Shared by all schema versions
    #[serde(default)]
    pub common: ModelSet,

    /// Keyed by schema version
    #[serde(default)]
    pub versions: BTreeMap<String, ModelSet>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelManifest {
    /// Keyed by app location; the empty key is the app root
    #[serde(default)]
    pub app: BTreeMap<String, ModelSet>,

    #[serde(default)]
    pub plugins: BTreeMap<String, PluginModels>,
}

impl ModelManifest {
    /// Parse the `models` section of a configuration document
    pub fn from_value(models: &serde_json::Value) -> Result<Self> {
        serde_json::from_value(models.clone())
            .map_err(|e| ConfigError::Source(format!("Invalid model manifest: {}", e)).into())
    }

    /// Build the registration table
    pub fn to_registry(&self) -> ModelRegistry {
        let mut registry = ModelRegistry::new();

        for (path, set) in &self.app {
            let scope = if path.trim_matches('/').is_empty() {
                ModelScope::app_root()
            } else {
                ModelScope::app(path)
            };
            set.register(&mut registry, &scope);
        }

        for (plugin, models) in &self.plugins {
            models
                .common
                .register(&mut registry, &ModelScope::plugin(plugin));
            for (version, set) in &models.versions {
                set.register(
                    &mut registry,
                    &ModelScope::versioned(plugin, version.as_str()),
                );
            }
        }

        tracing::debug!(implementations = registry.len(), "Built model registry from manifest");
        registry
    }

    /// Number of implementations declared
    pub fn len(&self) -> usize {
        self.app.values().map(ModelSet::len).sum::<usize>()
            + self
                .plugins
                .values()
                .map(|p| p.common.len() + p.versions.values().map(ModelSet::len).sum::<usize>())
                .sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmsroute_core::{Error, ModelKind};

    const MANIFEST: &str = r#"
app:
  "":
    tables:
      - name: Options
  /Cms/Wordpress/:
    entities:
      - name: Post
        hidden: [post_password]
plugins:
  WordpressConnector:
    common:
      tables:
        - name: Users
    versions:
      v6:
        tables:
          - name: Posts
          - name: TermTaxonomy
            table: term_taxonomy
        entities:
          - name: Post
"#;

    fn manifest() -> ModelManifest {
        let value: serde_json::Value = serde_yaml::from_str(MANIFEST).unwrap();
        ModelManifest::from_value(&value).unwrap()
    }

    #[test]
    fn test_manifest_to_registry() {
        let manifest = manifest();
        assert_eq!(manifest.len(), 6);

        let registry = manifest.to_registry();
        assert_eq!(registry.len(), 6);

        assert!(registry.contains(&ModelScope::app_root().key(ModelKind::Table, "Options")));
        let post = registry
            .entity(&ModelScope::app("Cms/Wordpress").key(ModelKind::Entity, "Post"))
            .unwrap();
        assert_eq!(post.hidden, vec!["post_password"]);
        assert!(registry.contains(
            &ModelScope::plugin("WordpressConnector").key(ModelKind::Table, "Users")
        ));
        let taxonomy = registry
            .table(
                &ModelScope::versioned("WordpressConnector", "v6")
                    .key(ModelKind::Table, "TermTaxonomy"),
            )
            .unwrap();
        assert_eq!(taxonomy.base_table(), "term_taxonomy");
    }

    #[test]
    fn test_invalid_manifest() {
        let err = ModelManifest::from_value(&serde_json::json!({"plugins": ["x"]})).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Source(_))));
    }

    #[test]
    fn test_empty_manifest() {
        let manifest = ModelManifest::from_value(&serde_json::json!({})).unwrap();
        assert!(manifest.is_empty());
        assert!(manifest.to_registry().is_empty());
    }
}
