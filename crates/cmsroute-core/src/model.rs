//! Model identity types shared by the locator and the site layer
//!
//! A model implementation is addressed by a structured [`ModelKey`] instead
//! of an interpolated class path. Strings are only produced when a key is
//! displayed or reported as a [`ResolvedModel::location`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::{Error, Result};

/// Which half of a model is being looked up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ModelKind {
    Entity,
    Table,
}

impl ModelKind {
    /// Suffix appended to the model name when looking up its class
    pub fn suffix(&self) -> &'static str {
        match self {
            ModelKind::Entity => "",
            ModelKind::Table => "Table",
        }
    }

    /// Model name with the kind suffix appended (`Posts` → `PostsTable`)
    pub fn lookup_name(&self, name: &str) -> String {
        format!("{}{}", name, self.suffix())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Entity => "Entity",
            ModelKind::Table => "Table",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("entity") {
            Ok(ModelKind::Entity)
        } else if s.eq_ignore_ascii_case("table") {
            Ok(ModelKind::Table)
        } else {
            Err(ConfigError::InvalidKind(s.to_string()).into())
        }
    }
}

/// Generation of the CMS database schema a site runs (e.g. `v5`, `v6`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaVersion(String);

impl SchemaVersion {
    pub fn new(version: impl AsRef<str>) -> Self {
        Self(version.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SchemaVersion {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SchemaVersion {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Where a model implementation lives
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Namespace {
    /// Host application; `path` is the sub-location (empty for the root)
    App { path: String },
    /// A connector plugin
    Plugin { name: String },
}

impl Namespace {
    pub fn app_root() -> Self {
        Namespace::App {
            path: String::new(),
        }
    }

    /// App sub-location, with surrounding slashes trimmed
    pub fn app(path: impl AsRef<str>) -> Self {
        Namespace::App {
            path: path.as_ref().trim_matches('/').to_string(),
        }
    }

    pub fn plugin(name: impl Into<String>) -> Self {
        Namespace::Plugin { name: name.into() }
    }
}

/// Registration key of one concrete model implementation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelKey {
    pub namespace: Namespace,
    pub kind: ModelKind,
    /// Only plugin implementations are versioned
    pub version: Option<SchemaVersion>,
    /// Lookup name, including the kind suffix (`PostsTable`, `Post`)
    pub name: String,
}

impl ModelKey {
    /// Class in the app root namespace, found by bare name
    pub fn app(kind: ModelKind, model: &str) -> Self {
        Self {
            namespace: Namespace::app_root(),
            kind,
            version: None,
            name: kind.lookup_name(model),
        }
    }

    /// Class overriding a plugin model from an app sub-location
    pub fn app_override(path: &str, kind: ModelKind, model: &str) -> Self {
        Self {
            namespace: Namespace::app(path),
            kind,
            version: None,
            name: kind.lookup_name(model),
        }
    }

    /// Plugin class without a schema version; its path is the alias path
    pub fn plugin(plugin: &str, kind: ModelKind, model: &str) -> Self {
        Self {
            namespace: Namespace::plugin(plugin),
            kind,
            version: None,
            name: kind.lookup_name(model),
        }
    }

    /// Plugin class bound to one schema version
    pub fn versioned(plugin: &str, kind: ModelKind, version: &SchemaVersion, model: &str) -> Self {
        Self {
            namespace: Namespace::plugin(plugin),
            kind,
            version: Some(version.clone()),
            name: kind.lookup_name(model),
        }
    }
}

impl fmt::Display for ModelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Namespace::App { path } if path.is_empty() => f.write_str(&self.name),
            Namespace::App { path } => write!(f, "{}/{}", path, self.name),
            Namespace::Plugin { name } => match &self.version {
                Some(version) => write!(f, "{}.Model.{}.{}.{}", name, self.kind, version, self.name),
                None => write!(f, "{}.Model.{}.{}", name, self.kind, self.name),
            },
        }
    }
}

/// How a model name was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelOrigin {
    AppOverride,
    PluginVersioned,
    GenericFallback,
    NotFound,
}

impl fmt::Display for ModelOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ModelOrigin::AppOverride => "app override",
            ModelOrigin::PluginVersioned => "plugin (versioned)",
            ModelOrigin::GenericFallback => "generic fallback",
            ModelOrigin::NotFound => "not found",
        };
        f.write_str(s)
    }
}

/// Result of a model lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModel {
    /// Version-agnostic alias, override path or bare model name
    pub location: String,
    pub origin: ModelOrigin,
    /// Registration key the location was verified against, if any
    pub target: Option<ModelKey>,
}

impl ResolvedModel {
    pub fn new(location: impl Into<String>, origin: ModelOrigin, target: Option<ModelKey>) -> Self {
        Self {
            location: location.into(),
            origin,
            target,
        }
    }

    pub fn not_found() -> Self {
        Self::new(String::new(), ModelOrigin::NotFound, None)
    }

    pub fn is_found(&self) -> bool {
        self.origin != ModelOrigin::NotFound
    }
}
