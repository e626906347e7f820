//! Site identity and per-site configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::model::SchemaVersion;
use crate::{Error, Result};

/// Uppercase key identifying one site of a multisite deployment.
///
/// Symbols are normalized on construction, so `"demo"` and `"DEMO"` name the
/// same site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteSymbol(String);

impl SiteSymbol {
    /// Create a symbol, uppercasing the input
    pub fn new(symbol: impl AsRef<str>) -> Self {
        Self(symbol.as_ref().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SiteSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SiteSymbol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let symbol = Self::new(s);
        if symbol.is_empty() {
            return Err(ConfigError::NoSiteSpecified.into());
        }
        Ok(symbol)
    }
}

impl From<&str> for SiteSymbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Configuration record of a single site.
///
/// Deserialized from one entry of the `{plugin}.siteList` mapping, e.g.
///
/// ```yaml
/// MAIN:
///   datasource: wordpress
///   tablePrefix: wp_3_
///   type: v6
///   localPath: Cms/Wordpress
/// ```
///
/// The symbol is not part of the entry; it comes from the mapping key and is
/// attached with [`SiteConfig::with_symbol`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    #[serde(skip)]
    symbol: SiteSymbol,

    /// Connection name used to reach this site's database
    #[serde(default)]
    datasource: String,

    /// Prepended to every prefixless table name
    #[serde(default)]
    table_prefix: String,

    /// Schema version selecting the implementation set (e.g. `v5`, `v6`)
    #[serde(rename = "type", default)]
    schema_version: SchemaVersion,

    /// Where host-application overrides of model classes may live
    #[serde(default, skip_serializing_if = "Option::is_none")]
    local_path: Option<String>,
}

impl SiteConfig {
    pub fn new(symbol: impl Into<SiteSymbol>, datasource: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            datasource: datasource.into(),
            ..Default::default()
        }
    }

    /// Parse a site list entry and attach its symbol
    pub fn from_entry(symbol: &SiteSymbol, entry: &serde_json::Value) -> Result<Self> {
        let config: SiteConfig =
            serde_json::from_value(entry.clone()).map_err(|e| ConfigError::InvalidSiteConfig {
                symbol: symbol.to_string(),
                reason: e.to_string(),
            })?;
        Ok(config.with_symbol(symbol.clone()))
    }

    pub fn with_symbol(mut self, symbol: SiteSymbol) -> Self {
        self.symbol = symbol;
        self
    }

    pub fn with_table_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_prefix = prefix.into();
        self
    }

    pub fn with_schema_version(mut self, version: impl Into<SchemaVersion>) -> Self {
        self.schema_version = version.into();
        self
    }

    pub fn with_local_path(mut self, path: impl Into<String>) -> Self {
        self.local_path = Some(path.into());
        self
    }

    pub fn symbol(&self) -> &SiteSymbol {
        &self.symbol
    }

    pub fn datasource(&self) -> &str {
        &self.datasource
    }

    pub fn has_datasource(&self) -> bool {
        !self.datasource.trim().is_empty()
    }

    pub fn table_prefix(&self) -> &str {
        &self.table_prefix
    }

    pub fn schema_version(&self) -> &SchemaVersion {
        &self.schema_version
    }

    /// Local override path, `None` when unset or blank
    pub fn local_path(&self) -> Option<&str> {
        self.local_path
            .as_deref()
            .filter(|path| !path.trim_matches('/').trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_is_uppercased() {
        assert_eq!(SiteSymbol::new("demo"), SiteSymbol::new("DEMO"));
        assert_eq!(SiteSymbol::new(" demo ").as_str(), "DEMO");
    }

    #[test]
    fn test_empty_symbol_rejected() {
        assert!("  ".parse::<SiteSymbol>().is_err());
        assert_eq!("shop".parse::<SiteSymbol>().unwrap().to_string(), "SHOP");
    }

    #[test]
    fn test_from_entry() {
        let entry = serde_json::json!({
            "datasource": "wordpress",
            "tablePrefix": "wp_3_",
            "type": "v6",
            "localPath": "/Cms/Wordpress/"
        });
        let config = SiteConfig::from_entry(&SiteSymbol::new("main"), &entry).unwrap();

        assert_eq!(config.symbol().as_str(), "MAIN");
        assert_eq!(config.datasource(), "wordpress");
        assert_eq!(config.table_prefix(), "wp_3_");
        assert_eq!(config.schema_version().as_str(), "v6");
        assert_eq!(config.local_path(), Some("/Cms/Wordpress/"));
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let config =
            SiteConfig::from_entry(&SiteSymbol::new("bare"), &serde_json::json!({})).unwrap();
        assert!(!config.has_datasource());
        assert_eq!(config.table_prefix(), "");
        assert!(config.schema_version().is_empty());
        assert_eq!(config.local_path(), None);
    }

    #[test]
    fn test_blank_local_path_is_unset() {
        let config = SiteConfig::new("main", "db").with_local_path("/");
        assert_eq!(config.local_path(), None);
    }

    #[test]
    fn test_invalid_entry() {
        let entry = serde_json::json!({"tablePrefix": 42});
        let err = SiteConfig::from_entry(&SiteSymbol::new("main"), &entry).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidSiteConfig { .. })
        ));
    }
}
