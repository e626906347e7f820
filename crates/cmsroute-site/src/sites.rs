//! Site lookup from configuration
//!
//! Reads `{plugin}.defaultSite` and `{plugin}.siteList` from a
//! [`ConfigStore`] and turns one entry into a [`SiteConfig`].

use cmsroute_core::{ConfigError, ConfigStore, Result, SiteConfig, SiteSymbol};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Resolves site symbols for one plugin
#[derive(Clone)]
pub struct SiteRegistry {
    plugin: String,
    store: Arc<dyn ConfigStore>,
}

impl SiteRegistry {
    pub fn new(plugin: impl Into<String>, store: Arc<dyn ConfigStore>) -> Self {
        Self {
            plugin: plugin.into(),
            store,
        }
    }

    pub fn plugin(&self) -> &str {
        &self.plugin
    }

    pub fn store(&self) -> &Arc<dyn ConfigStore> {
        &self.store
    }

    /// The configured default site, if any
    pub async fn default_site(&self) -> Result<Option<SiteSymbol>> {
        let key = format!("{}.defaultSite", self.plugin);
        let symbol = self
            .store
            .read(&key)
            .await?
            .as_ref()
            .and_then(Value::as_str)
            .map(SiteSymbol::new)
            .filter(|symbol| !symbol.is_empty());
        Ok(symbol)
    }

    /// Raw site list entries keyed by normalized symbol
    ///
    /// # Errors
    /// - `ConfigError::NoSitesConfigured` if the list is missing, empty or not a mapping
    /// - `ConfigError::InvalidSiteConfig` if two keys normalize to the same symbol
    pub async fn site_list(&self) -> Result<BTreeMap<SiteSymbol, Value>> {
        let key = format!("{}.siteList", self.plugin);
        let mut sites = BTreeMap::new();
        if let Some(Value::Object(entries)) = self.store.read(&key).await? {
            for (name, entry) in entries {
                let symbol = SiteSymbol::new(&name);
                if sites.insert(symbol.clone(), entry).is_some() {
                    return Err(ConfigError::InvalidSiteConfig {
                        symbol: symbol.to_string(),
                        reason: format!("'{}' repeats a symbol already in {}", name, key),
                    }
                    .into());
                }
            }
        }

        if sites.is_empty() {
            return Err(ConfigError::NoSitesConfigured.into());
        }
        Ok(sites)
    }

    /// Every configured symbol, sorted
    pub async fn symbols(&self) -> Result<Vec<SiteSymbol>> {
        Ok(self.site_list().await?.into_keys().collect())
    }

    /// Resolve a site symbol to its configuration
    ///
    /// An empty or missing symbol falls back to the default site. The symbol
    /// is uppercased before lookup.
    ///
    /// # Errors
    /// - `ConfigError::NoSiteSpecified` if no symbol is given and no default is configured
    /// - `ConfigError::NoSitesConfigured` if the site list is missing or empty
    /// - `ConfigError::UnknownSite` if the symbol is not in the site list
    /// - `ConfigError::InvalidSiteConfig` if the entry can't be parsed
    pub async fn resolve_site(&self, symbol: Option<&str>) -> Result<SiteConfig> {
        let symbol = match symbol.map(SiteSymbol::new).filter(|s| !s.is_empty()) {
            Some(symbol) => symbol,
            None => self
                .default_site()
                .await?
                .ok_or(ConfigError::NoSiteSpecified)?,
        };

        let sites = self.site_list().await?;
        let Some(entry) = sites.get(&symbol) else {
            return Err(ConfigError::UnknownSite {
                symbol: symbol.to_string(),
                available: sites.keys().map(ToString::to_string).collect(),
            }
            .into());
        };

        debug!(plugin = %self.plugin, site = %symbol, "Resolved site configuration");
        SiteConfig::from_entry(&symbol, entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmsroute_core::{Error, MemoryConfigStore};
    use serde_json::json;

    const PLUGIN: &str = "WordpressConnector";

    fn registry(config: Value) -> SiteRegistry {
        SiteRegistry::new(PLUGIN, Arc::new(MemoryConfigStore::new(config)))
    }

    fn network() -> SiteRegistry {
        registry(json!({
            PLUGIN: {
                "defaultSite": "main",
                "siteList": {
                    "MAIN": {"datasource": "network", "tablePrefix": "wp_", "type": "v6"},
                    "SHOP": {"datasource": "network", "tablePrefix": "wp_3_", "type": "v6"},
                    "LEGACY": {"datasource": "legacy", "tablePrefix": "wp_", "type": "v5"}
                }
            }
        }))
    }

    #[tokio::test]
    async fn test_resolve_symbol_is_uppercased() {
        let sites = network();
        for symbol in ["SHOP", "shop", "Shop"] {
            let config = sites.resolve_site(Some(symbol)).await.unwrap();
            assert_eq!(config.symbol().as_str(), "SHOP");
            assert_eq!(config.table_prefix(), "wp_3_");
        }
        assert_eq!(
            sites.resolve_site(Some("shop")).await.unwrap(),
            sites.resolve_site(Some("SHOP")).await.unwrap()
        );
    }

    #[tokio::test]
    async fn test_default_site_fallback() {
        let sites = network();
        assert_eq!(
            sites.resolve_site(None).await.unwrap().symbol().as_str(),
            "MAIN"
        );
        assert_eq!(
            sites.resolve_site(Some("")).await.unwrap().symbol().as_str(),
            "MAIN"
        );
    }

    #[tokio::test]
    async fn test_no_site_specified() {
        let sites = registry(json!({PLUGIN: {"siteList": {"MAIN": {"datasource": "db"}}}}));
        assert!(matches!(
            sites.resolve_site(None).await.unwrap_err(),
            Error::Config(ConfigError::NoSiteSpecified)
        ));

        let sites = registry(json!({PLUGIN: {"defaultSite": "", "siteList": {}}}));
        assert!(matches!(
            sites.resolve_site(None).await.unwrap_err(),
            Error::Config(ConfigError::NoSiteSpecified)
        ));
    }

    #[tokio::test]
    async fn test_no_sites_configured() {
        for config in [
            json!({}),
            json!({PLUGIN: {"siteList": {}}}),
            json!({PLUGIN: {"siteList": ["MAIN"]}}),
            json!({"OtherPlugin": {"siteList": {"MAIN": {}}}}),
        ] {
            let err = registry(config).resolve_site(Some("main")).await.unwrap_err();
            assert!(matches!(err, Error::Config(ConfigError::NoSitesConfigured)));
        }
    }

    #[tokio::test]
    async fn test_unknown_site_lists_every_symbol() {
        let err = network().resolve_site(Some("blog")).await.unwrap_err();
        match err {
            Error::Config(ConfigError::UnknownSite { symbol, available }) => {
                assert_eq!(symbol, "BLOG");
                assert_eq!(available, vec!["LEGACY", "MAIN", "SHOP"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_lowercase_list_keys_are_normalized() {
        let sites = registry(json!({PLUGIN: {"siteList": {"demo": {"datasource": "db"}}}}));
        let config = sites.resolve_site(Some("DEMO")).await.unwrap();
        assert_eq!(config.symbol().as_str(), "DEMO");
        assert_eq!(sites.symbols().await.unwrap(), vec![SiteSymbol::new("DEMO")]);
    }

    #[tokio::test]
    async fn test_keys_differing_only_in_case_are_rejected() {
        let sites = registry(json!({
            PLUGIN: {
                "siteList": {
                    "demo": {"datasource": "db", "tablePrefix": "wp_"},
                    "DEMO": {"datasource": "db", "tablePrefix": "wp_2_"}
                }
            }
        }));

        match sites.resolve_site(Some("demo")).await.unwrap_err() {
            Error::Config(ConfigError::InvalidSiteConfig { symbol, reason }) => {
                assert_eq!(symbol, "DEMO");
                assert!(reason.contains("WordpressConnector.siteList"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(sites.symbols().await.is_err());
    }
}
