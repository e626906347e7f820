//! File-based ConfigStore implementation

use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use cmsroute_core::{ConfigError, Error, Result, config_store::ConfigStore};

/// On-disk formats, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Toml,
}

impl Format {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Format::Toml,
            _ => Format::Yaml,
        }
    }

    fn parse(self, contents: &str) -> Result<Value> {
        match self {
            Format::Toml => {
                let document: toml::Value = toml::from_str(contents).map_err(|e| {
                    error!("Failed to parse TOML config: {}", e);
                    source_error(format!("Invalid TOML: {}", e))
                })?;
                serde_json::to_value(document)
                    .map_err(|e| source_error(format!("TOML conversion error: {}", e)))
            }
            Format::Yaml => serde_yaml::from_str(contents).map_err(|e| {
                error!("Failed to parse YAML config: {}", e);
                source_error(format!("Invalid YAML: {}", e))
            }),
        }
    }
}

/// Read-only configuration store backed by a YAML or TOML file
///
/// `.toml` files are read as TOML, anything else as YAML. The document is
/// re-read on every access so edits on disk are picked up by the next site
/// that is opened.
#[derive(Debug)]
pub struct FileConfigStore {
    config_path: PathBuf,
    format: Format,
}

impl FileConfigStore {
    /// Open the configuration file at `config_path`
    ///
    /// A leading `~` is expanded to the home directory.
    ///
    /// # Errors
    /// - `ConfigError::FileNotFound` if the file doesn't exist
    /// - `ConfigError::Source` if the home directory can't be determined
    pub async fn new(config_path: impl Into<PathBuf>) -> Result<Self> {
        let config_path = expand_home(config_path.into())?;

        if !config_path.exists() {
            return Err(ConfigError::FileNotFound(config_path.display().to_string()).into());
        }

        let format = Format::of(&config_path);
        info!(path = ?config_path, ?format, "Opened configuration file");

        Ok(Self {
            config_path,
            format,
        })
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    fn read_config_file(&self) -> Result<Value> {
        let contents = std::fs::read_to_string(&self.config_path).map_err(|e| {
            error!("Failed to read config file: {}", e);
            Error::Io(e)
        })?;

        let config = self.format.parse(&contents)?;
        debug!(path = ?self.config_path, "Read configuration file");
        Ok(config)
    }
}

fn expand_home(path: PathBuf) -> Result<PathBuf> {
    let Ok(rest) = path.strip_prefix("~") else {
        return Ok(path);
    };
    let home = dirs::home_dir()
        .ok_or_else(|| source_error("Could not determine home directory".to_string()))?;
    Ok(home.join(rest))
}

fn source_error(reason: String) -> Error {
    ConfigError::Source(reason).into()
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn get_config(&self) -> Result<Value> {
        self.read_config_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{Builder, NamedTempFile};

    #[tokio::test]
    async fn test_file_not_found() {
        let result = FileConfigStore::new("/nonexistent/config.yaml").await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Config(ConfigError::FileNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_read_yaml_config() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(
            temp_file.path(),
            r#"
WordpressConnector:
  defaultSite: main
  siteList:
    MAIN:
      datasource: wordpress
      tablePrefix: wp_3_
      type: v6
"#,
        )
        .unwrap();

        let store = FileConfigStore::new(temp_file.path()).await.unwrap();

        assert_eq!(
            store.read("WordpressConnector.defaultSite").await.unwrap(),
            Some(serde_json::json!("main"))
        );
        assert_eq!(
            store
                .read("WordpressConnector.siteList.MAIN.tablePrefix")
                .await
                .unwrap(),
            Some(serde_json::json!("wp_3_"))
        );
    }

    #[tokio::test]
    async fn test_read_toml_config() {
        let temp_file = Builder::new().suffix(".toml").tempfile().unwrap();
        std::fs::write(
            temp_file.path(),
            r#"
[WordpressConnector.siteList.SHOP]
datasource = "shop"
type = "v5"
"#,
        )
        .unwrap();

        let store = FileConfigStore::new(temp_file.path()).await.unwrap();
        assert_eq!(
            store
                .read("WordpressConnector.siteList.SHOP.type")
                .await
                .unwrap(),
            Some(serde_json::json!("v5"))
        );
    }

    #[tokio::test]
    async fn test_validate_site_list_from_file() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(
            temp_file.path(),
            "WordpressConnector:\n  siteList:\n    MAIN:\n      tablePrefix: 3\n",
        )
        .unwrap();

        let store = FileConfigStore::new(temp_file.path()).await.unwrap();
        let config = store.get_config().await.unwrap();
        assert!(matches!(
            store.validate_config(&config).await.unwrap_err(),
            Error::Config(ConfigError::Source(_))
        ));
    }

    #[tokio::test]
    async fn test_edits_on_disk_are_read_back() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "WordpressConnector:\n  defaultSite: MAIN\n").unwrap();

        let store = FileConfigStore::new(temp_file.path()).await.unwrap();
        assert_eq!(
            store.read("WordpressConnector.defaultSite").await.unwrap(),
            Some(serde_json::json!("MAIN"))
        );

        std::fs::write(temp_file.path(), "WordpressConnector:\n  defaultSite: SHOP\n").unwrap();
        assert_eq!(
            store.read("WordpressConnector.defaultSite").await.unwrap(),
            Some(serde_json::json!("SHOP"))
        );
    }

    #[tokio::test]
    async fn test_invalid_yaml() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "key: [unclosed").unwrap();

        let store = FileConfigStore::new(temp_file.path()).await.unwrap();
        assert!(matches!(
            store.get_config().await.unwrap_err(),
            Error::Config(ConfigError::Source(_))
        ));
    }
}
