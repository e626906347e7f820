//! Connectors loaded from configuration files on disk

use cmsroute_config_file::FileConfigStore;
use cmsroute_core::{ConfigError, Error, ModelKey, ModelKind, SchemaVersion};
use cmsroute_locator::{AliasKey, AliasTable};
use cmsroute_site::Connector;
use serial_test::serial;
use std::sync::Arc;
use tempfile::TempDir;

const NETWORK_YAML: &str = r#"
WordpressConnector:
  defaultSite: MAIN
  siteList:
    MAIN:
      datasource: network
      tablePrefix: wp_
      type: v6
      localPath: Cms/Wordpress
    SHOP:
      datasource: network
      tablePrefix: wp_3_
      type: v6
      localPath: Cms/Wordpress

datasources:
  network:
    url: mysql://localhost/wordpress

models:
  plugins:
    WordpressConnector:
      versions:
        v6:
          tables:
            - name: Posts
            - name: TermTaxonomy
              table: term_taxonomy
          entities:
            - name: Post
"#;

const NETWORK_TOML: &str = r#"
[WordpressConnector]
defaultSite = "SHOP"

[WordpressConnector.siteList.SHOP]
datasource = "network"
tablePrefix = "wp_3_"
type = "v6"

[datasources.network]
url = "mysql://localhost/wordpress"

[[models.plugins.WordpressConnector.versions.v6.tables]]
name = "Posts"
"#;

fn write_config(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[tokio::test]
async fn test_yaml_network() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "cmsroute.yaml", NETWORK_YAML);

    let store = Arc::new(FileConfigStore::new(&path).await.unwrap());
    let connector = Connector::from_store("WordpressConnector", store)
        .await
        .unwrap()
        .with_alias_table(Arc::new(AliasTable::new()));

    let shop = connector.site(Some("shop")).await.unwrap();
    let posts = shop.table("Posts").unwrap();
    assert_eq!(posts.effective_name(), "wp_3_posts");
    assert_eq!(posts.entity_class().name(), "Post");

    let terms = shop.table("TermTaxonomy").unwrap();
    assert_eq!(terms.effective_name(), "wp_3_term_taxonomy");
    assert_eq!(
        terms.effective_connection().unwrap().to_string(),
        "network (mysql)"
    );
}

#[tokio::test]
async fn test_toml_network() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "cmsroute.toml", NETWORK_TOML);

    let store = Arc::new(FileConfigStore::new(&path).await.unwrap());
    let connector = Connector::from_store("WordpressConnector", store)
        .await
        .unwrap()
        .with_alias_table(Arc::new(AliasTable::new()));

    let site = connector.site(None).await.unwrap();
    assert_eq!(site.symbol().as_str(), "SHOP");
    assert_eq!(site.table("Posts").unwrap().effective_name(), "wp_3_posts");
}

#[tokio::test]
async fn test_sites_added_on_disk_are_picked_up() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "cmsroute.yaml", NETWORK_YAML);

    let store = Arc::new(FileConfigStore::new(&path).await.unwrap());
    let connector = Connector::from_store("WordpressConnector", store)
        .await
        .unwrap()
        .with_alias_table(Arc::new(AliasTable::new()));

    let err = connector.site(Some("blog")).await.unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::UnknownSite { .. })));

    let updated = NETWORK_YAML.replace(
        "  siteList:\n",
        "  siteList:\n    BLOG:\n      datasource: network\n      tablePrefix: wp_5_\n      type: v6\n",
    );
    std::fs::write(&path, updated).unwrap();

    let blog = connector.site(Some("blog")).await.unwrap();
    assert_eq!(blog.table("Posts").unwrap().effective_name(), "wp_5_posts");
}

#[tokio::test]
#[serial]
async fn test_connectors_share_global_aliases() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "cmsroute.yaml", NETWORK_YAML);

    let v6 = SchemaVersion::new("v6");
    let alias = AliasKey::new("WordpressConnector", ModelKind::Table, "Posts", &v6);
    let target = ModelKey::versioned("WordpressConnector", ModelKind::Table, &v6, "Posts");

    let first = Connector::from_store(
        "WordpressConnector",
        Arc::new(FileConfigStore::new(&path).await.unwrap()),
    )
    .await
    .unwrap();
    let second = Connector::from_store(
        "WordpressConnector",
        Arc::new(FileConfigStore::new(&path).await.unwrap()),
    )
    .await
    .unwrap();

    let main = first.site(Some("main")).await.unwrap();
    let shop = second.site(Some("shop")).await.unwrap();
    assert_eq!(main.table("Posts").unwrap().class_name(), target.to_string());
    assert_eq!(shop.table("Posts").unwrap().class_name(), target.to_string());

    assert_eq!(AliasTable::global().resolve(&alias), Some(target));
    assert!(Arc::ptr_eq(first.models().aliases(), second.models().aliases()));
}
