//! The process-wide alias table shared by every locator

use cmsroute_core::{ModelKey, ModelKind, ModelOrigin, SchemaVersion};
use cmsroute_locator::{AliasKey, AliasTable, ModelLocator, ModelRegistry, ModelScope, TableClass};
use serial_test::serial;
use std::sync::Arc;
use std::thread;

const PLUGIN: &str = "GlobalAliasConnector";

fn registry() -> Arc<ModelRegistry> {
    let mut registry = ModelRegistry::new();
    registry
        .register_table(&ModelScope::versioned(PLUGIN, "v6"), TableClass::new("Posts"))
        .register_table(&ModelScope::versioned(PLUGIN, "v5"), TableClass::new("Posts"));
    Arc::new(registry)
}

#[test]
#[serial]
fn test_locators_bind_through_global_table() {
    let v6 = SchemaVersion::new("v6");
    let alias = AliasKey::new(PLUGIN, ModelKind::Table, "Posts", &v6);
    let target = ModelKey::versioned(PLUGIN, ModelKind::Table, &v6, "Posts");

    let first = ModelLocator::new(PLUGIN, registry());
    let resolved = first.locate("Posts", ModelKind::Table, &v6, Some("Cms/Global"));
    assert_eq!(resolved.origin, ModelOrigin::PluginVersioned);
    assert_eq!(resolved.location, "GlobalAliasConnector.Model.Table.PostsTable");
    assert_eq!(AliasTable::global().resolve(&alias), Some(target.clone()));

    // A second locator sees the binding without registering anything itself
    let second = ModelLocator::new(PLUGIN, Arc::new(ModelRegistry::new()));
    assert!(second.aliases().is_bound(&alias));
    let again = second.locate("Posts", ModelKind::Table, &v6, Some("Cms/Global"));
    assert_eq!(again.target, Some(target));
}

#[test]
#[serial]
fn test_concurrent_sites_converge_per_version() {
    let registry = registry();
    let handles: Vec<_> = ["v5", "v6", "v5", "v6", "v6", "v5"]
        .into_iter()
        .map(|version| {
            let locator = ModelLocator::new(PLUGIN, registry.clone());
            thread::spawn(move || {
                let version = SchemaVersion::new(version);
                let resolved = locator.locate("Posts", ModelKind::Table, &version, Some("Cms/Global"));
                (version, resolved.target)
            })
        })
        .collect();

    for handle in handles {
        let (version, target) = handle.join().unwrap();
        assert_eq!(
            target,
            Some(ModelKey::versioned(PLUGIN, ModelKind::Table, &version, "Posts"))
        );
        let alias = AliasKey::new(PLUGIN, ModelKind::Table, "Posts", &version);
        assert_eq!(AliasTable::global().resolve(&alias), target);
    }
}
