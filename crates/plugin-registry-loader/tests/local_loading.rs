//! Integration tests for development mode, reading from a local checkout.

use plugin_registry_core::{CategoryPalette, ColorTag, Enricher};
use plugin_registry_loader::{LoaderConfig, LoaderError, RegistryLoader};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_checkout(root: &Path, manifest: &str) {
    let manifest_dir = root.join(".claude-plugin");
    fs::create_dir_all(&manifest_dir).unwrap();
    fs::write(manifest_dir.join("marketplace.json"), manifest).unwrap();
}

fn write_readme(root: &Path, plugin: &str, content: &str) {
    let dir = root.join("plugins").join(plugin);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("README.md"), content).unwrap();
}

#[tokio::test]
async fn test_load_local_registry() {
    let checkout = TempDir::new().unwrap();
    write_checkout(
        checkout.path(),
        r#"{
            "name": "local",
            "owner": {"name": "dev"},
            "plugins": [
                {"name": "code-interpreter-demo", "category": "Development", "skills": "./skills"},
                {"name": "policy-demo", "category": "security", "commands": ["./a", "./b"]}
            ]
        }"#,
    );

    let loader = RegistryLoader::new(LoaderConfig::development(checkout.path()));
    let registry = loader.load_registry().await.unwrap();

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.plugins()[0].skill_count(), 1);
    assert_eq!(registry.plugins()[0].category_color(), ColorTag::Blue);
    assert_eq!(registry.plugins()[1].command_count(), 2);
    assert_eq!(registry.plugins()[1].category_color(), ColorTag::Red);
}

#[tokio::test]
async fn test_missing_local_registry_is_fetch_error() {
    let checkout = TempDir::new().unwrap();

    let loader = RegistryLoader::new(LoaderConfig::development(checkout.path()));
    let err = loader.load_registry().await.unwrap_err();

    assert!(matches!(err, LoaderError::Fetch { .. }));
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_local_registry_with_custom_palette() {
    let checkout = TempDir::new().unwrap();
    write_checkout(
        checkout.path(),
        r#"{"plugins": [{"name": "guardrails-demo", "category": "Safety"}]}"#,
    );

    let palette = CategoryPalette::default().with("safety", ColorTag::Orange);
    let loader = RegistryLoader::with_enricher(
        LoaderConfig::development(checkout.path()),
        Enricher::new(palette),
    );

    let registry = loader.load_registry().await.unwrap();
    assert_eq!(registry.plugins()[0].category_color(), ColorTag::Orange);
}

#[tokio::test]
async fn test_load_raw_registry_skips_enrichment() {
    let checkout = TempDir::new().unwrap();
    write_checkout(checkout.path(), r#"{"plugins": [{"name": "raw", "extra": 1}]}"#);

    let loader = RegistryLoader::new(LoaderConfig::development(checkout.path()));
    let document = loader.load_raw_registry().await.unwrap();

    assert_eq!(document.plugins[0].name, "raw");
    assert_eq!(document.plugins[0].extra_field("extra"), Some(&serde_json::json!(1)));
}

#[tokio::test]
async fn test_local_plugin_documents() {
    let checkout = TempDir::new().unwrap();
    write_checkout(checkout.path(), r#"{"plugins": []}"#);
    write_readme(checkout.path(), "memory-demo", "# Memory\n");

    let loader = RegistryLoader::new(LoaderConfig::development(checkout.path()));

    assert_eq!(
        loader.load_plugin_document("memory-demo").await.as_deref(),
        Some("# Memory\n")
    );
    assert_eq!(loader.load_plugin_document("browser-demo").await, None);
}
