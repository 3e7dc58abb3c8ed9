//! 存储层集成测试
//!
//! FileKvStore 持久化、损坏数据降级以及 StorageFactory 的后端选择。

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use sluglinker::config::{StaticConfig, StorageBackend};
use sluglinker::services::{FileBaseline, LinkService, fetch_baseline};
use sluglinker::storage::{
    FileKvStore, KeyValueStore, LinkRecord, LinkStore, Settings, StorageFactory,
};

fn file_store(dir: &TempDir) -> LinkStore {
    LinkStore::with_default_keys(Arc::new(FileKvStore::new(dir.path())))
}

#[test]
fn test_links_survive_reopen() {
    let temp = TempDir::new().unwrap();

    {
        let store = file_store(&temp);
        store
            .save_link(LinkRecord::new("1", "abc", "https://x.com").with_created_at(100))
            .unwrap();
        store.increment_clicks("1").unwrap();
    }

    let reopened = file_store(&temp);
    let links = reopened.load_links();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].clicks, 1);
    assert_eq!(reopened.backend_name(), "file");
}

#[test]
fn test_deleting_last_link_removes_file() {
    let temp = TempDir::new().unwrap();
    let store = file_store(&temp);
    store
        .save_link(LinkRecord::new("1", "abc", "https://x.com"))
        .unwrap();
    let links_file = temp.path().join("sluglinker_links.json");
    assert!(links_file.exists());

    assert!(store.delete_link("1").unwrap());
    assert!(!links_file.exists());
    assert!(store.load_links().is_empty());
}

#[test]
fn test_corrupt_links_file_reads_as_empty() {
    let temp = TempDir::new().unwrap();
    let kv = Arc::new(FileKvStore::new(temp.path()));
    kv.set("sluglinker_links", "{ not json").unwrap();
    kv.set("sluglinker_settings", "[1, 2]").unwrap();

    let store = LinkStore::with_default_keys(kv);
    assert!(store.load_links().is_empty());
    assert_eq!(store.load_settings(), Settings::default());

    // 写入会覆盖损坏内容
    store
        .save_link(LinkRecord::new("1", "abc", "https://x.com"))
        .unwrap();
    assert_eq!(store.load_links().len(), 1);
}

#[test]
fn test_settings_keep_unknown_fields() {
    let temp = TempDir::new().unwrap();
    let kv = Arc::new(FileKvStore::new(temp.path()));
    kv.set(
        "sluglinker_settings",
        r#"{"customBaseUrl":"https://go.example","futureIntegration":{"enabled":true}}"#,
    )
    .unwrap();

    let store = LinkStore::with_default_keys(kv.clone());
    let mut settings = store.load_settings();
    assert_eq!(settings.custom_base_url.as_deref(), Some("https://go.example"));
    settings.analytics_id = Some("site".into());
    store.save_settings(&settings).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&kv.get("sluglinker_settings").unwrap()).unwrap();
    assert_eq!(raw["futureIntegration"]["enabled"], true);
    assert_eq!(raw["analyticsId"], "site");
}

#[test]
fn test_factory_uses_configured_keys_and_backend() {
    let temp = TempDir::new().unwrap();
    let mut config = StaticConfig::default();
    config.storage.backend = StorageBackend::File;
    config.storage.data_dir = temp.path().display().to_string();
    config.storage.links_key = "custom_links".into();

    let store = StorageFactory::create(&config);
    store
        .save_link(LinkRecord::new("1", "abc", "https://x.com"))
        .unwrap();
    assert!(temp.path().join("custom_links.json").exists());

    config.storage.backend = StorageBackend::Memory;
    let memory = StorageFactory::create(&config);
    assert_eq!(memory.backend_name(), "memory");
    assert!(memory.load_links().is_empty());
}

#[tokio::test]
async fn test_file_baseline_merges_with_file_store() {
    let temp = TempDir::new().unwrap();
    let baseline_path = temp.path().join("baseline.json");
    std::fs::write(
        &baseline_path,
        r#"[
            {"id":"1","slug":"abc","originalUrl":"https://x.com","createdAt":100,"clicks":42},
            {"id":"2","slug":"def","originalUrl":"https://y.com","createdAt":200}
        ]"#,
    )
    .unwrap();

    let baseline = fetch_baseline(&FileBaseline::new(&baseline_path), Duration::from_secs(3)).await;
    assert_eq!(baseline.len(), 2);
    assert!(baseline.iter().all(|r| r.clicks == 0));

    let store = Arc::new(file_store(&temp));
    store
        .save_link(
            LinkRecord::new("1", "abc", "https://local.example")
                .with_created_at(100)
                .with_clicks(7),
        )
        .unwrap();

    let service = LinkService::new(
        store,
        Arc::new(FileBaseline::new(&baseline_path)),
        Duration::from_secs(3),
    );
    let merged = service.load_all().await;
    let view: Vec<(&str, &str, u64)> = merged
        .iter()
        .map(|r| (r.id.as_str(), r.original_url.as_str(), r.clicks))
        .collect();
    assert_eq!(
        view,
        vec![("2", "https://y.com", 0), ("1", "https://local.example", 7)]
    );
}
