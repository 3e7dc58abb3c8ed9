//! Persistent link store
//!
//! Holds two independently keyed JSON records in a [`KeyValueStore`]: the
//! link collection and the settings object. Every mutating call is a single
//! read-modify-write performed under one lock. Decode faults never reach the
//! caller; they degrade to an empty collection or default settings.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use super::kv::KeyValueStore;
use super::models::{LinkRecord, Settings};
use crate::errors::Result;

pub const DEFAULT_LINKS_KEY: &str = "sluglinker_links";
pub const DEFAULT_SETTINGS_KEY: &str = "sluglinker_settings";

pub struct LinkStore {
    kv: Arc<dyn KeyValueStore>,
    links_key: String,
    settings_key: String,
    write_lock: Mutex<()>,
}

impl LinkStore {
    pub fn new(
        kv: Arc<dyn KeyValueStore>,
        links_key: impl Into<String>,
        settings_key: impl Into<String>,
    ) -> Self {
        Self {
            kv,
            links_key: links_key.into(),
            settings_key: settings_key.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn with_default_keys(kv: Arc<dyn KeyValueStore>) -> Self {
        Self::new(kv, DEFAULT_LINKS_KEY, DEFAULT_SETTINGS_KEY)
    }

    pub fn backend_name(&self) -> &'static str {
        self.kv.backend_name()
    }

    // ============ Links ============

    /// All local records in stored order. No sorting happens here.
    pub fn load_links(&self) -> Vec<LinkRecord> {
        let Some(raw) = self.kv.get(&self.links_key) else {
            trace!("No links record under '{}'", self.links_key);
            return Vec::new();
        };

        match serde_json::from_str::<Vec<LinkRecord>>(&raw) {
            Ok(links) => links,
            Err(e) => {
                warn!(
                    "Links record '{}' is not valid JSON, treating as empty: {}",
                    self.links_key, e
                );
                Vec::new()
            }
        }
    }

    fn write_links(&self, links: &[LinkRecord]) -> Result<()> {
        let json = serde_json::to_string(links)?;
        self.kv.set(&self.links_key, &json)
    }

    /// Insert-or-replace by `id`. New records are prepended.
    pub fn save_link(&self, record: LinkRecord) -> Result<()> {
        let _guard = self.write_lock.lock();
        let mut links = self.load_links();

        match links.iter_mut().find(|l| l.id == record.id) {
            Some(existing) => {
                debug!("Replacing local link '{}' ({})", record.slug, record.id);
                *existing = record;
            }
            None => {
                debug!("Inserting local link '{}' ({})", record.slug, record.id);
                links.insert(0, record);
            }
        }

        self.write_links(&links)
    }

    /// Remove by identity. Returns whether a record was removed.
    ///
    /// Deleting the last record drops the links key altogether.
    pub fn delete_link(&self, id: &str) -> Result<bool> {
        let _guard = self.write_lock.lock();
        let mut links = self.load_links();
        let before = links.len();
        links.retain(|l| l.id != id);

        if links.len() == before {
            debug!("Delete requested for unknown id {}", id);
            return Ok(false);
        }

        if links.is_empty() {
            // 最后一条删除后移除整个键，等价于空集合
            self.kv.remove(&self.links_key)?;
        } else {
            self.write_links(&links)?;
        }
        Ok(true)
    }

    /// Bump `clicks` by one. Returns the new count, or `None` when `id` is
    /// not in the local store (nothing is written in that case).
    pub fn increment_clicks(&self, id: &str) -> Result<Option<u64>> {
        let _guard = self.write_lock.lock();
        let mut links = self.load_links();

        let Some(record) = links.iter_mut().find(|l| l.id == id) else {
            trace!("increment_clicks: id {} not in local store", id);
            return Ok(None);
        };
        record.clicks = record.clicks.saturating_add(1);
        let clicks = record.clicks;

        self.write_links(&links)?;
        Ok(Some(clicks))
    }

    /// Whether any local record other than `exclude_id` uses `slug`.
    pub fn slug_exists(&self, slug: &str, exclude_id: Option<&str>) -> bool {
        self.load_links()
            .iter()
            .any(|l| l.slug == slug && Some(l.id.as_str()) != exclude_id)
    }

    pub fn find(&self, id: &str) -> Option<LinkRecord> {
        self.load_links().into_iter().find(|l| l.id == id)
    }

    // ============ Settings ============

    pub fn load_settings(&self) -> Settings {
        let Some(raw) = self.kv.get(&self.settings_key) else {
            return Settings::default();
        };

        match serde_json::from_str::<Settings>(&raw) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(
                    "Settings record '{}' is not valid JSON, using defaults: {}",
                    self.settings_key, e
                );
                Settings::default()
            }
        }
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        let _guard = self.write_lock.lock();
        let json = serde_json::to_string(settings)?;
        self.kv.set(&self.settings_key, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::kv::MemoryKvStore;

    fn store() -> (LinkStore, Arc<MemoryKvStore>) {
        let kv = Arc::new(MemoryKvStore::new());
        (LinkStore::with_default_keys(kv.clone()), kv)
    }

    fn record(id: &str, slug: &str) -> LinkRecord {
        LinkRecord::new(id, slug, format!("https://{}.example", slug))
    }

    #[test]
    fn test_save_prepends_new_records() {
        let (store, _) = store();
        store.save_link(record("1", "a")).unwrap();
        store.save_link(record("2", "b")).unwrap();

        let ids: Vec<_> = store.load_links().into_iter().map(|l| l.id).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[test]
    fn test_save_replaces_in_place() {
        let (store, _) = store();
        store.save_link(record("1", "a")).unwrap();
        store.save_link(record("2", "b")).unwrap();
        store
            .save_link(record("1", "a").with_description("edited"))
            .unwrap();

        let links = store.load_links();
        assert_eq!(links.len(), 2);
        assert_eq!(links[1].id, "1");
        assert_eq!(links[1].description.as_deref(), Some("edited"));
    }

    #[test]
    fn test_delete_link() {
        let (store, kv) = store();
        store.save_link(record("1", "a")).unwrap();
        store.save_link(record("2", "b")).unwrap();

        assert!(store.delete_link("1").unwrap());
        assert!(!store.delete_link("1").unwrap());
        assert_eq!(store.load_links().len(), 1);

        // 删除最后一条后键被移除
        assert!(store.delete_link("2").unwrap());
        assert!(kv.get(DEFAULT_LINKS_KEY).is_none());
        assert!(store.load_links().is_empty());
    }

    #[test]
    fn test_increment_clicks_absent_is_noop() {
        let (store, kv) = store();
        assert_eq!(store.increment_clicks("missing").unwrap(), None);
        assert!(kv.get(DEFAULT_LINKS_KEY).is_none());
    }

    #[test]
    fn test_increment_clicks_counts_exactly() {
        let (store, _) = store();
        store.save_link(record("1", "a")).unwrap();
        store.save_link(record("2", "b")).unwrap();

        for _ in 0..5 {
            store.increment_clicks("1").unwrap();
            store.increment_clicks("2").unwrap();
        }
        store.increment_clicks("1").unwrap();

        assert_eq!(store.find("1").unwrap().clicks, 6);
        assert_eq!(store.find("2").unwrap().clicks, 5);
    }

    #[test]
    fn test_slug_exists_with_exclusion() {
        let (store, _) = store();
        store.save_link(record("1", "abc")).unwrap();

        assert!(store.slug_exists("abc", None));
        assert!(!store.slug_exists("abc", Some("1")));
        assert!(store.slug_exists("abc", Some("2")));
        assert!(!store.slug_exists("ABC", None));
    }

    #[test]
    fn test_corrupt_records_degrade_to_defaults() {
        let (store, kv) = store();
        kv.set(DEFAULT_LINKS_KEY, "{not json").unwrap();
        kv.set(DEFAULT_SETTINGS_KEY, "[1,2,3]").unwrap();

        assert!(store.load_links().is_empty());
        assert_eq!(store.load_settings(), Settings::default());
    }

    #[test]
    fn test_settings_roundtrip() {
        let (store, _) = store();
        let settings = Settings {
            custom_base_url: Some("https://s.example".into()),
            analytics_id: Some("site-1".into()),
            ..Default::default()
        };
        store.save_settings(&settings).unwrap();
        assert_eq!(store.load_settings(), settings);
    }
}
