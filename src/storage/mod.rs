use std::sync::Arc;

use tracing::info;

use crate::config::{StaticConfig, StorageBackend};

pub mod kv;
pub mod link_store;
pub mod models;

pub use kv::{FileKvStore, KeyValueStore, MemoryKvStore};
pub use link_store::LinkStore;
pub use models::{LinkRecord, Settings};

pub struct StorageFactory;

impl StorageFactory {
    /// Build the configured key-value backend and wrap it in a [`LinkStore`].
    pub fn create(config: &StaticConfig) -> Arc<LinkStore> {
        let kv: Arc<dyn KeyValueStore> = match config.storage.backend {
            StorageBackend::File => Arc::new(FileKvStore::new(&config.storage.data_dir)),
            StorageBackend::Memory => Arc::new(MemoryKvStore::new()),
        };

        info!("Using storage backend: {}", kv.backend_name());

        Arc::new(LinkStore::new(
            kv,
            config.storage.links_key.clone(),
            config.storage.settings_key.clone(),
        ))
    }
}
