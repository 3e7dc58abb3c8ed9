use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::storage::LinkStore;

/// Bumps a record's visit counter after a successful resolution.
///
/// Writes go through the local store only. A matched record that exists only
/// in the baseline has no local counter, so nothing is written for it. Write
/// failures are logged and never stop the redirect.
pub struct ClickCounter {
    store: Arc<LinkStore>,
}

impl ClickCounter {
    pub fn new(store: Arc<LinkStore>) -> Self {
        Self { store }
    }

    /// Returns the new count when a local record was updated.
    pub fn record(&self, id: &str) -> Option<u64> {
        match self.store.increment_clicks(id) {
            Ok(Some(clicks)) => {
                trace!("Click recorded for {} (now {})", id, clicks);
                Some(clicks)
            }
            Ok(None) => {
                debug!("{} is baseline-only, click not persisted", id);
                None
            }
            Err(e) => {
                warn!("Failed to persist click for {}: {}", id, e);
                None
            }
        }
    }
}
