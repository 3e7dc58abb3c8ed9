//! Analytics collaborator
//!
//! An optional event sink notified on successful redirects. Delivery is
//! fire-and-forget: the sequencer never waits on it and ignores failures.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

/// Event name sent when a slug resolves and the redirect is scheduled.
pub const REDIRECT_EVENT: &str = "redirect";

#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    async fn track(
        &self,
        event_name: &str,
        slug: &str,
        destination_url: &str,
    ) -> anyhow::Result<()>;
}

/// Drops every event.
pub struct NoopAnalytics;

impl NoopAnalytics {
    pub fn arc() -> Arc<dyn AnalyticsSink> {
        Arc::new(NoopAnalytics)
    }
}

#[async_trait]
impl AnalyticsSink for NoopAnalytics {
    async fn track(
        &self,
        _event_name: &str,
        _slug: &str,
        _destination_url: &str,
    ) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Emits each event as a structured log line, tagged with the configured
/// analytics id when there is one.
pub struct TracingAnalytics {
    site_id: Option<String>,
}

impl TracingAnalytics {
    pub fn new(site_id: Option<String>) -> Self {
        Self { site_id }
    }
}

#[async_trait]
impl AnalyticsSink for TracingAnalytics {
    async fn track(
        &self,
        event_name: &str,
        slug: &str,
        destination_url: &str,
    ) -> anyhow::Result<()> {
        info!(
            target: "sluglinker::analytics",
            event = event_name,
            slug = slug,
            destination = destination_url,
            site_id = self.site_id.as_deref().unwrap_or("-"),
            "analytics event"
        );
        Ok(())
    }
}

/// Dispatch an event without waiting for it.
pub fn dispatch(
    sink: Arc<dyn AnalyticsSink>,
    event_name: &'static str,
    slug: String,
    destination_url: String,
) {
    tokio::spawn(async move {
        if let Err(e) = sink.track(event_name, &slug, &destination_url).await {
            debug!("Analytics event '{}' for '{}' dropped: {}", event_name, slug, e);
        }
    });
}
