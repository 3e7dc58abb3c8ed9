//! Link management service
//!
//! The operations a presentation layer calls: list the merged view, create,
//! edit, delete, settings, export. Validation faults are returned to the
//! caller; nothing is written when a request is rejected.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use super::baseline::{BaselineSource, fetch_baseline};
use super::merger::merge;
use super::suggest::{HostnameSuggester, LinkMetadata, MetadataSuggester, suggest_metadata};
use crate::errors::{Result, SluglinkerError};
use crate::storage::{LinkRecord, LinkStore, Settings};
use crate::utils::{generate_random_code, is_valid_slug, normalize_base_url, validate_url};

/// Length of generated slugs
const RANDOM_SLUG_LENGTH: usize = 6;
/// Attempts before giving up on a free random slug
const RANDOM_SLUG_ATTEMPTS: usize = 16;
const SUGGEST_TIMEOUT: Duration = Duration::from_secs(5);

// ============ Request DTOs ============

/// Request to create a new link
#[derive(Debug, Clone, Default)]
pub struct CreateLinkRequest {
    /// Generated when `None` or empty
    pub slug: Option<String>,
    pub original_url: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

/// Edit of an existing link. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct UpdateLinkRequest {
    pub slug: Option<String>,
    pub original_url: Option<String>,
    /// `Some("")` clears the description
    pub description: Option<String>,
    /// `Some(vec![])` clears the tags
    pub tags: Option<Vec<String>>,
}

/// Settings edit. `custom_base_url` is normalized before saving; the
/// integration ids are stored as given (empty clears).
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub custom_base_url: Option<String>,
    pub analytics_id: Option<String>,
    pub suggestion_api_key: Option<String>,
}

// ============ LinkService Implementation ============

pub struct LinkService {
    store: Arc<LinkStore>,
    baseline: Arc<dyn BaselineSource>,
    baseline_timeout: Duration,
    suggester: Arc<dyn MetadataSuggester>,
}

impl LinkService {
    pub fn new(
        store: Arc<LinkStore>,
        baseline: Arc<dyn BaselineSource>,
        baseline_timeout: Duration,
    ) -> Self {
        Self {
            store,
            baseline,
            baseline_timeout,
            suggester: Arc::new(HostnameSuggester),
        }
    }

    pub fn with_suggester(mut self, suggester: Arc<dyn MetadataSuggester>) -> Self {
        self.suggester = suggester;
        self
    }

    pub fn store(&self) -> &Arc<LinkStore> {
        &self.store
    }

    /// Merged view, newest first.
    pub async fn load_all(&self) -> Vec<LinkRecord> {
        let baseline = fetch_baseline(self.baseline.as_ref(), self.baseline_timeout).await;
        merge(&baseline, &self.store.load_links())
    }

    /// Create a new link after checking the slug against the local store.
    pub fn create(&self, req: CreateLinkRequest) -> Result<LinkRecord> {
        let original_url = req.original_url.trim().to_string();
        validate_url(&original_url).map_err(|e| SluglinkerError::invalid_url(e.to_string()))?;

        let slug = match req.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(slug) => {
                Self::check_slug_format(slug)?;
                if self.store.slug_exists(slug, None) {
                    return Err(SluglinkerError::duplicate_slug(format!(
                        "Slug '{}' already exists",
                        slug
                    )));
                }
                slug.to_string()
            }
            None => self.generate_free_slug()?,
        };

        let mut record = LinkRecord::new(uuid::Uuid::new_v4().to_string(), slug, original_url);
        record.description = clean_description(req.description);
        record.tags = clean_tags(req.tags);

        self.store.save_link(record.clone())?;
        info!(
            "LinkService: created '{}' -> '{}' ({})",
            record.slug, record.original_url, record.id
        );
        Ok(record)
    }

    /// Edit and re-save a link. `id`, `created_at` and `clicks` never change.
    ///
    /// A record known only from the baseline gets a local copy, which then
    /// masks the baseline entry in the merged view.
    pub async fn update(&self, id: &str, req: UpdateLinkRequest) -> Result<LinkRecord> {
        let existing = match self.store.find(id) {
            Some(record) => record,
            None => fetch_baseline(self.baseline.as_ref(), self.baseline_timeout)
                .await
                .into_iter()
                .find(|r| r.id == id)
                .ok_or_else(|| SluglinkerError::not_found(format!("Link '{}' not found", id)))?,
        };

        let mut updated = existing;

        if let Some(url) = req.original_url {
            let url = url.trim().to_string();
            validate_url(&url).map_err(|e| SluglinkerError::invalid_url(e.to_string()))?;
            updated.original_url = url;
        }

        if let Some(slug) = req.slug {
            let slug = slug.trim();
            Self::check_slug_format(slug)?;
            if self.store.slug_exists(slug, Some(id)) {
                return Err(SluglinkerError::duplicate_slug(format!(
                    "Slug '{}' already exists",
                    slug
                )));
            }
            updated.slug = slug.to_string();
        }

        if let Some(description) = req.description {
            updated.description = clean_description(Some(description));
        }

        if let Some(tags) = req.tags {
            updated.tags = clean_tags(tags);
        }

        self.store.save_link(updated.clone())?;
        info!("LinkService: updated '{}' ({})", updated.slug, id);
        Ok(updated)
    }

    /// Delete a local record.
    ///
    /// A baseline entry with the same id is untouched and shows up again in
    /// the next merged view.
    pub fn delete(&self, id: &str) -> Result<()> {
        if !self.store.delete_link(id)? {
            return Err(SluglinkerError::not_found(format!(
                "Link '{}' is not in the local store",
                id
            )));
        }
        info!("LinkService: deleted {}", id);
        Ok(())
    }

    pub fn settings(&self) -> Settings {
        self.store.load_settings()
    }

    pub fn update_settings(&self, update: SettingsUpdate) -> Result<Settings> {
        let mut settings = self.store.load_settings();

        if let Some(raw) = update.custom_base_url {
            settings.custom_base_url = normalize_base_url(&raw)
                .map_err(|e| SluglinkerError::invalid_url(e.to_string()))?;
        }
        if let Some(id) = update.analytics_id {
            settings.analytics_id = non_empty(id);
        }
        if let Some(key) = update.suggestion_api_key {
            settings.suggestion_api_key = non_empty(key);
        }

        self.store.save_settings(&settings)?;
        debug!("Settings saved: base_url={:?}", settings.custom_base_url);
        Ok(settings)
    }

    /// The merged view in the baseline file format, ready to ship as the
    /// next baseline.
    pub async fn export(&self) -> Result<String> {
        let links = self.load_all().await;
        Ok(serde_json::to_string_pretty(&links)?)
    }

    /// Advisory description and tags for `url`.
    pub async fn suggest(&self, url: &str) -> LinkMetadata {
        suggest_metadata(self.suggester.as_ref(), url, SUGGEST_TIMEOUT).await
    }

    fn check_slug_format(slug: &str) -> Result<()> {
        if is_valid_slug(slug) {
            Ok(())
        } else {
            Err(SluglinkerError::validation(format!(
                "Invalid slug '{}'. Only ASCII letters, digits, '-', '_' and '.' are allowed.",
                slug
            )))
        }
    }

    fn generate_free_slug(&self) -> Result<String> {
        for _ in 0..RANDOM_SLUG_ATTEMPTS {
            let slug = generate_random_code(RANDOM_SLUG_LENGTH);
            if !self.store.slug_exists(&slug, None) {
                return Ok(slug);
            }
        }
        Err(SluglinkerError::validation(
            "Could not generate a free slug, please choose one",
        ))
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn clean_description(description: Option<String>) -> Option<String> {
    description.and_then(non_empty)
}

fn clean_tags(tags: Vec<String>) -> Option<Vec<String>> {
    let tags: Vec<String> = tags.into_iter().filter_map(non_empty).collect();
    (!tags.is_empty()).then_some(tags)
}
