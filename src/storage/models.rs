use serde::{Deserialize, Serialize};

/// A single slug → destination mapping.
///
/// Serialized with camelCase keys; the same shape is used for the persisted
/// links record and for the baseline dataset file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRecord {
    /// Merge key. Assigned once at creation, never reused.
    pub id: String,
    pub slug: String,
    pub original_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Epoch milliseconds.
    pub created_at: i64,
    #[serde(default)]
    pub clicks: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl LinkRecord {
    /// New record with `clicks = 0` and `created_at = now`.
    pub fn new(
        id: impl Into<String>,
        slug: impl Into<String>,
        original_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            slug: slug.into(),
            original_url: original_url.into(),
            description: None,
            created_at: chrono::Utc::now().timestamp_millis(),
            clicks: 0,
            tags: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_created_at(mut self, created_at: i64) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn with_clicks(mut self, clicks: u64) -> Self {
        self.clicks = clicks;
        self
    }

    /// `created_at` rendered for humans (UTC)
    pub fn created_at_display(&self) -> String {
        chrono::DateTime::from_timestamp_millis(self.created_at)
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| self.created_at.to_string())
    }
}

/// User settings persisted next to the links record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Normalized: no trailing slash, scheme present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analytics_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion_api_key: Option<String>,
    /// Integration ids this build does not know about are kept as-is.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
