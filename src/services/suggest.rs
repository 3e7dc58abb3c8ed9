//! Metadata suggestion
//!
//! Advisory description/tags for a destination URL. Nothing depends on it
//! for correctness: any failure or timeout yields [`LinkMetadata::fallback`].

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkMetadata {
    pub description: String,
    pub tags: Vec<String>,
}

impl LinkMetadata {
    pub fn fallback() -> Self {
        Self {
            description: "Saved link".to_string(),
            tags: vec!["general".to_string()],
        }
    }
}

#[async_trait]
pub trait MetadataSuggester: Send + Sync {
    async fn suggest(&self, url: &str) -> anyhow::Result<LinkMetadata>;
}

/// Offline suggester deriving metadata from the URL's host name.
pub struct HostnameSuggester;

#[async_trait]
impl MetadataSuggester for HostnameSuggester {
    async fn suggest(&self, url: &str) -> anyhow::Result<LinkMetadata> {
        let parsed = Url::parse(url)?;
        let host = parsed
            .host_str()
            .ok_or_else(|| anyhow::anyhow!("URL has no host: {}", url))?;
        let host = host.strip_prefix("www.").unwrap_or(host);

        // 取倒数第二段作为标签，如 docs.github.com -> github
        let labels: Vec<&str> = host.split('.').collect();
        let tag = if labels.len() >= 2 {
            labels[labels.len() - 2]
        } else {
            host
        };

        Ok(LinkMetadata {
            description: format!("Link to {}", host),
            tags: vec![tag.to_lowercase()],
        })
    }
}

/// Ask `suggester`, falling back on error or timeout.
pub async fn suggest_metadata(
    suggester: &dyn MetadataSuggester,
    url: &str,
    timeout: Duration,
) -> LinkMetadata {
    match tokio::time::timeout(timeout, suggester.suggest(url)).await {
        Ok(Ok(metadata)) => metadata,
        Ok(Err(e)) => {
            debug!("Metadata suggestion for {} failed: {}", url, e);
            LinkMetadata::fallback()
        }
        Err(_) => {
            debug!("Metadata suggestion for {} timed out", url);
            LinkMetadata::fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingSuggester;

    #[async_trait]
    impl MetadataSuggester for FailingSuggester {
        async fn suggest(&self, _url: &str) -> anyhow::Result<LinkMetadata> {
            anyhow::bail!("service unavailable")
        }
    }

    #[tokio::test]
    async fn test_hostname_suggester() {
        let meta = suggest_metadata(
            &HostnameSuggester,
            "https://www.docs.GitHub.com/en",
            Duration::from_secs(1),
        )
        .await;
        assert_eq!(meta.description, "Link to docs.github.com");
        assert_eq!(meta.tags, vec!["github"]);
    }

    #[tokio::test]
    async fn test_fallback_on_failure() {
        let meta =
            suggest_metadata(&FailingSuggester, "https://x.com", Duration::from_secs(1)).await;
        assert_eq!(meta, LinkMetadata::fallback());
    }

    #[tokio::test]
    async fn test_fallback_on_unparseable_url() {
        let meta = suggest_metadata(&HostnameSuggester, "not a url", Duration::from_secs(1)).await;
        assert_eq!(meta, LinkMetadata::fallback());
    }
}
