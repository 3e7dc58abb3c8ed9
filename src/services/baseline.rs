//! Baseline dataset fetch
//!
//! The baseline is a JSON array of link records shipped alongside the
//! application. It is fetched once per bootstrap. Every failure (missing
//! file, non-success HTTP status, malformed JSON, timeout) degrades to an
//! empty baseline so the engine keeps working from the local store alone.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};
use ureq::Agent;

use crate::config::BaselineConfig;
use crate::errors::{Result, SluglinkerError};
use crate::storage::LinkRecord;

/// Where baseline records come from.
#[async_trait]
pub trait BaselineSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<LinkRecord>>;

    /// 用于日志
    fn describe(&self) -> String;
}

/// No baseline at all.
pub struct EmptyBaseline;

#[async_trait]
impl BaselineSource for EmptyBaseline {
    async fn fetch(&self) -> Result<Vec<LinkRecord>> {
        Ok(Vec::new())
    }

    fn describe(&self) -> String {
        "none".to_string()
    }
}

/// Fixed in-memory records.
pub struct StaticBaseline {
    records: Vec<LinkRecord>,
}

impl StaticBaseline {
    pub fn new(records: Vec<LinkRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl BaselineSource for StaticBaseline {
    async fn fetch(&self) -> Result<Vec<LinkRecord>> {
        Ok(self.records.clone())
    }

    fn describe(&self) -> String {
        format!("static ({} records)", self.records.len())
    }
}

/// Baseline file on the local filesystem.
pub struct FileBaseline {
    path: PathBuf,
}

impl FileBaseline {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl BaselineSource for FileBaseline {
    async fn fetch(&self) -> Result<Vec<LinkRecord>> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            SluglinkerError::baseline_fetch(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

/// HTTP 请求超时时间（在外层 timeout 之外的兜底）
const HTTP_TIMEOUT_SECS: u64 = 10;

static HTTP_AGENT: OnceLock<Agent> = OnceLock::new();

fn get_agent() -> &'static Agent {
    HTTP_AGENT.get_or_init(|| {
        Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(HTTP_TIMEOUT_SECS)))
            .build()
            .into()
    })
}

/// Baseline served over HTTP(S).
pub struct HttpBaseline {
    url: String,
}

impl HttpBaseline {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    fn fetch_sync(url: String) -> Result<Vec<LinkRecord>> {
        let resp = get_agent().get(&url).call().map_err(|e| {
            SluglinkerError::baseline_fetch(format!("Request to \"{}\" failed: {}", url, e))
        })?;

        resp.into_body()
            .read_json::<Vec<LinkRecord>>()
            .map_err(|e| {
                SluglinkerError::serialization(format!(
                    "Response from \"{}\" is not a link array: {}",
                    url, e
                ))
            })
    }
}

#[async_trait]
impl BaselineSource for HttpBaseline {
    async fn fetch(&self) -> Result<Vec<LinkRecord>> {
        let url = self.url.clone();
        // ureq 是同步客户端，放到阻塞线程池执行
        tokio::task::spawn_blocking(move || Self::fetch_sync(url))
            .await
            .map_err(|e| SluglinkerError::baseline_fetch(format!("Fetch task failed: {}", e)))?
    }

    fn describe(&self) -> String {
        format!("http {}", self.url)
    }
}

/// Pick a source from configuration: empty → none, `http(s)://` → HTTP,
/// anything else → file path.
pub fn source_from_config(config: &BaselineConfig) -> Arc<dyn BaselineSource> {
    let source = config.source.trim();
    if source.is_empty() {
        Arc::new(EmptyBaseline)
    } else if source.starts_with("http://") || source.starts_with("https://") {
        Arc::new(HttpBaseline::new(source))
    } else {
        Arc::new(FileBaseline::new(source))
    }
}

/// Fetch the baseline, never failing.
///
/// Click counts are local-only state, so they are reset on every record
/// that comes from the baseline.
pub async fn fetch_baseline(source: &dyn BaselineSource, timeout: Duration) -> Vec<LinkRecord> {
    let result = match tokio::time::timeout(timeout, source.fetch()).await {
        Ok(result) => result,
        Err(_) => Err(SluglinkerError::baseline_fetch(format!(
            "Timed out after {}ms",
            timeout.as_millis()
        ))),
    };

    match result {
        Ok(mut records) => {
            for record in &mut records {
                record.clicks = 0;
            }
            info!(
                "Loaded {} baseline records from {}",
                records.len(),
                source.describe()
            );
            records
        }
        Err(e) => {
            warn!(
                "Baseline {} unavailable, continuing with local store only: {}",
                source.describe(),
                e
            );
            debug!("Baseline error code: {}", e.code());
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct SlowBaseline;

    #[async_trait]
    impl BaselineSource for SlowBaseline {
        async fn fetch(&self) -> Result<Vec<LinkRecord>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(vec![LinkRecord::new("1", "late", "https://x.com")])
        }

        fn describe(&self) -> String {
            "slow".into()
        }
    }

    #[tokio::test]
    async fn test_file_baseline_loads_records() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("links.json");
        std::fs::write(
            &path,
            r#"[{"id":"1","slug":"abc","originalUrl":"https://x.com","createdAt":100,"clicks":4}]"#,
        )
        .unwrap();

        let records = fetch_baseline(&FileBaseline::new(&path), Duration::from_secs(1)).await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].slug, "abc");
        assert_eq!(records[0].clicks, 0, "clicks never come from the baseline");
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let source = FileBaseline::new(temp.path().join("absent.json"));
        assert!(source.fetch().await.is_err());
        assert!(fetch_baseline(&source, Duration::from_secs(1)).await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("links.json");
        std::fs::write(&path, r#"{"not":"an array"}"#).unwrap();

        let records = fetch_baseline(&FileBaseline::new(&path), Duration::from_secs(1)).await;
        assert!(records.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_empty() {
        let records = fetch_baseline(&SlowBaseline, Duration::from_millis(50)).await;
        assert!(records.is_empty());
    }

    #[test]
    fn test_source_from_config() {
        let mut config = BaselineConfig::default();
        assert!(source_from_config(&config).describe().starts_with("file"));

        config.source = "https://cdn.example/links.json".into();
        assert!(source_from_config(&config).describe().starts_with("http"));

        config.source = "  ".into();
        assert_eq!(source_from_config(&config).describe(), "none");
    }
}
