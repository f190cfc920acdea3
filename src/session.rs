//! HTTP session with an on-disk response cache.
//!
//! [`CachedSession::get_text`] is the only way report code reads pages. It
//! never fails: network errors and non-success statuses are logged and
//! turned into `None`, and the caller skips that page.
//!
//! # Cache layout
//!
//! ```text
//! <cache_dir>/
//! └── <sha256(url) hex>.json   # CacheEntry { url, status, body, fetched_at }
//! ```
//!
//! Entries do not expire. Only successful responses are stored.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::{debug, error, info, instrument, warn};

use crate::config::ScraperConfig;
use crate::error::Result;

/// Charset assumed when the response does not declare one.
const DEFAULT_CHARSET: &str = "utf-8";

/// A stored response body.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CacheEntry {
    pub url: String,
    pub status: u16,
    pub body: String,
    /// RFC 3339 UTC time the body was fetched.
    pub fetched_at: String,
}

/// Reusable HTTP client whose text responses are cached by URL.
#[derive(Debug, Clone)]
pub struct CachedSession {
    client: Client,
    cache_dir: Option<PathBuf>,
}

impl CachedSession {
    /// Build a session from config, caching under `config.cache_dir()`.
    pub fn from_config(config: &ScraperConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            cache_dir: Some(config.cache_dir()),
        })
    }

    /// Session that always goes to the network.
    #[cfg(test)]
    pub fn without_cache(client: Client) -> Self {
        Self {
            client,
            cache_dir: None,
        }
    }

    pub fn cache_dir(&self) -> Option<&Path> {
        self.cache_dir.as_deref()
    }

    fn entry_path(&self, url: &str) -> Option<PathBuf> {
        let digest = Sha256::digest(url.as_bytes());
        self.cache_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.json", hex::encode(digest))))
    }

    /// Fetch a page as text, from cache when possible.
    ///
    /// The body is decoded as UTF-8 unless the response declares another
    /// charset. Successful responses are written to the cache.
    ///
    /// # Arguments
    ///
    /// * `url` - Absolute URL of the page
    ///
    /// # Returns
    ///
    /// The page body, or `None` (after logging the URL and error) on network
    /// failure or a non-success status. Callers skip the page on `None`.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_text(&self, url: &str) -> Option<String> {
        if let Some(entry) = self.read_cached(url).await {
            debug!("Cache hit");
            return Some(entry.body);
        }

        let (status, body) = match self.fetch_text(url).await {
            Ok(fetched) => fetched,
            Err(e) => {
                error!(%url, error = %e, "Failed to fetch page");
                return None;
            }
        };

        self.write_cached(url, status, &body).await;
        Some(body)
    }

    async fn fetch_text(&self, url: &str) -> std::result::Result<(u16, String), reqwest::Error> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let status = response.status().as_u16();
        Ok((status, response.text_with_charset(DEFAULT_CHARSET).await?))
    }

    /// Raw GET that bypasses the cache. Non-success statuses are errors.
    #[instrument(level = "info", skip(self))]
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        info!(bytes = bytes.len(), "Downloaded");
        Ok(bytes.to_vec())
    }

    /// Drop every cached response.
    #[instrument(level = "info", skip(self))]
    pub async fn clear_cache(&self) -> Result<()> {
        let Some(dir) = &self.cache_dir else {
            return Ok(());
        };
        match fs::remove_dir_all(dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        fs::create_dir_all(dir).await?;
        info!(path = %dir.display(), "Response cache cleared");
        Ok(())
    }

    async fn read_cached(&self, url: &str) -> Option<CacheEntry> {
        let path = self.entry_path(url)?;
        let raw = fs::read(&path).await.ok()?;
        match serde_json::from_slice::<CacheEntry>(&raw) {
            Ok(entry) if entry.url == url => Some(entry),
            Ok(_) => None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring unreadable cache entry");
                None
            }
        }
    }

    async fn write_cached(&self, url: &str, status: u16, body: &str) {
        let Some(path) = self.entry_path(url) else {
            return;
        };
        let entry = CacheEntry {
            url: url.to_string(),
            status,
            body: body.to_string(),
            fetched_at: Utc::now().to_rfc3339(),
        };
        let result = async {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(&path, serde_json::to_vec(&entry)?).await?;
            Ok::<_, crate::error::AppError>(())
        }
        .await;
        if let Err(e) = result {
            warn!(path = %path.display(), error = %e, "Failed to write cache entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn session_in(dir: &Path) -> CachedSession {
        let config = ScraperConfig {
            base_dir: dir.to_path_buf(),
            ..ScraperConfig::default()
        };
        CachedSession::from_config(&config).unwrap()
    }

    #[tokio::test]
    async fn test_get_text_returns_body() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method(GET).path("/page.html");
            then.status(200).body("<h1>Hello</h1>");
        }).await;
        let tmp = tempfile::tempdir().unwrap();
        let session = session_in(tmp.path());

        let body = session.get_text(&server.url("/page.html")).await;
        assert_eq!(body.as_deref(), Some("<h1>Hello</h1>"));
    }

    #[tokio::test]
    async fn test_get_text_decodes_utf8_without_charset_header() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method(GET).path("/ru.html");
            then.status(200)
                .header("Content-Type", "text/html")
                .body("Что нового");
        }).await;
        let session = CachedSession::without_cache(Client::new());

        let body = session.get_text(&server.url("/ru.html")).await;
        assert_eq!(body.as_deref(), Some("Что нового"));
    }

    #[tokio::test]
    async fn test_get_text_serves_second_call_from_cache() {
        let server = MockServer::start_async().await;
        let mock = server.mock_async(|when, then| {
            when.method(GET).path("/cached");
            then.status(200).body("body");
        }).await;
        let tmp = tempfile::tempdir().unwrap();
        let session = session_in(tmp.path());
        let url = server.url("/cached");

        assert_eq!(session.get_text(&url).await.as_deref(), Some("body"));
        assert_eq!(session.get_text(&url).await.as_deref(), Some("body"));
        mock.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_get_text_none_on_error_status() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method(GET).path("/missing");
            then.status(404);
        }).await;
        let tmp = tempfile::tempdir().unwrap();
        let session = session_in(tmp.path());

        assert!(session.get_text(&server.url("/missing")).await.is_none());
        // failures are not cached
        assert_eq!(std::fs::read_dir(tmp.path()).map(|d| d.count()).unwrap_or(0), 0);
    }

    #[tokio::test]
    async fn test_get_text_none_on_connection_error() {
        let session = CachedSession::without_cache(Client::new());
        assert!(session.get_text("http://127.0.0.1:1/unreachable").await.is_none());
    }

    #[tokio::test]
    async fn test_clear_cache_forces_refetch() {
        let server = MockServer::start_async().await;
        let mock = server.mock_async(|when, then| {
            when.method(GET).path("/page");
            then.status(200).body("x");
        }).await;
        let tmp = tempfile::tempdir().unwrap();
        let session = session_in(tmp.path());
        let url = server.url("/page");

        session.get_text(&url).await;
        session.clear_cache().await.unwrap();
        session.get_text(&url).await;
        mock.assert_hits_async(2).await;
    }

    #[tokio::test]
    async fn test_clear_cache_on_missing_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let session = session_in(&tmp.path().join("nowhere"));
        session.clear_cache().await.unwrap();
        assert!(session.cache_dir().unwrap().is_dir());
    }

    #[tokio::test]
    async fn test_get_bytes_errors_on_failure_status() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method(GET).path("/archive.zip");
            then.status(500);
        }).await;
        let session = CachedSession::without_cache(Client::new());
        assert!(session.get_bytes(&server.url("/archive.zip")).await.is_err());
    }

    #[tokio::test]
    async fn test_cache_entry_records_response_status() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method(GET).path("/accepted");
            then.status(203).body("partial");
        }).await;
        let tmp = tempfile::tempdir().unwrap();
        let session = session_in(tmp.path());
        let url = server.url("/accepted");

        assert_eq!(session.get_text(&url).await.as_deref(), Some("partial"));

        let raw = std::fs::read(session.entry_path(&url).unwrap()).unwrap();
        let entry: CacheEntry = serde_json::from_slice(&raw).unwrap();
        assert_eq!(entry.status, 203);
        assert_eq!(entry.url, url);
        assert_eq!(entry.body, "partial");
    }
}
