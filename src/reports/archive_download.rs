//! Download the packaged documentation archive.
//!
//! The download page lists archives in a `table.docutils`; the first link
//! ending in the configured extension is fetched as raw bytes (never through
//! the response cache) and written to `<base_dir>/downloads/<file name>`,
//! replacing any earlier copy.

use std::path::PathBuf;

use regex::Regex;
use scraper::Html;
use tokio::fs;
use tracing::{info, instrument};

use crate::config::ScraperConfig;
use crate::error::Result;
use crate::html::{find_tag, require_attr, TagQuery};
use crate::session::CachedSession;
use crate::utils::{ensure_dir, join_url, last_path_segment};

/// Fetch the archive and return where it was saved.
///
/// `Ok(None)` when the download page itself cannot be fetched.
#[instrument(level = "info", skip_all)]
pub async fn run(session: &CachedSession, config: &ScraperConfig) -> Result<Option<PathBuf>> {
    let downloads_url = join_url(&config.main_doc_url, "download.html")?;
    let Some(body) = session.get_text(&downloads_url).await else {
        return Ok(None);
    };

    let href = archive_href(&body, &config.archive_extension)?;
    let archive_url = join_url(&downloads_url, &href)?;
    let filename = last_path_segment(&archive_url).to_string();

    let downloads_dir = config.downloads_dir();
    ensure_dir(&downloads_dir).await?;
    let archive_path = downloads_dir.join(&filename);

    let bytes = session.get_bytes(&archive_url).await?;
    fs::write(&archive_path, bytes).await?;

    info!(path = %archive_path.display(), url = %archive_url, "Archive downloaded and saved");
    Ok(Some(archive_path))
}

/// `href` of the first archive link with the given extension in the download table.
pub fn archive_href(body: &str, extension: &str) -> Result<String> {
    let pattern = Regex::new(&format!(r".+\.{}$", regex::escape(extension)))?;
    let document = Html::parse_document(body);
    let table = find_tag(
        document.root_element(),
        &TagQuery::new("table").attr_eq("class", "docutils"),
    )?;
    let link = find_tag(table, &TagQuery::new("a").attr_matches("href", pattern))?;
    Ok(require_attr(link, "href")?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use httpmock::prelude::*;

    const DOWNLOAD_PAGE: &str = r#"<html><body>
        <p><a href="archives/outside-table.zip">not this one</a></p>
        <table class="docutils align-default">
          <tr><td>PDF (A4)</td>
              <td><a href="archives/python-3.12-docs-pdf-a4.tar.bz2">bz2</a></td>
              <td><a href="archives/python-3.12-docs-pdf-a4.zip">zip</a></td></tr>
        </table>
    </body></html>"#;

    #[test]
    fn test_archive_href_picks_first_zip_in_table() {
        assert_eq!(
            archive_href(DOWNLOAD_PAGE, "zip").unwrap(),
            "archives/python-3.12-docs-pdf-a4.zip"
        );
        assert_eq!(
            archive_href(DOWNLOAD_PAGE, "bz2").unwrap(),
            "archives/python-3.12-docs-pdf-a4.tar.bz2"
        );
    }

    #[test]
    fn test_archive_href_without_matching_link_is_fatal() {
        let err = archive_href(DOWNLOAD_PAGE, "epub").unwrap_err();
        match err {
            AppError::TagNotFound { query, .. } => assert!(query.contains(r"\.epub$")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_run_writes_and_overwrites_archive() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/3/download.html");
                then.status(200).body(DOWNLOAD_PAGE);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/3/archives/python-3.12-docs-pdf-a4.zip");
                then.status(200).body(b"PK\x03\x04new");
            })
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let config = ScraperConfig {
            main_doc_url: server.url("/3/"),
            base_dir: tmp.path().to_path_buf(),
            ..ScraperConfig::default()
        };
        let downloads = config.downloads_dir();
        std::fs::create_dir_all(&downloads).unwrap();
        std::fs::write(downloads.join("python-3.12-docs-pdf-a4.zip"), b"stale contents").unwrap();

        let session = CachedSession::without_cache(reqwest::Client::new());
        let path = run(&session, &config).await.unwrap().unwrap();

        assert_eq!(path, downloads.join("python-3.12-docs-pdf-a4.zip"));
        assert_eq!(std::fs::read(&path).unwrap(), b"PK\x03\x04new");
        assert_eq!(std::fs::read_dir(&downloads).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_run_creates_downloads_dir() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/3/download.html");
                then.status(200).body(DOWNLOAD_PAGE);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/3/archives/python-3.12-docs-pdf-a4.zip");
                then.status(200).body("zip");
            })
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let config = ScraperConfig {
            main_doc_url: server.url("/3/"),
            base_dir: tmp.path().join("fresh"),
            ..ScraperConfig::default()
        };
        let session = CachedSession::without_cache(reqwest::Client::new());

        run(&session, &config).await.unwrap();
        assert!(config.downloads_dir().join("python-3.12-docs-pdf-a4.zip").is_file());
    }
}
