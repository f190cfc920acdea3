//! Report generators.
//!
//! Each report is a sequential crawl built from [`crate::session`] and
//! [`crate::html`]:
//!
//! | Mode | Module | Output |
//! |------|--------|--------|
//! | `recent-releases` | [`recent_releases`] | (link, title, editor/author) |
//! | `version-index` | [`version_index`] | (link, version, status) |
//! | `archive-download` | [`archive_download`] | file under `downloads/` |
//! | `proposal-status-census` | [`pep_census`] | (status, count) + total |
//!
//! A page that fails to fetch is skipped. A page that is fetched but lacks
//! the structure a report depends on ends the run with an error.

pub mod archive_download;
pub mod pep_census;
pub mod recent_releases;
pub mod version_index;

use tracing::info;

use crate::cli::Mode;
use crate::config::ScraperConfig;
use crate::error::Result;
use crate::models::ReportTable;
use crate::progress::Progress;
use crate::session::CachedSession;

/// Run the report selected by `mode`.
///
/// `Ok(None)` means there is nothing to render: the entry page could not be
/// fetched, or the mode only produces a file.
pub async fn run(
    mode: Mode,
    session: &CachedSession,
    config: &ScraperConfig,
    progress: &mut dyn Progress,
) -> Result<Option<ReportTable>> {
    match mode {
        Mode::RecentReleases => recent_releases::run(session, config, progress).await,
        Mode::VersionIndex => version_index::run(session, config).await,
        Mode::ArchiveDownload => {
            if let Some(path) = archive_download::run(session, config).await? {
                info!(path = %path.display(), "Archive ready");
            }
            Ok(None)
        }
        Mode::ProposalStatusCensus => pep_census::run(session, config, progress).await,
    }
}
