//! Documentation versions listed in the sidebar of the documentation root.
//!
//! The sidebar contains several lists; the one holding the version links is
//! identified by its marker text (`All versions` by default). Every list is
//! scanned before giving up, so a reordered sidebar still works.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use tracing::{debug, info, instrument};

use crate::config::ScraperConfig;
use crate::error::{AppError, Result};
use crate::html::{element_text, find_all, find_tag, require_attr, TagQuery};
use crate::models::ReportTable;
use crate::session::CachedSession;

pub const HEADER: [&str; 3] = ["Documentation link", "Version", "Status"];

static VERSION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Python (?P<version>\d\.\d+) \((?P<status>.*)\)").expect("version pattern is valid")
});

/// A version link as it appears in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionLink {
    pub href: String,
    pub text: String,
}

#[instrument(level = "info", skip_all)]
pub async fn run(session: &CachedSession, config: &ScraperConfig) -> Result<Option<ReportTable>> {
    let Some(body) = session.get_text(&config.main_doc_url).await else {
        return Ok(None);
    };
    let links = version_links(&body, &config.versions_marker)?;
    info!(count = links.len(), "Found version links");

    let mut table = ReportTable::new(HEADER);
    for link in links {
        let (version, status) = parse_version_text(&link.text);
        table.push([link.href, version, status])?;
    }
    Ok(Some(table))
}

/// Links of the first sidebar list whose text contains `marker`.
///
/// # Errors
///
/// [`AppError::Structure`] when no list in the sidebar contains the marker.
pub fn version_links(body: &str, marker: &str) -> Result<Vec<VersionLink>> {
    let document = Html::parse_document(body);
    let sidebar = find_tag(
        document.root_element(),
        &TagQuery::new("div").attr_eq("class", "sphinxsidebarwrapper"),
    )?;

    let lists = find_all(sidebar, &TagQuery::new("ul"));
    let list = lists
        .iter()
        .copied()
        .find(|ul| element_text(*ul).contains(marker))
        .ok_or_else(|| {
            AppError::structure(format!(
                "none of {} sidebar lists contains {marker:?}",
                lists.len()
            ))
        })?;

    find_all(list, &TagQuery::new("a"))
        .into_iter()
        .map(|a| -> Result<VersionLink> {
            Ok(VersionLink {
                href: require_attr(a, "href")?.to_string(),
                text: element_text(a),
            })
        })
        .collect()
}

/// Split `"Python 3.9 (stable)"` into `("3.9", "stable")`.
///
/// Text that does not match comes back verbatim with an empty status.
pub fn parse_version_text(text: &str) -> (String, String) {
    match VERSION_PATTERN.captures(text) {
        Some(caps) => (caps["version"].to_string(), caps["status"].to_string()),
        None => {
            debug!(%text, "Version text without status");
            (text.to_string(), String::new())
        }
    }
}
