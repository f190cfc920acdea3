//! "What's new" release notes.
//!
//! Reads the `whatsnew/` landing page of the documentation, follows every
//! per-version entry of its table of contents and records the page title
//! together with the first definition list (editor and author credits).
//!
//! # Page structure relied on
//!
//! ```text
//! section#what-s-new-in-python
//! └── div.toctree-wrapper
//!     └── li.toctree-l1 > a[href]      # one per version
//! ```

use scraper::Html;
use tracing::{info, instrument};

use crate::config::ScraperConfig;
use crate::error::Result;
use crate::html::{element_text, find_all, find_tag, require_attr, TagQuery};
use crate::models::ReportTable;
use crate::progress::Progress;
use crate::session::CachedSession;
use crate::utils::{flatten_newlines, join_url};

pub const HEADER: [&str; 3] = ["Article link", "Title", "Editor, author"];

/// Crawl every release-notes page linked from the landing page.
///
/// Returns `Ok(None)` when the landing page cannot be fetched. Entry pages
/// that fail to fetch are skipped; entry pages lacking `h1` or `dl` abort
/// the run.
#[instrument(level = "info", skip_all)]
pub async fn run(
    session: &CachedSession,
    config: &ScraperConfig,
    progress: &mut dyn Progress,
) -> Result<Option<ReportTable>> {
    let whats_new_url = join_url(&config.main_doc_url, "whatsnew/")?;
    let Some(body) = session.get_text(&whats_new_url).await else {
        return Ok(None);
    };
    let links = release_links(&body, &whats_new_url)?;
    info!(count = links.len(), "Found release notes entries");

    let mut table = ReportTable::new(HEADER);
    progress.begin(links.len());
    for link in links {
        if let Some(page) = session.get_text(&link).await {
            let (title, credits) = release_summary(&page)?;
            table.push([link.clone(), title, credits])?;
        }
        progress.item_done(&link);
    }
    progress.finish();

    info!(rows = table.len(), "Collected release notes");
    Ok(Some(table))
}

/// Absolute URLs of the per-version entries, in page order.
pub fn release_links(body: &str, base_url: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(body);
    let main_section = find_tag(
        document.root_element(),
        &TagQuery::new("section").attr_eq("id", "what-s-new-in-python"),
    )?;
    let toc = find_tag(main_section, &TagQuery::new("div").attr_eq("class", "toctree-wrapper"))?;

    find_all(toc, &TagQuery::new("li").attr_eq("class", "toctree-l1"))
        .into_iter()
        .map(|item| -> Result<String> {
            let anchor = find_tag(item, &TagQuery::new("a"))?;
            join_url(base_url, require_attr(anchor, "href")?)
        })
        .collect()
}

/// Title and flattened credits text of one release-notes page.
pub fn release_summary(body: &str) -> Result<(String, String)> {
    let document = Html::parse_document(body);
    let root = document.root_element();
    let h1 = find_tag(root, &TagQuery::new("h1"))?;
    let dl = find_tag(root, &TagQuery::new("dl"))?;
    Ok((element_text(h1), flatten_newlines(&element_text(dl))))
}
