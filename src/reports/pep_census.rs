//! PEP status census.
//!
//! The PEP index lists every proposal in several tables. Each row carries a
//! type+status abbreviation (`SF` = Standards Track, Final) and a link to
//! the PEP page. The census visits every linked page, reads the status shown
//! there and counts PEPs per status. A status that disagrees with the index
//! abbreviation is logged, not fatal.
//!
//! The last two tables of the index are the numerical/reserved listings and
//! are not scanned.

use scraper::Html;
use tracing::{debug, info, instrument};

use crate::config::ScraperConfig;
use crate::error::Result;
use crate::html::{element_text, find_all, find_tag, require_attr, TagQuery};
use crate::models::{ReportTable, StatusTally};
use crate::progress::Progress;
use crate::session::CachedSession;
use crate::utils::join_url;

/// Trailing tables of the index page that hold no status data.
const TRAILING_TABLES: usize = 2;

/// One row of the PEP index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLink {
    /// Status letter from the index, type prefix stripped (may be empty).
    pub category: String,
    pub href: String,
}

#[instrument(level = "info", skip_all)]
pub async fn run(
    session: &CachedSession,
    config: &ScraperConfig,
    progress: &mut dyn Progress,
) -> Result<Option<ReportTable>> {
    let Some(body) = session.get_text(&config.pep_url).await else {
        return Ok(None);
    };
    let status_links = index_status_links(&body)?;
    info!(count = status_links.len(), "Found PEP index rows");

    let mut tally = StatusTally::new();
    progress.begin(status_links.len());
    for link in status_links {
        let pep_url = join_url(&config.pep_url, &link.href)?;
        if let Some(page) = session.get_text(&pep_url).await {
            let status = page_status(&page)?;
            let expected = config.expected_for(&link.category);
            if !expected.iter().any(|s| *s == status) {
                info!(
                    category = %link.category,
                    url = %pep_url,
                    observed = %status,
                    ?expected,
                    "Mismatched PEP status"
                );
            }
            tally.record(&status);
        }
        progress.item_done(&pep_url);
    }
    progress.finish();

    if tally.total() == 0 {
        info!("No PEP page yielded a status");
        return Ok(None);
    }
    for (status, count) in tally.iter() {
        debug!(%status, count, "Status tally");
    }
    info!(total = tally.total(), "PEP census complete");
    Ok(Some(tally.into_table()))
}

/// Category and link of every row in the data tables of the index.
pub fn index_status_links(body: &str) -> Result<Vec<StatusLink>> {
    let document = Html::parse_document(body);
    let tbodies = find_all(document.root_element(), &TagQuery::new("tbody"));
    let data_tables = tbodies.len().saturating_sub(TRAILING_TABLES);

    let mut links = Vec::new();
    for tbody in &tbodies[..data_tables] {
        for row in find_all(*tbody, &TagQuery::new("tr")) {
            let abbr = find_tag(row, &TagQuery::new("abbr"))?;
            let anchor = find_tag(row, &TagQuery::new("a"))?;
            links.push(StatusLink {
                category: element_text(abbr).chars().skip(1).collect(),
                href: require_attr(anchor, "href")?.to_string(),
            });
        }
    }
    Ok(links)
}

/// Status shown in the header field list of a PEP page.
pub fn page_status(body: &str) -> Result<String> {
    let document = Html::parse_document(body);
    let dl = find_tag(document.root_element(), &TagQuery::new("dl"))?;
    let abbr = find_tag(dl, &TagQuery::new("abbr"))?;
    Ok(element_text(abbr))
}
