//! Small helpers shared by the reports and output writers.
//!
//! - String truncation for log and error context
//! - URL joining and file-name derivation
//! - Directory creation and timestamped file names

use chrono::Local;
use std::path::Path;
use tokio::fs;
use tracing::{debug, instrument};
use url::Url;

use crate::error::Result;

/// Timestamp format used in result file names.
pub const FILE_DATETIME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a char boundary) with an
/// ellipsis and the number of dropped bytes appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Resolve a possibly relative `href` against `base`.
///
/// # Arguments
///
/// * `base` - absolute URL; a trailing `/` marks it as a directory
/// * `href` - relative or absolute link taken from a page
///
/// # Returns
///
/// The absolute URL as a string, or [`crate::error::AppError::Url`] when `base` is not a
/// valid URL.
pub fn join_url(base: &str, href: &str) -> Result<String> {
    Ok(Url::parse(base)?.join(href)?.to_string())
}

/// Final path segment of a URL, taken verbatim.
pub fn last_path_segment(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// Replace line breaks with spaces so multi-line page text fits one cell.
pub fn flatten_newlines(text: &str) -> String {
    text.replace('\n', " ")
}

/// `<prefix>_<local timestamp>.<ext>`
pub fn timestamped_file_name(prefix: &str, ext: &str) -> String {
    format!("{}_{}.{}", prefix, Local::now().format(FILE_DATETIME_FORMAT), ext)
}

/// Create a directory (and parents) if it does not exist yet.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub async fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).await?;
    debug!("Directory ready");
    Ok(())
}
