//! CSV file output.
//!
//! Files are written to `<results_dir>/<mode>_<YYYY-mm-dd_HH-MM-SS>.csv`.

use std::path::{Path, PathBuf};

use csv::{Terminator, WriterBuilder};
use tracing::{info, instrument};

use crate::cli::Mode;
use crate::error::Result;
use crate::models::ReportTable;
use crate::utils::{ensure_dir, timestamped_file_name};

/// Write `table` (header first) as CSV and return the file path.
#[instrument(level = "info", skip(table), fields(results_dir = %results_dir.display()))]
pub async fn write_csv(table: &ReportTable, mode: Mode, results_dir: &Path) -> Result<PathBuf> {
    ensure_dir(results_dir).await?;
    let path = results_dir.join(timestamped_file_name(mode.as_str(), "csv"));

    let bytes = to_csv_bytes(table)?;
    tokio::fs::write(&path, bytes).await?;

    info!(path = %path.display(), "Results saved");
    Ok(path)
}

/// CSV encoding with `\n` line endings.
pub fn to_csv_bytes(table: &ReportTable) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    for row in table.all_rows() {
        writer.write_record(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| std::io::Error::other(e.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ReportTable {
        let mut table = ReportTable::new(["Article link", "Title", "Editor, author"]);
        table
            .push(["https://docs.python.org/3/whatsnew/3.12.html", "What's New", "Editor: \"A\""])
            .unwrap();
        table
    }

    #[test]
    fn test_to_csv_bytes_quotes_fields() {
        let text = String::from_utf8(to_csv_bytes(&sample()).unwrap()).unwrap();
        assert_eq!(
            text,
            "Article link,Title,\"Editor, author\"\n\
             https://docs.python.org/3/whatsnew/3.12.html,What's New,\"Editor: \"\"A\"\"\"\n"
        );
    }

    #[tokio::test]
    async fn test_write_csv_creates_results_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("results");
        let path = write_csv(&sample(), Mode::RecentReleases, &dir).await.unwrap();

        assert!(path.starts_with(&dir));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("recent-releases_"));
        assert!(name.ends_with(".csv"));
        assert_eq!(std::fs::read(&path).unwrap(), to_csv_bytes(&sample()).unwrap());
    }
}
