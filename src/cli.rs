//! Command-line interface definitions.
//!
//! ```sh
//! # Release notes as a bordered table
//! pydocs_scrape recent-releases -o pretty
//!
//! # PEP census to CSV, starting from an empty cache
//! pydocs_scrape pep --clear-cache -o file
//! ```

use std::fmt;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Report to generate. Short mode names are accepted as aliases.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Release notes of every version ("What's new")
    #[value(alias = "whats-new")]
    RecentReleases,
    /// Documentation versions and their status
    #[value(alias = "latest-versions")]
    VersionIndex,
    /// Download the documentation archive
    #[value(alias = "download")]
    ArchiveDownload,
    /// Count PEPs per status
    #[value(alias = "pep")]
    ProposalStatusCensus,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::RecentReleases => "recent-releases",
            Mode::VersionIndex => "version-index",
            Mode::ArchiveDownload => "archive-download",
            Mode::ProposalStatusCensus => "proposal-status-census",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a report table is rendered. Without `--output`, rows are printed as plain lines.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputMode {
    /// Bordered, column-aligned table
    Pretty,
    /// Bordered table shown one page at a time
    Paged,
    /// CSV file under `<base_dir>/results/`
    File,
}

/// Scrape the Python documentation and PEP sites.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Report to generate
    #[arg(value_enum)]
    pub mode: Mode,

    /// Clear the HTTP response cache before running
    #[arg(short, long)]
    pub clear_cache: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputMode>,

    /// Optional path to a YAML config file
    #[arg(long, env = "DOCS_SCRAPER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
