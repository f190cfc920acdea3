//! Scraper configuration.
//!
//! Every URL, marker phrase and expected-status table the reports depend on
//! lives in [`ScraperConfig`]. The defaults target the live Python sites; a
//! YAML file passed with `--config` can override any subset of fields.
//!
//! ```yaml
//! main_doc_url: https://docs.python.org/3/
//! base_dir: ./out
//! archive_extension: zip
//! expected_status:
//!   A: [Active, Accepted]
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Runtime configuration shared by all report generators.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ScraperConfig {
    /// Root of the language documentation site. Must end with `/`.
    pub main_doc_url: String,
    /// Root of the PEP index site. Must end with `/`.
    pub pep_url: String,
    /// Directory under which downloads, results, logs and the cache live.
    pub base_dir: PathBuf,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Text that identifies the sidebar list of documentation versions.
    pub versions_marker: String,
    /// Extension (without dot) of the documentation archive to download.
    pub archive_extension: String,
    /// Data rows per page in paged output.
    pub page_size: usize,
    /// PEP status letter (type prefix stripped) to the statuses a PEP page may show.
    pub expected_status: BTreeMap<String, Vec<String>>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        let expected_status: BTreeMap<String, Vec<String>> = [
            ("A", vec!["Active", "Accepted"]),
            ("D", vec!["Deferred"]),
            ("F", vec!["Final"]),
            ("P", vec!["Provisional"]),
            ("R", vec!["Rejected"]),
            ("S", vec!["Superseded"]),
            ("W", vec!["Withdrawn"]),
            ("", vec!["Draft", "Active"]),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.into_iter().map(String::from).collect()))
        .collect();

        Self {
            main_doc_url: "https://docs.python.org/3/".to_string(),
            pep_url: "https://peps.python.org/".to_string(),
            base_dir: PathBuf::from("."),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 30,
            versions_marker: "All versions".to_string(),
            archive_extension: "zip".to_string(),
            page_size: 20,
            expected_status,
        }
    }
}

impl ScraperConfig {
    /// Load configuration from a YAML file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the site roots are absolute URLs usable as join bases.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("main_doc_url", &self.main_doc_url), ("pep_url", &self.pep_url)] {
            Url::parse(value)?;
            if !value.ends_with('/') {
                return Err(AppError::config(format!("{name} must end with '/': {value}")));
            }
        }
        if self.archive_extension.is_empty() {
            return Err(AppError::config("archive_extension must not be empty"));
        }
        if self.page_size == 0 {
            return Err(AppError::config("page_size must be at least 1"));
        }
        Ok(())
    }

    /// Statuses accepted for a PEP category; unknown categories accept nothing.
    pub fn expected_for(&self, category: &str) -> &[String] {
        self.expected_status
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn downloads_dir(&self) -> PathBuf {
        self.base_dir.join("downloads")
    }

    pub fn results_dir(&self) -> PathBuf {
        self.base_dir.join("results")
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.base_dir.join("http_cache")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }
}
