//! Unified error type for the scraper.
//!
//! Transient fetch failures never reach this type: the session turns them
//! into `None`. Everything here is either a broken local environment (I/O,
//! config) or a sign that the upstream page layout changed.

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request failed outside the cached text path
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Cache envelope (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config file could not be parsed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// CSV output failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// URL parsing or joining failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// A configured pattern did not compile
    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    /// An expected element is missing from the page
    #[error("Tag {query} not found in {context}")]
    TagNotFound { query: String, context: String },

    /// Page layout no longer matches what a report relies on
    #[error("Unexpected page structure: {0}")]
    Structure(String),

    /// A row does not have as many fields as the table header
    #[error("Row has {found} fields, header has {expected}")]
    RowArity { expected: usize, found: usize },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Create a page structure error.
    pub fn structure(message: impl Into<String>) -> Self {
        Self::Structure(message.into())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_not_found_message_names_query_and_context() {
        let err = AppError::TagNotFound {
            query: "section[id=what-s-new-in-python]".to_string(),
            context: "<body>".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("section[id=what-s-new-in-python]"));
        assert!(msg.contains("<body>"));
    }

    #[test]
    fn test_row_arity_message() {
        let err = AppError::RowArity { expected: 3, found: 2 };
        assert_eq!(err.to_string(), "Row has 2 fields, header has 3");
    }
}
