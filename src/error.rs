use thiserror::Error;

/// Result type used across the harvester
pub type Result<T> = core::result::Result<T, HarvestError>;

/// Errors that end a crawl (or prevent it from starting)
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid CSS selector: {0}")]
    InvalidSelector(String),

    #[error("Invalid challenge pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("WebDriver session error: {0}")]
    Session(#[from] fantoccini::error::NewSessionError),

    #[error("WebDriver command failed: {0}")]
    Browser(#[from] fantoccini::error::CmdError),

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Csv Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Json Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Url Error: {0}")]
    Url(#[from] url::ParseError),
}

/// A failure to read one field of one listing row.
///
/// These never leave the extractor: the row keeps its other fields and the
/// failing one is blanked.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionFault {
    #[error("no element matching `{selector}` for field {field}")]
    MissingElement {
        field: &'static str,
        selector: String,
    },

    #[error("element for field {field} has no `{attr}` attribute")]
    MissingAttribute { field: &'static str, attr: String },

    #[error("sequence label {text:?} is not a number")]
    InvalidNumber { text: String },

    #[error("cannot build detail url from {href:?}: {reason}")]
    InvalidUrl { href: String, reason: String },
}
