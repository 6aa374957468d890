use std::path::PathBuf;

/// Errors raised at the fallible edges of the core.
///
/// Extraction itself never fails: a missing anchor becomes a null field.
#[derive(Debug, thiserror::Error)]
pub enum TicketError {
    #[error("Failed to read extractor config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid extractor config: {0}")]
    ConfigParse(#[source] serde_json::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Passenger name is not sanitized: {0}")]
    UnsanitizedName(String),
}

pub type Result<T> = std::result::Result<T, TicketError>;
