use thiserror::Error;

/// Failures raised by the page extraction core.
///
/// Malformed list items and missing page regions are not errors: they are
/// skipped or produce empty collections. Only problems that make the whole
/// act record untrustworthy surface here.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to parse HTML document: {0}")]
    Html(String),

    #[error("Expected at most one citation PDF link, found {count}")]
    IntegrityViolation { count: usize },

    #[error("Failed to serialize act details: {0}")]
    Serialize(#[from] serde_json::Error),
}
