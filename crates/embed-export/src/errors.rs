use thiserror::Error;

pub type ExportResult<T> = Result<T, ExportError>;

/// Errors raised while ingesting editor JSON.
///
/// Mapping and rendering never fail; only the outer shape of a document or
/// catalog can be rejected.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("invalid emoji catalog: {0}")]
    InvalidCatalog(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<&str> for ExportError {
    fn from(value: &str) -> Self {
        ExportError::InvalidDocument(value.to_string())
    }
}
