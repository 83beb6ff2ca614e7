use model::error::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConnectorError {
    /// Records could not be loaded or cast.
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// The record source is not a JSON array of objects.
    #[error("Invalid record source: {0}")]
    InvalidSource(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
