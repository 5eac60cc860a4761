use thiserror::Error;

/// Errors shared by the HTTP client and configuration wiring.
#[derive(Debug, Error)]
pub enum GazetteError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Security error: {0}")]
    Security(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, GazetteError>;
