use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Hard failures only. Network degradation and missing remote files are
/// not errors here; those paths return `None` and the caller treats the
/// data as absent.
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
