use thiserror::Error;

/// Library error type for slideshow operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The given root is missing or not a directory.
    #[error("invalid root directory: {0}")]
    BadRoot(String),

    /// The scan completed but found no images.
    #[error("no images found under {0}")]
    EmptyScan(String),

    /// Underlying IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON/serde error from the state store.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Rendering/display error from the viewer.
    #[error("render error: {0}")]
    Render(anyhow::Error),
}
