//! Error types for the render pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can abort a pipeline run
///
/// Sparse or empty cell input is not an error: the resolver always produces
/// a valid (possibly single-cell) grid.
#[derive(Error, Debug)]
pub enum Error {
    /// The rendering engine could not be started or connected
    #[error("Rendering engine unavailable: {0}")]
    EngineUnavailable(String),

    /// The engine failed to load the composed document
    #[error("Failed to load document: {0}")]
    LoadError(String),

    /// The capture region did not become visible before the deadline
    #[error("Region not ready after {0}ms")]
    RenderTimeout(u64),

    /// The region selector matched nothing in the loaded document
    #[error("Region not found: {0}")]
    RegionNotFound(String),

    /// The engine failed while taking the screenshot
    #[error("Capture failed: {0}")]
    CaptureError(String),

    /// The captured bytes are not a decodable raster
    #[error("Failed to decode raster: {0}")]
    DecodeError(String),

    /// Failed to encode the normalized raster
    #[error("Failed to encode raster: {0}")]
    EncodeError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Cell data could not be parsed or written
    #[error("Invalid cell data: {0}")]
    Json(#[from] serde_json::Error),

    /// Station list could not be parsed
    #[error("Invalid station list: {0}")]
    Csv(#[from] csv::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error came from the rendering engine boundary
    pub fn is_capture_failure(&self) -> bool {
        matches!(
            self,
            Error::EngineUnavailable(_)
                | Error::LoadError(_)
                | Error::RenderTimeout(_)
                | Error::RegionNotFound(_)
                | Error::CaptureError(_)
        )
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        use image::ImageError;
        match err {
            ImageError::IoError(e) => Error::Io(e),
            ImageError::Encoding(e) => Error::EncodeError(e.to_string()),
            other => Error::DecodeError(other.to_string()),
        }
    }
}
