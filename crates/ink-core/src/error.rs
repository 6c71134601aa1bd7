//! Error taxonomy for the sketch-to-overlay pipeline.
//!
//! No variant is fatal: the session stays usable after any of them and the
//! user may trigger another run.

use thiserror::Error;

/// Result type alias for inkcalc operations.
pub type Result<T> = std::result::Result<T, InkError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InkError {
    /// Network or transport failure talking to the recognition service.
    #[error("recognition service unavailable: {0}")]
    RecognitionUnavailable(String),

    /// The service answered, but not with the expected `{ data: [...] }` shape.
    #[error("malformed recognition response: {0}")]
    MalformedResponse(String),

    /// The bounding-box scan found no ink pixels.
    #[error("canvas contains no ink")]
    EmptyCanvas,

    /// The raster could not be encoded as an image.
    #[error("failed to encode canvas: {0}")]
    Encode(String),

    /// Session settings out of range.
    #[error("invalid session config: {0}")]
    InvalidConfig(String),

    /// A stroke color string could not be parsed.
    #[error("invalid color: {0:?}")]
    InvalidColor(String),
}
