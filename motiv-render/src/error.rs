use thiserror::Error;

/// Errors originating from the rendering collaborator.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid image dimensions: {width}×{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("empty point sequence, nothing to rasterize")]
    EmptyPointSequence,

    #[error("png encoding failed: {0}")]
    Encoding(#[from] png::EncodingError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
