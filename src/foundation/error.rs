/// Crate-wide result alias.
pub type ZoomreelResult<T> = Result<T, ZoomreelError>;

/// Errors produced by framing and video assembly.
#[derive(thiserror::Error, Debug)]
pub enum ZoomreelError {
    /// Image or canvas geometry that cannot be processed (e.g. zero-area input).
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A caller-supplied parameter is out of range.
    #[error("validation error: {0}")]
    Validation(String),

    /// The batch writer had no frames to encode.
    #[error("empty frame sequence: no frames left to encode")]
    EmptyFrameSequence,

    /// Opening, writing to or closing the encoder failed.
    #[error("encoder error: {0}")]
    Encoder(String),

    /// An incremental writer was used after `finish` (or after it was closed by a failure).
    #[error("video writer used after finish")]
    UseAfterFinish,

    /// Anything else, with context attached by `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ZoomreelError {
    /// Build an [`ZoomreelError::InvalidGeometry`].
    pub fn invalid_geometry(msg: impl Into<String>) -> Self {
        Self::InvalidGeometry(msg.into())
    }

    /// Build a [`ZoomreelError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ZoomreelError::Encoder`].
    pub fn encoder(msg: impl Into<String>) -> Self {
        Self::Encoder(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
