//! Error types for the scfg substrate.

use thiserror::Error;

/// Errors returned by buffer, codec and digest operations.
///
/// Every operation validates its preconditions before touching state, so an
/// error always leaves the caller's buffers with their last good contents.
#[derive(Debug, Error)]
pub enum ScfgError {
    #[error("invalid stream: {0}")]
    InvalidStream(String),

    #[error("unknown buffer kind: {0}")]
    UnknownBufferKind(u8),

    #[error("out of memory: failed to allocate {requested} bytes")]
    OutOfMemory { requested: usize },

    #[error("buffer too small: required {required}, available {available}")]
    BufferTooSmall { required: usize, available: usize },

    #[error("unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(u8),

    #[error("invalid code point at offset {offset}")]
    InvalidCodePoint { offset: usize },

    #[error("code point {value:#x} at offset {offset} is too large")]
    CodePointTooLarge { value: u32, offset: usize },

    #[error("general failure: {0}")]
    GeneralFailure(String),
}

impl ScfgError {
    /// Shorthand for a capacity error.
    pub(crate) fn too_small(required: usize, available: usize) -> Self {
        ScfgError::BufferTooSmall {
            required,
            available,
        }
    }
}

/// Result type for scfg operations.
pub type Result<T> = std::result::Result<T, ScfgError>;
