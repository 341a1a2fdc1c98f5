//! Dispatcher configuration.

/// Bytes read from a stream per update step.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Configuration for the digest dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashConfig {
    /// Size of each read when hashing a stream. Never zero.
    pub chunk_size: usize,
}

impl HashConfig {
    /// Set the stream chunk size. Zero is raised to one byte.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}
