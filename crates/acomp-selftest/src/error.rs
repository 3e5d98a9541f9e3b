//! Error types for the self-test harness.

use thiserror::Error;

/// Result type alias for harness operations.
pub type Result<T> = core::result::Result<T, SelfTestError>;

/// Failures the self-test distinguishes.
#[derive(Debug, Error)]
pub enum SelfTestError {
    /// Failure reported by the offload protocol (acquisition, allocation,
    /// compression, or decompression).
    #[error(transparent)]
    Core(#[from] acomp_core::Error),

    /// Decompressed total length differs from the original input length.
    #[error("decompressed length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Decompressed bytes differ from the original input.
    #[error("mismatch between input and decompressed data")]
    ContentMismatch,

    /// The configuration cannot describe a runnable test.
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

impl SelfTestError {
    /// Kernel-flavored numeric status, always negative.
    pub fn code(&self) -> i32 {
        match self {
            SelfTestError::Core(err) => err.code(),
            SelfTestError::LengthMismatch { .. } => -74,
            SelfTestError::ContentMismatch => -117,
            SelfTestError::InvalidConfig(_) => -22,
        }
    }
}
