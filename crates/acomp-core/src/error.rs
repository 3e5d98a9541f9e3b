//! Error types for the async compression offload protocol.

use thiserror::Error;

/// Result type alias for offload protocol operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Offload protocol error types.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// No engine registered under the requested name.
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// Memory allocation failed.
    #[error("allocation failed: could not allocate {requested_bytes} bytes")]
    AllocationFailed { requested_bytes: usize },

    /// A process-wide resource (e.g. a worker thread) could not be created.
    #[error("resource exhausted: {0}")]
    Exhausted(&'static str),

    /// The request was submitted before `set_params` bound its buffer sets.
    #[error("request not configured: {0}")]
    NotConfigured(&'static str),

    /// A gather walked past the end of the source stream.
    #[error("source out of range: requested {requested} bytes, stream holds {available}")]
    SrcOutOfRange { requested: usize, available: usize },

    /// Destination capacity too small for the produced output.
    #[error("destination too small: need {required} bytes, offered {offered}")]
    DstTooSmall { required: usize, offered: usize },

    /// Backend-specific failure.
    #[error("{algorithm} backend error: {message}")]
    Backend {
        algorithm: &'static str,
        message: String,
    },

    /// The transform's job queue has shut down.
    #[error("transform queue closed")]
    QueueClosed,
}

impl Error {
    /// Create a backend-specific error.
    pub fn backend(algorithm: &'static str, message: impl Into<String>) -> Self {
        Error::Backend {
            algorithm,
            message: message.into(),
        }
    }

    /// Create an allocation failure for `requested_bytes`.
    pub fn allocation_failed(requested_bytes: usize) -> Self {
        Error::AllocationFailed { requested_bytes }
    }

    /// Kernel-flavored numeric status for this error, always negative.
    ///
    /// Harnesses that report a single numeric outcome use this mapping;
    /// success is 0 by convention and never produced here.
    pub fn code(&self) -> i32 {
        match self {
            Error::UnknownAlgorithm(_) => -2,
            Error::AllocationFailed { .. } | Error::Exhausted(_) => -12,
            Error::NotConfigured(_) | Error::SrcOutOfRange { .. } => -22,
            Error::DstTooSmall { .. } => -28,
            Error::Backend { .. } => -5,
            Error::QueueClosed => -32,
        }
    }
}
