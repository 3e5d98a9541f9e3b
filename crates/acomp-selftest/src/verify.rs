//! Round-trip verification.
//!
//! The decompressed stream must first match the original total length
//! exactly; only then are bytes compared, segment against the
//! proportional `total / N` slice of the decompressed stream. The
//! proportional slicing assumes equal-sized segments, which the harness
//! guarantees by construction.

use crate::error::{Result, SelfTestError};

/// Compare the original segments against the decompressed stream.
///
/// A total-length mismatch is reported as [`SelfTestError::LengthMismatch`]
/// and skips the byte comparison entirely.
pub fn verify_round_trip(original: &[Vec<u8>], decoded: &[u8]) -> Result<()> {
    let expected: usize = original.iter().map(Vec::len).sum();
    if decoded.len() != expected {
        return Err(SelfTestError::LengthMismatch {
            expected,
            actual: decoded.len(),
        });
    }
    if decoded.is_empty() {
        return Ok(());
    }

    let slice_len = decoded.len() / original.len();
    for (segment, slice) in original.iter().zip(decoded.chunks(slice_len)) {
        if segment[..slice_len] != *slice {
            return Err(SelfTestError::ContentMismatch);
        }
    }
    Ok(())
}
