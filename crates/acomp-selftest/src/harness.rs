//! The compress/decompress round-trip harness.
//!
//! Drives the full sequence on a single control thread: acquire the
//! transform, allocate buffers, compress, wait, reconfigure the same
//! request for the inverse direction, wait again, verify. Any failure
//! aborts the remaining phases; resource release is handled by Drop.

use serde::Serialize;
use tracing::{error, info};

use acomp_core::{alloc_transform, SegmentBuf, SgList};

use crate::config::SelfTestConfig;
use crate::error::{Result, SelfTestError};
use crate::verify;

/// Outcome of a successful self-test.
#[derive(Debug, Clone, Serialize)]
pub struct SelfTestReport {
    /// Algorithm exercised.
    pub algorithm: String,
    /// Number of segments per stream.
    pub segment_count: usize,
    /// Original input length, bytes.
    pub src_total: usize,
    /// Compressed stream length, bytes.
    pub compressed_len: usize,
    /// Decompressed stream length, bytes (equals `src_total` on success).
    pub decompressed_len: usize,
}

fn alloc_segments(count: usize, size: usize) -> acomp_core::Result<Vec<SegmentBuf>> {
    (0..count).map(|_| SegmentBuf::zeroed(size)).collect()
}

/// Run the round-trip self-test described by `config`.
pub fn run_self_test(config: &SelfTestConfig) -> Result<SelfTestReport> {
    config.validate()?;

    let tfm = match alloc_transform(&config.algorithm) {
        Ok(tfm) => tfm,
        Err(err) => {
            error!(algorithm = %config.algorithm, %err, "failed to allocate transform");
            return Err(err.into());
        }
    };
    let mut req = tfm.alloc_request();

    let inputs = alloc_segments(config.segment_count, config.segment_size)?;
    let outputs = alloc_segments(config.segment_count, config.dst_segment_size)?;
    let decoded = alloc_segments(config.segment_count, config.segment_size)?;

    // Repeating 0..=255 ramp in every source segment.
    for buf in &inputs {
        buf.fill_with(|i| i as u8);
    }

    let src = SgList::from_bufs(&inputs);
    let dst = SgList::from_bufs(&outputs);
    let dec = SgList::from_bufs(&decoded);

    req.set_params(src, dst.clone(), config.src_total(), config.dst_total());
    let submission = tfm.compress(&mut req);
    if let Err(err) = req.wait(submission) {
        error!(%err, "failed to compress buffer");
        return Err(err.into());
    }
    info!(
        slen = req.consumed(),
        dlen = req.produced(),
        "compression successful"
    );
    let compressed_len = req.produced();

    // The compress destination becomes the decompress source.
    req.set_params(dst, dec.clone(), compressed_len, config.src_total());
    let submission = tfm.decompress(&mut req);
    if let Err(err) = req.wait(submission) {
        error!(%err, "failed to decompress buffer");
        return Err(err.into());
    }
    info!(
        slen = req.consumed(),
        dlen = req.produced(),
        "decompression successful"
    );
    let decompressed_len = req.produced();

    // The worker never writes past the offered capacity, so the produced
    // length is always gatherable.
    let original: Vec<Vec<u8>> = inputs.iter().map(SegmentBuf::copy_out).collect();
    let restored = dec.gather(decompressed_len).map_err(SelfTestError::from)?;
    if let Err(err) = verify::verify_round_trip(&original, &restored) {
        error!(%err, "round-trip verification failed");
        return Err(err);
    }

    Ok(SelfTestReport {
        algorithm: config.algorithm.clone(),
        segment_count: config.segment_count,
        src_total: config.src_total(),
        compressed_len,
        decompressed_len,
    })
}

/// Completion line emitted when the embedding driver shuts down.
pub fn shutdown_message() {
    info!("compression-decompression self-test completed");
}
