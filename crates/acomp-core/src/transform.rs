//! Transform contexts backed by a dedicated offload worker.
//!
//! An [`AcompTransform`] models acceleration hardware: submissions
//! enqueue work and return immediately, the actual transform runs on a
//! separate execution context, and the outcome arrives via the request's
//! completion token. Submission never blocks; the wait step does.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use tracing::{debug, trace};

use crate::completion::{Completion, CompletionToken, Submission};
use crate::error::{Error, Result};
use crate::registry::BlockEngine;
use crate::request::AcompRequest;
use crate::sg::SgList;

/// Queue depth past which submissions report [`Submission::Backlogged`].
///
/// Backlogged submissions are still accepted; the variant only tells the
/// caller the device queue is congested.
pub const BACKLOG_DEPTH: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Compress,
    Decompress,
}

impl Direction {
    fn as_str(self) -> &'static str {
        match self {
            Direction::Compress => "compress",
            Direction::Decompress => "decompress",
        }
    }
}

struct Job {
    direction: Direction,
    src: SgList,
    dst: SgList,
    slen: usize,
    dlen: usize,
    token: CompletionToken,
}

/// A handle to a configured algorithm instance and its offload worker.
#[derive(Debug)]
pub struct AcompTransform {
    algorithm: String,
    queue: Option<mpsc::Sender<Job>>,
    depth: Arc<AtomicUsize>,
    worker: Option<thread::JoinHandle<()>>,
}

impl AcompTransform {
    pub(crate) fn spawn(algorithm: String, engine: Arc<dyn BlockEngine>) -> Result<Self> {
        let (queue, jobs) = mpsc::channel::<Job>();
        let depth = Arc::new(AtomicUsize::new(0));
        let worker_depth = Arc::clone(&depth);
        let worker = thread::Builder::new()
            .name(format!("acomp-{algorithm}"))
            .spawn(move || {
                for job in jobs {
                    run_job(engine.as_ref(), job);
                    worker_depth.fetch_sub(1, Ordering::AcqRel);
                }
            })
            .map_err(|_| Error::Exhausted("offload worker thread"))?;

        Ok(AcompTransform {
            algorithm,
            queue: Some(queue),
            depth,
            worker: Some(worker),
        })
    }

    /// Name of the algorithm this transform was allocated for.
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// Allocate a request bound to this transform.
    pub fn alloc_request(&self) -> AcompRequest {
        AcompRequest::new()
    }

    /// Submit the request's source stream for compression.
    pub fn compress(&self, req: &mut AcompRequest) -> Submission {
        self.submit(Direction::Compress, req)
    }

    /// Submit the request's source stream for decompression.
    pub fn decompress(&self, req: &mut AcompRequest) -> Submission {
        self.submit(Direction::Decompress, req)
    }

    fn submit(&self, direction: Direction, req: &mut AcompRequest) -> Submission {
        let (src, dst, slen, dlen) = match req.params() {
            Ok(params) => params,
            Err(err) => return Submission::Rejected(err),
        };
        let Some(queue) = self.queue.as_ref() else {
            return Submission::Rejected(Error::QueueClosed);
        };

        let job = Job {
            direction,
            src,
            dst,
            slen,
            dlen,
            token: req.token.clone(),
        };
        let pending = self.depth.fetch_add(1, Ordering::AcqRel);
        if queue.send(job).is_err() {
            self.depth.fetch_sub(1, Ordering::AcqRel);
            return Submission::Rejected(Error::QueueClosed);
        }
        trace!(
            algorithm = %self.algorithm,
            op = direction.as_str(),
            pending,
            "request queued"
        );
        if pending >= BACKLOG_DEPTH {
            Submission::Backlogged
        } else {
            Submission::Queued
        }
    }
}

impl Drop for AcompTransform {
    fn drop(&mut self) {
        // Closing the queue lets the worker drain and exit.
        self.queue.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn run_job(engine: &dyn BlockEngine, job: Job) {
    let Job {
        direction,
        src,
        dst,
        slen,
        dlen,
        token,
    } = job;
    match execute(engine, direction, &src, &dst, slen, dlen) {
        Ok((consumed, produced)) => {
            debug!(
                algorithm = engine.name(),
                op = direction.as_str(),
                consumed,
                produced,
                "operation complete"
            );
            token.complete(Completion {
                status: Ok(()),
                consumed,
                produced,
            });
        }
        Err(err) => {
            debug!(
                algorithm = engine.name(),
                op = direction.as_str(),
                %err,
                "operation failed"
            );
            token.complete(Completion::failed(err));
        }
    }
}

fn execute(
    engine: &dyn BlockEngine,
    direction: Direction,
    src: &SgList,
    dst: &SgList,
    slen: usize,
    dlen: usize,
) -> Result<(usize, usize)> {
    let input = src.gather(slen)?;
    let output = match direction {
        Direction::Compress => engine.compress(&input)?,
        Direction::Decompress => engine.decompress(&input)?,
    };
    // The offered capacity is the declared dlen, never more than the
    // destination set can physically hold.
    let offered = dlen.min(dst.total_capacity());
    if output.len() > offered {
        return Err(Error::DstTooSmall {
            required: output.len(),
            offered,
        });
    }
    dst.scatter(&output)?;
    Ok((slen, output.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use crate::sg::SegmentBuf;

    fn deflate_transform() -> AcompTransform {
        Registry::with_builtins().alloc_transform("deflate").unwrap()
    }

    fn segments(count: usize, size: usize) -> Vec<SegmentBuf> {
        (0..count)
            .map(|_| SegmentBuf::zeroed(size).unwrap())
            .collect()
    }

    #[test]
    fn unconfigured_submission_is_rejected() {
        let tfm = deflate_transform();
        let mut req = tfm.alloc_request();
        let submission = tfm.compress(&mut req);
        assert!(matches!(
            submission,
            Submission::Rejected(Error::NotConfigured(_))
        ));
        let err = req.wait(submission).unwrap_err();
        assert!(matches!(err, Error::NotConfigured(_)));
    }

    #[test]
    fn compress_then_decompress_round_trips() {
        let tfm = deflate_transform();
        let mut req = tfm.alloc_request();

        let inputs = segments(2, 1024);
        for buf in &inputs {
            buf.fill_with(|i| i as u8);
        }
        let outputs = segments(2, 1024);
        let decoded = segments(2, 1024);

        let src = SgList::from_bufs(&inputs);
        let dst = SgList::from_bufs(&outputs);
        let dec = SgList::from_bufs(&decoded);

        req.set_params(src.clone(), dst.clone(), 2048, 2048);
        let submission = tfm.compress(&mut req);
        req.wait(submission).unwrap();
        assert_eq!(req.consumed(), 2048);
        let compressed_len = req.produced();
        assert!(compressed_len > 0 && compressed_len < 2048);

        req.set_params(dst, dec.clone(), compressed_len, 2048);
        let submission = tfm.decompress(&mut req);
        req.wait(submission).unwrap();
        assert_eq!(req.produced(), 2048);
        assert_eq!(dec.gather(2048).unwrap(), src.gather(2048).unwrap());
    }

    #[test]
    fn undersized_destination_fails_at_wait() {
        let tfm = deflate_transform();
        let mut req = tfm.alloc_request();

        let inputs = segments(1, 4096);
        for buf in &inputs {
            buf.fill_with(|i| i as u8);
        }
        let outputs = segments(1, 16);

        req.set_params(
            SgList::from_bufs(&inputs),
            SgList::from_bufs(&outputs),
            4096,
            16,
        );
        let submission = tfm.compress(&mut req);
        assert!(submission.is_accepted(), "capacity errors surface at wait");
        let err = req.wait(submission).unwrap_err();
        assert!(matches!(err, Error::DstTooSmall { offered: 16, .. }));
    }

    #[test]
    fn declared_dlen_caps_the_offered_capacity() {
        let tfm = deflate_transform();
        let mut req = tfm.alloc_request();

        let inputs = segments(1, 4096);
        for buf in &inputs {
            buf.fill_with(|i| i as u8);
        }
        // Physically large destination, but only 8 bytes declared.
        let outputs = segments(1, 4096);

        req.set_params(
            SgList::from_bufs(&inputs),
            SgList::from_bufs(&outputs),
            4096,
            8,
        );
        let submission = tfm.compress(&mut req);
        let err = req.wait(submission).unwrap_err();
        assert!(matches!(err, Error::DstTooSmall { offered: 8, .. }));
    }

    #[test]
    fn request_reuse_does_not_leak_between_operations() {
        let tfm = deflate_transform();
        let mut req = tfm.alloc_request();

        for round in 0..2u8 {
            let inputs = segments(1, 512);
            for buf in &inputs {
                buf.fill_with(|i| (i as u8).wrapping_add(round));
            }
            let outputs = segments(1, 1024);
            let decoded = segments(1, 512);

            let src = SgList::from_bufs(&inputs);
            let dst = SgList::from_bufs(&outputs);
            let dec = SgList::from_bufs(&decoded);

            req.set_params(src.clone(), dst.clone(), 512, 1024);
            let submission = tfm.compress(&mut req);
            req.wait(submission).unwrap();
            let compressed_len = req.produced();

            req.set_params(dst, dec.clone(), compressed_len, 512);
            let submission = tfm.decompress(&mut req);
            req.wait(submission).unwrap();
            assert_eq!(dec.gather(512).unwrap(), src.gather(512).unwrap());
        }
    }
}
