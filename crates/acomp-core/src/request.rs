//! Async transform requests.

use crate::completion::{CompletionToken, Submission};
use crate::error::{Error, Result};
use crate::sg::SgList;

/// A reusable request describing one compress or decompress operation.
///
/// A request binds a source buffer set, a destination buffer set, the
/// number of logically valid source bytes (`slen`) and the offered
/// destination capacity (`dlen`). The same object is reconfigured and
/// resubmitted across phases: a typical round trip compresses into a
/// destination set, then reconfigures with that set as the new source.
#[derive(Debug)]
pub struct AcompRequest {
    pub(crate) src: Option<SgList>,
    pub(crate) dst: Option<SgList>,
    pub(crate) slen: usize,
    pub(crate) dlen: usize,
    pub(crate) token: CompletionToken,
    consumed: usize,
    produced: usize,
}

impl AcompRequest {
    pub(crate) fn new() -> Self {
        AcompRequest {
            src: None,
            dst: None,
            slen: 0,
            dlen: 0,
            token: CompletionToken::new(),
            consumed: 0,
            produced: 0,
        }
    }

    /// Bind the request to a source/destination pair.
    ///
    /// Callable repeatedly on the same object; each call supplies fresh
    /// buffer sets and discards any completion state from a previous
    /// submission.
    pub fn set_params(&mut self, src: SgList, dst: SgList, slen: usize, dlen: usize) {
        self.src = Some(src);
        self.dst = Some(dst);
        self.slen = slen;
        self.dlen = dlen;
        self.token = CompletionToken::new();
        self.consumed = 0;
        self.produced = 0;
    }

    /// Fold an immediate submission status with the completion wait.
    ///
    /// A rejected submission short-circuits; any accepted submission
    /// blocks on the token until the operation's completion signal fires,
    /// then records the produced lengths and returns the final status.
    pub fn wait(&mut self, submission: Submission) -> Result<()> {
        match submission {
            Submission::Rejected(err) => Err(err),
            Submission::Queued | Submission::Backlogged | Submission::Done => {
                let done = self.token.wait();
                done.status?;
                self.consumed = done.consumed;
                self.produced = done.produced;
                Ok(())
            }
        }
    }

    /// Source bytes actually consumed. Meaningful only after a
    /// successful [`wait`](AcompRequest::wait).
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Destination bytes actually written. Meaningful only after a
    /// successful [`wait`](AcompRequest::wait).
    pub fn produced(&self) -> usize {
        self.produced
    }

    pub(crate) fn params(&self) -> Result<(SgList, SgList, usize, usize)> {
        let src = self
            .src
            .clone()
            .ok_or(Error::NotConfigured("source buffer set not bound"))?;
        let dst = self
            .dst
            .clone()
            .ok_or(Error::NotConfigured("destination buffer set not bound"))?;
        Ok((src, dst, self.slen, self.dlen))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::Completion;
    use crate::sg::SegmentBuf;

    fn one_segment_list(len: usize) -> SgList {
        SgList::from_bufs(&[SegmentBuf::zeroed(len).unwrap()])
    }

    #[test]
    fn unconfigured_request_has_no_params() {
        let req = AcompRequest::new();
        assert!(matches!(req.params(), Err(Error::NotConfigured(_))));
    }

    #[test]
    fn rejected_submission_short_circuits_wait() {
        let mut req = AcompRequest::new();
        let err = req
            .wait(Submission::Rejected(Error::QueueClosed))
            .unwrap_err();
        assert!(matches!(err, Error::QueueClosed));
    }

    #[test]
    fn successful_wait_records_produced_lengths() {
        let mut req = AcompRequest::new();
        req.set_params(one_segment_list(32), one_segment_list(32), 32, 32);
        req.token.complete(Completion {
            status: Ok(()),
            consumed: 32,
            produced: 17,
        });

        req.wait(Submission::Queued).unwrap();
        assert_eq!(req.consumed(), 32);
        assert_eq!(req.produced(), 17);
    }

    #[test]
    fn failed_wait_surfaces_backend_status() {
        let mut req = AcompRequest::new();
        req.set_params(one_segment_list(8), one_segment_list(8), 8, 8);
        req.token.complete(Completion::failed(Error::DstTooSmall {
            required: 64,
            offered: 8,
        }));

        let err = req.wait(Submission::Backlogged).unwrap_err();
        assert!(matches!(err, Error::DstTooSmall { .. }));
    }

    #[test]
    fn reconfiguration_discards_previous_completion() {
        let mut req = AcompRequest::new();
        req.set_params(one_segment_list(8), one_segment_list(8), 8, 8);
        req.token.complete(Completion {
            status: Ok(()),
            consumed: 8,
            produced: 8,
        });
        req.wait(Submission::Queued).unwrap();

        req.set_params(one_segment_list(16), one_segment_list(16), 16, 16);
        assert!(!req.token.is_resolved(), "fresh phase starts unresolved");
        assert_eq!(req.consumed(), 0);
        assert_eq!(req.produced(), 0);
    }
}
