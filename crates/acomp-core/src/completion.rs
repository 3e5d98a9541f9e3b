//! Completion tokens for asynchronously submitted operations.

use std::sync::{Arc, Condvar, Mutex, PoisonError};

use crate::error::Error;

/// Terminal record of one submitted operation.
#[derive(Debug, Clone)]
pub struct Completion {
    /// Final status of the operation.
    pub status: Result<(), Error>,
    /// Source bytes actually consumed.
    pub consumed: usize,
    /// Destination bytes actually written.
    pub produced: usize,
}

impl Completion {
    /// A failed completion; produced lengths are zeroed.
    pub fn failed(err: Error) -> Self {
        Completion {
            status: Err(err),
            consumed: 0,
            produced: 0,
        }
    }
}

#[derive(Debug, Default)]
struct TokenInner {
    state: Mutex<Option<Completion>>,
    resolved: Condvar,
}

/// Couples a submitted request to its eventual result.
///
/// Exactly one completion resolves a token; later calls to
/// [`complete`](CompletionToken::complete) are ignored. Waiters park on a
/// condition variable until the completion signal fires, with no timeout:
/// a hung backend stalls the waiter indefinitely, as the protocol has no
/// cancellation path.
#[derive(Debug, Clone, Default)]
pub struct CompletionToken {
    inner: Arc<TokenInner>,
}

impl CompletionToken {
    /// Create an unresolved token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the token, waking all waiters. No-op if already resolved.
    ///
    /// Only the offload worker resolves tokens; callers interact with
    /// the blocking wait side.
    pub(crate) fn complete(&self, completion: Completion) {
        let mut state = self
            .inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if state.is_some() {
            return;
        }
        *state = Some(completion);
        self.inner.resolved.notify_all();
    }

    /// Block until the token resolves, returning the completion record.
    pub fn wait(&self) -> Completion {
        let mut state = self
            .inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        loop {
            if let Some(completion) = state.as_ref() {
                return completion.clone();
            }
            state = self
                .inner
                .resolved
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Whether the completion signal has already fired.
    pub fn is_resolved(&self) -> bool {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

/// Immediate result of submitting a request to a transform.
///
/// All accepted variants require the caller to proceed to the wait step;
/// the operation's true outcome is only known once the token resolves.
#[derive(Debug)]
pub enum Submission {
    /// Accepted and queued for the offload worker.
    Queued,
    /// Accepted, but the device queue is past its backlog threshold.
    Backlogged,
    /// Completed synchronously; the token is already resolved.
    Done,
    /// Not accepted; no completion will fire for this submission.
    Rejected(Error),
}

impl Submission {
    /// Whether the operation was accepted (its outcome arrives via the token).
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Submission::Rejected(_))
    }
}
