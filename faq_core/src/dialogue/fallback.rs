//! Escalation to an external responder when nothing in the knowledge bases
//! matches.

use crossbeam_channel::RecvTimeoutError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Failure of the fallback responder. Never shown to the end user.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FallbackError {
    #[error("fallback timed out after {0:?}")]
    TimedOut(Duration),

    #[error("fallback failed: {0}")]
    Failed(String),

    #[error("fallback worker exited without answering")]
    Disconnected,

    #[error("fallback busy: {0} calls already in flight")]
    Busy(usize),
}

/// An external responder, e.g. a language-model client.
///
/// Calls run on a worker thread. A call that outlives the runner's time
/// limit keeps its worker and its in-flight slot until it returns, so
/// implementations should bound their own I/O (request timeouts and the
/// like) rather than block forever.
pub trait Fallback: Send + Sync {
    /// Answer a question, or `Ok(None)` to decline.
    fn answer(&self, question: &str) -> Result<Option<String>, FallbackError>;
}

/// Runs a [`Fallback`] with a time limit and a cap on concurrent calls.
///
/// Timed-out workers are detached, not killed; the cap bounds how many of
/// them can pile up. When the cap is reached new questions fail fast with
/// [`FallbackError::Busy`].
pub struct FallbackRunner {
    fallback: Arc<dyn Fallback>,
    timeout: Duration,
    max_in_flight: usize,
    in_flight: Arc<AtomicUsize>,
}

impl FallbackRunner {
    /// Create a runner. A `max_in_flight` of zero is treated as one.
    pub fn new(fallback: Arc<dyn Fallback>, timeout: Duration, max_in_flight: usize) -> Self {
        Self {
            fallback,
            timeout,
            max_in_flight: max_in_flight.max(1),
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of worker threads still running, including detached ones.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Ask on a worker thread and wait at most the configured time limit.
    ///
    /// On timeout the worker is left to finish on its own; its answer is
    /// discarded.
    pub fn ask(&self, question: &str) -> Result<Option<String>, FallbackError> {
        let slot = self.acquire()?;
        let (tx, rx) = crossbeam_channel::bounded(1);
        let worker = Arc::clone(&self.fallback);
        let question = question.to_string();

        std::thread::spawn(move || {
            let _slot = slot;
            let _ = tx.send(worker.answer(&question));
        });

        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(FallbackError::TimedOut(self.timeout)),
            Err(RecvTimeoutError::Disconnected) => Err(FallbackError::Disconnected),
        }
    }

    fn acquire(&self) -> Result<Slot, FallbackError> {
        let max = self.max_in_flight;
        self.in_flight
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| (n < max).then_some(n + 1))
            .map_err(FallbackError::Busy)?;
        Ok(Slot(Arc::clone(&self.in_flight)))
    }
}

/// One occupied in-flight slot, released on drop (also when the worker
/// panics).
struct Slot(Arc<AtomicUsize>);

impl Drop for Slot {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}
