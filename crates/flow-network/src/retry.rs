//! Bounded retry around the topology import.
//!
//! The external simulator writes the `.net.xml` from its own process; the
//! kernel may open it before the last byte is flushed.  Retryable failures
//! ([`NetError::is_retryable`]) are attempted again after a fixed delay;
//! anything else is returned at once.
//!
//! The wait between attempts is interruptible: cancelling the
//! [`CancelToken`] wakes a blocked import immediately.

use std::path::Path;
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

use log::{debug, error, info, warn};

use flow_core::RetryPolicy;

use crate::import::load_net_xml;
use crate::topology::Topology;
use crate::{NetError, NetResult};

// ── CancelToken ───────────────────────────────────────────────────────────────

/// Shared cancellation flag.  Cloning yields a handle to the same flag.
///
/// Blocking waits park on a condition variable.  With the `tokio` feature,
/// async waits select on a `tokio_util` `CancellationToken` that
/// [`cancel`](Self::cancel) fires as well.
#[derive(Clone, Default)]
pub struct CancelToken {
    inner: Arc<CancelState>,
    #[cfg(feature = "tokio")]
    async_token: tokio_util::sync::CancellationToken,
}

#[derive(Default)]
struct CancelState {
    cancelled: Mutex<bool>,
    wake:      Condvar,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag and wake every waiter.  Idempotent.
    pub fn cancel(&self) {
        let mut cancelled = self
            .inner
            .cancelled
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *cancelled = true;
        self.inner.wake.notify_all();
        #[cfg(feature = "tokio")]
        self.async_token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        *self
            .inner
            .cancelled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Block for up to `timeout`.  Returns `true` if the token was (or
    /// became) cancelled.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let guard = self
            .inner
            .cancelled
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let (guard, _) = self
            .inner
            .wake
            .wait_timeout_while(guard, timeout, |cancelled| !*cancelled)
            .unwrap_or_else(PoisonError::into_inner);
        *guard
    }

    /// Async counterpart of [`wait_timeout`](Self::wait_timeout): suspends
    /// instead of blocking the thread.
    #[cfg(feature = "tokio")]
    pub async fn sleep(&self, timeout: Duration) -> bool {
        tokio::select! {
            _ = tokio::time::sleep(timeout) => {}
            _ = self.async_token.cancelled() => {}
        }
        self.is_cancelled()
    }
}

impl std::fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

// ── Retry loops ───────────────────────────────────────────────────────────────

/// Bookkeeping shared by the blocking and async loops.
struct Attempts {
    total: u32,
    last:  Option<NetError>,
}

impl Attempts {
    fn new(policy: &RetryPolicy) -> Self {
        Self { total: policy.attempts.max(1), last: None }
    }

    /// Settle attempt `n`.  `Some` ends the loop with that result; `None`
    /// means the failure was retryable and has been kept as the last error.
    fn settle<T>(&mut self, n: u32, result: NetResult<T>) -> Option<NetResult<T>> {
        match result {
            Ok(value) => {
                if n > 1 {
                    info!("topology import succeeded on attempt {n}/{}", self.total);
                }
                Some(Ok(value))
            }
            Err(e) if !e.is_retryable() => Some(Err(e)),
            Err(e) => {
                warn!("topology import attempt {n}/{} failed: {e}", self.total);
                self.last = Some(e);
                None
            }
        }
    }

    fn has_more(&self, n: u32) -> bool {
        n < self.total
    }

    fn exhausted<T>(self) -> NetResult<T> {
        let err = self.last.unwrap_or(NetError::Cancelled);
        error!("topology import gave up after {} attempts: {err}", self.total);
        Err(err)
    }
}

/// Run `attempt` until it succeeds, fails non-retryably, runs out of
/// attempts, or `cancel` fires.
///
/// After the last failed attempt the last error is returned unchanged.
///
/// # Errors
///
/// [`NetError::Cancelled`] if the token fires before or between attempts.
pub fn with_retry<T, F>(policy: &RetryPolicy, cancel: &CancelToken, mut attempt: F) -> NetResult<T>
where
    F: FnMut() -> NetResult<T>,
{
    let mut attempts = Attempts::new(policy);

    for n in 1..=attempts.total {
        if cancel.is_cancelled() {
            return Err(NetError::Cancelled);
        }
        if let Some(done) = attempts.settle(n, attempt()) {
            return done;
        }
        if attempts.has_more(n) {
            debug!("retrying in {:?}", policy.delay());
            if cancel.wait_timeout(policy.delay()) {
                return Err(NetError::Cancelled);
            }
        }
    }

    attempts.exhausted()
}

/// [`with_retry`] with a suspend point instead of a blocking wait.
#[cfg(feature = "tokio")]
pub async fn with_retry_async<T, F>(
    policy: &RetryPolicy,
    cancel: &CancelToken,
    mut attempt: F,
) -> NetResult<T>
where
    F: FnMut() -> NetResult<T>,
{
    let mut attempts = Attempts::new(policy);

    for n in 1..=attempts.total {
        if cancel.is_cancelled() {
            return Err(NetError::Cancelled);
        }
        if let Some(done) = attempts.settle(n, attempt()) {
            return done;
        }
        if attempts.has_more(n) && cancel.sleep(policy.delay()).await {
            return Err(NetError::Cancelled);
        }
    }

    attempts.exhausted()
}

/// Import `path`, retrying while the export is incomplete.
pub fn load_with_retry(
    path: &Path,
    policy: &RetryPolicy,
    cancel: &CancelToken,
) -> NetResult<Topology> {
    with_retry(policy, cancel, || load_net_xml(path))
}

#[cfg(feature = "tokio")]
pub async fn load_with_retry_async(
    path: &Path,
    policy: &RetryPolicy,
    cancel: &CancelToken,
) -> NetResult<Topology> {
    with_retry_async(policy, cancel, || load_net_xml(path)).await
}
