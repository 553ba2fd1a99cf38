//! Latest-request-wins gating for refreshes that may overlap.
//!
//! Every refresh takes a [`RequestToken`] from [`RequestGate::begin`]. When it finishes it
//! hands its result to [`RequestGate::complete`], which publishes it only if no newer
//! request began in the meantime. A slow, stale refresh therefore never overwrites a
//! newer snapshot.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn id(self) -> u64 {
        self.0
    }
}

struct GateInner<T> {
    issued: AtomicU64,
    latest: Mutex<Option<Arc<T>>>,
}

pub struct RequestGate<T> {
    inner: Arc<GateInner<T>>,
}

impl<T> Clone for RequestGate<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for RequestGate<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RequestGate<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(GateInner {
                issued: AtomicU64::new(0),
                latest: Mutex::new(None),
            }),
        }
    }

    pub fn begin(&self) -> RequestToken {
        RequestToken(self.inner.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.inner.issued.load(Ordering::SeqCst) == token.0
    }

    /// Publish `value` if `token` is still the newest request.
    ///
    /// Returns the published value, or `None` when the result was stale and dropped.
    pub fn complete(&self, token: RequestToken, value: T) -> Option<Arc<T>> {
        let mut latest = self
            .inner
            .latest
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // Checked under the lock so a newer completion cannot be overwritten.
        if !self.is_current(token) {
            log::debug!(
                "dropping stale result for request {} (latest is {})",
                token.0,
                self.inner.issued.load(Ordering::SeqCst)
            );
            return None;
        }
        let value = Arc::new(value);
        *latest = Some(Arc::clone(&value));
        Some(value)
    }

    /// Settle a finished request whose work may have failed.
    ///
    /// Success goes through [`complete`](Self::complete). A failure is returned only while
    /// `token` is still current; a stale failure is dropped like a stale result.
    pub fn settle<E>(
        &self,
        token: RequestToken,
        result: std::result::Result<T, E>,
    ) -> std::result::Result<Option<Arc<T>>, E> {
        match result {
            Ok(value) => Ok(self.complete(token, value)),
            Err(_) if !self.is_current(token) => {
                log::debug!("dropping stale failure for request {}", token.0);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub fn latest(&self) -> Option<Arc<T>> {
        self.inner
            .latest
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}
