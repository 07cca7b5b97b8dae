//! Debounced search input.
//!
//! Search-as-you-type fires one request per quiet period rather than one
//! per keystroke: each new input supersedes the previous one, and only the
//! value still current after the delay settles. Cooperative timers only, no
//! background threads.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Delay before a search input settles.
pub const SEARCH_DELAY: Duration = Duration::from_millis(350);

/// Delay-then-fire debouncer with cancel-on-new-input.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    seq: Arc<AtomicU64>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(SEARCH_DELAY)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Wait out the quiet period for `value`.
    ///
    /// Returns `Some(value)` if no newer input arrived while waiting, and
    /// `None` for superseded or cancelled inputs.
    pub async fn settle<T>(&self, value: T) -> Option<T> {
        let ticket = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;
        (self.seq.load(Ordering::SeqCst) == ticket).then_some(value)
    }

    /// Invalidate any input currently waiting to settle.
    pub fn cancel(&self) {
        self.seq.fetch_add(1, Ordering::SeqCst);
    }
}
