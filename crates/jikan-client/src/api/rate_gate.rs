//! Minimum-spacing rate gate shared by every outbound request.
//!
//! The gate remembers when the last request was dispatched and delays the
//! next caller until `min_spacing` has elapsed since then.
//!
//! Spacing is best-effort. The timestamp is read before sleeping and written
//! after waking, with no lock held in between, so concurrent callers that read
//! the same stale timestamp wake together and dispatch in a short burst. Each
//! of them still respects the floor relative to the timestamp it observed.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Minimum time between two outbound requests
pub const MIN_REQUEST_DELAY: Duration = Duration::from_millis(500);

/// Rate gate enforcing a minimum delay between dispatches
#[derive(Debug)]
pub struct RateGate {
    /// Minimum spacing between dispatches
    min_spacing: Duration,
    /// Last recorded dispatch
    last_request: Mutex<Option<Instant>>,
}

impl RateGate {
    /// Create a new rate gate
    pub fn new(min_spacing: Duration) -> Self {
        Self {
            min_spacing,
            last_request: Mutex::new(None),
        }
    }

    /// Wait until it is safe to dispatch, then record the dispatch time
    pub async fn acquire(&self) {
        let now = Instant::now();
        let last = *self.state();

        if let Some(last) = last {
            let elapsed = now.saturating_duration_since(last);
            if elapsed < self.min_spacing {
                let wait_time = self.min_spacing - elapsed;
                tracing::debug!(
                    wait_ms = wait_time.as_millis() as u64,
                    "Rate gate: waiting before dispatch"
                );
                sleep(wait_time).await;
            }
        }

        *self.state() = Some(Instant::now());
    }

    /// Timestamp of the last recorded dispatch, if any
    pub fn last_request(&self) -> Option<Instant> {
        *self.state()
    }

    /// Forget the last dispatch so the next caller proceeds immediately
    pub fn reset(&self) {
        *self.state() = None;
    }

    fn state(&self) -> MutexGuard<'_, Option<Instant>> {
        // The guarded value is a plain timestamp; a poisoned lock still holds a usable one.
        self.last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for RateGate {
    fn default() -> Self {
        Self::new(MIN_REQUEST_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_first_acquire_does_not_wait() {
        let gate = RateGate::default();
        let start = Instant::now();

        gate.acquire().await;

        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(gate.last_request(), Some(start));
    }

    #[tokio::test(start_paused = true)]
    async fn test_back_to_back_acquires_are_spaced() {
        let gate = RateGate::default();
        let start = Instant::now();

        // Three dispatches: immediate, +500ms, +1000ms
        for _ in 0..3 {
            gate.acquire().await;
        }

        assert_eq!(start.elapsed(), Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_only_for_remaining_spacing() {
        let gate = RateGate::default();
        gate.acquire().await;

        tokio::time::advance(Duration::from_millis(300)).await;
        let before = Instant::now();
        gate.acquire().await;

        assert_eq!(before.elapsed(), Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_wait_after_spacing_elapsed() {
        let gate = RateGate::default();
        gate.acquire().await;

        tokio::time::advance(Duration::from_millis(800)).await;
        let before = Instant::now();
        gate.acquire().await;

        assert_eq!(before.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_clears_last_request() {
        let gate = RateGate::default();
        gate.acquire().await;
        gate.reset();
        assert_eq!(gate.last_request(), None);

        let before = Instant::now();
        gate.acquire().await;
        assert_eq!(before.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_share_stale_timestamp() {
        let gate = Arc::new(RateGate::default());
        gate.acquire().await;
        let start = Instant::now();

        let first = {
            let gate = Arc::clone(&gate);
            async move {
                gate.acquire().await;
                Instant::now()
            }
        };
        let second = {
            let gate = Arc::clone(&gate);
            async move {
                gate.acquire().await;
                Instant::now()
            }
        };

        let (a, b) = tokio::join!(first, second);

        // Both observed the same last dispatch and woke together.
        assert_eq!(a - start, Duration::from_millis(500));
        assert_eq!(b - start, Duration::from_millis(500));
    }
}
