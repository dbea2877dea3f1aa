//! Sliding-window rate limiting for outbound API requests.
//!
//! FirstPromoter allows 400 requests per minute per account. The limiter
//! keeps admitted timestamps for the trailing 60 seconds and suspends
//! callers once the configured ceiling is reached, so the process as a
//! whole never bursts past the upstream limit.
//!
//! The prune-check-append sequence runs under a single mutex, so
//! concurrent callers cannot both observe a free slot and over-admit.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};
use tracing::debug;

/// Default admission ceiling, leaving headroom under the upstream 400/min.
const DEFAULT_CEILING: usize = 380;

/// Length of the sliding window.
const WINDOW: Duration = Duration::from_secs(60);

/// Margin added to computed waits so the expiring entry is really gone.
const WAIT_MARGIN: Duration = Duration::from_millis(50);

/// Sliding-window limiter shared by all in-flight calls of one client.
///
/// Construct one per client (or per test) rather than sharing process-wide
/// state; the executor takes it by reference for every attempt, retries
/// included.
pub struct RateLimiter {
    ceiling: usize,
    window: Mutex<VecDeque<Instant>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_CEILING)
    }
}

impl RateLimiter {
    /// Create a limiter admitting at most `ceiling` requests per minute.
    ///
    /// A ceiling of zero is clamped to one; a limiter that can never admit
    /// would suspend callers forever.
    #[must_use]
    pub fn new(ceiling: usize) -> Self {
        Self {
            ceiling: ceiling.max(1),
            window: Mutex::new(VecDeque::new()),
        }
    }

    /// Suspend until another request may be dispatched, then record it.
    ///
    /// Never fails; the only outcome is eventual admission. Entries older
    /// than the window are pruned before every check, so the window cannot
    /// grow without bound.
    pub async fn admit(&self) {
        loop {
            let wait = {
                let mut window = self.window.lock().await;
                let now = Instant::now();

                while window
                    .front()
                    .is_some_and(|oldest| now.duration_since(*oldest) >= WINDOW)
                {
                    window.pop_front();
                }

                if window.len() < self.ceiling {
                    window.push_back(now);
                    return;
                }

                // Full. Wait until the oldest entry leaves the window,
                // then re-check rather than assume a single slot opened.
                match window.front() {
                    Some(oldest) => (*oldest + WINDOW + WAIT_MARGIN).duration_since(now),
                    None => Duration::ZERO,
                }
            };

            debug!(
                wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                "rate ceiling reached; waiting for admission"
            );
            sleep(wait).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;

    #[tokio::test(start_paused = true)]
    async fn test_admits_up_to_ceiling_without_waiting() {
        let limiter = RateLimiter::new(3);
        let start = Instant::now();
        for _ in 0..3 {
            limiter.admit().await;
        }
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_for_oldest_entry_to_expire() {
        let limiter = RateLimiter::new(2);
        limiter.admit().await;
        limiter.admit().await;

        let start = Instant::now();
        limiter.admit().await;
        assert!(start.elapsed() >= WINDOW);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pruned_entries_free_slots() {
        let limiter = RateLimiter::new(2);
        limiter.admit().await;
        limiter.admit().await;

        advance(WINDOW + Duration::from_millis(100)).await;

        let start = Instant::now();
        limiter.admit().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_ceiling_clamped_to_one() {
        let limiter = RateLimiter::new(0);
        limiter.admit().await;
    }
}
