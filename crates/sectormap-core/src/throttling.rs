use std::fmt::{Debug, Formatter};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::clock::{Clock, DefaultClock};
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Fixed-interval gate placed in front of every upstream request.
///
/// The first request passes immediately; each following one waits until
/// `interval` has elapsed since the previous admission.
#[derive(Clone)]
pub struct RequestGate {
    limiter: Option<Arc<DirectRateLimiter>>,
    interval: Duration,
}

impl RequestGate {
    /// A zero interval yields an unthrottled gate.
    pub fn fixed_interval(interval: Duration) -> Self {
        let limiter = Quota::with_period(interval)
            .map(|quota| Arc::new(RateLimiter::direct(quota.allow_burst(NonZeroU32::MIN))));

        Self { limiter, interval }
    }

    pub fn unthrottled() -> Self {
        Self {
            limiter: None,
            interval: Duration::ZERO,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_throttled(&self) -> bool {
        self.limiter.is_some()
    }

    /// Takes a slot without waiting. When none is free, returns how long the
    /// caller would have to wait.
    pub fn try_acquire(&self) -> Result<(), Duration> {
        let Some(limiter) = &self.limiter else {
            return Ok(());
        };

        limiter
            .check()
            .map_err(|not_until| not_until.wait_time_from(DefaultClock::default().now()))
    }

    /// Waits cooperatively until the next request may be sent.
    pub async fn wait(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}

impl Debug for RequestGate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestGate")
            .field("interval", &self.interval)
            .field("throttled", &self.is_throttled())
            .finish()
    }
}
