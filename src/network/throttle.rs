//! Outbound flood control.
//!
//! Uses the `governor` crate's token bucket: `burst` lines may go out back to
//! back, after which lines leave at `lines_per_second`.

use crate::config::FloodConfig;
use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use std::num::NonZeroU32;
use tracing::debug;

/// Type alias for governor's direct rate limiter.
type DirectRateLimiter = governor::DefaultDirectRateLimiter;

/// Paces the write loop. Disabled throttles never wait.
#[derive(Debug)]
pub struct Throttle {
    limiter: Option<DirectRateLimiter>,
}

impl Throttle {
    pub fn new(lines_per_second: u32, burst: u32) -> Self {
        let rate = NonZeroU32::new(lines_per_second).unwrap_or(nonzero!(2u32));
        let burst = NonZeroU32::new(burst).unwrap_or(nonzero!(4u32));
        Self {
            limiter: Some(RateLimiter::direct(Quota::per_second(rate).allow_burst(burst))),
        }
    }

    pub fn unlimited() -> Self {
        Self { limiter: None }
    }

    pub fn from_config(config: &FloodConfig) -> Self {
        if config.enabled {
            debug!(
                lines_per_second = config.lines_per_second,
                burst = config.burst,
                "Flood control enabled"
            );
            Self::new(config.lines_per_second, config.burst)
        } else {
            Self::unlimited()
        }
    }

    pub fn is_limited(&self) -> bool {
        self.limiter.is_some()
    }

    /// Wait until one more line may be sent.
    pub async fn ready(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }

    /// Take one line's worth of budget without waiting. `true` if allowed.
    pub fn try_take(&self) -> bool {
        self.limiter
            .as_ref()
            .is_none_or(|limiter| limiter.check().is_ok())
    }
}
