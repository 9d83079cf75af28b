use std::{num::NonZeroU32, thread::sleep, time::Duration};

use governor::{
    Quota, RateLimiter,
    clock::{Clock, DefaultClock},
    state::{InMemoryState, NotKeyed},
};

/// Blocking request throttle for services with a published rate limit.
///
/// The first call goes through immediately; later calls sleep until the
/// quota has a permit again.
pub struct Throttle {
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl Throttle {
    pub fn new(quota: Quota) -> Self {
        Self {
            limiter: RateLimiter::direct(quota),
        }
    }

    pub fn per_second(requests: NonZeroU32) -> Self {
        Self::new(Quota::per_second(requests))
    }

    /// One request per `interval`; `None` for a zero interval.
    pub fn every(interval: Duration) -> Option<Self> {
        Quota::with_period(interval).map(Self::new)
    }

    /// Blocks until the next request may be sent.
    pub fn wait(&self) {
        while let Err(not_until) = self.limiter.check() {
            sleep(not_until.wait_time_from(DefaultClock::default().now()));
        }
    }
}
