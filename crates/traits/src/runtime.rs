//! Time source abstraction.

use std::time::Instant;

/// Monotonic time source.
pub trait Clock: Send + Sync + 'static {
    /// Current instant.
    fn now(&self) -> Instant;
}

/// [`Clock`] backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
