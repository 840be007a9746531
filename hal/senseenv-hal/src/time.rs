//! Time abstractions
//!
//! The driver bounds its availability poll with wall-clock time. Delay
//! (sleeping) uses `embedded_hal::delay::DelayNs` directly; only the
//! monotonic clock needs its own seam.

/// Monotonic millisecond clock
///
/// Wrap-around is not handled; implementations should use a counter wide
/// enough for the process lifetime (u64 milliseconds is ~584 million years).
pub trait Clock {
    /// Milliseconds elapsed since an arbitrary fixed origin
    fn now_ms(&self) -> u64;
}

impl<C: Clock> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}
