//! Time abstractions
//!
//! Two distinct clocks: a monotonic millisecond counter that never jumps,
//! and an external source of wall-clock UTC that may be unavailable.

/// Errors from the UTC time source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeSourceError {
    /// No network link to reach the source
    NotConnected,
    /// Server name could not be resolved
    Dns,
    /// Socket could not be bound or used
    Socket,
    /// No reply within the timeout
    Timeout,
    /// Reply was malformed or carried an unusable timestamp
    InvalidResponse,
}

/// Authoritative UTC source
pub trait TimeSource {
    /// Fetch the current UTC time as Unix seconds
    fn fetch_utc(&mut self) -> impl core::future::Future<Output = Result<u64, TimeSourceError>>;
}

/// Monotonic clock with cooperative delays
pub trait MonotonicClock {
    /// Milliseconds since boot
    fn now_ms(&self) -> u64;

    /// Suspend the caller for `ms` milliseconds
    fn delay_ms(&mut self, ms: u32) -> impl core::future::Future<Output = ()>;
}
