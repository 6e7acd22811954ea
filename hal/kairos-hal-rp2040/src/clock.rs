//! Monotonic clock backed by the embassy time driver

use embassy_time::{Duration, Instant, Timer};
use kairos_hal::MonotonicClock;

/// Zero-sized handle to the embassy time driver
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl MonotonicClock for EmbassyClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }

    async fn delay_ms(&mut self, ms: u32) {
        Timer::after(Duration::from_millis(u64::from(ms))).await
    }
}
