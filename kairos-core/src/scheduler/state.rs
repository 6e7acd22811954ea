//! Per-loop mutable state

use crate::config::{BLINK_INTERVAL_MS, RESYNC_BACKOFF_SECS, SYNC_INTERVAL_SECS};

/// Bookkeeping owned by the main loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockState {
    /// UTC seconds of the last successful sync, or of boot
    pub last_sync_epoch: u64,
    /// Separator pixel visibility
    pub blink_on: bool,
    /// Monotonic instant of the last separator flip
    pub blink_last_toggle_ms: u64,
    /// Earliest UTC second at which a scheduled resync may run
    pub next_resync_attempt: u64,
}

impl ClockState {
    pub fn new(utc_now: u64, now_ms: u64) -> Self {
        Self {
            last_sync_epoch: utc_now,
            blink_on: true,
            blink_last_toggle_ms: now_ms,
            next_resync_attempt: 0,
        }
    }

    /// Scheduled resync is due and not held back by a recent failure
    pub fn resync_due(&self, utc_now: u64) -> bool {
        utc_now.saturating_sub(self.last_sync_epoch) > SYNC_INTERVAL_SECS
            && utc_now >= self.next_resync_attempt
    }

    pub fn record_sync(&mut self, epoch: u64) {
        self.last_sync_epoch = epoch;
        self.next_resync_attempt = 0;
    }

    pub fn defer_resync(&mut self, utc_now: u64) {
        self.next_resync_attempt = utc_now + RESYNC_BACKOFF_SECS;
    }

    /// Flip the separator once more than the blink interval has passed
    pub fn update_blink(&mut self, now_ms: u64) -> bool {
        if now_ms.saturating_sub(self.blink_last_toggle_ms) > BLINK_INTERVAL_MS {
            self.blink_on = !self.blink_on;
            self.blink_last_toggle_ms = now_ms;
            true
        } else {
            false
        }
    }
}
