//! NTP-anchored UTC clock
//!
//! The service keeps a single anchor: the UTC instant of the last
//! successful sync paired with the monotonic reading taken when the reply
//! arrived. UTC "now" is the anchor plus elapsed monotonic time, so a slow
//! or absent network never makes the displayed time jump backwards.

use kairos_hal::{MonotonicClock, TimeSource, TimeSourceError};

use super::local::{local_time, LocalTime};
use crate::fmt::{info, warn};

/// Result of one [`TimeService::synchronize`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncOutcome {
    /// A reply was committed
    Synced {
        /// UTC seconds reported by the source
        epoch: u64,
        /// Attempt that succeeded, starting at 1
        attempts: u8,
    },
    /// Every attempt failed; the previous anchor is kept
    Failed {
        /// Error of the final attempt, `None` when no attempt was made
        last_error: Option<TimeSourceError>,
    },
}

impl SyncOutcome {
    pub fn is_synced(&self) -> bool {
        matches!(self, SyncOutcome::Synced { .. })
    }
}

/// UTC clock owner
pub struct TimeService<S> {
    source: S,
    anchor_utc_ms: u64,
    anchor_mono_ms: u64,
    last_sync: Option<u64>,
}

impl<S: TimeSource> TimeService<S> {
    /// Create a service that reports `boot_epoch` at monotonic `now_ms`
    pub fn new(source: S, boot_epoch: u64, now_ms: u64) -> Self {
        Self {
            source,
            anchor_utc_ms: boot_epoch * 1_000,
            anchor_mono_ms: now_ms,
            last_sync: None,
        }
    }

    /// Fetch UTC from the source, retrying up to `retries` times
    ///
    /// Sleeps `delay_ms` after every failed attempt. A success re-anchors
    /// the clock at the monotonic instant the reply was received.
    pub async fn synchronize<C: MonotonicClock>(
        &mut self,
        clock: &mut C,
        retries: u8,
        delay_ms: u32,
    ) -> SyncOutcome {
        let mut last_error = None;

        for attempt in 1..=retries {
            match self.source.fetch_utc().await {
                Ok(epoch) => {
                    self.commit(epoch, clock.now_ms());
                    info!("time synced to {} on attempt {}", epoch, attempt);
                    return SyncOutcome::Synced {
                        epoch,
                        attempts: attempt,
                    };
                }
                Err(e) => {
                    warn!("time sync attempt {} failed: {:?}", attempt, e);
                    last_error = Some(e);
                    clock.delay_ms(delay_ms).await;
                }
            }
        }

        warn!("time sync gave up, keeping previous clock");
        SyncOutcome::Failed { last_error }
    }

    fn commit(&mut self, epoch: u64, now_ms: u64) {
        self.anchor_utc_ms = epoch * 1_000;
        self.anchor_mono_ms = now_ms;
        self.last_sync = Some(epoch);
    }

    /// Current UTC in Unix seconds
    pub fn utc_now<C: MonotonicClock>(&self, clock: &C) -> u64 {
        let elapsed = clock.now_ms().saturating_sub(self.anchor_mono_ms);
        (self.anchor_utc_ms + elapsed) / 1_000
    }

    /// Local time for a UTC instant
    pub fn local_time(&self, utc: u64) -> LocalTime {
        local_time(utc)
    }

    /// UTC seconds committed by the last successful sync
    pub fn last_sync(&self) -> Option<u64> {
        self.last_sync
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
