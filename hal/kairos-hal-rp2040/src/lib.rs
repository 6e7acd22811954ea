//! RP2040 / Pico W HAL for the matrix clock firmware
//!
//! Implementations of the `kairos-hal` traits on top of embassy:
//!
//! - Flash storage in the last 64 KiB of flash (`kairos_hal::FlashStorage`)
//! - NTP time source over an embassy-net UDP socket (`kairos_hal::TimeSource`)
//! - Single-socket HTTP listener over embassy-net TCP (`kairos_hal::TcpServer`)
//! - Monotonic clock backed by the embassy time driver (`kairos_hal::MonotonicClock`)

#![no_std]

pub mod clock;
pub mod flash;
pub mod ntp;
pub mod tcp;

// Re-export shared traits from kairos-hal for convenience
pub use kairos_hal::{FlashStorage as FlashStorageTrait, StorageKey};
