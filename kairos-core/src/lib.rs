//! Board-agnostic core logic for the matrix clock firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Civil calendar math and the EET/EEST local-time rule
//! - NTP-anchored time service with retry
//! - Frame rendering, brightness tiers and text scrolling
//! - HTTP request tokenizing and the request router
//! - The cooperative main loop
//! - Configuration constants and persisted network settings

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

mod fmt;

pub mod config;
pub mod display;
pub mod http;
pub mod router;
pub mod scheduler;
pub mod time;

#[cfg(test)]
pub(crate) mod testing;
