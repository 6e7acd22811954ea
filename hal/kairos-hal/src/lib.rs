//! Kairos Hardware Abstraction Layer
//!
//! This crate defines the traits the clock core needs from the outside
//! world. Chip- and board-specific crates implement them, which keeps the
//! cooperative loop in `kairos-core` testable on the host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  kairos-core (main loop, time, router)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  kairos-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ kairos-hal-   │       │ kairos-       │
//! │   rp2040      │       │   drivers     │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`matrix::MatrixSink`] - Dot-matrix panel (intensity + frame present)
//! - [`time::TimeSource`] - Authoritative UTC source (NTP on the device)
//! - [`time::MonotonicClock`] - Monotonic milliseconds and cooperative delays
//! - [`net::TcpServer`] - Single-socket HTTP listener
//! - [`flash::FlashStorage`] - Persistent storage

#![no_std]
#![deny(unsafe_code)]

pub mod flash;
pub mod matrix;
pub mod net;
pub mod time;

// Re-export key traits at crate root for convenience
pub use flash::{FlashError, FlashStorage, StorageKey};
pub use matrix::{
    MatrixError, MatrixSink, MATRIX_HEIGHT, MATRIX_MODULES, MATRIX_WIDTH, MAX_INTENSITY,
};
pub use net::{AcceptStep, NetError, SocketPhase, TcpServer};
pub use time::{MonotonicClock, TimeSource, TimeSourceError};
