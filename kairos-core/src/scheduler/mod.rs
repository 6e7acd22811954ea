//! Cooperative main loop
//!
//! One task, one loop. Each tick resyncs when due, flips the separator,
//! renders, polls the HTTP socket briefly and sleeps.

pub mod main_loop;
pub mod state;

pub use main_loop::{MainLoop, TickReport};
pub use state::ClockState;
