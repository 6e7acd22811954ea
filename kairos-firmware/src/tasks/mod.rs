//! Embassy async tasks
//!
//! Driver pumps for the radio and the IP stack. Application logic runs in
//! the main task only.

pub mod net;
pub mod radio;

pub use net::net_task;
pub use radio::cyw43_task;
