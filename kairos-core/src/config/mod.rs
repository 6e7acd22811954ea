//! Configuration
//!
//! Fixed timing constants for the cooperative loop and the network
//! settings persisted in flash as postcard binary data.

pub mod network;
pub mod timing;

pub use network::*;
pub use timing::*;
