//! Network settings loading
//!
//! Reads Wi-Fi credentials from flash, provisioning them from build-time
//! values on first boot.

pub mod loader;

pub use loader::ConfigPersistence;
