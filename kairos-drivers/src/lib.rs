//! Hardware driver implementations
//!
//! Concrete implementations behind the traits in `kairos-hal`:
//!
//! - MAX7219 LED matrix chain (FC-16 layout) over an `embedded-hal` SPI device
//! - SNTP packet encoding and decoding for the network time source

#![no_std]
#![deny(unsafe_code)]

pub mod max7219;
pub mod ntp;
