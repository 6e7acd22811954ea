//! MAX7219 LED matrix driver
//!
//! Four MAX7219s are daisy-chained on one SPI bus, each driving an 8×8
//! module. A register write is a 16-bit word (address, data) per chip; the
//! chain shifts words along, so one transaction carries one word for every
//! chip and the first word sent lands in the last chip of the chain.
//!
//! # FC-16 layout
//!
//! The leftmost module is the last chip in the chain, and within a module
//! bit 7 of a digit register is the leftmost column. A frame row
//! therefore maps to the chain as:
//!
//! ```text
//! row bits  31..24   23..16   15..8    7..0
//! module      0        1        2       3
//! sent      first                      last
//! ```

use embedded_hal::spi::SpiDevice;
use kairos_hal::{MatrixError, MatrixSink, MATRIX_HEIGHT, MATRIX_MODULES, MAX_INTENSITY};

/// MAX7219 register addresses
pub mod reg {
    /// No-op, used to skip a chip in the chain
    pub const NOOP: u8 = 0x00;
    /// First row register; rows are `DIGIT0 + y`
    pub const DIGIT0: u8 = 0x01;
    /// BCD decode per digit
    pub const DECODE_MODE: u8 = 0x09;
    /// LED current, 0..=15
    pub const INTENSITY: u8 = 0x0A;
    /// Number of scanned digits minus one
    pub const SCAN_LIMIT: u8 = 0x0B;
    /// 0 = shutdown, 1 = normal operation
    pub const SHUTDOWN: u8 = 0x0C;
    /// 1 = all LEDs on
    pub const DISPLAY_TEST: u8 = 0x0F;
}

/// Bytes in one chain-wide transaction
const PACKET_LEN: usize = MATRIX_MODULES * 2;

/// MAX7219 chain driver
pub struct Max7219<SPI> {
    spi: SPI,
}

impl<SPI: SpiDevice> Max7219<SPI> {
    /// Wrap an SPI device whose chip select frames the whole chain
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Bring every chip out of shutdown with a blank display
    pub fn init(&mut self, intensity: u8) -> Result<(), MatrixError> {
        self.broadcast(reg::SHUTDOWN, 0)?;
        self.broadcast(reg::DISPLAY_TEST, 0)?;
        self.broadcast(reg::SCAN_LIMIT, 7)?;
        self.broadcast(reg::DECODE_MODE, 0)?;
        for row in 0..MATRIX_HEIGHT {
            self.broadcast(reg::DIGIT0 + row as u8, 0)?;
        }
        self.set_intensity(intensity)?;
        self.broadcast(reg::SHUTDOWN, 1)
    }

    /// Give back the SPI device
    pub fn release(self) -> SPI {
        self.spi
    }

    /// Same register value on every chip
    fn broadcast(&mut self, register: u8, value: u8) -> Result<(), MatrixError> {
        let mut packet = [0u8; PACKET_LEN];
        for word in packet.chunks_exact_mut(2) {
            word[0] = register;
            word[1] = value;
        }
        self.send(&packet)
    }

    /// One frame row spread across the chain, leftmost module first
    fn write_row(&mut self, row: usize, bits: u32) -> Result<(), MatrixError> {
        let mut packet = [0u8; PACKET_LEN];
        for (module, word) in packet.chunks_exact_mut(2).enumerate() {
            let shift = 24 - 8 * module;
            word[0] = reg::DIGIT0 + row as u8;
            word[1] = (bits >> shift) as u8;
        }
        self.send(&packet)
    }

    fn send(&mut self, packet: &[u8; PACKET_LEN]) -> Result<(), MatrixError> {
        self.spi.write(packet).map_err(|_| MatrixError::Bus)
    }
}

impl<SPI: SpiDevice> MatrixSink for Max7219<SPI> {
    fn set_intensity(&mut self, level: u8) -> Result<(), MatrixError> {
        if level > MAX_INTENSITY {
            return Err(MatrixError::InvalidIntensity);
        }
        self.broadcast(reg::INTENSITY, level)
    }

    fn present(&mut self, rows: &[u32; MATRIX_HEIGHT]) -> Result<(), MatrixError> {
        for (row, bits) in rows.iter().enumerate() {
            self.write_row(row, *bits)?;
        }
        Ok(())
    }
}
