//! Dot-matrix display abstractions
//!
//! The panel is a row of chained 8×8 modules. Frames are handed over as
//! one `u32` per pixel row, bit 31 being the leftmost column.

/// Number of chained 8×8 modules
pub const MATRIX_MODULES: usize = 4;

/// Panel width in pixels
pub const MATRIX_WIDTH: usize = MATRIX_MODULES * 8;

/// Panel height in pixels
pub const MATRIX_HEIGHT: usize = 8;

/// Highest intensity level accepted by [`MatrixSink::set_intensity`]
pub const MAX_INTENSITY: u8 = 15;

/// Errors from the display sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MatrixError {
    /// Bus transfer failed
    Bus,
    /// Intensity outside 0..=MAX_INTENSITY
    InvalidIntensity,
}

/// Monochrome dot-matrix sink
///
/// Pixel set/clear happens in the caller's framebuffer; the sink only
/// receives complete frames.
pub trait MatrixSink {
    /// Set the panel intensity (0..=15)
    fn set_intensity(&mut self, level: u8) -> Result<(), MatrixError>;

    /// Present a complete frame
    fn present(&mut self, rows: &[u32; MATRIX_HEIGHT]) -> Result<(), MatrixError>;
}
