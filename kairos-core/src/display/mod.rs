//! Display pipeline
//!
//! Glyphs are rasterized into a [`Frame`] with `embedded-graphics`, the
//! [`DisplayController`] decides what the frame shows, and the finished
//! rows are handed to a [`kairos_hal::MatrixSink`].

pub mod brightness;
pub mod controller;
pub mod frame;
pub mod scroll;

pub use brightness::Brightness;
pub use controller::DisplayController;
pub use frame::{Frame, GLYPH_PITCH};
pub use scroll::ScrollTask;
