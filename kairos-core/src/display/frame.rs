//! 32×8 monochrome framebuffer

use core::convert::Infallible;

use embedded_graphics::mono_font::ascii::FONT_5X8;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use kairos_hal::{MATRIX_HEIGHT, MATRIX_WIDTH};

/// Horizontal advance of one character in pixels
pub const GLYPH_PITCH: i32 = 8;

/// 5×8 glyphs padded to one module per character
const MATRIX_FONT: MonoFont<'static> = MonoFont {
    character_spacing: 3,
    ..FONT_5X8
};

/// Panel bitmap, one `u32` per row with bit 31 as column 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Frame {
    rows: [u32; MATRIX_HEIGHT],
}

impl Frame {
    pub const fn new() -> Self {
        Self {
            rows: [0; MATRIX_HEIGHT],
        }
    }

    pub fn clear(&mut self) {
        self.rows = [0; MATRIX_HEIGHT];
    }

    /// Set or clear one pixel; out-of-range coordinates are ignored
    pub fn set_pixel(&mut self, x: usize, y: usize, on: bool) {
        if x >= MATRIX_WIDTH || y >= MATRIX_HEIGHT {
            return;
        }
        let mask = 1u32 << (31 - x);
        if on {
            self.rows[y] |= mask;
        } else {
            self.rows[y] &= !mask;
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        x < MATRIX_WIDTH && y < MATRIX_HEIGHT && self.rows[y] & (1u32 << (31 - x)) != 0
    }

    /// Draw `text` with its left edge at column `x`, clipping at the panel
    pub fn draw_text(&mut self, text: &str, x: i32) {
        let font = MATRIX_FONT;
        let style = MonoTextStyle::new(&font, BinaryColor::On);
        let _ = Text::with_baseline(text, Point::new(x, 0), style, Baseline::Top).draw(self);
    }

    pub fn rows(&self) -> &[u32; MATRIX_HEIGHT] {
        &self.rows
    }

    pub fn is_blank(&self) -> bool {
        self.rows.iter().all(|row| *row == 0)
    }
}

impl OriginDimensions for Frame {
    fn size(&self) -> Size {
        Size::new(MATRIX_WIDTH as u32, MATRIX_HEIGHT as u32)
    }
}

impl DrawTarget for Frame {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            self.set_pixel(point.x as usize, point.y as usize, color.is_on());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit_columns(frame: &Frame) -> impl Iterator<Item = usize> + '_ {
        (0..MATRIX_WIDTH).filter(move |&x| (0..MATRIX_HEIGHT).any(|y| frame.pixel(x, y)))
    }

    #[test]
    fn test_pixel_bit_layout() {
        let mut frame = Frame::new();
        frame.set_pixel(0, 0, true);
        frame.set_pixel(31, 7, true);
        frame.set_pixel(15, 7, true);
        assert_eq!(frame.rows()[0], 0x8000_0000);
        assert_eq!(frame.rows()[7], 0x0001_0001);

        frame.set_pixel(31, 7, false);
        assert_eq!(frame.rows()[7], 0x0001_0000);

        frame.set_pixel(32, 0, true);
        frame.set_pixel(0, 8, true);
        assert_eq!(frame.rows()[0], 0x8000_0000);
    }

    #[test]
    fn test_glyphs_use_one_module_each() {
        let mut frame = Frame::new();
        frame.draw_text("8888", 0);
        for column in lit_columns(&frame) {
            assert!(column % 8 < 5, "column {} outside glyph cell", column);
        }
        for module in 0..4 {
            assert!(lit_columns(&frame).any(|c| c / 8 == module));
        }
    }

    #[test]
    fn test_text_clips_at_edges() {
        let mut frame = Frame::new();
        frame.draw_text("A", -8);
        assert!(frame.is_blank());

        frame.draw_text("A", 32);
        assert!(frame.is_blank());

        frame.draw_text("A", 28);
        assert!(lit_columns(&frame).all(|c| c >= 28));
        assert!(!frame.is_blank());
    }
}
