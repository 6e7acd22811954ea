//! Resumable text scroll
//!
//! A scroll moves the text left one pixel per frame, from just beyond the
//! right edge until the last glyph has left the panel. The task only tracks
//! where the next frame goes and when it is due; drawing is the
//! controller's job.

use heapless::String;
use kairos_hal::MATRIX_WIDTH;

use super::frame::GLYPH_PITCH;
use crate::config::MAX_MESSAGE_LEN;

/// Copy `text` into a bounded string, stopping at the last whole char that fits
pub fn truncate_text<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Left edge of the first frame
pub const fn first_offset() -> i32 {
    MATRIX_WIDTH as i32
}

/// Left edge of the final frame for a text of `chars` characters
pub const fn last_offset(chars: usize) -> i32 {
    -(chars as i32 * GLYPH_PITCH)
}

/// In-flight scroll animation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollTask {
    text: String<MAX_MESSAGE_LEN>,
    offset: i32,
    end_offset: i32,
    frame_interval_ms: u32,
    next_frame_ms: u64,
}

impl ScrollTask {
    /// New task whose first frame is due at `now_ms`
    pub fn new(text: &str, frame_interval_ms: u32, now_ms: u64) -> Self {
        let text: String<MAX_MESSAGE_LEN> = truncate_text(text);
        let end_offset = last_offset(text.chars().count());
        Self {
            text,
            offset: first_offset(),
            end_offset,
            frame_interval_ms,
            next_frame_ms: now_ms,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn frame_interval_ms(&self) -> u32 {
        self.frame_interval_ms
    }

    pub fn is_due(&self, now_ms: u64) -> bool {
        now_ms >= self.next_frame_ms
    }

    pub fn is_finished(&self) -> bool {
        self.offset < self.end_offset
    }

    /// Claim the next frame if due; returns the left edge to draw at
    pub fn next_frame(&mut self, now_ms: u64) -> Option<i32> {
        if self.is_finished() || !self.is_due(now_ms) {
            return None;
        }
        let offset = self.offset;
        self.offset -= 1;
        self.next_frame_ms = now_ms + u64::from(self.frame_interval_ms);
        Some(offset)
    }
}
