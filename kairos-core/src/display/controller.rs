//! Display controller
//!
//! Owns the sink and the framebuffer. Every draw replaces the whole frame
//! and presents it, so what the panel shows depends only on the last call.
//! Sink failures are logged and dropped; a flaky bus must not stall the
//! loop.

use kairos_hal::{MatrixSink, MonotonicClock};

use super::brightness::Brightness;
use super::frame::Frame;
use super::scroll::{first_offset, last_offset, ScrollTask};
use crate::fmt::{debug, warn};

/// Column and row of the blinking hour/minute separator
pub const SEPARATOR_PIXEL: (usize, usize) = (15, 7);

pub struct DisplayController<M> {
    sink: M,
    frame: Frame,
    brightness: Option<Brightness>,
    scroll: Option<ScrollTask>,
}

impl<M: MatrixSink> DisplayController<M> {
    pub fn new(sink: M) -> Self {
        Self {
            sink,
            frame: Frame::new(),
            brightness: None,
            scroll: None,
        }
    }

    /// Write a raw intensity, forgetting the current tier
    pub fn set_intensity(&mut self, level: u8) {
        self.brightness = None;
        if let Err(e) = self.sink.set_intensity(level) {
            warn!("display intensity {} failed: {:?}", level, e);
        }
    }

    /// Apply the tier for `hour`; the sink is written only on a change
    pub fn set_brightness_for_hour(&mut self, hour: u8) -> Brightness {
        let tier = Brightness::for_hour(hour);
        if self.brightness != Some(tier) {
            debug!("brightness -> {:?}", tier);
            match self.sink.set_intensity(tier.intensity()) {
                Ok(()) => self.brightness = Some(tier),
                Err(e) => warn!("display intensity failed: {:?}", e),
            }
        }
        tier
    }

    /// Draw `HHMM` left-aligned with the separator pixel when `blink_on`
    pub fn render_clock(&mut self, hhmm: &str, blink_on: bool) {
        self.frame.clear();
        self.frame.draw_text(hhmm, 0);
        if blink_on {
            let (x, y) = SEPARATOR_PIXEL;
            self.frame.set_pixel(x, y, true);
        }
        self.present();
    }

    /// Scroll `text` across the panel, awaiting every frame
    ///
    /// Nothing else runs on the loop until the text has left the panel.
    pub async fn scroll_text<C: MonotonicClock>(&mut self, text: &str, speed_ms: u32, clock: &mut C) {
        self.scroll = None;
        let end = last_offset(text.chars().count());
        let mut offset = first_offset();
        while offset >= end {
            self.draw_scroll_frame(text, offset);
            clock.delay_ms(speed_ms).await;
            offset -= 1;
        }
    }

    /// Begin a frame-per-tick scroll, replacing any scroll in progress
    pub fn start_scroll(&mut self, text: &str, speed_ms: u32, now_ms: u64) {
        if self.scroll.is_some() {
            debug!("scroll preempted");
        }
        self.scroll = Some(ScrollTask::new(text, speed_ms, now_ms));
    }

    /// Draw the next scroll frame if one is due
    ///
    /// Returns whether a frame was drawn. The task is dropped once its last
    /// frame has been shown.
    pub fn advance_scroll(&mut self, now_ms: u64) -> bool {
        let Some(mut task) = self.scroll.take() else {
            return false;
        };
        let drawn = match task.next_frame(now_ms) {
            Some(offset) => {
                self.draw_scroll_frame(task.text(), offset);
                true
            }
            None => false,
        };
        if !task.is_finished() {
            self.scroll = Some(task);
        }
        drawn
    }

    pub fn is_scrolling(&self) -> bool {
        self.scroll.is_some()
    }

    /// Text of the active scroll
    pub fn scrolling_text(&self) -> Option<&str> {
        self.scroll.as_ref().map(ScrollTask::text)
    }

    /// Frame interval of the active scroll
    pub fn scroll_interval_ms(&self) -> Option<u32> {
        self.scroll.as_ref().map(ScrollTask::frame_interval_ms)
    }

    pub fn brightness(&self) -> Option<Brightness> {
        self.brightness
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn sink(&self) -> &M {
        &self.sink
    }

    fn draw_scroll_frame(&mut self, text: &str, offset: i32) {
        self.frame.clear();
        self.frame.draw_text(text, offset);
        self.present();
    }

    fn present(&mut self) {
        if let Err(e) = self.sink.present(self.frame.rows()) {
            warn!("display present failed: {:?}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeClock, RecordingSink};
    use embassy_futures::block_on;

    fn controller() -> DisplayController<RecordingSink> {
        DisplayController::new(RecordingSink::default())
    }

    #[test]
    fn test_render_clock_is_idempotent() {
        let mut display = controller();
        display.render_clock("1234", true);
        let first = *display.frame();
        display.render_clock("1234", true);
        assert_eq!(*display.frame(), first);
        assert_eq!(display.sink().frames.len(), 2);
        assert_eq!(display.sink().frames[0], display.sink().frames[1]);
    }

    #[test]
    fn test_render_clock_replaces_previous_content() {
        let mut display = controller();
        display.render_clock("8888", true);
        display.render_clock("1111", false);

        let mut expected = Frame::new();
        expected.draw_text("1111", 0);
        assert_eq!(*display.frame(), expected);
        assert_eq!(display.sink().last_frame(), Some(expected.rows()));
    }

    #[test]
    fn test_separator_follows_blink() {
        let mut display = controller();
        display.render_clock("1200", true);
        assert!(display.frame().pixel(15, 7));
        display.render_clock("1200", false);
        assert!(!display.frame().pixel(15, 7));
    }

    #[test]
    fn test_brightness_written_only_on_change() {
        let mut display = controller();
        assert_eq!(display.set_brightness_for_hour(8), Brightness::High);
        display.set_brightness_for_hour(12);
        display.set_brightness_for_hour(19);
        display.set_brightness_for_hour(20);
        display.set_brightness_for_hour(23);
        assert_eq!(display.sink().intensities, [7, 4, 2]);
    }

    #[test]
    fn test_raw_intensity_resets_tier() {
        let mut display = controller();
        display.set_brightness_for_hour(10);
        display.set_intensity(5);
        display.set_brightness_for_hour(10);
        assert_eq!(display.sink().intensities, [7, 5, 7]);
    }

    #[test]
    fn test_sink_failure_is_not_fatal() {
        let mut display = DisplayController::new(RecordingSink {
            fail: true,
            ..Default::default()
        });
        display.set_brightness_for_hour(10);
        display.render_clock("0000", true);
        assert_eq!(display.brightness(), None);
        assert!(display.frame().pixel(15, 7));
    }

    #[test]
    fn test_blocking_scroll_presents_every_offset() {
        let mut display = controller();
        let mut clock = FakeClock::new(0);
        block_on(display.scroll_text("HELLO", 40, &mut clock));

        // offsets 32 down to -40 inclusive
        let frames = 32 + 40 + 1;
        assert_eq!(display.sink().frames.len(), frames);
        assert_eq!(clock.delays.len(), frames);
        assert!(clock.delays.iter().all(|&d| d == 40));
        assert!(display.frame().is_blank());
        assert!(!display.is_scrolling());
    }

    #[test]
    fn test_resumable_scroll_draws_one_frame_per_due_tick() {
        let mut display = controller();
        display.start_scroll("A", 40, 0);
        assert!(display.is_scrolling());
        assert_eq!(display.scroll_interval_ms(), Some(40));

        assert!(display.advance_scroll(0));
        assert!(!display.advance_scroll(20));
        assert!(display.advance_scroll(40));
        assert_eq!(display.sink().frames.len(), 2);

        let mut now = 40;
        while display.is_scrolling() {
            now += 40;
            display.advance_scroll(now);
        }
        // 32 down to -8 inclusive
        assert_eq!(display.sink().frames.len(), 41);
        assert!(display.frame().is_blank());
    }

    #[test]
    fn test_new_scroll_preempts_current() {
        let mut display = controller();
        display.start_scroll("FIRST", 40, 0);
        display.advance_scroll(0);
        display.advance_scroll(40);

        display.start_scroll("B", 40, 50);
        assert_eq!(display.scroll_interval_ms(), Some(40));
        for step in 0..5 {
            assert!(display.advance_scroll(50 + step * 40));
        }
        let mut expected = Frame::new();
        expected.draw_text("B", 28);
        assert_eq!(*display.frame(), expected);
        assert_eq!(display.scrolling_text(), Some("B"));
    }
}
