//! Scrollbar geometry: pixel scroll position to logical row offset
//!
//! The track is a virtual strip `visible_height * total_rows / page_size`
//! pixels tall, so one row maps to `visible_height / page_size` pixels.

use super::metadata::GridMetadata;
use crate::timer::TimerSlot;

/// Quiet period after the last scroll event before `ScrollIdle` is reported
pub const SCROLL_IDLE_MS: u64 = 1200;

#[derive(Debug, Clone)]
pub struct GridScroller {
    visible_height: f64,
    track_height: f64,
    row_height: f64,
    scroll_top: f64,
    last_scroll_pos: f64,
    plugged: bool,
    /// Debounce for the idle notification
    pub idle: TimerSlot,
}

impl GridScroller {
    pub fn new(visible_height: f64, meta: &GridMetadata) -> Self {
        let mut scroller = Self {
            visible_height,
            track_height: 0.0,
            row_height: 0.0,
            scroll_top: 0.0,
            last_scroll_pos: 0.0,
            plugged: true,
            idle: TimerSlot::new(),
        };
        scroller.update_size(meta);
        scroller
    }

    /// Recompute the track after the row count or page size changed
    pub fn update_size(&mut self, meta: &GridMetadata) {
        let page = meta.page_size().max(1) as f64;
        self.track_height = (self.visible_height * meta.total_rows() as f64 / page).trunc();
        self.row_height = self.visible_height / page;
        self.scroll_top = self.scroll_top.min(self.max_scroll_top());
    }

    pub fn visible_height(&self) -> f64 {
        self.visible_height
    }

    pub fn track_height(&self) -> f64 {
        self.track_height
    }

    pub fn row_height(&self) -> f64 {
        self.row_height
    }

    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    fn max_scroll_top(&self) -> f64 {
        (self.track_height - self.visible_height).max(0.0)
    }

    /// Logical row offset for a pixel position on the track
    pub fn content_offset(&self, scroll_top: f64, total_rows: usize) -> usize {
        if self.track_height <= 0.0 {
            return 0;
        }
        (scroll_top * total_rows as f64 / self.track_height) as usize
    }

    /// Move the thumb. Returns the new content offset, or `None` while
    /// unplugged.
    ///
    /// The position is clamped to the track the way a native scrollbar
    /// clamps `scrollTop`.
    pub fn scroll_to(&mut self, scroll_top: f64, meta: &GridMetadata) -> Option<usize> {
        if !self.plugged {
            return None;
        }
        self.scroll_top = scroll_top.clamp(0.0, self.max_scroll_top());
        Some(self.content_offset(self.scroll_top, meta.total_rows()))
    }

    /// Snap the thumb to a whole row in the direction of travel
    pub fn adjust_scroll_top(&mut self) {
        let was_plugged = self.plugged;
        self.unplug();
        if self.row_height > 0.0 {
            let rem = self.scroll_top % self.row_height;
            if rem != 0.0 {
                self.scroll_top = if self.last_scroll_pos < self.scroll_top {
                    (self.scroll_top + self.row_height - rem).min(self.max_scroll_top())
                } else {
                    self.scroll_top - rem
                };
            }
        }
        self.last_scroll_pos = self.scroll_top;
        if was_plugged {
            self.plug();
        }
    }

    /// Put the thumb on `offset` without generating a scroll event
    pub fn move_to_offset(&mut self, offset: usize) {
        self.scroll_top = (offset as f64 * self.row_height).min(self.max_scroll_top());
        self.last_scroll_pos = self.scroll_top;
    }

    pub fn plug(&mut self) {
        self.plugged = true;
    }

    /// Ignore scroll events until plugged back in
    pub fn unplug(&mut self) {
        self.plugged = false;
    }

    pub fn is_plugged(&self) -> bool {
        self.plugged
    }
}
