//! Page scroll position and scroll-linked values

use serde::Serialize;

/// Vertical page scroll state
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ScrollProgress {
    offset: f32,
    content_height: f32,
    viewport_height: f32,
}

impl ScrollProgress {
    pub fn new(content_height: f32, viewport_height: f32) -> Self {
        Self {
            offset: 0.0,
            content_height: content_height.max(0.0),
            viewport_height: viewport_height.max(0.0),
        }
    }

    /// Largest reachable offset; 0 when the content fits
    pub fn max_offset(&self) -> f32 {
        (self.content_height - self.viewport_height).max(0.0)
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn content_height(&self) -> f32 {
        self.content_height
    }

    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    /// Scroll to `offset` (clamped); returns the applied offset
    pub fn set_offset(&mut self, offset: f32) -> f32 {
        self.offset = if offset.is_finite() {
            offset.clamp(0.0, self.max_offset())
        } else {
            0.0
        };
        self.offset
    }

    pub fn scroll_by(&mut self, delta: f32) -> f32 {
        self.set_offset(self.offset + delta)
    }

    /// Update extents after layout or resize, keeping the offset in range
    pub fn set_extent(&mut self, content_height: f32, viewport_height: f32) {
        self.content_height = content_height.max(0.0);
        self.viewport_height = viewport_height.max(0.0);
        self.set_offset(self.offset);
    }

    /// offset / (content − viewport), in [0, 1]; 0 when nothing scrolls
    pub fn progress(&self) -> f32 {
        let max = self.max_offset();
        if max <= 0.0 {
            0.0
        } else {
            (self.offset / max).clamp(0.0, 1.0)
        }
    }
}

/// Scroll signal a property can be bound to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollSource {
    /// Pixels scrolled
    Offset,
    /// Fraction scrolled (0.0 to 1.0)
    Progress,
}

impl ScrollSource {
    pub fn sample(&self, scroll: &ScrollProgress) -> f32 {
        match self {
            ScrollSource::Offset => scroll.offset(),
            ScrollSource::Progress => scroll.progress(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_is_fraction_of_scrollable_range() {
        let mut scroll = ScrollProgress::new(1720.0, 720.0);
        assert_eq!(scroll.progress(), 0.0);

        scroll.set_offset(250.0);
        assert_eq!(scroll.progress(), 0.25);

        scroll.scroll_by(10_000.0);
        assert_eq!(scroll.offset(), 1000.0);
        assert_eq!(scroll.progress(), 1.0);

        scroll.scroll_by(-5000.0);
        assert_eq!(scroll.offset(), 0.0);
    }

    #[test]
    fn test_content_that_fits_never_scrolls() {
        let mut scroll = ScrollProgress::new(500.0, 720.0);
        assert_eq!(scroll.set_offset(100.0), 0.0);
        assert_eq!(scroll.progress(), 0.0);
    }

    #[test]
    fn test_resize_reclamps_offset() {
        let mut scroll = ScrollProgress::new(2000.0, 500.0);
        scroll.set_offset(1500.0);
        scroll.set_extent(2000.0, 1000.0);
        assert_eq!(scroll.offset(), 1000.0);
        assert_eq!(ScrollSource::Offset.sample(&scroll), 1000.0);
        assert_eq!(ScrollSource::Progress.sample(&scroll), 1.0);
    }
}
