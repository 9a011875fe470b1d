//! Scroll position to timeline progress

use serde::{Deserialize, Serialize};

/// A scroll distance mapped linearly onto `[0, 1]` progress
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollRange {
    /// Scroll offset at which progress starts
    pub start: f32,
    /// Scroll distance covered by the whole timeline
    pub length: f32,
}

impl ScrollRange {
    pub fn new(start: f32, length: f32) -> Self {
        Self { start, length }
    }

    /// Pinned range starting at the top, `percent` of the viewport long
    /// (`500.0` scrolls five screens).
    pub fn pinned(viewport_height: f32, percent: f32) -> Self {
        Self::new(0.0, viewport_height * percent / 100.0)
    }

    pub fn progress(&self, scroll: f32) -> f32 {
        if self.length <= 0.0 {
            return if scroll >= self.start { 1.0 } else { 0.0 };
        }
        ((scroll - self.start) / self.length).clamp(0.0, 1.0)
    }
}

/// Lets displayed progress trail the scroll position.
///
/// Each frame closes `dt / lag` of the remaining gap, so a jump is caught up
/// within roughly `lag_seconds`. A lag of zero follows the target exactly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scrub {
    pub lag_seconds: f32,
    current: f32,
}

impl Default for Scrub {
    fn default() -> Self {
        Self::with_params(1.5)
    }
}

impl Scrub {
    pub fn with_params(lag_seconds: f32) -> Self {
        Self {
            lag_seconds: lag_seconds.max(0.0),
            current: 0.0,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    /// Jump straight to `target`
    pub fn snap(&mut self, target: f32) {
        self.current = target.clamp(0.0, 1.0);
    }

    /// Move towards `target` after `dt` seconds and return the new progress
    pub fn advance(&mut self, target: f32, dt: f32) -> f32 {
        let target = target.clamp(0.0, 1.0);
        if self.lag_seconds <= 0.0 {
            self.current = target;
            return self.current;
        }
        let step = dt.max(0.0) / self.lag_seconds;
        if step >= 1.0 {
            self.current = target;
        } else {
            self.current += (target - self.current) * step;
        }
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pinned_range() {
        let range = ScrollRange::pinned(800.0, 500.0);
        assert_eq!(range.length, 4000.0);
        assert_eq!(range.progress(-10.0), 0.0);
        assert_eq!(range.progress(2000.0), 0.5);
        assert_eq!(range.progress(9000.0), 1.0);
    }

    #[test]
    fn test_zero_length_range_steps() {
        let range = ScrollRange::new(100.0, 0.0);
        assert_eq!(range.progress(99.0), 0.0);
        assert_eq!(range.progress(100.0), 1.0);
    }

    #[test]
    fn test_scrub_catches_up() {
        let mut scrub = Scrub::default();
        assert_relative_eq!(scrub.advance(1.0, 0.75), 0.5);
        assert_relative_eq!(scrub.advance(1.0, 0.75), 0.75);
        assert_eq!(scrub.advance(1.0, 10.0), 1.0);
    }

    #[test]
    fn test_zero_lag_follows_target() {
        let mut scrub = Scrub::with_params(0.0);
        assert_eq!(scrub.advance(0.3, 0.016), 0.3);
        scrub.snap(2.0);
        assert_eq!(scrub.current(), 1.0);
    }
}
