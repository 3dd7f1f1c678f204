//! Time ranges in seconds.
//!
//! Clip times are plain `f64` seconds. Ranges are half-open, so a clip that
//! ends exactly where the next one starts does not overlap it.

use serde::{Deserialize, Serialize};

/// Granularity used to strip float drift from committed times.
pub const TIME_QUANTUM: f64 = 1e-6;

/// Intersections shorter than this are rounding noise, not overlaps. Keeps
/// a clip whose end was rebuilt as `start + (neighbour - start)` flush.
pub const OVERLAP_EPSILON: f64 = 1e-9;

/// A half-open span `[start, start + duration)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: f64,
    pub duration: f64,
}

impl TimeRange {
    pub const fn new(start: f64, duration: f64) -> Self {
        Self { start, duration }
    }

    /// Range covering `[start, end)`.
    pub fn from_bounds(start: f64, end: f64) -> Self {
        Self::new(start, end - start)
    }

    #[inline]
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    /// Half-open overlap test, ignoring intersections below
    /// [`OVERLAP_EPSILON`].
    #[inline]
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end() - OVERLAP_EPSILON && self.end() > other.start + OVERLAP_EPSILON
    }

    /// True when `t` lies in `[start, end)`.
    pub fn contains(&self, t: f64) -> bool {
        t >= self.start && t < self.end()
    }

    /// Same range shifted by `delta` seconds.
    pub fn offset(&self, delta: f64) -> Self {
        Self::new(self.start + delta, self.duration)
    }
}

/// Timeline length needed to show content ending at `end`.
///
/// Returns `current` when the content already fits, otherwise the next
/// 10-second boundary past `end` plus a 10-second margin.
pub fn grow_total_duration(current: f64, end: f64) -> f64 {
    if end > current {
        (end / 10.0).ceil() * 10.0 + 10.0
    } else {
        current
    }
}

/// Snap a time to [`TIME_QUANTUM`] so repeated drags do not accumulate error.
#[inline]
pub fn normalize_time(t: f64) -> f64 {
    let snapped = (t / TIME_QUANTUM).round() * TIME_QUANTUM;
    if snapped == 0.0 {
        0.0
    } else {
        snapped
    }
}

// ── Tests ───────────────────────────────────────────────────────
