//! MotionKit Core - Foundation types for the timeline editor
//!
//! This crate provides the primitives shared by the timeline model and any
//! renderer consuming it:
//! - Easing functions
//! - Per-property animation curves and their inverse solve
//! - Time ranges and timeline-length growth
//! - Camera poses and selection rectangles

pub mod curve;
pub mod easing;
pub mod error;
pub mod geometry;
pub mod time;

pub use curve::{
    clamp01, round1, AnimatedProperty, AnimationCurve, Endpoint, MIN_AUTHORED_SCALE, SOLVE_EPSILON,
};
pub use easing::{ease, Easing};
pub use error::{MotionError, Result};
pub use geometry::{CameraChannel, CameraPose, ObjectTransform, Rect};
pub use time::{grow_total_duration, normalize_time, TimeRange, OVERLAP_EPSILON, TIME_QUANTUM};

/// Re-exported so callers can build rectangles without naming glam.
pub use glam::DVec2;
