//! Animation evaluation.
//!
//! Clip properties interpolate over the clip's own time window; the camera
//! interpolates between keyframes over global time. Everything here is a
//! pure function of its inputs and is what a renderer calls each frame.

use motionkit_core::{
    clamp01, ease, AnimatedProperty, CameraPose, ObjectTransform, SOLVE_EPSILON,
};
use serde::{Deserialize, Serialize};

use crate::camera::{CameraKeyframes, CameraPoint};
use crate::clip::{Clip, ClipId};
use crate::state::TimelineState;

/// Clip-local progress at absolute time `t`, clamped to `[0, 1]`.
///
/// Zero-length or non-finite clips report 1.
pub fn clip_progress(clip: &Clip, t: f64) -> f64 {
    if !(clip.duration > 0.0) || !clip.duration.is_finite() {
        return 1.0;
    }
    clamp01((t - clip.start_time) / clip.duration)
}

/// Value of `property` on `clip` at absolute time `t`.
pub fn calculate_animated_value(clip: &Clip, property: AnimatedProperty, t: f64) -> f64 {
    match clip.curve(property) {
        Some(curve) => curve.evaluate(clip_progress(clip, t)),
        None => property.default_value(),
    }
}

/// Progress used when authoring at the playhead. Clip durations below the
/// solve epsilon are treated as that epsilon so the division stays finite.
pub fn authoring_progress(clip: &Clip, t: f64) -> f64 {
    clamp01((t - clip.start_time) / clip.duration.max(SOLVE_EPSILON))
}

/// Camera pose at absolute time `t`.
///
/// The implicit neutral keyframe at time zero precedes the stored ones. The
/// segment is interpolated with the easing of the keyframe it arrives at;
/// after the last keyframe its pose is held.
pub fn camera_pose_at(keyframes: &CameraKeyframes, t: f64) -> CameraPose {
    if keyframes.is_empty() {
        return CameraPose::NEUTRAL;
    }

    let mut prev: Option<CameraPoint> = None;
    let mut next: Option<CameraPoint> = None;
    for point in keyframes.with_origin() {
        if point.time > t {
            next = Some(point);
            break;
        }
        prev = Some(point);
    }

    match (prev, next) {
        (Some(prev), None) => prev.values,
        (None, Some(next)) => next.values,
        (None, None) => CameraPose::NEUTRAL,
        (Some(prev), Some(next)) => {
            let span = next.time - prev.time;
            let progress = if span > 0.0 { (t - prev.time) / span } else { 0.0 };
            prev.values.lerp(&next.values, ease(next.easing, progress))
        }
    }
}

/// Per-frame placement of one clip, in camera space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedTransform {
    pub x: f64,
    pub y: f64,
    /// Factor; 1 is natural size.
    pub scale: f64,
    /// Degrees.
    pub direction: f64,
    /// 1 is fully opaque.
    pub opacity: f64,
}

fn finite_or(v: f64, fallback: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        fallback
    }
}

/// Evaluate every property of `clip` at `t` and compose with `camera`.
pub fn resolve_clip_transform(clip: &Clip, camera: &CameraPose, t: f64) -> ResolvedTransform {
    let value = |p| calculate_animated_value(clip, p, t);
    let object = ObjectTransform {
        x: value(AnimatedProperty::PosX),
        y: value(AnimatedProperty::PosY),
        scale: value(AnimatedProperty::Scale) / 100.0,
        direction: value(AnimatedProperty::Rotation),
    };
    let placed = camera.apply(object);
    let opacity = (100.0 - value(AnimatedProperty::Opacity)) / 100.0;

    let scale = if placed.scale.is_finite() && placed.scale > 0.0 {
        placed.scale
    } else {
        1.0
    };
    ResolvedTransform {
        x: finite_or(placed.x, 0.0),
        y: finite_or(placed.y, 0.0),
        scale,
        direction: finite_or(placed.direction, 0.0),
        opacity: finite_or(opacity, 1.0),
    }
}

/// Clips showing at `t`: not hidden and `t` within `[start, end)`, ordered
/// by track then start.
pub fn visible_clips_at(state: &TimelineState, t: f64) -> Vec<&Clip> {
    let mut visible: Vec<&Clip> = state
        .clips
        .values()
        .filter(|c| !state.is_hidden(&c.id) && c.range().contains(t))
        .collect();
    visible.sort_by(|a, b| {
        a.track_index
            .cmp(&b.track_index)
            .then(a.start_time.total_cmp(&b.start_time))
    });
    visible
}

/// One visible clip ready for drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameItem {
    pub id: ClipId,
    pub transform: ResolvedTransform,
}

/// Everything a renderer needs for the frame at `t`.
pub fn render_frame(state: &TimelineState, t: f64) -> Vec<FrameItem> {
    let camera = camera_pose_at(&state.camera_keyframes, t);
    visible_clips_at(state, t)
        .into_iter()
        .map(|clip| FrameItem {
            id: clip.id.clone(),
            transform: resolve_clip_transform(clip, &camera, t),
        })
        .collect()
}

// ── Tests ───────────────────────────────────────────────────────
