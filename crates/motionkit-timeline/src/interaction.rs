//! Pointer input and the in-flight gesture state.
//!
//! At most one gesture is active at a time. Each variant carries exactly
//! the values captured at pointer-down that the resolver needs while the
//! gesture runs.

use motionkit_core::{CameraChannel, DVec2};

use crate::camera::{KeyframeId, ValueRange};
use crate::clip::ClipId;
use crate::resolver::{DragOrigin, ResizeEdge};

/// Modifier keys held during a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Ctrl on Windows/Linux, Cmd on macOS.
    pub ctrl: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
    };
    pub const CTRL: Self = Self {
        ctrl: true,
        shift: false,
    };
    pub const SHIFT: Self = Self {
        ctrl: false,
        shift: true,
    };

    pub fn is_none(&self) -> bool {
        !self.ctrl && !self.shift
    }
}

/// A pointer event in timeline content pixels: `x` grows with time from
/// zero, `y` grows downward from the top of the first track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub position: DVec2,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            position: DVec2::new(x, y),
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// What the pointer went down on, as determined by the host's hit test.
#[derive(Debug, Clone, PartialEq)]
pub enum HitTarget {
    /// Empty track area.
    Background,
    Ruler,
    Playhead,
    Clip(ClipId),
    ClipHandle(ClipId, ResizeEdge),
    CameraKeyframe {
        id: KeyframeId,
        channel: CameraChannel,
    },
}

/// How a camera keyframe drag is interpreted, fixed once chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragAxis {
    Time,
    Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClipDrag {
    /// Clip under the pointer.
    pub anchor: ClipId,
    pub pointer_start: DVec2,
    /// Every moving clip, anchor included.
    pub origins: Vec<DragOrigin>,
    pub last_valid_delta: f64,
    /// The anchor was already selected before this press.
    pub was_selected: bool,
    pub moved: bool,
}

impl ClipDrag {
    pub fn anchor_origin(&self) -> Option<&DragOrigin> {
        self.origins.iter().find(|o| o.id == self.anchor)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClipResize {
    pub anchor: ClipId,
    pub edge: ResizeEdge,
    pub pointer_start: DVec2,
    pub origins: Vec<DragOrigin>,
    pub moved: bool,
}

impl ClipResize {
    pub fn anchor_origin(&self) -> Option<&DragOrigin> {
        self.origins.iter().find(|o| o.id == self.anchor)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxSelect {
    pub start: DVec2,
    pub current: DVec2,
    /// Ctrl held at press: boxed clips are added to `base`.
    pub additive: bool,
    /// Selection when the box started.
    pub base: Vec<ClipId>,
    pub moved: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeDrag {
    pub id: KeyframeId,
    pub channel: CameraChannel,
    pub pointer_start: DVec2,
    pub start_time: f64,
    pub start_value: f64,
    /// Graph range captured at press so the scale does not shift mid-drag.
    pub range: ValueRange,
    /// Top edge of the channel's lane in pointer space.
    pub track_top: f64,
    pub axis: Option<DragAxis>,
}

/// The active gesture.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    DraggingClip(ClipDrag),
    ResizingClip(ClipResize),
    SelectingBox(BoxSelect),
    ScrubbingPlayhead,
    DraggingCameraKeyframe(KeyframeDrag),
}

impl Interaction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::DraggingClip(_) => "draggingClip",
            Self::ResizingClip(_) => "resizingClip",
            Self::SelectingBox(_) => "draggingSelectionBox",
            Self::ScrubbingPlayhead => "draggingPlayhead",
            Self::DraggingCameraKeyframe(drag) => match drag.axis {
                Some(DragAxis::Value) => "draggingCameraKeyframe(value)",
                Some(DragAxis::Time) => "draggingCameraKeyframe(time)",
                None => "draggingCameraKeyframe",
            },
        }
    }
}

/// Classify a keyframe drag once the pointer has travelled past `threshold`.
pub fn classify_drag(delta: DVec2, threshold: f64) -> Option<DragAxis> {
    if delta.length() <= threshold {
        return None;
    }
    if delta.y.abs() > delta.x.abs() {
        Some(DragAxis::Value)
    } else {
        Some(DragAxis::Time)
    }
}

// ── Tests ───────────────────────────────────────────────────────
