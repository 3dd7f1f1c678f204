//! Geometric primitives: selection rectangles, camera poses, and the
//! world-to-camera composition applied to every rendered object.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::fmt;

// ── Rect ────────────────────────────────────────────────────────

/// Axis-aligned rectangle in timeline pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle spanned by two corner points in any order.
    pub fn from_corners(a: DVec2, b: DVec2) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Touching edges count as intersecting.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && self.right() >= other.x
            && self.y <= other.bottom()
            && self.bottom() >= other.y
    }
}

// ── Camera ──────────────────────────────────────────────────────

/// One of the four keyframed camera channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CameraChannel {
    X,
    Y,
    Scale,
    Rotation,
}

impl CameraChannel {
    /// Channels in track order.
    pub const ALL: [CameraChannel; 4] = [
        CameraChannel::X,
        CameraChannel::Y,
        CameraChannel::Scale,
        CameraChannel::Rotation,
    ];

    /// Channel shown on camera track `index`.
    pub fn from_track(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn track_index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Scale => 2,
            Self::Rotation => 3,
        }
    }

    /// Lower bound for values written through the graph.
    pub fn value_floor(self) -> Option<f64> {
        match self {
            Self::Scale => Some(0.0),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Scale => "scale",
            Self::Rotation => "rotation",
        }
    }
}

impl fmt::Display for CameraChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Camera pose. `scale` is a percentage and `rotation` is in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    pub rotation: f64,
}

impl CameraPose {
    /// The pose of the implicit keyframe at time zero.
    pub const NEUTRAL: Self = Self {
        x: 0.0,
        y: 0.0,
        scale: 100.0,
        rotation: 0.0,
    };

    pub const fn new(x: f64, y: f64, scale: f64, rotation: f64) -> Self {
        Self {
            x,
            y,
            scale,
            rotation,
        }
    }

    pub fn get(&self, channel: CameraChannel) -> f64 {
        match channel {
            CameraChannel::X => self.x,
            CameraChannel::Y => self.y,
            CameraChannel::Scale => self.scale,
            CameraChannel::Rotation => self.rotation,
        }
    }

    pub fn set(&mut self, channel: CameraChannel, value: f64) {
        match channel {
            CameraChannel::X => self.x = value,
            CameraChannel::Y => self.y = value,
            CameraChannel::Scale => self.scale = value,
            CameraChannel::Rotation => self.rotation = value,
        }
    }

    /// Channel-wise interpolation at eased progress `u`.
    pub fn lerp(&self, other: &CameraPose, u: f64) -> CameraPose {
        let mix = |a: f64, b: f64| a * (1.0 - u) + b * u;
        CameraPose {
            x: mix(self.x, other.x),
            y: mix(self.y, other.y),
            scale: mix(self.scale, other.scale),
            rotation: mix(self.rotation, other.rotation),
        }
    }

    /// Map an object from world space into this camera's view.
    ///
    /// The object is translated by the camera position, rotated by the
    /// negated camera rotation and multiplied by the camera zoom. A zero
    /// zoom is replaced by 0.0001 so the object never collapses to a point.
    pub fn apply(&self, object: ObjectTransform) -> ObjectTransform {
        let rotation = if self.rotation.is_finite() {
            self.rotation
        } else {
            0.0
        };
        let raw_zoom = if self.scale.is_finite() {
            self.scale / 100.0
        } else {
            1.0
        };
        let zoom = if raw_zoom == 0.0 {
            0.0001
        } else {
            raw_zoom.abs()
        };

        let offset = DVec2::new(object.x - self.x, object.y - self.y);
        let rel = DVec2::from_angle(rotation.to_radians()).rotate(offset);

        ObjectTransform {
            x: rel.x * zoom,
            y: rel.y * zoom,
            scale: object.scale * zoom,
            direction: object.direction - rotation,
        }
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Object placement handed to a renderer. `scale` is a factor (1 = natural).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectTransform {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    /// Degrees.
    pub direction: f64,
}

impl Default for ObjectTransform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            direction: 0.0,
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────
