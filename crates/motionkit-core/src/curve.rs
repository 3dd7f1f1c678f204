//! Per-property animation curves and their inverse.
//!
//! A clip animates each property from a `start` value at the clip's first
//! instant to an `end` value at its last, shaped by an [`Easing`]. Direct
//! manipulation in the preview works backwards: given the value the user
//! wants at the playhead, solve for one endpoint so the curve passes through
//! it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::easing::Easing;

/// Guard against singular inverse solves and zero-length clips.
pub const SOLVE_EPSILON: f64 = 1e-6;

/// Lower bound for authored scale values (percent).
pub const MIN_AUTHORED_SCALE: f64 = 1.0;

/// Round to one decimal place, half toward positive infinity.
#[inline]
pub fn round1(v: f64) -> f64 {
    (v * 10.0 + 0.5).floor() / 10.0
}

/// Clamp to `[0, 1]`, mapping NaN to 0.
#[inline]
pub fn clamp01(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

// ── Animated properties ─────────────────────────────────────────

/// A clip property that can carry an animation curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnimatedProperty {
    PosX,
    PosY,
    /// Percent; 100 is natural size.
    Scale,
    /// Degrees.
    Rotation,
    /// Transparency percent; 0 is fully opaque.
    Opacity,
}

impl AnimatedProperty {
    pub const ALL: [AnimatedProperty; 5] = [
        AnimatedProperty::PosX,
        AnimatedProperty::PosY,
        AnimatedProperty::Scale,
        AnimatedProperty::Rotation,
        AnimatedProperty::Opacity,
    ];

    /// Value reported when a clip has no curve for this property.
    pub fn default_value(self) -> f64 {
        match self {
            Self::Scale => 100.0,
            _ => 0.0,
        }
    }

    /// Floor applied to authored endpoint values.
    pub fn authored_floor(self) -> Option<f64> {
        match self {
            Self::Scale => Some(MIN_AUTHORED_SCALE),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PosX => "posX",
            Self::PosY => "posY",
            Self::Scale => "scale",
            Self::Rotation => "rotation",
            Self::Opacity => "opacity",
        }
    }
}

impl fmt::Display for AnimatedProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Curves ──────────────────────────────────────────────────────

/// Which endpoint an inverse solve rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    End,
}

impl Endpoint {
    /// Pick the endpoint to solve for at a clamped `progress` with eased
    /// value `u`.
    ///
    /// The nearer endpoint is preferred (ties at 0.5 go to `Start`), unless
    /// its equation is singular, in which case the other one is used.
    pub fn for_progress(progress: f64, u: f64) -> Self {
        if progress <= 0.5 {
            if u >= 1.0 - SOLVE_EPSILON {
                Self::End
            } else {
                Self::Start
            }
        } else if u <= SOLVE_EPSILON {
            Self::Start
        } else {
            Self::End
        }
    }
}

/// Start/end interpolation for one property over a clip's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationCurve {
    pub start: f64,
    pub end: f64,
    #[serde(default = "default_curve_easing")]
    pub easing: Easing,
}

fn default_curve_easing() -> Easing {
    Easing::EaseInOut
}

impl AnimationCurve {
    pub fn new(start: f64, end: f64, easing: Easing) -> Self {
        Self { start, end, easing }
    }

    /// A flat curve holding `value`, with the editor's default easing.
    pub fn flat(value: f64) -> Self {
        Self::new(value, value, default_curve_easing())
    }

    /// The flat curve a new clip gets for `property`.
    pub fn default_for(property: AnimatedProperty) -> Self {
        Self::flat(property.default_value())
    }

    pub fn is_flat(&self) -> bool {
        self.start == self.end
    }

    /// Value at a clip-local progress; progress is clamped to `[0, 1]`.
    #[inline]
    pub fn evaluate(&self, progress: f64) -> f64 {
        self.at_eased(self.easing.apply(clamp01(progress)))
    }

    /// Value at an already-eased progress, `start + (end - start) * u`.
    ///
    /// Written as `start * (1 - u) + end * u`: equal in exact arithmetic, but
    /// this form returns `end` bit-for-bit at `u = 1`, which
    /// `start + (end - start)` does not guarantee.
    #[inline]
    pub fn at_eased(&self, u: f64) -> f64 {
        self.start * (1.0 - u) + self.end * u
    }

    /// Rewrite one endpoint so that `evaluate(progress) == target`.
    ///
    /// `target` is rounded to 0.1 first, results are rounded to 0.1, and
    /// `floor` (if any) is applied to both endpoints before rounding.
    /// Returns the endpoint that was solved for.
    pub fn solve_at(&mut self, progress: f64, target: f64, floor: Option<f64>) -> Endpoint {
        let target = round1(target);
        let progress = clamp01(progress);
        let u = self.easing.apply(progress);
        let endpoint = Endpoint::for_progress(progress, u);

        let (mut start, mut end) = (self.start, self.end);
        match endpoint {
            Endpoint::Start => {
                start = (target - end * u) / (1.0 - u).max(SOLVE_EPSILON);
            }
            Endpoint::End => {
                end = (target - start * (1.0 - u)) / u.max(SOLVE_EPSILON);
            }
        }
        if let Some(min) = floor {
            start = start.max(min);
            end = end.max(min);
        }
        self.start = round1(start);
        self.end = round1(end);
        endpoint
    }

    /// Write both endpoints directly.
    pub fn set_endpoints(&mut self, start: f64, end: f64, floor: Option<f64>) {
        let (start, end) = match floor {
            Some(min) => (start.max(min), end.max(min)),
            None => (start, end),
        };
        self.start = round1(start);
        self.end = round1(end);
    }
}

impl Default for AnimationCurve {
    fn default() -> Self {
        Self::flat(0.0)
    }
}

// ── Tests ───────────────────────────────────────────────────────
