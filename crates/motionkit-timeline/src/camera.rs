//! Camera keyframes.
//!
//! The camera is animated by a time-sorted list of pose keyframes. An
//! implicit origin keyframe at time zero with the neutral pose precedes the
//! list for interpolation and graph scaling; it is never stored or
//! selectable.

use std::fmt;

use motionkit_core::{CameraChannel, CameraPose, Easing};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque keyframe identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyframeId(String);

impl KeyframeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(format!("kf_{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyframeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for KeyframeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A timed camera pose. `easing` shapes the segment arriving at this
/// keyframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraKeyframe {
    pub id: KeyframeId,
    /// Seconds, non-negative.
    pub time: f64,
    #[serde(default)]
    pub easing: Easing,
    pub values: CameraPose,
}

impl CameraKeyframe {
    /// New keyframe with the neutral pose.
    pub fn new(time: f64, easing: Easing) -> Self {
        Self {
            id: KeyframeId::generate(),
            time,
            easing,
            values: CameraPose::NEUTRAL,
        }
    }
}

/// The implicit keyframe every camera sequence starts from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPoint {
    pub time: f64,
    pub easing: Easing,
    pub values: CameraPose,
}

/// Origin point shared by evaluation and graph scaling.
pub const DEFAULT_KEYFRAME: CameraPoint = CameraPoint {
    time: 0.0,
    easing: Easing::Linear,
    values: CameraPose::NEUTRAL,
};

impl From<&CameraKeyframe> for CameraPoint {
    fn from(kf: &CameraKeyframe) -> Self {
        Self {
            time: kf.time,
            easing: kf.easing,
            values: kf.values,
        }
    }
}

/// Partial update for a camera keyframe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyframePatch {
    pub time: Option<f64>,
    pub easing: Option<Easing>,
    pub values: Option<CameraPose>,
    /// Single channel write, applied after `values`.
    pub channel: Option<(CameraChannel, f64)>,
}

impl KeyframePatch {
    pub fn time(mut self, time: f64) -> Self {
        self.time = Some(time);
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }

    pub fn values(mut self, values: CameraPose) -> Self {
        self.values = Some(values);
        self
    }

    pub fn channel(mut self, channel: CameraChannel, value: f64) -> Self {
        self.channel = Some((channel, value));
        self
    }
}

/// Graph range for one channel: `(min, max)` in channel units.
pub type ValueRange = (f64, f64);

/// Time-sorted camera keyframes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CameraKeyframes {
    keyframes: Vec<CameraKeyframe>,
}

impl CameraKeyframes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an arbitrary list, sorting it.
    pub fn from_vec(mut keyframes: Vec<CameraKeyframe>) -> Self {
        keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keyframes }
    }

    pub fn as_slice(&self) -> &[CameraKeyframe] {
        &self.keyframes
    }

    pub fn iter(&self) -> impl Iterator<Item = &CameraKeyframe> {
        self.keyframes.iter()
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    pub fn get(&self, id: &KeyframeId) -> Option<&CameraKeyframe> {
        self.keyframes.iter().find(|kf| &kf.id == id)
    }

    pub fn contains(&self, id: &KeyframeId) -> bool {
        self.get(id).is_some()
    }

    /// First keyframe within `epsilon` seconds of `time`.
    pub fn find_near(&self, time: f64, epsilon: f64) -> Option<&CameraKeyframe> {
        self.keyframes
            .iter()
            .find(|kf| (kf.time - time).abs() < epsilon)
    }

    /// Insert keeping time order. Equal times keep insertion order.
    pub fn insert(&mut self, keyframe: CameraKeyframe) {
        let pos = self.keyframes.partition_point(|kf| kf.time <= keyframe.time);
        self.keyframes.insert(pos, keyframe);
    }

    pub fn remove(&mut self, id: &KeyframeId) -> Option<CameraKeyframe> {
        let pos = self.keyframes.iter().position(|kf| &kf.id == id)?;
        Some(self.keyframes.remove(pos))
    }

    /// Apply a patch and restore time order. Returns false if `id` is unknown.
    pub fn update(&mut self, id: &KeyframeId, patch: &KeyframePatch) -> bool {
        let Some(kf) = self.keyframes.iter_mut().find(|kf| &kf.id == id) else {
            return false;
        };
        if let Some(time) = patch.time {
            kf.time = time;
        }
        if let Some(easing) = patch.easing {
            kf.easing = easing;
        }
        if let Some(values) = patch.values {
            kf.values = values;
        }
        if let Some((channel, value)) = patch.channel {
            kf.values.set(channel, value);
        }
        if patch.time.is_some() {
            self.keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
        }
        true
    }

    /// Latest keyframe time, if any.
    pub fn last_time(&self) -> Option<f64> {
        self.keyframes.last().map(|kf| kf.time)
    }

    /// Origin point followed by the stored keyframes, in time order.
    pub fn with_origin(&self) -> impl Iterator<Item = CameraPoint> + '_ {
        std::iter::once(DEFAULT_KEYFRAME).chain(self.keyframes.iter().map(CameraPoint::from))
    }

    /// Graph range for `channel` including the origin point.
    ///
    /// The span is at least 100 units, padded by 20% on each side, and
    /// rounded outward to integers. Scale never goes below zero.
    pub fn value_range(&self, channel: CameraChannel) -> ValueRange {
        let (min, max) = self
            .with_origin()
            .map(|p| p.values.get(channel))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        let span = (max - min).abs().max(100.0);
        let mut lo = (min - span * 0.2).floor();
        let hi = (max + span * 0.2).ceil();
        if let Some(floor) = channel.value_floor() {
            lo = lo.max(floor);
        }
        (lo, hi)
    }
}

// ── Tests ───────────────────────────────────────────────────────
