//! The editable timeline state.

use std::collections::BTreeSet;

use motionkit_core::{grow_total_duration, normalize_time, MotionError, Result};
use serde::{Deserialize, Serialize};

use crate::camera::CameraKeyframes;
use crate::clip::{Clip, ClipId, ClipMap};
use crate::track::{clips_on_track, required_track_count, TimelineMode, TrackClips, TrackSet};

/// Aggregate root for everything undo/redo and persistence care about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineState {
    pub clips: ClipMap,
    #[serde(default)]
    pub hidden_clip_ids: BTreeSet<ClipId>,
    /// Seconds shown on the ruler.
    pub total_duration: f64,
    #[serde(default)]
    pub timeline_mode: TimelineMode,
    #[serde(default)]
    pub camera_keyframes: CameraKeyframes,
    /// Generic clip tracks, including empty ones.
    #[serde(default)]
    pub clip_track_count: usize,
}

impl TimelineState {
    pub fn new(total_duration: f64, clip_track_count: usize) -> Self {
        Self {
            clips: ClipMap::new(),
            hidden_clip_ids: BTreeSet::new(),
            total_duration,
            timeline_mode: TimelineMode::Clip,
            camera_keyframes: CameraKeyframes::new(),
            clip_track_count,
        }
    }

    pub fn tracks(&self) -> TrackSet {
        TrackSet::new(self.timeline_mode, self.clip_track_count)
    }

    pub fn clip(&self, id: &ClipId) -> Option<&Clip> {
        self.clips.get(id)
    }

    pub fn clips_on_track(&self, track: usize) -> TrackClips<'_> {
        clips_on_track(&self.clips, track)
    }

    pub fn is_hidden(&self, id: &ClipId) -> bool {
        self.hidden_clip_ids.contains(id)
    }

    /// Grow the ruler so content ending at `end` is visible.
    pub fn ensure_duration(&mut self, end: f64) {
        self.total_duration = grow_total_duration(self.total_duration, end);
    }

    /// Make room for every clip's track index.
    pub fn ensure_track_count(&mut self) {
        self.clip_track_count = self.clip_track_count.max(required_track_count(&self.clips));
    }

    /// Snap a committed clip's start and end to the time quantum. The end
    /// is snapped rather than the duration, so an edge placed flush against
    /// a neighbour lands exactly on the neighbour's time.
    pub fn normalize_clip(&mut self, id: &ClipId) {
        if let Some(clip) = self.clips.get_mut(id) {
            let start = normalize_time(clip.start_time);
            let end = normalize_time(clip.end_time());
            clip.start_time = start;
            clip.duration = end - start;
        }
    }

    /// Check the no-overlap invariant for the clips in `ids` against every
    /// other clip on their tracks.
    pub fn validate_clips<'a>(&self, ids: impl IntoIterator<Item = &'a ClipId>) -> Result<()> {
        for id in ids {
            let Some(clip) = self.clips.get(id) else {
                continue;
            };
            let range = clip.range();
            let collides = self
                .clips
                .values()
                .any(|o| o.id != clip.id && o.track_index == clip.track_index && o.range().overlaps(&range));
            if collides {
                return Err(MotionError::Overlap {
                    clip: clip.id.to_string(),
                    track: clip.track_index,
                });
            }
        }
        Ok(())
    }

    /// Check the whole state: map keys match clip ids, no overlaps, positive
    /// durations, non-negative starts, sorted keyframes.
    pub fn validate(&self) -> Result<()> {
        for (key, clip) in &self.clips {
            if key != &clip.id {
                return Err(MotionError::InvalidParameter(format!(
                    "clip stored under {} has id {}",
                    key, clip.id
                )));
            }
            if !(clip.start_time >= 0.0 && clip.duration > 0.0) {
                return Err(MotionError::InvalidParameter(format!(
                    "clip {} has invalid timing ({}, {})",
                    clip.id, clip.start_time, clip.duration
                )));
            }
        }
        for track in 0..required_track_count(&self.clips) {
            let on_track = self.clips_on_track(track);
            for pair in on_track.windows(2) {
                if pair[0].range().overlaps(&pair[1].range()) {
                    return Err(MotionError::Overlap {
                        clip: pair[1].id.to_string(),
                        track,
                    });
                }
            }
        }
        let times: Vec<f64> = self.camera_keyframes.iter().map(|k| k.time).collect();
        if times.windows(2).any(|w| w[0] > w[1]) {
            return Err(MotionError::InvalidParameter(
                "camera keyframes are not sorted".to_string(),
            ));
        }
        Ok(())
    }
}

// ── Tests ───────────────────────────────────────────────────────
