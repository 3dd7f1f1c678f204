//! Track types for the timeline.
//!
//! Tracks are implicit: a clip names its lane by index and the timeline
//! only remembers how many generic lanes exist. Camera mode swaps those
//! lanes for the four fixed camera channels.

use std::fmt;

use motionkit_core::CameraChannel;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::clip::{Clip, ClipMap};

/// Which editing surface the timeline shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimelineMode {
    #[default]
    Clip,
    Camera,
}

impl TimelineMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clip => "clip",
            Self::Camera => "camera",
        }
    }
}

impl fmt::Display for TimelineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One lane as presented to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Track {
    /// Generic clip lane.
    Clips(usize),
    /// Fixed keyframe lane for one camera channel.
    Camera(CameraChannel),
}

impl Track {
    pub fn index(self) -> usize {
        match self {
            Self::Clips(i) => i,
            Self::Camera(channel) => channel.track_index(),
        }
    }

    pub fn label(self) -> String {
        match self {
            Self::Clips(i) => format!("Track {}", i + 1),
            Self::Camera(channel) => format!("Camera {}", channel),
        }
    }
}

/// The lanes visible in the current mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackSet {
    pub mode: TimelineMode,
    /// Generic lanes kept while in camera mode so they come back unchanged.
    pub clip_track_count: usize,
}

impl TrackSet {
    pub fn new(mode: TimelineMode, clip_track_count: usize) -> Self {
        Self {
            mode,
            clip_track_count,
        }
    }

    pub fn len(&self) -> usize {
        match self.mode {
            TimelineMode::Clip => self.clip_track_count,
            TimelineMode::Camera => CameraChannel::ALL.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<Track> {
        match self.mode {
            TimelineMode::Clip => (index < self.clip_track_count).then_some(Track::Clips(index)),
            TimelineMode::Camera => CameraChannel::from_track(index).map(Track::Camera),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Track> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }
}

/// Clips on a track, buffer sized for the usual handful.
pub type TrackClips<'a> = SmallVec<[&'a Clip; 8]>;

/// Clips on `track` ordered by start time.
pub fn clips_on_track(clips: &ClipMap, track: usize) -> TrackClips<'_> {
    let mut on_track: TrackClips<'_> = clips.values().filter(|c| c.track_index == track).collect();
    on_track.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
    on_track
}

/// Number of tracks the clips need: highest used index plus one.
pub fn required_track_count(clips: &ClipMap) -> usize {
    clips
        .values()
        .map(|c| c.track_index + 1)
        .max()
        .unwrap_or(0)
}

// ── Tests ───────────────────────────────────────────────────────
