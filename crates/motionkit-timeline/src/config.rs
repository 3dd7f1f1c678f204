//! Editor tunables.
//!
//! Every constant that shapes timeline behaviour lives here so hosts can
//! override individual values from a JSON fragment.

use motionkit_core::{MotionError, Result};
use serde::{Deserialize, Serialize};

/// Timeline configuration. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Checkpoints kept by the undo history.
    pub max_history_size: usize,
    /// Seconds; resize and edits never go below this.
    pub min_clip_duration: f64,
    /// Seconds; used by `add_clip` when no duration is given.
    pub default_clip_duration: f64,
    /// Generic tracks present in a fresh timeline.
    pub default_track_count: usize,
    /// Seconds shown before any content grows the timeline.
    pub initial_total_duration: f64,

    pub pixels_per_second: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,

    pub track_height_px: f64,
    /// Vertical pointer travel before a clip drag may change track.
    pub track_switch_threshold_px: f64,
    pub camera_track_height_px: f64,
    pub camera_graph_padding_px: f64,
    /// Pointer travel before a keyframe press becomes a drag.
    pub keyframe_drag_threshold_px: f64,
    /// Pointer travel before a background press becomes a box selection.
    pub selection_box_threshold_px: f64,
    /// Boxes narrower or shorter than this on release clear the selection.
    pub min_selection_box_px: f64,
    /// Seconds; adding a keyframe this close to another edits that one.
    pub keyframe_merge_epsilon: f64,
}

impl TimelineConfig {
    /// Parse a (possibly partial) JSON override.
    pub fn from_json(data: &str) -> Result<Self> {
        serde_json::from_str(data)
            .map_err(|e| MotionError::Serialization(format!("Invalid timeline config: {}", e)))
    }

    /// Height of the plotted area inside a camera track.
    pub fn camera_graph_height_px(&self) -> f64 {
        self.camera_track_height_px - self.camera_graph_padding_px * 2.0
    }
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            max_history_size: 50,
            min_clip_duration: 0.1,
            default_clip_duration: 3.0,
            default_track_count: 3,
            initial_total_duration: 300.0,
            pixels_per_second: 50.0,
            min_zoom: 20.0,
            max_zoom: 200.0,
            track_height_px: 80.0,
            track_switch_threshold_px: 40.0,
            camera_track_height_px: 100.0,
            camera_graph_padding_px: 10.0,
            keyframe_drag_threshold_px: 5.0,
            selection_box_threshold_px: 3.0,
            min_selection_box_px: 5.0,
            keyframe_merge_epsilon: 0.01,
        }
    }
}
