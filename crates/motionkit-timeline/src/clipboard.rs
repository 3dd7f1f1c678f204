//! Copy and paste for clips, whole tracks and camera keyframes.
//!
//! Each buffer holds deep copies, so later edits to the originals never
//! leak into a paste. Pasted items always get fresh ids.

use tracing::{debug, info, warn};

use crate::camera::{CameraKeyframe, KeyframeId};
use crate::clip::{Clip, ClipId, ClipOptions};
use crate::resolver::{find_non_overlapping_time, resolve_paste_offset};
use crate::timeline::Timeline;
use crate::track::TimelineMode;

/// The three independent copy buffers.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    clips: Vec<Clip>,
    track: Option<Vec<Clip>>,
    keyframe: Option<CameraKeyframe>,
}

impl Clipboard {
    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn has_clips(&self) -> bool {
        !self.clips.is_empty()
    }

    pub fn has_track(&self) -> bool {
        self.track.is_some()
    }

    pub fn keyframe(&self) -> Option<&CameraKeyframe> {
        self.keyframe.as_ref()
    }
}

impl Timeline {
    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    /// The clips a clip-level command on `id` acts on: the whole selection
    /// when `id` is part of a multi-selection, otherwise `id` alone.
    fn command_targets(&self, id: &ClipId) -> Vec<ClipId> {
        if self.selection.is_multi() && self.selection.contains(id) {
            self.selection.clip_ids().to_vec()
        } else {
            vec![id.clone()]
        }
    }

    // ── Clips ───────────────────────────────────────────────────

    /// Copy `id`, or the multi-selection containing it. Returns the number
    /// of clips copied.
    pub fn copy_clip(&mut self, id: &ClipId) -> usize {
        if !self.state.clips.contains_key(id) {
            warn!(clip = %id, "copy of unknown clip");
            return 0;
        }
        let copied: Vec<Clip> = self
            .command_targets(id)
            .iter()
            .filter_map(|id| self.state.clips.get(id))
            .cloned()
            .collect();
        info!(count = copied.len(), "clips copied");
        let count = copied.len();
        self.clipboard.clips = copied;
        count
    }

    /// Copy then delete, as one checkpoint.
    pub fn cut_clip(&mut self, id: &ClipId) -> usize {
        let count = self.copy_clip(id);
        if count == 0 {
            return 0;
        }
        let ids: Vec<ClipId> = self.clipboard.clips.iter().map(|c| c.id.clone()).collect();
        self.remove_clips(&ids);
        self.selection.clear_clips();
        self.notify_clips();
        self.notify_selection();
        self.checkpoint("Cut clip");
        count
    }

    /// Paste the copied clips so the earliest lands at `click_x` (pixels) or
    /// the playhead, keeping their relative timing and tracks. The group
    /// moves right past anything in the way. Returns the new ids, which
    /// also become the selection.
    pub fn paste_clip(&mut self, click_x: Option<f64>) -> Vec<ClipId> {
        if self.clipboard.clips.is_empty() {
            debug!("clip clipboard is empty");
            return Vec::new();
        }
        let mut sources = self.clipboard.clips.clone();
        sources.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

        let target = click_x
            .map_or(self.current_time, |x| self.x_to_time(x))
            .max(0.0);
        let group: Vec<_> = sources.iter().map(|c| (c.track_index, c.range())).collect();
        let plan = resolve_paste_offset(&self.state.clips, &group, target);
        if !plan.converged {
            warn!(
                iterations = plan.iterations,
                "paste placement did not settle, placing clips one by one"
            );
        }

        let mut pasted = Vec::with_capacity(sources.len());
        for clip in &sources {
            let mut start = clip.start_time + plan.offset;
            if !plan.converged {
                start = find_non_overlapping_time(&self.state.clips, clip.track_index, start, clip.duration);
            }
            let options = ClipOptions::from_clip(clip).start_time(start);
            pasted.push(self.insert_clip(clip.kind, options));
        }

        self.selection.set_clips(pasted.iter().cloned());
        info!(count = pasted.len(), offset = plan.offset, "clips pasted");
        self.notify_clips();
        self.notify_selection();
        self.checkpoint("Paste clip");
        pasted
    }

    // ── Tracks ──────────────────────────────────────────────────

    /// Copy every clip on `track`. An empty track clears the track buffer.
    pub fn copy_track(&mut self, track: usize) {
        let clips: Vec<Clip> = self
            .state
            .clips_on_track(track)
            .into_iter()
            .cloned()
            .collect();
        if clips.is_empty() {
            debug!(track, "no clips to copy on track");
            self.clipboard.track = None;
        } else {
            info!(track, count = clips.len(), "track copied");
            self.clipboard.track = Some(clips);
        }
    }

    /// Insert a new track below `track` holding copies of the copied track.
    /// Returns the new track's index.
    pub fn paste_track(&mut self, track: usize) -> Option<usize> {
        if self.state.timeline_mode != TimelineMode::Clip {
            return None;
        }
        let Some(clips) = self.clipboard.track.clone() else {
            debug!("track clipboard is empty");
            return None;
        };
        let index = self.insert_track(track + 1);
        self.insert_copies(&clips, index);
        self.checkpoint("Paste track");
        Some(index)
    }

    /// Append a track holding copies of the clips on `track`.
    pub fn duplicate_track(&mut self, track: usize) -> Option<usize> {
        if self.state.timeline_mode != TimelineMode::Clip || track >= self.state.clip_track_count {
            return None;
        }
        let clips: Vec<Clip> = self
            .state
            .clips_on_track(track)
            .into_iter()
            .cloned()
            .collect();
        let index = self.state.clip_track_count;
        self.state.clip_track_count += 1;
        self.insert_copies(&clips, index);
        self.checkpoint("Duplicate track");
        Some(index)
    }

    fn insert_copies(&mut self, clips: &[Clip], track: usize) {
        for clip in clips {
            let options = ClipOptions::from_clip(clip).track(track);
            self.insert_clip(clip.kind, options);
        }
        self.notify_clips();
    }

    // ── Camera keyframes ────────────────────────────────────────

    pub fn copy_camera_keyframe(&mut self, id: &KeyframeId) -> bool {
        let Some(keyframe) = self.state.camera_keyframes.get(id) else {
            warn!(keyframe = %id, "copy of unknown camera keyframe");
            return false;
        };
        self.clipboard.keyframe = Some(keyframe.clone());
        true
    }

    /// Paste the copied keyframe at `time` (default: the playhead), clamped
    /// into the timeline, and select it.
    pub fn paste_camera_keyframe(&mut self, time: Option<f64>) -> Option<KeyframeId> {
        let mut keyframe = self.clipboard.keyframe.clone()?;
        keyframe.id = KeyframeId::generate();
        keyframe.time = time
            .unwrap_or(self.current_time)
            .clamp(0.0, self.state.total_duration);
        let id = keyframe.id.clone();

        self.state.camera_keyframes.insert(keyframe);
        self.selection.set_keyframe(Some(id.clone()));
        self.notify_camera();
        self.notify_selection();
        self.checkpoint("Paste camera keyframe");
        Some(id)
    }
}

// ── Tests ───────────────────────────────────────────────────────
