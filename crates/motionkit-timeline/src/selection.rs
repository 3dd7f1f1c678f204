//! Clip and keyframe selection.

use motionkit_core::{DVec2, Rect};

use crate::camera::KeyframeId;
use crate::clip::{Clip, ClipId, ClipMap};
use crate::track::clips_on_track;

/// Ordered clip selection plus the selected camera keyframe.
///
/// The last selected clip is the primary one shown in single-target panels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    clip_ids: Vec<ClipId>,
    keyframe: Option<KeyframeId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clip_ids(&self) -> &[ClipId] {
        &self.clip_ids
    }

    pub fn primary(&self) -> Option<&ClipId> {
        self.clip_ids.last()
    }

    pub fn contains(&self, id: &ClipId) -> bool {
        self.clip_ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.clip_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clip_ids.is_empty()
    }

    pub fn is_multi(&self) -> bool {
        self.clip_ids.len() > 1
    }

    /// Select exactly `id`.
    pub fn replace(&mut self, id: ClipId) {
        self.clip_ids.clear();
        self.clip_ids.push(id);
    }

    /// Add `id` if absent, remove it otherwise.
    pub fn toggle(&mut self, id: ClipId) {
        if let Some(pos) = self.clip_ids.iter().position(|c| c == &id) {
            self.clip_ids.remove(pos);
        } else {
            self.clip_ids.push(id);
        }
    }

    /// Add `id` as the new primary, moving it to the end if already selected.
    pub fn add(&mut self, id: ClipId) {
        self.clip_ids.retain(|c| c != &id);
        self.clip_ids.push(id);
    }

    pub fn remove(&mut self, id: &ClipId) -> bool {
        let before = self.clip_ids.len();
        self.clip_ids.retain(|c| c != id);
        self.clip_ids.len() != before
    }

    pub fn set_clips(&mut self, ids: impl IntoIterator<Item = ClipId>) {
        self.clip_ids.clear();
        for id in ids {
            if !self.clip_ids.contains(&id) {
                self.clip_ids.push(id);
            }
        }
    }

    pub fn clear_clips(&mut self) {
        self.clip_ids.clear();
    }

    pub fn keyframe(&self) -> Option<&KeyframeId> {
        self.keyframe.as_ref()
    }

    pub fn set_keyframe(&mut self, id: Option<KeyframeId>) {
        self.keyframe = id;
    }

    pub fn clear(&mut self) {
        self.clip_ids.clear();
        self.keyframe = None;
    }

    /// Drop ids that no longer name a clip.
    pub fn retain_existing(&mut self, clips: &ClipMap) {
        self.clip_ids.retain(|id| clips.contains_key(id));
    }
}

/// Clips between `from` and `to` inclusive on `from`'s track, by start time.
///
/// Empty when either id is unknown or the clips sit on different tracks.
pub fn range_between(clips: &ClipMap, from: &ClipId, to: &ClipId) -> Vec<ClipId> {
    let (Some(a), Some(b)) = (clips.get(from), clips.get(to)) else {
        return Vec::new();
    };
    if a.track_index != b.track_index {
        return Vec::new();
    }
    let track = clips_on_track(clips, a.track_index);
    let (Some(i), Some(j)) = (
        track.iter().position(|c| &c.id == from),
        track.iter().position(|c| &c.id == to),
    ) else {
        return Vec::new();
    };
    let (lo, hi) = if i <= j { (i, j) } else { (j, i) };
    track[lo..=hi].iter().map(|c| c.id.clone()).collect()
}

/// Bounding box of a clip in timeline pixels.
pub fn clip_rect(clip: &Clip, pixels_per_second: f64, track_height: f64) -> Rect {
    Rect::new(
        clip.start_time * pixels_per_second,
        clip.track_index as f64 * track_height,
        clip.duration * pixels_per_second,
        track_height,
    )
}

/// Clips whose box touches the rectangle spanned by `a` and `b`.
pub fn clips_in_box(
    clips: &ClipMap,
    a: DVec2,
    b: DVec2,
    pixels_per_second: f64,
    track_height: f64,
) -> Vec<ClipId> {
    let area = Rect::from_corners(a, b);
    clips
        .values()
        .filter(|c| clip_rect(c, pixels_per_second, track_height).intersects(&area))
        .map(|c| c.id.clone())
        .collect()
}

// ── Tests ───────────────────────────────────────────────────────
