//! Snapshot-based undo/redo.
//!
//! Every checkpoint stores a full structural copy of the editable state.
//! The history is a bounded list with a cursor; writing after an undo
//! discards the redo branch.

use std::collections::{BTreeSet, VecDeque};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::camera::{CameraKeyframes, KeyframeId};
use crate::clip::{ClipId, ClipMap};
use crate::state::TimelineState;
use crate::track::TimelineMode;

/// The restorable part of the timeline at one checkpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub clips: ClipMap,
    pub hidden_clip_ids: BTreeSet<ClipId>,
    pub total_duration: f64,
    pub timeline_mode: TimelineMode,
    pub camera_keyframes: CameraKeyframes,
    pub selected_keyframe_id: Option<KeyframeId>,
    pub clip_track_count: usize,
}

impl Snapshot {
    pub fn capture(state: &TimelineState, selected_keyframe_id: Option<&KeyframeId>) -> Self {
        Self {
            clips: state.clips.clone(),
            hidden_clip_ids: state.hidden_clip_ids.clone(),
            total_duration: state.total_duration,
            timeline_mode: state.timeline_mode,
            camera_keyframes: state.camera_keyframes.clone(),
            selected_keyframe_id: selected_keyframe_id.cloned(),
            clip_track_count: state.clip_track_count,
        }
    }

    /// Overwrite `state` with this snapshot. The track count never ends up
    /// below what the restored clips need.
    pub fn restore_into(&self, state: &mut TimelineState) {
        state.clips = self.clips.clone();
        state.hidden_clip_ids = self.hidden_clip_ids.clone();
        state.total_duration = self.total_duration;
        state.timeline_mode = self.timeline_mode;
        state.camera_keyframes = self.camera_keyframes.clone();
        state.clip_track_count = self.clip_track_count;
        state.ensure_track_count();
    }
}

/// A checkpoint with its label.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub snapshot: Snapshot,
    pub label: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Bounded linear undo history.
#[derive(Debug)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    /// Index of the entry matching the live state.
    cursor: usize,
    max_size: usize,
    restoring: bool,
}

impl History {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: 0,
            max_size: max_size.max(1),
            restoring: false,
        }
    }

    /// Record a checkpoint. Returns false when nothing was written: during a
    /// restore, or when the state equals the entry under the cursor.
    pub fn save(&mut self, snapshot: Snapshot, label: &str) -> bool {
        if self.restoring {
            debug!(label, "history save suppressed");
            return false;
        }
        if self
            .entries
            .get(self.cursor)
            .is_some_and(|e| e.snapshot == snapshot)
        {
            debug!(label, "history save skipped, state unchanged");
            return false;
        }

        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push_back(HistoryEntry {
            snapshot,
            label: label.to_string(),
            timestamp: now_millis(),
        });
        while self.entries.len() > self.max_size {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len() - 1;
        debug!(label, depth = self.entries.len(), "history checkpoint");
        true
    }

    /// Step back. Returns the snapshot to restore, or `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        let entry = &self.entries[self.cursor];
        debug!(label = %entry.label, cursor = self.cursor, "undo");
        Some(&entry.snapshot)
    }

    /// Step forward. Returns the snapshot to restore, or `None` at the newest entry.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        let entry = &self.entries[self.cursor];
        debug!(label = %entry.label, cursor = self.cursor, "redo");
        Some(&entry.snapshot)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.cursor)
    }

    /// Labels oldest first.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }

    /// Suppress or re-enable saving, used around compound operations.
    pub fn set_restoring(&mut self, restoring: bool) {
        self.restoring = restoring;
    }

    pub fn is_restoring(&self) -> bool {
        self.restoring
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
        self.restoring = false;
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(50)
    }
}

// ── Tests ───────────────────────────────────────────────────────
