//! The timeline controller.
//!
//! `Timeline` owns the editable state, the selection, the undo history and
//! the active gesture. Every user intent goes through one of its methods so
//! the no-overlap invariant is checked, checkpoints stay consistent and
//! listeners hear about each committed change right away.
//!
//! Pointer handling lives in `gesture.rs` and clipboard operations in
//! `clipboard.rs`; both extend `Timeline`.

use motionkit_core::{
    normalize_time, AnimatedProperty, CameraChannel, CameraPose, Easing, Endpoint, MotionError,
    Result, TimeRange,
};
use tracing::{debug, info, warn};

use crate::camera::{CameraKeyframe, CameraKeyframes, KeyframeId, KeyframePatch, ValueRange};
use crate::clip::{Clip, ClipAttributes, ClipId, ClipKind, ClipMap, ClipOptions, ClipPatch};
use crate::clipboard::Clipboard;
use crate::config::TimelineConfig;
use crate::document::TimelineDocument;
use crate::evaluator::{self, FrameItem};
use crate::history::{History, Snapshot};
use crate::interaction::Interaction;
use crate::resolver::{find_available_track, find_non_overlapping_time, is_track_available};
use crate::selection::{range_between, Selection};
use crate::state::TimelineState;
use crate::track::{TimelineMode, TrackSet};

/// Receives synchronous notifications after committed changes.
///
/// All methods default to no-ops so a view implements only what it shows.
pub trait TimelineListener {
    fn clips_changed(&mut self, _state: &TimelineState) {}
    fn selection_changed(&mut self, _selection: &Selection) {}
    fn camera_changed(&mut self, _keyframes: &CameraKeyframes) {}
    fn time_changed(&mut self, _time: f64) {}
    fn mode_changed(&mut self, _mode: TimelineMode) {}
    fn history_changed(&mut self, _can_undo: bool, _can_redo: bool) {}
}

/// The timeline editor core.
pub struct Timeline {
    pub(crate) state: TimelineState,
    pub(crate) selection: Selection,
    pub(crate) history: History,
    pub(crate) config: TimelineConfig,
    pub(crate) current_time: f64,
    pub(crate) pixels_per_second: f64,
    pub(crate) interaction: Interaction,
    pub(crate) clipboard: Clipboard,
    listeners: Vec<Box<dyn TimelineListener>>,
}

impl std::fmt::Debug for Timeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timeline")
            .field("clips", &self.state.clips.len())
            .field("mode", &self.state.timeline_mode)
            .field("current_time", &self.current_time)
            .field("interaction", &self.interaction.name())
            .field("history", &self.history.len())
            .finish()
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new(TimelineConfig::default())
    }
}

impl Timeline {
    /// Empty timeline with the configured number of tracks and an initial
    /// checkpoint.
    pub fn new(config: TimelineConfig) -> Self {
        let state = TimelineState::new(config.initial_total_duration, config.default_track_count);
        let mut timeline = Self {
            state,
            selection: Selection::new(),
            history: History::new(config.max_history_size),
            pixels_per_second: config.pixels_per_second,
            config,
            current_time: 0.0,
            interaction: Interaction::Idle,
            clipboard: Clipboard::default(),
            listeners: Vec::new(),
        };
        timeline.checkpoint("Initial state");
        timeline
    }

    // ── Read access ─────────────────────────────────────────────

    pub fn state(&self) -> &TimelineState {
        &self.state
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    pub fn clips(&self) -> &ClipMap {
        &self.state.clips
    }

    pub fn clip(&self, id: &ClipId) -> Option<&Clip> {
        self.state.clips.get(id)
    }

    /// The primary selected clip.
    pub fn selected_clip(&self) -> Option<&Clip> {
        self.selection.primary().and_then(|id| self.state.clips.get(id))
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_clip_ids(&self) -> &[ClipId] {
        self.selection.clip_ids()
    }

    pub fn is_clip_hidden(&self, id: &ClipId) -> bool {
        self.state.is_hidden(id)
    }

    pub fn camera_keyframes(&self) -> &CameraKeyframes {
        &self.state.camera_keyframes
    }

    pub fn selected_keyframe(&self) -> Option<&CameraKeyframe> {
        self.selection
            .keyframe()
            .and_then(|id| self.state.camera_keyframes.get(id))
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn total_duration(&self) -> f64 {
        self.state.total_duration
    }

    pub fn pixels_per_second(&self) -> f64 {
        self.pixels_per_second
    }

    pub fn mode(&self) -> TimelineMode {
        self.state.timeline_mode
    }

    pub fn tracks(&self) -> TrackSet {
        self.state.tracks()
    }

    pub fn track_count(&self) -> usize {
        self.state.tracks().len()
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ── Listeners ───────────────────────────────────────────────

    pub fn add_listener(&mut self, listener: Box<dyn TimelineListener>) {
        self.listeners.push(listener);
    }

    pub(crate) fn notify_clips(&mut self) {
        for l in &mut self.listeners {
            l.clips_changed(&self.state);
        }
    }

    pub(crate) fn notify_selection(&mut self) {
        for l in &mut self.listeners {
            l.selection_changed(&self.selection);
        }
    }

    pub(crate) fn notify_camera(&mut self) {
        for l in &mut self.listeners {
            l.camera_changed(&self.state.camera_keyframes);
        }
    }

    pub(crate) fn notify_time(&mut self) {
        for l in &mut self.listeners {
            l.time_changed(self.current_time);
        }
    }

    fn notify_mode(&mut self) {
        let mode = self.state.timeline_mode;
        for l in &mut self.listeners {
            l.mode_changed(mode);
        }
    }

    fn notify_history(&mut self) {
        let (undo, redo) = (self.history.can_undo(), self.history.can_redo());
        for l in &mut self.listeners {
            l.history_changed(undo, redo);
        }
    }

    // ── History ─────────────────────────────────────────────────

    /// Record a checkpoint of the current state. Returns false when the state
    /// equals the current checkpoint or a restore is in progress.
    pub fn save_state(&mut self, label: &str) -> bool {
        self.checkpoint(label)
    }

    pub(crate) fn checkpoint(&mut self, label: &str) -> bool {
        let snapshot = Snapshot::capture(&self.state, self.selection.keyframe());
        let saved = self.history.save(snapshot, label);
        if saved {
            self.notify_history();
        }
        saved
    }

    /// Step back one checkpoint. Returns false at the oldest one.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo().cloned() else {
            debug!("nothing to undo");
            return false;
        };
        self.restore(&snapshot);
        true
    }

    /// Step forward one checkpoint. Returns false at the newest one.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo().cloned() else {
            debug!("nothing to redo");
            return false;
        };
        self.restore(&snapshot);
        true
    }

    /// Replace the live state with `snapshot`. In clip mode the clips that
    /// the step added or visibly changed become the selection.
    fn restore(&mut self, snapshot: &Snapshot) {
        self.history.set_restoring(true);
        let before = std::mem::take(&mut self.state.clips);
        snapshot.restore_into(&mut self.state);
        self.interaction = Interaction::Idle;

        match self.state.timeline_mode {
            TimelineMode::Clip => {
                let changed = self
                    .state
                    .clips
                    .values()
                    .filter(|clip| before.get(&clip.id).map_or(true, |old| clip.differs_visibly(old)))
                    .map(|clip| clip.id.clone());
                self.selection.set_clips(changed);
                self.selection.set_keyframe(None);
            }
            TimelineMode::Camera => {
                self.selection.clear_clips();
                let keyframe = snapshot
                    .selected_keyframe_id
                    .clone()
                    .filter(|id| self.state.camera_keyframes.contains(id));
                self.selection.set_keyframe(keyframe);
            }
        }
        self.current_time = self.current_time.clamp(0.0, self.state.total_duration);
        self.history.set_restoring(false);

        self.notify_mode();
        self.notify_clips();
        self.notify_camera();
        self.notify_selection();
        self.notify_time();
        self.notify_history();
    }

    // ── Clips ───────────────────────────────────────────────────

    /// Add a clip of `kind` and select it. Returns its id.
    ///
    /// The start defaults to the playhead and the duration to the configured
    /// default. A requested track that is occupied at that time is replaced
    /// by the first free track, or a new one.
    pub fn add_clip(&mut self, kind: ClipKind, options: ClipOptions) -> ClipId {
        let id = self.insert_clip(kind, options);
        self.selection.replace(id.clone());
        self.notify_clips();
        self.notify_selection();
        self.checkpoint(&format!("Add {} clip", kind));
        id
    }

    /// Add an image clip referencing a host-owned payload.
    pub fn add_image(
        &mut self,
        image_ref: impl Into<String>,
        file_name: impl Into<String>,
        options: ClipOptions,
    ) -> ClipId {
        let image = ClipOptions::image(image_ref, file_name);
        let options = ClipOptions {
            attributes: image.attributes,
            ..options
        };
        self.add_clip(ClipKind::Image, options)
    }

    /// Insert without selecting, notifying or checkpointing.
    pub(crate) fn insert_clip(&mut self, kind: ClipKind, options: ClipOptions) -> ClipId {
        let id = match options.id {
            Some(id) if !self.state.clips.contains_key(&id) => id,
            Some(id) => {
                warn!(clip = %id, "clip id already in use, generating a new one");
                ClipId::generate()
            }
            None => ClipId::generate(),
        };
        let start = normalize_time(options.start_time.unwrap_or(self.current_time).max(0.0));
        let duration = options
            .duration
            .filter(|d| d.is_finite())
            .unwrap_or(self.config.default_clip_duration)
            .max(self.config.min_clip_duration);
        let duration = normalize_time(duration);
        let range = TimeRange::new(start, duration);

        let track_count = self.state.clip_track_count;
        let track = options
            .track_index
            .filter(|&t| is_track_available(&self.state.clips, t, range, &[]))
            .or_else(|| find_available_track(&self.state.clips, range, track_count))
            .unwrap_or(track_count);

        let mut clip = Clip::new(kind, id.clone(), track, start, duration);
        for (property, curve) in options.animation {
            if kind.supports(property) {
                clip.animation.insert(property, curve);
            }
        }
        if let Some(attributes) = options.attributes {
            if attributes.fits(kind) {
                clip.attributes = attributes;
            } else {
                warn!(clip = %id, kind = %kind, "ignoring attributes for another clip kind");
            }
        }

        self.state.ensure_duration(clip.end_time());
        self.state.clips.insert(id.clone(), clip);
        self.state.ensure_track_count();
        debug!(clip = %id, track, start, duration, "clip inserted");
        id
    }

    /// Merge `patch` into a clip without a checkpoint.
    ///
    /// Fails without touching anything when the clip is unknown, the patch
    /// does not fit the clip, or the new placement would overlap another
    /// clip on the same track.
    pub fn update_clip_data(&mut self, id: &ClipId, patch: ClipPatch) -> Result<()> {
        let Some(clip) = self.state.clips.get(id) else {
            warn!(clip = %id, "update for unknown clip");
            return Err(MotionError::ClipNotFound(id.to_string()));
        };
        patch.validate(clip, self.config.min_clip_duration)?;
        if patch.touches_placement() {
            let (track, range) = patch.placement_of(clip);
            if !is_track_available(&self.state.clips, track, range, std::slice::from_ref(id)) {
                warn!(clip = %id, track, "update rejected, clips would overlap");
                return Err(MotionError::Overlap {
                    clip: id.to_string(),
                    track,
                });
            }
        }

        let mut end = 0.0;
        if let Some(clip) = self.state.clips.get_mut(id) {
            patch.apply(clip);
            end = clip.end_time();
        }
        self.state.ensure_duration(end);
        self.state.ensure_track_count();
        self.notify_clips();
        Ok(())
    }

    /// Delete a clip, or the whole selection when `id` is part of a
    /// multi-selection.
    pub fn delete_clip(&mut self, id: &ClipId) {
        if !self.state.clips.contains_key(id) {
            warn!(clip = %id, "delete for unknown clip");
            return;
        }
        let ids: Vec<ClipId> = if self.selection.is_multi() && self.selection.contains(id) {
            self.selection.clip_ids().to_vec()
        } else {
            vec![id.clone()]
        };
        self.remove_clips(&ids);
        self.selection.clear_clips();
        self.notify_clips();
        self.notify_selection();
        self.checkpoint("Delete clip");
    }

    pub(crate) fn remove_clips(&mut self, ids: &[ClipId]) {
        for id in ids {
            self.state.clips.remove(id);
            self.state.hidden_clip_ids.remove(id);
        }
    }

    /// Copy a clip to the first free spot at or after its end on its track.
    pub fn duplicate_clip(&mut self, id: &ClipId) -> Option<ClipId> {
        let Some(source) = self.state.clips.get(id) else {
            warn!(clip = %id, "duplicate of unknown clip");
            return None;
        };
        let start = find_non_overlapping_time(
            &self.state.clips,
            source.track_index,
            source.end_time(),
            source.duration,
        );
        let kind = source.kind;
        let options = ClipOptions::from_clip(source).start_time(start);

        let new_id = self.insert_clip(kind, options);
        self.selection.replace(new_id.clone());
        self.notify_clips();
        self.notify_selection();
        self.checkpoint("Duplicate clip");
        Some(new_id)
    }

    pub fn toggle_clip_visibility(&mut self, id: &ClipId) {
        if !self.state.clips.contains_key(id) {
            warn!(clip = %id, "visibility toggle for unknown clip");
            return;
        }
        if !self.state.hidden_clip_ids.remove(id) {
            self.state.hidden_clip_ids.insert(id.clone());
        }
        self.notify_clips();
        self.checkpoint("Toggle clip visibility");
    }

    /// Make `property` take `value` at the playhead by solving for one curve
    /// endpoint. No checkpoint; callers save when the edit is finished.
    pub fn set_value_at_playhead(
        &mut self,
        id: &ClipId,
        property: AnimatedProperty,
        value: f64,
    ) -> Result<Endpoint> {
        let now = self.current_time;
        let clip = self.animatable_clip(id, property)?;
        let progress = evaluator::authoring_progress(clip, now);
        let endpoint = clip
            .curve_mut(property)
            .solve_at(progress, value, property.authored_floor());
        self.notify_clips();
        Ok(endpoint)
    }

    /// Write both endpoints of a curve. No checkpoint.
    pub fn set_animation_endpoints(
        &mut self,
        id: &ClipId,
        property: AnimatedProperty,
        start: f64,
        end: f64,
    ) -> Result<()> {
        let clip = self.animatable_clip(id, property)?;
        clip.curve_mut(property)
            .set_endpoints(start, end, property.authored_floor());
        self.notify_clips();
        Ok(())
    }

    /// Set the easing of a curve. No checkpoint.
    pub fn set_animation_easing(
        &mut self,
        id: &ClipId,
        property: AnimatedProperty,
        easing: Easing,
    ) -> Result<()> {
        let clip = self.animatable_clip(id, property)?;
        clip.curve_mut(property).easing = easing;
        self.notify_clips();
        Ok(())
    }

    fn animatable_clip(&mut self, id: &ClipId, property: AnimatedProperty) -> Result<&mut Clip> {
        let Some(clip) = self.state.clips.get_mut(id) else {
            warn!(clip = %id, "animation edit for unknown clip");
            return Err(MotionError::ClipNotFound(id.to_string()));
        };
        if !clip.kind.supports(property) {
            return Err(MotionError::InvalidParameter(format!(
                "{} clips cannot animate {}",
                clip.kind, property
            )));
        }
        Ok(clip)
    }

    /// Replace a clip's type-specific attributes. No checkpoint.
    pub fn set_clip_attributes(&mut self, id: &ClipId, attributes: ClipAttributes) -> Result<()> {
        self.update_clip_data(id, ClipPatch::new().attributes(attributes))
    }

    // ── Selection ───────────────────────────────────────────────

    /// Click selection: `multi` toggles, `range` extends from the primary
    /// clip along its track, otherwise the selection becomes `id` alone.
    pub fn select_clip(&mut self, id: &ClipId, multi: bool, range: bool) {
        if !self.state.clips.contains_key(id) {
            warn!(clip = %id, "select of unknown clip");
            return;
        }
        let primary = self.selection.primary().cloned();
        match primary {
            Some(from) if range => self.select_clip_range(&from, id),
            _ if multi => self.selection.toggle(id.clone()),
            _ => self.selection.replace(id.clone()),
        }
        self.notify_selection();
    }

    /// Select the clips from `from` to `to` on one track, with `to` as the
    /// new primary. Falls back to selecting `to` alone across tracks.
    pub fn select_clip_range(&mut self, from: &ClipId, to: &ClipId) {
        let ids = range_between(&self.state.clips, from, to);
        if ids.is_empty() {
            self.selection.replace(to.clone());
        } else {
            self.selection.set_clips(ids);
            self.selection.add(to.clone());
        }
        self.notify_selection();
    }

    pub fn select_clips(&mut self, ids: impl IntoIterator<Item = ClipId>) {
        let clips = &self.state.clips;
        self.selection
            .set_clips(ids.into_iter().filter(|id| clips.contains_key(id)));
        self.notify_selection();
    }

    pub fn deselect_all_clips(&mut self) {
        self.selection.clear_clips();
        self.notify_selection();
    }

    // ── Camera keyframes ────────────────────────────────────────

    /// Add a neutral camera keyframe at `time` (default: the playhead).
    ///
    /// A keyframe already within the merge distance keeps its values and
    /// only takes the new easing. Returns the id of the keyframe written.
    pub fn add_camera_keyframe(&mut self, easing: Easing, time: Option<f64>) -> KeyframeId {
        let time = time.unwrap_or(self.current_time).max(0.0);
        let eps = self.config.keyframe_merge_epsilon;

        if let Some(existing) = self.state.camera_keyframes.find_near(time, eps) {
            let id = existing.id.clone();
            self.state
                .camera_keyframes
                .update(&id, &KeyframePatch::default().easing(easing));
            self.notify_camera();
            self.checkpoint("Change camera keyframe easing");
            return id;
        }

        let keyframe = CameraKeyframe::new(time, easing);
        let id = keyframe.id.clone();
        self.state.camera_keyframes.insert(keyframe);
        self.state.ensure_duration(time);
        self.selection.set_keyframe(Some(id.clone()));
        self.notify_camera();
        self.notify_selection();
        self.checkpoint("Add camera keyframe");
        id
    }

    /// Patch a keyframe, clamping its time into the timeline and channel
    /// values to their floor. Checkpoints only when `save` is set. Returns
    /// false for an unknown id.
    pub fn update_camera_keyframe(&mut self, id: &KeyframeId, patch: KeyframePatch, save: bool) -> bool {
        let total = self.state.total_duration;
        let patch = KeyframePatch {
            time: patch.time.map(|t| t.clamp(0.0, total)),
            channel: patch.channel.map(|(channel, value)| match channel.value_floor() {
                Some(floor) => (channel, value.max(floor)),
                None => (channel, value),
            }),
            ..patch
        };
        if !self.state.camera_keyframes.update(id, &patch) {
            warn!(keyframe = %id, "update for unknown camera keyframe");
            return false;
        }
        self.notify_camera();
        if save {
            self.checkpoint("Update camera keyframe");
        }
        true
    }

    pub fn delete_camera_keyframe(&mut self, id: &KeyframeId) {
        if self.state.camera_keyframes.remove(id).is_none() {
            warn!(keyframe = %id, "delete for unknown camera keyframe");
            return;
        }
        if self.selection.keyframe() == Some(id) {
            self.selection.set_keyframe(None);
            self.notify_selection();
        }
        self.notify_camera();
        self.checkpoint("Delete camera keyframe");
    }

    pub fn select_camera_keyframe(&mut self, id: Option<&KeyframeId>) {
        let id = id.filter(|id| self.state.camera_keyframes.contains(id)).cloned();
        self.selection.set_keyframe(id);
        self.notify_selection();
    }

    /// Interpolated camera pose at `t`.
    pub fn camera_transform_at(&self, t: f64) -> CameraPose {
        evaluator::camera_pose_at(&self.state.camera_keyframes, t)
    }

    /// Value-graph range for a camera channel.
    pub fn camera_value_range(&self, channel: CameraChannel) -> ValueRange {
        self.state.camera_keyframes.value_range(channel)
    }

    /// Visible clips and their transforms at the playhead.
    pub fn render_frame(&self) -> Vec<FrameItem> {
        evaluator::render_frame(&self.state, self.current_time)
    }

    // ── Navigation ──────────────────────────────────────────────

    /// Move the playhead, clamped to the timeline.
    pub fn set_current_time(&mut self, t: f64) {
        let t = if t.is_finite() { t } else { 0.0 };
        self.current_time = t.clamp(0.0, self.state.total_duration);
        self.notify_time();
    }

    /// Scale the horizontal zoom by `factor`, within the configured range.
    pub fn zoom(&mut self, factor: f64) {
        if !(factor.is_finite() && factor > 0.0) {
            warn!(factor, "ignoring invalid zoom factor");
            return;
        }
        self.pixels_per_second =
            (self.pixels_per_second * factor).clamp(self.config.min_zoom, self.config.max_zoom);
    }

    pub fn time_to_x(&self, t: f64) -> f64 {
        t * self.pixels_per_second
    }

    pub fn x_to_time(&self, x: f64) -> f64 {
        x / self.pixels_per_second
    }

    /// Switch between clip and camera editing. Selection and any gesture
    /// are reset; the switch is a checkpoint.
    pub fn switch_timeline_mode(&mut self, mode: TimelineMode) {
        if self.state.timeline_mode == mode {
            return;
        }
        self.interaction = Interaction::Idle;
        self.selection.clear();
        self.state.timeline_mode = mode;
        info!(%mode, "timeline mode switched");
        self.notify_mode();
        self.notify_selection();
        self.checkpoint(&format!("Switch to {} mode", mode));
    }

    // ── Tracks ──────────────────────────────────────────────────

    fn in_clip_mode(&self, op: &str) -> bool {
        let ok = self.state.timeline_mode == TimelineMode::Clip;
        if !ok {
            debug!(op, "track operation ignored in camera mode");
        }
        ok
    }

    /// Append an empty track. Returns its index.
    pub fn add_track(&mut self) -> Option<usize> {
        if !self.in_clip_mode("add_track") {
            return None;
        }
        let index = self.state.clip_track_count;
        self.state.clip_track_count += 1;
        self.notify_clips();
        self.checkpoint("Add track");
        Some(index)
    }

    /// Insert an empty track at `index`, moving the clips at or below it
    /// down by one.
    pub fn insert_track_at(&mut self, index: usize) -> Option<usize> {
        if !self.in_clip_mode("insert_track_at") {
            return None;
        }
        let index = self.insert_track(index);
        self.notify_clips();
        self.checkpoint("Insert track");
        Some(index)
    }

    pub(crate) fn insert_track(&mut self, index: usize) -> usize {
        let index = index.min(self.state.clip_track_count);
        for clip in self.state.clips.values_mut() {
            if clip.track_index >= index {
                clip.track_index += 1;
            }
        }
        self.state.clip_track_count += 1;
        index
    }

    pub fn add_track_above(&mut self, index: usize) -> Option<usize> {
        self.insert_track_at(index)
    }

    pub fn add_track_below(&mut self, index: usize) -> Option<usize> {
        self.insert_track_at(index + 1)
    }

    /// Delete a track and its clips; later tracks move up. The last
    /// remaining track cannot be deleted.
    pub fn delete_track(&mut self, index: usize) {
        if !self.in_clip_mode("delete_track") {
            return;
        }
        if index >= self.state.clip_track_count || self.state.clip_track_count <= 1 {
            warn!(track = index, "cannot delete track");
            return;
        }
        let doomed: Vec<ClipId> = self
            .state
            .clips
            .values()
            .filter(|c| c.track_index == index)
            .map(|c| c.id.clone())
            .collect();
        self.remove_clips(&doomed);
        for clip in self.state.clips.values_mut() {
            if clip.track_index > index {
                clip.track_index -= 1;
            }
        }
        self.state.clip_track_count -= 1;
        self.selection.retain_existing(&self.state.clips);
        self.notify_clips();
        self.notify_selection();
        self.checkpoint("Delete track");
    }

    // ── Documents ───────────────────────────────────────────────

    /// Export the persistable state.
    pub fn document(&self) -> TimelineDocument {
        TimelineDocument::new(self.state.clone())
    }

    /// Replace everything with a loaded document. History restarts with the
    /// loaded state as its only checkpoint.
    pub fn load_document(&mut self, document: TimelineDocument) -> Result<()> {
        let mut state = document.timeline;
        let ids: Vec<ClipId> = state.clips.keys().cloned().collect();
        for id in &ids {
            state.normalize_clip(id);
        }
        state.ensure_track_count();
        state.validate()?;

        self.state = state;
        self.selection.clear();
        self.interaction = Interaction::Idle;
        self.current_time = 0.0;
        self.history.clear();
        self.checkpoint("Load document");
        info!(clips = self.state.clips.len(), "timeline document loaded");

        self.notify_mode();
        self.notify_clips();
        self.notify_camera();
        self.notify_selection();
        self.notify_time();
        Ok(())
    }
}

// ── Tests ───────────────────────────────────────────────────────
