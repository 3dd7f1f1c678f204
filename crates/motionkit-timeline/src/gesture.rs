//! Pointer-driven editing.
//!
//! The host hit-tests a press and hands the result to `pointer_down`; moves
//! and the release follow. Live moves only ever apply placements that keep
//! tracks free of overlaps. The release normalizes, re-validates and
//! writes a single checkpoint for the whole gesture.

use motionkit_core::{DVec2, TimeRange};
use tracing::{debug, warn};

use crate::camera::KeyframePatch;
use crate::clip::{ClipId, ClipMap};
use crate::interaction::{
    classify_drag, BoxSelect, ClipDrag, ClipResize, DragAxis, HitTarget, Interaction,
    KeyframeDrag, PointerEvent,
};
use crate::resolver::{
    is_track_available, resolve_multi_resize, resolve_single_drag, resolve_single_resize,
    DragOrigin, GroupDrag,
};
use crate::selection::clips_in_box;
use crate::timeline::Timeline;
use crate::track::TimelineMode;

/// True when none of `placed` overlaps a clip outside the moving group.
fn group_fits(clips: &ClipMap, origins: &[DragOrigin], placed: &[(ClipId, usize, TimeRange)]) -> bool {
    let member = |id: &ClipId| origins.iter().any(|o| &o.id == id);
    placed.iter().all(|(_, track, range)| {
        !clips
            .values()
            .any(|c| c.track_index == *track && !member(&c.id) && c.range().overlaps(range))
    })
}

impl Timeline {
    fn origins_of_selection(&self) -> Vec<DragOrigin> {
        self.selection
            .clip_ids()
            .iter()
            .filter_map(|id| self.state.clips.get(id))
            .map(DragOrigin::of)
            .collect()
    }

    // ── Press ───────────────────────────────────────────────────

    /// Start a gesture on `target`. A gesture still in flight is finished
    /// first.
    pub fn pointer_down(&mut self, target: HitTarget, event: PointerEvent) {
        if !self.interaction.is_idle() {
            self.pointer_up();
        }
        let pos = event.position;
        let mods = event.modifiers;
        let mode = self.state.timeline_mode;

        match target {
            HitTarget::Ruler | HitTarget::Playhead => {
                self.set_current_time(self.x_to_time(pos.x));
                self.interaction = Interaction::ScrubbingPlayhead;
            }
            HitTarget::Background if mode == TimelineMode::Camera => {
                self.select_camera_keyframe(None);
            }
            HitTarget::Background => {
                if !mods.ctrl {
                    self.deselect_all_clips();
                }
                self.interaction = Interaction::SelectingBox(BoxSelect {
                    start: pos,
                    current: pos,
                    additive: mods.ctrl,
                    base: self.selection.clip_ids().to_vec(),
                    moved: false,
                });
            }
            HitTarget::Clip(id) | HitTarget::ClipHandle(id, _) if mode == TimelineMode::Camera => {
                debug!(clip = %id, "clip press ignored in camera mode");
            }
            HitTarget::Clip(id) => self.press_clip(id, event),
            HitTarget::ClipHandle(id, edge) => {
                if !self.state.clips.contains_key(&id) {
                    warn!(clip = %id, "press on unknown clip handle");
                    return;
                }
                if !self.selection.contains(&id) {
                    self.select_clip(&id, mods.ctrl, false);
                }
                self.interaction = Interaction::ResizingClip(ClipResize {
                    anchor: id,
                    edge,
                    pointer_start: pos,
                    origins: self.origins_of_selection(),
                    moved: false,
                });
            }
            HitTarget::CameraKeyframe { id, channel } => {
                let Some(kf) = self.state.camera_keyframes.get(&id) else {
                    warn!(keyframe = %id, "press on unknown camera keyframe");
                    return;
                };
                let (start_time, start_value) = (kf.time, kf.values.get(channel));
                self.interaction = Interaction::DraggingCameraKeyframe(KeyframeDrag {
                    id,
                    channel,
                    pointer_start: pos,
                    start_time,
                    start_value,
                    range: self.camera_value_range(channel),
                    track_top: channel.track_index() as f64 * self.config.camera_track_height_px,
                    axis: None,
                });
            }
        }
    }

    fn press_clip(&mut self, id: ClipId, event: PointerEvent) {
        if !self.state.clips.contains_key(&id) {
            warn!(clip = %id, "press on unknown clip");
            return;
        }
        let mods = event.modifiers;
        let was_selected = self.selection.contains(&id);
        if !was_selected {
            self.select_clip(&id, mods.ctrl, mods.shift);
        } else if mods.ctrl {
            self.selection.remove(&id);
            self.notify_selection();
            return;
        } else if mods.shift {
            self.select_clip(&id, false, true);
        }
        if !self.selection.contains(&id) {
            return;
        }
        self.interaction = Interaction::DraggingClip(ClipDrag {
            anchor: id,
            pointer_start: event.position,
            origins: self.origins_of_selection(),
            last_valid_delta: 0.0,
            was_selected: was_selected && mods.is_none(),
            moved: false,
        });
    }

    // ── Move ────────────────────────────────────────────────────

    pub fn pointer_move(&mut self, event: PointerEvent) {
        let pos = event.position;
        let mut interaction = std::mem::take(&mut self.interaction);
        match &mut interaction {
            Interaction::Idle => {}
            Interaction::ScrubbingPlayhead => self.set_current_time(self.x_to_time(pos.x)),
            Interaction::DraggingClip(drag) => self.drag_clips(drag, pos),
            Interaction::ResizingClip(resize) => self.resize_clips(resize, pos),
            Interaction::SelectingBox(selection) => self.drag_box(selection, pos),
            Interaction::DraggingCameraKeyframe(drag) => self.drag_keyframe(drag, pos),
        }
        self.interaction = interaction;
    }

    fn drag_clips(&mut self, drag: &mut ClipDrag, pos: DVec2) {
        let delta = pos - drag.pointer_start;
        if delta != DVec2::ZERO {
            drag.moved = true;
        }
        let delta_time = self.x_to_time(delta.x);
        let track_offset = if delta.y.abs() > self.config.track_switch_threshold_px {
            (delta.y / self.config.track_height_px).round() as isize
        } else {
            0
        };
        let track_count = self.state.clip_track_count.max(1);

        if let [origin] = drag.origins.as_slice() {
            let current_track = self
                .state
                .clips
                .get(&origin.id)
                .map_or(origin.track_index, |c| c.track_index);
            let proposed_track = (origin.track_index as isize + track_offset)
                .clamp(0, track_count as isize - 1) as usize;
            let placement = resolve_single_drag(
                &self.state.clips,
                origin,
                current_track,
                origin.start_time + delta_time,
                proposed_track,
            );
            let range = TimeRange::new(placement.start_time, origin.duration);
            let exclude = std::slice::from_ref(&origin.id);
            if !is_track_available(&self.state.clips, placement.track_index, range, exclude) {
                return;
            }
            if let Some(clip) = self.state.clips.get_mut(&origin.id) {
                clip.start_time = placement.start_time;
                clip.track_index = placement.track_index;
            }
            self.notify_clips();
            return;
        }

        let current_track_offset = drag
            .anchor_origin()
            .and_then(|o| {
                let now = self.state.clips.get(&o.id)?.track_index;
                Some(now as isize - o.track_index as isize)
            })
            .unwrap_or(0);
        let group = GroupDrag {
            origins: &drag.origins,
            track_count,
            current_track_offset,
            last_valid_delta: drag.last_valid_delta,
        };
        let step = group.resolve(&self.state.clips, delta_time, track_offset);
        if step.horizontal_valid {
            drag.last_valid_delta = step.delta_time;
        }

        let placed: Option<Vec<(ClipId, usize, TimeRange)>> = drag
            .origins
            .iter()
            .map(|o| {
                let track = o.track_index.checked_add_signed(step.track_offset)?;
                let range = TimeRange::new(o.start_time + step.delta_time, o.duration);
                Some((o.id.clone(), track, range))
            })
            .collect();
        let Some(placed) = placed else {
            return;
        };
        if !group_fits(&self.state.clips, &drag.origins, &placed) {
            debug!(delta = step.delta_time, "group move rejected");
            return;
        }
        for (id, track, range) in placed {
            if let Some(clip) = self.state.clips.get_mut(&id) {
                clip.start_time = range.start;
                clip.track_index = track;
            }
        }
        self.notify_clips();
    }

    fn resize_clips(&mut self, resize: &mut ClipResize, pos: DVec2) {
        let delta = self.x_to_time(pos.x - resize.pointer_start.x);
        if delta != 0.0 {
            resize.moved = true;
        }
        let min = self.config.min_clip_duration;

        let placed: Vec<(ClipId, usize, TimeRange)> = if let [origin] = resize.origins.as_slice() {
            let range = resolve_single_resize(&self.state.clips, origin, resize.edge, delta, min);
            vec![(origin.id.clone(), origin.track_index, range)]
        } else {
            let Some(anchor) = resize.anchor_origin() else {
                return;
            };
            resolve_multi_resize(&self.state.clips, &resize.origins, anchor, resize.edge, delta, min)
                .ranges
                .into_iter()
                .zip(&resize.origins)
                .map(|((id, range), origin)| (id, origin.track_index, range))
                .collect()
        };

        if !group_fits(&self.state.clips, &resize.origins, &placed) {
            debug!(delta, "resize rejected");
            return;
        }
        for (id, _, range) in placed {
            if let Some(clip) = self.state.clips.get_mut(&id) {
                clip.start_time = range.start;
                clip.duration = range.duration;
            }
        }
        self.notify_clips();
    }

    fn drag_box(&mut self, selection: &mut BoxSelect, pos: DVec2) {
        selection.current = pos;
        if !selection.moved {
            if (pos - selection.start).length() <= self.config.selection_box_threshold_px {
                return;
            }
            selection.moved = true;
        }
        let hits = clips_in_box(
            &self.state.clips,
            selection.start,
            pos,
            self.pixels_per_second,
            self.config.track_height_px,
        );
        if selection.additive {
            self.selection
                .set_clips(selection.base.iter().cloned().chain(hits));
        } else {
            self.selection.set_clips(hits);
        }
        self.notify_selection();
    }

    fn drag_keyframe(&mut self, drag: &mut KeyframeDrag, pos: DVec2) {
        let delta = pos - drag.pointer_start;
        if drag.axis.is_none() {
            drag.axis = classify_drag(delta, self.config.keyframe_drag_threshold_px);
            if drag.axis.is_some() {
                self.selection.set_keyframe(Some(drag.id.clone()));
                self.notify_selection();
            }
        }

        let patch = match drag.axis {
            None => return,
            Some(DragAxis::Time) => {
                let time = (drag.start_time + self.x_to_time(delta.x))
                    .clamp(0.0, self.state.total_duration);
                KeyframePatch::default().time(time)
            }
            Some(DragAxis::Value) => {
                let graph = self.config.camera_graph_height_px();
                let local_y = pos.y - drag.track_top - self.config.camera_graph_padding_px;
                let normalized = (graph - local_y) / graph;
                let (min, max) = drag.range;
                let mut value = (min + normalized * (max - min) + 0.5).floor();
                if let Some(floor) = drag.channel.value_floor() {
                    value = value.max(floor);
                }
                KeyframePatch::default().channel(drag.channel, value)
            }
        };
        if self.state.camera_keyframes.update(&drag.id, &patch) {
            self.notify_camera();
        }
    }

    // ── Release ─────────────────────────────────────────────────

    /// Finish the active gesture.
    pub fn pointer_up(&mut self) {
        match std::mem::take(&mut self.interaction) {
            Interaction::Idle | Interaction::ScrubbingPlayhead => {}
            Interaction::DraggingClip(drag) => {
                if !drag.moved {
                    // A plain click inside a multi-selection narrows it.
                    if drag.was_selected && self.selection.is_multi() {
                        self.selection.replace(drag.anchor.clone());
                        self.notify_selection();
                    }
                    return;
                }
                self.commit_clip_gesture(&drag.origins, "Move clip");
            }
            Interaction::ResizingClip(resize) => {
                if resize.moved {
                    self.commit_clip_gesture(&resize.origins, "Resize clip");
                }
            }
            Interaction::SelectingBox(selection) => {
                let size = (selection.current - selection.start).abs();
                let min = self.config.min_selection_box_px;
                if selection.moved && (size.x < min || size.y < min) {
                    self.deselect_all_clips();
                }
            }
            Interaction::DraggingCameraKeyframe(drag) => match drag.axis {
                None => self.select_camera_keyframe(Some(&drag.id)),
                Some(DragAxis::Value) => {
                    self.checkpoint("Change camera keyframe value");
                }
                Some(DragAxis::Time) => {
                    self.checkpoint("Move camera keyframe");
                }
            },
        }
    }

    /// Abandon the gesture. Work already applied is kept and committed the
    /// same way a release would.
    pub fn pointer_cancel(&mut self) {
        debug!(gesture = self.interaction.name(), "pointer cancelled");
        self.pointer_up();
    }

    /// Normalize the clips a gesture touched, check them, and checkpoint.
    /// Overlaps that slipped through put every clip back where it started.
    fn commit_clip_gesture(&mut self, origins: &[DragOrigin], label: &str) {
        let ids: Vec<ClipId> = origins.iter().map(|o| o.id.clone()).collect();
        for id in &ids {
            self.state.normalize_clip(id);
        }

        if let Err(err) = self.state.validate_clips(&ids) {
            warn!(%err, label, "gesture produced an overlap, reverting");
            for origin in origins {
                if let Some(clip) = self.state.clips.get_mut(&origin.id) {
                    clip.start_time = origin.start_time;
                    clip.track_index = origin.track_index;
                    clip.duration = origin.duration;
                }
            }
            self.notify_clips();
            return;
        }

        let end = ids
            .iter()
            .filter_map(|id| self.state.clips.get(id))
            .map(|c| c.end_time())
            .fold(0.0, f64::max);
        self.state.ensure_duration(end);
        self.state.ensure_track_count();
        self.notify_clips();
        self.checkpoint(label);
    }
}

// ── Tests ───────────────────────────────────────────────────────
