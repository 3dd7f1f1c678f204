//! Collision and placement resolution.
//!
//! Pure functions over a clip map. They propose placements; the controller
//! decides whether to apply them and re-checks the no-overlap invariant
//! before committing.

use motionkit_core::TimeRange;
use smallvec::SmallVec;

use crate::clip::{Clip, ClipId, ClipMap};
use crate::track::clips_on_track;

/// Shift added past an obstacle during paste placement so float error
/// cannot leave the group touching it.
pub const PASTE_NUDGE: f64 = 1e-5;

type Brackets = SmallVec<[f64; 8]>;

fn is_excluded(exclude: &[ClipId], id: &ClipId) -> bool {
    exclude.iter().any(|e| e == id)
}

/// Clips on `track` other than `exclude` that overlap `range`.
fn obstacles<'a>(
    clips: &'a ClipMap,
    track: usize,
    range: TimeRange,
    exclude: &'a [ClipId],
) -> impl Iterator<Item = &'a Clip> + 'a {
    clips.values().filter(move |c| {
        c.track_index == track && !is_excluded(exclude, &c.id) && c.range().overlaps(&range)
    })
}

/// True iff no clip on `track`, other than those in `exclude`, overlaps `range`.
pub fn is_track_available(
    clips: &ClipMap,
    track: usize,
    range: TimeRange,
    exclude: &[ClipId],
) -> bool {
    obstacles(clips, track, range, exclude).next().is_none()
}

/// First track in `0..track_count` where `range` is free.
pub fn find_available_track(clips: &ClipMap, range: TimeRange, track_count: usize) -> Option<usize> {
    (0..track_count).find(|&track| is_track_available(clips, track, range, &[]))
}

/// Earliest start at or after `desired` where a clip of `duration` fits on
/// `track`, pushing past each overlapping clip in start order.
pub fn find_non_overlapping_time(clips: &ClipMap, track: usize, desired: f64, duration: f64) -> f64 {
    let mut candidate = desired;
    for clip in clips_on_track(clips, track) {
        if TimeRange::new(candidate, duration).overlaps(&clip.range()) {
            candidate = clip.end_time();
        }
    }
    candidate.max(0.0)
}

// ── Drag ────────────────────────────────────────────────────────

/// Where a clip was when a gesture started.
#[derive(Debug, Clone, PartialEq)]
pub struct DragOrigin {
    pub id: ClipId,
    pub start_time: f64,
    pub track_index: usize,
    pub duration: f64,
}

impl DragOrigin {
    pub fn of(clip: &Clip) -> Self {
        Self {
            id: clip.id.clone(),
            start_time: clip.start_time,
            track_index: clip.track_index,
            duration: clip.duration,
        }
    }

    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }
}

/// A proposed single-clip position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub start_time: f64,
    pub track_index: usize,
}

/// Resolve a single-clip drag.
///
/// A track change is rejected when the clip would collide on the new track.
/// Horizontal movement that runs into a neighbour snaps flush before or
/// after it, depending on which side of the midpoint between those two
/// candidates the proposed start falls.
pub fn resolve_single_drag(
    clips: &ClipMap,
    origin: &DragOrigin,
    current_track: usize,
    proposed_start: f64,
    proposed_track: usize,
) -> Placement {
    let exclude = std::slice::from_ref(&origin.id);
    let duration = origin.duration;

    let mut track = proposed_track;
    if track != current_track
        && !is_track_available(clips, track, TimeRange::new(proposed_start, duration), exclude)
    {
        track = current_track;
    }

    let delta = proposed_start - origin.start_time;
    let proposed = TimeRange::new(proposed_start, duration);
    let mut allowed = proposed_start;

    for other in obstacles(clips, track, proposed, exclude) {
        let snap_before = other.start_time - duration;
        let snap_after = other.end_time();
        let mid = (snap_before + snap_after) / 2.0;

        if delta > 0.0 && other.start_time >= origin.start_time {
            if proposed_start > mid {
                allowed = allowed.max(snap_after);
            } else {
                allowed = allowed.min(snap_before);
            }
        } else if delta < 0.0 && other.end_time() <= origin.end_time() {
            if proposed_start < mid {
                allowed = allowed.min(snap_before);
            } else {
                allowed = allowed.max(snap_after);
            }
        }
    }

    Placement {
        start_time: allowed.max(0.0),
        track_index: track,
    }
}

/// Resolved movement of a multi-clip group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupMove {
    pub delta_time: f64,
    pub track_offset: isize,
    /// False when a blocked track change froze the group horizontally; the
    /// caller should keep its previous valid delta.
    pub horizontal_valid: bool,
}

/// Gesture-scoped inputs for a multi-clip drag.
#[derive(Debug, Clone, Copy)]
pub struct GroupDrag<'a> {
    pub origins: &'a [DragOrigin],
    pub track_count: usize,
    /// Offset the group currently sits at relative to its origin.
    pub current_track_offset: isize,
    /// Last horizontal delta that was applied without a wall hit.
    pub last_valid_delta: f64,
}

fn is_member(members: &[DragOrigin], id: &ClipId) -> bool {
    members.iter().any(|o| &o.id == id)
}

/// Non-member clips on `track` overlapping `range`.
fn foreign_obstacles<'c>(
    clips: &'c ClipMap,
    members: &'c [DragOrigin],
    track: usize,
    range: TimeRange,
) -> impl Iterator<Item = &'c Clip> + 'c {
    clips.values().filter(move |c| {
        c.track_index == track && !is_member(members, &c.id) && c.range().overlaps(&range)
    })
}

fn target_track(origin: &DragOrigin, offset: isize) -> Option<usize> {
    origin.track_index.checked_add_signed(offset)
}

impl GroupDrag<'_> {
    /// Resolve the shared `(delta_time, track_offset)` for the group.
    ///
    /// A track change applies to every member or to none. A blocked track
    /// change also freezes horizontal motion at the last valid delta. The
    /// group never moves left of time zero.
    pub fn resolve(&self, clips: &ClipMap, delta_time: f64, proposed_track_offset: isize) -> GroupMove {
        if self.origins.is_empty() {
            return GroupMove {
                delta_time: 0.0,
                track_offset: 0,
                horizontal_valid: true,
            };
        }

        let min_track = self.origins.iter().map(|o| o.track_index).min().unwrap_or(0) as isize;
        let max_track = self.origins.iter().map(|o| o.track_index).max().unwrap_or(0) as isize;
        let last_track = self.track_count.max(1) as isize - 1;

        let mut proposed = proposed_track_offset;
        if min_track + proposed < 0 {
            proposed = -min_track;
        } else if max_track + proposed > last_track {
            proposed = last_track - max_track;
        }

        let attempted = proposed != self.current_track_offset;
        let blocked = attempted
            && self.origins.iter().any(|origin| {
                let range = TimeRange::new(origin.start_time + delta_time, origin.duration);
                match target_track(origin, proposed) {
                    Some(track) => foreign_obstacles(clips, self.origins, track, range).next().is_some(),
                    None => true,
                }
            });
        let track_offset = if blocked {
            self.current_track_offset
        } else {
            proposed
        };

        let mut horizontal_valid = true;
        let mut delta = delta_time;
        if blocked {
            delta = self.last_valid_delta;
            horizontal_valid = false;
        } else {
            let mut befores = Brackets::new();
            let mut afters = Brackets::new();
            for origin in self.origins {
                let Some(track) = target_track(origin, track_offset) else {
                    continue;
                };
                let range = TimeRange::new(origin.start_time + delta_time, origin.duration);
                for other in foreign_obstacles(clips, self.origins, track, range) {
                    befores.push(other.start_time - origin.duration - origin.start_time);
                    afters.push(other.end_time() - origin.start_time);
                }
            }
            if !befores.is_empty() {
                let before = befores.iter().copied().fold(f64::INFINITY, f64::min);
                let after = afters.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let mid = (before + after) / 2.0;
                delta = if delta_time > 0.0 {
                    if delta_time > mid {
                        after
                    } else {
                        before
                    }
                } else if delta_time < mid {
                    before
                } else {
                    after
                };
            }
        }

        let group_min_start = self
            .origins
            .iter()
            .map(|o| o.start_time)
            .fold(f64::INFINITY, f64::min);
        if group_min_start + delta < 0.0 {
            delta = -group_min_start;
        }

        GroupMove {
            delta_time: delta,
            track_offset,
            horizontal_valid,
        }
    }
}

// ── Resize ──────────────────────────────────────────────────────

/// Which clip edge a resize handle moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEdge {
    Left,
    Right,
}

/// Resolve a single-clip resize by `delta` seconds.
///
/// The right edge cannot pass the next clip's start; the left edge cannot
/// pass the previous clip's end or time zero, and keeps the end fixed. The
/// duration never drops below `min_duration`.
pub fn resolve_single_resize(
    clips: &ClipMap,
    origin: &DragOrigin,
    edge: ResizeEdge,
    delta: f64,
    min_duration: f64,
) -> TimeRange {
    let neighbours = clips
        .values()
        .filter(|c| c.track_index == origin.track_index && c.id != origin.id);

    match edge {
        ResizeEdge::Right => {
            let mut duration = (origin.duration + delta).max(min_duration);
            let limit = neighbours
                .filter(|c| c.start_time > origin.start_time)
                .filter(|c| origin.start_time + duration > c.start_time)
                .map(|c| c.start_time - origin.start_time)
                .fold(f64::INFINITY, f64::min);
            if limit.is_finite() {
                duration = limit;
            }
            TimeRange::new(origin.start_time, duration.max(min_duration))
        }
        ResizeEdge::Left => {
            let end = origin.end_time();
            let mut start = (origin.start_time + delta).max(0.0);
            if end - start < min_duration {
                start = end - min_duration;
            }
            let floor = neighbours
                .filter(|c| c.end_time() <= end)
                .map(|c| c.end_time())
                .filter(|&e| start < e)
                .fold(f64::NEG_INFINITY, f64::max);
            if floor.is_finite() {
                start = floor;
            }
            TimeRange::new(start, (end - start).max(min_duration))
        }
    }
}

/// Resolved multi-clip resize.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupResize {
    /// Scale actually applied about the anchor point.
    pub scale: f64,
    pub ranges: Vec<(ClipId, TimeRange)>,
}

/// Resolve a multi-clip resize driven by the handle of `anchor`.
///
/// Every member is scaled by one factor about the anchor clip's fixed edge
/// (its start for a right handle, its end for a left handle). The factor is
/// clamped into the intersection of per-member bounds from the minimum
/// duration, the nearest non-member neighbour on each side, and the wall at
/// time zero.
pub fn resolve_multi_resize(
    clips: &ClipMap,
    origins: &[DragOrigin],
    anchor: &DragOrigin,
    edge: ResizeEdge,
    delta: f64,
    min_duration: f64,
) -> GroupResize {
    let (pivot, new_anchor_duration) = match edge {
        ResizeEdge::Right => (anchor.start_time, anchor.duration + delta),
        ResizeEdge::Left => (anchor.end_time(), anchor.duration - delta),
    };
    let mut proposed = new_anchor_duration / anchor.duration;
    if !proposed.is_finite() || proposed <= 0.0 {
        proposed = 0.0001;
    }

    let mut lo = 0.0_f64;
    let mut hi = f64::INFINITY;

    for origin in origins {
        if origin.duration > 0.0 {
            lo = lo.max(min_duration / origin.duration);
        }
        let others = || {
            clips
                .values()
                .filter(|c| c.track_index == origin.track_index && !is_member(origins, &c.id))
        };
        let left_wall = others()
            .map(|c| c.end_time())
            .filter(|&e| e <= origin.start_time)
            .fold(0.0, f64::max);
        let right_wall = others()
            .map(|c| c.start_time)
            .filter(|&s| s >= origin.end_time())
            .fold(f64::INFINITY, f64::min);

        // new_start = pivot + a * k must stay >= left_wall.
        let a = origin.start_time - pivot;
        if a > 0.0 {
            lo = lo.max((left_wall - pivot) / a);
        } else if a < 0.0 {
            hi = hi.min((left_wall - pivot) / a);
        }
        // new_end = pivot + b * k must stay <= right_wall.
        let b = origin.end_time() - pivot;
        if right_wall.is_finite() {
            if b > 0.0 {
                hi = hi.min((right_wall - pivot) / b);
            } else if b < 0.0 {
                lo = lo.max((right_wall - pivot) / b);
            }
        }
    }

    let scale = if lo <= hi { proposed.clamp(lo, hi) } else { 1.0 };
    let ranges = origins
        .iter()
        .map(|o| {
            let start = (pivot + (o.start_time - pivot) * scale).max(0.0);
            let end = pivot + (o.end_time() - pivot) * scale;
            (o.id.clone(), TimeRange::from_bounds(start, end))
        })
        .collect();

    GroupResize { scale, ranges }
}

// ── Paste ───────────────────────────────────────────────────────

/// Result of the paste placement search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PastePlan {
    /// Seconds added to every pasted clip's original start.
    pub offset: f64,
    pub converged: bool,
    pub iterations: usize,
}

/// Find a shared offset placing `group` (track, original range) so that no
/// member overlaps an existing clip, with the first member landing at or
/// after `target_time`.
///
/// The group is shifted past the furthest obstacle it hits until it fits or
/// the iteration bound runs out, in which case the last offset is returned
/// with `converged == false`.
pub fn resolve_paste_offset(clips: &ClipMap, group: &[(usize, TimeRange)], target_time: f64) -> PastePlan {
    let Some(&(_, first)) = group.first() else {
        return PastePlan {
            offset: 0.0,
            converged: true,
            iterations: 0,
        };
    };
    let earliest = group
        .iter()
        .map(|(_, r)| r.start)
        .fold(f64::INFINITY, f64::min);

    let mut offset = (target_time - first.start).max(-earliest);
    let max_iterations = (clips.len() + group.len()) * 2;
    let mut iterations = 0;

    while iterations < max_iterations {
        iterations += 1;
        let obstacle_end = group
            .iter()
            .flat_map(|&(track, range)| obstacles(clips, track, range.offset(offset), &[]))
            .map(|c| c.end_time())
            .fold(f64::NEG_INFINITY, f64::max);
        if !obstacle_end.is_finite() {
            return PastePlan {
                offset,
                converged: true,
                iterations,
            };
        }
        offset += obstacle_end - (earliest + offset) + PASTE_NUDGE;
    }

    let converged = group.iter().all(|&(track, range)| {
        is_track_available(clips, track, range.offset(offset), &[])
    });
    PastePlan {
        offset,
        converged,
        iterations,
    }
}

// ── Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::ClipKind;

    fn clips(entries: &[(&str, usize, f64, f64)]) -> ClipMap {
        entries
            .iter()
            .map(|&(id, track, start, dur)| {
                let clip = Clip::new(ClipKind::Rectangle, ClipId::new(id), track, start, dur);
                (clip.id.clone(), clip)
            })
            .collect()
    }

    fn origin(map: &ClipMap, id: &str) -> DragOrigin {
        DragOrigin::of(&map[&ClipId::new(id)])
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_track_availability() {
        let map = clips(&[("a", 0, 0.0, 5.0), ("b", 1, 2.0, 2.0)]);
        assert!(!is_track_available(&map, 0, TimeRange::new(4.0, 1.0), &[]));
        assert!(is_track_available(&map, 0, TimeRange::new(5.0, 1.0), &[]));
        assert!(is_track_available(&map, 0, TimeRange::new(4.0, 1.0), &[ClipId::new("a")]));
        assert_eq!(find_available_track(&map, TimeRange::new(1.0, 1.0), 3), Some(1));
        assert_eq!(find_available_track(&map, TimeRange::new(3.0, 1.0), 2), None);
    }

    #[test]
    fn test_non_overlapping_time_chains() {
        let map = clips(&[("a", 0, 0.0, 2.0), ("b", 0, 2.0, 3.0), ("c", 0, 6.0, 1.0)]);
        assert_eq!(find_non_overlapping_time(&map, 0, 1.0, 1.0), 5.0);
        assert_eq!(find_non_overlapping_time(&map, 0, 5.0, 2.0), 7.0);
        assert_eq!(find_non_overlapping_time(&map, 1, -3.0, 2.0), 0.0);
    }

    #[test]
    fn test_single_drag_snaps_before_neighbour() {
        // A at [0,2), B at [5,7), both on track 0. Drag A right to start 4.
        let map = clips(&[("a", 0, 0.0, 2.0), ("b", 0, 5.0, 2.0)]);
        let p = resolve_single_drag(&map, &origin(&map, "a"), 0, 4.0, 0);
        assert_eq!(p.start_time, 3.0);
        assert_eq!(p.track_index, 0);
    }

    #[test]
    fn test_single_drag_snaps_after_past_midpoint() {
        let map = clips(&[("a", 0, 0.0, 2.0), ("b", 0, 5.0, 2.0)]);
        // snap_before 3, snap_after 7, mid 5.
        let p = resolve_single_drag(&map, &origin(&map, "a"), 0, 5.5, 0);
        assert_eq!(p.start_time, 7.0);
    }

    #[test]
    fn test_single_drag_left_snaps_after() {
        let map = clips(&[("a", 0, 0.0, 2.0), ("b", 0, 5.0, 2.0)]);
        // Move B left onto A: snap_before -2, snap_after 2, mid 0.
        let p = resolve_single_drag(&map, &origin(&map, "b"), 0, 1.0, 0);
        assert_eq!(p.start_time, 2.0);
    }

    #[test]
    fn test_single_drag_rejects_blocked_track() {
        let map = clips(&[("a", 0, 0.0, 2.0), ("b", 1, 0.0, 4.0)]);
        let p = resolve_single_drag(&map, &origin(&map, "a"), 0, 1.0, 1);
        assert_eq!(p.track_index, 0);
        let p = resolve_single_drag(&map, &origin(&map, "a"), 0, 5.0, 1);
        assert_eq!(p.track_index, 1);
    }

    #[test]
    fn test_multi_drag_moves_together() {
        let map = clips(&[("a", 0, 0.0, 1.0), ("b", 1, 2.0, 1.0)]);
        let origins = [origin(&map, "a"), origin(&map, "b")];
        let drag = GroupDrag {
            origins: &origins,
            track_count: 3,
            current_track_offset: 0,
            last_valid_delta: 0.0,
        };
        let m = drag.resolve(&map, 1.5, 1);
        assert_eq!(m.delta_time, 1.5);
        assert_eq!(m.track_offset, 1);
        assert!(m.horizontal_valid);
    }

    #[test]
    fn test_multi_drag_track_offset_clamped() {
        let map = clips(&[("a", 0, 0.0, 1.0), ("b", 1, 2.0, 1.0)]);
        let origins = [origin(&map, "a"), origin(&map, "b")];
        let drag = GroupDrag {
            origins: &origins,
            track_count: 3,
            current_track_offset: 0,
            last_valid_delta: 0.0,
        };
        assert_eq!(drag.resolve(&map, 0.0, 5).track_offset, 1);
        assert_eq!(drag.resolve(&map, 0.0, -2).track_offset, 0);
    }

    #[test]
    fn test_multi_drag_wall_keeps_previous() {
        let map = clips(&[("a", 0, 0.0, 1.0), ("b", 0, 2.0, 1.0), ("x", 1, 0.0, 10.0)]);
        let origins = [origin(&map, "a"), origin(&map, "b")];
        let drag = GroupDrag {
            origins: &origins,
            track_count: 3,
            current_track_offset: 0,
            last_valid_delta: 0.25,
        };
        let m = drag.resolve(&map, 3.0, 1);
        assert_eq!(m.track_offset, 0);
        assert_eq!(m.delta_time, 0.25);
        assert!(!m.horizontal_valid);
    }

    #[test]
    fn test_multi_drag_snaps_around_group_bracket() {
        // Group a [0,1) + b [2,3) on track 0, obstacle x [5,6).
        let map = clips(&[("a", 0, 0.0, 1.0), ("b", 0, 2.0, 1.0), ("x", 0, 5.0, 1.0)]);
        let origins = [origin(&map, "a"), origin(&map, "b")];
        let drag = GroupDrag {
            origins: &origins,
            track_count: 3,
            current_track_offset: 0,
            last_valid_delta: 0.0,
        };
        // delta 2.5: b hits x. before = 5 - 1 - 2 = 2, after = 6 - 2 = 4, mid 3.
        assert_eq!(drag.resolve(&map, 2.5, 0).delta_time, 2.0);
        // delta 3.5: b hits x (before 2, after 4); a [3.5,4.5) clear. Past mid.
        assert_eq!(drag.resolve(&map, 3.5, 0).delta_time, 4.0);
    }

    #[test]
    fn test_multi_drag_left_wall() {
        let map = clips(&[("a", 0, 1.0, 1.0), ("b", 1, 3.0, 1.0)]);
        let origins = [origin(&map, "a"), origin(&map, "b")];
        let drag = GroupDrag {
            origins: &origins,
            track_count: 2,
            current_track_offset: 0,
            last_valid_delta: 0.0,
        };
        assert_eq!(drag.resolve(&map, -4.0, 0).delta_time, -1.0);
    }

    #[test]
    fn test_single_resize_right_capped() {
        let map = clips(&[("a", 0, 0.0, 2.0), ("b", 0, 3.0, 2.0)]);
        let r = resolve_single_resize(&map, &origin(&map, "a"), ResizeEdge::Right, 5.0, 0.1);
        assert_eq!(r, TimeRange::new(0.0, 3.0));
        let r = resolve_single_resize(&map, &origin(&map, "a"), ResizeEdge::Right, -5.0, 0.1);
        assert_eq!(r.duration, 0.1);
    }

    #[test]
    fn test_single_resize_left_keeps_end() {
        let map = clips(&[("a", 0, 0.0, 2.0), ("b", 0, 3.0, 2.0)]);
        let r = resolve_single_resize(&map, &origin(&map, "b"), ResizeEdge::Left, -2.0, 0.1);
        assert_eq!(r.start, 2.0);
        assert_eq!(r.end(), 5.0);
        let r = resolve_single_resize(&map, &origin(&map, "b"), ResizeEdge::Left, 4.0, 0.1);
        assert!(approx(r.start, 4.9));
        assert!(approx(r.duration, 0.1));
    }

    #[test]
    fn test_single_resize_left_stops_at_zero() {
        let map = clips(&[("a", 0, 1.0, 2.0)]);
        let r = resolve_single_resize(&map, &origin(&map, "a"), ResizeEdge::Left, -5.0, 0.1);
        assert_eq!(r, TimeRange::new(0.0, 3.0));
    }

    #[test]
    fn test_multi_resize_scales_about_anchor() {
        // a [0,2) and b [4,6) on different tracks; drag a's right edge +2.
        let map = clips(&[("a", 0, 0.0, 2.0), ("b", 1, 4.0, 2.0)]);
        let origins = [origin(&map, "a"), origin(&map, "b")];
        let res = resolve_multi_resize(&map, &origins, &origins[0], ResizeEdge::Right, 2.0, 0.1);
        assert_eq!(res.scale, 2.0);
        assert_eq!(res.ranges[1].1, TimeRange::new(8.0, 4.0));
    }

    #[test]
    fn test_multi_resize_clamped_by_neighbour() {
        // c [9,10) blocks b on track 1: b's end 6 -> at most 9, so k <= 1.5.
        let map = clips(&[("a", 0, 0.0, 2.0), ("b", 1, 4.0, 2.0), ("c", 1, 9.0, 1.0)]);
        let origins = [origin(&map, "a"), origin(&map, "b")];
        let res = resolve_multi_resize(&map, &origins, &origins[0], ResizeEdge::Right, 2.0, 0.1);
        assert!(approx(res.scale, 1.5));
        assert!(approx(res.ranges[1].1.end(), 9.0));
    }

    #[test]
    fn test_multi_resize_left_wall_at_zero() {
        // Anchor b's end (6) is the pivot; a starts at 1. Growing left must
        // keep a's start >= 0: 6 + (1 - 6) k >= 0 -> k <= 1.2.
        let map = clips(&[("a", 0, 1.0, 1.0), ("b", 1, 4.0, 2.0)]);
        let origins = [origin(&map, "a"), origin(&map, "b")];
        let res = resolve_multi_resize(&map, &origins, &origins[1], ResizeEdge::Left, -4.0, 0.1);
        assert!(approx(res.scale, 1.2));
        assert!(res.ranges.iter().all(|(_, r)| r.start >= 0.0));
    }

    #[test]
    fn test_multi_resize_min_duration() {
        let map = clips(&[("a", 0, 0.0, 2.0), ("b", 1, 4.0, 0.5)]);
        let origins = [origin(&map, "a"), origin(&map, "b")];
        let res = resolve_multi_resize(&map, &origins, &origins[0], ResizeEdge::Right, -1.95, 0.1);
        assert!(approx(res.scale, 0.2));
        assert!(res.ranges.iter().all(|(_, r)| r.duration >= 0.1 - 1e-9));
    }

    #[test]
    fn test_paste_shifts_past_obstacles() {
        let map = clips(&[("a", 0, 0.0, 3.0), ("b", 0, 3.0, 2.0)]);
        let plan = resolve_paste_offset(&map, &[(0, TimeRange::new(10.0, 1.0))], 1.0);
        assert!(plan.converged);
        let start = 10.0 + plan.offset;
        assert!(start >= 5.0 && start < 5.001);
    }

    #[test]
    fn test_paste_group_keeps_relative_layout() {
        let map = clips(&[("a", 1, 0.0, 4.0)]);
        let group = [(0, TimeRange::new(2.0, 1.0)), (1, TimeRange::new(3.0, 1.0))];
        let plan = resolve_paste_offset(&map, &group, 0.0);
        assert!(plan.converged);
        for &(track, range) in &group {
            assert!(is_track_available(&map, track, range.offset(plan.offset), &[]));
            assert!(range.start + plan.offset >= 0.0);
        }
    }

    #[test]
    fn test_paste_empty_group() {
        let plan = resolve_paste_offset(&ClipMap::new(), &[], 3.0);
        assert_eq!(plan.offset, 0.0);
        assert!(plan.converged);
    }
}
