//! Randomized editing sessions.
//!
//! Whatever sequence of commands and gestures runs, tracks never hold
//! overlapping clips and the history replays back to the same state.

use motionkit_timeline::{
    ClipId, ClipKind, ClipOptions, HitTarget, PointerEvent, ResizeEdge, Timeline,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Add { track: usize, start: f64, duration: f64 },
    Drag { pick: usize, dx: f64, dy: f64 },
    GroupDrag { pick: usize, dx: f64, dy: f64 },
    Resize { pick: usize, right: bool, dx: f64 },
    GroupResize { pick: usize, right: bool, dx: f64 },
    CopyPaste { pick: usize, x: f64 },
    Duplicate { pick: usize },
    Delete { pick: usize },
    InsertTrack { at: usize },
    DeleteTrack { at: usize },
    Undo,
    Redo,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0usize..4, 0.0f64..40.0, 0.1f64..8.0)
            .prop_map(|(track, start, duration)| Op::Add { track, start, duration }),
        3 => (any::<usize>(), -400.0f64..400.0, -200.0f64..200.0)
            .prop_map(|(pick, dx, dy)| Op::Drag { pick, dx, dy }),
        2 => (any::<usize>(), -400.0f64..400.0, -200.0f64..200.0)
            .prop_map(|(pick, dx, dy)| Op::GroupDrag { pick, dx, dy }),
        2 => (any::<usize>(), any::<bool>(), -300.0f64..300.0)
            .prop_map(|(pick, right, dx)| Op::Resize { pick, right, dx }),
        1 => (any::<usize>(), any::<bool>(), -300.0f64..300.0)
            .prop_map(|(pick, right, dx)| Op::GroupResize { pick, right, dx }),
        2 => (any::<usize>(), 0.0f64..2000.0).prop_map(|(pick, x)| Op::CopyPaste { pick, x }),
        1 => any::<usize>().prop_map(|pick| Op::Duplicate { pick }),
        1 => any::<usize>().prop_map(|pick| Op::Delete { pick }),
        2 => (any::<bool>(), 0usize..6).prop_map(|(insert, at)| if insert {
            Op::InsertTrack { at }
        } else {
            Op::DeleteTrack { at }
        }),
        2 => any::<bool>().prop_map(|redo| if redo { Op::Redo } else { Op::Undo }),
    ]
}

fn nth_clip(tl: &Timeline, pick: usize) -> Option<ClipId> {
    let len = tl.clips().len();
    if len == 0 {
        return None;
    }
    tl.clips().keys().nth(pick % len).cloned()
}

/// Pair the picked clip with its neighbour in id order.
fn select_pair(tl: &mut Timeline, pick: usize) -> Option<ClipId> {
    let first = nth_clip(tl, pick)?;
    let second = nth_clip(tl, pick.wrapping_add(1))?;
    tl.select_clips([second, first.clone()]);
    Some(first)
}

/// Pointer position over the middle of a clip's body.
fn grip(tl: &Timeline, id: &ClipId) -> (f64, f64) {
    let clip = &tl.clips()[id];
    let pps = tl.pixels_per_second();
    let track_h = tl.config().track_height_px;
    (
        (clip.start_time + clip.duration / 2.0) * pps,
        clip.track_index as f64 * track_h + track_h / 2.0,
    )
}

fn gesture(tl: &mut Timeline, target: HitTarget, from: (f64, f64), dx: f64, dy: f64) {
    tl.pointer_down(target, PointerEvent::new(from.0, from.1));
    // Two steps so the live resolver sees an intermediate position.
    tl.pointer_move(PointerEvent::new(from.0 + dx / 2.0, from.1 + dy / 2.0));
    tl.pointer_move(PointerEvent::new(from.0 + dx, from.1 + dy));
    tl.pointer_up();
}

fn apply(tl: &mut Timeline, op: &Op) {
    match *op {
        Op::Add {
            track,
            start,
            duration,
        } => {
            tl.add_clip(
                ClipKind::Rectangle,
                ClipOptions::new().track(track).start_time(start).duration(duration),
            );
        }
        Op::Drag { pick, dx, dy } => {
            if let Some(id) = nth_clip(tl, pick) {
                tl.select_clip(&id, false, false);
                let from = grip(tl, &id);
                gesture(tl, HitTarget::Clip(id), from, dx, dy);
            }
        }
        Op::GroupDrag { pick, dx, dy } => {
            if let Some(id) = select_pair(tl, pick) {
                let from = grip(tl, &id);
                gesture(tl, HitTarget::Clip(id), from, dx, dy);
            }
        }
        Op::Resize { pick, right, dx } => {
            if let Some(id) = nth_clip(tl, pick) {
                tl.select_clip(&id, false, false);
                let edge = if right { ResizeEdge::Right } else { ResizeEdge::Left };
                let from = grip(tl, &id);
                gesture(tl, HitTarget::ClipHandle(id, edge), from, dx, 0.0);
            }
        }
        Op::GroupResize { pick, right, dx } => {
            if let Some(id) = select_pair(tl, pick) {
                let edge = if right { ResizeEdge::Right } else { ResizeEdge::Left };
                let from = grip(tl, &id);
                gesture(tl, HitTarget::ClipHandle(id, edge), from, dx, 0.0);
            }
        }
        Op::CopyPaste { pick, x } => {
            if let Some(id) = nth_clip(tl, pick) {
                tl.copy_clip(&id);
                tl.paste_clip(Some(x));
            }
        }
        Op::Duplicate { pick } => {
            if let Some(id) = nth_clip(tl, pick) {
                tl.duplicate_clip(&id);
            }
        }
        Op::Delete { pick } => {
            if let Some(id) = nth_clip(tl, pick) {
                tl.delete_clip(&id);
            }
        }
        Op::InsertTrack { at } => {
            tl.insert_track_at(at);
        }
        Op::DeleteTrack { at } => tl.delete_track(at),
        Op::Undo => {
            tl.undo();
        }
        Op::Redo => {
            tl.redo();
        }
    }
}

fn assert_consistent(tl: &Timeline) {
    let state = tl.state();
    assert!(state.validate().is_ok(), "invalid state: {:?}", state.validate());
    let needed = state
        .clips
        .values()
        .map(|c| c.track_index + 1)
        .max()
        .unwrap_or(0);
    assert!(state.clip_track_count >= needed.max(1));
    assert!(tl.interaction().is_idle());
    for id in tl.selected_clip_ids() {
        assert!(state.clips.contains_key(id));
    }
}

/// Times in hundredths of a second, so most are not binary fractions.
fn centis(range: std::ops::Range<u32>) -> impl Strategy<Value = f64> {
    range.prop_map(|n| f64::from(n) / 100.0)
}

/// Clip `a` on track 0 with neighbour `b` after a gap.
fn flush_pair(start: f64, dur: f64, gap: f64) -> (Timeline, ClipId, ClipId) {
    let mut tl = Timeline::default();
    let a = tl.add_clip(
        ClipKind::Rectangle,
        ClipOptions::new().id("a").track(0).start_time(start).duration(dur),
    );
    let b = tl.add_clip(
        ClipKind::Rectangle,
        ClipOptions::new().id("b").track(0).start_time(start + dur + gap).duration(1.0),
    );
    (tl, a, b)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn resized_edge_lands_on_neighbour(
        start in centis(0..2000),
        dur in centis(10..500),
        gap in centis(1..300),
    ) {
        let (mut tl, a, b) = flush_pair(start, dur, gap);
        let x = tl.clips()[&a].end_time() * tl.pixels_per_second();
        tl.pointer_down(HitTarget::ClipHandle(a.clone(), ResizeEdge::Right), PointerEvent::new(x, 40.0));
        tl.pointer_move(PointerEvent::new(x + 10_000.0, 40.0));
        tl.pointer_up();

        let end = tl.clips()[&a].end_time();
        let neighbour = tl.clips()[&b].start_time;
        prop_assert!((end - neighbour).abs() < 1e-9, "end {} vs {}", end, neighbour);
        assert_consistent(&tl);
    }

    #[test]
    fn dragged_clip_snaps_flush_before_neighbour(
        start in centis(0..2000),
        dur in centis(10..500),
        gap in centis(1..300),
    ) {
        let (mut tl, a, b) = flush_pair(start, dur, gap);
        let pps = tl.pixels_per_second();
        let from = grip(&tl, &a);
        let push = gap + dur.min(1.0) * 0.4;
        gesture(&mut tl, HitTarget::Clip(a.clone()), from, push * pps, 0.0);

        let end = tl.clips()[&a].end_time();
        let neighbour = tl.clips()[&b].start_time;
        prop_assert!((end - neighbour).abs() < 1e-9, "end {} vs {}", end, neighbour);
        assert_consistent(&tl);
    }

    #[test]
    fn tracks_never_overlap(ops in prop::collection::vec(op(), 1..40)) {
        let mut tl = Timeline::default();
        for op in &ops {
            apply(&mut tl, op);
            assert_consistent(&tl);
        }
    }

    #[test]
    fn history_replays_to_same_state(ops in prop::collection::vec(op(), 1..40)) {
        let mut tl = Timeline::default();
        for op in &ops {
            apply(&mut tl, op);
        }
        let final_state = tl.state().clone();
        let cursor = tl.history().cursor();

        while tl.undo() {}
        prop_assert!(tl.clips().is_empty());
        prop_assert_eq!(tl.track_count(), 3);

        for _ in 0..cursor {
            prop_assert!(tl.redo());
            assert_consistent(&tl);
        }
        prop_assert_eq!(tl.state(), &final_state);
    }
}
