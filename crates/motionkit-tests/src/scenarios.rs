//! End-to-end editing sessions driven through the controller.

use std::cell::RefCell;
use std::rc::Rc;

use motionkit_core::{AnimatedProperty, CameraChannel, Easing, Endpoint};
use motionkit_timeline::{
    ClipId, ClipKind, ClipOptions, HitTarget, KeyframePatch, PointerEvent, Timeline,
    TimelineConfig, TimelineListener, TimelineMode, TimelineState,
};

// ── Helpers ────────────────────────────────────────────────────

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn add(tl: &mut Timeline, kind: ClipKind, id: &str, track: usize, start: f64, dur: f64) -> ClipId {
    tl.add_clip(
        kind,
        ClipOptions::new().id(id).track(track).start_time(start).duration(dur),
    )
}

#[derive(Default)]
struct Recorded {
    modes: Vec<TimelineMode>,
    clip_counts: Vec<usize>,
    undo_flags: Vec<(bool, bool)>,
}

struct Recorder(Rc<RefCell<Recorded>>);

impl TimelineListener for Recorder {
    fn clips_changed(&mut self, state: &TimelineState) {
        self.0.borrow_mut().clip_counts.push(state.clips.len());
    }

    fn mode_changed(&mut self, mode: TimelineMode) {
        self.0.borrow_mut().modes.push(mode);
    }

    fn history_changed(&mut self, can_undo: bool, can_redo: bool) {
        self.0.borrow_mut().undo_flags.push((can_undo, can_redo));
    }
}

// ── Rendering ──────────────────────────────────────────────────

#[test]
fn animated_clip_renders_through_camera() {
    init_tracing();
    let mut tl = Timeline::default();
    let rect = add(&mut tl, ClipKind::Rectangle, "rect", 0, 0.0, 4.0);
    tl.set_animation_endpoints(&rect, AnimatedProperty::PosX, 0.0, 100.0)
        .unwrap();

    tl.switch_timeline_mode(TimelineMode::Camera);
    let kf = tl.add_camera_keyframe(Easing::Linear, Some(4.0));
    tl.update_camera_keyframe(&kf, KeyframePatch::default().channel(CameraChannel::X, 20.0), true);

    tl.set_current_time(2.0);
    let frame = tl.render_frame();
    assert_eq!(frame.len(), 1);
    assert_eq!(frame[0].id, rect);
    // Object at 50, camera halfway to 20.
    assert!((frame[0].transform.x - 40.0).abs() < 1e-9);
    assert_eq!(frame[0].transform.scale, 1.0);
}

#[test]
fn fill_opacity_and_hidden_clips() {
    let mut tl = Timeline::default();
    let fill = add(&mut tl, ClipKind::Fill, "bg", 0, 0.0, 2.0);
    let text = add(&mut tl, ClipKind::Text, "title", 1, 0.0, 2.0);
    tl.set_animation_endpoints(&fill, AnimatedProperty::Opacity, 0.0, 100.0)
        .unwrap();
    tl.set_animation_easing(&fill, AnimatedProperty::Opacity, Easing::Linear)
        .unwrap();

    tl.set_current_time(1.0);
    let frame = tl.render_frame();
    assert_eq!(frame.len(), 2);
    assert_eq!(frame[0].id, fill);
    assert_eq!(frame[0].transform.opacity, 0.5);

    tl.toggle_clip_visibility(&text);
    let frame = tl.render_frame();
    assert_eq!(frame.len(), 1);

    tl.set_current_time(2.0);
    assert!(tl.render_frame().is_empty());
}

#[test]
fn value_at_playhead_solves_nearer_endpoint() {
    let mut tl = Timeline::default();
    let star = add(&mut tl, ClipKind::Star, "s", 0, 0.0, 4.0);
    tl.set_current_time(3.0);
    let which = tl
        .set_value_at_playhead(&star, AnimatedProperty::Scale, 150.0)
        .unwrap();
    assert_eq!(which, Endpoint::End);

    let clip = tl.clip(&star).unwrap();
    let curve = clip.curve(AnimatedProperty::Scale).unwrap();
    assert_eq!(curve.start, 100.0);
    let value = motionkit_timeline::calculate_animated_value(clip, AnimatedProperty::Scale, 3.0);
    assert!((value - 150.0).abs() < 0.1);
}

#[test]
fn camera_scale_graph_drag_stops_at_zero() {
    let mut tl = Timeline::default();
    tl.switch_timeline_mode(TimelineMode::Camera);
    let kf = tl.add_camera_keyframe(Easing::EaseInOut, Some(2.0));
    assert_eq!(tl.camera_value_range(CameraChannel::Scale), (80.0, 120.0));

    tl.pointer_down(
        HitTarget::CameraKeyframe {
            id: kf.clone(),
            channel: CameraChannel::Scale,
        },
        PointerEvent::new(100.0, 250.0),
    );
    tl.pointer_move(PointerEvent::new(100.0, 600.0));
    tl.pointer_up();

    assert_eq!(tl.camera_keyframes().get(&kf).unwrap().values.scale, 0.0);
    assert_eq!(tl.camera_transform_at(5.0).scale, 0.0);
}

// ── History ────────────────────────────────────────────────────

#[test]
fn configured_history_bound_is_respected() {
    let config = TimelineConfig::from_json(r#"{ "max_history_size": 5 }"#).unwrap();
    let mut tl = Timeline::new(config);
    for i in 0..10 {
        add(&mut tl, ClipKind::Circle, &format!("c{i}"), 0, i as f64 * 2.0, 1.0);
    }
    assert_eq!(tl.history().len(), 5);

    let mut undone = 0;
    while tl.undo() {
        undone += 1;
    }
    assert_eq!(undone, 4);
    assert_eq!(tl.clips().len(), 6);
}

#[test]
fn undo_of_delete_reselects_restored_clip() {
    let mut tl = Timeline::default();
    let a = add(&mut tl, ClipKind::Heart, "a", 0, 0.0, 1.0);
    add(&mut tl, ClipKind::Heart, "b", 0, 2.0, 1.0);
    tl.delete_clip(&a);
    assert!(tl.selection().is_empty());

    assert!(tl.undo());
    assert_eq!(tl.selected_clip_ids(), &[a]);
    assert!(tl.can_redo());
}

#[test]
fn listener_sees_mode_switch_and_undo() {
    let recorded = Rc::new(RefCell::new(Recorded::default()));
    let mut tl = Timeline::default();
    tl.add_listener(Box::new(Recorder(recorded.clone())));

    add(&mut tl, ClipKind::Arrow, "a", 0, 0.0, 1.0);
    tl.switch_timeline_mode(TimelineMode::Camera);
    tl.undo();

    let recorded = recorded.borrow();
    assert_eq!(recorded.modes, vec![TimelineMode::Camera, TimelineMode::Clip]);
    assert_eq!(recorded.clip_counts.first(), Some(&1));
    assert_eq!(recorded.undo_flags.last(), Some(&(true, true)));
}

#[test]
fn new_edit_after_undo_drops_redo() {
    let mut tl = Timeline::default();
    add(&mut tl, ClipKind::Cross, "a", 0, 0.0, 1.0);
    add(&mut tl, ClipKind::Cross, "b", 0, 2.0, 1.0);
    tl.undo();
    assert!(tl.can_redo());
    add(&mut tl, ClipKind::Cross, "c", 1, 0.0, 1.0);
    assert!(!tl.can_redo());
    assert!(tl.clip(&ClipId::new("b")).is_none());
}

// ── Editing session ────────────────────────────────────────────

#[test]
fn scrub_then_add_lands_at_playhead() {
    let mut tl = Timeline::default();
    tl.pointer_down(HitTarget::Ruler, PointerEvent::new(200.0, 0.0));
    tl.pointer_up();
    let id = tl.add_clip(ClipKind::Hexagon, ClipOptions::new());
    assert_eq!(tl.clip(&id).unwrap().start_time, 4.0);
}

#[test]
fn copy_paste_then_drag_keeps_tracks_clean() {
    let mut tl = Timeline::default();
    let a = add(&mut tl, ClipKind::Diamond, "a", 0, 0.0, 2.0);
    add(&mut tl, ClipKind::Diamond, "b", 0, 3.0, 2.0);

    tl.copy_clip(&a);
    let pasted = tl.paste_clip(Some(50.0));
    let copy = pasted[0].clone();
    let start = tl.clip(&copy).unwrap().start_time;
    assert!(start >= 5.0);

    // Dragging the copy left snaps it before `b`, straight onto `a`, so
    // the move is refused and the copy stays put.
    let x = start * tl.pixels_per_second() + 5.0;
    tl.pointer_down(HitTarget::Clip(copy.clone()), PointerEvent::new(x, 40.0));
    tl.pointer_move(PointerEvent::new(x - 150.0, 40.0));
    tl.pointer_up();

    assert!(tl.state().validate().is_ok());
    assert_eq!(tl.clip(&copy).unwrap().start_time, start);
}

#[test]
fn track_operations_are_undoable() {
    let mut tl = Timeline::default();
    add(&mut tl, ClipKind::Pentagon, "a", 0, 0.0, 1.0);
    let b = add(&mut tl, ClipKind::Pentagon, "b", 2, 0.0, 1.0);

    tl.add_track_above(0);
    assert_eq!(tl.clip(&b).unwrap().track_index, 3);
    tl.duplicate_track(3);
    assert_eq!(tl.track_count(), 5);
    assert_eq!(tl.state().clips_on_track(4).len(), 1);

    tl.undo();
    tl.undo();
    assert_eq!(tl.track_count(), 3);
    assert_eq!(tl.clip(&b).unwrap().track_index, 2);
}
