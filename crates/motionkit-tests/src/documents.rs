//! Saving, loading and migrating timeline documents.

use motionkit_core::{CameraChannel, Easing, MotionError};
use motionkit_timeline::{
    ClipId, ClipKind, ClipOptions, KeyframePatch, Timeline, TimelineDocument, TimelineMode,
};

fn sample_timeline() -> Timeline {
    let mut tl = Timeline::default();
    tl.add_clip(
        ClipKind::Text,
        ClipOptions::new().id("title").track(0).start_time(1.0).duration(4.0),
    );
    tl.add_image(
        "blob:preview/42",
        "logo.png",
        ClipOptions::new().id("logo").track(1).start_time(0.0),
    );
    tl.toggle_clip_visibility(&"logo".into());
    tl.switch_timeline_mode(TimelineMode::Camera);
    let kf = tl.add_camera_keyframe(Easing::EaseOut, Some(3.0));
    tl.update_camera_keyframe(
        &kf,
        KeyframePatch::default().channel(CameraChannel::Rotation, 15.0),
        true,
    );
    tl
}

#[test]
fn file_roundtrip_restores_everything() {
    let tl = sample_timeline();
    let path = std::env::temp_dir().join(format!("motionkit-doc-{}.json", std::process::id()));
    tl.document().save_to_file(&path).unwrap();

    let loaded = TimelineDocument::load_from_file(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    let mut other = Timeline::default();
    other.load_document(loaded).unwrap();
    assert_eq!(other.state(), tl.state());
    assert_eq!(other.mode(), TimelineMode::Camera);
    assert!(other.is_clip_hidden(&"logo".into()));
    assert_eq!(other.camera_transform_at(3.0).rotation, 15.0);
    assert!(!other.can_undo());
}

#[test]
fn document_json_uses_camel_case_fields() {
    let tl = sample_timeline();
    let json: serde_json::Value = serde_json::from_slice(&tl.document().to_json().unwrap()).unwrap();
    assert_eq!(json["version"], 1);
    let timeline = &json["timeline"];
    assert_eq!(timeline["timelineMode"], "camera");
    assert_eq!(timeline["clips"]["title"]["startTime"], 1.0);
    assert_eq!(timeline["clips"]["logo"]["attributes"]["image"]["imageRef"], "blob:preview/42");
    assert_eq!(timeline["cameraKeyframes"][0]["easing"], "easeOut");
}

#[test]
fn bare_state_is_migrated() {
    let raw = serde_json::json!({
        "clips": {
            "r1": {
                "id": "r1",
                "type": "rectangle",
                "trackIndex": 4,
                "startTime": 2.0,
                "duration": 1.5,
                "attributes": { "shape": { "shapeColor": "#123456", "shapeSize": 80.0 } }
            }
        },
        "totalDuration": 60.0
    });
    let doc = TimelineDocument::from_json(&serde_json::to_vec(&raw).unwrap()).unwrap();
    assert_eq!(doc.version, 1);
    assert_eq!(doc.timeline.clip_track_count, 5);
    assert_eq!(doc.timeline.timeline_mode, TimelineMode::Clip);
    assert!(doc.timeline.clips[&ClipId::new("r1")].animation.is_empty());

    let mut tl = Timeline::default();
    tl.load_document(doc).unwrap();
    assert_eq!(tl.track_count(), 5);
    // A missing curve evaluates to the property default.
    tl.set_current_time(2.5);
    let frame = tl.render_frame();
    assert_eq!(frame[0].transform.scale, 1.0);
    assert_eq!(frame[0].transform.opacity, 1.0);
}

#[test]
fn unknown_easing_loads_as_linear() {
    let raw = serde_json::json!({
        "version": 1,
        "app_version": "0.1.0",
        "timeline": {
            "clips": {},
            "totalDuration": 30.0,
            "cameraKeyframes": [
                { "id": "kf_a", "time": 1.0, "easing": "bounce",
                  "values": { "x": 0.0, "y": 0.0, "scale": 100.0, "rotation": 0.0 } }
            ]
        }
    });
    let doc = TimelineDocument::from_json(&serde_json::to_vec(&raw).unwrap()).unwrap();
    assert_eq!(doc.timeline.camera_keyframes.as_slice()[0].easing, Easing::Linear);
}

#[test]
fn invalid_documents_leave_timeline_untouched() {
    let mut tl = sample_timeline();
    let before = tl.state().clone();

    let err = TimelineDocument::from_json(b"{ not json").unwrap_err();
    assert!(matches!(err, MotionError::Serialization(_)));

    let mut doc = tl.document();
    let mut clash = doc.timeline.clips[&ClipId::new("title")].clone();
    clash.id = "clash".into();
    clash.start_time = 2.0;
    doc.timeline.clips.insert(clash.id.clone(), clash);
    let err = tl.load_document(doc).unwrap_err();
    assert!(err.is_overlap());
    assert_eq!(tl.state(), &before);
}

#[test]
fn clip_stored_under_foreign_key_is_rejected() {
    let mut tl = sample_timeline();
    let before = tl.state().clone();

    let mut doc = tl.document();
    let title = doc.timeline.clips.remove(&ClipId::new("title")).unwrap();
    doc.timeline.clips.insert(ClipId::new("headline"), title);
    let json = doc.to_json().unwrap();

    let err = TimelineDocument::from_json(&json).unwrap_err();
    assert!(matches!(err, MotionError::InvalidParameter(_)));

    let err = tl.load_document(doc).unwrap_err();
    assert!(matches!(err, MotionError::InvalidParameter(_)));
    assert_eq!(tl.state(), &before);
}
