//! MotionKit Timeline - Timeline editor core
//!
//! Implements the editable model behind a motion-graphics timeline:
//! - Clips on generic tracks with per-property animation curves
//! - Camera keyframes on four channel tracks
//! - Overlap-free placement for drag, resize, paste and duplicate
//! - Snapshot undo/redo and the pointer gesture state machine
//! - Versioned JSON documents

pub mod camera;
pub mod clip;
pub mod clipboard;
pub mod config;
pub mod document;
pub mod evaluator;
pub mod gesture;
pub mod history;
pub mod interaction;
pub mod resolver;
pub mod selection;
pub mod state;
pub mod timeline;
pub mod track;

pub use camera::{CameraKeyframe, CameraKeyframes, KeyframeId, KeyframePatch, DEFAULT_KEYFRAME};
pub use clip::{Clip, ClipAttributes, ClipId, ClipKind, ClipMap, ClipOptions, ClipPatch};
pub use clipboard::Clipboard;
pub use config::TimelineConfig;
pub use document::TimelineDocument;
pub use evaluator::{calculate_animated_value, camera_pose_at, render_frame, ResolvedTransform};
pub use history::{History, Snapshot};
pub use interaction::{HitTarget, Interaction, Modifiers, PointerEvent};
pub use resolver::ResizeEdge;
pub use selection::Selection;
pub use state::TimelineState;
pub use timeline::{Timeline, TimelineListener};
pub use track::{TimelineMode, Track, TrackSet};
