//! Clip types for the timeline.

use std::collections::BTreeMap;
use std::fmt;

use motionkit_core::{normalize_time, AnimatedProperty, AnimationCurve, MotionError, Result, TimeRange};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-property animation curves of a clip.
pub type Animation = BTreeMap<AnimatedProperty, AnimationCurve>;

/// All clips of a timeline keyed by id.
pub type ClipMap = BTreeMap<ClipId, Clip>;

/// Opaque clip identifier, stable for the clip's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClipId(String);

impl ClipId {
    /// Wrap a caller-supplied id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random id.
    pub fn generate() -> Self {
        Self(format!("clip_{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClipId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

// ── Kinds ───────────────────────────────────────────────────────

/// What a clip draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClipKind {
    Text,
    Rectangle,
    Circle,
    Triangle,
    Star,
    Heart,
    Hexagon,
    Diamond,
    Pentagon,
    Arrow,
    SpeechBubble,
    Cross,
    Image,
    Fill,
}

impl ClipKind {
    pub fn is_shape(self) -> bool {
        !matches!(self, Self::Text | Self::Image | Self::Fill)
    }

    /// Properties this kind may animate.
    pub fn animated_properties(self) -> &'static [AnimatedProperty] {
        match self {
            Self::Fill => &[AnimatedProperty::Opacity],
            _ => &AnimatedProperty::ALL,
        }
    }

    pub fn supports(self, property: AnimatedProperty) -> bool {
        self.animated_properties().contains(&property)
    }

    /// Default fill colour for shape kinds.
    pub fn default_shape_color(self) -> Option<&'static str> {
        let color = match self {
            Self::Rectangle => "#FF0000",
            Self::Circle => "#00FF00",
            Self::Triangle => "#FFFF00",
            Self::Star => "#FFD700",
            Self::Heart => "#FF1493",
            Self::Hexagon => "#00CED1",
            Self::Diamond => "#FF69B4",
            Self::Pentagon => "#9370DB",
            Self::Arrow => "#4682B4",
            Self::SpeechBubble => "#3CB371",
            Self::Cross => "#6A5ACD",
            Self::Text | Self::Image | Self::Fill => return None,
        };
        Some(color)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Rectangle => "rectangle",
            Self::Circle => "circle",
            Self::Triangle => "triangle",
            Self::Star => "star",
            Self::Heart => "heart",
            Self::Hexagon => "hexagon",
            Self::Diamond => "diamond",
            Self::Pentagon => "pentagon",
            Self::Arrow => "arrow",
            Self::SpeechBubble => "speechBubble",
            Self::Cross => "cross",
            Self::Image => "image",
            Self::Fill => "fill",
        }
    }

    /// The flat default curves a new clip of this kind starts with.
    pub fn default_animation(self) -> Animation {
        self.animated_properties()
            .iter()
            .map(|&p| (p, AnimationCurve::default_for(p)))
            .collect()
    }
}

impl fmt::Display for ClipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Type-specific attributes ────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub content: String,
    pub font_family: String,
    pub font_size: f64,
    pub text_color: String,
    pub bg_color: String,
    pub bg_transparent: bool,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            content: "New Text".to_string(),
            font_family: "Pretendard-Regular".to_string(),
            font_size: 32.0,
            text_color: "#ffffff".to_string(),
            bg_color: "#000000".to_string(),
            bg_transparent: true,
            bold: false,
            italic: false,
            underline: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    pub shape_color: String,
    pub shape_size: f64,
}

/// Image payload. `image_ref` is an opaque URL or blob handle owned by the
/// host; the timeline never dereferences it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSource {
    pub image_ref: Option<String>,
    pub image_file_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillStyle {
    pub fill_color: String,
}

/// Attributes that depend on the clip kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClipAttributes {
    Text(TextStyle),
    Shape(ShapeStyle),
    Image(ImageSource),
    Fill(FillStyle),
}

impl ClipAttributes {
    /// Defaults for a freshly added clip of `kind`.
    pub fn default_for(kind: ClipKind) -> Self {
        match kind {
            ClipKind::Text => Self::Text(TextStyle::default()),
            ClipKind::Image => Self::Image(ImageSource::default()),
            ClipKind::Fill => Self::Fill(FillStyle {
                fill_color: "#0000FF".to_string(),
            }),
            shape => Self::Shape(ShapeStyle {
                shape_color: shape.default_shape_color().unwrap_or("#FF0000").to_string(),
                shape_size: 100.0,
            }),
        }
    }

    /// Whether these attributes belong on a clip of `kind`.
    pub fn fits(&self, kind: ClipKind) -> bool {
        match self {
            Self::Text(_) => kind == ClipKind::Text,
            Self::Shape(_) => kind.is_shape(),
            Self::Image(_) => kind == ClipKind::Image,
            Self::Fill(_) => kind == ClipKind::Fill,
        }
    }

    /// The visible fields undo/redo compares when highlighting changes:
    /// content, text colour, shape colour, fill colour.
    fn appearance(&self) -> [Option<&str>; 4] {
        match self {
            Self::Text(t) => [Some(t.content.as_str()), Some(t.text_color.as_str()), None, None],
            Self::Shape(s) => [None, None, Some(s.shape_color.as_str()), None],
            Self::Fill(f) => [None, None, None, Some(f.fill_color.as_str())],
            Self::Image(_) => [None; 4],
        }
    }
}

// ── Clip ────────────────────────────────────────────────────────

/// A clip on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    pub id: ClipId,
    #[serde(rename = "type")]
    pub kind: ClipKind,
    pub track_index: usize,
    /// Seconds.
    pub start_time: f64,
    /// Seconds, always positive.
    pub duration: f64,
    #[serde(default)]
    pub animation: Animation,
    pub attributes: ClipAttributes,
}

impl Clip {
    /// Create a clip with the kind's default attributes and curves.
    pub fn new(
        kind: ClipKind,
        id: ClipId,
        track_index: usize,
        start_time: f64,
        duration: f64,
    ) -> Self {
        Self {
            id,
            kind,
            track_index,
            start_time,
            duration,
            animation: kind.default_animation(),
            attributes: ClipAttributes::default_for(kind),
        }
    }

    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start_time, self.duration)
    }

    pub fn curve(&self, property: AnimatedProperty) -> Option<&AnimationCurve> {
        self.animation.get(&property)
    }

    /// Curve for `property`, created flat at its default if missing.
    pub fn curve_mut(&mut self, property: AnimatedProperty) -> &mut AnimationCurve {
        self.animation
            .entry(property)
            .or_insert_with(|| AnimationCurve::default_for(property))
    }

    /// Same clip with a new id, for duplicate and paste.
    pub fn with_fresh_id(&self) -> Self {
        let mut copy = self.clone();
        copy.id = ClipId::generate();
        copy
    }

    /// True when `self` differs from `before` in a way undo/redo highlights:
    /// timing, track, animation or visible colours and text.
    pub fn differs_visibly(&self, before: &Clip) -> bool {
        self.start_time != before.start_time
            || self.duration != before.duration
            || self.track_index != before.track_index
            || self.animation != before.animation
            || self.attributes.appearance() != before.attributes.appearance()
    }
}

// ── Creation options & partial updates ──────────────────────────

/// Overrides for `Timeline::add_clip`. Unset fields take defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClipOptions {
    pub id: Option<ClipId>,
    pub start_time: Option<f64>,
    pub duration: Option<f64>,
    pub track_index: Option<usize>,
    pub animation: Animation,
    pub attributes: Option<ClipAttributes>,
}

impl ClipOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(ClipId::new(id));
        self
    }

    pub fn start_time(mut self, start: f64) -> Self {
        self.start_time = Some(start);
        self
    }

    pub fn duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn track(mut self, track_index: usize) -> Self {
        self.track_index = Some(track_index);
        self
    }

    pub fn curve(mut self, property: AnimatedProperty, curve: AnimationCurve) -> Self {
        self.animation.insert(property, curve);
        self
    }

    pub fn attributes(mut self, attributes: ClipAttributes) -> Self {
        self.attributes = Some(attributes);
        self
    }

    /// Options for an image clip referencing a host-owned payload.
    pub fn image(image_ref: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self::new().attributes(ClipAttributes::Image(ImageSource {
            image_ref: Some(image_ref.into()),
            image_file_name: file_name.into(),
        }))
    }

    /// Options that recreate `clip` (without its id).
    pub fn from_clip(clip: &Clip) -> Self {
        Self {
            id: None,
            start_time: Some(clip.start_time),
            duration: Some(clip.duration),
            track_index: Some(clip.track_index),
            animation: clip.animation.clone(),
            attributes: Some(clip.attributes.clone()),
        }
    }
}

/// Partial update for `Timeline::update_clip_data`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClipPatch {
    pub start_time: Option<f64>,
    pub duration: Option<f64>,
    pub track_index: Option<usize>,
    /// Curves merged into the clip's animation.
    pub animation: Animation,
    pub attributes: Option<ClipAttributes>,
}

impl ClipPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_time(mut self, start: f64) -> Self {
        self.start_time = Some(start);
        self
    }

    pub fn duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn track(mut self, track_index: usize) -> Self {
        self.track_index = Some(track_index);
        self
    }

    pub fn curve(mut self, property: AnimatedProperty, curve: AnimationCurve) -> Self {
        self.animation.insert(property, curve);
        self
    }

    pub fn attributes(mut self, attributes: ClipAttributes) -> Self {
        self.attributes = Some(attributes);
        self
    }

    /// Whether applying the patch can move the clip in time or across tracks.
    pub fn touches_placement(&self) -> bool {
        self.start_time.is_some() || self.duration.is_some() || self.track_index.is_some()
    }

    /// Time range and track the clip would occupy after the patch, with
    /// patched times snapped to the time quantum.
    pub fn placement_of(&self, clip: &Clip) -> (usize, TimeRange) {
        (
            self.track_index.unwrap_or(clip.track_index),
            TimeRange::new(
                self.start_time.map_or(clip.start_time, normalize_time),
                self.duration.map_or(clip.duration, normalize_time),
            ),
        )
    }

    /// Check the patch is applicable to `clip` without mutating anything.
    pub fn validate(&self, clip: &Clip, min_duration: f64) -> Result<()> {
        if let Some(attrs) = &self.attributes {
            if !attrs.fits(clip.kind) {
                return Err(MotionError::InvalidParameter(format!(
                    "attributes do not fit a {} clip",
                    clip.kind
                )));
            }
        }
        if let Some(property) = self.animation.keys().find(|p| !clip.kind.supports(**p)) {
            return Err(MotionError::InvalidParameter(format!(
                "{} clips cannot animate {}",
                clip.kind, property
            )));
        }
        let (_, range) = self.placement_of(clip);
        if !range.start.is_finite() || range.start < 0.0 {
            return Err(MotionError::InvalidParameter(format!(
                "start time {} must be a non-negative number",
                range.start
            )));
        }
        if !range.duration.is_finite() || range.duration < min_duration {
            return Err(MotionError::InvalidParameter(format!(
                "duration {} is below the {}s minimum",
                range.duration, min_duration
            )));
        }
        Ok(())
    }

    /// Merge the patch into `clip`. Call [`ClipPatch::validate`] first.
    pub fn apply(&self, clip: &mut Clip) {
        let (track, range) = self.placement_of(clip);
        clip.track_index = track;
        clip.start_time = range.start;
        clip.duration = range.duration;
        for (property, curve) in &self.animation {
            clip.animation.insert(*property, *curve);
        }
        if let Some(attrs) = &self.attributes {
            clip.attributes = attrs.clone();
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────
