//! Saved timelines.
//!
//! A document wraps the persistable `TimelineState` (clips, camera keyframes,
//! duration, mode, hidden clips) with a format version and the writer's
//! library version. Image payloads stay as the opaque references stored on
//! the clips; externalizing them is the host's job.

use std::path::Path;

use motionkit_core::{MotionError, Result};
use serde::{Deserialize, Serialize};

use crate::state::TimelineState;

/// Format version written by this library.
pub const CURRENT_VERSION: u32 = 1;

/// A timeline as written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineDocument {
    pub version: u32,
    pub timeline: TimelineState,
    pub app_version: String,
}

impl TimelineDocument {
    pub fn new(timeline: TimelineState) -> Self {
        Self {
            version: CURRENT_VERSION,
            timeline,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| MotionError::Serialization(format!("cannot encode timeline: {e}")))
    }

    /// Decode a document of this or an older format. Older formats are
    /// upgraded first; the result must pass `TimelineState::validate`.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let mut value: serde_json::Value = serde_json::from_slice(data)
            .map_err(|e| MotionError::Serialization(format!("not a JSON document: {e}")))?;

        let mut version = format_version(&value);
        if version > CURRENT_VERSION {
            return Err(MotionError::Serialization(format!(
                "format {version} is newer than {CURRENT_VERSION}, the newest this build reads"
            )));
        }
        while version < CURRENT_VERSION {
            (value, version) = upgrade(value, version)?;
        }

        let mut doc: Self = serde_json::from_value(value)
            .map_err(|e| MotionError::Serialization(format!("malformed timeline: {e}")))?;
        doc.timeline.ensure_track_count();
        doc.timeline.validate()?;
        Ok(doc)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        Self::from_json(&std::fs::read(path)?)
    }
}

/// Format 0 has no `version` field.
fn format_version(value: &serde_json::Value) -> u32 {
    value
        .get("version")
        .and_then(serde_json::Value::as_u64)
        .map_or(0, |v| u32::try_from(v).unwrap_or(u32::MAX))
}

/// Lift `value` from format `version` to the next one.
fn upgrade(value: serde_json::Value, version: u32) -> Result<(serde_json::Value, u32)> {
    match version {
        // A bare state object, written before the envelope existed.
        0 => Ok((
            serde_json::json!({
                "version": 1,
                "timeline": value,
                "app_version": "0.0.0",
            }),
            1,
        )),
        v => Err(MotionError::Serialization(format!(
            "cannot upgrade timeline format {v}"
        ))),
    }
}
