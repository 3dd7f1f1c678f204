//! Easing functions mapping normalized progress to eased progress.
//!
//! The four curves are the polynomial presets used by the editor's
//! animation curves and camera keyframes. They are defined for `t ∈ [0, 1]`
//! and are not clamped here; callers that need clamping do it themselves.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Easing applied to an interpolation segment.
///
/// Deserializing an unrecognized name yields [`Easing::Linear`], so documents
/// written by newer builds still load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "String")]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    pub const ALL: [Easing; 4] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
    ];

    /// Apply the easing to a progress value.
    #[inline]
    pub fn apply(self, t: f64) -> f64 {
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => t * (2.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }

    /// Look up an easing by its document name, falling back to linear.
    pub fn from_name(name: &str) -> Self {
        match name {
            "easeIn" => Self::EaseIn,
            "easeOut" => Self::EaseOut,
            "easeInOut" => Self::EaseInOut,
            _ => Self::Linear,
        }
    }

    /// Document name (camelCase).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseIn => "easeIn",
            Self::EaseOut => "easeOut",
            Self::EaseInOut => "easeInOut",
        }
    }
}

/// Free-function form of [`Easing::apply`].
#[inline]
pub fn ease(kind: Easing, t: f64) -> f64 {
    kind.apply(t)
}

impl From<String> for Easing {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl FromStr for Easing {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_fixed_for_all_kinds() {
        for kind in Easing::ALL {
            assert_eq!(ease(kind, 0.0), 0.0, "{kind} at 0");
            assert_eq!(ease(kind, 1.0), 1.0, "{kind} at 1");
        }
    }

    #[test]
    fn test_formulas() {
        assert_eq!(ease(Easing::Linear, 0.3), 0.3);
        assert!((ease(Easing::EaseIn, 0.5) - 0.25).abs() < 1e-12);
        assert!((ease(Easing::EaseOut, 0.5) - 0.75).abs() < 1e-12);
        assert!((ease(Easing::EaseInOut, 0.25) - 0.125).abs() < 1e-12);
        assert!((ease(Easing::EaseInOut, 0.75) - 0.875).abs() < 1e-12);
    }

    #[test]
    fn test_ease_in_out_midpoint_uses_upper_branch() {
        // -1 + (4 - 1) * 0.5 = 0.5, same as the lower branch limit.
        assert_eq!(ease(Easing::EaseInOut, 0.5), 0.5);
    }

    #[test]
    fn test_unknown_name_falls_back_to_linear() {
        assert_eq!(Easing::from_name("bounce"), Easing::Linear);
        let parsed: Easing = serde_json::from_str("\"elastic\"").unwrap();
        assert_eq!(parsed, Easing::Linear);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Easing::EaseInOut).unwrap();
        assert_eq!(json, "\"easeInOut\"");
        let back: Easing = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Easing::EaseInOut);
    }

    #[test]
    fn test_monotonic_on_unit_interval() {
        for kind in Easing::ALL {
            let mut prev = ease(kind, 0.0);
            for i in 1..=100 {
                let v = ease(kind, i as f64 / 100.0);
                assert!(v >= prev, "{kind} not monotonic at {i}");
                prev = v;
            }
        }
    }
}
