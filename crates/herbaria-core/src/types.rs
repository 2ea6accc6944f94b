// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Core domain types for the Herbaria rectification engine.

use serde::{Deserialize, Serialize};

/// Outcome of a rectification attempt.
///
/// Rectification is strictly best-effort: the caller always receives a
/// usable image, and this status tells it whether the image was
/// auto-straightened or needs the manual cropping workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RectificationStatus {
    /// The sheet outline was detected and the image was warped flat.
    Straightened,
    /// Detection did not succeed; the original image is returned for
    /// downstream manual handling.
    ManualFallback,
}

impl RectificationStatus {
    /// Short human-readable label for UI display.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Straightened => "Sheet auto-straightened",
            Self::ManualFallback => "Automatic detection failed; manual crop needed",
        }
    }

    pub fn is_straightened(&self) -> bool {
        matches!(self, Self::Straightened)
    }
}

impl std::fmt::Display for RectificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

/// Stages of one pipeline invocation.
///
/// Transitions are linear per run: `Idle → Detecting`, then either
/// `RectifyingFound` (a candidate quadrilateral was selected) or
/// `FallbackNoQuad` (expected no-detection path), and finally `Done`.
/// `FallbackError` is the terminal taken when any stage fails unexpectedly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineStage {
    Idle,
    Detecting,
    RectifyingFound,
    FallbackNoQuad,
    FallbackError,
    Done,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels_are_distinct() {
        assert_ne!(
            RectificationStatus::Straightened.describe(),
            RectificationStatus::ManualFallback.describe()
        );
        assert!(RectificationStatus::Straightened.is_straightened());
        assert!(!RectificationStatus::ManualFallback.is_straightened());
    }
}
