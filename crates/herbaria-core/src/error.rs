// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Unified error types for Herbaria.

use thiserror::Error;

/// Top-level error type for all Herbaria operations.
///
/// "No quadrilateral found" is deliberately not an error: a capture with no
/// detectable sheet outline is an expected outcome and is modelled as
/// `Option::None` in the candidate selector. Everything here is a genuine
/// failure that routes the pipeline to the manual fallback.
#[derive(Debug, Error)]
pub enum HerbariaError {
    /// Input image is unreadable or has a zero dimension.
    #[error("invalid input image: {0}")]
    InvalidImage(String),

    /// Detected geometry cannot be warped: collinear or duplicated corners,
    /// or an output rectangle that rounds to zero size.
    #[error("degenerate sheet geometry: {0}")]
    DegenerateGeometry(String),

    /// The rectifier was configured with unusable parameters and refuses
    /// to run until corrected.
    #[error("rectifier not ready: {0}")]
    NotReady(String),

    /// Catch-all for an unexpected failure inside a pipeline stage.
    #[error("processing failed: {0}")]
    Processing(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, HerbariaError>;
