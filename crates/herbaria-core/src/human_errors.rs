// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Human-readable error messages for digitisation volunteers.
//
// Every technical error is mapped to plain English with a clear suggestion,
// so the capture UI can tell the operator what to do next without exposing
// pipeline internals.

use crate::error::HerbariaError;

/// Severity of an error from the operator's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// A better capture will likely fix it; retake the photo.
    RetakeSuggested,
    /// The operator must finish the step by hand (manual crop).
    ManualRequired,
    /// Cannot be fixed at the capture station (bad file, misconfiguration).
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the operator should try (shown as body text).
    pub suggestion: String,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

/// Convert a `HerbariaError` into a `HumanError` a volunteer can act on.
pub fn humanize_error(err: &HerbariaError) -> HumanError {
    match err {
        HerbariaError::InvalidImage(_) => HumanError {
            message: "This photo couldn't be read.".into(),
            suggestion: "The image may be empty or damaged. Capture the sheet again, or choose a different file.".into(),
            severity: Severity::Permanent,
        },

        HerbariaError::DegenerateGeometry(_) => HumanError {
            message: "The sheet outline couldn't be straightened.".into(),
            suggestion: "The detected corners don't form a usable rectangle. Use the manual crop tool, or retake the photo with the whole sheet in frame.".into(),
            severity: Severity::ManualRequired,
        },

        HerbariaError::NotReady(detail) => HumanError {
            message: "The straightening tool isn't set up correctly.".into(),
            suggestion: format!("A configuration value needs fixing before captures can be processed. ({detail})"),
            severity: Severity::Permanent,
        },

        HerbariaError::Processing(_) => HumanError {
            message: "Something went wrong while straightening.".into(),
            suggestion: "Your photo is unchanged. Use the manual crop tool, or try capturing the sheet again with even lighting.".into(),
            severity: Severity::RetakeSuggested,
        },

        HerbariaError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The photo file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Choose the file again.".into(),
                    severity: Severity::Permanent,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, the device's storage may be full.".into(),
                    severity: Severity::RetakeSuggested,
                }
            }
        }
    }
}
