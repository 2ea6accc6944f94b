// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Rectification pipeline configuration.

use serde::{Deserialize, Serialize};

use crate::error::{HerbariaError, Result};

/// Tunable parameters for sheet detection and rectification.
///
/// All detection happens on a downscaled working copy of the source image;
/// area and threshold values are expressed at that working resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RectifyConfig {
    /// Width of the downscaled detection image in pixels (default 500).
    /// Sources narrower than this are detected at native resolution.
    pub working_width: u32,
    /// Minimum enclosed contour area, in px² at working resolution, for a
    /// contour to be considered a sheet candidate (default 5000.0).
    pub min_quad_area: f64,
    /// Polygon approximation tolerance as a fraction of contour perimeter
    /// (default 0.02).
    pub approx_tolerance: f64,
    /// Canny low gradient-magnitude threshold (default 75.0).
    pub canny_low: f32,
    /// Canny high gradient-magnitude threshold (default 200.0).
    pub canny_high: f32,
    /// Sigma of the Gaussian pre-smoothing pass (default 1.1, the sigma of
    /// the conventional 5x5 kernel).
    pub blur_sigma: f32,
}

impl Default for RectifyConfig {
    fn default() -> Self {
        Self {
            working_width: 500,
            min_quad_area: 5000.0,
            approx_tolerance: 0.02,
            canny_low: 75.0,
            canny_high: 200.0,
            blur_sigma: 1.1,
        }
    }
}

impl RectifyConfig {
    /// Check that every parameter is usable.
    ///
    /// Called by the pipeline controller at construction; a controller is
    /// never handed out with a config that would make a stage panic or
    /// silently misbehave.
    pub fn validate(&self) -> Result<()> {
        if self.working_width == 0 {
            return Err(HerbariaError::NotReady(
                "working width must be nonzero".into(),
            ));
        }
        if !(self.min_quad_area >= 0.0) {
            return Err(HerbariaError::NotReady(format!(
                "minimum quad area must be non-negative, got {}",
                self.min_quad_area
            )));
        }
        if !(self.approx_tolerance > 0.0) {
            return Err(HerbariaError::NotReady(format!(
                "approximation tolerance must be positive, got {}",
                self.approx_tolerance
            )));
        }
        if !(self.canny_low > 0.0) || !(self.canny_high > self.canny_low) {
            return Err(HerbariaError::NotReady(format!(
                "Canny thresholds must satisfy 0 < low < high, got {}/{}",
                self.canny_low, self.canny_high
            )));
        }
        if !(self.blur_sigma > 0.0) {
            return Err(HerbariaError::NotReady(format!(
                "blur sigma must be positive, got {}",
                self.blur_sigma
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(RectifyConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_working_width_is_not_ready() {
        let cfg = RectifyConfig {
            working_width: 0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(HerbariaError::NotReady(_))));
    }

    #[test]
    fn inverted_canny_thresholds_are_not_ready() {
        let cfg = RectifyConfig {
            canny_low: 200.0,
            canny_high: 75.0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(HerbariaError::NotReady(_))));
    }

    #[test]
    fn nan_tolerance_is_not_ready() {
        let cfg = RectifyConfig {
            approx_tolerance: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(HerbariaError::NotReady(_))));
    }
}
