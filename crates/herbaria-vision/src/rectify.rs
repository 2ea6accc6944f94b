// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Pipeline controller: sequences edge detection, candidate selection,
// corner ordering, and warping; owns the detection/source scale bookkeeping
// and the manual-fallback path.

use herbaria_core::error::Result;
use herbaria_core::{PipelineStage, RectificationStatus, RectifyConfig};
use image::DynamicImage;
use tracing::{debug, info, instrument, warn};

use crate::detect::{build_edge_map, select_sheet_candidate};
use crate::warp::warp_to_rectangle;

/// Outcome of one rectification run.
///
/// Always carries a usable image: the rectified sheet when detection
/// succeeded, or the caller's original image when it did not.
pub struct RectificationResult {
    pub image: DynamicImage,
    pub status: RectificationStatus,
}

/// The sheet rectification pipeline.
///
/// One image in, one [`RectificationResult`] out; all intermediate buffers
/// (edge map, contour set, candidate quadrilateral) live and die inside a
/// single [`rectify`](Self::rectify) call. `rectify` takes `&mut self`, so
/// a second invocation on the same controller cannot interleave with a
/// running one.
pub struct SheetRectifier {
    config: RectifyConfig,
}

impl SheetRectifier {
    /// Build a rectifier, validating the configuration.
    ///
    /// Returns [`HerbariaError::NotReady`](herbaria_core::HerbariaError::NotReady)
    /// for unusable parameters; a constructed rectifier is always ready to
    /// accept captures.
    pub fn new(config: RectifyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Build a rectifier with the documented default parameters.
    pub fn with_defaults() -> Self {
        Self {
            config: RectifyConfig::default(),
        }
    }

    pub fn config(&self) -> &RectifyConfig {
        &self.config
    }

    /// Detect the sheet outline and warp the source flat.
    ///
    /// Rectification is strictly best-effort: every failure at any stage is
    /// absorbed here and converted into a `ManualFallback` result carrying
    /// the unmodified original, so the caller always has an image to hand
    /// to the manual cropping workflow.
    #[instrument(skip(self, source), fields(width = source.width(), height = source.height()))]
    pub fn rectify(&mut self, source: &DynamicImage) -> RectificationResult {
        let mut stage = PipelineStage::Idle;

        let outcome = self.run_stages(source, &mut stage);
        let result = Self::resolve_outcome(source, outcome, &mut stage);

        stage = PipelineStage::Done;
        debug!(?stage, status = ?result.status, "Pipeline run complete");
        result
    }

    /// Map a stage outcome onto the result handed to the caller.
    ///
    /// `Ok(None)` and `Err` both fall back to the unmodified original, so
    /// the caller always has an image for the manual cropping workflow.
    fn resolve_outcome(
        source: &DynamicImage,
        outcome: Result<Option<DynamicImage>>,
        stage: &mut PipelineStage,
    ) -> RectificationResult {
        match outcome {
            Ok(Some(image)) => {
                info!("Sheet straightened");
                RectificationResult {
                    image,
                    status: RectificationStatus::Straightened,
                }
            }
            Ok(None) => {
                info!("No sheet outline found; returning original for manual crop");
                RectificationResult {
                    image: source.clone(),
                    status: RectificationStatus::ManualFallback,
                }
            }
            Err(err) => {
                *stage = PipelineStage::FallbackError;
                warn!(?stage, error = %err, "Rectification failed; returning original for manual crop");
                RectificationResult {
                    image: source.clone(),
                    status: RectificationStatus::ManualFallback,
                }
            }
        }
    }

    /// Run the detection and warping stages.
    ///
    /// `Ok(None)` is the expected no-detection path; `Err` is a genuine
    /// stage failure. Both are mapped to the fallback by [`rectify`].
    fn run_stages(
        &self,
        source: &DynamicImage,
        stage: &mut PipelineStage,
    ) -> Result<Option<DynamicImage>> {
        *stage = PipelineStage::Detecting;
        debug!(?stage, "Building edge map");
        let edge_map = build_edge_map(source, &self.config)?;

        let Some(quad) = select_sheet_candidate(&edge_map.edges, &self.config) else {
            *stage = PipelineStage::FallbackNoQuad;
            debug!(?stage, "No quadrilateral candidate");
            return Ok(None);
        };

        *stage = PipelineStage::RectifyingFound;
        let corners = edge_map.to_source(&quad).order_corners();
        debug!(
            ?stage,
            top_left = ?corners.top_left,
            bottom_right = ?corners.bottom_right,
            "Corners ordered at source resolution"
        );

        let image = warp_to_rectangle(source, &corners)?;
        Ok(Some(image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    /// Paint a rectangle of the given half-size, rotated by `angle_deg`
    /// about the image centre, onto a dark background.
    fn rotated_sheet(width: u32, height: u32, half_w: f32, half_h: f32, angle_deg: f32) -> DynamicImage {
        let mut img = GrayImage::from_pixel(width, height, Luma([25u8]));
        let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
        let theta = angle_deg.to_radians();
        let (sin, cos) = theta.sin_cos();

        for y in 0..height {
            for x in 0..width {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                let u = dx * cos + dy * sin;
                let v = -dx * sin + dy * cos;
                if u.abs() <= half_w && v.abs() <= half_h {
                    img.put_pixel(x, y, Luma([240u8]));
                }
            }
        }
        DynamicImage::ImageLuma8(img)
    }

    #[test]
    fn blank_image_falls_back_with_original_pixels() {
        let source = DynamicImage::ImageLuma8(GrayImage::from_pixel(800, 600, Luma([128u8])));
        let mut rectifier = SheetRectifier::with_defaults();

        let result = rectifier.rectify(&source);
        assert_eq!(result.status, RectificationStatus::ManualFallback);
        assert_eq!(result.image.as_bytes(), source.as_bytes());
    }

    #[test]
    fn zero_sized_image_falls_back_without_panicking() {
        let source = DynamicImage::ImageLuma8(GrayImage::new(0, 0));
        let mut rectifier = SheetRectifier::with_defaults();

        let result = rectifier.rectify(&source);
        assert_eq!(result.status, RectificationStatus::ManualFallback);
    }

    #[test]
    fn axis_aligned_sheet_keeps_its_aspect_ratio() {
        // A 720x520 sheet centred in an 800x600 frame.
        let source = rotated_sheet(800, 600, 360.0, 260.0, 0.0);
        let mut rectifier = SheetRectifier::with_defaults();

        let result = rectifier.rectify(&source);
        assert_eq!(result.status, RectificationStatus::Straightened);
        assert!(result.image.width() > 0 && result.image.height() > 0);

        let aspect = result.image.width() as f32 / result.image.height() as f32;
        let expected = 720.0 / 520.0;
        assert!(
            (aspect - expected).abs() / expected < 0.05,
            "aspect {aspect} vs expected {expected}"
        );
    }

    #[test]
    fn rotated_sheet_is_straightened_to_true_dimensions() {
        // 1920x1080 frame, sheet covering the central 60% (1152x648),
        // rotated by 10 degrees.
        let source = rotated_sheet(1920, 1080, 576.0, 324.0, 10.0);
        let mut rectifier = SheetRectifier::with_defaults();

        let result = rectifier.rectify(&source);
        assert_eq!(result.status, RectificationStatus::Straightened);

        let w = result.image.width() as f32;
        let h = result.image.height() as f32;
        assert!((w - 1152.0).abs() / 1152.0 < 0.05, "width {w}");
        assert!((h - 648.0).abs() / 648.0 < 0.05, "height {h}");
    }

    #[test]
    fn warp_failure_routes_to_manual_fallback() {
        use crate::geometry::{OrderedCorners, Point};

        let source = DynamicImage::ImageLuma8(GrayImage::from_pixel(400, 300, Luma([128u8])));
        // Collinear corners make the warper report degenerate geometry.
        let corners = OrderedCorners {
            top_left: Point::new(0.0, 0.0),
            top_right: Point::new(100.0, 100.0),
            bottom_right: Point::new(200.0, 200.0),
            bottom_left: Point::new(300.0, 300.0),
        };
        let err = warp_to_rectangle(&source, &corners).unwrap_err();

        let mut stage = PipelineStage::RectifyingFound;
        let result = SheetRectifier::resolve_outcome(&source, Err(err), &mut stage);
        assert_eq!(result.status, RectificationStatus::ManualFallback);
        assert_eq!(result.image.as_bytes(), source.as_bytes());
        assert_eq!(stage, PipelineStage::FallbackError);
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let cfg = RectifyConfig {
            working_width: 0,
            ..Default::default()
        };
        assert!(SheetRectifier::new(cfg).is_err());
    }

    #[test]
    fn result_image_always_has_nonzero_dimensions_for_valid_input() {
        let mut rectifier = SheetRectifier::with_defaults();
        for angle in [0.0f32, 5.0, 15.0, 30.0] {
            let source = rotated_sheet(640, 480, 200.0, 150.0, angle);
            let result = rectifier.rectify(&source);
            assert!(result.image.width() > 0, "angle {angle}");
            assert!(result.image.height() > 0, "angle {angle}");
        }
    }
}
