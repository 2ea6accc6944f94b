// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Edge map builder: downscale, grayscale, Gaussian smoothing, and Canny
// edge detection producing the binary map the contour stages run on.

use herbaria_core::RectifyConfig;
use herbaria_core::error::{HerbariaError, Result};
use image::{DynamicImage, GrayImage, imageops::FilterType};
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::dilate;
use tracing::{debug, instrument};

use crate::geometry::Quad;

/// A binary edge map at working resolution, plus the scale factor that
/// projects working-resolution coordinates back to the source image.
///
/// `scale = working_width / source_width`; a source narrower than the
/// working width is detected at native resolution with `scale = 1.0`.
#[derive(Debug)]
pub struct EdgeMap {
    pub edges: GrayImage,
    pub scale: f32,
}

impl EdgeMap {
    /// Project a detection-resolution quadrilateral to source coordinates.
    pub fn to_source(&self, quad: &Quad) -> Quad {
        quad.scaled(1.0 / self.scale)
    }
}

/// Build the binary edge map for sheet detection.
///
/// The source is downscaled so its width equals the configured working
/// width (aspect ratio preserved), converted to grayscale, smoothed, and
/// run through Canny with the configured threshold pair.
#[instrument(skip(source), fields(width = source.width(), height = source.height()))]
pub fn build_edge_map(source: &DynamicImage, config: &RectifyConfig) -> Result<EdgeMap> {
    let (src_w, src_h) = (source.width(), source.height());
    if src_w == 0 || src_h == 0 {
        return Err(HerbariaError::InvalidImage(format!(
            "source image has zero dimension ({src_w}x{src_h})"
        )));
    }

    let (gray, scale) = if src_w > config.working_width {
        let scale = config.working_width as f32 / src_w as f32;
        let scaled_h = ((src_h as f32) * scale).round().max(1.0) as u32;
        let resized = source.resize_exact(config.working_width, scaled_h, FilterType::Triangle);
        (resized.to_luma8(), scale)
    } else {
        (source.to_luma8(), 1.0)
    };

    debug!(
        working_w = gray.width(),
        working_h = gray.height(),
        scale,
        "Detection image prepared"
    );

    let blurred = gaussian_blur_f32(&gray, config.blur_sigma);
    let thin_edges = canny(&blurred, config.canny_low, config.canny_high);
    // Canny can leave single-pixel gaps at sheet corners; a one-pixel
    // dilation keeps the outline traceable as one closed boundary.
    let edges = dilate(&thin_edges, Norm::LInf, 1);
    debug!("Canny edge map built");

    Ok(EdgeMap { edges, scale })
}
