// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Homography solver and warper: maps the detected sheet quadrilateral onto
// an axis-aligned rectangle and resamples the full-resolution source.

use herbaria_core::error::{HerbariaError, Result};
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use tracing::{debug, instrument};

use crate::geometry::{OrderedCorners, polygon_area};

/// Warp the source image so the given corners land on an axis-aligned
/// rectangle, viewed as if photographed from directly above.
///
/// The output width is the longer of the two horizontal sheet edges and the
/// height the longer of the two vertical edges, so the warp never shrinks
/// the sheet below its observed extent. Samples falling outside the source
/// bounds are filled with transparent black.
#[instrument(skip(source, corners), fields(width = source.width(), height = source.height()))]
pub fn warp_to_rectangle(source: &DynamicImage, corners: &OrderedCorners) -> Result<DynamicImage> {
    corners.ensure_distinct()?;

    // from_control_points accepts some collinear corner sets and hands back
    // a garbage transform; reject them up front via the enclosed area.
    let ring = [
        corners.top_left,
        corners.top_right,
        corners.bottom_right,
        corners.bottom_left,
    ];
    let ring_area = polygon_area(&ring);
    if ring_area < 1.0 {
        return Err(HerbariaError::DegenerateGeometry(format!(
            "corners are collinear (enclosed area {ring_area:.3} px²)"
        )));
    }

    let top = corners.top_left.distance(&corners.top_right);
    let bottom = corners.bottom_left.distance(&corners.bottom_right);
    let left = corners.top_left.distance(&corners.bottom_left);
    let right = corners.top_right.distance(&corners.bottom_right);

    let out_w = top.max(bottom).round() as u32;
    let out_h = left.max(right).round() as u32;
    if out_w == 0 || out_h == 0 {
        return Err(HerbariaError::DegenerateGeometry(format!(
            "output rectangle rounds to {out_w}x{out_h}"
        )));
    }

    let src = corners.as_control_points();
    let dest: [(f32, f32); 4] = [
        (0.0, 0.0),
        (out_w as f32, 0.0),
        (out_w as f32, out_h as f32),
        (0.0, out_h as f32),
    ];

    // from_control_points solves the 3x3 projective transform src -> dest;
    // it returns None when the system is singular (collinear corners).
    let projection = Projection::from_control_points(src, dest).ok_or_else(|| {
        HerbariaError::DegenerateGeometry("corner points admit no projective transform".into())
    })?;

    let rgba = source.to_rgba8();
    let mut output = RgbaImage::new(out_w, out_h);
    warp_into(
        &rgba,
        &projection,
        Interpolation::Bilinear,
        Rgba([0u8, 0, 0, 0]),
        &mut output,
    );

    debug!(out_w, out_h, "Sheet warped to rectangle");
    Ok(DynamicImage::ImageRgba8(output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use image::{GrayImage, Luma};

    fn corners(pts: [(f32, f32); 4]) -> OrderedCorners {
        OrderedCorners {
            top_left: Point::new(pts[0].0, pts[0].1),
            top_right: Point::new(pts[1].0, pts[1].1),
            bottom_right: Point::new(pts[2].0, pts[2].1),
            bottom_left: Point::new(pts[3].0, pts[3].1),
        }
    }

    #[test]
    fn axis_aligned_corners_preserve_dimensions() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(400, 300, Luma([180u8])));
        let c = corners([(0.0, 0.0), (400.0, 0.0), (400.0, 300.0), (0.0, 300.0)]);

        let out = warp_to_rectangle(&img, &c).unwrap();
        assert_eq!(out.width(), 400);
        assert_eq!(out.height(), 300);
    }

    #[test]
    fn output_uses_longer_edge_per_axis() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(500, 500, Luma([180u8])));
        // A trapezoid: top edge 200px, bottom edge 400px, sides ~300px.
        let c = corners([(150.0, 100.0), (350.0, 100.0), (450.0, 400.0), (50.0, 400.0)]);

        let out = warp_to_rectangle(&img, &c).unwrap();
        assert_eq!(out.width(), 400);
        assert!(out.height() >= 300);
    }

    #[test]
    fn collinear_corners_are_degenerate() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(400, 300, Luma([180u8])));
        let c = corners([(0.0, 0.0), (100.0, 100.0), (200.0, 200.0), (300.0, 300.0)]);

        let err = warp_to_rectangle(&img, &c).unwrap_err();
        assert!(matches!(err, HerbariaError::DegenerateGeometry(_)));
    }

    #[test]
    fn duplicated_corners_are_degenerate() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(400, 300, Luma([180u8])));
        let c = corners([(0.0, 0.0), (0.0, 0.0), (400.0, 300.0), (0.0, 300.0)]);

        let err = warp_to_rectangle(&img, &c).unwrap_err();
        assert!(matches!(err, HerbariaError::DegenerateGeometry(_)));
    }

    #[test]
    fn warped_interior_samples_source_pixels() {
        // White rectangle from (100,80) to (300,220) on black background;
        // warping exactly that region should give an all-white output.
        let mut img = GrayImage::new(400, 300);
        for y in 80..220 {
            for x in 100..300 {
                img.put_pixel(x, y, Luma([255u8]));
            }
        }
        let dynamic = DynamicImage::ImageLuma8(img);
        let c = corners([(100.0, 80.0), (300.0, 80.0), (300.0, 220.0), (100.0, 220.0)]);

        let out = warp_to_rectangle(&dynamic, &c).unwrap();
        assert_eq!(out.width(), 200);
        assert_eq!(out.height(), 140);

        let rgba = out.to_rgba8();
        let centre = rgba.get_pixel(100, 70);
        assert_eq!(centre.0[0], 255);
    }
}
