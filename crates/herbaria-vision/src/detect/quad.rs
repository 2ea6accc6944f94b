// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Quadrilateral candidate selection: trace outer contours in the edge map,
// reject small ones, reduce the survivors to polygons, and keep the largest
// 4-vertex candidate as the sheet outline.

use herbaria_core::RectifyConfig;
use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};
use tracing::{debug, instrument};

use crate::geometry::{Point, Quad, approximate_closed_polygon, polygon_area, polygon_perimeter};

/// Select the most plausible sheet outline from a binary edge map.
///
/// Only outer (external) boundaries are considered; nested boundaries are
/// interior detail on the sheet, never its silhouette. Contours below the
/// minimum-area floor are noise and are discarded before approximation.
/// Among all contours whose polygon approximation yields exactly 4
/// vertices, the one with the largest enclosed area wins; the sheet is
/// the thing closest to filling the frame. Ties keep the first candidate
/// encountered; that is a documented tie-break, not an error.
///
/// Returns `None` when nothing survives both filters. That is the expected
/// outcome for poorly-lit or edge-ambiguous captures and routes the
/// pipeline to the manual fallback, not to an error state.
#[instrument(skip(edges, config), fields(width = edges.width(), height = edges.height()))]
pub fn select_sheet_candidate(edges: &GrayImage, config: &RectifyConfig) -> Option<Quad> {
    let contours = find_contours::<u32>(edges);
    debug!(contour_count = contours.len(), "Contours traced");

    let mut winner: Option<(Quad, f64)> = None;
    let mut candidates = 0usize;

    for contour in &contours {
        if contour.border_type != BorderType::Outer {
            continue;
        }
        if contour.points.len() < 4 {
            continue;
        }

        let ring: Vec<Point> = contour
            .points
            .iter()
            .map(|p| Point::new(p.x as f32, p.y as f32))
            .collect();

        if polygon_area(&ring) < config.min_quad_area {
            continue;
        }

        let perimeter = polygon_perimeter(&ring, true);
        let approx = approximate_closed_polygon(&ring, config.approx_tolerance * perimeter);
        if approx.len() != 4 {
            continue;
        }

        let quad = Quad::new([approx[0], approx[1], approx[2], approx[3]]);
        let area = quad.area();
        if area < config.min_quad_area {
            continue;
        }

        candidates += 1;
        // Strictly-greater comparison keeps the first-seen candidate on ties.
        match &winner {
            Some((_, best_area)) if area <= *best_area => {}
            _ => winner = Some((quad, area)),
        }
    }

    debug!(
        candidates,
        found = winner.is_some(),
        "Quadrilateral candidate selection complete"
    );
    winner.map(|(quad, _)| quad)
}
