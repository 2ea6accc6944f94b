// SPDX-License-Identifier: MIT OR Apache-2.0
//
// herbaria-vision: sheet boundary detection and perspective rectification.
//
// Given a photo of a flat rectangular herbarium sheet taken at an arbitrary
// angle, locates the sheet's quadrilateral outline on a downscaled working
// copy and warps the full-resolution source so the sheet appears photographed
// from directly above. Detection is best-effort: when no outline is found the
// original image is returned with a status flagging it for manual cropping.

pub mod detect;
pub mod geometry;
pub mod rectify;
pub mod warp;

// Re-export the primary types so callers can use `herbaria_vision::SheetRectifier` etc.
pub use detect::{EdgeMap, build_edge_map, select_sheet_candidate};
pub use geometry::{OrderedCorners, Point, Quad};
pub use rectify::{RectificationResult, SheetRectifier};
pub use warp::warp_to_rectangle;
