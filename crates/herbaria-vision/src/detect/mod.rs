// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Sheet detection: edge map construction and quadrilateral candidate
// selection on the downscaled working image.

pub mod edges;
pub mod quad;

pub use edges::{EdgeMap, build_edge_map};
pub use quad::select_sheet_candidate;
