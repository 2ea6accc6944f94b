// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Planar geometry for sheet outlines: points, quadrilaterals, corner
// ordering, polygon area/perimeter, and closed-curve simplification.

use herbaria_core::error::{HerbariaError, Result};

/// A 2D point in pixel coordinates of a specific image resolution.
///
/// Coordinates from the downscaled detection pass are not comparable to
/// full-resolution coordinates; convert via [`Quad::scaled`] first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Four unordered vertices of a sheet-outline candidate.
///
/// Only constructed by the candidate selector, from a polygon approximation
/// that yielded exactly 4 vertices above the minimum-area floor. The
/// vertices carry no corner roles until [`Quad::order_corners`] assigns them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    points: [Point; 4],
}

impl Quad {
    pub(crate) fn new(points: [Point; 4]) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point; 4] {
        &self.points
    }

    /// Enclosed area via the shoelace formula.
    pub fn area(&self) -> f64 {
        polygon_area(&self.points)
    }

    /// Multiply every coordinate by `factor`.
    ///
    /// Used once per run to project detection-resolution vertices back to
    /// source resolution (`factor = 1 / detection_scale`).
    pub fn scaled(&self, factor: f32) -> Quad {
        Quad {
            points: self.points.map(|p| Point::new(p.x * factor, p.y * factor)),
        }
    }

    /// Assign corner roles with the sum/difference rule: the corner with the
    /// smallest x+y is top-left, the largest x+y bottom-right, the smallest
    /// y−x top-right, and the largest y−x bottom-left.
    ///
    /// Unlike a plain sort by y then x, this stays stable for sheets rotated
    /// towards 45°, and it is independent of the input vertex order.
    pub fn order_corners(&self) -> OrderedCorners {
        let extreme = |key: fn(&Point) -> f32, flip: bool| -> Point {
            let mut best = self.points[0];
            for p in &self.points[1..] {
                let better = if flip {
                    key(p) > key(&best)
                } else {
                    key(p) < key(&best)
                };
                if better {
                    best = *p;
                }
            }
            best
        };

        OrderedCorners {
            top_left: extreme(|p| p.x + p.y, false),
            bottom_right: extreme(|p| p.x + p.y, true),
            top_right: extreme(|p| p.y - p.x, false),
            bottom_left: extreme(|p| p.y - p.x, true),
        }
    }
}

/// The four sheet corners tagged with their roles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderedCorners {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_right: Point,
    pub bottom_left: Point,
}

impl OrderedCorners {
    /// Corner tuples in (top-left, top-right, bottom-right, bottom-left)
    /// order, as `imageproc`'s projection solver expects them.
    pub fn as_control_points(&self) -> [(f32, f32); 4] {
        [
            (self.top_left.x, self.top_left.y),
            (self.top_right.x, self.top_right.y),
            (self.bottom_right.x, self.bottom_right.y),
            (self.bottom_left.x, self.bottom_left.y),
        ]
    }

    /// Check that all four corners are pairwise distinct.
    ///
    /// Two roles landing on the same vertex means the quadrilateral has no
    /// usable orientation; the warper treats that as degenerate geometry.
    pub fn ensure_distinct(&self) -> Result<()> {
        let pts = self.as_control_points();
        for i in 0..4 {
            for j in (i + 1)..4 {
                if pts[i] == pts[j] {
                    return Err(HerbariaError::DegenerateGeometry(format!(
                        "corner roles {i} and {j} resolve to the same point {:?}",
                        pts[i]
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Enclosed area of a closed polygon via the shoelace formula.
///
/// Vertices must be in ring order (CW or CCW); returns 0.0 for fewer than
/// 3 vertices.
pub fn polygon_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let n = points.len();
    let mut area = 0.0f64;
    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i].x as f64 * points[j].y as f64;
        area -= points[j].x as f64 * points[i].y as f64;
    }
    area.abs() / 2.0
}

/// Perimeter of a polygon; `closed` adds the wrap-around edge.
pub fn polygon_perimeter(points: &[Point], closed: bool) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let mut perimeter = 0.0f64;
    for pair in points.windows(2) {
        perimeter += pair[0].distance(&pair[1]) as f64;
    }
    if closed {
        perimeter += points[points.len() - 1].distance(&points[0]) as f64;
    }
    perimeter
}

/// Simplify a closed boundary ring with the Douglas-Peucker algorithm.
///
/// The ring is split at the vertex farthest from the first vertex, each
/// open chain is simplified independently, and the halves are stitched back
/// together. A final pass drops any split anchor that ended up within
/// `epsilon` of the line through its ring neighbours, so the result does
/// not depend on where the tracer happened to start the ring.
pub fn approximate_closed_polygon(points: &[Point], epsilon: f64) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut far = 1;
    let mut far_dist = 0.0f32;
    for (i, p) in points.iter().enumerate().skip(1) {
        let d = p.distance(&points[0]);
        if d > far_dist {
            far_dist = d;
            far = i;
        }
    }

    let mut second: Vec<Point> = points[far..].to_vec();
    second.push(points[0]);

    let mut ring = simplify_chain(&points[..=far], epsilon);
    ring.pop();
    let mut tail = simplify_chain(&second, epsilon);
    tail.pop();
    ring.extend(tail);

    let mut i = 0;
    while ring.len() > 3 && i < ring.len() {
        let prev = ring[(i + ring.len() - 1) % ring.len()];
        let next = ring[(i + 1) % ring.len()];
        if perpendicular_distance(&ring[i], &prev, &next) <= epsilon {
            ring.remove(i);
        } else {
            i += 1;
        }
    }

    ring
}

/// Douglas-Peucker on an open chain; both endpoints are always kept.
fn simplify_chain(points: &[Point], epsilon: f64) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[points.len() - 1] = true;

    let mut stack = vec![(0usize, points.len() - 1)];
    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }
        let mut max_dist = 0.0f64;
        let mut max_idx = start;
        for i in (start + 1)..end {
            let d = perpendicular_distance(&points[i], &points[start], &points[end]);
            if d > max_dist {
                max_dist = d;
                max_idx = i;
            }
        }
        if max_dist > epsilon {
            keep[max_idx] = true;
            stack.push((start, max_idx));
            stack.push((max_idx, end));
        }
    }

    points
        .iter()
        .zip(&keep)
        .filter(|&(_, &k)| k)
        .map(|(p, _)| *p)
        .collect()
}

/// Perpendicular distance from `point` to the infinite line through
/// `line_start` and `line_end`. Coincident line endpoints give the distance
/// to that single point.
fn perpendicular_distance(point: &Point, line_start: &Point, line_end: &Point) -> f64 {
    let a = (line_end.y - line_start.y) as f64;
    let b = (line_start.x - line_end.x) as f64;
    let c = (line_end.x as f64 * line_start.y as f64) - (line_start.x as f64 * line_end.y as f64);

    let denominator = (a * a + b * b).sqrt();
    if denominator == 0.0 {
        return point.distance(line_start) as f64;
    }

    (a * point.x as f64 + b * point.y as f64 + c).abs() / denominator
}
