//! Region rasterization between paired boundary curves.
//!
//! Two independently usable responsibilities: a dense scanline fill of
//! the gap between an outer and an inner curve ([`fill_between`]), and a
//! filled polygon mask over the enclosed area ([`solid_polygon`], backed
//! by [`imageproc::drawing::draw_polygon_mut`]).
//!
//! Ring simplicity is a caller obligation (well-paired landmarks); it is
//! validated by the test suite via [`ring_is_simple`] rather than at
//! runtime, so a malformed pairing shows up as a visibly wrong mask, not
//! a crash.

use geo::line_intersection::{line_intersection, LineIntersection};
use geo::{coord, Line};
use image::{GrayImage, Luma};

use crate::curve::{interpolate, Direction, Kind};
use crate::types::{Curve, MakeupError, Point};

/// Pad the shorter of two point sequences by repeating its last element
/// until both lengths match.
///
/// This is the explicit pre-processing step behind index-wise pairing of
/// unequal-length boundary curves: rather than truncating or
/// interpolating, the shorter boundary's final point stands in for the
/// missing tail. Empty inputs are returned unchanged (there is no last
/// element to repeat).
#[must_use]
pub fn pad_to_match(a: &[Point], b: &[Point]) -> (Vec<Point>, Vec<Point>) {
    let mut a = a.to_vec();
    let mut b = b.to_vec();

    if let (Some(&last_a), Some(&last_b)) = (a.last(), b.last()) {
        while a.len() < b.len() {
            a.push(last_a);
        }
        while b.len() < a.len() {
            b.push(last_b);
        }
    }

    (a, b)
}

/// Dense scanline fill of the gap between two boundary curves.
///
/// Curves are paired index-wise after [`pad_to_match`]; for each pair,
/// every integer x step between the two x coordinates (inclusive) is
/// linearly interpolated and recorded. Equal-length curves produce
/// exactly `outer.len()` scanlines; unequal lengths repeat the shorter
/// curve's last point and cannot index out of range.
#[must_use]
pub fn fill_between(outer: &Curve, inner: &Curve) -> Vec<Point> {
    let (outer, inner) = pad_to_match(outer.points(), inner.points());

    outer
        .iter()
        .zip(&inner)
        .flat_map(|(&o, &i)| scanline(o, i))
        .collect()
}

/// All integer-x points on the segment from `a` to `b`, endpoints
/// inclusive, with truncated y per step.
///
/// Vertically aligned endpoints (equal x) collapse to the single point
/// `a`; otherwise this is the linear interpolation kernel applied to a
/// two-point boundary.
#[must_use]
pub fn scanline(a: Point, b: Point) -> Vec<Point> {
    if a.x == b.x {
        return vec![a];
    }

    match interpolate(&[a, b], Kind::Linear, Direction::Ascending) {
        Ok(curve) => curve.into_points(),
        // Two distinct-x points always satisfy the linear kernel's
        // preconditions.
        Err(_) => Vec::new(),
    }
}

/// Concatenate an outer curve with the reversed inner curve into a
/// single closed polygon ring.
///
/// Reversing the inner curve keeps the traversal continuous: the ring
/// runs out along the outer boundary and back along the inner one.
/// Consecutive duplicate points are collapsed and a trailing point equal
/// to the first is dropped, since the polygon fill primitive treats the
/// ring as implicitly closed.
#[must_use]
pub fn closed_ring(outer: &Curve, inner: &Curve) -> Vec<Point> {
    let mut ring: Vec<Point> = Vec::with_capacity(outer.len() + inner.len());

    for &p in outer.points().iter().chain(inner.points().iter().rev()) {
        if ring.last() != Some(&p) {
            ring.push(p);
        }
    }

    while ring.len() > 1 && ring.last() == ring.first() {
        ring.pop();
    }

    ring
}

/// Rasterize the area enclosed by two paired boundary curves as a
/// binary region mask (255 inside, 0 outside), same dimensions as the
/// target image.
///
/// # Errors
///
/// Returns [`MakeupError::MalformedBoundary`] if the concatenated ring
/// has fewer than three distinct points and so encloses no area.
pub fn solid_polygon(
    outer: &Curve,
    inner: &Curve,
    width: u32,
    height: u32,
) -> Result<GrayImage, MakeupError> {
    let ring = closed_ring(outer, inner);
    polygon_mask(&ring, width, height)
}

/// Rasterize an arbitrary closed ring as a binary region mask.
///
/// Consecutive duplicate vertices and an explicit closing vertex are
/// tolerated (the fill primitive requires an open ring).
///
/// # Errors
///
/// Returns [`MakeupError::MalformedBoundary`] if the ring has fewer than
/// three distinct points.
pub fn polygon_mask(ring: &[Point], width: u32, height: u32) -> Result<GrayImage, MakeupError> {
    let mut vertices: Vec<Point> = Vec::with_capacity(ring.len());
    for &p in ring {
        if vertices.last() != Some(&p) {
            vertices.push(p);
        }
    }
    while vertices.len() > 1 && vertices.last() == vertices.first() {
        vertices.pop();
    }

    if vertices.len() < 3 {
        return Err(MakeupError::MalformedBoundary(format!(
            "polygon ring needs at least 3 distinct points, got {}",
            vertices.len()
        )));
    }

    let poly: Vec<imageproc::point::Point<i32>> = vertices
        .iter()
        .map(|p| imageproc::point::Point::new(p.x, p.y))
        .collect();

    let mut mask = GrayImage::new(width, height);
    imageproc::drawing::draw_polygon_mut(&mut mask, &poly, Luma([255u8]));
    Ok(mask)
}

/// Check that a closed ring is simple (no two non-adjacent edges
/// intersect).
///
/// Used by tests to reject malformed landmark pairings; the runtime path
/// stays tolerant and rasterizes whatever ring it is given.
#[must_use]
pub fn ring_is_simple(ring: &[Point]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let edge = |i: usize| {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        Line::new(
            coord! { x: f64::from(a.x), y: f64::from(a.y) },
            coord! { x: f64::from(b.x), y: f64::from(b.y) },
        )
    };

    for i in 0..n {
        for j in (i + 1)..n {
            // Skip adjacent edges (shared endpoint), including the
            // first/last wrap-around pair.
            if j == i + 1 || (i == 0 && j == n - 1) {
                continue;
            }
            if let Some(ix) = line_intersection(edge(i), edge(j)) {
                match ix {
                    LineIntersection::SinglePoint { .. }
                    | LineIntersection::Collinear { .. } => return false,
                }
            }
        }
    }

    true
}
