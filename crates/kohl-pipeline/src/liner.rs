//! Eyeliner pipeline: a quadratic lash-line stroke with a tapered tail.
//!
//! Each eye gets two curves over the same four lash-line points: a base
//! curve walked ascending, and a return curve over tail-shifted points
//! walked descending with a progressive vertical offset. Concatenated
//! they form a closed stroke outline that thickens toward the outer
//! corner, approximating a hand-drawn taper rather than a uniform band.
//! The stroke is rasterized hard-edged — no feathering, unlike lip color.

use image::RgbImage;

use crate::blend::paint_mask;
use crate::curve::{interpolate, Direction, Kind};
use crate::landmarks::{EyelidPair, EYELID_POINTS};
use crate::raster::polygon_mask;
use crate::types::{Color, MakeupError, Point};

/// Which eye a lash line belongs to. Determines the taper direction:
/// the shifts that build the tail are mirrored across the face's
/// symmetry axis so both strokes flare toward the temples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eye {
    /// Viewer-left eye; the tail extends past the first lash point.
    Left,
    /// Viewer-right eye; the tail extends past the last lash point.
    Right,
}

/// Apply eyeliner strokes for both eyes to a copy of `image`.
///
/// Either eye failing aborts the whole feature pass and returns the
/// error; the caller's image is never left half-drawn.
///
/// # Errors
///
/// Returns [`MakeupError::InsufficientPoints`] if an eye has fewer than
/// [`EYELID_POINTS`] lash points, plus any interpolation or
/// rasterization error.
pub fn apply_eyeliner(
    image: &RgbImage,
    eyelids: &EyelidPair,
    color: Color,
) -> Result<RgbImage, MakeupError> {
    let mut out = image.clone();
    draw_stroke(&mut out, &eyelids.left, Eye::Left, color)?;
    draw_stroke(&mut out, &eyelids.right, Eye::Right, color)?;
    Ok(out)
}

/// Build one eye's closed stroke outline and paint it.
fn draw_stroke(
    image: &mut RgbImage,
    lash_points: &[Point],
    eye: Eye,
    color: Color,
) -> Result<(), MakeupError> {
    let ring = stroke_ring(lash_points, eye)?;
    let mask = polygon_mask(&ring, image.width(), image.height())?;
    paint_mask(image, &mask, color);
    Ok(())
}

/// The closed outline of one eye's stroke: base curve out, tapered
/// curve back.
fn stroke_ring(lash_points: &[Point], eye: Eye) -> Result<Vec<Point>, MakeupError> {
    if lash_points.len() < EYELID_POINTS {
        return Err(MakeupError::InsufficientPoints {
            needed: EYELID_POINTS,
            got: lash_points.len(),
        });
    }

    let base = interpolate(lash_points, Kind::Quadratic, Direction::Ascending)?;

    let shifted = shift_for_taper(lash_points, eye);
    let tail = interpolate(&shifted, Kind::Quadratic, Direction::Descending)?;

    let offsets = taper_offsets(tail.len());
    let mut ring = base.into_points();
    ring.extend(
        tail.points()
            .iter()
            .zip(offsets)
            .map(|(p, off)| Point::new(p.x, p.y - off)),
    );

    Ok(ring)
}

/// Shift the tail-side control points to flare the stroke.
///
/// The outermost point is pulled 5 px outward and its two neighbours
/// 1 px each, all three raised by 1 px. `Left` shifts the head of the
/// sequence (outer corner first), `Right` the tail (outer corner last) —
/// mirrored signs keep the taper consistent across the face.
fn shift_for_taper(points: &[Point], eye: Eye) -> Vec<Point> {
    let mut shifted = points.to_vec();
    let n = shifted.len();

    match eye {
        Eye::Left => {
            shifted[0].x -= 5;
            shifted[1].x -= 1;
            shifted[2].x -= 1;
            for p in &mut shifted[..3] {
                p.y -= 1;
            }
        }
        Eye::Right => {
            shifted[n - 1].x += 5;
            shifted[n - 2].x += 1;
            shifted[n - 3].x += 1;
            for p in &mut shifted[n - 3..] {
                p.y -= 1;
            }
        }
    }

    shifted
}

/// Progressive vertical offsets for the tapered return curve.
///
/// Samples are bucketed into quartiles of the traversal by count; each
/// quartile subtracts one more pixel than the last (0, 1, 2, 3). The
/// same policy applies to both eyes.
fn taper_offsets(sample_count: usize) -> Vec<i32> {
    (0..sample_count)
        .map(|i| ((i * 4 / sample_count.max(1)) as i32).min(3))
        .collect()
}
