//! Color compositing: hard-edged fills and feathered blending.
//!
//! The compositor works on two buffers per feature pass: a *working*
//! image that receives hard-edged color fills, and the clean *base*
//! image the feathered result is composited over. Painting always runs
//! before blending for a region, since the blend reads the painted
//! working buffer as its color source.
//!
//! The blend is intentionally not a standard alpha composite: blend
//! strength is capped at [`BLEND_STRENGTH`], so even at mask centre the
//! underlying skin tone and detail shine through. That cap is what makes
//! the result read as a cosmetic tint rather than flat paint.

use image::{GrayImage, ImageBuffer, Luma, RgbImage};
use imageproc::drawing::draw_polygon_mut;
use imageproc::filter::gaussian_blur_f32;
use imageproc::geometry::convex_hull;

use crate::types::{Color, Curve, Point};

/// Maximum opacity of blended color over the base image.
///
/// At full mask coverage the output is `0.7 * working + 0.3 * base`;
/// color never fully replaces the original pixel.
pub const BLEND_STRENGTH: f32 = 0.7;

/// Gaussian sigma used to feather region masks.
///
/// Equivalent to an 81-tap kernel under the usual size-to-sigma rule
/// `0.3 * ((n - 1) * 0.5 - 1) + 0.8`.
pub const FEATHER_SIGMA: f32 = 12.5;

/// A continuous coverage mask with values in `[0, 1]`.
pub type CoverageMask = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Write `color` into the image wherever the binary mask is nonzero.
///
/// A hard-edged fill with no blending. Pixels outside the mask (or
/// outside the overlapping area, should dimensions differ) are left
/// untouched.
pub fn paint_mask(image: &mut RgbImage, mask: &GrayImage, color: Color) {
    let width = image.width().min(mask.width());
    let height = image.height().min(mask.height());

    for y in 0..height {
        for x in 0..width {
            if mask.get_pixel(x, y).0[0] > 0 {
                image.put_pixel(x, y, color.to_pixel());
            }
        }
    }
}

/// Write `color` at each listed point, ignoring points outside the
/// image bounds.
///
/// Used for the scanline fill produced by [`crate::raster::fill_between`].
pub fn paint_points(image: &mut RgbImage, points: &[Point], color: Color) {
    let (width, height) = image.dimensions();
    for p in points {
        if p.x >= 0 && p.y >= 0 && (p.x as u32) < width && (p.y as u32) < height {
            image.put_pixel(p.x as u32, p.y as u32, color.to_pixel());
        }
    }
}

/// Build a feathered coverage mask for a point cloud.
///
/// Fills the convex hull of `points` with full coverage, then applies a
/// large-kernel Gaussian blur ([`FEATHER_SIGMA`]) to produce a smooth
/// falloff at the region boundary. Degenerate point clouds (hull with
/// fewer than three vertices) yield an all-zero mask.
#[must_use]
pub fn feather_mask(points: &[Point], width: u32, height: u32) -> CoverageMask {
    let hull_input: Vec<imageproc::point::Point<i32>> = points
        .iter()
        .map(|p| imageproc::point::Point::new(p.x, p.y))
        .collect();

    let mut mask = CoverageMask::new(width, height);

    let hull = convex_hull(hull_input);
    if hull.len() < 3 {
        return mask;
    }

    draw_polygon_mut(&mut mask, &hull, Luma([1.0f32]));
    gaussian_blur_f32(&mask, FEATHER_SIGMA)
}

/// Composite the painted working image over the base through a
/// feathered mask.
///
/// Per pixel and channel: `out = m*K*working + (1 - m*K)*base` with
/// `K =` [`BLEND_STRENGTH`] and `m` the mask coverage, truncated to u8.
/// The base is read, never written; blending the same region repeatedly
/// against the same base is deterministic, while feeding a blended
/// result back in as the base changes the output (ordering matters).
#[must_use]
pub fn blend_feathered(mask: &CoverageMask, working: &RgbImage, base: &RgbImage) -> RgbImage {
    debug_assert_eq!(working.dimensions(), base.dimensions());
    debug_assert_eq!(mask.dimensions(), base.dimensions());

    let (width, height) = base.dimensions();
    let mut out = RgbImage::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let m = mask.get_pixel(x, y).0[0].clamp(0.0, 1.0);
            let opacity = m * BLEND_STRENGTH;
            let w = working.get_pixel(x, y);
            let b = base.get_pixel(x, y);

            let blend = |wc: u8, bc: u8| -> u8 {
                let value = opacity.mul_add(f32::from(wc), (1.0 - opacity) * f32::from(bc));
                value.clamp(0.0, 255.0) as u8
            };

            out.put_pixel(
                x,
                y,
                image::Rgb([blend(w[0], b[0]), blend(w[1], b[1]), blend(w[2], b[2])]),
            );
        }
    }

    out
}

/// Feather the region bounded by two curves and blend the painted
/// working buffer over the base.
///
/// The mask covers the convex hull of the combined outer and inner
/// samples. Returns a new image; neither input buffer is modified.
#[must_use]
pub fn feather_and_blend(
    outer: &Curve,
    inner: &Curve,
    working: &RgbImage,
    base: &RgbImage,
) -> RgbImage {
    let mut points = Vec::with_capacity(outer.len() + inner.len());
    points.extend_from_slice(outer.points());
    points.extend_from_slice(inner.points());

    let mask = feather_mask(&points, base.width(), base.height());
    blend_feathered(&mask, working, base)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn solid_image(width: u32, height: u32, color: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(width, height, image::Rgb(color))
    }

    #[test]
    fn paint_mask_writes_only_inside_mask() {
        let mut img = solid_image(4, 4, [255, 255, 255]);
        let mut mask = GrayImage::new(4, 4);
        mask.put_pixel(1, 2, Luma([255]));

        paint_mask(&mut img, &mask, Color::new(10, 20, 30));

        assert_eq!(img.get_pixel(1, 2), &image::Rgb([10, 20, 30]));
        assert_eq!(img.get_pixel(0, 0), &image::Rgb([255, 255, 255]));
        assert_eq!(img.get_pixel(2, 2), &image::Rgb([255, 255, 255]));
    }

    #[test]
    fn paint_points_ignores_out_of_bounds() {
        let mut img = solid_image(4, 4, [0, 0, 0]);
        let points = vec![
            Point::new(1, 1),
            Point::new(-1, 2),
            Point::new(2, 9),
            Point::new(3, 3),
        ];

        paint_points(&mut img, &points, Color::new(200, 100, 50));

        assert_eq!(img.get_pixel(1, 1), &image::Rgb([200, 100, 50]));
        assert_eq!(img.get_pixel(3, 3), &image::Rgb([200, 100, 50]));
        assert_eq!(img.get_pixel(0, 0), &image::Rgb([0, 0, 0]));
    }

    #[test]
    fn full_coverage_blend_is_seventy_thirty() {
        let working = solid_image(3, 3, [100, 0, 250]);
        let base = solid_image(3, 3, [200, 200, 200]);
        let mask = CoverageMask::from_pixel(3, 3, Luma([1.0]));

        let out = blend_feathered(&mask, &working, &base);

        let expected = |w: u8, b: u8| -> u8 {
            BLEND_STRENGTH.mul_add(f32::from(w), (1.0 - BLEND_STRENGTH) * f32::from(b)) as u8
        };
        let px = out.get_pixel(1, 1);
        assert_eq!(px[0], expected(100, 200));
        assert_eq!(px[1], expected(0, 200));
        assert_eq!(px[2], expected(250, 200));
        // The cap means the working color never fully wins.
        assert_ne!(px[1], 0, "base must still contribute at full coverage");
    }

    #[test]
    fn zero_coverage_preserves_base_exactly() {
        let working = solid_image(3, 3, [0, 0, 0]);
        let base = solid_image(3, 3, [123, 45, 67]);
        let mask = CoverageMask::new(3, 3);

        let out = blend_feathered(&mask, &working, &base);
        assert_eq!(out, base);
    }

    #[test]
    fn repeated_blend_against_same_base_is_deterministic() {
        let working = solid_image(3, 3, [255, 0, 0]);
        let base = solid_image(3, 3, [255, 255, 255]);
        let mask = CoverageMask::from_pixel(3, 3, Luma([1.0]));

        let first = blend_feathered(&mask, &working, &base);
        let second = blend_feathered(&mask, &working, &base);
        assert_eq!(first, second);
    }

    #[test]
    fn blending_against_blended_buffer_differs() {
        let working = solid_image(3, 3, [255, 0, 0]);
        let base = solid_image(3, 3, [255, 255, 255]);
        let mask = CoverageMask::from_pixel(3, 3, Luma([1.0]));

        let once = blend_feathered(&mask, &working, &base);
        let compounded = blend_feathered(&mask, &working, &once);
        assert_ne!(
            once, compounded,
            "blending over a previously blended buffer must change the result"
        );
    }

    #[test]
    fn feather_mask_smooth_falloff() {
        // A 40x40 square hull centred in a 200x200 mask.
        let points = vec![
            Point::new(80, 80),
            Point::new(120, 80),
            Point::new(120, 120),
            Point::new(80, 120),
        ];
        let mask = feather_mask(&points, 200, 200);

        let centre = mask.get_pixel(100, 100).0[0];
        let edge = mask.get_pixel(120, 100).0[0];
        let far = mask.get_pixel(5, 5).0[0];

        assert!(centre > 0.5, "hull centre should be well covered: {centre}");
        assert!(
            edge > 0.0 && edge < centre,
            "boundary should be partial: {edge}"
        );
        assert!(
            far.abs() < 1e-6,
            "far outside the hull the mask must be zero: {far}"
        );
        for p in mask.pixels() {
            assert!((-0.001..=1.001).contains(&p.0[0]));
        }
    }

    #[test]
    fn feather_mask_degenerate_points_is_blank() {
        let mask = feather_mask(&[Point::new(3, 3), Point::new(3, 3)], 10, 10);
        assert!(mask.pixels().all(|p| p.0[0] == 0.0));
    }

    #[test]
    fn feather_and_blend_leaves_distant_pixels_untouched() {
        let outer = Curve::new(vec![
            Point::new(90, 90),
            Point::new(100, 85),
            Point::new(110, 90),
        ]);
        let inner = Curve::new(vec![
            Point::new(90, 100),
            Point::new(100, 105),
            Point::new(110, 100),
        ]);
        let base = solid_image(200, 200, [255, 255, 255]);
        let mut working = base.clone();
        paint_mask(
            &mut working,
            &crate::raster::solid_polygon(&outer, &inner, 200, 200).unwrap(),
            Color::new(180, 40, 60),
        );

        let out = feather_and_blend(&outer, &inner, &working, &base);

        // Far from the region (beyond the blur support) nothing changes.
        assert_eq!(out.get_pixel(5, 5), base.get_pixel(5, 5));
        assert_eq!(out.get_pixel(195, 195), base.get_pixel(195, 195));
        // Inside the region the tint shows.
        assert_ne!(out.get_pixel(100, 95), base.get_pixel(100, 95));
    }
}
