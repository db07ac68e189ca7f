//! Lip color pipeline: four boundary curves, two feathered passes.
//!
//! The closed lip boundary is covered by two halves. Per half, the outer
//! and inner landmark sets are cubic-interpolated (upper half walked
//! ascending, lower half descending), the gap is scanline-filled and the
//! enclosed polygon painted solid on a working copy, and finally the
//! painted region is feathered and blended over the clean base so the
//! color reads as tint, not paint.

use image::RgbImage;

use crate::blend::{feather_and_blend, paint_mask, paint_points};
use crate::curve::{interpolate, Direction, Kind};
use crate::landmarks::LipBoundaries;
use crate::raster::{fill_between, solid_polygon};
use crate::types::{Color, MakeupError};

/// Apply lip color to a copy of `image`.
///
/// Returns a new image; the input buffer is never modified. The upper
/// half is blended against the untouched original, and the lower half
/// against the upper result — within the lower region that base is still
/// untouched original (the two half-masks only graze each other at the
/// lip corners), so neither region is ever blended twice.
///
/// # Errors
///
/// Propagates interpolation errors ([`MakeupError::InsufficientPoints`],
/// [`MakeupError::NonMonotonicX`]) and
/// [`MakeupError::MalformedBoundary`] from rasterization. On error the
/// caller's image is untouched.
pub fn apply_lip_color(
    image: &RgbImage,
    lips: &LipBoundaries,
    color: Color,
) -> Result<RgbImage, MakeupError> {
    let upper_outer = interpolate(&lips.upper_outer, Kind::Cubic, Direction::Ascending)?;
    let upper_inner = interpolate(&lips.upper_inner, Kind::Cubic, Direction::Ascending)?;
    let lower_outer = interpolate(&lips.lower_outer, Kind::Cubic, Direction::Descending)?;
    let lower_inner = interpolate(&lips.lower_inner, Kind::Cubic, Direction::Descending)?;

    let (width, height) = image.dimensions();

    // Hard fills accumulate on the working buffer before any blending:
    // the scanline fill between the curves, then the solid polygon.
    let mut working = image.clone();
    for (outer, inner) in [
        (&upper_outer, &upper_inner),
        (&lower_outer, &lower_inner),
    ] {
        paint_points(&mut working, &fill_between(outer, inner), color);
        let mask = solid_polygon(outer, inner, width, height)?;
        paint_mask(&mut working, &mask, color);
    }

    let upper_blended = feather_and_blend(&upper_outer, &upper_inner, &working, image);
    Ok(feather_and_blend(
        &lower_outer,
        &lower_inner,
        &working,
        &upper_blended,
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::blend::{blend_feathered, feather_mask, BLEND_STRENGTH};
    use crate::types::Point;

    const LIP_COLOR: Color = Color::new(180, 40, 60);

    fn pts(coords: &[(i32, i32)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    /// Hexagonal lip boundary pair centred around (100, 100) on a
    /// 200x200 canvas.
    fn hexagon_lips() -> LipBoundaries {
        LipBoundaries {
            upper_outer: pts(&[(60, 100), (80, 85), (120, 85), (140, 100)]),
            upper_inner: pts(&[(60, 100), (80, 95), (120, 95), (140, 100)]),
            lower_outer: pts(&[(140, 100), (120, 115), (80, 115), (60, 100)]),
            lower_inner: pts(&[(140, 100), (120, 105), (80, 105), (60, 100)]),
        }
    }

    fn white_canvas() -> RgbImage {
        RgbImage::from_pixel(200, 200, image::Rgb([255, 255, 255]))
    }

    #[test]
    fn pixels_far_from_the_lips_stay_white() {
        let image = white_canvas();
        let out = apply_lip_color(&image, &hexagon_lips(), LIP_COLOR).unwrap();

        for &(x, y) in &[(0, 0), (199, 0), (0, 199), (199, 199), (100, 5)] {
            assert_eq!(
                out.get_pixel(x, y),
                &image::Rgb([255, 255, 255]),
                "pixel ({x}, {y}) outside the boundary hull must be unchanged"
            );
        }
    }

    #[test]
    fn painted_band_is_tinted_but_never_opaque() {
        let image = white_canvas();
        let out = apply_lip_color(&image, &hexagon_lips(), LIP_COLOR).unwrap();

        // (100, 90) sits inside the upper half's painted band.
        let px = out.get_pixel(100, 90);
        assert_ne!(px, &image::Rgb([255, 255, 255]), "band must be tinted");
        assert!(px[0] > px[1], "red must dominate green for this lip color");
        assert!(px[0] > px[2], "red must dominate blue for this lip color");
        // The 0.7 opacity cap leaves at least 30% of the white base in
        // every channel.
        for c in 0..3 {
            assert!(
                px[c] >= 76,
                "channel {c} fell below the blend-strength floor: {}",
                px[c]
            );
        }
    }

    #[test]
    fn output_matches_mask_composition_exactly() {
        // Reconstruct the two feathered passes by hand and verify the
        // pipeline pixel-for-pixel. This pins the pass ordering: upper
        // against the clean base, lower against the upper result.
        let image = white_canvas();
        let lips = hexagon_lips();
        let out = apply_lip_color(&image, &lips, LIP_COLOR).unwrap();

        let upper_outer = interpolate(&lips.upper_outer, Kind::Cubic, Direction::Ascending).unwrap();
        let upper_inner = interpolate(&lips.upper_inner, Kind::Cubic, Direction::Ascending).unwrap();
        let lower_outer = interpolate(&lips.lower_outer, Kind::Cubic, Direction::Descending).unwrap();
        let lower_inner = interpolate(&lips.lower_inner, Kind::Cubic, Direction::Descending).unwrap();

        let mut working = image.clone();
        for (outer, inner) in [
            (&upper_outer, &upper_inner),
            (&lower_outer, &lower_inner),
        ] {
            paint_points(&mut working, &fill_between(outer, inner), LIP_COLOR);
            let mask = solid_polygon(outer, inner, 200, 200).unwrap();
            paint_mask(&mut working, &mask, LIP_COLOR);
        }

        let hull_points = |outer: &crate::types::Curve, inner: &crate::types::Curve| {
            let mut v = outer.points().to_vec();
            v.extend_from_slice(inner.points());
            v
        };
        let upper_mask = feather_mask(&hull_points(&upper_outer, &upper_inner), 200, 200);
        let lower_mask = feather_mask(&hull_points(&lower_outer, &lower_inner), 200, 200);

        let expected = blend_feathered(
            &lower_mask,
            &working,
            &blend_feathered(&upper_mask, &working, &image),
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn blend_strength_floor_holds_at_full_coverage() {
        // Even the most covered pixel keeps (1 - K) of the base.
        let image = white_canvas();
        let out = apply_lip_color(&image, &hexagon_lips(), LIP_COLOR).unwrap();

        let floor = ((1.0 - BLEND_STRENGTH) * 255.0) as u8 - 1;
        for px in out.pixels() {
            for c in 0..3 {
                assert!(px[c] >= floor.min(LIP_COLOR.to_pixel()[c]));
            }
        }
    }

    #[test]
    fn application_is_deterministic() {
        let image = white_canvas();
        let first = apply_lip_color(&image, &hexagon_lips(), LIP_COLOR).unwrap();
        let second = apply_lip_color(&image, &hexagon_lips(), LIP_COLOR).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn input_image_is_never_modified() {
        let image = white_canvas();
        let snapshot = image.clone();
        let _out = apply_lip_color(&image, &hexagon_lips(), LIP_COLOR).unwrap();
        assert_eq!(image, snapshot);
    }

    #[test]
    fn too_few_boundary_points_fail_cleanly() {
        let mut lips = hexagon_lips();
        lips.upper_inner = pts(&[(60, 100), (100, 95), (140, 100)]);
        let err = apply_lip_color(&white_canvas(), &lips, LIP_COLOR).unwrap_err();
        assert!(matches!(
            err,
            MakeupError::InsufficientPoints { needed: 4, got: 3 }
        ));
    }
}
