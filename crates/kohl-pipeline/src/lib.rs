//! kohl-pipeline: Pure cosmetic compositing pipeline (sans-IO).
//!
//! Overlays makeup onto face photographs from landmark coordinates
//! through: landmarks -> curve interpolation -> region rasterization ->
//! feathered alpha blending.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! image buffers and structured landmark data. All filesystem and
//! decode/encode interaction lives in `kohl-cli`.

pub mod blend;
pub mod curve;
pub mod landmarks;
pub mod liner;
pub mod lips;
pub mod raster;
pub mod types;

pub use curve::{Direction, Kind};
pub use landmarks::{EyelidPair, FaceLandmarks, LipBoundaries, EYELID_POINTS};
pub use liner::Eye;
pub use types::{
    Color, Curve, Feature, LandmarkSet, MakeupConfig, MakeupError, MakeupResult, Point,
};

/// Apply every makeup feature described by `landmarks` to `image`.
///
/// Features run in a fixed order (lips, then eyeliner) and each works
/// on the accumulated result of the previous ones. A feature whose
/// landmarks are present but unusable is skipped with its error
/// recorded in [`MakeupResult::skipped`]; the remaining features still
/// run. Features without landmarks are silently omitted.
///
/// The call is synchronous and owns every buffer it touches; concurrent
/// use means independent invocations on independent inputs.
///
/// # Feature steps
///
/// 1. Lip color: four cubic boundary curves, scanline fill, feathered
///    blend per lip half
/// 2. Eyeliner: quadratic lash-line strokes with tapered tails,
///    hard-edged fill
///
/// # Errors
///
/// Returns [`MakeupError::NoLandmarks`] if `landmarks` describes no
/// feature at all. Per-feature errors do not fail the call; they are
/// reported in the result.
pub fn apply_makeup(
    image: &image::RgbImage,
    landmarks: &FaceLandmarks,
    config: &MakeupConfig,
) -> Result<MakeupResult, MakeupError> {
    if landmarks.is_empty() {
        return Err(MakeupError::NoLandmarks);
    }

    let mut working = image.clone();
    let mut applied = Vec::new();
    let mut skipped = Vec::new();

    // 1. Lip color.
    if let Some(lip_boundaries) = &landmarks.lips {
        match lips::apply_lip_color(&working, lip_boundaries, config.lip_color) {
            Ok(tinted) => {
                working = tinted;
                applied.push(Feature::Lips);
            }
            Err(err) => skipped.push((Feature::Lips, err)),
        }
    }

    // 2. Eyeliner.
    if let Some(eyelids) = &landmarks.eyelids {
        match liner::apply_eyeliner(&working, eyelids, config.liner_color) {
            Ok(lined) => {
                working = lined;
                applied.push(Feature::Eyeliner);
            }
            Err(err) => skipped.push((Feature::Eyeliner, err)),
        }
    }

    Ok(MakeupResult {
        image: working,
        applied,
        skipped,
    })
}
