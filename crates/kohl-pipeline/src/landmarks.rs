//! Landmark input boundary: structured feature sets and the legacy
//! eyelid serialization.
//!
//! The landmark detector itself is an external collaborator; this module
//! only defines what the pipeline consumes. Lip boundaries arrive as
//! structured point lists. Eyelids historically arrive as a
//! newline-delimited text block of `"x y"` pairs, one block per eye with
//! a blank line between — [`parse_eyelid_block`] quarantines that format
//! here so the rest of the pipeline only ever sees [`Point`]s.

use serde::{Deserialize, Serialize};

use crate::types::{LandmarkSet, MakeupError, Point};

/// Number of lash-line points used per eye.
///
/// The eyeliner taper shifts the outermost point and its two neighbours,
/// which requires exactly this many control points.
pub const EYELID_POINTS: usize = 4;

/// The four lip boundaries, one landmark set per anatomical edge.
///
/// Each set is ordered along the boundary; the upper boundaries are
/// traversed left-to-right and the lower ones right-to-left by the lip
/// pipeline, matching the curve walk directions it requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LipBoundaries {
    /// Outer edge of the upper lip.
    pub upper_outer: LandmarkSet,
    /// Inner edge of the upper lip.
    pub upper_inner: LandmarkSet,
    /// Outer edge of the lower lip.
    pub lower_outer: LandmarkSet,
    /// Inner edge of the lower lip.
    pub lower_inner: LandmarkSet,
}

/// Upper lash-line points for both eyes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EyelidPair {
    /// Left eye lash line, ordered from the outer corner inward.
    pub left: LandmarkSet,
    /// Right eye lash line, ordered from the inner corner outward.
    pub right: LandmarkSet,
}

/// Everything the detector found for one face.
///
/// Produced once per pipeline invocation and read-only thereafter. A
/// feature whose landmarks are absent is simply not applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceLandmarks {
    /// Lip boundaries, when the detector located a mouth.
    #[serde(default)]
    pub lips: Option<LipBoundaries>,
    /// Eyelid lash lines, when the detector located both eyes.
    #[serde(default)]
    pub eyelids: Option<EyelidPair>,
}

impl FaceLandmarks {
    /// Returns `true` if the detector supplied no feature at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.lips.is_none() && self.eyelids.is_none()
    }
}

/// Parse the legacy eyelid text block.
///
/// The format is two blocks of `"x y"` lines separated by a blank line,
/// left eye first. Only the first [`EYELID_POINTS`] points of each block
/// are used; trailing lines are ignored (the historical detector emitted
/// extras for one eye).
///
/// # Errors
///
/// Returns [`MakeupError::LandmarkParse`] if there are not exactly two
/// blocks, a block has fewer than [`EYELID_POINTS`] points, or a line is
/// not two integers.
pub fn parse_eyelid_block(text: &str) -> Result<EyelidPair, MakeupError> {
    let blocks: Vec<&str> = text
        .split("\n\n")
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .collect();

    if blocks.len() != 2 {
        return Err(MakeupError::LandmarkParse(format!(
            "expected 2 eye blocks separated by a blank line, got {}",
            blocks.len()
        )));
    }

    Ok(EyelidPair {
        left: parse_eye_lines(blocks[0])?,
        right: parse_eye_lines(blocks[1])?,
    })
}

/// Parse one eye's block of `"x y"` lines into its first
/// [`EYELID_POINTS`] points.
fn parse_eye_lines(block: &str) -> Result<LandmarkSet, MakeupError> {
    let mut points = Vec::with_capacity(EYELID_POINTS);

    for line in block.lines().take(EYELID_POINTS) {
        let mut fields = line.split_whitespace();
        let (Some(x), Some(y), None) = (fields.next(), fields.next(), fields.next()) else {
            return Err(MakeupError::LandmarkParse(format!(
                "expected a line of two integers, got {line:?}"
            )));
        };

        let x: i32 = x
            .parse()
            .map_err(|e| MakeupError::LandmarkParse(format!("bad x coordinate {x:?}: {e}")))?;
        let y: i32 = y
            .parse()
            .map_err(|e| MakeupError::LandmarkParse(format!("bad y coordinate {y:?}: {e}")))?;

        points.push(Point::new(x, y));
    }

    if points.len() < EYELID_POINTS {
        return Err(MakeupError::LandmarkParse(format!(
            "eye block needs {EYELID_POINTS} points, got {}",
            points.len()
        )));
    }

    Ok(points)
}
