//! Shared types for the kohl compositing pipeline.

use serde::{Deserialize, Serialize};

/// Re-export `GrayImage` so downstream crates can reference region masks
/// without depending on `image` directly.
pub use image::GrayImage;

/// Re-export `RgbImage` so downstream crates can reference the source and
/// composited buffers without depending on `image` directly.
pub use image::RgbImage;

/// A 2D point in image coordinates.
///
/// Integer-valued by design: every curve sample, scanline step, and
/// polygon vertex in the pipeline is quantized to pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position (pixels from left edge).
    pub x: i32,
    /// Vertical position (pixels from top edge).
    pub y: i32,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An ordered sequence of sparse boundary points supplied by the external
/// landmark detector, one per anatomical boundary.
///
/// Ordering encodes traversal direction along the boundary and must be
/// preserved (or deliberately reversed), never shuffled.
pub type LandmarkSet = Vec<Point>;

/// A dense, ordered sequence of interpolated samples, one per integer x
/// step across the fitted span.
///
/// Invariant: x values are strictly monotonic (ascending or descending per
/// the requested walk direction) and cover the full span between the first
/// and last control point with no gaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Curve(Vec<Point>);

impl Curve {
    /// Create a new curve from a vector of samples.
    #[must_use]
    pub const fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    /// Returns `true` if the curve has no samples.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of samples in the curve.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the first sample, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Point> {
        self.0.first()
    }

    /// Returns the last sample, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Point> {
        self.0.last()
    }

    /// Returns a slice of all samples.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Consumes the curve and returns the underlying vector of samples.
    #[must_use]
    pub fn into_points(self) -> Vec<Point> {
        self.0
    }
}

/// An RGB color with channels in `[0, 255]`.
///
/// No alpha channel: opacity is expressed entirely through the feathered
/// region mask at composite time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Create a new color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert to an `image` pixel.
    #[must_use]
    pub const fn to_pixel(self) -> image::Rgb<u8> {
        image::Rgb([self.r, self.g, self.b])
    }
}

/// Configuration for a makeup application pass.
///
/// These two colors are the only tunables in the stable contract. The
/// feather sigma and blend strength are internal constants of the
/// compositor (see [`crate::blend`]), deliberately not exposed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MakeupConfig {
    /// Lip tint, blended with a feathered edge.
    pub lip_color: Color,
    /// Eyeliner stroke color, rendered hard-edged.
    pub liner_color: Color,
}

impl Default for MakeupConfig {
    fn default() -> Self {
        Self {
            // Classic red lips, black liner.
            lip_color: Color::new(170, 20, 60),
            liner_color: Color::new(0, 0, 0),
        }
    }
}

/// A cosmetic feature the pipeline can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feature {
    /// Lip color with feathered blending.
    Lips,
    /// Hard-edged eyeliner strokes.
    Eyeliner,
}

/// Result of a makeup application pass.
///
/// Owned entirely by the invocation that produced it; the pipeline keeps
/// no state between calls.
#[derive(Debug)]
pub struct MakeupResult {
    /// The composited image, same dimensions and channel order as the input.
    pub image: RgbImage,
    /// Features successfully applied, in application order.
    pub applied: Vec<Feature>,
    /// Features that were requested but failed, with the cause. A skipped
    /// feature leaves the image unmodified for that feature and never
    /// corrupts features already applied.
    pub skipped: Vec<(Feature, MakeupError)>,
}

/// Errors that can occur while deriving curves and compositing.
#[derive(Debug, thiserror::Error)]
pub enum MakeupError {
    /// The landmark input carried no feature the pipeline can work with.
    #[error("no usable facial landmarks were provided")]
    NoLandmarks,

    /// A boundary has fewer points than the interpolation kernel requires.
    #[error("interpolation requires at least {needed} points, got {got}")]
    InsufficientPoints {
        /// Minimum control points for the requested kernel.
        needed: usize,
        /// Points actually supplied.
        got: usize,
    },

    /// Control point x coordinates are not strictly monotonic in input
    /// order (duplicates included). Interpolation preconditions are
    /// violated immediately, never retried.
    #[error("landmark x-coordinates must be strictly monotonic (violation at index {index})")]
    NonMonotonicX {
        /// Index of the first offending control point.
        index: usize,
    },

    /// The concatenated polygon ring is empty or degenerate.
    #[error("malformed boundary ring: {0}")]
    MalformedBoundary(String),

    /// The legacy eyelid text block could not be parsed.
    #[error("failed to parse eyelid landmark block: {0}")]
    LandmarkParse(String),
}
