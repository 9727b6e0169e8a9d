//! Correlation search of a template against a stored edge mask.
//!
//! The search walks a fixed schedule of placements: scales shrink from the
//! largest fit in steps, and at each scale the origin is perturbed around
//! the centred position inside-out on both axes. Every placement is scored
//! on a row-subsampled pass first; only promising placements get a dense
//! score, and only dense scores can become the best match.

pub(crate) mod offsets;
pub(crate) mod scan;
pub(crate) mod score;

pub use scan::search_mask;
pub use score::score_placement;

use crate::config::{
    MATCH_COARSE_ROW_STEP, MATCH_MAX_OFFSET, MATCH_MIN_OFFSET_SCALE, MATCH_OFFSET_SCALE_STEP,
    MATCH_OFFSET_X_STEP, MATCH_OFFSET_Y_STEP, MATCH_WHITE_BIAS, OUTPUT_WIDTH,
};
use crate::util::{FrameMatchError, FrameMatchResult};

/// Quality and placement of a template on an edge mask.
///
/// A placement maps template pixel `(x, y)` to mask pixel
/// `(origin_x + floor(x * scale), origin_y + floor(y * scale))`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ImageMatch {
    /// Weighted match rate in `[0, 1]`.
    pub percentage: f32,
    pub scale: f32,
    pub origin_x: i32,
    pub origin_y: i32,
}

/// Search schedule and scoring knobs.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchConfig {
    /// Decrement applied to the scale multiplier between passes.
    pub offset_scale_step: f32,
    pub offset_x_step: usize,
    pub offset_y_step: usize,
    /// Smallest scale multiplier tried (raised so crops never fall below
    /// `output_width` source pixels).
    pub min_offset_scale: f32,
    /// Largest origin perturbation in mask pixels.
    pub max_offset: usize,
    /// Weight of the edge-pixel match rate against the background rate.
    pub white_bias: f32,
    /// Row stride of the coarse pass.
    pub coarse_row_step: usize,
    /// Width of the final rendered frame.
    pub output_width: u32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            offset_scale_step: MATCH_OFFSET_SCALE_STEP,
            offset_x_step: MATCH_OFFSET_X_STEP,
            offset_y_step: MATCH_OFFSET_Y_STEP,
            min_offset_scale: MATCH_MIN_OFFSET_SCALE,
            max_offset: MATCH_MAX_OFFSET,
            white_bias: MATCH_WHITE_BIAS,
            coarse_row_step: MATCH_COARSE_ROW_STEP,
            output_width: OUTPUT_WIDTH,
        }
    }
}

impl MatchConfig {
    pub(crate) fn validate(&self) -> FrameMatchResult<()> {
        if self.offset_scale_step.is_nan() || self.offset_scale_step <= 0.0 {
            return Err(FrameMatchError::InvalidInput(
                "offset_scale_step must be positive",
            ));
        }
        if self.offset_x_step == 0 || self.offset_y_step == 0 {
            return Err(FrameMatchError::InvalidInput("offset steps must be non-zero"));
        }
        if !(0.0..=1.0).contains(&self.white_bias) {
            return Err(FrameMatchError::InvalidInput("white_bias must lie in [0, 1]"));
        }
        if self.coarse_row_step == 0 {
            return Err(FrameMatchError::InvalidInput("coarse_row_step must be non-zero"));
        }
        Ok(())
    }
}

/// Off-centre displacement of the template's shape on its canvas.
///
/// When supplied, a placement is only considered if the template frame
/// shifted by this displacement still lies inside the mask, so the context
/// around the shape is available when stitching neighbouring frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MatchContext {
    pub offset_x: i32,
    pub offset_y: i32,
}

/// Best placement found and the number of placements attempted.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SearchOutcome {
    pub best: ImageMatch,
    /// Placements scored on the coarse pass.
    pub runs: usize,
    /// Placements that also received a dense score.
    pub dense_runs: usize,
}
