//! Module-wide constants and the geometry used to render matched frames.
//!
//! Every search and extraction knob has a default here; the per-call
//! structs (`MatchConfig`, `DetectionSettings`, `ExtractWidths`,
//! `RenderConfig`) start from these values and can be overridden.

/// Canonical width of every stored edge mask.
pub const STORED_EDGES_WIDTH: usize = 300;
/// Width at which edge detection runs before resizing to the stored width.
pub const EDGE_DETECTION_WIDTH: usize = 300;

/// Template authoring canvas width.
pub const CANVAS_WIDTH: u32 = 600;
/// Template authoring canvas height.
pub const CANVAS_HEIGHT: u32 = 400;

/// Rendered frame width.
pub const OUTPUT_WIDTH: u32 = 1200;
/// Rendered frame height.
pub const OUTPUT_HEIGHT: u32 = 800;

pub const MATCH_OFFSET_SCALE_STEP: f32 = 0.05;
pub const MATCH_OFFSET_X_STEP: usize = 2;
pub const MATCH_OFFSET_Y_STEP: usize = 2;
pub const MATCH_MIN_OFFSET_SCALE: f32 = 0.5;
pub const MATCH_MAX_OFFSET: usize = 20;
pub const MATCH_WHITE_BIAS: f32 = 0.75;
/// Row stride of the coarse evaluation pass.
pub const MATCH_COARSE_ROW_STEP: usize = 10;

pub const EDGE_DETECTION_BLUR_SIZE: u32 = 5;
pub const EDGE_DETECTION_BLUR_SIGMA_X: u32 = 0;
pub const EDGE_DETECTION_BLUR_SIGMA_Y: u32 = 0;
pub const EDGE_DETECTION_CANNY_THRESHOLD_1: u32 = 30;
pub const EDGE_DETECTION_CANNY_THRESHOLD_2: u32 = 90;
pub const EDGE_DETECTION_BINARY_THRESHOLD: u8 = 128;
pub const EDGE_DETECTION_CANNY_JOIN_BY_X: u32 = 0;
pub const EDGE_DETECTION_CANNY_JOIN_BY_Y: u32 = 0;

/// Geometry needed to turn a stored match back into an output image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderConfig {
    /// Width of the edge masks the matches were computed against.
    pub stored_width: usize,
    /// Canvas the template was drawn on.
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Size of every rendered frame.
    pub output_width: u32,
    pub output_height: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            stored_width: STORED_EDGES_WIDTH,
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            output_width: OUTPUT_WIDTH,
            output_height: OUTPUT_HEIGHT,
        }
    }
}
