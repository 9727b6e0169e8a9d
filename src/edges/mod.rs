//! Edge extraction from source photographs.
//!
//! Every photo is reduced to a binary `EdgeMask` at the canonical stored
//! width. Two detectors are available: Canny (with optional elliptical
//! closing to join fragments) and a global binary threshold whose contour
//! outlines become the edges. Manually drawn masks are never re-derived
//! from pixels; see `manual` for the edit operations applied to them.

mod blur;
mod canny;
pub mod manual;
mod morphology;
mod threshold;

pub use manual::{apply_edits, EdgeEdit};

use crate::config::{
    EDGE_DETECTION_BINARY_THRESHOLD, EDGE_DETECTION_BLUR_SIGMA_X, EDGE_DETECTION_BLUR_SIGMA_Y,
    EDGE_DETECTION_BLUR_SIZE, EDGE_DETECTION_CANNY_JOIN_BY_X, EDGE_DETECTION_CANNY_JOIN_BY_Y,
    EDGE_DETECTION_CANNY_THRESHOLD_1, EDGE_DETECTION_CANNY_THRESHOLD_2, EDGE_DETECTION_WIDTH,
    STORED_EDGES_WIDTH,
};
use crate::mask::EdgeMask;
use crate::util::math::height_for_width;
use crate::util::{FrameMatchError, FrameMatchResult};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage};

/// How a stored mask was produced; persisted as its numeric code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DetectionMode {
    #[default]
    Canny,
    Threshold,
    Manual,
}

impl DetectionMode {
    /// Numeric code used in the store file.
    pub fn code(self) -> u8 {
        match self {
            DetectionMode::Canny => 0,
            DetectionMode::Threshold => 1,
            DetectionMode::Manual => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(DetectionMode::Canny),
            1 => Some(DetectionMode::Threshold),
            2 => Some(DetectionMode::Manual),
            _ => None,
        }
    }
}

/// Gaussian blur applied before either detector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlurParams {
    /// Kernel size; even values are rounded up to the next odd size.
    pub size: u32,
    /// Horizontal sigma; zero derives it from the kernel size.
    pub sigma_x: u32,
    /// Vertical sigma; zero reuses `sigma_x`.
    pub sigma_y: u32,
}

impl Default for BlurParams {
    fn default() -> Self {
        Self {
            size: EDGE_DETECTION_BLUR_SIZE,
            sigma_x: EDGE_DETECTION_BLUR_SIGMA_X,
            sigma_y: EDGE_DETECTION_BLUR_SIGMA_Y,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CannyParams {
    pub blur: BlurParams,
    pub threshold1: u32,
    pub threshold2: u32,
    /// Elliptical closing kernel width; zero disables joining on this axis.
    pub join_by_x: u32,
    /// Elliptical closing kernel height; zero disables joining on this axis.
    pub join_by_y: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ThresholdParams {
    pub blur: BlurParams,
    pub binary_threshold: u8,
}

/// Extraction dispatch over the detection modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Detection {
    Canny(CannyParams),
    Threshold(ThresholdParams),
    /// Hand-drawn edges supplied by an editor.
    Manual,
}

/// Every detection knob as persisted with a stored image.
///
/// Knobs that the current mode does not use are still carried so that a
/// store file round-trips unchanged and switching modes keeps prior values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DetectionSettings {
    pub mode: DetectionMode,
    pub blur: BlurParams,
    pub threshold1: u32,
    pub threshold2: u32,
    pub binary_threshold: u8,
    pub join_by_x: u32,
    pub join_by_y: u32,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            mode: DetectionMode::Canny,
            blur: BlurParams::default(),
            threshold1: EDGE_DETECTION_CANNY_THRESHOLD_1,
            threshold2: EDGE_DETECTION_CANNY_THRESHOLD_2,
            binary_threshold: EDGE_DETECTION_BINARY_THRESHOLD,
            join_by_x: EDGE_DETECTION_CANNY_JOIN_BY_X,
            join_by_y: EDGE_DETECTION_CANNY_JOIN_BY_Y,
        }
    }
}

impl DetectionSettings {
    /// Selects the parameters relevant to the current mode.
    pub fn detection(&self) -> Detection {
        match self.mode {
            DetectionMode::Canny => Detection::Canny(CannyParams {
                blur: self.blur,
                threshold1: self.threshold1,
                threshold2: self.threshold2,
                join_by_x: self.join_by_x,
                join_by_y: self.join_by_y,
            }),
            DetectionMode::Threshold => Detection::Threshold(ThresholdParams {
                blur: self.blur,
                binary_threshold: self.binary_threshold,
            }),
            DetectionMode::Manual => Detection::Manual,
        }
    }
}

/// Working and storage widths for extraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtractWidths {
    /// Width the detector runs at.
    pub detection_width: usize,
    /// Width of the produced mask.
    pub stored_width: usize,
}

impl Default for ExtractWidths {
    fn default() -> Self {
        Self {
            detection_width: EDGE_DETECTION_WIDTH,
            stored_width: STORED_EDGES_WIDTH,
        }
    }
}

/// Extracts a binary edge mask of `widths.stored_width` columns.
///
/// The mask height is `floor(stored_width * height / width)` of the source
/// (at least one row). Uniform images produce an all-zero mask.
pub fn extract_edges(
    source: &DynamicImage,
    detection: &Detection,
    widths: ExtractWidths,
) -> FrameMatchResult<EdgeMask> {
    if source.width() == 0 || source.height() == 0 {
        return Err(FrameMatchError::InvalidDimensions {
            width: source.width() as usize,
            height: source.height() as usize,
        });
    }
    if widths.detection_width == 0 || widths.stored_width == 0 {
        return Err(FrameMatchError::InvalidInput("extraction widths must be non-zero"));
    }

    let gray = resize_gray(source, widths.detection_width);
    let edges = match detection {
        Detection::Canny(params) => canny::detect(&gray, params),
        Detection::Threshold(params) => threshold::detect(&gray, params),
        Detection::Manual => {
            return Err(FrameMatchError::InvalidInput(
                "manual edges cannot be detected from pixels",
            ))
        }
    };

    if widths.detection_width == widths.stored_width {
        return EdgeMask::from_luma(&edges);
    }
    let stored_height = height_for_width(source.width(), source.height(), widths.stored_width);
    let resized = imageops::resize(
        &edges,
        widths.stored_width as u32,
        stored_height as u32,
        FilterType::Triangle,
    );
    EdgeMask::from_luma(&resized)
}

/// Grayscale copy of `source` resized to `width`, aspect preserved.
fn resize_gray(source: &DynamicImage, width: usize) -> GrayImage {
    let height = height_for_width(source.width(), source.height(), width);
    let gray = source.to_luma8();
    imageops::resize(&gray, width as u32, height as u32, FilterType::Triangle)
}

#[cfg(test)]
mod tests {
    use super::{DetectionMode, DetectionSettings, Detection};

    #[test]
    fn mode_codes_round_trip() {
        for mode in [
            DetectionMode::Canny,
            DetectionMode::Threshold,
            DetectionMode::Manual,
        ] {
            assert_eq!(DetectionMode::from_code(mode.code()), Some(mode));
        }
        assert_eq!(DetectionMode::from_code(3), None);
    }

    #[test]
    fn settings_select_mode_parameters() {
        let mut settings = DetectionSettings {
            binary_threshold: 90,
            ..DetectionSettings::default()
        };
        assert!(matches!(settings.detection(), Detection::Canny(_)));

        settings.mode = DetectionMode::Threshold;
        match settings.detection() {
            Detection::Threshold(params) => assert_eq!(params.binary_threshold, 90),
            other => panic!("unexpected detection {other:?}"),
        }

        settings.mode = DetectionMode::Manual;
        assert_eq!(settings.detection(), Detection::Manual);
    }
}
