//! Query silhouettes matched against stored edge masks.
//!
//! A template is a binary mask of any size, usually an outline drawn on the
//! authoring canvas. It uses the same bit layout as stored edges.

use crate::config::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::mask::EdgeMask;
use crate::util::{FrameMatchError, FrameMatchResult};
use image::{DynamicImage, GrayImage, Luma};
use imageproc::drawing::{draw_hollow_circle_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

/// Outline drawn on the authoring canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemplateShape {
    /// Rectangle spanning `center ± size / 2` inclusively.
    Rectangle { width: u32, height: u32 },
    /// Circle of radius `diameter / 2`.
    Circle { diameter: u32 },
}

/// Everything needed to draw a template canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TemplateSpec {
    pub shape: TemplateShape,
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Displacement of the shape centre from the canvas centre.
    pub offset_x: i32,
    pub offset_y: i32,
    /// Outline thickness in pixels, grown inwards.
    pub line_width: u32,
}

impl Default for TemplateSpec {
    fn default() -> Self {
        Self {
            shape: TemplateShape::Rectangle {
                width: CANVAS_WIDTH / 2,
                height: CANVAS_HEIGHT / 2,
            },
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            offset_x: 0,
            offset_y: 0,
            line_width: 1,
        }
    }
}

/// Owned binary template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    mask: EdgeMask,
}

impl Template {
    /// Uses an existing mask as the template.
    pub fn from_mask(mask: EdgeMask) -> FrameMatchResult<Self> {
        if mask.is_empty() {
            return Err(FrameMatchError::InvalidDimensions {
                width: mask.width(),
                height: 0,
            });
        }
        Ok(Self { mask })
    }

    /// Builds a template from a grayscale image; non-zero pixels are edges.
    pub fn from_luma(img: &GrayImage) -> FrameMatchResult<Self> {
        Self::from_mask(EdgeMask::from_luma(img)?)
    }

    /// Builds a template from a decoded image, which must have one channel.
    pub fn from_dynamic(img: &DynamicImage) -> FrameMatchResult<Self> {
        match img {
            DynamicImage::ImageLuma8(gray) => Self::from_luma(gray),
            DynamicImage::ImageLuma16(_) => Self::from_luma(&img.to_luma8()),
            _ => Err(FrameMatchError::InvalidInput(
                "template image must have a single channel",
            )),
        }
    }

    /// Draws the outline described by `spec` on a blank canvas.
    pub fn draw(spec: &TemplateSpec) -> FrameMatchResult<Self> {
        if spec.canvas_width == 0 || spec.canvas_height == 0 {
            return Err(FrameMatchError::InvalidDimensions {
                width: spec.canvas_width as usize,
                height: spec.canvas_height as usize,
            });
        }
        let mut canvas = GrayImage::new(spec.canvas_width, spec.canvas_height);
        let cx = (spec.canvas_width / 2) as i32 + spec.offset_x;
        let cy = (spec.canvas_height / 2) as i32 + spec.offset_y;
        let edge = Luma([255u8]);

        for inset in 0..spec.line_width.max(1) as i32 {
            match spec.shape {
                TemplateShape::Rectangle { width, height } => {
                    let half_w = (width / 2) as i32 - inset;
                    let half_h = (height / 2) as i32 - inset;
                    if half_w < 0 || half_h < 0 || width == 0 || height == 0 {
                        break;
                    }
                    let rect = Rect::at(cx - half_w, cy - half_h)
                        .of_size(2 * half_w as u32 + 1, 2 * half_h as u32 + 1);
                    draw_hollow_rect_mut(&mut canvas, rect, edge);
                }
                TemplateShape::Circle { diameter } => {
                    let radius = (diameter / 2) as i32 - inset;
                    if radius < 0 || diameter == 0 {
                        break;
                    }
                    draw_hollow_circle_mut(&mut canvas, (cx, cy), radius, edge);
                }
            }
        }

        Self::from_luma(&canvas)
    }

    pub fn mask(&self) -> &EdgeMask {
        &self.mask
    }

    pub fn width(&self) -> usize {
        self.mask.width()
    }

    pub fn height(&self) -> usize {
        self.mask.height()
    }
}
