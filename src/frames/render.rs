//! Maps a stored match back to original photo pixels and renders it.

use crate::config::RenderConfig;
use crate::frames::MatchData;
use image::imageops::{self, FilterType};
use image::RgbImage;

/// Pixel rectangle in the original photo.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct CropRect {
    pub(crate) x: u32,
    pub(crate) y: u32,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

/// Inverse-maps a placement on the stored mask onto a photo of
/// `photo_width × photo_height`. `None` when the rectangle is empty or
/// leaves the photo.
pub(crate) fn crop_rect(
    data: &MatchData,
    photo_width: u32,
    photo_height: u32,
    cfg: &RenderConfig,
) -> Option<CropRect> {
    if cfg.stored_width == 0 {
        return None;
    }
    let real_scale = f64::from(photo_width) / cfg.stored_width as f64;
    let scale = f64::from(data.scale);
    let x = (f64::from(data.origin_x) * real_scale).round();
    let y = (f64::from(data.origin_y) * real_scale).round();
    let width = (f64::from(cfg.canvas_width) * real_scale * scale).round();
    let height = (f64::from(cfg.canvas_height) * real_scale * scale).round();

    let fits = x >= 0.0
        && y >= 0.0
        && width >= 1.0
        && height >= 1.0
        && x + width <= f64::from(photo_width)
        && y + height <= f64::from(photo_height);
    fits.then_some(CropRect {
        x: x as u32,
        y: y as u32,
        width: width as u32,
        height: height as u32,
    })
}

/// Black frame of the output size.
pub(crate) fn blank(cfg: &RenderConfig) -> RgbImage {
    RgbImage::new(cfg.output_width, cfg.output_height)
}

/// Crops `photo` at the match placement and resizes to the output size.
///
/// Degenerate placements render as a blank frame.
pub(crate) fn render_match(photo: &RgbImage, data: &MatchData, cfg: &RenderConfig) -> RgbImage {
    let Some(rect) = crop_rect(data, photo.width(), photo.height(), cfg) else {
        return blank(cfg);
    };
    let cropped = imageops::crop_imm(photo, rect.x, rect.y, rect.width, rect.height).to_image();
    imageops::resize(
        &cropped,
        cfg.output_width,
        cfg.output_height,
        FilterType::Triangle,
    )
}
