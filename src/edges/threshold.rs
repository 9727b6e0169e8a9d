//! Global-threshold detector that keeps only region outlines.
//!
//! The blurred image is binarised, every border (outer and hole) is traced,
//! and only the traced points are drawn, so filled regions become curves.

use crate::edges::blur::gaussian_blur;
use crate::edges::ThresholdParams;
use image::{GrayImage, Luma};
use imageproc::contours::find_contours;
use imageproc::contrast::threshold;

pub(crate) fn detect(gray: &GrayImage, params: &ThresholdParams) -> GrayImage {
    let blurred = gaussian_blur(gray, &params.blur);
    let binary = threshold(&blurred, params.binary_threshold);

    let mut outlines = GrayImage::new(gray.width(), gray.height());
    for contour in find_contours::<i32>(&binary) {
        for point in contour.points {
            if point.x >= 0 && point.y >= 0 {
                let (x, y) = (point.x as u32, point.y as u32);
                if x < outlines.width() && y < outlines.height() {
                    outlines.put_pixel(x, y, Luma([255]));
                }
            }
        }
    }
    outlines
}
