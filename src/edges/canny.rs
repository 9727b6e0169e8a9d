//! Canny detector with optional fragment joining.

use crate::edges::blur::gaussian_blur;
use crate::edges::morphology::close_ellipse;
use crate::edges::CannyParams;
use crate::util::math::force_odd;
use image::GrayImage;
use imageproc::edges::canny;

pub(crate) fn detect(gray: &GrayImage, params: &CannyParams) -> GrayImage {
    let blurred = gaussian_blur(gray, &params.blur);
    let low = params.threshold1.min(params.threshold2) as f32;
    let high = params.threshold1.max(params.threshold2) as f32;
    let edges = canny(&blurred, low, high);

    if params.join_by_x == 0 && params.join_by_y == 0 {
        return edges;
    }
    let join = |size: u32| if size == 0 { 1 } else { force_odd(size) };
    close_ellipse(&edges, join(params.join_by_x), join(params.join_by_y))
}
