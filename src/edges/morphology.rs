//! Binary closing with an anisotropic elliptical structuring element.
//!
//! `imageproc::morphology` only offers norm balls of a single radius; joining
//! edge fragments needs independent horizontal and vertical reach.

use image::{GrayImage, Luma};

/// Offsets `(dx, dy)` covered by an ellipse inscribed in a
/// `width x height` box centred on the anchor.
pub(crate) fn ellipse_offsets(width: u32, height: u32) -> Vec<(i32, i32)> {
    let (width, height) = (width.max(1) as i32, height.max(1) as i32);
    let r = height / 2;
    let c = width / 2;
    let inv_r2 = if r > 0 { 1.0 / (r * r) as f64 } else { 0.0 };

    let mut offsets = Vec::new();
    for row in 0..height {
        let dy = row - r;
        let (j1, j2) = if r == 0 {
            (0, width)
        } else {
            let span = ((r * r - dy * dy) as f64 * inv_r2).max(0.0).sqrt();
            let dx = (c as f64 * span).round() as i32;
            ((c - dx).max(0), (c + dx + 1).min(width))
        };
        for col in j1..j2 {
            offsets.push((col - c, dy));
        }
    }
    offsets
}

fn dilate(img: &GrayImage, offsets: &[(i32, i32)]) -> GrayImage {
    let (w, h) = (img.width() as i32, img.height() as i32);
    let mut out = GrayImage::new(img.width(), img.height());
    for (x, y, pixel) in img.enumerate_pixels() {
        if pixel[0] == 0 {
            continue;
        }
        for &(dx, dy) in offsets {
            let (nx, ny) = (x as i32 + dx, y as i32 + dy);
            if nx >= 0 && ny >= 0 && nx < w && ny < h {
                out.put_pixel(nx as u32, ny as u32, Luma([255]));
            }
        }
    }
    out
}

/// Pixels outside the image do not erode their neighbours.
fn erode(img: &GrayImage, offsets: &[(i32, i32)]) -> GrayImage {
    let (w, h) = (img.width() as i32, img.height() as i32);
    let mut out = GrayImage::new(img.width(), img.height());
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let keep = offsets.iter().all(|&(dx, dy)| {
            let (nx, ny) = (x as i32 - dx, y as i32 - dy);
            nx < 0 || ny < 0 || nx >= w || ny >= h || img.get_pixel(nx as u32, ny as u32)[0] != 0
        });
        if keep {
            *pixel = Luma([255]);
        }
    }
    out
}

/// Dilates then erodes `img` to merge edge fragments closer than the kernel.
pub(crate) fn close_ellipse(img: &GrayImage, width: u32, height: u32) -> GrayImage {
    let offsets = ellipse_offsets(width, height);
    erode(&dilate(img, &offsets), &offsets)
}
