//! Gaussian blur with an explicit kernel size and per-axis sigma.

use crate::edges::BlurParams;
use crate::util::math::force_odd;
use image::GrayImage;
use imageproc::filter::separable_filter;

/// Normalised 1D Gaussian kernel of `size` taps (forced odd).
///
/// A non-positive sigma is derived from the size as
/// `0.3 * ((size - 1) / 2 - 1) + 0.8`.
pub(crate) fn gaussian_kernel(size: u32, sigma: f32) -> Vec<f32> {
    let size = force_odd(size);
    let sigma = if sigma > 0.0 {
        sigma
    } else {
        0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8
    };
    let center = (size / 2) as f32;
    let scale = -0.5 / (sigma * sigma);
    let mut kernel: Vec<f32> = (0..size)
        .map(|i| {
            let d = i as f32 - center;
            (scale * d * d).exp()
        })
        .collect();
    let sum: f32 = kernel.iter().sum();
    kernel.iter_mut().for_each(|k| *k /= sum);
    kernel
}

pub(crate) fn gaussian_blur(img: &GrayImage, params: &BlurParams) -> GrayImage {
    let sigma_x = params.sigma_x as f32;
    let sigma_y = if params.sigma_y == 0 {
        sigma_x
    } else {
        params.sigma_y as f32
    };
    let h_kernel = gaussian_kernel(params.size, sigma_x);
    let v_kernel = gaussian_kernel(params.size, sigma_y);
    if h_kernel.len() == 1 && v_kernel.len() == 1 {
        return img.clone();
    }
    separable_filter(img, &h_kernel, &v_kernel)
}

#[cfg(test)]
mod tests {
    use super::{gaussian_blur, gaussian_kernel};
    use crate::edges::BlurParams;
    use image::{GrayImage, Luma};

    #[test]
    fn kernel_is_normalised_and_symmetric() {
        let kernel = gaussian_kernel(4, 0.0);
        assert_eq!(kernel.len(), 5);
        let sum: f32 = kernel.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!((kernel[0] - kernel[4]).abs() < 1e-6);
        assert!(kernel[2] > kernel[1]);
    }

    #[test]
    fn size_one_kernel_is_identity() {
        assert_eq!(gaussian_kernel(0, 0.0), vec![1.0]);
        let img = GrayImage::from_pixel(3, 3, Luma([42]));
        let params = BlurParams {
            size: 1,
            sigma_x: 0,
            sigma_y: 0,
        };
        assert_eq!(gaussian_blur(&img, &params), img);
    }

    #[test]
    fn blur_keeps_uniform_images_uniform() {
        let img = GrayImage::from_pixel(8, 6, Luma([90]));
        let blurred = gaussian_blur(&img, &BlurParams::default());
        assert!(blurred.pixels().all(|p| p[0].abs_diff(90) <= 1));
    }
}
