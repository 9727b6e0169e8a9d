//! Binary edge masks and their storage codec.
//!
//! An `EdgeMask` is a row-major grid of bits with a fixed width; its bit
//! length is always a whole number of rows. Stored library masks use the
//! canonical `STORED_EDGES_WIDTH`, templates use whatever size they were
//! drawn at.

mod bits;
pub mod hex;

pub use bits::BitBuf;
pub use hex::{decode_hex, encode_hex};

use crate::util::{FrameMatchError, FrameMatchResult};
use image::{GrayImage, Luma};

/// Row-major binary mask; `true` marks an edge pixel.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EdgeMask {
    bits: BitBuf,
    width: usize,
}

impl EdgeMask {
    /// Creates an all-zero mask.
    pub fn new(width: usize, height: usize) -> FrameMatchResult<Self> {
        if width == 0 {
            return Err(FrameMatchError::InvalidDimensions { width, height });
        }
        let len = width
            .checked_mul(height)
            .ok_or(FrameMatchError::InvalidDimensions { width, height })?;
        Ok(Self {
            bits: BitBuf::zeros(len),
            width,
        })
    }

    /// Wraps a bit buffer whose length is a multiple of `width`.
    pub fn from_bits(bits: BitBuf, width: usize) -> FrameMatchResult<Self> {
        if width == 0 {
            return Err(FrameMatchError::InvalidDimensions {
                width,
                height: 0,
            });
        }
        if bits.len() % width != 0 {
            return Err(FrameMatchError::MaskLength {
                len: bits.len(),
                width,
            });
        }
        Ok(Self { bits, width })
    }

    /// Decodes a stored hex string of `bit_len` bits into rows of `width`.
    pub fn from_hex(hex: &str, bit_len: usize, width: usize) -> FrameMatchResult<Self> {
        Self::from_bits(decode_hex(hex, bit_len)?, width)
    }

    /// Builds a mask from a grayscale image; any non-zero pixel is an edge.
    pub fn from_luma(img: &GrayImage) -> FrameMatchResult<Self> {
        let width = img.width() as usize;
        let height = img.height() as usize;
        if width == 0 {
            return Err(FrameMatchError::InvalidDimensions { width, height });
        }
        let bits = img.as_raw().iter().map(|&value| value != 0).collect();
        Self::from_bits(bits, width)
    }

    /// Renders the mask as a grayscale image with edges at 255.
    pub fn to_luma(&self) -> GrayImage {
        let mut img = GrayImage::new(self.width as u32, self.height() as u32);
        for (idx, pixel) in img.pixels_mut().enumerate() {
            if self.bits.bit(idx) {
                *pixel = Luma([255]);
            }
        }
        img
    }

    /// Returns the hex encoding of the mask bits.
    pub fn to_hex(&self) -> String {
        encode_hex(&self.bits)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.bits.len() / self.width
    }

    /// Total number of bits (`width * height`).
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bits(&self) -> &BitBuf {
        &self.bits
    }

    /// Returns the value at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<bool> {
        if x >= self.width {
            return None;
        }
        self.bits.get(y.checked_mul(self.width)?.checked_add(x)?)
    }

    /// Value at a signed coordinate; anything outside the grid is background.
    #[inline]
    pub(crate) fn edge_at(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width {
            return false;
        }
        let idx = y * self.width + x;
        idx < self.bits.len() && self.bits.bit(idx)
    }

    /// Sets the value at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the mask.
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        assert!(x < self.width, "x {x} out of range {}", self.width);
        self.bits.set(y * self.width + x, value);
    }

    /// Clears every edge.
    pub fn clear(&mut self) {
        self.bits.clear();
    }

    /// Number of edge pixels.
    pub fn count_edges(&self) -> usize {
        self.bits.count_ones()
    }
}
