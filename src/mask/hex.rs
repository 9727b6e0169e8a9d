//! Hexadecimal codec for packed edge bits.
//!
//! Bits are grouped four to a digit, most significant bit first, in index
//! order. When the length is not a multiple of four the first digit is
//! padded with leading zero bits, so digit `k` holds bits
//! `4k - pad .. 4k - pad + 4`. The bit length is not recoverable from the
//! string and must be stored alongside it.

use crate::mask::BitBuf;
use crate::util::{FrameMatchError, FrameMatchResult};

const DIGITS: &[u8; 16] = b"0123456789ABCDEF";

fn padding(len: usize) -> usize {
    (4 - len % 4) % 4
}

/// Digits needed for `len` bits; does not overflow for any `len`.
fn digit_count(len: usize) -> usize {
    len / 4 + usize::from(len % 4 != 0)
}

/// Encodes `bits` as upper-case hex digits.
pub fn encode_hex(bits: &BitBuf) -> String {
    let len = bits.len();
    let pad = padding(len);
    let digits = digit_count(len);
    let mut out = String::with_capacity(digits);
    for digit in 0..digits {
        let mut value = 0usize;
        for j in 0..4 {
            let idx = (digit * 4 + j).checked_sub(pad);
            let bit = idx.is_some_and(|idx| bits.bit(idx));
            value = (value << 1) | usize::from(bit);
        }
        out.push(DIGITS[value] as char);
    }
    out
}

/// Decodes `hex` into a buffer of exactly `len` bits.
///
/// Both upper- and lower-case digits are accepted. Padding bits in the
/// first digit are ignored.
pub fn decode_hex(hex: &str, len: usize) -> FrameMatchResult<BitBuf> {
    let pad = padding(len);
    let expected = digit_count(len);
    if hex.len() != expected {
        return Err(FrameMatchError::InvalidHex {
            reason: format!("expected {expected} digits for {len} bits, got {}", hex.len()),
        });
    }

    let mut bits = BitBuf::zeros(len);
    for (digit, ch) in hex.chars().enumerate() {
        let value = ch.to_digit(16).ok_or_else(|| FrameMatchError::InvalidHex {
            reason: format!("'{ch}' is not a hex digit"),
        })?;
        for j in 0..4 {
            let Some(idx) = (digit * 4 + j).checked_sub(pad) else {
                continue;
            };
            if value & (1 << (3 - j)) != 0 {
                bits.set(idx, true);
            }
        }
    }
    Ok(bits)
}
