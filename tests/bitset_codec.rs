use framematch::{decode_hex, encode_hex, BitBuf, EdgeMask, FrameMatchError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_bits(rng: &mut StdRng, len: usize, density: f64) -> BitBuf {
    (0..len).map(|_| rng.random_bool(density)).collect()
}

#[test]
fn random_masks_round_trip_for_every_padding() {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    for len in [1usize, 2, 3, 4, 5, 63, 64, 65, 127, 300, 301, 1_203] {
        for density in [0.0, 0.1, 0.5, 1.0] {
            let bits = random_bits(&mut rng, len, density);
            let hex = encode_hex(&bits);
            assert_eq!(hex.len(), len.div_ceil(4), "len {len}");
            assert_eq!(decode_hex(&hex, len).unwrap(), bits, "len {len}");
        }
    }
}

#[test]
fn leading_padding_is_zero() {
    // Six bits pad two zeros in front: 00 10 | 1101.
    let bits: BitBuf = [true, false, true, true, false, true].into_iter().collect();
    assert_eq!(encode_hex(&bits), "2D");
    let all: BitBuf = std::iter::repeat(true).take(5).collect();
    assert_eq!(encode_hex(&all), "1F");
}

#[test]
fn stored_mask_round_trips_through_hex() {
    let mut rng = StdRng::seed_from_u64(7);
    let width = 300;
    let bits = random_bits(&mut rng, width * 200, 0.2);
    let mask = EdgeMask::from_bits(bits, width).unwrap();
    let restored = EdgeMask::from_hex(&mask.to_hex(), mask.len(), width).unwrap();
    assert_eq!(restored, mask);
    assert_eq!(restored.height(), 200);
}

#[test]
fn decode_rejects_mismatched_length() {
    assert!(matches!(
        decode_hex("FF", 9),
        Err(FrameMatchError::InvalidHex { .. })
    ));
    assert!(matches!(
        decode_hex("G0", 8),
        Err(FrameMatchError::InvalidHex { .. })
    ));
}
