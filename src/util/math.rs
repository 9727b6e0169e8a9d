//! Small numeric helpers shared by extraction, search and rendering.

/// Height that preserves the aspect ratio of `src_width x src_height` at
/// `target_width`, truncated toward zero and clamped to at least one row.
pub(crate) fn height_for_width(src_width: u32, src_height: u32, target_width: usize) -> usize {
    if src_width == 0 {
        return 1;
    }
    let height = u64::from(src_height) * target_width as u64 / u64::from(src_width);
    (height as usize).max(1)
}

/// Rounds a kernel size up to the next odd value (zero becomes one).
pub(crate) fn force_odd(size: u32) -> u32 {
    if size % 2 == 0 {
        size + 1
    } else {
        size
    }
}

/// Ratio of matching to tested samples; an empty class contributes zero.
pub(crate) fn match_ratio(matching: u32, tested: u32) -> f32 {
    if tested == 0 {
        0.0
    } else {
        matching as f32 / tested as f32
    }
}

#[cfg(test)]
mod tests {
    use super::{force_odd, height_for_width, match_ratio};

    #[test]
    fn height_for_width_truncates() {
        assert_eq!(height_for_width(600, 800, 300), 400);
        assert_eq!(height_for_width(1000, 333, 300), 99);
        assert_eq!(height_for_width(10_000, 1, 300), 1);
    }

    #[test]
    fn force_odd_rounds_up() {
        assert_eq!(force_odd(0), 1);
        assert_eq!(force_odd(4), 5);
        assert_eq!(force_odd(7), 7);
    }

    #[test]
    fn match_ratio_guards_empty_class() {
        assert_eq!(match_ratio(0, 0), 0.0);
        assert!((match_ratio(3, 4) - 0.75).abs() < 1e-6);
    }
}
