//! Inside-out origin perturbations.

/// Yields `0, -step, +step, -2*step, +2*step, ...` for magnitudes up to
/// `max` inclusive. Zero is yielded once.
pub(crate) fn inside_out(max: usize, step: usize) -> impl Iterator<Item = i32> {
    (0..=max).step_by(step.max(1)).flat_map(|root| {
        let root = root as i32;
        std::iter::once(-root).chain((root != 0).then_some(root))
    })
}

#[cfg(test)]
mod tests {
    use super::inside_out;

    #[test]
    fn zero_max_yields_only_zero() {
        assert_eq!(inside_out(0, 3).collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn alternates_negative_first() {
        assert_eq!(inside_out(4, 2).collect::<Vec<_>>(), vec![0, -2, 2, -4, 4]);
        assert_eq!(inside_out(5, 2).collect::<Vec<_>>(), vec![0, -2, 2, -4, 4]);
        assert_eq!(inside_out(2, 1).collect::<Vec<_>>(), vec![0, -1, 1, -2, 2]);
    }
}
