//! Per-placement agreement between a template and an edge mask.

use crate::mask::EdgeMask;
use crate::template::Template;
use crate::util::math::match_ratio;

/// Agreement counts split by the template pixel's class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct PixelTally {
    pub(crate) tested_white: u32,
    pub(crate) matching_white: u32,
    pub(crate) tested_black: u32,
    pub(crate) matching_black: u32,
}

impl PixelTally {
    /// `white_rate * white_bias + black_rate * (1 - white_bias)`; a class
    /// with no samples contributes zero.
    pub(crate) fn percentage(&self, white_bias: f32) -> f32 {
        let white = match_ratio(self.matching_white, self.tested_white);
        let black = match_ratio(self.matching_black, self.tested_black);
        white * white_bias + black * (1.0 - white_bias)
    }
}

/// Template-to-mask offsets for one scale, computed once per scale step.
pub(crate) struct ScaleMap {
    cols: Vec<i64>,
    rows: Vec<i64>,
}

impl ScaleMap {
    pub(crate) fn new(template: &Template, scale: f32) -> Self {
        let map = |n: usize| (0..n).map(|i| (i as f32 * scale).floor() as i64).collect();
        Self {
            cols: map(template.width()),
            rows: map(template.height()),
        }
    }

    /// Counts agreement at `(origin_x, origin_y)` sampling every
    /// `row_step`-th template row. Mask pixels outside the grid read as
    /// background.
    pub(crate) fn tally(
        &self,
        mask: &EdgeMask,
        template: &Template,
        origin_x: i32,
        origin_y: i32,
        row_step: usize,
    ) -> PixelTally {
        let tpl_bits = template.mask().bits();
        let tpl_width = template.width();
        let (ox, oy) = (i64::from(origin_x), i64::from(origin_y));

        let mut tally = PixelTally::default();
        for y in (0..self.rows.len()).step_by(row_step.max(1)) {
            let my = oy + self.rows[y];
            let base = y * tpl_width;
            for (x, &col) in self.cols.iter().enumerate() {
                let source = mask.edge_at(ox + col, my);
                if tpl_bits.bit(base + x) {
                    tally.tested_white += 1;
                    tally.matching_white += u32::from(source);
                } else {
                    tally.tested_black += 1;
                    tally.matching_black += u32::from(!source);
                }
            }
        }
        tally
    }
}

/// Dense score of a single placement.
pub fn score_placement(
    mask: &EdgeMask,
    template: &Template,
    scale: f32,
    origin_x: i32,
    origin_y: i32,
    white_bias: f32,
) -> f32 {
    ScaleMap::new(template, scale)
        .tally(mask, template, origin_x, origin_y, 1)
        .percentage(white_bias)
}

#[cfg(test)]
mod tests {
    use super::{score_placement, PixelTally, ScaleMap};
    use crate::mask::EdgeMask;
    use crate::template::Template;

    fn checker(width: usize, height: usize) -> EdgeMask {
        let mut mask = EdgeMask::new(width, height).unwrap();
        for y in 0..height {
            for x in 0..width {
                mask.set(x, y, (x / 2 + y / 2) % 2 == 0);
            }
        }
        mask
    }

    #[test]
    fn bias_weights_the_two_classes() {
        let tally = PixelTally {
            tested_white: 4,
            matching_white: 2,
            tested_black: 10,
            matching_black: 10,
        };
        assert!((tally.percentage(0.75) - (0.5 * 0.75 + 0.25)).abs() < 1e-6);
        assert!((tally.percentage(1.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn identical_placement_scores_one() {
        let mask = checker(12, 8);
        let tpl = Template::from_mask(mask.clone()).unwrap();
        assert_eq!(score_placement(&mask, &tpl, 1.0, 0, 0, 0.75), 1.0);
    }

    #[test]
    fn shifted_placement_scores_lower() {
        let mask = checker(12, 8);
        let tpl = Template::from_mask(mask.clone()).unwrap();
        assert!(score_placement(&mask, &tpl, 1.0, 2, 0, 0.75) < 0.5);
    }

    #[test]
    fn row_step_samples_subset() {
        let mask = checker(6, 6);
        let tpl = Template::from_mask(mask.clone()).unwrap();
        let map = ScaleMap::new(&tpl, 1.0);
        let coarse = map.tally(&mask, &tpl, 0, 0, 4);
        assert_eq!(coarse.tested_white + coarse.tested_black, 12);
    }

    #[test]
    fn scale_maps_template_pixels_by_floor() {
        let tpl = Template::from_mask(EdgeMask::new(4, 2).unwrap()).unwrap();
        let map = ScaleMap::new(&tpl, 1.5);
        assert_eq!(map.cols, vec![0, 1, 3, 4]);
        assert_eq!(map.rows, vec![0, 1]);
    }
}
