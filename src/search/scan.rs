//! Coarse-to-fine placement schedule over scales and origin offsets.

use crate::mask::EdgeMask;
use crate::search::offsets::inside_out;
use crate::search::score::ScaleMap;
use crate::search::{ImageMatch, MatchConfig, MatchContext, SearchOutcome};
use crate::template::Template;
use crate::trace::trace_event;
use crate::util::{FrameMatchError, FrameMatchResult};

/// Coarse scores must exceed this before a dense pass is considered.
const PROMOTE_MIN: f32 = 0.5;
/// Coarse scores this far below the current best are not re-scored.
const PROMOTE_MARGIN: f32 = 0.1;
/// Tolerance on the last scale step so accumulated float error does not
/// drop `min_offset_scale` itself.
const SCALE_EPSILON: f32 = 1e-4;

/// Whether a `frame`-pixel window displaced by `shift` from `origin` stays
/// within `0..limit`.
fn window_fits(origin: i32, shift: i32, scale: f32, frame: i64, limit: usize) -> bool {
    let start = i64::from(origin) + (shift as f32 * scale).floor() as i64;
    start >= 0 && start + frame <= limit as i64
}

/// Searches `mask` for the best placement of `template`.
///
/// `source_width` is the width of the original photo the mask was derived
/// from; it bounds how far the scale may shrink so a crop still covers
/// `cfg.output_width` source pixels.
pub fn search_mask(
    mask: &EdgeMask,
    source_width: u32,
    template: &Template,
    cfg: &MatchConfig,
    context: Option<MatchContext>,
) -> FrameMatchResult<SearchOutcome> {
    cfg.validate()?;
    if source_width == 0 {
        return Err(FrameMatchError::InvalidDimensions {
            width: 0,
            height: mask.height(),
        });
    }
    if mask.is_empty() {
        return Ok(SearchOutcome::default());
    }

    let mask_w = mask.width() as f32;
    let mask_h = mask.height() as f32;
    let tpl_w = template.width() as f32;
    let tpl_h = template.height() as f32;
    let scale_base = (mask_w / tpl_w).min(mask_h / tpl_h);
    let min_offset_scale = cfg
        .min_offset_scale
        .max(cfg.output_width as f32 / source_width as f32);

    let mut outcome = SearchOutcome::default();
    for step in 0usize.. {
        let offset_scale = 1.0 - step as f32 * cfg.offset_scale_step;
        if offset_scale <= 0.0 || offset_scale + SCALE_EPSILON < min_offset_scale {
            break;
        }
        let scale = scale_base * offset_scale;
        let map = ScaleMap::new(template, scale);

        let origin_x = ((mask_w - tpl_w * scale) / 2.0) as i32;
        let origin_y = ((mask_h - tpl_h * scale) / 2.0) as i32;
        let max_offset_x = cfg.max_offset.min(origin_x.max(0) as usize);
        let max_offset_y = cfg.max_offset.min(origin_y.max(0) as usize);
        let frame_w = (tpl_w * scale).floor() as i64;
        let frame_h = (tpl_h * scale).floor() as i64;

        for offset_x in inside_out(max_offset_x, cfg.offset_x_step) {
            let x = origin_x + offset_x;
            if let Some(ctx) = context {
                // The x bound does not depend on y, so the whole column is out.
                if !window_fits(x, ctx.offset_x, scale, frame_w, mask.width()) {
                    continue;
                }
            }

            for offset_y in inside_out(max_offset_y, cfg.offset_y_step) {
                let y = origin_y + offset_y;
                if let Some(ctx) = context {
                    if !window_fits(y, ctx.offset_y, scale, frame_h, mask.height()) {
                        continue;
                    }
                }

                let coarse = map
                    .tally(mask, template, x, y, cfg.coarse_row_step)
                    .percentage(cfg.white_bias);
                let promising =
                    coarse > PROMOTE_MIN && coarse > outcome.best.percentage - PROMOTE_MARGIN;
                if outcome.runs == 0 || promising {
                    let dense = map.tally(mask, template, x, y, 1).percentage(cfg.white_bias);
                    outcome.dense_runs += 1;
                    if dense > outcome.best.percentage {
                        outcome.best = ImageMatch {
                            percentage: dense,
                            scale,
                            origin_x: x,
                            origin_y: y,
                        };
                    }
                }
                outcome.runs += 1;
            }
        }
    }

    trace_event!(
        "mask_searched",
        runs = outcome.runs,
        dense_runs = outcome.dense_runs,
        percentage = outcome.best.percentage
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::window_fits;

    #[test]
    fn window_fits_checks_both_ends() {
        assert!(window_fits(0, 0, 1.0, 10, 10));
        assert!(!window_fits(1, 0, 1.0, 10, 10));
        assert!(!window_fits(0, -1, 1.0, 5, 10));
        assert!(window_fits(4, 2, 0.5, 5, 10));
    }
}
