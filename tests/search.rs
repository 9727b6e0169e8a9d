use framematch::search::score_placement;
use framematch::{
    search_mask, EdgeMask, FrameMatchError, MatchConfig, MatchContext, Template, TemplateShape,
    TemplateSpec,
};

/// Large enough that `output_width / SOURCE_WIDTH` never limits the scale.
const SOURCE_WIDTH: u32 = 3000;

fn outline_template() -> Template {
    Template::draw(&TemplateSpec {
        shape: TemplateShape::Rectangle {
            width: 30,
            height: 20,
        },
        canvas_width: 60,
        canvas_height: 40,
        offset_x: 0,
        offset_y: 0,
        line_width: 2,
    })
    .unwrap()
}

fn config() -> MatchConfig {
    MatchConfig {
        output_width: 100,
        ..MatchConfig::default()
    }
}

/// Copies `template` into a blank mask of `width × height` at `(x0, y0)`.
fn embed(template: &Template, width: usize, height: usize, x0: usize, y0: usize) -> EdgeMask {
    let mut mask = EdgeMask::new(width, height).unwrap();
    for y in 0..template.height() {
        for x in 0..template.width() {
            if template.mask().get(x, y) == Some(true) {
                mask.set(x0 + x, y0 + y, true);
            }
        }
    }
    mask
}

#[test]
fn template_identical_to_mask_scores_one() {
    let template = outline_template();
    let mask = template.mask().clone();
    let outcome = search_mask(&mask, SOURCE_WIDTH, &template, &config(), None).unwrap();
    assert_eq!(outcome.best.percentage, 1.0);
    assert_eq!(outcome.best.scale, 1.0);
    assert_eq!((outcome.best.origin_x, outcome.best.origin_y), (0, 0));
}

#[test]
fn finds_the_shifted_placement() {
    let template = outline_template();
    // Centred origin is x = 10 on an 80 px mask; the copy sits 4 px right.
    let mask = embed(&template, 80, 40, 14, 0);
    let outcome = search_mask(&mask, SOURCE_WIDTH, &template, &config(), None).unwrap();
    assert_eq!(outcome.best.percentage, 1.0);
    assert_eq!((outcome.best.origin_x, outcome.best.origin_y), (14, 0));
}

#[test]
fn search_is_deterministic() {
    let template = outline_template();
    let mask = embed(&template, 90, 50, 17, 6);
    let first = search_mask(&mask, SOURCE_WIDTH, &template, &config(), None).unwrap();
    let second = search_mask(&mask, SOURCE_WIDTH, &template, &config(), None).unwrap();
    assert_eq!(first, second);
}

#[test]
fn best_is_a_dense_score_at_least_the_first_placement() {
    let template = outline_template();
    let mask = embed(&template, 90, 50, 17, 6);
    let cfg = config();
    let outcome = search_mask(&mask, SOURCE_WIDTH, &template, &cfg, None).unwrap();
    let best = outcome.best;

    let rescored = score_placement(
        &mask,
        &template,
        best.scale,
        best.origin_x,
        best.origin_y,
        cfg.white_bias,
    );
    assert_eq!(rescored, best.percentage);

    // The first placement (largest scale, centred) is always scored densely.
    let scale = (90.0f32 / 60.0).min(50.0 / 40.0);
    let origin_x = ((90.0 - 60.0 * scale) / 2.0) as i32;
    let origin_y = ((50.0 - 40.0 * scale) / 2.0) as i32;
    let first = score_placement(&mask, &template, scale, origin_x, origin_y, cfg.white_bias);
    assert!(best.percentage >= first);
    assert!(outcome.dense_runs >= 1);
    assert!(outcome.dense_runs <= outcome.runs);
}

#[test]
fn zero_offset_tries_one_placement_per_scale() {
    let template = outline_template();
    let mask = embed(&template, 80, 50, 10, 5);
    let cfg = MatchConfig {
        max_offset: 0,
        offset_scale_step: 0.25,
        min_offset_scale: 0.5,
        ..config()
    };
    let outcome = search_mask(&mask, SOURCE_WIDTH, &template, &cfg, None).unwrap();
    // Scales 1.0, 0.75 and 0.5.
    assert_eq!(outcome.runs, 3);
}

#[test]
fn output_width_raises_the_minimum_scale() {
    let template = outline_template();
    let mask = embed(&template, 80, 50, 10, 5);
    let cfg = MatchConfig {
        max_offset: 0,
        offset_scale_step: 0.25,
        min_offset_scale: 0.5,
        output_width: 800,
        ..config()
    };
    // 800 / 1000 = 0.8 leaves only the full scale.
    let outcome = search_mask(&mask, 1000, &template, &cfg, None).unwrap();
    assert_eq!(outcome.runs, 1);
}

#[test]
fn context_window_prunes_placements() {
    let template = outline_template();
    let mask = embed(&template, 80, 50, 10, 5);
    let cfg = config();

    let free = search_mask(&mask, SOURCE_WIDTH, &template, &cfg, None).unwrap();
    let centred = search_mask(
        &mask,
        SOURCE_WIDTH,
        &template,
        &cfg,
        Some(MatchContext::default()),
    )
    .unwrap();
    assert_eq!(free, centred);

    let shifted = search_mask(
        &mask,
        SOURCE_WIDTH,
        &template,
        &cfg,
        Some(MatchContext {
            offset_x: 15,
            offset_y: 0,
        }),
    )
    .unwrap();
    assert!(shifted.runs > 0);
    assert!(shifted.runs < free.runs);

    let impossible = search_mask(
        &mask,
        SOURCE_WIDTH,
        &template,
        &cfg,
        Some(MatchContext {
            offset_x: 1_000,
            offset_y: 0,
        }),
    )
    .unwrap();
    assert_eq!(impossible.runs, 0);
    assert_eq!(impossible.best.percentage, 0.0);
}

#[test]
fn rejects_invalid_configuration() {
    let template = outline_template();
    let mask = template.mask().clone();
    let cfg = MatchConfig {
        offset_x_step: 0,
        ..config()
    };
    assert!(matches!(
        search_mask(&mask, SOURCE_WIDTH, &template, &cfg, None),
        Err(FrameMatchError::InvalidInput(_))
    ));
    assert!(matches!(
        search_mask(&mask, 0, &template, &config(), None),
        Err(FrameMatchError::InvalidDimensions { .. })
    ));
}
