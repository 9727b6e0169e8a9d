use framematch::config::STORED_EDGES_WIDTH;
use framematch::{
    extract_edges, Detection, DetectionMode, DetectionSettings, EdgeMask, ExtractWidths,
    FrameMatchError,
};
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;

fn square_scene(width: u32, height: u32) -> DynamicImage {
    let mut img = GrayImage::new(width, height);
    let side = width / 3;
    let rect = Rect::at((width / 3) as i32, (height / 2 - side / 2) as i32).of_size(side, side);
    draw_filled_rect_mut(&mut img, rect, Luma([255u8]));
    DynamicImage::ImageLuma8(img)
}

fn settings(mode: DetectionMode) -> DetectionSettings {
    DetectionSettings {
        mode,
        ..DetectionSettings::default()
    }
}

fn edges_near(mask: &EdgeMask, x: usize, y: usize, radius: usize) -> bool {
    (y.saturating_sub(radius)..=y + radius).any(|yy| {
        (x.saturating_sub(radius)..=x + radius).any(|xx| mask.get(xx, yy) == Some(true))
    })
}

#[test]
fn black_photo_yields_empty_canonical_mask() {
    let black = DynamicImage::ImageRgb8(RgbImage::from_pixel(600, 800, Rgb([0, 0, 0])));
    for mode in [DetectionMode::Canny, DetectionMode::Threshold] {
        let mask = extract_edges(
            &black,
            &settings(mode).detection(),
            ExtractWidths::default(),
        )
        .unwrap();
        assert_eq!(mask.width(), STORED_EDGES_WIDTH);
        assert_eq!(mask.len(), STORED_EDGES_WIDTH * (STORED_EDGES_WIDTH * 800 / 600));
        assert_eq!(mask.count_edges(), 0);
    }
}

#[test]
fn canny_traces_the_square_outline() {
    let scene = square_scene(300, 200);
    let mask = extract_edges(
        &scene,
        &settings(DetectionMode::Canny).detection(),
        ExtractWidths::default(),
    )
    .unwrap();
    assert_eq!((mask.width(), mask.height()), (300, 200));
    // Left side of the square at x = 100, centre row.
    assert!(edges_near(&mask, 100, 100, 2));
    assert!(!edges_near(&mask, 150, 100, 10));
    assert!(!edges_near(&mask, 20, 20, 5));
}

#[test]
fn threshold_keeps_only_region_boundaries() {
    let scene = square_scene(300, 200);
    let mask = extract_edges(
        &scene,
        &settings(DetectionMode::Threshold).detection(),
        ExtractWidths::default(),
    )
    .unwrap();
    assert!(mask.count_edges() > 0);
    assert!(edges_near(&mask, 100, 100, 3));
    assert_eq!(mask.get(150, 100), Some(false));
    assert!(mask.count_edges() < 100 * 100 / 2);
}

#[test]
fn storage_width_differs_from_detection_width() {
    let scene = square_scene(600, 400);
    let widths = ExtractWidths {
        detection_width: 300,
        stored_width: 150,
    };
    let mask = extract_edges(&scene, &settings(DetectionMode::Canny).detection(), widths).unwrap();
    assert_eq!((mask.width(), mask.height()), (150, 100));
    assert!(mask.count_edges() > 0);
}

#[test]
fn joining_never_removes_edges() {
    let scene = square_scene(300, 200);
    let plain = extract_edges(
        &scene,
        &settings(DetectionMode::Canny).detection(),
        ExtractWidths::default(),
    )
    .unwrap();
    let joined_settings = DetectionSettings {
        join_by_x: 5,
        join_by_y: 3,
        ..settings(DetectionMode::Canny)
    };
    let joined = extract_edges(
        &scene,
        &joined_settings.detection(),
        ExtractWidths::default(),
    )
    .unwrap();
    assert!(joined.count_edges() >= plain.count_edges());
}

#[test]
fn manual_mode_cannot_be_extracted() {
    let scene = square_scene(30, 20);
    assert!(matches!(
        extract_edges(&scene, &Detection::Manual, ExtractWidths::default()),
        Err(FrameMatchError::InvalidInput(_))
    ));
}

#[test]
fn threshold_traces_outer_and_hole_borders() {
    // 600x400 photo, detected at 300 wide: ring centred at (150, 100) with
    // radii 75 and 35 on the mask
    let mut img = GrayImage::new(600, 400);
    draw_filled_circle_mut(&mut img, (300, 200), 150, Luma([255u8]));
    draw_filled_circle_mut(&mut img, (300, 200), 70, Luma([0u8]));
    let mask = extract_edges(
        &DynamicImage::ImageLuma8(img),
        &settings(DetectionMode::Threshold).detection(),
        ExtractWidths::default(),
    )
    .unwrap();
    assert_eq!((mask.width(), mask.height()), (300, 200));

    for (x, y) in [(225, 100), (75, 100), (150, 25), (150, 175)] {
        assert!(edges_near(&mask, x, y, 3), "outer border missing near ({x}, {y})");
    }
    for (x, y) in [(185, 100), (115, 100), (150, 65), (150, 135)] {
        assert!(edges_near(&mask, x, y, 3), "hole border missing near ({x}, {y})");
    }
    assert!(!edges_near(&mask, 150, 100, 15));
    assert!(!edges_near(&mask, 205, 100, 5));
}
