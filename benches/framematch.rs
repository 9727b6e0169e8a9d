use criterion::{criterion_group, criterion_main, Criterion};
use framematch::{
    search_mask, DetectionSettings, EdgeMask, EdgedImage, ImageLibrary, MatchConfig, Template,
    TemplateShape, TemplateSpec,
};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use std::fs;
use std::hint::black_box;

fn make_mask(width: usize, height: usize) -> EdgeMask {
    let mut mask = EdgeMask::new(width, height).unwrap();
    for y in 0..height {
        for x in 0..width {
            let value = ((x * 13) ^ (y * 7) ^ (x * y)) & 0x1F;
            mask.set(x, y, value == 0);
        }
    }
    mask
}

fn bench_search(c: &mut Criterion) {
    let mask = make_mask(300, 200);
    let template = Template::draw(&TemplateSpec {
        shape: TemplateShape::Rectangle {
            width: 300,
            height: 200,
        },
        line_width: 3,
        ..TemplateSpec::default()
    })
    .unwrap();
    let cfg = MatchConfig {
        output_width: 600,
        ..MatchConfig::default()
    };

    c.bench_function("search_mask_300x200", |b| {
        b.iter(|| {
            let outcome = search_mask(
                black_box(&mask),
                black_box(3000),
                black_box(&template),
                black_box(&cfg),
                None,
            )
            .unwrap();
            black_box(outcome);
        })
    });

    let images: Vec<EdgedImage> = (0..8)
        .map(|i| {
            EdgedImage::new(
                format!("photo-{i}.jpg"),
                3000,
                2000,
                make_mask(300, 200 + i),
                DetectionSettings::default(),
            )
            .unwrap()
        })
        .collect();
    c.bench_function("edged_image_match_8", |b| {
        b.iter(|| {
            for image in &images {
                black_box(image.match_to(&template, &cfg, None).unwrap());
            }
        })
    });
}

fn bench_library(c: &mut Criterion) {
    let dir = std::env::temp_dir().join(format!("framematch-bench-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    for i in 0..6u32 {
        let mut photo = RgbImage::from_pixel(1200, 800, Rgb([20, 20, 20]));
        let rect = Rect::at(200 + 40 * i as i32, 150).of_size(600, 400);
        draw_filled_rect_mut(&mut photo, rect, Rgb([230, 230, 230]));
        photo.save(dir.join(format!("{i:02}.png"))).unwrap();
    }
    let mut library = ImageLibrary::generate(&dir).unwrap();
    let template = Template::draw(&TemplateSpec::default()).unwrap();
    let cfg = MatchConfig {
        output_width: 600,
        ..MatchConfig::default()
    };

    c.bench_function("library_match_6", |b| {
        b.iter(|| black_box(library.match_to(&template, &cfg, None).unwrap()))
    });
    let _ = fs::remove_dir_all(&dir);
}

criterion_group!(benches, bench_search, bench_library);
criterion_main!(benches);
