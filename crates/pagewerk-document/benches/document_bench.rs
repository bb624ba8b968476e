// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the pagewerk-document crate. Measures the blocking
// half of a resize (decode, render, encode) on a synthetic 800x600 image in
// each fit mode, and the embedding decode used by images-to-PDF.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

use pagewerk_core::{FitMode, OutputFormat, ResizeOptions};
use pagewerk_document::DataUrl;
use pagewerk_document::image::resize::resize_bytes;
use pagewerk_document::pdf::writer::EmbeddedImage;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// 800x600 gradient encoded as PNG, so the decoder does real work.
fn gradient_png() -> Vec<u8> {
    let img = RgbImage::from_fn(800, 600, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    let mut buffer = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut buffer), ImageFormat::Png)
        .expect("encode fixture");
    buffer
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_resize_modes(c: &mut Criterion) {
    let data = gradient_png();

    for (label, mode) in [("fill", FitMode::Fill), ("cover", FitMode::Cover)] {
        let options = ResizeOptions {
            width: Some(320),
            height: Some(320),
            mode,
            format: OutputFormat::Jpeg,
            ..ResizeOptions::default()
        };
        c.bench_function(&format!("resize {label} 800x600 -> 320x320"), |b| {
            b.iter(|| {
                let out = resize_bytes(black_box(&data), &options).expect("resize");
                black_box(out);
            });
        });
    }
}

fn bench_embed_decode(c: &mut Criterion) {
    let url = DataUrl::from_bytes("image/png", gradient_png());

    c.bench_function("embed decode 800x600 png", |b| {
        b.iter(|| {
            let image = EmbeddedImage::decode(black_box(&url)).expect("decode");
            black_box(image.width());
        });
    });
}

criterion_group!(benches, bench_resize_modes, bench_embed_decode);
criterion_main!(benches);
