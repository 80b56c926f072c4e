// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the infofoto-document crate: pagination planning
// over a long mixed-orientation sequence, and full composition of a small
// report from synthetic photos.

use chrono::{FixedOffset, TimeZone};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, Rgb, RgbImage};

use infofoto_core::{EngineConfig, PhotoInput, ReportMetadata};
use infofoto_document::layout::BoxHeights;
use infofoto_document::{CancellationFlag, ImageProcessor, ReportGenerator, ReportRequest, plan_pages};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Plan 1000 photos in a repeating H, H, V, H pattern.
fn bench_plan_pages(c: &mut Criterion) {
    let pattern = [(1600u32, 1200u32), (1600, 1200), (1200, 1600), (1600, 1200)];
    let photos: Vec<(u32, u32)> = pattern.iter().copied().cycle().take(1000).collect();
    let boxes = BoxHeights::for_usable_height(24.7);

    c.bench_function("plan_pages (1000 photos)", |b| {
        b.iter(|| black_box(plan_pages(black_box(&photos), boxes)));
    });
}

/// Generate a six-photo report from 320x240 and 240x320 synthetic images.
fn bench_generate(c: &mut Criterion) {
    let encode = |w: u32, h: u32| {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb([90, 140, 200])));
        ImageProcessor::from_dynamic(img)
            .to_png_bytes()
            .expect("synthetic image encodes")
    };
    let photos: Vec<PhotoInput> = (0..6)
        .map(|i| {
            let bytes = if i % 3 == 2 { encode(240, 320) } else { encode(320, 240) };
            PhotoInput::new(bytes, Some(format!("Detall {i}")))
        })
        .collect();
    let generator =
        ReportGenerator::with_logo(EngineConfig::default(), None).expect("default config is valid");
    let issued_at = FixedOffset::east_opt(3600)
        .and_then(|tz| tz.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).single())
        .expect("valid timestamp");

    c.bench_function("generate (6 photos)", |b| {
        b.iter(|| {
            let request = ReportRequest {
                photos: photos.clone(),
                metadata: ReportMetadata::default(),
            };
            let output = generator
                .generate_at(request, issued_at, &CancellationFlag::new())
                .expect("report generates");
            black_box(output.bytes);
        });
    });
}

criterion_group!(benches, bench_plan_pages, bench_generate);
criterion_main!(benches);
