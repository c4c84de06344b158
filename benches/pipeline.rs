//! Benchmarks for the xstitch pipeline.

use std::fs;
use std::path::PathBuf;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{Rgb, RgbImage};

use xstitch::{
    parse_palette, pixelate, quantize, BitmapFont, Filter, Palette, PatternRenderer,
};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn load_palette() -> Palette {
    let source = fs::read_to_string(fixtures_dir().join("threads.txt")).unwrap();
    parse_palette(&source).unwrap()
}

/// A smooth colour field with some texture.
fn photo(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width) as u8,
            (y * 255 / height) as u8,
            ((x ^ y) & 0xff) as u8,
        ])
    })
}

// -- Parsing benchmarks --

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");

    let source = fs::read_to_string(fixtures_dir().join("threads.txt")).unwrap();
    let large: String = Palette::stepped(0x55).unwrap().to_string();

    group.bench_function("parse_palette_fixture", |b| {
        b.iter(|| parse_palette(black_box(&source)).unwrap())
    });

    group.bench_function("parse_palette_64", |b| {
        b.iter(|| parse_palette(black_box(&large)).unwrap())
    });

    group.finish();
}

// -- Quantization benchmarks --

fn bench_quantize(c: &mut Criterion) {
    let mut group = c.benchmark_group("quantize");

    let palette = load_palette();
    let image = photo(100, 100);

    group.bench_function("nearest_100x100", |b| {
        b.iter(|| quantize(black_box(&image), &palette, false).unwrap())
    });

    group.bench_function("dither_100x100", |b| {
        b.iter(|| quantize(black_box(&image), &palette, true).unwrap())
    });

    group.finish();
}

// -- Resampling and rendering benchmarks --

fn bench_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("rendering");

    let palette = load_palette();
    let source = photo(800, 600);

    group.bench_function("pixelate_800x600_to_100", |b| {
        b.iter(|| pixelate(black_box(&source), 100, Filter::default()).unwrap())
    });

    let grid = quantize(&photo(60, 40), &palette, false).unwrap();
    let font = BitmapFont;
    let renderer = PatternRenderer::new(&font, 16, 1).unwrap();

    group.bench_function("charts_60x40_cell16", |b| {
        b.iter(|| renderer.render(black_box(&grid), &palette).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_parsing, bench_quantize, bench_rendering);
criterion_main!(benches);
