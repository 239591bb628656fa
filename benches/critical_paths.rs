//! Criterion benchmarks for Lopix critical paths
//!
//! Benchmarks the core performance-critical operations:
//! - Parser: text frame and animation decoding
//! - Serializer: canonical text encoding
//! - Binary: fixed-layout frame decoding
//! - Renderer: frame to image materialization and upscaling

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lopix::animation::Animation;
use lopix::binary;
use lopix::color::Color;
use lopix::frame::Frame;
use lopix::grid::Grid;
use lopix::output::scale_image;
use lopix::palette::Palette;

// =============================================================================
// Test Data Generators
// =============================================================================

fn bench_palette() -> Palette {
    let mut palette = Palette::default();
    for i in 0..16u8 {
        palette[i] = Color::from_rgba(i * 16, i * 8, 255 - i * 16, 0xff);
    }
    palette
}

/// Generate a square grid cycling through all 16 indices
fn make_grid(side: usize) -> Grid {
    let cells = (0..side * side).map(|i| (i % 16) as u8).collect();
    Grid::from_cells(side, side, cells).expect("cells are in range")
}

fn make_frame(side: usize) -> Frame {
    Frame::new(bench_palette(), make_grid(side)).expect("side is within limits")
}

fn make_animation(side: usize, frames: usize) -> Animation {
    let grids = (0..frames).map(|_| make_grid(side)).collect();
    Animation::with_uniform_delay(side, side, bench_palette(), 10, grids)
        .expect("animation is within limits")
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for side in [8, 32, 99] {
        let text = make_frame(side).to_text();
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("frame", side), &text, |b, text| {
            b.iter(|| Frame::parse(black_box(text.as_bytes())))
        });
    }

    let text = make_animation(32, 24).to_text();
    group.throughput(Throughput::Bytes(text.len() as u64));
    group.bench_function("animation_32x32x24", |b| {
        b.iter(|| Animation::parse(black_box(text.as_bytes())))
    });
    group.finish();
}

fn bench_serialize(c: &mut Criterion) {
    let frame = make_frame(99);
    c.bench_function("serialize/frame_99", |b| b.iter(|| black_box(&frame).to_text()));

    let animation = make_animation(32, 24);
    c.bench_function("serialize/animation_32x32x24", |b| {
        b.iter(|| black_box(&animation).to_text())
    });
}

fn bench_binary(c: &mut Criterion) {
    let bytes = binary::to_bytes(&make_frame(99));
    c.bench_function("binary/read_frame_99", |b| {
        b.iter(|| binary::read_frame(black_box(bytes.as_slice())))
    });
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let frame = make_frame(99);
    group.bench_function("to_image_99", |b| b.iter(|| black_box(&frame).to_image()));
    for scale in [1u32, 4, 16] {
        group.bench_with_input(BenchmarkId::new("scale", scale), &scale, |b, &scale| {
            b.iter(|| scale_image(frame.to_image(), black_box(scale)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_serialize, bench_binary, bench_render);
criterion_main!(benches);
