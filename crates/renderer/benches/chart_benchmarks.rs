//! Benchmarks for DOC chart rendering.
//!
//! Run with: cargo bench --package renderer --bench chart_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use doc_common::{evaluate, ChartSpec, DocField, SampleGrid};
use renderer::contour::trace_level;
use renderer::png::create_png_auto;
use renderer::{ChartRenderer, ChartStyle, TextRenderer};

fn standard_spec(samples: usize) -> ChartSpec {
    ChartSpec::builder(0.0, 300.0, 0.0, 300.0, 0.15)
        .sample_count(samples)
        .build()
        .unwrap()
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    for samples in [100usize, 500, 1000] {
        let spec = standard_spec(samples);
        group.throughput(Throughput::Elements((samples * samples) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(samples), &spec, |b, spec| {
            b.iter(|| evaluate(black_box(spec)).unwrap())
        });
    }
    group.finish();
}

fn bench_trace_threshold(c: &mut Criterion) {
    let spec = standard_spec(1000);
    let grid = SampleGrid::new(&spec.rpm, &spec.rop, spec.sample_count).unwrap();
    let field = DocField::evaluate(&grid);
    c.bench_function("trace_threshold_1000", |b| {
        b.iter(|| trace_level(black_box(&grid), black_box(&field), 0.15))
    });
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    group.sample_size(20);

    let plain = ChartRenderer::with_text(ChartStyle::default(), TextRenderer::without_font()).unwrap();
    let guided = ChartRenderer::with_text(
        ChartStyle {
            guide_interval: Some(0.05),
            ..ChartStyle::default()
        },
        TextRenderer::without_font(),
    )
    .unwrap();
    let spec = standard_spec(1000);

    group.bench_function("default_1200x800", |b| b.iter(|| plain.render(black_box(&spec)).unwrap()));
    group.bench_function("guides_1200x800", |b| b.iter(|| guided.render(black_box(&spec)).unwrap()));
    group.finish();
}

fn bench_png(c: &mut Criterion) {
    let (w, h) = (1200usize, 800usize);
    let mut pixels = Vec::with_capacity(w * h * 4);
    for y in 0..h {
        for x in 0..w {
            let above = (h - y) as f64 > 0.75 * x as f64;
            pixels.extend_from_slice(if above { &[91, 215, 91, 255] } else { &[255, 255, 51, 255] });
        }
    }
    c.bench_function("png_auto_1200x800", |b| {
        b.iter(|| create_png_auto(black_box(&pixels), w, h).unwrap())
    });
}

criterion_group!(benches, bench_evaluate, bench_trace_threshold, bench_render, bench_png);
criterion_main!(benches);
