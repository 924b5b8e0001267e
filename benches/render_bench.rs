//! Benchmarks for the canvas and shader renderers.

use betspot_glow::paths::{SamplePoint, SegmentRun, SEGMENT_SAMPLES};
use betspot_glow::render::{Renderer, RendererAdapter, SegmentStyle, ShaderRenderer};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn diagonal_run(width: u32, height: u32) -> SegmentRun {
    let (w, h) = (width as f32, height as f32);
    SegmentRun {
        points: (0..=SEGMENT_SAMPLES)
            .map(|i| {
                let along = i as f32 / SEGMENT_SAMPLES as f32;
                SamplePoint {
                    position: [w * (0.2 + 0.6 * along), h * (0.3 + 0.4 * along)],
                    along,
                }
            })
            .collect(),
    }
}

fn render_frame(renderer: &mut impl RendererAdapter, run: &SegmentRun, style: &SegmentStyle) {
    if renderer.begin_frame().is_err() {
        return;
    }
    let _ = renderer.draw_segment(run, style, 0.9);
    let _ = renderer.end_frame();
}

fn bench_canvas_resolutions(c: &mut Criterion) {
    let mut group = c.benchmark_group("Canvas Resolutions");
    group.sample_size(20);

    let resolutions = [("480p", 854, 480), ("720p", 1280, 720), ("1080p", 1920, 1080)];
    let style = SegmentStyle::default();

    for (name, width, height) in resolutions {
        let mut renderer = match Renderer::canvas(width, height) {
            Ok(r) => r,
            Err(_) => continue,
        };
        let run = diagonal_run(width, height);

        group.bench_function(BenchmarkId::new("frame", name), |b| {
            b.iter(|| {
                render_frame(&mut renderer, &run, &style);
                black_box(renderer.pixels().len());
            });
        });
    }

    group.finish();
}

fn bench_glow_radius(c: &mut Criterion) {
    let mut group = c.benchmark_group("Glow Radius");
    let run = diagonal_run(800, 600);

    for glow_radius in [5.0f32, 20.0, 60.0] {
        let mut renderer = match Renderer::canvas(800, 600) {
            Ok(r) => r,
            Err(_) => continue,
        };
        let style = SegmentStyle {
            glow_radius,
            ..Default::default()
        };

        group.bench_function(BenchmarkId::new("canvas", glow_radius), |b| {
            b.iter(|| render_frame(&mut renderer, &run, &style));
        });
    }

    group.finish();
}

fn bench_shader_frame(c: &mut Criterion) {
    let _ = env_logger::try_init();

    let mut renderer = match pollster::block_on(ShaderRenderer::new(1280, 720)) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Skipping GPU benchmarks: {}", e);
            return;
        }
    };
    let run = diagonal_run(1280, 720);
    let style = SegmentStyle::default();

    // Warm up so pipeline compilation is not measured.
    render_frame(&mut renderer, &run, &style);

    c.bench_function("shader_frame_720p", |b| {
        b.iter(|| {
            render_frame(&mut renderer, &run, &style);
            black_box(renderer.pixels().len());
        });
    });
}

criterion_group!(
    benches,
    bench_canvas_resolutions,
    bench_glow_radius,
    bench_shader_frame
);
criterion_main!(benches);
