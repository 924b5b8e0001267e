//! Shader renderer tests. Each test returns early when no GPU adapter exists.

use betspot_glow::geometry::Projection;
use betspot_glow::paths::{SamplePoint, SegmentRun};
use betspot_glow::render::{
    CanvasRenderer, ImageCanvas, RenderError, Renderer, RendererAdapter, RendererKind,
    SegmentStyle, ShaderRenderer,
};

const SIZE: u32 = 128;

async fn shader() -> Option<ShaderRenderer> {
    match ShaderRenderer::new(SIZE, SIZE).await {
        Ok(r) => Some(r),
        Err(e) => {
            eprintln!("Skipping GPU test: {}", e);
            None
        }
    }
}

fn diagonal_run() -> SegmentRun {
    SegmentRun {
        points: (0..=50)
            .map(|i| {
                let along = i as f32 / 50.0;
                SamplePoint {
                    position: [24.0 + 80.0 * along, 30.0 + 60.0 * along],
                    along,
                }
            })
            .collect(),
    }
}

fn draw(renderer: &mut impl RendererAdapter, alpha: f32) {
    renderer.begin_frame().unwrap();
    renderer
        .draw_segment(&diagonal_run(), &SegmentStyle::default(), alpha)
        .unwrap();
    renderer.end_frame().unwrap();
}

#[tokio::test]
async fn test_shader_renders_segment() {
    let Some(mut renderer) = shader().await else {
        return;
    };
    assert_eq!(renderer.projection(), Projection::Perspective);
    draw(&mut renderer, 1.0);
    assert!(renderer.has_pipeline());

    let pixels = renderer.pixels();
    assert_eq!(pixels.len(), (SIZE * SIZE * 4) as usize);
    assert!(pixels.chunks(4).any(|p| p[3] > 0));
    // Corner far from the run stays transparent
    assert_eq!(&pixels[0..4], &[0, 0, 0, 0]);
}

#[tokio::test]
async fn test_shader_matches_canvas() {
    let Some(mut gpu) = shader().await else {
        return;
    };
    let mut cpu = CanvasRenderer::new(ImageCanvas::new(SIZE, SIZE).unwrap());
    draw(&mut gpu, 0.8);
    draw(&mut cpu, 0.8);

    let mut total_diff = 0u64;
    let mut max_diff = 0u8;
    for (a, b) in gpu.pixels().iter().zip(cpu.pixels()) {
        let d = a.abs_diff(*b);
        total_diff += d as u64;
        max_diff = max_diff.max(d);
    }
    let mean = total_diff as f64 / gpu.pixels().len() as f64;
    assert!(mean < 2.0, "mean channel difference {}", mean);
    assert!(max_diff < 64, "max channel difference {}", max_diff);
}

#[tokio::test]
async fn test_shader_clear_and_release() {
    let Some(mut renderer) = shader().await else {
        return;
    };
    draw(&mut renderer, 1.0);
    renderer.clear().unwrap();
    assert!(renderer.pixels().iter().all(|&b| b == 0));

    renderer.release();
    renderer.release();
    assert!(renderer.is_released());
    assert!(!renderer.has_pipeline());
    assert!(matches!(
        renderer.draw_segment(&diagonal_run(), &SegmentStyle::default(), 1.0),
        Err(RenderError::Released)
    ));
}

#[tokio::test]
async fn test_renderer_create_shader_kind() {
    match Renderer::create(RendererKind::Shader, SIZE, SIZE).await {
        Ok(renderer) => assert_eq!(renderer.kind(), RendererKind::Shader),
        Err(e) => eprintln!("Skipping GPU test: {}", e),
    }
}
