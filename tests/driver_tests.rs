//! End-to-end driver tests on the canvas renderer.

use betspot_glow::config::{resolve_effective_path_config, EllipseConfig, GlobalConfig, PathConfig};
use betspot_glow::driver::{AnimationDriver, FixedStepScheduler, FrameScheduler, TickOutcome};
use betspot_glow::geometry::{AnchorRect, Projection, VertexLabel};
use betspot_glow::paths::{PathShape, SegmentRun};
use betspot_glow::render::{
    CanvasRenderer, ImageCanvas, RenderError, RendererAdapter, SegmentStyle,
};
use betspot_glow::timing::{Easing, EasingSet, PhaseState};
use std::cell::Cell;
use std::rc::Rc;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn canvas_driver(config: GlobalConfig, size: u32) -> AnimationDriver<CanvasRenderer> {
    AnimationDriver::new(config, CanvasRenderer::new(ImageCanvas::new(size, size).unwrap()))
}

fn scenario_config() -> GlobalConfig {
    GlobalConfig {
        animation_time_ms: 1200.0,
        length: 100.0,
        ellipse: EllipseConfig {
            a: Some(141.42),
            b: Some(12.0),
        },
        easing: EasingSet::uniform(Easing::Linear),
        ..Default::default()
    }
    .with_paths(vec![PathConfig::spark(1, "BR", "TL")])
}

fn scenario_anchor() -> AnchorRect {
    AnchorRect::centered([500.0, 500.0], 200.0, 200.0)
}

#[test]
fn test_end_to_end_spark_scenario() {
    init_logging();
    let config = scenario_config();
    let rect = scenario_anchor();
    let mut driver = canvas_driver(config.clone(), 1000);
    driver.start();

    // t = 0: head sits on the BR vertex
    assert_eq!(driver.tick(0.0, Some(rect)).unwrap(), TickOutcome::Continue);
    let geometry = driver.store().get(1).and_then(|m| m.geometry.clone()).unwrap();
    let br = VertexLabel::BottomRight.screen_position(&rect);
    assert_eq!(br, [600.0, 600.0]);
    let head = geometry.position(0.0);
    assert!((head[0] - br[0]).abs() < 0.05 && (head[1] - br[1]).abs() < 0.05);

    // t = 600ms: head is well along the arc but not yet at TL
    let eff = resolve_effective_path_config(&config, &config.paths[0], Some(&rect));
    let params = eff.phase_params(geometry.total_length());
    let mid = PhaseState::compute(0.6, &params, eff.easing);
    assert!(mid.head > 0.4 && mid.head < 1.0, "head phase {}", mid.head);
    let quarter = PhaseState::compute(0.3, &params, eff.easing);
    let tl = VertexLabel::TopLeft.screen_position(&rect);
    let dist = |p: [f32; 2], q: [f32; 2]| (p[0] - q[0]).hypot(p[1] - q[1]);
    assert!(dist(geometry.position(mid.head), br) > dist(geometry.position(quarter.head), br));
    assert!(dist(geometry.position(mid.head), tl) > 10.0);

    // Step to 1380ms in 10ms frames
    let mut scheduler = FixedStepScheduler::new(10.0);
    scheduler.next_frame();
    let mut outcome = TickOutcome::Continue;
    while let Some(ts) = scheduler.next_frame() {
        if ts > 1380.0 {
            break;
        }
        outcome = driver.tick(ts, Some(rect)).unwrap();
        if outcome != TickOutcome::Continue {
            break;
        }
    }
    assert_eq!(outcome, TickOutcome::Completed);
    assert!(driver.elapsed() >= 1.2 && driver.elapsed() <= 1.38 + 1e-6);
    assert!(PhaseState::compute(1.38, &params, eff.easing).complete);
    assert!(driver.renderer().pixels().iter().all(|&b| b == 0));
}

#[test]
fn test_completion_fires_once_after_latest_path() {
    init_logging();
    let config = GlobalConfig::default().with_paths(vec![
        PathConfig::spark(1, "TR", "BL"),
        PathConfig::spark(2, "BL", "TR").with_delay(400.0),
    ]);
    let rect = AnchorRect::centered([150.0, 150.0], 100.0, 100.0);
    let mut driver = canvas_driver(config.clone(), 300);

    let fired = Rc::new(Cell::new(0u32));
    let counter = fired.clone();
    driver.on_complete(move || counter.set(counter.get() + 1));

    let mut scheduler = FixedStepScheduler::new(16.0).with_limit(1000);
    let mut anchor = rect;
    let outcome = driver.run(&mut scheduler, &mut anchor).unwrap();
    assert_eq!(outcome, TickOutcome::Completed);
    assert_eq!(fired.get(), 1);

    // The later path finished its fade window on the final frame, not before
    let later = &config.paths[1];
    let eff = resolve_effective_path_config(&config, later, Some(&rect));
    let length = driver.store().get(2).unwrap().total_length();
    let params = eff.phase_params(length);
    let end = driver.elapsed() as f32;
    assert!(end >= 0.4 + 1.2);
    assert!(PhaseState::compute(end, &params, eff.easing).complete);
    assert!(!PhaseState::compute(end - 0.016, &params, eff.easing).complete);

    // Further ticks do nothing and never re-fire
    for ts in [20_000.0, 20_016.0] {
        assert_eq!(driver.tick(ts, Some(rect)).unwrap(), TickOutcome::Stopped);
    }
    assert_eq!(fired.get(), 1);
}

#[test]
fn test_restart_replays_from_zero() {
    let mut driver = canvas_driver(scenario_config(), 1000);
    let mut scheduler = FixedStepScheduler::new(16.0).with_limit(1000);
    let mut anchor = scenario_anchor();
    assert_eq!(driver.run(&mut scheduler, &mut anchor).unwrap(), TickOutcome::Completed);

    driver.start();
    assert!(driver.is_running());
    assert_eq!(driver.elapsed(), 0.0);
    assert_eq!(driver.tick(50_000.0, Some(scenario_anchor())).unwrap(), TickOutcome::Continue);
}

#[test]
fn test_set_config_rebuilds_changed_paths_only() {
    let config = GlobalConfig::default().with_paths(vec![
        PathConfig::spark(1, "TR", "BL"),
        PathConfig::line(2, 0.0),
    ]);
    let rect = AnchorRect::centered([150.0, 150.0], 100.0, 100.0);
    let mut driver = canvas_driver(config.clone(), 300);
    driver.start();
    driver.tick(0.0, Some(rect)).unwrap();
    assert_eq!(driver.store().rebuild_count(), 2);

    let mut changed = config;
    changed.paths[1].coverage = Some(180.0);
    driver.set_config(changed);
    driver.tick(16.0, Some(rect)).unwrap();
    assert_eq!(driver.store().rebuild_count(), 3);
}

/// Canvas renderer that counts `release` calls.
struct CountingRenderer {
    inner: CanvasRenderer,
    releases: Rc<Cell<u32>>,
}

impl RendererAdapter for CountingRenderer {
    fn projection(&self) -> Projection {
        self.inner.projection()
    }

    fn size(&self) -> (u32, u32) {
        self.inner.size()
    }

    fn begin_frame(&mut self) -> Result<(), RenderError> {
        self.inner.begin_frame()
    }

    fn draw_segment(
        &mut self,
        run: &SegmentRun,
        style: &SegmentStyle,
        alpha: f32,
    ) -> Result<(), RenderError> {
        self.inner.draw_segment(run, style, alpha)
    }

    fn end_frame(&mut self) -> Result<(), RenderError> {
        self.inner.end_frame()
    }

    fn clear(&mut self) -> Result<(), RenderError> {
        self.inner.clear()
    }

    fn pixels(&self) -> &[u8] {
        self.inner.pixels()
    }

    fn release(&mut self) {
        self.releases.set(self.releases.get() + 1);
        self.inner.release();
    }

    fn is_released(&self) -> bool {
        self.inner.is_released()
    }
}

#[test]
fn test_drop_releases_renderer_once() {
    let releases = Rc::new(Cell::new(0u32));
    let renderer = CountingRenderer {
        inner: CanvasRenderer::new(ImageCanvas::new(64, 64).unwrap()),
        releases: releases.clone(),
    };
    let mut driver = AnimationDriver::new(scenario_config(), renderer);
    driver.start();
    driver.tick(0.0, Some(scenario_anchor())).unwrap();
    driver.stop().unwrap();
    driver.stop().unwrap();
    assert!(!driver.is_running());
    assert!(!driver.renderer().is_released());
    assert_eq!(releases.get(), 0);

    drop(driver);
    assert_eq!(releases.get(), 1);
}

#[test]
fn test_no_enabled_paths_keeps_running_without_callback() {
    let disabled = PathConfig {
        enabled: Some(false),
        ..PathConfig::spark(1, "BR", "TL")
    };
    for paths in [Vec::new(), vec![disabled]] {
        let mut driver = canvas_driver(GlobalConfig::default().with_paths(paths), 64);
        let fired = Rc::new(Cell::new(0u32));
        let counter = fired.clone();
        driver.on_complete(move || counter.set(counter.get() + 1));

        let mut scheduler = FixedStepScheduler::new(100.0).with_limit(60);
        let mut anchor = AnchorRect::centered([32.0, 32.0], 20.0, 20.0);
        let outcome = driver.run(&mut scheduler, &mut anchor).unwrap();

        assert_eq!(outcome, TickOutcome::Continue);
        assert_eq!(driver.frame_count(), 60);
        assert!(driver.is_running());
        assert_eq!(fired.get(), 0);
    }
}
