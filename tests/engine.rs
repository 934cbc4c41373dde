use domain_viz_wasm::catalog::ArchetypeKind;
use domain_viz_wasm::config::{EngineConfig, EngineProps};
use domain_viz_wasm::error::VizError;
use domain_viz_wasm::host::Engine;
use domain_viz_wasm::pipeline::{HeadlessBackend, PASSES};
use domain_viz_wasm::pointer::PointerState;
use glam::Vec2;

const DT: f32 = 1.0 / 60.0;

fn engine(domain_index: i64) -> Engine<HeadlessBackend> {
    let config = EngineConfig {
        seed: Some(7),
        ..EngineConfig::default()
    };
    let props = EngineProps {
        domain_index,
        background_media_url: "media/ai.mp4".into(),
    };
    let mut engine = Engine::new(HeadlessBackend::new(), config, &props, PointerState::new());
    engine.resize(800.0, 600.0, 1.0);
    engine
}

#[test]
fn frame_runs_passes_in_order() {
    let mut engine = engine(0);
    let stats = engine.step(DT);
    assert_eq!(engine.backend().last_passes(), &PASSES);
    assert!(stats.scene.draw_calls > 0);
    assert_eq!(stats.draw_calls(), stats.scene.draw_calls + 5);
    assert_eq!(engine.backend().frames(), 1);
}

#[test]
fn initial_domain_is_built_on_first_tick() {
    let mut engine = engine(6);
    assert!(engine.controller().lifecycle().live_model().is_none());
    engine.step(DT);
    let model = engine.controller().lifecycle().live_model().expect("live model");
    assert_eq!(model.kind(), ArchetypeKind::Analytics);
    assert_eq!(engine.controller().overlay().selected(), Some(6));
}

#[test]
fn unchanged_index_does_not_restart_fade() {
    let mut engine = engine(1);
    for _ in 0..120 {
        engine.step(DT);
    }
    assert_eq!(engine.controller().lifecycle().fade_progress(), 1.0);
    engine.set_domain_index(1);
    assert!(!engine.controller().has_pending_switch());
    engine.step(DT);
    assert_eq!(engine.controller().lifecycle().swaps(), 1);
}

#[test]
fn switches_within_a_frame_collapse() {
    let mut engine = engine(0);
    engine.step(DT);
    engine.set_domain_index(4);
    engine.set_domain_index(5);
    engine.step(DT);
    let lifecycle = engine.controller().lifecycle();
    assert_eq!(lifecycle.swaps(), 2);
    assert_eq!(lifecycle.selected(), Some(5));
    assert_eq!(engine.backend().double_releases(), 0);
}

#[test]
fn long_frames_are_clamped() {
    let mut engine = engine(0);
    engine.step(5.0);
    assert!((engine.controller().elapsed() - 0.1).abs() < 1e-6);
    engine.step(f32::NAN);
    engine.step(-1.0);
    assert!((engine.controller().elapsed() - 0.1).abs() < 1e-6);
}

#[test]
fn timestamps_drive_delta() {
    let mut engine = engine(0);
    engine.frame(1000.0);
    assert_eq!(engine.controller().elapsed(), 0.0);
    engine.frame(1050.0);
    assert!((engine.controller().elapsed() - 0.05).abs() < 1e-5);
}

#[test]
fn pointer_is_read_every_tick() {
    let pointer = PointerState::new();
    let mut engine = Engine::new(HeadlessBackend::new(), EngineConfig::default(), &EngineProps::default(), pointer.clone());
    engine.step(DT);
    let still = engine.controller().camera().pose().position;
    pointer.set(Vec2::new(1.0, 0.0));
    engine.step(DT);
    let moved = engine.controller().camera().pose().position;
    assert!(moved.x > still.x);
}

#[test]
fn background_crossfades_on_change_only() {
    let mut engine = engine(0);
    assert_eq!(engine.backdrop().current(), Some("media/ai.mp4"));
    engine.set_background_media_url("media/ai.mp4");
    assert_eq!(engine.backdrop().previous(), None);

    engine.set_background_media_url("media/web.mp4");
    assert_eq!(engine.backdrop().previous(), Some("media/ai.mp4"));
    assert!(engine.backdrop().is_fading());
    for _ in 0..20 {
        engine.step(0.1);
    }
    assert!(!engine.backdrop().is_fading());
    assert_eq!(engine.backdrop().previous(), None);
    assert_eq!(engine.backdrop().current_opacity(), 1.0);
}

#[test]
fn shutdown_releases_everything_once() {
    let mut engine = engine(3);
    for index in [3, 8, 2] {
        engine.set_domain_index(index);
        for _ in 0..10 {
            engine.step(DT);
        }
    }
    let live = engine.controller().overlay().tree().live_resources()
        + engine
            .controller()
            .lifecycle()
            .live_model()
            .map_or(0, |m| m.live_resources());
    let before = engine.backend().released().len();

    engine.shutdown();
    assert_eq!(engine.backend().released().len(), before + live);
    assert_eq!(engine.backend().resident(), 0);
    assert_eq!(engine.backend().double_releases(), 0);

    engine.shutdown();
    assert_eq!(engine.backend().released().len(), before + live);
    assert_eq!(engine.step(DT), Default::default());
    assert!(engine.is_shut_down());
}

#[test]
fn options_parse_with_defaults() {
    let config = EngineConfig::from_json(
        r#"{"fade":{"duration":0.5},"seed":42,"post":{"bloom":{"threshold":0.7}},"surface":{"maxPixelRatio":1.5}}"#,
    )
    .expect("valid options");
    assert_eq!(config.fade.duration, 0.5);
    assert_eq!(config.fade.rate(), 2.0);
    assert_eq!(config.seed, Some(42));
    assert_eq!(config.post.bloom.threshold, 0.7);
    assert_eq!(config.post.bloom.intensity, 1.1);
    assert_eq!(config.surface.max_pixel_ratio, 1.5);
    assert_eq!(config.camera.fov_y_degrees, 45.0);

    let empty = EngineConfig::from_json("{}").expect("empty options");
    assert_eq!(empty.seed, None);
    assert_eq!(empty.overlay.anchor_radius, 4.2);

    assert!(matches!(EngineConfig::from_json("{not json"), Err(VizError::Config(_))));
}

#[test]
fn instant_fade_completes_in_one_tick() {
    let config = EngineConfig::from_json(r#"{"fade":{"duration":0}}"#).expect("options");
    let mut engine = Engine::new(HeadlessBackend::new(), config, &EngineProps::default(), PointerState::new());
    engine.step(DT);
    assert_eq!(engine.controller().lifecycle().fade_progress(), 1.0);
}
