use domain_viz_wasm::config::{EngineConfig, EngineProps};
use domain_viz_wasm::host::Engine;
use domain_viz_wasm::pipeline::HeadlessBackend;
use domain_viz_wasm::pointer::PointerState;

fn engine() -> Engine<HeadlessBackend> {
    Engine::new(
        HeadlessBackend::new(),
        EngineConfig::default(),
        &EngineProps::default(),
        PointerState::new(),
    )
}

#[test]
fn resize_tracks_container_aspect() {
    let mut engine = engine();
    // wide, then tall, then odd sizes at fractional ratios
    for &(w, h, ratio) in &[(1920.0, 1080.0, 1.0), (1080.0, 1920.0, 1.0), (333.0, 777.0, 1.5), (1280.0, 541.0, 2.0)] {
        engine.resize(w, h, ratio);
        let size = engine.backend().size().expect("backend sized");
        assert_eq!(size.pixel_width(), (w * ratio).round() as u32);
        assert_eq!(size.pixel_height(), (h * ratio).round() as u32);

        let aspect = engine.controller().camera().camera().aspect;
        assert!((aspect - w / h).abs() < 1e-6, "aspect {aspect} for {w}x{h}");
    }
}

#[test]
fn pixel_ratio_is_capped() {
    let mut engine = engine();
    engine.resize(400.0, 300.0, 3.0);
    let size = engine.surface().expect("surface");
    assert_eq!(size.pixel_ratio, 2.0);
    assert_eq!((size.pixel_width(), size.pixel_height()), (800, 600));
}

#[test]
fn zero_sized_container_keeps_last_aspect() {
    let mut engine = engine();
    engine.resize(800.0, 400.0, 1.0);
    engine.resize(0.0, 0.0, 1.0);
    let size = engine.surface().expect("surface");
    assert_eq!((size.pixel_width(), size.pixel_height()), (1, 1));
    assert!((engine.controller().camera().camera().aspect - 2.0).abs() < 1e-6);
}
