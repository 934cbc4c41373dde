use domain_viz_wasm::animation::{animate, scene_time, FrameInput, CLOCK_PERIOD};
use domain_viz_wasm::catalog::{self, Archetype, CATALOG_SIZE};
use domain_viz_wasm::config::EngineConfig;
use domain_viz_wasm::controller::VizController;
use domain_viz_wasm::pointer::PointerState;
use glam::{Mat4, Vec2};

const DT: f32 = 1.0 / 60.0;

#[test]
fn ai_node_pulse_stays_in_range_and_moves() {
    let mut controller = VizController::new(&EngineConfig::default(), 0, PointerState::new(), 17);
    controller.update(0.0);

    let nodes = match controller.lifecycle().live_model().map(|m| m.archetype()) {
        Some(Archetype::Ai(parts)) => parts.nodes.clone(),
        other => panic!("expected ai archetype, got {other:?}"),
    };
    assert!(!nodes.is_empty());

    let sample = |controller: &VizController| -> Vec<f32> {
        let tree = controller.lifecycle().live_model().expect("live model").tree();
        nodes
            .iter()
            .map(|&n| tree.material(n).expect("node material").opacity)
            .collect()
    };

    let mut halfway = Vec::new();
    for frame in 1..=60 {
        controller.update(DT);
        let values = sample(&controller);
        assert!(values.iter().all(|v| (0.0..=1.0).contains(v)), "{values:?}");
        if frame == 30 {
            halfway = values;
        }
    }
    let end = sample(&controller);
    assert!((controller.elapsed() - 1.0).abs() < 1e-3);
    assert!(halfway.iter().zip(&end).any(|(a, b)| (a - b).abs() > 1e-3));
}

#[test]
fn every_archetype_animates_within_bounds() {
    for index in 0..CATALOG_SIZE as i64 {
        let mut model = catalog::build_seeded(index, 8);
        let nodes_before = model.tree().len();
        let resources_before = model.live_resources();
        for frame in 0..600 {
            let t = frame as f32 * DT;
            let input = FrameInput {
                elapsed: t,
                delta: DT,
                pointer: Vec2::new((t * 0.7).sin(), (t * 1.3).cos()),
            };
            animate(&mut model, &input);
        }
        assert_eq!(model.tree().len(), nodes_before);
        assert_eq!(model.live_resources(), resources_before);
        model.tree().walk(Mat4::IDENTITY, &mut |node, surface, world| {
            assert!(world.is_finite(), "{} {}", model.kind().name(), node.name);
            let opacity = surface.material.opacity;
            assert!((0.0..=1.0).contains(&opacity), "{} {}", model.kind().name(), node.name);
        });
    }
}

#[test]
fn animation_ignores_fade() {
    let mut model = catalog::build_seeded(0, 2);
    model.set_fade(0.25);
    let input = FrameInput {
        elapsed: 0.5,
        delta: DT,
        pointer: Vec2::ZERO,
    };
    animate(&mut model, &input);
    for material in model.tree().materials().filter(|m| m.transparent) {
        assert_eq!(material.fade, 0.25);
        assert!(material.effective_opacity() <= 0.25 + f32::EPSILON);
    }
}

#[test]
fn scene_clock_wraps_without_a_jump() {
    for freq in [0.12f32, 0.19, 0.7, 1.8, 2.2, 6.0] {
        let before = (scene_time(CLOCK_PERIOD - 1e-3) * freq).sin();
        let after = (scene_time(CLOCK_PERIOD + 1e-3) * freq).sin();
        assert!((before - after).abs() < 0.02, "freq {freq}: {before} vs {after}");
    }
}

#[test]
fn scene_clock_keeps_frame_resolution_after_hours() {
    let step = 1.0 / 60.0;
    for hours in [1.0, 10.0, 100.0] {
        let start = hours * 3600.0 + 0.25;
        let a = scene_time(start);
        let b = scene_time(start + step);
        assert!(a < CLOCK_PERIOD as f32);
        assert!(((b - a) - step as f32).abs() < 1e-4, "after {hours} h: {}", b - a);
    }
}
