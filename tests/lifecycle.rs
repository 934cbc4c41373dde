use domain_viz_wasm::catalog::ArchetypeKind;
use domain_viz_wasm::lifecycle::ModelLifecycle;
use domain_viz_wasm::pipeline::HeadlessBackend;
use domain_viz_wasm::scene::{ReleaseLedger, ResourceKind};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const FADE_SECONDS: f32 = 0.8;

fn lifecycle() -> ModelLifecycle {
    ModelLifecycle::new(1.0 / FADE_SECONDS, ChaCha8Rng::seed_from_u64(21))
}

#[test]
fn switch_releases_exactly_the_outgoing_handles() {
    let mut lc = lifecycle();
    let mut ledger = ReleaseLedger::default();
    lc.select_domain(0, &mut ledger);
    assert!(ledger.is_empty());

    let created = lc.live_model().map(|m| m.live_resources()).unwrap_or_default();
    assert!(created > 0);

    lc.select_domain(4, &mut ledger);
    assert_eq!(ledger.len(), created);
    assert!(ledger.count(ResourceKind::Geometry) > 0);
    assert!(ledger.count(ResourceKind::Material) > 0);

    let mut backend = HeadlessBackend::new();
    ledger.drain_into(&mut backend);
    assert!(ledger.is_empty());
    assert_eq!(backend.released().len(), created);
    assert_eq!(backend.double_releases(), 0);
}

#[test]
fn fade_is_monotone_and_settles_at_one() {
    let mut lc = lifecycle();
    let mut ledger = ReleaseLedger::default();
    lc.select_domain(2, &mut ledger);
    assert_eq!(lc.fade_progress(), 0.0);
    assert!(lc.is_fading());

    let mut last = 0.0;
    for _ in 0..200 {
        lc.fade_step(1.0 / 60.0);
        let progress = lc.fade_progress();
        assert!(progress >= last);
        last = progress;
    }
    assert_eq!(last, 1.0);
    assert!(!lc.is_fading());

    // Settled: further steps touch nothing.
    assert!(!lc.fade_step(1.0 / 60.0));
    let model = lc.live_model().expect("live model");
    for material in model.tree().materials().filter(|m| m.transparent) {
        assert_eq!(material.fade, 1.0);
    }
}

#[test]
fn rapid_double_switch_leaves_one_faded_model() {
    let mut lc = lifecycle();
    let mut ledger = ReleaseLedger::default();
    let mut backend = HeadlessBackend::new();
    let mut created = 0;

    lc.select_domain(0, &mut ledger);
    created += lc.live_model().map_or(0, |m| m.live_resources());
    for _ in 0..10 {
        lc.fade_step(1.0 / 60.0);
    }

    lc.select_domain(3, &mut ledger);
    created += lc.live_model().map_or(0, |m| m.live_resources());
    lc.fade_step(1.0 / 60.0);
    assert!(lc.is_fading());

    lc.select_domain(3, &mut ledger);
    created += lc.live_model().map_or(0, |m| m.live_resources());
    assert_eq!(lc.fade_progress(), 0.0);

    // Exactly the configured duration at 60 fps.
    let frames = (FADE_SECONDS * 60.0).round() as usize;
    for _ in 0..frames - 1 {
        lc.fade_step(1.0 / 60.0);
    }
    assert!(lc.fade_progress() < 1.0);
    lc.fade_step(1.0 / 60.0);
    let model = lc.live_model().expect("live model");
    assert_eq!(model.kind(), ArchetypeKind::Web);
    assert_eq!(lc.fade_progress(), 1.0);
    assert_eq!(lc.selected(), Some(3));
    assert_eq!(lc.swaps(), 3);

    let live = model.live_resources();
    ledger.drain_into(&mut backend);
    assert_eq!(backend.released().len() + live, created);

    lc.dispose_all(&mut backend);
    lc.dispose_all(&mut backend);
    assert!(lc.live_model().is_none());
    assert_eq!(backend.released().len(), created);
    assert_eq!(backend.double_releases(), 0);
}

#[test]
fn negative_index_wraps() {
    let mut lc = lifecycle();
    let mut ledger = ReleaseLedger::default();
    lc.select_domain(-1, &mut ledger);
    assert_eq!(lc.selected(), Some(9));
    assert_eq!(lc.live_model().map(|m| m.kind()), Some(ArchetypeKind::Commerce));
}

#[test]
fn zero_delta_does_not_advance_fade() {
    let mut lc = lifecycle();
    let mut ledger = ReleaseLedger::default();
    lc.select_domain(1, &mut ledger);
    lc.fade_step(0.0);
    lc.fade_step(-1.0);
    assert_eq!(lc.fade_progress(), 0.0);
}

#[test]
fn fade_completes_within_its_duration_at_any_frame_rate() {
    for fps in [25.0f32, 30.0, 60.0, 120.0] {
        let mut lc = lifecycle();
        let mut ledger = ReleaseLedger::default();
        lc.select_domain(7, &mut ledger);
        let frames = (FADE_SECONDS * fps).round() as usize;
        for _ in 0..frames {
            lc.fade_step(1.0 / fps);
        }
        assert_eq!(lc.fade_progress(), 1.0, "{fps} fps");
        assert!(!lc.is_fading());
    }
}
