use domain_viz_wasm::config::OverlaySettings;
use domain_viz_wasm::overlay::{ConnectionGraph, EDGES};
use domain_viz_wasm::scene::{Dispose, ReleaseLedger};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn graph() -> ConnectionGraph {
    ConnectionGraph::new(OverlaySettings::default(), &mut ChaCha8Rng::seed_from_u64(4))
}

#[test]
fn ten_anchors_fixed_edges() {
    let g = graph();
    assert_eq!(g.anchors().len(), 10);
    assert_eq!(g.edges().len(), EDGES.len());
    for (i, anchor) in g.anchors().iter().enumerate() {
        assert_eq!(anchor.id, i);
    }
}

#[test]
fn active_iff_endpoint_selected() {
    let mut g = graph();
    for selected in 0..10 {
        g.set_selected(selected);
        assert_eq!(g.selected(), Some(selected));
        for edge in g.edges() {
            assert_eq!(edge.active, edge.a == selected || edge.b == selected);
            assert_eq!(edge.connects(edge.a), edge.connects(edge.b));
            assert_eq!(edge.active, edge.connects(selected));
        }
    }
}

#[test]
fn progress_wraps_and_particles_follow_curve() {
    let mut g = graph();
    g.set_selected(2);
    for _ in 0..2000 {
        g.update(1.0 / 30.0);
        for edge in g.edges() {
            assert!((0.0..1.0).contains(&edge.progress));
        }
    }
    for edge in g.edges() {
        let expected = g.point_on_edge(edge, edge.progress);
        let actual = g.tree().node(edge.particle()).transform.position;
        assert!(expected.abs_diff_eq(actual, 1e-5));
    }
}

#[test]
fn intensity_moves_toward_activity_target() {
    let settings = OverlaySettings::default();
    let mut g = graph();
    g.set_selected(0);
    for _ in 0..600 {
        g.update(1.0 / 60.0);
    }
    for edge in g.edges() {
        let target = if edge.active {
            settings.active_intensity
        } else {
            settings.idle_intensity
        };
        assert!((edge.intensity - target).abs() < 1e-3);
    }
}

#[test]
fn selection_never_rebuilds_the_graph() {
    let mut g = graph();
    let nodes = g.tree().len();
    let resources = g.tree().live_resources();
    let paths: Vec<_> = g.edges().iter().map(|e| e.path()).collect();
    for selected in [3, 7, 3, 0] {
        g.set_selected(selected);
        g.update(0.016);
    }
    assert_eq!(g.tree().len(), nodes);
    assert_eq!(g.tree().live_resources(), resources);
    let after: Vec<_> = g.edges().iter().map(|e| e.path()).collect();
    assert_eq!(paths, after);

    let mut ledger = ReleaseLedger::default();
    g.dispose(&mut ledger);
    g.dispose(&mut ledger);
    assert_eq!(ledger.len(), resources);
}
