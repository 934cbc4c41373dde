use domain_viz_wasm::camera::CameraRig;
use domain_viz_wasm::config::CameraSettings;
use glam::Vec2;

#[test]
fn orbit_stays_bounded_without_pointer() {
    let settings = CameraSettings::default();
    let base = settings.base();
    let amplitude = settings.amplitude();
    let mut rig = CameraRig::new(settings);

    for frame in 0..1000 {
        let pose = rig.update(frame as f32 / 60.0, Vec2::ZERO);
        let offset = (pose.position - base).abs();
        assert!(offset.cmple(amplitude + 1e-4).all(), "frame {frame}: {offset:?}");
        assert_eq!(pose.look_at, rig.settings().focal());
    }
}

#[test]
fn orbit_does_not_retrace_immediately() {
    let rig = CameraRig::new(CameraSettings::default());
    let a = rig.orbit_offset(10.0);
    let b = rig.orbit_offset(11.0);
    assert!(a.distance(b) > 1e-3);
}

#[test]
fn parallax_is_clamped() {
    let rig = CameraRig::new(CameraSettings::default());
    assert_eq!(rig.parallax_offset(Vec2::new(5.0, -5.0)), rig.parallax_offset(Vec2::new(1.0, -1.0)));
}

#[test]
fn degenerate_viewport_keeps_aspect() {
    let mut rig = CameraRig::new(CameraSettings::default());
    rig.resize(1600.0, 900.0);
    rig.resize(0.0, 900.0);
    assert!((rig.camera().aspect - 16.0 / 9.0).abs() < 1e-6);
}
