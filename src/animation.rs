//! Per-archetype animation. Each entry only mutates transforms and material
//! scalars already present on its own parts.

use std::f32::consts::PI;

use glam::{Vec2, Vec3};

use crate::catalog::{
    AiParts, AnalyticsParts, Archetype, ChatParts, CloudParts, CommerceParts, ErpParts, InfrastructureParts,
    MobileParts, Model, SecurityParts, WebParts,
};
use crate::scene::{approach, NodeId, SceneTree};

/// Pointer-follow smoothing per frame.
const POINTER_SMOOTHING: f32 = 0.05;

/// Period of the scene clock. Every rate used against it (rad/s, at most
/// two decimals) completes a whole number of cycles per period.
pub const CLOCK_PERIOD: f64 = 100.0 * std::f64::consts::TAU;

/// Narrows the session clock for phase math, wrapped to [`CLOCK_PERIOD`]
/// so f32 resolution stays fine over long sessions.
pub fn scene_time(elapsed: f64) -> f32 {
    elapsed.rem_euclid(CLOCK_PERIOD) as f32
}

#[derive(Debug, Clone, Copy)]
pub struct FrameInput {
    /// Scene clock in seconds, see [`scene_time`].
    pub elapsed: f32,
    /// Seconds since the previous tick.
    pub delta: f32,
    /// Normalized pointer, both axes in [-1, 1].
    pub pointer: Vec2,
}

pub fn animate(model: &mut Model, frame: &FrameInput) {
    let (tree, archetype) = model.parts_mut();
    match archetype {
        Archetype::Ai(parts) => ai(tree, parts, frame),
        Archetype::Chat(parts) => chat(tree, parts, frame),
        Archetype::Mobile(parts) => mobile(tree, parts, frame),
        Archetype::Web(parts) => web(tree, parts, frame),
        Archetype::Erp(parts) => erp(tree, parts, frame),
        Archetype::Cloud(parts) => cloud(tree, parts, frame),
        Archetype::Analytics(parts) => analytics(tree, parts, frame),
        Archetype::Security(parts) => security(tree, parts, frame),
        Archetype::Infrastructure(parts) => infrastructure(tree, parts, frame),
        Archetype::Commerce(parts) => commerce(tree, parts, frame),
    }
}

/// `base + amplitude * sin(t * freq + phase)`
fn pulse(t: f32, freq: f32, phase: f32, base: f32, amplitude: f32) -> f32 {
    base + amplitude * (t * freq + phase).sin()
}

fn wrap(progress: f32) -> f32 {
    progress.rem_euclid(1.0)
}

fn smooth_pointer(current: Vec2, target: Vec2) -> Vec2 {
    Vec2::new(
        approach(current.x, target.x, POINTER_SMOOTHING),
        approach(current.y, target.y, POINTER_SMOOTHING),
    )
}

/// Leans a node toward the pointer: yaw follows x, pitch follows y.
fn lean(tree: &mut SceneTree, node: NodeId, tilt: Vec2, yaw: f32, pitch: f32) {
    let t = tree.transform_mut(node);
    t.rotation.x = -tilt.y * pitch;
    t.rotation.y = tilt.x * yaw;
}

fn set_opacity(tree: &mut SceneTree, node: NodeId, opacity: f32) {
    if let Some(material) = tree.material_mut(node) {
        material.opacity = opacity.clamp(0.0, 1.0);
    }
}

fn set_glow(tree: &mut SceneTree, node: NodeId, intensity: f32) {
    if let Some(material) = tree.material_mut(node) {
        material.emissive_intensity = intensity.max(0.0);
    }
}

fn ai(tree: &mut SceneTree, p: &mut AiParts, f: &FrameInput) {
    let t = f.elapsed;
    p.tilt = smooth_pointer(p.tilt, f.pointer);
    lean(tree, p.pivot, p.tilt, 0.5, 0.3);

    let outer = tree.transform_mut(p.outer);
    outer.rotation.y += f.delta * 0.15;
    outer.rotation.x += f.delta * 0.05;
    let inner = tree.transform_mut(p.inner);
    inner.rotation.y -= f.delta * 0.35;
    inner.rotation.z += f.delta * 0.2;
    tree.transform_mut(p.core).scale = Vec3::splat(pulse(t, 2.0, 0.0, 1.0, 0.08));

    for (&node, &phase) in p.nodes.iter().zip(&p.phases) {
        set_opacity(tree, node, pulse(t, 1.8, phase, 0.55, 0.45));
    }
    set_opacity(tree, p.synapses, pulse(t, 1.2, 0.0, 0.3, 0.15));

    p.packet_progress += f.delta * 0.6;
    if p.packet_progress >= 1.0 {
        p.packet_progress = wrap(p.packet_progress);
        p.route = (p.route + 1) % p.routes.len();
    }
    let (from, to) = p.routes[p.route];
    tree.transform_mut(p.packet).position = from.lerp(to, p.packet_progress);
}

fn chat(tree: &mut SceneTree, p: &mut ChatParts, f: &FrameInput) {
    let t = f.elapsed;
    p.look = smooth_pointer(p.look, f.pointer);
    let head = tree.transform_mut(p.head);
    head.rotation.y = p.look.x * 0.5;
    head.rotation.x = -p.look.y * 0.3;
    head.position.y = pulse(t, 0.9, 0.0, 0.0, 0.05);

    set_glow(tree, p.visor, pulse(t, 3.0, 0.0, 1.2, 0.6));
    for (i, &dot) in p.dots.iter().enumerate() {
        let bounce = (t * 4.0 - i as f32 * 0.7).sin().max(0.0);
        tree.transform_mut(dot).scale = Vec3::splat(0.6 + 0.4 * bounce);
    }
    tree.transform_mut(p.rings[0]).rotation.z += f.delta * 0.4;
    tree.transform_mut(p.rings[1]).rotation.z -= f.delta * 0.25;
    tree.transform_mut(p.halo).rotation.y += f.delta * 0.05;
    set_opacity(tree, p.shell, pulse(t, 0.7, 0.0, 0.35, 0.05));
}

fn mobile(tree: &mut SceneTree, p: &mut MobileParts, f: &FrameInput) {
    let t = f.elapsed;
    p.tilt = smooth_pointer(p.tilt, f.pointer);
    let device = tree.transform_mut(p.device);
    device.rotation.y = (t * 0.5).sin() * 0.35 + p.tilt.x * 0.4;
    device.rotation.x = -p.tilt.y * 0.25;
    device.position.y = pulse(t, 1.1, 0.0, 0.0, 0.06);

    set_glow(tree, p.screen, pulse(t, 1.6, 0.0, 0.9, 0.15));
    for (i, &tile) in p.tiles.iter().enumerate() {
        let wave = 0.5 + 0.5 * (t * 2.2 - i as f32 * 0.45).sin();
        set_opacity(tree, tile, 0.35 + 0.65 * wave);
    }

    p.ripple_age = wrap(p.ripple_age + f.delta * 0.8);
    tree.transform_mut(p.ripple).scale = Vec3::splat(1.0 + p.ripple_age * 1.5);
    set_opacity(tree, p.ripple, 1.0 - p.ripple_age);
    tree.transform_mut(p.sparks).rotation.y -= f.delta * 0.1;
}

fn web(tree: &mut SceneTree, p: &mut WebParts, f: &FrameInput) {
    let t = f.elapsed;
    p.tilt = smooth_pointer(p.tilt, f.pointer);
    lean(tree, p.pivot, p.tilt, 0.4, 0.25);

    tree.transform_mut(p.globe).rotation.y += f.delta * 0.25;
    tree.transform_mut(p.halo).rotation.y -= f.delta * 0.1;
    for ((&panel, &rest), &phase) in p.panels.iter().zip(&p.panel_rest).zip(&p.panel_phases) {
        tree.transform_mut(panel).position.y = rest.y + 0.12 * (t * 1.3 + phase).sin();
        set_opacity(tree, panel, pulse(t, 0.9, phase, 0.35, 0.1));
    }
}

fn erp(tree: &mut SceneTree, p: &mut ErpParts, f: &FrameInput) {
    let t = f.elapsed;
    p.tilt = smooth_pointer(p.tilt, f.pointer);
    lean(tree, p.pivot, p.tilt, 0.45, 0.3);

    for (&gear, &rate) in p.gears.iter().zip(&p.gear_rates) {
        tree.transform_mut(gear).rotation.z += f.delta * rate;
    }
    tree.transform_mut(p.orbit).rotation.y += f.delta * 0.3;
    for (&module, &phase) in p.modules.iter().zip(&p.module_phases) {
        let m = tree.transform_mut(module);
        m.scale = Vec3::splat(pulse(t, 2.0, phase, 1.0, 0.15));
        m.rotation.y += f.delta * 0.8;
    }
    set_opacity(tree, p.flows, pulse(t, 1.5, 0.0, 0.4, 0.2));
}

fn cloud(tree: &mut SceneTree, p: &mut CloudParts, f: &FrameInput) {
    let t = f.elapsed;
    p.tilt = smooth_pointer(p.tilt, f.pointer);
    let cluster = tree.transform_mut(p.cluster);
    cluster.rotation.y += f.delta * 0.12;
    cluster.rotation.x = -p.tilt.y * 0.2;
    cluster.position.x = p.tilt.x * 0.2;

    for (i, &puff) in p.puffs.iter().enumerate() {
        tree.transform_mut(puff).scale = Vec3::splat(pulse(t, 1.5, i as f32, 1.0, 0.05));
    }

    // Each layer falls from under the cluster to the uplink, then restarts.
    p.fall = wrap(p.fall + f.delta * 0.45);
    for (&layer, &offset) in p.rain.iter().zip(&p.rain_offsets) {
        let progress = wrap(p.fall + offset);
        tree.transform_mut(layer).position.y = 0.1 - progress * 1.3;
        set_opacity(tree, layer, (progress * PI).sin());
    }
    tree.transform_mut(p.uplink).rotation.z += f.delta * 0.3;
}

fn analytics(tree: &mut SceneTree, p: &mut AnalyticsParts, f: &FrameInput) {
    let t = f.elapsed;
    p.tilt = smooth_pointer(p.tilt, f.pointer);
    lean(tree, p.chart, p.tilt, 0.5, 0.2);

    for (&bar, &phase) in p.bars.iter().zip(&p.bar_phases) {
        let height = 0.4 + 1.2 * (0.5 + 0.5 * (t * 1.1 + phase).sin());
        let b = tree.transform_mut(bar);
        b.scale.y = height;
        b.position.y = -1.0 + height * 0.5;
    }
    set_opacity(tree, p.trend, pulse(t, 2.0, 0.0, 0.75, 0.25));
    tree.transform_mut(p.scatter).rotation.y += f.delta * 0.15;
}

fn security(tree: &mut SceneTree, p: &mut SecurityParts, f: &FrameInput) {
    let t = f.elapsed;
    p.tilt = smooth_pointer(p.tilt, f.pointer);
    lean(tree, p.pivot, p.tilt, 0.45, 0.25);

    tree.transform_mut(p.shield).rotation.y += f.delta * 0.2;
    set_glow(tree, p.lock, pulse(t, 2.4, 0.0, 1.0, 0.4));
    tree.transform_mut(p.shackle).position.y = 0.12 + 0.04 * (t * 1.2).sin().max(0.0);

    p.scan = wrap(p.scan + f.delta * 0.4);
    tree.transform_mut(p.scanner).position.y = -1.2 + 2.4 * p.scan;
    set_opacity(tree, p.scanner, 0.35 * (p.scan * PI).sin());

    for (i, &ring) in p.rings.iter().enumerate() {
        let direction = if i % 2 == 0 { 1.0 } else { -1.0 };
        tree.transform_mut(ring).rotation.z += f.delta * 0.2 * (i + 1) as f32 * direction;
    }
}

fn infrastructure(tree: &mut SceneTree, p: &mut InfrastructureParts, f: &FrameInput) {
    let t = f.elapsed;
    p.tilt = smooth_pointer(p.tilt, f.pointer);
    let rack = tree.transform_mut(p.rack);
    rack.rotation.y += f.delta * 0.2;
    rack.rotation.x = -p.tilt.y * 0.2;

    for (&leds, &phase) in p.leds.iter().zip(&p.led_phases) {
        let on = (t * 6.0 + phase).sin() > 0.2;
        set_opacity(tree, leds, if on { 1.0 } else { 0.3 });
    }
    set_opacity(tree, p.beams, pulse(t, 2.0, 0.0, 0.45, 0.25));

    p.pulse_progress = wrap(p.pulse_progress + f.delta * 0.5);
    tree.transform_mut(p.pulse).position.y = -1.4 + 2.8 * p.pulse_progress;
}

fn commerce(tree: &mut SceneTree, p: &mut CommerceParts, f: &FrameInput) {
    let t = f.elapsed;
    p.tilt = smooth_pointer(p.tilt, f.pointer);
    let stack = tree.transform_mut(p.stack);
    stack.rotation.y += f.delta * 0.5;
    stack.rotation.x = -p.tilt.y * 0.2;

    for (i, (&coin, &rest)) in p.coins.iter().zip(&p.coin_rest).enumerate() {
        tree.transform_mut(coin).position.y = rest + 0.05 * (t * 2.0 + i as f32 * 0.5).sin();
    }
    let orbit = tree.transform_mut(p.orbit);
    orbit.rotation.y += f.delta * 0.4;
    orbit.rotation.z = p.tilt.x * 0.15;
    for &parcel in &p.parcels {
        tree.transform_mut(parcel).rotation.x += f.delta * 0.7;
    }
    set_opacity(tree, p.sparkle, pulse(t, 3.0, 0.0, 0.6, 0.3));
}
