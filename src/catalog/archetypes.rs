use std::f32::consts::{FRAC_PI_2, TAU};

use glam::{Vec2, Vec3};
use rand::Rng;

use super::{ArchetypeKind, DomainDescriptor};
use crate::geometry::{self, Polyhedron};
use crate::scene::{Geometry, Material, Node, NodeId, Primitive, PrimitiveKind, SceneTree, Transform};

const ROOT: NodeId = SceneTree::ROOT;

/// Closed set of archetypes, each carrying exactly the parts its animation touches.
#[derive(Debug)]
pub enum Archetype {
    Ai(AiParts),
    Chat(ChatParts),
    Mobile(MobileParts),
    Web(WebParts),
    Erp(ErpParts),
    Cloud(CloudParts),
    Analytics(AnalyticsParts),
    Security(SecurityParts),
    Infrastructure(InfrastructureParts),
    Commerce(CommerceParts),
}

/// A part reference together with the primitive kind its animation expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartRef {
    pub node: NodeId,
    pub expected: PrimitiveKind,
}

fn group(node: NodeId) -> PartRef {
    PartRef { node, expected: PrimitiveKind::Group }
}

fn mesh(node: NodeId) -> PartRef {
    PartRef { node, expected: PrimitiveKind::Mesh }
}

fn lines(node: NodeId) -> PartRef {
    PartRef { node, expected: PrimitiveKind::Lines }
}

fn points(node: NodeId) -> PartRef {
    PartRef { node, expected: PrimitiveKind::Points }
}

impl Archetype {
    pub fn kind(&self) -> ArchetypeKind {
        match self {
            Archetype::Ai(_) => ArchetypeKind::Ai,
            Archetype::Chat(_) => ArchetypeKind::Chat,
            Archetype::Mobile(_) => ArchetypeKind::Mobile,
            Archetype::Web(_) => ArchetypeKind::Web,
            Archetype::Erp(_) => ArchetypeKind::Erp,
            Archetype::Cloud(_) => ArchetypeKind::Cloud,
            Archetype::Analytics(_) => ArchetypeKind::Analytics,
            Archetype::Security(_) => ArchetypeKind::Security,
            Archetype::Infrastructure(_) => ArchetypeKind::Infrastructure,
            Archetype::Commerce(_) => ArchetypeKind::Commerce,
        }
    }

    /// Every node the animation entry for this archetype reads or writes.
    pub fn parts(&self) -> Vec<PartRef> {
        let mut parts = Vec::new();
        match self {
            Archetype::Ai(p) => {
                parts.extend([group(p.pivot), lines(p.outer), lines(p.inner), mesh(p.core)]);
                parts.extend([lines(p.synapses), mesh(p.packet)]);
                parts.extend(p.nodes.iter().copied().map(mesh));
            }
            Archetype::Chat(p) => {
                parts.extend([group(p.head), mesh(p.shell), mesh(p.visor), points(p.halo)]);
                parts.extend(p.dots.iter().copied().map(mesh));
                parts.extend(p.rings.iter().copied().map(lines));
            }
            Archetype::Mobile(p) => {
                parts.extend([group(p.device), mesh(p.body), mesh(p.screen), lines(p.ripple), points(p.sparks)]);
                parts.extend(p.tiles.iter().copied().map(mesh));
            }
            Archetype::Web(p) => {
                parts.extend([group(p.pivot), lines(p.globe), points(p.halo)]);
                parts.extend(p.panels.iter().copied().map(mesh));
            }
            Archetype::Erp(p) => {
                parts.extend([group(p.pivot), group(p.orbit), lines(p.flows)]);
                parts.extend(p.gears.iter().copied().map(mesh));
                parts.extend(p.modules.iter().copied().map(mesh));
            }
            Archetype::Cloud(p) => {
                parts.extend([group(p.cluster), lines(p.uplink)]);
                parts.extend(p.puffs.iter().copied().map(mesh));
                parts.extend(p.rain.iter().copied().map(points));
            }
            Archetype::Analytics(p) => {
                parts.extend([group(p.chart), lines(p.trend), points(p.scatter)]);
                parts.extend(p.bars.iter().copied().map(mesh));
            }
            Archetype::Security(p) => {
                parts.extend([group(p.pivot), lines(p.shield), mesh(p.lock), mesh(p.shackle), mesh(p.scanner)]);
                parts.extend(p.rings.iter().copied().map(lines));
            }
            Archetype::Infrastructure(p) => {
                parts.extend([group(p.rack), lines(p.beams), mesh(p.pulse)]);
                parts.extend(p.units.iter().copied().map(mesh));
                parts.extend(p.leds.iter().copied().map(points));
            }
            Archetype::Commerce(p) => {
                parts.extend([group(p.stack), group(p.orbit), points(p.sparkle)]);
                parts.extend(p.coins.iter().copied().map(mesh));
                parts.extend(p.parcels.iter().copied().map(mesh));
            }
        }
        parts
    }
}

/// Nested wireframe polyhedra with a pulsing neuron graph and a data packet.
#[derive(Debug)]
pub struct AiParts {
    pub pivot: NodeId,
    pub outer: NodeId,
    pub inner: NodeId,
    pub core: NodeId,
    pub nodes: Vec<NodeId>,
    pub synapses: NodeId,
    pub packet: NodeId,
    pub(crate) phases: Vec<f32>,
    pub(crate) routes: Vec<(Vec3, Vec3)>,
    pub(crate) route: usize,
    pub(crate) packet_progress: f32,
    pub(crate) tilt: Vec2,
}

/// Rounded head with a glowing visor, typing dots and orbiting rings.
#[derive(Debug)]
pub struct ChatParts {
    pub head: NodeId,
    pub shell: NodeId,
    pub visor: NodeId,
    pub dots: [NodeId; 3],
    pub rings: [NodeId; 2],
    pub halo: NodeId,
    pub(crate) look: Vec2,
}

#[derive(Debug)]
pub struct MobileParts {
    pub device: NodeId,
    pub body: NodeId,
    pub screen: NodeId,
    pub tiles: Vec<NodeId>,
    pub ripple: NodeId,
    pub sparks: NodeId,
    pub(crate) ripple_age: f32,
    pub(crate) tilt: Vec2,
}

#[derive(Debug)]
pub struct WebParts {
    pub pivot: NodeId,
    pub globe: NodeId,
    pub halo: NodeId,
    pub panels: Vec<NodeId>,
    pub(crate) panel_rest: Vec<Vec3>,
    pub(crate) panel_phases: Vec<f32>,
    pub(crate) tilt: Vec2,
}

/// Meshed gears with business modules circling on a flow loop.
#[derive(Debug)]
pub struct ErpParts {
    pub pivot: NodeId,
    pub gears: [NodeId; 3],
    pub orbit: NodeId,
    pub modules: Vec<NodeId>,
    pub flows: NodeId,
    pub(crate) gear_rates: [f32; 3],
    pub(crate) module_phases: Vec<f32>,
    pub(crate) tilt: Vec2,
}

#[derive(Debug)]
pub struct CloudParts {
    pub cluster: NodeId,
    pub puffs: Vec<NodeId>,
    pub rain: Vec<NodeId>,
    pub uplink: NodeId,
    pub(crate) rain_offsets: Vec<f32>,
    pub(crate) fall: f32,
    pub(crate) tilt: Vec2,
}

#[derive(Debug)]
pub struct AnalyticsParts {
    pub chart: NodeId,
    pub bars: Vec<NodeId>,
    pub trend: NodeId,
    pub scatter: NodeId,
    pub(crate) bar_phases: Vec<f32>,
    pub(crate) tilt: Vec2,
}

/// Padlock inside a flattened shield lattice, swept by a scan plane.
#[derive(Debug)]
pub struct SecurityParts {
    pub pivot: NodeId,
    pub shield: NodeId,
    pub lock: NodeId,
    pub shackle: NodeId,
    pub scanner: NodeId,
    pub rings: [NodeId; 3],
    pub(crate) scan: f32,
    pub(crate) tilt: Vec2,
}

/// Stacked-plane server rack with blinking LEDs and light-beam edges.
#[derive(Debug)]
pub struct InfrastructureParts {
    pub rack: NodeId,
    pub units: Vec<NodeId>,
    pub leds: Vec<NodeId>,
    pub beams: NodeId,
    pub pulse: NodeId,
    pub(crate) led_phases: Vec<f32>,
    pub(crate) pulse_progress: f32,
    pub(crate) tilt: Vec2,
}

#[derive(Debug)]
pub struct CommerceParts {
    pub stack: NodeId,
    pub coins: Vec<NodeId>,
    pub orbit: NodeId,
    pub parcels: Vec<NodeId>,
    pub sparkle: NodeId,
    pub(crate) coin_rest: Vec<f32>,
    pub(crate) tilt: Vec2,
}

/// Construction context: the tree under construction, the palette entry and the RNG.
struct Kit<'a, R: Rng + ?Sized> {
    tree: SceneTree,
    desc: &'static DomainDescriptor,
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> Kit<'a, R> {
    fn accent(&self, opacity: f32) -> Material {
        Material::new(self.desc.accent, self.desc.emissive)
            .with_opacity(opacity)
            .with_glow(0.25)
    }

    fn glow(&self, intensity: f32, opacity: f32) -> Material {
        Material::new(self.desc.emissive, self.desc.emissive)
            .with_glow(intensity)
            .with_opacity(opacity)
            .additive()
    }

    fn group(&mut self, parent: NodeId, name: &'static str, transform: Transform) -> NodeId {
        self.tree.add(parent, Node::new(name, Primitive::Group).with_transform(transform))
    }

    fn mesh(&mut self, parent: NodeId, name: &'static str, geometry: Geometry, material: Material, transform: Transform) -> NodeId {
        self.tree.add(parent, Node::mesh(name, geometry, material).with_transform(transform))
    }

    fn lines(&mut self, parent: NodeId, name: &'static str, geometry: Geometry, material: Material, transform: Transform) -> NodeId {
        self.tree.add(parent, Node::lines(name, geometry, material).with_transform(transform))
    }

    fn points(&mut self, parent: NodeId, name: &'static str, geometry: Geometry, material: Material, transform: Transform) -> NodeId {
        self.tree.add(parent, Node::points(name, geometry, material).with_transform(transform))
    }

    fn phase(&mut self) -> f32 {
        self.rng.gen_range(0.0..TAU)
    }

    fn unit(&mut self) -> f32 {
        self.rng.gen_range(0.0..1.0)
    }

    /// Uniform points in a spherical shell.
    fn shell(&mut self, count: usize, inner: f32, outer: f32) -> Vec<Vec3> {
        (0..count)
            .map(|_| {
                let theta = self.rng.gen_range(0.0..TAU);
                let z: f32 = self.rng.gen_range(-1.0..1.0);
                let r = (1.0 - z * z).sqrt();
                let radius = self.rng.gen_range(inner..outer);
                Vec3::new(r * theta.cos(), z, r * theta.sin()) * radius
            })
            .collect()
    }

    fn in_box(&mut self, count: usize, half: Vec3) -> Vec<Vec3> {
        (0..count)
            .map(|_| {
                Vec3::new(
                    self.rng.gen_range(-half.x..half.x),
                    self.rng.gen_range(-half.y..half.y),
                    self.rng.gen_range(-half.z..half.z),
                )
            })
            .collect()
    }
}

fn rotated(rotation: Vec3) -> Transform {
    Transform {
        rotation,
        ..Transform::default()
    }
}

pub(super) fn assemble<R: Rng + ?Sized>(desc: &'static DomainDescriptor, rng: &mut R) -> (SceneTree, Archetype) {
    let mut kit = Kit {
        tree: SceneTree::new(desc.kind.name()),
        desc,
        rng,
    };
    let archetype = match desc.kind {
        ArchetypeKind::Ai => Archetype::Ai(ai(&mut kit)),
        ArchetypeKind::Chat => Archetype::Chat(chat(&mut kit)),
        ArchetypeKind::Mobile => Archetype::Mobile(mobile(&mut kit)),
        ArchetypeKind::Web => Archetype::Web(web(&mut kit)),
        ArchetypeKind::Erp => Archetype::Erp(erp(&mut kit)),
        ArchetypeKind::Cloud => Archetype::Cloud(cloud(&mut kit)),
        ArchetypeKind::Analytics => Archetype::Analytics(analytics(&mut kit)),
        ArchetypeKind::Security => Archetype::Security(security(&mut kit)),
        ArchetypeKind::Infrastructure => Archetype::Infrastructure(infrastructure(&mut kit)),
        ArchetypeKind::Commerce => Archetype::Commerce(commerce(&mut kit)),
    };
    (kit.tree, archetype)
}

fn ai<R: Rng + ?Sized>(kit: &mut Kit<'_, R>) -> AiParts {
    let d = kit.desc.detail;
    let pivot = kit.group(ROOT, "pivot", Transform::default());
    let lattice = kit.accent(0.55);
    let outer = kit.lines(pivot, "lattice", geometry::wire_polyhedron(Polyhedron::Icosahedron, 1.6), lattice, Transform::default());
    let frame = kit.glow(0.8, 0.7);
    let inner = kit.lines(pivot, "core-frame", geometry::wire_polyhedron(Polyhedron::Octahedron, 0.9), frame, Transform::default());
    let core_material = kit.glow(1.6, 0.9);
    let core = kit.mesh(pivot, "core", geometry::sphere(0.32, d, d / 2), core_material, Transform::default());

    let vertices = Polyhedron::Icosahedron.vertices(1.6);
    let mut nodes = Vec::with_capacity(vertices.len());
    let mut phases = Vec::with_capacity(vertices.len());
    for &v in &vertices {
        phases.push(kit.phase());
        let material = kit.glow(1.2, 1.0);
        nodes.push(kit.mesh(outer, "neuron", geometry::sphere(0.09, 8, 6), material, Transform::at(v)));
    }

    // Chords through the interior, distinct endpoints.
    let routes: Vec<(Vec3, Vec3)> = (0..8)
        .map(|_| {
            let a = kit.rng.gen_range(0..vertices.len());
            let b = (a + kit.rng.gen_range(1..vertices.len())) % vertices.len();
            (vertices[a], vertices[b])
        })
        .collect();
    let synapse_material = kit.glow(0.6, 0.35);
    let synapses = kit.lines(outer, "synapses", geometry::segments(&routes), synapse_material, Transform::default());
    let packet_material = kit.glow(2.0, 1.0);
    let packet = kit.mesh(outer, "packet", geometry::sphere(0.06, 8, 6), packet_material, Transform::at(routes[0].0));
    let packet_progress = kit.unit();

    AiParts {
        pivot,
        outer,
        inner,
        core,
        nodes,
        synapses,
        packet,
        phases,
        routes,
        route: 0,
        packet_progress,
        tilt: Vec2::ZERO,
    }
}

fn chat<R: Rng + ?Sized>(kit: &mut Kit<'_, R>) -> ChatParts {
    let d = kit.desc.detail;
    let head = kit.group(ROOT, "head", Transform::default());
    let shell_material = kit.accent(0.35);
    let shell = kit.mesh(head, "shell", geometry::sphere(1.0, d, d / 2), shell_material, Transform::default());
    let visor_material = kit.glow(1.4, 0.9);
    let visor = kit.mesh(
        head,
        "visor",
        geometry::cuboid(1.3, 0.42, 0.25),
        visor_material,
        Transform::at(Vec3::new(0.0, 0.1, 0.88)),
    );
    let dots = std::array::from_fn(|i| {
        let material = kit.glow(2.0, 1.0);
        let at = Vec3::new(-0.25 + 0.25 * i as f32, 0.1, 1.03);
        kit.mesh(head, "typing-dot", geometry::sphere(0.06, 8, 6), material, Transform::at(at))
    });
    let tilts = [Vec3::new(FRAC_PI_2 + 0.3, 0.0, 0.0), Vec3::new(FRAC_PI_2 - 0.4, 0.0, 0.5)];
    let rings = std::array::from_fn(|i| {
        let material = kit.glow(0.9, 0.6);
        kit.lines(ROOT, "orbit-ring", geometry::ring(1.45 + 0.25 * i as f32, 64), material, rotated(tilts[i]))
    });
    let scatter = kit.shell(120, 1.9, 2.4);
    let halo_material = kit.glow(0.8, 0.6).with_point_size(2.5);
    let halo = kit.points(ROOT, "halo", geometry::points(scatter), halo_material, Transform::default());

    ChatParts {
        head,
        shell,
        visor,
        dots,
        rings,
        halo,
        look: Vec2::ZERO,
    }
}

fn mobile<R: Rng + ?Sized>(kit: &mut Kit<'_, R>) -> MobileParts {
    let device = kit.group(ROOT, "device", Transform::default());
    let body_material = kit.accent(1.0).opaque();
    let body = kit.mesh(device, "body", geometry::cuboid(1.15, 2.2, 0.14), body_material, Transform::default());
    let screen_material = kit.glow(0.9, 0.85);
    let screen = kit.mesh(
        device,
        "screen",
        geometry::plane(0.98, 1.95),
        screen_material,
        Transform::at(Vec3::new(0.0, 0.0, 0.075)),
    );

    let mut tiles = Vec::with_capacity(12);
    for row in 0..4 {
        for col in 0..3 {
            let at = Vec3::new(-0.3 + 0.3 * col as f32, 0.55 - 0.32 * row as f32, 0.085);
            let material = kit.glow(1.3, 0.6);
            tiles.push(kit.mesh(device, "app-tile", geometry::plane(0.22, 0.22), material, Transform::at(at)));
        }
    }

    let ripple_material = kit.glow(1.5, 1.0);
    let ripple = kit.lines(
        device,
        "notification",
        geometry::ring(0.16, 32),
        ripple_material,
        Transform::at(Vec3::new(0.36, 0.86, 0.09)),
    );
    let scatter = kit.in_box(60, Vec3::new(1.3, 1.6, 0.6));
    let spark_material = kit.glow(1.0, 0.7).with_point_size(2.0);
    let sparks = kit.points(device, "sparks", geometry::points(scatter), spark_material, Transform::default());
    let ripple_age = kit.unit();

    MobileParts {
        device,
        body,
        screen,
        tiles,
        ripple,
        sparks,
        ripple_age,
        tilt: Vec2::ZERO,
    }
}

fn web<R: Rng + ?Sized>(kit: &mut Kit<'_, R>) -> WebParts {
    let d = kit.desc.detail;
    let pivot = kit.group(ROOT, "pivot", Transform::default());
    let globe_material = kit.accent(0.5);
    let globe = kit.lines(pivot, "globe", geometry::wire_globe(1.1, d / 2, d / 2 + 1), globe_material, Transform::default());

    let band: Vec<Vec3> = (0..180)
        .map(|_| {
            let angle = kit.rng.gen_range(0.0..TAU);
            let radius = kit.rng.gen_range(1.5..1.9);
            let lift = kit.rng.gen_range(-0.15..0.15);
            Vec3::new(radius * angle.cos(), lift, radius * angle.sin())
        })
        .collect();
    let halo_material = kit.glow(0.9, 0.7).with_point_size(2.0);
    let halo = kit.points(pivot, "traffic", geometry::points(band), halo_material, rotated(Vec3::new(0.25, 0.0, 0.0)));

    let panel_rest = vec![Vec3::new(-1.7, 0.6, 0.4), Vec3::new(1.6, -0.3, 0.6), Vec3::new(0.2, 1.5, -0.6)];
    let mut panels = Vec::with_capacity(panel_rest.len());
    let mut panel_phases = Vec::with_capacity(panel_rest.len());
    for &rest in &panel_rest {
        panel_phases.push(kit.phase());
        let material = kit.accent(0.3);
        let transform = Transform {
            position: rest,
            rotation: Vec3::new(0.0, -rest.x * 0.25, 0.0),
            ..Transform::default()
        };
        let panel = kit.mesh(pivot, "browser-panel", geometry::plane(0.9, 0.6), material, transform);
        let frame = kit.glow(1.1, 0.8);
        kit.lines(panel, "browser-frame", geometry::box_edges(0.9, 0.6, 0.0), frame, Transform::default());
        panels.push(panel);
    }

    WebParts {
        pivot,
        globe,
        halo,
        panels,
        panel_rest,
        panel_phases,
        tilt: Vec2::ZERO,
    }
}

fn erp<R: Rng + ?Sized>(kit: &mut Kit<'_, R>) -> ErpParts {
    let d = kit.desc.detail;
    let pivot = kit.group(ROOT, "pivot", Transform::default());
    let sizes = [
        (0.8, Vec3::new(-0.55, 0.25, 0.0)),
        (0.5, Vec3::new(0.85, 0.55, 0.0)),
        (0.42, Vec3::new(0.35, -0.95, 0.0)),
    ];
    let gears = std::array::from_fn(|i| {
        let (radius, at) = sizes[i];
        let material = kit.accent(0.7);
        let gear = kit.mesh(pivot, "gear", geometry::torus(radius, 0.09, 8, d), material, Transform::at(at));
        let mut teeth = Vec::new();
        for k in 0..6 {
            let a = TAU * k as f32 / 6.0;
            teeth.push((Vec3::ZERO, Vec3::new(a.cos(), a.sin(), 0.0) * radius));
        }
        for k in 0..12 {
            let a = TAU * k as f32 / 12.0;
            let dir = Vec3::new(a.cos(), a.sin(), 0.0);
            teeth.push((dir * (radius + 0.09), dir * (radius + 0.2)));
        }
        let spokes = kit.glow(1.0, 0.8);
        kit.lines(gear, "spokes", geometry::segments(&teeth), spokes, Transform::default());
        gear
    });
    // Neighbouring gears counter-rotate at the inverse radius ratio.
    let base_rate = 0.5;
    let gear_rates = [base_rate, -base_rate * sizes[0].0 / sizes[1].0, -base_rate * sizes[0].0 / sizes[2].0];

    let orbit = kit.group(pivot, "modules", Transform::default());
    let mut modules = Vec::with_capacity(4);
    let mut module_phases = Vec::with_capacity(4);
    let mut loop_points = Vec::with_capacity(5);
    for i in 0..4 {
        let a = TAU * i as f32 / 4.0;
        let lift = kit.rng.gen_range(-0.3..0.3);
        let at = Vec3::new(1.9 * a.cos(), lift, 1.9 * a.sin());
        loop_points.push(at);
        module_phases.push(kit.phase());
        let material = kit.glow(1.1, 0.9);
        modules.push(kit.mesh(orbit, "module", geometry::cuboid(0.22, 0.22, 0.22), material, Transform::at(at)));
    }
    loop_points.push(loop_points[0]);
    let flow_material = kit.glow(0.7, 0.4);
    let flows = kit.lines(orbit, "flows", geometry::polyline(&loop_points), flow_material, Transform::default());

    ErpParts {
        pivot,
        gears,
        orbit,
        modules,
        flows,
        gear_rates,
        module_phases,
        tilt: Vec2::ZERO,
    }
}

fn cloud<R: Rng + ?Sized>(kit: &mut Kit<'_, R>) -> CloudParts {
    let d = kit.desc.detail;
    let cluster = kit.group(ROOT, "cluster", Transform::at(Vec3::new(0.0, 0.5, 0.0)));
    let blobs = [
        (Vec3::new(0.0, 0.0, 0.0), 0.8),
        (Vec3::new(-0.75, -0.15, 0.1), 0.55),
        (Vec3::new(0.8, -0.1, 0.0), 0.6),
        (Vec3::new(-0.3, 0.35, -0.2), 0.55),
        (Vec3::new(0.35, 0.3, 0.25), 0.5),
    ];
    let mut puffs = Vec::with_capacity(blobs.len());
    for (at, radius) in blobs {
        let material = kit.accent(0.35).with_glow(0.5);
        puffs.push(kit.mesh(cluster, "puff", geometry::sphere(radius, d, d / 2), material, Transform::at(at)));
    }

    let mut rain = Vec::with_capacity(3);
    let mut rain_offsets = Vec::with_capacity(3);
    for layer in 0..3 {
        let drops = kit.in_box(40, Vec3::new(1.0, 0.3, 0.6));
        let material = kit.glow(1.2, 0.8).with_point_size(2.0);
        rain.push(kit.points(ROOT, "data-rain", geometry::points(drops), material, Transform::default()));
        let jitter = kit.rng.gen_range(0.0..0.1);
        rain_offsets.push(layer as f32 / 3.0 + jitter);
    }

    let uplink_material = kit.glow(0.8, 0.6);
    let uplink_transform = Transform {
        position: Vec3::new(0.0, -1.3, 0.0),
        rotation: Vec3::new(FRAC_PI_2, 0.0, 0.0),
        ..Transform::default()
    };
    let uplink = kit.lines(ROOT, "uplink", geometry::ring(1.3, 48), uplink_material, uplink_transform);
    let fall = kit.unit();

    CloudParts {
        cluster,
        puffs,
        rain,
        uplink,
        rain_offsets,
        fall,
        tilt: Vec2::ZERO,
    }
}

fn analytics<R: Rng + ?Sized>(kit: &mut Kit<'_, R>) -> AnalyticsParts {
    let chart = kit.group(ROOT, "chart", Transform::default());
    let mut bars = Vec::with_capacity(6);
    let mut bar_phases = Vec::with_capacity(6);
    for i in 0..6 {
        bar_phases.push(kit.phase());
        let material = kit.accent(0.75).with_glow(0.4);
        let at = Vec3::new(-1.25 + 0.5 * i as f32, -0.5, 0.0);
        bars.push(kit.mesh(chart, "bar", geometry::cuboid(0.28, 1.0, 0.28), material, Transform::at(at)));
    }
    let axis_material = kit.accent(0.4);
    let axes = [
        (Vec3::new(-1.6, -1.0, 0.0), Vec3::new(1.6, -1.0, 0.0)),
        (Vec3::new(-1.6, -1.0, 0.0), Vec3::new(-1.6, 1.4, 0.0)),
    ];
    kit.lines(chart, "axes", geometry::segments(&axes), axis_material, Transform::default());

    let trend_points: Vec<Vec3> = (0..6)
        .map(|i| {
            let jitter = kit.rng.gen_range(-0.12..0.12);
            Vec3::new(-1.25 + 0.5 * i as f32, -0.2 + 0.25 * i as f32 + jitter, 0.3)
        })
        .collect();
    let trend_material = kit.glow(1.4, 0.9);
    let trend = kit.lines(chart, "trend", geometry::polyline(&trend_points), trend_material, Transform::default());
    let scatter_points = kit.in_box(80, Vec3::new(1.8, 1.3, 0.8));
    let scatter_material = kit.glow(0.8, 0.6).with_point_size(2.0);
    let scatter = kit.points(chart, "scatter", geometry::points(scatter_points), scatter_material, Transform::default());

    AnalyticsParts {
        chart,
        bars,
        trend,
        scatter,
        bar_phases,
        tilt: Vec2::ZERO,
    }
}

fn security<R: Rng + ?Sized>(kit: &mut Kit<'_, R>) -> SecurityParts {
    let d = kit.desc.detail;
    let pivot = kit.group(ROOT, "pivot", Transform::default());
    let shield_material = kit.accent(0.45);
    let shield_transform = Transform {
        scale: Vec3::new(1.0, 1.2, 0.45),
        ..Transform::default()
    };
    let shield = kit.lines(
        pivot,
        "shield",
        geometry::wire_polyhedron(Polyhedron::Icosahedron, 1.5),
        shield_material,
        shield_transform,
    );
    let lock_material = kit.glow(1.0, 0.85);
    let lock = kit.mesh(pivot, "lock", geometry::cuboid(0.7, 0.55, 0.3), lock_material, Transform::at(Vec3::new(0.0, -0.2, 0.0)));
    let shackle_material = kit.accent(0.9);
    let shackle = kit.mesh(
        pivot,
        "shackle",
        geometry::torus(0.24, 0.05, 8, d),
        shackle_material,
        Transform::at(Vec3::new(0.0, 0.12, 0.0)),
    );
    let scanner_material = kit.glow(1.2, 0.0);
    let scanner = kit.mesh(pivot, "scanner", geometry::plane(2.6, 2.6), scanner_material, rotated(Vec3::new(-FRAC_PI_2, 0.0, 0.0)));
    let rings = std::array::from_fn(|i| {
        let material = kit.glow(0.8, 0.5);
        let tilt = Vec3::new(FRAC_PI_2 + 0.2 * i as f32, 0.3 * i as f32, 0.0);
        kit.lines(ROOT, "perimeter", geometry::ring(1.9 + 0.2 * i as f32, 6), material, rotated(tilt))
    });
    let scan = kit.unit();

    SecurityParts {
        pivot,
        shield,
        lock,
        shackle,
        scanner,
        rings,
        scan,
        tilt: Vec2::ZERO,
    }
}

fn infrastructure<R: Rng + ?Sized>(kit: &mut Kit<'_, R>) -> InfrastructureParts {
    let rack = kit.group(ROOT, "rack", Transform::default());
    let mut units = Vec::with_capacity(5);
    let mut leds = Vec::with_capacity(5);
    let mut led_phases = Vec::with_capacity(5);
    for i in 0..5 {
        let material = kit.accent(0.55);
        let at = Vec3::new(0.0, -1.0 + 0.5 * i as f32, 0.0);
        let unit = kit.mesh(rack, "server", geometry::cuboid(1.6, 0.32, 0.9), material, Transform::at(at));
        let lights: Vec<Vec3> = (0..6).map(|k| Vec3::new(-0.6 + 0.1 * k as f32, 0.05, 0.46)).collect();
        let led_material = kit.glow(2.0, 1.0).with_point_size(3.0);
        leds.push(kit.points(unit, "status-leds", geometry::points(lights), led_material, Transform::default()));
        led_phases.push(kit.phase());
        units.push(unit);
    }
    let corners: Vec<(Vec3, Vec3)> = [(-0.85, -0.5), (0.85, -0.5), (-0.85, 0.5), (0.85, 0.5)]
        .iter()
        .map(|&(x, z)| (Vec3::new(x, -1.4, z), Vec3::new(x, 1.4, z)))
        .collect();
    let beam_material = kit.glow(1.2, 0.5);
    let beams = kit.lines(rack, "light-beams", geometry::segments(&corners), beam_material, Transform::default());
    let pulse_material = kit.glow(2.5, 1.0);
    let pulse = kit.mesh(
        rack,
        "beam-pulse",
        geometry::sphere(0.07, 8, 6),
        pulse_material,
        Transform::at(Vec3::new(0.85, -1.4, 0.5)),
    );
    let pulse_progress = kit.unit();

    InfrastructureParts {
        rack,
        units,
        leds,
        beams,
        pulse,
        led_phases,
        pulse_progress,
        tilt: Vec2::ZERO,
    }
}

fn commerce<R: Rng + ?Sized>(kit: &mut Kit<'_, R>) -> CommerceParts {
    let d = kit.desc.detail;
    let stack = kit.group(ROOT, "stack", Transform::at(Vec3::new(-0.2, -0.6, 0.0)));
    let mut coins = Vec::with_capacity(5);
    let mut coin_rest = Vec::with_capacity(5);
    for i in 0..5 {
        let rest = 0.15 * i as f32;
        let wobble = Vec3::new(kit.rng.gen_range(-0.04..0.04), rest, kit.rng.gen_range(-0.04..0.04));
        let material = kit.accent(1.0).with_glow(0.4).opaque();
        coins.push(kit.mesh(stack, "coin", geometry::cylinder(0.55, 0.55, 0.12, d), material, Transform::at(wobble)));
        coin_rest.push(rest);
    }

    let orbit = kit.group(ROOT, "parcel-orbit", rotated(Vec3::new(0.25, 0.0, 0.0)));
    let mut parcels = Vec::with_capacity(4);
    for i in 0..4 {
        let a = TAU * i as f32 / 4.0;
        let at = Vec3::new(1.8 * a.cos(), 0.0, 1.8 * a.sin());
        let material = kit.accent(0.6);
        let parcel = kit.mesh(orbit, "parcel", geometry::cuboid(0.3, 0.3, 0.3), material, Transform::at(at));
        let edges = kit.glow(1.2, 0.9);
        kit.lines(parcel, "parcel-edges", geometry::box_edges(0.3, 0.3, 0.3), edges, Transform::default());
        parcels.push(parcel);
    }
    let glints = kit.shell(100, 1.2, 2.4);
    let sparkle_material = kit.glow(1.2, 0.8).with_point_size(2.0);
    let sparkle = kit.points(ROOT, "sparkle", geometry::points(glints), sparkle_material, Transform::default());

    CommerceParts {
        stack,
        coins,
        orbit,
        parcels,
        sparkle,
        coin_rest,
        tilt: Vec2::ZERO,
    }
}
