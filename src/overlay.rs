//! Connection graph drawn behind the archetype. Built once per mount; a
//! domain switch only flips the `active` flags.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use crate::catalog::{CATALOG_SIZE, DOMAINS};
use crate::config::OverlaySettings;
use crate::geometry;
use crate::scene::{approach, Dispose, Material, Node, NodeId, ReleaseSink, SceneTree, Transform};

/// Fixed adjacency: the outer cycle plus five chords.
pub const EDGES: [(usize, usize); 15] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 4),
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 8),
    (8, 9),
    (9, 0),
    (0, 5),
    (1, 4),
    (2, 7),
    (3, 8),
    (6, 9),
];

const PATH_SEGMENTS: usize = 24;
const PARTICLE_COLOR: Vec3 = Vec3::new(0.85, 0.9, 1.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub id: usize,
    pub position: Vec3,
}

#[derive(Debug)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
    pub control: Vec3,
    /// Particle position along the curve, in [0, 1).
    pub progress: f32,
    pub active: bool,
    pub intensity: f32,
    path: NodeId,
    particle: NodeId,
}

impl Edge {
    /// True when `index` is either endpoint; order of the pair is irrelevant.
    pub fn connects(&self, index: usize) -> bool {
        self.a == index || self.b == index
    }

    pub fn path(&self) -> NodeId {
        self.path
    }

    pub fn particle(&self) -> NodeId {
        self.particle
    }
}

pub struct ConnectionGraph {
    anchors: Vec<Anchor>,
    edges: Vec<Edge>,
    tree: SceneTree,
    settings: OverlaySettings,
    selected: Option<usize>,
}

impl ConnectionGraph {
    pub fn new<R: Rng + ?Sized>(settings: OverlaySettings, rng: &mut R) -> Self {
        let anchors: Vec<Anchor> = (0..CATALOG_SIZE)
            .map(|id| {
                let angle = TAU * id as f32 / CATALOG_SIZE as f32;
                let position = Vec3::new(
                    settings.anchor_radius * angle.cos(),
                    0.9 * (2.0 * angle).sin(),
                    -1.5 + 0.8 * angle.sin(),
                );
                Anchor { id, position }
            })
            .collect();

        let mut tree = SceneTree::new("connection-graph");
        let root = tree.root();
        for anchor in &anchors {
            let color = DOMAINS[anchor.id].accent;
            let material = Material::new(color, color).with_glow(1.0).with_opacity(0.8).additive();
            let node = Node::mesh("anchor", geometry::sphere(0.07, 10, 6), material);
            tree.add(root, node.with_transform(Transform::at(anchor.position)));
        }

        let mut edges = Vec::with_capacity(EDGES.len());
        for &(a, b) in &EDGES {
            let (start, end) = (anchors[a].position, anchors[b].position);
            let control = curve_control(start, end, settings.curve_bend);
            let samples: Vec<Vec3> = (0..=PATH_SEGMENTS)
                .map(|k| geometry::quadratic_bezier(start, control, end, k as f32 / PATH_SEGMENTS as f32))
                .collect();
            let color = DOMAINS[a].accent;
            let line_material = Material::new(color, color)
                .with_glow(0.6)
                .with_opacity(settings.idle_intensity)
                .additive();
            let path = tree.add(root, Node::lines("edge-path", geometry::polyline(&samples), line_material));
            let spark_material = Material::new(PARTICLE_COLOR, color)
                .with_glow(1.5)
                .with_opacity(settings.idle_intensity)
                .with_point_size(4.0)
                .additive();
            let spark = Node::points("edge-particle", geometry::points(vec![Vec3::ZERO]), spark_material);
            let particle = tree.add(root, spark.with_transform(Transform::at(start)));
            edges.push(Edge {
                a,
                b,
                control,
                progress: rng.gen_range(0.0..1.0),
                active: false,
                intensity: settings.idle_intensity,
                path,
                particle,
            });
        }

        Self {
            anchors,
            edges,
            tree,
            settings,
            selected: None,
        }
    }

    pub fn set_selected(&mut self, index: usize) {
        self.selected = Some(index);
        for edge in &mut self.edges {
            edge.active = edge.connects(index);
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn update(&mut self, delta: f32) {
        let s = &self.settings;
        for edge in &mut self.edges {
            let speed = if edge.active { s.active_speed } else { s.idle_speed };
            edge.progress = (edge.progress + delta * speed).rem_euclid(1.0);
            let target = if edge.active { s.active_intensity } else { s.idle_intensity };
            edge.intensity = approach(edge.intensity, target, s.intensity_smoothing);

            let start = self.anchors[edge.a].position;
            let end = self.anchors[edge.b].position;
            let at = geometry::quadratic_bezier(start, edge.control, end, edge.progress);
            self.tree.transform_mut(edge.particle).position = at;
            if let Some(m) = self.tree.material_mut(edge.path) {
                m.opacity = edge.intensity;
            }
            if let Some(m) = self.tree.material_mut(edge.particle) {
                m.opacity = (edge.intensity * 1.2).min(1.0);
            }
        }
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn tree(&self) -> &SceneTree {
        &self.tree
    }

    /// Position of a particle evaluated on its edge's curve.
    pub fn point_on_edge(&self, edge: &Edge, t: f32) -> Vec3 {
        let start = self.anchors[edge.a].position;
        let end = self.anchors[edge.b].position;
        geometry::quadratic_bezier(start, edge.control, end, t)
    }
}

impl Dispose for ConnectionGraph {
    fn dispose(&mut self, sink: &mut dyn ReleaseSink) {
        self.tree.dispose(sink);
    }
}

/// Midpoint pushed sideways (perpendicular in the horizontal plane) and lifted.
fn curve_control(start: Vec3, end: Vec3, bend: f32) -> Vec3 {
    let span = end - start;
    let side = span.cross(Vec3::Y).normalize_or_zero();
    let mid = (start + end) * 0.5;
    mid + side * span.length() * bend + Vec3::Y * span.length() * bend * 0.5
}
