//! Scene graph: an arena of nodes rooted at one group, each optionally
//! carrying a renderable surface (geometry + material). Parts are addressed
//! by [`NodeId`] so animation code never has to search the tree.

use std::sync::atomic::{AtomicU64, Ordering};

use glam::{EulerRot, Mat4, Quat, Vec3};

/// Identity of a GPU-backed resource. Backends key their buffers by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(u64);

static NEXT_RESOURCE: AtomicU64 = AtomicU64::new(1);

impl ResourceId {
    fn next() -> Self {
        ResourceId(NEXT_RESOURCE.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Geometry,
    Material,
}

/// Receiver for released resources. The GPU backend deletes its objects;
/// the ledger just records them.
pub trait ReleaseSink {
    fn release(&mut self, kind: ResourceKind, id: ResourceId);
}

/// Recursive disposal. Implementations must be idempotent: disposing twice
/// releases nothing the second time.
pub trait Dispose {
    fn dispose(&mut self, sink: &mut dyn ReleaseSink);
}

/// Records every release it receives, in order.
#[derive(Debug, Default)]
pub struct ReleaseLedger {
    released: Vec<(ResourceKind, ResourceId)>,
}

impl ReleaseLedger {
    pub fn len(&self) -> usize {
        self.released.len()
    }

    pub fn is_empty(&self) -> bool {
        self.released.is_empty()
    }

    pub fn count(&self, kind: ResourceKind) -> usize {
        self.released.iter().filter(|(k, _)| *k == kind).count()
    }

    /// Hands the recorded releases to another sink and forgets them.
    pub fn drain_into(&mut self, sink: &mut dyn ReleaseSink) {
        for (kind, id) in self.released.drain(..) {
            sink.release(kind, id);
        }
    }
}

impl ReleaseSink for ReleaseLedger {
    fn release(&mut self, kind: ResourceKind, id: ResourceId) {
        self.released.push((kind, id));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    Triangles,
    /// Independent segments, two vertices each.
    Lines,
    Points,
}

#[derive(Debug)]
pub struct Geometry {
    id: ResourceId,
    topology: Topology,
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    indices: Vec<u32>,
    disposed: bool,
}

impl Geometry {
    pub fn new(topology: Topology, positions: Vec<Vec3>, normals: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self {
            id: ResourceId::next(),
            topology,
            positions,
            normals,
            indices,
            disposed: false,
        }
    }

    pub fn id(&self) -> ResourceId {
        self.id
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of vertices the draw call consumes.
    pub fn element_count(&self) -> usize {
        if self.indices.is_empty() {
            self.positions.len()
        } else {
            self.indices.len()
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl Dispose for Geometry {
    fn dispose(&mut self, sink: &mut dyn ReleaseSink) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        sink.release(ResourceKind::Geometry, self.id);
    }
}

#[derive(Debug)]
pub struct Material {
    id: ResourceId,
    pub color: Vec3,
    pub emissive: Vec3,
    pub emissive_intensity: f32,
    /// Opacity owned by the animation.
    pub opacity: f32,
    /// Crossfade multiplier owned by the lifecycle manager.
    pub fade: f32,
    pub transparent: bool,
    pub additive: bool,
    pub point_size: f32,
    disposed: bool,
}

impl Material {
    pub fn new(color: Vec3, emissive: Vec3) -> Self {
        Self {
            id: ResourceId::next(),
            color,
            emissive,
            emissive_intensity: 0.0,
            opacity: 1.0,
            fade: 1.0,
            transparent: true,
            additive: false,
            point_size: 1.0,
            disposed: false,
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_glow(mut self, intensity: f32) -> Self {
        self.emissive_intensity = intensity;
        self
    }

    pub fn additive(mut self) -> Self {
        self.additive = true;
        self
    }

    pub fn opaque(mut self) -> Self {
        self.transparent = false;
        self
    }

    pub fn with_point_size(mut self, size: f32) -> Self {
        self.point_size = size;
        self
    }

    pub fn id(&self) -> ResourceId {
        self.id
    }

    /// Opacity actually sent to the GPU.
    pub fn effective_opacity(&self) -> f32 {
        (self.opacity * self.fade).clamp(0.0, 1.0)
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl Dispose for Material {
    fn dispose(&mut self, sink: &mut dyn ReleaseSink) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        sink.release(ResourceKind::Material, self.id);
    }
}

#[derive(Debug)]
pub struct Surface {
    pub geometry: Geometry,
    pub material: Material,
}

impl Dispose for Surface {
    fn dispose(&mut self, sink: &mut dyn ReleaseSink) {
        self.geometry.dispose(sink);
        self.material.dispose(sink);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Group,
    Mesh,
    Lines,
    Points,
}

#[derive(Debug)]
pub enum Primitive {
    Group,
    Mesh(Surface),
    Lines(Surface),
    Points(Surface),
}

impl Primitive {
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Primitive::Group => PrimitiveKind::Group,
            Primitive::Mesh(_) => PrimitiveKind::Mesh,
            Primitive::Lines(_) => PrimitiveKind::Lines,
            Primitive::Points(_) => PrimitiveKind::Points,
        }
    }

    pub fn surface(&self) -> Option<&Surface> {
        match self {
            Primitive::Group => None,
            Primitive::Mesh(s) | Primitive::Lines(s) | Primitive::Points(s) => Some(s),
        }
    }

    pub fn surface_mut(&mut self) -> Option<&mut Surface> {
        match self {
            Primitive::Group => None,
            Primitive::Mesh(s) | Primitive::Lines(s) | Primitive::Points(s) => Some(s),
        }
    }
}

/// Euler rotation in radians, XYZ order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z);
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.position)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
pub struct Node {
    pub name: &'static str,
    pub transform: Transform,
    pub visible: bool,
    pub primitive: Primitive,
    children: Vec<NodeId>,
}

impl Node {
    pub fn new(name: &'static str, primitive: Primitive) -> Self {
        Self {
            name,
            transform: Transform::default(),
            visible: true,
            primitive,
            children: Vec::new(),
        }
    }

    pub fn mesh(name: &'static str, geometry: Geometry, material: Material) -> Self {
        Self::new(name, Primitive::Mesh(Surface { geometry, material }))
    }

    pub fn lines(name: &'static str, geometry: Geometry, material: Material) -> Self {
        Self::new(name, Primitive::Lines(Surface { geometry, material }))
    }

    pub fn points(name: &'static str, geometry: Geometry, material: Material) -> Self {
        Self::new(name, Primitive::Points(Surface { geometry, material }))
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn material(&self) -> Option<&Material> {
        self.primitive.surface().map(|s| &s.material)
    }
}

#[derive(Debug)]
pub struct SceneTree {
    nodes: Vec<Node>,
}

impl SceneTree {
    pub const ROOT: NodeId = NodeId(0);

    pub fn new(name: &'static str) -> Self {
        Self {
            nodes: vec![Node::new(name, Primitive::Group)],
        }
    }

    pub fn root(&self) -> NodeId {
        Self::ROOT
    }

    pub fn add(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn transform_mut(&mut self, id: NodeId) -> &mut Transform {
        &mut self.nodes[id.0].transform
    }

    pub fn material(&self, id: NodeId) -> Option<&Material> {
        self.nodes[id.0].material()
    }

    pub fn material_mut(&mut self, id: NodeId) -> Option<&mut Material> {
        self.nodes[id.0].primitive.surface_mut().map(|s| &mut s.material)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn materials(&self) -> impl Iterator<Item = &Material> {
        self.nodes.iter().filter_map(Node::material)
    }

    pub fn materials_mut(&mut self) -> impl Iterator<Item = &mut Material> {
        self.nodes
            .iter_mut()
            .filter_map(|n| n.primitive.surface_mut().map(|s| &mut s.material))
    }

    /// Geometry and material handles held by the tree and not yet released.
    pub fn live_resources(&self) -> usize {
        self.nodes
            .iter()
            .filter_map(|n| n.primitive.surface())
            .map(|s| usize::from(!s.geometry.is_disposed()) + usize::from(!s.material.is_disposed()))
            .sum()
    }

    /// Visits every visible surface depth-first with its world matrix.
    /// Hidden nodes prune their subtree.
    pub fn walk<F>(&self, parent: Mat4, f: &mut F)
    where
        F: FnMut(&Node, &Surface, Mat4),
    {
        self.walk_from(Self::ROOT, parent, f);
    }

    fn walk_from<F>(&self, id: NodeId, parent: Mat4, f: &mut F)
    where
        F: FnMut(&Node, &Surface, Mat4),
    {
        let node = &self.nodes[id.0];
        if !node.visible {
            return;
        }
        let world = parent * node.transform.matrix();
        if let Some(surface) = node.primitive.surface() {
            f(node, surface, world);
        }
        for &child in &node.children {
            self.walk_from(child, world, f);
        }
    }

    fn dispose_from(&mut self, id: NodeId, sink: &mut dyn ReleaseSink) {
        // Children first; the index list is cloned out so the arena can be borrowed mutably.
        let children = self.nodes[id.0].children.clone();
        for child in children {
            self.dispose_from(child, sink);
        }
        if let Some(surface) = self.nodes[id.0].primitive.surface_mut() {
            surface.dispose(sink);
        }
    }
}

impl Dispose for SceneTree {
    fn dispose(&mut self, sink: &mut dyn ReleaseSink) {
        self.dispose_from(Self::ROOT, sink);
    }
}

/// Exponential smoothing step: move `current` a fixed fraction toward `target`.
pub fn approach(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor
}

pub fn approach_vec3(current: Vec3, target: Vec3, factor: f32) -> Vec3 {
    current + (target - current) * factor
}
