//! Domain model catalog: `domain index -> Model`.
//!
//! The structure of each model is a pure function of `index mod 10`;
//! decorative scatter and phases come from the caller's RNG.

mod archetypes;

use glam::Vec3;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::scene::{Dispose, NodeId, ReleaseSink, SceneTree, Transform};

pub use archetypes::{
    AiParts, AnalyticsParts, Archetype, ChatParts, CloudParts, CommerceParts, ErpParts, InfrastructureParts,
    MobileParts, PartRef, SecurityParts, WebParts,
};

pub const CATALOG_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchetypeKind {
    Ai,
    Chat,
    Mobile,
    Web,
    Erp,
    Cloud,
    Analytics,
    Security,
    Infrastructure,
    Commerce,
}

impl ArchetypeKind {
    pub const ALL: [ArchetypeKind; CATALOG_SIZE] = [
        ArchetypeKind::Ai,
        ArchetypeKind::Chat,
        ArchetypeKind::Mobile,
        ArchetypeKind::Web,
        ArchetypeKind::Erp,
        ArchetypeKind::Cloud,
        ArchetypeKind::Analytics,
        ArchetypeKind::Security,
        ArchetypeKind::Infrastructure,
        ArchetypeKind::Commerce,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ArchetypeKind::Ai => "ai",
            ArchetypeKind::Chat => "chat",
            ArchetypeKind::Mobile => "mobile",
            ArchetypeKind::Web => "web",
            ArchetypeKind::Erp => "erp",
            ArchetypeKind::Cloud => "cloud",
            ArchetypeKind::Analytics => "analytics",
            ArchetypeKind::Security => "security",
            ArchetypeKind::Infrastructure => "infrastructure",
            ArchetypeKind::Commerce => "commerce",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainDescriptor {
    pub id: usize,
    pub accent: Vec3,
    pub emissive: Vec3,
    pub kind: ArchetypeKind,
    /// Tessellation budget for curved primitives.
    pub detail: u32,
}

const fn domain(id: usize, kind: ArchetypeKind, accent: [f32; 3], emissive: [f32; 3], detail: u32) -> DomainDescriptor {
    DomainDescriptor {
        id,
        accent: Vec3::new(accent[0], accent[1], accent[2]),
        emissive: Vec3::new(emissive[0], emissive[1], emissive[2]),
        kind,
        detail,
    }
}

pub const DOMAINS: [DomainDescriptor; CATALOG_SIZE] = [
    domain(0, ArchetypeKind::Ai, [0.36, 0.55, 1.0], [0.55, 0.35, 1.0], 24),
    domain(1, ArchetypeKind::Chat, [0.2, 0.85, 0.75], [0.1, 1.0, 0.8], 28),
    domain(2, ArchetypeKind::Mobile, [1.0, 0.45, 0.7], [1.0, 0.3, 0.55], 16),
    domain(3, ArchetypeKind::Web, [0.3, 0.75, 1.0], [0.2, 0.9, 1.0], 12),
    domain(4, ArchetypeKind::Erp, [1.0, 0.7, 0.25], [1.0, 0.55, 0.1], 32),
    domain(5, ArchetypeKind::Cloud, [0.65, 0.8, 1.0], [0.45, 0.7, 1.0], 20),
    domain(6, ArchetypeKind::Analytics, [0.45, 1.0, 0.5], [0.3, 0.95, 0.4], 16),
    domain(7, ArchetypeKind::Security, [1.0, 0.3, 0.3], [1.0, 0.15, 0.25], 24),
    domain(8, ArchetypeKind::Infrastructure, [0.6, 0.5, 1.0], [0.4, 0.3, 1.0], 12),
    domain(9, ArchetypeKind::Commerce, [1.0, 0.85, 0.3], [1.0, 0.75, 0.15], 24),
];

/// Wraps any integer, negative included, onto the catalog.
pub fn normalize_index(index: i64) -> usize {
    index.rem_euclid(CATALOG_SIZE as i64) as usize
}

pub fn descriptor(index: i64) -> &'static DomainDescriptor {
    &DOMAINS[normalize_index(index)]
}

/// One procedurally built archetype. Structure is fixed after construction;
/// only transforms and material scalars change.
#[derive(Debug)]
pub struct Model {
    tree: SceneTree,
    descriptor: &'static DomainDescriptor,
    archetype: Archetype,
}

impl Model {
    pub fn kind(&self) -> ArchetypeKind {
        self.archetype.kind()
    }

    pub fn descriptor(&self) -> &'static DomainDescriptor {
        self.descriptor
    }

    pub fn tree(&self) -> &SceneTree {
        &self.tree
    }

    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    pub fn archetype(&self) -> &Archetype {
        &self.archetype
    }

    /// Split borrow for the animation driver.
    pub(crate) fn parts_mut(&mut self) -> (&mut SceneTree, &mut Archetype) {
        (&mut self.tree, &mut self.archetype)
    }

    /// Applies the crossfade multiplier to every transparent material.
    pub fn set_fade(&mut self, fade: f32) {
        for material in self.tree.materials_mut().filter(|m| m.transparent) {
            material.fade = fade;
        }
    }

    /// Puts the root back at the scene origin with no rotation.
    pub fn reset_root(&mut self) {
        *self.tree.transform_mut(SceneTree::ROOT) = Transform::default();
    }

    pub fn live_resources(&self) -> usize {
        self.tree.live_resources()
    }
}

impl Dispose for Model {
    fn dispose(&mut self, sink: &mut dyn ReleaseSink) {
        self.tree.dispose(sink);
    }
}

pub fn build<R: Rng + ?Sized>(index: i64, rng: &mut R) -> Model {
    let descriptor = descriptor(index);
    let (tree, archetype) = archetypes::assemble(descriptor, rng);
    Model {
        tree,
        descriptor,
        archetype,
    }
}

/// Convenience for callers without an RNG of their own.
pub fn build_seeded(index: i64, seed: u64) -> Model {
    build(index, &mut ChaCha8Rng::seed_from_u64(seed))
}
