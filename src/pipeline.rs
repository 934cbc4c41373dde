//! Fixed per-frame pipeline: scene, bloom, depth-of-field. Backends supply
//! the passes; the pipeline only fixes their order and parameters.

use std::collections::HashSet;

use glam::Mat4;

use crate::camera::Camera;
use crate::config::{BloomSettings, DepthOfFieldSettings, PostSettings};
use crate::scene::{ReleaseSink, ResourceId, ResourceKind, SceneTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Scene,
    Bloom,
    DepthOfField,
}

pub const PASSES: [Pass; 3] = [Pass::Scene, Pass::Bloom, Pass::DepthOfField];

/// Drawing-buffer size in device pixels, derived from the container's CSS size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    pub css_width: f32,
    pub css_height: f32,
    pub pixel_ratio: f32,
}

impl SurfaceSize {
    pub fn new(css_width: f32, css_height: f32, pixel_ratio: f32) -> Self {
        Self {
            css_width: css_width.max(0.0),
            css_height: css_height.max(0.0),
            pixel_ratio: if pixel_ratio > 0.0 { pixel_ratio } else { 1.0 },
        }
    }

    pub fn pixel_width(&self) -> u32 {
        (self.css_width * self.pixel_ratio).round().max(1.0) as u32
    }

    pub fn pixel_height(&self) -> u32 {
        (self.css_height * self.pixel_ratio).round().max(1.0) as u32
    }

    pub fn aspect(&self) -> f32 {
        self.pixel_width() as f32 / self.pixel_height() as f32
    }
}

/// Everything the scene pass draws this frame.
pub struct FrameView<'a> {
    pub camera: &'a Camera,
    pub view_projection: Mat4,
    /// Drawn in order; later layers blend over earlier ones.
    pub layers: &'a [&'a SceneTree],
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    pub draw_calls: u32,
    pub primitives: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub scene: PassStats,
    pub bloom: PassStats,
    pub depth_of_field: PassStats,
}

impl RenderStats {
    pub fn draw_calls(&self) -> u32 {
        self.scene.draw_calls + self.bloom.draw_calls + self.depth_of_field.draw_calls
    }
}

pub trait RenderBackend: ReleaseSink {
    fn resize(&mut self, size: SurfaceSize);
    fn scene_pass(&mut self, frame: &FrameView<'_>) -> PassStats;
    fn bloom_pass(&mut self, settings: &BloomSettings) -> PassStats;
    fn depth_of_field_pass(&mut self, settings: &DepthOfFieldSettings, camera: &Camera) -> PassStats;
    /// Frees every GPU object the backend still owns. Called once at unmount.
    fn release_all(&mut self);
}

pub struct RenderPipeline {
    settings: PostSettings,
}

impl RenderPipeline {
    pub fn new(settings: PostSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &PostSettings {
        &self.settings
    }

    pub fn execute<B: RenderBackend + ?Sized>(&self, backend: &mut B, frame: &FrameView<'_>) -> RenderStats {
        let mut stats = RenderStats::default();
        for pass in PASSES {
            match pass {
                Pass::Scene => stats.scene = backend.scene_pass(frame),
                Pass::Bloom => stats.bloom = backend.bloom_pass(&self.settings.bloom),
                Pass::DepthOfField => {
                    stats.depth_of_field = backend.depth_of_field_pass(&self.settings.depth_of_field, frame.camera)
                }
            }
        }
        stats
    }
}

/// GPU-less backend. Tracks which resources it has "uploaded" and which were
/// released so resource discipline is observable without a context.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    size: Option<SurfaceSize>,
    uploaded: HashSet<ResourceId>,
    released: Vec<(ResourceKind, ResourceId)>,
    double_releases: usize,
    passes: Vec<Pass>,
    frames: u64,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> Option<SurfaceSize> {
        self.size
    }

    pub fn released(&self) -> &[(ResourceKind, ResourceId)] {
        &self.released
    }

    /// Releases of ids that had already been released.
    pub fn double_releases(&self) -> usize {
        self.double_releases
    }

    /// Resources drawn at least once and not released since.
    pub fn resident(&self) -> usize {
        self.uploaded.len()
    }

    /// Passes executed during the most recent frame, in order.
    pub fn last_passes(&self) -> &[Pass] {
        &self.passes
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl ReleaseSink for HeadlessBackend {
    fn release(&mut self, kind: ResourceKind, id: ResourceId) {
        if self.released.iter().any(|&(_, r)| r == id) {
            self.double_releases += 1;
        }
        self.uploaded.remove(&id);
        self.released.push((kind, id));
    }
}

impl RenderBackend for HeadlessBackend {
    fn resize(&mut self, size: SurfaceSize) {
        self.size = Some(size);
    }

    fn scene_pass(&mut self, frame: &FrameView<'_>) -> PassStats {
        self.frames += 1;
        self.passes.clear();
        self.passes.push(Pass::Scene);
        let mut stats = PassStats::default();
        for layer in frame.layers {
            layer.walk(Mat4::IDENTITY, &mut |_, surface, _| {
                if surface.material.effective_opacity() <= 0.0 {
                    return;
                }
                self.uploaded.insert(surface.geometry.id());
                self.uploaded.insert(surface.material.id());
                stats.draw_calls += 1;
                stats.primitives += surface.geometry.element_count() as u32;
            });
        }
        stats
    }

    fn bloom_pass(&mut self, _settings: &BloomSettings) -> PassStats {
        self.passes.push(Pass::Bloom);
        PassStats {
            draw_calls: 4,
            primitives: 12,
        }
    }

    fn depth_of_field_pass(&mut self, _settings: &DepthOfFieldSettings, _camera: &Camera) -> PassStats {
        self.passes.push(Pass::DepthOfField);
        PassStats {
            draw_calls: 1,
            primitives: 3,
        }
    }

    fn release_all(&mut self) {
        self.uploaded.clear();
    }
}
