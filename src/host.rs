//! Platform-independent renderer host: owns the backend, the controller and
//! the pipeline, and turns frame timestamps and resize events into ticks.

use crate::backdrop::BackdropFader;
use crate::config::{EngineConfig, EngineProps, SurfaceSettings};
use crate::controller::VizController;
use crate::pipeline::{FrameView, RenderBackend, RenderPipeline, RenderStats, SurfaceSize};
use crate::pointer::PointerState;
use crate::scene::SceneTree;

/// Used when neither the options nor the host supply a seed.
pub const DEFAULT_SEED: u64 = 0x5EED_D0A1;

pub struct Engine<B: RenderBackend> {
    backend: B,
    controller: VizController,
    pipeline: RenderPipeline,
    backdrop: BackdropFader,
    surface_settings: SurfaceSettings,
    surface: Option<SurfaceSize>,
    requested_index: i64,
    last_timestamp: Option<f64>,
    stats: RenderStats,
    shut_down: bool,
}

impl<B: RenderBackend> Engine<B> {
    pub fn new(backend: B, config: EngineConfig, props: &EngineProps, pointer: PointerState) -> Self {
        let seed = config.seed.unwrap_or(DEFAULT_SEED);
        let controller = VizController::new(&config, props.domain_index, pointer, seed);
        let mut backdrop = BackdropFader::new(config.fade.background_rate());
        backdrop.set_url(&props.background_media_url);
        Self {
            backend,
            controller,
            pipeline: RenderPipeline::new(config.post),
            backdrop,
            surface_settings: config.surface,
            surface: None,
            requested_index: props.domain_index,
            last_timestamp: None,
            stats: RenderStats::default(),
            shut_down: false,
        }
    }

    /// Sizes the drawing buffer to the container and matches the projection
    /// to the container's aspect.
    pub fn resize(&mut self, css_width: f32, css_height: f32, device_pixel_ratio: f32) {
        let ratio = device_pixel_ratio.min(self.surface_settings.max_pixel_ratio);
        let size = SurfaceSize::new(css_width, css_height, ratio);
        if self.surface == Some(size) {
            return;
        }
        log::debug!("surface {}x{} px (ratio {ratio})", size.pixel_width(), size.pixel_height());
        self.surface = Some(size);
        self.backend.resize(size);
        self.controller.resize(size.css_width, size.css_height);
    }

    /// Prop update from the page. Only an actual change triggers a crossfade.
    pub fn set_domain_index(&mut self, index: i64) {
        if index == self.requested_index {
            return;
        }
        self.requested_index = index;
        self.controller.set_selected_domain(index);
    }

    pub fn set_background_media_url(&mut self, url: &str) {
        self.backdrop.set_url(url);
    }

    /// One tick driven by the host's frame timestamp in milliseconds.
    pub fn frame(&mut self, timestamp_ms: f64) -> RenderStats {
        let delta = match self.last_timestamp {
            Some(last) => ((timestamp_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_timestamp = Some(timestamp_ms);
        self.step(delta)
    }

    pub fn step(&mut self, delta: f32) -> RenderStats {
        if self.shut_down {
            return RenderStats::default();
        }
        let delta = if delta.is_finite() {
            delta.clamp(0.0, self.surface_settings.max_frame_delta)
        } else {
            0.0
        };

        self.controller.update(delta);
        self.controller.drain_releases(&mut self.backend);
        self.backdrop.update(delta);

        let mut layers: Vec<&SceneTree> = Vec::with_capacity(2);
        layers.push(self.controller.overlay().tree());
        if let Some(model) = self.controller.lifecycle().live_model() {
            layers.push(model.tree());
        }
        let camera = self.controller.camera().camera();
        let frame = FrameView {
            camera,
            view_projection: camera.build_view_projection_matrix(),
            layers: &layers,
        };
        self.stats = self.pipeline.execute(&mut self.backend, &frame);
        self.stats
    }

    /// Disposes every retained model and releases all GPU objects. Idempotent.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        self.controller.teardown();
        let released = self.controller.pending_releases().len();
        self.controller.drain_releases(&mut self.backend);
        self.backend.release_all();
        log::info!("engine shut down, released {released} handles");
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn controller(&self) -> &VizController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut VizController {
        &mut self.controller
    }

    pub fn backdrop(&self) -> &BackdropFader {
        &self.backdrop
    }

    pub fn surface(&self) -> Option<SurfaceSize> {
        self.surface
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }
}
