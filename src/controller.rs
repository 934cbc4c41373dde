use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::animation::{self, FrameInput};
use crate::camera::CameraRig;
use crate::catalog::normalize_index;
use crate::config::EngineConfig;
use crate::lifecycle::ModelLifecycle;
use crate::overlay::ConnectionGraph;
use crate::pointer::PointerState;
use crate::scene::{Dispose, ReleaseLedger, ReleaseSink};

/// Drives one tick of the engine in a fixed order:
/// camera rig, connection graph, live model animation, fade step.
///
/// Domain switches are queued and applied atomically at the start of the
/// next tick; released resources are queued until the host drains them
/// into its GPU backend.
pub struct VizController {
    camera: CameraRig,
    overlay: ConnectionGraph,
    lifecycle: ModelLifecycle,
    pointer: PointerState,
    releases: ReleaseLedger,
    pending: Option<i64>,
    elapsed: f64,
}

impl VizController {
    pub fn new(config: &EngineConfig, initial_index: i64, pointer: PointerState, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let overlay = ConnectionGraph::new(config.overlay.clone(), &mut rng);
        let lifecycle = ModelLifecycle::new(config.fade.rate(), ChaCha8Rng::seed_from_u64(rng.gen()));
        Self {
            camera: CameraRig::new(config.camera.clone()),
            overlay,
            lifecycle,
            pointer,
            releases: ReleaseLedger::default(),
            pending: Some(initial_index),
            elapsed: 0.0,
        }
    }

    /// Queues a switch for the next tick. Several calls within one frame
    /// collapse into the last.
    pub fn set_selected_domain(&mut self, index: i64) {
        self.pending = Some(index);
    }

    pub fn update(&mut self, delta: f32) {
        if let Some(index) = self.pending.take() {
            self.lifecycle.select_domain(index, &mut self.releases);
            self.overlay.set_selected(normalize_index(index));
        }
        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
        self.elapsed += f64::from(delta);
        let time = animation::scene_time(self.elapsed);
        let pointer = self.pointer.get();

        self.camera.update(time, pointer);
        self.overlay.update(delta);
        if let Some(model) = self.lifecycle.live_model_mut() {
            let frame = FrameInput {
                elapsed: time,
                delta,
                pointer,
            };
            animation::animate(model, &frame);
        }
        self.lifecycle.fade_step(delta);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.camera.resize(width, height);
    }

    /// Releases queued since the last drain.
    pub fn pending_releases(&self) -> &ReleaseLedger {
        &self.releases
    }

    pub fn drain_releases(&mut self, sink: &mut dyn ReleaseSink) {
        self.releases.drain_into(sink);
    }

    /// Disposes the live model and the overlay. Idempotent.
    pub fn teardown(&mut self) {
        self.pending = None;
        self.lifecycle.dispose_all(&mut self.releases);
        self.overlay.dispose(&mut self.releases);
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn overlay(&self) -> &ConnectionGraph {
        &self.overlay
    }

    pub fn lifecycle(&self) -> &ModelLifecycle {
        &self.lifecycle
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    /// Seconds of simulated time since construction.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn has_pending_switch(&self) -> bool {
        self.pending.is_some()
    }
}
