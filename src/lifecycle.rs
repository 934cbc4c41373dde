//! Owns the live archetype model and runs the crossfade swap.

use rand_chacha::ChaCha8Rng;

use crate::catalog::{self, Model};
use crate::scene::{Dispose, ReleaseSink};

/// Accumulated rounding over a fade's frames stays below this.
const SETTLE_EPSILON: f32 = 1e-4;

/// The live model and its fade-in. The fade accumulator is the only source
/// of truth for fade opacity; materials receive a copy of it.
#[derive(Debug)]
pub struct TransitionState {
    pub incoming: Model,
    pub fade_progress: f32,
    fading: bool,
}

impl TransitionState {
    pub fn is_fading(&self) -> bool {
        self.fading
    }
}

pub struct ModelLifecycle {
    state: Option<TransitionState>,
    fade_rate: f32,
    rng: ChaCha8Rng,
    selected: Option<usize>,
    swaps: u64,
}

impl ModelLifecycle {
    pub fn new(fade_rate: f32, rng: ChaCha8Rng) -> Self {
        Self {
            state: None,
            fade_rate,
            rng,
            selected: None,
            swaps: 0,
        }
    }

    /// Disposes whatever is live, then builds and inserts the new model at
    /// zero opacity. Always swaps, even for the index already shown.
    pub fn select_domain(&mut self, index: i64, sink: &mut dyn ReleaseSink) {
        if let Some(state) = self.state.take() {
            let mut outgoing = state.incoming;
            let held = outgoing.live_resources();
            outgoing.dispose(sink);
            log::debug!(
                "disposed {} model ({} handles, fade at {:.2})",
                outgoing.kind().name(),
                held,
                state.fade_progress
            );
        }

        let mut incoming = catalog::build(index, &mut self.rng);
        incoming.set_fade(0.0);
        incoming.reset_root();
        log::info!("switching to {} archetype", incoming.kind().name());

        self.selected = Some(incoming.descriptor().id);
        self.swaps += 1;
        self.state = Some(TransitionState {
            incoming,
            fade_progress: 0.0,
            fading: true,
        });
    }

    /// Advances the fade. Returns whether any opacity was touched.
    pub fn fade_step(&mut self, delta: f32) -> bool {
        let Some(state) = self.state.as_mut() else {
            return false;
        };
        if !state.fading {
            return false;
        }
        let progress = state.fade_progress + delta.max(0.0) * self.fade_rate;
        state.fade_progress = if progress >= 1.0 - SETTLE_EPSILON { 1.0 } else { progress };
        state.incoming.set_fade(state.fade_progress);
        if state.fade_progress >= 1.0 {
            state.fading = false;
        }
        true
    }

    pub fn live_model(&self) -> Option<&Model> {
        self.state.as_ref().map(|s| &s.incoming)
    }

    pub fn live_model_mut(&mut self) -> Option<&mut Model> {
        self.state.as_mut().map(|s| &mut s.incoming)
    }

    pub fn transition(&self) -> Option<&TransitionState> {
        self.state.as_ref()
    }

    pub fn fade_progress(&self) -> f32 {
        self.state.as_ref().map_or(0.0, |s| s.fade_progress)
    }

    pub fn is_fading(&self) -> bool {
        self.state.as_ref().is_some_and(TransitionState::is_fading)
    }

    /// Catalog id of the live model.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn swaps(&self) -> u64 {
        self.swaps
    }

    /// Releases the live model, if any. Safe to call repeatedly.
    pub fn dispose_all(&mut self, sink: &mut dyn ReleaseSink) {
        if let Some(mut state) = self.state.take() {
            state.incoming.dispose(sink);
        }
        self.selected = None;
    }
}
