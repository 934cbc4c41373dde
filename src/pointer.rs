use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;

/// Latest normalized pointer position, shared between the single input
/// listener that writes it and the per-frame readers. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct PointerState {
    position: Rc<Cell<Vec2>>,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Vec2 {
        self.position.get()
    }

    pub fn set(&self, normalized: Vec2) {
        self.position.set(normalized.clamp(Vec2::splat(-1.0), Vec2::ONE));
    }

    /// Maps a client-space position over a viewport to [-1, 1]², y up.
    pub fn set_from_client(&self, x: f32, y: f32, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.set(Vec2::new(x / width * 2.0 - 1.0, -(y / height * 2.0 - 1.0)));
    }
}
