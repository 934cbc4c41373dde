use glam::{Mat4, Vec2, Vec3};

use crate::config::CameraSettings;
use crate::scene::approach_vec3;

pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    /// Vertical field of view in radians.
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fovy, self.aspect, self.znear, self.zfar)
    }

    pub fn build_view_projection_matrix(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Matches the projection to a surface; degenerate sizes keep the previous aspect.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

/// Slow quasi-elliptical orbit plus pointer parallax, eased every frame.
pub struct CameraRig {
    camera: Camera,
    settings: CameraSettings,
}

impl CameraRig {
    pub fn new(settings: CameraSettings) -> Self {
        let camera = Camera {
            eye: settings.base(),
            target: settings.focal(),
            up: Vec3::Y,
            aspect: 1.0,
            fovy: settings.fov_y_degrees.to_radians(),
            znear: settings.near,
            zfar: settings.far,
        };
        Self { camera, settings }
    }

    /// Horizontal ellipse and vertical bob at different rates; the sum never
    /// retraces itself but stays inside `orbit_amplitude` on every axis.
    pub fn orbit_offset(&self, time: f32) -> Vec3 {
        let a = self.settings.amplitude();
        let s = &self.settings;
        Vec3::new(
            a.x * (time * s.orbit_rate).sin(),
            a.y * (time * s.bob_rate + 1.3).sin(),
            a.z * (time * s.orbit_rate).cos(),
        )
    }

    pub fn parallax_offset(&self, pointer: Vec2) -> Vec3 {
        let p = pointer.clamp(Vec2::splat(-1.0), Vec2::ONE);
        Vec3::new(p.x, p.y * 0.6, 0.0) * self.settings.parallax_strength
    }

    pub fn update(&mut self, time: f32, pointer: Vec2) -> CameraPose {
        let target = self.settings.base() + self.orbit_offset(time) + self.parallax_offset(pointer);
        self.camera.eye = approach_vec3(self.camera.eye, target, self.settings.smoothing);
        self.camera.target = self.settings.focal();
        self.pose()
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.camera.eye,
            look_at: self.camera.target,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.camera.set_viewport(width, height);
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }
}
