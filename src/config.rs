//! Engine options. Everything here is static for the lifetime of a mount;
//! none of it varies per domain.

use glam::Vec3;
use serde::Deserialize;

use crate::error::Result;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub camera: CameraSettings,
    pub fade: FadeSettings,
    pub overlay: OverlaySettings,
    pub post: PostSettings,
    pub surface: SurfaceSettings,
    /// Seed for decorative randomness. `None` lets the host pick one per session.
    pub seed: Option<u64>,
}

impl EngineConfig {
    /// Parses options handed over by the page. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Construction input from the page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineProps {
    pub domain_index: i64,
    pub background_media_url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CameraSettings {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Rest position the orbit swings around.
    pub base_position: [f32; 3],
    pub focal_point: [f32; 3],
    /// Per-axis bound of the orbit component.
    pub orbit_amplitude: [f32; 3],
    /// Angular rate of the horizontal ellipse.
    pub orbit_rate: f32,
    /// Angular rate of the vertical bob; differs from `orbit_rate` so the path never closes.
    pub bob_rate: f32,
    pub parallax_strength: f32,
    /// Fraction of the remaining distance covered each frame.
    pub smoothing: f32,
}

impl CameraSettings {
    pub fn base(&self) -> Vec3 {
        Vec3::from_array(self.base_position)
    }

    pub fn focal(&self) -> Vec3 {
        Vec3::from_array(self.focal_point)
    }

    pub fn amplitude(&self) -> Vec3 {
        Vec3::from_array(self.orbit_amplitude)
    }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_y_degrees: 45.0,
            near: 0.1,
            far: 100.0,
            base_position: [0.0, 0.4, 7.5],
            focal_point: [0.0, 0.0, 0.0],
            orbit_amplitude: [1.2, 0.35, 0.6],
            orbit_rate: 0.12,
            bob_rate: 0.19,
            parallax_strength: 0.6,
            smoothing: 0.05,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FadeSettings {
    /// Seconds for an incoming archetype to reach full opacity.
    pub duration: f32,
    /// Seconds for the background media layers to crossfade.
    pub background_duration: f32,
}

fn rate_for(duration: f32) -> f32 {
    if duration > f32::EPSILON {
        1.0 / duration
    } else {
        f32::MAX
    }
}

impl FadeSettings {
    pub fn rate(&self) -> f32 {
        rate_for(self.duration)
    }

    pub fn background_rate(&self) -> f32 {
        rate_for(self.background_duration)
    }
}

impl Default for FadeSettings {
    fn default() -> Self {
        Self {
            duration: 0.8,
            background_duration: 1.2,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverlaySettings {
    pub active_speed: f32,
    pub idle_speed: f32,
    pub active_intensity: f32,
    pub idle_intensity: f32,
    /// Perpendicular offset of each edge's control point, as a fraction of edge length.
    pub curve_bend: f32,
    pub anchor_radius: f32,
    /// Exponential smoothing applied to edge intensity.
    pub intensity_smoothing: f32,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            active_speed: 0.55,
            idle_speed: 0.12,
            active_intensity: 0.85,
            idle_intensity: 0.18,
            curve_bend: 0.25,
            anchor_radius: 4.2,
            intensity_smoothing: 0.08,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PostSettings {
    pub bloom: BloomSettings,
    pub depth_of_field: DepthOfFieldSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BloomSettings {
    /// Luminance above which a pixel contributes to bloom.
    pub threshold: f32,
    pub intensity: f32,
    /// Blur radius in half-resolution texels.
    pub radius: f32,
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            threshold: 0.55,
            intensity: 1.1,
            radius: 1.5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DepthOfFieldSettings {
    /// Distance from the camera that stays sharp.
    pub focal_distance: f32,
    /// Depth band around the focal distance before blur starts.
    pub focal_range: f32,
    /// Maximum blur radius in pixels.
    pub max_blur: f32,
}

impl Default for DepthOfFieldSettings {
    fn default() -> Self {
        Self {
            focal_distance: 7.5,
            focal_range: 2.5,
            max_blur: 3.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SurfaceSettings {
    pub max_pixel_ratio: f32,
    /// Frame deltas above this (seconds) are clamped, e.g. after a hidden tab.
    pub max_frame_delta: f32,
}

impl Default for SurfaceSettings {
    fn default() -> Self {
        Self {
            max_pixel_ratio: 2.0,
            max_frame_delta: 0.1,
        }
    }
}
