//! Globe settings.
//!
//! Native builds can override the defaults with inline JSON in the
//! `LATENCY_GLOBE_SETTINGS` environment variable.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunable constants for projection, interaction and animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeSettings {
    /// Geography document (path on native, URL on web).
    pub world_url: String,
    /// Application document (path on native, URL on web).
    pub data_url: String,
    /// Starting rotation [λ, φ] in degrees.
    pub initial_rotation: [f64; 2],
    /// Initial scale as a fraction of min(width, height).
    pub scale_ratio: f64,
    /// Minimum zoom as a fraction of the initial scale.
    pub scale_floor_factor: f64,
    /// Drag rotation speed; degrees per pixel is this divided by the scale.
    pub drag_sensitivity: f64,
    /// Exponent rate applied to wheel deltas.
    pub wheel_zoom_rate: f64,
    /// On-screen marker radius in points.
    pub marker_radius: f32,
    /// Distance of node labels above their marker.
    pub label_offset: f32,
    pub tick_interval_ms: u64,
    pub enter_duration_ms: u64,
    pub fade_duration_ms: u64,
}

impl Default for GlobeSettings {
    fn default() -> Self {
        Self {
            world_url: "assets/world.json".to_string(),
            data_url: "assets/data.json".to_string(),
            initial_rotation: [50.0, -30.0],
            scale_ratio: 0.38,
            scale_floor_factor: 0.3,
            drag_sensitivity: 75.0,
            wheel_zoom_rate: 0.002,
            marker_radius: 12.0,
            label_offset: 19.0,
            tick_interval_ms: 16, // ~60 Hz
            enter_duration_ms: 250,
            fade_duration_ms: 400,
        }
    }
}

impl GlobeSettings {
    /// Environment variable holding a JSON override.
    const ENV_KEY: &'static str = "LATENCY_GLOBE_SETTINGS";

    /// Parses settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings, falling back to defaults on any problem.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let json = match std::env::var(Self::ENV_KEY) {
            Ok(s) => s,
            Err(_) => return Self::default(),
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", Self::ENV_KEY);
                settings.sanitized()
            }
            Err(e) => {
                log::warn!("Failed to parse {}: {}", Self::ENV_KEY, e);
                Self::default()
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        Self::default()
    }

    /// Replaces values that would break the projection with their defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.scale_ratio.is_finite() && self.scale_ratio > 0.0) {
            log::warn!("Invalid scale_ratio {}, using default", self.scale_ratio);
            self.scale_ratio = defaults.scale_ratio;
        }
        if !(self.scale_floor_factor.is_finite() && self.scale_floor_factor > 0.0) {
            log::warn!(
                "Invalid scale_floor_factor {}, using default",
                self.scale_floor_factor
            );
            self.scale_floor_factor = defaults.scale_floor_factor;
        }
        if !self.initial_rotation.iter().all(|v| v.is_finite()) {
            self.initial_rotation = defaults.initial_rotation;
        }
        if self.tick_interval_ms == 0 {
            self.tick_interval_ms = 1;
        }
        self
    }

    pub fn initial_rotation(&self) -> (f64, f64) {
        (self.initial_rotation[0], self.initial_rotation[1])
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn enter_duration(&self) -> Duration {
        Duration::from_millis(self.enter_duration_ms)
    }

    pub fn fade_duration(&self) -> Duration {
        Duration::from_millis(self.fade_duration_ms)
    }
}
