//! Orthographic globe projection.
//!
//! Converts geographic coordinates (lon/lat) to screen positions on a globe
//! viewed from infinitely far away. Points on the far hemisphere have no
//! screen position.
//!
//! Rotation follows the usual `[lambda, phi]` convention in degrees: the
//! point at `(-lambda, -phi)` is the center of the view.

use eframe::egui::{Pos2, Vec2};
use geo_types::Coord;

/// Slack allowed on the horizon so points at exactly 90° stay visible.
pub(crate) const HORIZON_EPSILON: f64 = 1e-9;

/// A unit vector in view space.
///
/// `x` points at the viewer, `y` to the right and `z` up. A point is on the
/// visible hemisphere when `x >= 0`.
pub(crate) type ViewVector = [f64; 3];

/// Orthographic projection state: rotation, scale and viewport size.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobeProjection {
    /// Rotation `(lambda, phi)` in degrees
    rotation: (f64, f64),
    /// Current scale (globe radius in screen units)
    scale: f64,
    /// Scale at zoom factor 1.0 for the current viewport
    initial_scale: f64,
    /// Fraction of `initial_scale` below which the globe may not shrink
    floor_factor: f64,
    /// Fraction of the smaller viewport side used as the initial radius
    scale_ratio: f64,
    /// Viewport size in screen units
    viewport: Vec2,
}

impl GlobeProjection {
    /// Creates a projection for a viewport of the given size.
    pub fn new(viewport: Vec2, rotation: (f64, f64), scale_ratio: f64, floor_factor: f64) -> Self {
        let initial_scale = viewport.min_elem().max(0.0) as f64 * scale_ratio;
        Self {
            rotation: (wrap_degrees(rotation.0), rotation.1),
            scale: initial_scale,
            initial_scale,
            floor_factor,
            scale_ratio,
            viewport,
        }
    }

    /// Current rotation `(lambda, phi)` in degrees.
    #[cfg(test)]
    pub fn rotation(&self) -> (f64, f64) {
        self.rotation
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn initial_scale(&self) -> f64 {
        self.initial_scale
    }

    /// Smallest scale the globe may shrink to.
    pub fn scale_floor(&self) -> f64 {
        self.initial_scale * self.floor_factor
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Screen position of the globe center.
    pub fn center(&self) -> Pos2 {
        Pos2::new(self.viewport.x / 2.0, self.viewport.y / 2.0)
    }

    /// Radius of the globe disk on screen.
    pub fn globe_radius(&self) -> f32 {
        self.scale as f32
    }

    /// Adds the given angular deltas (degrees) to the rotation.
    ///
    /// Returns `false` and leaves the rotation untouched for non-finite input.
    pub fn rotate(&mut self, delta_lambda: f64, delta_phi: f64) -> bool {
        if !delta_lambda.is_finite() || !delta_phi.is_finite() {
            return false;
        }
        self.rotation = (
            wrap_degrees(self.rotation.0 + delta_lambda),
            self.rotation.1 + delta_phi,
        );
        true
    }

    /// Sets the scale, clamping to the scale floor.
    ///
    /// Values below the floor are silently raised to it. Returns `false` for
    /// non-finite input.
    pub fn set_scale(&mut self, scale: f64) -> bool {
        if !scale.is_finite() {
            return false;
        }
        self.scale = scale.max(self.scale_floor());
        true
    }

    /// Sets the scale to `initial_scale * zoom`.
    pub fn zoom_to(&mut self, zoom: f64) -> bool {
        self.set_scale(self.initial_scale * zoom)
    }

    /// Re-initializes the projection for a new viewport size.
    ///
    /// The scale is reset to the new initial scale; the rotation is kept.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        if !width.is_finite() || !height.is_finite() {
            return false;
        }
        self.viewport = Vec2::new(width.max(0.0), height.max(0.0));
        self.initial_scale = self.viewport.min_elem() as f64 * self.scale_ratio;
        self.scale = self.initial_scale;
        true
    }

    /// Geographic coordinate at the center of the view.
    pub fn view_center(&self) -> Coord<f64> {
        Coord {
            x: wrap_degrees(-self.rotation.0),
            y: -self.rotation.1,
        }
    }

    /// Great-circle distance in degrees between `coord` and the view center.
    #[cfg(test)]
    pub fn angular_distance_from_center(&self, coord: Coord<f64>) -> f64 {
        self.to_view(coord)[0].clamp(-1.0, 1.0).acos().to_degrees()
    }

    /// Projects a geographic coordinate (lon, lat) to a screen position.
    ///
    /// Returns `None` when the point lies on the far side of the globe.
    pub fn project(&self, coord: Coord<f64>) -> Option<Pos2> {
        let v = self.to_view(coord);
        is_front_facing(v).then(|| self.view_to_screen(v))
    }

    /// Converts a screen position back to a geographic coordinate.
    ///
    /// Returns `None` for positions outside the globe disk.
    pub fn invert(&self, pos: Pos2) -> Option<Coord<f64>> {
        if self.scale <= 0.0 {
            return None;
        }
        let center = self.center();
        let y = (pos.x - center.x) as f64 / self.scale;
        let z = (center.y - pos.y) as f64 / self.scale;
        let r2 = y * y + z * z;
        if r2 > 1.0 {
            return None;
        }
        let x = (1.0 - r2).sqrt();

        // Undo the phi rotation, then the lambda rotation.
        let (sin_dp, cos_dp) = self.rotation.1.to_radians().sin_cos();
        let gx = x * cos_dp + z * sin_dp;
        let gz = z * cos_dp - x * sin_dp;
        let lon = y.atan2(gx).to_degrees() - self.rotation.0;
        let lat = gz.clamp(-1.0, 1.0).asin().to_degrees();

        Some(Coord {
            x: wrap_degrees(lon),
            y: lat,
        })
    }

    /// Rotates a geographic coordinate into view space.
    pub(crate) fn to_view(&self, coord: Coord<f64>) -> ViewVector {
        let lambda = (coord.x + self.rotation.0).to_radians();
        let phi = coord.y.to_radians();
        let (sin_dp, cos_dp) = self.rotation.1.to_radians().sin_cos();

        let cos_phi = phi.cos();
        let x = lambda.cos() * cos_phi;
        let y = lambda.sin() * cos_phi;
        let z = phi.sin();

        [x * cos_dp - z * sin_dp, y, z * cos_dp + x * sin_dp]
    }

    /// Maps a view-space vector onto the screen, ignoring visibility.
    pub(crate) fn view_to_screen(&self, v: ViewVector) -> Pos2 {
        let center = self.center();
        Pos2::new(
            center.x + (v[1] * self.scale) as f32,
            center.y - (v[2] * self.scale) as f32,
        )
    }
}

/// Whether a view-space vector lies on the visible hemisphere.
pub(crate) fn is_front_facing(v: ViewVector) -> bool {
    v[0] >= -HORIZON_EPSILON
}

/// Wraps an angle in degrees into `[-180, 180)`.
fn wrap_degrees(deg: f64) -> f64 {
    (deg + 180.0).rem_euclid(360.0) - 180.0
}
