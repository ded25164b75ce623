//! Projected geometry rendering.
//!
//! Draws projected paths and the globe disk to the egui canvas. Geometry is
//! projected in panel-local coordinates; `origin` is the panel's top-left
//! corner on screen.

use super::{GlobeProjection, ProjectedPath};
use eframe::egui::{epaint::PathShape, Color32, Painter, Shape, Stroke, Vec2};

/// Draws the globe disk behind the country boundaries.
pub fn paint_globe_disk(
    painter: &Painter,
    projection: &GlobeProjection,
    origin: Vec2,
    fill: Color32,
    stroke: Stroke,
) {
    let radius = projection.globe_radius();
    if radius <= 0.0 {
        return;
    }
    painter.circle(projection.center() + origin, radius, fill, stroke);
}

/// Draws every part of a projected path as a polyline.
pub fn paint_path(painter: &Painter, path: &ProjectedPath, origin: Vec2, stroke: Stroke) {
    if stroke.width <= 0.0 || stroke.color == Color32::TRANSPARENT {
        return;
    }

    for part in &path.parts {
        if part.points.len() < 2 {
            continue;
        }
        let points = part.points.iter().map(|p| *p + origin).collect();
        let shape = if part.closed {
            PathShape::closed_line(points, stroke)
        } else {
            PathShape::line(points, stroke)
        };
        painter.add(Shape::Path(shape));
    }
}
