//! Projected path geometry.
//!
//! Turns geographic line strings, polygon rings and points into screen-space
//! shapes for the current [`GlobeProjection`]. Edges are treated as
//! great-circle arcs and are clipped where they cross the horizon, so a
//! boundary that wraps around the globe ends cleanly on the globe's edge.

use super::projection::{is_front_facing, GlobeProjection, ViewVector};
use eframe::egui::Pos2;
use geo_types::Coord;

/// Longest arc (radians) drawn as a single straight screen segment.
const MAX_ARC_STEP: f64 = 0.035;

/// A connected run of screen points.
#[derive(Debug, Clone, PartialEq)]
pub struct PathPart {
    pub points: Vec<Pos2>,
    /// Whether the last point connects back to the first
    pub closed: bool,
}

/// The visible portion of a projected geometry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectedPath {
    pub parts: Vec<PathPart>,
}

impl ProjectedPath {
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Total number of screen points across all parts.
    #[cfg(test)]
    pub fn point_count(&self) -> usize {
        self.parts.iter().map(|p| p.points.len()).sum()
    }

    fn into_option(self) -> Option<Self> {
        (!self.is_empty()).then_some(self)
    }
}

/// A point marker drawn as a fixed-radius circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerShape {
    pub center: Pos2,
    pub radius: f32,
}

impl MarkerShape {
    pub fn contains(&self, pos: Pos2) -> bool {
        self.center.distance(pos) <= self.radius
    }
}

/// Projects a line string whose edges are great-circle arcs.
///
/// Returns `None` when no part of the line is visible.
pub fn project_line(projection: &GlobeProjection, coords: &[Coord<f64>]) -> Option<ProjectedPath> {
    if coords.len() < 2 {
        return None;
    }
    let vectors = densify(projection, coords, false);
    ProjectedPath {
        parts: clip_to_front(projection, &vectors, false),
    }
    .into_option()
}

/// Projects a set of polygons given as `(exterior, holes)` ring lists.
///
/// Every ring contributes its visible runs. Returns `None` when nothing is
/// visible.
pub fn project_polygons<'a, I>(projection: &GlobeProjection, rings: I) -> Option<ProjectedPath>
where
    I: IntoIterator<Item = &'a [Coord<f64>]>,
{
    let mut path = ProjectedPath::default();
    for ring in rings {
        path.parts.extend(project_ring(projection, ring));
    }
    path.into_option()
}

/// Projects a single closed ring.
fn project_ring(projection: &GlobeProjection, ring: &[Coord<f64>]) -> Vec<PathPart> {
    // GeoJSON rings repeat the first coordinate at the end
    let ring = match ring {
        [first, rest @ .., last] if !rest.is_empty() && first == last => &ring[..ring.len() - 1],
        _ => ring,
    };
    if ring.len() < 3 {
        return Vec::new();
    }
    let vectors = densify(projection, ring, true);
    clip_to_front(projection, &vectors, true)
}

/// Projects a point as a fixed-radius marker.
pub fn project_point(
    projection: &GlobeProjection,
    coord: Coord<f64>,
    radius: f32,
) -> Option<MarkerShape> {
    projection
        .project(coord)
        .map(|center| MarkerShape { center, radius })
}

/// Converts coordinates to view space and subdivides long edges along their
/// great circle.
fn densify(projection: &GlobeProjection, coords: &[Coord<f64>], closed: bool) -> Vec<ViewVector> {
    let views: Vec<ViewVector> = coords.iter().map(|c| projection.to_view(*c)).collect();
    let mut out = Vec::with_capacity(views.len());

    let edges = if closed { views.len() } else { views.len() - 1 };
    out.push(views[0]);
    for i in 0..edges {
        let a = views[i];
        let b = views[(i + 1) % views.len()];
        let angle = dot(a, b).clamp(-1.0, 1.0).acos();
        let steps = (angle / MAX_ARC_STEP).ceil() as usize;
        for s in 1..steps {
            out.push(slerp(a, b, angle, s as f64 / steps as f64));
        }
        if !closed || i + 1 < edges {
            out.push(b);
        }
    }

    out
}

/// Splits a view-space polyline into runs on the visible hemisphere.
///
/// Segments crossing the horizon are cut at the crossing point.
fn clip_to_front(projection: &GlobeProjection, vectors: &[ViewVector], closed: bool) -> Vec<PathPart> {
    let n = vectors.len();
    if n == 0 {
        return Vec::new();
    }

    if vectors.iter().all(|v| is_front_facing(*v)) {
        let points = vectors.iter().map(|v| projection.view_to_screen(*v)).collect();
        return vec![PathPart { points, closed }];
    }

    let mut parts: Vec<PathPart> = Vec::new();
    let mut current: Vec<Pos2> = Vec::new();
    if is_front_facing(vectors[0]) {
        current.push(projection.view_to_screen(vectors[0]));
    }

    let edges = if closed { n } else { n - 1 };
    for i in 0..edges {
        let a = vectors[i];
        let b = vectors[(i + 1) % n];
        match (is_front_facing(a), is_front_facing(b)) {
            (true, true) => current.push(projection.view_to_screen(b)),
            (true, false) => {
                current.push(projection.view_to_screen(horizon_crossing(a, b)));
                flush(&mut current, &mut parts);
            }
            (false, true) => {
                current.push(projection.view_to_screen(horizon_crossing(a, b)));
                current.push(projection.view_to_screen(b));
            }
            (false, false) => {}
        }
    }
    flush(&mut current, &mut parts);

    // A closed ring that starts on the visible side: the last run continues
    // into the first one.
    if closed && is_front_facing(vectors[0]) && parts.len() > 1 {
        let first = parts.remove(0);
        if let Some(last) = parts.last_mut() {
            last.points.extend(first.points.into_iter().skip(1));
        }
    }

    parts
}

/// Moves the current run into `parts` if it has at least one segment.
fn flush(current: &mut Vec<Pos2>, parts: &mut Vec<PathPart>) {
    if current.len() >= 2 {
        parts.push(PathPart {
            points: std::mem::take(current),
            closed: false,
        });
    } else {
        current.clear();
    }
}

/// Point where the segment `a -> b` meets the horizon plane `x = 0`.
fn horizon_crossing(a: ViewVector, b: ViewVector) -> ViewVector {
    let denom = a[0] - b[0];
    let t = if denom.abs() < f64::EPSILON {
        0.5
    } else {
        (a[0] / denom).clamp(0.0, 1.0)
    };
    normalize([
        0.0,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ])
}

/// Spherical interpolation between unit vectors separated by `angle`.
fn slerp(a: ViewVector, b: ViewVector, angle: f64, t: f64) -> ViewVector {
    let sin_angle = angle.sin();
    if sin_angle.abs() < 1e-9 {
        return normalize([
            a[0] + (b[0] - a[0]) * t,
            a[1] + (b[1] - a[1]) * t,
            a[2] + (b[2] - a[2]) * t,
        ]);
    }
    let wa = ((1.0 - t) * angle).sin() / sin_angle;
    let wb = (t * angle).sin() / sin_angle;
    [
        a[0] * wa + b[0] * wb,
        a[1] * wa + b[1] * wb,
        a[2] * wa + b[2] * wb,
    ]
}

fn dot(a: ViewVector, b: ViewVector) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn normalize(v: ViewVector) -> ViewVector {
    let len = dot(v, v).sqrt();
    if len < f64::EPSILON {
        return v;
    }
    [v[0] / len, v[1] / len, v[2] / len]
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::Vec2;

    fn projection() -> GlobeProjection {
        // View centered on (0, 0)
        GlobeProjection::new(Vec2::new(400.0, 400.0), (0.0, 0.0), 0.5, 0.3)
    }

    fn square(lon: f64, lat: f64, size: f64) -> Vec<Coord<f64>> {
        vec![
            Coord { x: lon, y: lat },
            Coord { x: lon + size, y: lat },
            Coord { x: lon + size, y: lat + size },
            Coord { x: lon, y: lat + size },
            Coord { x: lon, y: lat },
        ]
    }

    fn within_globe(p: &GlobeProjection, pos: Pos2) -> bool {
        pos.distance(p.center()) <= p.globe_radius() + 1e-2
    }

    #[test]
    fn test_visible_line_is_single_part() {
        let p = projection();
        let line = [Coord { x: -10.0, y: 0.0 }, Coord { x: 10.0, y: 5.0 }];
        let path = project_line(&p, &line).unwrap();
        assert_eq!(path.parts.len(), 1);
        assert!(!path.parts[0].closed);
        assert_eq!(path.parts[0].points[0], p.project(line[0]).unwrap());
        assert_eq!(*path.parts[0].points.last().unwrap(), p.project(line[1]).unwrap());
    }

    #[test]
    fn test_long_edges_follow_great_circle() {
        let p = projection();
        let line = [Coord { x: -60.0, y: 40.0 }, Coord { x: 60.0, y: 40.0 }];
        let path = project_line(&p, &line).unwrap();
        assert!(path.point_count() > 2);
        // The great circle between two points on the same parallel bulges poleward.
        let top = path.parts[0]
            .points
            .iter()
            .map(|pt| pt.y)
            .fold(f32::MAX, f32::min);
        let mid_parallel = p.project(Coord { x: 0.0, y: 40.0 }).unwrap();
        assert!(top < mid_parallel.y);
    }

    #[test]
    fn test_back_facing_line_is_none() {
        let p = projection();
        let line = [Coord { x: 150.0, y: 0.0 }, Coord { x: 170.0, y: 10.0 }];
        assert!(project_line(&p, &line).is_none());
    }

    #[test]
    fn test_degenerate_line_is_none() {
        let p = projection();
        assert!(project_line(&p, &[Coord { x: 0.0, y: 0.0 }]).is_none());
    }

    #[test]
    fn test_line_crossing_horizon_is_clipped() {
        let p = projection();
        let line = [Coord { x: 60.0, y: 0.0 }, Coord { x: 120.0, y: 0.0 }];
        let path = project_line(&p, &line).unwrap();
        assert_eq!(path.parts.len(), 1);
        let end = *path.parts[0].points.last().unwrap();
        assert!((end.distance(p.center()) - p.globe_radius()).abs() < 1e-2);
        assert!(path.parts[0].points.iter().all(|pt| within_globe(&p, *pt)));
    }

    #[test]
    fn test_visible_ring_is_closed() {
        let p = projection();
        let ring = square(-5.0, -5.0, 10.0);
        let path = project_polygons(&p, [ring.as_slice()]).unwrap();
        assert_eq!(path.parts.len(), 1);
        assert!(path.parts[0].closed);
        // Closing duplicate is dropped
        assert_ne!(path.parts[0].points.first(), path.parts[0].points.last());
    }

    #[test]
    fn test_ring_across_horizon_is_open_and_joined() {
        let p = projection();
        // Starts visible, wraps behind the globe and comes back.
        let ring = square(70.0, -10.0, 40.0);
        let path = project_polygons(&p, [ring.as_slice()]).unwrap();
        assert_eq!(path.parts.len(), 1);
        assert!(!path.parts[0].closed);
        assert!(path.parts[0].points.iter().all(|pt| within_globe(&p, *pt)));
    }

    #[test]
    fn test_hidden_polygons_are_none() {
        let p = projection();
        let ring = square(170.0, -5.0, 5.0);
        assert!(project_polygons(&p, [ring.as_slice()]).is_none());
    }

    #[test]
    fn test_point_marker_radius_is_fixed() {
        let mut p = projection();
        let marker = project_point(&p, Coord { x: 0.0, y: 0.0 }, 12.0).unwrap();
        p.zoom_to(4.0);
        let zoomed = project_point(&p, Coord { x: 0.0, y: 0.0 }, 12.0).unwrap();
        assert_eq!(marker.radius, zoomed.radius);
        assert!(marker.contains(marker.center + Vec2::new(11.0, 0.0)));
        assert!(!marker.contains(marker.center + Vec2::new(13.0, 0.0)));
        assert!(project_point(&p, Coord { x: 180.0, y: 0.0 }, 12.0).is_none());
    }
}
