//! Static scene: country boundaries and data center markers.

use crate::data::Dataset;
use crate::geo::{path, GlobeProjection, MarkerShape, ProjectedPath};
use eframe::egui::{Pos2, Vec2};

/// A projected country boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryPath {
    pub name: String,
    /// `None` when the whole country is on the far side
    pub path: Option<ProjectedPath>,
}

/// A projected data center marker and its label.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeMarker {
    pub name: String,
    pub marker: Option<MarkerShape>,
    /// Where the name label is anchored, above the marker
    pub label_position: Option<Pos2>,
    /// 1 on the visible hemisphere, 0 otherwise
    pub label_opacity: f32,
}

/// Screen geometry for everything that does not depend on the selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneGraph {
    countries: Vec<CountryPath>,
    nodes: Vec<NodeMarker>,
    marker_radius: f32,
    label_offset: f32,
}

impl SceneGraph {
    pub fn new(marker_radius: f32, label_offset: f32) -> Self {
        Self {
            countries: Vec::new(),
            nodes: Vec::new(),
            marker_radius,
            label_offset,
        }
    }

    pub fn countries(&self) -> &[CountryPath] {
        &self.countries
    }

    pub fn nodes(&self) -> &[NodeMarker] {
        &self.nodes
    }

    pub fn node(&self, name: &str) -> Option<&NodeMarker> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Recomputes every boundary path, marker and label position.
    pub fn reproject(&mut self, projection: &GlobeProjection, dataset: &Dataset) {
        self.countries = dataset
            .countries
            .iter()
            .map(|feature| CountryPath {
                name: feature.name.clone(),
                path: path::project_polygons(projection, feature.rings()),
            })
            .collect();

        let label_offset = Vec2::new(0.0, self.label_offset);
        self.nodes = dataset
            .data_centers
            .iter()
            .map(|dc| {
                let marker = path::project_point(projection, dc.location, self.marker_radius);
                NodeMarker {
                    name: dc.name.clone(),
                    marker,
                    label_position: marker.map(|m| m.center - label_offset),
                    label_opacity: if marker.is_some() { 1.0 } else { 0.0 },
                }
            })
            .collect();
    }

    /// Name of the marker under `pos`. Later markers are drawn on top and win.
    pub fn hit_test(&self, pos: Pos2) -> Option<&str> {
        self.nodes
            .iter()
            .rev()
            .find(|n| n.marker.is_some_and(|m| m.contains(pos)))
            .map(|n| n.name.as_str())
    }
}
