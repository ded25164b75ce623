//! Country boundary data structures.

use geo_types::Coord;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};

/// A polygon as an exterior ring plus holes.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPolygon {
    pub exterior: Vec<Coord<f64>>,
    pub holes: Vec<Vec<Coord<f64>>>,
}

impl GeoPolygon {
    /// Iterates the exterior ring followed by every hole.
    pub fn rings(&self) -> impl Iterator<Item = &[Coord<f64>]> {
        std::iter::once(self.exterior.as_slice()).chain(self.holes.iter().map(Vec::as_slice))
    }
}

/// A named country boundary (polygon or multipolygon).
#[derive(Debug, Clone, PartialEq)]
pub struct GeoFeature {
    pub name: String,
    pub polygons: Vec<GeoPolygon>,
}

impl GeoFeature {
    /// Iterates every ring of every polygon.
    pub fn rings(&self) -> impl Iterator<Item = &[Coord<f64>]> {
        self.polygons.iter().flat_map(GeoPolygon::rings)
    }
}

/// The set of country boundaries drawn on the globe.
#[derive(Debug, Clone, Default)]
pub struct GeoLayer {
    pub features: Vec<GeoFeature>,
}

impl GeoLayer {
    /// Creates a new empty layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads features from GeoJSON data.
    ///
    /// Only polygonal geometry is kept; other geometry types are skipped.
    pub fn load_from_geojson(&mut self, geojson_str: &str) -> Result<(), String> {
        let geojson: GeoJson = geojson_str
            .parse()
            .map_err(|e| format!("Failed to parse GeoJSON: {}", e))?;

        match geojson {
            GeoJson::FeatureCollection(fc) => {
                self.load_feature_collection(fc);
            }
            GeoJson::Feature(f) => {
                let index = self.features.len();
                if let Some(feature) = convert_feature(&f, index) {
                    self.features.push(feature);
                }
            }
            GeoJson::Geometry(g) => {
                let polygons = convert_geometry(&g);
                if !polygons.is_empty() {
                    self.features.push(GeoFeature {
                        name: format!("feature-{}", self.features.len()),
                        polygons,
                    });
                }
            }
        }

        Ok(())
    }

    fn load_feature_collection(&mut self, fc: FeatureCollection) {
        let mut skipped = 0;
        for feature in fc.features {
            let index = self.features.len() + skipped;
            match convert_feature(&feature, index) {
                Some(geo_feature) => self.features.push(geo_feature),
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            log::debug!("Skipped {} non-polygonal feature(s)", skipped);
        }
    }
}

fn convert_feature(feature: &Feature, index: usize) -> Option<GeoFeature> {
    let name = feature
        .properties
        .as_ref()
        .and_then(|p| p.get("name").or_else(|| p.get("NAME")))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("feature-{}", index));

    let polygons = feature
        .geometry
        .as_ref()
        .map(convert_geometry)
        .unwrap_or_default();

    if polygons.is_empty() {
        return None;
    }
    Some(GeoFeature { name, polygons })
}

fn convert_geometry(geometry: &Geometry) -> Vec<GeoPolygon> {
    match &geometry.value {
        Value::Polygon(rings) => convert_rings(rings).into_iter().collect(),
        Value::MultiPolygon(polygons) => polygons
            .iter()
            .filter_map(|rings| convert_rings(rings))
            .collect(),
        Value::GeometryCollection(geometries) => {
            geometries.iter().flat_map(convert_geometry).collect()
        }
        _ => Vec::new(),
    }
}

fn convert_rings(rings: &[Vec<Vec<f64>>]) -> Option<GeoPolygon> {
    let (exterior, holes) = rings.split_first()?;
    Some(GeoPolygon {
        exterior: convert_ring(exterior),
        holes: holes.iter().map(|ring| convert_ring(ring)).collect(),
    })
}

fn convert_ring(ring: &[Vec<f64>]) -> Vec<Coord<f64>> {
    ring.iter()
        .filter(|c| c.len() >= 2)
        .map(|c| Coord { x: c[0], y: c[1] })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORLD: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "name": "Squareland" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "NAME": "Twin Isles" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[20, 0], [22, 0], [22, 2], [20, 0]]],
                        [[[30, 0], [32, 0], [32, 2], [30, 0]], [[30.5, 0.2], [31, 0.2], [31, 0.5], [30.5, 0.2]]]
                    ]
                }
            },
            {
                "type": "Feature",
                "properties": {},
                "geometry": { "type": "Point", "coordinates": [5, 5] }
            },
            {
                "type": "Feature",
                "properties": null,
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[40, 0], [41, 0], [41, 1], [40, 0]]]
                }
            }
        ]
    }"#;

    #[test]
    fn test_load_feature_collection() {
        let mut layer = GeoLayer::new();
        layer.load_from_geojson(WORLD).unwrap();

        assert_eq!(layer.features.len(), 3);
        assert_eq!(layer.features[0].name, "Squareland");
        assert_eq!(layer.features[0].polygons.len(), 1);
        assert_eq!(layer.features[0].polygons[0].exterior.len(), 5);

        assert_eq!(layer.features[1].name, "Twin Isles");
        assert_eq!(layer.features[1].polygons.len(), 2);
        assert_eq!(layer.features[1].polygons[1].holes.len(), 1);
        assert_eq!(layer.features[1].rings().count(), 3);
    }

    #[test]
    fn test_unnamed_feature_gets_index_name() {
        let mut layer = GeoLayer::new();
        layer.load_from_geojson(WORLD).unwrap();
        assert_eq!(layer.features[2].name, "feature-3");
    }

    #[test]
    fn test_invalid_geojson_is_error() {
        let mut layer = GeoLayer::new();
        let err = layer.load_from_geojson("{ not json").unwrap_err();
        assert!(err.starts_with("Failed to parse GeoJSON"));
        assert!(layer.features.is_empty());
    }
}
