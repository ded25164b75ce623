//! Data center and route dataset.
//!
//! Parsed from two documents: a GeoJSON world-boundary collection and an
//! application document listing data centers and the measured routes
//! between them.

use super::LoadError;
use crate::geo::{GeoFeature, GeoLayer};
use geo_types::Coord;
use serde::Deserialize;
use std::collections::HashMap;

/// Decimal digits compared when deciding whether a route's midpoint sits on
/// its origin.
const MIDPOINT_PRECISION: i32 = 5;

/// A data center marker on the globe.
#[derive(Debug, Clone, PartialEq)]
pub struct DataCenter {
    /// Unique name (e.g. "us-east-1")
    pub name: String,
    /// Location as (lon, lat)
    pub location: Coord<f64>,
}

/// One directed route from a source data center to a target.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSegment {
    /// Identity of the route within its source's route list
    pub target_name: String,
    /// Path as (lon, lat) points, at least two
    pub path: Vec<Coord<f64>>,
    /// Where the latency label is placed
    pub midpoint: Coord<f64>,
    /// Measured latency in milliseconds
    pub latency_ms: f64,
}

impl RouteSegment {
    /// Label text for this route: the latency with a unit suffix.
    ///
    /// Empty when the midpoint coincides with the first path point, which
    /// would put the label on top of the origin marker.
    pub fn label_text(&self) -> String {
        let origin = self.path[0];
        let same = |a: f64, b: f64| {
            round_to(a, MIDPOINT_PRECISION) == round_to(b, MIDPOINT_PRECISION)
        };
        if same(self.midpoint.x, origin.x) && same(self.midpoint.y, origin.y) {
            String::new()
        } else {
            format!("{}ms", self.latency_ms)
        }
    }
}

/// Rounds `n` to `digits` decimal places.
fn round_to(n: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (n * factor).round() / factor
}

/// Everything loaded at startup. Read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub countries: Vec<GeoFeature>,
    pub data_centers: Vec<DataCenter>,
    routes: HashMap<String, Vec<RouteSegment>>,
}

impl Dataset {
    /// Builds a dataset from the geography and application documents.
    pub fn from_documents(world_json: &str, app_json: &str) -> Result<Self, LoadError> {
        let mut layer = GeoLayer::new();
        layer
            .load_from_geojson(world_json)
            .map_err(LoadError::Geography)?;

        let document: ApplicationDocument = serde_json::from_str(app_json)
            .map_err(|e| LoadError::Application(e.to_string()))?;

        let mut dataset = Self::from_application(document)?;
        dataset.countries = layer.features;

        log::info!(
            "Loaded dataset: {} countries, {} data centers, {} routes",
            dataset.countries.len(),
            dataset.data_centers.len(),
            dataset.routes.values().map(Vec::len).sum::<usize>(),
        );

        Ok(dataset)
    }

    fn from_application(document: ApplicationDocument) -> Result<Self, LoadError> {
        let mut data_centers: Vec<DataCenter> = Vec::with_capacity(document.data_centers.len());
        for raw in document.data_centers {
            if data_centers.iter().any(|dc| dc.name == raw.name) {
                log::warn!("Duplicate data center {:?} ignored", raw.name);
                continue;
            }
            data_centers.push(DataCenter {
                name: raw.name,
                location: Coord {
                    x: raw.loc[0],
                    y: raw.loc[1],
                },
            });
        }

        if data_centers.is_empty() {
            return Err(LoadError::Empty);
        }

        let routes = document
            .routes
            .into_iter()
            .map(|(source, raw_routes)| {
                let segments = convert_routes(&source, raw_routes, &data_centers);
                (source, segments)
            })
            .collect();

        Ok(Self {
            countries: Vec::new(),
            data_centers,
            routes,
        })
    }

    /// All routes whose source is `name`, or `None` for unknown names.
    pub fn routes_from(&self, name: &str) -> Option<&[RouteSegment]> {
        self.routes.get(name).map(Vec::as_slice)
    }

    pub fn data_center(&self, name: &str) -> Option<&DataCenter> {
        self.data_centers.iter().find(|dc| dc.name == name)
    }
}

fn convert_routes(
    source: &str,
    raw_routes: Vec<RawRoute>,
    data_centers: &[DataCenter],
) -> Vec<RouteSegment> {
    let mut segments = Vec::with_capacity(raw_routes.len());
    for (index, raw) in raw_routes.into_iter().enumerate() {
        if raw.path.len() < 2 {
            log::warn!(
                "Route {} #{} has {} path point(s), dropped",
                source,
                index,
                raw.path.len()
            );
            continue;
        }

        let path: Vec<Coord<f64>> = raw
            .path
            .iter()
            .map(|p| Coord { x: p[0], y: p[1] })
            .collect();
        let target_name = raw
            .target_name
            .or_else(|| infer_target(&path, data_centers))
            .unwrap_or_else(|| format!("#{}", index));

        segments.push(RouteSegment {
            target_name,
            path,
            midpoint: Coord {
                x: raw.mid[0],
                y: raw.mid[1],
            },
            latency_ms: raw.time,
        });
    }
    segments
}

/// Finds the data center sitting at the end of a path.
fn infer_target(path: &[Coord<f64>], data_centers: &[DataCenter]) -> Option<String> {
    let end = path.last()?;
    data_centers
        .iter()
        .find(|dc| {
            (dc.location.x - end.x).abs() < 1e-5 && (dc.location.y - end.y).abs() < 1e-5
        })
        .map(|dc| dc.name.clone())
}

/// Application document layout.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApplicationDocument {
    data_centers: Vec<RawDataCenter>,
    #[serde(default)]
    routes: HashMap<String, Vec<RawRoute>>,
}

#[derive(Deserialize)]
struct RawDataCenter {
    name: String,
    loc: [f64; 2],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRoute {
    #[serde(default)]
    target_name: Option<String>,
    path: Vec<[f64; 2]>,
    mid: [f64; 2],
    time: f64,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const WORLD: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "name": "Atlantis" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-40, 30], [-30, 30], [-30, 40], [-40, 40], [-40, 30]]]
                }
            }
        ]
    }"#;

    pub(crate) const APP: &str = r#"{
        "dataCenters": [
            { "name": "us-east-1", "loc": [-77, 38] },
            { "name": "eu-west-1", "loc": [-8, 52] },
            { "name": "ap-south-1", "loc": [72.8, 19] },
            { "name": "sa-east-1", "loc": [-46.6, -23.5] }
        ],
        "routes": {
            "us-east-1": [
                { "targetName": "us-east-1", "path": [[-77, 38], [-77, 38]], "mid": [-77, 38], "time": 2 },
                { "targetName": "eu-west-1", "path": [[-77, 38], [-8, 52]], "mid": [-42.5, 45], "time": 85 },
                { "targetName": "ap-south-1", "path": [[-77, 38], [72.8, 19]], "mid": [-2.1, 28.5], "time": 210 },
                { "targetName": "sa-east-1", "path": [[-77, 38], [-46.6, -23.5]], "mid": [-61.8, 7.25], "time": 115.5 }
            ],
            "eu-west-1": [
                { "targetName": "us-east-1", "path": [[-8, 52], [-77, 38]], "mid": [-42.5, 45], "time": 88 },
                { "targetName": "eu-west-1", "path": [[-8, 52], [-8, 52]], "mid": [-8, 52], "time": 1 },
                { "targetName": "ap-south-1", "path": [[-8, 52], [72.8, 19]], "mid": [32.4, 35.5], "time": 120 }
            ],
            "ap-south-1": [
                { "path": [[72.8, 19], [-8, 52]], "mid": [32.4, 35.5], "time": 121 },
                { "path": [[72.8, 19], [10, 10]], "mid": [41.4, 14.5], "time": 300 },
                { "targetName": "bad", "path": [[72.8, 19]], "mid": [72.8, 19], "time": 1 }
            ]
        }
    }"#;

    pub(crate) fn sample_dataset() -> Dataset {
        Dataset::from_documents(WORLD, APP).unwrap()
    }

    #[test]
    fn test_load_documents() {
        let dataset = sample_dataset();
        assert_eq!(dataset.countries.len(), 1);
        assert_eq!(dataset.data_centers.len(), 4);
        assert_eq!(dataset.routes_from("us-east-1").unwrap().len(), 4);
        assert_eq!(
            dataset.data_center("eu-west-1").unwrap().location,
            Coord { x: -8.0, y: 52.0 }
        );
    }

    #[test]
    fn test_unknown_source_has_no_routes() {
        let dataset = sample_dataset();
        assert!(dataset.routes_from("mars-north-1").is_none());
        assert!(dataset.routes_from("sa-east-1").is_none());
    }

    #[test]
    fn test_missing_target_name_is_inferred() {
        let dataset = sample_dataset();
        let routes = dataset.routes_from("ap-south-1").unwrap();
        // The single-point route is dropped
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].target_name, "eu-west-1");
        assert_eq!(routes[1].target_name, "#1");
    }

    #[test]
    fn test_label_text() {
        let dataset = sample_dataset();
        let routes = dataset.routes_from("us-east-1").unwrap();
        assert_eq!(routes[0].label_text(), "");
        assert_eq!(routes[1].label_text(), "85ms");
        assert_eq!(routes[3].label_text(), "115.5ms");
    }

    #[test]
    fn test_label_midpoint_tolerance() {
        let route = RouteSegment {
            target_name: "x".to_string(),
            path: vec![Coord { x: 1.0, y: 2.0 }, Coord { x: 3.0, y: 4.0 }],
            midpoint: Coord {
                x: 1.000_000_1,
                y: 1.999_999_9,
            },
            latency_ms: 40.0,
        };
        assert_eq!(route.label_text(), "");

        let shifted = RouteSegment {
            midpoint: Coord { x: 1.0001, y: 2.0 },
            ..route
        };
        assert_eq!(shifted.label_text(), "40ms");
    }

    #[test]
    fn test_duplicate_data_centers_keep_first() {
        let app = r#"{
            "dataCenters": [
                { "name": "a", "loc": [1, 2] },
                { "name": "a", "loc": [3, 4] }
            ]
        }"#;
        let dataset = Dataset::from_documents(WORLD, app).unwrap();
        assert_eq!(dataset.data_centers.len(), 1);
        assert_eq!(dataset.data_centers[0].location, Coord { x: 1.0, y: 2.0 });
    }

    #[test]
    fn test_load_errors() {
        assert!(matches!(
            Dataset::from_documents("nope", APP),
            Err(LoadError::Geography(_))
        ));
        assert!(matches!(
            Dataset::from_documents(WORLD, "{\"routes\": {}}"),
            Err(LoadError::Application(_))
        ));
        assert!(matches!(
            Dataset::from_documents(WORLD, "{\"dataCenters\": []}"),
            Err(LoadError::Empty)
        ));
    }
}
