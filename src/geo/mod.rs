//! Globe geometry.
//!
//! This module provides the orthographic projection, country boundary
//! loading, and the conversion of geographic shapes into projected,
//! horizon-clipped screen paths.

mod layer;
pub mod path;
mod projection;
mod renderer;

pub use layer::{GeoFeature, GeoLayer};
pub use path::{MarkerShape, ProjectedPath};
pub use projection::GlobeProjection;
pub use renderer::{paint_globe_disk, paint_path};
