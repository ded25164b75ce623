//! Startup dataset: country boundaries, data centers and routes.
//!
//! Both documents are fetched once at startup through [`DatasetChannel`] and
//! parsed into an immutable [`Dataset`].

mod dataset;
mod loader;

pub use dataset::{Dataset, RouteSegment};
pub use loader::DatasetChannel;

#[cfg(test)]
pub(crate) use dataset::tests::sample_dataset;

/// Errors that can occur while loading the dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    /// A local file could not be read.
    #[cfg_attr(target_arch = "wasm32", allow(dead_code))]
    Io { path: String, message: String },
    /// A document could not be fetched over HTTP.
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    Fetch(String),
    /// The world-boundary document is not valid GeoJSON.
    Geography(String),
    /// The application document is malformed.
    Application(String),
    /// The application document lists no data centers.
    Empty,
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io { path, message } => write!(f, "Failed to read {}: {}", path, message),
            LoadError::Fetch(msg) => write!(f, "Fetch failed: {}", msg),
            LoadError::Geography(msg) => write!(f, "Invalid world data: {}", msg),
            LoadError::Application(msg) => write!(f, "Invalid application data: {}", msg),
            LoadError::Empty => write!(f, "No data centers in application data"),
        }
    }
}

impl std::error::Error for LoadError {}
