//! UI modules for the latency globe.
//!
//! - Central canvas: the globe, routes and markers, with drag/zoom/click
//! - Overlay: title, current selection and latency legend

mod canvas;
pub mod colors;
mod overlay;

pub use canvas::render_canvas;
pub use overlay::render_status;
