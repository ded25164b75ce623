//! Centralized color constants for the UI.
//!
//! This module provides consistent colors across the globe and its overlay.

use eframe::egui::Color32;

/// Colors for the canvas behind the globe.
pub mod canvas {
    use super::Color32;

    /// Background color.
    pub const BACKGROUND: Color32 = Color32::from_rgb(20, 20, 35);
}

/// Colors for the globe itself.
pub mod globe {
    use super::Color32;

    /// Globe disk (#444 at 80% opacity) - requires alpha, use function.
    pub fn disk() -> Color32 {
        Color32::from_rgba_unmultiplied(68, 68, 68, 204)
    }

    /// Country boundary lines.
    pub const BORDER: Color32 = Color32::from_rgb(221, 221, 221);
}

/// Route colors by latency bucket.
pub mod latency {
    use super::Color32;

    /// Green - under 100ms.
    pub const FAST: Color32 = Color32::from_rgb(39, 182, 72);
    /// Yellow - 100ms to 200ms.
    pub const MODERATE: Color32 = Color32::from_rgb(242, 182, 0);
    /// Red - 200ms and above.
    pub const SLOW: Color32 = Color32::from_rgb(255, 69, 93);
}

/// Colors for data center markers and labels.
pub mod nodes {
    use super::Color32;

    /// Marker fill (#1e9de7 at 70% opacity) - requires alpha, use function.
    pub fn marker() -> Color32 {
        Color32::from_rgba_unmultiplied(30, 157, 231, 179)
    }
    /// Ring around the selected marker.
    pub const SELECTED_STROKE: Color32 = Color32::WHITE;
    /// Node name labels.
    pub const LABEL: Color32 = Color32::from_rgb(230, 230, 240);
    /// Latency labels on routes.
    pub const ROUTE_LABEL: Color32 = Color32::from_rgb(245, 245, 245);
}

/// Colors for the info overlay.
pub mod overlay {
    use super::Color32;

    pub const TITLE: Color32 = Color32::WHITE;
    /// Muted gray for secondary text.
    pub const TEXT: Color32 = Color32::from_rgb(160, 160, 170);
    /// Emphasized color for the selected node.
    pub const ACTIVE: Color32 = Color32::from_rgb(100, 180, 255);
    /// Error messages.
    pub const ERROR: Color32 = Color32::from_rgb(255, 80, 80);
}
