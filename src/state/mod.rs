//! Application state shared between input handling and rendering.

mod selection;
mod settings;

pub use selection::RouteSelection;
pub use settings::GlobeSettings;

/// What changed since the last render tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirtyFlags {
    /// Rotation, scale or viewport changed.
    pub projection: bool,
    /// The active route set changed.
    pub selection: bool,
}

impl DirtyFlags {
    pub fn mark_projection(&mut self) {
        self.projection = true;
    }

    pub fn mark_selection(&mut self) {
        self.selection = true;
    }

    pub fn is_clean(&self) -> bool {
        !self.projection && !self.selection
    }

    /// Returns the current flags and clears them.
    pub fn take(&mut self) -> DirtyFlags {
        std::mem::take(self)
    }
}
