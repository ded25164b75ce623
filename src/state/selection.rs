//! Route selection store.

use super::DirtyFlags;
use crate::data::{Dataset, RouteSegment};

/// The currently selected node and the routes leaving it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteSelection {
    selected: Option<String>,
    active: Vec<RouteSegment>,
}

impl RouteSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the active route set with the routes leaving `name`.
    ///
    /// Unknown names select nothing. Routes repeating an earlier target are
    /// dropped so every target appears at most once.
    pub fn select(&mut self, dataset: &Dataset, name: &str, dirty: &mut DirtyFlags) {
        let routes = match dataset.routes_from(name) {
            Some(routes) => routes,
            None => {
                log::warn!("No routes for selection {:?}", name);
                &[]
            }
        };

        let mut active: Vec<RouteSegment> = Vec::with_capacity(routes.len());
        for route in routes {
            if active.iter().any(|r| r.target_name == route.target_name) {
                log::debug!("Duplicate route {} -> {} ignored", name, route.target_name);
                continue;
            }
            active.push(route.clone());
        }

        log::info!("Selected {} ({} routes)", name, active.len());
        self.selected = Some(name.to_string());
        self.active = active;
        dirty.mark_selection();
    }

    /// Deselects everything.
    pub fn clear(&mut self, dirty: &mut DirtyFlags) {
        self.selected = None;
        self.active.clear();
        dirty.mark_selection();
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn active(&self) -> &[RouteSegment] {
        &self.active
    }
}
