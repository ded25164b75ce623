//! Globe engine: projection, selection and render state in one place.
//!
//! Input writes the projection and selection through the engine, which
//! records what changed in its [`DirtyFlags`]. The render tick reads and
//! clears the flags, reprojecting only what is stale.

use super::routes::RouteLayer;
use super::scene::SceneGraph;
use super::transition::TransitionTiming;
use crate::data::Dataset;
use crate::geo::GlobeProjection;
use crate::input::{GestureEvent, InputController};
use crate::state::{DirtyFlags, GlobeSettings, RouteSelection};
use eframe::egui::{Pos2, Vec2};
use web_time::Instant;

/// Result of a render tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing was stale; no work done.
    Idle,
    /// Stale state was re-rendered.
    Rendered { projection: bool, selection: bool },
}

/// Owns all mutable globe state for a loaded dataset.
#[derive(Debug, Clone)]
pub struct GlobeEngine {
    dataset: Dataset,
    settings: GlobeSettings,
    projection: GlobeProjection,
    input: InputController,
    dirty: DirtyFlags,
    scene: SceneGraph,
    selection: RouteSelection,
    routes: RouteLayer,
    last_tick: Option<Instant>,
}

impl GlobeEngine {
    pub fn new(dataset: Dataset, settings: GlobeSettings, viewport: Vec2) -> Self {
        let projection = GlobeProjection::new(
            viewport,
            settings.initial_rotation(),
            settings.scale_ratio,
            settings.scale_floor_factor,
        );
        let timing = TransitionTiming {
            enter: settings.enter_duration(),
            fade: settings.fade_duration(),
        };

        let mut dirty = DirtyFlags::default();
        dirty.mark_projection();

        Self {
            input: InputController::new(&settings),
            scene: SceneGraph::new(settings.marker_radius, settings.label_offset),
            routes: RouteLayer::new(timing),
            selection: RouteSelection::new(),
            last_tick: None,
            dataset,
            settings,
            projection,
            dirty,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn settings(&self) -> &GlobeSettings {
        &self.settings
    }

    pub fn projection(&self) -> &GlobeProjection {
        &self.projection
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn routes(&self) -> &RouteLayer {
        &self.routes
    }

    pub fn selection(&self) -> &RouteSelection {
        &self.selection
    }

    #[cfg(test)]
    pub fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    /// Applies a gesture to the projection. Returns `true` if it changed.
    pub fn handle_gesture(&mut self, event: &GestureEvent) -> bool {
        let changed = self.input.handle(event, &mut self.projection);
        if changed {
            self.dirty.mark_projection();
        }
        changed
    }

    /// Re-initializes the projection for a new viewport size.
    ///
    /// Rotation is kept; scale and zoom return to their initial values.
    pub fn resize(&mut self, width: f32, height: f32) {
        if self.projection.resize(width, height) {
            log::debug!("Resized globe to {}x{}", width, height);
            self.input.reset_zoom();
            self.dirty.mark_projection();
        }
    }

    /// Selects the routes leaving `name`.
    pub fn select(&mut self, name: &str) {
        self.selection.select(&self.dataset, name, &mut self.dirty);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear(&mut self.dirty);
    }

    /// Selects the node under a click, if any.
    pub fn click(&mut self, pos: Pos2) -> Option<String> {
        let name = self.scene.hit_test(pos)?.to_string();
        self.select(&name);
        Some(name)
    }

    /// Per-frame update: advances transitions, then ticks when the cadence
    /// allows.
    pub fn frame(&mut self, now: Instant) -> TickOutcome {
        self.routes.advance(now, &self.projection);

        let due = self.last_tick.map_or(true, |last| {
            now.saturating_duration_since(last) >= self.settings.tick_interval()
        });
        if due {
            self.tick(now)
        } else {
            TickOutcome::Idle
        }
    }

    /// Re-renders whatever the dirty flags mark as stale, then clears them.
    ///
    /// With no flags set this does nothing at all.
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        if self.dirty.is_clean() {
            return TickOutcome::Idle;
        }
        let flags = self.dirty.take();

        if flags.projection {
            self.scene.reproject(&self.projection, &self.dataset);
        }
        self.routes.reconcile(
            self.selection.active(),
            &self.projection,
            flags.selection,
            now,
        );

        self.last_tick = Some(now);
        TickOutcome::Rendered {
            projection: flags.projection,
            selection: flags.selection,
        }
    }

    /// Whether any route is mid-transition.
    pub fn is_animating(&self) -> bool {
        self.routes.is_animating()
    }

    /// Whether the next tick has work to do.
    pub fn needs_tick(&self) -> bool {
        !self.dirty.is_clean()
    }
}
