//! Drag and zoom gesture handling.
//!
//! Gestures are collected from egui input by the canvas and applied to the
//! projection here. Drags rotate the globe; wheel, pinch and multi-contact
//! gestures zoom it.

use crate::geo::GlobeProjection;
use crate::state::GlobeSettings;
use eframe::egui::Vec2;

/// A single pointer gesture for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    /// Pointer movement while pressed.
    Move { delta: Vec2, contacts: usize },
    /// Mouse wheel scroll in points; positive `delta_y` is the wheel moving
    /// away from the user.
    Wheel { delta_y: f32 },
    /// Multiplicative zoom from a pinch or ctrl+wheel.
    Zoom {
        factor: f32,
        contacts: usize,
        wheel: bool,
    },
}

/// Which recognizer handles a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureRoute {
    Drag,
    Zoom,
}

impl GestureEvent {
    /// Wheel events and anything with more than one contact zoom; the rest
    /// drag.
    pub fn route(&self) -> GestureRoute {
        match self {
            GestureEvent::Wheel { .. } => GestureRoute::Zoom,
            GestureEvent::Zoom { wheel: true, .. } => GestureRoute::Zoom,
            GestureEvent::Zoom { contacts, .. } | GestureEvent::Move { contacts, .. } => {
                if *contacts > 1 {
                    GestureRoute::Zoom
                } else {
                    GestureRoute::Drag
                }
            }
        }
    }
}

/// Applies gestures to a projection.
#[derive(Debug, Clone, PartialEq)]
pub struct InputController {
    /// Cumulative zoom factor relative to the initial scale
    zoom: f64,
    sensitivity: f64,
    wheel_rate: f64,
    floor_factor: f64,
}

impl InputController {
    pub fn new(settings: &GlobeSettings) -> Self {
        Self {
            zoom: 1.0,
            sensitivity: settings.drag_sensitivity,
            wheel_rate: settings.wheel_zoom_rate,
            floor_factor: settings.scale_floor_factor,
        }
    }

    #[cfg(test)]
    pub fn zoom_factor(&self) -> f64 {
        self.zoom
    }

    /// Back to zoom factor 1. Used when the viewport is re-initialized.
    pub fn reset_zoom(&mut self) {
        self.zoom = 1.0;
    }

    /// Applies a gesture. Returns `true` if the projection changed.
    pub fn handle(&mut self, event: &GestureEvent, projection: &mut GlobeProjection) -> bool {
        match (event.route(), *event) {
            (GestureRoute::Drag, GestureEvent::Move { delta, .. }) => self.drag(delta, projection),
            (GestureRoute::Zoom, GestureEvent::Wheel { delta_y }) => {
                let factor = 2f64.powf(delta_y as f64 * self.wheel_rate);
                self.zoom_by(factor, projection)
            }
            (GestureRoute::Zoom, GestureEvent::Zoom { factor, .. }) => {
                self.zoom_by(factor as f64, projection)
            }
            (route, event) => {
                log::debug!("Ignoring {:?} routed to {:?}", event, route);
                false
            }
        }
    }

    fn drag(&mut self, delta: Vec2, projection: &mut GlobeProjection) -> bool {
        if !delta.x.is_finite() || !delta.y.is_finite() {
            log::debug!("Ignoring non-finite drag {:?}", delta);
            return false;
        }
        if delta == Vec2::ZERO || projection.scale() <= 0.0 {
            return false;
        }
        let k = self.sensitivity / projection.scale();
        projection.rotate(delta.x as f64 * k, -(delta.y as f64) * k)
    }

    fn zoom_by(&mut self, factor: f64, projection: &mut GlobeProjection) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            log::debug!("Ignoring zoom factor {}", factor);
            return false;
        }
        if factor == 1.0 {
            return false;
        }

        let zoom = self.zoom * factor;
        self.zoom = if zoom <= self.floor_factor {
            self.floor_factor
        } else {
            zoom
        };
        projection.zoom_to(self.zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (InputController, GlobeProjection) {
        let settings = GlobeSettings::default();
        let projection = GlobeProjection::new(
            Vec2::new(1000.0, 800.0),
            settings.initial_rotation(),
            settings.scale_ratio,
            settings.scale_floor_factor,
        );
        (InputController::new(&settings), projection)
    }

    #[test]
    fn test_gesture_routing() {
        let drag = GestureEvent::Move {
            delta: Vec2::new(1.0, 0.0),
            contacts: 1,
        };
        let two_finger = GestureEvent::Move {
            delta: Vec2::new(1.0, 0.0),
            contacts: 2,
        };
        let pinch = GestureEvent::Zoom {
            factor: 1.1,
            contacts: 2,
            wheel: false,
        };
        let ctrl_wheel = GestureEvent::Zoom {
            factor: 1.1,
            contacts: 1,
            wheel: true,
        };
        assert_eq!(drag.route(), GestureRoute::Drag);
        assert_eq!(two_finger.route(), GestureRoute::Zoom);
        assert_eq!(pinch.route(), GestureRoute::Zoom);
        assert_eq!(ctrl_wheel.route(), GestureRoute::Zoom);
        assert_eq!(GestureEvent::Wheel { delta_y: 5.0 }.route(), GestureRoute::Zoom);
    }

    #[test]
    fn test_drag_rotates_by_sensitivity_over_scale() {
        let (mut input, mut projection) = setup();
        let scale = projection.scale();
        let changed = input.handle(
            &GestureEvent::Move {
                delta: Vec2::new(10.0, 4.0),
                contacts: 1,
            },
            &mut projection,
        );
        assert!(changed);

        let (lambda, phi) = projection.rotation();
        let k = 75.0 / scale;
        assert!((lambda - (50.0 + 10.0 * k)).abs() < 1e-9);
        assert!((phi - (-30.0 - 4.0 * k)).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_clamps_at_floor() {
        let (mut input, mut projection) = setup();
        let floor = projection.initial_scale() * 0.3;

        let tiny = GestureEvent::Zoom {
            factor: 0.1,
            contacts: 2,
            wheel: false,
        };
        input.handle(&tiny, &mut projection);
        assert!((projection.scale() - floor).abs() < 1e-9);
        assert_eq!(input.zoom_factor(), 0.3);

        input.handle(&tiny, &mut projection);
        assert!((projection.scale() - floor).abs() < 1e-9);
        assert_eq!(input.zoom_factor(), 0.3);
    }

    #[test]
    fn test_zoom_accumulates() {
        let (mut input, mut projection) = setup();
        let pinch = GestureEvent::Zoom {
            factor: 2.0,
            contacts: 2,
            wheel: false,
        };
        input.handle(&pinch, &mut projection);
        input.handle(&pinch, &mut projection);
        assert!((projection.scale() - projection.initial_scale() * 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_wheel_up_zooms_in() {
        let (mut input, mut projection) = setup();
        let before = projection.scale();
        assert!(input.handle(&GestureEvent::Wheel { delta_y: 100.0 }, &mut projection));
        assert!(projection.scale() > before);
        assert!((input.zoom_factor() - 2f64.powf(0.2)).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_input_is_ignored() {
        let (mut input, mut projection) = setup();
        let before = projection.clone();

        let nan_drag = GestureEvent::Move {
            delta: Vec2::new(f32::NAN, 1.0),
            contacts: 1,
        };
        let negative = GestureEvent::Zoom {
            factor: -2.0,
            contacts: 2,
            wheel: false,
        };
        let single_pinch = GestureEvent::Zoom {
            factor: 2.0,
            contacts: 1,
            wheel: false,
        };
        assert!(!input.handle(&nan_drag, &mut projection));
        assert!(!input.handle(&negative, &mut projection));
        assert!(!input.handle(&single_pinch, &mut projection));
        assert!(!input.handle(&GestureEvent::Wheel { delta_y: f32::INFINITY }, &mut projection));

        assert_eq!(projection, before);
        assert_eq!(input.zoom_factor(), 1.0);
    }

    #[test]
    fn test_two_finger_move_does_not_rotate() {
        let (mut input, mut projection) = setup();
        let before = projection.rotation();
        let moved = GestureEvent::Move {
            delta: Vec2::new(30.0, 0.0),
            contacts: 2,
        };
        assert!(!input.handle(&moved, &mut projection));
        assert_eq!(projection.rotation(), before);
    }
}
