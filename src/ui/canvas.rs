//! Central canvas UI: the globe and its interaction.

use super::{colors, overlay};
use crate::geo::{paint_globe_disk, paint_path};
use crate::input::GestureEvent;
use crate::render::{GlobeEngine, TickOutcome};
use eframe::egui::{self, Painter, Sense, Stroke, Vec2};
use web_time::Instant;

const BORDER_WIDTH: f32 = 0.8;
const ROUTE_WIDTH: f32 = 2.0;
const ROUTE_LABEL_SIZE: f32 = 12.0;
const NODE_LABEL_SIZE: f32 = 14.0;

pub fn render_canvas(ctx: &egui::Context, engine: &mut GlobeEngine) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let available_size = ui.available_size();

        // Allocate the full available space for the canvas
        let (response, painter) = ui.allocate_painter(available_size, Sense::click_and_drag());

        let rect = response.rect;
        let origin = rect.min.to_vec2();

        painter.rect_filled(rect, 0.0, colors::canvas::BACKGROUND);

        if engine.projection().viewport() != rect.size() {
            engine.resize(rect.width(), rect.height());
        }

        handle_canvas_interaction(&response, origin, engine);

        let now = Instant::now();
        if let TickOutcome::Rendered {
            projection,
            selection,
        } = engine.frame(now)
        {
            log::trace!("Tick (projection: {}, selection: {})", projection, selection);
        }

        render_globe(&painter, engine, origin, now);

        let cursor = response
            .hover_pos()
            .and_then(|pos| engine.projection().invert(pos - origin));
        overlay::draw_overlay(ui, &rect, engine, cursor);

        schedule_repaint(ctx, engine);
    });
}

fn handle_canvas_interaction(response: &egui::Response, origin: Vec2, engine: &mut GlobeEngine) {
    for event in collect_gestures(response) {
        engine.handle_gesture(&event);
    }

    if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            if let Some(name) = engine.click(pos - origin) {
                log::debug!("Clicked {}", name);
            }
        }
    }

    let escape = response.ctx.input(|i| i.key_pressed(egui::Key::Escape));
    if escape && engine.selection().selected().is_some() {
        engine.clear_selection();
    }
}

/// Translates this frame's egui input into gestures.
fn collect_gestures(response: &egui::Response) -> Vec<GestureEvent> {
    let (multi_touch, zoom_delta, scroll_delta) = response
        .ctx
        .input(|i| (i.multi_touch(), i.zoom_delta(), i.raw_scroll_delta));

    let mut events = Vec::new();

    if response.dragged() {
        events.push(GestureEvent::Move {
            delta: response.drag_delta(),
            contacts: multi_touch.as_ref().map_or(1, |touch| touch.num_touches),
        });
    }

    if let Some(touch) = multi_touch {
        if touch.zoom_delta != 1.0 {
            events.push(GestureEvent::Zoom {
                factor: touch.zoom_delta,
                contacts: touch.num_touches,
                wheel: false,
            });
        }
    } else if response.hovered() {
        // Ctrl+wheel and trackpad pinch arrive as a zoom delta
        if zoom_delta != 1.0 {
            events.push(GestureEvent::Zoom {
                factor: zoom_delta,
                contacts: 1,
                wheel: true,
            });
        } else if scroll_delta.y != 0.0 {
            events.push(GestureEvent::Wheel {
                delta_y: scroll_delta.y,
            });
        }
    }

    events
}

/// Draws the globe, countries, routes and markers, back to front.
fn render_globe(painter: &Painter, engine: &GlobeEngine, origin: Vec2, now: Instant) {
    paint_globe_disk(
        painter,
        engine.projection(),
        origin,
        colors::globe::disk(),
        Stroke::NONE,
    );

    let border = Stroke::new(BORDER_WIDTH, colors::globe::BORDER);
    for country in engine.scene().countries() {
        if let Some(path) = &country.path {
            paint_path(painter, path, origin, border);
        }
    }

    render_routes(painter, engine, origin, now);
    render_nodes(painter, engine, origin);
}

fn render_routes(painter: &Painter, engine: &GlobeEngine, origin: Vec2, now: Instant) {
    let visuals = engine.routes().visuals();

    for visual in visuals {
        let opacity = visual.opacity(now);
        if opacity <= 0.0 {
            continue;
        }
        if let Some(path) = visual.path() {
            let stroke = Stroke::new(ROUTE_WIDTH, visual.color().gamma_multiply(opacity));
            paint_path(painter, path, origin, stroke);
        }
    }

    // Labels go on top of every route line
    let font_id = egui::FontId::proportional(ROUTE_LABEL_SIZE);
    for visual in visuals {
        let opacity = visual.label_opacity(now);
        if opacity <= 0.0 {
            continue;
        }
        let label = visual.label();
        if let Some(pos) = label.position {
            painter.text(
                pos + origin,
                egui::Align2::CENTER_CENTER,
                &label.text,
                font_id.clone(),
                colors::nodes::ROUTE_LABEL.gamma_multiply(opacity),
            );
        }
    }
}

fn render_nodes(painter: &Painter, engine: &GlobeEngine, origin: Vec2) {
    let scene = engine.scene();
    let font_id = egui::FontId::monospace(NODE_LABEL_SIZE);

    for marker in scene.nodes().iter().filter_map(|node| node.marker) {
        painter.circle_filled(marker.center + origin, marker.radius, colors::nodes::marker());
    }

    let selected = engine
        .selection()
        .selected()
        .and_then(|name| scene.node(name))
        .and_then(|node| node.marker);
    if let Some(marker) = selected {
        painter.circle_stroke(
            marker.center + origin,
            marker.radius,
            Stroke::new(1.5, colors::nodes::SELECTED_STROKE),
        );
    }

    for node in scene.nodes() {
        if node.label_opacity <= 0.0 {
            continue;
        }
        if let Some(pos) = node.label_position {
            painter.text(
                pos + origin,
                egui::Align2::CENTER_BOTTOM,
                &node.name,
                font_id.clone(),
                colors::nodes::LABEL.gamma_multiply(node.label_opacity),
            );
        }
    }
}

/// Keeps frames coming while something is animating or waiting for a tick.
fn schedule_repaint(ctx: &egui::Context, engine: &GlobeEngine) {
    if engine.is_animating() {
        ctx.request_repaint();
    } else if engine.needs_tick() {
        ctx.request_repaint_after(engine.settings().tick_interval());
    }
}
