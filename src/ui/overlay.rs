//! Info overlay drawn on top of the globe: title, selection, legend.

use super::colors;
use crate::render::{GlobeEngine, LatencyBucket};
use eframe::egui::{self, Rect, RichText, Sense, Vec2};
use geo_types::Coord;

const OVERLAY_SIZE: Vec2 = Vec2::new(260.0, 190.0);

/// Draws the overlay. `cursor` is the globe coordinate under the pointer.
pub fn draw_overlay(
    ui: &mut egui::Ui,
    rect: &Rect,
    engine: &GlobeEngine,
    cursor: Option<Coord<f64>>,
) {
    let overlay_rect = Rect::from_min_size(rect.left_top() + Vec2::new(12.0, 12.0), OVERLAY_SIZE);

    ui.scope_builder(egui::UiBuilder::new().max_rect(overlay_rect), |ui| {
        ui.vertical(|ui| {
            ui.label(
                RichText::new("Data center latencies")
                    .strong()
                    .size(16.0)
                    .color(colors::overlay::TITLE),
            );

            match engine.selection().selected() {
                Some(name) => {
                    ui.label(
                        RichText::new(format!(
                            "{} ({} routes)",
                            name,
                            engine.selection().active().len()
                        ))
                        .monospace()
                        .size(12.0)
                        .color(colors::overlay::ACTIVE),
                    );
                    if let Some(dc) = engine.dataset().data_center(name) {
                        info_line(ui, &format_coord(dc.location));
                    }
                }
                None => {
                    ui.label(
                        RichText::new("Click a data center to show its routes")
                            .size(12.0)
                            .color(colors::overlay::TEXT),
                    );
                }
            }

            ui.add_space(6.0);
            for bucket in LatencyBucket::ALL {
                legend_row(ui, bucket);
            }

            ui.add_space(6.0);
            let projection = engine.projection();
            info_line(
                ui,
                &format!(
                    "View: {}  Zoom: {:.0}%",
                    format_coord(projection.view_center()),
                    projection.scale() / projection.initial_scale() * 100.0
                ),
            );
            if let Some(coord) = cursor {
                info_line(ui, &format!("Cursor: {}", format_coord(coord)));
            }
        });
    });

    draw_credit(ui, rect);
}

fn info_line(ui: &mut egui::Ui, text: &str) {
    ui.label(
        RichText::new(text)
            .monospace()
            .size(11.0)
            .color(colors::overlay::TEXT),
    );
}

/// Formats a (lon, lat) coordinate as e.g. `38.0°N 77.0°W`.
fn format_coord(coord: Coord<f64>) -> String {
    let ns = if coord.y >= 0.0 { 'N' } else { 'S' };
    let ew = if coord.x >= 0.0 { 'E' } else { 'W' };
    format!("{:.1}°{} {:.1}°{}", coord.y.abs(), ns, coord.x.abs(), ew)
}

fn legend_row(ui: &mut egui::Ui, bucket: LatencyBucket) {
    ui.horizontal(|ui| {
        let (swatch, _) = ui.allocate_exact_size(Vec2::splat(12.0), Sense::hover());
        ui.painter()
            .circle_filled(swatch.center(), 5.0, bucket.color());
        ui.label(
            RichText::new(bucket.label())
                .size(12.0)
                .color(colors::overlay::TEXT),
        );
    });
}

fn draw_credit(ui: &mut egui::Ui, rect: &Rect) {
    ui.painter().text(
        rect.left_bottom() + Vec2::new(12.0, -10.0),
        egui::Align2::LEFT_BOTTOM,
        "Latency data scraped from CloudPing",
        egui::FontId::proportional(11.0),
        colors::overlay::TEXT,
    );
}

/// Centered status text shown while the dataset is loading or after it
/// failed to load.
pub fn render_status(ctx: &egui::Context, message: &str, is_error: bool) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.centered_and_justified(|ui| {
            let color = if is_error {
                colors::overlay::ERROR
            } else {
                colors::overlay::TEXT
            };
            ui.label(RichText::new(message).size(14.0).color(color));
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_coord() {
        assert_eq!(format_coord(Coord { x: -77.0, y: 38.0 }), "38.0°N 77.0°W");
        assert_eq!(format_coord(Coord { x: 151.2, y: -33.87 }), "33.9°S 151.2°E");
    }
}
