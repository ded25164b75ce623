#![warn(clippy::all)]

//! Latency Globe - an interactive globe of cloud data center latencies.
//!
//! Data centers are drawn as markers on an orthographic globe. Clicking one
//! shows the routes leaving it, colored by measured latency. The globe can
//! be rotated by dragging and zoomed with the wheel or a pinch.

mod data;
mod geo;
mod input;
mod render;
mod state;
mod ui;

use data::{DatasetChannel, LoadError};
use eframe::egui;
use render::GlobeEngine;
use state::GlobeSettings;

// Native entry point
#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    env_logger::init();

    let native_options = eframe::NativeOptions::default();

    eframe::run_native(
        "Latency Globe",
        native_options,
        Box::new(|cc| Ok(Box::new(GlobeApp::new(cc)))),
    )
}

// WASM entry point - main is not called on wasm32
#[cfg(target_arch = "wasm32")]
fn main() {}

/// Entry point for the WASM application.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub async fn start() {
    use eframe::wasm_bindgen::JsCast as _;

    // Redirect `log` messages to `console.log`:
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async {
        let document = web_sys::window()
            .expect("No window")
            .document()
            .expect("No document");

        let canvas = document
            .get_element_by_id("app_canvas")
            .expect("Failed to find app_canvas")
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .expect("app_canvas was not a HtmlCanvasElement");

        let start_result = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| Ok(Box::new(GlobeApp::new(cc)))),
            )
            .await;

        // Remove the loading text once the app has loaded:
        if let Some(loading_text) = document.get_element_by_id("loading_text") {
            match start_result {
                Ok(_) => {
                    loading_text.remove();
                }
                Err(e) => {
                    loading_text.set_inner_html(
                        "<p>The app has crashed. See the developer console for details.</p>",
                    );
                    panic!("Failed to start eframe: {e:?}");
                }
            }
        }
    });
}

/// Where the app is in its startup.
enum LoadStatus {
    Loading,
    Failed(LoadError),
    Ready(Box<GlobeEngine>),
}

/// Main application state and logic.
pub struct GlobeApp {
    settings: GlobeSettings,

    /// Channel for the async dataset load
    dataset_channel: DatasetChannel,

    status: LoadStatus,
}

impl GlobeApp {
    /// Creates the app and starts loading the dataset.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings = GlobeSettings::load();

        log::info!(
            "Loading dataset from {} and {}",
            settings.world_url,
            settings.data_url
        );
        let dataset_channel = DatasetChannel::new();
        dataset_channel.load(
            cc.egui_ctx.clone(),
            settings.world_url.clone(),
            settings.data_url.clone(),
        );

        Self {
            settings,
            dataset_channel,
            status: LoadStatus::Loading,
        }
    }

    fn poll_dataset(&mut self, ctx: &egui::Context) {
        let Some(result) = self.dataset_channel.try_recv() else {
            return;
        };

        self.status = match result {
            Ok(dataset) => {
                // The canvas resizes the engine to the real panel size on the
                // first frame.
                let viewport = ctx.available_rect().size();
                LoadStatus::Ready(Box::new(GlobeEngine::new(
                    dataset,
                    self.settings.clone(),
                    viewport,
                )))
            }
            Err(e) => {
                log::error!("Failed to load dataset: {}", e);
                LoadStatus::Failed(e)
            }
        };
    }
}

impl eframe::App for GlobeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if matches!(self.status, LoadStatus::Loading) {
            self.poll_dataset(ctx);
        }

        match &mut self.status {
            LoadStatus::Loading => ui::render_status(ctx, "Loading data center latencies...", false),
            LoadStatus::Failed(e) => ui::render_status(ctx, &e.to_string(), true),
            LoadStatus::Ready(engine) => ui::render_canvas(ctx, engine),
        }
    }
}
