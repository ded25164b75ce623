//! Startup dataset loading with cross-platform support.
//!
//! Uses channel-based communication to bridge async loading with egui's
//! synchronous update loop.

use super::{Dataset, LoadError};
use eframe::egui;
use std::sync::mpsc::{channel, Receiver, Sender};

type LoadResult = Result<Dataset, LoadError>;

/// Channel-based loader for the two startup documents.
///
/// Native builds read local files on a worker thread. WASM builds fetch
/// both documents relative to the page.
pub struct DatasetChannel {
    sender: Sender<LoadResult>,
    receiver: Receiver<LoadResult>,
}

impl Default for DatasetChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetChannel {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self { sender, receiver }
    }

    /// Spawns a task that loads and parses both documents.
    ///
    /// The result is sent through the channel and a repaint is requested
    /// so the UI picks it up.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(&self, ctx: egui::Context, world_url: String, data_url: String) {
        let sender = self.sender.clone();

        std::thread::spawn(move || {
            let result = read_file(&world_url).and_then(|world| {
                let app = read_file(&data_url)?;
                Dataset::from_documents(&world, &app)
            });
            let _ = sender.send(result);
            ctx.request_repaint();
        });
    }

    #[cfg(target_arch = "wasm32")]
    pub fn load(&self, ctx: egui::Context, world_url: String, data_url: String) {
        let sender = self.sender.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let result = match fetch_text(&world_url).await {
                Ok(world) => match fetch_text(&data_url).await {
                    Ok(app) => Dataset::from_documents(&world, &app),
                    Err(e) => Err(e),
                },
                Err(e) => Err(e),
            };
            let _ = sender.send(result);
            ctx.request_repaint();
        });
    }

    /// Non-blocking check for a completed load.
    ///
    /// Returns Some(result) once loading finished, None while still pending.
    pub fn try_recv(&self) -> Option<LoadResult> {
        self.receiver.try_recv().ok()
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn read_file(path: &str) -> Result<String, LoadError> {
    log::info!("Reading {}", path);
    std::fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.to_string(),
        message: e.to_string(),
    })
}

#[cfg(target_arch = "wasm32")]
async fn fetch_text(url: &str) -> Result<String, LoadError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    log::info!("Fetching {}", url);

    let window = web_sys::window().ok_or_else(|| LoadError::Fetch("No window".to_string()))?;
    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| LoadError::Fetch(format!("{:?}", e)))?;
    let response: web_sys::Response = response
        .dyn_into()
        .map_err(|_| LoadError::Fetch("Unexpected fetch result".to_string()))?;

    if !response.ok() {
        return Err(LoadError::Fetch(format!(
            "{} returned HTTP {}",
            url,
            response.status()
        )));
    }

    let text = response
        .text()
        .map_err(|e| LoadError::Fetch(format!("{:?}", e)))?;
    let text = JsFuture::from(text)
        .await
        .map_err(|e| LoadError::Fetch(format!("{:?}", e)))?;
    text.as_string()
        .ok_or_else(|| LoadError::Fetch(format!("{} did not return text", url)))
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_file("/nonexistent/latency-globe/world.json").unwrap_err();
        match err {
            LoadError::Io { path, .. } => assert_eq!(path, "/nonexistent/latency-globe/world.json"),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
