// src/main.rs
use eframe::egui;
use anyhow::Result;
use chrono::Datelike;

mod analysis;
mod app;
mod data;
mod export;
mod state;
mod ui;

use app::ComexApp;
use state::AppState;

const BUNDLE_URL: &str =
    "https://github.com/DaviSalva/dashcomexstat/releases/download/01.07-25/dados.zip";

fn main() -> Result<()> {
    env_logger::init();

    let data_dir = std::env::current_dir()?.join("dados");
    data::bootstrap::ensure_data(&data_dir, BUNDLE_URL)?;

    // Reference tables are mandatory; a missing file halts startup here
    // rather than opening a dashboard with partial data.
    let store = data::DataStore::open(&data_dir)?;
    let now = chrono::Local::now();
    let state = AppState::new(store, now.year(), now.month());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("Dashboard COMEX"),
        ..Default::default()
    };

    eframe::run_native(
        "Dashboard COMEX",
        options,
        Box::new(|_cc| Box::new(ComexApp::new(state))),
    ).map_err(|e| anyhow::anyhow!("Failed to run application: {}", e))
}
