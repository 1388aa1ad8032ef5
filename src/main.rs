use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use eframe::egui;

use spacex_dash::app::DashboardApp;
use spacex_dash::config::DashboardConfig;
use spacex_dash::data::loader;
use spacex_dash::state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let config = DashboardConfig::default();

    // A table that fails to load is fatal: never open the window on
    // partial data.
    let table = loader::load_file(&config.data_path)
        .with_context(|| format!("loading {}", config.data_path.display()))
        .inspect_err(|e| log::error!("{e:#}"))?;

    let state = AppState::new(Arc::new(table), &config).context("wiring dashboard callbacks")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size),
        ..Default::default()
    };

    eframe::run_native(
        "SpaceX Launch Records Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow!("dashboard window failed: {e}"))
}
