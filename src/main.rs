mod app;
mod color;
mod config;
mod data;
mod lotto;
mod state;
mod ui;

use app::TradeReportApp;
use config::AppConfig;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = AppConfig::from_env()?;
    log::debug!("config: {config:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Trade Report – Monthly Fisheries Trade",
        options,
        Box::new(move |_cc| Ok(Box::new(TradeReportApp::new(&config)))),
    )
    .map_err(|e| anyhow::anyhow!("running the UI: {e}"))
}
