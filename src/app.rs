use eframe::egui;

use crate::config::AppConfig;
use crate::state::{AppState, View};
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct TradeReportApp {
    pub state: AppState,
}

impl TradeReportApp {
    /// Build the app and open the configured dataset, if any.
    pub fn new(config: &AppConfig) -> Self {
        let mut state = AppState::new(config);
        if let Some(path) = &config.data_path {
            if path.is_file() {
                state.open_report(path);
            } else {
                log::info!("{} not found, waiting for a file to be opened", path.display());
            }
        }
        Self { state }
    }
}

impl eframe::App for TradeReportApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: active view ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.view {
            View::Report => panels::report_view(ui, &mut self.state),
            View::Explorer => panels::explorer_view(ui, &mut self.state),
            View::Lotto => panels::lotto_view(ui, &mut self.state),
        });
    }
}
