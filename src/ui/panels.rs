use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::format::format_usd;
use crate::data::model::{CellValue, Table};
use crate::state::{AppState, View};
use crate::ui::plot;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open trade data…").clicked() {
                open_report_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open CSV in explorer…").clicked() {
                open_explorer_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.source_path.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        ui.selectable_value(&mut state.view, View::Report, "Trade report");
        ui.selectable_value(&mut state.view, View::Explorer, "Column explorer");
        ui.selectable_value(&mut state.view, View::Lotto, "Lottery");

        ui.separator();

        if let Some(report) = &state.report {
            ui.label(format!("{} rows", report.derived.len()));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Trade report
// ---------------------------------------------------------------------------

pub fn report_view(ui: &mut Ui, state: &mut AppState) {
    let Some(report) = &state.report else {
        ui.centered_and_justified(|ui: &mut Ui| {
            let hint = match &state.source_path {
                Some(path) => format!(
                    "Could not read '{}'. Check the file name and encoding, then Reload.",
                    path.display()
                ),
                None => "Open a trade file to begin  (File → Open trade data…)".to_string(),
            };
            ui.heading(hint);
        });
        return;
    };

    let columns = state.pipeline.columns.clone();
    let categories = report.categories.clone();
    let mut picked: Option<String> = None;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Summary metrics ----
            ui.columns(3, |cols| {
                metric(&mut cols[0], "Total exports", report.summary.total_export);
                metric(&mut cols[1], "Total imports", report.summary.total_import);
                metric(&mut cols[2], "Trade balance", report.summary.balance);
            });
            ui.separator();

            // ---- Rankings ----
            ui.columns(2, |cols| {
                cols[0].strong(format!("Top {} exports by amount", state.top_n));
                plot::top_exports_chart(&mut cols[0], report, &columns);
                cols[1].strong(format!("Top {} unit prices: weight vs amount", state.top_n));
                plot::unit_price_scatter(&mut cols[1], report, &columns);
            });
            ui.separator();

            // ---- Drill-down ----
            ui.heading("Item details");
            let current = state.selected_category.clone().unwrap_or_default();
            egui::ComboBox::from_id_salt("category")
                .selected_text(&current)
                .width(280.0)
                .show_ui(ui, |ui: &mut Ui| {
                    for category in &categories {
                        if ui.selectable_label(current == *category, category).clicked() {
                            picked = Some(category.clone());
                        }
                    }
                });

            match &state.lookup {
                Some(rows) if rows.is_empty() => {
                    ui.label(RichText::new(format!("No records for '{current}'.")).italics());
                }
                Some(rows) => {
                    let shown = [
                        columns.direction.as_str(),
                        columns.weight.as_str(),
                        columns.amount.as_str(),
                        columns.unit_price_display.as_str(),
                    ];
                    table_grid(ui, "lookup", rows, &shown);
                }
                None => {}
            }
        });

    if let Some(category) = picked {
        state.select_category(category);
    }
}

fn metric(ui: &mut Ui, label: &str, value: f64) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(label);
        ui.label(RichText::new(format_usd(value, 0)).size(26.0).strong());
    });
}

// ---------------------------------------------------------------------------
// Column explorer
// ---------------------------------------------------------------------------

pub fn explorer_view(ui: &mut Ui, state: &mut AppState) {
    let Some(explorer) = &state.explorer else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a CSV file to explore  (File → Open CSV in explorer…)");
        });
        return;
    };

    let mut picked: Option<String> = None;

    ui.label(format!(
        "{}  ({} rows)",
        explorer.path.display(),
        explorer.table.len()
    ));
    ui.strong("Preview");
    let all: Vec<&str> = explorer.preview.columns().iter().map(String::as_str).collect();
    ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        table_grid(ui, "preview", &explorer.preview, &all);
    });
    ui.separator();

    if explorer.numeric_columns.is_empty() {
        ui.label(RichText::new("This file has no numeric columns to plot.").color(Color32::YELLOW));
        return;
    }

    let current = explorer.selected.clone().unwrap_or_default();
    egui::ComboBox::from_id_salt("explorer_column")
        .selected_text(&current)
        .show_ui(ui, |ui: &mut Ui| {
            for col in &explorer.numeric_columns {
                if ui.selectable_label(current == *col, col).clicked() {
                    picked = Some(col.clone());
                }
            }
        });

    if let Some(hist) = &explorer.histogram {
        ui.label(format!("{} values plotted", hist.total()));
        plot::histogram_chart(ui, &current, hist);
    }

    if let Some(col) = picked {
        state.select_explorer_column(col);
    }
}

// ---------------------------------------------------------------------------
// Lottery
// ---------------------------------------------------------------------------

pub fn lotto_view(ui: &mut Ui, state: &mut AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading("Lottery number generator");
        ui.add_space(8.0);
        if ui.button("Draw numbers").clicked() {
            state.draw_lotto();
        }
        if let Some(draw) = &state.last_draw {
            ui.add_space(8.0);
            ui.label(
                RichText::new(draw.numbers_text())
                    .size(28.0)
                    .color(Color32::from_rgb(0x2e, 0x7d, 0x32)),
            );
            ui.label(format!("Drawn at: {}", draw.timestamp_text()));
        }
    });
}

// ---------------------------------------------------------------------------
// Table widget
// ---------------------------------------------------------------------------

/// Render the named columns of `table`; unknown names are skipped.
fn table_grid(ui: &mut Ui, id: &str, table: &Table, shown: &[&str]) {
    let indices: Vec<(usize, &str)> = shown
        .iter()
        .filter_map(|name| table.column_index(name).map(|i| (i, *name)))
        .collect();
    if indices.is_empty() {
        return;
    }

    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .columns(Column::auto().resizable(true), indices.len())
            .header(20.0, |mut header| {
                for (_, name) in &indices {
                    header.col(|ui: &mut Ui| {
                        ui.strong(*name);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, table.len(), |mut row| {
                    let r = row.index();
                    for &(c, _) in &indices {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell_text(table.cell(r, c)));
                        });
                    }
                });
            });
    });
}

fn cell_text(value: &CellValue) -> String {
    match value {
        CellValue::Null => String::new(),
        CellValue::Float(v) => format!("{v:.2}"),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_report_dialog(state: &mut AppState) {
    if let Some(path) = pick_csv("Open trade data") {
        state.open_report(&path);
        state.view = View::Report;
    }
}

pub fn open_explorer_dialog(state: &mut AppState) {
    if let Some(path) = pick_csv("Open CSV") {
        state.open_explorer(&path);
        state.view = View::Explorer;
    }
}

fn pick_csv(title: &str) -> Option<std::path::PathBuf> {
    rfd::FileDialog::new()
        .set_title(title)
        .add_filter("CSV", &["csv", "CSV", "txt"])
        .pick_file()
}
