use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoints, Points};

use crate::data::profile::Histogram;
use crate::data::schema::ColumnMap;
use crate::state::TradeReport;

// ---------------------------------------------------------------------------
// Top exports (horizontal bar chart)
// ---------------------------------------------------------------------------

const EXPORT_BAR: Color32 = Color32::from_rgb(59, 82, 139);

/// Largest export amounts, biggest bar on top.
pub fn top_exports_chart(ui: &mut Ui, report: &TradeReport, columns: &ColumnMap) {
    let table = &report.top_exports;
    let (Some(cat_idx), Some(amount_idx)) = (
        table.column_index(&columns.category),
        table.column_index(&columns.amount),
    ) else {
        return;
    };

    let n = table.len();
    let bars: Vec<Bar> = (0..n)
        .map(|i| {
            let amount = table.cell(i, amount_idx).as_f64().unwrap_or(0.0);
            // rank 0 gets the highest y position
            Bar::new((n - i) as f64, amount)
                .name(table.cell(i, cat_idx).to_string())
                .fill(EXPORT_BAR)
        })
        .collect();

    Plot::new("top_exports")
        .height(320.0)
        .x_axis_label("Export amount ($)")
        .show_y(false)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().name("Exports"));
        });
}

// ---------------------------------------------------------------------------
// Weight vs amount scatter (point size = unit price)
// ---------------------------------------------------------------------------

const MIN_RADIUS: f32 = 3.0;
const MAX_RADIUS: f32 = 18.0;

/// Highest unit prices plotted as weight vs amount, coloured by item.
pub fn unit_price_scatter(ui: &mut Ui, report: &TradeReport, columns: &ColumnMap) {
    let table = &report.top_unit_price;
    let (Some(cat_idx), Some(w_idx), Some(a_idx), Some(p_idx)) = (
        table.column_index(&columns.category),
        table.column_index(&columns.weight),
        table.column_index(&columns.amount),
        table.column_index(&columns.unit_price),
    ) else {
        return;
    };

    let max_price = table
        .numeric_values(p_idx)
        .flatten()
        .fold(0.0_f64, f64::max);

    Plot::new("unit_price_scatter")
        .height(320.0)
        .legend(Legend::default())
        .x_axis_label("Weight (kg)")
        .y_axis_label("Amount ($)")
        .show(ui, |plot_ui| {
            for row in table.rows() {
                let (Some(weight), Some(amount)) = (row[w_idx].as_f64(), row[a_idx].as_f64()) else {
                    continue;
                };
                let price = row[p_idx].as_f64().unwrap_or(0.0);
                let radius = if max_price > 0.0 {
                    MIN_RADIUS + (MAX_RADIUS - MIN_RADIUS) * (price / max_price) as f32
                } else {
                    MIN_RADIUS
                };

                let category = &row[cat_idx];
                let points = Points::new(PlotPoints::new(vec![[weight, amount]]))
                    .name(category.to_string())
                    .radius(radius)
                    .color(report.color_map.color_for(category));
                plot_ui.points(points);
            }
        });
}

// ---------------------------------------------------------------------------
// Column explorer histogram
// ---------------------------------------------------------------------------

pub fn histogram_chart(ui: &mut Ui, column: &str, hist: &Histogram) {
    let width = if hist.bin_width > 0.0 { hist.bin_width } else { 1.0 };
    let bars: Vec<Bar> = hist
        .counts
        .iter()
        .enumerate()
        .map(|(i, &count)| {
            let x = if hist.bin_width > 0.0 { hist.bin_center(i) } else { hist.min };
            Bar::new(x, count as f64).width(width)
        })
        .collect();

    Plot::new("histogram")
        .legend(Legend::default())
        .x_axis_label(column)
        .y_axis_label("Count")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .color(Color32::from_rgb(0xcc, 0x00, 0xff))
                    .name(format!("{column} distribution")),
            );
        });
}
