use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::color::ColorMap;
use crate::config::AppConfig;
use crate::data::cache::TableCache;
use crate::data::error::PipelineError;
use crate::data::loader::load_file;
use crate::data::model::Table;
use crate::data::pipeline::{rank, ReportPipeline, SortOrder, TradeSummary};
use crate::data::profile::{histogram, numeric_columns, Histogram};
use crate::data::schema::Direction;
use crate::lotto::{self, Draw};

// ---------------------------------------------------------------------------
// Derived views of the trade report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Report,
    Explorer,
    Lotto,
}

/// Everything the report view renders, computed once per load.
pub struct TradeReport {
    pub derived: Table,
    pub summary: TradeSummary,
    /// Largest export amounts.
    pub top_exports: Table,
    /// Highest unit prices across both directions.
    pub top_unit_price: Table,
    pub categories: Vec<String>,
    /// Colours per category of `top_unit_price`.
    pub color_map: ColorMap,
}

impl TradeReport {
    pub fn build(pipeline: &ReportPipeline, base: &Table, top_n: usize) -> Result<Self, PipelineError> {
        let cols = &pipeline.columns;
        let derived = pipeline.derive(base)?;
        let summary = pipeline.summarize(&derived)?;

        let exports = pipeline.partition(&derived, Direction::Export)?;
        let top_exports = rank(&exports, &cols.amount, top_n, SortOrder::Descending)?;
        let top_unit_price = rank(&derived, &cols.unit_price, top_n, SortOrder::Descending)?;

        let cat_idx = top_unit_price.require_column(&cols.category)?;
        let color_map = ColorMap::new(&top_unit_price.unique_values(cat_idx));

        let categories = pipeline.categories(&derived)?;

        Ok(Self {
            derived,
            summary,
            top_exports,
            top_unit_price,
            categories,
            color_map,
        })
    }
}

/// Column explorer over an arbitrary CSV file.
pub struct ExplorerState {
    pub path: PathBuf,
    pub table: Arc<Table>,
    pub preview: Table,
    pub numeric_columns: Vec<String>,
    pub selected: Option<String>,
    pub histogram: Option<Histogram>,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Rows shown in the explorer preview.
pub const PREVIEW_ROWS: usize = 10;

/// The full UI state, independent of rendering.
///
/// Every user action goes through one of the handlers below, which run the
/// pipeline to completion and catch its errors into `status_message`.
pub struct AppState {
    pub view: View,
    pub pipeline: ReportPipeline,
    pub top_n: usize,
    pub histogram_bins: usize,

    /// Trade dataset currently shown (None until a file is opened).
    pub source_path: Option<PathBuf>,
    pub report: Option<TradeReport>,
    pub selected_category: Option<String>,
    /// Drill-down rows for `selected_category`.
    pub lookup: Option<Table>,

    pub explorer: Option<ExplorerState>,
    explorer_cache: TableCache,

    pub last_draw: Option<Draw>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            view: View::default(),
            pipeline: ReportPipeline::new(
                config.columns.clone(),
                config.directions.clone(),
                config.encodings.clone(),
            ),
            top_n: config.top_n,
            histogram_bins: config.histogram_bins,
            source_path: None,
            report: None,
            selected_category: None,
            lookup: None,
            explorer: None,
            explorer_cache: TableCache::new(),
            last_draw: None,
            status_message: None,
        }
    }

    /// Open (or re-open) the trade dataset at `path`.
    pub fn open_report(&mut self, path: &Path) {
        self.source_path = Some(path.to_path_buf());
        self.pipeline.retain_cached(path);
        match self.build_report(path) {
            Ok(report) => {
                log::info!(
                    "Report ready: {} rows, {} categories, balance {:.0}",
                    report.derived.len(),
                    report.categories.len(),
                    report.summary.balance
                );
                let first = report.categories.first().cloned();
                self.report = Some(report);
                self.status_message = None;
                match first {
                    Some(category) => self.select_category(category),
                    None => {
                        self.selected_category = None;
                        self.lookup = None;
                    }
                }
            }
            Err(e) => {
                log::error!("Failed to build report: {e}");
                self.report = None;
                self.selected_category = None;
                self.lookup = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    fn build_report(&mut self, path: &Path) -> Result<TradeReport, PipelineError> {
        let base = self.pipeline.load(path)?;
        TradeReport::build(&self.pipeline, &base, self.top_n)
    }

    /// Force a re-read of the current dataset from disk.
    pub fn reload(&mut self) {
        if let Some(path) = self.source_path.clone() {
            self.pipeline.invalidate(&path);
            self.open_report(&path);
        }
    }

    /// Drill down into one category.
    pub fn select_category(&mut self, category: String) {
        let Some(report) = &self.report else {
            return;
        };
        match self.pipeline.lookup(&report.derived, &category) {
            Ok(rows) => {
                self.lookup = Some(rows);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Lookup of '{category}' failed: {e}");
                self.lookup = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
        self.selected_category = Some(category);
    }

    /// Load an arbitrary CSV into the column explorer.
    pub fn open_explorer(&mut self, path: &Path) {
        self.explorer_cache.retain_only(path);
        let encodings = self.pipeline.encodings.clone();
        let loaded = self
            .explorer_cache
            .get_or_load(path, |p| load_file(p, &encodings, &[]).map(|(t, _)| t));

        match loaded {
            Ok(table) => {
                let numeric = numeric_columns(&table);
                let selected = numeric.first().cloned();
                self.explorer = Some(ExplorerState {
                    path: path.to_path_buf(),
                    preview: table.head(PREVIEW_ROWS),
                    table,
                    numeric_columns: numeric,
                    selected: None,
                    histogram: None,
                });
                self.status_message = None;
                if let Some(column) = selected {
                    self.select_explorer_column(column);
                }
            }
            Err(e) => {
                log::error!("Failed to open {}: {e}", path.display());
                self.explorer = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    pub fn select_explorer_column(&mut self, column: String) {
        let bins = self.histogram_bins;
        let Some(explorer) = &mut self.explorer else {
            return;
        };
        match histogram(&explorer.table, &column, bins) {
            Ok(h) => explorer.histogram = Some(h),
            Err(e) => {
                log::error!("Histogram of '{column}' failed: {e}");
                explorer.histogram = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
        explorer.selected = Some(column);
    }

    pub fn draw_lotto(&mut self) {
        let draw = lotto::draw(&mut rand::thread_rng());
        log::debug!("lotto draw {}", draw.numbers_text());
        self.last_draw = Some(draw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const TRADE_CSV: &str = "수출입구분명,수산물수출입품목명,당월수출입중량(킬로그램),당월수출입미화금액(달러)\n\
                             수출,김,0,100\n\
                             수출,참치,10,50\n\
                             수입,연어,5,20\n\
                             수출,김,2,300\n";

    #[test]
    fn test_open_report_builds_views_and_selects_first_category() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.CSV");
        fs::write(&path, TRADE_CSV).unwrap();

        let mut state = AppState::default();
        state.open_report(&path);

        let report = state.report.as_ref().expect("report");
        assert_eq!(report.derived.len(), 3);
        assert_eq!(report.summary.total_export, 350.0);
        assert_eq!(report.summary.balance, 330.0);
        assert_eq!(report.top_exports.len(), 2);
        assert_eq!(report.categories, vec!["김", "연어", "참치"]);
        assert_eq!(state.selected_category.as_deref(), Some("김"));
        assert_eq!(state.lookup.as_ref().map(Table::len), Some(1));
        assert!(state.status_message.is_none());
    }

    #[test]
    fn test_unknown_category_yields_empty_lookup() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.CSV");
        fs::write(&path, TRADE_CSV).unwrap();

        let mut state = AppState::default();
        state.open_report(&path);
        state.select_category("nonexistent".into());
        assert!(state.lookup.as_ref().is_some_and(Table::is_empty));
        assert!(state.status_message.is_none());
    }

    #[test]
    fn test_successful_lookup_clears_previous_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.CSV");
        fs::write(&path, TRADE_CSV).unwrap();

        let mut state = AppState::default();
        state.open_report(&path);
        state.status_message = Some("Error: stale".into());
        state.select_category("참치".into());
        assert!(state.status_message.is_none());
        assert_eq!(state.lookup.as_ref().map(Table::len), Some(1));
    }

    #[test]
    fn test_opening_another_file_drops_previous_cache_entries() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("first.csv");
        let second = dir.path().join("second.csv");
        fs::write(&first, "v\n1\n").unwrap();
        fs::write(&second, "v\n2\n").unwrap();

        let mut state = AppState::default();
        state.open_explorer(&first);
        state.open_explorer(&second);
        assert_eq!(state.explorer_cache.len(), 1);
        assert!(state.explorer_cache.contains(&second));
        assert!(!state.explorer_cache.contains(&first));
    }

    #[test]
    fn test_failed_open_sets_status_and_recovers_on_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.CSV");
        fs::write(&path, "a,b\n1,2\n").unwrap();

        let mut state = AppState::default();
        state.open_report(&path);
        assert!(state.report.is_none());
        assert!(state.status_message.is_some());

        fs::write(&path, TRADE_CSV).unwrap();
        state.reload();
        assert!(state.report.is_some());
        assert!(state.status_message.is_none());
    }

    #[test]
    fn test_explorer_picks_first_numeric_column() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("income.csv");
        fs::write(&path, "구분,인원,금액\n상위,3,900\n하위,5,100\n").unwrap();

        let mut state = AppState::default();
        state.open_explorer(&path);
        let explorer = state.explorer.as_ref().expect("explorer");
        assert_eq!(explorer.numeric_columns, vec!["인원", "금액"]);
        assert_eq!(explorer.selected.as_deref(), Some("인원"));
        assert_eq!(explorer.histogram.as_ref().map(Histogram::total), Some(2));
    }

    #[test]
    fn test_draw_lotto_records_draw() {
        let mut state = AppState::default();
        state.draw_lotto();
        assert!(state.last_draw.is_some());
    }
}
