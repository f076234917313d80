use std::cmp::Ordering;
use std::path::Path;
use std::sync::Arc;

use super::cache::TableCache;
use super::error::PipelineError;
use super::format::format_usd;
use super::loader::{load_file, SourceEncoding};
use super::model::{CellValue, Table};
use super::schema::{ColumnMap, Direction, DirectionLabels};

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Export/import totals of a (derived) table.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TradeSummary {
    pub total_export: f64,
    pub total_import: f64,
    pub balance: f64,
    pub export_rows: usize,
    pub import_rows: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Descending,
    Ascending,
}

// ---------------------------------------------------------------------------
// ReportPipeline
// ---------------------------------------------------------------------------

/// Load → derive → {summarize, rank, lookup}.
///
/// Apart from the load cache every operation is a pure function of its
/// arguments and returns a fresh table.
pub struct ReportPipeline {
    pub columns: ColumnMap,
    pub directions: DirectionLabels,
    pub encodings: Vec<SourceEncoding>,
    cache: TableCache,
}

impl ReportPipeline {
    pub fn new(
        columns: ColumnMap,
        directions: DirectionLabels,
        encodings: Vec<SourceEncoding>,
    ) -> Self {
        Self {
            columns,
            directions,
            encodings,
            cache: TableCache::new(),
        }
    }

    /// Load the base table, served from the cache while the file is unchanged.
    pub fn load(&mut self, path: &Path) -> Result<Arc<Table>, PipelineError> {
        let encodings = &self.encodings;
        let required = self.columns.required();
        self.cache
            .get_or_load(path, |p| load_file(p, encodings, &required).map(|(t, _)| t))
    }

    /// Drop the cached table so the next `load` reads from disk.
    pub fn invalidate(&mut self, path: &Path) {
        self.cache.invalidate(path);
    }

    /// Forget cached tables of every other file.
    pub fn retain_cached(&mut self, path: &Path) {
        self.cache.retain_only(path);
    }

    /// Keep rows with a positive weight and append the unit price column.
    pub fn derive(&self, table: &Table) -> Result<Table, PipelineError> {
        let weight_idx = table.require_numeric(&self.columns.weight)?;
        let amount_idx = table.require_numeric(&self.columns.amount)?;

        let kept = table.filter(|row| row[weight_idx].as_f64().is_some_and(|w| w > 0.0));

        let prices = kept
            .rows()
            .iter()
            .map(|row| match (row[amount_idx].as_f64(), row[weight_idx].as_f64()) {
                (Some(amount), Some(weight)) => CellValue::Float(amount / weight),
                _ => CellValue::Null,
            })
            .collect();

        Ok(kept.with_column(&self.columns.unit_price, prices))
    }

    /// Rows of one trade direction, in original order.
    pub fn partition(&self, table: &Table, direction: Direction) -> Result<Table, PipelineError> {
        let dir_idx = table.require_column(&self.columns.direction)?;
        Ok(table.filter(|row| self.direction_of(&row[dir_idx]) == Some(direction)))
    }

    /// Totals per direction and the resulting trade balance.
    pub fn summarize(&self, table: &Table) -> Result<TradeSummary, PipelineError> {
        let dir_idx = table.require_column(&self.columns.direction)?;
        let amount_idx = table.require_numeric(&self.columns.amount)?;

        let mut summary = TradeSummary::default();
        for row in table.rows() {
            let amount = row[amount_idx].as_f64().unwrap_or(0.0);
            match self.direction_of(&row[dir_idx]) {
                Some(Direction::Export) => {
                    summary.total_export += amount;
                    summary.export_rows += 1;
                }
                Some(Direction::Import) => {
                    summary.total_import += amount;
                    summary.import_rows += 1;
                }
                None => {}
            }
        }
        summary.balance = summary.total_export - summary.total_import;
        Ok(summary)
    }

    /// Rows matching `category`, with a formatted unit price column for display.
    /// No match yields an empty table.
    pub fn lookup(&self, table: &Table, category: &str) -> Result<Table, PipelineError> {
        let cat_idx = table.require_column(&self.columns.category)?;
        let matched = table.filter(|row| cell_text(&row[cat_idx]).as_deref() == Some(category));

        let display = match matched.column_index(&self.columns.unit_price) {
            Some(price_idx) => matched
                .numeric_values(price_idx)
                .map(|v| match v {
                    Some(price) => CellValue::String(format_usd(price, 2)),
                    None => CellValue::Null,
                })
                .collect(),
            None => vec![CellValue::Null; matched.len()],
        };

        Ok(matched.with_column(&self.columns.unit_price_display, display))
    }

    /// Distinct category names, sorted, for the drill-down selector.
    pub fn categories(&self, table: &Table) -> Result<Vec<String>, PipelineError> {
        let cat_idx = table.require_column(&self.columns.category)?;
        Ok(table
            .unique_values(cat_idx)
            .iter()
            .filter_map(cell_text)
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect())
    }

    fn direction_of(&self, cell: &CellValue) -> Option<Direction> {
        cell.as_str().and_then(|s| self.directions.classify(s))
    }
}

/// Top-`n` rows by the numeric column `by`.
///
/// The sort is stable, so ties keep their original order. Null keys sort
/// after every number in both orders.
pub fn rank(table: &Table, by: &str, n: usize, order: SortOrder) -> Result<Table, PipelineError> {
    let idx = table.require_numeric(by)?;
    let keys: Vec<Option<f64>> = table.numeric_values(idx).collect();

    let mut indices: Vec<usize> = (0..table.len()).collect();
    indices.sort_by(|&a, &b| match (keys[a], keys[b]) {
        (Some(x), Some(y)) => match order {
            SortOrder::Descending => y.total_cmp(&x),
            SortOrder::Ascending => x.total_cmp(&y),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    indices.truncate(n);

    Ok(table.select(indices))
}

/// Category cells are usually text, but item codes may parse as numbers.
fn cell_text(cell: &CellValue) -> Option<String> {
    match cell {
        CellValue::Null => None,
        CellValue::String(s) => Some(s.clone()),
        CellValue::Integer(i) => Some(i.to_string()),
        CellValue::Float(f) => Some(f.to_string()),
        CellValue::Bool(b) => Some(b.to_string()),
    }
}
