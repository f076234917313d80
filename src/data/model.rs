use std::collections::BTreeSet;
use std::fmt;

use super::error::{PipelineError, SchemaProblem};

// ---------------------------------------------------------------------------
// CellValue – a single cell of a loaded table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value inferred from CSV text.
/// Using `BTreeSet` downstream so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.4}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

/// Cell texts read as missing values rather than strings.
const MISSING_TOKENS: [&str; 10] = [
    "NaN", "nan", "NA", "N/A", "n/a", "#N/A", "NULL", "null", "None", "-",
];

impl CellValue {
    /// Infer the cell type from raw CSV text.
    ///
    /// Missing-value tokens and non-finite numbers become `Null`.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || MISSING_TOKENS.contains(&s) {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return if f.is_finite() {
                CellValue::Float(f)
            } else {
                CellValue::Null
            };
        }
        if s == "true" || s == "false" {
            return CellValue::Bool(s == "true");
        }
        CellValue::String(s.to_string())
    }

    /// Try to interpret the value as an `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    fn is_numeric(&self) -> bool {
        matches!(self, CellValue::Integer(_) | CellValue::Float(_))
    }
}

// ---------------------------------------------------------------------------
// Table – an immutable, ordered set of rows sharing one header
// ---------------------------------------------------------------------------

/// A loaded (or derived) table. Every operation that "changes" a table
/// returns a new one, the receiver is never mutated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Build a table. Short rows are padded with `Null`, long rows truncated,
    /// so every row has exactly one cell per column.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Null);
                row
            })
            .collect();
        Table { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Index of `name`, or a schema error if the column is absent.
    pub fn require_column(&self, name: &str) -> Result<usize, PipelineError> {
        self.column_index(name)
            .ok_or_else(|| PipelineError::schema(name, SchemaProblem::Missing))
    }

    /// Index of `name`, which must exist and hold only numbers (or nulls).
    pub fn require_numeric(&self, name: &str) -> Result<usize, PipelineError> {
        let idx = self.require_column(name)?;
        if self.is_numeric_column(idx) {
            Ok(idx)
        } else {
            Err(PipelineError::schema(name, SchemaProblem::NotNumeric))
        }
    }

    /// A column is numeric when every non-null cell is an integer or float.
    pub fn is_numeric_column(&self, idx: usize) -> bool {
        self.rows
            .iter()
            .map(|row| &row[idx])
            .all(|v| v.is_null() || v.is_numeric())
    }

    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        &self.rows[row][col]
    }

    /// Numeric view of a column (`None` for nulls and non-numbers).
    pub fn numeric_values(&self, idx: usize) -> impl Iterator<Item = Option<f64>> + '_ {
        self.rows.iter().map(move |row| row[idx].as_f64())
    }

    /// New table holding the rows at `indices`, in the given order.
    pub fn select<I>(&self, indices: I) -> Table
    where
        I: IntoIterator<Item = usize>,
    {
        Table {
            columns: self.columns.clone(),
            rows: indices.into_iter().map(|i| self.rows[i].clone()).collect(),
        }
    }

    /// New table holding the rows for which `keep` returns true.
    pub fn filter<F>(&self, mut keep: F) -> Table
    where
        F: FnMut(&[CellValue]) -> bool,
    {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// New table with `name` appended (or replaced if it already exists).
    /// `values` must hold one cell per row.
    pub fn with_column(&self, name: &str, values: Vec<CellValue>) -> Table {
        debug_assert_eq!(values.len(), self.rows.len());
        let mut columns = self.columns.clone();
        let existing = self.column_index(name);
        if existing.is_none() {
            columns.push(name.to_string());
        }
        let rows = self
            .rows
            .iter()
            .zip(values)
            .map(|(row, value)| {
                let mut row = row.clone();
                match existing {
                    Some(idx) => row[idx] = value,
                    None => row.push(value),
                }
                row
            })
            .collect();
        Table { columns, rows }
    }

    /// First `n` rows.
    pub fn head(&self, n: usize) -> Table {
        self.select(0..n.min(self.len()))
    }

    /// Sorted set of distinct values in a column.
    pub fn unique_values(&self, idx: usize) -> BTreeSet<CellValue> {
        self.rows.iter().map(|row| row[idx].clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(
            vec!["name".into(), "qty".into()],
            vec![
                vec![CellValue::parse("a"), CellValue::parse("3")],
                vec![CellValue::parse("b"), CellValue::parse("")],
                vec![CellValue::parse("c"), CellValue::parse("1.5")],
            ],
        )
    }

    #[test]
    fn test_parse_infers_types() {
        assert_eq!(CellValue::parse("42"), CellValue::Integer(42));
        assert_eq!(CellValue::parse(" 2.5 "), CellValue::Float(2.5));
        assert_eq!(CellValue::parse(""), CellValue::Null);
        assert_eq!(CellValue::parse("true"), CellValue::Bool(true));
        assert_eq!(CellValue::parse("굴"), CellValue::String("굴".into()));
    }

    #[test]
    fn test_missing_tokens_and_non_finite_are_null() {
        for token in ["NaN", "nan", "NA", "N/A", "#N/A", "NULL", "null", "None", "inf", "-infinity"] {
            assert_eq!(CellValue::parse(token), CellValue::Null, "token {token}");
        }
        assert_eq!(CellValue::parse("-3"), CellValue::Integer(-3));

        let t = Table::new(
            vec!["w".into()],
            vec![vec![CellValue::parse("N/A")], vec![CellValue::parse("2")]],
        );
        assert!(t.require_numeric("w").is_ok());
    }

    #[test]
    fn test_numeric_column_ignores_nulls() {
        let t = sample();
        assert!(t.require_numeric("qty").is_ok());
        assert!(matches!(
            t.require_numeric("name"),
            Err(PipelineError::Schema { problem: SchemaProblem::NotNumeric, .. })
        ));
        assert!(matches!(
            t.require_column("missing"),
            Err(PipelineError::Schema { problem: SchemaProblem::Missing, .. })
        ));
    }

    #[test]
    fn test_views_leave_base_intact() {
        let t = sample();
        let picked = t.select([2, 0]);
        assert_eq!(picked.cell(0, 0), &CellValue::String("c".into()));
        assert_eq!(picked.cell(1, 0), &CellValue::String("a".into()));

        let extended = t.with_column("flag", vec![CellValue::Bool(true); 3]);
        assert_eq!(extended.columns().len(), 3);
        assert_eq!(t.columns().len(), 2);
        assert_eq!(t.head(10).len(), 3);
        assert_eq!(t.head(1).len(), 1);
    }

    #[test]
    fn test_new_pads_short_rows() {
        let t = Table::new(
            vec!["a".into(), "b".into()],
            vec![vec![CellValue::Integer(1)]],
        );
        assert_eq!(t.cell(0, 1), &CellValue::Null);
    }
}
