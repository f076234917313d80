use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Column mapping: logical trade fields → CSV header names
// ---------------------------------------------------------------------------

/// Header names of the trade fields. Defaults follow the monthly fisheries
/// trade export published by the Korean customs service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub direction: String,
    pub category: String,
    pub weight: String,
    pub amount: String,
    /// Name of the derived `amount / weight` column.
    pub unit_price: String,
    /// Name of the display column added by drill-down lookups.
    pub unit_price_display: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            direction: "수출입구분명".to_string(),
            category: "수산물수출입품목명".to_string(),
            weight: "당월수출입중량(킬로그램)".to_string(),
            amount: "당월수출입미화금액(달러)".to_string(),
            unit_price: "단가".to_string(),
            unit_price_display: "단가_표기".to_string(),
        }
    }
}

impl ColumnMap {
    /// Columns a source file must carry to be accepted by the loader.
    pub fn required(&self) -> [&str; 4] {
        [
            self.direction.as_str(),
            self.category.as_str(),
            self.weight.as_str(),
            self.amount.as_str(),
        ]
    }
}

// ---------------------------------------------------------------------------
// Trade direction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Export,
    Import,
}

/// Cell values recognised as each direction. Anything else is neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionLabels {
    pub export: Vec<String>,
    pub import: Vec<String>,
}

impl Default for DirectionLabels {
    fn default() -> Self {
        Self {
            export: vec!["수출".to_string(), "export".to_string()],
            import: vec!["수입".to_string(), "import".to_string()],
        }
    }
}

impl DirectionLabels {
    pub fn classify(&self, raw: &str) -> Option<Direction> {
        let raw = raw.trim();
        if self.export.iter().any(|l| l == raw) {
            Some(Direction::Export)
        } else if self.import.iter().any(|l| l == raw) {
            Some(Direction::Import)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_defaults() {
        let labels = DirectionLabels::default();
        assert_eq!(labels.classify("수출"), Some(Direction::Export));
        assert_eq!(labels.classify(" import "), Some(Direction::Import));
        assert_eq!(labels.classify("transit"), None);
        assert_eq!(labels.classify("EXPORT"), None);
    }

    #[test]
    fn test_partial_column_map_keeps_defaults() {
        let map: ColumnMap = serde_json::from_str(r#"{"weight": "weight_kg"}"#).unwrap();
        assert_eq!(map.weight, "weight_kg");
        assert_eq!(map.amount, ColumnMap::default().amount);
    }
}
