use super::error::PipelineError;
use super::model::Table;

// ---------------------------------------------------------------------------
// Column explorer: numeric columns and their distribution
// ---------------------------------------------------------------------------

/// Equal-width histogram of one column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Histogram {
    pub min: f64,
    /// Width of every bin (0 when all values are equal).
    pub bin_width: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Centre of bin `i`, for plotting.
    pub fn bin_center(&self, i: usize) -> f64 {
        self.min + self.bin_width * (i as f64 + 0.5)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Names of the numeric columns, in header order.
pub fn numeric_columns(table: &Table) -> Vec<String> {
    table
        .columns()
        .iter()
        .enumerate()
        .filter(|(idx, _)| table.is_numeric_column(*idx))
        .map(|(_, name)| name.clone())
        .collect()
}

/// Bin the non-null values of `column` into `bins` equal-width buckets.
pub fn histogram(table: &Table, column: &str, bins: usize) -> Result<Histogram, PipelineError> {
    let idx = table.require_numeric(column)?;
    let values: Vec<f64> = table
        .numeric_values(idx)
        .flatten()
        .filter(|v| v.is_finite())
        .collect();

    if values.is_empty() || bins == 0 {
        return Ok(Histogram::default());
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if range.abs() < f64::EPSILON {
        return Ok(Histogram {
            min,
            bin_width: 0.0,
            counts: vec![values.len()],
        });
    }

    let bin_width = range / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in values {
        // the maximum lands on the right edge of the last bin
        let bin = (((v - min) / bin_width) as usize).min(bins - 1);
        counts[bin] += 1;
    }

    Ok(Histogram {
        min,
        bin_width,
        counts,
    })
}
