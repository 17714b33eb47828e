use serde::Serialize;

use super::model::Table;
use crate::error::Result;

/// Columns correlated against CPI, in display order. CPI itself comes first.
pub const CORRELATION_COLUMNS: [&str; 10] = [
    "CPI",
    "Violent",
    "Property",
    "Murder",
    "Rape",
    "Robbery",
    "assault",
    "Burglary",
    "Larceny theft",
    "Vehicle theft",
];

/// Correlation of each column in [`CORRELATION_COLUMNS`] against CPI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationVector {
    entries: Vec<(String, f64)>,
}

impl CorrelationVector {
    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }

    /// Entries without the leading CPI self-correlation.
    pub fn crime_entries(&self) -> &[(String, f64)] {
        self.entries.get(1..).unwrap_or(&[])
    }
}

/// Round to 4 decimal places, ties to even (as pandas does).
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round_ties_even() / 10_000.0
}

/// Pearson correlation over the rows where both sides are present.
///
/// Returns NaN with fewer than two complete rows or zero variance.
pub fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();

    let n = pairs.len();
    if n < 2 {
        return f64::NAN;
    }

    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n as f64;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n as f64;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        return f64::NAN;
    }
    // Floating point error can push |r| slightly past 1.
    (cov / denom).clamp(-1.0, 1.0)
}

/// Correlate CPI against every crime column, rounded to 4 decimals.
///
/// Recomputed on every call.
pub fn cpi_correlations(table: &Table) -> Result<CorrelationVector> {
    let columns = CORRELATION_COLUMNS
        .iter()
        .map(|name| Ok((*name, table.numeric(name)?)))
        .collect::<Result<Vec<_>>>()?;

    let cpi = &columns[0].1;
    let entries = columns
        .iter()
        .map(|(name, values)| (name.to_string(), round4(pearson(cpi, values))))
        .collect();

    Ok(CorrelationVector { entries })
}
