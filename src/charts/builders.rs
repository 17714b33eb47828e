//! Chart builders.
//!
//! Each builder reads columns from the [`Table`] and returns a fresh
//! [`ChartDescriptor`]; none of them mutate the table.

use super::descriptor::{BarEntry, Bin, ChartDescriptor, ChartKind, Segment};
use crate::color::bar_color;
use crate::data::model::{CRIME_PERCENTAGE_COLUMN, CellValue, Table};
use crate::data::stats::CorrelationVector;
use crate::error::Result;

pub const CORRELATION_TITLE: &str = "Correlations between CPI and Crime Types";

/// `(x, y)` pairs in row order, skipping rows where either side is null.
fn paired_points(table: &Table, x_col: &str, y_col: &str) -> Result<Vec<[f64; 2]>> {
    let xs = table.numeric(x_col)?;
    let ys = table.numeric(y_col)?;
    Ok(xs
        .into_iter()
        .zip(ys)
        .filter_map(|(x, y)| Some([x?, y?]))
        .collect())
}

fn column_min(values: &[Option<f64>]) -> Option<f64> {
    values.iter().flatten().copied().reduce(f64::min)
}

fn column_max(values: &[Option<f64>]) -> Option<f64> {
    values.iter().flatten().copied().reduce(f64::max)
}

/// Line points for `y_col` against `x_col`, plus tick labels when `x_col`
/// holds free text. Text columns are placed by row index and every row
/// gets a label, so `labels[x]` names the point at `x`.
fn line_points(
    table: &Table,
    x_col: &str,
    y_col: &str,
) -> Result<(Vec<[f64; 2]>, Vec<String>)> {
    let x = table.column(x_col)?;
    if !x.has_text() {
        return Ok((paired_points(table, x_col, y_col)?, Vec::new()));
    }

    let ys = table.numeric(y_col)?;
    let points = x
        .cells
        .iter()
        .zip(&ys)
        .enumerate()
        .filter(|(_, (cell, _))| **cell != CellValue::Null)
        .filter_map(|(row, (_, y))| Some([row as f64, (*y)?]))
        .collect();
    let labels = x
        .cells
        .iter()
        .map(|cell| match cell {
            CellValue::Null => String::new(),
            other => other.to_string(),
        })
        .collect();
    Ok((points, labels))
}

/// Single line series of `y_col` against `x_col` in table row order.
pub fn line(
    table: &Table,
    x_col: &str,
    y_col: &str,
    title: &str,
    x_label: &str,
    y_label: &str,
) -> Result<ChartDescriptor> {
    let (points, x_categories) = line_points(table, x_col, y_col)?;
    Ok(ChartDescriptor {
        title: title.to_string(),
        x_label: x_label.to_string(),
        y_label: y_label.to_string(),
        kind: ChartKind::Line {
            points,
            x_categories,
        },
    })
}

/// Frequency distribution of one column using [`auto_bins`].
pub fn histogram(
    table: &Table,
    col: &str,
    title: &str,
    x_label: &str,
    y_label: &str,
) -> Result<ChartDescriptor> {
    let values: Vec<f64> = table.numeric(col)?.into_iter().flatten().collect();
    let bins = auto_bins(&values);
    Ok(ChartDescriptor {
        title: title.to_string(),
        x_label: x_label.to_string(),
        y_label: y_label.to_string(),
        kind: ChartKind::Histogram { values, bins },
    })
}

/// Equal-width bins over `[min, max]`, count chosen by Sturges' rule.
///
/// A constant input yields a single unit-wide bin centred on the value.
pub fn auto_bins(values: &[f64]) -> Vec<Bin> {
    let (Some(min), Some(max)) = (
        values.iter().copied().reduce(f64::min),
        values.iter().copied().reduce(f64::max),
    ) else {
        return Vec::new();
    };

    if max == min {
        return vec![Bin {
            start: min - 0.5,
            end: min + 0.5,
            count: values.len(),
        }];
    }

    let n_bins = (values.len() as f64).log2().ceil() as usize + 1;
    let width = (max - min) / n_bins as f64;

    let mut bins: Vec<Bin> = (0..n_bins)
        .map(|i| Bin {
            start: min + i as f64 * width,
            end: if i + 1 == n_bins {
                max
            } else {
                min + (i + 1) as f64 * width
            },
            count: 0,
        })
        .collect();

    for v in values {
        let idx = (((v - min) / width).floor() as usize).min(n_bins - 1);
        bins[idx].count += 1;
    }
    bins
}

/// Line of `y_col` sorted by `x_col`, with a flat floor at the minimum of
/// `y_col` spanning the full `x_col` range.
pub fn annotated_trend(
    table: &Table,
    x_col: &str,
    y_col: &str,
    title: &str,
    x_label: &str,
    y_label: &str,
) -> Result<ChartDescriptor> {
    let xs = table.numeric(x_col)?;
    let ys = table.numeric(y_col)?;

    let mut points: Vec<[f64; 2]> = xs
        .iter()
        .zip(&ys)
        .filter_map(|(x, y)| Some([(*x)?, (*y)?]))
        .collect();
    // Stable, so equal x values keep their row order.
    points.sort_by(|a, b| a[0].total_cmp(&b[0]));

    let floor = match (column_min(&xs), column_max(&xs), column_min(&ys)) {
        (Some(x0), Some(x1), Some(y)) => Some(Segment { x0, x1, y }),
        _ => None,
    };

    Ok(ChartDescriptor {
        title: title.to_string(),
        x_label: x_label.to_string(),
        y_label: y_label.to_string(),
        kind: ChartKind::AnnotatedLine { points, floor },
    })
}

/// [`annotated_trend`] titled `"<y_col> Over <x_col>"`, axes named after the columns.
pub fn trend_against_cpi(table: &Table, x_col: &str, y_col: &str) -> Result<ChartDescriptor> {
    let title = format!("{y_col} Over {x_col}");
    annotated_trend(table, x_col, y_col, &title, x_col, y_col)
}

/// Crime percentage against CPI, shown outside the dropdown.
pub fn crime_percentage_plot(table: &Table) -> Result<ChartDescriptor> {
    annotated_trend(
        table,
        "CPI",
        CRIME_PERCENTAGE_COLUMN,
        "Crime Percentage Over Inflation Rate",
        "Inflation Rate",
        "Crime Percentage",
    )
}

/// One bar per label, annotated with its value.
pub fn bar(values_by_label: &[(String, f64)], title: &str) -> ChartDescriptor {
    let bars = values_by_label
        .iter()
        .enumerate()
        .map(|(i, (label, value))| BarEntry {
            label: label.clone(),
            value: *value,
            text: value.to_string(),
            color: bar_color(i),
        })
        .collect();

    ChartDescriptor {
        title: title.to_string(),
        x_label: String::new(),
        y_label: String::new(),
        kind: ChartKind::Bar { bars },
    }
}

/// Bar chart of the correlation vector without the CPI self-correlation.
pub fn correlation_bar_chart(correlations: &CorrelationVector) -> ChartDescriptor {
    bar(correlations.crime_entries(), CORRELATION_TITLE)
}
