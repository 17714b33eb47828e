use std::fmt;

use crate::error::{DashboardError, Result};

/// Columns every chart and the correlation calculator rely on.
pub const NUMERIC_COLUMNS: [&str; 11] = [
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
    "Total",
];

pub const DATE_COLUMN: &str = "Date";

/// Only used by the standalone crime percentage chart; not required at load.
pub const CRIME_PERCENTAGE_COLUMN: &str = "CrimePercentage";

/// Cell texts read as missing values, matching the pandas CSV defaults.
pub const NA_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the dtypes a pandas export produces.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Integer(i64),
    Float(f64),
    /// Date kept as text; see [`fractional_year`].
    Date(String),
    Text(String),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Date(d) => write!(f, "{d}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Guess the type of a raw text cell.
    ///
    /// Order matters: `2020` is an integer, not a date.
    pub fn guess(s: &str) -> CellValue {
        let s = s.trim();
        if NA_TOKENS.contains(&s) {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        if fractional_year(s).is_some() {
            return CellValue::Date(s.to_string());
        }
        CellValue::Text(s.to_string())
    }

    /// Numeric value used on a plot axis. Dates map to fractional years.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Float(v) if v.is_nan() => None,
            CellValue::Float(v) => Some(*v),
            CellValue::Date(d) => fractional_year(d),
            CellValue::Text(_) | CellValue::Null => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, CellValue::Text(_))
    }
}

/// Parse `YYYY`, `YYYY-MM`, `YYYY-MM-DD` (`/` also accepted) or `MM/DD/YYYY`
/// into `year + (month - 1) / 12 + (day - 1) / 365.25`.
///
/// A trailing time part (`2020-01-01T00:00:00`, `2020-01-01 00:00:00`) is ignored.
pub fn fractional_year(s: &str) -> Option<f64> {
    let date = s.split(['T', ' ']).next()?;
    let parts: Vec<&str> = date.split(['-', '/']).collect();

    let (year, month, day) = match parts.as_slice() {
        &[y] if y.len() == 4 => (y, "1", "1"),
        &[y, m] if y.len() == 4 => (y, m, "1"),
        &[y, m, d] if y.len() == 4 => (y, m, d),
        &[m, d, y] if y.len() == 4 && m.len() <= 2 && date.contains('/') => (y, m, d),
        _ => return None,
    };
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    let day: u32 = day.parse().ok()?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }

    Some(year as f64 + (month - 1) as f64 / 12.0 + (day - 1) as f64 / 365.25)
}

// ---------------------------------------------------------------------------
// Column / Table
// ---------------------------------------------------------------------------

/// One named column of the table.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    /// True when any cell is free text, so the column cannot sit on a numeric axis.
    pub fn has_text(&self) -> bool {
        self.cells.iter().any(CellValue::is_text)
    }

    /// Cells as numbers, `None` for nulls. Fails on the first text cell.
    pub fn numeric(&self) -> Result<Vec<Option<f64>>> {
        self.cells
            .iter()
            .map(|cell| {
                if cell.is_text() {
                    Err(DashboardError::non_numeric_column(
                        &self.name,
                        &cell.to_string(),
                    ))
                } else {
                    Ok(cell.as_f64())
                }
            })
            .collect()
    }
}

/// The loaded crime/CPI table. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    height: usize,
}

impl Table {
    /// Build a table from equally long columns.
    pub fn from_columns(columns: Vec<Column>) -> anyhow::Result<Self> {
        let height = columns.first().map(|c| c.cells.len()).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.cells.len() != height) {
            anyhow::bail!(
                "column '{}' has {} rows, expected {height}",
                bad.name,
                bad.cells.len()
            );
        }
        Ok(Self { columns, height })
    }

    /// Build a table from a header and row-major records.
    pub fn from_rows(headers: &[String], rows: Vec<Vec<CellValue>>) -> anyhow::Result<Self> {
        let mut columns: Vec<Column> = headers
            .iter()
            .map(|h| Column::new(h.clone(), Vec::with_capacity(rows.len())))
            .collect();

        for (row_no, row) in rows.into_iter().enumerate() {
            if row.len() != columns.len() {
                anyhow::bail!(
                    "row {row_no} has {} fields but the header has {}",
                    row.len(),
                    columns.len()
                );
            }
            for (col, cell) in columns.iter_mut().zip(row) {
                col.cells.push(cell);
            }
        }
        Self::from_columns(columns)
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| DashboardError::missing_column(name))
    }

    /// Shorthand for `column(name)?.numeric()`.
    pub fn numeric(&self, name: &str) -> Result<Vec<Option<f64>>> {
        self.column(name)?.numeric()
    }

    /// Check that every required column is present and usable.
    ///
    /// `Date` only has to exist; text dates are plotted as categories.
    pub fn validate(&self) -> Result<()> {
        for name in NUMERIC_COLUMNS {
            self.numeric(name)?;
        }
        self.column(DATE_COLUMN)?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A small, valid table shared by tests across the crate.
    pub(crate) fn sample_table() -> Table {
        let dates = [2016, 2017, 2018, 2019, 2020];
        let cpi = [240.0, 245.1, 251.1, 255.7, 258.8];
        let mut columns = vec![
            Column::new(
                DATE_COLUMN,
                dates.iter().map(|&d| CellValue::Integer(d)).collect(),
            ),
            Column::new("CPI", cpi.iter().map(|&v| CellValue::Float(v)).collect()),
        ];
        for (k, name) in NUMERIC_COLUMNS.iter().enumerate().skip(1) {
            let cells = (0..dates.len())
                .map(|i| {
                    // Alternate rising and falling series so correlations differ.
                    let v = if k % 2 == 0 {
                        100 + 10 * k as i64 + 3 * i as i64
                    } else {
                        500 - 7 * i as i64 + (i as i64 % 2) * k as i64
                    };
                    CellValue::Integer(v)
                })
                .collect();
            columns.push(Column::new(*name, cells));
        }
        Table::from_columns(columns).unwrap()
    }

    #[test]
    fn guess_prefers_numbers_over_dates() {
        assert_eq!(CellValue::guess("2020"), CellValue::Integer(2020));
        assert_eq!(CellValue::guess("3.5"), CellValue::Float(3.5));
        assert_eq!(
            CellValue::guess("2020-07-01"),
            CellValue::Date("2020-07-01".into())
        );
        assert_eq!(CellValue::guess(""), CellValue::Null);
        assert_eq!(CellValue::guess("abc"), CellValue::Text("abc".into()));
    }

    #[test]
    fn missing_value_tokens_are_null() {
        for token in ["NA", "N/A", "n/a", "NULL", "null", "None", "#N/A", "-NaN", "<NA>", " NA "] {
            assert_eq!(CellValue::guess(token), CellValue::Null, "{token:?}");
        }
        assert_eq!(CellValue::guess("none"), CellValue::Text("none".into()));
    }

    #[test]
    fn fractional_year_handles_partial_dates() {
        assert_eq!(fractional_year("2020"), Some(2020.0));
        assert_eq!(fractional_year("2020-07"), Some(2020.5));
        assert_eq!(fractional_year("2021/01/01"), Some(2021.0));
        assert_eq!(fractional_year("2020-01-01T00:00:00"), Some(2020.0));
        assert_eq!(fractional_year("07/01/2020"), Some(2020.5));
        assert_eq!(fractional_year("01/15/2020"), Some(2020.0 + 14.0 / 365.25));
        assert_eq!(fractional_year("2020-13-01"), None);
        assert_eq!(fractional_year("20-01-01"), None);
        assert_eq!(fractional_year("01-15-2020"), None);
        assert_eq!(fractional_year("Jan 2020"), None);
    }

    #[test]
    fn sample_table_is_valid() {
        let table = sample_table();
        assert_eq!(table.height(), 5);
        assert!(table.validate().is_ok());
    }

    #[test]
    fn missing_murder_column_is_invalid() {
        let table = sample_table();
        let columns = table
            .columns
            .into_iter()
            .filter(|c| c.name != "Murder")
            .collect();
        let table = Table::from_columns(columns).unwrap();
        assert_eq!(
            table.validate(),
            Err(DashboardError::missing_column("Murder"))
        );
    }

    #[test]
    fn text_dates_are_valid() {
        let table = sample_table();
        let columns = table
            .columns
            .into_iter()
            .map(|c| {
                if c.name == DATE_COLUMN {
                    let cells = (0..c.cells.len())
                        .map(|i| CellValue::Text(format!("Q{} 2020", i + 1)))
                        .collect();
                    Column::new(DATE_COLUMN, cells)
                } else {
                    c
                }
            })
            .collect();
        let table = Table::from_columns(columns).unwrap();
        assert!(table.column(DATE_COLUMN).unwrap().has_text());
        assert!(table.validate().is_ok());
    }

    #[test]
    fn text_in_numeric_column_is_invalid() {
        let col = Column::new(
            "CPI",
            vec![CellValue::Float(1.0), CellValue::Text("n/a".into())],
        );
        assert!(matches!(
            col.numeric(),
            Err(DashboardError::InvalidColumn { .. })
        ));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let headers = vec!["a".to_string(), "b".to_string()];
        let rows = vec![vec![CellValue::Integer(1)]];
        assert!(Table::from_rows(&headers, rows).is_err());
    }
}
