use std::path::PathBuf;

use thiserror::Error;

/// Every failure the dashboard can report.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DashboardError {
    /// The data file is missing, unreadable or malformed.
    #[error("failed to load {}: {reason}", path.display())]
    DataLoad { path: PathBuf, reason: String },

    /// A required column is absent or does not hold numbers.
    #[error("invalid column '{column}': {reason}")]
    InvalidColumn { column: String, reason: String },

    /// The selection key is not part of the menu.
    #[error("unknown selection '{0}'")]
    UnknownSelection(String),
}

impl DashboardError {
    pub fn missing_column(column: &str) -> Self {
        DashboardError::InvalidColumn {
            column: column.to_string(),
            reason: "column not found".to_string(),
        }
    }

    pub fn non_numeric_column(column: &str, cell: &str) -> Self {
        DashboardError::InvalidColumn {
            column: column.to_string(),
            reason: format!("expected numbers, found '{cell}'"),
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
