use std::path::PathBuf;

use crate::selection::SelectionKey;

/// Data file read when nothing else is configured.
pub const DEFAULT_DATA_PATH: &str = "./output.csv";

/// Environment variable overriding [`DEFAULT_DATA_PATH`].
pub const DATA_PATH_ENV: &str = "CRIME_DASH_DATA";

/// Environment variable choosing the chart shown at start-up, e.g. `Violent_CPI`.
pub const SELECTION_ENV: &str = "CRIME_DASH_SELECTION";

pub const WINDOW_TITLE: &str = "Crime and Inflation Dashboard";

/// Resolve the data file path from an optional override.
pub fn data_path_from(override_value: Option<String>) -> PathBuf {
    override_value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH))
}

/// The data file path: `$CRIME_DASH_DATA` or `./output.csv`.
pub fn data_path() -> PathBuf {
    data_path_from(std::env::var(DATA_PATH_ENV).ok())
}

/// Resolve the start-up selection; an unknown key falls back to the first entry.
pub fn selection_from(override_value: Option<String>) -> SelectionKey {
    let Some(id) = override_value else {
        return SelectionKey::first();
    };
    SelectionKey::from_key(id.trim()).unwrap_or_else(|e| {
        log::warn!("Ignoring ${SELECTION_ENV}: {e}");
        SelectionKey::first()
    })
}

pub fn initial_selection() -> SelectionKey {
    selection_from(std::env::var(SELECTION_ENV).ok())
}
