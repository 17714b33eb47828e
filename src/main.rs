mod app;
mod charts;
mod color;
mod config;
mod data;
mod error;
mod selection;
mod state;
mod ui;

use std::path::Path;

use anyhow::Context;
use app::CrimeDashApp;
use data::model::Table;
use eframe::egui;

/// Load the table the dashboard starts with; a failure is logged before it is returned.
fn load_startup_table(data_path: &Path) -> anyhow::Result<Table> {
    data::loader::load_table(data_path)
        .inspect_err(|e| log::error!("Failed to load {}: {e}", data_path.display()))
        .with_context(|| format!("starting with data file {}", data_path.display()))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let data_path = config::data_path();
    let table = load_startup_table(&data_path)?;

    let initial = config::initial_selection();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        config::WINDOW_TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(CrimeDashApp::new(table, data_path, initial)))),
    )
    .map_err(|e| anyhow::anyhow!("running the dashboard: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashboardError;

    #[test]
    fn startup_load_failure_names_the_file() {
        let path = Path::new("/definitely/not/here/output.csv");
        let err = load_startup_table(path).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here/output.csv"));
        assert!(matches!(
            err.downcast_ref::<DashboardError>(),
            Some(DashboardError::DataLoad { .. })
        ));
    }
}
