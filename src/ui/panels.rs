use std::path::{Path, PathBuf};

use anyhow::Context;
use eframe::egui::{self, Color32, RichText, Ui};

use crate::charts::ChartDescriptor;
use crate::selection::{MENU, SelectionKey};
use crate::state::AppState;

/// Actions requested by the panels; the app applies them after drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelAction {
    None,
    Select(SelectionKey),
    ExportChart,
    Refresh,
    ToggleCrimePercentage,
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(
    ui: &mut Ui,
    data_path: &Path,
    rows: usize,
    status_message: Option<&str>,
) -> PanelAction {
    let mut action = PanelAction::None;

    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Export chart as JSON…").clicked() {
                action = PanelAction::ExportChart;
                ui.close_menu();
            }
        });

        ui.menu_button("View", |ui: &mut Ui| {
            if ui.button("Redraw chart").clicked() {
                action = PanelAction::Refresh;
                ui.close_menu();
            }
            if ui.button("Crime percentage vs inflation").clicked() {
                action = PanelAction::ToggleCrimePercentage;
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!("{} rows loaded from {}", rows, data_path.display()));

        if let Some(msg) = status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });

    action
}

// ---------------------------------------------------------------------------
// Selector
// ---------------------------------------------------------------------------

/// Heading and the visualization dropdown.
pub fn selector(ui: &mut Ui, state: &AppState) -> PanelAction {
    let mut action = PanelAction::None;

    ui.heading("Crime and Inflation Dashboard");
    ui.add_space(4.0);
    ui.strong("Select Visualization:");

    egui::ComboBox::from_id_salt("visualization-dropdown")
        .width(ui.available_width().min(420.0))
        .selected_text(state.selected.label())
        .show_ui(ui, |ui: &mut Ui| {
            for entry in &MENU {
                if ui
                    .selectable_label(state.selected == entry.key, entry.label)
                    .clicked()
                    && state.selected != entry.key
                {
                    action = PanelAction::Select(entry.key);
                }
            }
        });

    action
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Ask for a destination and write the chart as JSON.
///
/// Returns `Ok(None)` when the dialog is cancelled.
pub fn export_chart_dialog(chart: &ChartDescriptor) -> anyhow::Result<Option<PathBuf>> {
    let file = rfd::FileDialog::new()
        .set_title("Export chart")
        .set_file_name(format!("{}.json", chart.title))
        .add_filter("JSON", &["json"])
        .save_file();

    let Some(path) = file else {
        return Ok(None);
    };

    let json = chart.to_json().context("serializing chart")?;
    std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Exported '{}' to {}", chart.title, path.display());
    Ok(Some(path))
}
