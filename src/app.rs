use std::path::PathBuf;

use eframe::egui;

use crate::charts::builders::crime_percentage_plot;
use crate::data::model::Table;
use crate::selection::SelectionKey;
use crate::state::{AppState, Event, View, render};
use crate::ui::panels::{self, PanelAction};
use crate::ui::plot;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CrimeDashApp {
    table: Table,
    data_path: PathBuf,
    state: AppState,
    /// Standalone crime percentage chart, `Some` while its window is open.
    crime_percentage: Option<View>,
    /// Status / error message shown in the top bar.
    status_message: Option<String>,
}

impl CrimeDashApp {
    pub fn new(table: Table, data_path: PathBuf, initial: SelectionKey) -> Self {
        let state = AppState::starting_at(&table, initial);
        Self {
            table,
            data_path,
            state,
            crime_percentage: None,
            status_message: None,
        }
    }

    fn apply(&mut self, action: PanelAction) {
        match action {
            PanelAction::None => {}
            PanelAction::Select(key) => {
                self.state = render(&self.table, &self.state, Event::Select(key));
            }
            PanelAction::Refresh => {
                self.state = render(&self.table, &self.state, Event::Refresh);
            }
            PanelAction::ExportChart => self.export_chart(),
            PanelAction::ToggleCrimePercentage => {
                self.crime_percentage = match self.crime_percentage {
                    Some(_) => None,
                    None => Some(match crime_percentage_plot(&self.table) {
                        Ok(chart) => View::Chart {
                            chart,
                            correlations: None,
                        },
                        Err(e) => {
                            log::error!("Failed to render crime percentage chart: {e}");
                            View::Failure(format!("Error: {e}"))
                        }
                    }),
                };
            }
        }
    }

    fn export_chart(&mut self) {
        let Some(chart) = self.state.chart() else {
            self.status_message = Some("Nothing to export".to_string());
            return;
        };
        match panels::export_chart_dialog(chart) {
            Ok(Some(_)) => self.status_message = None,
            Ok(None) => {}
            Err(e) => {
                log::error!("Failed to export chart: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

impl eframe::App for CrimeDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut action = PanelAction::None;

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            action = panels::top_bar(
                ui,
                &self.data_path,
                self.table.height(),
                self.status_message.as_deref(),
            );
        });

        // ---- Selector below the menu ----
        egui::TopBottomPanel::top("selector").show(ctx, |ui| {
            let selected = panels::selector(ui, &self.state);
            if selected != PanelAction::None {
                action = selected;
            }
        });

        // ---- Central panel: chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let height = ui.available_height();
            plot::chart_region(ui, "visualization-output", &self.state.view, height);
        });

        // ---- Standalone window ----
        if let Some(view) = &self.crime_percentage {
            let mut open = true;
            egui::Window::new("Crime Percentage against Inflation Rate")
                .open(&mut open)
                .default_size([640.0, 420.0])
                .show(ctx, |ui| {
                    plot::chart_region(ui, "crime-percentage", view, 360.0);
                });
            if !open {
                self.crime_percentage = None;
            }
        }

        self.apply(action);
    }
}
