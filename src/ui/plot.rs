use std::ops::RangeInclusive;

use eframe::egui::{Align2, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, GridMark, Line, Plot, PlotPoint, PlotPoints, Text};

use crate::charts::descriptor::{BarEntry, Bin, Segment};
use crate::charts::{ChartDescriptor, ChartKind};
use crate::color::{floor_color, to_color32};
use crate::data::stats::CorrelationVector;
use crate::state::View;

const SERIES_COLOR: Color32 = Color32::from_rgb(99, 110, 250);

// ---------------------------------------------------------------------------
// Chart region (central panel)
// ---------------------------------------------------------------------------

/// Render a view using at most `height` points of vertical space.
pub fn chart_region(ui: &mut Ui, id: &str, view: &View, height: f32) {
    match view {
        View::Failure(msg) => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.label(RichText::new(msg).color(Color32::RED).heading());
            });
        }
        View::Chart {
            chart,
            correlations,
        } => {
            let plot_height = if correlations.is_some() {
                height * 0.7
            } else {
                height
            };
            chart_plot(ui, id, chart, plot_height);
            if let Some(corr) = correlations {
                ui.separator();
                correlation_table(ui, corr);
            }
        }
    }
}

/// Draw one chart descriptor with egui_plot.
pub fn chart_plot(ui: &mut Ui, id: &str, chart: &ChartDescriptor, height: f32) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(&chart.title);
    });

    let plot = Plot::new(id)
        .height(height)
        .legend(egui_plot::Legend::default())
        .x_axis_label(chart.x_label.as_str())
        .y_axis_label(chart.y_label.as_str())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);

    match &chart.kind {
        ChartKind::Line {
            points,
            x_categories,
        } => {
            let plot = if x_categories.is_empty() {
                plot
            } else {
                plot.x_axis_formatter(category_formatter(x_categories.clone()))
            };
            plot.show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from(points.clone()))
                        .name(&chart.y_label)
                        .color(SERIES_COLOR)
                        .width(2.0),
                );
            });
        }
        ChartKind::AnnotatedLine { points, floor } => {
            plot.show(ui, |plot_ui| {
                if let Some(Segment { x0, x1, y }) = *floor {
                    plot_ui.line(
                        Line::new(PlotPoints::from(vec![[x0, y], [x1, y]]))
                            .name("Minimum")
                            .color(floor_color())
                            .width(2.0),
                    );
                }
                plot_ui.line(
                    Line::new(PlotPoints::from(points.clone()))
                        .name(&chart.y_label)
                        .color(SERIES_COLOR)
                        .width(2.0),
                );
            });
        }
        ChartKind::Histogram { bins, .. } => {
            plot.show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(histogram_bars(bins)).name(&chart.x_label));
            });
        }
        ChartKind::Bar { bars } => {
            let labels: Vec<String> = bars.iter().map(|b| b.label.clone()).collect();
            plot.x_axis_formatter(category_formatter(labels))
                .show(ui, |plot_ui| {
                    plot_ui.bar_chart(BarChart::new(category_bars(bars)));
                    for (i, entry) in bars.iter().enumerate() {
                        plot_ui.text(bar_annotation(i, entry));
                    }
                });
        }
    }
}

/// Axis formatter naming integer positions after `labels`; other ticks stay blank.
fn category_formatter(
    labels: Vec<String>,
) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String + 'static {
    move |mark, _range| {
        let idx = mark.value.round();
        if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }
}

fn histogram_bars(bins: &[Bin]) -> Vec<Bar> {
    bins.iter()
        .map(|bin| {
            Bar::new(bin.center(), bin.count as f64)
                .width(bin.width())
                .fill(SERIES_COLOR)
                .name(format!("{:.2} – {:.2}", bin.start, bin.end))
        })
        .collect()
}

fn category_bars(entries: &[BarEntry]) -> Vec<Bar> {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            Bar::new(i as f64, entry.value)
                .width(0.7)
                .fill(to_color32(entry.color))
                .name(&entry.label)
        })
        .collect()
}

/// Value text placed at the end of the bar, inside the plot.
fn bar_annotation(index: usize, entry: &BarEntry) -> Text {
    let anchor = if entry.value >= 0.0 {
        Align2::CENTER_BOTTOM
    } else {
        Align2::CENTER_TOP
    };
    Text::new(
        PlotPoint::new(index as f64, entry.value),
        RichText::new(&entry.text).strong(),
    )
    .anchor(anchor)
}

// ---------------------------------------------------------------------------
// Correlation table
// ---------------------------------------------------------------------------

fn correlation_table(ui: &mut Ui, correlations: &CorrelationVector) {
    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(140.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Column");
            });
            header.col(|ui| {
                ui.strong("Correlation with CPI");
            });
        })
        .body(|mut body| {
            for (name, value) in correlations.entries() {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(name);
                    });
                    row.col(|ui| {
                        ui.label(RichText::new(format!("{value:.4}")).monospace());
                    });
                });
            }
        });
}
