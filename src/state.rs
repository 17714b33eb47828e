use crate::charts::ChartDescriptor;
use crate::charts::builders::correlation_bar_chart;
use crate::data::model::Table;
use crate::data::stats::{CorrelationVector, cpi_correlations};
use crate::selection::{ChartSpec, SelectionKey, dispatch};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// What the plot region currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Chart {
        chart: ChartDescriptor,
        /// The full CPI correlation vector, listed under the correlation chart.
        correlations: Option<CorrelationVector>,
    },
    /// A selection that could not be built; shown as a notice.
    Failure(String),
}

/// The full UI state, independent of rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    /// Current dropdown value.
    pub selected: SelectionKey,
    pub view: View,
}

/// User-driven events the shell forwards to [`render`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    Select(SelectionKey),
    /// Rebuild the current selection.
    Refresh,
}

impl AppState {
    /// State showing `key`; the shell starts from [`SelectionKey::first`] by default.
    pub fn starting_at(table: &Table, key: SelectionKey) -> Self {
        build(table, key)
    }

    pub fn chart(&self) -> Option<&ChartDescriptor> {
        match &self.view {
            View::Chart { chart, .. } => Some(chart),
            View::Failure(_) => None,
        }
    }
}

/// Compute the next state for `event`. Pure apart from logging.
pub fn render(table: &Table, state: &AppState, event: Event) -> AppState {
    let key = match event {
        Event::Select(key) => key,
        Event::Refresh => state.selected,
    };
    build(table, key)
}

fn build(table: &Table, key: SelectionKey) -> AppState {
    log::info!("Rendering '{}'", key.label());

    let view = match key.spec() {
        ChartSpec::CpiCorrelations => cpi_correlations(table).map(|corr| View::Chart {
            chart: correlation_bar_chart(&corr),
            correlations: Some(corr),
        }),
        _ => dispatch(table, key).map(|chart| View::Chart {
            chart,
            correlations: None,
        }),
    };
    if let Ok(View::Chart { chart, .. }) = &view {
        log::debug!("'{}' has {} elements", chart.title, chart.series_len());
    }

    let view = view.unwrap_or_else(|e| {
        log::error!("Failed to render '{}': {e}", key.id());
        View::Failure(format!("Error: {e}"))
    });

    AppState {
        selected: key,
        view,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::sample_table;
    use crate::data::model::{CellValue, Column};

    #[test]
    fn initial_state_shows_first_entry() {
        let table = sample_table();
        let state = AppState::starting_at(&table, SelectionKey::first());
        assert_eq!(state.selected, SelectionKey::CpiChange);
        assert_eq!(
            state.chart().map(|c| c.title.as_str()),
            Some("Consumer Price Index Change")
        );
    }

    #[test]
    fn select_replaces_the_view() {
        let table = sample_table();
        let state = AppState::starting_at(&table, SelectionKey::first());
        let next = render(&table, &state, Event::Select(SelectionKey::CpiCorrelations));
        assert_eq!(next.selected, SelectionKey::CpiCorrelations);
        let View::Chart { correlations, .. } = &next.view else {
            panic!("expected chart");
        };
        let corr = correlations.as_ref().expect("correlations listed");
        assert_eq!(corr.entries()[0], ("CPI".to_string(), 1.0));
        // The chart is drawn from the same vector that is listed.
        assert_eq!(next.chart(), Some(&correlation_bar_chart(corr)));
        assert_eq!(
            next.chart(),
            dispatch(&table, SelectionKey::CpiCorrelations).ok().as_ref()
        );
        // The previous state is untouched.
        assert_eq!(state.selected, SelectionKey::CpiChange);
    }

    #[test]
    fn refresh_rebuilds_the_same_selection() {
        let table = sample_table();
        let state = render(
            &table,
            &AppState::starting_at(&table, SelectionKey::first()),
            Event::Select(SelectionKey::RapeAgainstCpi),
        );
        assert_eq!(render(&table, &state, Event::Refresh), state);
    }

    #[test]
    fn failures_become_a_notice() {
        let table = Table::from_columns(vec![Column::new(
            "Date",
            vec![CellValue::Integer(2020)],
        )])
        .unwrap();
        let state = AppState::starting_at(&table, SelectionKey::first());
        let View::Failure(msg) = &state.view else {
            panic!("expected failure");
        };
        assert!(msg.contains("CPI"), "{msg}");

        // Still interactive: another selection is attempted normally.
        let next = render(&table, &state, Event::Select(SelectionKey::MurderOverTime));
        assert_eq!(next.selected, SelectionKey::MurderOverTime);
        assert!(matches!(next.view, View::Failure(_)));
    }
}
