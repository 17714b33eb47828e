use crate::charts::ChartDescriptor;
use crate::charts::builders;
use crate::data::model::{DATE_COLUMN, Table};
use crate::data::stats::cpi_correlations;
use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// Selection keys
// ---------------------------------------------------------------------------

/// Every chart the dropdown can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionKey {
    CpiChange,
    PropertyOverTime,
    MurderOverTime,
    ViolentOverTime,
    BurglaryOverTime,
    TotalOverTime,
    CpiHistogram,
    PropertyHistogram,
    ViolentHistogram,
    BurglaryHistogram,
    TotalHistogram,
    ViolentAgainstCpi,
    PropertyAgainstCpi,
    MurderAgainstCpi,
    RapeAgainstCpi,
    RobberyAgainstCpi,
    AssaultAgainstCpi,
    BurglaryAgainstCpi,
    LarcenyTheftAgainstCpi,
    VehicleTheftAgainstCpi,
    CpiCorrelations,
}

/// What to build for a key, with its arguments bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChartSpec {
    Line {
        y_col: &'static str,
        title: &'static str,
        y_label: &'static str,
    },
    Histogram {
        col: &'static str,
        title: &'static str,
        x_label: &'static str,
    },
    AgainstCpi {
        y_col: &'static str,
    },
    CpiCorrelations,
}

/// One dropdown entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuEntry {
    pub key: SelectionKey,
    /// Stable string identifier, also used in logs and exports.
    pub id: &'static str,
    pub label: &'static str,
    pub spec: ChartSpec,
}

const fn entry(
    key: SelectionKey,
    id: &'static str,
    label: &'static str,
    spec: ChartSpec,
) -> MenuEntry {
    MenuEntry {
        key,
        id,
        label,
        spec,
    }
}

const fn over_time(y_col: &'static str, title: &'static str, y_label: &'static str) -> ChartSpec {
    ChartSpec::Line {
        y_col,
        title,
        y_label,
    }
}

const fn distribution(col: &'static str, title: &'static str, x_label: &'static str) -> ChartSpec {
    ChartSpec::Histogram {
        col,
        title,
        x_label,
    }
}

const fn against_cpi(y_col: &'static str) -> ChartSpec {
    ChartSpec::AgainstCpi { y_col }
}

/// The dropdown menu, in display order. The first entry is the default.
///
/// `Violent_Crime_hist`, `Burglary_hist` and `Total_hist` each plot the
/// distribution of their own column. They were once wired to line-plot
/// arguments of the matching "Over Time" chart and failed at render time.
/// `Murder_hist` (which plotted Property data) was never offered in the
/// menu and is not a key.
pub static MENU: [MenuEntry; 21] = {
    use SelectionKey::*;
    [
        entry(
            CpiChange,
            "CPI",
            "Consumer Price Index Change",
            over_time("CPI", "Consumer Price Index Change", "CPI"),
        ),
        entry(
            PropertyOverTime,
            "Property",
            "Property Crime Over Time",
            over_time(
                "Property",
                "Property Crime Over Time",
                "Number of Property Incidents",
            ),
        ),
        entry(
            MurderOverTime,
            "Murder",
            "Murder Over Time",
            over_time("Murder", "Murder Over Time", "Number of Murder Incidents"),
        ),
        entry(
            ViolentOverTime,
            "Violent",
            "Violent Crime Over Time",
            over_time(
                "Violent",
                "Violent Crime Over Time",
                "Number of Violent Incidents",
            ),
        ),
        entry(
            BurglaryOverTime,
            "Burglary",
            "Burglary Over Time",
            over_time(
                "Burglary",
                "Burglary Over Time",
                "Total Number of Burglary Incidents",
            ),
        ),
        entry(
            TotalOverTime,
            "Total",
            "Total Crime Over Time",
            over_time(
                "Total",
                "Total Crime Over Time",
                "Total Number of Incidents",
            ),
        ),
        entry(
            CpiHistogram,
            "CPI_hist",
            "Distribution of Consumer Price Index",
            distribution("CPI", "Distribution of Consumer Price Index", "CPI"),
        ),
        entry(
            PropertyHistogram,
            "Property_hist",
            "Distribution of Property Crime Incidents",
            distribution(
                "Property",
                "Distribution of Property Crime Incidents",
                "Number of Property Incidents",
            ),
        ),
        entry(
            ViolentHistogram,
            "Violent_Crime_hist",
            "Distribution of Violent Crime Incidents",
            distribution(
                "Violent",
                "Distribution of Violent Crime Incidents",
                "Number of Violent Incidents",
            ),
        ),
        entry(
            BurglaryHistogram,
            "Burglary_hist",
            "Distribution of Burglary Incidents",
            distribution(
                "Burglary",
                "Distribution of Burglary Incidents",
                "Number of Burglary Incidents",
            ),
        ),
        entry(
            TotalHistogram,
            "Total_hist",
            "Distribution of Total Crime Incidents",
            distribution(
                "Total",
                "Distribution of Total Crime Incidents",
                "Total Number of Incidents",
            ),
        ),
        entry(
            ViolentAgainstCpi,
            "Violent_CPI",
            "Violent Crime against CPI",
            against_cpi("Violent"),
        ),
        entry(
            PropertyAgainstCpi,
            "Property_CPI",
            "Property Crime against CPI",
            against_cpi("Property"),
        ),
        entry(
            MurderAgainstCpi,
            "Murder_CPI",
            "Murder Crime against CPI",
            against_cpi("Murder"),
        ),
        entry(
            RapeAgainstCpi,
            "Rape_CPI",
            "Rape Crime against CPI",
            against_cpi("Rape"),
        ),
        entry(
            RobberyAgainstCpi,
            "Robbery_CPI",
            "Robbery Crime against CPI",
            against_cpi("Robbery"),
        ),
        entry(
            AssaultAgainstCpi,
            "Assault_CPI",
            "Assault Crime against CPI",
            against_cpi("assault"),
        ),
        entry(
            BurglaryAgainstCpi,
            "Burglary_CPI",
            "Burglary Crime against CPI",
            against_cpi("Burglary"),
        ),
        entry(
            LarcenyTheftAgainstCpi,
            "Larceny_Theft_CPI",
            "Larceny Theft Crime against CPI",
            against_cpi("Larceny theft"),
        ),
        entry(
            VehicleTheftAgainstCpi,
            "Vehicle_Theft_CPI",
            "Vehicle Theft Crime against CPI",
            against_cpi("Vehicle theft"),
        ),
        entry(
            CpiCorrelations,
            "CPI_correlations",
            "Correlations between CPI and Crime Types",
            ChartSpec::CpiCorrelations,
        ),
    ]
};

impl SelectionKey {
    /// The default selection: the first menu entry.
    pub fn first() -> Self {
        MENU[0].key
    }

    /// Parse a string identifier such as `"Violent_CPI"`.
    pub fn from_key(id: &str) -> Result<Self> {
        MENU.iter()
            .find(|e| e.id == id)
            .map(|e| e.key)
            .ok_or_else(|| DashboardError::UnknownSelection(id.to_string()))
    }

    pub fn menu_entry(self) -> &'static MenuEntry {
        // Every variant has exactly one menu entry; see `menu_covers_every_key`.
        MENU.iter()
            .find(|e| e.key == self)
            .unwrap_or(&MENU[0])
    }

    pub fn id(self) -> &'static str {
        self.menu_entry().id
    }

    pub fn label(self) -> &'static str {
        self.menu_entry().label
    }

    pub fn spec(self) -> ChartSpec {
        self.menu_entry().spec
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Build the chart bound to `key`.
pub fn dispatch(table: &Table, key: SelectionKey) -> Result<ChartDescriptor> {
    log::debug!("Dispatching selection '{}'", key.id());
    match key.spec() {
        ChartSpec::Line {
            y_col,
            title,
            y_label,
        } => builders::line(table, DATE_COLUMN, y_col, title, "Year", y_label),
        ChartSpec::Histogram {
            col,
            title,
            x_label,
        } => builders::histogram(table, col, title, x_label, "Count"),
        ChartSpec::AgainstCpi { y_col } => builders::trend_against_cpi(table, "CPI", y_col),
        ChartSpec::CpiCorrelations => {
            let correlations = cpi_correlations(table)?;
            Ok(builders::correlation_bar_chart(&correlations))
        }
    }
}
