use serde::Serialize;

// ---------------------------------------------------------------------------
// ChartDescriptor – one renderable visualization
// ---------------------------------------------------------------------------

/// A complete, engine-independent description of one chart.
///
/// Built fresh for every selection and handed straight to the plot panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDescriptor {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub kind: ChartKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartKind {
    /// One unbroken series of `[x, y]` points.
    ///
    /// With `x_categories`, `x` is a row index and the strings are its tick labels.
    Line {
        points: Vec<[f64; 2]>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        x_categories: Vec<String>,
    },
    /// Frequency-binned values of one column.
    Histogram { values: Vec<f64>, bins: Vec<Bin> },
    /// A line plus a flat reference segment.
    AnnotatedLine {
        points: Vec<[f64; 2]>,
        floor: Option<Segment>,
    },
    /// One labelled, coloured bar per entry.
    Bar { bars: Vec<BarEntry> },
}

/// Half-open bin `[start, end)`; the last bin of a histogram is closed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl Bin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Horizontal segment at `y` from `x0` to `x1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub x0: f64,
    pub x1: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarEntry {
    pub label: String,
    pub value: f64,
    /// Text drawn on the bar.
    pub text: String,
    pub color: [u8; 3],
}

impl ChartDescriptor {
    /// Number of plotted elements: points, bins or bars.
    pub fn series_len(&self) -> usize {
        match &self.kind {
            ChartKind::Line { points, .. } | ChartKind::AnnotatedLine { points, .. } => points.len(),
            ChartKind::Histogram { bins, .. } => bins.len(),
            ChartKind::Bar { bars } => bars.len(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
