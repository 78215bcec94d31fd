use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// RunMetadata – what a run's journal (or folder name) tells us
// ---------------------------------------------------------------------------

/// Metadata attached to a run. Fields are empty when the source is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunMetadata {
    pub procedure_name: String,
    pub log_name: String,
    pub sample_name: String,
    pub vial_position: String,
    /// `YYYY-MM-DD HH:MM:SS`, usually derived from the run folder name.
    pub date_time: String,
}

// ---------------------------------------------------------------------------
// RunSummary – one row of the run table
// ---------------------------------------------------------------------------

/// A run directory under the data root together with its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Directory name, unique within a data root.
    pub name: String,
    #[serde(flatten)]
    pub metadata: RunMetadata,
}

impl RunSummary {
    pub fn procedure(&self) -> &str {
        &self.metadata.procedure_name
    }

    pub fn sample(&self) -> &str {
        &self.metadata.sample_name
    }

    pub fn vial(&self) -> &str {
        &self.metadata.vial_position
    }

    pub fn date_time(&self) -> &str {
        &self.metadata.date_time
    }
}

// ---------------------------------------------------------------------------
// MetricRef – a `Pump-<id>_<Metric>.txt` file inside a run
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricRef {
    /// Metric name, e.g. `Pressure` or `Actual-flow`.
    pub name: String,
    /// File name inside the run directory, e.g. `Pump-HP_Pressure.txt`.
    pub filename: String,
}

impl MetricRef {
    /// Checklist label: hyphens and underscores become spaces.
    pub fn display_label(&self) -> String {
        self.name.replace(['-', '_'], " ")
    }
}

/// Metrics of one run grouped by pump identifier (e.g. `Pump-HP`).
pub type PumpMetrics = BTreeMap<String, Vec<MetricRef>>;

// ---------------------------------------------------------------------------
// TimeSeries – parsed content of one metric file
// ---------------------------------------------------------------------------

/// Ordered samples of one metric file, in file order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    /// Elapsed seconds since the start of the log.
    pub times: Vec<f64>,
    /// Sample values – same length as `times`.
    pub values: Vec<f64>,
    /// Unit / metric label taken from the file header.
    pub metric_info: String,
}

impl TimeSeries {
    pub fn new(metric_info: impl Into<String>) -> Self {
        Self {
            times: Vec::new(),
            values: Vec::new(),
            metric_info: metric_info.into(),
        }
    }

    pub fn push(&mut self, time: f64, value: f64) {
        self.times.push(time);
        self.values.push(value);
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// `(time, value)` pairs in file order.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times.iter().copied().zip(self.values.iter().copied())
    }
}

// ---------------------------------------------------------------------------
// AxisCategory – which y-axis a metric belongs on
// ---------------------------------------------------------------------------

/// Substrings that mark a metric file as flow-like.
pub const FLOW_AXIS_KEYWORDS: [&str; 4] = ["flow", "speed", "setpoint", "displacement"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisCategory {
    Pressure,
    Flow,
}

impl AxisCategory {
    /// Classify a metric by its file name alone. Case-insensitive.
    pub fn classify(metric_filename: &str) -> Self {
        let lower = metric_filename.to_lowercase();
        if FLOW_AXIS_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            AxisCategory::Flow
        } else {
            AxisCategory::Pressure
        }
    }
}

impl fmt::Display for AxisCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisCategory::Pressure => write!(f, "pressure"),
            AxisCategory::Flow => write!(f, "flow"),
        }
    }
}
