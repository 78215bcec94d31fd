use std::path::Path;

use serde::Serialize;

use crate::data::loader::parse_series;
use crate::data::model::{AxisCategory, TimeSeries};

pub const PLOT_TITLE: &str = "Evosep Data Traces";
pub const TIME_AXIS_TITLE: &str = "Time (seconds)";

// ---------------------------------------------------------------------------
// Plot options
// ---------------------------------------------------------------------------

/// User-controlled axis options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlotOptions {
    /// Put flow-like metrics on a secondary y-axis.
    pub dual_axis: bool,
    /// Upper bound of the pressure (or single) axis; `None` auto-scales.
    pub pressure_max: Option<f64>,
    /// Upper bound of the flow axis; `None` auto-scales.
    pub flow_max: Option<f64>,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            dual_axis: true,
            pressure_max: None,
            flow_max: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Renderer-neutral figure description
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum YAxis {
    /// Primary (left) axis.
    Y,
    /// Secondary (right) axis overlaying the primary one.
    Y2,
}

/// One line of the figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub label: String,
    pub run: String,
    pub metric_file: String,
    pub category: AxisCategory,
    pub y_axis: YAxis,
    pub series: TimeSeries,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisLayout {
    pub title: String,
    /// `[0, max]` when a limit is set; otherwise auto-scaled from zero.
    pub range: Option<[f64; 2]>,
}

impl AxisLayout {
    fn new(title: &str, max: Option<f64>) -> Self {
        Self {
            title: title.to_string(),
            range: max.map(|m| [0.0, m]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotLayout {
    pub title: String,
    pub x_axis_title: String,
    pub y_axis: AxisLayout,
    pub y_axis2: Option<AxisLayout>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotData {
    pub traces: Vec<Trace>,
    pub layout: PlotLayout,
}

/// Why no figure could be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotNotice {
    NoDataRoot,
    NoRuns,
    NoRunSelected,
    NoMetricSelected,
}

impl PlotNotice {
    pub fn message(&self) -> &'static str {
        match self {
            PlotNotice::NoDataRoot => "Set a data folder before plotting",
            PlotNotice::NoRuns => "No runs available to plot",
            PlotNotice::NoRunSelected => "Please select at least one run",
            PlotNotice::NoMetricSelected => "Please select at least one metric",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlotOutcome {
    Notice { notice: PlotNotice, message: String },
    Figure(PlotData),
}

impl PlotOutcome {
    fn notice(notice: PlotNotice) -> Self {
        PlotOutcome::Notice {
            notice,
            message: notice.message().to_string(),
        }
    }

    pub fn figure(&self) -> Option<&PlotData> {
        match self {
            PlotOutcome::Figure(data) => Some(data),
            PlotOutcome::Notice { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Building
// ---------------------------------------------------------------------------

/// Legend label of a metric file: `Pump-HP_Actual-flow.txt` → `Pump-HP Actual-flow`.
pub fn trace_label(metric_file: &str) -> String {
    metric_file.replace(".txt", "").replace('_', " ")
}

/// Build the figure for every selected run × metric file combination.
///
/// `available_runs` is the size of the run table the selection came from;
/// it only decides which notice to return when nothing can be plotted.
/// Files that are missing or hold no samples are left out.
pub fn build_plot(
    root: Option<&Path>,
    available_runs: usize,
    selected_runs: &[String],
    metric_files: &[String],
    options: &PlotOptions,
) -> PlotOutcome {
    let Some(root) = root else {
        return PlotOutcome::notice(PlotNotice::NoDataRoot);
    };
    if available_runs == 0 {
        return PlotOutcome::notice(PlotNotice::NoRuns);
    }
    if selected_runs.is_empty() {
        return PlotOutcome::notice(PlotNotice::NoRunSelected);
    }
    if metric_files.is_empty() {
        return PlotOutcome::notice(PlotNotice::NoMetricSelected);
    }

    let multi_run = selected_runs.len() > 1;
    let mut traces = Vec::new();

    for run in selected_runs {
        let run_path = root.join(run);
        for metric_file in metric_files {
            let path = run_path.join(metric_file);
            if !path.exists() {
                continue;
            }
            let Some(series) = parse_series(&path) else {
                continue;
            };

            let metric_label = trace_label(metric_file);
            let label = if multi_run {
                format!("{run} - {metric_label}")
            } else {
                metric_label
            };
            let category = AxisCategory::classify(metric_file);
            let y_axis = if options.dual_axis && category == AxisCategory::Flow {
                YAxis::Y2
            } else {
                YAxis::Y
            };

            traces.push(Trace {
                label,
                run: run.clone(),
                metric_file: metric_file.clone(),
                category,
                y_axis,
                series,
            });
        }
    }

    log::debug!(
        "Built {} trace(s) from {} run(s) × {} metric(s)",
        traces.len(),
        selected_runs.len(),
        metric_files.len()
    );

    let layout = build_layout(&traces, options);
    PlotOutcome::Figure(PlotData { traces, layout })
}

fn build_layout(traces: &[Trace], options: &PlotOptions) -> PlotLayout {
    let (y_axis, y_axis2) = if options.dual_axis {
        let has_flow = traces.iter().any(|t| t.category == AxisCategory::Flow);
        (
            AxisLayout::new("Pressure", options.pressure_max),
            has_flow.then(|| AxisLayout::new("Flow / Related", options.flow_max)),
        )
    } else {
        (AxisLayout::new("Value", options.pressure_max), None)
    };

    PlotLayout {
        title: PLOT_TITLE.to_string(),
        x_axis_title: TIME_AXIS_TITLE.to_string(),
        y_axis,
        y_axis2,
    }
}
