use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::catalog::RunCatalog;
use crate::config::{apply_data_root, Config, DataRootStatus};
use crate::data::filter::{filter_runs, select_runs, FilterCriteria};
use crate::data::model::{MetricRef, PumpMetrics, RunSummary};
use crate::error::DataRootError;
use crate::plot::{build_plot, PlotOptions, PlotOutcome};

/// Pump whose pressure and actual flow are checked by default.
pub const DEFAULT_PUMP: &str = "pump-hp";
/// Normalized metric names checked by default on [`DEFAULT_PUMP`].
pub const DEFAULT_METRIC_KEYS: [&str; 3] = ["actual-flow", "actualflow", "pressure"];

// ---------------------------------------------------------------------------
// Metric checklist
// ---------------------------------------------------------------------------

/// One checklist entry: display label and the metric file it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricOption {
    pub label: String,
    pub filename: String,
}

/// Checklist block for one pump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricGroup {
    pub pump: String,
    pub options: Vec<MetricOption>,
    /// File names checked when the group is first shown.
    pub default_selection: Vec<String>,
}

impl MetricGroup {
    fn from_metrics(pump: &str, metrics: &[MetricRef]) -> Self {
        let is_default_pump = pump.to_lowercase() == DEFAULT_PUMP;
        let options = metrics
            .iter()
            .map(|m| MetricOption {
                label: m.display_label(),
                filename: m.filename.clone(),
            })
            .collect();
        let default_selection = metrics
            .iter()
            .filter(|m| is_default_pump && is_default_metric(&m.name))
            .map(|m| m.filename.clone())
            .collect();
        Self {
            pump: pump.to_string(),
            options,
            default_selection,
        }
    }
}

fn is_default_metric(name: &str) -> bool {
    let key = name.to_lowercase().replace(' ', "");
    DEFAULT_METRIC_KEYS.contains(&key.as_str())
}

/// Metric panel content: a notice or the per-pump checklists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricPanel {
    Notice(&'static str),
    Groups(Vec<MetricGroup>),
}

/// Build the metric checklist groups of one run, pumps in sorted order.
pub fn metric_groups(metrics: &PumpMetrics) -> Vec<MetricGroup> {
    metrics
        .iter()
        .map(|(pump, refs)| MetricGroup::from_metrics(pump, refs))
        .collect()
}

// ---------------------------------------------------------------------------
// Viewer state
// ---------------------------------------------------------------------------

/// The full viewer state, independent of rendering.
#[derive(Debug, Clone)]
pub struct ViewerState {
    /// Catalog over the active data root (None until a folder is set).
    pub catalog: RunCatalog,

    /// Status line describing the active data root.
    pub status: DataRootStatus,

    /// Run table filter inputs.
    pub criteria: FilterCriteria,

    /// Runs passing the current filters (the run table).
    pub runs: Vec<RunSummary>,

    /// Selected row indices into `runs`.
    pub selected_rows: Vec<usize>,

    /// Checked metric files per pump.
    pub metric_selection: BTreeMap<String, Vec<String>>,

    /// Axis options for the next plot.
    pub plot_options: PlotOptions,
}

impl ViewerState {
    /// Start from a resolved configuration and scan its data root.
    pub fn new(config: Config) -> Self {
        let mut state = Self {
            catalog: RunCatalog::new(config.data_root),
            status: config.status,
            criteria: FilterCriteria::default(),
            runs: Vec::new(),
            selected_rows: Vec::new(),
            metric_selection: BTreeMap::new(),
            plot_options: PlotOptions::default(),
        };
        state.refresh();
        state
    }

    /// Switch to a folder typed in by the user. On error the current root
    /// stays active.
    pub fn set_data_root(&mut self, input: &str) -> Result<(), DataRootError> {
        let root = apply_data_root(input)?;
        log::info!("Using data folder: {}", root.display());
        self.status = DataRootStatus::Using(root.clone());
        self.catalog = RunCatalog::new(Some(root));
        self.refresh();
        Ok(())
    }

    pub fn data_root(&self) -> Option<PathBuf> {
        self.catalog.root().map(|p| p.to_path_buf())
    }

    /// Rescan the data root, reapply filters and reset the selection to the
    /// first row.
    pub fn refresh(&mut self) {
        self.runs = filter_runs(&self.catalog.runs(), &self.criteria);
        self.selected_rows = if self.runs.is_empty() {
            Vec::new()
        } else {
            vec![0]
        };
        self.reset_metric_selection();
    }

    /// Replace the filter inputs and refresh the run table.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.refresh();
    }

    /// Select every row of the filtered run table.
    pub fn select_all_runs(&mut self) {
        self.runs = filter_runs(&self.catalog.runs(), &self.criteria);
        self.selected_rows = (0..self.runs.len()).collect();
        self.reset_metric_selection();
    }

    /// Deselect every row. Downstream the first run is still used.
    pub fn clear_run_selection(&mut self) {
        self.runs = filter_runs(&self.catalog.runs(), &self.criteria);
        self.selected_rows.clear();
        self.reset_metric_selection();
    }

    /// Toggle one row of the run table.
    pub fn toggle_run(&mut self, row: usize) {
        if row >= self.runs.len() {
            return;
        }
        if let Some(pos) = self.selected_rows.iter().position(|&r| r == row) {
            self.selected_rows.remove(pos);
        } else {
            self.selected_rows.push(row);
        }
        self.reset_metric_selection();
    }

    /// Names of the runs that will be plotted.
    pub fn selected_runs(&self) -> Vec<String> {
        select_runs(&self.runs, &self.selected_rows)
    }

    /// Metric checklist, built from the first selected run only.
    pub fn metric_panel(&self) -> MetricPanel {
        if self.catalog.root().is_none() {
            return MetricPanel::Notice("Set a data folder to browse metrics");
        }
        if self.runs.is_empty() {
            return MetricPanel::Notice("No runs available");
        }
        let selected = self.selected_runs();
        let Some(first) = selected.first() else {
            return MetricPanel::Notice("Please select at least one run");
        };
        let metrics = self.catalog.metrics(first);
        if metrics.is_empty() {
            return MetricPanel::Notice("No metrics found");
        }
        MetricPanel::Groups(metric_groups(&metrics))
    }

    /// Put every checklist back to its default selection.
    pub fn reset_metric_selection(&mut self) {
        self.metric_selection = self.groups_with(|g| g.default_selection.clone());
    }

    pub fn select_all_metrics(&mut self) {
        self.metric_selection =
            self.groups_with(|g| g.options.iter().map(|o| o.filename.clone()).collect());
    }

    pub fn unselect_all_metrics(&mut self) {
        self.metric_selection = self.groups_with(|_| Vec::new());
    }

    /// Check or uncheck one metric file of a pump.
    pub fn toggle_metric(&mut self, pump: &str, filename: &str) {
        let selected = self.metric_selection.entry(pump.to_string()).or_default();
        if let Some(pos) = selected.iter().position(|f| f == filename) {
            selected.remove(pos);
        } else {
            selected.push(filename.to_string());
        }
    }

    /// Check a metric file of a pump; already checked files stay checked.
    pub fn check_metric(&mut self, pump: &str, filename: &str) {
        let selected = self.metric_selection.entry(pump.to_string()).or_default();
        if !selected.iter().any(|f| f == filename) {
            selected.push(filename.to_string());
        }
    }

    fn groups_with(
        &self,
        pick: impl Fn(&MetricGroup) -> Vec<String>,
    ) -> BTreeMap<String, Vec<String>> {
        match self.metric_panel() {
            MetricPanel::Groups(groups) => groups
                .iter()
                .map(|g| (g.pump.clone(), pick(g)))
                .collect(),
            MetricPanel::Notice(_) => BTreeMap::new(),
        }
    }

    /// Checked metric files flattened across pumps.
    pub fn selected_metric_files(&self) -> Vec<String> {
        self.metric_selection.values().flatten().cloned().collect()
    }

    /// Build the figure for the current selection.
    pub fn build_plot(&self) -> PlotOutcome {
        build_plot(
            self.catalog.root(),
            self.runs.len(),
            &self.selected_runs(),
            &self.selected_metric_files(),
            &self.plot_options,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::{tempdir, TempDir};

    const RUN_A: &str = "200-SPD_2025-12-11_12-27-48";
    const RUN_B: &str = "Whisper40_2025-12-12_08-00-00";

    fn write_run(root: &Path, name: &str, sample: &str, files: &[&str]) {
        let dir = root.join(name);
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("journal.txt"), format!("Procedure.Samplename: {sample}\n")).unwrap();
        for file in files {
            fs::write(dir.join(file), "Time\tv\n00:00:00.000\t1.0\n").unwrap();
        }
    }

    fn fixture() -> TempDir {
        let dir = tempdir().unwrap();
        write_run(
            dir.path(),
            RUN_A,
            "QC01",
            &[
                "Pump-HP_Pressure.txt",
                "Pump-HP_Actual-flow.txt",
                "Pump-HP_Speed.txt",
                "Pump-LP_Pressure.txt",
            ],
        );
        write_run(dir.path(), RUN_B, "HeLa", &["Pump-HP_Pressure.txt"]);
        dir
    }

    fn state_for(dir: &TempDir) -> ViewerState {
        ViewerState::new(Config::from_default_path(dir.path().to_str()))
    }

    #[test]
    fn refresh_selects_first_row() {
        let dir = fixture();
        let state = state_for(&dir);
        assert_eq!(state.runs.len(), 2);
        assert_eq!(state.selected_rows, vec![0]);
        assert_eq!(state.selected_runs(), [RUN_A]);
    }

    #[test]
    fn default_metrics_are_hp_pressure_and_actual_flow() {
        let dir = fixture();
        let state = state_for(&dir);
        assert_eq!(
            state.metric_selection["Pump-HP"],
            ["Pump-HP_Actual-flow.txt", "Pump-HP_Pressure.txt"]
        );
        assert!(state.metric_selection["Pump-LP"].is_empty());
    }

    #[test]
    fn metric_panel_uses_first_selected_run_only() {
        let dir = fixture();
        let mut state = state_for(&dir);
        state.toggle_run(0);
        state.toggle_run(1);
        state.toggle_run(0);
        assert_eq!(state.selected_runs(), [RUN_B, RUN_A]);

        match state.metric_panel() {
            MetricPanel::Groups(groups) => {
                assert_eq!(groups.len(), 1);
                assert_eq!(groups[0].options[0].label, "Pressure");
            }
            other => panic!("unexpected panel {other:?}"),
        }
    }

    #[test]
    fn select_all_and_clear_runs() {
        let dir = fixture();
        let mut state = state_for(&dir);
        state.select_all_runs();
        assert_eq!(state.selected_rows, vec![0, 1]);

        state.clear_run_selection();
        assert!(state.selected_rows.is_empty());
        // Nothing selected still plots the first run.
        assert_eq!(state.selected_runs(), [RUN_A]);
    }

    #[test]
    fn filters_rebuild_the_table() {
        let dir = fixture();
        let mut state = state_for(&dir);
        state.set_criteria(FilterCriteria {
            sample: "hela".into(),
            ..Default::default()
        });
        assert_eq!(state.runs.len(), 1);
        assert_eq!(state.selected_runs(), [RUN_B]);

        state.set_criteria(FilterCriteria {
            sample: "nothing".into(),
            ..Default::default()
        });
        assert!(state.selected_rows.is_empty());
        assert_eq!(state.metric_panel(), MetricPanel::Notice("No runs available"));
    }

    #[test]
    fn select_all_and_unselect_all_metrics() {
        let dir = fixture();
        let mut state = state_for(&dir);
        state.select_all_metrics();
        assert_eq!(state.selected_metric_files().len(), 4);

        state.unselect_all_metrics();
        assert!(state.selected_metric_files().is_empty());

        state.toggle_metric("Pump-HP", "Pump-HP_Speed.txt");
        assert_eq!(state.selected_metric_files(), ["Pump-HP_Speed.txt"]);
    }

    #[test]
    fn checking_a_metric_twice_keeps_it_checked() {
        let dir = fixture();
        let mut state = state_for(&dir);
        state.unselect_all_metrics();
        state.check_metric("Pump-LP", "Pump-LP_Pressure.txt");
        state.check_metric("Pump-LP", "Pump-LP_Pressure.txt");
        assert_eq!(state.selected_metric_files(), ["Pump-LP_Pressure.txt"]);
    }

    #[test]
    fn no_data_root_shows_notices() {
        let state = ViewerState::new(Config::from_default_path(None));
        assert_eq!(
            state.metric_panel(),
            MetricPanel::Notice("Set a data folder to browse metrics")
        );
        assert!(state.build_plot().figure().is_none());
    }

    #[test]
    fn rejected_root_keeps_current_one() {
        let dir = fixture();
        let mut state = state_for(&dir);
        assert_eq!(state.set_data_root(""), Err(DataRootError::Empty));
        assert_eq!(state.data_root(), Some(dir.path().to_path_buf()));

        let other = tempdir().unwrap();
        state.set_data_root(other.path().to_str().unwrap()).unwrap();
        assert!(state.runs.is_empty());
        assert_eq!(state.status, DataRootStatus::Using(other.path().to_path_buf()));
    }

    #[test]
    fn default_plot_has_two_traces() {
        let dir = fixture();
        let state = state_for(&dir);
        let outcome = state.build_plot();
        let fig = outcome.figure().unwrap();
        assert_eq!(fig.traces.len(), 2);
        assert!(fig.layout.y_axis2.is_some());
    }
}
