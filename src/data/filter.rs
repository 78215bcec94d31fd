use serde::Serialize;

use super::model::RunSummary;

// ---------------------------------------------------------------------------
// Filter predicate: substring criteria over the run table
// ---------------------------------------------------------------------------

/// Case-insensitive "contains" criteria, one per run table column.
/// An empty criterion imposes no constraint; non-empty ones are AND-ed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    pub name: String,
    pub procedure: String,
    pub sample: String,
    pub vial: String,
}

impl FilterCriteria {
    /// Whether `run` satisfies every non-empty criterion.
    pub fn matches(&self, run: &RunSummary) -> bool {
        contains_ci(&run.name, &self.name)
            && contains_ci(run.procedure(), &self.procedure)
            && contains_ci(run.sample(), &self.sample)
            && contains_ci(run.vial(), &self.vial)
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Keep the runs that pass every criterion, in their original order.
pub fn filter_runs(runs: &[RunSummary], criteria: &FilterCriteria) -> Vec<RunSummary> {
    runs.iter()
        .filter(|run| criteria.matches(run))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Selection policy
// ---------------------------------------------------------------------------

/// Resolve selected row indices of `filtered` to run names.
///
/// * Rows outside `filtered` are ignored.
/// * When nothing resolves, the first filtered run is selected.
/// * An empty `filtered` selects nothing.
pub fn select_runs(filtered: &[RunSummary], selected_rows: &[usize]) -> Vec<String> {
    let selected: Vec<String> = selected_rows
        .iter()
        .filter_map(|&idx| filtered.get(idx))
        .map(|run| run.name.clone())
        .collect();
    if !selected.is_empty() {
        return selected;
    }
    filtered
        .first()
        .map(|run| vec![run.name.clone()])
        .unwrap_or_default()
}
