use std::fs;
use std::path::{Path, PathBuf};

use crate::data::index::index_metrics;
use crate::data::journal::parse_journal;
use crate::data::loader::parse_series;
use crate::data::model::{PumpMetrics, RunSummary, TimeSeries};

// ---------------------------------------------------------------------------
// Free functions: the engine boundary
// ---------------------------------------------------------------------------

/// Every immediate subdirectory of `root`, sorted by name, with its
/// journal metadata attached. Missing, unset or non-directory roots yield
/// an empty list.
pub fn list_runs(root: Option<&Path>) -> Vec<RunSummary> {
    let Some(root) = root else {
        return Vec::new();
    };
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            log::debug!("Cannot list data root {}: {e}", root.display());
            return Vec::new();
        }
    };

    let mut dirs: Vec<(String, PathBuf)> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .filter_map(|path| {
            let name = path.file_name()?.to_str()?.to_string();
            Some((name, path))
        })
        .collect();
    dirs.sort_by(|a, b| a.0.cmp(&b.0));

    dirs.into_iter()
        .map(|(name, path)| RunSummary {
            metadata: parse_journal(&path),
            name,
        })
        .collect()
}

/// Metric files of `run_name` under `root`, grouped by pump.
pub fn get_metrics(root: Option<&Path>, run_name: &str) -> PumpMetrics {
    match root {
        Some(root) => index_metrics(&root.join(run_name)),
        None => PumpMetrics::new(),
    }
}

// ---------------------------------------------------------------------------
// RunCatalog – a data root bound at construction
// ---------------------------------------------------------------------------

/// Read-only view over one data root. Every call rescans the filesystem.
#[derive(Debug, Clone, Default)]
pub struct RunCatalog {
    root: Option<PathBuf>,
}

impl RunCatalog {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn runs(&self) -> Vec<RunSummary> {
        let runs = list_runs(self.root());
        if let Some(root) = self.root() {
            log::info!("Found {} run(s) under {}", runs.len(), root.display());
        }
        runs
    }

    pub fn metrics(&self, run_name: &str) -> PumpMetrics {
        get_metrics(self.root(), run_name)
    }

    /// Path of a metric file inside a run, if a root is configured.
    pub fn metric_path(&self, run_name: &str, filename: &str) -> Option<PathBuf> {
        self.root().map(|root| root.join(run_name).join(filename))
    }

    pub fn series(&self, run_name: &str, filename: &str) -> Option<TimeSeries> {
        parse_series(&self.metric_path(run_name, filename)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn lists_only_directories_in_name_order() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("b_2025-01-02_10-00-00")).unwrap();
        fs::create_dir(dir.path().join("a_2025-01-01_09-30-00")).unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let runs = list_runs(Some(dir.path()));
        let names: Vec<&str> = runs.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["a_2025-01-01_09-30-00", "b_2025-01-02_10-00-00"]);
        assert_eq!(runs[0].date_time(), "2025-01-01 09:30:00");
    }

    #[test]
    fn unusable_roots_list_nothing() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file");
        fs::write(&file, "").unwrap();

        assert!(list_runs(None).is_empty());
        assert!(list_runs(Some(&dir.path().join("missing"))).is_empty());
        assert!(list_runs(Some(&file)).is_empty());
    }

    #[test]
    fn metrics_for_unknown_run_or_root_are_empty() {
        let dir = tempdir().unwrap();
        assert!(get_metrics(None, "run").is_empty());
        assert!(get_metrics(Some(dir.path()), "run").is_empty());
    }

    #[test]
    fn catalog_reads_series_through_root() {
        let dir = tempdir().unwrap();
        let run = dir.path().join("run_2025-01-01_00-00-00");
        fs::create_dir(&run).unwrap();
        fs::write(run.join("Pump-HP_Pressure.txt"), "Time\tbar\n00:00:01.000\t5\n").unwrap();

        let catalog = RunCatalog::new(Some(dir.path().to_path_buf()));
        let series = catalog
            .series("run_2025-01-01_00-00-00", "Pump-HP_Pressure.txt")
            .unwrap();
        assert_eq!(series.values, vec![5.0]);
        assert!(RunCatalog::default().series("run", "Pump-HP_Pressure.txt").is_none());
    }
}
