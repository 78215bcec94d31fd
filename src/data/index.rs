use std::fs;
use std::path::Path;

use super::model::{MetricRef, PumpMetrics};

const METRIC_FILE_PREFIX: &str = "Pump-";
const METRIC_FILE_EXTENSION: &str = ".txt";

// ---------------------------------------------------------------------------
// Metric indexing: Pump-*.txt → pump → [MetricRef]
// ---------------------------------------------------------------------------

/// Group the `Pump-*.txt` files of a run directory by pump.
///
/// `Pump-HP_Actual-flow.txt` → pump `Pump-HP`, metric `Actual-flow`.
/// Everything after the first `_` is the metric name, so
/// `Pump-HP_Flow_raw.txt` yields metric `Flow_raw`. Files are visited in
/// lexicographic name order and each pump keeps that order. A missing or
/// unreadable directory yields an empty map.
pub fn index_metrics(run_dir: &Path) -> PumpMetrics {
    let mut metrics = PumpMetrics::new();

    for filename in metric_file_names(run_dir) {
        let stem = &filename[..filename.len() - METRIC_FILE_EXTENSION.len()];
        let Some((pump, metric)) = stem.split_once('_') else {
            continue;
        };
        metrics
            .entry(pump.to_string())
            .or_default()
            .push(MetricRef {
                name: metric.to_string(),
                filename: filename.clone(),
            });
    }

    metrics
}

/// Sorted names of the regular files in `run_dir` matching `Pump-*.txt`.
fn metric_file_names(run_dir: &Path) -> Vec<String> {
    let entries = match fs::read_dir(run_dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::debug!("Cannot list {}: {e}", run_dir.display());
            return Vec::new();
        }
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| is_metric_file_name(name))
        .collect();
    names.sort();
    names
}

fn is_metric_file_name(name: &str) -> bool {
    name.len() >= METRIC_FILE_PREFIX.len() + METRIC_FILE_EXTENSION.len()
        && name.starts_with(METRIC_FILE_PREFIX)
        && name.ends_with(METRIC_FILE_EXTENSION)
}
