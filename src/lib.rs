//! Run catalog and trace ingestion for Evosep Eno instrument logs.
//!
//! A data root holds one directory per run. Each run carries an optional
//! `journal.txt` and one tab-delimited `Pump-<id>_<Metric>.txt` file per
//! recorded metric. This crate scans those trees, parses the traces and
//! prepares them for a plotting front end. Nothing is cached: every call
//! rereads the filesystem, and missing or partial files degrade to empty
//! results instead of errors.

pub mod catalog;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod plot;
pub mod state;

pub use catalog::{get_metrics, list_runs, RunCatalog};
pub use data::filter::{filter_runs, select_runs, FilterCriteria};
pub use data::loader::parse_series;
pub use data::model::{AxisCategory, MetricRef, PumpMetrics, RunMetadata, RunSummary, TimeSeries};
pub use data::time::parse_time_to_seconds;
