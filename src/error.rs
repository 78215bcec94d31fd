use std::path::PathBuf;

use thiserror::Error;

/// Why a metric file produced no series.
///
/// Only the loader and callers that want a reason see this; the public
/// `parse_series` boundary collapses every variant to "no data".
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "{}: expected a header and at least one data line, found {lines} line(s)",
        path.display()
    )]
    TooShort { path: PathBuf, lines: usize },

    #[error("{}: no parseable samples", path.display())]
    NoSamples { path: PathBuf },
}

/// Rejected attempt to switch the active data folder.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataRootError {
    #[error("Please enter a folder path before applying.")]
    Empty,

    #[error("Folder not found or inaccessible: {0}")]
    NotFound(String),
}
