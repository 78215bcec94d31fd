use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::DataRootError;

/// Environment variable holding the default data folder.
pub const DEFAULT_DATA_PATH_ENV: &str = "EVOSEP_DEFAULT_DATA_PATH";

// ---------------------------------------------------------------------------
// Data root resolution
// ---------------------------------------------------------------------------

/// Resolve a user-supplied folder path to an existing directory.
///
/// A leading `~` expands to the home directory. Empty input, missing paths
/// and non-directories resolve to `None`.
pub fn resolve_data_root(path: &str) -> Option<PathBuf> {
    if path.is_empty() {
        return None;
    }
    let path = expand_home(path)?;
    path.is_dir().then_some(path)
}

fn expand_home(path: &str) -> Option<PathBuf> {
    match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() => dirs::home_dir(),
        Some(rest) if rest.starts_with('/') || rest.starts_with('\\') => {
            Some(dirs::home_dir()?.join(&rest[1..]))
        }
        _ => Some(PathBuf::from(path)),
    }
}

/// Validate a folder typed in by the user before it replaces the active root.
pub fn apply_data_root(input: &str) -> Result<PathBuf, DataRootError> {
    let cleaned = input.trim();
    if cleaned.is_empty() {
        return Err(DataRootError::Empty);
    }
    resolve_data_root(cleaned).ok_or_else(|| DataRootError::NotFound(cleaned.to_string()))
}

// ---------------------------------------------------------------------------
// Startup configuration
// ---------------------------------------------------------------------------

/// Where the active data root came from, for status display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataRootStatus {
    /// A usable directory is active.
    Using(PathBuf),
    /// A default was configured but does not resolve.
    NotFound(String),
    /// Nothing configured yet.
    Unset,
}

impl DataRootStatus {
    pub fn is_error(&self) -> bool {
        matches!(self, DataRootStatus::NotFound(_))
    }
}

impl fmt::Display for DataRootStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataRootStatus::Using(path) => write!(f, "Using data folder: {}", path.display()),
            DataRootStatus::NotFound(configured) => {
                write!(f, "Configured default path not found: {configured}")
            }
            DataRootStatus::Unset => write!(
                f,
                "Please enter the parent folder path that contains your run subdirectories."
            ),
        }
    }
}

/// Initial data root derived from a configured default path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_root: Option<PathBuf>,
    pub status: DataRootStatus,
}

impl Config {
    /// Build from a configured default (CLI flag or environment), if any.
    pub fn from_default_path(configured: Option<&str>) -> Self {
        let configured = configured.map(str::trim).unwrap_or_default();
        match resolve_data_root(configured) {
            Some(root) => Self {
                status: DataRootStatus::Using(root.clone()),
                data_root: Some(root),
            },
            None if configured.is_empty() => Self {
                data_root: None,
                status: DataRootStatus::Unset,
            },
            None => Self {
                data_root: None,
                status: DataRootStatus::NotFound(configured.to_string()),
            },
        }
    }

    /// Read the default from `EVOSEP_DEFAULT_DATA_PATH`.
    pub fn from_env() -> Self {
        let configured = std::env::var(DEFAULT_DATA_PATH_ENV).ok();
        Self::from_default_path(configured.as_deref())
    }

    pub fn data_root(&self) -> Option<&Path> {
        self.data_root.as_deref()
    }
}
