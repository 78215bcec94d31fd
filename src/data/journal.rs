use std::fs;
use std::path::Path;

use super::loader::split_lines;
use super::model::RunMetadata;

pub const JOURNAL_FILE_NAME: &str = "journal.txt";

const PROCEDURE_NAME: &str = "Procedure.Name:";
const PROCEDURE_LOGNAME: &str = "Procedure.Logname:";
const PROCEDURE_SAMPLENAME: &str = "Procedure.Samplename:";
const PROCEDURE_VIALPOSITION: &str = "Procedure.Vialposition:";

// ---------------------------------------------------------------------------
// Journal parsing
// ---------------------------------------------------------------------------

/// Read `journal.txt` of a run directory into a [`RunMetadata`].
///
/// Never fails: a missing or unreadable journal (including one that is not
/// valid UTF-8) leaves every field empty. When no date/time was found, it is
/// derived from the run directory name.
pub fn parse_journal(run_dir: &Path) -> RunMetadata {
    let mut metadata = RunMetadata::default();
    let journal_path = run_dir.join(JOURNAL_FILE_NAME);

    if journal_path.exists() {
        match fs::read_to_string(&journal_path) {
            Ok(text) => {
                for line in split_lines(&text) {
                    apply_journal_line(&mut metadata, line);
                }
            }
            Err(e) => {
                log::warn!("Error parsing journal file {}: {e}", journal_path.display());
            }
        }
    }

    if metadata.date_time.is_empty() {
        if let Some(name) = run_dir.file_name().and_then(|n| n.to_str()) {
            if let Some(date_time) = date_time_from_folder_name(name) {
                metadata.date_time = date_time;
            }
        }
    }

    metadata
}

/// Fill the matching field of `metadata` from one journal line.
fn apply_journal_line(metadata: &mut RunMetadata, line: &str) {
    let line = line.trim();
    let field = if line.starts_with(PROCEDURE_NAME) {
        &mut metadata.procedure_name
    } else if line.starts_with(PROCEDURE_LOGNAME) {
        &mut metadata.log_name
    } else if line.starts_with(PROCEDURE_SAMPLENAME) {
        &mut metadata.sample_name
    } else if line.starts_with(PROCEDURE_VIALPOSITION) {
        &mut metadata.vial_position
    } else {
        return;
    };
    if let Some((_, value)) = line.split_once(':') {
        *field = value.trim().to_string();
    }
}

/// `200-SPD_2025-12-11_12-27-48` → `2025-12-11 12:27:48`.
///
/// The last two `_`-separated tokens are taken as date and time-of-day;
/// names with fewer than three tokens yield `None`.
pub fn date_time_from_folder_name(name: &str) -> Option<String> {
    let parts: Vec<&str> = name.split('_').collect();
    if parts.len() < 3 {
        return None;
    }
    let date = parts[parts.len() - 2];
    let time = parts[parts.len() - 1].replace('-', ":");
    Some(format!("{date} {time}"))
}
