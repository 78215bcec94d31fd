use std::path::Path;

use crate::error::TraceError;

use super::model::TimeSeries;
use super::time::parse_time_to_seconds;

/// Label used when the header carries no second field.
pub const UNKNOWN_METRIC: &str = "Unknown";

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Parse a pump metric file, degrading every failure to `None`.
///
/// I/O problems are logged; structural problems (too short, no valid rows)
/// are expected on interrupted runs and only logged at debug level.
pub fn parse_series(path: &Path) -> Option<TimeSeries> {
    match load_series(path) {
        Ok(series) => Some(series),
        Err(e @ TraceError::Io { .. }) => {
            log::warn!("Error parsing metric file: {e}");
            None
        }
        Err(e) => {
            log::debug!("No data: {e}");
            None
        }
    }
}

/// Parse a pump metric file, reporting why nothing came out of it.
///
/// Layout:
///
/// ```text
/// Time<TAB>Pressure(bar)
/// 00:00:00.000<TAB>10.0
/// 00:00:00.500<TAB>10.4
/// ```
///
/// Rows with fewer than two fields, an undecodable timestamp or a
/// non-numeric value are skipped. Row order is preserved as written.
pub fn load_series(path: &Path) -> Result<TimeSeries, TraceError> {
    let text = std::fs::read_to_string(path).map_err(|source| TraceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_series_text(&text).ok_or_else(|| {
        let lines = split_lines(&text).count();
        if lines < 2 {
            TraceError::TooShort {
                path: path.to_path_buf(),
                lines,
            }
        } else {
            TraceError::NoSamples {
                path: path.to_path_buf(),
            }
        }
    })
}

// ---------------------------------------------------------------------------
// Text parsing
// ---------------------------------------------------------------------------

/// Parse the full text of a metric file. `None` means "no data".
pub fn parse_series_text(text: &str) -> Option<TimeSeries> {
    let mut lines = split_lines(text);
    let header = lines.next()?;
    // A header on its own carries no samples.
    let mut rows = lines.peekable();
    rows.peek()?;

    let metric_info = header
        .trim()
        .split('\t')
        .nth(1)
        .unwrap_or(UNKNOWN_METRIC);
    let mut series = TimeSeries::new(metric_info);

    for line in rows {
        if let Some((time, value)) = parse_row(line) {
            series.push(time, value);
        }
    }

    if series.is_empty() {
        None
    } else {
        Some(series)
    }
}

/// Split on `\n`, `\r\n` or a bare `\r`, as instrument PCs write all three.
/// A trailing terminator does not start an extra empty line.
pub(crate) fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        match rest.find(['\r', '\n']) {
            Some(i) => {
                let line = &rest[..i];
                let terminator = if rest[i..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[i + terminator..];
                Some(line)
            }
            None => Some(std::mem::take(&mut rest)),
        }
    })
}

fn parse_row(line: &str) -> Option<(f64, f64)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let mut fields = line.split('\t');
    let time_field = fields.next()?;
    let value_field = fields.next()?;
    let time = parse_time_to_seconds(time_field)?;
    let value = value_field.trim().parse::<f64>().ok()?;
    Some((time, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn skips_rows_with_non_numeric_values() {
        let dir = tempdir().unwrap();
        let path = write(
            dir.path(),
            "Pump-HP_Pressure.txt",
            "Time\tPressure(bar)\n00:00:00.000\t10.0\n00:00:01.000\tabc\n00:00:02.000\t12.5\n",
        );

        let series = parse_series(&path).expect("series");
        assert_eq!(series.metric_info, "Pressure(bar)");
        assert_eq!(series.points().collect::<Vec<_>>(), vec![(0.0, 10.0), (2.0, 12.5)]);
    }

    #[test]
    fn header_only_or_empty_file_is_no_data() {
        let dir = tempdir().unwrap();
        let one_line = write(dir.path(), "a.txt", "Time\tPressure(bar)\n");
        let empty = write(dir.path(), "b.txt", "");

        assert!(parse_series(&one_line).is_none());
        assert!(parse_series(&empty).is_none());
        assert!(matches!(
            load_series(&one_line),
            Err(TraceError::TooShort { lines: 1, .. })
        ));
    }

    #[test]
    fn missing_file_is_no_data() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Pump-HP_Gone.txt");
        assert!(parse_series(&path).is_none());
        assert!(matches!(load_series(&path), Err(TraceError::Io { .. })));
    }

    #[test]
    fn all_rows_malformed_is_no_data() {
        let text = "Time\tFlow\n00:00\t1.0\nnot-a-time\t2.0\n00:00:01.000\n";
        assert!(parse_series_text(text).is_none());
    }

    #[test]
    fn header_without_label_uses_unknown() {
        let series = parse_series_text("Time\n00:00:01.000\t3.0\n").unwrap();
        assert_eq!(series.metric_info, UNKNOWN_METRIC);
    }

    #[test]
    fn keeps_file_order_and_duplicates() {
        let text = "Time\tP\n00:00:02.000\t2.0\n00:00:01.000\t1.0\n00:00:01.000\t1.0\n\n\n";
        let series = parse_series_text(text).unwrap();
        assert_eq!(series.times, vec![2.0, 1.0, 1.0]);
        assert_eq!(series.values, vec![2.0, 1.0, 1.0]);
    }

    #[test]
    fn tolerates_crlf_and_extra_columns() {
        let text = "Time\tFlow(uL/min)\r\n00:00:00.500\t1.25\textra\r\n";
        let series = parse_series_text(text).unwrap();
        assert_eq!(series.metric_info, "Flow(uL/min)");
        assert_eq!(series.points().collect::<Vec<_>>(), vec![(0.5, 1.25)]);
    }

    #[test]
    fn bare_carriage_returns_end_lines() {
        let series = parse_series_text("Time\tP\r00:00:00.000\t1.0\r00:00:01.000\t2.0\r").unwrap();
        assert_eq!(series.metric_info, "P");
        assert_eq!(series.values, vec![1.0, 2.0]);
    }

    #[test]
    fn split_lines_matches_line_counting_rules() {
        assert_eq!(split_lines("a\nb\r\nc\rd").collect::<Vec<_>>(), ["a", "b", "c", "d"]);
        assert_eq!(split_lines("a\n\n").collect::<Vec<_>>(), ["a", ""]);
        assert_eq!(split_lines("").count(), 0);
    }

    #[test]
    fn repeated_parse_is_identical() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "p.txt", "Time\tP\n00:00:00.000\t1.0\n");
        assert_eq!(parse_series(&path), parse_series(&path));
    }
}
