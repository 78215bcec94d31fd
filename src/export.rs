use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::data::model::TimeSeries;

// ---------------------------------------------------------------------------
// CSV export of a single series
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct SampleRow {
    time_s: f64,
    value: f64,
}

/// Write `time_s,value` rows in series order.
pub fn write_series_csv<W: Write>(series: &TimeSeries, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for (time_s, value) in series.points() {
        writer
            .serialize(SampleRow { time_s, value })
            .context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV output")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON export
// ---------------------------------------------------------------------------

/// Pretty-print any serializable value followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(value: &T, mut out: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, value).context("serializing JSON")?;
    writeln!(out).context("writing JSON output")?;
    Ok(())
}
