use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

use crate::io::{locate_column, parse_timestamp};
use crate::signal::TimeSeries;

const TIMESTAMP_COL: &str = "Phone timestamp";
const RR_COL: &str = "RR-interval [ms]";
const ECG_COL: &str = "ecg [uV]";

/// Polar Sensor Logger RR export: `;`-delimited, RR intervals in ms.
pub fn read_rr(path: &Path) -> Result<TimeSeries> {
    read_polar(path, RR_COL, "RR interval")
        .with_context(|| format!("parsing Polar RR file {}", path.display()))
}

/// Polar Sensor Logger ECG export: `;`-delimited, samples in µV.
pub fn read_ecg(path: &Path) -> Result<TimeSeries> {
    read_polar(path, ECG_COL, "ECG")
        .with_context(|| format!("parsing Polar ECG file {}", path.display()))
}

fn read_polar(path: &Path, value_col: &str, hint: &str) -> Result<TimeSeries> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .from_reader(file);
    let headers = reader.headers().context("reading header")?.clone();
    let ts_idx = locate_column(&headers, TIMESTAMP_COL, "timestamp")?;
    let val_idx = locate_column(&headers, value_col, hint)?;

    let mut t = Vec::new();
    let mut values = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("reading record {}", row + 2))?;
        let stamp = record
            .get(ts_idx)
            .ok_or_else(|| anyhow::anyhow!("row {}: missing timestamp", row + 2))?;
        t.push(parse_timestamp(stamp).with_context(|| format!("row {}", row + 2))?);
        let value = record
            .get(val_idx)
            .ok_or_else(|| anyhow::anyhow!("row {}: missing {} value", row + 2, hint))?
            .trim()
            .parse::<f64>()
            .with_context(|| format!("row {}: parsing {} value", row + 2, hint))?;
        values.push(value);
    }
    log::debug!("read {} samples from {}", values.len(), path.display());
    Ok(TimeSeries { t, values })
}
