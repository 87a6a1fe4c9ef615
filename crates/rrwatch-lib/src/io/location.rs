use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

use crate::io::{locate_column, parse_timestamp};
use crate::signal::GeoTrack;

const TIME_COL: &str = "time";
const LAT_COL: &str = "lat";
const LON_COL: &str = "lon";

/// Location export: `,`-delimited `time,lat,lon` rows. Empty or
/// unparseable coordinates become `None` and are excluded from the
/// interpolation basis later, not here.
pub fn read_track(path: &Path) -> Result<GeoTrack> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut reader = ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .from_reader(file);
    let headers = reader.headers().context("reading header")?.clone();
    let time_idx = locate_column(&headers, TIME_COL, "time")?;
    let lat_idx = locate_column(&headers, LAT_COL, "latitude")?;
    let lon_idx = locate_column(&headers, LON_COL, "longitude")?;

    let mut track = GeoTrack {
        t: Vec::new(),
        lat: Vec::new(),
        lon: Vec::new(),
    };
    for (row, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("reading record {}", row + 2))?;
        let stamp = record
            .get(time_idx)
            .ok_or_else(|| anyhow::anyhow!("row {}: missing time", row + 2))?;
        track.t.push(parse_timestamp(stamp).with_context(|| format!("row {}", row + 2))?);
        track
            .lat
            .push(record.get(lat_idx).and_then(|v| v.trim().parse::<f64>().ok()));
        track
            .lon
            .push(record.get(lon_idx).and_then(|v| v.trim().parse::<f64>().ok()));
    }
    log::debug!("read {} track points from {}", track.len(), path.display());
    Ok(track)
}
