pub mod location;
pub mod polar;

use anyhow::Result;
use chrono::NaiveDateTime;

/// Logger exports carry local wall-clock stamps in one of two shapes, with
/// or without a trailing `Z`.
pub(crate) fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    let s = raw.trim().trim_end_matches('Z');
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(ts);
        }
    }
    anyhow::bail!("unrecognized timestamp: {raw}")
}

pub(crate) fn locate_column(
    headers: &csv::StringRecord,
    requested: &str,
    hint: &str,
) -> Result<usize> {
    headers
        .iter()
        .position(|name| name.trim().eq_ignore_ascii_case(requested))
        .ok_or_else(|| anyhow::anyhow!("missing {} column ({})", hint, requested))
}
