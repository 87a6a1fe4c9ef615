use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamped sample series (RR intervals in ms, ECG in µV).
///
/// Timestamps are non-decreasing by invariant; the loader does not
/// validate this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSeries {
    /// Wall-clock timestamps from the sensor logger.
    pub t: Vec<NaiveDateTime>,
    /// Samples.
    pub values: Vec<f64>,
}

impl TimeSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
    /// Timestamps as f64 epoch milliseconds, the numeric axis used for
    /// interpolation against other series.
    pub fn epoch_ms(&self) -> Vec<f64> {
        self.t.iter().map(|ts| to_epoch_ms(*ts)).collect()
    }
}

/// GPS track; individual rows may be missing a coordinate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoTrack {
    pub t: Vec<NaiveDateTime>,
    pub lat: Vec<Option<f64>>,
    pub lon: Vec<Option<f64>>,
}

impl GeoTrack {
    pub fn len(&self) -> usize {
        self.t.len()
    }
    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }
}

pub fn to_epoch_ms(ts: NaiveDateTime) -> f64 {
    ts.and_utc().timestamp_millis() as f64
}
