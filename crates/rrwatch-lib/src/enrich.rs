use crate::events::{interval_duration_s, WarningInterval};
use crate::geo::{self, CleanTrack};
use crate::signal::{to_epoch_ms, TimeSeries};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A warning interval that met the duration criterion, carrying the
/// summary attributes the renderers consume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualifiedEvent {
    pub interval: WarningInterval,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub duration_s: f64,
    pub mean_hr_bpm: f64,
    /// Consecutive (RRn, RRn+1) pairs for the Poincaré plot.
    pub poincare: Vec<[f64; 2]>,
    /// Event positions interpolated from the GPS track, when one was
    /// supplied.
    pub geo_subpath: Option<Vec<[f64; 2]>>,
}

/// Build a [`QualifiedEvent`] from a qualified interval over the RR series
/// and an optional cleaned GPS track.
pub fn enrich_event(
    rr: &TimeSeries,
    w: WarningInterval,
    basis: Option<&CleanTrack>,
) -> QualifiedEvent {
    let subset = &rr.values[w.start..=w.end];

    // The Poincaré x sequence drops the last two samples; y is x shifted
    // by one, pairing each interval with its successor.
    let xlen = subset.len().saturating_sub(2);
    let poincare: Vec<[f64; 2]> = (0..xlen).map(|i| [subset[i], subset[i + 1]]).collect();

    // Mean heart rate via count/sum over the x sequence: 60000 ms per
    // minute divided by the mean RR interval in ms.
    let sum: f64 = subset[..xlen].iter().sum();
    let mean_hr_bpm = if sum > 0.0 {
        60_000.0 * xlen as f64 / sum
    } else {
        0.0
    };

    let geo_subpath = basis.map(|b| {
        let t_ms: Vec<f64> = rr.t[w.start..w.end].iter().map(|ts| to_epoch_ms(*ts)).collect();
        geo::subpath(&t_ms, b)
    });

    QualifiedEvent {
        interval: w,
        start_time: rr.t[w.start],
        end_time: rr.t[w.end],
        duration_s: interval_duration_s(&rr.t, w),
        mean_hr_bpm,
        poincare,
        geo_subpath,
    }
}
