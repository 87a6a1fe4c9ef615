use crate::signal::{to_epoch_ms, GeoTrack};
use serde::{Deserialize, Serialize};

/// Track rows usable as an interpolation basis: epoch-millisecond
/// timestamps with every row carrying both coordinates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleanTrack {
    pub t_ms: Vec<f64>,
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
}

impl CleanTrack {
    pub fn is_empty(&self) -> bool {
        self.t_ms.is_empty()
    }

    /// (lat, lon) pairs for polyline rendering.
    pub fn positions(&self) -> Vec<[f64; 2]> {
        self.lat
            .iter()
            .zip(&self.lon)
            .map(|(la, lo)| [*la, *lo])
            .collect()
    }
}

/// Drop rows with a missing coordinate before interpolation. Removing
/// them from the basis (rather than from the output) changes the
/// interpolation result across the gap, which is the intended behavior.
pub fn clean_track(track: &GeoTrack) -> CleanTrack {
    let mut out = CleanTrack::default();
    for i in 0..track.len() {
        if let (Some(lat), Some(lon)) = (track.lat[i], track.lon[i]) {
            out.t_ms.push(to_epoch_ms(track.t[i]));
            out.lat.push(lat);
            out.lon.push(lon);
        }
    }
    out
}

/// Positions interpolated from the basis track at each query timestamp.
/// An empty basis yields an empty subpath.
pub fn subpath(t_ms: &[f64], basis: &CleanTrack) -> Vec<[f64; 2]> {
    if basis.is_empty() {
        return Vec::new();
    }
    let lats = interp(t_ms, &basis.t_ms, &basis.lat);
    let lons = interp(t_ms, &basis.t_ms, &basis.lon);
    lats.into_iter().zip(lons).map(|(la, lo)| [la, lo]).collect()
}

/// Piecewise-linear interpolation of `fp` over knots `xp` at points `xs`,
/// clamped to the end values outside the knot range. `xp` is ascending by
/// the timestamp monotonicity invariant.
pub fn interp(xs: &[f64], xp: &[f64], fp: &[f64]) -> Vec<f64> {
    xs.iter().map(|&x| interp_one(x, xp, fp)).collect()
}

fn interp_one(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    if x <= xp[0] {
        return fp[0];
    }
    if x >= xp[xp.len() - 1] {
        return fp[fp.len() - 1];
    }
    // First knot at or to the right of x.
    let hi = xp.partition_point(|&v| v < x);
    let lo = hi - 1;
    if xp[hi] == xp[lo] {
        return fp[lo];
    }
    let frac = (x - xp[lo]) / (xp[hi] - xp[lo]);
    fp[lo] + frac * (fp[hi] - fp[lo])
}
