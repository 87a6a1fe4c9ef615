/// Parameters of the robust SDΔRR dispersion estimator.
#[derive(Debug, Clone, Copy)]
pub struct DispersionConfig {
    /// Window half-width K: each estimate uses the 2K first differences
    /// surrounding the sample.
    pub half_width: usize,
    /// Scale from interquartile range to standard deviation under a
    /// normality assumption.
    pub iqr_to_sigma: f64,
}

impl Default for DispersionConfig {
    fn default() -> Self {
        Self {
            half_width: 32,
            iqr_to_sigma: 1.349,
        }
    }
}

/// Rolling robust dispersion of RR first differences ("SDΔRR", ms).
///
/// The output is aligned index-for-index with `rr`. Entries whose window
/// would leave the defined region are `None`: indices `[0, K)` and
/// `[n-K, n)`, plus `K` itself because its window touches the undefined
/// first difference of the series. An input of length `n <= 2K` yields an
/// all-`None` series; downstream stages treat that as "no events".
///
/// The IQR-based estimate ignores the quartile tails, so single ectopic
/// beats or sensor glitches do not inflate it the way RMSSD would.
pub fn dispersion_series(rr: &[f64], cfg: &DispersionConfig) -> Vec<Option<f64>> {
    let n = rr.len();
    let k = cfg.half_width;
    let mut out = vec![None; n];
    if k == 0 || n <= 2 * k {
        return out;
    }

    // diff[0] has no predecessor and stays undefined.
    let mut diff: Vec<Option<f64>> = Vec::with_capacity(n);
    diff.push(None);
    for i in 1..n {
        diff.push(Some(rr[i] - rr[i - 1]));
    }

    let mut window = Vec::with_capacity(2 * k);
    for (idx, slot) in out.iter_mut().enumerate().take(n - k).skip(k) {
        window.clear();
        let mut defined = true;
        for d in &diff[idx - k..idx + k] {
            match d {
                Some(v) => window.push(*v),
                None => {
                    defined = false;
                    break;
                }
            }
        }
        if !defined {
            // Only idx == K reaches diff[0]; undefined propagates.
            continue;
        }
        window.sort_unstable_by(f64::total_cmp);
        let p25 = percentile_sorted(&window, 25.0);
        let p75 = percentile_sorted(&window, 75.0);
        *slot = Some((p75 - p25) / cfg.iqr_to_sigma);
    }
    out
}

/// Percentile of a pre-sorted slice by linear interpolation between order
/// statistics (the numpy default definition).
fn percentile_sorted(sorted: &[f64], q: f64) -> f64 {
    let m = sorted.len();
    if m == 1 {
        return sorted[0];
    }
    let rank = (m - 1) as f64 * q / 100.0;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= tol,
            "expected {expected}, got {actual} (diff {diff} > tol {tol})"
        );
    }

    fn small_cfg(k: usize) -> DispersionConfig {
        DispersionConfig {
            half_width: k,
            ..Default::default()
        }
    }

    #[test]
    fn percentile_interpolates_between_order_statistics() {
        let sorted = [-50.0, 20.0, 100.0, 380.0];
        assert_close(percentile_sorted(&sorted, 25.0), 2.5, 1e-12);
        assert_close(percentile_sorted(&sorted, 75.0), 170.0, 1e-12);
        assert_close(percentile_sorted(&sorted, 0.0), -50.0, 1e-12);
        assert_close(percentile_sorted(&sorted, 100.0), 380.0, 1e-12);
    }

    #[test]
    fn short_series_is_entirely_undefined() {
        let rr = vec![800.0; 64];
        let sigma = dispersion_series(&rr, &DispersionConfig::default());
        assert_eq!(sigma.len(), rr.len());
        assert!(sigma.iter().all(Option::is_none));
    }

    #[test]
    fn window_touching_first_difference_stays_undefined() {
        let rr: Vec<f64> = (0..10).map(|i| 800.0 + i as f64).collect();
        let sigma = dispersion_series(&rr, &small_cfg(2));
        // [0, K) and [n-K, n) are outside the defined region; K itself
        // reaches diff[0].
        assert!(sigma[0].is_none());
        assert!(sigma[1].is_none());
        assert!(sigma[2].is_none());
        assert!(sigma[3].is_some());
        assert!(sigma[7].is_some());
        assert!(sigma[8].is_none());
        assert!(sigma[9].is_none());
    }

    #[test]
    fn spike_scenario_produces_expected_values() {
        // RR jumps at the middle indices drive SDΔRR well over 50 ms.
        let rr = [800.0, 820.0, 1200.0, 1300.0, 1250.0, 820.0, 800.0];
        let sigma = dispersion_series(&rr, &small_cfg(2));
        assert!(sigma[2].is_none());
        assert_close(sigma[3].unwrap(), 167.5 / 1.349, 1e-9);
        assert_close(sigma[4].unwrap(), 315.0 / 1.349, 1e-9);
        assert!(sigma[3].unwrap() > 50.0);
        assert!(sigma[4].unwrap() > 50.0);
        assert!(sigma[5].is_none());
    }

    #[test]
    fn estimate_is_invariant_under_window_order() {
        // Two series whose windows hold the same differences in opposite
        // order must agree.
        let diffs_a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let diffs_b = [4.0, 3.0, 2.0, 1.0, 5.0];
        let cumsum = |diffs: &[f64]| {
            let mut rr = vec![800.0];
            for d in diffs {
                rr.push(rr.last().unwrap() + d);
            }
            rr
        };
        let sigma_a = dispersion_series(&cumsum(&diffs_a), &small_cfg(2));
        let sigma_b = dispersion_series(&cumsum(&diffs_b), &small_cfg(2));
        assert_close(sigma_a[3].unwrap(), sigma_b[3].unwrap(), 1e-12);
    }

    #[test]
    fn estimates_are_non_negative() {
        let rr = [
            810.0, 790.0, 845.0, 802.0, 799.0, 830.0, 825.0, 780.0, 815.0, 805.0,
        ];
        let sigma = dispersion_series(&rr, &small_cfg(3));
        for value in sigma.into_iter().flatten() {
            assert!(value >= 0.0);
        }
    }
}
