use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Episode segmentation parameters.
#[derive(Debug, Clone, Copy)]
pub struct SegmenterConfig {
    /// SDΔRR warning threshold (ms).
    pub threshold_ms: f64,
    /// Minimum episode duration (seconds); the "sustained" criterion that
    /// separates real episodes from brief noise spikes.
    pub min_duration_s: f64,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            threshold_ms: 50.0,
            min_duration_s: 20.0,
        }
    }
}

/// Maximal contiguous run of above-threshold dispersion.
///
/// `start` indexes the first warning sample of the run; `end` the first
/// sample after it. `end` stays in bounds as long as the tail of the
/// dispersion series is undefined, which the estimator guarantees for any
/// positive half-width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningInterval {
    pub start: usize,
    pub end: usize,
}

/// Extract maximal above-threshold runs from a dispersion series.
/// Undefined entries never warn.
pub fn warning_intervals(sigma: &[Option<f64>], threshold_ms: f64) -> Vec<WarningInterval> {
    let warn: Vec<bool> = sigma
        .iter()
        .map(|s| s.map_or(false, |v| v > threshold_ms))
        .collect();

    // False sentinels on both sides force the sequence to start and end
    // low, so edge transitions always come in rising/falling pairs.
    let mut padded = Vec::with_capacity(warn.len() + 2);
    padded.push(false);
    padded.extend_from_slice(&warn);
    padded.push(false);

    let mut transitions = Vec::new();
    for p in 0..padded.len() - 1 {
        if padded[p] != padded[p + 1] {
            // The leading pad shifts every sample up by one position and
            // the edge between padded[p] and padded[p+1] is recorded as p,
            // so p already indexes the unpadded series: a rising edge
            // lands on the first warning sample, a falling edge on the
            // first sample after the run.
            transitions.push(p);
        }
    }
    debug_assert_eq!(transitions.len() % 2, 0);

    transitions
        .chunks_exact(2)
        .map(|pair| WarningInterval {
            start: pair[0],
            end: pair[1],
        })
        .collect()
}

/// Interval duration in seconds, from the unpadded RR timestamps.
pub fn interval_duration_s(t: &[NaiveDateTime], w: WarningInterval) -> f64 {
    (t[w.end] - t[w.start]).num_milliseconds() as f64 / 1000.0
}

/// Keep intervals meeting the sustained-duration criterion. A duration of
/// exactly `min_duration_s` is retained.
pub fn qualify(
    intervals: &[WarningInterval],
    t: &[NaiveDateTime],
    cfg: &SegmenterConfig,
) -> Vec<WarningInterval> {
    intervals
        .iter()
        .copied()
        .filter(|w| interval_duration_s(t, *w) >= cfg.min_duration_s)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn stamps_ms(offsets_ms: &[i64]) -> Vec<NaiveDateTime> {
        let base = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        offsets_ms
            .iter()
            .map(|ms| base + chrono::Duration::milliseconds(*ms))
            .collect()
    }

    #[test]
    fn no_warnings_yields_no_intervals() {
        let sigma = vec![None, Some(10.0), Some(49.9), None];
        assert!(warning_intervals(&sigma, 50.0).is_empty());
    }

    #[test]
    fn undefined_entries_never_warn() {
        let sigma = vec![None, None, Some(80.0), None, None];
        let runs = warning_intervals(&sigma, 50.0);
        assert_eq!(runs, vec![WarningInterval { start: 2, end: 3 }]);
    }

    #[test]
    fn run_indices_align_with_the_unpadded_series() {
        // warn pattern: F T T F F T F
        let sigma = vec![
            Some(1.0),
            Some(60.0),
            Some(70.0),
            Some(2.0),
            Some(3.0),
            Some(55.0),
            Some(4.0),
        ];
        let runs = warning_intervals(&sigma, 50.0);
        assert_eq!(
            runs,
            vec![
                WarningInterval { start: 1, end: 3 },
                WarningInterval { start: 5, end: 6 },
            ]
        );
    }

    #[test]
    fn boundary_runs_are_captured() {
        let sigma = vec![Some(90.0), Some(90.0), Some(1.0), Some(90.0)];
        let runs = warning_intervals(&sigma, 50.0);
        assert_eq!(runs[0], WarningInterval { start: 0, end: 2 });
        // A run reaching the last sample ends one past it.
        assert_eq!(runs[1], WarningInterval { start: 3, end: 4 });
    }

    #[test]
    fn transition_count_is_always_even() {
        let patterns: [&[bool]; 5] = [
            &[true],
            &[false],
            &[true, false, true, true, false],
            &[false, true, true, true],
            &[true, true, false, false, true, false, true],
        ];
        for warn in patterns {
            let sigma: Vec<Option<f64>> = warn
                .iter()
                .map(|w| Some(if *w { 100.0 } else { 0.0 }))
                .collect();
            let runs = warning_intervals(&sigma, 50.0);
            for w in &runs {
                assert!(w.start < w.end);
            }
            let expected: usize = {
                let mut count = 0;
                let mut prev = false;
                for &v in warn {
                    if v != prev {
                        count += 1;
                    }
                    prev = v;
                }
                if prev {
                    count += 1;
                }
                count
            };
            assert_eq!(runs.len() * 2, expected);
        }
    }

    #[test]
    fn duration_filter_keeps_exact_minimum() {
        let t = stamps_ms(&[0, 20_000, 39_999, 80_000]);
        let runs = vec![
            WarningInterval { start: 0, end: 1 }, // exactly 20.0 s
            WarningInterval { start: 1, end: 2 }, // 19.999 s
        ];
        let kept = qualify(&runs, &t, &SegmenterConfig::default());
        assert_eq!(kept, vec![WarningInterval { start: 0, end: 1 }]);
    }

    #[test]
    fn all_undefined_series_yields_zero_events() {
        let sigma: Vec<Option<f64>> = vec![None; 70];
        let runs = warning_intervals(&sigma, 50.0);
        assert!(runs.is_empty());
    }
}
