use serde::{Deserialize, Serialize};

use crate::enrich::QualifiedEvent;
use crate::signal::{to_epoch_ms, TimeSeries};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Axis {
    pub label: Option<String>,
    /// Fixed axis range; renderers fall back to data bounds when unset.
    pub range: Option<[f64; 2]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Style {
    pub width: f32,
    pub color: Color,
}

#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct Color(pub u32);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineSeries {
    pub name: String,
    pub points: Vec<[f64; 2]>,
    pub style: Style,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScatterSeries {
    pub name: String,
    pub points: Vec<[f64; 2]>,
    pub style: Style,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Series {
    Line(LineSeries),
    Scatter(ScatterSeries),
}

impl Series {
    pub fn points(&self) -> &[[f64; 2]] {
        match self {
            Series::Line(s) => &s.points,
            Series::Scatter(s) => &s.points,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Figure {
    pub title: Option<String>,
    pub x: Axis,
    pub y: Axis,
    pub series: Vec<Series>,
}

impl Figure {
    pub fn new(title: impl Into<Option<String>>) -> Self {
        Self {
            title: title.into(),
            x: Axis {
                label: None,
                range: None,
            },
            y: Axis {
                label: None,
                range: None,
            },
            series: Vec::new(),
        }
    }

    pub fn add_series(&mut self, series: Series) {
        self.series.push(series);
    }
}

pub fn decimate_points(points: &[[f64; 2]], max_points: usize) -> Vec<[f64; 2]> {
    if points.len() <= max_points {
        return points.to_vec();
    }
    let bucket_size = points.len() as f64 / max_points as f64;
    let mut result = Vec::with_capacity(max_points);
    for i in 0..max_points {
        let start = (i as f64 * bucket_size).floor() as usize;
        if start >= points.len() {
            break;
        }
        result.push(points[start]);
    }
    result
}

const ECG_MAX_POINTS: usize = 4096;

/// The three stacked overview panels: RR scatter, SDΔRR line, ECG line.
/// The x axis is seconds from the start of the RR recording, shared
/// across panels.
pub fn overview_figures(
    rr: &TimeSeries,
    sigma: &[Option<f64>],
    ecg: &TimeSeries,
    title: &str,
) -> Vec<Figure> {
    let origin_ms = rr.t.first().map(|ts| to_epoch_ms(*ts)).unwrap_or(0.0);
    let rel_s = |ts| (to_epoch_ms(ts) - origin_ms) / 1000.0;

    let mut rr_fig = Figure::new(Some(title.to_string()));
    rr_fig.y.label = Some("RR(msec)".into());
    rr_fig.add_series(Series::Scatter(ScatterSeries {
        name: "RR".into(),
        points: rr
            .t
            .iter()
            .zip(&rr.values)
            .map(|(ts, v)| [rel_s(*ts), *v])
            .collect(),
        style: Style {
            width: 2.0,
            color: Color(0x1F77B4),
        },
    }));

    let mut sigma_fig = Figure::new(None);
    sigma_fig.y.label = Some("SDΔRR(msec)".into());
    sigma_fig.add_series(Series::Line(LineSeries {
        name: "SDΔRR".into(),
        points: rr
            .t
            .iter()
            .zip(sigma)
            .filter_map(|(ts, s)| s.map(|v| [rel_s(*ts), v]))
            .collect(),
        style: Style {
            width: 1.4,
            color: Color(0xFF7F0E),
        },
    }));

    let mut ecg_fig = Figure::new(None);
    ecg_fig.x.label = Some("time(s)".into());
    ecg_fig.y.label = Some("ECG(µV)".into());
    let ecg_points: Vec<[f64; 2]> = ecg
        .t
        .iter()
        .zip(&ecg.values)
        .map(|(ts, v)| [rel_s(*ts), *v])
        .collect();
    ecg_fig.add_series(Series::Line(LineSeries {
        name: "ECG".into(),
        points: decimate_points(&ecg_points, ECG_MAX_POINTS),
        style: Style {
            width: 1.0,
            color: Color(0x2CA02C),
        },
    }));

    vec![rr_fig, sigma_fig, ecg_fig]
}

/// Poincaré plot of an event: each pair scattered, joined by a faint line.
/// Both axes span `[0, axis_limit_s * 1000]` ms.
pub fn poincare_figure(event: &QualifiedEvent, source: &str, axis_limit_s: f64) -> Figure {
    let title = format!(
        "Poincaré {} {} to {}, {:.1} s, mean HR {:.1} bpm",
        source, event.start_time, event.end_time, event.duration_s, event.mean_hr_bpm
    );
    let mut fig = Figure::new(Some(title));
    let limit = axis_limit_s * 1000.0;
    fig.x = Axis {
        label: Some("RR n (msec)".into()),
        range: Some([0.0, limit]),
    };
    fig.y = Axis {
        label: Some("RR n+1 (msec)".into()),
        range: Some([0.0, limit]),
    };
    fig.add_series(Series::Line(LineSeries {
        name: "trace".into(),
        points: event.poincare.clone(),
        style: Style {
            width: 0.6,
            color: Color(0xC6DBEF),
        },
    }));
    fig.add_series(Series::Scatter(ScatterSeries {
        name: "pairs".into(),
        points: event.poincare.clone(),
        style: Style {
            width: 3.0,
            color: Color(0x1F77B4),
        },
    }));
    fig
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::WarningInterval;
    use chrono::NaiveDate;

    fn rr_series(n: usize) -> TimeSeries {
        let base = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        TimeSeries {
            t: (0..n)
                .map(|i| base + chrono::Duration::seconds(i as i64))
                .collect(),
            values: vec![800.0; n],
        }
    }

    #[test]
    fn decimation_caps_the_point_count() {
        let points: Vec<[f64; 2]> = (0..10_000).map(|i| [i as f64, 0.0]).collect();
        let decimated = decimate_points(&points, 1024);
        assert_eq!(decimated.len(), 1024);
        assert_eq!(decimated[0], points[0]);
    }

    #[test]
    fn overview_has_three_panels_sharing_an_origin() {
        let rr = rr_series(5);
        let sigma = vec![None, Some(10.0), Some(20.0), Some(15.0), None];
        let figs = overview_figures(&rr, &sigma, &rr_series(5), "sample");
        assert_eq!(figs.len(), 3);
        // Undefined dispersion entries are simply absent from the line.
        assert_eq!(figs[1].series[0].points().len(), 3);
        assert_eq!(figs[0].series[0].points()[0][0], 0.0);
    }

    #[test]
    fn poincare_axes_scale_with_the_limit() {
        let rr = rr_series(6);
        let event =
            crate::enrich::enrich_event(&rr, WarningInterval { start: 0, end: 5 }, None);
        let fig = poincare_figure(&event, "rr_sample.csv", 1.2);
        assert_eq!(fig.x.range, Some([0.0, 1200.0]));
        assert_eq!(fig.y.range, Some([0.0, 1200.0]));
        assert_eq!(fig.series.len(), 2);
    }
}
