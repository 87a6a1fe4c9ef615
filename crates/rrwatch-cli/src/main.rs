mod map;

use anyhow::Result;
use clap::Parser;
use plotters::coord::Shift;
use plotters::prelude::*;
use rrwatch_lib::{
    enrich::{enrich_event, QualifiedEvent},
    events::{qualify, warning_intervals, SegmenterConfig},
    geo::clean_track,
    io::{location, polar},
    metrics::dispersion::{dispersion_series, DispersionConfig},
    plot::{overview_figures, poincare_figure, Axis, Figure, Series},
};
use std::ops::Range;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "rrwatch",
    version,
    about = "Polar Sensor Logger RR and ECG analyzer"
)]
struct Cli {
    /// Input Polar RR file
    rrsrc: PathBuf,
    /// Input Polar ECG file
    ecgsrc: PathBuf,
    /// Input location file
    #[arg(long, short = 'l')]
    location: Option<PathBuf>,
    /// Maximum axis value for Poincaré plots (seconds)
    #[arg(long, short = 'a', default_value_t = 1.0)]
    axislimit: f64,
    /// SDΔRR warning threshold (msec)
    #[arg(long, short = 't', default_value_t = 50.0)]
    threshold: f64,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let rr = polar::read_rr(&cli.rrsrc)?;
    log::info!("parsed {} RR samples from {}", rr.len(), cli.rrsrc.display());
    let ecg = polar::read_ecg(&cli.ecgsrc)?;
    log::info!("parsed {} ECG samples from {}", ecg.len(), cli.ecgsrc.display());
    let track = match &cli.location {
        Some(path) => Some(location::read_track(path)?),
        None => None,
    };

    let sigma = dispersion_series(&rr.values, &DispersionConfig::default());

    let source = cli
        .rrsrc
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let overview_path = sibling(&cli.rrsrc, "-overview.png");
    render_overview(&overview_path, &overview_figures(&rr, &sigma, &ecg, &source))?;
    log::info!("wrote {}", overview_path.display());

    let seg = SegmenterConfig {
        threshold_ms: cli.threshold,
        ..Default::default()
    };
    let qualified = qualify(&warning_intervals(&sigma, seg.threshold_ms), &rr.t, &seg);
    if qualified.is_empty() {
        log::info!("no sustained episodes above {} msec", seg.threshold_ms);
        return Ok(());
    }

    eprintln!("Suspicious events found in {}", cli.rrsrc.display());
    let basis = track.as_ref().map(clean_track);
    let mut events: Vec<QualifiedEvent> = Vec::new();
    for (figno, w) in qualified.iter().enumerate() {
        let event = enrich_event(&rr, *w, basis.as_ref());
        println!(
            "warning from {} to {}, duration {} seconds.",
            event.start_time, event.end_time, event.duration_s
        );
        let path = sibling(&cli.rrsrc, &format!("-{figno}.png"));
        render_single(&path, &poincare_figure(&event, &source, cli.axislimit), (1000, 1000))?;
        log::info!("wrote {}", path.display());
        events.push(event);
    }

    if let (Some(loc), Some(basis)) = (&cli.location, &basis) {
        let map_path = loc.with_extension("html");
        map::write_event_map(&map_path, &basis.positions(), &events)?;
        log::info!("wrote {}", map_path.display());
    }
    Ok(())
}

/// Artifact path derived from an input file: same directory, same stem,
/// with a suffix appended.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "out".into());
    path.with_file_name(format!("{stem}{suffix}"))
}

fn render_overview(path: &Path, figures: &[Figure]) -> Result<()> {
    let root = BitMapBackend::new(path, (1800, 900)).into_drawing_area();
    root.fill(&WHITE)?;
    let areas = root.split_evenly((figures.len(), 1));
    for (area, fig) in areas.iter().zip(figures) {
        draw_chart(area, fig)?;
    }
    root.present()?;
    Ok(())
}

fn render_single(path: &Path, fig: &Figure, size: (u32, u32)) -> Result<()> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    draw_chart(&root, fig)?;
    root.present()?;
    Ok(())
}

fn draw_chart(area: &DrawingArea<BitMapBackend, Shift>, fig: &Figure) -> Result<()> {
    let x_range = axis_range(fig, &fig.x, 0);
    let y_range = axis_range(fig, &fig.y, 1);
    let mut builder = ChartBuilder::on(area);
    builder
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(60);
    if let Some(title) = &fig.title {
        builder.caption(title, ("sans-serif", 20));
    }
    let mut chart = builder.build_cartesian_2d(x_range, y_range)?;
    let mut mesh = chart.configure_mesh();
    if let Some(label) = &fig.x.label {
        mesh.x_desc(label);
    }
    if let Some(label) = &fig.y.label {
        mesh.y_desc(label);
    }
    mesh.draw()?;
    for series in &fig.series {
        match series {
            Series::Line(line) => {
                chart.draw_series(plotters::series::LineSeries::new(
                    line.points.iter().map(|p| (p[0], p[1])),
                    rgb(line.style.color.0).stroke_width(line.style.width.max(1.0) as u32),
                ))?;
            }
            Series::Scatter(scatter) => {
                let color = rgb(scatter.style.color.0);
                chart.draw_series(scatter.points.iter().map(|p| {
                    Circle::new(
                        (p[0], p[1]),
                        scatter.style.width.max(1.0) as i32,
                        color.filled(),
                    )
                }))?;
            }
        }
    }
    Ok(())
}

fn axis_range(fig: &Figure, axis: &Axis, dim: usize) -> Range<f64> {
    if let Some([lo, hi]) = axis.range {
        return lo..hi;
    }
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for series in &fig.series {
        for p in series.points() {
            lo = lo.min(p[dim]);
            hi = hi.max(p[dim]);
        }
    }
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    if lo == hi {
        return lo - 0.5..hi + 0.5;
    }
    let pad = (hi - lo) * 0.03;
    lo - pad..hi + pad
}

fn rgb(color: u32) -> RGBColor {
    RGBColor(
        ((color >> 16) & 0xFF) as u8,
        ((color >> 8) & 0xFF) as u8,
        (color & 0xFF) as u8,
    )
}
