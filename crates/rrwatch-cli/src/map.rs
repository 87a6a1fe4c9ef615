use anyhow::{Context, Result};
use rrwatch_lib::enrich::QualifiedEvent;
use std::path::Path;

/// Write a self-contained Leaflet page: the full cleaned track as a blue
/// polyline, each event subpath in red with a red circle at its start and
/// a green one at its end, bounds fitted to the track.
pub fn write_event_map(path: &Path, track: &[[f64; 2]], events: &[QualifiedEvent]) -> Result<()> {
    let subpaths: Vec<&Vec<[f64; 2]>> = events
        .iter()
        .filter_map(|e| e.geo_subpath.as_ref())
        .filter(|p| !p.is_empty())
        .collect();
    let html = render_page(
        &serde_json::to_string(track)?,
        &serde_json::to_string(&subpaths)?,
    );
    std::fs::write(path, html).with_context(|| format!("writing map {}", path.display()))
}

fn render_page(track_json: &str, subpaths_json: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8"/>
<title>rrwatch event map</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css"/>
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
const track = {track_json};
const subpaths = {subpaths_json};
const map = L.map("map");
L.tileLayer("https://tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png", {{
  attribution: "&copy; OpenStreetMap contributors"
}}).addTo(map);
const trackLine = L.polyline(track).addTo(map);
for (const path of subpaths) {{
  L.polyline(path, {{ color: "red" }}).addTo(map);
  L.circle(path[0], {{ color: "red", fill: true, radius: 10 }}).addTo(map);
  L.circle(path[path.length - 1], {{ color: "green", fill: true, radius: 10 }}).addTo(map);
}}
map.fitBounds(trackLine.getBounds().pad(0.05));
</script>
</body>
</html>
"#
    )
}
