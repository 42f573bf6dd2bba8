use crate::types::geo::{thin_track, GeoPoint};

const LEAFLET_VERSION: &str = "1.9.4";
const INITIAL_ZOOM: u32 = 10;
const MAX_ZOOM: u32 = 19;
const LINE_COLOR: &str = "red";
const LINE_WEIGHT: f64 = 2.5;

// Remote tile and script assets are fetched by whatever opens the report,
// never by this tool.
pub fn map_document(points: &[GeoPoint]) -> String {
    let thinned = thin_track(points);
    let center = thinned[0];
    let track = thinned
        .iter()
        .map(|point| format!("[{},{}]", point.lat, point.lon))
        .collect::<Vec<_>>()
        .join(",");

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8"/>
<meta name="viewport" content="width=device-width, initial-scale=1.0"/>
<link rel="stylesheet" href="https://unpkg.com/leaflet@{version}/dist/leaflet.css"/>
<script src="https://unpkg.com/leaflet@{version}/dist/leaflet.js"></script>
<style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
var map = L.map('map', {{ maxZoom: {max_zoom} }}).setView([{lat}, {lon}], {zoom});
L.tileLayer('https://tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', {{
  maxZoom: {max_zoom},
  attribution: '&copy; OpenStreetMap contributors'
}}).addTo(map);
var track = [{track}];
L.polyline(track, {{ color: '{color}', weight: {weight}, opacity: 1.0 }}).addTo(map);
L.marker(track[0]).bindPopup('Start Location').addTo(map);
L.marker(track[track.length - 1]).bindPopup('End Location').addTo(map);
</script>
</body>
</html>
"#,
        version = LEAFLET_VERSION,
        max_zoom = MAX_ZOOM,
        lat = center.lat,
        lon = center.lon,
        zoom = INITIAL_ZOOM,
        track = track,
        color = LINE_COLOR,
        weight = LINE_WEIGHT,
    )
}
