use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::data::model::{Point, PointSet};

pub const DEFAULT_ZOOM: u8 = 10;
pub const DEFAULT_TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
const DEFAULT_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

const PAYLOAD_MARKER: &str = "__MAP_PAYLOAD__";

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("no valid points to show on the map")]
    NoPoints,

    #[error("cannot compute a finite map center from the points")]
    NoCentroid,

    #[error("cannot encode map data: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("cannot write preview file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot open {} in the browser: {source}", path.display())]
    Browser {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Tunables for the generated web map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    /// Initial Leaflet zoom level.
    pub zoom_start: u8,
    /// Tile URL template with `{z}`, `{x}`, `{y}` placeholders.
    pub tile_url: String,
    /// Attribution HTML shown in the map corner.
    pub attribution: String,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            zoom_start: DEFAULT_ZOOM,
            tile_url: DEFAULT_TILE_URL.to_string(),
            attribution: DEFAULT_ATTRIBUTION.to_string(),
        }
    }
}

/// Everything the page script needs, embedded as one JSON object.
#[derive(Serialize)]
struct MapPayload<'a> {
    center: [f64; 2],
    zoom: u8,
    tiles: &'a str,
    attribution: &'a str,
    points: &'a [Point],
}

// ---------------------------------------------------------------------------
// HTML rendering
// ---------------------------------------------------------------------------

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Point preview</title>
<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/leaflet@1.9.4/dist/leaflet.css">
<script src="https://cdn.jsdelivr.net/npm/leaflet@1.9.4/dist/leaflet.js"></script>
<style>html, body, #map { height: 100%; margin: 0; }</style>
</head>
<body>
<div id="map"></div>
<script>
const data = __MAP_PAYLOAD__;
const map = L.map("map").setView(data.center, data.zoom);
L.tileLayer(data.tiles, { maxZoom: 19, attribution: data.attribution }).addTo(map);
for (const p of data.points) {
  const marker = L.marker([p.lat, p.lon]).addTo(map);
  if (p.name) {
    const label = document.createElement("div");
    label.textContent = p.name;
    marker.bindPopup(label);
  }
}
</script>
</body>
</html>
"#;

/// Build a standalone Leaflet page centered on the mean of `points`.
pub fn render_map_html(points: &PointSet, options: &MapOptions) -> Result<String, RenderError> {
    if points.is_empty() {
        return Err(RenderError::NoPoints);
    }
    let (lat, lon) = points.centroid().ok_or(RenderError::NoCentroid)?;

    let payload = MapPayload {
        center: [lat, lon],
        zoom: options.zoom_start,
        tiles: &options.tile_url,
        attribution: &options.attribution,
        points: &points.points,
    };
    // No raw `<` in the script body, so names cannot open `</script` or `<!--`.
    let json = serde_json::to_string(&payload)?.replace('<', "\\u003c");

    Ok(PAGE_TEMPLATE.replace(PAYLOAD_MARKER, &json))
}

/// Render the map into a temporary `.html` file that outlives the process.
pub fn write_preview(points: &PointSet, options: &MapOptions) -> Result<PathBuf, RenderError> {
    let html = render_map_html(points, options)?;

    let mut file = tempfile::Builder::new()
        .prefix("csv-kml-preview-")
        .suffix(".html")
        .tempfile()?;
    file.write_all(html.as_bytes())?;
    let (_, path) = file.keep().map_err(|e| RenderError::Io(e.error))?;

    log::info!(
        "Wrote map preview with {} markers to {}",
        points.len(),
        path.display()
    );
    Ok(path)
}

/// Hand the preview file to the system's default browser.
pub fn open_in_browser(path: &Path) -> Result<(), RenderError> {
    open::that(path).map_err(|source| RenderError::Browser {
        path: path.to_path_buf(),
        source,
    })
}
