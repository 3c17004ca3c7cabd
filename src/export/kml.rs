use std::path::{Path, PathBuf};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::writer::Writer;

use crate::data::model::{file_stem, Point};

const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("KML serialization failed: {0}")]
    Xml(#[source] std::io::Error),
}

// ---------------------------------------------------------------------------
// Document rendering
// ---------------------------------------------------------------------------

/// Thin wrapper so every event write maps into [`WriteError`] the same way.
struct KmlWriter {
    inner: Writer<Vec<u8>>,
}

impl KmlWriter {
    fn new() -> Self {
        Self {
            inner: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    fn event<'a>(&mut self, event: impl Into<Event<'a>>) -> Result<(), WriteError> {
        self.inner
            .write_event(event)
            .map_err(WriteError::Xml)
    }

    fn start(&mut self, tag: &str) -> Result<(), WriteError> {
        self.event(Event::Start(BytesStart::new(tag)))
    }

    fn end(&mut self, tag: &str) -> Result<(), WriteError> {
        self.event(Event::End(BytesEnd::new(tag)))
    }

    /// `<tag>text</tag>`, text escaped.
    fn text_element(&mut self, tag: &str, text: &str) -> Result<(), WriteError> {
        self.start(tag)?;
        self.event(Event::Text(BytesText::new(text)))?;
        self.end(tag)
    }

    fn into_inner(self) -> Vec<u8> {
        self.inner.into_inner()
    }
}

/// Serialize `points` as a KML document with one placemark per point.
///
/// Coordinates are written longitude first, as KML requires.
pub fn render_kml(points: &[Point], document_name: Option<&str>) -> Result<Vec<u8>, WriteError> {
    let mut w = KmlWriter::new();
    w.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    w.event(Event::Start(
        BytesStart::new("kml").with_attributes([("xmlns", KML_NAMESPACE)]),
    ))?;

    if points.is_empty() && document_name.is_none() {
        w.event(Event::Empty(BytesStart::new("Document")))?;
    } else {
        w.start("Document")?;
        if let Some(name) = document_name {
            w.text_element("name", name)?;
        }
        for point in points {
            w.start("Placemark")?;
            w.text_element("name", &point.name)?;
            w.start("Point")?;
            w.text_element(
                "coordinates",
                &format!("{},{}", format_coord(point.lon), format_coord(point.lat)),
            )?;
            w.end("Point")?;
            w.end("Placemark")?;
        }
        w.end("Document")?;
    }

    w.end("kml")?;
    let mut bytes = w.into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}

/// Shortest round-trip decimal, always with a fractional part (`2.0`).
fn format_coord(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

// ---------------------------------------------------------------------------
// Saving
// ---------------------------------------------------------------------------

/// Write `points` to `path` as KML and return the path actually written.
/// A path without extension gets `.kml` appended.
pub fn save_kml(points: &[Point], path: &Path) -> Result<PathBuf, WriteError> {
    let path = if path.extension().is_none() {
        path.with_extension("kml")
    } else {
        path.to_path_buf()
    };

    let bytes = render_kml(points, Some(file_stem(&path)))?;
    std::fs::write(&path, bytes).map_err(|source| WriteError::Io {
        path: path.clone(),
        source,
    })?;

    log::info!("Wrote {} placemarks to {}", points.len(), path.display());
    Ok(path)
}
