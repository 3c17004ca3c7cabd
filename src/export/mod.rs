/// Output side: KML documents and browser map previews.

pub mod kml;
pub mod preview;
