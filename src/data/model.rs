use std::path::{Path, PathBuf};

use serde::Serialize;

use super::points::PointError;

// ---------------------------------------------------------------------------
// CsvDataset – the loaded record set
// ---------------------------------------------------------------------------

/// The full parsed CSV file: ordered headers plus raw cell text per row.
#[derive(Debug, Clone)]
pub struct CsvDataset {
    /// File the data was read from.
    pub path: PathBuf,
    /// Delimiter detected while loading.
    pub delimiter: u8,
    /// Header names in file order.
    pub column_names: Vec<String>,
    /// Rows in file order; every row has `column_names.len()` cells.
    pub rows: Vec<Vec<String>>,
}

impl CsvDataset {
    /// Number of data rows (header excluded).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the file had no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over all rows as records, in file order.
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(|cells| Record {
            columns: &self.column_names,
            cells,
        })
    }

    /// File name without extension, used to name exported documents.
    pub fn stem(&self) -> &str {
        file_stem(&self.path)
    }
}

pub(crate) fn file_stem(path: &Path) -> &str {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("points")
}

// ---------------------------------------------------------------------------
// Record – one row, cells addressed by column position
// ---------------------------------------------------------------------------

/// A read-only view of one CSV row.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    columns: &'a [String],
    cells: &'a [String],
}

impl<'a> Record<'a> {
    /// Cell by column position.
    pub fn cell(&self, index: usize) -> Option<&'a str> {
        self.cells.get(index).map(String::as_str)
    }

    /// Column name at `index`.
    pub fn column_name(&self, index: usize) -> Option<&'a str> {
        self.columns.get(index).map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Point / PointSet
// ---------------------------------------------------------------------------

/// A validated geographic point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
    pub name: String,
}

/// A row that did not yield a point.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// 1-based data row number (header not counted).
    pub row: usize,
    pub reason: PointError,
}

/// Points extracted from the current dataset, in row order.
#[derive(Debug, Clone, Default)]
pub struct PointSet {
    pub points: Vec<Point>,
    pub skipped: Vec<SkippedRow>,
}

impl PointSet {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Mean latitude and mean longitude, `None` when there is nothing to
    /// average or the result is not finite.
    pub fn centroid(&self) -> Option<(f64, f64)> {
        if self.points.is_empty() {
            return None;
        }
        let n = self.points.len() as f64;
        let (sum_lat, sum_lon) = self
            .points
            .iter()
            .fold((0.0, 0.0), |(la, lo), p| (la + p.lat, lo + p.lon));
        let (lat, lon) = (sum_lat / n, sum_lon / n);
        (lat.is_finite() && lon.is_finite()).then_some((lat, lon))
    }
}
