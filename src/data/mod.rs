/// Data layer: CSV loading, column resolution and point extraction.
///
/// Architecture:
/// ```text
///      .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  sniff delimiter, parse → CsvDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ columns  │  find latitude / longitude / name → ColumnBinding
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  points  │  parse coordinates per row → PointSet (+ skipped rows)
///   └──────────┘
/// ```

pub mod columns;
pub mod loader;
pub mod model;
pub mod points;
