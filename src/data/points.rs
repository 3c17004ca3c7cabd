use super::columns::ColumnBinding;
use super::model::{CsvDataset, Point, PointSet, Record, SkippedRow};

/// Why a single row could not become a [`Point`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PointError {
    #[error("'{column}' is empty")]
    Empty { column: String },

    #[error("'{column}' value '{value}' is not a number")]
    NotANumber { column: String, value: String },

    #[error("'{column}' value '{value}' is not finite")]
    NotFinite { column: String, value: String },
}

/// Convert one record into a point using the resolved columns.
pub fn extract_point(record: &Record<'_>, binding: &ColumnBinding) -> Result<Point, PointError> {
    let lat = parse_coordinate(record, binding.latitude)?;
    let lon = parse_coordinate(record, binding.longitude)?;
    let name = binding
        .name
        .and_then(|idx| record.cell(idx))
        .unwrap_or_default()
        .to_string();
    Ok(Point { lat, lon, name })
}

/// Extract every valid point in row order. Rows that fail are kept aside in
/// [`PointSet::skipped`] rather than aborting the whole conversion.
pub fn extract_points(dataset: &CsvDataset, binding: &ColumnBinding) -> PointSet {
    let mut set = PointSet::default();
    for (idx, record) in dataset.records().enumerate() {
        match extract_point(&record, binding) {
            Ok(point) => set.points.push(point),
            Err(reason) => {
                log::debug!("Skipping row {}: {reason}", idx + 1);
                set.skipped.push(SkippedRow {
                    row: idx + 1,
                    reason,
                });
            }
        }
    }
    if !set.skipped.is_empty() {
        log::info!(
            "Extracted {} points, skipped {} rows without valid coordinates",
            set.len(),
            set.skipped.len()
        );
    }
    set
}

fn parse_coordinate(record: &Record<'_>, index: usize) -> Result<f64, PointError> {
    let column = record.column_name(index).unwrap_or_default().to_string();
    let raw = record.cell(index).unwrap_or_default().trim();
    if raw.is_empty() {
        return Err(PointError::Empty { column });
    }
    let value: f64 = raw.parse().map_err(|_| PointError::NotANumber {
        column: column.clone(),
        value: raw.to_string(),
    })?;
    if !value.is_finite() {
        return Err(PointError::NotFinite {
            column,
            value: raw.to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use assert_matches::assert_matches;

    use super::*;
    use crate::data::columns::resolve;
    use crate::data::loader::parse_csv;

    fn points_from(text: &str) -> PointSet {
        let ds = parse_csv(text, Path::new("pts.csv")).unwrap();
        let binding = resolve(&ds.column_names).unwrap();
        extract_points(&ds, &binding)
    }

    #[test]
    fn skips_invalid_rows_and_keeps_order() {
        let set = points_from("latitude,longitude,name\n1.0,2.0,A\nbad,3.0,B\n5,6,C\n");
        assert_eq!(
            set.points,
            vec![
                Point { lat: 1.0, lon: 2.0, name: "A".into() },
                Point { lat: 5.0, lon: 6.0, name: "C".into() },
            ]
        );
        assert_eq!(set.skipped.len(), 1);
        assert_eq!(set.skipped[0].row, 2);
        assert_matches!(&set.skipped[0].reason, PointError::NotANumber { value, .. } if value == "bad");
    }

    #[test]
    fn count_matches_parsable_rows() {
        let set = points_from(
            "Latitude;Longitude\n1;1\n;2\nNaN;3\n4;inf\n 5 ; -6.5 \n1e1;2E-1\n",
        );
        assert_eq!(set.len(), 3);
        assert_eq!(set.skipped.len(), 3);
        assert_eq!(set.points[1].lon, -6.5);
        assert_eq!(set.points[2].lat, 10.0);
        assert_matches!(set.skipped[0].reason, PointError::Empty { .. });
        assert_matches!(set.skipped[1].reason, PointError::NotFinite { .. });
        assert_matches!(set.skipped[2].reason, PointError::NotFinite { .. });
    }

    #[test]
    fn missing_name_column_gives_empty_names() {
        let set = points_from("latitude,longitude\n1,2\n");
        assert_eq!(set.points[0].name, "");
    }

    #[test]
    fn name_is_kept_as_text() {
        let set = points_from("NAME,latitude,longitude\n42,1,2\n,3,4\n");
        assert_eq!(set.points[0].name, "42");
        assert_eq!(set.points[1].name, "");
    }

    #[test]
    fn short_rows_do_not_block_the_rest() {
        let set = points_from("latitude,longitude,name\n1,2\n3,4,B\n5\n   \n7,8,D\n");
        assert_eq!(
            set.points,
            vec![
                Point { lat: 1.0, lon: 2.0, name: String::new() },
                Point { lat: 3.0, lon: 4.0, name: "B".into() },
                Point { lat: 7.0, lon: 8.0, name: "D".into() },
            ]
        );
        assert_eq!(set.skipped.len(), 1);
        assert_eq!(set.skipped[0].row, 3);
        assert_matches!(&set.skipped[0].reason, PointError::Empty { column } if column == "longitude");
    }

    #[test]
    fn all_invalid_rows_give_empty_set() {
        let set = points_from("latitude,longitude\nx,y\n,\n");
        assert!(set.is_empty());
        assert_eq!(set.skipped.len(), 2);
    }
}
