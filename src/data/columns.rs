/// Header names that carry the point fields (compared case-insensitively).
pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";
pub const NAME: &str = "name";

/// Column indices of the point fields within a dataset's headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnBinding {
    pub latitude: usize,
    pub longitude: usize,
    pub name: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("CSV must have 'latitude' and 'longitude' columns (missing: {}; found: {})", missing.join(", "), available.join(", "))]
    MissingColumn {
        missing: Vec<&'static str>,
        available: Vec<String>,
    },
}

/// Locate the latitude, longitude and optional name columns.
/// The first header matching each field wins.
pub fn resolve(column_names: &[String]) -> Result<ColumnBinding, SchemaError> {
    let find = |wanted: &str| {
        column_names
            .iter()
            .position(|c| c.trim().eq_ignore_ascii_case(wanted))
    };

    match (find(LATITUDE), find(LONGITUDE)) {
        (Some(latitude), Some(longitude)) => Ok(ColumnBinding {
            latitude,
            longitude,
            name: find(NAME),
        }),
        (lat, lon) => {
            let mut missing = Vec::new();
            if lat.is_none() {
                missing.push(LATITUDE);
            }
            if lon.is_none() {
                missing.push(LONGITUDE);
            }
            Err(SchemaError::MissingColumn {
                missing,
                available: column_names.to_vec(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn resolution_ignores_case() {
        for (lat, lon) in [
            ("latitude", "longitude"),
            ("Latitude", "Longitude"),
            ("LATITUDE", "LONGITUDE"),
        ] {
            let binding = resolve(&headers(&["id", lat, lon])).unwrap();
            assert_eq!(
                binding,
                ColumnBinding {
                    latitude: 1,
                    longitude: 2,
                    name: None
                }
            );
        }
    }

    #[test]
    fn name_column_is_optional() {
        let binding = resolve(&headers(&["Name", "longitude", "latitude"])).unwrap();
        assert_eq!(binding.name, Some(0));
        assert_eq!(binding.latitude, 2);
        assert_eq!(binding.longitude, 1);
    }

    #[test]
    fn first_duplicate_wins() {
        let binding = resolve(&headers(&["LATITUDE", "latitude", "longitude"])).unwrap();
        assert_eq!(binding.latitude, 0);
    }

    #[test]
    fn partial_names_do_not_match() {
        assert_matches!(
            resolve(&headers(&["lat", "lon"])),
            Err(SchemaError::MissingColumn { missing, .. }) if missing == vec![LATITUDE, LONGITUDE]
        );
    }

    #[test]
    fn reports_only_the_missing_column() {
        let err = resolve(&headers(&["latitude", "name"])).unwrap_err();
        assert_matches!(&err, SchemaError::MissingColumn { missing, .. } if missing == &vec![LONGITUDE]);
        assert!(err.to_string().contains("missing: longitude"));
    }
}
