use std::path::{Path, PathBuf};

use crate::data::columns::{self, SchemaError};
use crate::data::loader::{self, LoadError};
use crate::data::model::{CsvDataset, PointSet};
use crate::data::points::extract_points;
use crate::export::kml::{self, WriteError};
use crate::export::preview::{self, MapOptions, RenderError};

// ---------------------------------------------------------------------------
// Errors surfaced to the user
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("no data loaded, open a CSV file first")]
    NoData,

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Outcome of a KML export, for the confirmation message.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub placemarks: usize,
    pub skipped_rows: usize,
}

/// Outcome of writing a map preview.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewSummary {
    pub path: PathBuf,
    pub markers: usize,
    pub skipped_rows: usize,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The session: the currently loaded dataset plus settings, independent of
/// rendering. Every action works on this object alone.
#[derive(Debug, Default)]
pub struct AppState {
    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<CsvDataset>,

    /// Settings for generated map previews.
    pub map_options: MapOptions,

    /// Last status line shown under the toolbar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(map_options: MapOptions) -> Self {
        Self {
            map_options,
            ..Self::default()
        }
    }

    /// Load `path`, replacing the current dataset. On failure the previous
    /// dataset stays in place.
    pub fn load(&mut self, path: &Path) -> Result<&CsvDataset, AppError> {
        let dataset = loader::load_csv(path)?;
        self.status_message = Some(format!(
            "{}: {} rows, {} columns",
            dataset.stem(),
            dataset.len(),
            dataset.column_names.len()
        ));
        Ok(&*self.dataset.insert(dataset))
    }

    pub fn has_data(&self) -> bool {
        self.dataset.is_some()
    }

    /// Suggested output file name for the current dataset.
    pub fn default_kml_name(&self) -> String {
        let stem = self.dataset.as_ref().map_or("points", CsvDataset::stem);
        format!("{stem}.kml")
    }

    /// Resolve columns and extract points from the current dataset.
    pub fn points(&self) -> Result<PointSet, AppError> {
        let dataset = self.dataset.as_ref().ok_or(AppError::NoData)?;
        let binding = columns::resolve(&dataset.column_names)?;
        Ok(extract_points(dataset, &binding))
    }

    /// Convert the current dataset and write it to `path` as KML.
    pub fn convert_to_kml(&self, path: &Path) -> Result<ExportSummary, AppError> {
        let points = self.points()?;
        let path = kml::save_kml(&points.points, path)?;
        Ok(ExportSummary {
            path,
            placemarks: points.len(),
            skipped_rows: points.skipped.len(),
        })
    }

    /// Render the current dataset to a temporary map page.
    pub fn preview(&self) -> Result<PreviewSummary, AppError> {
        let points = self.points()?;
        let path = preview::write_preview(&points, &self.map_options)?;
        Ok(PreviewSummary {
            path,
            markers: points.len(),
            skipped_rows: points.skipped.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn write_csv(dir: &Path, name: &str, text: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn actions_without_data_fail() {
        let state = AppState::default();
        assert_matches!(state.points(), Err(AppError::NoData));
        assert_matches!(state.preview(), Err(AppError::NoData));
        assert_eq!(state.default_kml_name(), "points.kml");
    }

    #[test]
    fn load_replaces_previous_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_csv(dir.path(), "a.csv", "latitude,longitude\n1,2\n2,3\n");
        let second = write_csv(dir.path(), "b.csv", "latitude;longitude;name\n5;6;X\n");

        let mut state = AppState::default();
        state.load(&first).unwrap();
        assert_eq!(state.dataset.as_ref().unwrap().len(), 2);

        state.load(&second).unwrap();
        let ds = state.dataset.as_ref().unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.column_names, vec!["latitude", "longitude", "name"]);
        assert_eq!(state.default_kml_name(), "b.kml");
    }

    #[test]
    fn failed_load_keeps_previous_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_csv(dir.path(), "good.csv", "latitude,longitude\n1,2\n");
        let bad = write_csv(dir.path(), "bad.csv", "latitude,longitude\n1,2,3\n");

        let mut state = AppState::default();
        state.load(&good).unwrap();
        assert_matches!(state.load(&bad), Err(AppError::Load(_)));
        assert_eq!(state.dataset.as_ref().unwrap().stem(), "good");
    }

    #[test]
    fn convert_writes_valid_points_and_counts_skips() {
        let dir = tempfile::tempdir().unwrap();
        let csv = write_csv(
            dir.path(),
            "pts.csv",
            "latitude,longitude,name\n1.0,2.0,A\nbad,3.0,B\n",
        );
        let mut state = AppState::default();
        state.load(&csv).unwrap();

        let summary = state.convert_to_kml(&dir.path().join("out.kml")).unwrap();
        assert_eq!(summary.placemarks, 1);
        assert_eq!(summary.skipped_rows, 1);

        let text = std::fs::read_to_string(&summary.path).unwrap();
        assert_eq!(text.matches("<Placemark>").count(), 1);
        assert!(text.contains("<name>A</name>"));
        assert!(text.contains("<coordinates>2.0,1.0</coordinates>"));
    }

    #[test]
    fn missing_columns_fail_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let csv = write_csv(dir.path(), "pts.csv", "lat,longitude\n1,2\n");
        let out = dir.path().join("out.kml");

        let mut state = AppState::default();
        state.load(&csv).unwrap();
        assert_matches!(state.convert_to_kml(&out), Err(AppError::Schema(_)));
        assert_matches!(state.preview(), Err(AppError::Schema(_)));
        assert!(!out.exists());
    }

    #[test]
    fn preview_of_all_invalid_rows_is_a_render_error() {
        let dir = tempfile::tempdir().unwrap();
        let csv = write_csv(dir.path(), "pts.csv", "latitude,longitude\nx,y\n");
        let mut state = AppState::default();
        state.load(&csv).unwrap();
        assert_matches!(state.preview(), Err(AppError::Render(RenderError::NoPoints)));
    }
}
