use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::export::preview::{self, MapOptions, DEFAULT_TILE_URL, DEFAULT_ZOOM};
use crate::state::AppState;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
/// CSV to KML Converter - turn latitude/longitude tables into KML placemarks
pub struct Settings {
    /// CSV file to open on startup
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Initial zoom level of the preview map (1-19)
    #[arg(long, global = true, default_value_t = DEFAULT_ZOOM, value_parser = clap::value_parser!(u8).range(1..=19))]
    pub zoom: u8,

    /// Tile URL template for the preview map
    #[arg(long, global = true, default_value = DEFAULT_TILE_URL)]
    pub tile_url: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Convert a CSV file to KML without opening the window
    Convert {
        /// Input CSV file
        input: PathBuf,
        /// Output KML file (defaults to the input path with a .kml extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write the map preview page for a CSV file and open it in the browser
    Preview {
        /// Input CSV file
        input: PathBuf,
        /// Only write the page and print its path
        #[arg(long)]
        no_open: bool,
    },
}

impl Settings {
    /// Parse the process arguments, exiting with usage on error.
    pub fn from_cli() -> Self {
        Self::parse()
    }

    pub fn map_options(&self) -> MapOptions {
        MapOptions {
            zoom_start: self.zoom,
            tile_url: self.tile_url.clone(),
            ..MapOptions::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Headless commands
// ---------------------------------------------------------------------------

pub fn run_convert(state: &mut AppState, input: &Path, output: Option<&Path>) -> Result<PathBuf> {
    state
        .load(input)
        .with_context(|| format!("loading {}", input.display()))?;

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input.with_extension("kml"));
    let summary = state
        .convert_to_kml(&output)
        .context("converting to KML")?;

    println!(
        "Wrote {} placemarks to {}",
        summary.placemarks,
        summary.path.display()
    );
    if summary.skipped_rows > 0 {
        println!(
            "Skipped {} rows without valid coordinates",
            summary.skipped_rows
        );
    }
    Ok(summary.path)
}

pub fn run_preview(state: &mut AppState, input: &Path, open_browser: bool) -> Result<PathBuf> {
    state
        .load(input)
        .with_context(|| format!("loading {}", input.display()))?;
    let summary = state.preview().context("rendering map preview")?;

    println!("{}", summary.path.display());
    if open_browser {
        preview::open_in_browser(&summary.path)?;
    }
    Ok(summary.path)
}
