mod app;
mod cli;
mod data;
mod export;
mod state;
mod ui;

use anyhow::Result;
use app::CsvKmlApp;
use cli::{Command, Settings};
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::from_cli();
    let mut state = AppState::new(settings.map_options());

    match &settings.command {
        Some(Command::Convert { input, output }) => {
            cli::run_convert(&mut state, input, output.as_deref())?;
        }
        Some(Command::Preview { input, no_open }) => {
            cli::run_preview(&mut state, input, !no_open)?;
        }
        None => run_gui(state, &settings)?,
    }
    Ok(())
}

fn run_gui(mut state: AppState, settings: &Settings) -> Result<()> {
    if let Some(path) = &settings.file {
        if let Err(e) = state.load(path) {
            log::error!("Failed to load {}: {e:#}", path.display());
            state.status_message = Some(format!("Error: {e}"));
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 600.0])
            .with_min_inner_size([500.0, 300.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "CSV to KML Converter",
        options,
        Box::new(|_cc| Ok(Box::new(CsvKmlApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("window failed: {e}"))
}
