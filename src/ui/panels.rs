use std::path::{Path, PathBuf};

use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open CSV…").clicked() {
                ui.close_menu();
                open_file_dialog(state);
            }
        });

        ui.separator();

        let has_data = state.has_data();
        if ui
            .add_enabled(has_data, egui::Button::new("💾 Convert & Save KML"))
            .clicked()
        {
            convert_and_save(state);
        }
        if ui
            .add_enabled(has_data, egui::Button::new("🗺 Preview map (internet required)"))
            .on_hover_text("Opens an OpenStreetMap page in your browser")
            .clicked()
        {
            preview_map(state);
        }

        ui.separator();

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::GRAY));
        }
    });
}

// ---------------------------------------------------------------------------
// Drop zone
// ---------------------------------------------------------------------------

/// Load the first file dropped onto the window, if any.
pub fn handle_dropped_files(ctx: &egui::Context, state: &mut AppState) {
    let dropped: Vec<PathBuf> = ctx.input(|i| {
        i.raw
            .dropped_files
            .iter()
            .filter_map(|f| f.path.clone())
            .collect()
    });

    if let Some(path) = dropped.first() {
        if is_csv(path) {
            load(state, path);
        } else {
            show_error(
                "Not a CSV file",
                &format!("{} is not a .csv file.", path.display()),
            );
        }
    }
}

/// Placeholder shown in the central panel when nothing is loaded.
pub fn drop_hint(ui: &mut Ui, hovering: bool) {
    ui.centered_and_justified(|ui: &mut Ui| {
        let text = if hovering {
            "Release to load the file"
        } else {
            "📂 Drag & drop a CSV file here, or use File → Open CSV…"
        };
        ui.heading(text);
    });
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open CSV file")
        .add_filter("CSV files", &["csv"])
        .pick_file();

    if let Some(path) = file {
        load(state, &path);
    }
}

fn load(state: &mut AppState, path: &Path) {
    if let Err(e) = state.load(path) {
        log::error!("Failed to load {}: {e:#}", path.display());
        show_error("Error", &format!("Could not read CSV: {e}"));
    }
}

fn convert_and_save(state: &mut AppState) {
    // Resolve columns before asking for a destination.
    if let Err(e) = state.points() {
        log::error!("Conversion failed: {e:#}");
        show_error("Error", &format!("Conversion failed: {e}"));
        return;
    }

    let Some(path) = rfd::FileDialog::new()
        .set_title("Save KML")
        .set_file_name(state.default_kml_name())
        .add_filter("KML files", &["kml"])
        .save_file()
    else {
        return;
    };

    match state.convert_to_kml(&path) {
        Ok(summary) => {
            let mut msg = format!(
                "KML file saved to:\n{}\n\n{} placemarks written.",
                summary.path.display(),
                summary.placemarks
            );
            if summary.skipped_rows > 0 {
                msg.push_str(&format!(
                    "\n{} rows without valid coordinates were skipped.",
                    summary.skipped_rows
                ));
            }
            state.status_message = Some(format!("Saved {}", summary.path.display()));
            show_info("Saved", &msg);
        }
        Err(e) => {
            log::error!("Conversion failed: {e:#}");
            show_error("Error", &format!("Conversion failed: {e}"));
        }
    }
}

fn preview_map(state: &mut AppState) {
    let result = state.preview().and_then(|summary| {
        show_info(
            "Map preview",
            "The map will open in your browser. Make sure you are connected to the internet.",
        );
        crate::export::preview::open_in_browser(&summary.path)?;
        Ok(summary)
    });

    match result {
        Ok(summary) => {
            state.status_message = Some(format!(
                "Preview with {} markers: {}",
                summary.markers,
                summary.path.display()
            ));
        }
        Err(e) => {
            log::error!("Preview failed: {e:#}");
            show_error("Error", &format!("Could not show the map: {e}"));
        }
    }
}

// ---------------------------------------------------------------------------
// Modal dialogs
// ---------------------------------------------------------------------------

fn show_info(title: &str, msg: &str) {
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Info)
        .set_title(title)
        .set_description(msg)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}

fn show_error(title: &str, msg: &str) {
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title(title)
        .set_description(msg)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}
