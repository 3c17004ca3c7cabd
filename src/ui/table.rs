use eframe::egui::{self, Align, Layout, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::CsvDataset;

const ROW_HEIGHT: f32 = 18.0;
const HEADER_HEIGHT: f32 = 22.0;

// ---------------------------------------------------------------------------
// Data table (central panel)
// ---------------------------------------------------------------------------

/// Render the loaded rows with one column per CSV header.
pub fn data_table(ui: &mut Ui, dataset: &CsvDataset) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new(format!("Rows: {}", dataset.len())).strong());
        ui.separator();
        ui.label(dataset.path.display().to_string());
    });
    ui.separator();

    egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(Layout::left_to_right(Align::Center))
            .column(Column::auto().at_least(40.0))
            .columns(
                Column::auto().at_least(100.0).clip(true),
                dataset.column_names.len(),
            )
            .header(HEADER_HEIGHT, |mut header| {
                header.col(|ui: &mut Ui| {
                    ui.strong("#");
                });
                for name in &dataset.column_names {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, dataset.len(), |mut row| {
                    let idx = row.index();
                    row.col(|ui: &mut Ui| {
                        ui.label((idx + 1).to_string());
                    });
                    for cell in &dataset.rows[idx] {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell);
                        });
                    }
                });
            });
    });
}
